#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pixel_artist::palette_source::{PaletteSource, SourceChain};
use pixel_artist::{Animation, ArtDocument, ArtResult, PaletteIndex};

/// Size of the swatch canvas written by `save-palette`
const SWATCH_SIZE: usize = 8;

#[derive(Parser)]
#[command(version, about = "Command line tools for .pxlart pixel art")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a swatch canvas using the given colours as its palette
    SavePalette {
        /// Output .pxlart file
        output: PathBuf,

        /// Comma separated hex colours, or a `list:`/`file:` palette source
        colours: String,

        /// Keep the colours in the order given instead of sorting them
        #[arg(long, default_value_t = false)]
        unsorted: bool,
    },
    /// Export art as an image; the format follows the output extension
    Export {
        input: PathBuf,

        output: PathBuf,

        /// Output pixels per art pixel
        #[arg(short, long, default_value_t = 10)]
        scale: u32,

        /// Palette index to leave transparent
        #[arg(short, long)]
        transparent: Option<PaletteIndex>,
    },
    /// Combine frame images into one looping GIF
    Gif {
        output: PathBuf,

        #[arg(required = true)]
        frames: Vec<PathBuf>,
    },
    /// Print the size and palette of an art file
    Info { input: PathBuf },
}

fn swatch(colours: &str, sorted: bool) -> ArtResult<ArtDocument> {
    let mut art = ArtDocument::new(SWATCH_SIZE);
    for y in 0..SWATCH_SIZE as i32 {
        for x in 0..SWATCH_SIZE as i32 {
            art.pixels_mut().set_pixel(x, y, y as PaletteIndex)?;
        }
    }
    let sources = SourceChain::default();
    if sources.accepts(colours) {
        art.palette_mut()
            .replace_prefix(sources.fetch(colours)?.as_slice())?;
    } else {
        art.palette_from_list(colours)?;
    }
    if sorted {
        art.sort_palette();
    }
    Ok(art)
}

fn run(command: Commands) -> ArtResult<()> {
    match command {
        Commands::SavePalette {
            output,
            colours,
            unsorted,
        } => {
            swatch(&colours, !unsorted)?.save(&output)?;
            println!("Saving to: {}", output.display());
        }
        Commands::Export {
            input,
            output,
            scale,
            transparent,
        } => {
            ArtDocument::load(&input)?.export_to_image_file(&output, scale, transparent)?;
        }
        Commands::Gif { output, frames } => {
            Animation::new(frames).export_as_gif(&output)?;
        }
        Commands::Info { input } => {
            let art = ArtDocument::load(&input)?;
            println!("size: {0}x{0}", art.size());
            for (index, colour) in art.palette().iter() {
                let used = art.pixels().iter().filter(|pixel| *pixel == index).count();
                println!("{index:>3}  {colour}  {used} pixels");
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse().command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
