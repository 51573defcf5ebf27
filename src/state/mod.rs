mod config;
mod session;

pub use config::EditorConfig;
pub use session::EditorSession;
