use std::collections::HashSet;

use pixel_artist::tools::{flood, new_tool, Bucket, MirroredPencil, PartialBucket, Pencil, Tool};
use pixel_artist::{ArtDocument, PixelBuffer, Position};
use pretty_assertions::assert_eq;

// Build a buffer from rows of digits, e.g. ["0010", "0110"]
fn grid(rows: &[&str]) -> PixelBuffer {
    PixelBuffer::from_rows(
        rows.iter()
            .map(|row| row.bytes().map(|b| (b - b'0') as u32).collect())
            .collect(),
    )
    .unwrap()
}

fn rows(buffer: &PixelBuffer) -> Vec<Vec<u32>> {
    buffer.rows().map(<[u32]>::to_vec).collect()
}

// Independent depth-first walk used as the reference region
fn component(buffer: &PixelBuffer, start: Position) -> HashSet<Position> {
    let target = buffer.get_pixel(start.x, start.y).unwrap();
    let mut region = HashSet::new();
    let mut stack = vec![start];
    while let Some(pos) = stack.pop() {
        if !buffer.contains(pos.x, pos.y)
            || region.contains(&pos)
            || buffer.get_pixel(pos.x, pos.y).unwrap() != target
        {
            continue;
        }
        region.insert(pos);
        stack.extend([
            Position::new(pos.x + 1, pos.y),
            Position::new(pos.x - 1, pos.y),
            Position::new(pos.x, pos.y + 1),
            Position::new(pos.x, pos.y - 1),
        ]);
    }
    region
}

fn changed_cells(before: &PixelBuffer, after: &PixelBuffer) -> HashSet<Position> {
    let mut changed = HashSet::new();
    for y in 0..before.height() as i32 {
        for x in 0..before.width() as i32 {
            if before.get_pixel(x, y).unwrap() != after.get_pixel(x, y).unwrap() {
                changed.insert(Position::new(x, y));
            }
        }
    }
    changed
}

const MAZE: [&str; 6] = [
    "001100", //
    "011022", //
    "010020", //
    "111000", //
    "000110", //
    "020010", //
];

#[test]
fn test_pencil_then_bucket_scenario() {
    let mut art = ArtDocument::new(5);

    // Draw a full line across row 3
    for x in 0..5 {
        Pencil
            .activate(Position::new(x, 3), art.pixels_mut(), 1)
            .unwrap();
    }
    assert_eq!(
        rows(art.pixels()),
        vec![
            vec![0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0],
            vec![0, 0, 0, 0, 0],
            vec![1, 1, 1, 1, 1],
            vec![0, 0, 0, 0, 0],
        ]
    );

    // Fill from the top: everything above the line, nothing below it
    Bucket
        .activate(Position::new(2, 0), art.pixels_mut(), 4)
        .unwrap();
    assert_eq!(
        rows(art.pixels()),
        vec![
            vec![4, 4, 4, 4, 4],
            vec![4, 4, 4, 4, 4],
            vec![4, 4, 4, 4, 4],
            vec![1, 1, 1, 1, 1],
            vec![0, 0, 0, 0, 0],
        ]
    );
}

#[test]
fn test_bucket_changes_exactly_the_connected_component() {
    for start in [
        Position::new(0, 0),
        Position::new(2, 0),
        Position::new(5, 5),
        Position::new(4, 1),
        Position::new(1, 5),
    ] {
        let before = grid(&MAZE);
        let mut after = before.clone();
        let expected = component(&before, start);

        Bucket.activate(start, &mut after, 9).unwrap();

        assert_eq!(changed_cells(&before, &after), expected, "start {start:?}");
        assert!(expected.iter().all(|p| after.get_pixel(p.x, p.y).unwrap() == 9));
    }
}

#[test]
fn test_flood_visits_each_cell_once() {
    let mut buffer = grid(&MAZE);
    let expected = component(&buffer, Position::new(0, 0));

    let region = flood(&mut buffer, Position::new(0, 0), 7, |_| true).unwrap();

    assert_eq!(region.len(), expected.len());
    assert_eq!(region.into_iter().collect::<HashSet<_>>(), expected);
}

#[test]
fn test_bucket_is_idempotent() {
    let mut buffer = grid(&MAZE);
    let start = Position::new(0, 0);
    Bucket.activate(start, &mut buffer, 5).unwrap();
    let once = buffer.clone();
    let first_region = component(&once, start);

    // Filling the same region with the same colour visits it again and changes nothing
    let second_region = flood(&mut buffer, start, 5, |_| true).unwrap();
    assert_eq!(buffer, once);
    assert_eq!(second_region.into_iter().collect::<HashSet<_>>(), first_region);
}

#[test]
fn test_same_colour_fill_is_a_no_op() {
    let mut buffer = grid(&MAZE);
    let before = buffer.clone();
    Bucket.activate(Position::new(2, 0), &mut buffer, 1).unwrap();
    assert_eq!(buffer, before);
}

#[test]
fn test_partial_bucket_dithers_the_bucket_region() {
    for start in [Position::new(0, 0), Position::new(1, 0), Position::new(5, 5)] {
        let before = grid(&MAZE);
        let mut after = before.clone();
        let region = component(&before, start);

        PartialBucket.activate(start, &mut after, 8).unwrap();

        let changed = changed_cells(&before, &after);
        let expected: HashSet<Position> = region
            .iter()
            .copied()
            .filter(|p| (p.x + p.y) % 2 == 0)
            .collect();
        assert_eq!(changed, expected, "start {start:?}");
    }
}

#[test]
fn test_partial_bucket_walks_through_unpainted_cells() {
    // A one pixel wide corridor only stays connected through odd cells
    let mut buffer = grid(&["000", "111", "111"]);
    let region = flood(&mut buffer, Position::new(0, 0), 3, PartialBucket::paints).unwrap();

    assert_eq!(region.len(), 3);
    assert_eq!(rows(&buffer)[0], vec![3, 0, 3]);
}

#[test]
fn test_partial_bucket_from_odd_seed() {
    let mut buffer = PixelBuffer::new(4, 4);
    PartialBucket
        .activate(Position::new(1, 0), &mut buffer, 2)
        .unwrap();
    assert_eq!(
        rows(&buffer),
        vec![
            vec![2, 0, 2, 0],
            vec![0, 2, 0, 2],
            vec![2, 0, 2, 0],
            vec![0, 2, 0, 2],
        ]
    );
}

#[test]
fn test_mirrored_pencil_example() {
    let mut buffer = PixelBuffer::new(8, 8);
    MirroredPencil::new("xy")
        .activate(Position::new(1, 1), &mut buffer, 2)
        .unwrap();
    for (x, y) in [(1, 1), (6, 1), (1, 6), (6, 6)] {
        assert_eq!(buffer.get_pixel(x, y).unwrap(), 2);
    }
    assert_eq!(buffer.iter().filter(|index| *index == 2).count(), 4);
}

#[test]
fn test_tools_reject_off_canvas_locations() {
    let mut buffer = grid(&MAZE);
    let before = buffer.clone();
    let off = Position::new(6, 0);

    assert!(Pencil.activate(off, &mut buffer, 1).is_err());
    assert!(Bucket.activate(off, &mut buffer, 1).is_err());
    assert!(PartialBucket.activate(Position::new(0, -1), &mut buffer, 1).is_err());
    assert!(MirroredPencil::new("x").activate(off, &mut buffer, 1).is_err());
    assert_eq!(buffer, before);
}

#[test]
fn test_mirror_axis_is_case_sensitive() {
    let tool = new_tool("Mirrored:XY").unwrap();
    assert_eq!(tool.to_string(), "mirrored:XY");

    // Upper case letters name no axis, so only the pencil pixel is drawn
    let mut buffer = PixelBuffer::new(4, 4);
    tool.activate(Position::new(0, 0), &mut buffer, 1).unwrap();
    assert_eq!(buffer.iter().filter(|index| *index == 1).count(), 1);
}
