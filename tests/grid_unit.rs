//! Unit tests for the grid reduction module.
//!
//! These tests verify the core chart algorithms:
//! - Row reduction to bounding intervals
//! - Text rendering
//! - Tag document serialization and parsing

use image::{DynamicImage, GrayImage, Luma, RgbaImage};
use stitch_chart::grid::*;

const B: u8 = 0;
const W: u8 = 255;

/// Build a grayscale bitmap from rows of `#` (black) and `.` (white).
fn bitmap(rows: &[&str]) -> DynamicImage {
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |r| r.len()) as u32;
    let img = GrayImage::from_fn(width, height, |x, y| {
        let c = rows[y as usize].as_bytes()[x as usize];
        Luma([if c == b'#' { B } else { W }])
    });
    DynamicImage::ImageLuma8(img)
}

// ==================== Row Reduction Tests ====================

#[test]
fn test_all_white_bitmap_has_no_segments() {
    let grid = reduce(&bitmap(&["....", "....", "...."])).unwrap();
    assert_eq!(grid.cells_x(), 4);
    assert_eq!(grid.cells_y(), 3);
    assert!(grid.segments().is_empty());
}

#[test]
fn test_single_active_pixel_per_row() {
    for c in 0..5usize {
        let mut row = vec![b'.'; 5];
        row[c] = b'#';
        let row = String::from_utf8(row).unwrap();
        let grid = reduce(&bitmap(&[&row])).unwrap();
        let expected = c as u32 + 1;
        assert_eq!(grid.segments(), &[Segment::row(1, expected, expected)]);
    }
}

#[test]
fn test_gap_collapses_to_bounding_interval() {
    // Width 10, columns 2 and 7 (0-based) active.
    let grid = reduce(&bitmap(&["..#....#.."])).unwrap();
    assert_eq!(grid.segments(), &[Segment::row(1, 3, 8)]);
}

#[test]
fn test_four_by_three_scenario() {
    let grid = reduce(&bitmap(&["....", ".##.", "...#"])).unwrap();
    assert_eq!(grid.cells_x(), 4);
    assert_eq!(grid.cells_y(), 3);
    assert_eq!(
        grid.segments(),
        &[
            Segment { x1: 2, x2: 3, y1: 2, y2: 2 },
            Segment { x1: 4, x2: 4, y1: 3, y2: 3 },
        ]
    );
}

#[test]
fn test_four_by_three_left_aligned_samples() {
    // Columns 0-1 active in row 1, column 3 in row 2.
    let samples = [W, W, W, W, B, B, W, W, W, W, W, B];
    let grid = reduce_samples(&samples, 4, 3, SpanPolicy::BoundingInterval);
    assert_eq!(grid.cells_x(), 4);
    assert_eq!(grid.cells_y(), 3);
    assert_eq!(
        grid.segments(),
        &[Segment::row(2, 1, 2), Segment::row(3, 4, 4)]
    );
}

#[test]
fn test_all_active_two_by_two() {
    let grid = reduce(&bitmap(&["##", "##"])).unwrap();
    assert_eq!(
        grid.segments(),
        &[Segment::row(1, 1, 2), Segment::row(2, 1, 2)]
    );
    assert_eq!(render(&grid), "------\n|■■■■|\n|■■■■|\n------");
}

#[test]
fn test_near_white_is_inactive() {
    let img = GrayImage::from_fn(3, 1, |x, _| Luma([[0xFA, 0xF9, 0xFF][x as usize]]));
    let grid = reduce(&DynamicImage::ImageLuma8(img)).unwrap();
    assert_eq!(grid.segments(), &[Segment::row(1, 2, 2)]);
}

#[test]
fn test_color_bitmap_is_rejected_before_any_segment() {
    let img = DynamicImage::ImageRgba8(RgbaImage::new(3, 3));
    let err = reduce(&img).unwrap_err();
    assert!(matches!(err, GridError::UnsupportedColorModel(_)));
    assert!(err.to_string().contains("grayscale"));
}

#[test]
fn test_segments_are_in_row_order() {
    let grid = reduce(&bitmap(&["#..", "...", ".#.", "..#"])).unwrap();
    let rows: Vec<u32> = grid.segments().iter().map(|s| s.y1).collect();
    assert_eq!(rows, vec![1, 3, 4]);
    assert!(grid.segments().iter().all(|s| s.y1 == s.y2));
}

// ==================== Rendering Tests ====================

#[test]
fn test_render_all_white_is_borders_only() {
    let grid = reduce(&bitmap(&["...", "..."])).unwrap();
    assert_eq!(render(&grid), "--------\n--------");
}

#[test]
fn test_render_skips_empty_rows() {
    let grid = reduce(&bitmap(&["....", ".##.", "...#"])).unwrap();
    let text = render(&grid);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec!["----------", "|  ■■■■  |", "|      ■■|", "----------"]
    );
}

#[test]
fn test_render_line_width_is_constant() {
    let grid = reduce(&bitmap(&["#....", "..#..", "....#", "#...#"])).unwrap();
    for line in render(&grid).lines() {
        assert_eq!(line.chars().count(), 12);
    }
}

// ==================== Serialization Tests ====================

#[test]
fn test_xml_all_white_has_no_segment_elements() {
    let grid = reduce(&bitmap(&["..", ".."])).unwrap();
    assert!(!to_xml(&grid).contains("<segment"));
}

#[test]
fn test_xml_round_trip() {
    let grid = reduce(&bitmap(&["#..#.", ".....", "..#..", "#####"])).unwrap();
    let parsed = from_xml(&to_xml(&grid)).unwrap();
    assert_eq!(parsed, grid);
    assert_eq!(parsed.cells_x(), 5);
    assert_eq!(parsed.cells_y(), 4);
}

#[test]
fn test_xml_round_trip_empty() {
    let grid = GridModel::new(40, 40);
    assert_eq!(from_xml(&to_xml(&grid)).unwrap(), grid);
}

#[test]
fn test_reduction_is_idempotent() {
    let img = bitmap(&[".#..#", "#####", "....."]);
    let first = to_xml(&reduce(&img).unwrap());
    let second = to_xml(&reduce(&img).unwrap());
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn test_xml_attribute_order() {
    let grid = reduce(&bitmap(&[".##"])).unwrap();
    assert!(to_xml(&grid).contains("<segment x1=\"2\" x2=\"3\" y1=\"1\" y2=\"1\"></segment>"));
}
