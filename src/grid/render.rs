//! Text rendering of a grid model as a bordered chart.

use super::model::{GridModel, Segment};

/// Glyph used for active cells. Each cell is drawn two glyphs wide.
pub const CELL_GLYPH: char = '■';

/// Render the grid as bordered text.
///
/// The top and bottom borders are `cells_x * 2 + 2` dashes. Every segment
/// contributes one line per row it covers; rows without a segment are not
/// drawn. Lines are joined with `\n` and there is no trailing newline.
pub fn render(grid: &GridModel) -> String {
    let border = "-".repeat(grid.cells_x() as usize * 2 + 2);

    let mut lines = Vec::with_capacity(grid.segments().len() + 2);
    lines.push(border.clone());
    for segment in grid.segments() {
        let line = render_segment_line(segment, grid.cells_x());
        for _ in 0..segment.height() {
            lines.push(line.clone());
        }
    }
    lines.push(border);

    lines.join("\n")
}

/// Render a single row of a segment between `|` walls.
fn render_segment_line(segment: &Segment, cells_x: u32) -> String {
    let mut line = String::with_capacity(cells_x as usize * 2 * CELL_GLYPH.len_utf8() + 2);
    line.push('|');
    for x in 1..=cells_x {
        if (segment.x1..=segment.x2).contains(&x) {
            line.push(CELL_GLYPH);
            line.push(CELL_GLYPH);
        } else {
            line.push_str("  ");
        }
    }
    line.push('|');
    line
}
