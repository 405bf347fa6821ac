//! Text preview of a grid and the polylines drawn over it.
//!
//! Stateless: every call draws whatever the grid and editor hold right now.
//! Burned cells come from the field; pending polyline vertices are mapped
//! to the cell under them, with the current polyline's start and end
//! marked separately.

use crate::editor::BoundaryEditor;
use crate::grid::SharedGrid;

/// Field values above this are drawn as boundary
pub const BURN_THRESHOLD: f32 = 0.5;

pub const EMPTY: char = '.';
pub const BOUNDARY: char = '#';
pub const VERTEX: char = 'o';
pub const CURRENT_START: char = 'S';
pub const CURRENT_END: char = 'E';

/// Render the grid as `height` lines of `width` characters.
pub fn render_text(grid: &SharedGrid, editor: &BoundaryEditor) -> Vec<String> {
    let dims = grid.dims();
    let mut canvas: Vec<Vec<char>> = grid
        .as_slice()
        .chunks(dims.width())
        .map(|row| {
            row.iter()
                .map(|&v| if v > BURN_THRESHOLD { BOUNDARY } else { EMPTY })
                .collect()
        })
        .collect();

    let mut mark = |x: f64, y: f64, glyph: char| {
        if let Some((row, col)) = dims.cell_at(x, y) {
            canvas[row][col] = glyph;
        }
    };

    for polyline in editor.polylines() {
        for point in polyline.points() {
            mark(point.x, point.y, VERTEX);
        }
    }

    let current = editor.current();
    if let Some(first) = current.first() {
        mark(first.x, first.y, CURRENT_START);
    }
    if current.len() > 1 {
        if let Some(last) = current.last() {
            mark(last.x, last.y, CURRENT_END);
        }
    }

    canvas
        .into_iter()
        .map(|row| row.into_iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::GridDims;

    #[test]
    fn test_render_marks_cells_and_vertices() {
        let dims = GridDims::new(4, 2).unwrap();
        let mut grid = SharedGrid::new(dims);
        grid.set_value_at(1, 0, 1.0);
        grid.set_value_at(1, 1, 0.5);

        let mut editor = BoundaryEditor::new(dims);
        editor.add_point(0.3, 0.1);
        editor.add_point(0.8, 0.1);

        let lines = render_text(&grid, &editor);
        assert_eq!(lines, vec![".S.E".to_string(), "#...".to_string()]);
    }

    #[test]
    fn test_finished_polylines_use_vertex_glyph() {
        let dims = GridDims::new(4, 4).unwrap();
        let grid = SharedGrid::new(dims);
        let mut editor = BoundaryEditor::new(dims);
        editor.add_point(0.1, 0.1);
        editor.add_point(0.9, 0.1);
        editor.add_point(0.9, 0.1); // end

        let lines = render_text(&grid, &editor);
        assert_eq!(lines[0], "o..o");
        assert!(lines[1..].iter().all(|line| line == "...."));
    }

    #[test]
    fn test_points_off_grid_are_skipped() {
        let dims = GridDims::new(2, 2).unwrap();
        let grid = SharedGrid::new(dims);
        let mut editor = BoundaryEditor::new(dims);
        editor.add_point(-0.5, 0.2);
        assert_eq!(render_text(&grid, &editor), vec!["..", ".."]);
    }
}
