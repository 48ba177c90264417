//! Text rendering of grids and stick graphs for debugging

use crate::algorithm::stick_graph::StickGraph;
use crate::spatial::grid::OccupancyGrid;

/// Draw the grid inside a box, one character per cell
///
/// Occupied cells are drawn as `█`, or as their intensity followed by `█`
/// when `show_values` is set.
pub fn render_grid(grid: &OccupancyGrid, show_values: bool) -> String {
    let size = grid.size();
    let border = "─".repeat(size);
    let mut out = String::with_capacity((size + 3) * (size + 2) * 3);

    out.push('┌');
    out.push_str(&border);
    out.push_str("┐\n");

    for row in grid.cells().rows() {
        out.push('│');
        for &value in row {
            if value > 0 {
                if show_values {
                    out.push_str(&value.to_string());
                }
                out.push('█');
            } else {
                out.push(' ');
            }
        }
        out.push_str("│\n");
    }

    out.push('└');
    out.push_str(&border);
    out.push('┘');
    out
}

/// One line per node: `(x,y) -> (px,py)`, or `(x,y) seed`
pub fn render_edges(graph: &StickGraph) -> String {
    graph
        .nodes()
        .iter()
        .map(|node| match node.parent {
            Some(parent) => format!("{} -> {}\n", node.position, parent.position()),
            None => format!("{} seed\n", node.position),
        })
        .collect()
}
