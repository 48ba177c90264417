//! Tests for text rendering of grids and stick graphs

#[cfg(test)]
mod tests {
    use ridgegen::algorithm::stick_graph::StickGraph;
    use ridgegen::io::visualization::{render_edges, render_grid};
    use ridgegen::spatial::coordinate::Coordinate;
    use ridgegen::spatial::grid::OccupancyGrid;

    // Tests the grid is boxed with one character per cell
    // Verified by swapping rows and columns
    #[test]
    fn test_render_grid() {
        let mut grid = OccupancyGrid::new(3);
        assert!(grid.place(2, 0, 5).is_ok());
        assert!(grid.place(0, 1, 9).is_ok());

        let text = render_grid(&grid, false);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["┌───┐", "│  █│", "│█  │", "│   │", "└───┘"]
        );
    }

    // Tests values are printed before occupied cells on request
    // Verified by ignoring the flag
    #[test]
    fn test_render_grid_with_values() {
        let mut grid = OccupancyGrid::new(2);
        assert!(grid.place(1, 1, 42).is_ok());
        let text = render_grid(&grid, true);
        assert!(text.contains("│ 42█│"));
    }

    // Tests each node is listed with its parent, seeds marked
    // Verified by listing parent first
    #[test]
    fn test_render_edges() {
        let mut graph = StickGraph::new();
        assert!(graph.add_seed(1, 1, 1).is_ok());
        assert!(graph.attach(1, 2, 1, Coordinate::new(1, 1)).is_ok());

        assert_eq!(render_edges(&graph), "(1,1) seed\n(1,2) -> (1,1)\n");
    }
}
