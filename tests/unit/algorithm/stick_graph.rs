//! Tests for the stick graph: attachment, doubling with midpoint repair and tip weights

#[cfg(test)]
mod tests {
    use ridgegen::RidgeError;
    use ridgegen::algorithm::aggregation::{AggregationSettings, Aggregator};
    use ridgegen::algorithm::stick_graph::{NodeId, StickGraph};
    use ridgegen::spatial::coordinate::Coordinate;
    use ridgegen::spatial::grid::OccupancyGrid;
    use std::collections::HashSet;

    // Seed (1,1) <- (1,2) <- (2,2)
    fn chain() -> StickGraph {
        let mut graph = StickGraph::new();
        assert!(graph.add_seed(1, 1, 100).is_ok());
        assert!(graph.attach(1, 2, 50, Coordinate::new(1, 1)).is_ok());
        assert!(graph.attach(2, 2, 10, Coordinate::new(1, 2)).is_ok());
        graph
    }

    fn assert_unique_ids(graph: &StickGraph) {
        let ids: HashSet<NodeId> = graph.nodes().iter().map(|n| n.id()).collect();
        assert_eq!(ids.len(), graph.len(), "duplicate node ids");
    }

    // Tests attach links the new node to the node at the neighbour position
    // Verified by storing the new node's own id as parent
    #[test]
    fn test_attach_links_parent() {
        let graph = chain();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edge_count(), 2);

        let parent = graph.parent_of(NodeId::at(2, 2)).map(|n| n.position);
        assert_eq!(parent, Some(Coordinate::new(1, 2)));
        assert!(graph.parent_of(NodeId::at(1, 1)).is_none());
        assert!(graph.get(NodeId::at(1, 1)).is_some_and(|n| n.is_seed()));
    }

    // Tests attach to a missing neighbour fails and leaves the graph untouched
    // Verified by inserting before the neighbour lookup
    #[test]
    fn test_attach_missing_neighbor() {
        let mut graph = chain();
        let before = graph.nodes().to_vec();

        let result = graph.attach(3, 3, 1, Coordinate::new(3, 2));
        assert!(matches!(
            result,
            Err(RidgeError::MissingNeighbor {
                x: 3,
                y: 3,
                neighbor: [3, 2]
            })
        ));
        assert_eq!(graph.nodes(), before.as_slice());
        assert!(!graph.contains(Coordinate::new(3, 3)));
    }

    // Tests a second node at an occupied position is refused
    // Verified by skipping the id check on insert
    #[test]
    fn test_attach_duplicate_position() {
        let mut graph = chain();
        assert!(matches!(
            graph.attach(1, 2, 1, Coordinate::new(2, 2)),
            Err(RidgeError::DuplicateNode { x: 1, y: 2 })
        ));
        assert!(matches!(
            graph.add_seed(1, 1, 1),
            Err(RidgeError::DuplicateNode { .. })
        ));
        assert_eq!(graph.len(), 3);
    }

    // Tests doubling inserts one midpoint per edge and rewires through it
    // Verified by linking children straight to their doubled parents
    #[test]
    fn test_double_and_repair_chain() {
        let mut graph = chain();
        assert!(graph.double_and_repair(0.0).is_ok());

        assert_eq!(graph.len(), 5);
        assert_unique_ids(&graph);

        let positions: Vec<_> = graph.nodes().iter().map(|n| n.position).collect();
        assert_eq!(
            positions,
            vec![
                Coordinate::new(2, 2),
                Coordinate::new(2, 4),
                Coordinate::new(2, 3),
                Coordinate::new(4, 4),
                Coordinate::new(3, 4),
            ]
        );

        let parent_of = |x, y| graph.parent_of(NodeId::at(x, y)).map(|n| n.position);
        assert_eq!(parent_of(4, 4), Some(Coordinate::new(3, 4)));
        assert_eq!(parent_of(3, 4), Some(Coordinate::new(2, 4)));
        assert_eq!(parent_of(2, 4), Some(Coordinate::new(2, 3)));
        assert_eq!(parent_of(2, 3), Some(Coordinate::new(2, 2)));
        assert_eq!(parent_of(2, 2), None);
    }

    // Tests midpoints take the mean of both end weights
    // Verified by copying the child weight
    #[test]
    fn test_midpoint_weight_is_mean() {
        let mut graph = chain();
        assert!(graph.double_and_repair(0.0).is_ok());
        assert_eq!(graph.get(NodeId::at(2, 3)).map(|n| n.weight), Some(75));
        assert_eq!(graph.get(NodeId::at(3, 4)).map(|n| n.weight), Some(30));
        assert_eq!(graph.get(NodeId::at(4, 4)).map(|n| n.weight), Some(10));
    }

    // Tests a node that is parent to several children is emitted once
    // Verified by emitting the parent once per child
    #[test]
    fn test_shared_parent_is_not_duplicated() {
        let mut graph = StickGraph::new();
        assert!(graph.add_seed(2, 2, 1).is_ok());
        for (x, y) in [(2, 1), (1, 2), (3, 2), (2, 3)] {
            assert!(graph.attach(x, y, 1, Coordinate::new(2, 2)).is_ok());
        }

        assert!(graph.double_and_repair(1.5).is_ok());
        assert_eq!(graph.len(), 9);
        assert_unique_ids(&graph);
        let seeds = graph.nodes().iter().filter(|n| n.is_seed()).count();
        assert_eq!(seeds, 1);
    }

    // Tests every edge of an aggregated graph survives as child -> midpoint -> parent
    // Verified by omitting midpoint insertion
    #[test]
    fn test_double_and_repair_preserves_reachability() {
        let mut aggregator =
            Aggregator::seeded(OccupancyGrid::new(8), 7, AggregationSettings::default());
        assert!(aggregator.seed_at(4, 4, 1).is_ok());
        assert!(aggregator.populate(1.0, 1, 10_000).is_ok());

        let mut graph = aggregator.graph().clone();
        let edges = graph.edges();
        let nodes_before = graph.len();
        assert!(!edges.is_empty());

        assert!(graph.double_and_repair(0.0).is_ok());
        assert_eq!(graph.len(), nodes_before + edges.len());
        assert_unique_ids(&graph);

        for (child, parent) in edges {
            let child = child * 2;
            let parent = parent * 2;
            let midpoint = graph.parent_of(NodeId::of(child)).map(|n| n.position);
            assert_eq!(midpoint, Some(child.midpoint(parent)));
            let reached = midpoint
                .and_then(|m| graph.parent_of(NodeId::of(m)))
                .map(|n| n.position);
            assert_eq!(reached, Some(parent));
        }
    }

    // Tests branch tips get the maximum weight and inner nodes keep theirs
    // Verified by assigning to referenced nodes
    #[test]
    fn test_assign_terminal_weights() {
        let mut graph = StickGraph::new();
        assert!(graph.add_seed(2, 2, 5).is_ok());
        assert!(graph.attach(2, 1, 6, Coordinate::new(2, 2)).is_ok());
        assert!(graph.attach(3, 2, 7, Coordinate::new(2, 2)).is_ok());
        assert!(graph.attach(4, 2, 8, Coordinate::new(3, 2)).is_ok());

        assert_eq!(graph.terminal_count(), 2);
        graph.assign_terminal_weights();

        let weight = |x, y| graph.get(NodeId::at(x, y)).map(|n| n.weight);
        assert_eq!(weight(2, 2), Some(5));
        assert_eq!(weight(3, 2), Some(7));
        assert_eq!(weight(2, 1), Some(255));
        assert_eq!(weight(4, 2), Some(255));
    }

    // Tests edges are listed as child/parent positions
    // Verified by listing parent first
    #[test]
    fn test_edges_listing() {
        let graph = chain();
        assert_eq!(
            graph.edges(),
            vec![
                (Coordinate::new(1, 2), Coordinate::new(1, 1)),
                (Coordinate::new(2, 2), Coordinate::new(1, 2)),
            ]
        );
        assert_eq!(NodeId::at(-3, 9).position(), Coordinate::new(-3, 9));
    }
}
