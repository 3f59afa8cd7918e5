use ixgraph::algo::connectivity::{connected_components, strongly_connected_components};
use ixgraph::{GraphHints, IndexGraph, LabelledGraph, LabelledPartition, VertexPartition};

#[test]
fn scc_partition_feeds_the_quotient_graph() {
    let mut g = IndexGraph::new_directed(GraphHints::default());
    g.add_vertices(6);
    for (u, v) in [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 3)] {
        g.add_edge(u, v).unwrap();
    }
    let partition = strongly_connected_components(&g).unwrap();
    assert_eq!(partition.number_of_blocks(), 2);
    let condensation = partition.blocks_graph(false, false);
    assert_eq!(condensation.vertex_count(), 2);
    assert_eq!(condensation.edge_count(), 1);
    let from = partition.vertex_block(2);
    let to = partition.vertex_block(3);
    assert!(condensation.contains_edge(from, to));
    assert_eq!(partition.cross_edges(from, to), &[3]);
    assert!(partition.cross_edges(to, from).is_empty());
}

#[test]
fn component_blocks_collect_their_edges() {
    let mut g = IndexGraph::new_undirected(GraphHints::default());
    g.add_vertices(5);
    g.add_edge(0, 1).unwrap();
    g.add_edge(1, 2).unwrap();
    g.add_edge(3, 4).unwrap();
    let p = connected_components(&g).unwrap();
    assert_eq!(p.number_of_blocks(), 2);
    let first = p.vertex_block(0);
    assert_eq!(p.block_vertices(first), &[0, 1, 2]);
    assert_eq!(p.block_edges(first), &[0, 1]);
}

#[test]
fn labelled_partition_view() {
    let mut g: LabelledGraph<&str, u8> = LabelledGraph::new_undirected(GraphHints::default());
    g.add_vertices(["a", "b", "c", "d"]).unwrap();
    g.add_edge(&"a", &"b", 0).unwrap();
    g.add_edge(&"c", &"d", 1).unwrap();
    let partition = connected_components(g.index_graph()).unwrap();
    let view = LabelledPartition::new(&g, partition);
    assert_eq!(view.number_of_blocks(), 2);
    let block = view.vertex_block(&"c").unwrap();
    assert_eq!(view.block_vertices(block), vec![&"c", &"d"]);
    assert_eq!(view.block_edges(block), vec![&1]);
}

#[test]
fn manual_partition_storage_strategies() {
    // many blocks relative to edges forces the hashed strategy
    let mut g = IndexGraph::new_undirected(GraphHints::default());
    g.add_vertices(10);
    g.add_edge(0, 9).unwrap();
    let sparse = VertexPartition::new(&g, (0..10).collect()).unwrap();
    assert_eq!(sparse.cross_edges(0, 9), &[0]);
    assert_eq!(sparse.cross_edges(9, 0), &[0]);
    assert!(sparse.cross_edges(1, 2).is_empty());

    // few blocks and many edges keeps the dense table
    let mut h = IndexGraph::new_undirected(GraphHints {
        allow_parallel_edges: true,
        ..GraphHints::default()
    });
    h.add_vertices(4);
    for _ in 0..8 {
        h.add_edge(0, 2).unwrap();
        h.add_edge(1, 3).unwrap();
    }
    let dense = VertexPartition::new(&h, vec![0, 0, 1, 1]).unwrap();
    assert_eq!(dense.cross_edges(0, 1).len(), 16);
    assert!(dense.block_edges(0).is_empty());
}
