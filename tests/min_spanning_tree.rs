use ixgraph::algo::mst::{
    boruvka, fredman_tarjan, karger_klein_tarjan, kruskal, prim, yao, MstAlgo, MstBuilder,
    MstResult,
};
use ixgraph::unionfind::UnionFind;
use ixgraph::{GraphError, GraphHints, IndexGraph, LabelledGraph};

use proptest::prelude::*;

fn four_cycle() -> (IndexGraph, Vec<f64>) {
    let mut g = IndexGraph::new_undirected(GraphHints::default());
    g.add_vertices(4);
    let mut w = Vec::new();
    for (u, v, wt) in [(0, 1, 1.0), (1, 2, 2.0), (2, 3, 3.0), (3, 0, 4.0)] {
        g.add_edge(u, v).unwrap();
        w.push(wt);
    }
    (g, w)
}

#[test]
fn four_cycle_drops_the_heaviest_edge() {
    let (g, w) = four_cycle();
    for algo in [
        MstAlgo::Kruskal,
        MstAlgo::Prim,
        MstAlgo::Boruvka,
        MstAlgo::Yao,
        MstAlgo::FredmanTarjan,
        MstAlgo::KargerKleinTarjan,
    ] {
        let mst = MstBuilder::new()
            .algorithm(algo)
            .seed(7)
            .compute(&g, |e| w[e])
            .unwrap();
        assert_eq!(mst.edges(), &[0, 1, 2], "{algo:?}");
        assert_eq!(mst.total_weight(|e| w[e]), 6.0, "{algo:?}");
    }
}

#[test]
fn builder_options_are_validated() {
    let mut builder = MstBuilder::new();
    builder.set_option("impl", "yao").unwrap();
    builder.set_option("seed", "99").unwrap();
    builder.set_option("parallel-sort", "true").unwrap();
    assert!(matches!(
        builder.set_option("impl", "reverse-delete"),
        Err(GraphError::OptionUnknown(_))
    ));
    assert!(matches!(
        builder.set_option("heap", "pairing"),
        Err(GraphError::OptionUnknown(_))
    ));
}

#[test]
fn labelled_facade_returns_edge_identifiers() {
    let mut g: LabelledGraph<&str, &str> = LabelledGraph::new_undirected(GraphHints::default());
    g.add_vertices(["hub", "east", "west"]).unwrap();
    g.add_edge(&"hub", &"east", "he").unwrap();
    g.add_edge(&"hub", &"west", "hw").unwrap();
    g.add_edge(&"east", &"west", "ew").unwrap();
    let weight = |id: &&str| match *id {
        "he" => 1.0,
        "hw" => 2.0,
        _ => 5.0,
    };
    let mut forest = MstBuilder::new().compute_labelled(&g, weight).unwrap();
    forest.sort_unstable();
    assert_eq!(forest, vec!["he", "hw"]);
}

fn spanning_forest_is_valid(g: &IndexGraph, forest: &MstResult) {
    // no cycles, and exactly one tree edge short of each component's size
    let mut uf = UnionFind::new(g.vertex_count());
    for &e in forest.edges() {
        let (s, t) = g.edge_endpoints(e);
        assert!(uf.union(s, t), "forest contains a cycle");
    }
    let mut components = UnionFind::new(g.vertex_count());
    let mut component_count = g.vertex_count();
    for e in g.edges() {
        let (s, t) = g.edge_endpoints(e);
        if components.union(s, t) {
            component_count -= 1;
        }
    }
    assert_eq!(forest.len(), g.vertex_count() - component_count);
    // the forest connects whatever the graph connects
    for e in g.edges() {
        let (s, t) = g.edge_endpoints(e);
        assert!(uf.equiv(s, t));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // every implementation produces a forest of the same total weight as
    // Kruskal on the same input
    #[test]
    fn all_algorithms_agree(
        raw_edges in proptest::collection::vec((0..16usize, 0..16usize, 0..64u32), 0..80),
        seed in any::<u64>(),
    ) {
        let mut g = IndexGraph::new_undirected(GraphHints {
            allow_parallel_edges: true,
            ..GraphHints::default()
        });
        g.add_vertices(16);
        let mut w = Vec::new();
        for &(u, v, wt) in &raw_edges {
            if u != v {
                g.add_edge(u, v).unwrap();
                w.push(f64::from(wt));
            }
        }
        let reference = kruskal(&g, |e| w[e]).unwrap();
        spanning_forest_is_valid(&g, &reference);
        let total = reference.total_weight(|e| w[e]);

        for (name, result) in [
            ("prim", prim(&g, |e| w[e]).unwrap()),
            ("boruvka", boruvka(&g, |e| w[e]).unwrap()),
            ("yao", yao(&g, |e| w[e]).unwrap()),
            ("fredman-tarjan", fredman_tarjan(&g, |e| w[e]).unwrap()),
            ("kkt", karger_klein_tarjan(&g, |e| w[e], Some(seed)).unwrap()),
        ] {
            spanning_forest_is_valid(&g, &result);
            prop_assert_eq!(result.len(), reference.len(), "{}", name);
            prop_assert_eq!(result.total_weight(|e| w[e]), total, "{}", name);
        }
    }
}
