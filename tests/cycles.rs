use ixgraph::algo::cycles::{
    chinese_postman, johnson_cycles, minimum_mean_cycle_dasdan_gupta, minimum_mean_cycle_howard,
    tarjan_cycles, CycleEnumAlgo, CycleEnumBuilder,
};
use ixgraph::{GraphHints, IndexGraph, Path};

fn full_triangle() -> IndexGraph {
    let mut g = IndexGraph::new_directed(GraphHints::default());
    g.add_vertices(3);
    for (u, v) in [(0, 1), (1, 2), (2, 0), (0, 2), (2, 1), (1, 0)] {
        g.add_edge(u, v).unwrap();
    }
    g
}

fn edge_sets<'a>(cycles: impl Iterator<Item = Path<'a>>) -> Vec<Vec<usize>> {
    let mut out: Vec<Vec<usize>> = cycles
        .map(|p| {
            assert!(p.is_cycle());
            let mut edges = p.edges().to_vec();
            edges.sort_unstable();
            edges
        })
        .collect();
    out.sort();
    out
}

#[test]
fn triangle_enumeration_is_complete_and_unique() {
    let g = full_triangle();
    let expected = vec![
        vec![0, 1, 2], // 0 -> 1 -> 2 -> 0
        vec![0, 5],
        vec![1, 4],
        vec![2, 3],
        vec![3, 4, 5], // 0 -> 2 -> 1 -> 0
    ];
    assert_eq!(edge_sets(tarjan_cycles(&g).unwrap()), expected);
    assert_eq!(edge_sets(johnson_cycles(&g).unwrap()), expected);
    // both directed triangles are present
    assert!(expected.contains(&vec![0, 1, 2]));
    assert!(expected.contains(&vec![3, 4, 5]));
}

#[test]
fn enumeration_is_lazy() {
    // a clique large enough that full enumeration would be painful
    let n = 12;
    let mut g = IndexGraph::new_directed(GraphHints::default());
    g.add_vertices(n);
    for u in 0..n {
        for v in 0..n {
            if u != v {
                g.add_edge(u, v).unwrap();
            }
        }
    }
    let mut iter = johnson_cycles(&g).unwrap();
    for _ in 0..10 {
        let cycle = iter.next().unwrap();
        assert!(cycle.is_cycle());
        assert_eq!(cycle.source(), 0);
    }
}

#[test]
fn builder_selects_the_implementation() {
    let g = full_triangle();
    let mut builder = CycleEnumBuilder::new();
    builder.set_option("impl", "tarjan").unwrap();
    assert_eq!(builder.compute(&g).unwrap().count(), 5);
    let johnson = CycleEnumBuilder::new().algorithm(CycleEnumAlgo::Johnson);
    assert_eq!(johnson.compute(&g).unwrap().count(), 5);
    assert!(builder.set_option("impl", "paton").is_err());
}

#[test]
fn minimum_mean_cycles_agree() {
    let mut g = IndexGraph::new_directed(GraphHints::default());
    g.add_vertices(4);
    let mut w = Vec::new();
    for (u, v, wt) in [
        (0, 1, 1.0),
        (1, 2, 2.0),
        (2, 0, 6.0),
        (2, 3, 1.0),
        (3, 2, 1.0),
    ] {
        g.add_edge(u, v).unwrap();
        w.push(wt);
    }
    for cycle in [
        minimum_mean_cycle_howard(&g, |e| w[e]).unwrap().unwrap(),
        minimum_mean_cycle_dasdan_gupta(&g, |e| w[e]).unwrap().unwrap(),
    ] {
        let mean = cycle.weight_with(|e| w[e]) / cycle.len() as f64;
        assert!((mean - 1.0).abs() < 1e-9);
    }
}

#[test]
fn postman_tour_on_a_figure_eight_is_eulerian() {
    let mut g = IndexGraph::new_undirected(GraphHints::default());
    g.add_vertices(5);
    let mut w = Vec::new();
    for (u, v, wt) in [(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0), (2, 3, 3.0), (3, 4, 1.0), (4, 2, 1.0)] {
        g.add_edge(u, v).unwrap();
        w.push(wt);
    }
    let tour = chinese_postman(&g, |e| w[e]).unwrap().unwrap();
    assert!(tour.is_cycle());
    assert_eq!(tour.len(), 6);
    assert!((tour.weight_with(|e| w[e]) - 8.0).abs() < 1e-9);
}
