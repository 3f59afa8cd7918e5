//! Error types shared by the graph containers and the algorithm catalog.

use thiserror::Error;

/// The single error type of this crate.
///
/// Every failure is signalled synchronously at the call site; no operation
/// leaves partially applied state behind when it returns an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A vertex identifier or index was not present in the graph.
    #[error("no such vertex: {0}")]
    NoSuchVertex(String),

    /// An edge identifier or index was not present in the graph.
    #[error("no such edge: {0}")]
    NoSuchEdge(String),

    /// The algorithm accepts undirected graphs only.
    #[error("algorithm requires an undirected graph")]
    DirectedGraphRejected,

    /// The algorithm accepts directed graphs only.
    #[error("algorithm requires a directed graph")]
    UndirectedGraphRejected,

    /// The operation does not accept graphs with parallel edges.
    #[error("parallel edges between {u} and {v} are not supported here")]
    ParallelEdgesRejected { u: usize, v: usize },

    /// The graph was declared without self-loop support.
    #[error("self-loops are not allowed in this graph (vertex {0})")]
    SelfLoopForbidden(usize),

    /// The graph was declared without parallel-edge support.
    #[error("an edge between {u} and {v} already exists")]
    ParallelEdgeForbidden { u: usize, v: usize },

    /// A purported path's edges do not chain.
    #[error("edge {edge} does not touch vertex {vertex}")]
    MalformedPath { edge: usize, vertex: usize },

    /// A user-supplied identifier or weights key already exists.
    #[error("duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    /// An algorithm builder received an unrecognized configuration key.
    #[error("unknown option: {0}")]
    OptionUnknown(String),

    /// An internal assertion failed. This indicates a bug in the library.
    #[error("invariant violated: {0}")]
    InvariantViolated(&'static str),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, GraphError>;
