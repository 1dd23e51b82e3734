//! Scoped, thread-local selection of the graph backend.
//!
//! Construction code is generic over [`GraphBackend`], so callers normally
//! pick a backend through the type parameter. [`AnyGraph`] covers callers that
//! want to switch engines for a block of calls without threading a type
//! through: `AnyGraph::default()` builds whichever backend is active on the
//! current thread.
//!
//! ```
//! use wmg_graph::{AnyGraph, BackendKind, use_petgraph_backend};
//!
//! {
//!     let _scope = use_petgraph_backend();
//!     assert_eq!(AnyGraph::default().kind(), BackendKind::Petgraph);
//! }
//! assert_eq!(AnyGraph::default().kind(), BackendKind::Adjacency);
//! ```

use core::fmt;
use core::marker::PhantomData;
use std::cell::Cell;
use std::str::FromStr;

use wmg_core::{NodeId, WmgError};

use crate::adjacency::AdjacencyGraph;
use crate::attrs::{EdgeAttrs, NodeAttrs};
use crate::backend::GraphBackend;
use crate::error::GraphError;
use crate::petgraph_backend::PetGraph;

/// The available graph engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendKind {
    #[default]
    Adjacency,
    Petgraph,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Adjacency => "adjacency",
            BackendKind::Petgraph => "petgraph",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = WmgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "adjacency" => Ok(BackendKind::Adjacency),
            "petgraph" => Ok(BackendKind::Petgraph),
            other => Err(WmgError::UnsupportedComponent {
                kind: "graph backend",
                name: other.to_string(),
            }),
        }
    }
}

thread_local! {
    static ACTIVE_BACKEND: Cell<BackendKind> = const { Cell::new(BackendKind::Adjacency) };
}

/// Backend that `AnyGraph::default()` currently builds on this thread.
pub fn active_backend() -> BackendKind {
    ACTIVE_BACKEND.with(Cell::get)
}

/// Guard returned by [`use_backend`]; restores the previous backend on drop.
///
/// The guard is tied to the thread that created it and cannot be sent.
#[must_use = "the backend is only active while the scope guard is alive"]
#[derive(Debug)]
pub struct BackendScope {
    previous: BackendKind,
    _not_send: PhantomData<*const ()>,
}

impl Drop for BackendScope {
    fn drop(&mut self) {
        ACTIVE_BACKEND.with(|active| active.set(self.previous));
    }
}

/// Activate `kind` on the current thread until the guard is dropped.
pub fn use_backend(kind: BackendKind) -> BackendScope {
    let previous = ACTIVE_BACKEND.with(|active| active.replace(kind));
    tracing::debug!(backend = %kind, previous = %previous, "graph backend activated");
    BackendScope {
        previous,
        _not_send: PhantomData,
    }
}

pub fn use_petgraph_backend() -> BackendScope {
    use_backend(BackendKind::Petgraph)
}

/// A graph whose engine is chosen at runtime.
#[derive(Debug, Clone)]
pub enum AnyGraph {
    Adjacency(AdjacencyGraph),
    Petgraph(PetGraph),
}

impl AnyGraph {
    pub fn new(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Adjacency => AnyGraph::Adjacency(AdjacencyGraph::default()),
            BackendKind::Petgraph => AnyGraph::Petgraph(PetGraph::default()),
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            AnyGraph::Adjacency(_) => BackendKind::Adjacency,
            AnyGraph::Petgraph(_) => BackendKind::Petgraph,
        }
    }
}

impl Default for AnyGraph {
    fn default() -> Self {
        AnyGraph::new(active_backend())
    }
}

impl GraphBackend for AnyGraph {
    fn add_node(&mut self, id: NodeId, attrs: NodeAttrs) {
        match self {
            AnyGraph::Adjacency(g) => g.add_node(id, attrs),
            AnyGraph::Petgraph(g) => g.add_node(id, attrs),
        }
    }

    fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        attrs: EdgeAttrs,
    ) -> Result<(), GraphError> {
        match self {
            AnyGraph::Adjacency(g) => g.add_edge(source, target, attrs),
            AnyGraph::Petgraph(g) => g.add_edge(source, target, attrs),
        }
    }

    fn node(&self, id: NodeId) -> Option<&NodeAttrs> {
        match self {
            AnyGraph::Adjacency(g) => g.node(id),
            AnyGraph::Petgraph(g) => g.node(id),
        }
    }

    fn edge(&self, source: NodeId, target: NodeId) -> Option<&EdgeAttrs> {
        match self {
            AnyGraph::Adjacency(g) => g.edge(source, target),
            AnyGraph::Petgraph(g) => g.edge(source, target),
        }
    }

    fn nodes(&self) -> impl Iterator<Item = (NodeId, &NodeAttrs)> + '_ {
        let iter: Box<dyn Iterator<Item = (NodeId, &NodeAttrs)> + '_> = match self {
            AnyGraph::Adjacency(g) => Box::new(g.nodes()),
            AnyGraph::Petgraph(g) => Box::new(g.nodes()),
        };
        iter
    }

    fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &EdgeAttrs)> + '_ {
        let iter: Box<dyn Iterator<Item = (NodeId, NodeId, &EdgeAttrs)> + '_> = match self {
            AnyGraph::Adjacency(g) => Box::new(g.edges()),
            AnyGraph::Petgraph(g) => Box::new(g.edges()),
        };
        iter
    }

    fn node_count(&self) -> usize {
        match self {
            AnyGraph::Adjacency(g) => g.node_count(),
            AnyGraph::Petgraph(g) => g.node_count(),
        }
    }

    fn empty_like(&self) -> Self {
        AnyGraph::new(self.kind())
    }

    fn edge_count(&self) -> usize {
        match self {
            AnyGraph::Adjacency(g) => g.edge_count(),
            AnyGraph::Petgraph(g) => g.edge_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_nest_and_restore() {
        assert_eq!(active_backend(), BackendKind::Adjacency);
        {
            let _outer = use_petgraph_backend();
            assert_eq!(active_backend(), BackendKind::Petgraph);
            {
                let _inner = use_backend(BackendKind::Adjacency);
                assert_eq!(active_backend(), BackendKind::Adjacency);
            }
            assert_eq!(active_backend(), BackendKind::Petgraph);
        }
        assert_eq!(active_backend(), BackendKind::Adjacency);
    }

    #[test]
    fn scope_is_thread_local() {
        let _scope = use_petgraph_backend();
        let other = std::thread::spawn(active_backend).join().unwrap();
        assert_eq!(other, BackendKind::Adjacency);
        assert_eq!(active_backend(), BackendKind::Petgraph);
    }

    #[test]
    fn parse_backend_names() {
        assert_eq!("petgraph".parse::<BackendKind>().unwrap(), BackendKind::Petgraph);
        assert_eq!(
            BackendKind::Adjacency.to_string().parse::<BackendKind>().unwrap(),
            BackendKind::Adjacency
        );
        assert!("graph-tool".parse::<BackendKind>().is_err());
    }
}
