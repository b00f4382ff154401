use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::runtime::value::{Node, NodeRef};

/// Shared handle to an environment frame
pub type EnvRef = Arc<RwLock<Environment>>;

/// One frame of the lexical scope chain.
///
/// Frames map interned symbol codes to value cells and link outward to the
/// enclosing frame. Closures captured in the same parent share that parent,
/// so the chain is a DAG held together by the `Arc` handles.
#[derive(Debug, Default)]
pub struct Environment {
    /// Bindings of this frame
    vars: HashMap<usize, NodeRef>,
    /// Enclosing frame, absent for the global environment
    outer: Option<EnvRef>,
}

impl Environment {
    /// Creates a root frame with no enclosing scope
    pub fn new() -> Self {
        Environment::default()
    }

    /// Creates a frame enclosed by `outer`
    pub fn with_outer(outer: EnvRef) -> Self {
        Environment {
            vars: HashMap::new(),
            outer: Some(outer),
        }
    }

    /// Wraps this frame in a shared handle
    pub fn into_ref(self) -> EnvRef {
        Arc::new(RwLock::new(self))
    }

    /// Finds the cell bound to `code`, walking outward through the chain
    pub fn lookup(&self, code: usize) -> Option<NodeRef> {
        if let Some(cell) = self.vars.get(&code) {
            return Some(cell.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.read().lookup(code))
    }

    /// Like `lookup`, but a miss yields a fresh nil cell
    pub fn get(&self, code: usize) -> NodeRef {
        self.lookup(code).unwrap_or_else(Node::nil)
    }

    /// Binds `code` in this frame, creating or overwriting
    pub fn define(&mut self, code: usize, value: NodeRef) -> NodeRef {
        self.vars.insert(code, value.clone());
        value
    }

    /// The codes bound in this frame alone (not the chain)
    pub fn codes(&self) -> Vec<usize> {
        self.vars.keys().copied().collect()
    }
}
