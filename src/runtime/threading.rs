//! Thread primitives.
//!
//! The language exposes exactly two operations: the `thread` special form
//! spawns an OS thread that evaluates its body against the spawner's
//! environment, and `join` waits for the handle. There is no cancellation
//! and no cross-thread error propagation; a handle joins at most once and
//! later joins are no-ops.
//!
//! The global environment, symbol table and macro table are reachable from
//! every spawned thread. The kernel takes no locks beyond the per-cell ones,
//! so programs must confine mutation of shared bindings to initialization
//! or accept the race.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

use crate::runtime::environment::EnvRef;
use crate::runtime::value::{Node, NodeRef};
use crate::runtime::Interp;

/// Counter for unique thread ids
static THREAD_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Handle to a spawned thread.
///
/// The join handle sits behind a mutex so the first `join` can take it;
/// clones of the value share the slot.
#[derive(Debug, Clone)]
pub struct ThreadHandle {
    id: u64,
    handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ThreadHandle {
    /// Unique id of this thread
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Spawns a thread evaluating `body` forms in order against `env`.
///
/// The environment handle is shared, not snapshotted: bindings the thread
/// writes through shared cells are visible to the spawner.
pub fn spawn_thread(interp: &Interp, body: Vec<NodeRef>, env: &EnvRef) -> Node {
    let id = THREAD_COUNTER.fetch_add(1, Ordering::SeqCst);
    let interp = interp.clone();
    let env = env.clone();
    let handle = thread::spawn(move || {
        for form in &body {
            interp.eval(form, &env);
        }
    });
    Node::Thread(ThreadHandle {
        id,
        handle: Arc::new(Mutex::new(Some(handle))),
    })
}

/// Waits for the thread behind `value` to finish. Returns nil.
///
/// Joining a non-thread or an already-joined handle does nothing.
pub fn join_thread(value: &NodeRef) -> NodeRef {
    let taken = match &*value.read() {
        Node::Thread(t) => t.handle.lock().take(),
        _ => None,
    };
    if let Some(handle) = taken {
        let _ = handle.join();
    }
    Node::nil()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished_thread() -> NodeRef {
        let handle = thread::spawn(|| {});
        Node::Thread(ThreadHandle {
            id: THREAD_COUNTER.fetch_add(1, Ordering::SeqCst),
            handle: Arc::new(Mutex::new(Some(handle))),
        })
        .cell()
    }

    #[test]
    fn test_join_returns_nil() {
        let t = finished_thread();
        assert_eq!(*join_thread(&t).read(), Node::Nil);
    }

    #[test]
    fn test_join_is_single_shot() {
        let t = finished_thread();
        join_thread(&t);
        // second join finds the handle already taken
        assert_eq!(*join_thread(&t).read(), Node::Nil);
    }

    #[test]
    fn test_join_on_non_thread_is_noop() {
        let v = Node::Int(3).cell();
        assert_eq!(*join_thread(&v).read(), Node::Nil);
    }
}
