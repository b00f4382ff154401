//! Runtime: values, environments, the evaluator and thread primitives.

pub mod environment;
pub mod interp;
pub mod symbols;
pub mod threading;
pub mod value;

pub use environment::{EnvRef, Environment};
pub use interp::Interp;
pub use threading::{join_thread, spawn_thread, ThreadHandle};
pub use value::{NativeFn, Node, NodeRef};
