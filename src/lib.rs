//! # Paren
//!
//! A small S-expression language: integers, doubles, booleans, strings,
//! symbols, lists, first-class functions with lexical closures, special
//! forms, user-defined macros and an OS-thread primitive. The kernel can
//! be driven interactively (REPL), over source files, or embedded through
//! a three-function C ABI.
//!
//! ## Quick start
//!
//! ```rust
//! use paren::{Interp, Node};
//!
//! let interp = Interp::new();
//! let result = interp.eval_source("(def f (fn (x) (* x x))) (f 7)");
//! assert_eq!(*result.read(), Node::Int(49));
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! source text -> tokenizer -> reader -> compile pass (macro expansion)
//!             -> evaluator against the global environment -> value
//! ```
//!
//! The tokenizer and reader are total: malformed input degrades to
//! degenerate trees rather than errors, and the evaluator folds mis-typed
//! operations to nil. See the `runtime` module docs for the shared-cell
//! mutation model and the threading contract.

/// Version of the Paren interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod builtins;
pub mod compiler;
pub mod embed;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;

pub use compiler::{compile, compile_all, MacroTable};
pub use error::{Error, Result};
pub use lexer::{tokenize, Tokenizer};
pub use parser::{parse, Reader};
pub use runtime::{EnvRef, Environment, Interp, NativeFn, Node, NodeRef};
