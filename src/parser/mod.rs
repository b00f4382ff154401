//! Reader for Paren token streams.

mod reader;

pub use reader::{parse, Reader};
