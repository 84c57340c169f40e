//! Node module - In-memory representation of an untyped YAML document.
//!
//! The tree keeps no schema; callers walk it by key and switch on the node
//! kind at every step.

mod node;

pub use node::*;
