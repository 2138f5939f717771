//! Recursive directory listing
//!
//! `TreeWalker` prints every entry of a directory before descending into any
//! of its subdirectories, then expands those subdirectories in the order they
//! were enumerated. Each level owns its pending list and its directory handle.

mod config;
mod path;
mod walker;

#[cfg(test)]
mod memory;

pub use config::{DEFAULT_MAX_PATH_LEN, WalkerConfig};
pub use path::compose_child;
pub use walker::{RootKind, Skipped, TreeWalker};
