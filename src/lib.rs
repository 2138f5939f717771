//! lsr - print stat-style metadata for every entry of a directory tree, like `ls -lRa`

pub mod error;
pub mod fs;
pub mod identity;
pub mod output;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{ReportError, WalkError};
pub use fs::{DirEntry, EntryKind, FileSystem, Listing, Metadata, UnixFs};
pub use identity::{CachedIdentity, IdentityResolver, SystemIdentity};
pub use output::Reporter;
pub use tree::{RootKind, TreeWalker, WalkerConfig};
