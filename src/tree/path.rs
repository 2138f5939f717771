//! Child path composition

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::error::WalkError;

/// Compose `parent/name`, rejecting results longer than `max_len` bytes.
///
/// Composition is textual so that headers echo the path the way the user
/// spelled it (`root/` yields `root//sub`).
pub fn compose_child(parent: &Path, name: &OsStr, max_len: usize) -> Result<PathBuf, WalkError> {
    let len = parent.as_os_str().len() + 1 + name.len();
    if len > max_len {
        return Err(WalkError::PathTooLong {
            parent: parent.to_path_buf(),
            len,
            max: max_len,
        });
    }

    let mut composed = OsString::with_capacity(len);
    composed.push(parent.as_os_str());
    composed.push("/");
    composed.push(name);
    Ok(PathBuf::from(composed))
}
