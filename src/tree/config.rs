//! Configuration types for the tree walker

/// Longest composed path the walker will build, in bytes (`PATH_MAX`).
pub const DEFAULT_MAX_PATH_LEN: usize = 4096;

/// Configuration for tree walking behavior.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Paths longer than this are rejected with `WalkError::PathTooLong`
    pub max_path_len: usize,
    /// Report the `.` and `..` pseudo-entries of every directory
    pub show_dot_entries: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            max_path_len: DEFAULT_MAX_PATH_LEN,
            show_dot_entries: true,
        }
    }
}
