//! TreeWalker - stats and lists a directory tree level by level

use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use termcolor::WriteColor;
use tracing::{debug, trace, warn};

use crate::error::WalkError;
use crate::fs::{DirEntry, EntryKind, FileSystem, Listing, Metadata};
use crate::identity::IdentityResolver;
use crate::output::{Reporter, write_dir_header, write_notice, write_subdir_header};

use super::config::WalkerConfig;
use super::path::compose_child;

/// What the root path turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    /// Reported as a single line.
    File,
    /// Listed recursively.
    Dir,
    /// Announced and not followed.
    Symlink,
    /// Device, pipe or socket; nothing is printed.
    Other,
}

/// Why a directory's entries were not listed. The walk continues past these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skipped {
    PermissionDenied(PathBuf),
    TooManyOpenFiles,
    OutOfMemory,
}

impl Skipped {
    /// Classify a failure to open `path`. `None` means the failure is fatal.
    pub fn classify(path: &Path, err: &io::Error) -> Option<Self> {
        let code = err.raw_os_error()?;
        if code == Errno::EACCES as i32 {
            Some(Skipped::PermissionDenied(path.to_path_buf()))
        } else if code == Errno::ENFILE as i32 || code == Errno::EMFILE as i32 {
            Some(Skipped::TooManyOpenFiles)
        } else if code == Errno::ENOMEM as i32 {
            Some(Skipped::OutOfMemory)
        } else {
            None
        }
    }
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skipped::PermissionDenied(path) => write!(f, "Permission to {} denied", path.display()),
            Skipped::TooManyOpenFiles => f.write_str("Too many files open currently"),
            Skipped::OutOfMemory => f.write_str("Not enough memory"),
        }
    }
}

/// Recursive `ls -lRa` style walker over a [`FileSystem`].
pub struct TreeWalker<F, R> {
    fs: F,
    reporter: Reporter<R>,
    config: WalkerConfig,
}

impl<F: FileSystem, R: IdentityResolver> TreeWalker<F, R> {
    pub fn new(fs: F, identity: R) -> Self {
        Self {
            fs,
            reporter: Reporter::new(identity),
            config: WalkerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: WalkerConfig) -> Self {
        self.config = config;
        self
    }

    /// Classify `root` and report on it: one line for a file, a notice for a
    /// symbolic link, a header plus full traversal for a directory.
    pub fn list<W: WriteColor + ?Sized>(
        &self,
        root: &Path,
        out: &mut W,
    ) -> Result<RootKind, WalkError> {
        let meta = self.fs.stat(root).map_err(|source| WalkError::Stat {
            path: root.to_path_buf(),
            source,
        })?;

        match meta.kind {
            EntryKind::File => {
                self.report(out, &meta, root.as_os_str(), root)?;
                Ok(RootKind::File)
            }
            EntryKind::Symlink => {
                out.write_all(root.as_os_str().as_bytes())?;
                writeln!(out, " is a symbolic file")?;
                Ok(RootKind::Symlink)
            }
            EntryKind::Dir => {
                write_dir_header(out, root)?;
                self.traverse(root, out)?;
                out.flush()?;
                Ok(RootKind::Dir)
            }
            EntryKind::Other => {
                debug!(
                    path = %root.display(),
                    mode = %format!("{:o}", meta.mode),
                    "Root is not a file, directory or symlink."
                );
                Ok(RootKind::Other)
            }
        }
    }

    /// List the directory at `path`, then each of its subdirectories in
    /// enumeration order, each preceded by a blank line and its header.
    pub fn traverse<W: WriteColor + ?Sized>(
        &self,
        path: &Path,
        out: &mut W,
    ) -> Result<(), WalkError> {
        let Some(pending) = self.list_level(path, out)? else {
            return Ok(());
        };

        for subdir in &pending {
            write_subdir_header(out, subdir)?;
            self.traverse(subdir, out)?;
        }
        Ok(())
    }

    /// Print one line per entry of `path` and return its subdirectories.
    /// `None` means the directory could not be opened and was skipped.
    fn list_level<W: WriteColor + ?Sized>(
        &self,
        path: &Path,
        out: &mut W,
    ) -> Result<Option<Vec<PathBuf>>, WalkError> {
        let mut listing = match self.fs.list_entries(path) {
            Ok(listing) => listing,
            Err(err) => return self.open_failed(path, err, out).map(|()| None),
        };
        debug!(path = %path.display(), "Listing directory.");

        let mut pending = Vec::new();
        for entry in listing.by_ref() {
            let entry = entry.map_err(|source| WalkError::ReadDir {
                path: path.to_path_buf(),
                source,
            })?;
            if let Some(subdir) = self.visit(path, &entry, out)? {
                pending.push(subdir);
            }
        }

        if let Err(err) = listing.close() {
            warn!(path = %path.display(), error = %err, "Failed to close directory.");
        }
        trace!(path = %path.display(), subdirs = pending.len(), "Finished directory level.");
        Ok(Some(pending))
    }

    /// Stat and report one entry. Returns its path if it should be expanded later.
    fn visit<W: WriteColor + ?Sized>(
        &self,
        parent: &Path,
        entry: &DirEntry,
        out: &mut W,
    ) -> Result<Option<PathBuf>, WalkError> {
        let dot = entry.is_dot_or_dotdot();
        if dot && !self.config.show_dot_entries {
            return Ok(None);
        }

        let child = compose_child(parent, &entry.name, self.config.max_path_len)?;
        let meta = self.fs.stat(&child).map_err(|source| WalkError::Stat {
            path: child.clone(),
            source,
        })?;
        self.report(out, &meta, &entry.name, &child)?;

        // Filesystems that do not fill in d_type fall back to the lstat result
        let kind = entry.kind.unwrap_or(meta.kind);
        if kind == EntryKind::Dir && !dot {
            Ok(Some(child))
        } else {
            Ok(None)
        }
    }

    fn report<W: WriteColor + ?Sized>(
        &self,
        out: &mut W,
        meta: &Metadata,
        name: &OsStr,
        path: &Path,
    ) -> Result<(), WalkError> {
        self.reporter
            .report(out, meta, name)
            .map_err(|source| WalkError::Report {
                path: path.to_path_buf(),
                source,
            })
    }

    fn open_failed<W: WriteColor + ?Sized>(
        &self,
        path: &Path,
        err: io::Error,
        out: &mut W,
    ) -> Result<(), WalkError> {
        if let Some(skipped) = Skipped::classify(path, &err) {
            debug!(path = %path.display(), error = %err, "Skipping directory.");
            write_notice(out, &skipped.to_string())?;
            return Ok(());
        }
        if err.kind() == io::ErrorKind::NotFound {
            return Err(WalkError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(WalkError::ReadDir {
            path: path.to_path_buf(),
            source: err,
        })
    }
}
