//! Filesystem access used by the traversal engine
//!
//! The walker only needs two capabilities: metadata for a path and a lazy
//! listing of a directory. Both sit behind [`FileSystem`] so traversal can
//! run against [`UnixFs`] or an in-memory tree in tests.

use std::ffi::{OsStr, OsString};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use nix::dir::{Dir, OwningIter, Type};
use nix::fcntl::OFlag;
use nix::sys::stat::Mode;

const S_IFMT: u32 = 0o170_000;
const S_IFREG: u32 = 0o100_000;
const S_IFDIR: u32 = 0o040_000;
const S_IFLNK: u32 = 0o120_000;

/// The kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,

    /// A directory.
    Dir,

    /// A symbolic link.
    Symlink,

    /// Anything else (device files, pipes, sockets, etc.).
    Other,
}

impl EntryKind {
    /// Classify from the file type bits of a `st_mode` value.
    pub fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFREG => EntryKind::File,
            S_IFDIR => EntryKind::Dir,
            S_IFLNK => EntryKind::Symlink,
            _ => EntryKind::Other,
        }
    }
}

impl From<Type> for EntryKind {
    fn from(t: Type) -> Self {
        match t {
            Type::File => EntryKind::File,
            Type::Directory => EntryKind::Dir,
            Type::Symlink => EntryKind::Symlink,
            _ => EntryKind::Other,
        }
    }
}

/// Attributes of one file or directory, as returned by `lstat(2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub kind: EntryKind,
    pub mode: u32,
    pub nlink: u64,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    /// Number of 512-byte blocks allocated.
    pub blocks: u64,
    /// Modification time in seconds since the Unix epoch.
    pub mtime: i64,
}

impl From<&std::fs::Metadata> for Metadata {
    fn from(meta: &std::fs::Metadata) -> Self {
        Self {
            kind: EntryKind::from_mode(meta.mode()),
            mode: meta.mode(),
            nlink: meta.nlink(),
            uid: meta.uid(),
            gid: meta.gid(),
            size: meta.size(),
            blocks: meta.blocks(),
            mtime: meta.mtime(),
        }
    }
}

/// One name yielded while enumerating a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: OsString,
    /// Kind reported by the enumeration itself, if the filesystem provides one.
    pub kind: Option<EntryKind>,
}

impl DirEntry {
    pub fn new(name: impl Into<OsString>, kind: Option<EntryKind>) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Whether this is the `.` or `..` pseudo-entry.
    pub fn is_dot_or_dotdot(&self) -> bool {
        self.name == "." || self.name == ".."
    }
}

/// An open directory being enumerated.
///
/// Dropping a listing releases it; `close` additionally surfaces any error
/// the release reports.
pub trait Listing: Iterator<Item = io::Result<DirEntry>> {
    fn close(self) -> io::Result<()>;
}

/// Metadata lookup and directory enumeration.
pub trait FileSystem {
    type Listing: Listing;

    /// Metadata for `path`. Symbolic links are not followed.
    fn stat(&self, path: &Path) -> io::Result<Metadata>;

    /// Open `path` for lazy enumeration, including `.` and `..`.
    fn list_entries(&self, path: &Path) -> io::Result<Self::Listing>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    type Listing = T::Listing;

    fn stat(&self, path: &Path) -> io::Result<Metadata> {
        (**self).stat(path)
    }

    fn list_entries(&self, path: &Path) -> io::Result<Self::Listing> {
        (**self).list_entries(path)
    }
}

/// The host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixFs;

impl FileSystem for UnixFs {
    type Listing = UnixListing;

    fn stat(&self, path: &Path) -> io::Result<Metadata> {
        std::fs::symlink_metadata(path).map(|meta| Metadata::from(&meta))
    }

    fn list_entries(&self, path: &Path) -> io::Result<UnixListing> {
        let dir = Dir::open(
            path,
            OFlag::O_RDONLY | OFlag::O_DIRECTORY | OFlag::O_CLOEXEC,
            Mode::empty(),
        )?;
        Ok(UnixListing {
            iter: dir.into_iter(),
        })
    }
}

/// A directory stream opened by [`UnixFs`].
pub struct UnixListing {
    iter: OwningIter,
}

impl Iterator for UnixListing {
    type Item = io::Result<DirEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.iter.next()?;
        Some(
            entry
                .map(|e| DirEntry {
                    name: OsStr::from_bytes(e.file_name().to_bytes()).to_os_string(),
                    kind: e.file_type().map(EntryKind::from),
                })
                .map_err(io::Error::from),
        )
    }
}

impl Listing for UnixListing {
    // nix closes the stream on drop and does not report the result
    fn close(self) -> io::Result<()> {
        drop(self.iter);
        Ok(())
    }
}
