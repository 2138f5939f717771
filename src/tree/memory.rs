//! In-memory filesystem and identity table for walker tests

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use nix::errno::Errno;

use crate::error::ReportError;
use crate::fs::{DirEntry, EntryKind, FileSystem, Listing, Metadata};
use crate::identity::IdentityResolver;

const MTIME: i64 = 1_700_000_000;

struct Node {
    meta: Metadata,
    children: Vec<PathBuf>,
}

/// A tree of named nodes whose directories enumerate children in insertion order.
pub struct MemoryFs {
    nodes: HashMap<PathBuf, Node>,
    open_errors: HashMap<PathBuf, Errno>,
    stat_errors: HashSet<PathBuf>,
    close_errors: HashSet<PathBuf>,
    typed_entries: bool,
    open_now: Rc<Cell<usize>>,
    max_open: Cell<usize>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            open_errors: HashMap::new(),
            stat_errors: HashSet::new(),
            close_errors: HashSet::new(),
            typed_entries: true,
            open_now: Rc::new(Cell::new(0)),
            max_open: Cell::new(0),
        }
    }

    pub fn dir(self, path: &str) -> Self {
        self.insert(path, EntryKind::Dir, 0o040_755, 2, 4096)
    }

    pub fn file(self, path: &str, size: u64) -> Self {
        self.insert(path, EntryKind::File, 0o100_644, 1, size)
    }

    pub fn symlink(self, path: &str) -> Self {
        self.insert(path, EntryKind::Symlink, 0o120_777, 1, 4)
    }

    pub fn other(self, path: &str) -> Self {
        self.insert(path, EntryKind::Other, 0o010_644, 1, 0)
    }

    pub fn fail_open(mut self, path: &str, errno: Errno) -> Self {
        self.open_errors.insert(PathBuf::from(path), errno);
        self
    }

    pub fn fail_stat(mut self, path: &str) -> Self {
        self.stat_errors.insert(PathBuf::from(path));
        self
    }

    pub fn fail_close(mut self, path: &str) -> Self {
        self.close_errors.insert(PathBuf::from(path));
        self
    }

    pub fn owned_by(mut self, path: &str, uid: u32, gid: u32) -> Self {
        if let Some(node) = self.nodes.get_mut(Path::new(path)) {
            node.meta.uid = uid;
            node.meta.gid = gid;
        }
        self
    }

    /// Enumerate without entry types, like filesystems that leave d_type unset.
    pub fn without_entry_types(mut self) -> Self {
        self.typed_entries = false;
        self
    }

    pub fn open_now(&self) -> usize {
        self.open_now.get()
    }

    pub fn max_open(&self) -> usize {
        self.max_open.get()
    }

    fn insert(mut self, path: &str, kind: EntryKind, mode: u32, nlink: u64, size: u64) -> Self {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent().and_then(|p| self.nodes.get_mut(p)) {
            parent.children.push(path.clone());
        }
        let meta = Metadata {
            kind,
            mode,
            nlink,
            uid: 1000,
            gid: 100,
            size,
            blocks: size.div_ceil(512),
            mtime: MTIME,
        };
        self.nodes.insert(
            path,
            Node {
                meta,
                children: Vec::new(),
            },
        );
        self
    }

    fn entry_kind(&self, kind: EntryKind) -> Option<EntryKind> {
        self.typed_entries.then_some(kind)
    }
}

/// Resolve trailing `.` and `..` components textually.
fn resolve(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if let Some(parent) = text.strip_suffix("/.") {
        return resolve(Path::new(parent));
    }
    if let Some(parent) = text.strip_suffix("/..") {
        let dir = resolve(Path::new(parent));
        return match dir.parent() {
            Some(up) if !up.as_os_str().is_empty() => up.to_path_buf(),
            _ => dir,
        };
    }
    path.to_path_buf()
}

fn errno(e: Errno) -> io::Error {
    io::Error::from_raw_os_error(e as i32)
}

impl FileSystem for MemoryFs {
    type Listing = MemoryListing;

    fn stat(&self, path: &Path) -> io::Result<Metadata> {
        if self.stat_errors.contains(path) {
            return Err(errno(Errno::EIO));
        }
        self.nodes
            .get(&resolve(path))
            .map(|node| node.meta.clone())
            .ok_or_else(|| errno(Errno::ENOENT))
    }

    fn list_entries(&self, path: &Path) -> io::Result<MemoryListing> {
        if let Some(e) = self.open_errors.get(path) {
            return Err(errno(*e));
        }
        let node = self
            .nodes
            .get(&resolve(path))
            .ok_or_else(|| errno(Errno::ENOENT))?;
        if node.meta.kind != EntryKind::Dir {
            return Err(errno(Errno::ENOTDIR));
        }

        let mut entries = vec![
            DirEntry::new(".", self.entry_kind(EntryKind::Dir)),
            DirEntry::new("..", self.entry_kind(EntryKind::Dir)),
        ];
        for child in &node.children {
            let kind = self.nodes[child].meta.kind;
            let name = child.file_name().unwrap_or_default();
            entries.push(DirEntry::new(name, self.entry_kind(kind)));
        }

        self.open_now.set(self.open_now.get() + 1);
        self.max_open
            .set(self.max_open.get().max(self.open_now.get()));

        Ok(MemoryListing {
            entries: entries.into_iter(),
            fail_close: self.close_errors.contains(path),
            open_now: Rc::clone(&self.open_now),
        })
    }
}

pub struct MemoryListing {
    entries: std::vec::IntoIter<DirEntry>,
    fail_close: bool,
    open_now: Rc<Cell<usize>>,
}

impl Iterator for MemoryListing {
    type Item = io::Result<DirEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(Ok)
    }
}

impl Listing for MemoryListing {
    fn close(self) -> io::Result<()> {
        if self.fail_close {
            Err(errno(Errno::EIO))
        } else {
            Ok(())
        }
    }
}

impl Drop for MemoryListing {
    fn drop(&mut self) {
        self.open_now.set(self.open_now.get() - 1);
    }
}

/// uid 1000 is `alice`, gid 100 is `users`; nothing else resolves.
pub struct StaticIdentity;

impl IdentityResolver for StaticIdentity {
    fn user_name(&self, uid: u32) -> Result<String, ReportError> {
        match uid {
            1000 => Ok("alice".to_string()),
            _ => Err(ReportError::UnknownUser { uid }),
        }
    }

    fn group_name(&self, gid: u32) -> Result<String, ReportError> {
        match gid {
            100 => Ok("users".to_string()),
            _ => Err(ReportError::UnknownGroup { gid }),
        }
    }
}

#[test]
fn test_resolve_dot_components() {
    assert_eq!(resolve(Path::new("r/a/.")), PathBuf::from("r/a"));
    assert_eq!(resolve(Path::new("r/a/..")), PathBuf::from("r"));
    assert_eq!(resolve(Path::new("r/..")), PathBuf::from("r"));
    assert_eq!(resolve(Path::new("r")), PathBuf::from("r"));
}
