//! Owner and group name lookup

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;

use nix::unistd::{Gid, Group, Uid, User};

use crate::error::ReportError;

/// Resolves numeric owner and group ids to names.
///
/// A missing mapping is an error, never a silent fallback to the number.
pub trait IdentityResolver {
    fn user_name(&self, uid: u32) -> Result<String, ReportError>;
    fn group_name(&self, gid: u32) -> Result<String, ReportError>;
}

/// Looks ids up in the system passwd and group databases.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemIdentity;

impl IdentityResolver for SystemIdentity {
    fn user_name(&self, uid: u32) -> Result<String, ReportError> {
        match User::from_uid(Uid::from_raw(uid)) {
            Ok(Some(user)) => Ok(user.name),
            Ok(None) => Err(ReportError::UnknownUser { uid }),
            Err(errno) => Err(ReportError::Lookup {
                source: io::Error::from(errno),
            }),
        }
    }

    fn group_name(&self, gid: u32) -> Result<String, ReportError> {
        match Group::from_gid(Gid::from_raw(gid)) {
            Ok(Some(group)) => Ok(group.name),
            Ok(None) => Err(ReportError::UnknownGroup { gid }),
            Err(errno) => Err(ReportError::Lookup {
                source: io::Error::from(errno),
            }),
        }
    }
}

/// Memoizes successful lookups of an inner resolver. Failures are retried.
pub struct CachedIdentity<R> {
    inner: R,
    users: RefCell<HashMap<u32, String>>,
    groups: RefCell<HashMap<u32, String>>,
}

impl<R: IdentityResolver> CachedIdentity<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            users: RefCell::new(HashMap::new()),
            groups: RefCell::new(HashMap::new()),
        }
    }
}

impl<R: IdentityResolver> IdentityResolver for CachedIdentity<R> {
    fn user_name(&self, uid: u32) -> Result<String, ReportError> {
        if let Some(name) = self.users.borrow().get(&uid) {
            return Ok(name.clone());
        }
        let name = self.inner.user_name(uid)?;
        self.users.borrow_mut().insert(uid, name.clone());
        Ok(name)
    }

    fn group_name(&self, gid: u32) -> Result<String, ReportError> {
        if let Some(name) = self.groups.borrow().get(&gid) {
            return Ok(name.clone());
        }
        let name = self.inner.group_name(gid)?;
        self.groups.borrow_mut().insert(gid, name.clone());
        Ok(name)
    }
}
