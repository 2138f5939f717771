//! Metadata reporter: one `ls -l` style line per entry

use std::ffi::OsStr;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::error::ReportError;
use crate::fs::Metadata;
use crate::identity::IdentityResolver;

/// Month abbreviations by zero-based month index.
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Modification time broken into the calendar fields a report line shows (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub month: &'static str,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl Stamp {
    pub fn from_secs(secs: i64) -> Result<Self, ReportError> {
        let dt: DateTime<Utc> =
            DateTime::from_timestamp(secs, 0).ok_or(ReportError::InvalidTimestamp { secs })?;
        Ok(Self {
            month: MONTHS[dt.month0() as usize],
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
        })
    }
}

/// Formats and writes report lines, resolving owner and group names.
pub struct Reporter<R> {
    identity: R,
}

impl<R: IdentityResolver> Reporter<R> {
    pub fn new(identity: R) -> Self {
        Self { identity }
    }

    /// Write the line for `name`. Nothing is written if any field fails to resolve.
    pub fn report<W: Write + ?Sized>(
        &self,
        out: &mut W,
        meta: &Metadata,
        name: &OsStr,
    ) -> Result<(), ReportError> {
        let line = self.render(meta, name)?;
        out.write_all(&line).map_err(ReportError::Output)
    }

    /// Build the complete line, newline included.
    pub fn render(&self, meta: &Metadata, name: &OsStr) -> Result<Vec<u8>, ReportError> {
        let group = self.identity.group_name(meta.gid)?;
        let user = self.identity.user_name(meta.uid)?;
        let stamp = Stamp::from_secs(meta.mtime)?;

        let mut line = format_fields(meta, &user, &group, &stamp).into_bytes();
        line.push(b' ');
        line.extend_from_slice(name.as_bytes());
        line.push(b'\n');
        Ok(line)
    }
}

/// Everything on a report line except the entry name.
pub fn format_fields(meta: &Metadata, user: &str, group: &str, stamp: &Stamp) -> String {
    format!(
        "{:>6o} {:>2} UID={}/{} GID={}/{} {:>6} bytes {:>3} {} {:>2} {:02}:{:02}",
        meta.mode,
        meta.nlink,
        meta.uid,
        user,
        meta.gid,
        group,
        meta.size,
        meta.blocks,
        stamp.month,
        stamp.day,
        stamp.hour,
        stamp.minute,
    )
}
