//! Directory headers and in-place notices

use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use termcolor::{Color, ColorSpec, WriteColor};

/// `<path>:` line introducing a directory's entries.
pub fn write_dir_header<W: WriteColor + ?Sized>(out: &mut W, path: &Path) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
    out.write_all(path.as_os_str().as_bytes())?;
    out.write_all(b":")?;
    out.reset()?;
    writeln!(out)
}

/// Blank separator followed by the header of a subdirectory.
pub fn write_subdir_header<W: WriteColor + ?Sized>(out: &mut W, path: &Path) -> io::Result<()> {
    writeln!(out)?;
    write_dir_header(out, path)
}

/// Message shown in place of a directory's entries when it cannot be listed.
pub fn write_notice<W: WriteColor + ?Sized>(out: &mut W, message: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
    write!(out, "{}", message)?;
    out.reset()?;
    writeln!(out)
}
