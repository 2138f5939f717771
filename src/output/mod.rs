//! Report formatting
//!
//! - `report`: the per-entry metadata line
//! - `headers`: directory headers and notices that frame those lines

mod headers;
mod report;

pub use headers::{write_dir_header, write_notice, write_subdir_header};
pub use report::{MONTHS, Reporter, Stamp, format_fields};
