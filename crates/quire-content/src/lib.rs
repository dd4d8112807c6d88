//! Content file parsing for quire.
//!
//! A content file is a YAML preamble delimited by `---` lines followed by a
//! markdown body. This crate splits the two, deserializes the preamble and
//! renders the body to HTML.

pub mod page;
pub mod preamble;

pub use page::{parse_page, Page, TocEntry};
pub use preamble::{Preamble, PreambleError};
