//! # Genwatch Core
//!
//! Data model, page parsers, and command catalog for standby generator
//! controllers that publish their state through an embedded web server.
//!
//! This crate provides:
//! - `Snapshot`: an immutable mapping of field name to decoded value
//! - Numeric-line parser for the `/index_data.html` status feed
//! - Bit-flag decoder for the `lcd_status` register
//! - Pattern extraction over the load and exercise settings pages
//! - The `wr_logical.cgi` command catalog and selector option tables
//!
//! Nothing in here performs I/O; every parser is a pure function of its input.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod commands;
pub mod flags;
pub mod settings;
pub mod snapshot;
pub mod status;

pub use commands::{Action, Command, Setting};
pub use flags::LcdFlag;
pub use snapshot::{FieldValue, Snapshot};
pub use status::{parse_status, state_label, ParseError};
