//! Switch-based argument parsing and help rendering.
//!
//! Arguments are described up front in a [`Registry`], each one bound to a
//! unique key, one or more switches and a [`Shape`]. Parsing walks the raw
//! tokens left to right and collects every problem it finds instead of
//! stopping at the first one:
//!
//! ```
//! use mailbox_argparse::{Arg, Registry, Shape};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = Registry::new();
//! registry.describe(
//!     Arg::new("PORT", Shape::Integer)
//!         .switches(["--port"])
//!         .label("Server port")
//!         .help("Server port")
//!         .default_value("993"),
//! )?;
//!
//! let parsed = registry.parse(["--port", "143"])?;
//! assert!(parsed.errors.is_empty());
//! assert_eq!(parsed.values.integer("PORT"), Some(143));
//! # Ok(()) }
//! ```
//!
//! An [`Shape::ArgsFile`] argument names a JSON file whose members are spliced
//! back into the pending tokens, so anything written after the switch on the
//! command line overrides what the file provides.

mod error;
mod fs;
mod help;
mod parse;
mod registry;
mod shape;
mod values;

pub use error::{ArgsFileError, DescribeError, ValidationError, ValidationErrorKind};
pub use fs::{FileSystem, OsFileSystem};
pub use help::wrap;
pub use parse::Parsed;
pub use registry::{Arg, Descriptor, Registry};
pub use shape::Shape;
pub use values::{Value, Values};
