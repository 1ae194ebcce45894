#![warn(missing_docs)]
#![forbid(unsafe_code)]
// Allow needless `return` because that makes it sometimes more obvious that
// an expression is the result of the function
#![allow(clippy::needless_return)]
// Allow `assert_eq!(true, ...)` because in some cases it is used to check a bool
// value and not a 'flag' / 'state', and `assert_eq!` makes that more explicit
#![allow(clippy::bool_assert_comparison)]
// Enable 'unused' warnings for doc tests (are disabled by default)
#![doc(test(no_crate_inject))]
#![doc(test(attr(warn(unused))))]
// Fail on warnings in doc tests
#![doc(test(attr(deny(warnings))))]

//! Pathwise is a path-aware streaming JSON reader which lazily deserializes the items of JSON arrays.
//!
//! Its main purpose is extracting data from large JSON documents in a memory efficient way: the reader
//! skips forward until it reaches a location described by a [path matcher](path::PathMatcher), and then
//! deserializes the items of the JSON array found there one at a time. Neither the complete document nor
//! the complete array is ever held in memory.
//!
//! Lexing of the JSON data is performed by [Struson](https://docs.rs/struson); deserialization of the
//! items uses [Serde](https://docs.rs/serde).
//!
//! # Terminology
//!
//! This crate uses the same terminology as the JSON specification:
//!
//! - *object*: `{ ... }`
//!   - *member*: Entry in an object. For example the JSON object `{"a": 1}` has the member
//!     `"a": 1` where `"a"` is the member *name* and `1` is the member *value*.
//! - *array*: `[ ... ]`
//!   - *item*: Value in an array
//!
//! A *path* describes the location of a value in a JSON document, for example `$.a.items[2]` is the
//! array item at index 2 of the value of member `items`, which itself is the value of member `a`.
//!
//! # Usage example
//!
//! ```
//! # use pathwise::reader::*;
//! # use pathwise::path::*;
//! # use serde::Deserialize;
//! // In this example JSON data comes from a string;
//! // normally it would come from a file or a network connection
//! let json = r#"{"meta": {"count": 2}, "data": {"rows": [{"id": 1}, {"id": 2}]}}"#;
//! let mut reader = PathAwareArrayReader::new(json.as_bytes());
//!
//! #[derive(Deserialize, PartialEq, Debug)]
//! struct Row {
//!     id: u64,
//! }
//!
//! let pattern: PathPattern = "data.rows".parse()?;
//! let mut rows = reader.read_values_as::<Row, _>(&pattern)?;
//! // Items are deserialized lazily, one at a time
//! while rows.has_next()? {
//!     let row = rows.next().ok_or("missing row")??;
//!     println!("row: {row:?}");
//! }
//!
//! assert_eq!("$.data.rows", format_path(reader.current_path()));
//! reader.close();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The loop above calls [`has_next`](reader::ArrayValues::has_next) once more after the last row has
//! been read. This final check is required, see
//! [`PathAwareArrayReader`](reader::PathAwareArrayReader#consuming-the-items) for details.
//! Consuming the items as [`Iterator`] until it returns `None` has the same effect.

pub mod path;
pub mod reader;
pub mod serde;
