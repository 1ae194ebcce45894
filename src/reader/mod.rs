//! Module for path-aware reading of JSON data
//!
//! [`PathAwareArrayReader`] is the main entry point: it skips forward in a JSON document until a
//! [path matcher](crate::path::PathMatcher) matches, and then lazily deserializes the items of the
//! JSON array found there, one at a time.
//!
//! Internally the reader is built from the following layers:
//! - [`TokenSource`]: produces the [`Event`]s of a JSON document; [`JsonReaderTokens`] produces them
//!   from a [Struson](https://docs.rs/struson) `JsonReader`
//! - [`PathTrackingCursor`]: consumes events one at a time and keeps track of the logical
//!   [path](crate::path::PathSegment) of the current value
//! - [`TokenDeserializer`](crate::serde::TokenDeserializer): deserializes values from the events
//!   consumed through the cursor

use struson::reader::ReaderSettings;
use thiserror::Error;

mod array;
pub use array::*;
mod cursor;
pub use cursor::*;
mod source;
pub use source::*;

/// Kind of a token of a JSON document
///
/// The payload of member names and values is part of the corresponding [`Event`].
#[derive(PartialEq, Eq, Clone, Copy, strum::Display, Debug)]
pub enum Token {
    /// Start of a JSON object: `{`
    StartObject,
    /// End of a JSON object: `}`
    EndObject,
    /// Start of a JSON array: `[`
    StartArray,
    /// End of a JSON array: `]`
    EndArray,
    /// Name of a JSON object member
    FieldName,
    /// JSON string, number, boolean or `null` value
    Value,
    /// End of the token stream; no further tokens follow
    EndOfStream,
}

impl Token {
    /// Whether this token is the first token of a JSON value
    pub fn is_value_start(self) -> bool {
        matches!(self, Token::StartObject | Token::StartArray | Token::Value)
    }

    /// Gets the token which closes the structure started by this token, if any
    ///
    /// For example for [`Token::StartArray`] this returns [`Token::EndArray`].
    pub fn closing(self) -> Option<Token> {
        match self {
            Token::StartObject => Some(Token::EndObject),
            Token::StartArray => Some(Token::EndArray),
            _ => None,
        }
    }
}

/// Value of a JSON string, number, boolean or `null`
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum ScalarValue {
    /// JSON string value, without the enclosing quotes and with escape sequences resolved
    String(String),
    /// JSON number value, in its original string representation
    Number(String),
    /// JSON boolean value
    Bool(bool),
    /// JSON `null`
    Null,
}

/// A token of a JSON document together with its payload
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Event {
    /// See [`Token::StartObject`]
    StartObject,
    /// See [`Token::EndObject`]
    EndObject,
    /// See [`Token::StartArray`]
    StartArray,
    /// See [`Token::EndArray`]
    EndArray,
    /// See [`Token::FieldName`]
    FieldName(String),
    /// See [`Token::Value`]
    Value(ScalarValue),
    /// See [`Token::EndOfStream`]
    EndOfStream,
}

impl Event {
    /// Gets the kind of this event
    pub fn token(&self) -> Token {
        match self {
            Event::StartObject => Token::StartObject,
            Event::EndObject => Token::EndObject,
            Event::StartArray => Token::StartArray,
            Event::EndArray => Token::EndArray,
            Event::FieldName(_) => Token::FieldName,
            Event::Value(_) => Token::Value,
            Event::EndOfStream => Token::EndOfStream,
        }
    }
}

/// Error which occurred because the token stream is malformed
///
/// Processing must be aborted when this error occurs; the token stream cannot be read any further.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum MalformedStreamError {
    /// The underlying Struson `JsonReader` encountered an error, for example a JSON syntax error
    #[error("JSON reader error: {0}")]
    JsonReader(#[from] struson::reader::ReaderError),
    /// Tried to advance after the end of the stream had already been reached
    #[error("cannot advance past the end of the stream")]
    PastEndOfStream,
    /// The stream ended while a JSON array or object was still open
    #[error("stream ended unexpectedly at {path}")]
    UnexpectedEnd {
        /// Path at which the stream ended, in the format of [`format_path`](crate::path::format_path)
        path: String,
    },
    /// A token appeared where the JSON structure does not permit it,
    /// for example a member name inside a JSON array
    #[error("token {token} is not valid at {path}")]
    InvalidStructure {
        /// The misplaced token
        token: Token,
        /// Path at which the token appeared
        path: String,
    },
    /// A JSON array has more items than can be represented by
    /// [`PathSegment::Index`](crate::path::PathSegment::Index)
    #[error("too many array items at {path}")]
    IndexOverflow {
        /// Path of the last representable item
        path: String,
    },
    /// A closing token does not match the pending close which was registered for it
    ///
    /// See [`PathTrackingCursor::register_pending_close`].
    #[error("closing token {actual} does not match pending close {expected}")]
    UnbalancedClose {
        /// The closing token which was registered as pending close
        expected: Token,
        /// The closing token which was actually read
        actual: Token,
    },
}

/// Error which occurred while reading from a [`PathTrackingCursor`] or [`PathAwareArrayReader`]
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ReadError {
    /// The current token is not the token required at this point
    ///
    /// This indicates that the caller's expectation of the document structure is violated, for
    /// example when a path matcher matches a value which is not a JSON array.
    #[error("expected token {expected} but got {} at {path}", describe_token(.actual))]
    UnexpectedToken {
        /// The required token
        expected: Token,
        /// The current token; `None` if no token has been read yet
        actual: Option<Token>,
        /// Path of the current token, in the format of [`format_path`](crate::path::format_path)
        path: String,
    },
    /// The token stream is malformed
    #[error("malformed stream: {0}")]
    MalformedStream(#[from] MalformedStreamError),
}

fn describe_token(token: &Option<Token>) -> String {
    match token {
        Some(token) => token.to_string(),
        None => "<start of stream>".to_owned(),
    }
}

/// Default maximum nesting depth of values deserialized by a [`PathAwareArrayReader`]
pub const DEFAULT_MAX_NESTING_DEPTH: u32 = 128;

/// Settings to customize the behavior of a [`PathAwareArrayReader`]
///
/// To avoid repeating the default values for unchanged settings `..Default::default()` can be used:
/// ```
/// # use pathwise::reader::PathReaderSettings;
/// PathReaderSettings {
///     max_nesting_depth: 16,
///     // For all other settings use the default
///     ..Default::default()
/// }
/// # ;
/// ```
#[derive(Clone, Debug)]
pub struct PathReaderSettings {
    /// Maximum nesting depth of JSON arrays and objects within a single deserialized value
    ///
    /// See [`TokenDeserializer::new_with_custom_nesting_limit`](crate::serde::TokenDeserializer::new_with_custom_nesting_limit).
    pub max_nesting_depth: u32,
    /// Settings for the underlying Struson `JsonStreamReader`
    ///
    /// If [`allow_multiple_top_level`](ReaderSettings::allow_multiple_top_level) is enabled,
    /// all top-level values are read one after another, for example for JSON Lines data.
    pub json_reader_settings: ReaderSettings,
}

impl Default for PathReaderSettings {
    /// Creates the default settings
    ///
    /// - max nesting depth: [`DEFAULT_MAX_NESTING_DEPTH`]
    /// - JSON reader settings: Struson's [`ReaderSettings::default`]
    fn default() -> Self {
        PathReaderSettings {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            json_reader_settings: ReaderSettings::default(),
        }
    }
}
