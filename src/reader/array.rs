use std::{fmt::Debug, io::Read, iter::FusedIterator, marker::PhantomData};

use log::debug;
use serde::de::DeserializeOwned;
use struson::reader::JsonStreamReader;

use super::{
    JsonReaderTokens, PathReaderSettings, PathTrackingCursor, ReadError, Token, TokenSource,
    DEFAULT_MAX_NESTING_DEPTH,
};
use crate::{
    path::{format_path, PathMatcher, PathSegment},
    serde::{DeserializerError, TokenDeserializer},
};

/// Reader which skips to JSON arrays at matching paths and lazily deserializes their items
///
/// The reader moves forward through the JSON document only; every call to
/// [`read_values_as`](Self::read_values_as) continues where the previous call stopped. This
/// allows extracting the items of multiple JSON arrays from a large document, without
/// ever holding the complete document or a complete array in memory.
///
/// # Examples
/// ```
/// # use pathwise::reader::*;
/// # use pathwise::path::*;
/// # use serde::Deserialize;
/// let json = r#"{"a": {"items": [{"x": 1}, {"x": 2}]}, "b": [true]}"#;
/// let mut reader = PathAwareArrayReader::new(json.as_bytes());
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Item {
///     x: u32,
/// }
///
/// let items = reader
///     .read_values_as::<Item, _>(&path_pattern!["a", "items"])?
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(vec![Item { x: 1 }, Item { x: 2 }], items);
///
/// let flags: Vec<bool> = reader
///     .read_values_as(&path_pattern!["b"])?
///     .collect::<Result<_, _>>()?;
/// assert_eq!(vec![true], flags);
///
/// reader.close();
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Consuming the items
/// [`ArrayValues`] must be consumed until it reports that no further item exists, that is until
/// [`ArrayValues::has_next`] returns `false` or [`Iterator::next`] returns `None`. This final
/// check consumes the end of the JSON array. If iteration stops earlier, the reader is
/// physically still positioned inside the JSON array while its path already describes the
/// location after the array. The remaining items are then skipped by the next call to
/// `read_values_as` and cannot be matched by it.
///
/// Only one `ArrayValues` can be in use at a time; this is enforced by it mutably borrowing
/// the reader.
#[derive(Debug)]
pub struct PathAwareArrayReader<S: TokenSource> {
    cursor: PathTrackingCursor<S>,
    max_nesting_depth: u32,
}

impl<R: Read> PathAwareArrayReader<JsonReaderTokens<JsonStreamReader<R>>> {
    /// Creates a reader for the JSON data provided by `reader`, using the default settings
    ///
    /// The reader is not buffered internally by this method, but the underlying Struson
    /// `JsonStreamReader` performs buffering.
    pub fn new(reader: R) -> Self {
        Self::new_custom(reader, PathReaderSettings::default())
    }

    /// Creates a reader for the JSON data provided by `reader`, using custom settings
    pub fn new_custom(reader: R, settings: PathReaderSettings) -> Self {
        let multiple_top_level = settings.json_reader_settings.allow_multiple_top_level;
        let json_reader = JsonStreamReader::new_custom(reader, settings.json_reader_settings);
        let tokens = if multiple_top_level {
            JsonReaderTokens::new_multiple_top_level(json_reader)
        } else {
            JsonReaderTokens::new(json_reader)
        };
        Self::from_source_with_nesting_limit(tokens, settings.max_nesting_depth)
    }
}

impl<S: TokenSource> PathAwareArrayReader<S> {
    /// Creates a reader for the tokens of `source`
    ///
    /// Items are deserialized with a maximum nesting depth of [`DEFAULT_MAX_NESTING_DEPTH`].
    pub fn from_source(source: S) -> Self {
        Self::from_source_with_nesting_limit(source, DEFAULT_MAX_NESTING_DEPTH)
    }

    /// Creates a reader for the tokens of `source`, deserializing items with a custom maximum
    /// nesting depth
    ///
    /// See [`TokenDeserializer::new_with_custom_nesting_limit`].
    pub fn from_source_with_nesting_limit(source: S, max_nesting_depth: u32) -> Self {
        PathAwareArrayReader {
            cursor: PathTrackingCursor::new(source),
            max_nesting_depth,
        }
    }

    /// Skips to the next JSON array matched by `matcher` and returns its items
    ///
    /// Skipping starts at the current position; locations which have already been passed cannot
    /// be matched anymore. The matcher has to match the location of a JSON array. If the document
    /// contains no further location matched by `matcher`, the end of the document is reached and
    /// empty `ArrayValues` are returned; this is not considered an error.
    ///
    /// The items are deserialized lazily as `T` while iterating over the returned `ArrayValues`.
    /// Directly after this method returns, the [path](Self::current_path) of this reader already
    /// describes the location of the JSON array as if all its items had been consumed. See
    /// [consuming the items](Self#consuming-the-items) for how the returned `ArrayValues` have to
    /// be used.
    ///
    /// # Errors
    /// Returns [`ReadError::UnexpectedToken`] if the value at the matched location is not a JSON
    /// array. Returns [`ReadError::MalformedStream`] if the JSON data is malformed.
    pub fn read_values_as<T: DeserializeOwned, M: PathMatcher + ?Sized>(
        &mut self,
        matcher: &M,
    ) -> Result<ArrayValues<'_, S, T>, ReadError> {
        if !self.cursor.skip_until_match_or_end(matcher)? {
            debug!("no matching path found, returning no values");
            return Ok(ArrayValues::new(self, ArrayState::Finished));
        }
        self.cursor.expect_token(Token::StartArray)?;

        let first_token = self.cursor.advance()?;
        if first_token == Token::EndArray {
            debug!("array at {} is empty", format_path(self.cursor.current_path()));
            return Ok(ArrayValues::new(self, ArrayState::Finished));
        }

        // The items are consumed by `ArrayValues` later; let the path leave the array right away
        if let Some(closing_token) = first_token.closing() {
            self.cursor.register_pending_close(closing_token);
        }
        self.cursor.register_pending_close(Token::EndArray);
        Ok(ArrayValues::new(self, ArrayState::ItemReady))
    }

    /// Skips to the next value matched by `matcher` and deserializes it
    ///
    /// Unlike [`read_values_as`](Self::read_values_as) the matched value can be of any type and
    /// is deserialized as a whole. Returns `None` if the document contains no further location
    /// matched by `matcher`.
    ///
    /// # Examples
    /// ```
    /// # use pathwise::reader::*;
    /// # use pathwise::path::*;
    /// let json = r#"{"header": {"version": 3}, "rows": []}"#;
    /// let mut reader = PathAwareArrayReader::new(json.as_bytes());
    ///
    /// let version: Option<u32> = reader.read_value_as(&path_pattern!["header", "version"])?;
    /// assert_eq!(Some(3), version);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read_value_as<T: DeserializeOwned, M: PathMatcher + ?Sized>(
        &mut self,
        matcher: &M,
    ) -> Result<Option<T>, DeserializerError> {
        if !self.cursor.skip_until_match_or_end(matcher)? {
            debug!("no matching path found, returning no value");
            return Ok(None);
        }
        let mut deserializer = TokenDeserializer::new_with_custom_nesting_limit(
            &mut self.cursor,
            self.max_nesting_depth,
        );
        Ok(Some(T::deserialize(&mut deserializer)?))
    }

    /// Whether the end of the document has not been reached yet
    ///
    /// This does not consume any data; calling it repeatedly always gives the same result.
    pub fn has_next(&self) -> bool {
        self.cursor.has_more()
    }

    /// Gets the logical path of the reader
    ///
    /// See [`PathTrackingCursor::current_path`].
    pub fn current_path(&self) -> &[PathSegment] {
        self.cursor.current_path()
    }

    /// Gets the logical nesting depth of the reader
    ///
    /// See [`PathTrackingCursor::depth`].
    pub fn path_depth(&self) -> usize {
        self.cursor.depth()
    }

    /// Gets the number of pending closes of the underlying cursor
    ///
    /// This is 0 once all `ArrayValues` returned so far have been completely consumed.
    pub fn pending_closes(&self) -> usize {
        self.cursor.pending_closes()
    }

    /// Gets the underlying cursor
    pub fn cursor(&self) -> &PathTrackingCursor<S> {
        &self.cursor
    }

    /// Gets the underlying cursor mutably
    ///
    /// Advancing the cursor directly while items of a JSON array have not been consumed
    /// yet interferes with the pending closes registered for that array.
    pub fn cursor_mut(&mut self) -> &mut PathTrackingCursor<S> {
        &mut self.cursor
    }

    /// Closes this reader, releasing the underlying token source
    ///
    /// Dropping the reader has the same effect.
    pub fn close(self) {
        self.cursor.close();
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum ArrayState {
    /// The current token is the first token of an item which has not been deserialized yet
    ItemReady,
    /// The current token is the last token of the previously deserialized item
    AfterItem,
    /// The end of the array has been consumed, or there are no items at all
    Finished,
}

/// Lazily deserialized items of a JSON array, returned by [`PathAwareArrayReader::read_values_as`]
///
/// Every call to [`Iterator::next`] deserializes one item. Once the end of the JSON array has
/// been reached `None` is returned. If an error occurs, it is returned as item and afterwards
/// `None` is returned.
///
/// See [consuming the items](PathAwareArrayReader#consuming-the-items) for how the
/// items have to be consumed.
pub struct ArrayValues<'a, S: TokenSource, T> {
    cursor: &'a mut PathTrackingCursor<S>,
    max_nesting_depth: u32,
    state: ArrayState,
    _item: PhantomData<fn() -> T>,
}

impl<'a, S: TokenSource, T> ArrayValues<'a, S, T> {
    fn new(reader: &'a mut PathAwareArrayReader<S>, state: ArrayState) -> Self {
        ArrayValues {
            cursor: &mut reader.cursor,
            max_nesting_depth: reader.max_nesting_depth,
            state,
            _item: PhantomData,
        }
    }

    /// Checks whether there is a next item
    ///
    /// After the last item has been consumed, this consumes the end of the JSON array.
    /// Calling this method repeatedly without consuming an item in between always gives the
    /// same result.
    pub fn has_next(&mut self) -> Result<bool, ReadError> {
        if self.state == ArrayState::AfterItem {
            match self.cursor.advance() {
                Ok(Token::EndArray) => self.state = ArrayState::Finished,
                Ok(_) => self.state = ArrayState::ItemReady,
                Err(e) => {
                    self.state = ArrayState::Finished;
                    return Err(e);
                }
            }
        }
        Ok(self.state == ArrayState::ItemReady)
    }
}

impl<S: TokenSource, T: DeserializeOwned> Iterator for ArrayValues<'_, S, T> {
    type Item = Result<T, DeserializerError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.has_next() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => return Some(Err(e.into())),
        }

        let mut deserializer =
            TokenDeserializer::new_with_custom_nesting_limit(self.cursor, self.max_nesting_depth);
        match T::deserialize(&mut deserializer) {
            Ok(value) => {
                self.state = ArrayState::AfterItem;
                Some(Ok(value))
            }
            Err(e) => {
                self.state = ArrayState::Finished;
                Some(Err(e))
            }
        }
    }
}

impl<S: TokenSource, T: DeserializeOwned> FusedIterator for ArrayValues<'_, S, T> {}

impl<S: TokenSource + Debug, T> Debug for ArrayValues<'_, S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayValues")
            .field("cursor", &self.cursor)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
