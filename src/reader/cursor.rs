use std::collections::VecDeque;

use log::{debug, trace};

use super::{Event, MalformedStreamError, ReadError, Token, TokenSource};
use crate::path::{format_path, PathMatcher, PathSegment};

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum ContainerKind {
    Array,
    Object,
}

/// Logical nesting level, one per JSON array or object entered
#[derive(Debug)]
struct Frame {
    kind: ContainerKind,
    /// Whether a segment for this container was added to the path; this is the case once
    /// the first member name (object) or the first item (array) has been read
    has_segment: bool,
}

/// Cursor over a [`TokenSource`] which keeps track of the logical path of the current token
///
/// The cursor consumes tokens one at a time with [`advance`](Self::advance) and updates its
/// path for every token: entering a JSON array or object adds a nesting level, a member name or
/// array item sets the last path segment, and the end of a JSON array or object removes the
/// nesting level again. The path always describes the location of the value whose token is
/// current, for example for `{"a": [true]}` the path of `true` is `$.a[0]` and the path of the
/// array start is `$.a`.
///
/// # Pending closes
/// When the items of a JSON array are handed to a lazy consumer, the logical path has to leave
/// the array right away even though the consumer has not read the items yet. For this
/// [`register_pending_close`](Self::register_pending_close) immediately removes the innermost
/// nesting level from the path and records that the corresponding closing token is still
/// outstanding in the token stream. As long as pending closes are outstanding, consumed tokens
/// do not change the path; they only track how deeply the stream is nested inside the deferred
/// structure. Once the stream reaches a closing token on the level of the deferred structure, the
/// oldest pending close is resolved. Afterwards tokens update the path normally again.
///
/// While pending closes are outstanding the path therefore already describes the location the
/// cursor will be at once the deferred structures have been fully consumed.
///
/// # Examples
/// ```
/// # use pathwise::reader::*;
/// # use pathwise::path::*;
/// let mut cursor = PathTrackingCursor::new(JsonReaderTokens::new(
///     struson::reader::JsonStreamReader::new(r#"{"a": {"items": [1, 2]}}"#.as_bytes()),
/// ));
///
/// let found = cursor.skip_until_match_or_end(&path_pattern!["a", "items"])?;
/// assert!(found);
/// assert_eq!(Some(Token::StartArray), cursor.current_token());
/// assert_eq!("$.a.items", format_path(cursor.current_path()));
///
/// cursor.advance()?;
/// assert_eq!("$.a.items[0]", format_path(cursor.current_path()));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct PathTrackingCursor<S: TokenSource> {
    source: S,
    /// `None` if no token has been consumed yet
    current: Option<Event>,
    frames: Vec<Frame>,
    path: Vec<PathSegment>,
    /// Closing tokens which are still outstanding in the stream, in the order in which
    /// they will be encountered
    pending_closes: VecDeque<Token>,
    /// Nesting depth of the stream within the innermost deferred structure
    deferred_depth: u32,
}

impl<S: TokenSource> PathTrackingCursor<S> {
    /// Creates a cursor which has not consumed any token of `source` yet
    pub fn new(source: S) -> Self {
        PathTrackingCursor {
            source,
            current: None,
            frames: Vec::new(),
            path: Vec::new(),
            pending_closes: VecDeque::new(),
            deferred_depth: 0,
        }
    }

    /// Gets the current token without advancing
    ///
    /// Returns `None` if no token has been consumed yet.
    pub fn current_token(&self) -> Option<Token> {
        self.current.as_ref().map(Event::token)
    }

    /// Gets the current event, including its payload, without advancing
    ///
    /// Returns `None` if no token has been consumed yet.
    pub fn current_event(&self) -> Option<&Event> {
        self.current.as_ref()
    }

    /// Gets the logical path of the current token
    pub fn current_path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Gets the logical nesting depth, that is the number of JSON arrays and objects
    /// the cursor is logically inside of
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Gets the number of pending closes which have not been resolved yet
    pub fn pending_closes(&self) -> usize {
        self.pending_closes.len()
    }

    /// Whether the cursor has not reached the end of the stream yet
    ///
    /// This does not consume any tokens; calling it repeatedly always gives the same result.
    pub fn has_more(&self) -> bool {
        self.current_token() != Some(Token::EndOfStream)
    }

    /// Checks whether the current logical path is matched by `matcher`, without advancing
    pub fn matches<M: PathMatcher + ?Sized>(&self, matcher: &M) -> bool {
        matcher.matches(&self.path)
    }

    /// Gets a human-readable description of the position in the underlying data, if the
    /// token source provides it
    pub fn position(&self) -> Option<String> {
        self.source.position()
    }

    /// Consumes exactly one token and returns it
    ///
    /// The path is updated for the token, or if pending closes are outstanding the
    /// token is matched against them, see the [type documentation](Self).
    ///
    /// # Errors
    /// Returns [`ReadError::MalformedStream`] if the token source reports an error, if the
    /// tokens do not form a valid JSON structure, or if this method is called after
    /// [`Token::EndOfStream`] has already been reached.
    pub fn advance(&mut self) -> Result<Token, ReadError> {
        if !self.has_more() {
            return Err(MalformedStreamError::PastEndOfStream.into());
        }

        let event = self.source.next_event()?;
        if self.pending_closes.is_empty() {
            self.update_path(&event)?;
        } else {
            self.update_deferred(event.token())?;
        }

        let token = event.token();
        self.current = Some(event);
        Ok(token)
    }

    /// Verifies that the current token is `expected`
    ///
    /// # Errors
    /// Returns [`ReadError::UnexpectedToken`] if the current token is a different one.
    pub fn expect_token(&self, expected: Token) -> Result<(), ReadError> {
        if self.current_token() == Some(expected) {
            Ok(())
        } else {
            Err(self.unexpected_token(expected))
        }
    }

    /// Creates a [`ReadError::UnexpectedToken`] for the current token
    pub(crate) fn unexpected_token(&self, expected: Token) -> ReadError {
        let path = format_path(&self.path);
        debug!(
            "expected {expected} but got {:?} at {path} ({})",
            self.current_token(),
            self.position().as_deref().unwrap_or("unknown position")
        );
        ReadError::UnexpectedToken {
            expected,
            actual: self.current_token(),
            path,
        }
    }

    /// Advances until the path is matched by `matcher` or the end of the stream is reached
    ///
    /// The matcher is evaluated for every token which starts a value (start of a JSON array or
    /// object, or a string, number, boolean or `null` value), after the path has been updated
    /// for that token. Tokens consumed while [pending closes](Self#pending-closes) are
    /// outstanding are not evaluated. If a match is found the matching token is the current
    /// token afterwards.
    ///
    /// Returns whether a match was found. Reaching the end of the stream without a match is
    /// not an error; in that case [`has_more`](Self::has_more) returns `false` afterwards.
    pub fn skip_until_match_or_end<M: PathMatcher + ?Sized>(
        &mut self,
        matcher: &M,
    ) -> Result<bool, ReadError> {
        while self.has_more() {
            let token = self.advance()?;
            if token.is_value_start() && self.pending_closes.is_empty() && self.matches(matcher)
            {
                debug!("path matched at {}", format_path(&self.path));
                return Ok(true);
            }
        }
        debug!("reached end of stream without path match");
        Ok(false)
    }

    /// Skips the value whose first token is the current token
    ///
    /// For JSON arrays and objects this advances until their closing token is the current token;
    /// for all other values this has no effect.
    pub fn skip_current_value(&mut self) -> Result<(), ReadError> {
        let mut depth: u32 = match self.current_token() {
            Some(Token::StartObject | Token::StartArray) => 1,
            Some(Token::Value) => return Ok(()),
            _ => return Err(self.unexpected_token(Token::Value)),
        };
        while depth > 0 {
            match self.advance()? {
                Token::StartObject | Token::StartArray => depth += 1,
                Token::EndObject | Token::EndArray => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    /// Registers a pending close for the innermost JSON array or object
    ///
    /// The innermost nesting level is removed from the path immediately, and `closing_token`
    /// is recorded as outstanding. It is resolved once the stream reaches that closing token,
    /// see the [type documentation](Self#pending-closes). Pending closes must be registered from
    /// the innermost to the outermost structure, that is in the order the stream will close them.
    ///
    /// # Panics
    /// Panics if `closing_token` is not [`Token::EndObject`] or [`Token::EndArray`], if it does
    /// not match the kind of the innermost JSON array or object, if the cursor is logically not
    /// inside any JSON array or object, or if the stream is currently nested inside a structure
    /// whose closing is already pending. All these cases indicate incorrect usage and are
    /// unrelated to the JSON data.
    pub fn register_pending_close(&mut self, closing_token: Token) {
        let expected_kind = match closing_token {
            Token::EndObject => ContainerKind::Object,
            Token::EndArray => ContainerKind::Array,
            _ => panic!("Incorrect usage: {closing_token} is not a closing token"),
        };
        if self.deferred_depth != 0 {
            panic!("Incorrect usage: Cannot register pending close while inside deferred structure");
        }
        let frame = match self.frames.pop() {
            Some(frame) => frame,
            None => panic!("Incorrect usage: Cannot register pending close outside of array or object"),
        };
        if frame.kind != expected_kind {
            panic!(
                "Incorrect usage: Cannot register {closing_token} as pending close for {:?}",
                frame.kind
            );
        }
        if frame.has_segment {
            self.path.pop();
        }

        self.pending_closes.push_back(closing_token);
        trace!(
            "registered pending close {closing_token}, path is now {}",
            format_path(&self.path)
        );
    }

    /// Releases the underlying token source
    ///
    /// Dropping the cursor has the same effect.
    pub fn close(self) {
        trace!("closing cursor at {}", format_path(&self.path));
    }

    /// Gets the underlying token source
    pub fn into_source(self) -> S {
        self.source
    }

    fn invalid_structure(&self, token: Token) -> ReadError {
        MalformedStreamError::InvalidStructure {
            token,
            path: format_path(&self.path),
        }
        .into()
    }

    /// Updates the path for a value which starts in the innermost container
    fn enter_value(&mut self, token: Token) -> Result<(), ReadError> {
        match self.frames.last_mut() {
            None => {}
            Some(frame) => match frame.kind {
                ContainerKind::Array => {
                    if frame.has_segment {
                        if let Some(PathSegment::Index(index)) = self.path.last_mut() {
                            match index.checked_add(1) {
                                Some(next_index) => *index = next_index,
                                None => {
                                    return Err(MalformedStreamError::IndexOverflow {
                                        path: format_path(&self.path),
                                    }
                                    .into())
                                }
                            }
                        }
                    } else {
                        frame.has_segment = true;
                        self.path.push(PathSegment::Index(0));
                    }
                }
                ContainerKind::Object => {
                    // Value without preceding member name
                    if !frame.has_segment {
                        return Err(self.invalid_structure(token));
                    }
                }
            },
        }
        Ok(())
    }

    fn update_path(&mut self, event: &Event) -> Result<(), ReadError> {
        match event {
            Event::StartObject | Event::StartArray | Event::Value(_) => {
                self.enter_value(event.token())?;
                let kind = match event {
                    Event::StartObject => ContainerKind::Object,
                    Event::StartArray => ContainerKind::Array,
                    _ => return Ok(()),
                };
                self.frames.push(Frame {
                    kind,
                    has_segment: false,
                });
            }
            Event::FieldName(name) => match self.frames.last_mut() {
                Some(frame) if frame.kind == ContainerKind::Object => {
                    let segment = PathSegment::Member(name.clone());
                    if frame.has_segment {
                        if let Some(last) = self.path.last_mut() {
                            *last = segment;
                        }
                    } else {
                        frame.has_segment = true;
                        self.path.push(segment);
                    }
                }
                _ => return Err(self.invalid_structure(Token::FieldName)),
            },
            Event::EndObject | Event::EndArray => {
                let expected_kind = if *event == Event::EndObject {
                    ContainerKind::Object
                } else {
                    ContainerKind::Array
                };
                match self.frames.last() {
                    Some(frame) if frame.kind == expected_kind => {
                        if frame.has_segment {
                            self.path.pop();
                        }
                        self.frames.pop();
                    }
                    _ => return Err(self.invalid_structure(event.token())),
                }
            }
            Event::EndOfStream => {
                if !self.frames.is_empty() {
                    return Err(MalformedStreamError::UnexpectedEnd {
                        path: format_path(&self.path),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    fn update_deferred(&mut self, token: Token) -> Result<(), ReadError> {
        match token {
            Token::StartObject | Token::StartArray => self.deferred_depth += 1,
            Token::EndObject | Token::EndArray => {
                if self.deferred_depth > 0 {
                    self.deferred_depth -= 1;
                } else if let Some(expected) = self.pending_closes.pop_front() {
                    if expected != token {
                        return Err(MalformedStreamError::UnbalancedClose {
                            expected,
                            actual: token,
                        }
                        .into());
                    }
                    trace!(
                        "resolved pending close {token}, {} remaining",
                        self.pending_closes.len()
                    );
                }
            }
            Token::EndOfStream => {
                return Err(MalformedStreamError::UnexpectedEnd {
                    path: format_path(&self.path),
                }
                .into());
            }
            Token::FieldName | Token::Value => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{path::PathPattern, path_pattern, reader::ScalarValue};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn vec_cursor(events: Vec<Event>) -> PathTrackingCursor<std::vec::IntoIter<Event>> {
        PathTrackingCursor::new(events.into_iter())
    }

    fn name(name: &str) -> Event {
        Event::FieldName(name.to_owned())
    }

    fn number(n: u32) -> Event {
        Event::Value(ScalarValue::Number(n.to_string()))
    }

    fn path(cursor: &PathTrackingCursor<std::vec::IntoIter<Event>>) -> String {
        format_path(cursor.current_path())
    }

    /// `{"a": [1, {"b": 2}], "c": 3}`
    fn nested_events() -> Vec<Event> {
        vec![
            Event::StartObject,
            name("a"),
            Event::StartArray,
            number(1),
            Event::StartObject,
            name("b"),
            number(2),
            Event::EndObject,
            Event::EndArray,
            name("c"),
            number(3),
            Event::EndObject,
        ]
    }

    #[test]
    fn path_tracking() -> TestResult {
        let mut cursor = vec_cursor(nested_events());
        assert_eq!(None, cursor.current_token());
        assert!(cursor.has_more());

        let expected = [
            (Token::StartObject, "$", 1),
            (Token::FieldName, "$.a", 1),
            (Token::StartArray, "$.a", 2),
            (Token::Value, "$.a[0]", 2),
            (Token::StartObject, "$.a[1]", 3),
            (Token::FieldName, "$.a[1].b", 3),
            (Token::Value, "$.a[1].b", 3),
            (Token::EndObject, "$.a[1]", 2),
            (Token::EndArray, "$.a", 1),
            (Token::FieldName, "$.c", 1),
            (Token::Value, "$.c", 1),
            (Token::EndObject, "$", 0),
            (Token::EndOfStream, "$", 0),
        ];
        for (token, expected_path, expected_depth) in expected {
            assert_eq!(token, cursor.advance()?);
            assert_eq!(expected_path, path(&cursor), "path for {token}");
            assert_eq!(expected_depth, cursor.depth(), "depth for {token}");
        }

        assert!(!cursor.has_more());
        match cursor.advance() {
            Err(ReadError::MalformedStream(MalformedStreamError::PastEndOfStream)) => {}
            r => panic!("Unexpected result: {r:?}"),
        }
        Ok(())
    }

    #[test]
    fn skip_until_match() -> TestResult {
        let mut cursor = vec_cursor(nested_events());
        assert!(cursor.skip_until_match_or_end(&path_pattern!["a", 1])?);
        assert_eq!(Some(Token::StartObject), cursor.current_token());
        assert_eq!("$.a[1]", path(&cursor));

        // Member name token itself is not evaluated, only the value
        assert!(cursor.skip_until_match_or_end(&path_pattern!["c"])?);
        assert_eq!(Some(&number(3)), cursor.current_event());

        assert!(!cursor.skip_until_match_or_end(&path_pattern!["a"])?);
        assert!(!cursor.has_more());
        // Stays at the end without error
        assert!(!cursor.skip_until_match_or_end(&path_pattern!["a"])?);
        Ok(())
    }

    #[test]
    fn skip_top_level_match() -> TestResult {
        let mut cursor = vec_cursor(nested_events());
        assert!(cursor.skip_until_match_or_end(&path_pattern![])?);
        assert_eq!(Some(Token::StartObject), cursor.current_token());
        Ok(())
    }

    #[test]
    fn has_more_idempotent() -> TestResult {
        let mut cursor = vec_cursor(nested_events());
        cursor.advance()?;
        cursor.advance()?;
        for _ in 0..3 {
            assert!(cursor.has_more());
            assert_eq!(Some(Token::FieldName), cursor.current_token());
            assert_eq!("$.a", path(&cursor));
        }
        Ok(())
    }

    #[test]
    fn expect_token() -> TestResult {
        let mut cursor = vec_cursor(nested_events());
        match cursor.expect_token(Token::StartObject) {
            Err(ReadError::UnexpectedToken {
                expected, actual, ..
            }) => {
                assert_eq!(Token::StartObject, expected);
                assert_eq!(None, actual);
            }
            r => panic!("Unexpected result: {r:?}"),
        }

        cursor.advance()?;
        cursor.expect_token(Token::StartObject)?;
        cursor.advance()?;
        match cursor.expect_token(Token::StartArray) {
            Err(ReadError::UnexpectedToken {
                expected,
                actual,
                path,
            }) => {
                assert_eq!(Token::StartArray, expected);
                assert_eq!(Some(Token::FieldName), actual);
                assert_eq!("$.a", path);
            }
            r => panic!("Unexpected result: {r:?}"),
        }
        Ok(())
    }

    #[test]
    fn pending_closes() -> TestResult {
        // `{"a": [{"x": 1}, {"x": [2]}], "b": [3]}`
        let mut cursor = vec_cursor(vec![
            Event::StartObject,
            name("a"),
            Event::StartArray,
            Event::StartObject,
            name("x"),
            number(1),
            Event::EndObject,
            Event::StartObject,
            name("x"),
            Event::StartArray,
            number(2),
            Event::EndArray,
            Event::EndObject,
            Event::EndArray,
            name("b"),
            Event::StartArray,
            number(3),
            Event::EndArray,
            Event::EndObject,
        ]);

        assert!(cursor.skip_until_match_or_end(&path_pattern!["a"])?);
        assert_eq!(Token::StartObject, cursor.advance()?);
        assert_eq!("$.a[0]", path(&cursor));
        assert_eq!(3, cursor.depth());

        cursor.register_pending_close(Token::EndObject);
        assert_eq!("$.a[0]", path(&cursor));
        cursor.register_pending_close(Token::EndArray);
        assert_eq!("$.a", path(&cursor));
        assert_eq!(1, cursor.depth());
        assert_eq!(2, cursor.pending_closes());

        // Tokens of the deferred structures don't change the path
        for expected_pending in [2, 2, 1, 1, 1, 1, 1, 1, 1, 0] {
            cursor.advance()?;
            assert_eq!("$.a", path(&cursor));
            assert_eq!(expected_pending, cursor.pending_closes());
        }
        assert_eq!(Some(Token::EndArray), cursor.current_token());

        // Afterwards the path is updated normally again
        assert!(cursor.skip_until_match_or_end(&path_pattern!["b", 0])?);
        assert_eq!("$.b[0]", path(&cursor));
        Ok(())
    }

    #[test]
    fn pending_close_skips_matching() -> TestResult {
        // `{"a": [{"a": []}]}`; while the outer array is deferred, the nested `a` must not match
        let mut cursor = vec_cursor(vec![
            Event::StartObject,
            name("a"),
            Event::StartArray,
            Event::StartObject,
            name("a"),
            Event::StartArray,
            Event::EndArray,
            Event::EndObject,
            Event::EndArray,
            Event::EndObject,
        ]);
        let matcher = |path: &[PathSegment]| path.last() == Some(&PathSegment::from("a"));
        assert!(cursor.skip_until_match_or_end(&matcher)?);
        cursor.advance()?;
        cursor.register_pending_close(Token::EndObject);
        cursor.register_pending_close(Token::EndArray);

        assert!(!cursor.skip_until_match_or_end(&matcher)?);
        assert_eq!(0, cursor.pending_closes());
        assert_eq!(0, cursor.depth());
        Ok(())
    }

    #[test]
    fn pending_closes_nested_arrays() -> TestResult {
        let mut cursor = vec_cursor(vec![
            Event::StartArray,
            Event::StartArray,
            Event::EndArray,
            Event::EndArray,
        ]);
        cursor.advance()?;
        cursor.advance()?;
        cursor.register_pending_close(Token::EndArray);
        cursor.register_pending_close(Token::EndArray);
        assert_eq!(2, cursor.pending_closes());
        assert_eq!(0, cursor.depth());

        assert_eq!(Token::EndArray, cursor.advance()?);
        assert_eq!(Token::EndArray, cursor.advance()?);
        assert_eq!(0, cursor.pending_closes());
        Ok(())
    }

    #[test]
    fn pending_close_unbalanced() -> TestResult {
        // Source which closes the deferred array with an object end
        let mut cursor = vec_cursor(vec![Event::StartArray, Event::EndObject]);
        cursor.advance()?;
        cursor.register_pending_close(Token::EndArray);
        match cursor.advance() {
            Err(ReadError::MalformedStream(MalformedStreamError::UnbalancedClose {
                expected,
                actual,
            })) => {
                assert_eq!(Token::EndArray, expected);
                assert_eq!(Token::EndObject, actual);
            }
            r => panic!("Unexpected result: {r:?}"),
        }
        Ok(())
    }

    #[test]
    #[should_panic(expected = "Incorrect usage: Value is not a closing token")]
    fn register_pending_close_not_closing() {
        let mut cursor = vec_cursor(vec![Event::StartArray]);
        cursor.register_pending_close(Token::Value);
    }

    #[test]
    #[should_panic(expected = "Incorrect usage: Cannot register EndObject as pending close for Array")]
    fn register_pending_close_wrong_kind() {
        let mut cursor = vec_cursor(vec![Event::StartArray]);
        let _ = cursor.advance();
        cursor.register_pending_close(Token::EndObject);
    }

    #[test]
    fn unexpected_end() -> TestResult {
        let mut cursor = vec_cursor(vec![Event::StartObject, name("a")]);
        cursor.advance()?;
        cursor.advance()?;
        match cursor.advance() {
            Err(ReadError::MalformedStream(MalformedStreamError::UnexpectedEnd { path })) => {
                assert_eq!("$.a", path);
            }
            r => panic!("Unexpected result: {r:?}"),
        }

        // Also detected while pending closes are outstanding
        let mut cursor = vec_cursor(vec![Event::StartArray, number(1)]);
        cursor.advance()?;
        cursor.register_pending_close(Token::EndArray);
        cursor.advance()?;
        match cursor.advance() {
            Err(ReadError::MalformedStream(MalformedStreamError::UnexpectedEnd { .. })) => {}
            r => panic!("Unexpected result: {r:?}"),
        }
        Ok(())
    }

    #[test]
    fn index_overflow() -> TestResult {
        let mut cursor = vec_cursor(vec![
            Event::StartArray,
            number(1),
            number(2),
            Event::EndArray,
        ]);
        cursor.advance()?;
        cursor.advance()?;
        // Pretend the array already had 2^32 items
        cursor.path = vec![PathSegment::Index(u32::MAX)];
        match cursor.advance() {
            Err(ReadError::MalformedStream(MalformedStreamError::IndexOverflow { path })) => {
                assert_eq!(format!("$[{}]", u32::MAX), path);
            }
            r => panic!("Unexpected result: {r:?}"),
        }
        Ok(())
    }

    #[test]
    fn invalid_structure() -> TestResult {
        let mut cursor = vec_cursor(vec![Event::StartArray, name("a")]);
        cursor.advance()?;
        match cursor.advance() {
            Err(ReadError::MalformedStream(MalformedStreamError::InvalidStructure {
                token,
                path,
            })) => {
                assert_eq!(Token::FieldName, token);
                assert_eq!("$", path);
            }
            r => panic!("Unexpected result: {r:?}"),
        }

        let mut cursor = vec_cursor(vec![Event::StartObject, Event::EndArray]);
        cursor.advance()?;
        assert!(matches!(
            cursor.advance(),
            Err(ReadError::MalformedStream(
                MalformedStreamError::InvalidStructure { .. }
            ))
        ));
        Ok(())
    }

    #[test]
    fn skip_current_value() -> TestResult {
        let mut cursor = vec_cursor(nested_events());
        let pattern: PathPattern = "a".parse()?;
        assert!(cursor.skip_until_match_or_end(&pattern)?);
        cursor.skip_current_value()?;
        assert_eq!(Some(Token::EndArray), cursor.current_token());
        assert_eq!("$.a", path(&cursor));

        cursor.advance()?;
        cursor.advance()?;
        // Scalar value is already fully consumed
        cursor.skip_current_value()?;
        assert_eq!(Some(&number(3)), cursor.current_event());
        Ok(())
    }
}
