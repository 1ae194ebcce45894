use struson::reader::{JsonReader, ValueType};

use super::{Event, MalformedStreamError, ScalarValue};

/// Source of the [`Event`]s of a JSON document
///
/// A token source is forward-only: every call to [`next_event`](Self::next_event) irreversibly
/// consumes one token. Once the end of the document has been reached, [`Event::EndOfStream`]
/// is returned.
pub trait TokenSource {
    /// Consumes and returns the next event
    fn next_event(&mut self) -> Result<Event, MalformedStreamError>;

    /// Gets a human-readable description of the current position in the underlying data,
    /// if available
    fn position(&self) -> Option<String> {
        None
    }
}

/// Yields the events of the vector, followed by [`Event::EndOfStream`]
///
/// Mainly useful for tests which work on the token level without JSON text.
impl TokenSource for std::vec::IntoIter<Event> {
    fn next_event(&mut self) -> Result<Event, MalformedStreamError> {
        Ok(self.next().unwrap_or(Event::EndOfStream))
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum Container {
    Array,
    /// Object which expects a member name or its end next
    ObjectName,
    /// Object which expects a member value next
    ObjectValue,
}

/// [`TokenSource`] which produces events from a Struson [`JsonReader`]
///
/// The JSON reader must not have consumed any data yet. Consuming data from the JSON reader
/// through other means while this token source is in use leads to errors or panics.
///
/// # Examples
/// ```
/// # use pathwise::reader::*;
/// use struson::reader::JsonStreamReader;
///
/// let json_reader = JsonStreamReader::new(r#"{"a": [true]}"#.as_bytes());
/// let mut tokens = JsonReaderTokens::new(json_reader);
///
/// assert_eq!(Event::StartObject, tokens.next_event()?);
/// assert_eq!(Event::FieldName("a".to_owned()), tokens.next_event()?);
/// assert_eq!(Event::StartArray, tokens.next_event()?);
/// assert_eq!(Event::Value(ScalarValue::Bool(true)), tokens.next_event()?);
/// assert_eq!(Event::EndArray, tokens.next_event()?);
/// assert_eq!(Event::EndObject, tokens.next_event()?);
/// assert_eq!(Event::EndOfStream, tokens.next_event()?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct JsonReaderTokens<J: JsonReader> {
    /// `None` once the end of the document has been reached
    json_reader: Option<J>,
    stack: Vec<Container>,
    started: bool,
    multiple_top_level: bool,
}

impl<J: JsonReader> JsonReaderTokens<J> {
    /// Creates a token source for a JSON document with a single top-level value
    ///
    /// Once the top-level value has been read, the token source verifies that only whitespace
    /// follows it. Trailing data is reported as [`MalformedStreamError::JsonReader`].
    pub fn new(json_reader: J) -> Self {
        JsonReaderTokens {
            json_reader: Some(json_reader),
            stack: Vec::new(),
            started: false,
            multiple_top_level: false,
        }
    }

    /// Creates a token source which reads all top-level values of the document
    ///
    /// The JSON reader must have been created with
    /// [`allow_multiple_top_level`](struson::reader::ReaderSettings::allow_multiple_top_level)
    /// enabled, otherwise reading will panic once the first top-level value has been consumed.
    pub fn new_multiple_top_level(json_reader: J) -> Self {
        JsonReaderTokens {
            multiple_top_level: true,
            ..JsonReaderTokens::new(json_reader)
        }
    }

    /// Gets the underlying JSON reader
    ///
    /// Returns `None` if [`Event::EndOfStream`] has already been returned; the JSON reader is
    /// consumed when checking for trailing data at the end of the document.
    pub fn into_inner(self) -> Option<J> {
        self.json_reader
    }

    /// Consumes the JSON reader, verifying that no data follows the last top-level value
    fn finish(&mut self) -> Result<Event, MalformedStreamError> {
        if let Some(json_reader) = self.json_reader.take() {
            json_reader.consume_trailing_whitespace()?;
        }
        Ok(Event::EndOfStream)
    }
}

fn replace_top(stack: &mut [Container], container: Container) {
    if let Some(top) = stack.last_mut() {
        *top = container;
    }
}

fn next_value<J: JsonReader>(
    json_reader: &mut J,
    stack: &mut Vec<Container>,
) -> Result<Event, MalformedStreamError> {
    let event = match json_reader.peek()? {
        ValueType::Array => {
            json_reader.begin_array()?;
            stack.push(Container::Array);
            Event::StartArray
        }
        ValueType::Object => {
            json_reader.begin_object()?;
            stack.push(Container::ObjectName);
            Event::StartObject
        }
        ValueType::String => Event::Value(ScalarValue::String(json_reader.next_string()?)),
        ValueType::Number => Event::Value(ScalarValue::Number(json_reader.next_number_as_string()?)),
        ValueType::Boolean => Event::Value(ScalarValue::Bool(json_reader.next_bool()?)),
        ValueType::Null => {
            json_reader.next_null()?;
            Event::Value(ScalarValue::Null)
        }
    };
    Ok(event)
}

impl<J: JsonReader> TokenSource for JsonReaderTokens<J> {
    fn next_event(&mut self) -> Result<Event, MalformedStreamError> {
        let json_reader = match self.json_reader.as_mut() {
            Some(json_reader) => json_reader,
            None => return Ok(Event::EndOfStream),
        };
        let stack = &mut self.stack;

        match stack.last().copied() {
            None => {
                // Struson panics when checking for a next top-level value if multiple
                // top-level values are not enabled, or before the first value was read
                let has_next_value =
                    !self.started || (self.multiple_top_level && json_reader.has_next()?);
                if has_next_value {
                    self.started = true;
                    next_value(json_reader, stack)
                } else {
                    self.finish()
                }
            }
            Some(Container::ObjectName) => {
                if json_reader.has_next()? {
                    let name = json_reader.next_name_owned()?;
                    replace_top(stack, Container::ObjectValue);
                    Ok(Event::FieldName(name))
                } else {
                    json_reader.end_object()?;
                    stack.pop();
                    Ok(Event::EndObject)
                }
            }
            Some(Container::ObjectValue) => {
                replace_top(stack, Container::ObjectName);
                next_value(json_reader, stack)
            }
            Some(Container::Array) => {
                if json_reader.has_next()? {
                    next_value(json_reader, stack)
                } else {
                    json_reader.end_array()?;
                    stack.pop();
                    Ok(Event::EndArray)
                }
            }
        }
    }

    fn position(&self) -> Option<String> {
        self.json_reader
            .as_ref()
            .map(|json_reader| json_reader.current_position(true).to_string())
    }
}

#[cfg(test)]
mod tests {
    use struson::reader::{JsonStreamReader, ReaderError, ReaderSettings, SyntaxErrorKind};

    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn events<T: TokenSource>(mut tokens: T) -> Result<Vec<Event>, MalformedStreamError> {
        let mut events = Vec::new();
        loop {
            let event = tokens.next_event()?;
            if event == Event::EndOfStream {
                return Ok(events);
            }
            events.push(event);
        }
    }

    fn string(s: &str) -> Event {
        Event::Value(ScalarValue::String(s.to_owned()))
    }

    fn number(s: &str) -> Event {
        Event::Value(ScalarValue::Number(s.to_owned()))
    }

    #[test]
    fn json_reader_events() -> TestResult {
        let json = r#"{"a": [1, "x", true, null, {}], "b": {"c": []}, "d": -2.5e3}"#;
        let tokens = JsonReaderTokens::new(JsonStreamReader::new(json.as_bytes()));
        assert_eq!(
            vec![
                Event::StartObject,
                Event::FieldName("a".to_owned()),
                Event::StartArray,
                number("1"),
                string("x"),
                Event::Value(ScalarValue::Bool(true)),
                Event::Value(ScalarValue::Null),
                Event::StartObject,
                Event::EndObject,
                Event::EndArray,
                Event::FieldName("b".to_owned()),
                Event::StartObject,
                Event::FieldName("c".to_owned()),
                Event::StartArray,
                Event::EndArray,
                Event::EndObject,
                Event::FieldName("d".to_owned()),
                number("-2.5e3"),
                Event::EndObject,
            ],
            events(tokens)?
        );
        Ok(())
    }

    #[test]
    fn scalar_top_level() -> TestResult {
        let mut tokens = JsonReaderTokens::new(JsonStreamReader::new("\"text\"".as_bytes()));
        assert_eq!(string("text"), tokens.next_event()?);
        assert_eq!(Event::EndOfStream, tokens.next_event()?);
        // Stays at the end
        assert_eq!(Event::EndOfStream, tokens.next_event()?);
        Ok(())
    }

    #[test]
    fn multiple_top_level() -> TestResult {
        let json_reader = JsonStreamReader::new_custom(
            "[1] {\"a\": 2}\n3".as_bytes(),
            ReaderSettings {
                allow_multiple_top_level: true,
                ..Default::default()
            },
        );
        let tokens = JsonReaderTokens::new_multiple_top_level(json_reader);
        assert_eq!(
            vec![
                Event::StartArray,
                number("1"),
                Event::EndArray,
                Event::StartObject,
                Event::FieldName("a".to_owned()),
                number("2"),
                Event::EndObject,
                number("3"),
            ],
            events(tokens)?
        );
        Ok(())
    }

    #[test]
    fn syntax_error() {
        let tokens = JsonReaderTokens::new(JsonStreamReader::new("[1, }".as_bytes()));
        match events(tokens) {
            Err(MalformedStreamError::JsonReader(_)) => {}
            r => panic!("Unexpected result: {r:?}"),
        }
    }

    #[test]
    fn trailing_data() -> TestResult {
        let mut tokens =
            JsonReaderTokens::new(JsonStreamReader::new(r#"{"a": [1]} garbage"#.as_bytes()));
        for _ in 0..6 {
            tokens.next_event()?;
        }
        match tokens.next_event() {
            Err(MalformedStreamError::JsonReader(ReaderError::SyntaxError(e))) => {
                assert_eq!(SyntaxErrorKind::TrailingData, e.kind);
            }
            r => panic!("Unexpected result: {r:?}"),
        }

        // Trailing whitespace is fine
        let tokens = JsonReaderTokens::new(JsonStreamReader::new("[true] \n\t".as_bytes()));
        assert_eq!(
            vec![
                Event::StartArray,
                Event::Value(ScalarValue::Bool(true)),
                Event::EndArray
            ],
            events(tokens)?
        );
        Ok(())
    }

    #[test]
    fn into_inner() -> TestResult {
        let mut tokens = JsonReaderTokens::new(JsonStreamReader::new("[]".as_bytes()));
        tokens.next_event()?;
        assert!(tokens.into_inner().is_some());

        let mut tokens = JsonReaderTokens::new(JsonStreamReader::new("[]".as_bytes()));
        assert_eq!(Event::StartArray, tokens.next_event()?);
        assert_eq!(Event::EndArray, tokens.next_event()?);
        assert_eq!(Event::EndOfStream, tokens.next_event()?);
        assert!(tokens.position().is_none());
        assert!(tokens.into_inner().is_none());
        Ok(())
    }

    #[test]
    fn position() -> TestResult {
        let mut tokens = JsonReaderTokens::new(JsonStreamReader::new("[true]".as_bytes()));
        tokens.next_event()?;
        assert!(tokens.position().is_some());

        let vec_tokens = vec![Event::StartArray].into_iter();
        assert_eq!(None, TokenSource::position(&vec_tokens));
        Ok(())
    }

    #[test]
    fn vec_source() -> TestResult {
        let mut tokens = vec![Event::StartArray, Event::EndArray].into_iter();
        assert_eq!(Event::StartArray, tokens.next_event()?);
        assert_eq!(Event::EndArray, tokens.next_event()?);
        assert_eq!(Event::EndOfStream, tokens.next_event()?);
        assert_eq!(Event::EndOfStream, tokens.next_event()?);
        Ok(())
    }
}
