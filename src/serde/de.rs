// Implementation based on:
// - https://serde.rs/impl-deserializer.html
// - https://github.com/serde-rs/json/blob/v1.0.107/src/de.rs
//   (trying to match it as close as possible)

use std::{
    fmt::Display,
    num::{ParseFloatError, ParseIntError},
    str::FromStr,
};

use serde::{
    de::{value::StrDeserializer, DeserializeSeed, Error, Unexpected, Visitor},
    forward_to_deserialize_any, Deserialize, Deserializer,
};
use struson::reader::ValueType;
use thiserror::Error;

use crate::reader::{
    Event, PathTrackingCursor, ReadError, ScalarValue, Token, TokenSource,
    DEFAULT_MAX_NESTING_DEPTH,
};

/// Error which occurred while deserializing a value
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DeserializerError {
    /// A custom error, normally created by the `DeserializerError::custom` function
    ///
    /// The data of this enum variant is a message describing the error.
    #[error("{0}")]
    Custom(String),
    /// The maximum nesting depth was exceeded while deserializing
    ///
    /// See [`TokenDeserializer::new_with_custom_nesting_limit`] for more information.
    #[error("maximum nesting depth {0} exceeded")]
    MaxNestingDepthExceeded(u32),
    /// Reading the tokens of the value failed
    #[error("{0}")]
    ReadError(#[from] ReadError),
    /// Parsing a number failed
    ///
    /// The data of this enum variant is a message describing the error.
    #[error("{0}")]
    InvalidNumber(String),
}

impl serde::de::Error for DeserializerError {
    fn custom<T: Display>(msg: T) -> Self {
        DeserializerError::Custom(msg.to_string())
    }
}

impl From<ParseIntError> for DeserializerError {
    fn from(value: ParseIntError) -> Self {
        DeserializerError::InvalidNumber(value.to_string())
    }
}
impl From<ParseFloatError> for DeserializerError {
    fn from(value: ParseFloatError) -> Self {
        DeserializerError::InvalidNumber(value.to_string())
    }
}

/// Serde `Deserializer` which consumes the tokens of a value through a [`PathTrackingCursor`]
///
/// The current token of the cursor must be the first token of the value to deserialize, for
/// example [`Token::StartObject`] for a JSON object. After the value has been deserialized
/// successfully, the current token is the last token of the value, for example the
/// [`Token::EndObject`] of the JSON object. For string, number, boolean and `null` values
/// the first and the last token are the same, so the deserializer does not advance the
/// cursor for them at all.
///
/// Because all tokens flow through the cursor, the path of the cursor stays accurate during
/// deserialization and [pending closes](PathTrackingCursor#pending-closes) are resolved once
/// the corresponding closing tokens are consumed.
///
/// # Examples
/// ```
/// # use pathwise::reader::*;
/// # use pathwise::serde::*;
/// # use serde::*;
/// let json = r#"{"text": "some text", "number": 5}"#;
/// let tokens = JsonReaderTokens::new(struson::reader::JsonStreamReader::new(json.as_bytes()));
/// let mut cursor = PathTrackingCursor::new(tokens);
/// // Move to the first token of the value
/// cursor.advance()?;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct MyStruct {
///     text: String,
///     number: u64,
/// }
///
/// let mut deserializer = TokenDeserializer::new(&mut cursor);
/// let value = MyStruct::deserialize(&mut deserializer)?;
/// assert_eq!(
///     MyStruct { text: "some text".to_owned(), number: 5 },
///     value
/// );
/// assert_eq!(Some(Token::EndObject), cursor.current_token());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Error handling
/// When one of the methods of this deserializer returns an error, deserialization must be
/// aborted. The cursor is then positioned somewhere inside the value and should not be used
/// for reading any further values.
///
/// # Panics
/// Methods of this deserializer and the returned access types (for example `MapAccess`)
/// panic when used in an incorrect way, such as trying to deserialize two map keys after each
/// other without a value in between. These cases are unrelated to the JSON data which is processed.
#[derive(Debug)]
pub struct TokenDeserializer<'a, S: TokenSource> {
    cursor: &'a mut PathTrackingCursor<S>,
    // Deserializer's API does not allow deserializing iteratively, so deeply nested JSON
    // could otherwise lead to a stack overflow
    max_nesting_depth: u32,
    /// Current nesting depth; incremented whenever a JSON array or object is started and
    /// decremented when the array or object is ended
    depth: u32,
}

impl<'a, S: TokenSource> TokenDeserializer<'a, S> {
    /// Creates a deserializer for the value starting at the current token of the cursor
    ///
    /// The deserializer has a maximum nesting depth of [`DEFAULT_MAX_NESTING_DEPTH`], see
    /// [`new_with_custom_nesting_limit`](Self::new_with_custom_nesting_limit) for more information.
    pub fn new(cursor: &'a mut PathTrackingCursor<S>) -> Self {
        Self::new_with_custom_nesting_limit(cursor, DEFAULT_MAX_NESTING_DEPTH)
    }

    /// Creates a deserializer for the value starting at the current token of the cursor, with a
    /// custom maximum nesting depth
    ///
    /// The maximum nesting depth specifies how many nested JSON arrays or objects this
    /// deserializer is allowed to start before returning [`DeserializerError::MaxNestingDepthExceeded`].
    /// For example a maximum nesting depth of 2 allows the deserializer to start one JSON
    /// array or object and within that another nested array or object, such as `{"outer": {"inner": 1}}`.
    /// The depth of the cursor itself, that is where inside the document the value is located,
    /// is not considered.
    ///
    /// The maximum nesting depth cannot protect against a stack overflow caused by an error-prone
    /// [`Deserialize`] or [`Visitor`] implementation which recursively calls deserializer methods
    /// without actually consuming any value.
    pub fn new_with_custom_nesting_limit(
        cursor: &'a mut PathTrackingCursor<S>,
        max_nesting_depth: u32,
    ) -> Self {
        TokenDeserializer {
            cursor,
            max_nesting_depth,
            depth: 0,
        }
    }
}

macro_rules! check_nesting {
    ($self:ident, $body:block) => {
        if $self.depth >= $self.max_nesting_depth {
            Err(DeserializerError::MaxNestingDepthExceeded(
                $self.max_nesting_depth,
            ))
        } else {
            $self.depth += 1;
            let result = $body;
            $self.depth -= 1;
            result
        }
    };
}

impl<S: TokenSource> TokenDeserializer<'_, S> {
    /// Gets the type of the value starting at the current token
    fn peek(&self) -> Result<ValueType, DeserializerError> {
        match self.cursor.current_event() {
            Some(Event::StartArray) => Ok(ValueType::Array),
            Some(Event::StartObject) => Ok(ValueType::Object),
            Some(Event::Value(ScalarValue::String(_))) => Ok(ValueType::String),
            Some(Event::Value(ScalarValue::Number(_))) => Ok(ValueType::Number),
            Some(Event::Value(ScalarValue::Bool(_))) => Ok(ValueType::Boolean),
            Some(Event::Value(ScalarValue::Null)) => Ok(ValueType::Null),
            _ => Err(self.cursor.unexpected_token(Token::Value).into()),
        }
    }

    fn unexpected(&self) -> Unexpected<'_> {
        match self.cursor.current_event() {
            Some(Event::StartArray) => Unexpected::Seq,
            Some(Event::StartObject) => Unexpected::Map,
            Some(Event::Value(ScalarValue::String(s))) => Unexpected::Str(s),
            // Fail fast without parsing the number
            Some(Event::Value(ScalarValue::Number(_))) => Unexpected::Other("number"),
            Some(Event::Value(ScalarValue::Bool(b))) => Unexpected::Bool(*b),
            Some(Event::Value(ScalarValue::Null)) => Unexpected::Unit,
            _ => Unexpected::Other("token"),
        }
    }

    fn err_unexpected_type<'de, V: Visitor<'de>>(&self, visitor: &V) -> DeserializerError {
        match self.peek() {
            Ok(_) => DeserializerError::invalid_type(self.unexpected(), visitor),
            Err(e) => e,
        }
    }

    fn str_value<'de, V: Visitor<'de>>(&self, visitor: &V) -> Result<&str, DeserializerError> {
        match self.cursor.current_event() {
            Some(Event::Value(ScalarValue::String(s))) => Ok(s),
            _ => Err(self.err_unexpected_type(visitor)),
        }
    }

    fn number_str<'de, V: Visitor<'de>>(&self, visitor: &V) -> Result<&str, DeserializerError> {
        match self.cursor.current_event() {
            Some(Event::Value(ScalarValue::Number(s))) => Ok(s),
            _ => Err(self.err_unexpected_type(visitor)),
        }
    }

    /// Consumes the closing token of the JSON array or object after a visitor
    /// stopped reading before its end
    fn end_structure(&mut self, closing_token: Token) -> Result<(), DeserializerError> {
        self.cursor.advance()?;
        self.cursor.expect_token(closing_token)?;
        Ok(())
    }

    fn deserialize_seq_with_length<'de, V: Visitor<'de>>(
        &mut self,
        visitor: V,
        expected_len: Option<usize>,
    ) -> Result<V::Value, DeserializerError> {
        if self.peek()? != ValueType::Array {
            return Err(self.err_unexpected_type(&visitor));
        }

        return check_nesting!(self, {
            let mut seq = SeqAccess {
                de: self,
                expected_len,
                len: 0,
                finished: false,
            };
            // Use `?` here to already fail fast before consuming the end of the array
            let result = visitor.visit_seq(&mut seq)?;
            if let Some(expected_len) = expected_len {
                if seq.len < expected_len {
                    return Err(DeserializerError::invalid_length(
                        seq.len,
                        &format!("array of length {expected_len}").as_str(),
                    ));
                }
            }

            if !seq.finished {
                self.end_structure(Token::EndArray)?;
            }
            Ok(result)
        });
    }
}

/// This implementation of [`Deserializer`] tries to match Serde JSON's behavior, however there
/// might be some minor differences. Borrowing strings or bytes with the lifetime of this
/// deserializer (`'de`) is not supported.
// Token payloads are owned by the cursor, so 'de is not bound to it
impl<'de, S: TokenSource> Deserializer<'de> for &mut TokenDeserializer<'_, S> {
    type Error = DeserializerError;

    /// Require the `Deserializer` to figure out how to drive the visitor based
    /// on what data type is in the input
    ///
    /// The behavior depends on the type of the current JSON value:
    /// - JSON array: delegates to `deserialize_seq`
    /// - JSON object: delegates to `deserialize_map`
    /// - JSON string: delegates to `deserialize_string`
    /// - JSON boolean: delegates to `deserialize_bool`
    /// - JSON `null`: calls [`Visitor::visit_unit`]
    /// - JSON number:
    ///   - if number contains `.`, `e` or `E`: parses it as `f64` and calls [`Visitor::visit_f64`]
    ///   - otherwise, if number starts with `-`: parses it as `i64` and calls [`Visitor::visit_i64`];
    ///     if parsing fails falls back to parsing as `i128`
    ///   - otherwise: parses it as `u64` and calls [`Visitor::visit_u64`]; if parsing fails falls
    ///     back to parsing as `u128`
    ///
    ///   An error is returned if parsing the number fails.
    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.peek()? {
            ValueType::Array => self.deserialize_seq(visitor),
            ValueType::Object => self.deserialize_map(visitor),
            ValueType::String => self.deserialize_string(visitor),
            ValueType::Boolean => self.deserialize_bool(visitor),
            ValueType::Null => visitor.visit_unit(),
            ValueType::Number => {
                let number_str = self.number_str(&visitor)?;
                if number_str.contains(['.', 'e', 'E']) {
                    visitor.visit_f64(f64::from_str(number_str)?)
                } else if number_str.starts_with('-') {
                    match i64::from_str(number_str) {
                        Ok(number) => visitor.visit_i64(number),
                        Err(_) => visitor.visit_i128(i128::from_str(number_str)?),
                    }
                } else {
                    match u64::from_str(number_str) {
                        Ok(number) => visitor.visit_u64(number),
                        Err(_) => visitor.visit_u128(u128::from_str(number_str)?),
                    }
                }
            }
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.cursor.current_event() {
            Some(Event::Value(ScalarValue::Bool(value))) => visitor.visit_bool(*value),
            _ => Err(self.err_unexpected_type(&visitor)),
        }
    }

    // These don't match serde_json, which deserializes only as u64, i64 and f64 depending
    // on the format of the number, ignoring the originally requested type
    duplicate::duplicate! {
        [
            method visit number_type;
            [deserialize_i8] [visit_i8] [i8];
            [deserialize_i16] [visit_i16] [i16];
            [deserialize_i32] [visit_i32] [i32];
            [deserialize_i64] [visit_i64] [i64];
            [deserialize_i128] [visit_i128] [i128];
            [deserialize_u8] [visit_u8] [u8];
            [deserialize_u16] [visit_u16] [u16];
            [deserialize_u32] [visit_u32] [u32];
            [deserialize_u64] [visit_u64] [u64];
            [deserialize_u128] [visit_u128] [u128];
            [deserialize_f32] [visit_f32] [f32];
            [deserialize_f64] [visit_f64] [f64];
        ]
        fn method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
            let number = number_type::from_str(self.number_str(&visitor)?)?;
            visitor.visit(number)
        }
    }

    /// Hint that the `Deserialize` type is expecting a `char` value
    ///
    /// This implementation delegates to `deserialize_str`.
    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        self.deserialize_str(visitor)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        let value = self.str_value(&visitor)?;
        visitor.visit_str(value)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        // Unlike serde_json always provide an owned String when it was explicitly requested
        let value = self.str_value(&visitor)?.to_owned();
        visitor.visit_string(value)
    }

    /// Hint that the `Deserialize` type is expecting a byte array
    ///
    /// The behavior depends on the type of the current JSON value:
    /// - JSON string: [`Visitor::visit_bytes`] is called with the UTF-8 bytes of the string value
    /// - JSON array: delegates to `deserialize_seq`; the type of the array
    ///   items is not checked
    ///
    /// For all other JSON values an error is returned.
    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.peek()? {
            ValueType::String => {
                let value = self.str_value(&visitor)?;
                visitor.visit_bytes(value.as_bytes())
            }
            ValueType::Array => self.deserialize_seq(visitor),
            _ => Err(self.err_unexpected_type(&visitor)),
        }
    }

    /// Hint that the `Deserialize` type is expecting a byte array
    ///
    /// Behaves like `deserialize_bytes`, except that [`Visitor::visit_byte_buf`] is
    /// called for JSON string values.
    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.peek()? {
            ValueType::String => {
                let value = self.str_value(&visitor)?.to_owned();
                visitor.visit_byte_buf(value.into_bytes())
            }
            ValueType::Array => self.deserialize_seq(visitor),
            _ => Err(self.err_unexpected_type(&visitor)),
        }
    }

    /// Hint that the `Deserialize` type is expecting an optional value
    ///
    /// If the current value is a JSON `null`, calls [`Visitor::visit_none`].
    /// Otherwise calls [`Visitor::visit_some`] to let it read the value.
    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.peek()? {
            ValueType::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.peek()? {
            ValueType::Null => visitor.visit_unit(),
            _ => Err(self.err_unexpected_type(&visitor)),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    /// Hint that the `Deserialize` type is expecting a sequence of values
    ///
    /// If the current value is a JSON array, calls [`Visitor::visit_seq`] and afterwards
    /// consumes the end of the array. Otherwise an error is returned.
    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        self.deserialize_seq_with_length(visitor, None)
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.deserialize_seq_with_length(visitor, Some(len))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.deserialize_seq_with_length(visitor, Some(len))
    }

    /// Hint that the `Deserialize` type is expecting a map of key-value pairs
    ///
    /// If the current value is a JSON object, calls [`Visitor::visit_map`] and afterwards
    /// consumes the end of the object. Otherwise an error is returned.
    ///
    /// Duplicate keys are not detected or prevented.
    ///
    /// # Panics
    /// For every call to [`MapAccess::next_key`](serde::de::MapAccess::next_key) which returns
    /// `Some` a call to [`MapAccess::next_value`](serde::de::MapAccess::next_value)
    /// has to be made. Calling the methods in a different order will cause a panic.
    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        if self.peek()? != ValueType::Object {
            return Err(self.err_unexpected_type(&visitor));
        }

        return check_nesting!(self, {
            let mut map_access = MapAccess {
                de: self,
                // Initially entry key is expected
                expects_entry_value: false,
                finished: false,
            };
            let result = visitor.visit_map(&mut map_access)?;
            if map_access.expects_entry_value {
                panic!("Incorrect usage: Did not deserialize trailing value");
            }

            if !map_access.finished {
                self.end_structure(Token::EndObject)?;
            }
            Ok(result)
        });
    }

    /// Hint that the `Deserialize` type is expecting a struct
    ///
    /// The behavior depends on the type of the current JSON value:
    /// - JSON array: delegates to `deserialize_seq`
    /// - JSON object: delegates to `deserialize_map`
    ///
    /// For all other JSON values an error is returned. The given name and
    /// fields are ignored.
    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        match self.peek()? {
            ValueType::Array => self.deserialize_seq(visitor),
            ValueType::Object => self.deserialize_map(visitor),
            _ => Err(self.err_unexpected_type(&visitor)),
        }
    }

    /// Hint that the `Deserialize` type is expecting an enum value
    ///
    /// The behavior depends on the type of the current JSON value:
    /// - JSON object: an object with one member is expected, where the member name is
    ///   the enum variant name and the member value is the variant value
    /// - JSON string: the string is the variant name; the value is expected to be unit
    ///   and has to be consumed with [`VariantAccess::unit_variant`](serde::de::VariantAccess::unit_variant),
    ///   using any other method will return an error
    ///
    /// In both cases [`Visitor::visit_enum`] is called. For all other JSON values an
    /// error is returned.
    ///
    /// # Panics
    /// This method panics if the visitor returns `Ok` without having read the variant
    /// name or variant value.
    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        match self.peek()? {
            ValueType::Object => {
                return check_nesting!(self, {
                    let mut variant_access = VariantAccess {
                        de: self,
                        consumed_variant_value: false,
                    };
                    let result = visitor.visit_enum(&mut variant_access)?;
                    if !variant_access.consumed_variant_value {
                        panic!("Incorrect usage: Did not consume variant value");
                    }

                    self.end_structure(Token::EndObject)?;
                    Ok(result)
                });
            }
            ValueType::String => {
                let mut variant_access = UnitVariantAccess {
                    de: self,
                    consumed_variant_value: false,
                };
                let result = visitor.visit_enum(&mut variant_access)?;
                if !variant_access.consumed_variant_value {
                    panic!("Incorrect usage: Did not consume variant value");
                }
                Ok(result)
            }
            _ => Err(self.err_unexpected_type(&visitor)),
        }
    }

    /// Hint that the `Deserialize` type is expecting an identifier
    ///
    /// This implementation delegates to `deserialize_str`.
    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        self.deserialize_str(visitor)
    }

    /// Hint that the `Deserialize` type needs to ignore the current value
    ///
    /// All tokens of the value are consumed and [`Visitor::visit_unit`] is called.
    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        self.cursor.skip_current_value()?;
        visitor.visit_unit()
    }
}

#[derive(Debug)]
struct SeqAccess<'s, 'a, S: TokenSource> {
    de: &'s mut TokenDeserializer<'a, S>,
    expected_len: Option<usize>,
    len: usize,
    /// Whether the end of the array has been consumed
    finished: bool,
}
impl<'de, S: TokenSource> serde::de::SeqAccess<'de> for &mut SeqAccess<'_, '_, S> {
    type Error = DeserializerError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, Self::Error> {
        if self.finished {
            return Ok(None);
        }
        if self.de.cursor.advance()? == Token::EndArray {
            self.finished = true;
            return Ok(None);
        }

        if let Some(expected_len) = self.expected_len {
            if self.len >= expected_len {
                return Err(DeserializerError::invalid_length(
                    // + 1 for currently read element
                    self.len + 1,
                    &format!("array of length {expected_len}").as_str(),
                ));
            }
        }
        self.len += 1;
        Ok(Some(seed.deserialize(&mut *self.de)?))
    }
}

#[derive(Debug)]
struct MapAccess<'s, 'a, S: TokenSource> {
    de: &'s mut TokenDeserializer<'a, S>,
    expects_entry_value: bool,
    /// Whether the end of the object has been consumed
    finished: bool,
}
impl<'de, S: TokenSource> serde::de::MapAccess<'de> for &mut MapAccess<'_, '_, S> {
    type Error = DeserializerError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Self::Error> {
        if self.expects_entry_value {
            panic!("Incorrect usage: Cannot deserialize key when value is expected")
        }
        if self.finished {
            return Ok(None);
        }
        if self.de.cursor.advance()? == Token::EndObject {
            self.finished = true;
            return Ok(None);
        }

        let name = match self.de.cursor.current_event() {
            Some(Event::FieldName(name)) => name,
            _ => return Err(self.de.cursor.unexpected_token(Token::FieldName).into()),
        };
        let key = seed.deserialize(MapKeyDeserializer { key: name })?;
        self.expects_entry_value = true;
        Ok(Some(key))
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(
        &mut self,
        seed: V,
    ) -> Result<V::Value, Self::Error> {
        if !self.expects_entry_value {
            panic!("Incorrect usage: Cannot deserialize value when key is expected")
        }
        self.expects_entry_value = false;
        self.de.cursor.advance()?;
        seed.deserialize(&mut *self.de)
    }
}

/// Checks whether `s` has the format of a JSON number, for example `-1.5e3`
fn is_json_number(s: &str) -> bool {
    let bytes = s.as_bytes();
    let skip_digits = |index: &mut usize| -> usize {
        let start = *index;
        while *index < bytes.len() && bytes[*index].is_ascii_digit() {
            *index += 1;
        }
        *index - start
    };

    let mut index = 0;
    if bytes.first() == Some(&b'-') {
        index += 1;
    }
    let integer_start = index;
    let integer_len = skip_digits(&mut index);
    if integer_len == 0 || (integer_len > 1 && bytes[integer_start] == b'0') {
        return false;
    }
    if bytes.get(index) == Some(&b'.') {
        index += 1;
        if skip_digits(&mut index) == 0 {
            return false;
        }
    }
    if matches!(bytes.get(index), Some(b'e' | b'E')) {
        index += 1;
        if matches!(bytes.get(index), Some(b'+' | b'-')) {
            index += 1;
        }
        if skip_digits(&mut index) == 0 {
            return false;
        }
    }
    index == bytes.len()
}

#[derive(Debug)]
struct MapKeyDeserializer<'a> {
    key: &'a str,
}

// Based on https://github.com/serde-rs/json/blob/v1.0.107/src/de.rs#L2171
impl<'de> Deserializer<'de> for MapKeyDeserializer<'_> {
    type Error = DeserializerError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_str(self.key)
    }

    // Roughly based on https://github.com/serde-rs/json/blob/v1.0.107/src/de.rs#L2130
    duplicate::duplicate! {
        [
            method visit;
            [deserialize_i8] [visit_i8];
            [deserialize_i16] [visit_i16];
            [deserialize_i32] [visit_i32];
            [deserialize_i64] [visit_i64];
            [deserialize_i128] [visit_i128];
            [deserialize_u8] [visit_u8];
            [deserialize_u16] [visit_u16];
            [deserialize_u32] [visit_u32];
            [deserialize_u64] [visit_u64];
            [deserialize_u128] [visit_u128];
            [deserialize_f32] [visit_f32];
            [deserialize_f64] [visit_f64];
        ]
        fn method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
            if !is_json_number(self.key) {
                return Err(DeserializerError::InvalidNumber(format!(
                    "invalid number: {}",
                    self.key
                )));
            }
            match self.key.parse() {
                Ok(number) => visitor.visit(number),
                Err(_) => Err(DeserializerError::InvalidNumber(format!(
                    "number {} cannot be parsed as desired type",
                    self.key
                ))),
            }
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        StrDeserializer::new(self.key).deserialize_enum(name, variants, visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_bytes(self.key.as_bytes())
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self.key {
            "true" => visitor.visit_bool(true),
            "false" => visitor.visit_bool(false),
            _ => Err(DeserializerError::invalid_type(
                Unexpected::Str(self.key),
                &visitor,
            )),
        }
    }

    forward_to_deserialize_any! {
        char str string unit unit_struct seq tuple tuple_struct map
        struct identifier ignored_any
    }
}

/// `EnumAccess` and `VariantAccess` for enums encoded as JSON object: `{"variant_name": variant_value}`
#[derive(Debug)]
struct VariantAccess<'s, 'a, S: TokenSource> {
    de: &'s mut TokenDeserializer<'a, S>,
    // Returning without consuming the variant value would leave the cursor inside the object
    consumed_variant_value: bool,
}

impl<'de, S: TokenSource> serde::de::EnumAccess<'de> for &mut VariantAccess<'_, '_, S> {
    type Error = DeserializerError;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, Self::Variant), Self::Error> {
        self.de.cursor.advance()?;
        let value = match self.de.cursor.current_event() {
            Some(Event::FieldName(name)) => {
                seed.deserialize(StrDeserializer::<Self::Error>::new(name))?
            }
            _ => return Err(self.de.cursor.unexpected_token(Token::FieldName).into()),
        };
        Ok((value, self))
    }
}

impl<'de, S: TokenSource> serde::de::VariantAccess<'de> for &mut VariantAccess<'_, '_, S> {
    type Error = DeserializerError;

    fn unit_variant(self) -> Result<(), Self::Error> {
        self.consumed_variant_value = true;
        self.de.cursor.advance()?;
        // Deserialize `()`
        Deserialize::deserialize(&mut *self.de)
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(
        self,
        seed: T,
    ) -> Result<T::Value, Self::Error> {
        self.consumed_variant_value = true;
        self.de.cursor.advance()?;
        seed.deserialize(&mut *self.de)
    }

    fn tuple_variant<V: Visitor<'de>>(
        self,
        len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.consumed_variant_value = true;
        self.de.cursor.advance()?;
        self.de.deserialize_tuple(len, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.consumed_variant_value = true;
        self.de.cursor.advance()?;
        self.de.deserialize_struct("", fields, visitor)
    }
}

/// `EnumAccess` and `VariantAccess` for enums whose variant name is encoded as JSON string value
/// without a variant value (implicit unit value)
#[derive(Debug)]
struct UnitVariantAccess<'s, 'a, S: TokenSource> {
    de: &'s mut TokenDeserializer<'a, S>,
    consumed_variant_value: bool,
}

impl<'de, S: TokenSource> serde::de::EnumAccess<'de> for &mut UnitVariantAccess<'_, '_, S> {
    type Error = DeserializerError;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, Self::Variant), Self::Error> {
        // Deserialize the string value (only for string value UnitVariantAccess is created)
        Ok((seed.deserialize(&mut *self.de)?, self))
    }
}

impl<'de, S: TokenSource> serde::de::VariantAccess<'de> for &mut UnitVariantAccess<'_, '_, S> {
    type Error = DeserializerError;

    fn unit_variant(self) -> Result<(), Self::Error> {
        self.consumed_variant_value = true;
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(
        self,
        _seed: T,
    ) -> Result<T::Value, Self::Error> {
        Err(DeserializerError::invalid_type(
            Unexpected::UnitVariant,
            &"newtype variant",
        ))
    }

    fn tuple_variant<V: Visitor<'de>>(
        self,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value, Self::Error> {
        Err(DeserializerError::invalid_type(
            Unexpected::UnitVariant,
            &"tuple variant",
        ))
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Self::Error> {
        Err(DeserializerError::invalid_type(
            Unexpected::UnitVariant,
            &"struct variant",
        ))
    }
}
