//! Provides integration with [Serde](https://docs.rs/serde/latest/serde/)
//!
//! [`TokenDeserializer`] deserializes a [`Deserialize`](serde::de::Deserialize) value from the
//! tokens consumed through a [`PathTrackingCursor`](crate::reader::PathTrackingCursor). It is used
//! by [`PathAwareArrayReader`](crate::reader::PathAwareArrayReader) to deserialize the items of the
//! matched JSON array, and normally there is no need to use it directly.
//!
//! For compatibility this module tries to match Serde JSON's behavior, but there might be small
//! differences, in particular for numbers.

// Re-export everything directly under `serde`; the sub-module does not contain many
// structs and enums
mod de;
pub use de::*;
