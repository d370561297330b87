//! JSON encoding and decoding for sets.
//!
//! Any set whose elements serialize encodes as a JSON array in arbitrary
//! order through [`to_json`](crate::set::XorSet::to_json). Decoding is
//! deliberately lenient and scalar-only: the input must be a JSON array,
//! its scalar elements (strings, numbers, booleans, `null`) become
//! [`Scalar`] members, and nested arrays and objects are skipped rather
//! than rejected. Malformed input fails with a [`DecodeError`] carrying the
//! text position, and the target set is left untouched.
//!
//! # Examples
//!
//! ```rust
//! use xorset::codec::Scalar;
//! use xorset::set::XorSet;
//!
//! let set: XorSet<Scalar> = XorSet::from_json(br#"[1, "two", [3, 4], null]"#)?;
//!
//! // The nested array is skipped, not an error.
//! assert_eq!(set.len(), 3);
//! assert!(set.contains(&Scalar::from("two")));
//! # Ok::<(), xorset::codec::DecodeError>(())
//! ```

use std::fmt;
use std::hash::BuildHasher;

use serde::de::{IgnoredAny, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[cfg(feature = "sync")]
use crate::set::ConcurrentXorSet;
use crate::set::XorSet;

// =============================================================================
// Scalar Definition
// =============================================================================

/// A JSON scalar: the element type of leniently decoded sets.
///
/// Numbers keep their JSON spelling class: `1` decodes as an integer and
/// `1.0` as a float, and the two are distinct members.
///
/// # Examples
///
/// ```rust
/// use xorset::codec::Scalar;
///
/// assert_eq!(Scalar::from(true).to_string(), "true");
/// assert_eq!(Scalar::from(42_i64).to_string(), "42");
/// assert_eq!(Scalar::from("text").to_string(), "text");
/// assert_eq!(Scalar::Null.to_string(), "null");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scalar {
    /// JSON `null`.
    Null,
    /// A JSON boolean.
    Bool(bool),
    /// A JSON number, integer or float.
    Number(serde_json::Number),
    /// A JSON string.
    Text(String),
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Number(serde_json::Number::from(value))
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        Self::Number(serde_json::Number::from(value))
    }
}

impl From<serde_json::Number> for Scalar {
    fn from(value: serde_json::Number) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// Renders as the bare JSON token; strings are unquoted, matching how set
// members display inside `Set{...}`.
impl fmt::Display for Scalar {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => formatter.write_str("null"),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Number(value) => write!(formatter, "{value}"),
            Self::Text(value) => formatter.write_str(value),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Number(value) => value.serialize(serializer),
            Self::Text(value) => serializer.serialize_str(value),
        }
    }
}

// =============================================================================
// Scalar Deserialization
// =============================================================================

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON scalar (string, number, boolean, or null)")
    }

    fn visit_bool<E: serde::de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(Scalar::Bool(value))
    }

    fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(Scalar::Number(serde_json::Number::from(value)))
    }

    fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Scalar::Number(serde_json::Number::from(value)))
    }

    fn visit_f64<E: serde::de::Error>(self, value: f64) -> Result<Self::Value, E> {
        serde_json::Number::from_f64(value)
            .map(Scalar::Number)
            .ok_or_else(|| E::custom("non-finite JSON number"))
    }

    fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(Scalar::Text(value.to_owned()))
    }

    fn visit_string<E: serde::de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(Scalar::Text(value))
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(Scalar::Null)
    }
}

// Strict: a composite in scalar position is an invalid-type error. The
// lenient wrapper below is what set decoding goes through.
impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// A decoded array element: a scalar, or `None` for a skipped composite.
struct LenientScalar(Option<Scalar>);

struct LenientScalarVisitor;

impl<'de> Visitor<'de> for LenientScalarVisitor {
    type Value = LenientScalar;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON value")
    }

    fn visit_bool<E: serde::de::Error>(self, value: bool) -> Result<Self::Value, E> {
        ScalarVisitor.visit_bool(value).map(|s| LenientScalar(Some(s)))
    }

    fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<Self::Value, E> {
        ScalarVisitor.visit_i64(value).map(|s| LenientScalar(Some(s)))
    }

    fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<Self::Value, E> {
        ScalarVisitor.visit_u64(value).map(|s| LenientScalar(Some(s)))
    }

    fn visit_f64<E: serde::de::Error>(self, value: f64) -> Result<Self::Value, E> {
        ScalarVisitor.visit_f64(value).map(|s| LenientScalar(Some(s)))
    }

    fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Self::Value, E> {
        ScalarVisitor.visit_str(value).map(|s| LenientScalar(Some(s)))
    }

    fn visit_string<E: serde::de::Error>(self, value: String) -> Result<Self::Value, E> {
        ScalarVisitor.visit_string(value).map(|s| LenientScalar(Some(s)))
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        ScalarVisitor.visit_unit().map(|s| LenientScalar(Some(s)))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        // Drain so the parser stays positioned, then skip the element.
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(LenientScalar(None))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(LenientScalar(None))
    }
}

impl<'de> Deserialize<'de> for LenientScalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LenientScalarVisitor)
    }
}

// =============================================================================
// DecodeError
// =============================================================================

/// Failure to decode a set from JSON.
///
/// Raised for malformed JSON and for a top-level value that is not an
/// array. The target set is never modified by a failed decode.
#[derive(Debug)]
pub struct DecodeError {
    inner: serde_json::Error,
}

impl DecodeError {
    /// One-based line of the failure in the input text.
    #[must_use]
    pub fn line(&self) -> usize {
        self.inner.line()
    }

    /// One-based column of the failure in the input text.
    #[must_use]
    pub fn column(&self) -> usize {
        self.inner.column()
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "cannot decode set from JSON: {}", self.inner)
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner)
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(inner: serde_json::Error) -> Self {
        Self { inner }
    }
}

// =============================================================================
// Set Encoding
// =============================================================================

impl<T, S> XorSet<T, S>
where
    T: Serialize,
{
    /// Encodes the members as a JSON array, in arbitrary order.
    ///
    /// # Errors
    ///
    /// Returns the underlying error when an element fails to serialize.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[cfg(feature = "sync")]
impl<T, S> ConcurrentXorSet<T, S>
where
    T: Serialize,
{
    /// Encodes the members as a JSON array, in arbitrary order.
    ///
    /// The read lock is held for the duration, so the array is a consistent
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns the underlying error when an element fails to serialize.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

// =============================================================================
// Set Decoding
// =============================================================================

impl<S> XorSet<Scalar, S>
where
    S: BuildHasher + Clone + Default,
{
    /// Decodes a new set from a JSON array of scalars.
    ///
    /// Nested arrays and objects among the elements are skipped. Duplicate
    /// scalars collapse into one member.
    ///
    /// # Errors
    ///
    /// Fails when the input is malformed or not a JSON array.
    pub fn from_json(json: &[u8]) -> Result<Self, DecodeError> {
        let mut set = Self::with_hasher(S::default());
        set.merge_json(json)?;
        Ok(set)
    }
}

impl<S> XorSet<Scalar, S>
where
    S: BuildHasher + Clone,
{
    /// Decodes a JSON array of scalars and inserts the results.
    ///
    /// Existing members are kept; decoded scalars merge in with the usual
    /// deduplication. The input is staged in full before the first insert,
    /// so a failed decode leaves the set exactly as it was.
    ///
    /// # Errors
    ///
    /// Fails when the input is malformed or not a JSON array.
    pub fn merge_json(&mut self, json: &[u8]) -> Result<(), DecodeError> {
        let staged: Vec<LenientScalar> = serde_json::from_slice(json)?;
        self.insert_all(staged.into_iter().filter_map(|element| element.0));
        Ok(())
    }
}

#[cfg(feature = "sync")]
impl<S> ConcurrentXorSet<Scalar, S>
where
    S: BuildHasher + Clone + Default,
{
    /// Decodes a new lock-protected set from a JSON array of scalars.
    ///
    /// # Errors
    ///
    /// Fails when the input is malformed or not a JSON array.
    pub fn from_json(json: &[u8]) -> Result<Self, DecodeError> {
        XorSet::from_json(json).map(Self::from)
    }
}

#[cfg(feature = "sync")]
impl<S> ConcurrentXorSet<Scalar, S>
where
    S: BuildHasher + Clone,
{
    /// Decodes a JSON array of scalars and inserts the results.
    ///
    /// Parsing happens before the write lock is taken; the inserts then land
    /// under a single lock acquisition, and a failed decode never touches
    /// the set.
    ///
    /// # Errors
    ///
    /// Fails when the input is malformed or not a JSON array.
    pub fn merge_json(&self, json: &[u8]) -> Result<(), DecodeError> {
        let staged: Vec<LenientScalar> = serde_json::from_slice(json)?;
        self.insert_all(staged.into_iter().filter_map(|element| element.0));
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // =========================================================================
    // Scalar Tests
    // =========================================================================

    #[rstest]
    #[case::null("null", Scalar::Null)]
    #[case::boolean("true", Scalar::Bool(true))]
    #[case::integer("42", Scalar::from(42_i64))]
    #[case::text("\"text\"", Scalar::from("text"))]
    fn test_scalar_decodes_json_token(#[case] json: &str, #[case] expected: Scalar) {
        let decoded: Scalar = serde_json::from_str(json).unwrap();
        assert_eq!(decoded, expected);
    }

    #[rstest]
    fn test_scalar_rejects_composites() {
        assert!(serde_json::from_str::<Scalar>("[1, 2]").is_err());
        assert!(serde_json::from_str::<Scalar>("{\"a\": 1}").is_err());
    }

    #[rstest]
    fn test_scalar_integer_and_float_spellings_differ() {
        let integer: Scalar = serde_json::from_str("1").unwrap();
        let float: Scalar = serde_json::from_str("1.0").unwrap();
        assert_ne!(integer, float);
    }

    #[rstest]
    fn test_scalar_encodes_back_to_json() {
        assert_eq!(serde_json::to_string(&Scalar::Null).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Scalar::from("x")).unwrap(), "\"x\"");
        assert_eq!(serde_json::to_string(&Scalar::from(7_i64)).unwrap(), "7");
    }

    // =========================================================================
    // Lenient Element Tests
    // =========================================================================

    #[rstest]
    fn test_lenient_element_skips_composites() {
        let elements: Vec<LenientScalar> =
            serde_json::from_str(r#"[1, [2, 3], {"a": 4}, "five"]"#).unwrap();
        let decoded: Vec<Option<Scalar>> = elements.into_iter().map(|e| e.0).collect();
        assert_eq!(decoded[0], Some(Scalar::from(1_u64)));
        assert_eq!(decoded[1], None);
        assert_eq!(decoded[2], None);
        assert_eq!(decoded[3], Some(Scalar::from("five")));
    }

    // =========================================================================
    // DecodeError Tests
    // =========================================================================

    #[rstest]
    fn test_decode_error_reports_position() {
        let error = XorSet::<Scalar>::from_json(b"[1, 2").unwrap_err();
        assert_eq!(error.line(), 1);
        assert!(error.column() > 0);
        assert!(error.to_string().starts_with("cannot decode set from JSON:"));
    }
}
