//! The URN value type.
//!
//! A [`Urn`] is created only through the factories on this type. Every
//! factory funnels into a single private constructor, so a URN that exists
//! has always passed segment and identifier validation.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::{Digest, Sha1};
use uuid::Uuid;

use crate::binding::SupportsUrn;
use crate::UrnError;

/// Grammar every namespace and collection segment must match.
pub const SEGMENT_GRAMMAR: &str = "[A-Za-z0-9._%-]+";

const SEPARATOR: char = ':';

/// Stringified null that older producers wrote into URNs. Accepted with a
/// warning so existing keys keep parsing.
const LEGACY_NONE: &str = "None";

/// Everything outside `[A-Za-z0-9._-]` is escaped, which keeps an encoded
/// identifier inside the segment grammar.
const IDENTIFIER_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'_').remove(b'-');

const HYPHENATED_UUID_LEN: usize = 36;

/// A structured `namespace:collection:identifier` identifier.
#[derive(Clone)]
pub struct Urn {
    namespace: String,
    collection: String,
    encoded_identifier: String,
    identifier: String,
    uuid: Option<Uuid>,
}

impl Urn {
    /// Builds a URN from a raw identifier, percent-encoding it.
    ///
    /// The identifier must not be blank and must not contain ':'.
    pub fn build(
        namespace: &str,
        collection: &str,
        identifier: impl fmt::Display,
    ) -> Result<Self, UrnError> {
        let identifier = identifier.to_string();
        if identifier.trim().is_empty() {
            return Err(UrnError::InvalidIdentifier {
                identifier,
                reason: "identifier cannot be empty",
            });
        }
        if identifier.contains(SEPARATOR) {
            return Err(UrnError::InvalidIdentifier {
                identifier,
                reason: "identifier cannot contain the ':' character",
            });
        }

        Self::assemble(namespace, collection, Self::encode_identifier(&identifier))
    }

    /// Builds a URN whose identifier is the hyphenated form of `uuid`.
    pub fn from_uuid(namespace: &str, collection: &str, uuid: Uuid) -> Result<Self, UrnError> {
        Self::assemble(namespace, collection, uuid.hyphenated().to_string())
    }

    /// Builds a URN with a fresh random (v4) UUID identifier.
    pub fn random_uuid(namespace: &str, collection: &str) -> Result<Self, UrnError> {
        Self::from_uuid(namespace, collection, Uuid::new_v4())
    }

    /// Builds a URN from the text of a fresh random UUID.
    pub fn build_unique(namespace: &str, collection: &str) -> Result<Self, UrnError> {
        Self::build(namespace, collection, Uuid::new_v4())
    }

    /// Builds a URN from an identifier the caller has already percent-encoded.
    ///
    /// No further encoding is applied; the text only has to decode cleanly.
    pub fn from_encoded_identifier(
        namespace: &str,
        collection: &str,
        encoded_identifier: impl fmt::Display,
    ) -> Result<Self, UrnError> {
        Self::assemble(namespace, collection, encoded_identifier.to_string())
    }

    /// Parses the canonical `namespace:collection:identifier` form.
    pub fn parse(s: &str) -> Result<Self, UrnError> {
        if !Self::is_valid_as_urn(s) {
            return Err(UrnError::MalformedUrn {
                input: s.to_string(),
            });
        }

        let mut segments = s.splitn(3, SEPARATOR);
        let (Some(namespace), Some(collection), Some(identifier)) =
            (segments.next(), segments.next(), segments.next())
        else {
            return Err(UrnError::MalformedUrn {
                input: s.to_string(),
            });
        };

        if identifier == LEGACY_NONE {
            return Self::build(namespace, collection, LEGACY_NONE);
        }

        match try_uuid(identifier) {
            Some(uuid) => Self::from_uuid(namespace, collection, uuid),
            None => Self::from_encoded_identifier(namespace, collection, identifier),
        }
    }

    /// Text entry point used at the JSON boundary. Same contract as
    /// [`Urn::parse`].
    pub fn parse_from_text(text: &str) -> Result<Self, UrnError> {
        Self::parse(text)
    }

    /// In-memory entry point: accepts an existing URN, a string, or a JSON
    /// string value. Any other JSON shape is a type mismatch.
    pub fn coerce_from_value(value: impl Into<UrnInput>) -> Result<Self, UrnError> {
        match value.into() {
            UrnInput::Urn(urn) => Ok(urn),
            UrnInput::Text(text) => Self::parse(&text),
            UrnInput::Json(serde_json::Value::String(text)) => Self::parse(&text),
            UrnInput::Json(other) => Err(UrnError::TypeMismatch {
                expected: "a URN or a URN string".to_string(),
                actual: format!("a JSON {}", json_kind(&other)),
            }),
        }
    }

    /// Parses `s` if it is shaped like a URN.
    ///
    /// Returns `Ok(None)` without further work when the text does not have
    /// three grammar-valid segments. Shaped text that still fails validation
    /// is reported as an error.
    pub fn maybe_parse(s: &str) -> Result<Option<Self>, UrnError> {
        if !Self::is_valid_as_urn(s) {
            return Ok(None);
        }
        Self::parse(s).map(Some)
    }

    /// Cheap shape check: exactly three segments, each matching the grammar.
    #[must_use]
    pub fn is_valid_as_urn(s: &str) -> bool {
        let mut count = 0;
        for segment in s.split(SEPARATOR) {
            count += 1;
            if count > 3 || !is_valid_segment(segment) {
                return false;
            }
        }
        count == 3
    }

    /// Percent-encodes a raw identifier.
    #[must_use]
    pub fn encode_identifier(identifier: &str) -> String {
        utf8_percent_encode(identifier, IDENTIFIER_ESCAPES).to_string()
    }

    /// Percent-decodes an encoded identifier.
    pub fn decode_identifier(encoded: &str) -> Result<String, UrnError> {
        percent_decode_str(encoded)
            .decode_utf8()
            .map(Cow::into_owned)
            .map_err(|_| UrnError::InvalidIdentifier {
                identifier: encoded.to_string(),
                reason: "identifier is not valid percent-encoded UTF-8",
            })
    }

    fn assemble(
        namespace: &str,
        collection: &str,
        encoded_identifier: String,
    ) -> Result<Self, UrnError> {
        validate_segment(namespace)?;
        validate_segment(collection)?;

        if encoded_identifier == LEGACY_NONE {
            tracing::warn!(
                namespace,
                collection,
                "URN identifier is the string 'None'. This is probably a mistake"
            );
        } else if !is_valid_segment(&encoded_identifier) {
            return Err(UrnError::InvalidIdentifier {
                identifier: encoded_identifier,
                reason: "encoded identifier must match [A-Za-z0-9._%-]+",
            });
        }

        let identifier = Self::decode_identifier(&encoded_identifier)?;
        if identifier.trim().is_empty() {
            return Err(UrnError::InvalidIdentifier {
                identifier: encoded_identifier,
                reason: "identifier cannot be empty",
            });
        }
        if identifier.contains(SEPARATOR) {
            return Err(UrnError::InvalidIdentifier {
                identifier: encoded_identifier,
                reason: "identifier cannot contain the ':' character",
            });
        }

        let uuid = try_uuid(&encoded_identifier);

        Ok(Self {
            namespace: namespace.to_string(),
            collection: collection.to_string(),
            encoded_identifier,
            identifier,
            uuid,
        })
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The identifier exactly as it appears in the string form.
    #[must_use]
    pub fn encoded_identifier(&self) -> &str {
        &self.encoded_identifier
    }

    /// The percent-decoded identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the identifier as a UUID, or [`UrnError::NotAUuid`].
    pub fn uuid_identifier(&self) -> Result<Uuid, UrnError> {
        self.uuid.ok_or_else(|| UrnError::NotAUuid {
            urn: self.to_string(),
        })
    }

    #[must_use]
    pub fn has_uuid(&self) -> bool {
        self.uuid.is_some()
    }

    /// False for the legacy `None` identifier.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.encoded_identifier != LEGACY_NONE
    }

    /// The `namespace:collection` prefix.
    #[must_use]
    pub fn partial_urn(&self) -> String {
        format!("{}{SEPARATOR}{}", self.namespace, self.collection)
    }

    /// Returns true if this URN addresses entities of type `T`.
    #[must_use]
    pub fn is_a<T: SupportsUrn + ?Sized>(&self) -> bool {
        crate::is_a::<T>(self)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'%' | b'-'))
}

fn validate_segment(segment: &str) -> Result<(), UrnError> {
    if segment.is_empty() {
        return Err(UrnError::InvalidSegment {
            segment: String::new(),
            reason: "segment cannot be empty",
        });
    }
    if segment == LEGACY_NONE {
        tracing::warn!(
            segment,
            "URN segment is the string 'None'. This is probably a mistake"
        );
        return Ok(());
    }
    if !is_valid_segment(segment) {
        return Err(UrnError::InvalidSegment {
            segment: segment.to_string(),
            reason: "segment must match [A-Za-z0-9._%-]+",
        });
    }
    Ok(())
}

// Only the hyphenated form counts; simple/braced/urn spellings stay opaque.
fn try_uuid(encoded: &str) -> Option<Uuid> {
    if encoded.len() != HYPHENATED_UUID_LEN {
        return None;
    }
    Uuid::parse_str(encoded).ok()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Derives a stable UUID from a natural string key.
///
/// The UUID bytes are the first 16 bytes of the SHA-1 digest of `value`,
/// with no version or variant bits set. Keys already stored in this form
/// depend on that exact layout.
#[must_use]
pub fn derive_uuid(value: &str) -> Uuid {
    let digest = Sha1::digest(value.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    Uuid::from_bytes(bytes)
}

impl PartialEq for Urn {
    fn eq(&self, other: &Self) -> bool {
        if self.namespace != other.namespace || self.collection != other.collection {
            return false;
        }
        match (self.uuid, other.uuid) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.identifier == other.identifier,
            _ => false,
        }
    }
}

impl Eq for Urn {}

// Hashes the same parts equality compares, so differently spelled but equal
// URNs (upper-case UUIDs, redundant escapes) land in the same bucket.
impl Hash for Urn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.collection.hash(state);
        match &self.uuid {
            Some(uuid) => uuid.hash(state),
            None => self.identifier.hash(state),
        }
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.namespace, self.collection, self.encoded_identifier
        )
    }
}

impl fmt::Debug for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Urn {self}>")
    }
}

impl FromStr for Urn {
    type Err = UrnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Urn {
    type Error = UrnError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Urn {
    type Error = UrnError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl serde::Serialize for Urn {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

struct UrnVisitor;

impl serde::de::Visitor<'_> for UrnVisitor {
    type Value = Urn;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a URN string of the form namespace:collection:identifier")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Urn::parse_from_text(v).map_err(E::custom)
    }
}

impl<'de> serde::Deserialize<'de> for Urn {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(UrnVisitor)
    }
}

/// Loosely typed input that can be turned into a [`Urn`].
#[derive(Debug, Clone)]
pub enum UrnInput {
    /// An already constructed URN, passed through unchanged.
    Urn(Urn),
    /// Text in the canonical string form.
    Text(String),
    /// A value from a JSON object graph; only strings are accepted.
    Json(serde_json::Value),
}

impl From<Urn> for UrnInput {
    fn from(urn: Urn) -> Self {
        UrnInput::Urn(urn)
    }
}

impl From<&Urn> for UrnInput {
    fn from(urn: &Urn) -> Self {
        UrnInput::Urn(urn.clone())
    }
}

impl From<String> for UrnInput {
    fn from(text: String) -> Self {
        UrnInput::Text(text)
    }
}

impl From<&str> for UrnInput {
    fn from(text: &str) -> Self {
        UrnInput::Text(text.to_string())
    }
}

impl From<serde_json::Value> for UrnInput {
    fn from(value: serde_json::Value) -> Self {
        UrnInput::Json(value)
    }
}

/// Normalises a URN or URN string into a [`Urn`].
pub fn ensure_urn(value: impl Into<UrnInput>) -> Result<Urn, UrnError> {
    Urn::coerce_from_value(value)
}

/// Normalises a sequence of URNs or URN strings, failing on the first bad one.
pub fn to_urn_list<I, T>(values: I) -> Result<Vec<Urn>, UrnError>
where
    I: IntoIterator<Item = T>,
    T: Into<UrnInput>,
{
    values.into_iter().map(Urn::coerce_from_value).collect()
}

// =============================================================================
// Tests
// =============================================================================
