use core::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, SeqAccess, Visitor},
};

use crate::{Ulid, base32::BINARY_LEN};

/// Human-readable formats get the 26-character string, binary formats the 16
/// raw bytes.
impl Serialize for Ulid {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if s.is_human_readable() {
            s.serialize_str(&self.encode())
        } else {
            s.serialize_bytes(self.as_bytes())
        }
    }
}

/// Text input is decoded strictly.
impl<'de> Deserialize<'de> for Ulid {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        if d.is_human_readable() {
            d.deserialize_str(UlidVisitor)
        } else {
            d.deserialize_bytes(UlidVisitor)
        }
    }
}

struct UlidVisitor;

impl<'de> Visitor<'de> for UlidVisitor {
    type Value = Ulid;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a Crockford base32 encoded string or 16 bytes")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ulid::parse_strict(v).map_err(E::custom)
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ulid::from_slice(v).map_err(E::custom)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut bytes = [0_u8; BINARY_LEN];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = seq
                .next_element()?
                .ok_or_else(|| <A::Error as de::Error>::invalid_length(i, &self))?;
        }
        if seq.next_element::<u8>()?.is_some() {
            return Err(de::Error::invalid_length(BINARY_LEN + 1, &self));
        }
        Ok(Ulid::from_bytes(bytes))
    }
}

/// Serializes a [`Ulid`] as its 128-bit integer value.
///
/// ```
/// use rulid::Ulid;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Row {
///     #[serde(with = "rulid::as_u128")]
///     id: Ulid,
/// }
///
/// let json = serde_json::to_string(&Row { id: Ulid::from(42_u128) })?;
/// assert_eq!(json, r#"{"id":42}"#);
/// # Ok::<(), serde_json::Error>(())
/// ```
pub mod as_u128 {
    use super::*;

    pub fn serialize<S: Serializer>(id: &Ulid, s: S) -> Result<S::Ok, S::Error> {
        u128::from(*id).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Ulid, D::Error> {
        u128::deserialize(d).map(Ulid::from)
    }
}
