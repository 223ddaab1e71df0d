use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A single metadata value.
///
/// exiftool hands everything back as text; the value cleaner
/// ([`crate::clean::values`]) upgrades strings to the typed variants where the
/// text matches. `Date` and `DateTime` keep their canonical hyphenated text
/// form rather than a calendar type, because exiftool emits nominally invalid
/// dates (a `2018:02:29` timestamp must survive coercion unharmed).
///
/// Nested `List`/`Map` values occur when an XMP tag carries structure that the
/// namespace unnesting could not collapse to a scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// An element with no text content at all.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// `YYYY-MM-DD`
    Date(String),
    /// `YYYY-MM-DD HH:MM:SS`
    DateTime(String),
    Str(String),
    List(Vec<TagValue>),
    Map(BTreeMap<String, TagValue>),
}

/// One file's metadata: cleaned tag name → value.
pub type TagMap = BTreeMap<String, TagValue>;

/// The full extraction result, keyed by each file's reconstructed
/// `Directory/FileName` path.
pub type MetadataMap = BTreeMap<String, TagMap>;

impl TagValue {
    /// Borrow the textual content of a string-like value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Str(s) | TagValue::Date(s) | TagValue::DateTime(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        TagValue::Str(s.to_string())
    }
}

impl From<String> for TagValue {
    fn from(s: String) -> Self {
        TagValue::Str(s)
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Null => Ok(()),
            TagValue::Bool(b) => write!(f, "{b}"),
            TagValue::Int(i) => write!(f, "{i}"),
            TagValue::Float(x) => write!(f, "{x}"),
            TagValue::Date(s) | TagValue::DateTime(s) | TagValue::Str(s) => f.write_str(s),
            TagValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            TagValue::Map(entries) => {
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for TagValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TagValue::Null => serializer.serialize_unit(),
            TagValue::Bool(b) => serializer.serialize_bool(*b),
            TagValue::Int(i) => serializer.serialize_i64(*i),
            TagValue::Float(x) => serializer.serialize_f64(*x),
            TagValue::Date(s) | TagValue::DateTime(s) | TagValue::Str(s) => {
                serializer.serialize_str(s)
            }
            TagValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            TagValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
