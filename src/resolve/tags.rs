use serde_json::Value;

use super::str_field;
use crate::call::Kwargs;

/// Declarative mapping from a keyword argument to the fields read from it.
///
/// Entries keep their declaration order, and so do the tags they produce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagsFrom {
    entries: Vec<(String, Vec<String>)>,
}

impl TagsFrom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `fields` from the keyword argument `keyword`.
    pub fn field<I, S>(mut self, keyword: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .push((keyword.into(), fields.into_iter().map(Into::into).collect()));
        self
    }

    /// Build from a JSON object such as `{"message": ["type", "schema"]}`.
    ///
    /// Entries whose value is not an array are dropped, as are non-string
    /// field names. Anything but an object yields an empty mapping.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let entries = object
            .iter()
            .filter_map(|(keyword, fields)| {
                let fields = fields.as_array()?;
                let fields = fields
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect();
                Some((keyword.clone(), fields))
            })
            .collect();

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(keyword, fields)| (keyword.as_str(), fields.as_slice()))
    }
}

impl<K, I, S> FromIterator<(K, I)> for TagsFrom
where
    K: Into<String>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |tags, (keyword, fields)| tags.field(keyword, fields))
    }
}

/// Extract `field:value` tags from the keyword arguments.
///
/// Only first-level string fields of object-valued arguments are read;
/// anything missing, empty or of another type is skipped.
pub fn resolve_tags_from(tags_from: &TagsFrom, kwargs: &Kwargs) -> Vec<String> {
    let mut tags = Vec::new();

    for (keyword, fields) in tags_from.iter() {
        let Some(message) = kwargs.get(keyword).and_then(Value::as_object) else {
            continue;
        };

        for field in fields {
            if let Some(value) = str_field(message, field) {
                tags.push(format!("{field}:{value}"));
            }
        }
    }

    tags
}
