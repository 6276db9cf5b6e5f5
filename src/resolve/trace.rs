use serde_json::Value;

use super::str_field;
use crate::call::Kwargs;

/// Declarative mapping from a keyword argument to the field holding the trace id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceIdFrom {
    entries: Vec<(String, String)>,
}

impl TraceIdFrom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try `field` of the keyword argument `keyword`, after any earlier entries.
    pub fn field(mut self, keyword: impl Into<String>, field: impl Into<String>) -> Self {
        self.entries.push((keyword.into(), field.into()));
        self
    }

    /// Build from a JSON object such as `{"message": "eventId"}`.
    ///
    /// Non-string field names are dropped; anything but an object yields an
    /// empty mapping.
    pub fn from_value(value: &Value) -> Self {
        let entries = value
            .as_object()
            .map(|object| {
                object
                    .iter()
                    .filter_map(|(keyword, field)| {
                        field.as_str().map(|f| (keyword.clone(), f.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(keyword, field)| (keyword.as_str(), field.as_str()))
    }
}

impl<K: Into<String>, F: Into<String>> FromIterator<(K, F)> for TraceIdFrom {
    fn from_iter<T: IntoIterator<Item = (K, F)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |trace, (keyword, field)| trace.field(keyword, field))
    }
}

/// First non-empty string found by the mapping, or an empty string.
pub fn resolve_trace_id(trace_id_from: &TraceIdFrom, kwargs: &Kwargs) -> String {
    trace_id_from
        .iter()
        .find_map(|(keyword, field)| {
            let message = kwargs.get(keyword)?.as_object()?;
            str_field(message, field)
        })
        .unwrap_or_default()
        .to_string()
}
