//! Resolvers that turn a call's arguments into identity, tags and trace id.
//!
//! None of them fail: a lookup that does not work out is skipped.

mod identity;
mod sli;
mod tags;
mod trace;

pub use identity::resolve_identity;
pub use sli::{resolve_observed_sli_tag, resolve_observed_sli_tag_with, SLI_THRESHOLDS};
pub use tags::{resolve_tags_from, TagsFrom};
pub use trace::{resolve_trace_id, TraceIdFrom};

use serde_json::{Map, Value};

/// Non-empty string value of `field` in `message`.
fn str_field<'m>(message: &'m Map<String, Value>, field: &str) -> Option<&'m str> {
    message
        .get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}
