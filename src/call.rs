//! Call context: the positional and keyword arguments of one observed call.
//!
//! Positional arguments are opaque to the observer. It only asks each one
//! whether it *is* a logger, metric sink or notifier, or whether it *exposes*
//! one (a [`Component`], typically the receiver of a method call).

use serde_json::{Map, Value};

use crate::notify::Notifier;
use crate::telemetry::{Logger, MetricSink};
use crate::util::type_name_of;

/// Keyword arguments, keyed by parameter name.
pub type Kwargs = Map<String, Value>;

/// An object that can expose collaborators and an identity to the observer.
///
/// Every method is optional.
///
/// ```rust,ignore
/// struct Consumer { metrics: StatsdClient }
///
/// impl Component for Consumer {
///     fn identity(&self) -> Option<&str> { Some("orders-consumer") }
///     fn metric(&self) -> Option<&dyn MetricSink> { Some(&self.metrics) }
/// }
/// ```
pub trait Component {
    /// Label used instead of the type name in identities.
    fn identity(&self) -> Option<&str> {
        None
    }

    fn type_name(&self) -> &'static str {
        type_name_of::<Self>()
    }

    fn logger(&self) -> Option<&dyn Logger> {
        None
    }

    fn metric(&self) -> Option<&dyn MetricSink> {
        None
    }

    fn notifier(&self) -> Option<&dyn Notifier> {
        None
    }
}

/// One positional argument.
#[derive(Clone, Copy)]
pub enum Arg<'a> {
    Component(&'a dyn Component),
    Logger(&'a dyn Logger),
    Metric(&'a dyn MetricSink),
    Notifier(&'a dyn Notifier),
    /// Plain data, only ever inspected for its kind
    Value(&'a Value),
}

impl<'a> Arg<'a> {
    pub fn component<C: Component>(component: &'a C) -> Self {
        Arg::Component(component)
    }

    /// Name of the argument's type: the Rust type for capabilities, the JSON
    /// kind for plain values.
    pub fn type_name(&self) -> &'static str {
        match *self {
            Arg::Component(c) => c.type_name(),
            Arg::Logger(l) => l.type_name(),
            Arg::Metric(m) => m.type_name(),
            Arg::Notifier(n) => n.type_name(),
            Arg::Value(v) => json_kind(v),
        }
    }

    pub fn identity(&self) -> Option<&'a str> {
        match *self {
            Arg::Component(c) => c.identity(),
            _ => None,
        }
    }

    /// The argument itself as a logger, else the logger it exposes.
    pub fn logger(&self) -> Option<&'a dyn Logger> {
        match *self {
            Arg::Logger(l) => Some(l),
            Arg::Component(c) => c.logger(),
            _ => None,
        }
    }

    /// The argument itself as a metric sink, else the sink it exposes.
    pub fn metric(&self) -> Option<&'a dyn MetricSink> {
        match *self {
            Arg::Metric(m) => Some(m),
            Arg::Component(c) => c.metric(),
            _ => None,
        }
    }

    /// The argument itself as a notifier, else the notifier it exposes.
    pub fn notifier(&self) -> Option<&'a dyn Notifier> {
        match *self {
            Arg::Notifier(n) => Some(n),
            Arg::Component(c) => c.notifier(),
            _ => None,
        }
    }
}

impl<'a> From<&'a Value> for Arg<'a> {
    fn from(value: &'a Value) -> Self {
        Arg::Value(value)
    }
}

impl std::fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arg::Value(v) => f.debug_tuple("Value").field(v).finish(),
            other => f.debug_tuple(other.type_name()).finish(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Everything the observer may inspect about one invocation.
#[derive(Debug, Clone, Copy)]
pub struct CallContext<'a> {
    pub args: &'a [Arg<'a>],
    pub kwargs: &'a Kwargs,
    /// Declared name of the wrapped callable
    pub name: Option<&'a str>,
}

impl<'a> CallContext<'a> {
    pub fn new(args: &'a [Arg<'a>], kwargs: &'a Kwargs) -> Self {
        Self {
            args,
            kwargs,
            name: None,
        }
    }

    pub fn named(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }
}
