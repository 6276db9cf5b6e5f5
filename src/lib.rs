//! observe - standardized logging, metrics and notifications around a call
//!
//! Wrap a callable with an [`Observer`] and every invocation is timed,
//! classified as finished, accepted, declined or raised, and reported through
//! the logger, metric sink and notifier it can locate.
//!
//! ```rust,ignore
//! let defaults = Arc::new(Defaults::from_env()?);
//! let consume = Observe::new("orders.consume")
//!     .accept_on([ErrorKind::of::<Duplicate>()])
//!     .trace_id_from(TraceIdFrom::new().field("message", "eventId"))
//!     .build(defaults)
//!     .wrap("consume", |args, kwargs| handle(args, kwargs));
//!
//! match consume.call(&[], &kwargs)? {
//!     Handled::Finished(receipt) => store(receipt),
//!     handled => ack(handled.acknowledged() == Some(true)),
//! }
//! ```

pub mod call;
pub mod cli;
pub mod notify;
pub mod observer;
pub mod provider;
pub mod resolve;
pub mod telemetry;
pub mod util;

pub use call::{Arg, CallContext, Component, Kwargs};
pub use notify::{Notifier, NotifyError, SlackNotifier};
pub use observer::{ErrorKind, Fault, Handled, Observe, ObserveConfig, ObserveError, Observed, Observer, Outcome};
pub use provider::{Defaults, SetupError};
pub use resolve::{TagsFrom, TraceIdFrom};
pub use telemetry::{Logger, MemoryMetrics, MetricError, MetricSink, StatsdClient, TracingLogger};
