use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

use crate::telemetry::MetricError;
use crate::util::short_type_name;

/// Identity of an error kind, compared exactly: a kind never matches its
/// "parent" or any wrapper around it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorKind {
    path: Cow<'static, str>,
}

impl ErrorKind {
    /// Kind of the Rust type `T`.
    pub fn of<T: ?Sized>() -> Self {
        Self {
            path: Cow::Borrowed(std::any::type_name::<T>()),
        }
    }

    /// Kind with an explicit path, for errors that carry their kind as data.
    pub fn named(path: impl Into<Cow<'static, str>>) -> Self {
        Self { path: path.into() }
    }

    /// Kind of an [`std::io::Error`] with the given [`std::io::ErrorKind`].
    pub fn io(kind: std::io::ErrorKind) -> Self {
        Self::named(format!("io::{kind:?}"))
    }

    /// Short name, as used in logs and the `exception:` tag.
    pub fn name(&self) -> &str {
        short_type_name(&self.path)
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An error the observer can classify.
///
/// The default kind is the implementing type itself. Enums that want their
/// variants told apart override [`kind`](Fault::kind).
pub trait Fault: std::error::Error + 'static {
    fn kind(&self) -> ErrorKind {
        ErrorKind::of::<Self>()
    }

    /// Backtrace captured where the error was raised, if it carries one.
    fn backtrace(&self) -> Option<&Backtrace> {
        None
    }
}

impl Fault for std::io::Error {
    fn kind(&self) -> ErrorKind {
        ErrorKind::io(std::io::Error::kind(self))
    }
}

impl Fault for serde_json::Error {}

impl Fault for MetricError {}

/// Classification of one call's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T, E> {
    Success(T),
    /// Failed with a kind in `accept_on`
    Accepted(E),
    /// Failed with a kind in `decline_on`
    Declined(E),
    /// Failed with any other kind
    Unhandled(E),
}

impl<T, E: Fault> Outcome<T, E> {
    /// Classify a result. `accept_on` is consulted before `decline_on`.
    pub fn classify(result: Result<T, E>, accept_on: &[ErrorKind], decline_on: &[ErrorKind]) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(e) => {
                let kind = e.kind();
                if accept_on.contains(&kind) {
                    Outcome::Accepted(e)
                } else if decline_on.contains(&kind) {
                    Outcome::Declined(e)
                } else {
                    Outcome::Unhandled(e)
                }
            }
        }
    }
}

impl<T, E> Outcome<T, E> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Accepted(e) | Outcome::Declined(e) | Outcome::Unhandled(e) => Some(e),
        }
    }

    /// Past-tense verb used in failure reports.
    pub fn verb(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "finished",
            Outcome::Accepted(_) => "accepted",
            Outcome::Declined(_) => "declined",
            Outcome::Unhandled(_) => "raised",
        }
    }

    /// Suffix of the elapsed-time metric.
    pub fn timing_suffix(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "time.finished",
            Outcome::Accepted(_) => "time.accepted",
            Outcome::Declined(_) => "time.declined",
            Outcome::Unhandled(_) => "time.raised",
        }
    }

    /// Suffix of the outcome counter.
    pub fn counter_suffix(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "finished",
            Outcome::Accepted(_) => "exception.accepted",
            Outcome::Declined(_) => "exception.declined",
            Outcome::Unhandled(_) => "exception.raised",
        }
    }
}

/// What an observed call hands back when it did not raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled<T> {
    /// The callable's own result, unchanged
    Finished(T),
    /// Failed with an accepted kind; the work should be acknowledged
    Accepted,
    /// Failed with a declined kind; the work should not be acknowledged
    Declined,
}

impl<T> Handled<T> {
    /// `Some(true)` when accepted, `Some(false)` when declined, `None` when
    /// the callable finished.
    pub fn acknowledged(&self) -> Option<bool> {
        match self {
            Handled::Finished(_) => None,
            Handled::Accepted => Some(true),
            Handled::Declined => Some(false),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Handled::Finished(_))
    }

    /// The callable's result, if it finished.
    pub fn into_response(self) -> Option<T> {
        match self {
            Handled::Finished(value) => Some(value),
            Handled::Accepted | Handled::Declined => None,
        }
    }
}

/// Error returned by an observed call.
#[derive(Error, Debug)]
pub enum ObserveError<E: std::error::Error + 'static> {
    /// The callable's own error, unchanged
    #[error(transparent)]
    Raised(E),

    /// A metric sink could not record an emission
    #[error(transparent)]
    Metric(#[from] MetricError),
}

impl<E: std::error::Error + 'static> ObserveError<E> {
    pub fn raised(&self) -> Option<&E> {
        match self {
            ObserveError::Raised(e) => Some(e),
            ObserveError::Metric(_) => None,
        }
    }

    pub fn into_raised(self) -> Option<E> {
        match self {
            ObserveError::Raised(e) => Some(e),
            ObserveError::Metric(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("accept me")]
    struct AcceptMe;
    impl Fault for AcceptMe {}

    #[derive(Debug, Error)]
    #[error("decline me")]
    struct DeclineMe;
    impl Fault for DeclineMe {}

    #[derive(Debug, Error)]
    enum Consumer {
        #[error("bad schema")]
        Schema,
        #[error("gone")]
        Gone,
    }

    impl Fault for Consumer {
        fn kind(&self) -> ErrorKind {
            match self {
                Consumer::Schema => ErrorKind::named("consumer::Schema"),
                Consumer::Gone => ErrorKind::named("consumer::Gone"),
            }
        }
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::of::<AcceptMe>().name(), "AcceptMe");
        assert!(ErrorKind::of::<AcceptMe>().path().ends_with("::AcceptMe"));
        assert_eq!(ErrorKind::io(std::io::ErrorKind::NotFound).name(), "NotFound");
        assert_eq!(ErrorKind::named("consumer::Schema").to_string(), "Schema");
    }

    #[test]
    fn test_kinds_compare_exactly() {
        assert_eq!(AcceptMe.kind(), ErrorKind::of::<AcceptMe>());
        assert_ne!(AcceptMe.kind(), DeclineMe.kind());
        assert_ne!(ErrorKind::named("a::Schema"), ErrorKind::named("b::Schema"));

        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "slow");
        assert_eq!(Fault::kind(&io), ErrorKind::io(std::io::ErrorKind::TimedOut));
        assert_ne!(Fault::kind(&io), ErrorKind::of::<std::io::Error>());
    }

    #[test]
    fn test_classify() {
        let accept = [ErrorKind::of::<Consumer>(), ErrorKind::named("consumer::Schema")];
        let decline = [ErrorKind::named("consumer::Gone")];

        let ok: Outcome<u8, Consumer> = Outcome::classify(Ok(1), &accept, &decline);
        assert!(ok.is_success());

        let schema = Outcome::<(), _>::classify(Err(Consumer::Schema), &accept, &decline);
        assert!(matches!(schema, Outcome::Accepted(Consumer::Schema)));

        let gone = Outcome::<(), _>::classify(Err(Consumer::Gone), &accept, &decline);
        assert!(matches!(gone, Outcome::Declined(Consumer::Gone)));

        let other = Outcome::<(), _>::classify(Err(Consumer::Gone), &[], &[]);
        assert!(matches!(other, Outcome::Unhandled(Consumer::Gone)));
    }

    #[test]
    fn test_accept_checked_before_decline() {
        let both = [ErrorKind::of::<AcceptMe>()];
        let outcome = Outcome::<(), _>::classify(Err(AcceptMe), &both, &both);
        assert!(matches!(outcome, Outcome::Accepted(AcceptMe)));
    }

    #[test]
    fn test_suffixes() {
        let cases: [(Outcome<(), AcceptMe>, &str, &str, &str); 4] = [
            (Outcome::Success(()), "finished", "time.finished", "finished"),
            (Outcome::Accepted(AcceptMe), "accepted", "time.accepted", "exception.accepted"),
            (Outcome::Declined(AcceptMe), "declined", "time.declined", "exception.declined"),
            (Outcome::Unhandled(AcceptMe), "raised", "time.raised", "exception.raised"),
        ];
        for (outcome, verb, timing, counter) in cases {
            assert_eq!(outcome.verb(), verb);
            assert_eq!(outcome.timing_suffix(), timing);
            assert_eq!(outcome.counter_suffix(), counter);
            assert_eq!(outcome.error().is_none(), outcome.is_success());
        }
    }

    #[test]
    fn test_handled() {
        assert_eq!(Handled::Finished(3).acknowledged(), None);
        assert_eq!(Handled::<u8>::Accepted.acknowledged(), Some(true));
        assert_eq!(Handled::<u8>::Declined.acknowledged(), Some(false));
        assert_eq!(Handled::Finished("r").into_response(), Some("r"));
        assert_eq!(Handled::<u8>::Declined.into_response(), None);
    }

    #[test]
    fn test_observe_error_is_transparent() {
        let raised: ObserveError<DeclineMe> = ObserveError::Raised(DeclineMe);
        assert_eq!(raised.to_string(), "decline me");
        assert!(raised.raised().is_some());

        let metric: ObserveError<DeclineMe> =
            MetricError::IncrementNotImplemented("MetricSink").into();
        assert!(metric.raised().is_none());
        assert!(metric.into_raised().is_none());
    }
}
