//! Faults raised by activities and the kind hierarchy used to match them.
//!
//! A fault's kind decides which recovery handlers run. Kinds form an
//! explicit hierarchy: every kind except the universal root names the next
//! less specific kind it falls back to. Recovery walks that hierarchy from
//! the concrete kind upward and stops before the root.

use std::collections::HashSet;
use std::error::Error;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::Arc;

/// Message carried by the error raised when no handler matches a fault.
pub const UNHANDLED_MESSAGE: &str = "The activity threw an exception";

/// A classification of faults with an explicitly declared fallback chain.
///
/// # Example
///
/// ```rust
/// use trellis::core::FaultKind;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum PaymentFault {
///     Any,
///     Gateway,
///     Declined,
///     Unhandled,
/// }
///
/// impl FaultKind for PaymentFault {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Any => "Any",
///             Self::Gateway => "Gateway",
///             Self::Declined => "Declined",
///             Self::Unhandled => "Unhandled",
///         }
///     }
///
///     fn fallback(&self) -> Option<Self> {
///         match self {
///             Self::Any => None,
///             Self::Gateway | Self::Unhandled => Some(Self::Any),
///             Self::Declined => Some(Self::Gateway),
///         }
///     }
///
///     fn unhandled() -> Self {
///         Self::Unhandled
///     }
/// }
///
/// let walk: Vec<_> = PaymentFault::Declined.lineage().collect();
/// assert_eq!(walk, vec![PaymentFault::Declined, PaymentFault::Gateway]);
/// ```
pub trait FaultKind: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Name used in logs and structural inspection.
    fn name(&self) -> &'static str;

    /// The next less specific kind, or `None` for the universal root.
    fn fallback(&self) -> Option<Self>;

    /// Kind given to the error raised when a guarded activity finds no
    /// handler for a fault.
    fn unhandled() -> Self;

    fn is_root(&self) -> bool {
        self.fallback().is_none()
    }

    /// Kinds probed when recovering from a fault of this kind, most
    /// specific first. The root kind is never yielded.
    fn lineage(self) -> Lineage<Self> {
        Lineage::new(self)
    }
}

/// Iterator over a kind and its fallbacks, excluding the universal root.
///
/// A kind already visited ends the walk, so a cyclic fallback declaration
/// cannot loop.
#[derive(Debug, Clone)]
pub struct Lineage<K> {
    next: Option<K>,
    visited: HashSet<K>,
}

impl<K: FaultKind> Lineage<K> {
    fn new(kind: K) -> Self {
        Self {
            next: Some(kind),
            visited: HashSet::from([kind]),
        }
    }
}

impl<K: FaultKind> Iterator for Lineage<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let kind = self.next.take()?;
        let parent = kind.fallback()?;
        if self.visited.insert(parent) {
            self.next = Some(parent);
        }
        Some(kind)
    }
}

/// An exception raised inside a behavior chain.
///
/// Faults captured by a guarded activity are shared through `Arc` so that
/// every handler sees the same instance.
#[derive(Debug)]
pub struct Fault<K> {
    kind: K,
    message: String,
    cause: Option<Arc<Fault<K>>>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl<K: FaultKind> Fault<K> {
    pub fn new(kind: K, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
            source: None,
        }
    }

    /// Raise a fault of `kind` for a foreign error, keeping it as the source.
    pub fn from_error<E>(kind: K, error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            kind,
            message: error.to_string(),
            cause: None,
            source: Some(Box::new(error)),
        }
    }

    /// Attach a foreign error as the source of this fault.
    pub fn with_source(mut self, source: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Wrap a fault no handler matched.
    pub fn unhandled(cause: Arc<Fault<K>>) -> Self {
        Self {
            kind: K::unhandled(),
            message: UNHANDLED_MESSAGE.to_string(),
            cause: Some(cause),
            source: None,
        }
    }

    pub fn kind(&self) -> K {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The original fault, when this is the wrapped unhandled error.
    pub fn cause(&self) -> Option<&Arc<Fault<K>>> {
        self.cause.as_ref()
    }

    pub fn is_unhandled(&self) -> bool {
        self.cause.is_some() && self.kind == K::unhandled()
    }
}

impl<K> fmt::Display for Fault<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl<K: FaultKind> Error for Fault<K> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Some(cause) = &self.cause {
            return Some(cause.as_ref() as &(dyn Error + 'static));
        }
        self.source
            .as_deref()
            .map(|source| source as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum TestFault {
        Root,
        Io,
        Timeout,
        Unhandled,
        Ping,
        Pong,
    }

    impl FaultKind for TestFault {
        fn name(&self) -> &'static str {
            match self {
                Self::Root => "Root",
                Self::Io => "Io",
                Self::Timeout => "Timeout",
                Self::Unhandled => "Unhandled",
                Self::Ping => "Ping",
                Self::Pong => "Pong",
            }
        }

        fn fallback(&self) -> Option<Self> {
            match self {
                Self::Root => None,
                Self::Io | Self::Unhandled => Some(Self::Root),
                Self::Timeout => Some(Self::Io),
                Self::Ping => Some(Self::Pong),
                Self::Pong => Some(Self::Ping),
            }
        }

        fn unhandled() -> Self {
            Self::Unhandled
        }
    }

    #[test]
    fn lineage_walks_most_specific_first() {
        let walk: Vec<_> = TestFault::Timeout.lineage().collect();
        assert_eq!(walk, vec![TestFault::Timeout, TestFault::Io]);
    }

    #[test]
    fn lineage_excludes_root() {
        assert_eq!(TestFault::Root.lineage().count(), 0);
        assert!(TestFault::Root.is_root());
        assert!(!TestFault::Io.is_root());
    }

    #[test]
    fn lineage_stops_on_cycle() {
        let walk: Vec<_> = TestFault::Ping.lineage().collect();
        assert_eq!(walk, vec![TestFault::Ping, TestFault::Pong]);
    }

    #[test]
    fn unhandled_fault_keeps_cause() {
        let original = Arc::new(Fault::new(TestFault::Timeout, "gateway timed out"));
        let wrapped = Fault::unhandled(Arc::clone(&original));

        assert!(wrapped.is_unhandled());
        assert_eq!(wrapped.kind(), TestFault::Unhandled);
        assert_eq!(wrapped.to_string(), UNHANDLED_MESSAGE);
        assert!(Arc::ptr_eq(wrapped.cause().unwrap(), &original));

        let source = wrapped.source().unwrap();
        assert_eq!(source.to_string(), "gateway timed out");
    }

    #[test]
    fn foreign_error_becomes_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let fault = Fault::from_error(TestFault::Io, io);

        assert_eq!(fault.message(), "disk full");
        assert!(!fault.is_unhandled());
        assert_eq!(fault.source().unwrap().to_string(), "disk full");
    }
}
