//! Macros for declaring fault kinds and states with minimal boilerplate.

/// Generate a fault kind enum and its `FaultKind` implementation.
///
/// Each variant may name its fallback after a colon. A variant without one
/// is a universal root. The `unhandled:` variant is the kind given to the
/// error a guarded activity raises when no handler matches.
///
/// # Example
///
/// ```
/// use trellis::core::FaultKind;
/// use trellis::fault_kind;
///
/// fault_kind! {
///     pub enum PaymentFault {
///         Any,
///         Gateway: Any,
///         Timeout: Gateway,
///         Declined: Any,
///         Unhandled: Any,
///     }
///     unhandled: Unhandled
/// }
///
/// assert_eq!(PaymentFault::Timeout.fallback(), Some(PaymentFault::Gateway));
/// assert!(PaymentFault::Any.is_root());
/// assert_eq!(PaymentFault::unhandled(), PaymentFault::Unhandled);
/// ```
#[macro_export]
macro_rules! fault_kind {
    (@fallback) => { None };
    (@fallback $parent:ident) => { Some(Self::$parent) };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(: $parent:ident)?
            ),* $(,)?
        }

        unhandled: $unhandled:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::FaultKind for $name {
            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn fallback(&self) -> Option<Self> {
                match self {
                    $(Self::$variant => $crate::fault_kind!(@fallback $($parent)?)),*
                }
            }

            fn unhandled() -> Self {
                Self::$unhandled
            }
        }
    };
}

/// Generate a `State` implementation for a simple enum.
///
/// # Example
///
/// ```
/// use trellis::core::State;
/// use trellis::state_enum;
///
/// state_enum! {
///     pub enum OrderState {
///         Pending,
///         Paid,
///         Shipped,
///         Cancelled,
///     }
/// }
///
/// assert_eq!(OrderState::Paid.name(), "Paid");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
