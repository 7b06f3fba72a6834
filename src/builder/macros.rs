//! Macros for declaring lifecycle states and events.

/// Generate a State trait implementation for a simple enum.
///
/// # Example
///
/// ```
/// use lifecycle::state_enum;
///
/// state_enum! {
///     pub enum NetworkState {
///         Allocated,
///         Implemented,
///         Shutdown,
///         Destroyed,
///     }
///     final: [Destroyed]
/// }
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

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
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

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}

/// Generate an Event trait implementation for a simple enum.
///
/// # Example
///
/// ```
/// use lifecycle::event_enum;
///
/// event_enum! {
///     pub enum NetworkEvent {
///         ImplementNetwork,
///         ShutdownNetwork,
///         DestroyNetwork,
///     }
/// }
/// ```
#[macro_export]
macro_rules! event_enum {
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
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Event for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::Event::name(self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Event, State};

    state_enum! {
        enum TestState {
            Allocated,
            Ready,
            Destroyed,
            Error,
        }
        final: [Destroyed, Error]
        error: [Error]
    }

    event_enum! {
        enum TestEvent {
            Create,
            Destroy,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        let state = TestState::Allocated;
        assert_eq!(state.name(), "Allocated");
        assert!(!state.is_final());
        assert!(!state.is_error());

        assert!(TestState::Destroyed.is_final());
        assert!(!TestState::Destroyed.is_error());

        assert!(TestState::Error.is_final());
        assert!(TestState::Error.is_error());
        assert!(!TestState::Ready.is_final());
    }

    #[test]
    fn event_enum_macro_generates_trait() {
        assert_eq!(TestEvent::Create.name(), "Create");
        assert_eq!(TestEvent::Destroy.to_string(), "Destroy");
    }

    #[test]
    fn state_enum_works_without_final_error() {
        state_enum! {
            enum MinimalState {
                One,
                Two,
            }
        }

        let state = MinimalState::One;
        assert!(!state.is_final());
        assert!(!state.is_error());
        assert_eq!(MinimalState::Two.to_string(), "Two");
    }
}
