//! Error taxonomy of the binding core.
//!
//! | Error | Recoverable | Where it ends up |
//! |-------|-------------|------------------|
//! | [`ConversionError`] | yes | field's validation error, returned from `validate()` |
//! | [`ValidationError::RequiredValueMissing`] | yes | same |
//! | [`ValidationError::ValidationFailed`] | yes | same |
//! | [`BindingStateError`] | no | returned to the caller, a logic bug |
//! | [`SourceError`] | caller decides | returned by value sources |

use std::fmt;

use crate::component::ComponentId;

/// Presentation ↔ model mapping failed (e.g. unparsable text).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ConversionError {
    message: String,
}

impl ConversionError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Why `validate()` rejected a field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error("{message}")]
    RequiredValueMissing { message: String },
    #[error("{message}")]
    ValidationFailed { message: String },
}

impl ValidationError {
    /// The user-facing message stored as the field's validation error.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Conversion(e) => e.message(),
            Self::RequiredValueMissing { message } | Self::ValidationFailed { message } => message,
        }
    }
}

/// Misuse of a binding lifecycle. Indicates a bug in the calling code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BindingStateError {
    #[error("binding is already active; unbind before activating again")]
    AlreadyActive,
    #[error("a source is already bound; unbind before binding another")]
    AlreadyBound,
    #[error("no source is bound")]
    NotBound,
    #[error("binding is not active")]
    NotActive,
}

/// A value source refused a write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("value source is read-only")]
    ReadOnly,
    #[error("instance container has no item loaded")]
    NoItem,
}

/// Writing a field value back through its binding failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    #[error(transparent)]
    State(#[from] BindingStateError),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// One failing component in a container-wide validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentError {
    pub id: ComponentId,
    pub caption: Option<String>,
    pub error: ValidationError,
}

/// Every failure found by [`Container::validate_all`](crate::Container::validate_all),
/// in depth-first order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ComponentError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ComponentError) {
        self.errors.push(error);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentError> {
        self.errors.iter()
    }

    /// The first failure, where a form would move focus.
    #[must_use]
    pub fn first(&self) -> Option<&ComponentError> {
        self.errors.first()
    }

    pub(crate) fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            match &e.caption {
                Some(caption) => write!(f, "{caption}: {}", e.error)?,
                None => write!(f, "{}", e.error)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
