//! Contract error types for forms service
//!
//! These errors are transport-agnostic and used for inter-module communication.
//! Every variant carries a stable numeric code that prefixes its message.

/// Forms service domain errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormsError {
    /// No form is registered under the handle
    FormNotFound {
        /// Requested form handle
        handle: String,
    },
    /// A content or field key appears more than once
    DuplicateFieldKey {
        /// Offending key
        key: String,
    },
    /// Entry (or form) id lookup returned nothing
    EntryDoesNotExist {
        /// Requested identifier
        id: String,
    },
    /// A success email is already stored for the form
    SuccessEmailExists {
        /// Owning form handle
        form_handle: String,
    },
    /// Invalid request input
    Validation {
        /// Validation error message
        message: String,
    },
    /// Access-control collaborator refused the read
    PermissionDenied {
        /// Resource the caller tried to read
        scope: String,
    },
    /// Storage collaborator failure
    Storage {
        /// Failure details
        message: String,
    },
}

impl FormsError {
    /// Stable numeric code for this error kind
    pub fn code(&self) -> u16 {
        match self {
            Self::FormNotFound { .. } => 5001,
            Self::DuplicateFieldKey { .. } => 5002,
            Self::EntryDoesNotExist { .. } => 5003,
            Self::SuccessEmailExists { .. } => 5004,
            Self::Validation { .. } => 5005,
            Self::PermissionDenied { .. } => 5006,
            Self::Storage { .. } => 5007,
        }
    }

    pub(crate) fn storage(error: anyhow::Error) -> Self {
        Self::Storage {
            message: format!("{:#}", error),
        }
    }
}

impl std::fmt::Display for FormsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.code())?;
        match self {
            Self::FormNotFound { handle } => {
                write!(f, "Form handle \"{}\" does not exist", handle)
            }
            Self::DuplicateFieldKey { key } => {
                write!(f, "Field key \"{}\" already exists", key)
            }
            Self::EntryDoesNotExist { id } => {
                write!(f, "Entry \"{}\" does not exist", id)
            }
            Self::SuccessEmailExists { form_handle } => {
                write!(f, "Success email for form \"{}\" already exists", form_handle)
            }
            Self::Validation { message } => {
                write!(f, "Validation error: {}", message)
            }
            Self::PermissionDenied { scope } => {
                write!(f, "Permission denied: {}", scope)
            }
            Self::Storage { message } => {
                write!(f, "Storage error: {}", message)
            }
        }
    }
}

impl std::error::Error for FormsError {}
