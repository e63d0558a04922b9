//! Form handle to entry partition routing
//!
//! Each form's entries live in their own partition, named after the form
//! handle with hyphens replaced by underscores.

use super::repository::FormRepository;
use crate::contract::{Form, FormsError};

/// Partition used when no form handle is supplied
pub const DEFAULT_PARTITION: &str = "entry_form";

/// Partition holding success email records
pub const SUCCESS_EMAIL_PARTITION: &str = "success_email";

/// Name of an entry partition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition(String);

impl Partition {
    /// Partition for a form handle; does not check that the form exists
    pub fn for_handle(handle: &str) -> Self {
        if handle.is_empty() {
            Self(DEFAULT_PARTITION.to_string())
        } else {
            Self(handle.replace('-', "_"))
        }
    }

    pub fn success_email() -> Self {
        Self(SUCCESS_EMAIL_PARTITION.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a handle would land in one of the fixed partitions
    pub fn is_reserved_handle(handle: &str) -> bool {
        let name = Self::for_handle(handle);
        name.0 == DEFAULT_PARTITION || name.0 == SUCCESS_EMAIL_PARTITION
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of routing a handle
#[derive(Debug, Clone)]
pub struct Resolved {
    pub partition: Partition,
    /// The owning form; `None` only for the default partition
    pub form: Option<Form>,
}

/// Route a form handle to its partition.
///
/// A non-empty handle must name an existing form, otherwise `FormNotFound`
/// is returned before any partition is touched. An empty handle routes to
/// [`DEFAULT_PARTITION`].
pub async fn resolve(forms: &dyn FormRepository, handle: &str) -> Result<Resolved, FormsError> {
    if handle.is_empty() {
        return Ok(Resolved {
            partition: Partition::for_handle(handle),
            form: None,
        });
    }

    let form = forms
        .find_by_handle(handle)
        .await
        .map_err(FormsError::storage)?
        .ok_or_else(|| FormsError::FormNotFound {
            handle: handle.to_string(),
        })?;

    let partition = Partition::for_handle(handle);
    tracing::debug!(form_handle = handle, %partition, "resolved entry partition");

    Ok(Resolved {
        partition,
        form: Some(form),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_normalization() {
        assert_eq!(Partition::for_handle("contact-us").as_str(), "contact_us");
        assert_eq!(Partition::for_handle("a-b-c").as_str(), "a_b_c");
        assert_eq!(Partition::for_handle("plain").as_str(), "plain");
        assert_eq!(Partition::for_handle("").as_str(), DEFAULT_PARTITION);
    }

    #[test]
    fn test_reserved_handles() {
        assert!(Partition::is_reserved_handle("success-email"));
        assert!(Partition::is_reserved_handle("entry_form"));
        assert!(Partition::is_reserved_handle(""));
        assert!(!Partition::is_reserved_handle("contact-us"));
    }
}
