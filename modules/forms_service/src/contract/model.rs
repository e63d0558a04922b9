//! Contract models for forms service
//!
//! These models are transport-agnostic and used for inter-module communication.
//! Only `FormSettings` derives serde, since it is cast from a loose property bag.

use super::content::{ContentField, ContentMap};
use super::error::FormsError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

// ===== Forms =====

/// Form definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub id: Uuid,
    /// Unique slug
    pub handle: String,
    pub title: String,
    pub fields: FormFields,
    pub settings: FormSettings,
}

/// Either an ordered list of field keys or a reference to a layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormFields {
    Keys(Vec<String>),
    Layout(Uuid),
}

impl Default for FormFields {
    fn default() -> Self {
        Self::Keys(Vec::new())
    }
}

/// Form settings
///
/// Recognized keys are listed in [`FormSettings::RECOGNIZED_KEYS`]; anything
/// else in the source object is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSettings {
    /// Recipient address
    pub to: Option<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    /// Handle of the success email sent after submission
    pub success_email_handle: Option<String>,
    /// Form action URL
    pub action: Option<String>,
    /// Entry title template, e.g. `"Message from {name}"`
    pub entry_title: Option<String>,
}

impl FormSettings {
    pub const RECOGNIZED_KEYS: [&'static str; 6] = [
        "to",
        "cc",
        "bcc",
        "success_email_handle",
        "action",
        "entry_title",
    ];

    /// Cast a loose JSON object onto typed settings.
    ///
    /// `null` yields defaults. Unknown keys are dropped; a recognized key with
    /// the wrong type is a validation error.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, FormsError> {
        let object = match value {
            serde_json::Value::Null => return Ok(Self::default()),
            serde_json::Value::Object(object) => object,
            other => {
                return Err(FormsError::Validation {
                    message: format!("settings must be an object, got {}", other),
                })
            }
        };

        let known: serde_json::Map<String, serde_json::Value> = object
            .iter()
            .filter(|(key, _)| Self::RECOGNIZED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        serde_json::from_value(serde_json::Value::Object(known)).map_err(|e| {
            FormsError::Validation {
                message: format!("invalid form settings: {}", e),
            }
        })
    }

    /// Configured entry title template; empty counts as unset
    pub fn entry_title_template(&self) -> Option<&str> {
        self.entry_title.as_deref().filter(|t| !t.is_empty())
    }
}

/// Input for creating a form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewForm {
    /// Requested handle; empty falls back to the title
    pub handle: String,
    pub title: String,
    pub fields: FormFields,
    pub settings: FormSettings,
}

/// Input for updating a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormChanges {
    pub id: Uuid,
    pub handle: String,
    pub title: String,
    pub fields: FormFields,
    pub settings: FormSettings,
}

// ===== Entries =====

/// Unix timestamps (seconds) of an entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryDates {
    pub created: i64,
    pub updated: i64,
}

impl EntryDates {
    /// Fresh dates where creation and update coincide
    pub fn at(timestamp: i64) -> Self {
        Self {
            created: timestamp,
            updated: timestamp,
        }
    }
}

/// Submitted entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormEntry {
    pub id: Uuid,
    pub form_handle: String,
    pub locale: String,
    /// Title rendered from the template and content
    pub title: String,
    /// Template identifier
    pub template: String,
    pub dates: EntryDates,
    pub content: ContentMap,
    pub viewed: bool,
    pub site_id: Option<String>,
    pub trashed: bool,
}

/// Input for creating an entry; the title comes from the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntry {
    pub form_handle: String,
    pub locale: String,
    pub template: String,
    pub content: Vec<ContentField>,
    pub site_id: Option<String>,
}

/// Input for updating an entry or a success email
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryChanges {
    pub form_handle: String,
    pub locale: String,
    /// Title template rendered against `content`
    pub title: String,
    pub template: String,
    /// Dates as seen by the caller; the stored `created` is kept and
    /// `updated` is set to the time of the update
    pub dates: EntryDates,
    pub content: Vec<ContentField>,
    pub site_id: Option<String>,
    pub trashed: bool,
}

/// Input for creating a success email
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSuccessEmail {
    pub form_handle: String,
    pub locale: String,
    /// Title template rendered against `content`
    pub title: String,
    pub template: String,
    pub content: Vec<ContentField>,
    pub site_id: Option<String>,
}

// ===== Listing =====

/// Comparison applied by a date search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOperator {
    /// created <= date
    Before,
    /// created >= date
    After,
    /// created == date
    Exact,
}

impl FromStr for DateOperator {
    type Err = std::convert::Infallible;

    /// Anything other than `BEFORE` or `AFTER` is an exact match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "BEFORE" => Self::Before,
            "AFTER" => Self::After,
            _ => Self::Exact,
        })
    }
}

/// Created-date filter; a zero date disables it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSearch {
    pub date: i64,
    pub operator: DateOperator,
}

impl Default for DateSearch {
    fn default() -> Self {
        Self {
            date: 0,
            operator: DateOperator::Before,
        }
    }
}

impl DateSearch {
    pub fn new(date: i64, operator: DateOperator) -> Self {
        Self { date, operator }
    }

    pub fn is_active(&self) -> bool {
        self.date > 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `DESC` sorts descending; every other order string ascends.
    pub fn from_order(order: &str) -> Self {
        if order == "DESC" {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    /// Document-store sort value (`1` / `-1`)
    pub fn as_i8(self) -> i8 {
        match self {
            Self::Asc => 1,
            Self::Desc => -1,
        }
    }
}

/// Listing request; `None` fields take configured defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEntriesRequest {
    /// Page number as supplied by the caller (not clamped)
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub date_search: Option<DateSearch>,
    /// Case-insensitive pattern matched against the title
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<SortDirection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub pages: u64,
    pub total: u64,
}

/// Paginated result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    pub pagination: Pagination,
    pub items: Vec<T>,
}

// ===== Access =====

/// Caller identity handed to the access-control collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Option<String>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }
}

/// What a permission-checked read is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadScope {
    Forms,
    Entries { form_handle: String },
}

impl std::fmt::Display for ReadScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forms => write!(f, "forms"),
            Self::Entries { form_handle } => write!(f, "entries of form \"{}\"", form_handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_settings_ignore_unknown_keys() {
        let settings = FormSettings::from_value(&json!({
            "to": "ops@example.com",
            "cc": ["a@example.com"],
            "entry_title": "Message from {name}",
            "colour": "blue"
        }))
        .unwrap();

        assert_eq!(settings.to.as_deref(), Some("ops@example.com"));
        assert_eq!(settings.cc, vec!["a@example.com".to_string()]);
        assert!(settings.bcc.is_empty());
        assert_eq!(settings.entry_title_template(), Some("Message from {name}"));
    }

    #[test]
    fn test_settings_reject_wrong_type_for_known_key() {
        let err = FormSettings::from_value(&json!({ "cc": "not-a-list" })).unwrap_err();
        assert_eq!(err.code(), 5005);
    }

    #[test]
    fn test_empty_entry_title_counts_as_unset() {
        let settings = FormSettings {
            entry_title: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(settings.entry_title_template(), None);
    }

    #[test]
    fn test_date_operator_parsing() {
        assert_eq!("BEFORE".parse::<DateOperator>().unwrap(), DateOperator::Before);
        assert_eq!("AFTER".parse::<DateOperator>().unwrap(), DateOperator::After);
        assert_eq!("ON".parse::<DateOperator>().unwrap(), DateOperator::Exact);
        assert!(!DateSearch::default().is_active());
    }

    #[test]
    fn test_sort_direction_from_order() {
        assert_eq!(SortDirection::from_order("DESC").as_i8(), -1);
        assert_eq!(SortDirection::from_order("ASC").as_i8(), 1);
        assert_eq!(SortDirection::from_order("desc"), SortDirection::Asc);
    }
}
