//! Collaborator traits for data access and access control
//!
//! `EntryStore` is a document-store contract: every call names the partition
//! it works on, and filters/options mirror what a document database accepts.
//! Implementations are in infra/storage.

use crate::contract::{
    AuthContext, ContentMap, Form, FormEntry, ReadScope, SortDirection,
};
use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use uuid::Uuid;

/// Bound on the created timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatedBound {
    AtMost(i64),
    AtLeast(i64),
    Exactly(i64),
}

impl CreatedBound {
    pub fn contains(&self, created: i64) -> bool {
        match *self {
            Self::AtMost(date) => created <= date,
            Self::AtLeast(date) => created >= date,
            Self::Exactly(date) => created == date,
        }
    }
}

/// Entry filter; unset criteria match everything
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub ids: Option<Vec<Uuid>>,
    pub form_handle: Option<String>,
    pub title: Option<Regex>,
    pub created: Option<CreatedBound>,
}

impl EntryFilter {
    pub fn by_id(id: Uuid) -> Self {
        Self::by_ids(vec![id])
    }

    pub fn by_ids(ids: Vec<Uuid>) -> Self {
        Self {
            ids: Some(ids),
            ..Default::default()
        }
    }

    pub fn by_form_handle(handle: impl Into<String>) -> Self {
        Self {
            form_handle: Some(handle.into()),
            ..Default::default()
        }
    }

    pub fn matches(&self, entry: &FormEntry) -> bool {
        if let Some(ids) = &self.ids {
            if !ids.contains(&entry.id) {
                return false;
            }
        }
        if let Some(handle) = &self.form_handle {
            if &entry.form_handle != handle {
                return false;
            }
        }
        if let Some(title) = &self.title {
            if !title.is_match(&entry.title) {
                return false;
            }
        }
        if let Some(bound) = &self.created {
            if !bound.contains(entry.dates.created) {
                return false;
            }
        }
        true
    }
}

/// Field-level `$set` update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub form_handle: Option<String>,
    pub locale: Option<String>,
    pub title: Option<String>,
    pub template: Option<String>,
    /// New `dates.updated`; `dates.created` is never patched
    pub updated: Option<i64>,
    pub content: Option<ContentMap>,
    pub site_id: Option<Option<String>>,
    pub trashed: Option<bool>,
    pub viewed: Option<bool>,
}

impl EntryPatch {
    pub fn viewed() -> Self {
        Self {
            viewed: Some(true),
            ..Default::default()
        }
    }

    pub fn apply(&self, entry: &mut FormEntry) {
        if let Some(v) = &self.form_handle {
            entry.form_handle = v.clone();
        }
        if let Some(v) = &self.locale {
            entry.locale = v.clone();
        }
        if let Some(v) = &self.title {
            entry.title = v.clone();
        }
        if let Some(v) = &self.template {
            entry.template = v.clone();
        }
        if let Some(v) = self.updated {
            entry.dates.updated = v;
        }
        if let Some(v) = &self.content {
            entry.content = v.clone();
        }
        if let Some(v) = &self.site_id {
            entry.site_id = v.clone();
        }
        if let Some(v) = self.trashed {
            entry.trashed = v;
        }
        if let Some(v) = self.viewed {
            entry.viewed = v;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Query options passed to `EntryStore::find`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Records to skip; stores treat a negative value as zero
    pub skip: i64,
    /// Maximum records returned; zero means unlimited
    pub limit: i64,
    pub sort: Option<SortSpec>,
    /// Locale used for string comparison while sorting
    pub collation: Option<String>,
}

/// Document store for entries, partitioned by name
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Insert an entry, creating the partition on first use
    async fn insert(&self, partition: &str, entry: &FormEntry) -> Result<()>;

    /// Find entries matching a filter
    async fn find(
        &self,
        partition: &str,
        filter: &EntryFilter,
        options: &FindOptions,
    ) -> Result<Vec<FormEntry>>;

    /// Find the first entry matching a filter
    async fn find_one(&self, partition: &str, filter: &EntryFilter) -> Result<Option<FormEntry>>;

    /// Find an entry by id
    async fn find_by_id(&self, partition: &str, id: Uuid) -> Result<Option<FormEntry>> {
        self.find_one(partition, &EntryFilter::by_id(id)).await
    }

    /// Count entries matching a filter
    async fn count(&self, partition: &str, filter: &EntryFilter) -> Result<u64>;

    /// Apply a patch to the first matching entry; returns the matched count
    async fn update_one(
        &self,
        partition: &str,
        filter: &EntryFilter,
        patch: &EntryPatch,
    ) -> Result<u64>;

    /// Delete the first matching entry; returns the deleted count
    async fn delete_one(&self, partition: &str, filter: &EntryFilter) -> Result<u64>;

    /// Delete every matching entry; returns the deleted count
    async fn delete_many(&self, partition: &str, filter: &EntryFilter) -> Result<u64>;
}

/// Repository for form definitions
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Insert a new form
    async fn insert(&self, form: &Form) -> Result<()>;

    /// Find a form by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Form>>;

    /// Find a form by handle
    async fn find_by_handle(&self, handle: &str) -> Result<Option<Form>>;

    /// Count forms using a handle
    async fn count_by_handle(&self, handle: &str) -> Result<u64>;

    /// Replace a form; returns the matched count
    async fn update(&self, form: &Form) -> Result<u64>;

    /// Delete forms by id; returns the deleted count
    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64>;

    /// List all forms
    async fn list_all(&self) -> Result<Vec<Form>>;
}

/// Read-permission check consulted by listing entry points
#[async_trait]
pub trait AccessControl: Send + Sync {
    async fn can_read(&self, ctx: &AuthContext, scope: &ReadScope) -> Result<bool>;
}

/// Grants every read
pub struct AllowAll;

#[async_trait]
impl AccessControl for AllowAll {
    async fn can_read(&self, _ctx: &AuthContext, _scope: &ReadScope) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{ContentField, EntryDates};

    fn entry(title: &str, created: i64) -> FormEntry {
        FormEntry {
            id: Uuid::new_v4(),
            form_handle: "contact-us".to_string(),
            locale: "en".to_string(),
            title: title.to_string(),
            template: "default".to_string(),
            dates: EntryDates::at(created),
            content: ContentMap::new(),
            viewed: false,
            site_id: None,
            trashed: false,
        }
    }

    #[test]
    fn test_filter_combines_criteria() {
        let e = entry("Message from Alice", 500);
        let filter = EntryFilter {
            title: Some(Regex::new("(?i)alice").unwrap()),
            created: Some(CreatedBound::AtMost(1000)),
            ..Default::default()
        };
        assert!(filter.matches(&e));

        let filter = EntryFilter {
            title: Some(Regex::new("(?i)alice").unwrap()),
            created: Some(CreatedBound::AtLeast(1000)),
            ..Default::default()
        };
        assert!(!filter.matches(&e));
        assert!(!EntryFilter::by_id(Uuid::new_v4()).matches(&e));
        assert!(EntryFilter::default().matches(&e));
    }

    #[test]
    fn test_patch_only_touches_set_fields() {
        let mut e = entry("Old", 10);
        let content =
            ContentMap::from_fields(vec![ContentField::new("name", "Bob")]).unwrap();
        EntryPatch {
            title: Some("New".to_string()),
            content: Some(content.clone()),
            ..Default::default()
        }
        .apply(&mut e);

        assert_eq!(e.title, "New");
        assert_eq!(e.content, content);
        assert_eq!(e.dates, EntryDates::at(10));
        assert_eq!(e.locale, "en");
        assert!(!e.viewed);

        EntryPatch::viewed().apply(&mut e);
        assert!(e.viewed);
        assert_eq!(e.title, "New");
    }

    #[test]
    fn test_patch_refreshes_only_updated_date() {
        let mut e = entry("Old", 10);
        EntryPatch {
            updated: Some(99),
            ..Default::default()
        }
        .apply(&mut e);
        assert_eq!(e.dates.created, 10);
        assert_eq!(e.dates.updated, 99);
    }
}
