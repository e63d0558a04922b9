//! In-memory document store
//!
//! Partitions are created lazily on first insert and cached by name. Each
//! partition keeps entries in insertion order behind its own lock, so writes
//! to different partitions never contend.

use crate::contract::{Form, FormEntry};
use crate::domain::repository::{
    EntryFilter, EntryPatch, EntryStore, FindOptions, FormRepository, SortSpec,
};
use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::sync::Arc;
use uuid::Uuid;

type PartitionHandle = Arc<RwLock<Vec<FormEntry>>>;

// ===== Entry Store =====

#[derive(Default)]
pub struct InMemoryEntryStore {
    partitions: DashMap<String, PartitionHandle>,
}

impl InMemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of partitions created so far
    pub fn partition_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.partitions.iter().map(|p| p.key().clone()).collect();
        names.sort();
        names
    }

    fn existing(&self, partition: &str) -> Option<PartitionHandle> {
        self.partitions.get(partition).map(|p| Arc::clone(p.value()))
    }

    fn get_or_create(&self, partition: &str) -> PartitionHandle {
        Arc::clone(
            self.partitions
                .entry(partition.to_string())
                .or_insert_with(|| {
                    tracing::debug!(partition, "creating entry partition");
                    PartitionHandle::default()
                })
                .value(),
        )
    }
}

#[async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn insert(&self, partition: &str, entry: &FormEntry) -> Result<()> {
        let handle = self.get_or_create(partition);
        let mut entries = handle.write();
        if entries.iter().any(|e| e.id == entry.id) {
            anyhow::bail!("duplicate id {} in partition {}", entry.id, partition);
        }
        entries.push(entry.clone());
        Ok(())
    }

    async fn find(
        &self,
        partition: &str,
        filter: &EntryFilter,
        options: &FindOptions,
    ) -> Result<Vec<FormEntry>> {
        let Some(handle) = self.existing(partition) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<FormEntry> = handle
            .read()
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();

        if let Some(sort) = &options.sort {
            let english = options.collation.as_deref() == Some("en");
            matched.sort_by(|a, b| compare_entries(a, b, sort, english));
        }

        let skip = usize::try_from(options.skip.max(0)).unwrap_or(usize::MAX);
        let limit = match options.limit {
            n if n <= 0 => usize::MAX,
            n => usize::try_from(n).unwrap_or(usize::MAX),
        };

        Ok(matched.into_iter().skip(skip).take(limit).collect())
    }

    async fn find_one(&self, partition: &str, filter: &EntryFilter) -> Result<Option<FormEntry>> {
        let Some(handle) = self.existing(partition) else {
            return Ok(None);
        };
        let found = handle.read().iter().find(|e| filter.matches(e)).cloned();
        Ok(found)
    }

    async fn count(&self, partition: &str, filter: &EntryFilter) -> Result<u64> {
        let Some(handle) = self.existing(partition) else {
            return Ok(0);
        };
        let count = handle.read().iter().filter(|e| filter.matches(e)).count();
        Ok(count as u64)
    }

    async fn update_one(
        &self,
        partition: &str,
        filter: &EntryFilter,
        patch: &EntryPatch,
    ) -> Result<u64> {
        let Some(handle) = self.existing(partition) else {
            return Ok(0);
        };
        let mut entries = handle.write();
        match entries.iter_mut().find(|e| filter.matches(e)) {
            Some(entry) => {
                patch.apply(entry);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_one(&self, partition: &str, filter: &EntryFilter) -> Result<u64> {
        let Some(handle) = self.existing(partition) else {
            return Ok(0);
        };
        let mut entries = handle.write();
        match entries.iter().position(|e| filter.matches(e)) {
            Some(index) => {
                entries.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_many(&self, partition: &str, filter: &EntryFilter) -> Result<u64> {
        let Some(handle) = self.existing(partition) else {
            return Ok(0);
        };
        let mut entries = handle.write();
        let before = entries.len();
        entries.retain(|e| !filter.matches(e));
        Ok((before - entries.len()) as u64)
    }
}

/// Sortable document field value
#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldValue<'a> {
    Bool(bool),
    Int(i64),
    Text(&'a str),
}

/// Resolve a (possibly dotted) field path on an entry; unknown paths are missing
fn field_value<'a>(entry: &'a FormEntry, field: &str) -> Option<FieldValue<'a>> {
    match field {
        "form_handle" => Some(FieldValue::Text(&entry.form_handle)),
        "locale" => Some(FieldValue::Text(&entry.locale)),
        "title" => Some(FieldValue::Text(&entry.title)),
        "template" => Some(FieldValue::Text(&entry.template)),
        "dates.created" => Some(FieldValue::Int(entry.dates.created)),
        "dates.updated" => Some(FieldValue::Int(entry.dates.updated)),
        "viewed" => Some(FieldValue::Bool(entry.viewed)),
        "trashed" => Some(FieldValue::Bool(entry.trashed)),
        "site_id" => entry.site_id.as_deref().map(FieldValue::Text),
        other => other
            .strip_prefix("content.")
            .and_then(|key| entry.content.get(key))
            .map(FieldValue::Text),
    }
}

/// Missing sorts first, then numbers, strings, booleans (document-store order)
fn compare_values(a: &Option<FieldValue<'_>>, b: &Option<FieldValue<'_>>, english: bool) -> Ordering {
    fn rank(v: &Option<FieldValue<'_>>) -> u8 {
        match v {
            None => 0,
            Some(FieldValue::Int(_)) => 1,
            Some(FieldValue::Text(_)) => 2,
            Some(FieldValue::Bool(_)) => 3,
        }
    }

    match (a, b) {
        (Some(FieldValue::Int(x)), Some(FieldValue::Int(y))) => x.cmp(y),
        (Some(FieldValue::Bool(x)), Some(FieldValue::Bool(y))) => x.cmp(y),
        (Some(FieldValue::Text(x)), Some(FieldValue::Text(y))) => {
            if english {
                collate_en(x, y)
            } else {
                x.cmp(y)
            }
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

fn compare_entries(a: &FormEntry, b: &FormEntry, sort: &SortSpec, english: bool) -> Ordering {
    let ordering = compare_values(
        &field_value(a, &sort.field),
        &field_value(b, &sort.field),
        english,
    );
    match sort.direction {
        crate::contract::SortDirection::Asc => ordering,
        crate::contract::SortDirection::Desc => ordering.reverse(),
    }
}

/// English collation: letters compare case-insensitively first, and only on a
/// tie does case decide, lowercase before uppercase.
pub fn collate_en(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded.then_with(|| {
        a.chars()
            .zip(b.chars())
            .find(|(x, y)| x != y)
            .map_or(Ordering::Equal, |(x, y)| {
                match (x.is_lowercase(), y.is_lowercase()) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => x.cmp(&y),
                }
            })
    })
}

// ===== Form Repository =====

#[derive(Default)]
pub struct InMemoryFormRepository {
    forms: RwLock<Vec<Form>>,
}

impl InMemoryFormRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormRepository for InMemoryFormRepository {
    async fn insert(&self, form: &Form) -> Result<()> {
        let mut forms = self.forms.write();
        if forms.iter().any(|f| f.id == form.id) {
            anyhow::bail!("duplicate form id {}", form.id);
        }
        forms.push(form.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Form>> {
        Ok(self.forms.read().iter().find(|f| f.id == id).cloned())
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<Form>> {
        Ok(self.forms.read().iter().find(|f| f.handle == handle).cloned())
    }

    async fn count_by_handle(&self, handle: &str) -> Result<u64> {
        Ok(self.forms.read().iter().filter(|f| f.handle == handle).count() as u64)
    }

    async fn update(&self, form: &Form) -> Result<u64> {
        let mut forms = self.forms.write();
        match forms.iter_mut().find(|f| f.id == form.id) {
            Some(existing) => {
                *existing = form.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64> {
        let mut forms = self.forms.write();
        let before = forms.len();
        forms.retain(|f| !ids.contains(&f.id));
        Ok((before - forms.len()) as u64)
    }

    async fn list_all(&self) -> Result<Vec<Form>> {
        Ok(self.forms.read().clone())
    }
}
