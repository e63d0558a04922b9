//! Common test utilities: form fixtures and collaborator stubs

#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use forms_service::config::Config;
use forms_service::contract::*;
use forms_service::domain::repository::{EntryFilter, EntryPatch, FindOptions};
use forms_service::domain::{AccessControl, AllowAll, EntryStore, FormRepository};
use forms_service::infra::storage::{InMemoryEntryStore, InMemoryFormRepository};
use forms_service::FormsServiceModule;
use parking_lot::RwLock;
use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

// ===== Fixtures =====

/// "Contact us" form whose entries are titled "Message from {name}"
pub fn contact_form() -> NewForm {
    NewForm {
        handle: "contact-us".to_string(),
        title: "Contact us".to_string(),
        fields: FormFields::Keys(vec!["name".to_string(), "email".to_string()]),
        settings: FormSettings::from_value(&json!({
            "to": "ops@example.com",
            "entry_title": "Message from {name}"
        }))
        .unwrap(),
    }
}

pub fn simple_form(handle: &str, title: &str) -> NewForm {
    NewForm {
        handle: handle.to_string(),
        title: title.to_string(),
        ..Default::default()
    }
}

pub fn entry_for(form_handle: &str, pairs: &[(&str, &str)]) -> NewEntry {
    NewEntry {
        form_handle: form_handle.to_string(),
        locale: "en".to_string(),
        template: "default".to_string(),
        content: pairs.iter().map(|(k, v)| ContentField::new(*k, *v)).collect(),
        site_id: None,
    }
}

/// Stored entry with a fixed creation time, for inserting straight into a store
pub fn stored_entry(form_handle: &str, title: &str, created: i64) -> FormEntry {
    FormEntry {
        id: Uuid::new_v4(),
        form_handle: form_handle.to_string(),
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

pub fn listing_page(page: i64, limit: i64) -> ListEntriesRequest {
    ListEntriesRequest {
        page: Some(page),
        limit: Some(limit),
        ..Default::default()
    }
}

/// Module over in-memory storage with the given entry store and access control
pub fn module_with(
    entries: Arc<dyn EntryStore>,
    access: Arc<dyn AccessControl>,
) -> FormsServiceModule {
    FormsServiceModule::new(
        Config::default(),
        Arc::new(InMemoryFormRepository::new()),
        entries,
        access,
    )
}

/// Module over the given form repository with in-memory entries
pub fn module_with_forms(forms: Arc<dyn FormRepository>) -> FormsServiceModule {
    FormsServiceModule::new(
        Config::default(),
        forms,
        Arc::new(InMemoryEntryStore::new()),
        Arc::new(AllowAll),
    )
}

pub fn in_memory() -> (FormsServiceModule, Arc<InMemoryEntryStore>) {
    let store = Arc::new(InMemoryEntryStore::new());
    let module = module_with(store.clone(), Arc::new(AllowAll));
    (module, store)
}

// ===== Collaborator stubs =====

/// Entry store that records every partition it is asked about and can be
/// told to fail inserts
#[derive(Default)]
pub struct RecordingEntryStore {
    inner: InMemoryEntryStore,
    touched: RwLock<HashSet<String>>,
    fail_inserts: AtomicBool,
}

impl RecordingEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn touched(&self) -> HashSet<String> {
        self.touched.read().clone()
    }

    fn touch(&self, partition: &str) {
        self.touched.write().insert(partition.to_string());
    }
}

#[async_trait]
impl EntryStore for RecordingEntryStore {
    async fn insert(&self, partition: &str, entry: &FormEntry) -> Result<()> {
        self.touch(partition);
        if self.fail_inserts.load(Ordering::SeqCst) {
            bail!("write concern failed for partition {}", partition);
        }
        self.inner.insert(partition, entry).await
    }

    async fn find(
        &self,
        partition: &str,
        filter: &EntryFilter,
        options: &FindOptions,
    ) -> Result<Vec<FormEntry>> {
        self.touch(partition);
        self.inner.find(partition, filter, options).await
    }

    async fn find_one(&self, partition: &str, filter: &EntryFilter) -> Result<Option<FormEntry>> {
        self.touch(partition);
        self.inner.find_one(partition, filter).await
    }

    async fn count(&self, partition: &str, filter: &EntryFilter) -> Result<u64> {
        self.touch(partition);
        self.inner.count(partition, filter).await
    }

    async fn update_one(
        &self,
        partition: &str,
        filter: &EntryFilter,
        patch: &EntryPatch,
    ) -> Result<u64> {
        self.touch(partition);
        self.inner.update_one(partition, filter, patch).await
    }

    async fn delete_one(&self, partition: &str, filter: &EntryFilter) -> Result<u64> {
        self.touch(partition);
        self.inner.delete_one(partition, filter).await
    }

    async fn delete_many(&self, partition: &str, filter: &EntryFilter) -> Result<u64> {
        self.touch(partition);
        self.inner.delete_many(partition, filter).await
    }
}

/// Form repository whose next `collisions` handle counts report the handle
/// as taken
#[derive(Default)]
pub struct ContendedFormRepository {
    inner: InMemoryFormRepository,
    collisions: AtomicUsize,
}

impl ContendedFormRepository {
    pub fn new(collisions: usize) -> Self {
        Self {
            inner: InMemoryFormRepository::new(),
            collisions: AtomicUsize::new(collisions),
        }
    }

    pub fn remaining_collisions(&self) -> usize {
        self.collisions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FormRepository for ContendedFormRepository {
    async fn insert(&self, form: &Form) -> Result<()> {
        self.inner.insert(form).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Form>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_handle(&self, handle: &str) -> Result<Option<Form>> {
        self.inner.find_by_handle(handle).await
    }

    async fn count_by_handle(&self, handle: &str) -> Result<u64> {
        let collided = self
            .collisions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if collided {
            return Ok(1);
        }
        self.inner.count_by_handle(handle).await
    }

    async fn update(&self, form: &Form) -> Result<u64> {
        self.inner.update(form).await
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64> {
        self.inner.delete_many(ids).await
    }

    async fn list_all(&self) -> Result<Vec<Form>> {
        self.inner.list_all().await
    }
}

/// Grants reads only to the listed users
pub struct AllowUsers(pub Vec<String>);

#[async_trait]
impl AccessControl for AllowUsers {
    async fn can_read(&self, ctx: &AuthContext, _scope: &ReadScope) -> Result<bool> {
        Ok(ctx
            .user_id
            .as_ref()
            .is_some_and(|user| self.0.contains(user)))
    }
}
