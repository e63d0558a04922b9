//! Native client trait for inter-module communication
//!
//! This trait defines the API that resolvers and other modules use to interact
//! with the forms service. NO HTTP - direct function calls.

use super::{
    error::FormsError,
    model::{
        AuthContext, EntryChanges, Form, FormChanges, FormEntry, ListEntriesRequest, Listing,
        NewEntry, NewForm, NewSuccessEmail,
    },
};
use async_trait::async_trait;
use uuid::Uuid;

/// Forms service API for inter-module communication
#[async_trait]
pub trait FormsApi: Send + Sync {
    // ===== Form Operations =====

    /// Get a form by handle
    async fn form(&self, handle: &str) -> Result<Form, FormsError>;

    /// Get a form by id
    async fn form_by_id(&self, id: Uuid) -> Result<Form, FormsError>;

    /// List all forms (permission checked)
    async fn forms(&self, ctx: &AuthContext) -> Result<Vec<Form>, FormsError>;

    /// Create a form; `false` when storage rejected the insert
    async fn create_form(&self, form: NewForm) -> Result<bool, FormsError>;

    /// Update a form
    async fn update_form(&self, changes: FormChanges) -> Result<bool, FormsError>;

    /// Delete forms by id
    async fn delete_forms(&self, ids: &[Uuid]) -> Result<bool, FormsError>;

    // ===== Entry Operations =====

    /// Get one entry of a form
    async fn entry(&self, form_handle: &str, id: Uuid) -> Result<FormEntry, FormsError>;

    /// List entries of a form (permission checked)
    async fn entries(
        &self,
        ctx: &AuthContext,
        form_handle: &str,
        request: ListEntriesRequest,
    ) -> Result<Listing<FormEntry>, FormsError>;

    /// Create an entry; `false` when storage rejected the insert
    async fn create_entry(&self, entry: NewEntry) -> Result<bool, FormsError>;

    /// Update an entry
    async fn update_entry(&self, id: Uuid, changes: EntryChanges) -> Result<bool, FormsError>;

    /// Flag an entry as viewed
    async fn mark_viewed(&self, form_handle: &str, id: Uuid) -> Result<bool, FormsError>;

    /// Delete entries by id
    async fn delete_entries(&self, form_handle: &str, ids: &[Uuid]) -> Result<bool, FormsError>;

    // ===== Success Email Operations =====

    /// Get the success email of a form; `None` handle means the configured default
    async fn success_email(&self, form_handle: Option<&str>)
        -> Result<Option<FormEntry>, FormsError>;

    /// Create the success email of a form
    async fn create_success_email(&self, email: NewSuccessEmail) -> Result<bool, FormsError>;

    /// Update a success email
    async fn update_success_email(
        &self,
        id: Uuid,
        changes: EntryChanges,
    ) -> Result<bool, FormsError>;

    /// Remove the success email of a form
    async fn delete_success_email(&self, form_handle: &str) -> Result<bool, FormsError>;

    // ===== reCAPTCHA =====

    /// Widget markup for a reCAPTCHA version
    async fn recaptcha_tag(&self, version: &str, site_key: Option<&str>) -> String;

    /// Loader script for a reCAPTCHA version
    async fn recaptcha_script(&self, form_id: &str, version: &str) -> String;
}
