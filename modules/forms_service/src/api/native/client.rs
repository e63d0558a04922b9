//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    AuthContext, EntryChanges, Form, FormChanges, FormEntry, FormsApi, FormsError,
    ListEntriesRequest, Listing, NewEntry, NewForm, NewSuccessEmail, ReadScope,
};
use crate::domain::{AccessControl, Service};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Native client implementation that directly calls the domain service
///
/// Listing entry points consult the access-control collaborator before the
/// query runs; everything else is a straight pass-through.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
    access: Arc<dyn AccessControl>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>, access: Arc<dyn AccessControl>) -> Self {
        Self { service, access }
    }

    async fn ensure_can_read(&self, ctx: &AuthContext, scope: ReadScope) -> Result<(), FormsError> {
        let allowed = self
            .access
            .can_read(ctx, &scope)
            .await
            .map_err(FormsError::storage)?;

        if !allowed {
            tracing::warn!(user_id = ?ctx.user_id, %scope, "read denied");
            return Err(FormsError::PermissionDenied {
                scope: scope.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl FormsApi for NativeClient {
    async fn form(&self, handle: &str) -> Result<Form, FormsError> {
        self.service.get_form(handle).await
    }

    async fn form_by_id(&self, id: Uuid) -> Result<Form, FormsError> {
        self.service.get_form_by_id(id).await
    }

    async fn forms(&self, ctx: &AuthContext) -> Result<Vec<Form>, FormsError> {
        self.ensure_can_read(ctx, ReadScope::Forms).await?;
        self.service.list_forms().await
    }

    async fn create_form(&self, form: NewForm) -> Result<bool, FormsError> {
        self.service.create_form(form).await
    }

    async fn update_form(&self, changes: FormChanges) -> Result<bool, FormsError> {
        self.service.update_form(changes).await
    }

    async fn delete_forms(&self, ids: &[Uuid]) -> Result<bool, FormsError> {
        self.service.delete_forms(ids).await
    }

    async fn entry(&self, form_handle: &str, id: Uuid) -> Result<FormEntry, FormsError> {
        self.service.get_entry(form_handle, id).await
    }

    async fn entries(
        &self,
        ctx: &AuthContext,
        form_handle: &str,
        request: ListEntriesRequest,
    ) -> Result<Listing<FormEntry>, FormsError> {
        self.ensure_can_read(
            ctx,
            ReadScope::Entries {
                form_handle: form_handle.to_string(),
            },
        )
        .await?;
        self.service.list_entries(form_handle, request).await
    }

    async fn create_entry(&self, entry: NewEntry) -> Result<bool, FormsError> {
        self.service.create_entry(entry).await
    }

    async fn update_entry(&self, id: Uuid, changes: EntryChanges) -> Result<bool, FormsError> {
        self.service.update_entry(id, changes).await
    }

    async fn mark_viewed(&self, form_handle: &str, id: Uuid) -> Result<bool, FormsError> {
        self.service.mark_viewed(form_handle, id).await
    }

    async fn delete_entries(&self, form_handle: &str, ids: &[Uuid]) -> Result<bool, FormsError> {
        self.service.delete_entries(form_handle, ids).await
    }

    async fn success_email(
        &self,
        form_handle: Option<&str>,
    ) -> Result<Option<FormEntry>, FormsError> {
        self.service.get_success_email(form_handle).await
    }

    async fn create_success_email(&self, email: NewSuccessEmail) -> Result<bool, FormsError> {
        self.service.create_success_email(email).await
    }

    async fn update_success_email(
        &self,
        id: Uuid,
        changes: EntryChanges,
    ) -> Result<bool, FormsError> {
        self.service.update_success_email(id, changes).await
    }

    async fn delete_success_email(&self, form_handle: &str) -> Result<bool, FormsError> {
        self.service.delete_success_email(form_handle).await
    }

    async fn recaptcha_tag(&self, version: &str, site_key: Option<&str>) -> String {
        self.service.recaptcha_tag(version, site_key)
    }

    async fn recaptcha_script(&self, form_id: &str, version: &str) -> String {
        self.service.recaptcha_script(form_id, version)
    }
}
