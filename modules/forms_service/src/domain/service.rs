//! Domain service - form and entry lifecycle orchestration

use super::partition::{self, Partition};
use super::query::EntryQuery;
use super::recaptcha;
use super::repository::{EntryFilter, EntryPatch, EntryStore, FormRepository};
use super::template::{entry_title_template, render_title};
use super::validation::{
    slugify, validate_form_fields, with_random_suffix, MAX_HANDLE_ATTEMPTS,
};
use crate::config::Config;
use crate::contract::{
    ContentMap, EntryChanges, EntryDates, Form, FormChanges, FormEntry, FormsError,
    ListEntriesRequest, Listing, NewEntry, NewForm, NewSuccessEmail,
};
use std::sync::Arc;
use uuid::Uuid;

/// Domain service for forms, entries and success emails
pub struct Service {
    forms: Arc<dyn FormRepository>,
    entries: Arc<dyn EntryStore>,
    config: Config,
}

impl Service {
    /// Create a new service instance
    pub fn new(forms: Arc<dyn FormRepository>, entries: Arc<dyn EntryStore>, config: Config) -> Self {
        Self {
            forms,
            entries,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ===== Form Operations =====

    /// Get a form by handle
    pub async fn get_form(&self, handle: &str) -> Result<Form, FormsError> {
        self.forms
            .find_by_handle(handle)
            .await
            .map_err(FormsError::storage)?
            .ok_or_else(|| FormsError::FormNotFound {
                handle: handle.to_string(),
            })
    }

    /// Get a form by id
    pub async fn get_form_by_id(&self, id: Uuid) -> Result<Form, FormsError> {
        self.forms
            .find_by_id(id)
            .await
            .map_err(FormsError::storage)?
            .ok_or_else(|| FormsError::EntryDoesNotExist { id: id.to_string() })
    }

    /// List all forms
    pub async fn list_forms(&self) -> Result<Vec<Form>, FormsError> {
        self.forms.list_all().await.map_err(FormsError::storage)
    }

    /// Create a form under a unique handle
    pub async fn create_form(&self, new_form: NewForm) -> Result<bool, FormsError> {
        validate_form_fields(&new_form.fields)?;
        let handle = self
            .unique_handle(&new_form.handle, &new_form.title, None)
            .await?;

        let form = Form {
            id: Uuid::new_v4(),
            handle,
            title: new_form.title,
            fields: new_form.fields,
            settings: new_form.settings,
        };

        match self.forms.insert(&form).await {
            Ok(()) => {
                tracing::info!(form_id = %form.id, form_handle = %form.handle, "form created");
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(form_handle = %form.handle, error = %e, "form insert failed");
                Ok(false)
            }
        }
    }

    /// Update a form; the handle only gets a suffix when another form owns it
    pub async fn update_form(&self, changes: FormChanges) -> Result<bool, FormsError> {
        self.get_form_by_id(changes.id).await?;
        validate_form_fields(&changes.fields)?;
        let handle = self
            .unique_handle(&changes.handle, &changes.title, Some(changes.id))
            .await?;

        let form = Form {
            id: changes.id,
            handle,
            title: changes.title,
            fields: changes.fields,
            settings: changes.settings,
        };

        match self.forms.update(&form).await {
            Ok(0) => Err(FormsError::EntryDoesNotExist {
                id: form.id.to_string(),
            }),
            Ok(_) => {
                tracing::info!(form_id = %form.id, form_handle = %form.handle, "form updated");
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(form_id = %form.id, error = %e, "form update failed");
                Ok(false)
            }
        }
    }

    /// Delete forms by id; absent ids are ignored
    pub async fn delete_forms(&self, ids: &[Uuid]) -> Result<bool, FormsError> {
        let deleted = self
            .forms
            .delete_many(ids)
            .await
            .map_err(FormsError::storage)?;
        tracing::info!(requested = ids.len(), deleted, "forms deleted");
        Ok(true)
    }

    // ===== Entry Operations =====

    /// Get one entry of a form
    pub async fn get_entry(&self, form_handle: &str, id: Uuid) -> Result<FormEntry, FormsError> {
        let resolved = partition::resolve(self.forms.as_ref(), form_handle).await?;
        self.entries
            .find_by_id(resolved.partition.as_str(), id)
            .await
            .map_err(FormsError::storage)?
            .ok_or_else(|| FormsError::EntryDoesNotExist { id: id.to_string() })
    }

    /// List entries of a form
    pub async fn list_entries(
        &self,
        form_handle: &str,
        request: ListEntriesRequest,
    ) -> Result<Listing<FormEntry>, FormsError> {
        let resolved = partition::resolve(self.forms.as_ref(), form_handle).await?;
        let query = EntryQuery::from_request(request, &self.config)?;
        let listing = query
            .execute(self.entries.as_ref(), &resolved.partition)
            .await?;

        tracing::debug!(
            form_handle,
            total = listing.pagination.total,
            returned = listing.items.len(),
            "entries listed"
        );
        Ok(listing)
    }

    /// Create an entry titled from the form's entry title template
    pub async fn create_entry(&self, new_entry: NewEntry) -> Result<bool, FormsError> {
        let resolved = partition::resolve(self.forms.as_ref(), &new_entry.form_handle).await?;
        let form = resolved.form.ok_or_else(|| FormsError::FormNotFound {
            handle: new_entry.form_handle.clone(),
        })?;

        let content = ContentMap::from_fields(new_entry.content)?;
        let title = render_title(&entry_title_template(&form), &content);

        let entry = FormEntry {
            id: Uuid::new_v4(),
            form_handle: new_entry.form_handle,
            locale: new_entry.locale,
            title,
            template: new_entry.template,
            dates: EntryDates::at(now()),
            content,
            viewed: false,
            site_id: new_entry.site_id,
            trashed: false,
        };

        Ok(self.insert_entry(&resolved.partition, &entry).await)
    }

    /// Update an entry, re-rendering the supplied title
    pub async fn update_entry(&self, id: Uuid, changes: EntryChanges) -> Result<bool, FormsError> {
        let resolved = partition::resolve(self.forms.as_ref(), &changes.form_handle).await?;
        self.apply_changes(&resolved.partition, id, changes).await
    }

    /// Flag an entry as viewed
    pub async fn mark_viewed(&self, form_handle: &str, id: Uuid) -> Result<bool, FormsError> {
        let resolved = partition::resolve(self.forms.as_ref(), form_handle).await?;
        let matched = self
            .entries
            .update_one(
                resolved.partition.as_str(),
                &EntryFilter::by_id(id),
                &EntryPatch::viewed(),
            )
            .await
            .map_err(FormsError::storage)?;

        if matched == 0 {
            return Err(FormsError::EntryDoesNotExist { id: id.to_string() });
        }
        Ok(true)
    }

    /// Delete entries by id in one batch; absent ids are ignored
    pub async fn delete_entries(&self, form_handle: &str, ids: &[Uuid]) -> Result<bool, FormsError> {
        let resolved = partition::resolve(self.forms.as_ref(), form_handle).await?;
        let deleted = self
            .entries
            .delete_many(resolved.partition.as_str(), &EntryFilter::by_ids(ids.to_vec()))
            .await
            .map_err(FormsError::storage)?;

        tracing::info!(
            form_handle,
            partition = %resolved.partition,
            requested = ids.len(),
            deleted,
            "entries deleted"
        );
        Ok(true)
    }

    // ===== Success Email Operations =====

    /// Success email of a form, if one is stored
    pub async fn get_success_email(
        &self,
        form_handle: Option<&str>,
    ) -> Result<Option<FormEntry>, FormsError> {
        let handle = form_handle.unwrap_or(self.config.default_success_email_handle.as_str());
        self.entries
            .find_one(
                Partition::success_email().as_str(),
                &EntryFilter::by_form_handle(handle),
            )
            .await
            .map_err(FormsError::storage)
    }

    /// Create the success email of a form; at most one per form
    pub async fn create_success_email(&self, email: NewSuccessEmail) -> Result<bool, FormsError> {
        self.require_form(&email.form_handle).await?;
        let content = ContentMap::from_fields(email.content)?;

        if self.get_success_email(Some(&email.form_handle)).await?.is_some() {
            return Err(FormsError::SuccessEmailExists {
                form_handle: email.form_handle,
            });
        }

        let entry = FormEntry {
            id: Uuid::new_v4(),
            title: render_title(&email.title, &content),
            form_handle: email.form_handle,
            locale: email.locale,
            template: email.template,
            dates: EntryDates::at(now()),
            content,
            viewed: false,
            site_id: email.site_id,
            trashed: false,
        };

        Ok(self.insert_entry(&Partition::success_email(), &entry).await)
    }

    /// Update a success email; moving it to another form must not give
    /// that form a second one
    pub async fn update_success_email(
        &self,
        id: Uuid,
        changes: EntryChanges,
    ) -> Result<bool, FormsError> {
        self.require_form(&changes.form_handle).await?;
        let partition = Partition::success_email();

        let stored = self
            .entries
            .find_by_id(partition.as_str(), id)
            .await
            .map_err(FormsError::storage)?
            .ok_or_else(|| FormsError::EntryDoesNotExist { id: id.to_string() })?;

        if stored.form_handle != changes.form_handle
            && self
                .get_success_email(Some(&changes.form_handle))
                .await?
                .is_some()
        {
            return Err(FormsError::SuccessEmailExists {
                form_handle: changes.form_handle,
            });
        }

        self.apply_changes(&partition, id, changes).await
    }

    /// Remove the success email of a form; absent records are ignored
    pub async fn delete_success_email(&self, form_handle: &str) -> Result<bool, FormsError> {
        let deleted = self
            .entries
            .delete_one(
                Partition::success_email().as_str(),
                &EntryFilter::by_form_handle(form_handle),
            )
            .await
            .map_err(FormsError::storage)?;
        tracing::info!(form_handle, deleted, "success email removed");
        Ok(true)
    }

    // ===== reCAPTCHA =====

    /// Widget markup, using the configured site key when none is given
    pub fn recaptcha_tag(&self, version: &str, site_key: Option<&str>) -> String {
        let site_key = site_key
            .filter(|k| !k.is_empty())
            .or(self.config.recaptcha_site_key.as_deref())
            .unwrap_or_default();
        recaptcha::tag(version, site_key)
    }

    pub fn recaptcha_script(&self, form_id: &str, version: &str) -> String {
        recaptcha::script(form_id, version)
    }

    // ===== Helper Methods =====

    /// Slug of the requested handle (or title), suffixed when taken or reserved
    async fn unique_handle(
        &self,
        requested: &str,
        title: &str,
        owner: Option<Uuid>,
    ) -> Result<String, FormsError> {
        let base = if requested.is_empty() { title } else { requested };
        let slug = slugify(base);
        if slug.is_empty() {
            return Err(FormsError::Validation {
                message: format!("cannot derive a form handle from \"{}\"", base),
            });
        }

        let taken = match owner {
            None => {
                self.forms
                    .count_by_handle(&slug)
                    .await
                    .map_err(FormsError::storage)?
                    > 0
            }
            Some(id) => self
                .forms
                .find_by_handle(&slug)
                .await
                .map_err(FormsError::storage)?
                .is_some_and(|existing| existing.id != id),
        };

        if !taken && !Partition::is_reserved_handle(&slug) {
            return Ok(slug);
        }

        for _ in 0..MAX_HANDLE_ATTEMPTS {
            let candidate = with_random_suffix(&slug);
            let in_use = self
                .forms
                .count_by_handle(&candidate)
                .await
                .map_err(FormsError::storage)?;
            if in_use == 0 {
                tracing::debug!(requested = %slug, assigned = %candidate, "form handle taken");
                return Ok(candidate);
            }
        }

        Err(FormsError::Validation {
            message: format!(
                "no free handle for \"{}\" after {} attempts",
                slug, MAX_HANDLE_ATTEMPTS
            ),
        })
    }

    async fn require_form(&self, handle: &str) -> Result<Form, FormsError> {
        partition::resolve(self.forms.as_ref(), handle)
            .await?
            .form
            .ok_or_else(|| FormsError::FormNotFound {
                handle: handle.to_string(),
            })
    }

    /// Insert, degrading storage failures to `false`
    async fn insert_entry(&self, partition: &Partition, entry: &FormEntry) -> bool {
        match self.entries.insert(partition.as_str(), entry).await {
            Ok(()) => {
                tracing::info!(
                    %partition,
                    entry_id = %entry.id,
                    form_handle = %entry.form_handle,
                    "entry created"
                );
                true
            }
            Err(e) => {
                tracing::warn!(%partition, form_handle = %entry.form_handle, error = %e, "entry insert failed");
                false
            }
        }
    }

    /// Shared update path for entries and success emails
    async fn apply_changes(
        &self,
        partition: &Partition,
        id: Uuid,
        changes: EntryChanges,
    ) -> Result<bool, FormsError> {
        let content = ContentMap::from_fields(changes.content)?;
        let patch = EntryPatch {
            title: Some(render_title(&changes.title, &content)),
            form_handle: Some(changes.form_handle),
            locale: Some(changes.locale),
            template: Some(changes.template),
            updated: Some(now()),
            content: Some(content),
            site_id: Some(changes.site_id),
            trashed: Some(changes.trashed),
            viewed: None,
        };

        match self
            .entries
            .update_one(partition.as_str(), &EntryFilter::by_id(id), &patch)
            .await
        {
            Ok(0) => Err(FormsError::EntryDoesNotExist { id: id.to_string() }),
            Ok(_) => {
                tracing::info!(%partition, entry_id = %id, "entry updated");
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(%partition, entry_id = %id, error = %e, "entry update failed");
                Ok(false)
            }
        }
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
