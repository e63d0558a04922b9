//! Conversions between REST DTOs and contract models
//!
//! Request bodies that do not name their form get it from the path, so those
//! conversions are methods taking the handle instead of `From` impls.

use super::dto::*;
use crate::contract::{
    self, ContentField, EntryChanges, EntryDates, FormFields, FormSettings, FormsError, NewEntry,
    NewSuccessEmail,
};
use uuid::Uuid;

fn form_fields(keys: Vec<String>, layout_id: Option<Uuid>) -> FormFields {
    match layout_id {
        Some(id) => FormFields::Layout(id),
        None => FormFields::Keys(keys),
    }
}

fn content(fields: Vec<ContentFieldDto>) -> Vec<ContentField> {
    fields.into_iter().map(Into::into).collect()
}

// ===== Form conversions =====

impl From<contract::Form> for FormDto {
    fn from(form: contract::Form) -> Self {
        let (fields, layout_id) = match form.fields {
            FormFields::Keys(keys) => (Some(keys), None),
            FormFields::Layout(id) => (None, Some(id)),
        };

        Self {
            id: form.id,
            handle: form.handle,
            title: form.title,
            fields,
            layout_id,
            settings: serde_json::to_value(&form.settings).unwrap_or_default(),
        }
    }
}

impl TryFrom<CreateFormRequest> for contract::NewForm {
    type Error = FormsError;

    fn try_from(req: CreateFormRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            settings: FormSettings::from_value(&req.settings)?,
            handle: req.handle,
            title: req.title,
            fields: form_fields(req.fields, req.layout_id),
        })
    }
}

impl TryFrom<UpdateFormRequest> for contract::FormChanges {
    type Error = FormsError;

    fn try_from(req: UpdateFormRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            settings: FormSettings::from_value(&req.settings)?,
            id: req.id,
            handle: req.handle,
            title: req.title,
            fields: form_fields(req.fields, req.layout_id),
        })
    }
}

// ===== Entry conversions =====

impl From<ContentFieldDto> for ContentField {
    fn from(dto: ContentFieldDto) -> Self {
        ContentField::new(dto.key, dto.value)
    }
}

impl From<ContentField> for ContentFieldDto {
    fn from(field: ContentField) -> Self {
        Self {
            key: field.key,
            value: field.value,
        }
    }
}

impl From<EntryDates> for EntryDatesDto {
    fn from(dates: EntryDates) -> Self {
        Self {
            created: dates.created,
            updated: dates.updated,
        }
    }
}

impl From<EntryDatesDto> for EntryDates {
    fn from(dto: EntryDatesDto) -> Self {
        Self {
            created: dto.created,
            updated: dto.updated,
        }
    }
}

impl From<contract::FormEntry> for FormEntryDto {
    fn from(entry: contract::FormEntry) -> Self {
        Self {
            content: entry.content.to_fields().into_iter().map(Into::into).collect(),
            id: entry.id,
            form_handle: entry.form_handle,
            locale: entry.locale,
            title: entry.title,
            template: entry.template,
            dates: entry.dates.into(),
            viewed: entry.viewed,
            site_id: entry.site_id,
            trashed: entry.trashed,
        }
    }
}

impl From<contract::Listing<contract::FormEntry>> for EntryListingDto {
    fn from(listing: contract::Listing<contract::FormEntry>) -> Self {
        Self {
            pagination: PaginationDto {
                page: listing.pagination.page,
                pages: listing.pagination.pages,
                total: listing.pagination.total,
            },
            items: listing.items.into_iter().map(Into::into).collect(),
        }
    }
}

impl CreateEntryRequest {
    pub fn into_contract(self, form_handle: &str) -> NewEntry {
        NewEntry {
            form_handle: form_handle.to_string(),
            locale: self.locale,
            template: self.template,
            content: content(self.content),
            site_id: self.site_id,
        }
    }
}

impl UpdateEntryRequest {
    pub fn into_contract(self, form_handle: &str) -> EntryChanges {
        EntryChanges {
            form_handle: form_handle.to_string(),
            locale: self.locale,
            title: self.title,
            template: self.template,
            dates: self.dates.into(),
            content: content(self.content),
            site_id: self.site_id,
            trashed: self.trashed,
        }
    }
}

// ===== Success email conversions =====

impl CreateSuccessEmailRequest {
    pub fn into_contract(self, form_handle: &str) -> NewSuccessEmail {
        NewSuccessEmail {
            form_handle: form_handle.to_string(),
            locale: self.locale,
            title: self.title,
            template: self.template,
            content: content(self.content),
            site_id: self.site_id,
        }
    }
}
