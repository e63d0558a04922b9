//! REST DTOs with serde derives for HTTP API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Form DTOs =====

/// Form response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormDto {
    pub id: Uuid,

    /// Unique slug
    #[schema(example = "contact-us")]
    pub handle: String,

    #[schema(example = "Contact us")]
    pub title: String,

    /// Field keys, when the form is defined by a field list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    /// Layout reference, when the form is defined by a layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_id: Option<Uuid>,

    /// Form settings (to, cc, bcc, success_email_handle, action, entry_title)
    #[schema(value_type = Object)]
    pub settings: serde_json::Value,
}

/// Form creation request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateFormRequest {
    /// Requested handle; defaults to the slugified title
    #[serde(default)]
    pub handle: String,

    pub title: String,

    #[serde(default)]
    pub fields: Vec<String>,

    #[serde(default)]
    pub layout_id: Option<Uuid>,

    /// Loose settings object; unknown keys are ignored
    #[serde(default)]
    #[schema(value_type = Object)]
    pub settings: serde_json::Value,
}

/// Form update request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateFormRequest {
    pub id: Uuid,

    #[serde(default)]
    pub handle: String,

    pub title: String,

    #[serde(default)]
    pub fields: Vec<String>,

    #[serde(default)]
    pub layout_id: Option<Uuid>,

    #[serde(default)]
    #[schema(value_type = Object)]
    pub settings: serde_json::Value,
}

/// Batch of identifiers
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IdsRequest {
    pub ids: Vec<Uuid>,
}

/// Boolean mutation outcome
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MutationResponse {
    pub success: bool,
}

// ===== Entry DTOs =====

/// One content `{key, value}` pair
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContentFieldDto {
    #[schema(example = "name")]
    pub key: String,

    #[schema(example = "Alice")]
    pub value: String,
}

/// Entry timestamps (unix seconds)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema)]
pub struct EntryDatesDto {
    pub created: i64,
    pub updated: i64,
}

/// Entry response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormEntryDto {
    pub id: Uuid,

    #[schema(example = "contact-us")]
    pub form_handle: String,

    #[schema(example = "en")]
    pub locale: String,

    #[schema(example = "Message from Alice")]
    pub title: String,

    pub template: String,

    pub dates: EntryDatesDto,

    /// Content in submission order
    pub content: Vec<ContentFieldDto>,

    pub viewed: bool,

    pub site_id: Option<String>,

    pub trashed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginationDto {
    pub page: i64,
    pub pages: u64,
    pub total: u64,
}

/// Paginated entry listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EntryListingDto {
    pub pagination: PaginationDto,
    pub items: Vec<FormEntryDto>,
}

/// Entry creation request; the title comes from the form
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateEntryRequest {
    pub locale: String,

    #[serde(default)]
    pub template: String,

    pub content: Vec<ContentFieldDto>,

    #[serde(default)]
    pub site_id: Option<String>,
}

/// Entry update request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateEntryRequest {
    pub locale: String,

    /// Title template rendered against the content
    pub title: String,

    #[serde(default)]
    pub template: String,

    #[serde(default)]
    pub dates: EntryDatesDto,

    pub content: Vec<ContentFieldDto>,

    #[serde(default)]
    pub site_id: Option<String>,

    #[serde(default)]
    pub trashed: bool,
}

// ===== Success Email DTOs =====

/// Success email creation request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSuccessEmailRequest {
    pub locale: String,

    /// Title template rendered against the content
    pub title: String,

    #[serde(default)]
    pub template: String,

    #[serde(default)]
    pub content: Vec<ContentFieldDto>,

    #[serde(default)]
    pub site_id: Option<String>,
}

/// Success email update request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateSuccessEmailRequest {
    pub id: Uuid,

    #[serde(flatten)]
    pub entry: UpdateEntryRequest,
}

// ===== reCAPTCHA DTOs =====

/// Rendered HTML markup
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MarkupResponse {
    pub html: String,
}
