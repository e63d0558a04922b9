//! HTTP request handlers - thin layer that delegates to the forms client

use super::{
    dto::*,
    error::{map_domain_error, Problem},
};
use crate::contract::{
    AuthContext, DateOperator, DateSearch, FormChanges, FormsApi, ListEntriesRequest, NewForm,
    SortDirection,
};
use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Header carrying the caller identity
pub const USER_ID_HEADER: &str = "x-user-id";

type Api = Extension<Arc<dyn FormsApi>>;

fn auth_context(headers: &HeaderMap) -> AuthContext {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(AuthContext::user)
        .unwrap_or_else(AuthContext::anonymous)
}

fn mutation(success: bool, on_success: StatusCode) -> (StatusCode, Json<MutationResponse>) {
    let status = if success { on_success } else { StatusCode::OK };
    (status, Json(MutationResponse { success }))
}

// ===== Form Handlers =====

pub async fn list_forms(
    Extension(api): Api,
    headers: HeaderMap,
) -> Result<Json<Vec<FormDto>>, Problem> {
    let forms = api
        .forms(&auth_context(&headers))
        .await
        .map_err(map_domain_error)?;

    Ok(Json(forms.into_iter().map(Into::into).collect()))
}

pub async fn get_form(
    Extension(api): Api,
    Path(handle): Path<String>,
) -> Result<Json<FormDto>, Problem> {
    let form = api.form(&handle).await.map_err(map_domain_error)?;
    Ok(Json(form.into()))
}

pub async fn create_form(
    Extension(api): Api,
    Json(req): Json<CreateFormRequest>,
) -> Result<(StatusCode, Json<MutationResponse>), Problem> {
    let form = NewForm::try_from(req).map_err(map_domain_error)?;
    let success = api.create_form(form).await.map_err(map_domain_error)?;
    Ok(mutation(success, StatusCode::CREATED))
}

pub async fn update_form(
    Extension(api): Api,
    Json(req): Json<UpdateFormRequest>,
) -> Result<Json<MutationResponse>, Problem> {
    let changes = FormChanges::try_from(req).map_err(map_domain_error)?;
    let success = api.update_form(changes).await.map_err(map_domain_error)?;
    Ok(Json(MutationResponse { success }))
}

pub async fn delete_forms(
    Extension(api): Api,
    Json(req): Json<IdsRequest>,
) -> Result<Json<MutationResponse>, Problem> {
    let success = api.delete_forms(&req.ids).await.map_err(map_domain_error)?;
    Ok(Json(MutationResponse { success }))
}

// ===== Entry Handlers =====

/// Query parameters for listing entries
#[derive(Debug, Default, Deserialize)]
pub struct ListEntriesQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Unix timestamp compared against the created date
    pub date: Option<i64>,
    /// `BEFORE`, `AFTER`, anything else is an exact match
    pub operator: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    /// `DESC` for descending
    pub order: Option<String>,
}

impl From<ListEntriesQuery> for ListEntriesRequest {
    fn from(query: ListEntriesQuery) -> Self {
        let operator = query.operator.as_deref().unwrap_or_default();
        let date_search = query.date.map(|date| {
            let operator = operator.parse().unwrap_or(DateOperator::Exact);
            DateSearch::new(date, operator)
        });

        Self {
            page: query.page,
            limit: query.limit,
            date_search,
            search: query.search,
            sort: query.sort,
            order: query.order.as_deref().map(SortDirection::from_order),
        }
    }
}

pub async fn list_entries(
    Extension(api): Api,
    headers: HeaderMap,
    Path(handle): Path<String>,
    Query(query): Query<ListEntriesQuery>,
) -> Result<Json<EntryListingDto>, Problem> {
    let listing = api
        .entries(&auth_context(&headers), &handle, query.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(listing.into()))
}

pub async fn get_entry(
    Extension(api): Api,
    Path((handle, id)): Path<(String, Uuid)>,
) -> Result<Json<FormEntryDto>, Problem> {
    let entry = api.entry(&handle, id).await.map_err(map_domain_error)?;
    Ok(Json(entry.into()))
}

pub async fn create_entry(
    Extension(api): Api,
    Path(handle): Path<String>,
    Json(req): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<MutationResponse>), Problem> {
    let success = api
        .create_entry(req.into_contract(&handle))
        .await
        .map_err(map_domain_error)?;
    Ok(mutation(success, StatusCode::CREATED))
}

pub async fn update_entry(
    Extension(api): Api,
    Path((handle, id)): Path<(String, Uuid)>,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<Json<MutationResponse>, Problem> {
    let success = api
        .update_entry(id, req.into_contract(&handle))
        .await
        .map_err(map_domain_error)?;
    Ok(Json(MutationResponse { success }))
}

pub async fn mark_viewed(
    Extension(api): Api,
    Path((handle, id)): Path<(String, Uuid)>,
) -> Result<Json<MutationResponse>, Problem> {
    let success = api.mark_viewed(&handle, id).await.map_err(map_domain_error)?;
    Ok(Json(MutationResponse { success }))
}

pub async fn delete_entries(
    Extension(api): Api,
    Path(handle): Path<String>,
    Json(req): Json<IdsRequest>,
) -> Result<Json<MutationResponse>, Problem> {
    let success = api
        .delete_entries(&handle, &req.ids)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(MutationResponse { success }))
}

// ===== Success Email Handlers =====

pub async fn get_default_success_email(
    Extension(api): Api,
) -> Result<Json<Option<FormEntryDto>>, Problem> {
    let email = api.success_email(None).await.map_err(map_domain_error)?;
    Ok(Json(email.map(Into::into)))
}

pub async fn get_success_email(
    Extension(api): Api,
    Path(handle): Path<String>,
) -> Result<Json<Option<FormEntryDto>>, Problem> {
    let email = api
        .success_email(Some(&handle))
        .await
        .map_err(map_domain_error)?;
    Ok(Json(email.map(Into::into)))
}

pub async fn create_success_email(
    Extension(api): Api,
    Path(handle): Path<String>,
    Json(req): Json<CreateSuccessEmailRequest>,
) -> Result<(StatusCode, Json<MutationResponse>), Problem> {
    let success = api
        .create_success_email(req.into_contract(&handle))
        .await
        .map_err(map_domain_error)?;
    Ok(mutation(success, StatusCode::CREATED))
}

pub async fn update_success_email(
    Extension(api): Api,
    Path(handle): Path<String>,
    Json(req): Json<UpdateSuccessEmailRequest>,
) -> Result<Json<MutationResponse>, Problem> {
    let success = api
        .update_success_email(req.id, req.entry.into_contract(&handle))
        .await
        .map_err(map_domain_error)?;
    Ok(Json(MutationResponse { success }))
}

pub async fn delete_success_email(
    Extension(api): Api,
    Path(handle): Path<String>,
) -> Result<Json<MutationResponse>, Problem> {
    let success = api
        .delete_success_email(&handle)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(MutationResponse { success }))
}

// ===== reCAPTCHA Handlers =====

#[derive(Debug, Deserialize)]
pub struct RecaptchaTagQuery {
    #[serde(default)]
    pub version: String,
    pub site_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecaptchaScriptQuery {
    pub form_id: String,
    #[serde(default)]
    pub version: String,
}

pub async fn recaptcha_tag(
    Extension(api): Api,
    Query(query): Query<RecaptchaTagQuery>,
) -> Json<MarkupResponse> {
    let html = api
        .recaptcha_tag(&query.version, query.site_key.as_deref())
        .await;
    Json(MarkupResponse { html })
}

pub async fn recaptcha_script(
    Extension(api): Api,
    Query(query): Query<RecaptchaScriptQuery>,
) -> Json<MarkupResponse> {
    let html = api.recaptcha_script(&query.form_id, &query.version).await;
    Json(MarkupResponse { html })
}
