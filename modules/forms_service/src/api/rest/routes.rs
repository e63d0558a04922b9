//! Route registration and OpenAPI schema registry

use super::{dto::*, handlers};
use crate::contract::FormsApi;
use axum::{
    routing::{get, put},
    Extension, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

/// OpenAPI components for the forms REST API
#[derive(OpenApi)]
#[openapi(
    info(title = "Forms API"),
    components(schemas(
        FormDto,
        CreateFormRequest,
        UpdateFormRequest,
        IdsRequest,
        MutationResponse,
        ContentFieldDto,
        EntryDatesDto,
        FormEntryDto,
        PaginationDto,
        EntryListingDto,
        CreateEntryRequest,
        UpdateEntryRequest,
        CreateSuccessEmailRequest,
        UpdateSuccessEmailRequest,
        MarkupResponse,
    ))
)]
pub struct FormsApiDoc;

/// Register all REST routes
pub fn register_routes(router: Router, client: Arc<dyn FormsApi>) -> Router {
    router
        // Forms
        .route(
            "/forms",
            get(handlers::list_forms)
                .post(handlers::create_form)
                .put(handlers::update_form)
                .delete(handlers::delete_forms),
        )
        .route("/forms/{handle}", get(handlers::get_form))
        // Entries
        .route(
            "/forms/{handle}/entries",
            get(handlers::list_entries)
                .post(handlers::create_entry)
                .delete(handlers::delete_entries),
        )
        .route(
            "/forms/{handle}/entries/{id}",
            get(handlers::get_entry).put(handlers::update_entry),
        )
        .route(
            "/forms/{handle}/entries/{id}/viewed",
            put(handlers::mark_viewed),
        )
        // Success emails
        .route("/success-email", get(handlers::get_default_success_email))
        .route(
            "/forms/{handle}/success-email",
            get(handlers::get_success_email)
                .post(handlers::create_success_email)
                .put(handlers::update_success_email)
                .delete(handlers::delete_success_email),
        )
        // reCAPTCHA
        .route("/recaptcha/tag", get(handlers::recaptcha_tag))
        .route("/recaptcha/script", get(handlers::recaptcha_script))
        .layer(Extension(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_registers_entry_schemas() {
        let doc = FormsApiDoc::openapi();
        let schemas = doc.components.unwrap().schemas;
        assert!(schemas.contains_key("FormEntryDto"));
        assert!(schemas.contains_key("EntryListingDto"));
        assert!(schemas.contains_key("ContentFieldDto"));
    }
}
