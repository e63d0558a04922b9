//! Forms Service Module
//!
//! Form definitions, per-form entry storage with search and pagination, and
//! per-form success emails. Entries of each form live in their own storage
//! partition; entry titles are rendered from `{key}` templates.

// Public exports
pub mod contract;
pub use contract::{
    client::FormsApi, error::FormsError, AuthContext, ContentField, ContentMap, DateOperator,
    DateSearch, EntryChanges, EntryDates, Form, FormChanges, FormEntry, FormFields, FormSettings,
    ListEntriesRequest, Listing, NewEntry, NewForm, NewSuccessEmail, Pagination, ReadScope,
    SortDirection,
};

pub mod module;
pub use module::FormsServiceModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
