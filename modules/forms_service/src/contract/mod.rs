//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.

pub mod client;
pub mod content;
pub mod error;
pub mod model;

pub use client::FormsApi;
pub use content::{ContentField, ContentMap};
pub use error::FormsError;
pub use model::{
    AuthContext, DateOperator, DateSearch, EntryChanges, EntryDates, Form, FormChanges,
    FormEntry, FormFields, FormSettings, ListEntriesRequest, Listing, NewEntry, NewForm,
    NewSuccessEmail, Pagination, ReadScope, SortDirection,
};
