//! Domain layer - business logic and services

pub mod partition;
pub mod query;
pub mod recaptcha;
pub mod repository;
pub mod service;
pub mod template;
pub mod validation;

pub use partition::{Partition, DEFAULT_PARTITION, SUCCESS_EMAIL_PARTITION};
pub use query::EntryQuery;
pub use repository::{AccessControl, AllowAll, EntryStore, FormRepository};
pub use service::Service;
