pub mod api;
pub mod config;
pub mod courses;
pub mod display;
pub mod error;
pub mod events;
pub mod instances;
pub mod models;
pub mod notice;
pub mod validation;

pub use api::{CatalogApi, CatalogHttpClient};
pub use config::ApiConfig;
pub use error::{AppError, ErrorKind, FieldErrors};
