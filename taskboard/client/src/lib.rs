//! Client side of Taskboard: an HTTP client for the task API, the
//! [`TaskManager`] that keeps a local replica of the task collection in sync
//! with the server, and plain-text view helpers.
pub mod api;
pub mod error;
pub mod manager;
pub mod view;

pub use api::{DEFAULT_API_URL, HttpTaskApi, TaskApi};
pub use error::{BulkFailure, ClientError};
pub use manager::{BulkAction, ParseBulkActionError, TaskManager};
