//! Client library for the KeyHub admin console.
//!
//! The backend is an external HTTP JSON service; this crate owns the
//! client-side state (projects, current selection), the API wrappers that
//! normalize the backend's failure shapes, persistent session storage, and
//! plain-text rendering of the console's tables.

pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod models;
pub mod render;
pub mod session;
pub mod ui;

pub use api::{AdminApi, ApiClient};
pub use console::{BindingsView, Console};
pub use error::{ApiError, Result};
pub use session::{FileStorage, MemoryStorage, SessionStore, StorageAdapter};
