//! Client-side core of a village citizen-complaint service.
//!
//! Citizens file complaints ("pengaduan") and follow them through
//! verification, approval and execution; staff (admin, pimpinan,
//! master admin) move them along the workflow. This crate holds the status
//! model, the role-action gate, session handling, form validation and a
//! typed client for the backend's REST API.

pub mod api;
pub mod app_config;
pub mod error;
pub mod forms;
pub mod list;
pub mod models;
pub mod session;
pub mod status;
pub mod workflow;

pub use api::{ApiClient, ListQuery};
pub use error::{LaporError, LaporResult};
pub use status::{is_stage_complete, Status, Timeline};
pub use workflow::{available_actions, Action, Role};
