//! Error taxonomy shared by the workflow, forms and backend client.
//!
//! Every variant is recoverable at the call site. Callers surface
//! [`LaporError::user_message`] and let the user retry.

use crate::status::Status;
use crate::workflow::{Action, Role};

/// Message shown when the backend cannot be reached at all.
pub const NETWORK_MESSAGE: &str = "Tidak dapat terhubung ke server.";

pub type LaporResult<T> = Result<T, LaporError>;

/// A single failed form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Errors produced by this crate.
#[derive(Debug)]
pub enum LaporError {
    /// Transport failure, the request never produced a response
    Network(String),
    /// The backend answered with a non-2xx status or `success: false`
    Server { status: u16, message: String },
    /// Client-side validation blocked the request
    Validation(Vec<FieldError>),
    /// The Role-Action Gate does not offer this action
    NotPermitted {
        action: Action,
        status: Status,
        role: Role,
    },
    /// The viewer's role may not open this management area
    Forbidden { role: Role },
    /// A 2xx response whose body did not match the expected shape
    Decode(String),
    /// Session storage could not be read or written
    Session(String),
    /// Configuration could not be loaded
    Config(String),
}

impl LaporError {
    /// Text suitable for showing to the person who triggered the request.
    pub fn user_message(&self) -> String {
        match self {
            LaporError::Network(_) => NETWORK_MESSAGE.to_string(),
            LaporError::Server { message, .. } => message.clone(),
            LaporError::Validation(fields) => fields
                .first()
                .map(|f| f.message.clone())
                .unwrap_or_else(|| "Data formulir tidak valid.".to_string()),
            LaporError::NotPermitted { .. } => {
                "Aksi ini tidak tersedia untuk status pengaduan saat ini.".to_string()
            }
            LaporError::Forbidden { .. } => "Akses ditolak.".to_string(),
            LaporError::Decode(_) => "Format data dari server tidak valid.".to_string(),
            LaporError::Session(_) => "Sesi tidak valid.".to_string(),
            LaporError::Config(e) => e.clone(),
        }
    }

    /// HTTP status of a server-side rejection, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LaporError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status_code(), Some(401) | Some(403))
    }
}

impl std::fmt::Display for LaporError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LaporError::Network(e) => write!(f, "Network error: {}", e),
            LaporError::Server { status, message } => {
                write!(f, "Server responded {}: {}", status, message)
            }
            LaporError::Validation(fields) => {
                let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
                write!(f, "Validation failed for: {}", names.join(", "))
            }
            LaporError::NotPermitted {
                action,
                status,
                role,
            } => write!(
                f,
                "Action {:?} is not available to {} while complaint is {}",
                action, role, status
            ),
            LaporError::Forbidden { role } => write!(f, "Role {} may not manage accounts", role),
            LaporError::Decode(e) => write!(f, "Unexpected response body: {}", e),
            LaporError::Session(e) => write!(f, "Session error: {}", e),
            LaporError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for LaporError {}

impl From<reqwest::Error> for LaporError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            LaporError::Decode(e.to_string())
        } else {
            LaporError::Network(e.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for LaporError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} tidak valid", field)),
                })
            })
            .collect();
        // field_errors() is a HashMap; keep output stable
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        LaporError::Validation(fields)
    }
}

impl From<config::ConfigError> for LaporError {
    fn from(e: config::ConfigError) -> Self {
        LaporError::Config(e.to_string())
    }
}
