//! Request bodies validated before anything is sent.
//!
//! A form that fails validation never reaches the network; the caller gets
//! [`LaporError::Validation`] with one message per offending field.

use crate::app_config::UploadConfig;
use crate::error::{FieldError, LaporError, LaporResult};
use crate::models::extension_of;
use crate::workflow::Role;
use serde::Serialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut e = ValidationError::new(code);
    e.message = Some(Cow::Borrowed(message));
    e
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(field_error("required", "Kolom ini wajib diisi"));
    }
    Ok(())
}

fn validate_nik(value: &str) -> Result<(), ValidationError> {
    if value.len() != 16 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(field_error("nik", "NIK harus terdiri dari 16 digit angka"));
    }
    Ok(())
}

fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits = value.strip_prefix('+').unwrap_or(value);
    if !(9..=15).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(field_error("no_hp", "Nomor HP tidak valid"));
    }
    Ok(())
}

/// Run the derived rules of any form.
pub fn check<T: Validate>(form: &T) -> LaporResult<()> {
    form.validate().map_err(LaporError::from)
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginForm {
    #[validate(custom = "not_blank")]
    pub username: String,
    #[validate(custom = "not_blank")]
    pub password: String,
}

/// Citizen self-registration.
#[derive(Debug, Clone, Validate)]
pub struct RegisterForm {
    #[validate(custom = "not_blank")]
    pub nama_lengkap: String,
    #[validate(custom = "validate_nik")]
    pub nik: String,
    #[validate(custom = "validate_phone")]
    pub no_hp: String,
    #[validate(custom = "not_blank")]
    pub dusun: String,
    #[validate(custom = "not_blank")]
    pub rt: String,
    #[validate(custom = "not_blank")]
    pub rw: String,
    #[validate(custom = "not_blank")]
    pub alamat_detail: String,
    #[validate(custom = "not_blank")]
    pub username: String,
    #[validate(length(min = 6, message = "Password minimal 6 karakter"))]
    pub password: String,
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub nama_lengkap: String,
    pub nik: String,
    pub no_hp: String,
    pub alamat: String,
    pub username: String,
    pub password: String,
}

impl RegisterForm {
    /// Address as a single line, `Dusun X, RT a, RW b, detail`.
    pub fn alamat(&self) -> String {
        format!(
            "Dusun {}, RT {}, RW {}, {}",
            self.dusun.trim(),
            self.rt.trim(),
            self.rw.trim(),
            self.alamat_detail.trim()
        )
    }

    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            nama_lengkap: self.nama_lengkap.trim().to_string(),
            nik: self.nik.clone(),
            no_hp: self.no_hp.clone(),
            alamat: self.alamat(),
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// A file chosen as complaint evidence.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl AttachmentUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn mime(&self) -> mime::Mime {
        crate::models::mime_for_extension(extension_of(&self.file_name).as_deref())
    }

    /// Check type and size against the upload limits.
    pub fn check(&self, limits: &UploadConfig) -> LaporResult<()> {
        let ext = extension_of(&self.file_name).unwrap_or_default();
        if !limits.allowed_extensions.iter().any(|a| a.eq_ignore_ascii_case(&ext)) {
            return Err(LaporError::Validation(vec![FieldError {
                field: "lampiran".to_string(),
                message: format!("Jenis file .{} tidak didukung", ext),
            }]));
        }
        if self.bytes.len() as u64 > limits.max_attachment_bytes() {
            return Err(LaporError::Validation(vec![FieldError {
                field: "lampiran".to_string(),
                message: format!("Ukuran file maksimal {} MB", limits.max_attachment_mb),
            }]));
        }
        Ok(())
    }
}

/// New complaint from a signed-in citizen.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct ComplaintForm {
    #[validate(custom = "not_blank")]
    pub judul: String,
    #[validate(custom = "not_blank")]
    pub isi_laporan: String,
    #[validate(range(min = 1, message = "Pilih kategori"))]
    pub kategori_id: i64,
    #[validate(custom = "not_blank")]
    pub lokasi: String,
    #[serde(skip)]
    pub attachment: Option<AttachmentUpload>,
}

impl ComplaintForm {
    /// Field rules plus attachment limits.
    pub fn check(&self, limits: &UploadConfig) -> LaporResult<()> {
        check(self)?;
        if let Some(attachment) = &self.attachment {
            attachment.check(limits)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CategoryForm {
    #[validate(custom = "not_blank")]
    pub nama: String,
}

/// Create or edit a staff account.
///
/// An empty password on edit keeps the current one.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct StaffAccountForm {
    #[validate(custom = "not_blank")]
    pub nama_lengkap: String,
    #[validate(custom = "not_blank")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub role: Role,
}

impl StaffAccountForm {
    pub fn check_new(&self) -> LaporResult<()> {
        self.check_password(false)
    }

    pub fn check_update(&self) -> LaporResult<()> {
        self.check_password(true)
    }

    fn check_password(&self, allow_empty: bool) -> LaporResult<()> {
        let mut fields = match check(self) {
            Ok(()) => Vec::new(),
            Err(LaporError::Validation(fields)) => fields,
            Err(e) => return Err(e),
        };

        let keep_current = allow_empty && self.password.is_empty();
        if !keep_current && self.password.chars().count() < 6 {
            fields.push(FieldError {
                field: "password".to_string(),
                message: "Password minimal 6 karakter".to_string(),
            });
        }

        if fields.is_empty() {
            Ok(())
        } else {
            Err(LaporError::Validation(fields))
        }
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct AnnouncementForm {
    #[validate(custom = "not_blank")]
    pub judul: String,
    #[validate(custom = "not_blank")]
    pub isi: String,
    #[serde(skip)]
    pub image: Option<AttachmentUpload>,
}
