//! Entities exchanged with the complaint backend.
//!
//! Field names follow the backend's JSON; Rust names are English.

use crate::list::Identified;
use crate::status::Status;
use crate::workflow::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A citizen complaint ("pengaduan").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: i64,
    #[serde(rename = "judul", default)]
    pub title: String,
    #[serde(rename = "deskripsi", alias = "isi_laporan", default)]
    pub description: String,
    #[serde(rename = "lokasi", default)]
    pub location: String,
    pub status: Status,
    #[serde(rename = "createdAt", alias = "tanggal_pengaduan")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "kategori", default)]
    pub category: Option<CategoryRef>,
    #[serde(rename = "lampiran", default)]
    pub attachments: Vec<Attachment>,
    #[serde(rename = "user", default)]
    pub reporter: Option<Reporter>,
    /// Staff responses, oldest first
    #[serde(rename = "komentar", default)]
    pub comments: Vec<Comment>,
    /// Evidence image paths as listed on history cards
    #[serde(rename = "bukti", default)]
    pub evidence: Vec<String>,
}

/// A staff response attached to a complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub by: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "tanggal", default)]
    pub date: Option<DateTime<Utc>>,
}

/// Category embedded in a complaint; the backend omits the id in some views.
///
/// History rows may carry the category as a bare name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CategoryWire")]
pub struct CategoryRef {
    pub id: Option<i64>,
    #[serde(rename = "nama")]
    pub name: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryWire {
    Name(String),
    Full {
        #[serde(default)]
        id: Option<i64>,
        #[serde(rename = "nama", alias = "nama_kategori", default)]
        name: Option<String>,
    },
}

impl From<CategoryWire> for CategoryRef {
    fn from(wire: CategoryWire) -> Self {
        match wire {
            CategoryWire::Name(name) => CategoryRef {
                id: None,
                name: Some(name),
            },
            CategoryWire::Full { id, name } => CategoryRef { id, name },
        }
    }
}

/// Person who submitted a complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reporter {
    #[serde(rename = "nama_lengkap", default)]
    pub name: Option<String>,
    #[serde(rename = "nik", default)]
    pub national_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "nama", alias = "nama_kategori")]
    pub name: String,
}

/// Image or video evidence attached to a complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    #[serde(rename = "filePath")]
    pub file_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Video,
}

const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "mkv", "webm", "avi"];

/// Lowercased extension of a path, without the dot.
pub(crate) fn extension_of(path: &str) -> Option<String> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

impl Attachment {
    /// Forward slashes only, always rooted.
    pub fn normalized_path(&self) -> String {
        let path = self.file_path.replace('\\', "/");
        if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        }
    }

    /// Absolute URL of the file under the backend's base URL.
    pub fn url(&self, base: &url::Url) -> Result<url::Url, url::ParseError> {
        let base = base.as_str().trim_end_matches('/');
        url::Url::parse(&format!("{}{}", base, self.normalized_path()))
    }

    pub fn kind(&self) -> AttachmentKind {
        match extension_of(&self.file_path) {
            Some(ext) if VIDEO_EXTENSIONS.contains(&ext.as_str()) => AttachmentKind::Video,
            _ => AttachmentKind::Image,
        }
    }

    pub fn mime(&self) -> mime::Mime {
        mime_for_extension(extension_of(&self.file_path).as_deref())
    }
}

/// Content type for an upload or stored file by its extension.
///
/// `.avi` files are reported as `video/mp4`.
pub(crate) fn mime_for_extension(ext: Option<&str>) -> mime::Mime {
    let essence = match ext {
        Some("jpg") | Some("jpeg") => return mime::IMAGE_JPEG,
        Some("png") => return mime::IMAGE_PNG,
        Some("gif") => return mime::IMAGE_GIF,
        Some("webp") => "image/webp",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("mp4") | Some("avi") => "video/mp4",
        _ => return mime::APPLICATION_OCTET_STREAM,
    };
    essence.parse().unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

/// Back-office account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAccount {
    pub id: i64,
    #[serde(rename = "nama_lengkap", alias = "nama")]
    pub name: String,
    pub username: String,
    pub role: Role,
}

/// Registered citizen ("masyarakat").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitizenUser {
    pub id: i64,
    #[serde(rename = "nama_lengkap", alias = "nama", default)]
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(rename = "nik", default)]
    pub national_id: Option<String>,
    #[serde(rename = "no_hp", default)]
    pub phone: Option<String>,
    #[serde(rename = "alamat", default)]
    pub address: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Public announcement ("pengumuman").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: i64,
    #[serde(rename = "judul")]
    pub title: String,
    #[serde(rename = "isi", default)]
    pub content: String,
    /// Stored path of the optional banner image
    #[serde(rename = "gambar", default)]
    pub image: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Complaint counters for the staff dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportStatistics {
    pub total: u64,
    pub pending: u64,
    pub proses: u64,
    pub selesai: u64,
    pub ditolak: u64,
}

/// System-wide counters, master admin only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemStatistics {
    pub total_users: u64,
    pub total_pengaduan: u64,
    pub active_admins: u64,
}

/// One page of a staff listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
}

impl Identified for Complaint {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Category {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for StaffAccount {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for CitizenUser {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Announcement {
    fn id(&self) -> i64 {
        self.id
    }
}
