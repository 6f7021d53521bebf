//! Complaint submission, tracking and the staff workflow endpoints.

use super::{file_part, ApiClient, ListQuery};
use crate::app_config::UploadConfig;
use crate::error::{LaporError, LaporResult};
use crate::forms::{AttachmentUpload, ComplaintForm};
use crate::models::{Complaint, Page};
use crate::status::Status;
use crate::workflow::{Action, WorkflowBackend};
use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::Method;
use serde::Serialize;

/// Outcome of a two-step submission.
///
/// The complaint exists even when the attachment upload failed; the upload
/// error is kept as a warning for the user.
#[derive(Debug)]
pub struct Submission {
    pub complaint: Complaint,
    pub attachment_warning: Option<LaporError>,
}

#[derive(Serialize)]
struct VerifyBody {
    status: Status,
}

impl ApiClient {
    /// `POST /api/pengaduan` as multipart, evidence in the `gambar` part.
    pub async fn submit_complaint(
        &self,
        form: &ComplaintForm,
        limits: &UploadConfig,
    ) -> LaporResult<Complaint> {
        form.check(limits)?;

        let mut multipart = Form::new()
            .text("judul", form.judul.trim().to_string())
            .text("isi_laporan", form.isi_laporan.trim().to_string())
            .text("kategori_id", form.kategori_id.to_string())
            .text("lokasi", form.lokasi.trim().to_string());
        if let Some(attachment) = &form.attachment {
            multipart = multipart.part("gambar", file_part(attachment)?);
        }

        let reply = self
            .send(self.request(Method::POST, "/api/pengaduan").multipart(multipart))
            .await?;
        let complaint: Complaint = reply.data_item("pengaduan")?;
        log::info!("Complaint {} submitted", complaint.id);
        Ok(complaint)
    }

    /// Create the complaint as JSON, then upload its attachment separately.
    pub async fn submit_with_attachment(
        &self,
        form: &ComplaintForm,
        limits: &UploadConfig,
    ) -> LaporResult<Submission> {
        form.check(limits)?;

        let reply = self
            .send(self.request(Method::POST, "/api/pengaduan").json(form))
            .await?;
        let complaint: Complaint = reply.data_item("pengaduan")?;
        log::info!("Complaint {} submitted", complaint.id);

        let attachment_warning = match &form.attachment {
            Some(attachment) => match self.upload_attachment(complaint.id, attachment).await {
                Ok(()) => None,
                Err(e) => {
                    log::warn!("Complaint {} saved without attachment: {}", complaint.id, e);
                    Some(e)
                }
            },
            None => None,
        };

        Ok(Submission {
            complaint,
            attachment_warning,
        })
    }

    /// `POST /api/pengaduan/:id/lampiran`.
    pub async fn upload_attachment(
        &self,
        complaint_id: i64,
        upload: &AttachmentUpload,
    ) -> LaporResult<()> {
        let multipart = Form::new().part("lampiran", file_part(upload)?);
        let path = format!("/api/pengaduan/{}/lampiran", complaint_id);
        self.send(self.request(Method::POST, &path).multipart(multipart))
            .await?;
        Ok(())
    }

    /// Complaint history of the signed-in citizen.
    pub async fn my_complaints(&self) -> LaporResult<Vec<Complaint>> {
        let reply = self
            .send(self.request(Method::GET, "/api/pengaduan/saya"))
            .await?;
        reply.data_list("pengaduan")
    }

    /// One of the signed-in citizen's complaints, for tracking.
    pub async fn my_complaint(&self, complaint_id: i64) -> LaporResult<Complaint> {
        let path = format!("/api/pengaduan/saya/{}", complaint_id);
        let reply = self.send(self.request(Method::GET, &path)).await?;
        reply.data_item("pengaduan")
    }

    /// `GET /api/admin/pengaduan` with paging and search.
    pub async fn staff_complaints(&self, query: &ListQuery) -> LaporResult<Page<Complaint>> {
        let reply = self
            .send(self.request(Method::GET, "/api/admin/pengaduan").query(query))
            .await?;
        reply.data_page("pengaduan")
    }

    pub async fn staff_complaint(&self, complaint_id: i64) -> LaporResult<Complaint> {
        let path = format!("/api/admin/pengaduan/{}", complaint_id);
        let reply = self.send(self.request(Method::GET, &path)).await?;
        reply.data_item("pengaduan")
    }

    /// `PUT .../verifikasi`, `decision` is `diterima` or `ditolak`.
    pub async fn verify_complaint(&self, complaint_id: i64, decision: Status) -> LaporResult<()> {
        let path = format!("/api/admin/pengaduan/{}/verifikasi", complaint_id);
        self.send(
            self.request(Method::PUT, &path)
                .json(&VerifyBody { status: decision }),
        )
        .await?;
        Ok(())
    }

    /// `PUT .../persetujuan`.
    pub async fn approve_complaint(&self, complaint_id: i64) -> LaporResult<()> {
        let path = format!("/api/admin/pengaduan/{}/persetujuan", complaint_id);
        self.send(self.request(Method::PUT, &path)).await?;
        Ok(())
    }

    /// `PUT .../selesai`.
    pub async fn complete_complaint(&self, complaint_id: i64) -> LaporResult<()> {
        let path = format!("/api/admin/pengaduan/{}/selesai", complaint_id);
        self.send(self.request(Method::PUT, &path)).await?;
        Ok(())
    }

    /// Printable report, raw PDF bytes.
    pub async fn complaint_pdf(&self, complaint_id: i64) -> LaporResult<Vec<u8>> {
        let path = format!("/api/admin/pengaduan/{}/pdf", complaint_id);
        self.send_bytes(self.request(Method::GET, &path)).await
    }
}

/// File name offered when saving [`ApiClient::complaint_pdf`].
pub fn pdf_file_name(complaint_id: i64) -> String {
    format!("Laporan-Pengaduan-{}.pdf", complaint_id)
}

#[async_trait]
impl WorkflowBackend for ApiClient {
    async fn transition(&self, complaint_id: i64, action: Action) -> LaporResult<()> {
        match action {
            Action::Accept | Action::Reject => {
                self.verify_complaint(complaint_id, action.target_status())
                    .await
            }
            Action::ApproveExecution => self.approve_complaint(complaint_id).await,
            Action::MarkComplete => self.complete_complaint(complaint_id).await,
        }
    }

    async fn fetch_complaint(&self, complaint_id: i64) -> LaporResult<Complaint> {
        self.staff_complaint(complaint_id).await
    }
}
