//! Announcements ("pengumuman").

use super::{file_part, ApiClient};
use crate::error::LaporResult;
use crate::forms::{check, AnnouncementForm};
use crate::list::remove_after_delete;
use crate::models::Announcement;
use reqwest::multipart::Form;
use reqwest::Method;

fn multipart(form: &AnnouncementForm) -> LaporResult<Form> {
    let mut multipart = Form::new()
        .text("judul", form.judul.trim().to_string())
        .text("isi", form.isi.trim().to_string());
    if let Some(image) = &form.image {
        multipart = multipart.part("gambar", file_part(image)?);
    }
    Ok(multipart)
}

impl ApiClient {
    pub async fn announcements(&self) -> LaporResult<Vec<Announcement>> {
        let reply = self.send(self.request(Method::GET, "/api/pengumuman")).await?;
        reply.data_list("pengumuman")
    }

    pub async fn announcement(&self, announcement_id: i64) -> LaporResult<Announcement> {
        let path = format!("/api/pengumuman/{}", announcement_id);
        let reply = self.send(self.request(Method::GET, &path)).await?;
        reply.data_item("pengumuman")
    }

    pub async fn create_announcement(&self, form: &AnnouncementForm) -> LaporResult<Announcement> {
        check(form)?;
        let reply = self
            .send(
                self.request(Method::POST, "/api/pengumuman")
                    .multipart(multipart(form)?),
            )
            .await?;
        reply.data_item("pengumuman")
    }

    pub async fn update_announcement(
        &self,
        announcement_id: i64,
        form: &AnnouncementForm,
    ) -> LaporResult<()> {
        check(form)?;
        let path = format!("/api/pengumuman/{}", announcement_id);
        self.send(self.request(Method::PUT, &path).multipart(multipart(form)?))
            .await?;
        Ok(())
    }

    pub async fn delete_announcement(&self, announcement_id: i64) -> LaporResult<()> {
        let path = format!("/api/pengumuman/{}", announcement_id);
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    pub async fn delete_announcement_from(
        &self,
        list: &mut Vec<Announcement>,
        announcement_id: i64,
    ) -> LaporResult<()> {
        remove_after_delete(
            list,
            announcement_id,
            self.delete_announcement(announcement_id),
        )
        .await
    }
}
