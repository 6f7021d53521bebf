//! Complaint categories: public listing, staff CRUD.

use super::ApiClient;
use crate::error::LaporResult;
use crate::forms::{check, CategoryForm};
use crate::list::remove_after_delete;
use crate::models::Category;
use reqwest::Method;

impl ApiClient {
    /// `GET /api/kategori`.
    pub async fn categories(&self) -> LaporResult<Vec<Category>> {
        let reply = self.send(self.request(Method::GET, "/api/kategori")).await?;
        reply.data_list("kategori")
    }

    pub async fn category(&self, category_id: i64) -> LaporResult<Category> {
        let path = format!("/api/kategori/{}", category_id);
        let reply = self.send(self.request(Method::GET, &path)).await?;
        reply.data_item("kategori")
    }

    pub async fn create_category(&self, form: &CategoryForm) -> LaporResult<Category> {
        check(form)?;
        let reply = self
            .send(self.request(Method::POST, "/api/admin/kategori").json(form))
            .await?;
        reply.data_item("kategori")
    }

    pub async fn update_category(&self, category_id: i64, form: &CategoryForm) -> LaporResult<()> {
        check(form)?;
        let path = format!("/api/admin/kategori/{}", category_id);
        self.send(self.request(Method::PUT, &path).json(form)).await?;
        Ok(())
    }

    pub async fn delete_category(&self, category_id: i64) -> LaporResult<()> {
        let path = format!("/api/admin/kategori/{}", category_id);
        self.send(self.request(Method::DELETE, &path)).await?;
        log::info!("Category {} deleted", category_id);
        Ok(())
    }

    /// Delete and, once confirmed, drop the category from `list`.
    pub async fn delete_category_from(
        &self,
        list: &mut Vec<Category>,
        category_id: i64,
    ) -> LaporResult<()> {
        remove_after_delete(list, category_id, self.delete_category(category_id)).await
    }
}
