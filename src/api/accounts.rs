//! Staff account management and the citizen user directory.
//!
//! Both areas belong to master admins. Every call takes the viewer's role
//! and fails with [`LaporError::Forbidden`](crate::error::LaporError) before
//! anything is sent when that role may not manage accounts.

use super::{ApiClient, ListQuery};
use crate::error::LaporResult;
use crate::forms::StaffAccountForm;
use crate::list::remove_after_delete;
use crate::models::{CitizenUser, Page, StaffAccount};
use crate::workflow::Role;
use reqwest::Method;

impl ApiClient {
    /// `GET /api/admin/admins`.
    pub async fn staff_accounts(&self, viewer: Role) -> LaporResult<Vec<StaffAccount>> {
        viewer.ensure_can_manage_accounts()?;
        let reply = self
            .send(self.request(Method::GET, "/api/admin/admins"))
            .await?;
        reply.data_list("admins")
    }

    pub async fn staff_account(
        &self,
        viewer: Role,
        account_id: i64,
    ) -> LaporResult<StaffAccount> {
        viewer.ensure_can_manage_accounts()?;
        let path = format!("/api/admin/admins/{}", account_id);
        let reply = self.send(self.request(Method::GET, &path)).await?;
        reply.data_item("admin")
    }

    pub async fn create_staff_account(
        &self,
        viewer: Role,
        form: &StaffAccountForm,
    ) -> LaporResult<StaffAccount> {
        viewer.ensure_can_manage_accounts()?;
        form.check_new()?;
        let reply = self
            .send(self.request(Method::POST, "/api/admin/admins").json(form))
            .await?;
        let account: StaffAccount = reply.data_item("admin")?;
        log::info!("Staff account {} created as {}", account.username, account.role);
        Ok(account)
    }

    /// Leaves the password unchanged when the form's password is empty.
    pub async fn update_staff_account(
        &self,
        viewer: Role,
        account_id: i64,
        form: &StaffAccountForm,
    ) -> LaporResult<()> {
        viewer.ensure_can_manage_accounts()?;
        form.check_update()?;
        let path = format!("/api/admin/admins/{}", account_id);
        self.send(self.request(Method::PUT, &path).json(form)).await?;
        Ok(())
    }

    pub async fn delete_staff_account(&self, viewer: Role, account_id: i64) -> LaporResult<()> {
        viewer.ensure_can_manage_accounts()?;
        let path = format!("/api/admin/admins/{}", account_id);
        self.send(self.request(Method::DELETE, &path)).await?;
        log::info!("Staff account {} deleted", account_id);
        Ok(())
    }

    pub async fn delete_staff_account_from(
        &self,
        viewer: Role,
        list: &mut Vec<StaffAccount>,
        account_id: i64,
    ) -> LaporResult<()> {
        remove_after_delete(
            list,
            account_id,
            self.delete_staff_account(viewer, account_id),
        )
        .await
    }

    /// `GET /api/admin/users` with paging and search.
    pub async fn citizens(
        &self,
        viewer: Role,
        query: &ListQuery,
    ) -> LaporResult<Page<CitizenUser>> {
        viewer.ensure_can_manage_accounts()?;
        let reply = self
            .send(self.request(Method::GET, "/api/admin/users").query(query))
            .await?;
        reply.data_page("users")
    }

    pub async fn delete_citizen(&self, viewer: Role, user_id: i64) -> LaporResult<()> {
        viewer.ensure_can_manage_accounts()?;
        let path = format!("/api/admin/users/{}", user_id);
        self.send(self.request(Method::DELETE, &path)).await?;
        log::info!("Citizen {} deleted", user_id);
        Ok(())
    }

    pub async fn delete_citizen_from(
        &self,
        viewer: Role,
        list: &mut Vec<CitizenUser>,
        user_id: i64,
    ) -> LaporResult<()> {
        remove_after_delete(list, user_id, self.delete_citizen(viewer, user_id)).await
    }
}
