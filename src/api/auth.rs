//! Credential exchange for citizens and staff.

use super::ApiClient;
use crate::error::LaporResult;
use crate::forms::{check, LoginForm, RegisterForm};
use crate::models::{CitizenUser, StaffAccount};
use crate::session::{CitizenSession, Session, StaffSession};
use reqwest::Method;

impl ApiClient {
    /// `POST /api/auth/login`; the session comes from `data.{token,user}`.
    pub async fn login(&self, form: &LoginForm) -> LaporResult<CitizenSession> {
        check(form)?;

        let reply = self
            .send(self.request(Method::POST, "/api/auth/login").json(form))
            .await?;

        let token: String = reply.data_item("token")?;
        let user: CitizenUser = reply.data_item("user")?;
        log::info!("Citizen {} logged in", user.id);
        Ok(Session::new(token, user))
    }

    /// `POST /api/auth/register`; returns the backend's confirmation text.
    pub async fn register(&self, form: &RegisterForm) -> LaporResult<String> {
        check(form)?;

        let reply = self
            .send(
                self.request(Method::POST, "/api/auth/register")
                    .json(&form.to_request()),
            )
            .await?;

        Ok(reply
            .message()
            .unwrap_or_else(|| "Registrasi berhasil.".to_string()))
    }

    /// `POST /api/admin/login`.
    ///
    /// The staff endpoint puts the token beside `data` instead of inside it;
    /// both layouts are accepted.
    pub async fn staff_login(&self, form: &LoginForm) -> LaporResult<StaffSession> {
        check(form)?;

        let reply = self
            .send(self.request(Method::POST, "/api/admin/login").json(form))
            .await?;

        let session = if reply.has_field("token") {
            Session::new(reply.field::<String>("token")?, reply.data::<StaffAccount>()?)
        } else {
            Session::new(
                reply.data_item::<String>("token")?,
                reply.data_item::<StaffAccount>("user")?,
            )
        };

        log::info!(
            "Staff {} logged in as {}",
            session.user.username,
            session.user.role
        );
        Ok(session)
    }
}
