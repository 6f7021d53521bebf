//! Aggregate counters for the staff dashboard cards.

use super::ApiClient;
use crate::error::LaporResult;
use crate::models::{ReportStatistics, SystemStatistics};
use crate::workflow::Role;
use reqwest::Method;

/// Everything the dashboard shows for one viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dashboard {
    pub reports: ReportStatistics,
    /// Only loaded for master admins
    pub system: Option<SystemStatistics>,
}

impl ApiClient {
    /// `GET /api/dashboard/statistik-laporan`.
    pub async fn report_statistics(&self) -> LaporResult<ReportStatistics> {
        let reply = self
            .send(self.request(Method::GET, "/api/dashboard/statistik-laporan"))
            .await?;
        reply.data()
    }

    /// `GET /api/master/dashboard/statistik-sistem`.
    pub async fn system_statistics(&self) -> LaporResult<SystemStatistics> {
        let reply = self
            .send(self.request(Method::GET, "/api/master/dashboard/statistik-sistem"))
            .await?;
        reply.data()
    }

    /// Report counters for everyone; system counters for master admins.
    ///
    /// A failing system request leaves `system` empty rather than failing
    /// the whole dashboard.
    pub async fn dashboard(&self, role: Role) -> LaporResult<Dashboard> {
        let reports = self.report_statistics().await?;

        let system = if role == Role::MasterAdmin {
            match self.system_statistics().await {
                Ok(stats) => Some(stats),
                Err(e) => {
                    log::warn!("System statistics unavailable: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Ok(Dashboard { reports, system })
    }
}
