//! Staff roles, the Role-Action Gate and the transition executor.
//!
//! Pages never re-derive who may do what: they ask [`available_actions`]
//! for the buttons to show and hand the chosen [`Action`] to [`execute`].

use crate::error::{LaporError, LaporResult};
use crate::models::Complaint;
use crate::status::{Status, Tone};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Back-office role of a staff account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    /// Approver who releases accepted complaints for execution
    Pimpinan,
    MasterAdmin,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Pimpinan => "pimpinan",
            Role::MasterAdmin => "master_admin",
        }
    }

    /// Verification and closing rights.
    pub const fn is_verifier(self) -> bool {
        matches!(self, Role::Admin | Role::MasterAdmin)
    }

    /// Staff accounts and the citizen directory are master admin only.
    pub const fn can_manage_accounts(self) -> bool {
        matches!(self, Role::MasterAdmin)
    }

    pub fn ensure_can_manage_accounts(self) -> LaporResult<()> {
        if self.can_manage_accounts() {
            Ok(())
        } else {
            Err(LaporError::Forbidden { role: self })
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "pimpinan" => Ok(Role::Pimpinan),
            "master_admin" => Ok(Role::MasterAdmin),
            other => Err(format!("unknown staff role: {}", other)),
        }
    }
}

/// A workflow transition a staff member can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Accept,
    Reject,
    ApproveExecution,
    MarkComplete,
}

/// Confirmation dialog content shown before an action is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub title: &'static str,
    pub message: &'static str,
    pub tone: Tone,
}

impl Action {
    pub const fn label(self) -> &'static str {
        match self {
            Action::Accept => "Terima Aduan",
            Action::Reject => "Tolak Aduan",
            Action::ApproveExecution => "Setujui Pelaksanaan",
            Action::MarkComplete => "Tandai Selesai",
        }
    }

    pub const fn target_status(self) -> Status {
        match self {
            Action::Accept => Status::Diterima,
            Action::Reject => Status::Ditolak,
            Action::ApproveExecution => Status::Dilaksanakan,
            Action::MarkComplete => Status::Selesai,
        }
    }

    pub const fn prompt(self) -> Prompt {
        match self {
            Action::Accept => Prompt {
                title: "Terima Pengaduan?",
                message: "Aduan akan diteruskan ke Pimpinan untuk persetujuan.",
                tone: Tone::Info,
            },
            Action::Reject => Prompt {
                title: "Tolak Pengaduan?",
                message: "Aduan akan ditolak dan tidak diproses lebih lanjut.",
                tone: Tone::Danger,
            },
            Action::ApproveExecution => Prompt {
                title: "Setujui Pelaksanaan?",
                message: concat!(
                    "Apakah Anda yakin menyetujui aduan ini untuk segera ",
                    "dilaksanakan oleh tim teknisi?"
                ),
                tone: Tone::Success,
            },
            Action::MarkComplete => Prompt {
                title: "Tandai Selesai?",
                message: concat!(
                    "Pastikan pekerjaan lapangan telah benar-benar selesai ",
                    "sebelum menutup aduan ini secara permanen."
                ),
                tone: Tone::Success,
            },
        }
    }
}

/// Actions `role` may take on a complaint currently at `status`.
pub fn available_actions(status: Status, role: Role) -> Vec<Action> {
    if status.is_terminal() {
        return Vec::new();
    }

    match (role, status) {
        (r, Status::Pending) if r.is_verifier() => vec![Action::Accept, Action::Reject],
        (Role::Pimpinan, Status::Diterima | Status::Diproses) => vec![Action::ApproveExecution],
        (r, Status::Dilaksanakan) if r.is_verifier() => vec![Action::MarkComplete],
        _ => Vec::new(),
    }
}

pub fn is_action_available(status: Status, role: Role, action: Action) -> bool {
    available_actions(status, role).contains(&action)
}

/// Backend calls the executor needs.
#[async_trait]
pub trait WorkflowBackend: Send + Sync {
    /// Send the state-changing request for `action`.
    async fn transition(&self, complaint_id: i64, action: Action) -> LaporResult<()>;

    /// Staff view of a single complaint.
    async fn fetch_complaint(&self, complaint_id: i64) -> LaporResult<Complaint>;
}

/// Run `action` against `complaint` and return the refreshed record.
///
/// Nothing is sent when the gate does not offer the action. On failure the
/// caller keeps its current record.
pub async fn execute<B>(
    backend: &B,
    complaint: &Complaint,
    role: Role,
    action: Action,
) -> LaporResult<Complaint>
where
    B: WorkflowBackend + ?Sized,
{
    if !is_action_available(complaint.status, role, action) {
        return Err(LaporError::NotPermitted {
            action,
            status: complaint.status,
            role,
        });
    }

    backend.transition(complaint.id, action).await?;
    log::info!(
        "Complaint {} moved {} -> {} by {}",
        complaint.id,
        complaint.status,
        action.target_status(),
        role
    );

    backend.fetch_complaint(complaint.id).await
}
