//! Complaint status vocabulary, stage ordering and timeline completion.
//!
//! The five-stage lifecycle is `pending → diterima → diproses →
//! dilaksanakan → selesai`. `ditolak` is an absorbing alternative that is
//! only reachable from `pending` and never takes part in the stage order.

use crate::models::{Comment, Complaint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle state of a complaint.
///
/// Decoding goes through [`FromStr`](std::str::FromStr), so wire values are
/// case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Diterima,
    /// Older backends report `proses` for this stage
    Diproses,
    Dilaksanakan,
    Selesai,
    Ditolak,
}

/// Canonical order of the non-terminal-alternative stages.
pub const STAGE_ORDER: [Status; 5] = [
    Status::Pending,
    Status::Diterima,
    Status::Diproses,
    Status::Dilaksanakan,
    Status::Selesai,
];

/// Visual tone of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Warning,
    Info,
    Accent,
    Success,
    Neutral,
    Danger,
}

impl Status {
    /// Wire name as the backend spells it.
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Diterima => "diterima",
            Status::Diproses => "diproses",
            Status::Dilaksanakan => "dilaksanakan",
            Status::Selesai => "selesai",
            Status::Ditolak => "ditolak",
        }
    }

    /// Position in [`STAGE_ORDER`]; `None` for `ditolak`.
    pub fn stage_index(self) -> Option<usize> {
        STAGE_ORDER.iter().position(|s| *s == self)
    }

    /// No transition is legal out of a terminal status.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Status::Selesai | Status::Ditolak)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Status::Pending => "Menunggu Verifikasi",
            Status::Diterima => "Diterima",
            Status::Diproses => "Diproses",
            Status::Dilaksanakan => "Dilaksanakan",
            Status::Selesai => "Selesai",
            Status::Ditolak => "Ditolak",
        }
    }

    /// Citizen-facing explanation of what the stage means.
    pub const fn description(self) -> &'static str {
        match self {
            Status::Pending => {
                "Laporan telah masuk ke sistem dan menunggu verifikasi dari petugas."
            }
            Status::Diterima => "Petugas sudah meninjau dan memvalidasi kebenaran laporan.",
            Status::Diproses => "Laporan menunggu persetujuan pimpinan untuk ditindaklanjuti.",
            Status::Dilaksanakan => "Laporan sedang ditangani oleh instansi atau petugas terkait.",
            Status::Selesai => "Masalah telah diselesaikan dan laporan dinyatakan tuntas.",
            Status::Ditolak => concat!(
                "Laporan tidak dapat diproses karena data tidak valid, ",
                "tidak lengkap, atau di luar kewenangan."
            ),
        }
    }

    pub const fn tone(self) -> Tone {
        match self {
            Status::Pending => Tone::Warning,
            Status::Diterima => Tone::Info,
            Status::Diproses => Tone::Accent,
            Status::Dilaksanakan => Tone::Success,
            Status::Selesai => Tone::Neutral,
            Status::Ditolak => Tone::Danger,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "diterima" => Ok(Status::Diterima),
            "diproses" | "proses" => Ok(Status::Diproses),
            "dilaksanakan" => Ok(Status::Dilaksanakan),
            "selesai" => Ok(Status::Selesai),
            "ditolak" => Ok(Status::Ditolak),
            other => Err(format!("unknown complaint status: {}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Whether `stage` renders as reached for a complaint currently at `current`.
///
/// An unknown (not yet loaded) status completes nothing. A rejected
/// complaint only shows `pending` as reached.
pub fn is_stage_complete(current: Option<Status>, stage: Status) -> bool {
    let current = match current {
        Some(current) => current,
        None => return false,
    };

    if current == Status::Ditolak {
        return stage == Status::Pending;
    }

    match (current.stage_index(), stage.stage_index()) {
        (Some(cur), Some(step)) => cur >= step,
        _ => false,
    }
}

/// One row of a rendered timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineStep {
    pub status: Status,
    pub label: &'static str,
    pub description: &'static str,
    pub complete: bool,
    /// Staff comment left for this stage
    pub note: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Precomputed timeline for a tracking or history page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub steps: Vec<TimelineStep>,
    /// Render a dedicated rejection banner instead of further stages
    pub rejected: bool,
    pub rejection_note: Option<String>,
}

/// Word a staff comment mentions when it belongs to `stage`.
fn comment_keyword(stage: Status) -> Option<&'static str> {
    match stage {
        Status::Pending => None,
        Status::Diterima => Some("terima"),
        Status::Diproses => Some("proses"),
        Status::Dilaksanakan => Some("laksana"),
        Status::Selesai => Some("selesai"),
        Status::Ditolak => Some("tolak"),
    }
}

/// First comment whose message mentions `stage`.
fn stage_comment(comments: &[Comment], stage: Status) -> Option<&Comment> {
    let keyword = comment_keyword(stage)?;
    comments
        .iter()
        .find(|c| c.message.to_lowercase().contains(keyword))
}

impl Timeline {
    pub fn for_status(current: Option<Status>) -> Self {
        let steps = STAGE_ORDER
            .iter()
            .map(|&stage| TimelineStep {
                status: stage,
                label: stage.label(),
                description: stage.description(),
                complete: is_stage_complete(current, stage),
                note: None,
                date: None,
            })
            .collect();

        Self {
            steps,
            rejected: current == Some(Status::Ditolak),
            rejection_note: None,
        }
    }

    /// Timeline with staff comments and dates filled in.
    ///
    /// `pending` is dated by the submission time; later stages take the
    /// first comment mentioning them.
    pub fn for_complaint(complaint: &Complaint) -> Self {
        let mut timeline = Self::for_status(Some(complaint.status));

        for step in timeline.steps.iter_mut() {
            if step.status == Status::Pending {
                step.date = Some(complaint.created_at);
            } else if let Some(comment) = stage_comment(&complaint.comments, step.status) {
                step.note = Some(comment.message.clone());
                step.date = comment.date;
            }
        }

        if timeline.rejected {
            timeline.rejection_note =
                stage_comment(&complaint.comments, Status::Ditolak).map(|c| c.message.clone());
        }
        timeline
    }

    /// The furthest reached step, if any.
    pub fn current_step(&self) -> Option<&TimelineStep> {
        self.steps.iter().rev().find(|s| s.complete)
    }
}
