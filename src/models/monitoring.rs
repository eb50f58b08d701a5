use chrono::{Local, NaiveDate};
use serde::Serialize;

/// Status of a monitoring record, re-derived on every evaluation except for
/// `OnLeave`, which is pinned by an approval and released by the recompute
/// pass once the leave period has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LeaveStatus {
    /// No usable anchor date; the countdown cannot run.
    Unscheduled,
    /// More than the due window away from the anchor date.
    Active,
    /// Inside the due window; awaiting approval or rejection.
    Due,
    /// The anchor date has passed without a decision.
    Overdue,
    /// Approved leave in progress; derived fields are frozen.
    OnLeave,
}

impl LeaveStatus {
    pub fn to_db_str(self) -> &'static str {
        match self {
            LeaveStatus::Unscheduled => "unscheduled",
            LeaveStatus::Active => "active",
            LeaveStatus::Due => "due",
            LeaveStatus::Overdue => "overdue",
            LeaveStatus::OnLeave => "on_leave",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "unscheduled" => Some(LeaveStatus::Unscheduled),
            "active" => Some(LeaveStatus::Active),
            "due" => Some(LeaveStatus::Due),
            "overdue" => Some(LeaveStatus::Overdue),
            "on_leave" => Some(LeaveStatus::OnLeave),
            _ => None,
        }
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_db_str())
    }
}

/// Leave entitlement tier: the number of working days that must elapse
/// before a worker becomes due for leave again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntitlementTier {
    Tier70,
    Tier35,
}

impl EntitlementTier {
    pub fn days(self) -> i64 {
        match self {
            EntitlementTier::Tier70 => 70,
            EntitlementTier::Tier35 => 35,
        }
    }

    pub fn from_days(n: i64) -> Option<Self> {
        match n {
            70 => Some(EntitlementTier::Tier70),
            35 => Some(EntitlementTier::Tier35),
            _ => None,
        }
    }

    /// Resolve the raw upload cell. Only the literal values `70` and `35`
    /// are accepted; an empty cell falls back to the given default.
    pub fn from_upload(raw: &str, default: EntitlementTier) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Some(default);
        }
        match trimmed {
            "70" => Some(EntitlementTier::Tier70),
            "35" => Some(EntitlementTier::Tier35),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitoringRecord {
    pub id: i64,
    pub worker_id: String,              // ⇔ monitoring.worker_id (TEXT)
    pub display_name: String,           // ⇔ monitoring.display_name (TEXT)
    pub unit_tag: Option<String>,       // ⇔ monitoring.unit_tag (TEXT, nullable)
    pub reporting_period: String,       // ⇔ monitoring.reporting_period (TEXT "YYYY-MM")
    pub group_tag: Option<String>,      // ⇔ monitoring.group_tag (TEXT, nullable)
    pub anchor_date: Option<NaiveDate>, // ⇔ monitoring.anchor_date (TEXT "YYYY-MM-DD", nullable)
    pub tier: EntitlementTier,          // ⇔ monitoring.tier (INT, 70 | 35)
    pub next_eligible: Option<NaiveDate>, // ⇔ monitoring.next_eligible (derived)
    pub days_remaining: Option<i64>,    // ⇔ monitoring.days_remaining (derived, signed)
    pub status: LeaveStatus,            // ⇔ monitoring.status (derived, TEXT)
    pub on_site_tag: Option<String>,    // ⇔ monitoring.on_site_tag (TEXT, nullable)
    pub created_at: String,             // ⇔ monitoring.created_at (TEXT, ISO8601)
    pub updated_at: String,             // ⇔ monitoring.updated_at (TEXT, ISO8601)
    pub version: i64,                   // ⇔ monitoring.version (optimistic guard)
}

impl MonitoringRecord {
    pub fn anchor_str(&self) -> String {
        self.anchor_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    pub fn next_eligible_str(&self) -> String {
        self.next_eligible
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    pub fn now_iso() -> String {
        Local::now().to_rfc3339()
    }
}
