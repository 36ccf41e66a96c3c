//! Aggregate counts returned by the stats and dashboard endpoints.

use std::collections::BTreeMap;

use serde::Serialize;

use corpsite_core::Labelled;

/// `part / (part + other) × 100`, or 0 when both are zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rate(part: i64, other: i64) -> f64 {
    let total = part + other;
    if total <= 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Per-status counts keyed by label, with every status present.
#[must_use]
pub fn status_counts<S: Labelled>(rows: impl IntoIterator<Item = (S, i64)>) -> BTreeMap<&'static str, i64> {
    let mut counts: BTreeMap<&'static str, i64> = S::ALL.iter().map(|s| (s.as_str(), 0)).collect();
    for (status, count) in rows {
        *counts.entry(status.as_str()).or_default() += count;
    }
    counts
}

/// Visibility counts for content entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ActiveCounts {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
}

// =============================================================================
// Dashboard summaries
// =============================================================================

/// Contact totals by status.
#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
    pub total: i64,
    pub new: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub closed: i64,
    /// Share of finished contacts that were resolved rather than closed.
    #[sqlx(skip)]
    pub resolved_percentage: f64,
}

impl ContactSummary {
    #[must_use]
    pub fn with_rates(mut self) -> Self {
        self.resolved_percentage = rate(self.resolved, self.closed);
        self
    }
}

/// Job application totals by status.
#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationSummary {
    pub total: i64,
    pub new: i64,
    pub reviewed: i64,
    pub shortlisted: i64,
    pub rejected: i64,
    pub hired: i64,
    #[sqlx(skip)]
    pub hired_percentage: f64,
}

impl JobApplicationSummary {
    #[must_use]
    pub fn with_rates(mut self) -> Self {
        self.hired_percentage = rate(self.hired, self.rejected);
        self
    }
}

/// Hire-developer totals by status; also the body of its stats endpoint.
#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HireDeveloperSummary {
    pub total: i64,
    pub new: i64,
    pub reviewed: i64,
    pub quoted: i64,
    pub negotiating: i64,
    pub accepted: i64,
    pub rejected: i64,
    #[sqlx(skip)]
    pub acceptance_rate: f64,
}

impl HireDeveloperSummary {
    #[must_use]
    pub fn with_rates(mut self) -> Self {
        self.acceptance_rate = rate(self.accepted, self.rejected);
        self
    }
}

/// Open position visibility and remote split.
#[derive(Debug, Clone, Copy, Default, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OpenPositionSummary {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    pub remote: i64,
    pub on_site: i64,
}

/// Everything the dashboard shows, gathered in one call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub contact_stats: ContactSummary,
    pub job_application_stats: JobApplicationSummary,
    pub hire_developer_stats: HireDeveloperSummary,
    pub open_position_stats: OpenPositionSummary,
    pub product_stats: ActiveCounts,
    pub service_stats: ActiveCounts,
    pub testimonial_stats: ActiveCounts,
}
