use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::config::{EngineConfig, StatusPolicy};
use crate::models::tenders::{self, TenderStatus};

/// Outcome of one pass of the status sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub updated: usize,
    pub skipped: usize,
    pub unchanged: usize,
}

/// Status a deadline implies at `now`.
///
/// Past the deadline is `Closed`; within `fence_days` of it (inclusive) is `ClosingSoon`;
/// anything later is `Active`. A fence reaching past the end of the calendar covers
/// every future deadline.
pub fn target_status(deadline: DateTime<Utc>, now: DateTime<Utc>, fence_days: i64) -> TenderStatus {
    let fence_end = TimeDelta::try_days(fence_days).and_then(|fence| now.checked_add_signed(fence));
    if deadline < now {
        TenderStatus::Closed
    } else if fence_end.is_none_or(|end| deadline <= end) {
        TenderStatus::ClosingSoon
    } else {
        TenderStatus::Active
    }
}

/// The status the sweep should write for this tender, or `None` to leave it alone.
pub fn next_status(
    tender: &tenders::Model,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Option<TenderStatus> {
    if !tender.published_on_website {
        return None;
    }
    if config.status_policy == StatusPolicy::StickyClosed && tender.status == TenderStatus::Closed {
        return None;
    }

    let deadline = tender.submission_deadline?;
    let target = target_status(deadline, now, config.fence_days());
    (target != tender.status).then_some(target)
}
