//! Funnel summary over the analytics log.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{SessionRecord, SessionStatus, StepId};

/// Derived report, recomputed on demand and never persisted.
///
/// 按需计算、从不持久化的派生报告。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_sessions: u64,
    pub completed_sessions: u64,
    pub skipped_sessions: u64,
    /// `completed / total`, `0.0` for an empty log.
    pub completion_rate: f64,
    /// Mean dwell time per step across the sessions that recorded any.
    pub avg_step_duration_ms: BTreeMap<StepId, f64>,
    /// Skipped sessions per drop-off step.
    pub drop_off_counts: BTreeMap<StepId, u64>,
    /// Sessions that reached each step.
    pub step_view_counts: BTreeMap<StepId, u64>,
}

impl AnalyticsSummary {
    /// Aggregates a full session log in `O(sessions x steps touched)`.
    pub fn from_sessions(sessions: &[SessionRecord]) -> Self {
        let mut summary = AnalyticsSummary::default();
        let mut duration_totals: BTreeMap<StepId, (u64, u64)> = BTreeMap::new();

        for session in sessions {
            summary.total_sessions += 1;
            match session.status {
                SessionStatus::Completed => summary.completed_sessions += 1,
                SessionStatus::Skipped => {
                    summary.skipped_sessions += 1;
                    if let Some(step) = session.drop_off_step {
                        *summary.drop_off_counts.entry(step).or_insert(0) += 1;
                    }
                }
                SessionStatus::InProgress => {}
            }

            for (step, duration) in &session.step_durations_ms {
                let (sum, count) = duration_totals.entry(*step).or_insert((0, 0));
                *sum = sum.saturating_add(*duration);
                *count += 1;
            }

            for step in &session.steps_viewed {
                *summary.step_view_counts.entry(*step).or_insert(0) += 1;
            }
        }

        summary.completion_rate = if summary.total_sessions == 0 {
            0.0
        } else {
            summary.completed_sessions as f64 / summary.total_sessions as f64
        };

        summary.avg_step_duration_ms = duration_totals
            .into_iter()
            .filter(|(_, (_, count))| *count > 0)
            .map(|(step, (sum, count))| (step, sum as f64 / count as f64))
            .collect();

        summary
    }

    /// Step with the most drop-offs; ties resolve to the earliest step.
    pub fn top_drop_off_step(&self) -> Option<StepId> {
        self.drop_off_counts
            .iter()
            .fold(None, |best: Option<(StepId, u64)>, (step, count)| match best {
                Some((_, best_count)) if best_count >= *count => best,
                _ => Some((*step, *count)),
            })
            .map(|(step, _)| step)
    }
}
