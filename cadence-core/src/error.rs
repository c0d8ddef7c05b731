//! Typed failures for the scheduling and scoring paths.

use thiserror::Error;

/// Fatal scheduling failures.
///
/// Either variant means the task's activation cannot be advanced; the caller
/// must abort that user's maintenance replay and retry later rather than skip
/// the task, which would desynchronize its `next_activation_at`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleError {
    /// The allowed-days mask has no weekday bit set. An all-zero mask is a
    /// hard failure, never a silent "every day" default.
    #[error("allowed-days mask is empty: at least one weekday must be permitted")]
    EmptyAllowedDays,

    /// Forward scan walked a full week without hitting an allowed day.
    /// A non-empty mask always matches within 7 days, so reaching the bound
    /// means the mask decode was bypassed somewhere upstream.
    #[error("no allowed weekday found within a full week of forward scanning")]
    ScanBoundExceeded,
}

/// Rejection for the interactive record path: the task has already been
/// performed as many times as its limit allows for this activation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("iteration limit of {limit} reached for this activation")]
pub struct IterationLimitReached {
    pub limit: u32,
}
