//! cadence-core: pure scheduling and scoring logic for the habit engine.
//!
//! No I/O lives here. Date arithmetic, the task activation lifecycle and the
//! statistics math are plain functions over plain values; the maintenance
//! crate wires them to stores and a clock.

pub mod day_policy;
pub mod error;
pub mod scheduler;
pub mod statistics;
pub mod task;
pub mod time;

pub use day_policy::{AllowedDays, next_activation_date};
pub use error::{IterationLimitReached, ScheduleError};
pub use scheduler::{finish_task, is_due_on, record_iteration, reset_task};
pub use statistics::{DayRowView, PeriodStatistics, ScoreSplit, average_period, score_day};
pub use task::{RestrictedDaysPolicy, Task, TaskType};
