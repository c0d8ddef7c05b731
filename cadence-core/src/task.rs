//! Task model for the recurring-activation engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::day_policy::AllowedDays;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    /// Score starts at zero; each iteration adds points.
    ToDo,
    /// Score starts at the maximum; each iteration subtracts points.
    NotToDo,
}

/// How to pick an activation date when the repeat-interval candidate lands on
/// a restricted weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestrictedDaysPolicy {
    /// Prefer the nearest allowed day at or before the candidate (but never
    /// the current activation itself); fall forward only if none exists.
    Before,
    /// Always search forward past the candidate.
    After,
}

/// Core task type.
///
/// Note: we keep this small + serializable. Storage is a later layer; every
/// lifecycle operation returns the updated value and leaves persistence to
/// the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub user_id: u64,
    pub name: String,

    pub task_type: TaskType,
    pub is_optional: bool,
    pub is_recurring: bool,

    /// >= 1, multiplies the base points of every iteration.
    pub difficulty: u32,

    /// 0 <= count <= limit for the current activation.
    pub iteration_count: u32,
    pub iteration_limit: u32,

    pub current_score: i64,
    /// base_points * difficulty * iteration_limit.
    pub max_score: i64,

    pub init_at: NaiveDate,
    /// The date the task next becomes due.
    pub next_activation_at: NaiveDate,

    /// Days between activations, >= 1.
    pub repeat_interval: u32,
    pub allowed_days: AllowedDays,
    pub restricted_days_policy: RestrictedDaysPolicy,

    /// Terminal flag; only meaningful for non-recurring tasks.
    pub finished: bool,
}

impl Task {
    pub fn new(id: u64, user_id: u64, name: impl Into<String>, task_type: TaskType, init_at: NaiveDate) -> Self {
        Self {
            id,
            user_id,
            name: name.into(),
            task_type,
            is_optional: false,
            is_recurring: false,
            difficulty: 1,
            iteration_count: 0,
            iteration_limit: 1,
            current_score: 0,
            max_score: 0,
            init_at,
            next_activation_at: init_at,
            repeat_interval: 1,
            allowed_days: AllowedDays::ALL,
            restricted_days_policy: RestrictedDaysPolicy::Before,
            finished: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn recurring(mut self) -> Self {
        self.is_recurring = true;
        self
    }

    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_iteration_limit(mut self, limit: u32) -> Self {
        self.iteration_limit = limit;
        self
    }

    pub fn with_repeat_interval(mut self, days: u32) -> Self {
        self.repeat_interval = days;
        self
    }

    pub fn with_allowed_days(mut self, allowed: AllowedDays) -> Self {
        self.allowed_days = allowed;
        self
    }

    pub fn with_policy(mut self, policy: RestrictedDaysPolicy) -> Self {
        self.restricted_days_policy = policy;
        self
    }

    /// Derive the score bounds from the configured difficulty and iteration
    /// limit. Call last: a ToDo starts at 0, a NotToDo starts at full score.
    pub fn scored(mut self, base_points: i64) -> Self {
        self.max_score = base_points * self.difficulty as i64 * self.iteration_limit as i64;
        self.current_score = match self.task_type {
            TaskType::ToDo => 0,
            TaskType::NotToDo => self.max_score,
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_task_activates_on_init_date() {
        let t = Task::new(1, 1, "stretch", TaskType::ToDo, day(2026, 3, 2));
        assert_eq!(t.next_activation_at, t.init_at);
        assert!(!t.finished);
    }

    #[test]
    fn scored_todo_starts_at_zero() {
        let t = Task::new(1, 1, "run", TaskType::ToDo, day(2026, 3, 2))
            .with_difficulty(3)
            .with_iteration_limit(2)
            .scored(10);
        assert_eq!(t.max_score, 60);
        assert_eq!(t.current_score, 0);
    }

    #[test]
    fn scored_not_to_do_starts_at_max() {
        let t = Task::new(1, 1, "no sugar", TaskType::NotToDo, day(2026, 3, 2))
            .with_difficulty(2)
            .with_iteration_limit(3)
            .scored(10);
        assert_eq!(t.max_score, 60);
        assert_eq!(t.current_score, 60);
    }

    #[test]
    fn task_round_trips_through_json() {
        let t = Task::new(7, 2, "journal", TaskType::ToDo, day(2026, 1, 5))
            .recurring()
            .optional()
            .scored(10);
        let json = serde_json::to_string(&t).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
