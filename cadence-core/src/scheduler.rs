//! Task activation lifecycle: recording iterations, resetting recurring
//! tasks for their next activation, finishing one-shot tasks.
//!
//! Every function takes the task by value and returns the updated value;
//! persisting it is the caller's responsibility.

use chrono::NaiveDate;

use crate::day_policy::next_activation_date;
use crate::error::{IterationLimitReached, ScheduleError};
use crate::task::{Task, TaskType};

/// Record one performed iteration for the interactive path.
///
/// Rejected once the limit for the current activation is reached. Each
/// iteration is worth `base_points * difficulty`, added for a ToDo and
/// subtracted for a NotToDo.
pub fn record_iteration(mut task: Task, base_points: i64) -> Result<Task, IterationLimitReached> {
    if task.iteration_count >= task.iteration_limit {
        return Err(IterationLimitReached {
            limit: task.iteration_limit,
        });
    }

    let points = base_points * task.difficulty as i64;
    match task.task_type {
        TaskType::ToDo => task.current_score += points,
        TaskType::NotToDo => task.current_score -= points,
    }
    task.iteration_count += 1;
    Ok(task)
}

/// Re-arm a recurring task after its day has been scored: clear the
/// iteration count, restore the starting score, and advance
/// `next_activation_at` under the day policy.
///
/// Only called for `is_recurring` tasks during a maintenance pass. The limit
/// check does not apply here; maintenance resets rather than records.
pub fn reset_task(mut task: Task) -> Result<Task, ScheduleError> {
    task.iteration_count = 0;
    task.current_score = match task.task_type {
        TaskType::ToDo => 0,
        TaskType::NotToDo => task.max_score,
    };
    task.next_activation_at = next_activation_date(
        task.next_activation_at,
        task.repeat_interval,
        task.allowed_days,
        task.restricted_days_policy,
    )?;
    Ok(task)
}

/// Mark a one-shot task terminal. Recurring tasks are untouched: they reset
/// instead of finishing.
pub fn finish_task(mut task: Task) -> Task {
    if !task.is_recurring {
        task.finished = true;
    }
    task
}

/// Whether the task is due on the given day. Guards the interactive record
/// path: an iteration may only be recorded against today's activation.
pub fn is_due_on(task: &Task, date: NaiveDate) -> bool {
    !task.finished && task.next_activation_at == date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day_policy::AllowedDays;
    use crate::task::RestrictedDaysPolicy;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn todo() -> Task {
        Task::new(1, 1, "run 5k", TaskType::ToDo, day(2026, 3, 2))
            .with_difficulty(2)
            .with_iteration_limit(3)
            .scored(10)
    }

    #[test]
    fn record_adds_points_for_todo() {
        let t = record_iteration(todo(), 10).unwrap();
        assert_eq!(t.current_score, 20);
        assert_eq!(t.iteration_count, 1);
    }

    #[test]
    fn record_subtracts_points_for_not_to_do() {
        let t = Task::new(1, 1, "no snacks", TaskType::NotToDo, day(2026, 3, 2))
            .with_difficulty(2)
            .with_iteration_limit(3)
            .scored(10);
        let t = record_iteration(t, 10).unwrap();
        assert_eq!(t.current_score, 40);
    }

    #[test]
    fn record_rejects_at_limit() {
        let mut t = todo();
        for _ in 0..3 {
            t = record_iteration(t, 10).unwrap();
        }
        let err = record_iteration(t, 10).unwrap_err();
        assert_eq!(err, IterationLimitReached { limit: 3 });
    }

    #[test]
    fn reset_restores_scores_and_advances() {
        let t = todo()
            .recurring()
            .with_repeat_interval(2)
            .with_allowed_days(AllowedDays(0b0010101))
            .with_policy(RestrictedDaysPolicy::Before);
        let t = record_iteration(t, 10).unwrap();
        let t = reset_task(t).unwrap();

        assert_eq!(t.iteration_count, 0);
        assert_eq!(t.current_score, 0);
        // Monday + 2 = Wednesday, allowed.
        assert_eq!(t.next_activation_at, day(2026, 3, 4));
    }

    #[test]
    fn reset_not_to_do_restores_max() {
        let t = Task::new(1, 1, "no snacks", TaskType::NotToDo, day(2026, 3, 2))
            .recurring()
            .scored(10);
        let t = record_iteration(t, 10).unwrap();
        let t = reset_task(t).unwrap();
        assert_eq!(t.current_score, t.max_score);
    }

    #[test]
    fn reset_with_empty_mask_is_fatal() {
        let t = todo().recurring().with_allowed_days(AllowedDays(0));
        assert_eq!(reset_task(t), Err(ScheduleError::EmptyAllowedDays));
    }

    #[test]
    fn finish_is_terminal_for_one_shot_only() {
        let one_shot = finish_task(todo());
        assert!(one_shot.finished);

        let recurring = finish_task(todo().recurring());
        assert!(!recurring.finished);
    }

    #[test]
    fn due_only_on_activation_date() {
        let t = todo();
        assert!(is_due_on(&t, day(2026, 3, 2)));
        assert!(!is_due_on(&t, day(2026, 3, 3)));
        assert!(!is_due_on(&finish_task(t), day(2026, 3, 2)));
    }
}
