//! Day scoring and period averaging, always split into mandatory and
//! optional partitions.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Points plus completion percentage for one partition of tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreSplit {
    pub points: i64,
    pub percentage: f64,
}

/// Aggregate for one period (a day, or an averaged week/month), computed
/// separately for mandatory and optional tasks. Transient: stores persist it
/// as two rows, never one merged row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodStatistics {
    pub mandatory: ScoreSplit,
    pub optional: ScoreSplit,
}

/// The stored day-row fields the averager needs, independent of any store
/// schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayRowView {
    pub is_optional: bool,
    pub points: i64,
    pub percentage: f64,
}

/// Score one day's due tasks. An empty partition scores 0 points and 0%,
/// never a division by zero.
pub fn score_day(tasks: &[Task]) -> PeriodStatistics {
    PeriodStatistics {
        mandatory: score_split(tasks.iter().filter(|t| !t.is_optional)),
        optional: score_split(tasks.iter().filter(|t| t.is_optional)),
    }
}

fn score_split<'a>(tasks: impl Iterator<Item = &'a Task>) -> ScoreSplit {
    let mut points = 0i64;
    let mut max_points = 0i64;
    for t in tasks {
        points += t.current_score;
        max_points += t.max_score;
    }
    let percentage = if max_points > 0 {
        points as f64 / max_points as f64 * 100.0
    } else {
        0.0
    };
    ScoreSplit { points, percentage }
}

/// Average stored day rows into a week- or month-level aggregate, rounding
/// points and percentage to whole numbers.
///
/// Callers verify the exact expected row count first, so each partition is
/// non-empty here.
pub fn average_period(rows: &[DayRowView]) -> PeriodStatistics {
    PeriodStatistics {
        mandatory: average_split(rows.iter().filter(|r| !r.is_optional)),
        optional: average_split(rows.iter().filter(|r| r.is_optional)),
    }
}

fn average_split<'a>(rows: impl Iterator<Item = &'a DayRowView>) -> ScoreSplit {
    let rows: Vec<&DayRowView> = rows.collect();
    debug_assert!(!rows.is_empty(), "averaging an empty partition");
    let n = rows.len().max(1) as f64;

    let points = (rows.iter().map(|r| r.points).sum::<i64>() as f64 / n).round() as i64;
    let percentage = (rows.iter().map(|r| r.percentage).sum::<f64>() / n).round();
    ScoreSplit { points, percentage }
}
