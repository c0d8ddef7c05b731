//! Maintenance coordinator: replays every day a user missed since their
//! watermark, folds each into day statistics, triggers week/month rollups at
//! period boundaries and purges aged aggregates.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use cadence_core::{
    DayRowView, ScheduleError, average_period, finish_task, reset_task, score_day,
    time::{date_sequence, days_in_month, is_last_day_of_iso_week, is_last_day_of_month, iso_week,
           months_before, weeks_before},
};

use crate::clock::Clock;
use crate::store::{StatisticsStore, StoreError, TaskStore, User, UserStore};

/// 7 days, two partition rows each.
const EXPECTED_WEEK_ROWS: usize = 14;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MaintenanceError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Injected at construction; nothing here is read from globals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MaintenanceConfig {
    /// Base worth of one iteration before the difficulty multiplier.
    pub base_points: i64,
    pub day_retention_days: u32,
    pub week_retention_weeks: u32,
    pub month_retention_months: u32,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            base_points: 10,
            day_retention_days: 35,
            week_retention_weeks: 8,
            month_retention_months: 12,
        }
    }
}

/// Outcome of one maintenance pass, for logs and operators.
#[derive(Debug, Default)]
pub struct RunReport {
    pub users_processed: usize,
    pub days_replayed: usize,
    pub week_rollups: usize,
    pub month_rollups: usize,
    /// Users whose replay aborted; their watermark is unchanged and the next
    /// run retries them from it.
    pub failures: Vec<(u64, MaintenanceError)>,
}

pub struct MaintenanceCoordinator<C: Clock> {
    config: MaintenanceConfig,
    clock: C,
}

impl<C: Clock> MaintenanceCoordinator<C> {
    pub fn new(config: MaintenanceConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &MaintenanceConfig {
        &self.config
    }

    /// One full pass: replay all stale users, then purge aged aggregates.
    ///
    /// Taking the store `&mut` keeps runs single-flight in-process: no two
    /// passes can interleave on the same data. A failed user is reported and
    /// skipped; the others still run. Invoked again within the same elapsed
    /// day the pass finds no stale users and is a no-op.
    pub fn run<S>(&self, store: &mut S) -> Result<RunReport, StoreError>
    where
        S: UserStore + TaskStore + StatisticsStore,
    {
        let today = self.clock.today();
        let stale = store.find_stale_since(today)?;
        info!(stale_users = stale.len(), %today, "maintenance pass started");

        let mut report = RunReport::default();
        for user in stale {
            let outcome = self
                .replay_user(&user, today, store, &mut report)
                .and_then(|()| {
                    store
                        .mark_statistic_date(user.id, today)
                        .map_err(MaintenanceError::from)
                });
            match outcome {
                Ok(()) => report.users_processed += 1,
                Err(err) => {
                    error!(user_id = user.id, %err, "replay aborted; watermark unchanged");
                    report.failures.push((user.id, err));
                }
            }
        }

        self.purge(today, store)?;

        info!(
            users = report.users_processed,
            days = report.days_replayed,
            weeks = report.week_rollups,
            months = report.month_rollups,
            failures = report.failures.len(),
            "maintenance pass finished"
        );
        Ok(report)
    }

    /// Replay every fully elapsed day, from the watermark date through
    /// yesterday, oldest first. Later days depend on task state written by
    /// earlier ones, so the walk is strictly sequential and stops at the
    /// first failure.
    fn replay_user<S>(
        &self,
        user: &User,
        today: NaiveDate,
        store: &mut S,
        report: &mut RunReport,
    ) -> Result<(), MaintenanceError>
    where
        S: TaskStore + StatisticsStore,
    {
        let yesterday = today - Duration::days(1);
        let days = date_sequence(user.statistic_date, yesterday);
        debug!(user_id = user.id, missed_days = days.len(), "replaying user");

        for day in days {
            self.replay_day(user, day, store, report)?;
        }
        Ok(())
    }

    fn replay_day<S>(
        &self,
        user: &User,
        day: NaiveDate,
        store: &mut S,
        report: &mut RunReport,
    ) -> Result<(), MaintenanceError>
    where
        S: TaskStore + StatisticsStore,
    {
        let due = store.find_due_on(day, user.id)?;
        debug!(user_id = user.id, %day, due = due.len(), "scoring day");

        let day_stats = score_day(&due);
        store.save_day(day, &day_stats, user.id)?;

        for task in due {
            let updated = if task.is_recurring {
                reset_task(task)?
            } else {
                finish_task(task)
            };
            store.save(updated)?;
        }
        report.days_replayed += 1;

        if is_last_day_of_iso_week(day) {
            self.rollup_week(user, day, store, report)?;
        }
        if is_last_day_of_month(day) {
            self.rollup_month(user, day, store, report)?;
        }
        Ok(())
    }

    /// Fold the closing week into two WeekStatistic rows, but only when the
    /// full 14 day-rows exist. A short count is the expected steady state
    /// until enough history accumulates, not an error.
    fn rollup_week<S>(
        &self,
        user: &User,
        last_day: NaiveDate,
        store: &mut S,
        report: &mut RunReport,
    ) -> Result<(), MaintenanceError>
    where
        S: StatisticsStore,
    {
        let start = last_day - Duration::days(6);
        let rows = store.find_day_rows_in_range(start, last_day, user.id)?;
        if rows.len() != EXPECTED_WEEK_ROWS {
            debug!(
                user_id = user.id,
                rows = rows.len(),
                "skipping week rollup, incomplete history"
            );
            return Ok(());
        }

        let views: Vec<DayRowView> = rows.iter().map(|r| r.as_view()).collect();
        let (week, year) = iso_week(last_day);
        store.save_week(week, year, &average_period(&views), user.id)?;
        report.week_rollups += 1;
        Ok(())
    }

    fn rollup_month<S>(
        &self,
        user: &User,
        last_day: NaiveDate,
        store: &mut S,
        report: &mut RunReport,
    ) -> Result<(), MaintenanceError>
    where
        S: StatisticsStore,
    {
        let start = last_day.with_day(1).unwrap_or(last_day);
        let expected = days_in_month(last_day) as usize * 2;
        let rows = store.find_day_rows_in_range(start, last_day, user.id)?;
        if rows.len() != expected {
            debug!(
                user_id = user.id,
                rows = rows.len(),
                expected,
                "skipping month rollup, incomplete history"
            );
            return Ok(());
        }

        let views: Vec<DayRowView> = rows.iter().map(|r| r.as_view()).collect();
        store.save_month(last_day.month(), last_day.year(), &average_period(&views), user.id)?;
        report.month_rollups += 1;
        Ok(())
    }

    fn purge<S>(&self, today: NaiveDate, store: &mut S) -> Result<(), StoreError>
    where
        S: StatisticsStore,
    {
        let day_horizon = today - Duration::days(self.config.day_retention_days as i64);
        store.purge_days_before(day_horizon)?;

        let (week, week_year) = weeks_before(today, self.config.week_retention_weeks);
        store.purge_weeks_before(week, week_year)?;

        let (month, month_year) = months_before(today, self.config.month_retention_months);
        store.purge_months_before(month, month_year)?;

        debug!(%day_horizon, week, week_year, month, month_year, "purged aged statistics");
        Ok(())
    }
}
