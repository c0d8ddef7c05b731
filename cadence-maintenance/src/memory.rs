//! In-memory store backing tests and the CLI state file. Serializable so the
//! whole dataset can live in a single JSON document.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use cadence_core::{PeriodStatistics, Task};

use crate::store::{
    DayStatistic, MonthStatistic, StatisticsStore, StoreError, TaskStore, User, UserStore,
    WeekStatistic,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    users: BTreeMap<u64, User>,
    tasks: BTreeMap<u64, Task>,
    days: Vec<DayStatistic>,
    weeks: Vec<WeekStatistic>,
    months: Vec<MonthStatistic>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn insert_task(&mut self, task: Task) {
        self.tasks.insert(task.id, task);
    }

    pub fn user(&self, id: u64) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn task(&self, id: u64) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn next_task_id(&self) -> u64 {
        self.tasks.keys().max().map_or(1, |id| id + 1)
    }

    pub fn next_user_id(&self) -> u64 {
        self.users.keys().max().map_or(1, |id| id + 1)
    }

    fn has_day_row(&self, user_id: u64, date: NaiveDate, is_optional: bool) -> bool {
        self.days
            .iter()
            .any(|r| r.user_id == user_id && r.date == date && r.is_optional == is_optional)
    }

    fn has_week_row(&self, user_id: u64, week: u32, year: i32, is_optional: bool) -> bool {
        self.weeks.iter().any(|r| {
            r.user_id == user_id && r.week == week && r.year == year && r.is_optional == is_optional
        })
    }

    fn has_month_row(&self, user_id: u64, month: u32, year: i32, is_optional: bool) -> bool {
        self.months.iter().any(|r| {
            r.user_id == user_id && r.month == month && r.year == year && r.is_optional == is_optional
        })
    }
}

impl UserStore for MemoryStore {
    fn find_stale_since(&self, cutoff: NaiveDate) -> Result<Vec<User>, StoreError> {
        Ok(self
            .users
            .values()
            .filter(|u| u.statistic_date < cutoff)
            .cloned()
            .collect())
    }

    fn mark_statistic_date(&mut self, user_id: u64, date: NaiveDate) -> Result<(), StoreError> {
        let user = self
            .users
            .get_mut(&user_id)
            .ok_or(StoreError::UnknownUser(user_id))?;
        user.statistic_date = date;
        Ok(())
    }
}

impl TaskStore for MemoryStore {
    fn find_due_on(&self, date: NaiveDate, user_id: u64) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .tasks
            .values()
            .filter(|t| t.user_id == user_id && !t.finished && t.next_activation_at == date)
            .cloned()
            .collect())
    }

    fn save(&mut self, task: Task) -> Result<(), StoreError> {
        self.tasks.insert(task.id, task);
        Ok(())
    }
}

impl StatisticsStore for MemoryStore {
    fn find_day_rows_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        user_id: u64,
    ) -> Result<Vec<DayStatistic>, StoreError> {
        Ok(self
            .days
            .iter()
            .filter(|r| r.user_id == user_id && r.date >= start && r.date <= end)
            .cloned()
            .collect())
    }

    fn save_day(
        &mut self,
        date: NaiveDate,
        stats: &PeriodStatistics,
        user_id: u64,
    ) -> Result<(), StoreError> {
        for row in DayStatistic::pair(date, stats, user_id) {
            // First write for a (user, date, partition) key wins; a retried
            // replay must not clobber rows committed before a crash.
            if !self.has_day_row(user_id, date, row.is_optional) {
                self.days.push(row);
            }
        }
        Ok(())
    }

    fn save_week(
        &mut self,
        week: u32,
        year: i32,
        stats: &PeriodStatistics,
        user_id: u64,
    ) -> Result<(), StoreError> {
        for row in WeekStatistic::pair(week, year, stats, user_id) {
            if !self.has_week_row(user_id, week, year, row.is_optional) {
                self.weeks.push(row);
            }
        }
        Ok(())
    }

    fn save_month(
        &mut self,
        month: u32,
        year: i32,
        stats: &PeriodStatistics,
        user_id: u64,
    ) -> Result<(), StoreError> {
        for row in MonthStatistic::pair(month, year, stats, user_id) {
            if !self.has_month_row(user_id, month, year, row.is_optional) {
                self.months.push(row);
            }
        }
        Ok(())
    }

    fn purge_days_before(&mut self, date: NaiveDate) -> Result<(), StoreError> {
        self.days.retain(|r| r.date >= date);
        Ok(())
    }

    fn purge_weeks_before(&mut self, week: u32, year: i32) -> Result<(), StoreError> {
        self.weeks
            .retain(|r| (r.year, r.week) >= (year, week));
        Ok(())
    }

    fn purge_months_before(&mut self, month: u32, year: i32) -> Result<(), StoreError> {
        self.months
            .retain(|r| (r.year, r.month) >= (year, month));
        Ok(())
    }

    fn recent_days(&self, user_id: u64, periods: usize) -> Result<Vec<DayStatistic>, StoreError> {
        let mut rows: Vec<DayStatistic> = self
            .days
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(a.is_optional.cmp(&b.is_optional)));
        rows.truncate(periods * 2);
        Ok(rows)
    }

    fn recent_weeks(&self, user_id: u64, periods: usize) -> Result<Vec<WeekStatistic>, StoreError> {
        let mut rows: Vec<WeekStatistic> = self
            .weeks
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (b.year, b.week)
                .cmp(&(a.year, a.week))
                .then(a.is_optional.cmp(&b.is_optional))
        });
        rows.truncate(periods * 2);
        Ok(rows)
    }

    fn recent_months(&self, user_id: u64, periods: usize) -> Result<Vec<MonthStatistic>, StoreError> {
        let mut rows: Vec<MonthStatistic> = self
            .months
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            (b.year, b.month)
                .cmp(&(a.year, a.month))
                .then(a.is_optional.cmp(&b.is_optional))
        });
        rows.truncate(periods * 2);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::ScoreSplit;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stats(points: i64) -> PeriodStatistics {
        PeriodStatistics {
            mandatory: ScoreSplit { points, percentage: 50.0 },
            optional: ScoreSplit { points: 0, percentage: 0.0 },
        }
    }

    #[test]
    fn save_day_writes_two_rows_first_write_wins() {
        let mut store = MemoryStore::new();
        store.save_day(day(2026, 3, 2), &stats(10), 1).unwrap();
        store.save_day(day(2026, 3, 2), &stats(99), 1).unwrap();

        let rows = store
            .find_day_rows_in_range(day(2026, 3, 2), day(2026, 3, 2), 1)
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.iter().find(|r| !r.is_optional).unwrap().points, 10);
    }

    #[test]
    fn purge_weeks_orders_by_year_then_week() {
        let mut store = MemoryStore::new();
        for (week, year) in [(52, 2025), (1, 2026), (5, 2026)] {
            store.save_week(week, year, &stats(1), 1).unwrap();
        }
        store.purge_weeks_before(1, 2026).unwrap();
        let rows = store.recent_weeks(1, 10).unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| (r.year, r.week) >= (2026, 1)));
    }

    #[test]
    fn recent_days_caps_at_two_rows_per_period() {
        let mut store = MemoryStore::new();
        for d in 1..=5 {
            store.save_day(day(2026, 3, d), &stats(d as i64), 1).unwrap();
        }
        let rows = store.recent_days(1, 2).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].date, day(2026, 3, 5));
    }

    #[test]
    fn store_round_trips_through_json() {
        let mut store = MemoryStore::new();
        store.insert_user(User {
            id: 1,
            name: "ada".to_string(),
            statistic_date: day(2026, 3, 1),
        });
        store.save_day(day(2026, 3, 2), &stats(10), 1).unwrap();

        let json = serde_json::to_string(&store).unwrap();
        let back: MemoryStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back.user(1).unwrap().name, "ada");
        assert_eq!(back.recent_days(1, 1).unwrap().len(), 2);
    }
}
