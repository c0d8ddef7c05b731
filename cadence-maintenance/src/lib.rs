//! cadence-maintenance: the timer-driven engine that replays missed days
//! into statistics, advances recurring tasks and retires aged aggregates.
//!
//! cadence-core supplies the math; this crate owns the orchestration and the
//! collaborator contracts (user/task/statistics stores, clock).

pub mod clock;
pub mod coordinator;
pub mod memory;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use coordinator::{MaintenanceConfig, MaintenanceCoordinator, MaintenanceError, RunReport};
pub use memory::MemoryStore;
pub use store::{
    DayStatistic, MonthStatistic, StatisticsStore, StoreError, TaskStore, User, UserStore,
    WeekStatistic,
};
