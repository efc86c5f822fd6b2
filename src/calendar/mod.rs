//! Shift and schedule reconciliation plus calendar layout.
//!
//! Everything here is synchronous and pure: the HTTP layer fetches snapshots
//! from the database and hands them to these functions.

pub mod event;
pub mod layout;
pub mod reconcile;
pub mod recurrence;
pub mod reports;
pub mod time_range;
pub mod view;
pub mod workload;

pub use event::{DisplayableEvent, EventOrigin, EventReport};
pub use layout::{month_layout, week_layout, MonthLayout, VisibleWindow, WeekLayout};
pub use reconcile::{build_events, reconcile, EventsByDate};
pub use recurrence::materialize;
pub use reports::ReportLookup;
pub use time_range::{DateRange, DayOfWeek};
pub use view::{CalendarView, ViewMode};
pub use workload::{workload_chart, WorkloadChart, WorkloadLevel};
