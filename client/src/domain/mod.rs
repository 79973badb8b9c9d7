//! # Domain Module
//!
//! Page-level logic for the milk delivery ledger, independent of any UI
//! framework. Each controller holds a `QueryClient` and turns its reads and
//! mutations into the values a page renders and the notices it shows.
//!
//! ## Module Organization
//!
//! - **delivery_grid**: household × day grid, daily footer totals and liter formatting
//! - **dashboard**: today's status per household and the status counts
//! - **daily_entry**: editable per-household rows for one day, saving and the holiday toggle
//! - **households**: household form validation and CRUD
//! - **milk_types**: milk type CRUD
//! - **monthly_summary**: the monthly ledger and month navigation
//! - **session**: caller profile and role
//! - **validation**: shared input checks
//!
//! ## Rules
//!
//! - A holiday overrides every stored entry for that day, for every household
//! - Skipped deliveries never show or count a quantity
//! - Per-household and per-milk-type totals come from the gateway as-is
//! - Names are trimmed and must not be blank; nothing is sent otherwise
//! - Gateway failures surface as one generic message per operation

pub mod daily_entry;
pub mod dashboard;
pub mod delivery_grid;
pub mod households;
pub mod milk_types;
pub mod monthly_summary;
pub mod session;
pub mod validation;

pub use daily_entry::{DailyEntryController, DailyEntryData, DailyEntrySheet, EntryRow, RowEdit, RowSaveOutcome};
pub use dashboard::{DashboardController, DashboardOverview, HouseholdDayStatus, HouseholdStatusRow, StatusCounts};
pub use delivery_grid::{format_liters, format_total, DailyTotal, DeliveryGrid, GridCell};
pub use households::{HouseholdForm, HouseholdsController};
pub use milk_types::MilkTypesController;
pub use monthly_summary::{MonthCursor, MonthlyLedger, MonthlySummaryController};
pub use session::SessionController;
