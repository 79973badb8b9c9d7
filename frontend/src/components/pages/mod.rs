use yew::prelude::*;

use crate::hooks::use_app::AppContext;

pub mod daily_entry;
pub mod dashboard;
pub mod households;
pub mod milk_types;
pub mod monthly_summary;

pub use daily_entry::DailyEntryPage;
pub use dashboard::DashboardPage;
pub use households::HouseholdsPage;
pub use milk_types::MilkTypesPage;
pub use monthly_summary::MonthlySummaryPage;

#[derive(Properties, PartialEq)]
pub struct PageProps {
    pub app: AppContext,
}
