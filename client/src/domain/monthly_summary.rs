use std::collections::HashSet;

use shared::{Household, HouseholdId, MilkType, MilkTypeId, MonthlySummary};
use tracing::debug;

use crate::calendar::{days_in_month, next_month, previous_month};
use crate::domain::delivery_grid::{daily_totals, holiday_set, DailyTotal, DeliveryGrid, GridCell};
use crate::error::{ClientError, FailureContext};
use crate::query::QueryClient;

/// The monthly ledger: grid, footer totals and the gateway's authoritative totals
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyLedger {
    pub month: String,
    pub households: Vec<Household>,
    pub milk_types: Vec<MilkType>,
    pub grid: DeliveryGrid,
    pub daily_totals: Vec<DailyTotal>,
    pub summary: MonthlySummary,
    holidays: HashSet<String>,
}

impl MonthlyLedger {
    pub fn days(&self) -> &[String] {
        self.grid.days()
    }

    pub fn cell(&self, household_id: HouseholdId, day: &str) -> GridCell {
        self.grid.cell(household_id, day)
    }

    pub fn is_holiday(&self, day: &str) -> bool {
        self.holidays.contains(day)
    }

    /// Liters for a household as reported by the gateway, never recomputed
    pub fn household_total(&self, household_id: HouseholdId) -> f64 {
        self.summary.household_total(household_id)
    }

    pub fn milk_type_total(&self, milk_type_id: MilkTypeId) -> f64 {
        self.summary.milk_type_total(milk_type_id)
    }

    /// Sum of the gateway's per-household totals
    pub fn total_liters(&self) -> f64 {
        self.summary.household_summaries.iter().map(|(_, liters)| liters).sum()
    }

    /// Holidays falling within this month
    pub fn holiday_count(&self) -> usize {
        self.days().iter().filter(|day| self.is_holiday(day)).count()
    }

    pub fn average_per_household(&self) -> f64 {
        if self.households.is_empty() {
            0.0
        } else {
            self.total_liters() / self.households.len() as f64
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct MonthlySummaryController {
    client: QueryClient,
}

impl MonthlySummaryController {
    pub fn new(client: QueryClient) -> Self {
        Self { client }
    }

    /// Ledger for `month`, or `None` while any of its reads is unavailable
    pub async fn load(&self, month: &str) -> Result<Option<MonthlyLedger>, ClientError> {
        let (households, milk_types, holidays, deliveries, summary) = futures::join!(
            self.client.households(),
            self.client.milk_types(),
            self.client.holidays(),
            self.client.deliveries_for_month(month),
            self.client.monthly_summary(month),
        );

        let households = households.or_fail("Failed to load households")?;
        let milk_types = milk_types.or_fail("Failed to load milk types")?;
        let holidays = holidays.or_fail("Failed to load holidays")?;
        let deliveries = deliveries.or_fail("Failed to load deliveries")?;
        let summary = summary.or_fail("Failed to load monthly summary")?;

        let (Some(households), Some(milk_types), Some(holidays), Some(deliveries), Some(summary)) =
            (households, milk_types, holidays, deliveries, summary)
        else {
            return Ok(None);
        };

        let days = days_in_month(month);
        let holidays = holiday_set(&holidays);
        let grid = DeliveryGrid::build(&households, &deliveries, &holidays, &days);
        let daily_totals = daily_totals(&households, &deliveries, &holidays, &days);
        debug!(
            "📅 Ledger for {}: {} households × {} days",
            month,
            households.len(),
            days.len()
        );

        Ok(Some(MonthlyLedger {
            month: month.to_string(),
            households,
            milk_types,
            grid,
            daily_totals,
            summary,
            holidays,
        }))
    }
}

/// Month selection with previous/next navigation
#[derive(Debug, Clone, PartialEq)]
pub struct MonthCursor {
    month: String,
}

impl MonthCursor {
    pub fn new(month: impl Into<String>) -> Self {
        Self { month: month.into() }
    }

    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn previous(&mut self) {
        if let Some(month) = previous_month(&self.month) {
            self.month = month;
        }
    }

    pub fn next(&mut self) {
        if let Some(month) = next_month(&self.month) {
            self.month = month;
        }
    }
}
