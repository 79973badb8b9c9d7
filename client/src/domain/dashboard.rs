use std::fmt;

use shared::{DeliveryEntry, DeliveryStatus, HolidayDate, Household, HouseholdId};
use tracing::debug;

use crate::calendar::month_of;
use crate::domain::delivery_grid::find_entry;
use crate::error::{ClientError, FailureContext};
use crate::query::QueryClient;

/// Where a household stands for today
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HouseholdDayStatus {
    Delivered,
    Skipped,
    Holiday,
    /// Nothing recorded yet
    Pending,
}

impl HouseholdDayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HouseholdDayStatus::Delivered => "delivered",
            HouseholdDayStatus::Skipped => "skipped",
            HouseholdDayStatus::Holiday => "holiday",
            HouseholdDayStatus::Pending => "pending",
        }
    }
}

impl From<DeliveryStatus> for HouseholdDayStatus {
    fn from(status: DeliveryStatus) -> Self {
        match status {
            DeliveryStatus::Delivered => HouseholdDayStatus::Delivered,
            DeliveryStatus::Skipped => HouseholdDayStatus::Skipped,
            DeliveryStatus::Holiday => HouseholdDayStatus::Holiday,
        }
    }
}

impl fmt::Display for HouseholdDayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HouseholdStatusRow {
    pub id: HouseholdId,
    pub name: String,
    pub status: HouseholdDayStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub delivered: usize,
    pub skipped: usize,
    pub holiday: usize,
    pub pending: usize,
    pub total: usize,
}

/// Everything the dashboard shows for one day
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOverview {
    pub today: String,
    pub holiday: Option<HolidayDate>,
    pub rows: Vec<HouseholdStatusRow>,
    pub counts: StatusCounts,
}

impl DashboardOverview {
    pub fn build(
        today: &str,
        households: &[Household],
        holidays: &[HolidayDate],
        deliveries: &[DeliveryEntry],
    ) -> Self {
        let holiday = holidays.iter().find(|h| h.date == today).cloned();

        let rows: Vec<HouseholdStatusRow> = households
            .iter()
            .map(|household| {
                let status = if holiday.is_some() {
                    HouseholdDayStatus::Holiday
                } else {
                    find_entry(deliveries, household.id, today)
                        .map(|entry| HouseholdDayStatus::from(entry.status))
                        .unwrap_or(HouseholdDayStatus::Pending)
                };
                HouseholdStatusRow {
                    id: household.id,
                    name: household.name.clone(),
                    status,
                }
            })
            .collect();

        let mut counts = StatusCounts {
            total: rows.len(),
            ..StatusCounts::default()
        };
        for row in &rows {
            match row.status {
                HouseholdDayStatus::Delivered => counts.delivered += 1,
                HouseholdDayStatus::Skipped => counts.skipped += 1,
                HouseholdDayStatus::Holiday => counts.holiday += 1,
                HouseholdDayStatus::Pending => counts.pending += 1,
            }
        }

        Self {
            today: today.to_string(),
            holiday,
            rows,
            counts,
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct DashboardController {
    client: QueryClient,
}

impl DashboardController {
    pub fn new(client: QueryClient) -> Self {
        Self { client }
    }

    /// Today's overview, or `None` while any of its reads is still unavailable
    pub async fn load(&self, today: &str) -> Result<Option<DashboardOverview>, ClientError> {
        let (households, holidays, deliveries) = futures::join!(
            self.client.households(),
            self.client.holidays(),
            self.client.deliveries_for_month(month_of(today)),
        );

        let households = households.or_fail("Failed to load households")?;
        let holidays = holidays.or_fail("Failed to load holidays")?;
        let deliveries = deliveries.or_fail("Failed to load deliveries")?;

        match (households, holidays, deliveries) {
            (Some(households), Some(holidays), Some(deliveries)) => {
                let overview = DashboardOverview::build(today, &households, &holidays, &deliveries);
                debug!("📊 Dashboard for {}: {:?}", today, overview.counts);
                Ok(Some(overview))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{Gateway, MemoryGateway};
    use shared::{DeliveryEntryRequest, HouseholdRequest};
    use std::rc::Rc;

    fn household_request(name: &str) -> HouseholdRequest {
        HouseholdRequest {
            name: name.to_string(),
            address: String::new(),
            contact_phone: String::new(),
        }
    }

    async fn seeded() -> (Rc<MemoryGateway>, Vec<Household>) {
        let gateway = Rc::new(MemoryGateway::new());
        let milk = gateway.create_milk_type("Toned").await.unwrap();
        let mut households = Vec::new();
        for name in ["Sharma", "Iyer", "Khan"] {
            households.push(gateway.create_household(&household_request(name)).await.unwrap());
        }
        gateway
            .add_delivery_entry(&DeliveryEntryRequest {
                household_id: households[0].id,
                milk_type_id: milk.id,
                date: "2024-03-05".to_string(),
                quantity_liters: 2.0,
                status: DeliveryStatus::Delivered,
            })
            .await
            .unwrap();
        gateway
            .add_delivery_entry(&DeliveryEntryRequest {
                household_id: households[1].id,
                milk_type_id: milk.id,
                date: "2024-03-05".to_string(),
                quantity_liters: 1.0,
                status: DeliveryStatus::Skipped,
            })
            .await
            .unwrap();
        (gateway, households)
    }

    #[tokio::test]
    async fn test_statuses_and_counts() {
        let (gateway, households) = seeded().await;
        let controller = DashboardController::new(QueryClient::ready(gateway));

        let overview = controller.load("2024-03-05").await.unwrap().unwrap();

        assert_eq!(overview.holiday, None);
        let statuses: Vec<_> = overview.rows.iter().map(|r| (r.id, r.status)).collect();
        assert_eq!(
            statuses,
            vec![
                (households[0].id, HouseholdDayStatus::Delivered),
                (households[1].id, HouseholdDayStatus::Skipped),
                (households[2].id, HouseholdDayStatus::Pending),
            ]
        );
        assert_eq!(
            overview.counts,
            StatusCounts {
                delivered: 1,
                skipped: 1,
                holiday: 0,
                pending: 1,
                total: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_holiday_today_forces_holiday_status() {
        let (gateway, _) = seeded().await;
        gateway.mark_holiday("2024-03-05", "Founders Day").await.unwrap();
        let controller = DashboardController::new(QueryClient::ready(gateway));

        let overview = controller.load("2024-03-05").await.unwrap().unwrap();

        assert_eq!(overview.holiday.map(|h| h.note), Some("Founders Day".to_string()));
        assert!(overview.rows.iter().all(|r| r.status == HouseholdDayStatus::Holiday));
        assert_eq!(overview.counts.holiday, 3);
        assert_eq!(overview.counts.pending, 0);
    }

    #[tokio::test]
    async fn test_loading_while_session_initializing() {
        let (gateway, _) = seeded().await;
        let controller = DashboardController::new(QueryClient::new(gateway.clone()));

        assert_eq!(controller.load("2024-03-05").await, Ok(None));
        assert_eq!(gateway.calls("list_households"), 0);
    }

    #[tokio::test]
    async fn test_failed_read_reports_generic_message() {
        let (gateway, _) = seeded().await;
        gateway.fail_operation("list_holidays");
        let controller = DashboardController::new(QueryClient::ready(gateway));

        let err = controller.load("2024-03-05").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to load holidays");
    }
}
