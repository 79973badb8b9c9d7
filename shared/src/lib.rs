use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the gateway when a household is created
pub type HouseholdId = u64;

/// Identifier assigned by the gateway when a milk type is created
pub type MilkTypeId = u64;

/// Identifier assigned by the gateway when a delivery entry is added
pub type DeliveryEntryId = u64;

/// A household on the delivery round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub id: HouseholdId,
    pub name: String,
    pub address: String,
    pub contact_phone: String,
}

/// A kind of milk that can be delivered (e.g. "Full Cream", "Toned")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilkType {
    pub id: MilkTypeId,
    pub name: String,
}

/// Outcome recorded for a household on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Delivered,
    Skipped,
    Holiday,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Skipped => "skipped",
            DeliveryStatus::Holiday => "holiday",
        }
    }

    /// Parse the lowercase wire name back into a status
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "delivered" => Some(DeliveryStatus::Delivered),
            "skipped" => Some(DeliveryStatus::Skipped),
            "holiday" => Some(DeliveryStatus::Holiday),
            _ => None,
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single delivery record for one household on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryEntry {
    pub id: DeliveryEntryId,
    pub household_id: HouseholdId,
    pub milk_type_id: MilkTypeId,
    /// Day of the delivery (YYYY-MM-DD)
    pub date: String,
    pub quantity_liters: f64,
    pub status: DeliveryStatus,
}

impl DeliveryEntry {
    /// Month (YYYY-MM) this entry belongs to
    pub fn month(&self) -> &str {
        month_prefix(&self.date)
    }

    /// Only delivered entries carry a meaningful quantity
    pub fn counts_toward_totals(&self) -> bool {
        self.status == DeliveryStatus::Delivered
    }
}

/// A day marked as a holiday for every household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolidayDate {
    /// Day of the holiday (YYYY-MM-DD)
    pub date: String,
    pub note: String,
}

/// Liters per household and per milk type for one month, computed by the gateway
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Month covered by the summary (YYYY-MM)
    pub month: String,
    pub household_summaries: Vec<(HouseholdId, f64)>,
    pub milk_type_summaries: Vec<(MilkTypeId, f64)>,
}

impl MonthlySummary {
    pub fn household_total(&self, household_id: HouseholdId) -> f64 {
        self.household_summaries
            .iter()
            .find(|(id, _)| *id == household_id)
            .map(|(_, liters)| *liters)
            .unwrap_or(0.0)
    }

    pub fn milk_type_total(&self, milk_type_id: MilkTypeId) -> f64 {
        self.milk_type_summaries
            .iter()
            .find(|(id, _)| *id == milk_type_id)
            .map(|(_, liters)| *liters)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
}

/// Access level of the calling user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
    Guest,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
            UserRole::Guest => "guest",
        };
        f.write_str(label)
    }
}

/// Request body for creating or updating a household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdRequest {
    pub name: String,
    pub address: String,
    pub contact_phone: String,
}

/// Request body for creating or renaming a milk type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilkTypeRequest {
    pub name: String,
}

/// Request body for adding or updating a delivery entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryEntryRequest {
    pub household_id: HouseholdId,
    pub milk_type_id: MilkTypeId,
    /// Day of the delivery (YYYY-MM-DD)
    pub date: String,
    pub quantity_liters: f64,
    pub status: DeliveryStatus,
}

impl DeliveryEntryRequest {
    /// Month (YYYY-MM) the entry will be filed under
    pub fn month(&self) -> &str {
        month_prefix(&self.date)
    }

    pub fn into_entry(self, id: DeliveryEntryId) -> DeliveryEntry {
        DeliveryEntry {
            id,
            household_id: self.household_id,
            milk_type_id: self.milk_type_id,
            date: self.date,
            quantity_liters: self.quantity_liters,
            status: self.status,
        }
    }
}

/// Request body for marking a day as a holiday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkHolidayRequest {
    pub date: String,
    pub note: String,
}

/// Error body returned by the gateway on non-success responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn month_prefix(date: &str) -> &str {
    date.get(..7).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_status_wire_names() {
        let json = serde_json::to_string(&DeliveryStatus::Skipped).unwrap();
        assert_eq!(json, "\"skipped\"");

        let parsed: DeliveryStatus = serde_json::from_str("\"holiday\"").unwrap();
        assert_eq!(parsed, DeliveryStatus::Holiday);

        assert_eq!(DeliveryStatus::from_name("delivered"), Some(DeliveryStatus::Delivered));
        assert_eq!(DeliveryStatus::from_name("Delivered"), None);
    }

    #[test]
    fn test_entry_month() {
        let entry = DeliveryEntryRequest {
            household_id: 1,
            milk_type_id: 2,
            date: "2024-03-05".to_string(),
            quantity_liters: 2.5,
            status: DeliveryStatus::Delivered,
        }
        .into_entry(7);

        assert_eq!(entry.id, 7);
        assert_eq!(entry.month(), "2024-03");
        assert!(entry.counts_toward_totals());
    }

    #[test]
    fn test_month_prefix_on_short_input() {
        assert_eq!(month_prefix("2024"), "2024");
        assert_eq!(month_prefix(""), "");
    }

    #[test]
    fn test_summary_lookups_default_to_zero() {
        let summary = MonthlySummary {
            month: "2024-03".to_string(),
            household_summaries: vec![(1, 12.5), (2, 3.0)],
            milk_type_summaries: vec![(9, 15.5)],
        };

        assert_eq!(summary.household_total(1), 12.5);
        assert_eq!(summary.household_total(42), 0.0);
        assert_eq!(summary.milk_type_total(9), 15.5);
        assert_eq!(summary.milk_type_total(1), 0.0);
    }

    #[test]
    fn test_summary_tuple_encoding() {
        let summary = MonthlySummary {
            month: "2024-03".to_string(),
            household_summaries: vec![(1, 2.5)],
            milk_type_summaries: vec![],
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["household_summaries"][0][0], 1);
        assert_eq!(json["household_summaries"][0][1], 2.5);
    }
}
