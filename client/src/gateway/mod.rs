//! # Gateway Contract
//!
//! The gateway is the remote backend that owns every household, milk type,
//! delivery entry, holiday and user profile. The client never persists any of
//! this itself; it only calls the operations below.
//!
//! Futures are not required to be `Send`: in the browser the HTTP
//! implementation is built on JS promises, which are bound to the UI thread.

pub mod memory;

pub use memory::MemoryGateway;

use async_trait::async_trait;
use shared::{
    DeliveryEntry, DeliveryEntryId, DeliveryEntryRequest, HolidayDate, Household,
    HouseholdId, HouseholdRequest, MilkType, MilkTypeId, MonthlySummary, UserProfile, UserRole,
};

use crate::error::GatewayResult;

/// Request/response operations exposed by the remote backend
#[async_trait(?Send)]
pub trait Gateway {
    /// Probe the gateway; succeeds once the session can serve reads
    async fn ping(&self) -> GatewayResult<()>;

    async fn list_households(&self) -> GatewayResult<Vec<Household>>;

    async fn get_household(&self, id: HouseholdId) -> GatewayResult<Option<Household>>;

    /// Create a household; the gateway assigns the identifier
    async fn create_household(&self, request: &HouseholdRequest) -> GatewayResult<Household>;

    async fn update_household(&self, id: HouseholdId, request: &HouseholdRequest) -> GatewayResult<()>;

    /// Delete a household; the gateway is expected to drop its delivery entries too
    async fn delete_household(&self, id: HouseholdId) -> GatewayResult<()>;

    async fn list_milk_types(&self) -> GatewayResult<Vec<MilkType>>;

    async fn get_milk_type(&self, id: MilkTypeId) -> GatewayResult<Option<MilkType>>;

    async fn create_milk_type(&self, name: &str) -> GatewayResult<MilkType>;

    async fn update_milk_type(&self, id: MilkTypeId, name: &str) -> GatewayResult<()>;

    async fn delete_milk_type(&self, id: MilkTypeId) -> GatewayResult<()>;

    async fn list_holidays(&self) -> GatewayResult<Vec<HolidayDate>>;

    async fn mark_holiday(&self, date: &str, note: &str) -> GatewayResult<()>;

    async fn unmark_holiday(&self, date: &str) -> GatewayResult<()>;

    async fn add_delivery_entry(&self, request: &DeliveryEntryRequest) -> GatewayResult<DeliveryEntry>;

    async fn update_delivery_entry(
        &self,
        id: DeliveryEntryId,
        request: &DeliveryEntryRequest,
    ) -> GatewayResult<()>;

    async fn delete_delivery_entry(&self, id: DeliveryEntryId) -> GatewayResult<()>;

    /// Entries whose date falls in `month` (YYYY-MM)
    async fn deliveries_for_month(&self, month: &str) -> GatewayResult<Vec<DeliveryEntry>>;

    async fn deliveries_for_household(&self, household_id: HouseholdId) -> GatewayResult<Vec<DeliveryEntry>>;

    async fn monthly_summary(&self, month: &str) -> GatewayResult<MonthlySummary>;

    async fn caller_profile(&self) -> GatewayResult<Option<UserProfile>>;

    async fn save_caller_profile(&self, profile: &UserProfile) -> GatewayResult<()>;

    async fn caller_role(&self) -> GatewayResult<UserRole>;

    async fn is_caller_admin(&self) -> GatewayResult<bool>;
}
