//! In-process gateway.
//!
//! Keeps every record in memory and mirrors the remote backend's contract:
//! sequential identifiers, cascade delete of a household's entries, and the
//! monthly summary computed from delivered entries. It also records how often
//! each operation was called and can be told to fail or pause specific
//! operations, which is what the controller and cache tests lean on.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use futures::channel::oneshot;
use shared::{
    DeliveryEntry, DeliveryEntryId, DeliveryEntryRequest, HolidayDate, Household,
    HouseholdId, HouseholdRequest, MilkType, MilkTypeId, MonthlySummary, UserProfile, UserRole,
};
use tracing::debug;

use super::Gateway;
use crate::error::{GatewayError, GatewayResult};

#[derive(Default)]
struct Store {
    households: Vec<Household>,
    milk_types: Vec<MilkType>,
    entries: Vec<DeliveryEntry>,
    holidays: BTreeMap<String, String>,
    profile: Option<UserProfile>,
}

pub struct MemoryGateway {
    store: RefCell<Store>,
    role: Cell<UserRole>,
    next_id: Cell<u64>,
    calls: RefCell<HashMap<&'static str, usize>>,
    failing: RefCell<HashSet<&'static str>>,
    paused: RefCell<HashMap<&'static str, oneshot::Receiver<()>>>,
}

impl MemoryGateway {
    /// Create an empty gateway whose caller has the `user` role
    pub fn new() -> Self {
        Self {
            store: RefCell::new(Store::default()),
            role: Cell::new(UserRole::User),
            next_id: Cell::new(1),
            calls: RefCell::new(HashMap::new()),
            failing: RefCell::new(HashSet::new()),
            paused: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_role(self, role: UserRole) -> Self {
        self.role.set(role);
        self
    }

    /// Number of times `operation` (the trait method name) has been called
    pub fn calls(&self, operation: &str) -> usize {
        self.calls.borrow().get(operation).copied().unwrap_or(0)
    }

    /// Number of calls across every operation
    pub fn total_calls(&self) -> usize {
        self.calls.borrow().values().sum()
    }

    /// Make every subsequent call to `operation` fail until restored
    pub fn fail_operation(&self, operation: &'static str) {
        self.failing.borrow_mut().insert(operation);
    }

    pub fn restore_operation(&self, operation: &'static str) {
        self.failing.borrow_mut().remove(operation);
    }

    /// Hold the next call to `operation` until the returned sender fires (or is dropped)
    pub fn pause_operation(&self, operation: &'static str) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.paused.borrow_mut().insert(operation, gate);
        release
    }

    async fn enter(&self, operation: &'static str) -> GatewayResult<()> {
        *self.calls.borrow_mut().entry(operation).or_insert(0) += 1;
        debug!("memory gateway: {}", operation);

        let gate = self.paused.borrow_mut().remove(operation);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.failing.borrow().contains(operation) {
            return Err(GatewayError::Unavailable(format!("{} is failing", operation)));
        }
        Ok(())
    }

    fn allocate_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(what: &str) -> GatewayError {
    GatewayError::Server {
        status: 404,
        message: format!("{} not found", what),
    }
}

fn add_liters<K: Ord>(totals: &mut BTreeMap<K, f64>, key: K, liters: f64) {
    *totals.entry(key).or_insert(0.0) += liters;
}

#[async_trait(?Send)]
impl Gateway for MemoryGateway {
    async fn ping(&self) -> GatewayResult<()> {
        self.enter("ping").await
    }

    async fn list_households(&self) -> GatewayResult<Vec<Household>> {
        self.enter("list_households").await?;
        Ok(self.store.borrow().households.clone())
    }

    async fn get_household(&self, id: HouseholdId) -> GatewayResult<Option<Household>> {
        self.enter("get_household").await?;
        Ok(self.store.borrow().households.iter().find(|h| h.id == id).cloned())
    }

    async fn create_household(&self, request: &HouseholdRequest) -> GatewayResult<Household> {
        self.enter("create_household").await?;
        let household = Household {
            id: self.allocate_id(),
            name: request.name.clone(),
            address: request.address.clone(),
            contact_phone: request.contact_phone.clone(),
        };
        self.store.borrow_mut().households.push(household.clone());
        Ok(household)
    }

    async fn update_household(&self, id: HouseholdId, request: &HouseholdRequest) -> GatewayResult<()> {
        self.enter("update_household").await?;
        let mut store = self.store.borrow_mut();
        let household = store
            .households
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| not_found("Household"))?;
        household.name = request.name.clone();
        household.address = request.address.clone();
        household.contact_phone = request.contact_phone.clone();
        Ok(())
    }

    async fn delete_household(&self, id: HouseholdId) -> GatewayResult<()> {
        self.enter("delete_household").await?;
        let mut store = self.store.borrow_mut();
        let before = store.households.len();
        store.households.retain(|h| h.id != id);
        if store.households.len() == before {
            return Err(not_found("Household"));
        }
        store.entries.retain(|e| e.household_id != id);
        Ok(())
    }

    async fn list_milk_types(&self) -> GatewayResult<Vec<MilkType>> {
        self.enter("list_milk_types").await?;
        Ok(self.store.borrow().milk_types.clone())
    }

    async fn get_milk_type(&self, id: MilkTypeId) -> GatewayResult<Option<MilkType>> {
        self.enter("get_milk_type").await?;
        Ok(self.store.borrow().milk_types.iter().find(|m| m.id == id).cloned())
    }

    async fn create_milk_type(&self, name: &str) -> GatewayResult<MilkType> {
        self.enter("create_milk_type").await?;
        let milk_type = MilkType {
            id: self.allocate_id(),
            name: name.to_string(),
        };
        self.store.borrow_mut().milk_types.push(milk_type.clone());
        Ok(milk_type)
    }

    async fn update_milk_type(&self, id: MilkTypeId, name: &str) -> GatewayResult<()> {
        self.enter("update_milk_type").await?;
        let mut store = self.store.borrow_mut();
        let milk_type = store
            .milk_types
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found("Milk type"))?;
        milk_type.name = name.to_string();
        Ok(())
    }

    async fn delete_milk_type(&self, id: MilkTypeId) -> GatewayResult<()> {
        self.enter("delete_milk_type").await?;
        let mut store = self.store.borrow_mut();
        let before = store.milk_types.len();
        store.milk_types.retain(|m| m.id != id);
        if store.milk_types.len() == before {
            return Err(not_found("Milk type"));
        }
        Ok(())
    }

    async fn list_holidays(&self) -> GatewayResult<Vec<HolidayDate>> {
        self.enter("list_holidays").await?;
        Ok(self
            .store
            .borrow()
            .holidays
            .iter()
            .map(|(date, note)| HolidayDate {
                date: date.clone(),
                note: note.clone(),
            })
            .collect())
    }

    async fn mark_holiday(&self, date: &str, note: &str) -> GatewayResult<()> {
        self.enter("mark_holiday").await?;
        self.store
            .borrow_mut()
            .holidays
            .insert(date.to_string(), note.to_string());
        Ok(())
    }

    async fn unmark_holiday(&self, date: &str) -> GatewayResult<()> {
        self.enter("unmark_holiday").await?;
        self.store.borrow_mut().holidays.remove(date);
        Ok(())
    }

    async fn add_delivery_entry(&self, request: &DeliveryEntryRequest) -> GatewayResult<DeliveryEntry> {
        self.enter("add_delivery_entry").await?;
        let entry = request.clone().into_entry(self.allocate_id());
        self.store.borrow_mut().entries.push(entry.clone());
        Ok(entry)
    }

    async fn update_delivery_entry(
        &self,
        id: DeliveryEntryId,
        request: &DeliveryEntryRequest,
    ) -> GatewayResult<()> {
        self.enter("update_delivery_entry").await?;
        let mut store = self.store.borrow_mut();
        let entry = store
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| not_found("Delivery entry"))?;
        *entry = request.clone().into_entry(id);
        Ok(())
    }

    async fn delete_delivery_entry(&self, id: DeliveryEntryId) -> GatewayResult<()> {
        self.enter("delete_delivery_entry").await?;
        let mut store = self.store.borrow_mut();
        let before = store.entries.len();
        store.entries.retain(|e| e.id != id);
        if store.entries.len() == before {
            return Err(not_found("Delivery entry"));
        }
        Ok(())
    }

    async fn deliveries_for_month(&self, month: &str) -> GatewayResult<Vec<DeliveryEntry>> {
        self.enter("deliveries_for_month").await?;
        Ok(self
            .store
            .borrow()
            .entries
            .iter()
            .filter(|e| e.month() == month)
            .cloned()
            .collect())
    }

    async fn deliveries_for_household(&self, household_id: HouseholdId) -> GatewayResult<Vec<DeliveryEntry>> {
        self.enter("deliveries_for_household").await?;
        Ok(self
            .store
            .borrow()
            .entries
            .iter()
            .filter(|e| e.household_id == household_id)
            .cloned()
            .collect())
    }

    async fn monthly_summary(&self, month: &str) -> GatewayResult<MonthlySummary> {
        self.enter("monthly_summary").await?;
        let store = self.store.borrow();

        let mut per_household = BTreeMap::new();
        let mut per_milk_type = BTreeMap::new();
        for entry in store
            .entries
            .iter()
            .filter(|e| e.month() == month && e.counts_toward_totals())
        {
            add_liters(&mut per_household, entry.household_id, entry.quantity_liters);
            add_liters(&mut per_milk_type, entry.milk_type_id, entry.quantity_liters);
        }

        Ok(MonthlySummary {
            month: month.to_string(),
            household_summaries: per_household.into_iter().collect(),
            milk_type_summaries: per_milk_type.into_iter().collect(),
        })
    }

    async fn caller_profile(&self) -> GatewayResult<Option<UserProfile>> {
        self.enter("caller_profile").await?;
        Ok(self.store.borrow().profile.clone())
    }

    async fn save_caller_profile(&self, profile: &UserProfile) -> GatewayResult<()> {
        self.enter("save_caller_profile").await?;
        self.store.borrow_mut().profile = Some(profile.clone());
        Ok(())
    }

    async fn caller_role(&self) -> GatewayResult<UserRole> {
        self.enter("caller_role").await?;
        Ok(self.role.get())
    }

    async fn is_caller_admin(&self) -> GatewayResult<bool> {
        self.enter("is_caller_admin").await?;
        Ok(self.role.get() == UserRole::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::DeliveryStatus;

    fn household(name: &str) -> HouseholdRequest {
        HouseholdRequest {
            name: name.to_string(),
            address: "12 Dairy Lane".to_string(),
            contact_phone: "555-0100".to_string(),
        }
    }

    fn delivery(household_id: u64, milk_type_id: u64, date: &str, liters: f64, status: DeliveryStatus) -> DeliveryEntryRequest {
        DeliveryEntryRequest {
            household_id,
            milk_type_id,
            date: date.to_string(),
            quantity_liters: liters,
            status,
        }
    }

    #[tokio::test]
    async fn test_identifiers_are_assigned_sequentially() {
        let gateway = MemoryGateway::new();
        let first = gateway.create_household(&household("Patel")).await.expect("create household");
        let milk = gateway.create_milk_type("Toned").await.expect("create milk type");

        assert_eq!(first.id, 1);
        assert_eq!(milk.id, 2);
        assert_eq!(gateway.calls("create_household"), 1);
        assert_eq!(gateway.total_calls(), 2);
    }

    #[tokio::test]
    async fn test_delete_household_cascades_entries() {
        let gateway = MemoryGateway::new();
        let keep = gateway.create_household(&household("Keep")).await.unwrap();
        let leaving = gateway.create_household(&household("Drop")).await.unwrap();
        let milk = gateway.create_milk_type("Full Cream").await.unwrap();

        gateway
            .add_delivery_entry(&delivery(keep.id, milk.id, "2024-03-01", 1.0, DeliveryStatus::Delivered))
            .await
            .unwrap();
        gateway
            .add_delivery_entry(&delivery(leaving.id, milk.id, "2024-03-01", 2.0, DeliveryStatus::Delivered))
            .await
            .unwrap();

        gateway.delete_household(leaving.id).await.expect("delete household");

        let remaining = gateway.deliveries_for_month("2024-03").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].household_id, keep.id);
        assert!(gateway.get_household(leaving.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_monthly_summary_counts_only_delivered() {
        let gateway = MemoryGateway::new();
        let h = gateway.create_household(&household("Rao")).await.unwrap();
        let toned = gateway.create_milk_type("Toned").await.unwrap();
        let full = gateway.create_milk_type("Full Cream").await.unwrap();

        for request in [
            delivery(h.id, toned.id, "2024-03-01", 1.5, DeliveryStatus::Delivered),
            delivery(h.id, full.id, "2024-03-02", 2.0, DeliveryStatus::Delivered),
            delivery(h.id, toned.id, "2024-03-03", 9.0, DeliveryStatus::Skipped),
            delivery(h.id, toned.id, "2024-03-04", 9.0, DeliveryStatus::Holiday),
            delivery(h.id, toned.id, "2024-04-01", 5.0, DeliveryStatus::Delivered),
        ] {
            gateway.add_delivery_entry(&request).await.unwrap();
        }

        let summary = gateway.monthly_summary("2024-03").await.unwrap();
        assert_eq!(summary.month, "2024-03");
        assert_eq!(summary.household_summaries, vec![(h.id, 3.5)]);
        assert_eq!(summary.milk_type_summaries, vec![(toned.id, 1.5), (full.id, 2.0)]);
    }

    #[tokio::test]
    async fn test_holidays_sorted_and_overwritten() {
        let gateway = MemoryGateway::new();
        gateway.mark_holiday("2024-03-09", "Festival").await.unwrap();
        gateway.mark_holiday("2024-03-05", "Founders Day").await.unwrap();
        gateway.mark_holiday("2024-03-09", "Moved").await.unwrap();

        let holidays = gateway.list_holidays().await.unwrap();
        assert_eq!(holidays.len(), 2);
        assert_eq!(holidays[0].date, "2024-03-05");
        assert_eq!(holidays[1].note, "Moved");

        gateway.unmark_holiday("2024-03-05").await.unwrap();
        assert_eq!(gateway.list_holidays().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_operation() {
        let gateway = MemoryGateway::new();
        gateway.fail_operation("list_households");

        let err = gateway.list_households().await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(_)));
        assert_eq!(gateway.calls("list_households"), 1);

        gateway.restore_operation("list_households");
        assert!(gateway.list_households().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_paused_operation_waits_for_release() {
        let gateway = MemoryGateway::new();
        let release = gateway.pause_operation("list_milk_types");

        let (listed, _) = futures::join!(gateway.list_milk_types(), async move {
            let _ = release.send(());
        });

        assert!(listed.unwrap().is_empty());
        assert_eq!(gateway.calls("list_milk_types"), 1);
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let gateway = MemoryGateway::new();
        let err = gateway.update_milk_type(99, "Skimmed").await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::Server {
                status: 404,
                message: "Milk type not found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_profile_and_role() {
        let gateway = MemoryGateway::new().with_role(UserRole::Admin);
        assert!(gateway.caller_profile().await.unwrap().is_none());

        gateway
            .save_caller_profile(&UserProfile { name: "Meera".to_string() })
            .await
            .unwrap();

        assert_eq!(gateway.caller_profile().await.unwrap().map(|p| p.name), Some("Meera".to_string()));
        assert_eq!(gateway.caller_role().await.unwrap(), UserRole::Admin);
        assert!(gateway.is_caller_admin().await.unwrap());
    }
}
