use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use shared::{
    DeliveryEntry, DeliveryEntryId, DeliveryEntryRequest, HolidayDate, Household, HouseholdId,
    HouseholdRequest, MilkType, MilkTypeId, MonthlySummary, UserProfile, UserRole,
};
use tracing::{debug, info};

use super::keys::{Mutation, QueryKey};
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Gateway;

type CachedValue = Rc<dyn Any>;
type SharedFetch = Shared<LocalBoxFuture<'static, GatewayResult<CachedValue>>>;

struct InFlight {
    generation: u64,
    ticket: u64,
    fetch: SharedFetch,
}

#[derive(Default)]
struct CacheState {
    values: HashMap<QueryKey, CachedValue>,
    inflight: HashMap<QueryKey, InFlight>,
    generations: HashMap<QueryKey, u64>,
}

impl CacheState {
    fn generation(&self, key: &QueryKey) -> u64 {
        self.generations.get(key).copied().unwrap_or(0)
    }
}

struct Inner {
    gateway: Rc<dyn Gateway>,
    session_ready: Cell<bool>,
    next_ticket: Cell<u64>,
    state: RefCell<CacheState>,
}

/// Cached, de-duplicated access to the gateway for one page session.
///
/// Cloning is cheap and every clone shares the same cache.
#[derive(Clone)]
pub struct QueryClient {
    inner: Rc<Inner>,
}

impl PartialEq for QueryClient {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl QueryClient {
    /// Create a client whose session is still initializing; reads return no
    /// data until [`QueryClient::connect`] succeeds
    pub fn new(gateway: Rc<dyn Gateway>) -> Self {
        Self {
            inner: Rc::new(Inner {
                gateway,
                session_ready: Cell::new(false),
                next_ticket: Cell::new(0),
                state: RefCell::new(CacheState::default()),
            }),
        }
    }

    /// Create a client whose session is already usable
    pub fn ready(gateway: Rc<dyn Gateway>) -> Self {
        let client = Self::new(gateway);
        client.set_session_ready(true);
        client
    }

    pub fn gateway(&self) -> Rc<dyn Gateway> {
        Rc::clone(&self.inner.gateway)
    }

    /// Probe the gateway and open the session for reads
    pub async fn connect(&self) -> GatewayResult<()> {
        self.inner.gateway.ping().await?;
        self.set_session_ready(true);
        info!("🔌 Gateway session ready");
        Ok(())
    }

    pub fn set_session_ready(&self, ready: bool) {
        self.inner.session_ready.set(ready);
    }

    pub fn is_session_ready(&self) -> bool {
        self.inner.session_ready.get()
    }

    pub fn is_cached(&self, key: &QueryKey) -> bool {
        self.inner.state.borrow().values.contains_key(key)
    }

    /// Drop the cached value for `key` and detach any fetch already in flight,
    /// so the next read goes back to the gateway
    pub fn invalidate(&self, key: &QueryKey) {
        let mut state = self.inner.state.borrow_mut();
        *state.generations.entry(key.clone()).or_insert(0) += 1;
        state.values.remove(key);
        state.inflight.remove(key);
        debug!("invalidated {}", key);
    }

    fn apply(&self, mutation: Mutation) {
        for key in mutation.invalidates() {
            self.invalidate(&key);
        }
    }

    async fn read<T, F, Fut>(&self, key: QueryKey, load: F) -> GatewayResult<Option<T>>
    where
        T: Clone + 'static,
        F: FnOnce(Rc<dyn Gateway>) -> Fut,
        Fut: Future<Output = GatewayResult<T>> + 'static,
    {
        if !self.is_session_ready() || !key.is_enabled() {
            debug!("read of {} skipped: query disabled", key);
            return Ok(None);
        }

        if let Some(value) = self.cached::<T>(&key) {
            debug!("cache hit for {}", key);
            return Ok(Some(value));
        }

        let (generation, ticket, fetch) = self.join_or_start(&key, load);
        let outcome = fetch.await;
        self.settle(&key, generation, ticket, &outcome);

        let value = outcome?;
        value
            .downcast_ref::<T>()
            .cloned()
            .map(Some)
            .ok_or_else(|| GatewayError::Decode(format!("unexpected cached value for {}", key)))
    }

    fn cached<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        self.inner
            .state
            .borrow()
            .values
            .get(key)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    fn join_or_start<T, F, Fut>(&self, key: &QueryKey, load: F) -> (u64, u64, SharedFetch)
    where
        T: 'static,
        F: FnOnce(Rc<dyn Gateway>) -> Fut,
        Fut: Future<Output = GatewayResult<T>> + 'static,
    {
        let mut state = self.inner.state.borrow_mut();
        let generation = state.generation(key);

        if let Some(inflight) = state.inflight.get(key) {
            debug!("joining in-flight fetch for {}", key);
            return (inflight.generation, inflight.ticket, inflight.fetch.clone());
        }

        let ticket = self.inner.next_ticket.get();
        self.inner.next_ticket.set(ticket + 1);

        debug!("cache miss for {}, fetching", key);
        let pending = load(Rc::clone(&self.inner.gateway));
        let fetch = async move { pending.await.map(|value| Rc::new(value) as CachedValue) }
            .boxed_local()
            .shared();

        state.inflight.insert(
            key.clone(),
            InFlight {
                generation,
                ticket,
                fetch: fetch.clone(),
            },
        );
        (generation, ticket, fetch)
    }

    fn settle(&self, key: &QueryKey, generation: u64, ticket: u64, outcome: &GatewayResult<CachedValue>) {
        let mut state = self.inner.state.borrow_mut();

        if state.inflight.get(key).map_or(false, |inflight| inflight.ticket == ticket) {
            state.inflight.remove(key);
        }

        if state.generation(key) != generation {
            debug!("discarding result for {}: invalidated while in flight", key);
            return;
        }

        if let Ok(value) = outcome {
            state.values.insert(key.clone(), Rc::clone(value));
        }
    }

    // Reads

    pub async fn households(&self) -> GatewayResult<Option<Vec<Household>>> {
        self.read(QueryKey::Households, |gateway| async move {
            gateway.list_households().await
        })
        .await
    }

    pub async fn milk_types(&self) -> GatewayResult<Option<Vec<MilkType>>> {
        self.read(QueryKey::MilkTypes, |gateway| async move {
            gateway.list_milk_types().await
        })
        .await
    }

    pub async fn holidays(&self) -> GatewayResult<Option<Vec<HolidayDate>>> {
        self.read(QueryKey::Holidays, |gateway| async move {
            gateway.list_holidays().await
        })
        .await
    }

    pub async fn deliveries_for_month(&self, month: &str) -> GatewayResult<Option<Vec<DeliveryEntry>>> {
        let owned = month.to_string();
        self.read(QueryKey::DeliveriesForMonth(month.to_string()), move |gateway| async move {
            gateway.deliveries_for_month(&owned).await
        })
        .await
    }

    pub async fn monthly_summary(&self, month: &str) -> GatewayResult<Option<MonthlySummary>> {
        let owned = month.to_string();
        self.read(QueryKey::MonthlySummary(month.to_string()), move |gateway| async move {
            gateway.monthly_summary(&owned).await
        })
        .await
    }

    /// Outer `None` means the read is disabled; inner `None` means the caller has no profile
    pub async fn caller_profile(&self) -> GatewayResult<Option<Option<UserProfile>>> {
        self.read(QueryKey::CallerProfile, |gateway| async move {
            gateway.caller_profile().await
        })
        .await
    }

    pub async fn caller_role(&self) -> GatewayResult<Option<UserRole>> {
        self.read(QueryKey::CallerRole, |gateway| async move {
            gateway.caller_role().await
        })
        .await
    }

    // Mutations

    pub async fn create_household(&self, request: &HouseholdRequest) -> GatewayResult<Household> {
        let household = self.inner.gateway.create_household(request).await?;
        info!("🏠 Created household {} ({})", household.id, household.name);
        self.apply(Mutation::CreateHousehold);
        Ok(household)
    }

    pub async fn update_household(&self, id: HouseholdId, request: &HouseholdRequest) -> GatewayResult<()> {
        self.inner.gateway.update_household(id, request).await?;
        info!("🏠 Updated household {}", id);
        self.apply(Mutation::UpdateHousehold);
        Ok(())
    }

    pub async fn delete_household(&self, id: HouseholdId) -> GatewayResult<()> {
        self.inner.gateway.delete_household(id).await?;
        info!("🏠 Deleted household {}", id);
        self.apply(Mutation::DeleteHousehold);
        Ok(())
    }

    pub async fn create_milk_type(&self, name: &str) -> GatewayResult<MilkType> {
        let milk_type = self.inner.gateway.create_milk_type(name).await?;
        info!("🥛 Created milk type {} ({})", milk_type.id, milk_type.name);
        self.apply(Mutation::CreateMilkType);
        Ok(milk_type)
    }

    pub async fn update_milk_type(&self, id: MilkTypeId, name: &str) -> GatewayResult<()> {
        self.inner.gateway.update_milk_type(id, name).await?;
        info!("🥛 Renamed milk type {} to {}", id, name);
        self.apply(Mutation::UpdateMilkType);
        Ok(())
    }

    pub async fn delete_milk_type(&self, id: MilkTypeId) -> GatewayResult<()> {
        self.inner.gateway.delete_milk_type(id).await?;
        info!("🥛 Deleted milk type {}", id);
        self.apply(Mutation::DeleteMilkType);
        Ok(())
    }

    pub async fn mark_holiday(&self, date: &str, note: &str) -> GatewayResult<()> {
        self.inner.gateway.mark_holiday(date, note).await?;
        info!("🗓️ Marked {} as a holiday", date);
        self.apply(Mutation::MarkHoliday);
        Ok(())
    }

    pub async fn unmark_holiday(&self, date: &str) -> GatewayResult<()> {
        self.inner.gateway.unmark_holiday(date).await?;
        info!("🗓️ Removed holiday on {}", date);
        self.apply(Mutation::UnmarkHoliday);
        Ok(())
    }

    pub async fn add_delivery_entry(&self, request: &DeliveryEntryRequest) -> GatewayResult<DeliveryEntry> {
        let entry = self.inner.gateway.add_delivery_entry(request).await?;
        info!(
            "📦 Added delivery {} for household {} on {}",
            entry.id, entry.household_id, entry.date
        );
        self.apply(Mutation::AddDelivery {
            month: request.month().to_string(),
        });
        Ok(entry)
    }

    pub async fn update_delivery_entry(
        &self,
        id: DeliveryEntryId,
        request: &DeliveryEntryRequest,
    ) -> GatewayResult<()> {
        self.inner.gateway.update_delivery_entry(id, request).await?;
        info!("📦 Updated delivery {} on {}", id, request.date);
        self.apply(Mutation::UpdateDelivery {
            month: request.month().to_string(),
        });
        Ok(())
    }

    /// Delete an entry; `month` names the cached month the entry was listed under
    pub async fn delete_delivery_entry(&self, id: DeliveryEntryId, month: &str) -> GatewayResult<()> {
        self.inner.gateway.delete_delivery_entry(id).await?;
        info!("📦 Deleted delivery {}", id);
        self.apply(Mutation::DeleteDelivery {
            month: month.to_string(),
        });
        Ok(())
    }

    pub async fn save_caller_profile(&self, profile: &UserProfile) -> GatewayResult<()> {
        self.inner.gateway.save_caller_profile(profile).await?;
        info!("👤 Saved caller profile");
        self.apply(Mutation::SaveProfile);
        Ok(())
    }
}
