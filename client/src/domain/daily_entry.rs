//! Daily entry sheet: one editable row per household for a chosen day.
//!
//! `DailyEntrySheet` is plain state (defaults derived from gateway data, local
//! edits layered on top, per-row saving/saved flags). `DailyEntryController`
//! performs the gateway work and never touches the sheet itself, so the UI
//! decides when to apply each outcome.

use std::collections::HashMap;

use futures::future::join_all;
use shared::{
    DeliveryEntry, DeliveryEntryId, DeliveryEntryRequest, DeliveryStatus, HolidayDate, Household,
    HouseholdId, MilkType, MilkTypeId,
};
use tracing::{debug, info, warn};

use crate::calendar::month_of;
use crate::domain::delivery_grid::find_entry;
use crate::error::{ClientError, FailureContext, ValidationError};
use crate::query::QueryClient;

/// Editable state of one household's row
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRow {
    pub milk_type_id: Option<MilkTypeId>,
    /// Raw text of the quantity input
    pub quantity_liters: String,
    pub status: DeliveryStatus,
    pub saving: bool,
    pub saved: bool,
    /// Set once the row is backed by a stored entry
    pub existing_id: Option<DeliveryEntryId>,
}

impl EntryRow {
    /// Row prefilled from a stored entry, or the defaults for a new one
    pub fn from_existing(existing: Option<&DeliveryEntry>, milk_types: &[MilkType]) -> Self {
        match existing {
            Some(entry) => Self {
                milk_type_id: Some(entry.milk_type_id),
                quantity_liters: entry.quantity_liters.to_string(),
                status: entry.status,
                saving: false,
                saved: false,
                existing_id: Some(entry.id),
            },
            None => Self {
                milk_type_id: milk_types.first().map(|m| m.id),
                quantity_liters: "1".to_string(),
                status: DeliveryStatus::Delivered,
                saving: false,
                saved: false,
                existing_id: None,
            },
        }
    }

    /// Quantity and milk type inputs are locked for skipped deliveries
    pub fn is_locked(&self) -> bool {
        self.status == DeliveryStatus::Skipped
    }

    /// Parsed quantity; anything unparsable counts as zero
    pub fn quantity(&self) -> f64 {
        self.quantity_liters.trim().parse::<f64>().ok().filter(|q| q.is_finite()).unwrap_or(0.0)
    }
}

/// A single user edit to a row
#[derive(Debug, Clone, PartialEq)]
pub enum RowEdit {
    MilkType(Option<MilkTypeId>),
    Quantity(String),
    Status(DeliveryStatus),
}

/// Gateway data the sheet is built from
#[derive(Debug, Clone, PartialEq)]
pub struct DailyEntryData {
    /// Month (YYYY-MM) the deliveries were loaded for
    pub month: String,
    pub households: Vec<Household>,
    pub milk_types: Vec<MilkType>,
    pub holidays: Vec<HolidayDate>,
    pub deliveries: Vec<DeliveryEntry>,
}

impl DailyEntryData {
    pub fn holiday_on(&self, date: &str) -> Option<&HolidayDate> {
        self.holidays.iter().find(|h| h.date == date)
    }

    /// Whether the deliveries cover `date`
    pub fn covers(&self, date: &str) -> bool {
        self.month == month_of(date)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailyEntrySheet {
    date: String,
    order: Vec<HouseholdId>,
    defaults: HashMap<HouseholdId, EntryRow>,
    edits: HashMap<HouseholdId, EntryRow>,
    holiday_note: String,
}

impl DailyEntrySheet {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    /// Switch to another day, discarding every local edit
    pub fn set_date(&mut self, date: impl Into<String>) {
        self.date = date.into();
        self.order.clear();
        self.defaults.clear();
        self.edits.clear();
    }

    /// Recompute default rows from freshly loaded data; local edits are kept.
    /// Data loaded for another month is ignored, so rows only appear once the
    /// current date's deliveries are known.
    pub fn refresh(&mut self, data: &DailyEntryData) {
        if !data.covers(&self.date) {
            debug!("Ignoring {} data for {}", data.month, self.date);
            return;
        }
        self.order = data.households.iter().map(|h| h.id).collect();
        self.defaults = data
            .households
            .iter()
            .map(|household| {
                let existing = find_entry(&data.deliveries, household.id, &self.date);
                (household.id, EntryRow::from_existing(existing, &data.milk_types))
            })
            .collect();
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Row as displayed: the local edit if there is one, else the default
    pub fn row(&self, household_id: HouseholdId) -> Option<&EntryRow> {
        self.edits
            .get(&household_id)
            .or_else(|| self.defaults.get(&household_id))
    }

    /// Displayed rows in household order
    pub fn rows(&self) -> Vec<(HouseholdId, &EntryRow)> {
        self.order
            .iter()
            .filter_map(|id| self.row(*id).map(|row| (*id, row)))
            .collect()
    }

    /// Apply an edit; returns false when the row is unknown or the input is locked
    pub fn edit(&mut self, household_id: HouseholdId, edit: RowEdit) -> bool {
        let Some(current) = self.row(household_id) else {
            return false;
        };
        if current.is_locked() && !matches!(edit, RowEdit::Status(_)) {
            return false;
        }

        let mut row = current.clone();
        match edit {
            RowEdit::MilkType(milk_type_id) => row.milk_type_id = milk_type_id,
            RowEdit::Quantity(quantity) => row.quantity_liters = quantity,
            RowEdit::Status(status) => row.status = status,
        }
        self.edits.insert(household_id, row);
        true
    }

    /// Mark a row as saving and return the snapshot to submit
    pub fn begin_save(&mut self, household_id: HouseholdId) -> Option<EntryRow> {
        self.update(household_id, |row| {
            row.saving = true;
            row.saved = false;
        })
    }

    /// Record the outcome of a save started with `begin_save`
    pub fn finish_save(&mut self, household_id: HouseholdId, outcome: &Result<DeliveryEntryId, ClientError>) {
        self.update(household_id, |row| {
            row.saving = false;
            if let Ok(id) = outcome {
                row.saved = true;
                row.existing_id = Some(*id);
            }
        });
    }

    /// Drop the transient "saved" indicator
    pub fn clear_saved(&mut self, household_id: HouseholdId) {
        self.update(household_id, |row| row.saved = false);
    }

    pub fn holiday_note(&self) -> &str {
        &self.holiday_note
    }

    pub fn set_holiday_note(&mut self, note: impl Into<String>) {
        self.holiday_note = note.into();
    }

    pub fn clear_holiday_note(&mut self) {
        self.holiday_note.clear();
    }

    fn update(&mut self, household_id: HouseholdId, patch: impl FnOnce(&mut EntryRow)) -> Option<EntryRow> {
        let mut row = self.row(household_id)?.clone();
        patch(&mut row);
        self.edits.insert(household_id, row.clone());
        Some(row)
    }
}

/// Outcome of saving one row during "save all"
#[derive(Debug, Clone, PartialEq)]
pub struct RowSaveOutcome {
    pub household_id: HouseholdId,
    pub result: Result<DeliveryEntryId, ClientError>,
}

/// Build the request for a row, rejecting delivered rows without a known milk type
pub fn entry_request(
    date: &str,
    household_id: HouseholdId,
    row: &EntryRow,
    milk_types: &[MilkType],
) -> Result<DeliveryEntryRequest, ValidationError> {
    let known = row
        .milk_type_id
        .filter(|id| milk_types.iter().any(|m| m.id == *id));

    if known.is_none() && row.status == DeliveryStatus::Delivered {
        warn!("🥛 Rejected entry for household {}: no milk type selected", household_id);
        return Err(ValidationError::MissingMilkType);
    }

    Ok(DeliveryEntryRequest {
        household_id,
        milk_type_id: known.or(row.milk_type_id).unwrap_or(0),
        date: date.to_string(),
        quantity_liters: row.quantity(),
        status: row.status,
    })
}

#[derive(Clone, PartialEq)]
pub struct DailyEntryController {
    client: QueryClient,
}

impl DailyEntryController {
    pub fn new(client: QueryClient) -> Self {
        Self { client }
    }

    /// Everything the sheet needs for `date`, or `None` while still unavailable
    pub async fn load(&self, date: &str) -> Result<Option<DailyEntryData>, ClientError> {
        let (households, milk_types, holidays, deliveries) = futures::join!(
            self.client.households(),
            self.client.milk_types(),
            self.client.holidays(),
            self.client.deliveries_for_month(month_of(date)),
        );

        let households = households.or_fail("Failed to load households")?;
        let milk_types = milk_types.or_fail("Failed to load milk types")?;
        let holidays = holidays.or_fail("Failed to load holidays")?;
        let deliveries = deliveries.or_fail("Failed to load deliveries")?;

        Ok(match (households, milk_types, holidays, deliveries) {
            (Some(households), Some(milk_types), Some(holidays), Some(deliveries)) => Some(DailyEntryData {
                month: month_of(date).to_string(),
                households,
                milk_types,
                holidays,
                deliveries,
            }),
            _ => None,
        })
    }

    /// Store one row: update when it is backed by an entry, add otherwise.
    /// Returns the id of the stored entry.
    pub async fn save_row(
        &self,
        date: &str,
        household_id: HouseholdId,
        row: &EntryRow,
        milk_types: &[MilkType],
    ) -> Result<DeliveryEntryId, ClientError> {
        let request = entry_request(date, household_id, row, milk_types)?;

        let id = match row.existing_id {
            Some(id) => {
                self.client
                    .update_delivery_entry(id, &request)
                    .await
                    .or_fail("Failed to save entry")?;
                id
            }
            None => {
                let entry = self
                    .client
                    .add_delivery_entry(&request)
                    .await
                    .or_fail("Failed to save entry")?;
                entry.id
            }
        };

        debug!("Saved entry {} for household {} on {}", id, household_id, date);
        Ok(id)
    }

    /// Save every row concurrently; each row succeeds or fails on its own
    pub async fn save_all(
        &self,
        date: &str,
        rows: Vec<(HouseholdId, EntryRow)>,
        milk_types: &[MilkType],
    ) -> Vec<RowSaveOutcome> {
        info!("💾 Saving {} rows for {}", rows.len(), date);

        let saves = rows.iter().map(|(household_id, row)| async move {
            RowSaveOutcome {
                household_id: *household_id,
                result: self.save_row(date, *household_id, row, milk_types).await,
            }
        });
        let outcomes = join_all(saves).await;

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        if failed > 0 {
            warn!("{} of {} rows failed to save for {}", failed, outcomes.len(), date);
        }
        outcomes
    }

    /// Mark or unmark `date` as a holiday; returns the notice to show
    pub async fn set_holiday(&self, date: &str, holiday: bool, note: &str) -> Result<&'static str, ClientError> {
        if holiday {
            self.client
                .mark_holiday(date, note)
                .await
                .or_fail("Failed to update holiday status")?;
            Ok("Marked as holiday")
        } else {
            self.client
                .unmark_holiday(date)
                .await
                .or_fail("Failed to update holiday status")?;
            Ok("Holiday removed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{Gateway, MemoryGateway};
    use shared::HouseholdRequest;
    use std::rc::Rc;

    const DAY: &str = "2024-03-05";

    struct Fixture {
        gateway: Rc<MemoryGateway>,
        controller: DailyEntryController,
        households: Vec<Household>,
        milk_types: Vec<MilkType>,
    }

    async fn fixture() -> Fixture {
        let gateway = Rc::new(MemoryGateway::new());
        let mut milk_types = Vec::new();
        for name in ["Full Cream", "Toned"] {
            milk_types.push(gateway.create_milk_type(name).await.unwrap());
        }
        let mut households = Vec::new();
        for name in ["Sharma", "Iyer"] {
            let request = HouseholdRequest {
                name: name.to_string(),
                address: String::new(),
                contact_phone: String::new(),
            };
            households.push(gateway.create_household(&request).await.unwrap());
        }
        let controller = DailyEntryController::new(QueryClient::ready(gateway.clone()));
        Fixture {
            gateway,
            controller,
            households,
            milk_types,
        }
    }

    async fn loaded_sheet(fx: &Fixture) -> (DailyEntrySheet, DailyEntryData) {
        let data = fx.controller.load(DAY).await.unwrap().unwrap();
        let mut sheet = DailyEntrySheet::new(DAY);
        sheet.refresh(&data);
        (sheet, data)
    }

    #[tokio::test]
    async fn test_new_rows_use_defaults() {
        let fx = fixture().await;
        let (sheet, _) = loaded_sheet(&fx).await;

        let rows = sheet.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, fx.households[0].id);
        let row = rows[0].1;
        assert_eq!(row.milk_type_id, Some(fx.milk_types[0].id));
        assert_eq!(row.quantity_liters, "1");
        assert_eq!(row.status, DeliveryStatus::Delivered);
        assert_eq!(row.existing_id, None);
    }

    #[tokio::test]
    async fn test_existing_entry_prefills_row() {
        let fx = fixture().await;
        let stored = fx
            .gateway
            .add_delivery_entry(&DeliveryEntryRequest {
                household_id: fx.households[1].id,
                milk_type_id: fx.milk_types[1].id,
                date: DAY.to_string(),
                quantity_liters: 2.5,
                status: DeliveryStatus::Skipped,
            })
            .await
            .unwrap();

        let (sheet, _) = loaded_sheet(&fx).await;
        let row = sheet.row(fx.households[1].id).unwrap();

        assert_eq!(row.milk_type_id, Some(fx.milk_types[1].id));
        assert_eq!(row.quantity_liters, "2.5");
        assert_eq!(row.status, DeliveryStatus::Skipped);
        assert_eq!(row.existing_id, Some(stored.id));
        assert!(row.is_locked());
    }

    #[test]
    fn test_no_milk_types_leaves_milk_type_unset() {
        let row = EntryRow::from_existing(None, &[]);
        assert_eq!(row.milk_type_id, None);
    }

    #[tokio::test]
    async fn test_edits_override_defaults_until_date_changes() {
        let fx = fixture().await;
        let (mut sheet, data) = loaded_sheet(&fx).await;
        let id = fx.households[0].id;

        assert!(sheet.edit(id, RowEdit::Quantity("3".to_string())));
        sheet.refresh(&data);
        assert_eq!(sheet.row(id).unwrap().quantity_liters, "3");

        sheet.set_date("2024-03-06");
        assert!(sheet.is_empty());
        sheet.refresh(&data);
        assert_eq!(sheet.row(id).unwrap().quantity_liters, "1");
    }

    #[tokio::test]
    async fn test_skipped_row_locks_quantity_and_milk_type() {
        let fx = fixture().await;
        let (mut sheet, _) = loaded_sheet(&fx).await;
        let id = fx.households[0].id;

        assert!(sheet.edit(id, RowEdit::Status(DeliveryStatus::Skipped)));
        assert!(!sheet.edit(id, RowEdit::Quantity("9".to_string())));
        assert!(!sheet.edit(id, RowEdit::MilkType(None)));
        assert_eq!(sheet.row(id).unwrap().quantity_liters, "1");

        assert!(sheet.edit(id, RowEdit::Status(DeliveryStatus::Delivered)));
        assert!(sheet.edit(id, RowEdit::Quantity("9".to_string())));
    }

    #[test]
    fn test_unknown_row_edit_is_ignored() {
        let mut sheet = DailyEntrySheet::new(DAY);
        assert!(!sheet.edit(42, RowEdit::Quantity("2".to_string())));
        assert_eq!(sheet.begin_save(42), None);
    }

    #[tokio::test]
    async fn test_save_new_row_then_update() {
        let fx = fixture().await;
        let (mut sheet, data) = loaded_sheet(&fx).await;
        let id = fx.households[0].id;

        let row = sheet.begin_save(id).unwrap();
        assert!(sheet.row(id).unwrap().saving);
        let outcome = fx.controller.save_row(DAY, id, &row, &data.milk_types).await;
        sheet.finish_save(id, &outcome);

        let entry_id = outcome.unwrap();
        let row = sheet.row(id).unwrap().clone();
        assert!(!row.saving);
        assert!(row.saved);
        assert_eq!(row.existing_id, Some(entry_id));
        assert_eq!(fx.gateway.calls("add_delivery_entry"), 1);

        sheet.clear_saved(id);
        assert!(!sheet.row(id).unwrap().saved);

        sheet.edit(id, RowEdit::Quantity("2".to_string()));
        let row = sheet.begin_save(id).unwrap();
        let outcome = fx.controller.save_row(DAY, id, &row, &data.milk_types).await;
        assert_eq!(outcome, Ok(entry_id));
        assert_eq!(fx.gateway.calls("add_delivery_entry"), 1);
        assert_eq!(fx.gateway.calls("update_delivery_entry"), 1);

        let reloaded = fx.controller.load(DAY).await.unwrap().unwrap();
        assert_eq!(reloaded.deliveries.len(), 1);
        assert_eq!(reloaded.deliveries[0].quantity_liters, 2.0);
    }

    #[tokio::test]
    async fn test_data_from_previous_month_does_not_build_rows() {
        let fx = fixture().await;
        let (mut sheet, march) = loaded_sheet(&fx).await;
        let id = fx.households[0].id;
        let next_day = "2024-04-01";

        let stored = fx
            .gateway
            .add_delivery_entry(&DeliveryEntryRequest {
                household_id: id,
                milk_type_id: fx.milk_types[1].id,
                date: next_day.to_string(),
                quantity_liters: 1.5,
                status: DeliveryStatus::Delivered,
            })
            .await
            .unwrap();

        // April is still loading; the March data must not produce editable rows
        sheet.set_date(next_day);
        sheet.refresh(&march);
        assert!(!march.covers(next_day));
        assert!(sheet.is_empty());
        assert!(!sheet.edit(id, RowEdit::Quantity("3".to_string())));
        assert_eq!(sheet.begin_save(id), None);

        let april = fx.controller.load(next_day).await.unwrap().unwrap();
        assert_eq!(april.month, "2024-04");
        sheet.refresh(&april);
        let row = sheet.row(id).unwrap().clone();
        assert_eq!(row.existing_id, Some(stored.id));
        assert_eq!(row.quantity_liters, "1.5");

        assert!(sheet.edit(id, RowEdit::Quantity("3".to_string())));
        let row = sheet.begin_save(id).unwrap();
        let outcome = fx.controller.save_row(next_day, id, &row, &april.milk_types).await;
        assert_eq!(outcome, Ok(stored.id));

        let entries = fx.gateway.deliveries_for_month("2024-04").await.unwrap();
        let for_day: Vec<_> = entries
            .iter()
            .filter(|e| e.household_id == id && e.date == next_day)
            .collect();
        assert_eq!(for_day.len(), 1);
        assert_eq!(for_day[0].quantity_liters, 3.0);
        assert_eq!(fx.gateway.calls("add_delivery_entry"), 1);
    }

    #[tokio::test]
    async fn test_delivered_row_requires_known_milk_type() {
        let fx = fixture().await;
        let row = EntryRow {
            milk_type_id: Some(999),
            ..EntryRow::from_existing(None, &fx.milk_types)
        };

        let err = fx
            .controller
            .save_row(DAY, fx.households[0].id, &row, &fx.milk_types)
            .await
            .unwrap_err();

        assert_eq!(err, ClientError::Validation(ValidationError::MissingMilkType));
        assert_eq!(err.to_string(), "Please select a milk type");
        assert_eq!(fx.gateway.calls("add_delivery_entry"), 0);
    }

    #[test]
    fn test_skipped_row_without_milk_type_is_accepted() {
        let row = EntryRow {
            milk_type_id: None,
            quantity_liters: "abc".to_string(),
            status: DeliveryStatus::Skipped,
            saving: false,
            saved: false,
            existing_id: None,
        };

        let request = entry_request(DAY, 7, &row, &[]).unwrap();
        assert_eq!(request.milk_type_id, 0);
        assert_eq!(request.quantity_liters, 0.0);
        assert_eq!(request.status, DeliveryStatus::Skipped);
    }

    #[tokio::test]
    async fn test_failed_save_clears_saving_flag() {
        let fx = fixture().await;
        fx.gateway.fail_operation("add_delivery_entry");
        let (mut sheet, data) = loaded_sheet(&fx).await;
        let id = fx.households[0].id;

        let row = sheet.begin_save(id).unwrap();
        let outcome = fx.controller.save_row(DAY, id, &row, &data.milk_types).await;
        sheet.finish_save(id, &outcome);

        assert_eq!(outcome.unwrap_err().to_string(), "Failed to save entry");
        let row = sheet.row(id).unwrap();
        assert!(!row.saving);
        assert!(!row.saved);
        assert_eq!(row.existing_id, None);
    }

    #[tokio::test]
    async fn test_save_all_reports_each_row() {
        let fx = fixture().await;
        fx.gateway
            .add_delivery_entry(&DeliveryEntryRequest {
                household_id: fx.households[1].id,
                milk_type_id: fx.milk_types[0].id,
                date: DAY.to_string(),
                quantity_liters: 1.0,
                status: DeliveryStatus::Delivered,
            })
            .await
            .unwrap();
        let (sheet, data) = loaded_sheet(&fx).await;
        fx.gateway.fail_operation("add_delivery_entry");

        let rows: Vec<_> = sheet.rows().into_iter().map(|(id, row)| (id, row.clone())).collect();
        let outcomes = fx.controller.save_all(DAY, rows, &data.milk_types).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].household_id, fx.households[0].id);
        assert!(outcomes[0].result.is_err());
        assert_eq!(outcomes[1].household_id, fx.households[1].id);
        assert!(outcomes[1].result.is_ok());
        assert_eq!(fx.gateway.calls("update_delivery_entry"), 1);
    }

    #[tokio::test]
    async fn test_holiday_toggle() {
        let fx = fixture().await;
        let mut sheet = DailyEntrySheet::new(DAY);
        sheet.set_holiday_note("Founders Day");

        let notice = fx.controller.set_holiday(DAY, true, sheet.holiday_note()).await;
        assert_eq!(notice, Ok("Marked as holiday"));
        let data = fx.controller.load(DAY).await.unwrap().unwrap();
        assert_eq!(data.holiday_on(DAY).map(|h| h.note.as_str()), Some("Founders Day"));

        let notice = fx.controller.set_holiday(DAY, false, "").await;
        assert_eq!(notice, Ok("Holiday removed"));
        sheet.clear_holiday_note();
        assert_eq!(sheet.holiday_note(), "");
        let data = fx.controller.load(DAY).await.unwrap().unwrap();
        assert_eq!(data.holiday_on(DAY), None);
    }

    #[tokio::test]
    async fn test_holiday_toggle_failure() {
        let fx = fixture().await;
        fx.gateway.fail_operation("mark_holiday");

        let err = fx.controller.set_holiday(DAY, true, "").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to update holiday status");
    }
}
