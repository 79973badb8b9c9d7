use std::rc::Rc;

use gloo::timers::callback::Timeout;
use milk_ledger_client::domain::{DailyEntryController, DailyEntryData, DailyEntrySheet, RowEdit};
use milk_ledger_client::ClientError;
use shared::{DeliveryEntryId, HouseholdId};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::use_app::{AppContext, Notice};
use super::use_loader::{use_loader, LoadState};

/// Reducer wrapper around the sheet
#[derive(PartialEq)]
pub struct SheetState(pub DailyEntrySheet);

pub enum SheetAction {
    SetDate(String),
    Refresh(Rc<DailyEntryData>),
    Edit(HouseholdId, RowEdit),
    BeginSave(HouseholdId),
    FinishSave(HouseholdId, Result<DeliveryEntryId, ClientError>),
    ClearSaved(HouseholdId),
    SetHolidayNote(String),
    ClearHolidayNote,
}

impl Reducible for SheetState {
    type Action = SheetAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut sheet = self.0.clone();
        match action {
            SheetAction::SetDate(date) => sheet.set_date(date),
            SheetAction::Refresh(data) => sheet.refresh(&data),
            SheetAction::Edit(id, edit) => {
                sheet.edit(id, edit);
            }
            SheetAction::BeginSave(id) => {
                sheet.begin_save(id);
            }
            SheetAction::FinishSave(id, outcome) => sheet.finish_save(id, &outcome),
            SheetAction::ClearSaved(id) => sheet.clear_saved(id),
            SheetAction::SetHolidayNote(note) => sheet.set_holiday_note(note),
            SheetAction::ClearHolidayNote => sheet.clear_holiday_note(),
        }
        Rc::new(SheetState(sheet))
    }
}

pub struct UseDailyEntryResult {
    pub sheet: UseReducerHandle<SheetState>,
    pub data: LoadState<Rc<DailyEntryData>>,
    pub saving_holiday: bool,
    pub actions: UseDailyEntryActions,
}

#[derive(Clone)]
pub struct UseDailyEntryActions {
    pub set_date: Callback<String>,
    pub edit: Callback<(HouseholdId, RowEdit)>,
    pub save_row: Callback<HouseholdId>,
    pub save_all: Callback<()>,
    pub set_holiday_note: Callback<String>,
    pub toggle_holiday: Callback<bool>,
}

#[hook]
pub fn use_daily_entry(app: &AppContext, initial_date: String) -> UseDailyEntryResult {
    let controller = DailyEntryController::new(app.client.clone());
    let sheet = use_reducer(|| SheetState(DailyEntrySheet::new(initial_date)));
    let saving_holiday = use_state(|| false);
    let saved_flag_ms = u32::try_from(app.config.saved_flag_ms).unwrap_or(u32::MAX);

    let loaded = {
        let controller = controller.clone();
        use_loader(app.session_ready, sheet.0.date().to_string(), move |date: String| async move {
            controller.load(&date).await.map(|data| data.map(Rc::new))
        })
    };

    // Rebuild default rows when fresh data arrives or the date changes
    {
        let dispatcher = sheet.dispatcher();
        let deps = (loaded.state.data.clone(), sheet.0.date().to_string());
        use_effect_with(deps, move |(data, _)| {
            if let Some(data) = data {
                dispatcher.dispatch(SheetAction::Refresh(data.clone()));
            }
            || ()
        });
    }

    let set_date = {
        let dispatcher = sheet.dispatcher();
        Callback::from(move |date: String| dispatcher.dispatch(SheetAction::SetDate(date)))
    };

    let edit = {
        let dispatcher = sheet.dispatcher();
        Callback::from(move |(id, edit): (HouseholdId, RowEdit)| dispatcher.dispatch(SheetAction::Edit(id, edit)))
    };

    let save_row = {
        let controller = controller.clone();
        let sheet = sheet.clone();
        let data = loaded.state.data.clone();
        let notify = app.notify.clone();
        let reload = loaded.reload.clone();
        Callback::from(move |household_id: HouseholdId| {
            let date = sheet.0.date().to_string();
            let (Some(data), Some(row)) = (data.clone(), sheet.0.row(household_id).cloned()) else {
                return;
            };
            if !data.covers(&date) {
                return;
            }
            let dispatcher = sheet.dispatcher();
            let controller = controller.clone();
            let notify = notify.clone();
            let reload = reload.clone();

            dispatcher.dispatch(SheetAction::BeginSave(household_id));
            spawn_local(async move {
                let outcome = controller.save_row(&date, household_id, &row, &data.milk_types).await;
                let ok = outcome.is_ok();
                notify.emit(match &outcome {
                    Ok(_) => Notice::success("Entry saved"),
                    Err(err) => Notice::error(err.to_string()),
                });
                dispatcher.dispatch(SheetAction::FinishSave(household_id, outcome));
                if ok {
                    clear_saved_later(dispatcher, household_id, saved_flag_ms);
                    reload.emit(());
                }
            });
        })
    };

    let save_all = {
        let controller = controller.clone();
        let sheet = sheet.clone();
        let data = loaded.state.data.clone();
        let notify = app.notify.clone();
        let reload = loaded.reload.clone();
        Callback::from(move |_| {
            let date = sheet.0.date().to_string();
            let Some(data) = data.clone().filter(|data| data.covers(&date)) else {
                return;
            };
            let rows: Vec<_> = sheet
                .0
                .rows()
                .into_iter()
                .map(|(id, row)| (id, row.clone()))
                .collect();
            let dispatcher = sheet.dispatcher();
            let controller = controller.clone();
            let notify = notify.clone();
            let reload = reload.clone();

            for (id, _) in &rows {
                dispatcher.dispatch(SheetAction::BeginSave(*id));
            }
            spawn_local(async move {
                let outcomes = controller.save_all(&date, rows, &data.milk_types).await;
                for outcome in outcomes {
                    notify.emit(match &outcome.result {
                        Ok(_) => Notice::success("Entry saved"),
                        Err(err) => Notice::error(err.to_string()),
                    });
                    if outcome.result.is_ok() {
                        clear_saved_later(dispatcher.clone(), outcome.household_id, saved_flag_ms);
                    }
                    dispatcher.dispatch(SheetAction::FinishSave(outcome.household_id, outcome.result));
                }
                reload.emit(());
            });
        })
    };

    let set_holiday_note = {
        let dispatcher = sheet.dispatcher();
        Callback::from(move |note: String| dispatcher.dispatch(SheetAction::SetHolidayNote(note)))
    };

    let toggle_holiday = {
        let controller = controller.clone();
        let sheet = sheet.clone();
        let saving_holiday = saving_holiday.clone();
        let notify = app.notify.clone();
        let reload = loaded.reload.clone();
        Callback::from(move |holiday: bool| {
            let date = sheet.0.date().to_string();
            let note = sheet.0.holiday_note().to_string();
            let dispatcher = sheet.dispatcher();
            let controller = controller.clone();
            let saving_holiday = saving_holiday.clone();
            let notify = notify.clone();
            let reload = reload.clone();

            saving_holiday.set(true);
            spawn_local(async move {
                let outcome = controller.set_holiday(&date, holiday, &note).await;
                if outcome.is_ok() {
                    if !holiday {
                        dispatcher.dispatch(SheetAction::ClearHolidayNote);
                    }
                    reload.emit(());
                }
                notify.emit(Notice::from_outcome(&outcome));
                saving_holiday.set(false);
            });
        })
    };

    UseDailyEntryResult {
        sheet,
        data: loaded.state,
        saving_holiday: *saving_holiday,
        actions: UseDailyEntryActions {
            set_date,
            edit,
            save_row,
            save_all,
            set_holiday_note,
            toggle_holiday,
        },
    }
}

fn clear_saved_later(dispatcher: UseReducerDispatcher<SheetState>, household_id: HouseholdId, delay_ms: u32) {
    Timeout::new(delay_ms, move || {
        dispatcher.dispatch(SheetAction::ClearSaved(household_id));
    })
    .forget();
}
