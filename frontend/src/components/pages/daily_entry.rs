use milk_ledger_client::calendar::format_day;
use milk_ledger_client::domain::{EntryRow, RowEdit};
use shared::{DeliveryStatus, Household, MilkType};
use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, MouseEvent};
use yew::prelude::*;

use super::PageProps;
use crate::hooks::use_daily_entry::{use_daily_entry, UseDailyEntryActions};
use crate::services::date_utils::local_today;

#[function_component(DailyEntryPage)]
pub fn daily_entry_page(props: &PageProps) -> Html {
    let daily = use_daily_entry(&props.app, local_today());
    let actions = daily.actions.clone();
    let sheet = &daily.sheet.0;
    let date = sheet.date().to_string();

    let holiday = daily
        .data
        .data
        .as_ref()
        .and_then(|data| data.holiday_on(&date).cloned());
    let is_holiday = holiday.is_some();
    // Data kept from the previous month stays hidden until the new month arrives
    let current = daily.data.data.as_ref().filter(|data| data.covers(&date));
    let loading = daily.data.loading || current.is_none();

    let on_date = {
        let set_date = actions.set_date.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            set_date.emit(input.value());
        })
    };

    let on_holiday_toggle = {
        let toggle_holiday = actions.toggle_holiday.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            toggle_holiday.emit(input.checked());
        })
    };

    let on_note = {
        let set_holiday_note = actions.set_holiday_note.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            set_holiday_note.emit(input.value());
        })
    };

    let on_save_all = {
        let save_all = actions.save_all.clone();
        Callback::from(move |_: MouseEvent| save_all.emit(()))
    };

    let rows = match (current, &daily.data.error) {
        (_, Some(error)) => html! { <div class="page-error">{error.clone()}</div> },
        (None, None) => html! { <div class="skeleton">{"Loading..."}</div> },
        (Some(data), None) if data.households.is_empty() => html! {
            <p class="empty-state">{"No households yet. Add one from the Households page."}</p>
        },
        (Some(data), None) => html! {
            <div class="entry-rows">
                { for data.households.iter().filter_map(|household| {
                    sheet.row(household.id).map(|row| render_row(household, row, &data.milk_types, is_holiday, loading, &actions))
                }) }
            </div>
        },
    };

    html! {
        <div class="page daily-entry">
            <header class="page-header">
                <div>
                    <h1>{"Daily Entry"}</h1>
                    <p>{"Record milk deliveries for any date"}</p>
                </div>
            </header>

            <section class="card entry-controls">
                <div class="form-group">
                    <label for="date-picker">{"Date"}</label>
                    <input id="date-picker" type="date" value={date.clone()} onchange={on_date} />
                    <span class="date-display">{format_day(&date)}</span>
                </div>

                <div class="form-group holiday-toggle">
                    <label for="holiday-switch">{"Holiday"}</label>
                    <input
                        id="holiday-switch"
                        type="checkbox"
                        checked={is_holiday}
                        onchange={on_holiday_toggle}
                        disabled={daily.saving_holiday || loading}
                    />
                    <span>{if is_holiday { "🎉 Holiday" } else { "Not a holiday" }}</span>
                    {if daily.saving_holiday { html! { <span class="spinner">{"⏳"}</span> } } else { html! {} }}
                </div>

                {match &holiday {
                    Some(holiday) => html! {
                        <div class="holiday-note">
                            <strong>{"Holiday Note"}</strong>
                            <p>{if holiday.note.is_empty() { "No note".to_string() } else { holiday.note.clone() }}</p>
                        </div>
                    },
                    None => html! {
                        <>
                            <button
                                class="btn btn-primary"
                                onclick={on_save_all}
                                disabled={loading || sheet.is_empty()}
                            >
                                {"💾 Save All"}
                            </button>
                            <div class="form-group">
                                <label for="holiday-note">{"To mark as holiday, toggle above. Note (optional):"}</label>
                                <textarea
                                    id="holiday-note"
                                    value={sheet.holiday_note().to_string()}
                                    oninput={on_note}
                                />
                            </div>
                        </>
                    },
                }}
            </section>

            {if is_holiday {
                html! {
                    <div class="holiday-banner">
                        {"⚠️ This day is marked as a holiday. Deliveries are not recorded."}
                    </div>
                }
            } else {
                rows
            }}
        </div>
    }
}

fn render_row(
    household: &Household,
    row: &EntryRow,
    milk_types: &[MilkType],
    is_holiday: bool,
    loading: bool,
    actions: &UseDailyEntryActions,
) -> Html {
    let id = household.id;
    let locked = row.is_locked() || is_holiday || loading;

    let on_milk_type = {
        let edit = actions.edit.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let milk_type_id = select.value().parse().ok();
            edit.emit((id, RowEdit::MilkType(milk_type_id)));
        })
    };

    let on_quantity = {
        let edit = actions.edit.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            edit.emit((id, RowEdit::Quantity(input.value())));
        })
    };

    let on_status = {
        let edit = actions.edit.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Some(status) = DeliveryStatus::from_name(&select.value()) {
                edit.emit((id, RowEdit::Status(status)));
            }
        })
    };

    let on_save = {
        let save_row = actions.save_row.clone();
        Callback::from(move |_: MouseEvent| save_row.emit(id))
    };

    let selected_milk_type = row.milk_type_id.map(|m| m.to_string()).unwrap_or_default();

    html! {
        <div class="card entry-row" key={id}>
            <div class="entry-household">
                <strong>{household.name.clone()}</strong>
                {if household.address.is_empty() { html! {} } else {
                    html! { <span class="household-address">{household.address.clone()}</span> }
                }}
            </div>

            <select onchange={on_milk_type} disabled={locked}>
                <option value="" selected={selected_milk_type.is_empty()}>{"Select milk type"}</option>
                { for milk_types.iter().map(|milk_type| {
                    let value = milk_type.id.to_string();
                    let selected = value == selected_milk_type;
                    html! { <option key={milk_type.id} {value} {selected}>{milk_type.name.clone()}</option> }
                }) }
            </select>

            <input
                type="number"
                min="0"
                step="0.5"
                value={row.quantity_liters.clone()}
                oninput={on_quantity}
                disabled={locked}
            />

            <select onchange={on_status} disabled={is_holiday || loading}>
                { for [DeliveryStatus::Delivered, DeliveryStatus::Skipped, DeliveryStatus::Holiday].iter().map(|status| html! {
                    <option
                        key={status.as_str()}
                        value={status.as_str()}
                        selected={*status == row.status}
                    >
                        {status.as_str()}
                    </option>
                }) }
            </select>

            <button class="btn btn-primary" onclick={on_save} disabled={row.saving || is_holiday || loading}>
                {if row.saving {
                    "Saving..."
                } else if row.saved {
                    "✅ Saved"
                } else {
                    "Save"
                }}
            </button>
        </div>
    }
}
