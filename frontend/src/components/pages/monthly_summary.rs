use milk_ledger_client::calendar::{day_number, format_month};
use milk_ledger_client::domain::{format_total, MonthCursor, MonthlyLedger, MonthlySummaryController};
use web_sys::MouseEvent;
use yew::prelude::*;

use super::PageProps;
use crate::hooks::use_loader::use_loader;
use crate::services::date_utils::local_month;

#[function_component(MonthlySummaryPage)]
pub fn monthly_summary_page(props: &PageProps) -> Html {
    let app = &props.app;
    let cursor = use_state(|| MonthCursor::new(local_month()));

    let loaded = {
        let controller = MonthlySummaryController::new(app.client.clone());
        use_loader(app.session_ready, cursor.month().to_string(), move |month: String| async move {
            controller.load(&month).await
        })
    };

    let on_prev = {
        let cursor = cursor.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*cursor).clone();
            next.previous();
            cursor.set(next);
        })
    };

    let on_next = {
        let cursor = cursor.clone();
        Callback::from(move |_: MouseEvent| {
            let mut next = (*cursor).clone();
            next.next();
            cursor.set(next);
        })
    };

    // A ledger from the previous month stays visible while the new one loads
    let ledger = loaded
        .state
        .data
        .as_ref()
        .filter(|ledger| ledger.month == cursor.month());

    html! {
        <div class="page monthly-summary">
            <header class="page-header">
                <div>
                    <h1>{"Monthly Summary"}</h1>
                    <p>{"Delivery ledger and totals"}</p>
                </div>
                <div class="month-selector">
                    <button class="btn btn-secondary" onclick={on_prev}>{"◀"}</button>
                    <span class="month-label">{format_month(cursor.month())}</span>
                    <button class="btn btn-secondary" onclick={on_next}>{"▶"}</button>
                </div>
            </header>

            {match (ledger, &loaded.state.error) {
                (_, Some(error)) => html! { <div class="page-error">{error.clone()}</div> },
                (Some(ledger), None) => render_ledger(ledger),
                (None, None) => html! { <div class="skeleton">{"Loading..."}</div> },
            }}
        </div>
    }
}

fn render_ledger(ledger: &MonthlyLedger) -> Html {
    let cards = [
        ("Total Deliveries", format!("{} L", format_total(ledger.total_liters()))),
        ("Households", ledger.households.len().to_string()),
        ("Holidays", ledger.holiday_count().to_string()),
        ("Avg / Household", format!("{} L", format_total(ledger.average_per_household()))),
    ];

    html! {
        <>
            <div class="stat-cards">
                { for cards.iter().map(|(label, value)| html! {
                    <div class="stat-card" key={*label}>
                        <span class="stat-value">{value.clone()}</span>
                        <span class="stat-label">{*label}</span>
                    </div>
                }) }
            </div>

            <section class="card ledger">
                <h2>{"Delivery Ledger"}</h2>
                {if ledger.grid.is_empty() {
                    html! { <p class="empty-state">{"No households to show for this month."}</p> }
                } else {
                    render_grid(ledger)
                }}
            </section>

            {if ledger.milk_types.is_empty() {
                html! {}
            } else {
                html! {
                    <section class="card milk-type-totals">
                        <h2>{"Milk Type Totals"}</h2>
                        <ul>
                            { for ledger.milk_types.iter().map(|milk_type| html! {
                                <li key={milk_type.id}>
                                    <span>{milk_type.name.clone()}</span>
                                    <strong>{format!("{} L", format_total(ledger.milk_type_total(milk_type.id)))}</strong>
                                </li>
                            }) }
                        </ul>
                    </section>
                }
            }}
        </>
    }
}

fn render_grid(ledger: &MonthlyLedger) -> Html {
    let day_header = |day: &String| {
        let label = day_number(day).map(|n| n.to_string()).unwrap_or_default();
        let class = if ledger.is_holiday(day) { "day holiday" } else { "day" };
        html! { <th key={day.clone()} {class}>{label}</th> }
    };

    html! {
        <div class="ledger-scroll">
            <table class="ledger-table">
                <thead>
                    <tr>
                        <th class="household-col">{"Household"}</th>
                        { for ledger.days().iter().map(day_header) }
                        <th class="total-col">{"Total (L)"}</th>
                    </tr>
                </thead>
                <tbody>
                    { for ledger.households.iter().map(|household| html! {
                        <tr key={household.id}>
                            <td class="household-col">{household.name.clone()}</td>
                            { for ledger.days().iter().map(|day| {
                                let cell = ledger.cell(household.id, day);
                                let class = if cell.is_holiday() { "cell holiday" } else { "cell" };
                                html! { <td key={day.clone()} {class}>{cell.label()}</td> }
                            }) }
                            <td class="total-col">{format_total(ledger.household_total(household.id))}</td>
                        </tr>
                    }) }
                </tbody>
                <tfoot>
                    <tr>
                        <td class="household-col">{"Daily Total"}</td>
                        { for ledger.daily_totals.iter().map(|total| {
                            let class = if total.holiday { "cell holiday" } else { "cell" };
                            html! { <td key={total.day.clone()} {class}>{total.label()}</td> }
                        }) }
                        <td class="total-col">{format_total(ledger.total_liters())}</td>
                    </tr>
                </tfoot>
            </table>
        </div>
    }
}
