use milk_ledger_client::calendar::format_day;
use milk_ledger_client::domain::{DashboardController, DashboardOverview};
use web_sys::MouseEvent;
use yew::prelude::*;

use crate::components::sidebar::Page;
use crate::components::status_badge::StatusBadge;
use crate::hooks::use_app::AppContext;
use crate::hooks::use_loader::use_loader;
use crate::services::date_utils::local_today;

#[derive(Properties, PartialEq)]
pub struct DashboardPageProps {
    pub app: AppContext,
    pub on_navigate: Callback<Page>,
}

#[function_component(DashboardPage)]
pub fn dashboard_page(props: &DashboardPageProps) -> Html {
    let app = &props.app;
    let today = use_memo((), |_| local_today());

    let loaded = {
        let controller = DashboardController::new(app.client.clone());
        use_loader(app.session_ready, (*today).clone(), move |today: String| async move {
            controller.load(&today).await
        })
    };

    let on_record = {
        let on_navigate = props.on_navigate.clone();
        Callback::from(move |_: MouseEvent| on_navigate.emit(Page::DailyEntry))
    };

    html! {
        <div class="page dashboard">
            <header class="page-header">
                <div>
                    <p class="page-date">{format!("📆 {}", format_day(&today))}</p>
                    <h1>{"Today's Overview"}</h1>
                </div>
                <button class="btn btn-primary" onclick={on_record}>
                    {"📝 Record Today's Deliveries"}
                </button>
            </header>

            {match (&loaded.state.data, &loaded.state.error) {
                (_, Some(error)) => html! { <div class="page-error">{error.clone()}</div> },
                (Some(overview), None) => render_overview(overview),
                (None, None) => html! { <div class="skeleton">{"Loading..."}</div> },
            }}
        </div>
    }
}

fn render_overview(overview: &DashboardOverview) -> Html {
    let counts = overview.counts;
    let cards = [
        ("Total Households", counts.total),
        ("Delivered", counts.delivered),
        ("Skipped", counts.skipped),
        ("Pending", counts.pending),
    ];

    html! {
        <>
            {match &overview.holiday {
                Some(holiday) => html! {
                    <div class="holiday-banner">
                        <strong>{"⚠️ Today is a holiday. No deliveries are expected."}</strong>
                        {if holiday.note.is_empty() {
                            html! {}
                        } else {
                            html! { <p class="holiday-note">{holiday.note.clone()}</p> }
                        }}
                    </div>
                },
                None => html! {},
            }}

            <div class="stat-cards">
                { for cards.iter().map(|(label, value)| html! {
                    <div class="stat-card" key={*label}>
                        <span class="stat-value">{value.to_string()}</span>
                        <span class="stat-label">{*label}</span>
                    </div>
                }) }
            </div>

            <section class="card">
                <h2>{"Household Status"}</h2>
                {if overview.rows.is_empty() {
                    html! { <p class="empty-state">{"No households yet. Add one from the Households page."}</p> }
                } else {
                    html! {
                        <ul class="status-list">
                            { for overview.rows.iter().map(|row| html! {
                                <li key={row.id} class="status-row">
                                    <span class="status-name">{row.name.clone()}</span>
                                    <StatusBadge status={row.status} />
                                </li>
                            }) }
                        </ul>
                    }
                }}
            </section>
        </>
    }
}
