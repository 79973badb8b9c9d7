use std::rc::Rc;

use milk_ledger_client::domain::SessionController;
use milk_ledger_client::{ClientConfig, QueryClient};
use tracing::{error, info};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::notice_tray::NoticeTray;
use components::pages::{DailyEntryPage, DashboardPage, HouseholdsPage, MilkTypesPage, MonthlySummaryPage};
use components::sidebar::{Page, Sidebar};
use hooks::use_app::{AppContext, Notice};
use hooks::use_notices::use_notices;
use services::api::ApiClient;

#[function_component(App)]
fn app() -> Html {
    let config = use_memo((), |_| {
        ClientConfig::from_values(option_env!("MILK_LEDGER_API_URL"), option_env!("MILK_LEDGER_SAVED_FLAG_MS"))
    });
    let client = {
        let config = config.clone();
        use_memo((), move |_| {
            let api = ApiClient::with_base_url(config.api_base_url.clone());
            QueryClient::new(Rc::new(api))
        })
    };
    let session_ready = use_state(|| false);
    let page = use_state(|| Page::Dashboard);
    let user_name = use_state(|| Option::<String>::None);
    let notices = use_notices();

    // Ping the gateway once; pages stay in their loading state until it answers
    {
        let client = (*client).clone();
        let session_ready = session_ready.clone();
        let user_name = user_name.clone();
        let notify = notices.push.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match client.connect().await {
                    Ok(()) => {
                        info!("🔌 Connected to the ledger gateway");
                        session_ready.set(true);
                        let session = SessionController::new(client);
                        match session.profile().await {
                            Ok(Some(Some(profile))) => user_name.set(Some(profile.name)),
                            Ok(_) => {}
                            Err(e) => error!("Failed to load caller profile: {}", e),
                        }
                    }
                    Err(e) => {
                        error!("Gateway connection failed: {}", e);
                        notify.emit(Notice::error("Could not reach the ledger server"));
                    }
                }
            });
            || ()
        });
    }

    let app = AppContext {
        client: (*client).clone(),
        config: (*config).clone(),
        session_ready: *session_ready,
        notify: notices.push.clone(),
    };

    let on_navigate = {
        let page = page.clone();
        Callback::from(move |next: Page| page.set(next))
    };

    let content = match *page {
        Page::Dashboard => html! { <DashboardPage app={app.clone()} on_navigate={on_navigate.clone()} /> },
        Page::DailyEntry => html! { <DailyEntryPage app={app.clone()} /> },
        Page::Households => html! { <HouseholdsPage app={app.clone()} /> },
        Page::MilkTypes => html! { <MilkTypesPage app={app.clone()} /> },
        Page::MonthlySummary => html! { <MonthlySummaryPage app={app.clone()} /> },
    };

    html! {
        <div class="app-layout">
            <Sidebar
                current={*page}
                on_navigate={on_navigate}
                user_name={(*user_name).clone()}
                connected={*session_ready}
            />
            <main class="app-main">
                {content}
            </main>
            <NoticeTray notices={notices.notices.clone()} on_dismiss={notices.dismiss.clone()} />
        </div>
    }
}

fn main() {
    services::logging::init(services::logging::parse_level(option_env!("MILK_LEDGER_LOG")));
    yew::Renderer::<App>::new().render();
}
