use web_sys::MouseEvent;
use yew::prelude::*;

/// Top-level pages of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    DailyEntry,
    Households,
    MilkTypes,
    MonthlySummary,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Dashboard,
        Page::DailyEntry,
        Page::Households,
        Page::MilkTypes,
        Page::MonthlySummary,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::DailyEntry => "Daily Entry",
            Page::Households => "Households",
            Page::MilkTypes => "Milk Types",
            Page::MonthlySummary => "Monthly Summary",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Page::Dashboard => "🏡",
            Page::DailyEntry => "📝",
            Page::Households => "🏠",
            Page::MilkTypes => "🥛",
            Page::MonthlySummary => "📅",
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct SidebarProps {
    pub current: Page,
    pub on_navigate: Callback<Page>,
    /// Caller's display name, once known
    #[prop_or_default]
    pub user_name: Option<String>,
    #[prop_or_default]
    pub connected: bool,
}

#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
    html! {
        <nav class="sidebar">
            <div class="sidebar-brand">
                <span class="sidebar-logo">{"🥛"}</span>
                <span class="sidebar-title">{"Milk Ledger"}</span>
            </div>
            <ul class="sidebar-links">
                { for Page::ALL.iter().map(|page| {
                    let page = *page;
                    let onclick = {
                        let on_navigate = props.on_navigate.clone();
                        Callback::from(move |_: MouseEvent| on_navigate.emit(page))
                    };
                    let class = if page == props.current { "sidebar-link active" } else { "sidebar-link" };
                    html! {
                        <li key={page.title()}>
                            <button class={class} {onclick}>
                                <span class="sidebar-icon">{page.icon()}</span>
                                {page.title()}
                            </button>
                        </li>
                    }
                }) }
            </ul>
            <div class="sidebar-footer">
                {match &props.user_name {
                    Some(name) => html! { <span class="sidebar-user">{format!("👤 {}", name)}</span> },
                    None => html! {},
                }}
                <span class={if props.connected { "connection connected" } else { "connection" }}>
                    {if props.connected { "Connected" } else { "Connecting..." }}
                </span>
            </div>
        </nav>
    }
}
