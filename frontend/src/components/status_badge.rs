use milk_ledger_client::domain::HouseholdDayStatus;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatusBadgeProps {
    pub status: HouseholdDayStatus,
}

#[function_component(StatusBadge)]
pub fn status_badge(props: &StatusBadgeProps) -> Html {
    let (label, icon) = match props.status {
        HouseholdDayStatus::Delivered => ("Delivered", "✅"),
        HouseholdDayStatus::Skipped => ("Skipped", "⏭️"),
        HouseholdDayStatus::Holiday => ("Holiday", "🎉"),
        HouseholdDayStatus::Pending => ("Pending", "⏳"),
    };

    html! {
        <span class={classes!("status-badge", props.status.as_str())}>
            {format!("{} {}", icon, label)}
        </span>
    }
}
