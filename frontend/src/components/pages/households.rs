use milk_ledger_client::domain::{HouseholdForm, HouseholdsController};
use shared::{Household, HouseholdId};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, MouseEvent};
use yew::prelude::*;

use super::PageProps;
use crate::hooks::use_app::Notice;
use crate::hooks::use_loader::use_loader;

/// Which dialog is open
#[derive(Clone, PartialEq)]
enum Dialog {
    Closed,
    Add,
    Edit(HouseholdId),
    ConfirmDelete(HouseholdId),
}

#[function_component(HouseholdsPage)]
pub fn households_page(props: &PageProps) -> Html {
    let app = &props.app;
    let controller = HouseholdsController::new(app.client.clone());
    let dialog = use_state(|| Dialog::Closed);
    let form = use_state(HouseholdForm::default);
    let busy = use_state(|| false);

    let loaded = {
        let controller = controller.clone();
        use_loader(app.session_ready, (), move |_| async move { controller.list().await })
    };

    let open_add = {
        let dialog = dialog.clone();
        let form = form.clone();
        Callback::from(move |_: MouseEvent| {
            form.set(HouseholdForm::default());
            dialog.set(Dialog::Add);
        })
    };

    let open_edit = {
        let dialog = dialog.clone();
        let form = form.clone();
        Callback::from(move |household: Household| {
            form.set(HouseholdForm::from_household(&household));
            dialog.set(Dialog::Edit(household.id));
        })
    };

    let confirm_delete = {
        let dialog = dialog.clone();
        Callback::from(move |id: HouseholdId| dialog.set(Dialog::ConfirmDelete(id)))
    };

    let close = {
        let dialog = dialog.clone();
        Callback::from(move |_: MouseEvent| dialog.set(Dialog::Closed))
    };

    let field = |update: fn(&mut HouseholdForm, String)| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*form).clone();
            update(&mut next, input.value());
            form.set(next);
        })
    };
    let on_name = field(|f, v| f.name = v);
    let on_address = field(|f, v| f.address = v);
    let on_phone = field(|f, v| f.contact_phone = v);

    let on_submit = {
        let controller = controller.clone();
        let dialog = dialog.clone();
        let form = form.clone();
        let busy = busy.clone();
        let notify = app.notify.clone();
        let reload = loaded.reload.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let editing = match *dialog {
                Dialog::Edit(id) => Some(id),
                _ => None,
            };
            let controller = controller.clone();
            let dialog = dialog.clone();
            let form = (*form).clone();
            let busy = busy.clone();
            let notify = notify.clone();
            let reload = reload.clone();
            busy.set(true);
            spawn_local(async move {
                let outcome = controller.save(editing, &form).await;
                busy.set(false);
                notify.emit(Notice::from_outcome(&outcome));
                if outcome.is_ok() {
                    dialog.set(Dialog::Closed);
                    reload.emit(());
                }
            });
        })
    };

    let on_delete = {
        let controller = controller.clone();
        let dialog = dialog.clone();
        let busy = busy.clone();
        let notify = app.notify.clone();
        let reload = loaded.reload.clone();
        Callback::from(move |_: MouseEvent| {
            let Dialog::ConfirmDelete(id) = *dialog else {
                return;
            };
            let controller = controller.clone();
            let dialog = dialog.clone();
            let busy = busy.clone();
            let notify = notify.clone();
            let reload = reload.clone();
            busy.set(true);
            spawn_local(async move {
                let outcome = controller.delete(id).await;
                busy.set(false);
                notify.emit(Notice::from_outcome(&outcome));
                if outcome.is_ok() {
                    dialog.set(Dialog::Closed);
                    reload.emit(());
                }
            });
        })
    };

    let list = match (&loaded.state.data, &loaded.state.error) {
        (_, Some(error)) => html! { <div class="page-error">{error.clone()}</div> },
        (None, None) => html! { <div class="skeleton">{"Loading..."}</div> },
        (Some(households), None) if households.is_empty() => html! {
            <div class="empty-state">
                <h3>{"No Households Yet"}</h3>
                <p>{"Add the first household on your delivery round."}</p>
            </div>
        },
        (Some(households), None) => html! {
            <div class="household-grid">
                { for households.iter().map(|household| {
                    let on_edit = {
                        let open_edit = open_edit.clone();
                        let household = household.clone();
                        Callback::from(move |_: MouseEvent| open_edit.emit(household.clone()))
                    };
                    let on_remove = {
                        let confirm_delete = confirm_delete.clone();
                        let id = household.id;
                        Callback::from(move |_: MouseEvent| confirm_delete.emit(id))
                    };
                    html! {
                        <div class="card household-card" key={household.id}>
                            <h3>{household.name.clone()}</h3>
                            {if household.address.is_empty() { html! {} } else {
                                html! { <p class="household-address">{format!("📍 {}", household.address)}</p> }
                            }}
                            {if household.contact_phone.is_empty() { html! {} } else {
                                html! { <p class="household-phone">{format!("📞 {}", household.contact_phone)}</p> }
                            }}
                            <div class="card-actions">
                                <button class="btn btn-secondary" onclick={on_edit}>{"✏️ Edit"}</button>
                                <button class="btn btn-danger" onclick={on_remove}>{"🗑️ Delete"}</button>
                            </div>
                        </div>
                    }
                }) }
            </div>
        },
    };

    let form_dialog = match *dialog {
        Dialog::Add | Dialog::Edit(_) => {
            let title = if *dialog == Dialog::Add { "Add Household" } else { "Edit Household" };
            html! {
                <div class="modal-backdrop">
                    <form class="modal" onsubmit={on_submit}>
                        <h3>{title}</h3>
                        <div class="form-group">
                            <label for="household-name">{"Name *"}</label>
                            <input id="household-name" type="text" value={form.name.clone()} oninput={on_name} disabled={*busy} />
                        </div>
                        <div class="form-group">
                            <label for="household-address">{"Address"}</label>
                            <input id="household-address" type="text" value={form.address.clone()} oninput={on_address} disabled={*busy} />
                        </div>
                        <div class="form-group">
                            <label for="household-phone">{"Contact Phone"}</label>
                            <input id="household-phone" type="tel" value={form.contact_phone.clone()} oninput={on_phone} disabled={*busy} />
                        </div>
                        <div class="modal-buttons">
                            <button type="button" class="btn btn-secondary" onclick={close.clone()}>{"Cancel"}</button>
                            <button type="submit" class="btn btn-primary" disabled={*busy}>
                                {if *busy { "Saving..." } else { "Save" }}
                            </button>
                        </div>
                    </form>
                </div>
            }
        }
        Dialog::ConfirmDelete(_) => html! {
            <div class="modal-backdrop">
                <div class="modal">
                    <h3>{"Delete Household?"}</h3>
                    <p>{"This will permanently delete the household and all its delivery records."}</p>
                    <div class="modal-buttons">
                        <button type="button" class="btn btn-secondary" onclick={close.clone()}>{"Cancel"}</button>
                        <button type="button" class="btn btn-danger" onclick={on_delete} disabled={*busy}>
                            {if *busy { "Deleting..." } else { "Delete" }}
                        </button>
                    </div>
                </div>
            </div>
        },
        Dialog::Closed => html! {},
    };

    html! {
        <div class="page households">
            <header class="page-header">
                <div>
                    <h1>{"Households"}</h1>
                    <p>{"Manage delivery households"}</p>
                </div>
                <button class="btn btn-primary" onclick={open_add}>{"➕ Add Household"}</button>
            </header>
            {list}
            {form_dialog}
        </div>
    }
}
