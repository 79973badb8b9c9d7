use milk_ledger_client::domain::MilkTypesController;
use shared::MilkTypeId;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, MouseEvent};
use yew::prelude::*;

use super::PageProps;
use crate::hooks::use_app::Notice;
use crate::hooks::use_loader::use_loader;

#[function_component(MilkTypesPage)]
pub fn milk_types_page(props: &PageProps) -> Html {
    let app = &props.app;
    let controller = MilkTypesController::new(app.client.clone());
    let new_name = use_state(String::new);
    let editing = use_state(|| Option::<(MilkTypeId, String)>::None);
    let deleting = use_state(|| Option::<MilkTypeId>::None);
    let busy = use_state(|| false);

    let loaded = {
        let controller = controller.clone();
        use_loader(app.session_ready, (), move |_| async move { controller.list().await })
    };

    let on_new_name = {
        let new_name = new_name.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            new_name.set(input.value());
        })
    };

    let on_add = {
        let controller = controller.clone();
        let new_name = new_name.clone();
        let busy = busy.clone();
        let notify = app.notify.clone();
        let reload = loaded.reload.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let controller = controller.clone();
            let name = (*new_name).clone();
            let new_name = new_name.clone();
            let busy = busy.clone();
            let notify = notify.clone();
            let reload = reload.clone();
            busy.set(true);
            spawn_local(async move {
                let outcome = controller.create(&name).await;
                busy.set(false);
                notify.emit(Notice::from_outcome(&outcome));
                if outcome.is_ok() {
                    new_name.set(String::new());
                    reload.emit(());
                }
            });
        })
    };

    let on_edit_name = {
        let editing = editing.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some((id, _)) = *editing {
                editing.set(Some((id, input.value())));
            }
        })
    };

    let on_rename = {
        let controller = controller.clone();
        let editing = editing.clone();
        let busy = busy.clone();
        let notify = app.notify.clone();
        let reload = loaded.reload.clone();
        Callback::from(move |_: MouseEvent| {
            let Some((id, name)) = (*editing).clone() else {
                return;
            };
            let controller = controller.clone();
            let editing = editing.clone();
            let busy = busy.clone();
            let notify = notify.clone();
            let reload = reload.clone();
            busy.set(true);
            spawn_local(async move {
                let outcome = controller.rename(id, &name).await;
                busy.set(false);
                notify.emit(Notice::from_outcome(&outcome));
                if outcome.is_ok() {
                    editing.set(None);
                    reload.emit(());
                }
            });
        })
    };

    let on_delete = {
        let controller = controller.clone();
        let deleting = deleting.clone();
        let busy = busy.clone();
        let notify = app.notify.clone();
        let reload = loaded.reload.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(id) = *deleting else {
                return;
            };
            let controller = controller.clone();
            let deleting = deleting.clone();
            let busy = busy.clone();
            let notify = notify.clone();
            let reload = reload.clone();
            busy.set(true);
            spawn_local(async move {
                let outcome = controller.delete(id).await;
                busy.set(false);
                notify.emit(Notice::from_outcome(&outcome));
                if outcome.is_ok() {
                    deleting.set(None);
                    reload.emit(());
                }
            });
        })
    };

    let cancel = {
        let editing = editing.clone();
        let deleting = deleting.clone();
        Callback::from(move |_: MouseEvent| {
            editing.set(None);
            deleting.set(None);
        })
    };

    let list = match (&loaded.state.data, &loaded.state.error) {
        (_, Some(error)) => html! { <div class="page-error">{error.clone()}</div> },
        (None, None) => html! { <div class="skeleton">{"Loading..."}</div> },
        (Some(milk_types), None) if milk_types.is_empty() => html! {
            <p class="empty-state">{"No milk types yet. Add one above."}</p>
        },
        (Some(milk_types), None) => html! {
            <ul class="milk-type-list">
                { for milk_types.iter().map(|milk_type| {
                    let id = milk_type.id;
                    let is_editing = matches!(&*editing, Some((editing_id, _)) if *editing_id == id);
                    let start_edit = {
                        let editing = editing.clone();
                        let name = milk_type.name.clone();
                        Callback::from(move |_: MouseEvent| editing.set(Some((id, name.clone()))))
                    };
                    let start_delete = {
                        let deleting = deleting.clone();
                        Callback::from(move |_: MouseEvent| deleting.set(Some(id)))
                    };
                    html! {
                        <li key={id} class="milk-type-row">
                            {if is_editing {
                                let value = editing.as_ref().map(|(_, name)| name.clone()).unwrap_or_default();
                                html! {
                                    <>
                                        <input type="text" {value} oninput={on_edit_name.clone()} disabled={*busy} />
                                        <button class="btn btn-primary" onclick={on_rename.clone()} disabled={*busy}>{"Save"}</button>
                                        <button class="btn btn-secondary" onclick={cancel.clone()}>{"Cancel"}</button>
                                    </>
                                }
                            } else {
                                html! {
                                    <>
                                        <span class="milk-type-name">{format!("🥛 {}", milk_type.name)}</span>
                                        <button class="btn btn-secondary" onclick={start_edit}>{"✏️"}</button>
                                        <button class="btn btn-danger" onclick={start_delete}>{"🗑️"}</button>
                                    </>
                                }
                            }}
                        </li>
                    }
                }) }
            </ul>
        },
    };

    let confirm = match *deleting {
        Some(_) => html! {
            <div class="modal-backdrop">
                <div class="modal">
                    <h3>{"Delete Milk Type?"}</h3>
                    <p>{"Existing delivery records keep their milk type id but will no longer show its name."}</p>
                    <div class="modal-buttons">
                        <button type="button" class="btn btn-secondary" onclick={cancel.clone()}>{"Cancel"}</button>
                        <button type="button" class="btn btn-danger" onclick={on_delete} disabled={*busy}>{"Delete"}</button>
                    </div>
                </div>
            </div>
        },
        None => html! {},
    };

    html! {
        <div class="page milk-types">
            <header class="page-header">
                <div>
                    <h1>{"Milk Types"}</h1>
                    <p>{"Kinds of milk on the delivery round"}</p>
                </div>
            </header>
            <form class="card add-milk-type" onsubmit={on_add}>
                <input
                    type="text"
                    placeholder="e.g. Full Cream"
                    value={(*new_name).clone()}
                    oninput={on_new_name}
                    disabled={*busy}
                />
                <button type="submit" class="btn btn-primary" disabled={*busy}>{"➕ Add"}</button>
            </form>
            {list}
            {confirm}
        </div>
    }
}
