use web_sys::MouseEvent;
use yew::prelude::*;

use crate::hooks::use_app::{Notice, NoticeKind};

#[derive(Properties, PartialEq)]
pub struct NoticeTrayProps {
    pub notices: Vec<(u32, Notice)>,
    pub on_dismiss: Callback<u32>,
}

#[function_component(NoticeTray)]
pub fn notice_tray(props: &NoticeTrayProps) -> Html {
    html! {
        <div class="notice-tray">
            { for props.notices.iter().map(|(id, notice)| {
                let id = *id;
                let onclick = {
                    let on_dismiss = props.on_dismiss.clone();
                    Callback::from(move |_: MouseEvent| on_dismiss.emit(id))
                };
                let class = match notice.kind {
                    NoticeKind::Success => "notice notice-success",
                    NoticeKind::Error => "notice notice-error",
                };
                html! {
                    <div key={id} class={class} {onclick}>
                        {notice.text.clone()}
                    </div>
                }
            }) }
        </div>
    }
}
