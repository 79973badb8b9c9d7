use std::rc::Rc;

use gloo::timers::callback::Timeout;
use yew::prelude::*;

use super::use_app::Notice;

const NOTICE_LIFETIME_MS: u32 = 4000;

#[derive(Default, PartialEq)]
pub struct NoticeList {
    pub items: Vec<(u32, Notice)>,
}

pub enum NoticeAction {
    Push(u32, Notice),
    Dismiss(u32),
}

impl Reducible for NoticeList {
    type Action = NoticeAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut items = self.items.clone();
        match action {
            NoticeAction::Push(id, notice) => items.push((id, notice)),
            NoticeAction::Dismiss(id) => items.retain(|(item_id, _)| *item_id != id),
        }
        Rc::new(Self { items })
    }
}

pub struct UseNoticesResult {
    pub notices: Vec<(u32, Notice)>,
    pub push: Callback<Notice>,
    pub dismiss: Callback<u32>,
}

/// Toast notices that dismiss themselves after a few seconds
#[hook]
pub fn use_notices() -> UseNoticesResult {
    let list = use_reducer(NoticeList::default);
    let next_id = use_mut_ref(|| 0u32);

    let push = {
        let dispatcher = list.dispatcher();
        Callback::from(move |notice: Notice| {
            let id = {
                let mut next_id = next_id.borrow_mut();
                *next_id += 1;
                *next_id
            };
            dispatcher.dispatch(NoticeAction::Push(id, notice));

            let dispatcher = dispatcher.clone();
            Timeout::new(NOTICE_LIFETIME_MS, move || {
                dispatcher.dispatch(NoticeAction::Dismiss(id));
            })
            .forget();
        })
    };

    let dismiss = {
        let dispatcher = list.dispatcher();
        Callback::from(move |id: u32| dispatcher.dispatch(NoticeAction::Dismiss(id)))
    };

    UseNoticesResult {
        notices: list.items.clone(),
        push,
        dismiss,
    }
}
