use std::future::Future;

use milk_ledger_client::ClientError;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Latest outcome of a page load
#[derive(Clone, PartialEq)]
pub struct LoadState<T> {
    /// Last loaded value; kept while a reload is in flight
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }
}

pub struct UseLoaderResult<T> {
    pub state: LoadState<T>,
    pub reload: Callback<()>,
}

/// Run `load` whenever the session becomes ready, `deps` change or `reload` fires.
///
/// `Ok(None)` from the loader means "not available yet" and keeps the page in
/// its loading state. Responses from superseded loads are dropped.
#[hook]
pub fn use_loader<T, D, F, Fut>(session_ready: bool, deps: D, load: F) -> UseLoaderResult<T>
where
    T: Clone + 'static,
    D: Clone + PartialEq + 'static,
    F: FnOnce(D) -> Fut + 'static,
    Fut: Future<Output = Result<Option<T>, ClientError>> + 'static,
{
    let state = use_state(LoadState::<T>::default);
    let revision = use_state(|| 0u32);
    let latest = use_mut_ref(|| 0u64);

    {
        let state = state.clone();
        let latest = latest.clone();
        use_effect_with((session_ready, deps, *revision), move |(ready, deps, _)| {
            if *ready {
                let ticket = {
                    let mut latest = latest.borrow_mut();
                    *latest += 1;
                    *latest
                };
                let previous = (*state).data.clone();
                state.set(LoadState {
                    data: previous.clone(),
                    loading: true,
                    error: None,
                });

                let fetch = load(deps.clone());
                spawn_local(async move {
                    let outcome = fetch.await;
                    if *latest.borrow() != ticket {
                        return;
                    }
                    match outcome {
                        Ok(Some(data)) => state.set(LoadState {
                            data: Some(data),
                            loading: false,
                            error: None,
                        }),
                        Ok(None) => state.set(LoadState {
                            data: previous,
                            loading: true,
                            error: None,
                        }),
                        Err(err) => state.set(LoadState {
                            data: previous,
                            loading: false,
                            error: Some(err.to_string()),
                        }),
                    }
                });
            }
            || ()
        });
    }

    let reload = {
        let revision = revision.clone();
        Callback::from(move |_| revision.set(revision.wrapping_add(1)))
    };

    UseLoaderResult {
        state: (*state).clone(),
        reload,
    }
}
