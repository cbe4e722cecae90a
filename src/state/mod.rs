use crate::api::{ApiClient, Transport};
use crate::cache::{QueryCache, QueryDescriptor, QueryState, Subscription};
use crate::mutations::{Mutation, MutationCoordinator, NoticeLevel, Notification, Notifier};
use crate::views::ListNavState;
use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::set_timeout;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

pub(crate) const TOAST_TIMEOUT: Duration = Duration::from_secs(3);

/// Runs cache fetches on the browser's microtask queue.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        spawn_local(future);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Toast {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

/// Shows notifications as toasts that dismiss themselves.
pub(crate) struct ToastNotifier {
    toasts: RwSignal<Vec<Toast>>,
    next_id: Cell<u64>,
}

impl ToastNotifier {
    pub fn new(toasts: RwSignal<Vec<Toast>>) -> Self {
        Self {
            toasts,
            next_id: Cell::new(0),
        }
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notification: Notification) {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let toasts = self.toasts;
        toasts.update(|t| {
            t.push(Toast {
                id,
                level: notification.level,
                message: notification.message,
            })
        });
        set_timeout(move || dismiss_toast(toasts, id), TOAST_TIMEOUT);
    }
}

pub(crate) fn dismiss_toast(toasts: RwSignal<Vec<Toast>>, id: u64) {
    // The page may be gone by the time the timer fires.
    let _ = toasts.try_update(|t| t.retain(|toast| toast.id != id));
}

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    /// Query cache for the whole session; not `Send`, so kept in local storage.
    pub cache: StoredValue<QueryCache, LocalStorage>,
    pub mutations: StoredValue<MutationCoordinator, LocalStorage>,

    pub toasts: RwSignal<Vec<Toast>>,

    /// Name of the list being opened, handed from the Lists page to the Problems page.
    pub list_nav: RwSignal<Option<ListNavState>>,
}

impl AppState {
    pub fn new() -> Self {
        let transport: Rc<dyn Transport> = Rc::new(ApiClient::from_env());
        let cache = QueryCache::new(transport.clone(), Rc::new(BrowserSpawner));

        let toasts = RwSignal::new(vec![]);
        let notifier = Rc::new(ToastNotifier::new(toasts));
        let mutations = MutationCoordinator::new(cache.clone(), transport, notifier);

        Self {
            cache: StoredValue::new_local(cache),
            mutations: StoredValue::new_local(mutations),
            toasts,
            list_nav: RwSignal::new(None),
        }
    }

    /// Fire a write; `on_applied` runs only when it succeeded.
    ///
    /// The page that fired the write may unmount before the response arrives, so
    /// `on_applied` is skipped once its owner is gone.
    pub fn mutate(&self, mutation: Mutation, on_applied: Callback<()>) {
        let coordinator = self.mutations.get_value();
        spawn_local(async move {
            if coordinator.execute(mutation).await.is_applied() {
                run_if_alive(on_applied);
            }
        });
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);

/// Runs `callback` unless its owner has been disposed. Returns whether it ran.
pub(crate) fn run_if_alive(callback: Callback<()>) -> bool {
    let ran = callback.try_run(()).is_some();
    if !ran {
        tracing::debug!("owner disposed before the write finished; skipping callback");
    }
    ran
}

/// Reactive read of the cache entry for `descriptor`.
///
/// Re-subscribes whenever the descriptor changes. The subscription lives in the
/// calling component's owner, so unmounting detaches the reader.
pub(crate) fn use_query(
    descriptor: impl Fn() -> QueryDescriptor + Send + Sync + 'static,
) -> ReadSignal<QueryState> {
    let app_state = expect_context::<AppContext>();
    let state = RwSignal::new(QueryState::default());
    let key = Memo::new(move |_| descriptor());
    let current: StoredValue<Option<Subscription>, LocalStorage> = StoredValue::new_local(None);

    Effect::new(move |_| {
        let d = key.get();
        let cache = app_state.0.cache.get_value();
        let sub = cache.subscribe(d, move |s: &QueryState| {
            let _ = state.try_set(s.clone());
        });
        state.set(sub.state());
        // Replacing the old guard detaches the previous descriptor.
        current.set_value(Some(sub));
    });

    state.read_only()
}
