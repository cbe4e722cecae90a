mod folders;
mod home;
mod lists;
mod problems;

pub use folders::FoldersPage;
pub use home::HomePage;
pub use lists::ListsPage;
pub use problems::ProblemsPage;

use crate::cache::{QueryState, QueryStatus};
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonVariant, DialogDescription, DialogFooter, Input, Modal,
    Spinner,
};
use crate::models::Id;
use crate::util::fetched_label;
use crate::views::Entity;
use leptos::prelude::*;
use leptos_router::params::Params;

#[derive(Params, PartialEq, Clone, Debug)]
pub struct FolderRouteParams {
    pub folder_id: Option<Id>,
}

#[derive(Params, PartialEq, Clone, Debug)]
pub struct ListRouteParams {
    pub list_id: Option<Id>,
}

/// Loading, error, empty or the rows themselves, for one cache read.
pub(crate) fn render_collection<T: Entity>(
    state: &QueryState,
    items: &'static str,
    row: impl Fn(T) -> AnyView,
) -> AnyView {
    if state.is_pending() {
        return view! { <Spinner label=format!("Loading {items}...") /> }.into_any();
    }

    if state.status == QueryStatus::Error {
        let msg = state.error.clone().unwrap_or_default();
        return view! {
            <Alert class="border-destructive/30">
                <AlertDescription class="text-destructive">
                    {format!("Error loading {items}: {msg}")}
                </AlertDescription>
            </Alert>
        }
        .into_any();
    }

    let rows = T::items(state);
    if rows.is_empty() {
        return view! { <p class="text-sm text-muted-foreground">{format!("No {items} found")}</p> }
            .into_any();
    }

    let updated = fetched_label(state.last_fetched_at);
    view! {
        <div class="space-y-2">
            {rows.into_iter().map(row).collect_view()}
        </div>
        <p class="pt-2 text-right text-xs text-muted-foreground">{updated}</p>
    }
    .into_any()
}

/// Single-field modal used to create or rename a folder or list.
#[component]
pub(crate) fn NameModal(
    #[prop(into)] title: Signal<String>,
    value: RwSignal<String>,
    #[prop(into)] submit_label: String,
    #[prop(into)] on_submit: Callback<()>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    view! {
        <Modal title=title on_close=on_close>
            <Input
                placeholder="Enter title"
                autofocus=true
                value=value
                on_input=Callback::new(move |v: String| value.set(v))
                on_enter=on_submit
            />
            <DialogFooter>
                <Button on:click=move |_| on_submit.run(())>{submit_label}</Button>
            </DialogFooter>
        </Modal>
    }
}

#[component]
pub(crate) fn DeleteModal(
    /// "Folder", "List" or "Problem".
    noun: &'static str,
    #[prop(into)] item_name: Signal<String>,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    view! {
        <Modal title=format!("Delete {noun}") on_close=on_close>
            <DialogDescription>
                {move || format!("Are you sure you want to delete \"{}\"?", item_name.get())}
            </DialogDescription>
            <DialogFooter>
                <Button variant=ButtonVariant::Outline on:click=move |_| on_close.run(())>
                    "Cancel"
                </Button>
                <Button variant=ButtonVariant::Destructive on:click=move |_| on_confirm.run(())>
                    "Delete"
                </Button>
            </DialogFooter>
        </Modal>
    }
}
