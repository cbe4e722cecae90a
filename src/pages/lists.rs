use super::{render_collection, DeleteModal, FolderRouteParams, NameModal};
use crate::cache::QueryDescriptor;
use crate::components::{Header, ItemActions};
use crate::models::List;
use crate::mutations::Mutation;
use crate::state::{use_query, AppContext};
use crate::views::{
    lists_title, ActiveModal, AppRoute, Entity, FilterOption, ListNavState, ViewController,
};
use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_params};

#[component]
pub fn ListsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let params = use_params::<FolderRouteParams>();
    let navigate = StoredValue::new(use_navigate());

    // Params are reactive; read tracked in effects/views, untracked for initial state.
    let folder_id = move || params.get().ok().and_then(|p| p.folder_id).unwrap_or_default();
    let folder_id_untracked = move || {
        params
            .get_untracked()
            .ok()
            .and_then(|p| p.folder_id)
            .unwrap_or_default()
    };

    let view_state = RwSignal::new(ViewController::<List>::lists(folder_id_untracked()));
    let name_value = RwSignal::new(String::new());

    // Same component instance is reused when only the folder id changes.
    Effect::new(move |_| {
        let id = folder_id();
        if view_state.with_untracked(|v| v.scope != Some(id)) {
            view_state.set(ViewController::lists(id));
        }
    });

    let folder = use_query(move || QueryDescriptor::folder(folder_id()));
    let search = use_query(move || view_state.with(|v| v.search_descriptor()));
    let sort = use_query(move || {
        view_state.with(|v| v.sort_descriptor().unwrap_or_else(|| v.search_descriptor()))
    });

    let title = Signal::derive(move || folder.with(|s| lists_title(s.folder())));

    let close_modal = Callback::new(move |_: ()| {
        view_state.update(|v| v.close_modal());
        name_value.set(String::new());
    });

    let submit = move |build: fn(&ViewController<List>, &str) -> Option<Mutation>| {
        let Some(m) = view_state.with_untracked(|v| build(v, &name_value.get_untracked())) else {
            return;
        };
        app_state.0.mutate(m, close_modal);
    };
    let on_create = Callback::new(move |_: ()| submit(|v, name| v.create(name)));
    let on_rename = Callback::new(move |_: ()| submit(|v, name| v.rename(name)));
    let on_delete = Callback::new(move |_: ()| submit(|v, _| v.delete()));

    let selected_name = Signal::derive(move || {
        view_state.with(|v| v.selected.as_ref().map(|l| l.name().to_string()).unwrap_or_default())
    });

    let row = move |list: List| {
        let nav_state = ListNavState {
            list_id: list.id,
            list_name: list.name.clone(),
        };
        let label = list.name.clone();
        let for_edit = list.clone();
        let for_delete = list.clone();
        view! {
            <div class="flex items-center justify-between rounded-lg border bg-card p-4 shadow-sm">
                <button
                    type="button"
                    class="min-w-0 truncate text-left hover:underline"
                    on:click=move |_| {
                        let path = AppRoute::Problems { list_id: nav_state.list_id }.path();
                        app_state.0.list_nav.set(Some(nav_state.clone()));
                        navigate.with_value(|nav| nav(&path, Default::default()));
                    }
                >
                    {label}
                </button>
                <ItemActions
                    item_name=list.name
                    on_edit=Callback::new(move |_: ()| {
                        name_value.set(for_edit.name.clone());
                        view_state.update(|v| v.open_edit(for_edit.clone()));
                    })
                    on_delete=Callback::new(move |_: ()| {
                        view_state.update(|v| v.open_delete(for_delete.clone()));
                    })
                />
            </div>
        }
        .into_any()
    };

    view! {
        <div class="flex flex-col">
            <Header
                title=title
                items="lists"
                on_new=Callback::new(move |_: ()| {
                    name_value.set(String::new());
                    view_state.update(|v| v.open_create());
                })
                search_text=Signal::derive(move || view_state.with(|v| v.search_text.clone()))
                on_search=Callback::new(move |text: String| view_state.update(|v| v.set_search_text(text)))
                on_filter=Callback::new(move |option: FilterOption| view_state.update(|v| v.apply_filter(option)))
            />

            <div class="space-y-4 p-4">
                {move || {
                    let search = search.get();
                    let sort = sort.get();
                    view_state.with(|v| render_collection(v.display(&search, &sort), "lists", row))
                }}
            </div>

            <Show when=move || view_state.with(|v| v.is_open(ActiveModal::Create)) fallback=|| ().into_view()>
                <NameModal
                    title="Create a new list"
                    value=name_value
                    submit_label="Create"
                    on_submit=on_create
                    on_close=close_modal
                />
            </Show>

            <Show when=move || view_state.with(|v| v.is_open(ActiveModal::Edit)) fallback=|| ().into_view()>
                <NameModal
                    title="Edit List"
                    value=name_value
                    submit_label="Save"
                    on_submit=on_rename
                    on_close=close_modal
                />
            </Show>

            <Show when=move || view_state.with(|v| v.is_open(ActiveModal::Delete)) fallback=|| ().into_view()>
                <DeleteModal
                    noun="List"
                    item_name=selected_name
                    on_confirm=on_delete
                    on_close=close_modal
                />
            </Show>
        </div>
    }
}
