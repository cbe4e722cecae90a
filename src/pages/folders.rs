use super::{render_collection, DeleteModal, NameModal};
use crate::components::{Header, ItemActions};
use crate::models::Folder;
use crate::state::{use_query, AppContext};
use crate::views::{ActiveModal, AppRoute, FilterOption, ViewController};
use icons::Folder as FolderIcon;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

#[component]
pub fn FoldersPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let view_state = RwSignal::new(ViewController::<Folder>::folders());
    let name_value = RwSignal::new(String::new());

    let search = use_query(move || view_state.with(|v| v.search_descriptor()));
    let sort = use_query(move || {
        view_state.with(|v| v.sort_descriptor().unwrap_or_else(|| v.search_descriptor()))
    });

    let close_modal = Callback::new(move |_: ()| {
        view_state.update(|v| v.close_modal());
        name_value.set(String::new());
    });

    let on_create = Callback::new(move |_: ()| {
        let Some(m) = view_state.with_untracked(|v| v.create(&name_value.get_untracked())) else {
            return;
        };
        app_state.0.mutate(m, close_modal);
    });

    let on_rename = Callback::new(move |_: ()| {
        let Some(m) = view_state.with_untracked(|v| v.rename(&name_value.get_untracked())) else {
            return;
        };
        app_state.0.mutate(m, close_modal);
    });

    let on_delete = Callback::new(move |_: ()| {
        let Some(m) = view_state.with_untracked(|v| v.delete()) else {
            return;
        };
        app_state.0.mutate(m, close_modal);
    });

    let selected_name = Signal::derive(move || {
        view_state.with(|v| v.selected.as_ref().map(|f| f.name.clone()).unwrap_or_default())
    });

    let row = move |folder: Folder| {
        let id = folder.id;
        let label = folder.name.clone();
        let for_edit = folder.clone();
        let for_delete = folder.clone();
        view! {
            <div class="flex items-center justify-between rounded-lg border bg-card p-4 shadow-sm">
                <button
                    type="button"
                    class="flex min-w-0 items-center gap-3 text-left hover:underline"
                    on:click=move |_| {
                        navigate.with_value(|nav| {
                            nav(&AppRoute::Lists { folder_id: id }.path(), Default::default())
                        });
                    }
                >
                    <FolderIcon class="size-5 text-blue-500" />
                    <span class="truncate">{label}</span>
                </button>
                <ItemActions
                    item_name=folder.name
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
                title="Folders"
                items="folders"
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
                    view_state.with(|v| render_collection(v.display(&search, &sort), "folders", row))
                }}
            </div>

            <Show when=move || view_state.with(|v| v.is_open(ActiveModal::Create)) fallback=|| ().into_view()>
                <NameModal
                    title="Create a new folder"
                    value=name_value
                    submit_label="Create"
                    on_submit=on_create
                    on_close=close_modal
                />
            </Show>

            <Show when=move || view_state.with(|v| v.is_open(ActiveModal::Edit)) fallback=|| ().into_view()>
                <NameModal
                    title="Edit Folder"
                    value=name_value
                    submit_label="Save"
                    on_submit=on_rename
                    on_close=close_modal
                />
            </Show>

            <Show when=move || view_state.with(|v| v.is_open(ActiveModal::Delete)) fallback=|| ().into_view()>
                <DeleteModal
                    noun="Folder"
                    item_name=selected_name
                    on_confirm=on_delete
                    on_close=close_modal
                />
            </Show>
        </div>
    }
}
