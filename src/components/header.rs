use crate::components::ui::{Button, ButtonSize, ButtonVariant, Input, Modal};
use crate::views::FilterOption;
use icons::Plus;
use leptos::prelude::*;
use strum::IntoEnumIterator;

/// Page title row with "New", plus the filter menu and search box when the
/// page supports them.
#[component]
pub(crate) fn Header(
    #[prop(into)] title: Signal<String>,
    /// Plural noun for the search placeholder ("folders").
    #[prop(into)]
    items: String,
    #[prop(into)] on_new: Callback<()>,
    #[prop(optional, into)] search_text: Option<Signal<String>>,
    #[prop(optional, into)] on_search: Option<Callback<String>>,
    #[prop(optional, into)] on_filter: Option<Callback<FilterOption>>,
) -> impl IntoView {
    let filter_open = RwSignal::new(false);
    let close_filter = Callback::new(move |_: ()| filter_open.set(false));
    let placeholder = format!("Search {items}");

    let search_row = match (search_text, on_search) {
        (Some(text), Some(on_search)) => Some(view! {
            <div class="flex items-center justify-between gap-4">
                <Show when=move || on_filter.is_some() fallback=|| ().into_view()>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        on:click=move |_| filter_open.set(true)
                    >
                        "Filter"
                    </Button>
                </Show>
                <Input
                    class="w-2/3"
                    placeholder=placeholder.clone()
                    value=text
                    on_input=on_search
                />
            </div>
        }),
        _ => None,
    };

    view! {
        <div class="sticky top-0 z-10 space-y-2 border-b bg-background px-4 py-2 shadow-sm">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">{move || title.get()}</h1>
                <Button on:click=move |_| on_new.run(())>
                    "New" <Plus />
                </Button>
            </div>

            {search_row}

            <Show when=move || filter_open.get() fallback=|| ().into_view()>
                <Modal title="Filter by" on_close=close_filter class="max-w-64">
                    <div class="flex flex-col">
                        {FilterOption::iter()
                            .map(|option| {
                                view! {
                                    <button
                                        type="button"
                                        class="block w-full rounded p-2 text-left hover:bg-accent"
                                        on:click=move |_| {
                                            if let Some(cb) = on_filter {
                                                cb.run(option);
                                            }
                                            filter_open.set(false);
                                        }
                                    >
                                        {option.label()}
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
                    <Button variant=ButtonVariant::Destructive class="w-full" on:click=move |_| close_filter.run(())>
                        "Close"
                    </Button>
                </Modal>
            </Show>
        </div>
    }
}
