use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use icons::{Pencil, Trash2};
use leptos::prelude::*;

#[component]
pub fn ItemActions(
    #[prop(into)] item_name: String,
    #[prop(into)] on_edit: Callback<()>,
    #[prop(into)] on_delete: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="flex gap-1">
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                class="text-blue-500 hover:text-blue-700"
                attr:aria-label=format!("Edit {item_name}")
                on:click=move |ev: web_sys::MouseEvent| {
                    ev.stop_propagation();
                    on_edit.run(());
                }
            >
                <Pencil />
            </Button>
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                class="text-red-500 hover:text-red-700"
                attr:aria-label=format!("Delete {item_name}")
                on:click=move |ev: web_sys::MouseEvent| {
                    ev.stop_propagation();
                    on_delete.run(());
                }
            >
                <Trash2 />
            </Button>
        </div>
    }
}
