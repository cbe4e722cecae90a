use icons::X;
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use leptos_ui::clx;
use tw_merge::*;
use wasm_bindgen::JsCast;

mod components {
    use super::*;
    clx! {DialogBody, div, "flex flex-col gap-4"}
    clx! {DialogHeader, div, "flex flex-col gap-2 text-center sm:text-left"}
    clx! {DialogTitle, h3, "text-lg leading-none font-semibold"}
    clx! {DialogDescription, p, "text-muted-foreground text-sm"}
    clx! {DialogFooter, footer, "flex flex-col-reverse gap-2 sm:flex-row sm:justify-end"}
}

pub use components::*;

/// Whether a mousedown landed outside `panel`.
fn is_outside(panel: &web_sys::Element, ev: &web_sys::MouseEvent) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
        .is_some_and(|node| !panel.contains(Some(&node)))
}

/// Overlay panel. Render it only while open (inside `<Show>`): its Escape and
/// outside-click listeners are registered on mount and removed on unmount.
#[component]
pub fn Modal(
    #[prop(into)] title: Signal<String>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let panel_ref: NodeRef<html::Div> = NodeRef::new();

    let keydown = window_event_listener(ev::keydown, move |e: web_sys::KeyboardEvent| {
        if e.key() == "Escape" {
            e.prevent_default();
            on_close.run(());
        }
    });
    let mousedown = window_event_listener(ev::mousedown, move |e: web_sys::MouseEvent| {
        let Some(panel) = panel_ref.get_untracked() else {
            return;
        };
        if is_outside(&panel, &e) {
            on_close.run(());
        }
    });
    on_cleanup(move || {
        keydown.remove();
        mousedown.remove();
    });

    let merged_class = tw_merge!(
        "relative bg-background border rounded-2xl shadow-lg p-6 w-full max-w-sm",
        class
    );

    view! {
        <div
            data-name="ModalBackdrop"
            class="fixed inset-0 z-50 flex items-center justify-center bg-black/50 px-4"
        >
            <div data-name="ModalContent" class=merged_class node_ref=panel_ref role="dialog">
                <button
                    type="button"
                    class="absolute top-4 right-4 p-1 rounded-sm focus:ring-2 focus:ring-offset-2 focus:outline-none [&_svg:not([class*='size-'])]:size-4 focus:ring-ring"
                    aria-label="Close dialog"
                    on:click=move |_| on_close.run(())
                >
                    <X />
                </button>

                <DialogBody>
                    <DialogHeader>
                        <DialogTitle>{move || title.get()}</DialogTitle>
                    </DialogHeader>
                    {children()}
                </DialogBody>
            </div>
        </div>
    }
}
