use crate::mutations::NoticeLevel;
use crate::state::{dismiss_toast, AppContext};
use icons::X;
use leptos::prelude::*;

#[component]
pub fn Toaster() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let toasts = app_state.0.toasts;

    view! {
        <div class="pointer-events-none fixed right-4 bottom-4 z-[200] flex w-80 flex-col gap-2">
            <For
                each=move || toasts.get()
                key=|t| t.id
                children=move |t| {
                    let class = match t.level {
                        NoticeLevel::Success => "border-green-500/40 bg-green-50 text-green-800",
                        NoticeLevel::Error => "border-destructive/40 bg-red-50 text-destructive",
                    };
                    let id = t.id;
                    view! {
                        <div
                            role="status"
                            class=format!("pointer-events-auto flex items-start justify-between gap-2 rounded-md border px-3 py-2 text-sm shadow-md {class}")
                        >
                            <span>{t.message}</span>
                            <button
                                type="button"
                                class="opacity-60 hover:opacity-100 [&_svg]:size-4"
                                aria-label="Dismiss"
                                on:click=move |_| dismiss_toast(toasts, id)
                            >
                                <X />
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
