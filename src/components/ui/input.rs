use leptos::html;
use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

fn input_value(ev: &web_sys::Event) -> Option<String> {
    ev.target()?
        .dyn_ref::<web_sys::HtmlInputElement>()
        .map(|input| input.value())
}

#[component]
pub fn Input(
    #[prop(into, optional)] class: String,

    #[prop(into, default = "text")] r#type: &'static str,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] id: String,
    #[prop(optional)] autofocus: bool,

    // Range inputs (confidence slider).
    #[prop(optional)] min: Option<i32>,
    #[prop(optional)] max: Option<i32>,

    /// Current value; the input is fully controlled by it.
    #[prop(into)]
    value: Signal<String>,
    #[prop(into)] on_input: Callback<String>,
    /// Enter submits the surrounding form.
    #[prop(optional, into)]
    on_enter: Option<Callback<()>>,

    #[prop(optional)] node_ref: NodeRef<html::Input>,
) -> impl IntoView {
    let merged_class = if r#type == "range" {
        tw_merge!("w-full accent-primary", class)
    } else {
        tw_merge!(
            "placeholder:text-muted-foreground selection:bg-primary selection:text-primary-foreground border-input flex h-9 w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-base shadow-xs transition-[color,box-shadow] outline-none md:text-sm",
            "focus-visible:border-ring focus-visible:ring-ring/50 focus-visible:ring-2",
            class
        )
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Enter" {
            if let Some(cb) = on_enter {
                ev.prevent_default();
                cb.run(());
            }
        }
    };

    view! {
        <input
            data-name="Input"
            type=r#type
            class=merged_class
            placeholder=placeholder
            id=id
            autofocus=autofocus
            min=min.map(|v| v.to_string())
            max=max.map(|v| v.to_string())
            prop:value=move || value.get()
            on:input=move |ev| {
                if let Some(v) = input_value(&ev) {
                    on_input.run(v);
                }
            }
            on:keydown=on_keydown
            node_ref=node_ref
        />
    }
}
