use crate::models::{confidence_class, MAX_CONFIDENCE};
use leptos::prelude::*;

#[component]
pub fn ConfidenceDot(confidence: i32) -> impl IntoView {
    let class = format!("size-4 shrink-0 rounded-full {}", confidence_class(confidence));
    view! {
        <div
            class=class
            title=format!("Confidence {confidence}/{MAX_CONFIDENCE}")
        />
    }
}
