use icons::LoaderCircle;
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Spinner followed by a status line, e.g. "Loading folders...".
#[component]
pub fn Spinner(
    #[prop(into, optional)] class: String,
    #[prop(into, optional)] label: String,
) -> impl IntoView {
    let merged_class = tw_merge!("size-4 animate-spin", class);

    view! {
        <div class="flex items-center gap-2 text-sm text-muted-foreground" role="status">
            <LoaderCircle class=merged_class />
            <span>{label}</span>
        </div>
    }
}
