use crate::views::AppRoute;
use icons::Folder;
use leptos::prelude::*;
use leptos_router::hooks::use_location;

#[component]
fn NavLink(route: AppRoute, label: &'static str, children: Children) -> impl IntoView {
    let location = use_location();
    let path = route.path();
    let target = path.clone();
    let is_active = move || location.pathname.get() == target;

    view! {
        <a
            href=path
            class=move || {
                if is_active() {
                    "flex flex-col items-center border-b-2 border-blue-700 px-2 text-xs font-bold text-blue-700"
                } else {
                    "flex flex-col items-center border-b-2 border-transparent px-2 text-xs text-blue-500"
                }
            }
        >
            {children()}
            <span class="mt-1">{label}</span>
        </a>
    }
}

#[component]
pub fn TopNav() -> impl IntoView {
    view! {
        <nav class="sticky top-0 z-[100] w-full border-b bg-background">
            <div class="flex justify-around py-2">
                <NavLink route=AppRoute::Home label="Home">
                    <span class="text-lg leading-none">"⌂"</span>
                </NavLink>
                <NavLink route=AppRoute::Folders label="Folders">
                    <Folder class="size-5" />
                </NavLink>
            </div>
        </nav>
    }
}
