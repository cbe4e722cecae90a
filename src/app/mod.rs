use crate::components::{Toaster, TopNav};
use crate::pages::{FoldersPage, HomePage, ListsPage, ProblemsPage};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    view! {
        <Router>
            <div class="flex min-h-screen flex-col">
                <TopNav />
                <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                    <Route path=path!("") view=HomePage />
                    <Route path=path!("folders") view=FoldersPage />
                    <Route path=path!("folders/:folder_id/lists") view=ListsPage />
                    <Route path=path!("lists/:list_id/problems") view=ProblemsPage />
                </Routes>
            </div>
            <Toaster />
        </Router>
    }
}
