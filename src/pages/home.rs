use crate::views::AppRoute;
use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="flex min-h-screen flex-col items-center justify-center bg-muted p-4">
            <header class="mb-6 w-full max-w-4xl text-center">
                <h1 class="text-2xl font-bold text-blue-600 sm:text-3xl md:text-4xl lg:text-5xl">
                    "Priority Queue Study App"
                </h1>
                <p class="mt-2 text-sm text-muted-foreground sm:text-base md:text-lg">"Ace your exams!"</p>
            </header>

            <a
                href=AppRoute::Folders.path()
                class="rounded-full bg-blue-500 px-4 py-2 text-sm text-white transition duration-300 hover:bg-blue-600 sm:px-6 sm:text-base"
            >
                "Go to Folders"
            </a>
        </div>
    }
}
