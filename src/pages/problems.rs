use super::{render_collection, DeleteModal, ListRouteParams};
use crate::components::ui::{Button, DialogFooter, Input, Label, Modal};
use crate::components::{ConfidenceDot, Header, ItemActions};
use crate::models::{Problem, MAX_CONFIDENCE, MIN_CONFIDENCE};
use crate::state::{use_query, AppContext};
use crate::views::{problems_title, ActiveModal, Entity, ProblemForm, ViewController};
use leptos::prelude::*;
use leptos_router::hooks::use_params;

#[component]
pub fn ProblemsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let params = use_params::<ListRouteParams>();

    let list_id = move || params.get().ok().and_then(|p| p.list_id).unwrap_or_default();
    let list_id_untracked = move || {
        params
            .get_untracked()
            .ok()
            .and_then(|p| p.list_id)
            .unwrap_or_default()
    };

    let view_state = RwSignal::new(ViewController::<Problem>::problems(list_id_untracked()));
    let form = RwSignal::new(ProblemForm::default());

    Effect::new(move |_| {
        let id = list_id();
        if view_state.with_untracked(|v| v.scope != Some(id)) {
            view_state.set(ViewController::problems(id));
        }
    });

    let problems = use_query(move || view_state.with(|v| v.search_descriptor()));

    let title = Signal::derive(move || {
        let id = list_id();
        app_state.0.list_nav.with(|nav| problems_title(id, nav.as_ref()))
    });

    let close_modal = Callback::new(move |_: ()| {
        view_state.update(|v| v.close_modal());
        form.update(|f| f.reset());
    });

    let on_save = Callback::new(move |_: ()| {
        let Some(m) = view_state.with_untracked(|v| form.with_untracked(|f| v.save(f))) else {
            return;
        };
        app_state.0.mutate(m, close_modal);
    });

    let on_delete = Callback::new(move |_: ()| {
        let Some(m) = view_state.with_untracked(|v| v.delete()) else {
            return;
        };
        app_state.0.mutate(m, close_modal);
    });

    let form_open = move || {
        view_state.with(|v| v.is_open(ActiveModal::Create) || v.is_open(ActiveModal::Edit))
    };
    let form_title = Signal::derive(move || {
        if view_state.with(|v| v.is_open(ActiveModal::Edit)) {
            "Edit Problem".to_string()
        } else {
            "New Problem".to_string()
        }
    });
    let selected_name = Signal::derive(move || {
        view_state.with(|v| v.selected.as_ref().map(|p| p.name().to_string()).unwrap_or_default())
    });

    let row = move |problem: Problem| {
        let for_edit = problem.clone();
        let for_delete = problem.clone();
        let name = if problem.link.is_empty() {
            view! { <span class="truncate">{problem.name.clone()}</span> }.into_any()
        } else {
            view! {
                <a
                    href=problem.link.clone()
                    target="_blank"
                    rel="noopener noreferrer"
                    class="truncate text-blue-600 hover:underline"
                >
                    {problem.name.clone()}
                </a>
            }
            .into_any()
        };
        view! {
            <div class="flex items-center justify-between rounded-lg border bg-card p-4 shadow-sm">
                <div class="flex min-w-0 items-center gap-4">
                    <ConfidenceDot confidence=problem.confidence />
                    {name}
                </div>
                <ItemActions
                    item_name=problem.name
                    on_edit=Callback::new(move |_: ()| {
                        form.set(ProblemForm::editing(&for_edit));
                        view_state.update(|v| v.open_edit(for_edit.clone()));
                    })
                    on_delete=Callback::new(move |_: ()| {
                        view_state.update(|v| v.open_delete(for_delete.clone()));
                    })
                />
            </div>
        }
        .into_any()
    };

    view! {
        <div class="flex flex-col">
            <Header
                title=title
                items="problems"
                on_new=Callback::new(move |_: ()| {
                    form.update(|f| f.reset());
                    view_state.update(|v| v.open_create());
                })
            />

            <div class="space-y-4 p-4">
                {move || problems.with(|s| render_collection(s, "problems", row))}
            </div>

            <Show when=form_open fallback=|| ().into_view()>
                <Modal title=form_title on_close=close_modal>
                    <div class="space-y-3">
                        <div class="space-y-1">
                            <Label html_for="problem-name">"Name"</Label>
                            <Input
                                id="problem-name"
                                placeholder="Problem name"
                                autofocus=true
                                value=Signal::derive(move || form.with(|f| f.name.clone()))
                                on_input=Callback::new(move |v: String| form.update(|f| f.name = v))
                                on_enter=on_save
                            />
                        </div>
                        <div class="space-y-1">
                            <Label html_for="problem-link">"Link"</Label>
                            <Input
                                id="problem-link"
                                r#type="url"
                                placeholder="https://"
                                value=Signal::derive(move || form.with(|f| f.link.clone()))
                                on_input=Callback::new(move |v: String| form.update(|f| f.link = v))
                                on_enter=on_save
                            />
                        </div>
                        <div class="space-y-1">
                            <Label html_for="problem-confidence">
                                {move || format!("Confidence: {}", form.with(|f| f.confidence))}
                            </Label>
                            <Input
                                id="problem-confidence"
                                r#type="range"
                                min=MIN_CONFIDENCE
                                max=MAX_CONFIDENCE
                                value=Signal::derive(move || form.with(|f| f.confidence.to_string()))
                                on_input=Callback::new(move |v: String| form.update(|f| f.set_confidence_str(&v)))
                            />
                        </div>
                    </div>
                    <DialogFooter>
                        <Button on:click=move |_| on_save.run(())>
                            {move || if view_state.with(|v| v.is_open(ActiveModal::Edit)) { "Save" } else { "Create" }}
                        </Button>
                    </DialogFooter>
                </Modal>
            </Show>

            <Show when=move || view_state.with(|v| v.is_open(ActiveModal::Delete)) fallback=|| ().into_view()>
                <DeleteModal
                    noun="Problem"
                    item_name=selected_name
                    on_confirm=on_delete
                    on_close=close_modal
                />
            </Show>
        </div>
    }
}
