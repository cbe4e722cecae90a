//! Per-page UI state: filter, modal and selection, independent of rendering.

use crate::cache::{QueryDescriptor, QueryState};
use crate::models::{
    clamp_confidence, EntityKind, Folder, Id, List, Problem, ProblemDraft, SortOrder,
    DEFAULT_CONFIDENCE,
};
use crate::mutations::Mutation;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum ActiveModal {
    #[default]
    None,
    Create,
    Edit,
    Delete,
}

/// Options offered by the header's "Filter by" menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumIter)]
pub(crate) enum FilterOption {
    TitleAtoZ,
    TitleZtoA,
}

impl FilterOption {
    pub fn label(self) -> &'static str {
        match self {
            FilterOption::TitleAtoZ => "Title (A-Z)",
            FilterOption::TitleZtoA => "Title (Z-A)",
        }
    }

    pub fn order(self) -> SortOrder {
        match self {
            FilterOption::TitleAtoZ => SortOrder::Asc,
            FilterOption::TitleZtoA => SortOrder::Desc,
        }
    }
}

/// Something a page lists and can rename or delete.
pub(crate) trait Entity: Clone {
    const KIND: EntityKind;

    fn id(&self) -> Id;
    fn name(&self) -> &str;
    fn items(state: &QueryState) -> Vec<Self>;
}

impl Entity for Folder {
    const KIND: EntityKind = EntityKind::Folder;

    fn id(&self) -> Id {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn items(state: &QueryState) -> Vec<Self> {
        state.folders().to_vec()
    }
}

impl Entity for List {
    const KIND: EntityKind = EntityKind::List;

    fn id(&self) -> Id {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn items(state: &QueryState) -> Vec<Self> {
        state.lists().to_vec()
    }
}

impl Entity for Problem {
    const KIND: EntityKind = EntityKind::Problem;

    fn id(&self) -> Id {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn items(state: &QueryState) -> Vec<Self> {
        state.problems().to_vec()
    }
}

/// Filter and modal state of one hierarchy page.
///
/// Search and sort are mutually exclusive: setting one clears the other, and
/// with no sort order chosen the search (possibly empty) is what gets shown.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ViewController<T: Entity> {
    /// Parent id: folder for lists, list for problems.
    pub scope: Option<Id>,
    pub search_text: String,
    pub sort_order: Option<SortOrder>,
    pub active_modal: ActiveModal,
    pub selected: Option<T>,
}

impl<T: Entity> ViewController<T> {
    fn with_scope(scope: Option<Id>) -> Self {
        Self {
            scope,
            search_text: String::new(),
            sort_order: None,
            active_modal: ActiveModal::None,
            selected: None,
        }
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.sort_order = None;
    }

    pub fn select_sort(&mut self, order: SortOrder) {
        self.sort_order = Some(order);
        self.search_text.clear();
    }

    pub fn apply_filter(&mut self, option: FilterOption) {
        self.select_sort(option.order());
    }

    pub fn open_create(&mut self) {
        self.active_modal = ActiveModal::Create;
        self.selected = None;
    }

    pub fn open_edit(&mut self, item: T) {
        self.active_modal = ActiveModal::Edit;
        self.selected = Some(item);
    }

    pub fn open_delete(&mut self, item: T) {
        self.active_modal = ActiveModal::Delete;
        self.selected = Some(item);
    }

    pub fn close_modal(&mut self) {
        self.active_modal = ActiveModal::None;
        self.selected = None;
    }

    pub fn is_open(&self, modal: ActiveModal) -> bool {
        self.active_modal == modal
    }

    /// Whether the sort query, rather than the search query, is being shown.
    pub fn sorting(&self) -> bool {
        self.sort_order.is_some()
    }

    pub fn search_descriptor(&self) -> QueryDescriptor {
        match (T::KIND, self.scope) {
            (EntityKind::List, Some(folder_id)) => {
                QueryDescriptor::lists_search(folder_id, &self.search_text)
            }
            (EntityKind::Problem, Some(list_id)) => QueryDescriptor::problems(list_id),
            _ => QueryDescriptor::folders_search(&self.search_text),
        }
    }

    /// `None` for problems, which have no sorted endpoint.
    pub fn sort_descriptor(&self) -> Option<QueryDescriptor> {
        match (T::KIND, self.scope) {
            (EntityKind::Folder, _) => Some(QueryDescriptor::folders_sorted(self.sort_order)),
            (EntityKind::List, Some(folder_id)) => {
                Some(QueryDescriptor::lists_sorted(folder_id, self.sort_order))
            }
            _ => None,
        }
    }

    pub fn active_descriptor(&self) -> QueryDescriptor {
        match self.sort_descriptor() {
            Some(sort) if self.sorting() => sort,
            _ => self.search_descriptor(),
        }
    }

    /// Pick the rows to render from the two cache reads.
    pub fn display<'a>(&self, search: &'a QueryState, sort: &'a QueryState) -> &'a QueryState {
        if self.sorting() {
            sort
        } else {
            search
        }
    }

    pub fn create(&self, name: &str) -> Option<Mutation> {
        let name = name.to_string();
        match (T::KIND, self.scope) {
            (EntityKind::Folder, _) => Some(Mutation::CreateFolder { name }),
            (EntityKind::List, Some(folder_id)) => Some(Mutation::CreateList { folder_id, name }),
            _ => None,
        }
    }

    /// Rename the selected item.
    pub fn rename(&self, name: &str) -> Option<Mutation> {
        let id = self.selected.as_ref()?.id();
        let name = name.to_string();
        match (T::KIND, self.scope) {
            (EntityKind::Folder, _) => Some(Mutation::RenameFolder { id, name }),
            (EntityKind::List, Some(folder_id)) => Some(Mutation::RenameList { id, folder_id, name }),
            _ => None,
        }
    }

    /// Delete the selected item.
    pub fn delete(&self) -> Option<Mutation> {
        let id = self.selected.as_ref()?.id();
        match (T::KIND, self.scope) {
            (EntityKind::Folder, _) => Some(Mutation::DeleteFolder { id }),
            (EntityKind::List, Some(folder_id)) => Some(Mutation::DeleteList { id, folder_id }),
            (EntityKind::Problem, Some(list_id)) => Some(Mutation::DeleteProblem { id, list_id }),
            _ => None,
        }
    }
}

impl ViewController<Folder> {
    pub fn folders() -> Self {
        Self::with_scope(None)
    }
}

impl ViewController<List> {
    pub fn lists(folder_id: Id) -> Self {
        Self::with_scope(Some(folder_id))
    }
}

impl ViewController<Problem> {
    pub fn problems(list_id: Id) -> Self {
        Self::with_scope(Some(list_id))
    }

    /// Create when nothing is selected, otherwise update the selected problem.
    pub fn save(&self, form: &ProblemForm) -> Option<Mutation> {
        let list_id = self.scope?;
        let draft = form.draft();
        Some(match &self.selected {
            Some(existing) => Mutation::UpdateProblem {
                list_id,
                problem: draft.into_problem(existing.id),
            },
            None => Mutation::CreateProblem { list_id, draft },
        })
    }
}

/// Fields of the problem modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ProblemForm {
    pub name: String,
    pub link: String,
    pub confidence: i32,
}

impl Default for ProblemForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            link: String::new(),
            confidence: DEFAULT_CONFIDENCE,
        }
    }
}

impl ProblemForm {
    pub fn editing(problem: &Problem) -> Self {
        Self {
            name: problem.name.clone(),
            link: problem.link.clone(),
            confidence: clamp_confidence(problem.confidence),
        }
    }

    /// Range inputs report strings; anything unparsable keeps the old value.
    pub fn set_confidence_str(&mut self, raw: &str) {
        if let Ok(v) = raw.trim().parse::<f64>() {
            self.confidence = clamp_confidence(v.floor() as i32);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn draft(&self) -> ProblemDraft {
        ProblemDraft {
            name: self.name.clone(),
            link: self.link.clone(),
            confidence: self.confidence,
        }
        .normalized()
    }
}

/// Navigation targets of the app.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AppRoute {
    Home,
    Folders,
    Lists { folder_id: Id },
    Problems { list_id: Id },
}

impl AppRoute {
    pub fn path(&self) -> String {
        match self {
            AppRoute::Home => "/".to_string(),
            AppRoute::Folders => "/folders".to_string(),
            AppRoute::Lists { folder_id } => format!("/folders/{folder_id}/lists"),
            AppRoute::Problems { list_id } => format!("/lists/{list_id}/problems"),
        }
    }
}

/// Carried from the Lists page to the Problems page; never persisted or refetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ListNavState {
    pub list_id: Id,
    pub list_name: String,
}

pub(crate) fn lists_title(folder: Option<&Folder>) -> String {
    match folder {
        Some(f) => format!("Lists for {}", f.name),
        None => "Lists".to_string(),
    }
}

pub(crate) fn problems_title(list_id: Id, nav: Option<&ListNavState>) -> String {
    let name = nav
        .filter(|n| n.list_id == list_id)
        .map(|n| n.list_name.as_str())
        .unwrap_or("Unknown List");
    format!("Problems for {name}")
}
