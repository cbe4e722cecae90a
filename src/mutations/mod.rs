use crate::api::resources::{self, folders, lists, problems};
use crate::api::{ApiError, ApiRequest, ApiResult, Transport};
use crate::cache::QueryCache;
use crate::models::{EntityKind, Id, Problem, ProblemDraft};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    fn past_tense(self) -> &'static str {
        match self {
            MutationKind::Create => "created",
            MutationKind::Update => "updated",
            MutationKind::Delete => "deleted",
        }
    }
}

/// A write against the backend, with enough context to know which cached
/// collections it affects.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Mutation {
    CreateFolder { name: String },
    RenameFolder { id: Id, name: String },
    DeleteFolder { id: Id },
    CreateList { folder_id: Id, name: String },
    RenameList { id: Id, folder_id: Id, name: String },
    DeleteList { id: Id, folder_id: Id },
    CreateProblem { list_id: Id, draft: ProblemDraft },
    UpdateProblem { list_id: Id, problem: Problem },
    DeleteProblem { id: Id, list_id: Id },
}

impl Mutation {
    pub fn entity(&self) -> EntityKind {
        match self {
            Mutation::CreateFolder { .. }
            | Mutation::RenameFolder { .. }
            | Mutation::DeleteFolder { .. } => EntityKind::Folder,
            Mutation::CreateList { .. }
            | Mutation::RenameList { .. }
            | Mutation::DeleteList { .. } => EntityKind::List,
            Mutation::CreateProblem { .. }
            | Mutation::UpdateProblem { .. }
            | Mutation::DeleteProblem { .. } => EntityKind::Problem,
        }
    }

    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::CreateFolder { .. }
            | Mutation::CreateList { .. }
            | Mutation::CreateProblem { .. } => MutationKind::Create,
            Mutation::RenameFolder { .. }
            | Mutation::RenameList { .. }
            | Mutation::UpdateProblem { .. } => MutationKind::Update,
            Mutation::DeleteFolder { .. }
            | Mutation::DeleteList { .. }
            | Mutation::DeleteProblem { .. } => MutationKind::Delete,
        }
    }

    /// Parent scope whose cached collections go stale on success.
    /// Folders are top level, so every folder query is affected.
    pub fn scope(&self) -> Option<Id> {
        match self {
            Mutation::CreateFolder { .. }
            | Mutation::RenameFolder { .. }
            | Mutation::DeleteFolder { .. } => None,
            Mutation::CreateList { folder_id, .. }
            | Mutation::RenameList { folder_id, .. }
            | Mutation::DeleteList { folder_id, .. } => Some(*folder_id),
            Mutation::CreateProblem { list_id, .. }
            | Mutation::UpdateProblem { list_id, .. }
            | Mutation::DeleteProblem { list_id, .. } => Some(*list_id),
        }
    }

    /// Names must be non-empty after trimming; anything else is a silent no-op.
    pub fn is_valid(&self) -> bool {
        match self {
            Mutation::CreateFolder { name }
            | Mutation::RenameFolder { name, .. }
            | Mutation::CreateList { name, .. }
            | Mutation::RenameList { name, .. } => !name.trim().is_empty(),
            Mutation::CreateProblem { draft, .. } => !draft.name.trim().is_empty(),
            Mutation::UpdateProblem { problem, .. } => !problem.name.trim().is_empty(),
            Mutation::DeleteFolder { .. }
            | Mutation::DeleteList { .. }
            | Mutation::DeleteProblem { .. } => true,
        }
    }

    pub(crate) fn request(&self) -> ApiResult<ApiRequest> {
        match self {
            Mutation::CreateFolder { name } => folders::create(name.trim()),
            Mutation::RenameFolder { id, name } => folders::rename(*id, name.trim()),
            Mutation::DeleteFolder { id } => Ok(folders::delete(*id)),
            Mutation::CreateList { folder_id, name } => lists::create(*folder_id, name.trim()),
            Mutation::RenameList { id, name, .. } => lists::rename(*id, name.trim()),
            Mutation::DeleteList { id, .. } => Ok(lists::delete(*id)),
            Mutation::CreateProblem { list_id, draft } => problems::create(*list_id, draft),
            Mutation::UpdateProblem { problem, .. } => problems::update(problem),
            Mutation::DeleteProblem { id, .. } => Ok(problems::delete(*id)),
        }
    }

    pub fn success_message(&self) -> String {
        format!(
            "{} {} successfully!",
            self.entity().label(),
            self.kind().past_tense()
        )
    }

    /// "Failed to create folder"; also replaces the status text of the error.
    pub fn failure_context(&self) -> String {
        format!("Failed to {} {}", self.kind(), self.entity())
    }

    pub fn failure_message(&self, e: &ApiError) -> String {
        format!("{}: {}", self.failure_context(), e)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NoticeLevel {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Notification {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Transient user feedback (toasts in the browser).
pub(crate) trait Notifier {
    fn notify(&self, notification: Notification);
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum MutationOutcome {
    /// Remote write succeeded and affected queries were invalidated.
    Applied,
    /// Remote write failed; the cache was not touched.
    Failed(ApiError),
    /// Validation blocked the write before any request.
    Skipped,
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}

/// Runs writes and keeps the [`QueryCache`] consistent with them.
///
/// Nothing is written into cached data locally: on success the affected
/// entries are invalidated and refetched, on failure the cache is left as is.
#[derive(Clone)]
pub(crate) struct MutationCoordinator {
    cache: QueryCache,
    transport: Rc<dyn Transport>,
    notifier: Rc<dyn Notifier>,
}

impl MutationCoordinator {
    pub fn new(cache: QueryCache, transport: Rc<dyn Transport>, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            cache,
            transport,
            notifier,
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub async fn execute(&self, mutation: Mutation) -> MutationOutcome {
        if !mutation.is_valid() {
            tracing::debug!(?mutation, "skipping invalid mutation");
            return MutationOutcome::Skipped;
        }

        let result = match mutation.request() {
            Ok(request) => resources::call_unit(&*self.transport, request)
                .await
                .map_err(|e| e.in_context(&mutation.failure_context())),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::info!(
                    entity = %mutation.entity(),
                    kind = %mutation.kind(),
                    scope = ?mutation.scope(),
                    "mutation applied"
                );
                self.cache.invalidate(mutation.entity(), mutation.scope());
                self.notifier
                    .notify(Notification::success(mutation.success_message()));
                MutationOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(
                    entity = %mutation.entity(),
                    kind = %mutation.kind(),
                    error = %e,
                    "mutation failed"
                );
                self.notifier
                    .notify(Notification::error(mutation.failure_message(&e)));
                MutationOutcome::Failed(e)
            }
        }
    }
}
