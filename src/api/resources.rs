//! One request builder and one typed call per (entity kind × operation).
//!
//! Builders are pure; the `async fn`s send exactly one request through the given
//! [`Transport`] and decode the JSON payload.

use super::{ApiError, ApiRequest, ApiResult, Transport};
use crate::models::{Folder, Id, List, NameBody, Problem, ProblemDraft, SortOrder};
use serde::de::DeserializeOwned;

fn name_body(name: &str) -> NameBody {
    NameBody {
        name: name.to_string(),
    }
}

fn prefix_query(prefix: &str) -> String {
    format!("search?prefix={}", urlencoding::encode(prefix))
}

pub(crate) async fn call<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: ApiRequest,
) -> ApiResult<T> {
    let data = transport.send(request).await?;
    serde_json::from_value(data).map_err(ApiError::decode)
}

/// For writes whose response body the client does not use.
pub(crate) async fn call_unit(transport: &dyn Transport, request: ApiRequest) -> ApiResult<()> {
    transport.send(request).await.map(|_| ())
}

pub(crate) mod folders {
    use super::*;

    pub fn search(prefix: &str) -> ApiRequest {
        ApiRequest::get(format!("/folders/{}", prefix_query(prefix)))
    }

    pub fn sorted(order: SortOrder) -> ApiRequest {
        ApiRequest::get(format!("/folders/sort/{order}"))
    }

    pub fn get(id: Id) -> ApiRequest {
        ApiRequest::get(format!("/folders/{id}"))
    }

    pub fn create(name: &str) -> ApiResult<ApiRequest> {
        ApiRequest::post("/folders", &name_body(name))
    }

    pub fn rename(id: Id, name: &str) -> ApiResult<ApiRequest> {
        ApiRequest::put(format!("/folders/{id}"), &name_body(name))
    }

    pub fn delete(id: Id) -> ApiRequest {
        ApiRequest::delete(format!("/folders/{id}"))
    }
}

pub(crate) mod lists {
    use super::*;

    pub fn search(folder_id: Id, prefix: &str) -> ApiRequest {
        ApiRequest::get(format!("/lists/folder/{folder_id}/{}", prefix_query(prefix)))
    }

    pub fn sorted(folder_id: Id, order: SortOrder) -> ApiRequest {
        ApiRequest::get(format!("/lists/folder/{folder_id}/sort/{order}"))
    }

    pub fn create(folder_id: Id, name: &str) -> ApiResult<ApiRequest> {
        ApiRequest::post(format!("/lists/folder/{folder_id}"), &name_body(name))
    }

    pub fn rename(id: Id, name: &str) -> ApiResult<ApiRequest> {
        ApiRequest::put(format!("/lists/{id}"), &name_body(name))
    }

    pub fn delete(id: Id) -> ApiRequest {
        ApiRequest::delete(format!("/lists/{id}"))
    }
}

pub(crate) mod problems {
    use super::*;

    pub fn in_list(list_id: Id) -> ApiRequest {
        ApiRequest::get(format!("/problems/list/{list_id}"))
    }

    /// Confidence is clamped to `[0, 10]` before the body is built.
    pub fn create(list_id: Id, draft: &ProblemDraft) -> ApiResult<ApiRequest> {
        ApiRequest::post(format!("/problems/list/{list_id}"), &draft.normalized())
    }

    pub fn update(problem: &Problem) -> ApiResult<ApiRequest> {
        let body = ProblemDraft::from_problem(problem).into_problem(problem.id);
        ApiRequest::put(format!("/problems/{}", problem.id), &body)
    }

    pub fn delete(id: Id) -> ApiRequest {
        ApiRequest::delete(format!("/problems/{id}"))
    }
}

pub(crate) async fn search_folders(t: &dyn Transport, prefix: &str) -> ApiResult<Vec<Folder>> {
    call(t, folders::search(prefix)).await
}

pub(crate) async fn sorted_folders(t: &dyn Transport, order: SortOrder) -> ApiResult<Vec<Folder>> {
    call(t, folders::sorted(order)).await
}

pub(crate) async fn get_folder(t: &dyn Transport, id: Id) -> ApiResult<Folder> {
    call(t, folders::get(id)).await
}

pub(crate) async fn search_lists(
    t: &dyn Transport,
    folder_id: Id,
    prefix: &str,
) -> ApiResult<Vec<List>> {
    call(t, lists::search(folder_id, prefix)).await
}

pub(crate) async fn sorted_lists(
    t: &dyn Transport,
    folder_id: Id,
    order: SortOrder,
) -> ApiResult<Vec<List>> {
    call(t, lists::sorted(folder_id, order)).await
}

pub(crate) async fn list_problems(t: &dyn Transport, list_id: Id) -> ApiResult<Vec<Problem>> {
    call(t, problems::in_list(list_id)).await
}
