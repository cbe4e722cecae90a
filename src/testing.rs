//! In-memory backend and notification recorder for host-side tests.

use crate::api::{ApiError, ApiRequest, ApiResult, Method, Transport};
use crate::models::{Folder, Id, List, NameBody, Problem, ProblemDraft};
use crate::mutations::{Notification, Notifier};
use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct BackendState {
    folders: Vec<Folder>,
    lists: Vec<List>,
    problems: Vec<(Id, Problem)>,
    next_id: Id,
    log: Vec<ApiRequest>,
    fail_next: Option<u16>,
    hold: bool,
    held: Vec<oneshot::Sender<()>>,
}

fn not_found() -> ApiError {
    ApiError::status(404, "Network response was not ok")
}

fn parse_id(raw: &str) -> ApiResult<Id> {
    raw.parse()
        .map_err(|_| ApiError::status(400, "Network response was not ok"))
}

fn body<T: serde::de::DeserializeOwned>(req: &ApiRequest) -> ApiResult<T> {
    let value = req.body.clone().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|_| ApiError::status(400, "Network response was not ok"))
}

fn to_json(value: &impl serde::Serialize) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.to_lowercase().starts_with(&prefix.to_lowercase())
}

fn sorted_by_name<T: Clone>(items: Vec<T>, name: impl Fn(&T) -> &str, order: &str) -> Vec<T> {
    let mut items = items;
    items.sort_by(|a, b| name(a).to_lowercase().cmp(&name(b).to_lowercase()));
    if order == "desc" {
        items.reverse();
    }
    items
}

impl BackendState {
    fn alloc_id(&mut self) -> Id {
        self.next_id += 1;
        self.next_id
    }

    fn handle(&mut self, req: &ApiRequest) -> ApiResult<Value> {
        let (path, query) = req.path.split_once('?').unwrap_or((req.path.as_str(), ""));
        let prefix = query
            .strip_prefix("prefix=")
            .and_then(|p| urlencoding::decode(p).ok())
            .map(|p| p.into_owned())
            .unwrap_or_default();
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

        match (req.method, segments.as_slice()) {
            (Method::Get, ["folders", "search"]) => {
                let found: Vec<Folder> = self
                    .folders
                    .iter()
                    .filter(|f| starts_with_ignore_case(&f.name, &prefix))
                    .cloned()
                    .collect();
                Ok(to_json(&found))
            }
            (Method::Get, ["folders", "sort", order]) => {
                Ok(to_json(&sorted_by_name(self.folders.clone(), |f| f.name.as_str(), order)))
            }
            (Method::Get, ["folders", id]) => {
                let id = parse_id(id)?;
                let folder = self.folders.iter().find(|f| f.id == id).ok_or_else(not_found)?;
                Ok(to_json(folder))
            }
            (Method::Post, ["folders"]) => {
                let NameBody { name } = body(req)?;
                let folder = Folder {
                    id: self.alloc_id(),
                    name,
                };
                self.folders.push(folder.clone());
                Ok(to_json(&folder))
            }
            (Method::Put, ["folders", id]) => {
                let id = parse_id(id)?;
                let NameBody { name } = body(req)?;
                let folder = self.folders.iter_mut().find(|f| f.id == id).ok_or_else(not_found)?;
                folder.name = name;
                Ok(to_json(&*folder))
            }
            (Method::Delete, ["folders", id]) => {
                let id = parse_id(id)?;
                self.folders.retain(|f| f.id != id);
                self.lists.retain(|l| l.folder_id != id);
                Ok(Value::Null)
            }
            (Method::Get, ["lists", "folder", folder_id, "search"]) => {
                let folder_id = parse_id(folder_id)?;
                let found: Vec<List> = self
                    .lists
                    .iter()
                    .filter(|l| l.folder_id == folder_id)
                    .filter(|l| starts_with_ignore_case(&l.name, &prefix))
                    .cloned()
                    .collect();
                Ok(to_json(&found))
            }
            (Method::Get, ["lists", "folder", folder_id, "sort", order]) => {
                let folder_id = parse_id(folder_id)?;
                let in_folder: Vec<List> = self
                    .lists
                    .iter()
                    .filter(|l| l.folder_id == folder_id)
                    .cloned()
                    .collect();
                Ok(to_json(&sorted_by_name(in_folder, |l| l.name.as_str(), order)))
            }
            (Method::Post, ["lists", "folder", folder_id]) => {
                let folder_id = parse_id(folder_id)?;
                if !self.folders.iter().any(|f| f.id == folder_id) {
                    return Err(not_found());
                }
                let NameBody { name } = body(req)?;
                let list = List {
                    id: self.alloc_id(),
                    name,
                    folder_id,
                };
                self.lists.push(list.clone());
                Ok(to_json(&list))
            }
            (Method::Put, ["lists", id]) => {
                let id = parse_id(id)?;
                let NameBody { name } = body(req)?;
                let list = self.lists.iter_mut().find(|l| l.id == id).ok_or_else(not_found)?;
                list.name = name;
                Ok(to_json(&*list))
            }
            (Method::Delete, ["lists", id]) => {
                let id = parse_id(id)?;
                self.lists.retain(|l| l.id != id);
                self.problems.retain(|(list_id, _)| *list_id != id);
                Ok(Value::Null)
            }
            (Method::Get, ["problems", "list", list_id]) => {
                let list_id = parse_id(list_id)?;
                let found: Vec<Problem> = self
                    .problems
                    .iter()
                    .filter(|(l, _)| *l == list_id)
                    .map(|(_, p)| p.clone())
                    .collect();
                Ok(to_json(&found))
            }
            (Method::Post, ["problems", "list", list_id]) => {
                let list_id = parse_id(list_id)?;
                let draft: ProblemDraft = body(req)?;
                let problem = Problem {
                    id: self.alloc_id(),
                    name: draft.name,
                    link: draft.link,
                    confidence: draft.confidence,
                };
                self.problems.push((list_id, problem.clone()));
                Ok(to_json(&problem))
            }
            (Method::Put, ["problems", id]) => {
                let id = parse_id(id)?;
                let update: Problem = body(req)?;
                let (_, problem) = self
                    .problems
                    .iter_mut()
                    .find(|(_, p)| p.id == id)
                    .ok_or_else(not_found)?;
                *problem = update;
                Ok(to_json(&*problem))
            }
            (Method::Delete, ["problems", id]) => {
                let id = parse_id(id)?;
                self.problems.retain(|(_, p)| p.id != id);
                Ok(Value::Null)
            }
            _ => Err(not_found()),
        }
    }
}


/// Routes requests against in-memory folders, lists and problems.
///
/// Responses are computed when a request completes, so a held request sees any
/// changes seeded while it was pending.
#[derive(Clone, Default)]
pub(crate) struct FakeBackend {
    state: Rc<RefCell<BackendState>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folders(names: &[&str]) -> Self {
        let backend = Self::new();
        for name in names {
            backend.seed_folder(name);
        }
        backend
    }

    pub fn seed_folder(&self, name: &str) -> Id {
        let mut st = self.state.borrow_mut();
        let id = st.alloc_id();
        st.folders.push(Folder {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn seed_list(&self, folder_id: Id, name: &str) -> Id {
        let mut st = self.state.borrow_mut();
        let id = st.alloc_id();
        st.lists.push(List {
            id,
            name: name.to_string(),
            folder_id,
        });
        id
    }

    pub fn seed_problem(&self, list_id: Id, name: &str, confidence: i32) -> Id {
        let mut st = self.state.borrow_mut();
        let id = st.alloc_id();
        st.problems.push((
            list_id,
            Problem {
                id,
                name: name.to_string(),
                link: String::new(),
                confidence,
            },
        ));
        id
    }

    pub fn remove_folder_named(&self, name: &str) {
        self.state.borrow_mut().folders.retain(|f| f.name != name);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.borrow().log.clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.state
            .borrow()
            .log
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// The next request fails with `status` without touching the data.
    pub fn fail_next(&self, status: u16) {
        self.state.borrow_mut().fail_next = Some(status);
    }

    /// While holding, requests stay pending until released.
    pub fn hold_responses(&self, hold: bool) {
        self.state.borrow_mut().hold = hold;
    }

    pub fn release_all(&self) {
        let held: Vec<_> = self.state.borrow_mut().held.drain(..).collect();
        for tx in held {
            let _ = tx.send(());
        }
    }

    /// Release the most recently issued pending request.
    pub fn release_last(&self) -> bool {
        let tx = self.state.borrow_mut().held.pop();
        match tx {
            Some(tx) => tx.send(()).is_ok(),
            None => false,
        }
    }
}

impl Transport for FakeBackend {
    fn send(&self, request: ApiRequest) -> LocalBoxFuture<'static, ApiResult<Value>> {
        let (failure, gate) = {
            let mut st = self.state.borrow_mut();
            st.log.push(request.clone());
            let failure = st.fail_next.take();
            let gate = if st.hold {
                let (tx, rx) = oneshot::channel();
                st.held.push(tx);
                Some(rx)
            } else {
                None
            };
            (failure, gate)
        };

        let state = self.state.clone();
        async move {
            if let Some(rx) = gate {
                let _ = rx.await;
            }
            if let Some(status) = failure {
                return Err(ApiError::status(status, "Network response was not ok"));
            }
            state.borrow_mut().handle(&request)
        }
        .boxed_local()
    }
}

/// Keeps every notification for later inspection.
#[derive(Clone, Default)]
pub(crate) struct RecordingNotifier {
    seen: Rc<RefCell<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.borrow_mut().push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fake_backend_routes() {
        let backend = FakeBackend::new();
        let folder = backend.seed_folder("Algorithms");
        backend.seed_list(folder, "Graphs");

        let mut st = backend.state.borrow_mut();
        let found = st
            .handle(&ApiRequest::get("/folders/search?prefix=algo"))
            .expect("search");
        assert_eq!(found, json!([{ "id": folder, "name": "Algorithms" }]));

        let missing = st.handle(&ApiRequest::get("/nope"));
        assert_eq!(missing.map_err(|e| e.status), Err(Some(404)));
    }
}
