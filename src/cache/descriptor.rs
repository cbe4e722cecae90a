use crate::api::resources;
use crate::api::{ApiError, ApiResult, Transport};
use crate::cache::Records;
use crate::models::{EntityKind, Id, SortOrder};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum QueryMode {
    Search,
    Sort,
    /// Unfiltered collection (problems in a list).
    All,
    /// A single record; `param` carries its id.
    Detail,
}

/// Cache key: equal descriptors share one cache entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct QueryDescriptor {
    pub kind: EntityKind,
    /// Parent id for hierarchical collections (folder for lists, list for problems).
    pub scope: Option<Id>,
    pub mode: QueryMode,
    pub param: String,
}

fn sort_param(order: Option<SortOrder>) -> String {
    order.map(|o| o.to_string()).unwrap_or_default()
}

impl QueryDescriptor {
    pub fn folders_search(prefix: &str) -> Self {
        Self {
            kind: EntityKind::Folder,
            scope: None,
            mode: QueryMode::Search,
            param: prefix.to_string(),
        }
    }

    pub fn folders_sorted(order: Option<SortOrder>) -> Self {
        Self {
            kind: EntityKind::Folder,
            scope: None,
            mode: QueryMode::Sort,
            param: sort_param(order),
        }
    }

    pub fn folder(id: Id) -> Self {
        Self {
            kind: EntityKind::Folder,
            scope: None,
            mode: QueryMode::Detail,
            param: id.to_string(),
        }
    }

    pub fn lists_search(folder_id: Id, prefix: &str) -> Self {
        Self {
            kind: EntityKind::List,
            scope: Some(folder_id),
            mode: QueryMode::Search,
            param: prefix.to_string(),
        }
    }

    pub fn lists_sorted(folder_id: Id, order: Option<SortOrder>) -> Self {
        Self {
            kind: EntityKind::List,
            scope: Some(folder_id),
            mode: QueryMode::Sort,
            param: sort_param(order),
        }
    }

    pub fn problems(list_id: Id) -> Self {
        Self {
            kind: EntityKind::Problem,
            scope: Some(list_id),
            mode: QueryMode::All,
            param: String::new(),
        }
    }

    /// Sort queries only fire once an order has been chosen.
    pub fn is_enabled(&self) -> bool {
        !(self.mode == QueryMode::Sort && self.param.trim().is_empty())
    }

    /// `scope == None` matches every entry of `kind`.
    pub fn matches(&self, kind: EntityKind, scope: Option<Id>) -> bool {
        self.kind == kind && scope.is_none_or(|s| self.scope == Some(s))
    }

    fn require_scope(&self) -> ApiResult<Id> {
        self.scope
            .ok_or_else(|| ApiError::invalid(format!("{self} requires a parent id")))
    }

    fn sort_order(&self) -> ApiResult<SortOrder> {
        self.param
            .parse()
            .map_err(|_| ApiError::invalid(format!("unsupported sort order '{}'", self.param)))
    }

    fn detail_id(&self) -> ApiResult<Id> {
        self.param
            .parse()
            .map_err(|_| ApiError::invalid(format!("invalid id '{}'", self.param)))
    }

    /// Resolve this descriptor with a single backend call.
    /// What a failed fetch reports, per query shape.
    pub fn failure_context(&self) -> &'static str {
        match (self.kind, self.mode) {
            (EntityKind::Folder, QueryMode::Detail) => "Failed to fetch folder details",
            (EntityKind::List, QueryMode::Search) => "Failed to fetch lists",
            (EntityKind::List, QueryMode::Sort) => "Failed to fetch sorted lists",
            (EntityKind::Problem, _) => "Failed to fetch problems",
            _ => "Network response was not ok",
        }
    }

    pub(crate) async fn fetch(&self, t: &dyn Transport) -> ApiResult<Records> {
        self.fetch_records(t)
            .await
            .map_err(|e| e.in_context(self.failure_context()))
    }

    async fn fetch_records(&self, t: &dyn Transport) -> ApiResult<Records> {
        match (self.kind, self.mode) {
            (EntityKind::Folder, QueryMode::Search) => {
                resources::search_folders(t, &self.param).await.map(Records::Folders)
            }
            (EntityKind::Folder, QueryMode::Sort) => {
                resources::sorted_folders(t, self.sort_order()?).await.map(Records::Folders)
            }
            (EntityKind::Folder, QueryMode::Detail) => {
                resources::get_folder(t, self.detail_id()?).await.map(Records::Folder)
            }
            (EntityKind::List, QueryMode::Search) => {
                resources::search_lists(t, self.require_scope()?, &self.param)
                    .await
                    .map(Records::Lists)
            }
            (EntityKind::List, QueryMode::Sort) => {
                resources::sorted_lists(t, self.require_scope()?, self.sort_order()?)
                    .await
                    .map(Records::Lists)
            }
            (EntityKind::Problem, QueryMode::All) => {
                resources::list_problems(t, self.require_scope()?)
                    .await
                    .map(Records::Problems)
            }
            _ => Err(ApiError::invalid(format!("unsupported query {self}"))),
        }
    }
}

impl std::fmt::Display for QueryDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(scope) = self.scope {
            write!(f, "@{scope}")?;
        }
        write!(f, "/{}", self.mode)?;
        if !self.param.is_empty() {
            write!(f, "?{}", self.param)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_descriptor_value_equality() {
        let a = QueryDescriptor::lists_search(1, "Gra");
        let b = QueryDescriptor::lists_search(1, "Gra");
        assert_eq!(a, b);

        let mut keys = HashSet::new();
        keys.insert(a);
        keys.insert(b);
        keys.insert(QueryDescriptor::lists_search(2, "Gra"));
        keys.insert(QueryDescriptor::lists_sorted(1, Some(SortOrder::Asc)));
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_sort_without_order_is_disabled() {
        assert!(!QueryDescriptor::folders_sorted(None).is_enabled());
        assert!(QueryDescriptor::folders_sorted(Some(SortOrder::Desc)).is_enabled());
        assert!(QueryDescriptor::folders_search("").is_enabled());
    }

    #[test]
    fn test_matches_scope() {
        let d = QueryDescriptor::lists_search(4, "");
        assert!(d.matches(EntityKind::List, None));
        assert!(d.matches(EntityKind::List, Some(4)));
        assert!(!d.matches(EntityKind::List, Some(5)));
        assert!(!d.matches(EntityKind::Folder, None));
        assert!(QueryDescriptor::folder(4).matches(EntityKind::Folder, None));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            QueryDescriptor::lists_sorted(3, Some(SortOrder::Asc)).to_string(),
            "list@3/sort?asc"
        );
        assert_eq!(QueryDescriptor::folders_search("").to_string(), "folder/search");
    }
}
