use serde::{Deserialize, Serialize};

/// Index kind for an included path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexKind {
    Hash,
    Range,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludedPath {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_kind: Option<IndexKind>,
}

/// Indexing policy applied when a collection is first created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexingPolicy {
    pub included_paths: Vec<IncludedPath>,
}

impl IndexingPolicy {
    /// Range-index each supplied field path, plus the catch-all root path so
    /// properties outside the list stay indexed with server defaults.
    pub fn with_range_paths(paths: &[String]) -> Self {
        let mut included_paths: Vec<IncludedPath> = paths
            .iter()
            .map(|path| IncludedPath {
                path: path.clone(),
                index_kind: Some(IndexKind::Range),
            })
            .collect();
        included_paths.push(IncludedPath {
            path: "/".to_string(),
            index_kind: None,
        });
        Self { included_paths }
    }
}

/// A collection resource as returned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    #[serde(rename = "_self", default)]
    pub self_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indexing_policy: Option<IndexingPolicy>,
}

/// A stored procedure resource as returned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProcedure {
    pub id: String,
    #[serde(rename = "_self", default)]
    pub self_link: String,
    #[serde(default)]
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_policy_appends_catch_all_path() {
        let policy =
            IndexingPolicy::with_range_paths(&["/ts".to_string(), "/price".to_string()]);
        assert_eq!(policy.included_paths.len(), 3);
        assert_eq!(policy.included_paths[0].path, "/ts");
        assert_eq!(policy.included_paths[0].index_kind, Some(IndexKind::Range));
        assert_eq!(policy.included_paths[2].path, "/");
        assert_eq!(policy.included_paths[2].index_kind, None);
    }

    #[test]
    fn empty_path_list_still_keeps_catch_all() {
        let policy = IndexingPolicy::with_range_paths(&[]);
        assert_eq!(policy.included_paths.len(), 1);
        assert_eq!(policy.included_paths[0].path, "/");
    }
}
