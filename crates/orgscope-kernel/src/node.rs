//! Node records: the entities that make up a tenant's tree.

use crate::level::Level;
use serde::{Deserialize, Serialize};

/// Identifier of a node below the company level.
///
/// Ids are unique per level, not across levels: a region and a site may
/// share the same number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Identifier of a company, the tenant root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub String);

impl CompanyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The tenant a caller acts for. Every resolution takes one explicitly.
pub type TenantId = CompanyId;

/// Link from a node to the node one level up.
///
/// Business units point at their company; every other level points at a node.
/// On the wire integers are node ids and strings are company ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParentRef {
    Node(NodeId),
    Company(CompanyId),
}

impl std::fmt::Display for ParentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParentRef::Node(id) => write!(f, "{id}"),
            ParentRef::Company(id) => write!(f, "{id}"),
        }
    }
}

/// A company: the root of one tenant's tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
}

/// An entity at some level below the company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub level: Level,
    #[serde(rename = "parent_id")]
    pub parent: ParentRef,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Node {
    pub fn new(id: i64, level: Level, parent: ParentRef, name: &str) -> Self {
        Self {
            id: NodeId(id),
            level,
            parent,
            name: name.to_string(),
            code: None,
            description: None,
        }
    }

    /// Level the parent reference points at.
    pub fn parent_level(&self) -> Option<Level> {
        self.level.parent()
    }

    /// Whether the parent reference has the right kind for this node's level.
    ///
    /// Business units must point at a company and every other level at a node.
    /// A node claiming to be a company never matches.
    pub fn parent_level_matches(&self) -> bool {
        match (self.parent_level(), &self.parent) {
            (Some(Level::Company), ParentRef::Company(_)) => true,
            (Some(Level::Company), ParentRef::Node(_)) => false,
            (Some(_), ParentRef::Node(_)) => true,
            (Some(_), ParentRef::Company(_)) => false,
            (None, _) => false,
        }
    }

    /// Parent node id, when the parent is a node.
    pub fn parent_node_id(&self) -> Option<NodeId> {
        match &self.parent {
            ParentRef::Node(id) => Some(*id),
            ParentRef::Company(_) => None,
        }
    }
}

/// One persisted row: either a company or a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HierarchyRow {
    Company(Company),
    Node(Node),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_ref_distinguishes_companies_from_nodes() {
        let node: ParentRef = serde_json::from_str("12").expect("integer parent should parse");
        assert_eq!(node, ParentRef::Node(NodeId(12)));

        let company: ParentRef =
            serde_json::from_str("\"acme\"").expect("string parent should parse");
        assert_eq!(company, ParentRef::Company(CompanyId::new("acme")));
    }

    #[test]
    fn node_row_parses_with_optional_fields() {
        let raw =
            r#"{"kind":"node","id":3,"level":"site","parent_id":2,"name":"Mine A","code":"MA"}"#;
        let row: HierarchyRow = serde_json::from_str(raw).expect("node row should parse");
        match row {
            HierarchyRow::Node(node) => {
                assert_eq!(node.level, Level::Site);
                assert_eq!(node.parent_node_id(), Some(NodeId(2)));
                assert_eq!(node.code.as_deref(), Some("MA"));
                assert!(node.description.is_none());
            }
            other => panic!("expected node row, got {other:?}"),
        }
    }

    #[test]
    fn company_row_parses() {
        let raw = r#"{"kind":"company","id":"acme","name":"Acme Mining"}"#;
        let row: HierarchyRow = serde_json::from_str(raw).expect("company row should parse");
        assert!(matches!(row, HierarchyRow::Company(c) if c.id.as_str() == "acme"));
    }

    #[test]
    fn parent_kind_must_match_level() {
        let acme = ParentRef::Company(CompanyId::new("acme"));
        let west = Node::new(1, Level::BusinessUnit, acme.clone(), "West");
        assert!(west.parent_level_matches());
        let pilbara = Node::new(2, Level::Region, acme.clone(), "Pilbara");
        assert!(!pilbara.parent_level_matches());
        let east = Node::new(3, Level::BusinessUnit, ParentRef::Node(NodeId(1)), "East");
        assert!(!east.parent_level_matches());
        let root = Node::new(4, Level::Company, acme, "Acme");
        assert!(!root.parent_level_matches());
    }
}
