//! Canonical in-memory index of companies and nodes.
//!
//! Nodes are keyed by `(level, id)` since ids are only unique per level.
//! The store does not filter by tenant: a lookup returns whatever row
//! exists, and tenant ownership is decided by whoever walks the chain.

use crate::jsonl::{JsonlError, read_rows_from_path, write_rows_to_path};
use orgscope_kernel::{
    Company, CompanyId, HierarchyRow, Level, Node, NodeId, ParentRef, TenantTree, TreeNode,
};
use std::collections::BTreeMap;
use std::path::Path;

/// Errors raised while loading or querying the memory store.
#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error(transparent)]
    Jsonl(#[from] JsonlError),

    #[error("{level} {id}: parent reference {parent} has the wrong kind for this level")]
    ParentLevelMismatch {
        level: Level,
        id: NodeId,
        parent: String,
    },

    #[error("company {0} not found")]
    CompanyNotFound(CompanyId),
}

/// A parent reference that points at nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingParent {
    pub level: Level,
    pub id: NodeId,
    pub parent: ParentRef,
}

type ChildIndex<'a> = BTreeMap<(Level, NodeId), Vec<&'a Node>>;

fn subtree(node: &Node, index: &ChildIndex<'_>) -> TreeNode {
    let children = match index.get(&(node.level, node.id)) {
        Some(kids) => kids.iter().map(|kid| subtree(kid, index)).collect(),
        None => Vec::new(),
    };
    TreeNode::leaf(node).with_children(children)
}

/// Canonical in-memory state for one or more tenants.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    companies: BTreeMap<CompanyId, Company>,
    nodes: BTreeMap<(Level, NodeId), Node>,
}

impl MemoryStore {
    /// Build a store from rows.
    ///
    /// Duplicate keys are resolved last-write-wins, matching append/overlay
    /// JSONL workflows. Nodes whose parent reference has the wrong kind for
    /// their level are rejected outright; a missing parent is allowed here
    /// and surfaces as an unreachable node (see [`MemoryStore::check_integrity`]).
    pub fn from_rows(rows: Vec<HierarchyRow>) -> Result<Self, MemoryStoreError> {
        let mut store = Self::default();
        for row in rows {
            match row {
                HierarchyRow::Company(company) => {
                    store.upsert_company(company);
                }
                HierarchyRow::Node(node) => {
                    store.upsert_node(node)?;
                }
            }
        }
        Ok(store)
    }

    /// Load store state from a JSONL file.
    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Self, MemoryStoreError> {
        let path = path.as_ref();
        let store = Self::from_rows(read_rows_from_path(path)?)?;
        tracing::info!(
            path = %path.display(),
            companies = store.companies.len(),
            nodes = store.nodes.len(),
            "loaded hierarchy store"
        );
        Ok(store)
    }

    /// Persist store state to a JSONL file, companies first.
    pub fn save_jsonl(&self, path: impl AsRef<Path>) -> Result<(), MemoryStoreError> {
        write_rows_to_path(path, &self.rows())?;
        Ok(())
    }

    /// All rows in deterministic order: companies, then nodes by level and id.
    pub fn rows(&self) -> Vec<HierarchyRow> {
        self.companies
            .values()
            .cloned()
            .map(HierarchyRow::Company)
            .chain(self.nodes.values().cloned().map(HierarchyRow::Node))
            .collect()
    }

    /// Total number of nodes below all companies.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn company(&self, id: &CompanyId) -> Option<&Company> {
        self.companies.get(id)
    }

    pub fn node(&self, level: Level, id: NodeId) -> Option<&Node> {
        self.nodes.get(&(level, id))
    }

    /// Insert or replace a company. Returns the previous value if present.
    pub fn upsert_company(&mut self, company: Company) -> Option<Company> {
        self.companies.insert(company.id.clone(), company)
    }

    /// Insert or replace a node. Returns the previous value if present.
    pub fn upsert_node(&mut self, node: Node) -> Result<Option<Node>, MemoryStoreError> {
        if !node.parent_level_matches() {
            return Err(MemoryStoreError::ParentLevelMismatch {
                level: node.level,
                id: node.id,
                parent: node.parent.to_string(),
            });
        }
        Ok(self.nodes.insert((node.level, node.id), node))
    }

    /// Direct children of a node, ordered by id.
    pub fn children_of(&self, level: Level, id: NodeId) -> Vec<&Node> {
        let Some(child_level) = level.child() else {
            return Vec::new();
        };
        self.nodes_at(child_level)
            .filter(|node| node.parent == ParentRef::Node(id))
            .collect()
    }

    /// Business units of a company, ordered by id.
    pub fn business_units_of(&self, company: &CompanyId) -> Vec<&Node> {
        self.nodes_at(Level::BusinessUnit)
            .filter(|node| matches!(&node.parent, ParentRef::Company(c) if c == company))
            .collect()
    }

    fn nodes_at(&self, level: Level) -> impl Iterator<Item = &Node> {
        self.nodes
            .range((level, NodeId(i64::MIN))..=(level, NodeId(i64::MAX)))
            .map(|(_, node)| node)
    }

    /// Full tree below `company`, children ordered by id.
    ///
    /// Nodes whose parent is missing are unreachable and left out.
    pub fn tenant_tree(&self, company: &CompanyId) -> Result<TenantTree, MemoryStoreError> {
        let root = self
            .company(company)
            .ok_or_else(|| MemoryStoreError::CompanyNotFound(company.clone()))?;
        let index = self.child_index();
        let mut tree = TenantTree::new(root.id.clone(), root.name.clone());
        tree.business_units = self
            .business_units_of(company)
            .into_iter()
            .map(|unit| subtree(unit, &index))
            .collect();
        Ok(tree)
    }

    /// Children grouped under their parent's `(level, id)` key.
    ///
    /// Built in one pass over the node map, so each list is already ordered
    /// by id.
    fn child_index(&self) -> ChildIndex<'_> {
        let mut index = ChildIndex::new();
        for node in self.nodes.values() {
            if let (Some(level), Some(parent)) = (node.parent_level(), node.parent_node_id()) {
                index.entry((level, parent)).or_default().push(node);
            }
        }
        index
    }

    /// Parent references that point at no stored row.
    pub fn check_integrity(&self) -> Vec<DanglingParent> {
        self.nodes
            .values()
            .filter(|node| match (&node.parent, node.parent_level()) {
                (ParentRef::Company(company), _) => self.company(company).is_none(),
                (ParentRef::Node(parent), Some(parent_level)) => {
                    self.node(parent_level, *parent).is_none()
                }
                (ParentRef::Node(_), None) => true,
            })
            .map(|node| DanglingParent {
                level: node.level,
                id: node.id,
                parent: node.parent.clone(),
            })
            .collect()
    }
}
