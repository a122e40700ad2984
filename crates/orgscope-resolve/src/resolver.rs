//! Upward walks from any node to its owning company.
//!
//! One generic walk driven by [`Level::parent`]: fetch the node, follow its
//! parent reference one level up, repeat until a business unit hands over
//! its company. Each step moves strictly toward the root, so the walk ends
//! after at most six fetches.
//!
//! Resolution is all-or-nothing. A missing link anywhere, or a root company
//! other than the caller's tenant, fails the whole call; no partially
//! populated selection ever leaves this module.

use orgscope_kernel::{
    Company, CompanyId, HierarchyError, Level, LocationSelection, Node, NodeId, ParentRef,
    TenantId,
};
use orgscope_store::NodeSource;
use serde::Serialize;

/// A validated ancestor chain: the tenant's company and every node from the
/// business unit down to the starting node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncestorChain {
    pub company: Company,
    /// Root-to-leaf; the last entry is the node the walk started at.
    pub nodes: Vec<Node>,
}

impl AncestorChain {
    /// The node the walk started at.
    pub fn leaf(&self) -> Option<&Node> {
        self.nodes.last()
    }

    /// The chain's node at `level`, if the chain reaches that deep.
    pub fn at(&self, level: Level) -> Option<&Node> {
        self.nodes.iter().find(|node| node.level == level)
    }

    /// Keys for every level in the chain.
    ///
    /// Fails with `InvalidLevel` if a company-level node was put in `nodes`.
    pub fn selection(&self) -> Result<LocationSelection, HierarchyError> {
        let mut selection = LocationSelection::default();
        for node in &self.nodes {
            selection.set(node.level, node.id)?;
        }
        Ok(selection)
    }

    /// Node names joined root-to-leaf, company excluded.
    pub fn display_path(&self, separator: &str) -> String {
        self.nodes
            .iter()
            .map(|node| node.name.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// Resolves ancestor chains against a [`NodeSource`], validating tenant
/// ownership at the root.
#[derive(Debug, Clone)]
pub struct AncestorResolver<S> {
    source: S,
}

impl<S: NodeSource> AncestorResolver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve the full [`LocationSelection`] for `node_id` at `level`.
    ///
    /// Fails with `InvalidLevel` for the company level, `NotFound` when the
    /// node or any ancestor is missing, and `TenantMismatch` when the chain
    /// ends at a company other than `tenant`.
    pub async fn resolve_ancestors(
        &self,
        node_id: NodeId,
        level: Level,
        tenant: &TenantId,
    ) -> Result<LocationSelection, HierarchyError> {
        self.resolve_chain(node_id, level, tenant)
            .await?
            .selection()
    }

    /// Like [`AncestorResolver::resolve_ancestors`], with the level given as
    /// its snake_case name.
    pub async fn resolve_ancestors_named(
        &self,
        node_id: NodeId,
        level: &str,
        tenant: &TenantId,
    ) -> Result<LocationSelection, HierarchyError> {
        let level: Level = level.parse()?;
        self.resolve_ancestors(node_id, level, tenant).await
    }

    /// Resolve and return the nodes themselves, root-to-leaf.
    pub async fn resolve_chain(
        &self,
        node_id: NodeId,
        level: Level,
        tenant: &TenantId,
    ) -> Result<AncestorChain, HierarchyError> {
        if !level.is_resolvable() {
            return Err(HierarchyError::InvalidLevel(format!(
                "{level} is the tenant root and has no ancestors"
            )));
        }

        let start = self.fetch_exact(level, node_id).await?;
        let mut nodes = vec![start];
        let root = loop {
            let current = nodes
                .last()
                .ok_or_else(|| HierarchyError::not_found(level, node_id))?;
            let (current_level, current_id) = (current.level, current.id);
            match (current.parent_level(), current.parent.clone()) {
                (Some(Level::Company), ParentRef::Company(company_id)) => break company_id,
                (Some(parent_level), ParentRef::Node(parent_id))
                    if parent_level != Level::Company =>
                {
                    tracing::debug!(
                        from_level = %current_level,
                        from_id = %current_id,
                        parent_level = %parent_level,
                        parent_id = %parent_id,
                        "following parent link"
                    );
                    let parent = self.fetch_exact(parent_level, parent_id).await?;
                    nodes.push(parent);
                }
                (parent_level, parent) => {
                    tracing::warn!(
                        level = %current_level,
                        id = %current_id,
                        parent = %parent,
                        "parent reference does not match the level schema"
                    );
                    return Err(HierarchyError::not_found(
                        parent_level.unwrap_or(Level::ROOT),
                        parent,
                    ));
                }
            }
        };

        if &root != tenant {
            tracing::warn!(
                node_level = %level,
                node_id = %node_id,
                tenant = %tenant,
                "ancestor chain resolved to a different tenant"
            );
            return Err(HierarchyError::TenantMismatch {
                expected: tenant.to_string(),
                actual: root.to_string(),
            });
        }

        let company = self.fetch_company(&root).await?;
        nodes.reverse();
        tracing::debug!(
            node_level = %level,
            node_id = %node_id,
            depth = nodes.len(),
            "resolved ancestor chain"
        );
        Ok(AncestorChain { company, nodes })
    }

    /// Check a persisted selection against the stored hierarchy.
    ///
    /// The selection must be prefix-closed, its deepest id must resolve for
    /// `tenant`, and every stored key must equal the resolved ancestor.
    pub async fn verify_selection(
        &self,
        selection: &LocationSelection,
        tenant: &TenantId,
    ) -> Result<(), HierarchyError> {
        selection.check_shape()?;
        let Some((level, id)) = selection.deepest() else {
            return Ok(());
        };
        let resolved = self.resolve_ancestors(id, level, tenant).await?;
        if let Some((mismatch, stored)) = selection
            .populated()
            .find(|(level, stored)| resolved.get(*level) != Some(*stored))
        {
            return Err(HierarchyError::IncompleteSelection(format!(
                "{} {stored} is not an ancestor of {} {id}",
                mismatch.key(),
                level.key()
            )));
        }
        Ok(())
    }

    async fn fetch_exact(&self, level: Level, id: NodeId) -> Result<Node, HierarchyError> {
        match self.source.fetch_node(level, id).await? {
            Some(node) if node.level == level && node.id == id => Ok(node),
            Some(node) => {
                tracing::warn!(
                    requested_level = %level,
                    requested_id = %id,
                    returned_level = %node.level,
                    returned_id = %node.id,
                    "node store returned a different node"
                );
                Err(HierarchyError::not_found(level, id))
            }
            None => Err(HierarchyError::not_found(level, id)),
        }
    }

    async fn fetch_company(&self, id: &CompanyId) -> Result<Company, HierarchyError> {
        self.source
            .fetch_company(id)
            .await?
            .filter(|company| &company.id == id)
            .ok_or_else(|| HierarchyError::not_found(Level::Company, id))
    }
}
