//! Full tenant trees as handed over by a node store.

use crate::level::Level;
use crate::node::{CompanyId, Node, NodeId};
use serde::{Deserialize, Serialize};

/// One node with its children, one level down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub level: Level,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(node: &Node) -> Self {
        Self {
            id: node.id,
            level: node.level,
            name: node.name.clone(),
            code: node.code.clone(),
            description: node.description.clone(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let below: usize = self.children.iter().map(TreeNode::node_count).sum();
        1 + below
    }

    fn count_at(&self, level: Level) -> usize {
        if self.level == level {
            return 1;
        }
        if self.level > level {
            return 0;
        }
        self.children.iter().map(|c| c.count_at(level)).sum()
    }
}

/// Everything below one company, business units first.
///
/// Children order is traversal order. Nothing downstream re-sorts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantTree {
    pub company_id: CompanyId,
    pub company_name: String,
    #[serde(default)]
    pub business_units: Vec<TreeNode>,
}

impl TenantTree {
    pub fn new(company_id: CompanyId, company_name: impl Into<String>) -> Self {
        Self {
            company_id,
            company_name: company_name.into(),
            business_units: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.business_units.is_empty()
    }

    /// Nodes below the company.
    pub fn node_count(&self) -> usize {
        self.business_units.iter().map(TreeNode::node_count).sum()
    }

    /// Nodes at exactly `level`.
    pub fn count_at(&self, level: Level) -> usize {
        if level == Level::Company {
            return 1;
        }
        self.business_units
            .iter()
            .map(|unit| unit.count_at(level))
            .sum()
    }
}
