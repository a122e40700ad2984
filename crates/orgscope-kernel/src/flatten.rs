//! Flatten a tenant tree into searchable selection lists.
//!
//! The walk is depth-first in the tree's own child order: business unit,
//! then region, then site, and so on. Output order is traversal order and is
//! never re-sorted, so a picker built from it stays stable between renders
//! as long as the store hands back the same tree.
//!
//! Paths join ancestor names (company excluded) with a separator; the
//! default is [`DEFAULT_PATH_SEPARATOR`], giving
//! `West > Pilbara > Mine A > Crushers > Maintenance` for a role.

use crate::digest::ListDigest;
use crate::level::Level;
use crate::node::NodeId;
use crate::tree::{TenantTree, TreeNode};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PATH_SEPARATOR: &str = " > ";

/// A role with its ancestry rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedRoleEntry {
    pub id: NodeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    /// Ancestor names above the role, root first.
    pub path: String,
    pub work_group_name: String,
    /// Clusters roles of the same work group; equal to `path`.
    pub group_key: String,
}

/// A node at any level with its ancestry rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedNodeEntry {
    pub id: NodeId,
    pub level: Level,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub path: String,
    pub group_key: String,
}

/// Depth-first walk emitting every node at `target` together with its
/// ancestor names. Subtrees below `target` are not entered.
fn walk<'a>(
    nodes: &'a [TreeNode],
    target: Level,
    ancestors: &mut Vec<&'a str>,
    emit: &mut dyn FnMut(&'a TreeNode, &[&'a str]),
) {
    for node in nodes {
        if node.level == target {
            emit(node, ancestors.as_slice());
        } else if node.level < target {
            ancestors.push(&node.name);
            walk(&node.children, target, ancestors, emit);
            ancestors.pop();
        }
    }
}

/// One entry per role leaf, in traversal order.
///
/// Empty trees and branches without roles contribute nothing.
pub fn flatten_roles(tree: &TenantTree, separator: &str) -> Vec<FlattenedRoleEntry> {
    let mut entries = Vec::new();
    let mut ancestors = Vec::new();
    walk(
        &tree.business_units,
        Level::Role,
        &mut ancestors,
        &mut |role, path| {
            let joined = path.join(separator);
            entries.push(FlattenedRoleEntry {
                id: role.id,
                name: role.name.clone(),
                code: role.code.clone(),
                description: role.description.clone(),
                level: Some(Level::Role),
                work_group_name: path.last().map(|name| name.to_string()).unwrap_or_default(),
                group_key: joined.clone(),
                path: joined,
            });
        },
    );
    entries
}

/// One entry per node at `level`, in traversal order.
///
/// Used by location pickers that stop above the role level. The company is
/// not a pickable location and yields nothing.
pub fn flatten_level(tree: &TenantTree, level: Level, separator: &str) -> Vec<FlattenedNodeEntry> {
    let mut entries = Vec::new();
    if level == Level::Company {
        return entries;
    }
    let mut ancestors = Vec::new();
    walk(
        &tree.business_units,
        level,
        &mut ancestors,
        &mut |node, path| {
            let joined = path.join(separator);
            entries.push(FlattenedNodeEntry {
                id: node.id,
                level: node.level,
                name: node.name.clone(),
                code: node.code.clone(),
                description: node.description.clone(),
                group_key: joined.clone(),
                path: joined,
            });
        },
    );
    entries
}

/// Case-insensitive substring search over name, code and path.
///
/// Keeps input order. A blank query matches everything. At most `limit`
/// entries are returned.
pub fn search_roles<'a>(
    entries: &'a [FlattenedRoleEntry],
    query: &str,
    limit: usize,
) -> Vec<&'a FlattenedRoleEntry> {
    let needle = query.trim().to_lowercase();
    entries
        .iter()
        .filter(|entry| {
            needle.is_empty()
                || entry.name.to_lowercase().contains(&needle)
                || entry.path.to_lowercase().contains(&needle)
                || entry
                    .code
                    .as_deref()
                    .is_some_and(|code| code.to_lowercase().contains(&needle))
        })
        .take(limit)
        .collect()
}

/// Digest of a flattened role list, order included.
pub fn entries_digest(entries: &[FlattenedRoleEntry]) -> ListDigest {
    entries
        .iter()
        .fold(ListDigest::builder(), |builder, entry| {
            builder
                .field_int("id", entry.id.0)
                .field("name", &entry.name)
                .field_opt("code", entry.code.as_deref())
                .field_opt("description", entry.description.as_deref())
                .field("path", &entry.path)
        })
        .finish()
}
