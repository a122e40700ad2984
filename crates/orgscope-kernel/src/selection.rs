//! Location selections: the most specific node a user picked plus its
//! resolved ancestors.

use crate::error::HierarchyError;
use crate::level::Level;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// Sparse set of level keys below the company.
///
/// A well-formed selection is prefix-closed: if a level is populated, every
/// level between it and the company is populated too (see
/// [`LocationSelection::check_shape`]). The resolver only ever produces
/// well-formed selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_unit_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_group_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_group_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<NodeId>,
}

impl LocationSelection {
    fn slot(&self, level: Level) -> Option<&Option<NodeId>> {
        match level {
            Level::Company => None,
            Level::BusinessUnit => Some(&self.business_unit_id),
            Level::Region => Some(&self.region_id),
            Level::Site => Some(&self.site_id),
            Level::AssetGroup => Some(&self.asset_group_id),
            Level::WorkGroup => Some(&self.work_group_id),
            Level::Role => Some(&self.role_id),
        }
    }

    fn slot_mut(&mut self, level: Level) -> Option<&mut Option<NodeId>> {
        match level {
            Level::Company => None,
            Level::BusinessUnit => Some(&mut self.business_unit_id),
            Level::Region => Some(&mut self.region_id),
            Level::Site => Some(&mut self.site_id),
            Level::AssetGroup => Some(&mut self.asset_group_id),
            Level::WorkGroup => Some(&mut self.work_group_id),
            Level::Role => Some(&mut self.role_id),
        }
    }

    /// Id stored for `level`. Always `None` for the company.
    pub fn get(&self, level: Level) -> Option<NodeId> {
        self.slot(level).copied().flatten()
    }

    /// Store `id` for `level`.
    ///
    /// Companies are not part of a selection; setting one is an
    /// [`HierarchyError::InvalidLevel`].
    pub fn set(&mut self, level: Level, id: NodeId) -> Result<(), HierarchyError> {
        let slot = self
            .slot_mut(level)
            .ok_or_else(|| HierarchyError::InvalidLevel(level.to_string()))?;
        *slot = Some(id);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.populated().next().is_none()
    }

    /// Populated levels and ids, root-to-leaf.
    pub fn populated(&self) -> impl Iterator<Item = (Level, NodeId)> + '_ {
        Level::below_company().filter_map(|level| self.get(level).map(|id| (level, id)))
    }

    /// The most specific populated level.
    pub fn deepest(&self) -> Option<(Level, NodeId)> {
        self.populated().last()
    }

    /// Enforce the prefix-closed invariant.
    pub fn check_shape(&self) -> Result<(), HierarchyError> {
        let Some((deepest, _)) = self.deepest() else {
            return Ok(());
        };
        let missing: Vec<&str> = deepest
            .ancestors()
            .filter(|level| level.is_resolvable() && self.get(*level).is_none())
            .map(Level::key)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(HierarchyError::IncompleteSelection(format!(
                "{} is set but {} missing",
                deepest.key(),
                missing.join(", ")
            )))
        }
    }
}
