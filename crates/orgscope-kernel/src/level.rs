//! The fixed level schema of the organizational tree.
//!
//! ```text
//! Company → Business Unit → Region → Site → Asset Group → Work Group → Role
//! ```
//!
//! Every walk in this workspace goes through [`Level::parent`] and
//! [`Level::child`]; nothing else encodes the ordering.

use crate::error::HierarchyError;
use std::str::FromStr;

/// One rank in the organizational tree, ordered root-to-leaf.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Tenant root and ownership anchor.
    Company,
    BusinessUnit,
    Region,
    Site,
    AssetGroup,
    WorkGroup,
    /// Leaf level.
    Role,
}

impl Level {
    /// All levels, root first.
    pub const ALL: [Level; 7] = [
        Level::Company,
        Level::BusinessUnit,
        Level::Region,
        Level::Site,
        Level::AssetGroup,
        Level::WorkGroup,
        Level::Role,
    ];

    /// The root level.
    pub const ROOT: Level = Level::Company;

    /// The leaf level.
    pub const LEAF: Level = Level::Role;

    /// Immediate parent level; `None` for the company.
    pub fn parent(self) -> Option<Level> {
        match self {
            Level::Company => None,
            Level::BusinessUnit => Some(Level::Company),
            Level::Region => Some(Level::BusinessUnit),
            Level::Site => Some(Level::Region),
            Level::AssetGroup => Some(Level::Site),
            Level::WorkGroup => Some(Level::AssetGroup),
            Level::Role => Some(Level::WorkGroup),
        }
    }

    /// Immediate child level; `None` for roles.
    pub fn child(self) -> Option<Level> {
        Level::ALL
            .into_iter()
            .find(|level| level.parent() == Some(self))
    }

    /// Identifying key name of the level (`site_id` for sites).
    pub fn key(self) -> &'static str {
        match self {
            Level::Company => "company_id",
            Level::BusinessUnit => "business_unit_id",
            Level::Region => "region_id",
            Level::Site => "site_id",
            Level::AssetGroup => "asset_group_id",
            Level::WorkGroup => "work_group_id",
            Level::Role => "role_id",
        }
    }

    /// Canonical snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Company => "company",
            Level::BusinessUnit => "business_unit",
            Level::Region => "region",
            Level::Site => "site",
            Level::AssetGroup => "asset_group",
            Level::WorkGroup => "work_group",
            Level::Role => "role",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Level::Company => "Company",
            Level::BusinessUnit => "Business Unit",
            Level::Region => "Region",
            Level::Site => "Site",
            Level::AssetGroup => "Asset Group",
            Level::WorkGroup => "Work Group",
            Level::Role => "Role",
        }
    }

    /// Distance from the root (company is 0).
    pub fn depth(self) -> usize {
        self.ancestors().count()
    }

    /// Whether ancestor resolution can start at this level.
    ///
    /// The company is the anchor the walk ends at, not a starting point.
    pub fn is_resolvable(self) -> bool {
        self != Level::Company
    }

    /// Whether a program may declare its scope at this level.
    pub fn is_program_scope_level(self) -> bool {
        !matches!(self, Level::WorkGroup)
    }

    /// Levels above `self`, nearest first, ending at the company.
    pub fn ancestors(self) -> impl Iterator<Item = Level> {
        std::iter::successors(self.parent(), |level| level.parent())
    }

    /// Levels from the company down to and including `self`.
    pub fn path_from_root(self) -> Vec<Level> {
        let mut path: Vec<Level> = self.ancestors().collect();
        path.reverse();
        path.push(self);
        path
    }

    /// Levels strictly below the company, root-to-leaf.
    pub fn below_company() -> impl Iterator<Item = Level> {
        Level::ALL.into_iter().filter(|level| level.is_resolvable())
    }
}

impl FromStr for Level {
    type Err = HierarchyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| HierarchyError::InvalidLevel(s.to_string()))
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
