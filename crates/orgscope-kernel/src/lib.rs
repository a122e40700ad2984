//! # Orgscope Kernel
//!
//! The organizational hierarchy as data: a fixed ladder of levels from the
//! tenant's company down to roles, and the pure computations over it.
//!
//! Nothing here performs I/O. Stores (`orgscope-store`) hand over nodes and
//! trees; the resolver (`orgscope-resolve`) walks them.
//!
//! ## Architecture
//!
//! ```text
//! Level                 ← Company → Business Unit → … → Role (the schema)
//!     │
//! Node / Company        ← Rows with a parent reference one level up
//!     │
//! LocationSelection     ← Prefix-closed keys produced by ancestor walks
//! TenantTree            ← Full tree below one company
//!     │
//! flatten               ← Role and location lists for pickers
//! scope                 ← Program scope and assessment readiness checks
//! ```

pub mod config;
pub mod digest;
pub mod error;
pub mod flatten;
pub mod level;
pub mod node;
pub mod scope;
pub mod selection;
pub mod tree;

pub use config::{ConfigError, HierarchyConfig};
pub use digest::ListDigest;
pub use error::HierarchyError;
pub use flatten::{
    DEFAULT_PATH_SEPARATOR, FlattenedNodeEntry, FlattenedRoleEntry, entries_digest, flatten_level,
    flatten_roles, search_roles,
};
pub use level::Level;
pub use node::{Company, CompanyId, HierarchyRow, Node, NodeId, ParentRef, TenantId};
pub use scope::{
    AssessmentReadiness, Prerequisite, Program, ProgramScope, is_questionnaire_assignment_valid,
    is_scope_valid, validate_for_assessment_creation,
};
pub use selection::LocationSelection;
pub use tree::{TenantTree, TreeNode};
