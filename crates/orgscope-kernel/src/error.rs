//! Error types for hierarchy resolution and scope checks.

use crate::level::Level;

/// Message shown to end users for both missing and foreign nodes.
pub const NOT_ACCESSIBLE_MESSAGE: &str = "not found or not accessible";

/// Errors arising from hierarchy walks, level parsing, or scope checks.
///
/// None of these are retried automatically: they are deterministic in the
/// input and the stored data. `Storage` is the exception, since it reports a
/// failure of the external store rather than of the data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    /// A referenced node does not exist at the expected level.
    #[error("{level} {id} not found")]
    NotFound { level: Level, id: String },

    /// The ancestor chain terminates at a company other than the caller's tenant.
    #[error("tenant mismatch: expected company {expected}, resolved {actual}")]
    TenantMismatch { expected: String, actual: String },

    /// A level string is not one of the recognized levels, or the level is
    /// not usable for the requested operation.
    #[error("invalid level: {0}")]
    InvalidLevel(String),

    /// A location selection or program configuration is missing a prerequisite.
    #[error("incomplete selection: {0}")]
    IncompleteSelection(String),

    /// The node store failed to answer.
    #[error("storage error: {0}")]
    Storage(String),
}

impl HierarchyError {
    pub fn not_found(level: Level, id: impl ToString) -> Self {
        Self::NotFound {
            level,
            id: id.to_string(),
        }
    }

    /// Whether the error means "this node is not yours to see".
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::TenantMismatch { .. })
    }

    /// Text safe to render to an end user.
    ///
    /// `NotFound` and `TenantMismatch` collapse into one message so a caller
    /// cannot probe for another tenant's ids.
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound { .. } | Self::TenantMismatch { .. } => {
                NOT_ACCESSIBLE_MESSAGE.to_string()
            }
            Self::InvalidLevel(level) => format!("unknown hierarchy level: {level}"),
            Self::IncompleteSelection(reason) => reason.clone(),
            Self::Storage(_) => "hierarchy data is temporarily unavailable".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_foreign_nodes_share_public_message() {
        let missing = HierarchyError::not_found(Level::Role, 42);
        let foreign = HierarchyError::TenantMismatch {
            expected: "acme".to_string(),
            actual: "globex".to_string(),
        };

        assert!(missing.is_access_denied());
        assert!(foreign.is_access_denied());
        assert_eq!(missing.public_message(), foreign.public_message());
        assert!(!foreign.public_message().contains("globex"));
    }

    #[test]
    fn incomplete_selection_is_not_access_denied() {
        let err = HierarchyError::IncompleteSelection("select a site".to_string());
        assert!(!err.is_access_denied());
        assert_eq!(err.public_message(), "select a site");
    }

    #[test]
    fn not_found_display_names_the_level() {
        let err = HierarchyError::not_found(Level::AssetGroup, 7);
        assert_eq!(err.to_string(), "asset_group 7 not found");
    }
}
