//! Program scope checks.
//!
//! Scope and questionnaire are checked independently and then combined, so
//! a caller can tell the user which prerequisite is missing.

use crate::error::HierarchyError;
use crate::level::Level;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The part of the hierarchy a program applies to.
///
/// A company-wide scope covers everything and carries no ids. Persisted
/// scopes deserialize through [`ProgramScope::new`], so a stored
/// `work_group` scope is rejected on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredScope")]
pub struct ProgramScope {
    pub scope_level: Level,
    pub selected_ids: BTreeSet<NodeId>,
}

/// Wire shape of a persisted scope, before level checks.
#[derive(Deserialize)]
struct StoredScope {
    scope_level: Level,
    #[serde(default)]
    selected_ids: BTreeSet<NodeId>,
}

impl TryFrom<StoredScope> for ProgramScope {
    type Error = HierarchyError;

    fn try_from(stored: StoredScope) -> Result<Self, Self::Error> {
        ProgramScope::new(stored.scope_level, stored.selected_ids)
    }
}

impl ProgramScope {
    /// Build a scope, rejecting levels programs cannot target.
    pub fn new(
        scope_level: Level,
        selected_ids: impl IntoIterator<Item = NodeId>,
    ) -> Result<Self, HierarchyError> {
        if !scope_level.is_program_scope_level() {
            return Err(HierarchyError::InvalidLevel(format!(
                "{scope_level} cannot be used as a program scope"
            )));
        }
        let selected_ids = if scope_level == Level::Company {
            BTreeSet::new()
        } else {
            selected_ids.into_iter().collect()
        };
        Ok(Self {
            scope_level,
            selected_ids,
        })
    }

    pub fn company_wide() -> Self {
        Self {
            scope_level: Level::Company,
            selected_ids: BTreeSet::new(),
        }
    }

    pub fn is_company_wide(&self) -> bool {
        self.scope_level == Level::Company
    }

    pub fn is_valid(&self) -> bool {
        is_scope_valid(self.scope_level, &self.selected_ids)
    }

    /// Whether the scope covers the node `id` at `level`.
    ///
    /// Only direct membership at the scope level is checked; callers resolve
    /// a deeper node to its ancestor at the scope level first.
    pub fn covers(&self, level: Level, id: NodeId) -> bool {
        self.is_company_wide() || (level == self.scope_level && self.selected_ids.contains(&id))
    }
}

/// A program as far as assessment creation cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub questionnaire_id: Option<i64>,
    pub scope: ProgramScope,
}

/// A prerequisite for creating assessments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prerequisite {
    Scope,
    Questionnaire,
}

/// Outcome of [`validate_for_assessment_creation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentReadiness {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<Prerequisite>,
}

impl AssessmentReadiness {
    pub fn into_result(self) -> Result<(), HierarchyError> {
        match self.reason {
            Some(reason) if !self.is_valid => Err(HierarchyError::IncompleteSelection(reason)),
            _ => Ok(()),
        }
    }
}

/// True for a company-wide scope, otherwise when at least one id is selected.
///
/// Which ids were picked is not re-checked here; the picker that produced
/// them already went through the resolver.
pub fn is_scope_valid(level: Level, selected_ids: &BTreeSet<NodeId>) -> bool {
    level == Level::Company || !selected_ids.is_empty()
}

pub fn is_questionnaire_assignment_valid(program: &Program) -> bool {
    program.questionnaire_id.is_some()
}

/// Both checks, against the ids currently selected in the UI rather than
/// the persisted ones.
pub fn validate_for_assessment_creation(
    program: &Program,
    current_ids: &BTreeSet<NodeId>,
) -> AssessmentReadiness {
    let level = program.scope.scope_level;
    let mut missing = Vec::new();
    if !is_scope_valid(level, current_ids) {
        missing.push(Prerequisite::Scope);
    }
    if !is_questionnaire_assignment_valid(program) {
        missing.push(Prerequisite::Questionnaire);
    }

    let reason = match missing.as_slice() {
        [] => None,
        [Prerequisite::Scope] => Some(format!(
            "Select at least one {} for the program scope before creating assessments",
            level.label().to_lowercase()
        )),
        [Prerequisite::Questionnaire] => {
            Some("Assign a questionnaire to the program before creating assessments".to_string())
        }
        _ => Some(format!(
            "Select at least one {} for the program scope and assign a questionnaire before creating assessments",
            level.label().to_lowercase()
        )),
    };

    AssessmentReadiness {
        is_valid: missing.is_empty(),
        reason,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[i64]) -> BTreeSet<NodeId> {
        raw.iter().copied().map(NodeId).collect()
    }

    fn program(level: Level, selected: &[i64], questionnaire_id: Option<i64>) -> Program {
        let scope = ProgramScope::new(level, ids(selected)).expect("scope level should be valid");
        Program {
            id: 1,
            name: "Fatigue review".to_string(),
            questionnaire_id,
            scope,
        }
    }

    #[test]
    fn company_scope_is_always_valid() {
        assert!(is_scope_valid(Level::Company, &ids(&[])));
        assert!(is_scope_valid(Level::Company, &ids(&[1, 2])));
        assert!(ProgramScope::company_wide().is_valid());
    }

    #[test]
    fn empty_selection_is_invalid_below_company() {
        for level in Level::below_company() {
            assert!(!is_scope_valid(level, &ids(&[])), "{level} with no ids");
            assert!(is_scope_valid(level, &ids(&[7])), "{level} with one id");
        }
    }

    #[test]
    fn site_scope_becomes_valid_once_selected() {
        let mut scope = ProgramScope::new(Level::Site, []).expect("site is a scope level");
        assert!(!scope.is_valid());
        scope.selected_ids.insert(NodeId(30));
        assert!(scope.is_valid());
    }

    #[test]
    fn work_group_is_not_a_program_scope() {
        let err = ProgramScope::new(Level::WorkGroup, [NodeId(1)])
            .expect_err("work group scope must be rejected");
        assert!(matches!(err, HierarchyError::InvalidLevel(_)));
    }

    #[test]
    fn company_scope_drops_explicit_ids() {
        let scope = ProgramScope::new(Level::Company, [NodeId(1)]).expect("company is a scope");
        assert!(scope.selected_ids.is_empty());
        assert!(scope.covers(Level::Role, NodeId(99)));
    }

    #[test]
    fn stored_work_group_scope_is_rejected_on_read() {
        let raw = r#"{"scope_level":"work_group","selected_ids":[1]}"#;
        let err = serde_json::from_str::<ProgramScope>(raw)
            .expect_err("work group scope must not deserialize");
        assert!(err.to_string().contains("program scope"));

        let raw_program = r#"{
            "id": 7,
            "name": "Shift handover",
            "questionnaire_id": 3,
            "scope": {"scope_level": "work_group", "selected_ids": [40]}
        }"#;
        assert!(serde_json::from_str::<Program>(raw_program).is_err());
    }

    #[test]
    fn stored_company_scope_loses_its_ids() {
        let raw = r#"{"scope_level":"company","selected_ids":[1,2]}"#;
        let scope: ProgramScope = serde_json::from_str(raw).expect("company scope should parse");
        assert_eq!(scope, ProgramScope::company_wide());

        let raw = r#"{"scope_level":"site"}"#;
        let scope: ProgramScope = serde_json::from_str(raw).expect("site scope should parse");
        assert!(scope.selected_ids.is_empty());
        assert!(!scope.is_valid());
    }

    #[test]
    fn covers_checks_level_and_membership() {
        let scope = ProgramScope::new(Level::Site, [NodeId(30)]).expect("site is a scope level");
        assert!(scope.covers(Level::Site, NodeId(30)));
        assert!(!scope.covers(Level::Site, NodeId(31)));
        assert!(!scope.covers(Level::Region, NodeId(30)));
    }

    #[test]
    fn questionnaire_check_is_independent_of_scope() {
        let assigned = program(Level::Site, &[], Some(5));
        let unassigned = program(Level::Company, &[], None);
        assert!(is_questionnaire_assignment_valid(&assigned));
        assert!(!is_questionnaire_assignment_valid(&unassigned));
    }

    #[test]
    fn readiness_reports_each_missing_prerequisite() {
        let site = program(Level::Site, &[30], Some(5));
        let ready = validate_for_assessment_creation(&site, &ids(&[30]));
        assert!(ready.is_valid);
        assert!(ready.reason.is_none());
        ready.into_result().expect("ready program should pass");

        let no_scope = validate_for_assessment_creation(&site, &ids(&[]));
        assert_eq!(no_scope.missing, vec![Prerequisite::Scope]);
        let reason = no_scope.reason.unwrap_or_default();
        assert!(reason.contains("site"));

        let region = program(Level::Region, &[20], None);
        let no_questionnaire = validate_for_assessment_creation(&region, &ids(&[20]));
        assert_eq!(no_questionnaire.missing, vec![Prerequisite::Questionnaire]);
        let reason = no_questionnaire.reason.unwrap_or_default();
        assert!(reason.contains("questionnaire"));
        assert!(!reason.contains("scope"));

        let asset_group = program(Level::AssetGroup, &[], None);
        let neither = validate_for_assessment_creation(&asset_group, &ids(&[]));
        let both = vec![Prerequisite::Scope, Prerequisite::Questionnaire];
        assert_eq!(neither.missing, both);
        let reason = neither.reason.clone().expect("failure must carry a reason");
        assert!(reason.contains("asset group"));
        assert!(reason.contains("questionnaire"));

        let err = neither
            .into_result()
            .expect_err("incomplete program must fail");
        assert!(matches!(err, HierarchyError::IncompleteSelection(_)));
    }

    #[test]
    fn company_wide_program_only_needs_questionnaire() {
        let company = program(Level::Company, &[], Some(1));
        let readiness = validate_for_assessment_creation(&company, &ids(&[]));
        assert!(readiness.is_valid);
    }
}
