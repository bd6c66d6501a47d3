//! Action plan data structures.

use serde::Serialize;

use crate::decision::{Conflict, ConnectionOption, DelegateAccess};
use crate::dns::RecordType;
use crate::email::EmailState;
use crate::snapshot::Snapshot;

/// A change the customer (or we) must make at their DNS host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    AddRecord {
        #[serde(rename = "type")]
        record_type: RecordType,
        host: String,
        value: String,
    },
    ChangeNameservers {
        values: Vec<String>,
    },
}

/// Status tag of one comparison row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Matched,
    Missing,
    Conflict,
    Different,
    External,
    Info,
}

/// One line of the current-versus-target table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub label: String,
    pub current: String,
    pub target: String,
    pub status: RowStatus,
    pub is_required: bool,
    pub is_recommended: bool,
}

impl ComparisonRow {
    pub(crate) fn new(
        label: impl Into<String>,
        current: impl Into<String>,
        target: impl Into<String>,
        status: RowStatus,
    ) -> Self {
        Self {
            label: label.into(),
            current: current.into(),
            target: target.into(),
            status,
            is_required: false,
            is_recommended: false,
        }
    }

    pub(crate) fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub(crate) fn recommended(mut self, recommended: bool) -> Self {
        self.is_recommended = recommended;
        self
    }
}

/// Final result of a diagnosis.
///
/// `recommended_actions` only holds changes to sections that were checked;
/// gaps in unchecked sections are listed under `potential_issues`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionPlan {
    pub domain: String,
    pub platform: String,
    pub is_subdomain: bool,
    pub snapshot: Snapshot,
    pub email_state: EmailState,
    pub connection_option: Option<ConnectionOption>,
    pub warnings: Vec<String>,
    pub conflicts: Vec<Conflict>,
    pub delegate_access: DelegateAccess,
    pub recommended_actions: Vec<Action>,
    pub potential_issues: Vec<Action>,
    pub comparison: Vec<ComparisonRow>,
    pub is_completed: bool,
    pub status_message: String,
}
