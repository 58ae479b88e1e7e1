use crate::domain::models::{MutationOutcome, ProposedChange};
use crate::services::locking::LockedPathIndex;
use crate::settings::{get_path, SettingsTree, SettingsValue, ValueKind};
use std::fmt;

/// The user- and automation-facing rejection line. Byte-stable contract.
pub fn locked_field_message(path: &str) -> String {
    format!("field \"{path}\" is locked")
}

/// One or more proposed mutations touched a locked leaf with a differing
/// value. Displays as one contract line per rejected path.
#[derive(Debug, thiserror::Error)]
#[error("{}", render_locked(.paths))]
pub struct LockedRejection {
    pub paths: Vec<String>,
}

fn render_locked(paths: &[String]) -> String {
    paths
        .iter()
        .map(|path| locked_field_message(path))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeIssueKind {
    UnknownField,
    NotALeaf,
    ObjectValue,
    NonScalarArray,
    KindMismatch { expected: ValueKind, found: ValueKind },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeIssue {
    pub path: String,
    pub kind: ShapeIssueKind,
}

impl fmt::Display for ShapeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ShapeIssueKind::UnknownField => write!(f, "field \"{}\" does not exist", self.path),
            ShapeIssueKind::NotALeaf => write!(f, "field \"{}\" is not a settable leaf", self.path),
            ShapeIssueKind::ObjectValue => {
                write!(f, "field \"{}\" cannot be assigned an object value", self.path)
            }
            ShapeIssueKind::NonScalarArray => write!(
                f,
                "field \"{}\" arrays may contain only scalar values",
                self.path
            ),
            ShapeIssueKind::KindMismatch { expected, found } => write!(
                f,
                "field \"{}\" expects a {expected}, got a {found}",
                self.path
            ),
        }
    }
}

/// Shape errors for a batch, one line per offending change.
#[derive(Debug, thiserror::Error)]
#[error("{}", render_issues(.issues))]
pub struct ShapeIssues {
    pub issues: Vec<ShapeIssue>,
}

fn render_issues(issues: &[ShapeIssue]) -> String {
    issues
        .iter()
        .map(ShapeIssue::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    #[error(transparent)]
    Locked(#[from] LockedRejection),
    #[error(transparent)]
    Shape(#[from] ShapeIssues),
}

/// A batch that passed validation: per-change outcomes in input order, and
/// the subset of changes that must actually be written.
#[derive(Debug, Default)]
pub struct Validation {
    pub outcomes: Vec<MutationOutcome>,
    pub writes: Vec<ProposedChange>,
}

/// Decide a batch of proposed changes against the locked-path index and the
/// current effective settings.
///
/// Per change, in input order: a locked path with an equal value is a no-op,
/// a locked path with a differing value rejects the whole batch (nothing is
/// applied, all rejected paths are reported); everything else must address
/// an existing leaf with a matching value kind. Batches are atomic: any
/// rejection or shape issue means no change from the batch is applied.
pub fn validate(
    changes: &[ProposedChange],
    index: &LockedPathIndex,
    current: &SettingsTree,
) -> Result<Validation, ValidateError> {
    let mut validation = Validation::default();
    let mut rejected: Vec<String> = Vec::new();
    let mut issues: Vec<ShapeIssue> = Vec::new();

    for change in changes {
        if index.is_locked(&change.path) {
            match get_path(current, &change.path) {
                Some(existing) if *existing == change.value => {
                    validation.outcomes.push(MutationOutcome::NoChangeNecessary {
                        path: change.path.clone(),
                    });
                }
                _ => rejected.push(change.path.clone()),
            }
            continue;
        }
        match check_shape(current, change) {
            Ok(()) => {
                validation.outcomes.push(MutationOutcome::Applied {
                    path: change.path.clone(),
                });
                validation.writes.push(change.clone());
            }
            Err(issue) => issues.push(issue),
        }
    }

    if !rejected.is_empty() {
        return Err(LockedRejection { paths: rejected }.into());
    }
    if !issues.is_empty() {
        return Err(ShapeIssues { issues }.into());
    }
    Ok(validation)
}

fn check_shape(current: &SettingsTree, change: &ProposedChange) -> Result<(), ShapeIssue> {
    let issue = |kind| ShapeIssue {
        path: change.path.clone(),
        kind,
    };

    match &change.value {
        SettingsValue::Object(_) => return Err(issue(ShapeIssueKind::ObjectValue)),
        SettingsValue::Array(items) => {
            if items
                .iter()
                .any(|item| matches!(item, SettingsValue::Array(_) | SettingsValue::Object(_)))
            {
                return Err(issue(ShapeIssueKind::NonScalarArray));
            }
        }
        _ => {}
    }

    match get_path(current, &change.path) {
        None => Err(issue(ShapeIssueKind::UnknownField)),
        Some(SettingsValue::Object(_)) => Err(issue(ShapeIssueKind::NotALeaf)),
        Some(existing) => {
            if existing.kind() == change.value.kind() {
                Ok(())
            } else {
                Err(issue(ShapeIssueKind::KindMismatch {
                    expected: existing.kind(),
                    found: change.value.kind(),
                }))
            }
        }
    }
}
