//! Versioned layout snapshots and invariant checking.
//!
//! A [`LayoutSnapshot`] is the persisted form of a [`Layout`]. Restoring one
//! goes through [`LayoutSnapshot::invariant_report`]; any error-level finding
//! rejects the snapshot, warnings are tolerated.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::layout::{Layout, LayoutItem, LayoutItemId};

/// Current layout snapshot schema version.
pub const LAYOUT_SNAPSHOT_SCHEMA_VERSION: u16 = 1;

fn default_schema_version() -> u16 {
    LAYOUT_SNAPSHOT_SCHEMA_VERSION
}

/// Persisted layout state.
///
/// Unknown top-level data belongs in `extensions` so it survives a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    pub items: Vec<LayoutItem>,
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

impl LayoutSnapshot {
    #[must_use]
    pub fn new(items: Vec<LayoutItem>) -> Self {
        Self {
            schema_version: LAYOUT_SNAPSHOT_SCHEMA_VERSION,
            items,
            extensions: BTreeMap::new(),
        }
    }

    /// Deterministic, order-sensitive hash for diagnostics.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.schema_version.hash(&mut hasher);
        self.items.len().hash(&mut hasher);
        for item in &self.items {
            item.hash(&mut hasher);
        }
        for (k, v) in &self.extensions {
            k.hash(&mut hasher);
            v.hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Check the snapshot against the layout invariants.
    #[must_use]
    pub fn invariant_report(&self) -> LayoutInvariantReport {
        let mut issues = Vec::new();

        if self.schema_version != LAYOUT_SNAPSHOT_SCHEMA_VERSION {
            issues.push(LayoutInvariantIssue {
                code: LayoutInvariantCode::UnsupportedSchemaVersion,
                severity: LayoutInvariantSeverity::Error,
                item: None,
                related_item: None,
                message: format!(
                    "schema version {} is not supported (expected {})",
                    self.schema_version, LAYOUT_SNAPSHOT_SCHEMA_VERSION
                ),
            });
        }

        let mut seen = FxHashSet::default();
        for item in &self.items {
            if !seen.insert(&item.id) {
                issues.push(LayoutInvariantIssue::for_item(
                    LayoutInvariantCode::DuplicateItemId,
                    LayoutInvariantSeverity::Error,
                    item,
                    format!("item id {:?} appears more than once", item.id.as_str()),
                ));
            }
            if item.rect.x < 0 || item.rect.y < 0 {
                issues.push(LayoutInvariantIssue::for_item(
                    LayoutInvariantCode::NegativeOrigin,
                    LayoutInvariantSeverity::Error,
                    item,
                    format!("origin ({}, {}) is negative", item.rect.x, item.rect.y),
                ));
            }
            if item.rect.w <= 0 || item.rect.h <= 0 {
                issues.push(LayoutInvariantIssue::for_item(
                    LayoutInvariantCode::EmptyExtent,
                    LayoutInvariantSeverity::Warning,
                    item,
                    format!("extent {}x{} covers no cells", item.rect.w, item.rect.h),
                ));
            }
            if item.rect.x.checked_add(item.rect.w).is_none()
                || item.rect.y.checked_add(item.rect.h).is_none()
            {
                issues.push(LayoutInvariantIssue::for_item(
                    LayoutInvariantCode::ExtentOverflow,
                    LayoutInvariantSeverity::Warning,
                    item,
                    format!(
                        "rect at ({}, {}) sized {}x{} ends past the grid coordinate range",
                        item.rect.x, item.rect.y, item.rect.w, item.rect.h
                    ),
                ));
            }
        }

        for (i, a) in self.items.iter().enumerate() {
            for b in &self.items[i + 1..] {
                if a.rect.intersects(&b.rect) {
                    issues.push(LayoutInvariantIssue {
                        code: LayoutInvariantCode::Overlap,
                        severity: LayoutInvariantSeverity::Error,
                        item: Some(a.id.clone()),
                        related_item: Some(b.id.clone()),
                        message: format!("{} overlaps {}", a.id, b.id),
                    });
                }
            }
        }

        LayoutInvariantReport {
            snapshot_hash: self.state_hash(),
            issues,
        }
    }

    /// Restore a layout, rejecting snapshots with error-level findings.
    pub fn into_layout(self) -> Result<Layout, LayoutRestoreError> {
        if self.schema_version != LAYOUT_SNAPSHOT_SCHEMA_VERSION {
            return Err(LayoutRestoreError::UnsupportedVersion {
                found: self.schema_version,
                expected: LAYOUT_SNAPSHOT_SCHEMA_VERSION,
            });
        }

        let report = self.invariant_report();
        if report.has_errors() {
            let errors: Vec<_> = report
                .issues
                .iter()
                .filter(|issue| issue.severity == LayoutInvariantSeverity::Error)
                .collect();
            return Err(LayoutRestoreError::Invalid {
                issue_count: errors.len(),
                first_issue: errors
                    .first()
                    .map(|issue| issue.message.clone())
                    .unwrap_or_default(),
            });
        }

        Layout::from_items(self.items).map_err(|err| LayoutRestoreError::Invalid {
            issue_count: 1,
            first_issue: err.to_string(),
        })
    }
}

impl Layout {
    /// Snapshot of the current items, in order.
    #[must_use]
    pub fn to_snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot::new(self.items().to_vec())
    }
}

/// Severity for invariant findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutInvariantSeverity {
    Error,
    Warning,
}

/// Stable code for invariant findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutInvariantCode {
    UnsupportedSchemaVersion,
    DuplicateItemId,
    NegativeOrigin,
    EmptyExtent,
    /// Right or bottom edge is not representable; edge queries saturate.
    ExtentOverflow,
    Overlap,
}

/// One invariant finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInvariantIssue {
    pub code: LayoutInvariantCode,
    pub severity: LayoutInvariantSeverity,
    pub item: Option<LayoutItemId>,
    pub related_item: Option<LayoutItemId>,
    pub message: String,
}

impl LayoutInvariantIssue {
    fn for_item(
        code: LayoutInvariantCode,
        severity: LayoutInvariantSeverity,
        item: &LayoutItem,
        message: String,
    ) -> Self {
        Self {
            code,
            severity,
            item: Some(item.id.clone()),
            related_item: None,
            message,
        }
    }
}

/// Structured invariant report over a layout snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInvariantReport {
    pub snapshot_hash: u64,
    pub issues: Vec<LayoutInvariantIssue>,
}

impl LayoutInvariantReport {
    /// Return true if any error-level finding exists.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == LayoutInvariantSeverity::Error)
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Errors restoring a layout from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutRestoreError {
    UnsupportedVersion { found: u16, expected: u16 },
    Invalid { issue_count: usize, first_issue: String },
}

impl fmt::Display for LayoutRestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, expected } => write!(
                f,
                "unsupported layout snapshot version {found} (expected {expected})"
            ),
            Self::Invalid {
                issue_count,
                first_issue,
            } => write!(
                f,
                "layout snapshot has {issue_count} invariant error(s), first: {first_issue}"
            ),
        }
    }
}

impl std::error::Error for LayoutRestoreError {}

#[cfg(test)]
mod tests {
    use super::*;
    use gridboard_core::geometry::GridRect;

    fn item(id: &str, x: i32, y: i32, w: i32, h: i32) -> LayoutItem {
        LayoutItem::new(id, "w", GridRect::new(x, y, w, h))
    }

    fn codes(report: &LayoutInvariantReport) -> Vec<LayoutInvariantCode> {
        report.issues.iter().map(|issue| issue.code).collect()
    }

    #[test]
    fn round_trip_through_json() {
        let layout = Layout::from_items([item("A", 0, 0, 4, 2), item("B", 4, 0, 2, 2)])
            .expect("unique ids");
        let json = serde_json::to_string(&layout.to_snapshot()).expect("snapshot should serialize");
        let snapshot: LayoutSnapshot = serde_json::from_str(&json).expect("snapshot should parse");
        assert_eq!(snapshot.schema_version, LAYOUT_SNAPSHOT_SCHEMA_VERSION);
        assert!(snapshot.invariant_report().is_clean());
        assert_eq!(snapshot.into_layout().expect("valid snapshot"), layout);
    }

    #[test]
    fn missing_version_defaults_to_current() {
        let snapshot: LayoutSnapshot =
            serde_json::from_value(serde_json::json!({"items": []})).expect("snapshot should parse");
        assert_eq!(snapshot.schema_version, LAYOUT_SNAPSHOT_SCHEMA_VERSION);
        assert!(snapshot.extensions.is_empty());
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let mut snapshot = LayoutSnapshot::new(Vec::new());
        snapshot.schema_version = 7;
        assert_eq!(
            codes(&snapshot.invariant_report()),
            [LayoutInvariantCode::UnsupportedSchemaVersion]
        );
        assert_eq!(
            snapshot.into_layout(),
            Err(LayoutRestoreError::UnsupportedVersion {
                found: 7,
                expected: 1
            })
        );
    }

    #[test]
    fn structural_errors_are_reported() {
        let snapshot = LayoutSnapshot::new(vec![
            item("A", 0, 0, 4, 2),
            item("A", 8, 0, 1, 1),
            item("B", -1, 5, 2, 2),
            item("C", 2, 1, 2, 2),
        ]);
        let report = snapshot.invariant_report();
        assert!(report.has_errors());
        let codes = codes(&report);
        assert!(codes.contains(&LayoutInvariantCode::DuplicateItemId));
        assert!(codes.contains(&LayoutInvariantCode::NegativeOrigin));
        assert!(codes.contains(&LayoutInvariantCode::Overlap));

        let overlap = report
            .issues
            .iter()
            .find(|issue| issue.code == LayoutInvariantCode::Overlap)
            .expect("overlap finding");
        assert_eq!(overlap.item, Some("A".into()));
        assert_eq!(overlap.related_item, Some("C".into()));

        let err = snapshot.into_layout().expect_err("invalid snapshot");
        assert!(matches!(err, LayoutRestoreError::Invalid { issue_count, .. } if issue_count >= 3));
    }

    #[test]
    fn empty_extent_is_only_a_warning() {
        let snapshot = LayoutSnapshot::new(vec![item("A", 0, 0, 0, 2), item("B", 0, 0, 2, 2)]);
        let report = snapshot.invariant_report();
        assert_eq!(codes(&report), [LayoutInvariantCode::EmptyExtent]);
        assert!(!report.has_errors());
        assert_eq!(snapshot.into_layout().expect("warnings are tolerated").len(), 2);
    }

    #[test]
    fn extent_past_coordinate_range_is_a_warning() {
        let snapshot = LayoutSnapshot::new(vec![
            item("tall", 0, 0, 16, i32::MAX),
            item("pushed", 0, i32::MAX, 4, 2),
            item("wide", i32::MAX - 1, 0, 2, 1),
        ]);
        let report = snapshot.invariant_report();
        let flagged: Vec<_> = report
            .issues
            .iter()
            .filter(|issue| issue.code == LayoutInvariantCode::ExtentOverflow)
            .map(|issue| issue.item.clone())
            .collect();
        assert_eq!(flagged, [Some("pushed".into()), Some("wide".into())]);
        assert!(!report.has_errors());
    }

    #[test]
    fn push_under_tall_item_is_flagged() {
        let layout = Layout::from_items([
            item("tall", 0, 0, 16, i32::MAX),
            item("below", 0, 0, 4, 1),
        ])
        .expect("unique ids");
        let settled = crate::collision::resolve_collisions(&layout, &"tall".into());
        let below = settled.get(&"below".into()).expect("item present").rect;
        assert_eq!(below.y, i32::MAX);
        assert!(!settled.has_overlaps());
        assert_eq!(
            codes(&settled.to_snapshot().invariant_report()),
            [LayoutInvariantCode::ExtentOverflow]
        );
    }

    #[test]
    fn state_hash_is_order_sensitive() {
        let a = LayoutSnapshot::new(vec![item("A", 0, 0, 1, 1), item("B", 1, 0, 1, 1)]);
        let b = LayoutSnapshot::new(vec![item("B", 1, 0, 1, 1), item("A", 0, 0, 1, 1)]);
        assert_eq!(a.state_hash(), a.clone().state_hash());
        assert_ne!(a.state_hash(), b.state_hash());

        let mut tagged = a.clone();
        tagged.extensions.insert("theme".into(), "dark".into());
        assert_ne!(a.state_hash(), tagged.state_hash());
    }
}
