// ── Selection identity ──
//
// Reduces a selection to the (id, display name) pair the refresh
// controller keys its subscription on.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{MdsInfo, SelectionRow};

/// The identity of the selected filesystem.
///
/// Two identities are equal only if both the id and the display name
/// match; either changing forces a new subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identity {
    pub id: i64,
    /// Name of the first MDS daemon listed for the filesystem, used to
    /// cross-reference external dashboards. `None` when no daemon is listed.
    pub display_name: Option<String>,
}

impl Identity {
    /// Identity of a single row; `None` if the row carries no id.
    pub fn from_row(row: &SelectionRow) -> Option<Self> {
        Some(Self {
            id: row.id?,
            display_name: first_entry_name(&row.mdsmap.info),
        })
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display_name {
            Some(name) => write!(f, "{} ({name})", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Resolve the identity of a selection of zero or one rows.
///
/// An empty selection is a deselect. Only the first row is read.
pub fn resolve(selection: &[SelectionRow]) -> Option<Identity> {
    selection.first().and_then(Identity::from_row)
}

/// Name of the first daemon entry in map iteration order.
///
/// If several daemons are listed the choice is whichever the source put
/// first; no further ordering is applied.
pub fn first_entry_name(info: &IndexMap<String, MdsInfo>) -> Option<String> {
    info.values().next().and_then(|entry| entry.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_selection_is_unselected() {
        assert_eq!(resolve(&[]), None);
    }

    #[test]
    fn finds_display_name_of_first_daemon() {
        let identity = resolve(&[SelectionRow::new(2, [("something", "otherMds")])]);
        assert_eq!(
            identity,
            Some(Identity {
                id: 2,
                display_name: Some("otherMds".into()),
            })
        );
    }

    #[test]
    fn resists_empty_mds_info() {
        let row = SelectionRow {
            id: Some(3),
            ..SelectionRow::default()
        };
        let identity = resolve(&[row]).unwrap_or_else(|| panic!("row has an id"));
        assert_eq!(identity.id, 3);
        assert_eq!(identity.display_name, None);
    }

    #[test]
    fn row_without_id_resolves_to_none() {
        let row = SelectionRow {
            id: None,
            ..SelectionRow::new(1, [("gid", "a")])
        };
        assert_eq!(resolve(&[row]), None);
    }

    #[test]
    fn uses_first_entry_in_insertion_order() {
        let row = SelectionRow::new(1, [("gid_9", "zeta"), ("gid_1", "alpha")]);
        assert_eq!(first_entry_name(&row.mdsmap.info).as_deref(), Some("zeta"));
    }

    #[test]
    fn display_name_participates_in_equality() {
        let a = Identity::from_row(&SelectionRow::new(1, [("g", "a")]));
        let b = Identity::from_row(&SelectionRow::new(1, [("g", "b")]));
        assert_ne!(a, b);
    }

    #[test]
    fn display_includes_name_when_known() {
        let identity = Identity {
            id: 2,
            display_name: Some("mds-a".into()),
        };
        assert_eq!(identity.to_string(), "2 (mds-a)");
    }
}
