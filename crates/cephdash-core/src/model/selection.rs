// ── Selection rows ──
//
// The shape a selection source (filesystem table) hands the controller.
// Parsing is lenient: a row with a broken `mdsmap` still selects the
// filesystem, it just has no display name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Daemon info entry; only the name is read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdsInfo {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdsMap {
    /// Keyed by daemon gid, iterated in the order the source listed them.
    #[serde(default)]
    pub info: IndexMap<String, MdsInfo>,
}

/// One selected filesystem row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRow {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub mdsmap: MdsMap,
}

impl SelectionRow {
    /// Build a row from an id and `(gid, daemon name)` pairs.
    pub fn new<K, N>(id: i64, daemons: impl IntoIterator<Item = (K, N)>) -> Self
    where
        K: Into<String>,
        N: Into<String>,
    {
        let info = daemons
            .into_iter()
            .map(|(gid, name)| {
                (
                    gid.into(),
                    MdsInfo {
                        name: Some(name.into()),
                    },
                )
            })
            .collect();
        Self {
            id: Some(id),
            mdsmap: MdsMap { info },
        }
    }

    /// Extract a row from arbitrary JSON, degrading field by field.
    ///
    /// A non-integer `id` yields `id: None`; a missing or non-object
    /// `mdsmap.info` yields an empty map; entries without a string `name`
    /// are kept with `name: None` so map order is preserved.
    pub fn from_value(value: &Value) -> Self {
        let id = value.get("id").and_then(Value::as_i64);
        let info = value
            .pointer("/mdsmap/info")
            .and_then(Value::as_object)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(gid, entry)| {
                        let name = entry.get("name").and_then(Value::as_str).map(String::from);
                        (gid.clone(), MdsInfo { name })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            id,
            mdsmap: MdsMap { info },
        }
    }
}

/// A filesystem as the dashboard lists it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filesystem {
    pub id: Option<i64>,
    pub name: String,
    pub max_mds: Option<u32>,
    pub mdsmap: MdsMap,
}

impl Filesystem {
    /// Daemon names in listing order; unnamed entries are skipped.
    pub fn daemon_names(&self) -> Vec<&str> {
        self.mdsmap
            .info
            .values()
            .filter_map(|entry| entry.name.as_deref())
            .collect()
    }

    /// The row a table would hand the refresh controller when this
    /// filesystem is selected.
    pub fn selection_row(&self) -> SelectionRow {
        SelectionRow {
            id: self.id,
            mdsmap: self.mdsmap.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_reads_well_formed_rows() {
        let row = SelectionRow::from_value(&json!({
            "id": 2,
            "mdsmap": { "info": { "something": { "name": "otherMds" } } }
        }));
        assert_eq!(row, SelectionRow::new(2, [("something", "otherMds")]));
    }

    #[test]
    fn from_value_degrades_broken_fields() {
        let row = SelectionRow::from_value(&json!({ "id": "two", "mdsmap": [] }));
        assert_eq!(row.id, None);
        assert!(row.mdsmap.info.is_empty());

        let row = SelectionRow::from_value(&json!({
            "id": 3,
            "mdsmap": { "info": { "gid_1": { "rank": 0 } } }
        }));
        assert_eq!(row.id, Some(3));
        assert_eq!(row.mdsmap.info["gid_1"].name, None);
    }

    #[test]
    fn from_value_keeps_entry_order() {
        let row = SelectionRow::from_value(&json!({
            "id": 1,
            "mdsmap": { "info": { "gid_9": { "name": "z" }, "gid_1": { "name": "a" } } }
        }));
        let keys: Vec<_> = row.mdsmap.info.keys().cloned().collect();
        assert_eq!(keys, ["gid_9", "gid_1"]);
    }

    #[test]
    fn filesystem_selection_row_keeps_daemon_order() {
        let fs = Filesystem {
            id: Some(1),
            name: "cephfs".into(),
            max_mds: Some(1),
            mdsmap: SelectionRow::new(1, [("gid_9", "z"), ("gid_1", "a")]).mdsmap,
        };
        assert_eq!(fs.daemon_names(), vec!["z", "a"]);
        assert_eq!(fs.selection_row(), SelectionRow::new(1, [("gid_9", "z"), ("gid_1", "a")]));
    }
}
