// Dashboard wire models
//
// Raw response shapes as the Ceph dashboard serialises them. Every field
// is lenient (`#[serde(default)]`): the dashboard omits keys for daemons
// that are still booting, and a missing key must never fail a whole poll.
// `cephdash-core` converts these into its domain types.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ── GET /api/cephfs ─────────────────────────────────────────────────

/// One filesystem entry from `GET /api/cephfs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFilesystem {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub mdsmap: RawMdsMap,
}

/// The filesystem's MDS map. Only the fields the console reads are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMdsMap {
    #[serde(default)]
    pub fs_name: String,
    /// Daemon info keyed by `gid_<n>`, in the order the dashboard lists them.
    #[serde(default)]
    pub info: IndexMap<String, RawMdsInfo>,
    #[serde(default)]
    pub max_mds: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMdsInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub rank: Option<i64>,
}

// ── GET /ui-api/cephfs/{id}/tabs ────────────────────────────────────

/// The multi-section payload behind the filesystem detail tabs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTabs {
    #[serde(default)]
    pub standbys: String,
    #[serde(default)]
    pub pools: Vec<RawPool>,
    #[serde(default)]
    pub ranks: Vec<RawRank>,
    /// `{mds_name: {counter_name: [[timestamp, value], ...]}}`
    #[serde(default)]
    pub mds_counters: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub clients: RawClients,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPool {
    #[serde(default)]
    pub pool: String,
    #[serde(default, rename = "type")]
    pub pool_type: String,
    #[serde(default)]
    pub used: u64,
    #[serde(default)]
    pub avail: u64,
}

/// Rank identifiers are numeric for active daemons and strings such as
/// `"0-s"` for standby-replay followers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRankId {
    Number(i64),
    Text(String),
}

impl Default for RawRankId {
    fn default() -> Self {
        Self::Number(0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRank {
    #[serde(default)]
    pub rank: RawRankId,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub mds: String,
    #[serde(default)]
    pub activity: f64,
    #[serde(default)]
    pub dns: u64,
    #[serde(default)]
    pub inos: u64,
    #[serde(default)]
    pub dirs: u64,
    #[serde(default)]
    pub caps: u64,
}

/// Client list plus its view-cache status (integer-encoded on the wire).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawClients {
    #[serde(default = "value_none")]
    pub status: i32,
    #[serde(default)]
    pub data: Vec<RawClient>,
}

impl Default for RawClients {
    fn default() -> Self {
        Self {
            status: value_none(),
            data: Vec::new(),
        }
    }
}

/// `ViewCacheStatus.ValueNone`.
fn value_none() -> i32 {
    2
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawClient {
    #[serde(default)]
    pub id: u64,
    #[serde(default, rename = "type")]
    pub client_type: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub root: String,
}

// ── POST /api/auth ──────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tabs_tolerate_missing_sections() {
        let tabs: RawTabs = serde_json::from_value(json!({ "name": "cephfs" })).unwrap();
        assert_eq!(tabs.name, "cephfs");
        assert!(tabs.pools.is_empty());
        assert_eq!(tabs.clients.status, 2);
    }

    #[test]
    fn rank_ids_accept_numbers_and_strings() {
        let ranks: Vec<RawRank> = serde_json::from_value(json!([
            { "rank": 0, "state": "active", "mds": "a" },
            { "rank": "0-s", "state": "standby-replay", "mds": "b" }
        ]))
        .unwrap();
        assert_eq!(ranks[0].rank, RawRankId::Number(0));
        assert_eq!(ranks[1].rank, RawRankId::Text("0-s".into()));
    }

    #[test]
    fn mds_info_keeps_payload_order() {
        let fs: RawFilesystem = serde_json::from_str(
            r#"{
                "id": 1,
                "mdsmap": {
                    "fs_name": "cephfs",
                    "info": {
                        "gid_9": { "name": "zeta" },
                        "gid_1": { "name": "alpha" }
                    }
                }
            }"#,
        )
        .unwrap();
        let names: Vec<_> = fs
            .mdsmap
            .info
            .values()
            .map(|i| i.name.clone().unwrap())
            .collect();
        assert_eq!(names, ["zeta", "alpha"]);
    }
}
