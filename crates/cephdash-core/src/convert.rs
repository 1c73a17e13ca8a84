// ── API-to-domain type conversions ──
//
// Bridges raw `cephdash_api` response types into canonical
// `cephdash_core::model` domain types. Each `From` impl normalizes field
// names and drops samples that do not have the expected shape.

use std::collections::BTreeMap;

use serde_json::Value;

use cephdash_api::{
    RawClient, RawClients, RawFilesystem, RawMdsInfo, RawPool, RawRank, RawRankId, RawTabs,
};

use crate::model::{
    CacheStatus, Client, ClientsView, CounterSeries, Filesystem, MdsInfo, MdsMap, Pool, Rank,
    SelectionRow, TabBundle, TabsPayload,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse `[[timestamp, value], ...]`, skipping malformed samples.
fn parse_samples(raw: &Value) -> Vec<(f64, f64)> {
    raw.as_array()
        .map(|samples| {
            samples
                .iter()
                .filter_map(|sample| match sample.as_array()?.as_slice() {
                    [ts, value] => Some((ts.as_f64()?, value.as_f64()?)),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn counter_series(name: String, raw: BTreeMap<String, Value>) -> CounterSeries {
    let counters = raw
        .into_iter()
        .map(|(counter, samples)| {
            let parsed = parse_samples(&samples);
            (counter, parsed)
        })
        .collect();
    CounterSeries { name, counters }
}

// ── Tabs ───────────────────────────────────────────────────────────

impl From<RawPool> for Pool {
    fn from(raw: RawPool) -> Self {
        Self {
            name: raw.pool,
            pool_type: raw.pool_type,
            used: raw.used,
            avail: raw.avail,
        }
    }
}

impl From<RawRank> for Rank {
    fn from(raw: RawRank) -> Self {
        let rank = match raw.rank {
            RawRankId::Number(n) => n.to_string(),
            RawRankId::Text(s) => s,
        };
        Self {
            rank,
            state: raw.state,
            mds: raw.mds,
            activity: raw.activity,
            dns: raw.dns,
            inos: raw.inos,
            dirs: raw.dirs,
            caps: raw.caps,
        }
    }
}

impl From<RawClient> for Client {
    fn from(raw: RawClient) -> Self {
        Self {
            id: raw.id,
            client_type: raw.client_type,
            state: raw.state,
            version: raw.version,
            hostname: raw.hostname,
            root: raw.root,
        }
    }
}

impl From<RawClients> for ClientsView {
    fn from(raw: RawClients) -> Self {
        Self {
            status: CacheStatus::from_code(raw.status),
            data: raw.data.into_iter().map(Client::from).collect(),
        }
    }
}

impl From<RawTabs> for TabsPayload {
    fn from(raw: RawTabs) -> Self {
        let mds_counters = raw
            .mds_counters
            .into_iter()
            .map(|(mds, counters)| (mds.clone(), counter_series(mds, counters)))
            .collect();

        Self {
            details: TabBundle {
                standbys: raw.standbys,
                pools: raw.pools.into_iter().map(Pool::from).collect(),
                ranks: raw.ranks.into_iter().map(Rank::from).collect(),
                mds_counters,
                name: raw.name,
            },
            clients: ClientsView::from(raw.clients),
        }
    }
}

// ── Selection ──────────────────────────────────────────────────────

impl From<&RawMdsInfo> for MdsInfo {
    fn from(raw: &RawMdsInfo) -> Self {
        Self {
            name: raw.name.clone(),
        }
    }
}

impl From<&RawFilesystem> for Filesystem {
    fn from(raw: &RawFilesystem) -> Self {
        let info = raw
            .mdsmap
            .info
            .iter()
            .map(|(gid, entry)| (gid.clone(), MdsInfo::from(entry)))
            .collect();
        Self {
            id: raw.id,
            name: raw.mdsmap.fs_name.clone(),
            max_mds: raw.mdsmap.max_mds,
            mdsmap: MdsMap { info },
        }
    }
}

impl From<&RawFilesystem> for SelectionRow {
    fn from(raw: &RawFilesystem) -> Self {
        Filesystem::from(raw).selection_row()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tabs_convert_into_payload() {
        let raw: RawTabs = serde_json::from_value(json!({
            "standbys": "b",
            "pools": [{ "pool": "meta", "type": "metadata", "used": 1, "avail": 3 }],
            "ranks": [{ "rank": "0-s", "state": "standby-replay", "mds": "b" }],
            "mds_counters": {
                "a": { "mds.inodes": [[1.0, 10.0], [2.0, 11.0], "garbage", [3.0]] }
            },
            "name": "cephfs",
            "clients": { "status": 1, "data": [{ "id": 7, "hostname": "h" }] }
        }))
        .unwrap();

        let payload = TabsPayload::from(raw);
        assert_eq!(payload.details.pools[0].name, "meta");
        assert_eq!(payload.details.ranks[0].rank, "0-s");
        let series = &payload.details.mds_counters["a"];
        assert_eq!(series.name, "a");
        assert_eq!(series.counters["mds.inodes"], vec![(1.0, 10.0), (2.0, 11.0)]);
        assert_eq!(payload.clients.status, CacheStatus::ValueStale);
        assert_eq!(payload.clients.data[0].id, 7);
    }

    #[test]
    fn filesystem_converts_into_selection_row() {
        let raw: RawFilesystem = serde_json::from_value(json!({
            "id": 4,
            "mdsmap": { "fs_name": "x", "info": { "gid_1": { "name": "a" } } }
        }))
        .unwrap();
        assert_eq!(SelectionRow::from(&raw), SelectionRow::new(4, [("gid_1", "a")]));

        let fs = Filesystem::from(&raw);
        assert_eq!(fs.name, "x");
        assert_eq!(fs.daemon_names(), vec!["a"]);
    }
}
