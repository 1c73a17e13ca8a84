// ── Filesystem tab view models ──
//
// What the rendering surfaces consume: the non-client `TabBundle` and the
// client list paired with its cache status. `Default` is the canonical
// empty value shown while a fetch for a new filesystem is in flight.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Freshness of the client list, as reported by the dashboard's view cache.
///
/// The wire encoding is the integer code; see [`CacheStatus::from_code`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum CacheStatus {
    ValueOk,
    ValueStale,
    #[default]
    ValueNone,
    ValueException,
}

impl CacheStatus {
    /// Decode the dashboard's `ViewCacheStatus` code. Unknown codes are
    /// reported as `ValueException` so they never read as fresh data.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::ValueOk,
            1 => Self::ValueStale,
            2 => Self::ValueNone,
            _ => Self::ValueException,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::ValueOk => 0,
            Self::ValueStale => 1,
            Self::ValueNone => 2,
            Self::ValueException => 3,
        }
    }

    /// `true` when the client list is usable as-is.
    pub fn is_ok(self) -> bool {
        self == Self::ValueOk
    }
}

/// A data or metadata pool backing the filesystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub name: String,
    pub pool_type: String,
    pub used: u64,
    pub avail: u64,
}

impl Pool {
    /// Fraction of the pool's capacity in use, `0.0` when nothing is known.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn usage_ratio(&self) -> f64 {
        let total = self.used.saturating_add(self.avail);
        if total == 0 {
            0.0
        } else {
            self.used as f64 / total as f64
        }
    }
}

/// One MDS rank assignment (or standby-replay follower, e.g. `"0-s"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rank {
    pub rank: String,
    pub state: String,
    pub mds: String,
    pub activity: f64,
    pub dns: u64,
    pub inos: u64,
    pub dirs: u64,
    pub caps: u64,
}

/// Performance counter history of one MDS daemon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterSeries {
    /// MDS daemon name.
    pub name: String,
    /// Counter name -> `(timestamp, value)` samples, oldest first.
    pub counters: BTreeMap<String, Vec<(f64, f64)>>,
}

/// Everything shown on the filesystem tabs except the client list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabBundle {
    pub standbys: String,
    pub pools: Vec<Pool>,
    pub ranks: Vec<Rank>,
    pub mds_counters: BTreeMap<String, CounterSeries>,
    pub name: String,
}

/// A connected CephFS client session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: u64,
    pub client_type: String,
    pub state: String,
    pub version: String,
    pub hostname: String,
    pub root: String,
}

/// Client list plus the cache status it was served with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientsView {
    pub status: CacheStatus,
    pub data: Vec<Client>,
}

/// One complete fetch result for a filesystem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabsPayload {
    pub details: TabBundle,
    pub clients: ClientsView,
}
