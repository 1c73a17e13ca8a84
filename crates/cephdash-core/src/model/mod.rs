// ── Domain model ──
//
// Canonical types shared by the controller, the store, and consumers.

mod selection;
mod tabs;

pub use selection::{Filesystem, MdsInfo, MdsMap, SelectionRow};
pub use tabs::{CacheStatus, Client, ClientsView, CounterSeries, Pool, Rank, TabBundle, TabsPayload};
