// ── Reactive tab data ──
//
// Published view models with push-based change notification.

mod tab_store;

pub use tab_store::TabDataStore;
