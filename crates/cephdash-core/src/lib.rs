//! Selection-driven tab refresh between `cephdash-api` and consumers.
//!
//! This crate owns the domain model and the refresh machinery behind the
//! CephFS filesystem tabs:
//!
//! - **[`RefreshController`]**: Reacts to selection changes. A new
//!   filesystem identity resets the published data to defaults, fetches
//!   immediately, and keeps exactly one periodic subscription alive;
//!   re-selecting the same identity does nothing.
//!   [`soft_refresh()`](RefreshController::soft_refresh) republishes the
//!   last data under new `Arc`s without a network call.
//!
//! - **[`TabDataStore`]**: Copy-on-publish storage for the `details` and
//!   `clients` view models, built on `tokio::sync::watch`. `Arc::ptr_eq`
//!   between two reads tells whether anything was published in between.
//!
//! - **[`SubscriptionSlot`]**: Owns at most one [`SubscriptionHandle`]
//!   (a spawned task plus its `CancellationToken`).
//!
//! - **[`TabsSource`]**: The data source seam, implemented for
//!   [`cephdash_api::DashboardClient`].
//!
//! - **Domain model** ([`model`]): `TabBundle`, `ClientsView`,
//!   `SelectionRow`, and friends, converted from the API's `Raw*` types in
//!   [`convert`].

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod identity;
pub mod model;
pub mod source;
pub mod store;
pub mod stream;
pub mod subscription;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cephdash_api::DashboardClient;
pub use config::{
    AuthCredentials, DashboardConfig, RefreshConfig, TlsVerification, DEFAULT_REFRESH_INTERVAL,
    MIN_REFRESH_INTERVAL,
};
pub use controller::{RefreshController, Transition};
pub use error::CoreError;
pub use identity::Identity;
pub use source::{TabsSource, connect, disconnect, find_filesystem, list_filesystems};
pub use store::TabDataStore;
pub use stream::{ViewStream, ViewWatchStream};
pub use subscription::{HandleId, Subscription, SubscriptionHandle, SubscriptionSlot};

pub use model::{
    CacheStatus, Client, ClientsView, CounterSeries, Filesystem, MdsInfo, MdsMap, Pool, Rank,
    SelectionRow, TabBundle, TabsPayload,
};
