//! Async client for the Ceph dashboard REST API.
//!
//! Only the CephFS surface is covered: authentication, filesystem
//! listing, and the per-filesystem tab payload. Responses are returned as
//! lenient `Raw*` wire models; `cephdash-core` owns the domain types.

mod cephfs;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::DashboardClient;
pub use error::Error;
pub use models::{
    RawClient, RawClients, RawFilesystem, RawMdsInfo, RawMdsMap, RawPool, RawRank, RawRankId,
    RawTabs,
};
pub use transport::{TlsMode, TransportConfig};
