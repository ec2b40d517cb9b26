//! Flat-file store for per-world void respawn points.
//!
//! The backing file holds one entry per line:
//!
//! ```text
//! world.location.x: 12.5
//! world.location.y: 64.0
//! world_nether.location.yaw: 90.0
//! ```
//!
//! Every operation re-reads the whole file; there is no in-memory cache.
//! Writers take an exclusive advisory lock and replace the file atomically.

mod document;
mod errors;
mod point;
mod store;

pub use document::ConfigDocument;
pub use errors::StoreError;
pub use point::{PointField, RespawnPoint};
pub use store::ConfigStore;
