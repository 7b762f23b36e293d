//! `trail-core` — foundational types for the trailplan route planner.
//!
//! This crate is a dependency of every other `trail-*` crate.  It
//! intentionally has no `trail-*` dependencies and minimal external ones
//! (only `rustc-hash` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                 |
//! |------------|----------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `EdgeId`, `TagId`                              |
//! | [`geo`]    | `GeoPoint`, `FlatProjection`, `BoundingBox`              |
//! | [`tags`]   | `TagRegistry`, `TagSpec`, `TagSet`                       |
//! | [`config`] | `PlannerConfig`                                          |
//! | [`error`]  | `CoreError`, `CoreResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.         |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod tags;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::PlannerConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{BoundingBox, FlatProjection, GeoPoint};
pub use ids::{EdgeId, NodeId, TagId};
pub use tags::{TagRegistry, TagSet, TagSpec};
