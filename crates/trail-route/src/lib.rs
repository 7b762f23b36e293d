//! `trail-route` — multi-waypoint route planning over an annotated network.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`planner`] | `Waypoint`, `plan_route`, `find_route` (Dijkstra legs)    |
//! | [`segment`] | `Route`, `Segment` — tag-homogeneous reconstruction       |
//! | [`stats`]   | `tag_breakdown`, `summary`                                |
//! | [`error`]   | `RouteError`, `RouteResult<T>`                            |
//!
//! # Usage
//!
//! ```rust,ignore
//! use trail_route::{find_route, Waypoint};
//!
//! let route = find_route(&net, &waypoints, &config)?;
//! for segment in &route.segments {
//!     render(segment.coordinates(&net), segment.color(&registry));
//! }
//! println!("{}", trail_route::stats::summary(&route, &registry));
//! ```

pub mod error;
pub mod planner;
pub mod segment;
pub mod stats;


pub use error::{RouteError, RouteResult};
pub use planner::{find_route, find_route_with, plan_route, plan_route_with, Waypoint};
pub use segment::{Route, Segment};
pub use stats::{summary, tag_breakdown, TagStat};
