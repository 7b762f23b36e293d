//! `trail-store` — SQLite persistence for the trailplan route planner.
//!
//! One database file holds two tables, `nodes` and `edges`, written with
//! insert-or-ignore semantics so re-ingesting the same extract is
//! idempotent.  The annotation phases (lengths, proximity flags, costs)
//! are batch `UPDATE`s, each committed as one transaction.
//!
//! | Module    | Contents                                                    |
//! |-----------|-------------------------------------------------------------|
//! | [`store`] | `TrailStore` — schema init, batch writes, predicate loads   |
//! | [`row`]   | `NodeRow`, `EdgeRow` plain rows                             |
//! | [`error`] | `StoreError`, `StoreResult<T>`                              |

pub mod error;
pub mod row;
pub mod store;


pub use error::{StoreError, StoreResult};
pub use row::{EdgeRow, NodeRow};
pub use store::TrailStore;
