//! The database handle.
//!
//! Storage access is encapsulated behind an explicit [`TrailStore`] passed
//! to whoever needs it — there is no process-wide connection.  All batch
//! writes run inside one transaction per call with an explicit commit, and
//! inserts use `INSERT OR IGNORE` so duplicate rows from re-ingestion are
//! skipped, not errors.

use std::path::Path;

use rusqlite::Connection;

use trail_core::{BoundingBox, GeoPoint, TagId};
use trail_graph::{TrailNetwork, Way};

use crate::error::StoreResult;
use crate::row::{EdgeRow, NodeRow};

/// Handle to one planner database.
pub struct TrailStore {
    conn: Connection,
}

impl TrailStore {
    /// Open (or create) a database file and initialise the schema.
    pub fn open(path: &Path) -> StoreResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// In-memory database, mainly for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS nodes (
                 id        INTEGER PRIMARY KEY,
                 node_id   INTEGER NOT NULL,
                 latitude  REAL NOT NULL,
                 longitude REAL NOT NULL,
                 UNIQUE(node_id)
             );
             CREATE TABLE IF NOT EXISTS edges (
                 id           INTEGER PRIMARY KEY,
                 node_from    INTEGER NOT NULL,
                 node_to      INTEGER NOT NULL,
                 tag          INTEGER NOT NULL,
                 length       REAL    NOT NULL DEFAULT 0,
                 near_trunk   INTEGER NOT NULL DEFAULT 0,
                 near_primary INTEGER NOT NULL DEFAULT 0,
                 cost         REAL    NOT NULL DEFAULT 0,
                 UNIQUE(node_from, node_to)
             );",
        )?;
        Ok(Self { conn })
    }

    // ── Ingestion ─────────────────────────────────────────────────────────

    /// Batch-insert node rows; already-present node ids are ignored.
    pub fn insert_nodes(&mut self, rows: &[(i64, f64, f64)]) -> StoreResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO nodes (node_id, latitude, longitude) \
                 VALUES (?1, ?2, ?3)",
            )?;
            for &(node_id, latitude, longitude) in rows {
                stmt.execute(rusqlite::params![node_id, latitude, longitude])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Batch-insert bare edge rows `(node_from, node_to, tag)`; the
    /// attribute columns stay at their defaults until the phase updates
    /// run.  Duplicate pairs are ignored.
    pub fn insert_edges(&mut self, rows: &[(i64, i64, u16)]) -> StoreResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO edges (node_from, node_to, tag) \
                 VALUES (?1, ?2, ?3)",
            )?;
            for &(node_from, node_to, tag) in rows {
                stmt.execute(rusqlite::params![node_from, node_to, tag])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    // ── Phase updates ─────────────────────────────────────────────────────

    /// Write computed lengths, keyed by the edge's node pair.
    pub fn update_lengths(&mut self, rows: &[(i64, i64, f64)]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "UPDATE edges SET length = ?3 WHERE node_from = ?1 AND node_to = ?2",
            )?;
            for &(node_from, node_to, length) in rows {
                stmt.execute(rusqlite::params![node_from, node_to, length])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Set `near_trunk` on every edge originating at one of `origins`.
    pub fn mark_near_trunk(&mut self, origins: &[i64]) -> StoreResult<()> {
        self.mark_flag("near_trunk", origins)
    }

    /// Set `near_primary` on every edge originating at one of `origins`.
    pub fn mark_near_primary(&mut self, origins: &[i64]) -> StoreResult<()> {
        self.mark_flag("near_primary", origins)
    }

    fn mark_flag(&mut self, column: &str, origins: &[i64]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "UPDATE edges SET {column} = 1 WHERE node_from = ?1"
            ))?;
            for &origin in origins {
                stmt.execute(rusqlite::params![origin])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Write computed costs, keyed by the edge's node pair.
    pub fn update_costs(&mut self, rows: &[(i64, i64, f64)]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "UPDATE edges SET cost = ?3 WHERE node_from = ?1 AND node_to = ?2",
            )?;
            for &(node_from, node_to, cost) in rows {
                stmt.execute(rusqlite::params![node_from, node_to, cost])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Coordinates of every node that originates an edge of one of the
    /// given tag ordinals — the input to a proximity pass.
    pub fn origin_coordinates(&self, tags: &[u16]) -> StoreResult<Vec<(f64, f64)>> {
        let list = int_list(tags);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT latitude, longitude FROM nodes \
             WHERE node_id IN (SELECT node_from FROM edges WHERE tag IN ({list}))"
        ))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn load_nodes(&self) -> StoreResult<Vec<NodeRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT node_id, latitude, longitude FROM nodes ORDER BY node_id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(NodeRow {
                    node_id: row.get(0)?,
                    latitude: row.get(1)?,
                    longitude: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Load edge rows, skipping `excluded` tags, optionally restricted to
    /// edges originating inside `window` — the query a route request uses
    /// to pull its working subgraph.
    pub fn load_edges(
        &self,
        excluded: &[u16],
        window: Option<BoundingBox>,
    ) -> StoreResult<Vec<EdgeRow>> {
        let list = int_list(excluded);
        let mut sql = format!(
            "SELECT node_from, node_to, tag, length, near_trunk, near_primary, cost \
             FROM edges WHERE tag NOT IN ({list})"
        );
        if window.is_some() {
            sql.push_str(
                " AND node_from IN (SELECT node_id FROM nodes \
                 WHERE latitude BETWEEN ?1 AND ?2 AND longitude BETWEEN ?3 AND ?4)",
            );
        }
        sql.push_str(" ORDER BY node_from, node_to");

        let mut stmt = self.conn.prepare(&sql)?;
        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<EdgeRow> {
            Ok(EdgeRow {
                node_from: row.get(0)?,
                node_to: row.get(1)?,
                tag: row.get::<_, i64>(2)? as u16,
                length: row.get(3)?,
                near_trunk: row.get::<_, i64>(4)? != 0,
                near_primary: row.get::<_, i64>(5)? != 0,
                cost: row.get(6)?,
            })
        };
        let rows = match window {
            Some(bb) => stmt
                .query_map(
                    rusqlite::params![bb.south, bb.north, bb.west, bb.east],
                    map_row,
                )?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], map_row)?
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(rows)
    }

    pub fn node_count(&self) -> StoreResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get(0))?)
    }

    pub fn edge_count(&self) -> StoreResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM edges", [], |row| row.get(0))?)
    }

    // ── Network round-trip ────────────────────────────────────────────────

    /// Persist a built network, running the same phases as the in-memory
    /// pipeline: bare rows first, then lengths, flags, and costs.
    pub fn save_network(&mut self, net: &TrailNetwork) -> StoreResult<()> {
        let nodes: Vec<(i64, f64, f64)> = net
            .node_ids()
            .map(|n| {
                let p = net.position(n);
                (net.external_id(n), p.lat, p.lon)
            })
            .collect();
        self.insert_nodes(&nodes)?;

        let mut bare: Vec<(i64, i64, u16)> = net
            .edges()
            .iter()
            .map(|e| (net.external_id(e.from), net.external_id(e.to), e.tag.0))
            .collect();
        bare.extend(
            net.excluded_edges()
                .iter()
                .map(|e| (net.external_id(e.from), net.external_id(e.to), e.tag.0)),
        );
        self.insert_edges(&bare)?;

        let lengths: Vec<(i64, i64, f64)> = net
            .edges()
            .iter()
            .map(|e| (net.external_id(e.from), net.external_id(e.to), e.length_m))
            .collect();
        self.update_lengths(&lengths)?;

        let mut trunk_origins: Vec<i64> = net
            .edges()
            .iter()
            .filter(|e| e.near_trunk)
            .map(|e| net.external_id(e.from))
            .collect();
        trunk_origins.sort_unstable();
        trunk_origins.dedup();
        self.mark_near_trunk(&trunk_origins)?;

        let mut primary_origins: Vec<i64> = net
            .edges()
            .iter()
            .filter(|e| e.near_primary)
            .map(|e| net.external_id(e.from))
            .collect();
        primary_origins.sort_unstable();
        primary_origins.dedup();
        self.mark_near_primary(&primary_origins)?;

        let costs: Vec<(i64, i64, f64)> = net
            .edges()
            .iter()
            .map(|e| (net.external_id(e.from), net.external_id(e.to), e.cost))
            .collect();
        self.update_costs(&costs)?;
        Ok(())
    }

    /// Read everything back as builder input: each persisted edge becomes
    /// a two-node way.
    pub fn load_network_inputs(&self) -> StoreResult<(Vec<Way>, Vec<(i64, GeoPoint)>)> {
        let nodes = self
            .load_nodes()?
            .into_iter()
            .map(|row| (row.node_id, GeoPoint::new(row.latitude, row.longitude)))
            .collect();
        let ways = self
            .load_edges(&[], None)?
            .into_iter()
            .map(|row| Way::new(vec![row.node_from, row.node_to], TagId(row.tag)))
            .collect();
        Ok((ways, nodes))
    }
}

/// Comma-joined integer list for `IN (...)` clauses.  The values are plain
/// integers, so string assembly is safe here.
fn int_list(values: &[u16]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
