//! Plain data rows matching the persisted schema.

/// One row of the `nodes` table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRow {
    pub node_id: i64,
    pub latitude: f64,
    pub longitude: f64,
}

/// One row of the `edges` table.
///
/// `node_from`/`node_to` are external node ids; `tag` is the registry
/// ordinal.  The attribute columns start at their schema defaults and are
/// filled in by the phase updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRow {
    pub node_from: i64,
    pub node_to: i64,
    pub tag: u16,
    pub length: f64,
    pub near_trunk: bool,
    pub near_primary: bool,
    pub cost: f64,
}
