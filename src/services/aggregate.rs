//! Wholesale aggregation over a snapshot.
//!
//! No incremental bookkeeping: every update recomputes the per-complex loads
//! and the flattened per-target view from scratch, so the aggregates can never
//! drift from the snapshot that produced them.

use std::collections::BTreeMap;

use crate::api::{Complex, TargetId};
use crate::models::{ComplexLoad, Snapshot, TargetView};

/// Per-complex load summary in canonical complex order. Antennas count
/// whether or not they carry a link.
pub fn complex_loads(snapshot: &Snapshot) -> Vec<ComplexLoad> {
    Complex::ALL
        .iter()
        .map(|&complex| {
            let total_antennas = snapshot
                .stations
                .iter()
                .filter(|s| s.complex == complex)
                .map(|s| s.antennas.len())
                .sum();
            let active_links = snapshot
                .links
                .iter()
                .filter(|l| l.complex == complex)
                .count();
            ComplexLoad {
                complex,
                total_antennas,
                active_links,
            }
        })
        .collect()
}

/// Flattened per-target view: all links sharing a target identity, ordered by
/// target code (ties broken by id) for stable UI grouping.
pub fn target_views(snapshot: &Snapshot) -> Vec<TargetView> {
    let mut grouped: BTreeMap<(String, TargetId), TargetView> = BTreeMap::new();
    for link in &snapshot.links {
        grouped
            .entry((link.target_name.clone(), link.target_id))
            .or_insert_with(|| TargetView {
                target_id: link.target_id,
                target_name: link.target_name.clone(),
                links: Vec::new(),
            })
            .links
            .push(link.clone());
    }
    grouped.into_values().collect()
}
