//! Link event detection by diffing successive snapshots.
//!
//! The detector runs once per successful store update. It compares the
//! previous and current per-target link maps and classifies every difference;
//! targets present in both snapshots at the same complex produce nothing.
//! A reappearance within the configured grace window of the target's recorded
//! loss is classified as resumed rather than new.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::api::{Complex, TargetId};
use crate::models::{EventKind, LinkEvent, Snapshot};

/// The link state of one target inside a snapshot: the first link in snapshot
/// order is the target's link of record for diffing.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveLink {
    pub target_name: String,
    pub complex: Complex,
    pub antenna: String,
}

/// Timestamp and complex of a target's most recent loss, kept so a prompt
/// reappearance can be told apart from a brand-new acquisition.
#[derive(Debug, Clone, PartialEq)]
pub struct LossRecord {
    pub at: DateTime<Utc>,
    pub station: Complex,
}

/// Per-target link map of a snapshot, keyed by target identity.
pub fn link_map(snapshot: &Snapshot) -> HashMap<TargetId, ActiveLink> {
    let mut map = HashMap::new();
    for link in &snapshot.links {
        map.entry(link.target_id).or_insert_with(|| ActiveLink {
            target_name: link.target_name.clone(),
            complex: link.complex,
            antenna: link.antenna.clone(),
        });
    }
    map
}

/// Diff two link maps and classify every change.
///
/// `losses` is mutated: lost targets are recorded, reappearing targets are
/// cleared, and records older than the grace window are pruned. Events are
/// emitted in ascending target-id order so a given diff is deterministic.
pub fn detect_events(
    previous: &HashMap<TargetId, ActiveLink>,
    current: &HashMap<TargetId, ActiveLink>,
    losses: &mut HashMap<TargetId, LossRecord>,
    at: DateTime<Utc>,
    grace: Duration,
) -> Vec<LinkEvent> {
    let mut events = Vec::new();

    let mut targets: Vec<TargetId> = previous.keys().chain(current.keys()).copied().collect();
    targets.sort_unstable();
    targets.dedup();

    for target in targets {
        match (previous.get(&target), current.get(&target)) {
            (None, Some(cur)) => {
                let resumed = losses
                    .remove(&target)
                    .filter(|loss| at - loss.at <= grace);
                let kind = if resumed.is_some() {
                    EventKind::LinkResumed
                } else {
                    EventKind::NewLink
                };
                events.push(LinkEvent {
                    kind,
                    timestamp: at,
                    target_id: target,
                    target_name: cur.target_name.clone(),
                    old_station: resumed.map(|loss| loss.station),
                    new_station: Some(cur.complex),
                    antenna: Some(cur.antenna.clone()),
                });
            }
            (Some(prev), None) => {
                losses.insert(
                    target,
                    LossRecord {
                        at,
                        station: prev.complex,
                    },
                );
                events.push(LinkEvent {
                    kind: EventKind::LinkLost,
                    timestamp: at,
                    target_id: target,
                    target_name: prev.target_name.clone(),
                    old_station: Some(prev.complex),
                    new_station: None,
                    antenna: None,
                });
            }
            (Some(prev), Some(cur)) if prev.complex != cur.complex => {
                events.push(LinkEvent {
                    kind: EventKind::Handoff,
                    timestamp: at,
                    target_id: target,
                    target_name: cur.target_name.clone(),
                    old_station: Some(prev.complex),
                    new_station: Some(cur.complex),
                    antenna: Some(cur.antenna.clone()),
                });
            }
            _ => {}
        }
    }

    losses.retain(|_, loss| at - loss.at <= grace);

    events
}
