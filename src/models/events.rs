//! Link events derived by diffing successive snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{Complex, TargetId};

/// Classification of a change in a target's link state between two snapshots.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Target absent before, present now.
    NewLink,
    /// Target present before, absent now.
    LinkLost,
    /// Target present in both snapshots at different complexes.
    Handoff,
    /// Target reappeared within the grace window of its loss.
    LinkResumed,
}

/// A detected link event. Appended to a bounded ring in detection order and
/// never retracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEvent {
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
    pub target_id: TargetId,
    pub target_name: String,
    /// Complex that served the target before the change, where applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_station: Option<Complex>,
    /// Complex serving the target after the change, where applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_station: Option<Complex>,
    /// Antenna involved on the new side of the change, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub antenna: Option<String>,
}

impl LinkEvent {
    /// The complex the event is attributed to for display: the new side for
    /// acquisitions and handoffs, the old side for losses.
    pub fn station_of_record(&self) -> Option<Complex> {
        match self.kind {
            EventKind::NewLink | EventKind::Handoff | EventKind::LinkResumed => self.new_station,
            EventKind::LinkLost => self.old_station,
        }
    }
}
