#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    use crate::api::{Complex, TargetId};
    use crate::config::MonitorConfig;
    use crate::error::ProviderError;
    use crate::models::{Antenna, Band, EventKind, Link, Snapshot, StationStatus};
    use crate::store::SnapshotStore;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn link(id: i64, name: &str, complex: Complex, antenna: &str, rtlt: f64) -> Link {
        Link {
            target_id: TargetId::new(id),
            target_name: name.to_string(),
            complex,
            antenna: antenna.to_string(),
            band: Band::X,
            down_rate_bps: 2048.0,
            up_rate_bps: 0.0,
            rtlt_seconds: rtlt,
        }
    }

    fn snapshot(secs: i64, links: Vec<Link>) -> Snapshot {
        Snapshot {
            timestamp: t(secs),
            stations: vec![StationStatus {
                complex: Complex::Goldstone,
                antennas: vec![Antenna {
                    name: "DSS-14".to_string(),
                    azimuth_deg: None,
                    elevation_deg: None,
                }],
            }],
            links,
        }
    }

    fn store() -> SnapshotStore {
        SnapshotStore::new(&MonitorConfig::default())
    }

    #[test]
    fn test_update_success_populates_view() {
        let store = store();
        let snap = snapshot(0, vec![link(74, "MRO", Complex::Goldstone, "DSS-14", 10.0)]);
        store.update(Ok(snap), std::time::Duration::from_millis(80));

        let view = store.view();
        assert!(view.snapshot.is_some());
        assert!(view.last_error.is_none());
        assert!(view.last_updated.is_some());
        assert_eq!(view.targets.len(), 1);
        assert_eq!(view.loads[0].active_links, 1);
        assert_eq!(view.loads[0].total_antennas, 1);
    }

    #[test]
    fn test_update_failure_keeps_previous_data() {
        let store = store();
        store.update(
            Ok(snapshot(0, vec![link(74, "MRO", Complex::Goldstone, "DSS-14", 10.0)])),
            std::time::Duration::from_millis(80),
        );
        let before = store.view();

        store.update(
            Err(ProviderError::Upstream("503".to_string())),
            std::time::Duration::from_millis(15),
        );
        let after = store.view();

        assert_eq!(after.snapshot, before.snapshot);
        assert_eq!(after.targets, before.targets);
        assert_eq!(after.last_updated, before.last_updated);
        assert!(after.last_error.as_deref().unwrap().contains("503"));
        // No event detection ran: the lone target was not reported lost.
        assert!(store.recent_events(10).is_empty());
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_lost_target_event_end_to_end() {
        let store = store();
        store.update(
            Ok(snapshot(0, vec![link(74, "MRO", Complex::Goldstone, "DSS-14", 10.0)])),
            std::time::Duration::from_millis(80),
        );
        store.update(Ok(snapshot(60, vec![])), std::time::Duration::from_millis(80));

        let events = store.recent_events(10);
        assert_eq!(events.len(), 2); // NEW_LINK then LINK_LOST
        let lost = &events[1];
        assert_eq!(lost.kind, EventKind::LinkLost);
        assert_eq!(lost.target_name, "MRO");
        assert_eq!(lost.old_station, Some(Complex::Goldstone));
    }

    #[test]
    fn test_velocity_from_successive_snapshots() {
        let store = store();
        store.update(
            Ok(snapshot(0, vec![link(74, "MRO", Complex::Goldstone, "DSS-14", 1000.0)])),
            std::time::Duration::from_millis(80),
        );
        store.update(
            Ok(snapshot(100, vec![link(74, "MRO", Complex::Goldstone, "DSS-14", 1002.0)])),
            std::time::Duration::from_millis(80),
        );

        assert!(store.estimate_velocity(TargetId::new(74)) > 0.0);
        assert_eq!(store.estimate_velocity(TargetId::new(999)), 0.0);
    }

    #[test]
    fn test_zero_rtlt_not_recorded() {
        let store = store();
        store.update(
            Ok(snapshot(0, vec![link(74, "MRO", Complex::Goldstone, "DSS-14", 0.0)])),
            std::time::Duration::from_millis(80),
        );
        let series = store.series(TargetId::new(74)).unwrap();
        assert!(series.rtlt_points().is_empty());
        assert_eq!(series.down_rate_points().len(), 1);
    }

    #[test]
    fn test_view_is_defensive_copy() {
        let store = store();
        store.update(
            Ok(snapshot(0, vec![link(74, "MRO", Complex::Goldstone, "DSS-14", 10.0)])),
            std::time::Duration::from_millis(80),
        );

        let mut view = store.view();
        view.targets.clear();
        view.snapshot.as_mut().unwrap().links.clear();

        let fresh = store.view();
        assert_eq!(fresh.targets.len(), 1);
        assert_eq!(fresh.snapshot.unwrap().links.len(), 1);
    }

    #[test]
    fn test_handoff_between_snapshots() {
        let store = store();
        store.update(
            Ok(snapshot(0, vec![link(32, "VGR2", Complex::Canberra, "DSS-43", 0.0)])),
            std::time::Duration::from_millis(80),
        );
        store.update(
            Ok(snapshot(60, vec![link(32, "VGR2", Complex::Madrid, "DSS-63", 0.0)])),
            std::time::Duration::from_millis(80),
        );

        let events = store.recent_events(10);
        let handoff = events.last().unwrap();
        assert_eq!(handoff.kind, EventKind::Handoff);
        assert_eq!(handoff.old_station, Some(Complex::Canberra));
        assert_eq!(handoff.new_station, Some(Complex::Madrid));
    }

    proptest! {
        // Rings stay within their configured bounds for arbitrary update
        // sequences mixing successes and failures.
        #[test]
        fn prop_rings_stay_bounded(steps in proptest::collection::vec(any::<bool>(), 1..40)) {
            let mut cfg = MonitorConfig::default();
            cfg.history_capacity = 4;
            cfg.event_capacity = 3;
            let store = SnapshotStore::new(&cfg);

            for (i, present) in steps.iter().enumerate() {
                let links = if *present {
                    vec![link(74, "MRO", Complex::Goldstone, "DSS-14", 10.0)]
                } else {
                    vec![]
                };
                store.update(Ok(snapshot(i as i64 * 60, links)), std::time::Duration::from_millis(5));
                prop_assert!(store.history().len() <= 4);
                prop_assert!(store.recent_events(100).len() <= 3);
            }

            // Events are chronologically non-decreasing by insertion.
            let events = store.recent_events(100);
            for pair in events.windows(2) {
                prop_assert!(pair[0].timestamp <= pair[1].timestamp);
            }
        }
    }
}
