//! Device aggregation and statistics.
//!
//! This module flattens an inventory into a device list and computes
//! every statistic the report renders. Each function is pure and can be
//! computed independently of the others.

use crate::models::{Device, DeviceStatus, Inventory, VlanId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Devices with fewer days of uptime than this are flagged.
pub const LOW_UPTIME_DAYS: u64 = 30;

/// Switches using more than this share of their ports are flagged.
pub const HIGH_PORT_USAGE_PERCENT: f64 = 80.0;

/// Label used for devices without a `type`.
pub const UNKNOWN_KIND: &str = "unknown";

/// Devices split by status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusPartition {
    pub offline: Vec<Device>,
    pub warning: Vec<Device>,
    pub online_or_other: Vec<Device>,
}

/// Summed port usage over a set of switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortTotals {
    pub used: u64,
    pub total: u64,
}

impl PortTotals {
    pub fn usage_percent(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.used as f64 / self.total as f64 * 100.0)
        }
    }
}

/// Port usage of the switches at one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitePortUsage {
    pub site: Option<String>,
    pub switches: usize,
    pub used: u64,
    pub total: u64,
}

impl SitePortUsage {
    pub fn usage_percent(&self) -> Option<f64> {
        PortTotals {
            used: self.used,
            total: self.total,
        }
        .usage_percent()
    }
}

/// Number of devices of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCount {
    pub kind: String,
    pub count: usize,
}

/// Device and status counts for a single location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSummary {
    pub site: Option<String>,
    pub city: Option<String>,
    pub contact: Option<String>,
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    pub warning: usize,
}

/// Every derived statistic used by the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub total_devices: usize,
    pub status: StatusPartition,
    pub low_uptime: Vec<Device>,
    pub high_port_usage: Vec<Device>,
    pub port_totals: PortTotals,
    pub port_totals_per_site: Vec<SitePortUsage>,
    pub device_types: Vec<KindCount>,
    pub vlans: Vec<VlanId>,
    pub sites: Vec<SiteSummary>,
}

impl NetworkStats {
    /// Compute all statistics for a flattened device list.
    pub fn compute(inventory: &Inventory, devices: &[Device]) -> Self {
        let stats = Self {
            total_devices: devices.len(),
            status: partition_by_status(devices),
            low_uptime: low_uptime(devices, LOW_UPTIME_DAYS),
            high_port_usage: high_port_usage(devices, HIGH_PORT_USAGE_PERCENT),
            port_totals: port_totals(devices),
            port_totals_per_site: port_totals_per_site(devices),
            device_types: device_type_counts(devices),
            vlans: vlan_set(devices),
            sites: site_summary(inventory),
        };

        debug!(
            "Aggregated {} devices: {} offline, {} warning, {} low uptime, {} high port usage, {} VLANs",
            stats.total_devices,
            stats.status.offline.len(),
            stats.status.warning.len(),
            stats.low_uptime.len(),
            stats.high_port_usage.len(),
            stats.vlans.len()
        );

        stats
    }
}

/// Flatten all locations into one device list, locations first, then devices.
pub fn flatten(inventory: &Inventory) -> Vec<Device> {
    inventory
        .locations
        .iter()
        .flat_map(|location| {
            location
                .devices
                .iter()
                .map(move |raw| Device::from_raw(raw, location))
        })
        .collect()
}

/// Split devices into offline, warning and everything else.
pub fn partition_by_status(devices: &[Device]) -> StatusPartition {
    let mut partition = StatusPartition::default();

    for device in devices {
        match device.status {
            Some(DeviceStatus::Offline) => partition.offline.push(device.clone()),
            Some(DeviceStatus::Warning) => partition.warning.push(device.clone()),
            _ => partition.online_or_other.push(device.clone()),
        }
    }

    partition
}

/// Devices with a known uptime strictly below `threshold_days`.
pub fn low_uptime(devices: &[Device], threshold_days: u64) -> Vec<Device> {
    devices
        .iter()
        .filter(|d| matches!(d.uptime_days, Some(days) if days < threshold_days))
        .cloned()
        .collect()
}

/// Switches whose port usage is strictly above `threshold_percent`.
pub fn high_port_usage(devices: &[Device], threshold_percent: f64) -> Vec<Device> {
    devices
        .iter()
        .filter(|d| matches!(d.port_usage_percent(), Some(p) if p > threshold_percent))
        .cloned()
        .collect()
}

/// Sum used and total ports over all switches with port data.
pub fn port_totals(devices: &[Device]) -> PortTotals {
    devices
        .iter()
        .filter_map(Device::switch_ports)
        .fold(PortTotals::default(), |acc, p| PortTotals {
            used: acc.used + p.used,
            total: acc.total + p.total,
        })
}

/// Port totals grouped by site, in first-seen site order.
///
/// Sites without a qualifying switch do not appear.
pub fn port_totals_per_site(devices: &[Device]) -> Vec<SitePortUsage> {
    let mut per_site: Vec<SitePortUsage> = Vec::new();

    for device in devices {
        let Some(ports) = device.switch_ports() else {
            continue;
        };

        match per_site.iter_mut().find(|s| s.site == device.site) {
            Some(entry) => {
                entry.switches += 1;
                entry.used += ports.used;
                entry.total += ports.total;
            }
            None => per_site.push(SitePortUsage {
                site: device.site.clone(),
                switches: 1,
                used: ports.used,
                total: ports.total,
            }),
        }
    }

    per_site
}

/// Count devices per type, in first-seen type order.
pub fn device_type_counts(devices: &[Device]) -> Vec<KindCount> {
    let mut counts: Vec<KindCount> = Vec::new();

    for device in devices {
        let kind = device
            .kind
            .as_ref()
            .map(|k| k.as_str())
            .unwrap_or(UNKNOWN_KIND);

        match counts.iter_mut().find(|c| c.kind == kind) {
            Some(entry) => entry.count += 1,
            None => counts.push(KindCount {
                kind: kind.to_string(),
                count: 1,
            }),
        }
    }

    counts
}

/// All distinct VLAN ids, sorted.
pub fn vlan_set(devices: &[Device]) -> Vec<VlanId> {
    devices
        .iter()
        .filter_map(|d| d.vlans.as_ref())
        .flatten()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Per-location device and status counts, in inventory order.
///
/// Locations sharing a site name are reported separately.
pub fn site_summary(inventory: &Inventory) -> Vec<SiteSummary> {
    inventory
        .locations
        .iter()
        .map(|location| {
            let count = |status: DeviceStatus| {
                location
                    .devices
                    .iter()
                    .filter(|d| d.status.as_ref() == Some(&status))
                    .count()
            };

            SiteSummary {
                site: location.site.clone(),
                city: location.city.clone(),
                contact: location.contact.clone(),
                total: location.devices.len(),
                online: count(DeviceStatus::Online),
                offline: count(DeviceStatus::Offline),
                warning: count(DeviceStatus::Warning),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceKind, DeviceRaw, Location, Ports};
    use proptest::prelude::*;

    fn create_test_device(hostname: &str, kind: &str, status: &str) -> DeviceRaw {
        DeviceRaw {
            hostname: Some(hostname.to_string()),
            ip_address: Some("10.0.0.1".to_string()),
            kind: Some(DeviceKind::from(kind)),
            status: Some(DeviceStatus::from(status)),
            ..DeviceRaw::default()
        }
    }

    fn create_test_location(site: &str, devices: Vec<DeviceRaw>) -> Location {
        Location {
            site: Some(site.to_string()),
            city: Some(format!("{} city", site)),
            contact: None,
            devices,
        }
    }

    fn switch(hostname: &str, total: u64, used: u64) -> DeviceRaw {
        DeviceRaw {
            ports: Some(Ports { total, used }),
            ..create_test_device(hostname, "switch", "online")
        }
    }

    fn inventory(locations: Vec<Location>) -> Inventory {
        Inventory {
            company: Some("Acme".to_string()),
            last_updated: None,
            locations,
        }
    }

    fn hostnames(devices: &[Device]) -> Vec<&str> {
        devices.iter().filter_map(|d| d.hostname.as_deref()).collect()
    }

    #[test]
    fn test_flatten_preserves_order_and_site() {
        let inv = inventory(vec![
            create_test_location(
                "HQ",
                vec![
                    create_test_device("A", "switch", "online"),
                    create_test_device("B", "router", "online"),
                ],
            ),
            create_test_location("DC", vec![create_test_device("C", "server", "online")]),
        ]);

        let devices = flatten(&inv);

        assert_eq!(hostnames(&devices), vec!["A", "B", "C"]);
        assert_eq!(devices[1].site.as_deref(), Some("HQ"));
        assert_eq!(devices[1].city.as_deref(), Some("HQ city"));
        assert_eq!(devices[2].site.as_deref(), Some("DC"));
    }

    #[test]
    fn test_flatten_empty_inventory() {
        assert!(flatten(&inventory(vec![])).is_empty());
    }

    #[test]
    fn test_partition_by_status() {
        let inv = inventory(vec![create_test_location(
            "HQ",
            vec![
                create_test_device("A", "switch", "offline"),
                create_test_device("B", "router", "warning"),
                create_test_device("C", "server", "online"),
                create_test_device("D", "server", "degraded"),
            ],
        )]);

        let partition = partition_by_status(&flatten(&inv));

        assert_eq!(hostnames(&partition.offline), vec!["A"]);
        assert_eq!(hostnames(&partition.warning), vec!["B"]);
        assert_eq!(hostnames(&partition.online_or_other), vec!["C", "D"]);
    }

    #[test]
    fn test_low_uptime_threshold_is_strict() {
        let mut fresh = create_test_device("FRESH", "router", "online");
        fresh.uptime_days = Some(29);
        let mut boundary = create_test_device("BOUNDARY", "router", "online");
        boundary.uptime_days = Some(30);
        let unknown = create_test_device("UNKNOWN", "router", "online");

        let devices = flatten(&inventory(vec![create_test_location(
            "HQ",
            vec![fresh, boundary, unknown],
        )]));

        assert_eq!(hostnames(&low_uptime(&devices, LOW_UPTIME_DAYS)), vec!["FRESH"]);
    }

    #[test]
    fn test_high_port_usage() {
        let mut router = create_test_device("RT", "router", "online");
        router.ports = Some(Ports { total: 10, used: 10 });

        let devices = flatten(&inventory(vec![create_test_location(
            "HQ",
            vec![
                switch("SW1", 10, 9),
                switch("SW2", 10, 8),
                switch("SW3", 0, 0),
                router,
            ],
        )]));

        let high = high_port_usage(&devices, HIGH_PORT_USAGE_PERCENT);
        assert_eq!(hostnames(&high), vec!["SW1"]);
    }

    #[test]
    fn test_port_totals_skip_empty_switches() {
        let devices = flatten(&inventory(vec![
            create_test_location("HQ", vec![switch("SW1", 10, 9), switch("SW2", 0, 0)]),
            create_test_location("DC", vec![switch("SW3", 20, 5)]),
        ]));

        assert_eq!(port_totals(&devices), PortTotals { used: 14, total: 30 });
    }

    #[test]
    fn test_port_totals_no_data() {
        let devices = flatten(&inventory(vec![create_test_location(
            "HQ",
            vec![switch("SW1", 0, 0)],
        )]));

        let totals = port_totals(&devices);
        assert_eq!(totals, PortTotals::default());
        assert_eq!(totals.usage_percent(), None);
    }

    #[test]
    fn test_port_totals_per_site() {
        let devices = flatten(&inventory(vec![
            create_test_location("HQ", vec![switch("SW1", 10, 9)]),
            create_test_location("Empty", vec![switch("SW2", 0, 0)]),
            create_test_location("DC", vec![switch("SW3", 20, 5)]),
            create_test_location("HQ", vec![switch("SW4", 10, 1)]),
        ]));

        let per_site = port_totals_per_site(&devices);

        assert_eq!(per_site.len(), 2);
        assert_eq!(per_site[0].site.as_deref(), Some("HQ"));
        assert_eq!(per_site[0].switches, 2);
        assert_eq!(per_site[0].used, 10);
        assert_eq!(per_site[0].total, 20);
        assert_eq!(per_site[1].site.as_deref(), Some("DC"));
        assert_eq!(per_site[1].usage_percent(), Some(25.0));
    }

    #[test]
    fn test_device_type_counts_first_seen_order() {
        let mut untyped = create_test_device("X", "switch", "online");
        untyped.kind = None;

        let devices = flatten(&inventory(vec![create_test_location(
            "HQ",
            vec![
                create_test_device("A", "router", "online"),
                create_test_device("B", "switch", "online"),
                create_test_device("C", "router", "online"),
                untyped,
            ],
        )]));

        let counts = device_type_counts(&devices);
        let pairs: Vec<(&str, usize)> = counts.iter().map(|c| (c.kind.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("router", 2), ("switch", 1), ("unknown", 1)]);
    }

    #[test]
    fn test_vlan_set_dedup_and_sorted() {
        let mut a = create_test_device("A", "switch", "online");
        a.vlans = Some(vec![VlanId::Number(10), VlanId::Number(20)]);
        let mut b = create_test_device("B", "switch", "online");
        b.vlans = Some(vec![VlanId::Number(20), VlanId::Number(30)]);

        let devices = flatten(&inventory(vec![create_test_location("HQ", vec![b, a])]));

        assert_eq!(
            vlan_set(&devices),
            vec![VlanId::Number(10), VlanId::Number(20), VlanId::Number(30)]
        );
    }

    #[test]
    fn test_site_summary_keeps_duplicate_sites() {
        let inv = inventory(vec![
            create_test_location(
                "HQ",
                vec![
                    create_test_device("A", "switch", "online"),
                    create_test_device("B", "switch", "offline"),
                    create_test_device("C", "switch", "rebooting"),
                ],
            ),
            create_test_location("HQ", vec![create_test_device("D", "switch", "warning")]),
        ]);

        let sites = site_summary(&inv);

        assert_eq!(sites.len(), 2);
        assert_eq!(
            (sites[0].total, sites[0].online, sites[0].offline, sites[0].warning),
            (3, 1, 1, 0)
        );
        assert_eq!(
            (sites[1].total, sites[1].online, sites[1].offline, sites[1].warning),
            (1, 0, 0, 1)
        );
    }

    #[test]
    fn test_compute_fixture() {
        let inv = Inventory::from_json(include_str!("../../fixtures/network_devices.json")).unwrap();
        let devices = flatten(&inv);
        let stats = NetworkStats::compute(&inv, &devices);

        assert_eq!(stats.total_devices, 9);
        assert_eq!(hostnames(&stats.status.offline), vec!["SW-ACCESS-03", "AP-LAGER-02"]);
        assert_eq!(hostnames(&stats.status.warning), vec!["AP-FLOOR2-02", "SW-DC-TOR-02"]);
        assert_eq!(
            hostnames(&stats.low_uptime),
            vec!["SW-ACCESS-03", "AP-FLOOR2-02", "SW-DC-TOR-02"]
        );
        assert_eq!(
            hostnames(&stats.high_port_usage),
            vec!["SW-CORE-01", "SW-DC-TOR-01", "SW-DC-TOR-02"]
        );
        assert_eq!(stats.port_totals, PortTotals { used: 147, total: 168 });
        assert_eq!(stats.port_totals_per_site.len(), 2);
        assert_eq!(stats.vlans.len(), 6);
        assert_eq!(stats.sites.len(), 3);
    }

    fn arb_device() -> impl Strategy<Value = DeviceRaw> {
        (
            prop::option::of(0u64..60),
            prop::option::of((0u64..50, 0u64..50)),
            prop::option::of(prop::collection::vec(0i64..20, 0..6)),
            prop::bool::ANY,
        )
            .prop_map(|(uptime, ports, vlans, is_switch)| DeviceRaw {
                hostname: Some("dev".to_string()),
                ip_address: None,
                kind: Some(if is_switch {
                    DeviceKind::Switch
                } else {
                    DeviceKind::Router
                }),
                status: Some(DeviceStatus::Online),
                uptime_days: uptime,
                ports: ports.map(|(total, used)| Ports { total, used }),
                vlans: vlans.map(|v| v.into_iter().map(VlanId::Number).collect()),
            })
    }

    fn arb_inventory() -> impl Strategy<Value = Inventory> {
        prop::collection::vec(prop::collection::vec(arb_device(), 0..5), 0..5).prop_map(
            |locations| {
                inventory(
                    locations
                        .into_iter()
                        .enumerate()
                        .map(|(i, devices)| create_test_location(&format!("site-{}", i), devices))
                        .collect(),
                )
            },
        )
    }

    proptest! {
        #[test]
        fn prop_flatten_keeps_every_device(inv in arb_inventory()) {
            let devices = flatten(&inv);
            prop_assert_eq!(devices.len(), inv.device_count());

            let mut offset = 0;
            for location in &inv.locations {
                for device in &devices[offset..offset + location.devices.len()] {
                    prop_assert_eq!(&device.site, &location.site);
                }
                offset += location.devices.len();
            }
        }

        #[test]
        fn prop_vlan_set_strictly_sorted(inv in arb_inventory()) {
            let vlans = vlan_set(&flatten(&inv));
            prop_assert!(vlans.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn prop_thresholds_exclude_missing_data(inv in arb_inventory()) {
            let devices = flatten(&inv);
            for device in high_port_usage(&devices, HIGH_PORT_USAGE_PERCENT) {
                prop_assert!(matches!(device.ports, Some(p) if p.total > 0));
            }
            for device in low_uptime(&devices, LOW_UPTIME_DAYS) {
                prop_assert!(device.uptime_days.is_some());
            }
        }
    }
}
