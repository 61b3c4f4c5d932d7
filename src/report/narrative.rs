//! Narrative text for the summary and guidance sections.
//!
//! The executive summary is a fixed table of `(predicate, text)` rules
//! evaluated in order; a rule's text is included iff its predicate holds.
//! The prioritization matrix and process overview are static.

use crate::analysis::NetworkStats;

/// Site name the inventory uses for the data center.
pub const DATACENTER_SITE: &str = "Datacenter";

/// Site name the inventory uses for the head office.
pub const HEADQUARTERS_SITE: &str = "Huvudkontor";

/// A summary sentence and the condition under which it appears.
pub struct SummaryRule {
    pub applies: fn(&NetworkStats) -> bool,
    pub text: &'static str,
}

fn has_offline(stats: &NetworkStats) -> bool {
    !stats.status.offline.is_empty()
}

fn no_offline(stats: &NetworkStats) -> bool {
    stats.status.offline.is_empty()
}

fn has_warning(stats: &NetworkStats) -> bool {
    !stats.status.warning.is_empty()
}

fn has_low_uptime(stats: &NetworkStats) -> bool {
    !stats.low_uptime.is_empty()
}

fn high_usage_at(stats: &NetworkStats, site: &str) -> bool {
    stats
        .high_port_usage
        .iter()
        .any(|d| d.site.as_deref() == Some(site))
}

fn datacenter_capacity(stats: &NetworkStats) -> bool {
    high_usage_at(stats, DATACENTER_SITE)
}

fn headquarters_capacity(stats: &NetworkStats) -> bool {
    high_usage_at(stats, HEADQUARTERS_SITE)
}

pub const SUMMARY_RULES: &[SummaryRule] = &[
    SummaryRule {
        applies: has_offline,
        text: "There are offline devices that need troubleshooting right away,\n\
               since they affect operations and users' access to the network.",
    },
    SummaryRule {
        applies: no_offline,
        text: "There are no offline devices at the moment.",
    },
    SummaryRule {
        applies: datacenter_capacity,
        text: "The data center has very high load on several switches. This can\n\
               lead to capacity problems ahead unless action is taken.",
    },
    SummaryRule {
        applies: headquarters_capacity,
        text: "Several switches at the head office also run at high port usage.\n\
               This may need review to avoid future bottlenecks.",
    },
    SummaryRule {
        applies: has_low_uptime,
        text: "Several devices have short uptime, which can mean they were\n\
               restarted recently or that there is some form of instability.",
    },
    SummaryRule {
        applies: has_warning,
        text: "Devices in warning state should be checked before they escalate\n\
               into outages.",
    },
];

/// Texts of the rules that apply, in table order.
pub fn summary_sentences(stats: &NetworkStats) -> Vec<&'static str> {
    SUMMARY_RULES
        .iter()
        .filter(|rule| (rule.applies)(stats))
        .map(|rule| rule.text)
        .collect()
}

/// One quadrant of the prioritization matrix.
pub struct Quadrant {
    pub title: &'static str,
    pub description: &'static str,
    pub actions: &'static [&'static str],
}

pub const PRIORITY_MATRIX: &[Quadrant] = &[
    Quadrant {
        title: "Important & Urgent (Do Now)",
        description: "Actions that directly affect operations, availability or security.",
        actions: &[
            "Troubleshoot the devices listed as offline.",
            "Check the devices listed with warning status.",
            "Follow up devices with very low uptime (0-5 days) to confirm stability.",
        ],
    },
    Quadrant {
        title: "Important but Not Urgent (Plan)",
        description: "Actions that need planning, budget or capacity decisions.",
        actions: &[
            "Investigate capacity at sites where switches exceed 80% port usage.",
            "Plan port expansion or redistribution of traffic.",
            "Consider better load balancing for heavily used access points.",
        ],
    },
    Quadrant {
        title: "Less Important but Urgent (Delegate)",
        description: "Can be handled by first-line support or operations staff.",
        actions: &[
            "Follow up devices with 8-30 days of uptime to see if restarts were planned.",
            "Double-check the VLAN allocation documentation.",
        ],
    },
    Quadrant {
        title: "Less Important and Not Urgent (Monitor)",
        description: "Nothing acute. Keep watching, no action needed right now.",
        actions: &[
            "Switches below 80% port usage.",
            "Sites where all devices are online and stable.",
        ],
    },
];

/// One service-management process and how the report relates to it.
pub struct ProcessArea {
    pub name: &'static str,
    pub text: &'static str,
}

pub const PROCESS_AREAS: &[ProcessArea] = &[
    ProcessArea {
        name: "Incident Management",
        text: "Offline devices count as incidents since they affect availability\n\
               and must be handled immediately.",
    },
    ProcessArea {
        name: "Problem Management",
        text: "Devices with low uptime (0-5 days) can point to underlying problems,\n\
               such as instability or recurring restarts. These should be followed up.",
    },
    ProcessArea {
        name: "Capacity Management",
        text: "Switches with very high port usage (>90%) show that capacity is\n\
               reaching its limit and that expansion may need planning.",
    },
    ProcessArea {
        name: "Availability Management",
        text: "Warning devices and high load can affect network availability and SLA.\n\
               These should be followed up in operations meetings and monitored over time.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Device, DeviceKind, DeviceStatus, Ports};

    fn device(site: &str, status: DeviceStatus) -> Device {
        Device {
            hostname: Some("dev".to_string()),
            ip_address: None,
            kind: Some(DeviceKind::Switch),
            status: Some(status),
            uptime_days: None,
            ports: Some(Ports { total: 10, used: 9 }),
            vlans: None,
            site: Some(site.to_string()),
            city: None,
        }
    }

    #[test]
    fn test_empty_stats_only_reports_no_offline() {
        let sentences = summary_sentences(&NetworkStats::default());
        assert_eq!(sentences, vec!["There are no offline devices at the moment."]);
    }

    #[test]
    fn test_offline_rule_is_exclusive() {
        let mut stats = NetworkStats::default();
        stats.status.offline.push(device("HQ", DeviceStatus::Offline));

        let sentences = summary_sentences(&stats);
        assert_eq!(sentences.len(), 1);
        assert!(sentences[0].starts_with("There are offline devices"));
    }

    #[test]
    fn test_capacity_rules_follow_site() {
        let mut stats = NetworkStats::default();
        stats
            .high_port_usage
            .push(device(DATACENTER_SITE, DeviceStatus::Online));

        let sentences = summary_sentences(&stats);
        assert!(sentences.iter().any(|s| s.starts_with("The data center")));
        assert!(!sentences.iter().any(|s| s.contains("head office")));

        stats.high_port_usage = vec![device("Branch", DeviceStatus::Online)];
        let sentences = summary_sentences(&stats);
        assert!(!sentences.iter().any(|s| s.starts_with("The data center")));
    }

    #[test]
    fn test_guidance_tables_complete() {
        assert_eq!(PRIORITY_MATRIX.len(), 4);
        assert!(PRIORITY_MATRIX.iter().all(|q| !q.actions.is_empty()));
        assert_eq!(PROCESS_AREAS.len(), 4);
    }
}
