//! Text and JSON report generation.
//!
//! The text report is written section by section straight to the sink.
//! Sections only format what the aggregator computed; a failed write
//! aborts the remaining sections.

use super::clock::Clock;
use super::narrative::{summary_sentences, PRIORITY_MATRIX, PROCESS_AREAS};
use crate::analysis::{
    self, KindCount, NetworkStats, PortTotals, SitePortUsage, SiteSummary,
    HIGH_PORT_USAGE_PERCENT, LOW_UPTIME_DAYS,
};
use crate::models::{Device, Inventory, NetworkReport, ReportError, ReportMetadata, VlanId};
use chrono::{DateTime, Utc};
use std::io::{self, Write};

/// Default strftime pattern for the render timestamp.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

const BANNER_WIDTH: usize = 80;

const UNKNOWN_COMPANY: &str = "Unknown company";
const UNKNOWN_DATE: &str = "Unknown date";
const UNKNOWN_CONTACT: &str = "Unknown contact";
const UNKNOWN_SITE: &str = "Unknown site";
const UNKNOWN_CITY: &str = "Unknown city";
const UNKNOWN_TYPE: &str = "unknown type";
const UNKNOWN_IP: &str = "unknown IP";
const UNKNOWN_HOST: &str = "unknown host";

/// Flatten the inventory, compute statistics and stamp the render time.
pub fn build_report(inventory: &Inventory, clock: &dyn Clock) -> NetworkReport {
    let devices = analysis::flatten(inventory);
    let stats = NetworkStats::compute(inventory, &devices);

    NetworkReport {
        metadata: ReportMetadata {
            company: inventory.company.clone(),
            last_updated: inventory.last_updated.clone(),
            generated_at: clock.now(),
        },
        devices,
        stats,
    }
}

/// Write the complete text report to `out`.
pub fn write_text_report<W: Write>(
    out: &mut W,
    report: &NetworkReport,
    timestamp_format: &str,
) -> Result<(), ReportError> {
    let stats = &report.stats;

    write_header(out, &report.metadata, timestamp_format)?;
    writeln!(
        out,
        "Total number of devices in the network: {}\n",
        stats.total_devices
    )?;

    write_problem_devices(out, &stats.status.offline, &stats.status.warning)?;
    write_low_uptime(out, &stats.low_uptime)?;
    write_device_types(out, &stats.device_types)?;

    write_port_usage(
        out,
        &stats.port_totals,
        &stats.port_totals_per_site,
        &stats.high_port_usage,
    )?;
    write_vlan_overview(out, &stats.vlans)?;
    write_site_overview(out, &stats.sites)?;

    write_executive_summary(out, stats)?;
    write_priority_matrix(out)?;
    write_process_overview(out)?;

    out.flush()?;
    Ok(())
}

/// Render the text report into a string.
#[allow(dead_code)] // Convenience wrapper
pub fn generate_text_report(
    report: &NetworkReport,
    timestamp_format: &str,
) -> Result<String, ReportError> {
    let mut buffer = Vec::new();
    write_text_report(&mut buffer, report, timestamp_format)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Generate a JSON report.
pub fn generate_json_report(report: &NetworkReport) -> Result<String, ReportError> {
    serde_json::to_string_pretty(report).map_err(ReportError::Serialize)
}

fn or_default<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value.as_deref().unwrap_or(fallback)
}

/// Upper-case the first character.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn write_title<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))
}

fn write_header<W: Write>(
    out: &mut W,
    metadata: &ReportMetadata,
    timestamp_format: &str,
) -> io::Result<()> {
    let banner = "=".repeat(BANNER_WIDTH);

    writeln!(out, "{}", banner)?;
    writeln!(
        out,
        "NETWORK REPORT - {}",
        or_default(&metadata.company, UNKNOWN_COMPANY)
    )?;
    writeln!(out, "{}", banner)?;
    writeln!(
        out,
        "Data last updated: {}",
        or_default(&metadata.last_updated, UNKNOWN_DATE)
    )?;
    writeln!(
        out,
        "Report generated: {}\n",
        format_timestamp(&metadata.generated_at, timestamp_format)
    )
}

fn format_timestamp(at: &DateTime<Utc>, format: &str) -> String {
    use std::fmt::Write as _;

    let mut rendered = String::new();
    if write!(rendered, "{}", at.format(format)).is_err() {
        rendered.clear();
        let _ = write!(rendered, "{}", at.format(DEFAULT_TIMESTAMP_FORMAT));
    }
    rendered
}

fn write_device_row<W: Write>(out: &mut W, device: &Device) -> io::Result<()> {
    writeln!(
        out,
        "  {:15} {:15} {:12} {}",
        or_default(&device.hostname, UNKNOWN_HOST),
        or_default(&device.ip_address, UNKNOWN_IP),
        device.kind.as_ref().map(|k| k.as_str()).unwrap_or(UNKNOWN_TYPE),
        or_default(&device.site, UNKNOWN_SITE)
    )
}

fn write_problem_devices<W: Write>(
    out: &mut W,
    offline: &[Device],
    warning: &[Device],
) -> io::Result<()> {
    write_title(out, "DEVICES WITH PROBLEMS")?;

    writeln!(out, "Status: OFFLINE")?;
    if offline.is_empty() {
        writeln!(out, "  No devices offline.")?;
    }
    for device in offline {
        write_device_row(out, device)?;
    }

    writeln!(out, "\nStatus: WARNING")?;
    if warning.is_empty() {
        writeln!(out, "  No devices with warning status.")?;
    }
    for device in warning {
        write_device_row(out, device)?;
    }

    writeln!(out)
}

fn write_low_uptime<W: Write>(out: &mut W, devices: &[Device]) -> io::Result<()> {
    write_title(
        out,
        &format!("DEVICES WITH LOW UPTIME (< {} days)", LOW_UPTIME_DAYS),
    )?;

    if devices.is_empty() {
        writeln!(out, "  No devices have low uptime.")?;
    }
    for device in devices {
        let days = device
            .uptime_days
            .map(|d| d.to_string())
            .unwrap_or_default();
        writeln!(
            out,
            "  {:15} {:<5} days   {:12} {}",
            or_default(&device.hostname, UNKNOWN_HOST),
            days,
            device.kind.as_ref().map(|k| k.as_str()).unwrap_or(UNKNOWN_TYPE),
            or_default(&device.site, UNKNOWN_SITE)
        )?;
    }

    writeln!(out)
}

fn write_device_types<W: Write>(out: &mut W, counts: &[KindCount]) -> io::Result<()> {
    write_title(out, "STATISTICS PER DEVICE TYPE")?;

    if counts.is_empty() {
        writeln!(out, "  No devices in the inventory.")?;
    }
    for entry in counts {
        writeln!(out, "  {:12}: {}", capitalize(&entry.kind), entry.count)?;
    }

    writeln!(out)
}

fn write_port_usage<W: Write>(
    out: &mut W,
    totals: &PortTotals,
    per_site: &[SitePortUsage],
    high_usage: &[Device],
) -> io::Result<()> {
    write_title(out, "SWITCH PORT USAGE")?;

    match totals.usage_percent() {
        None => writeln!(out, "  No port data found for switches.\n")?,
        Some(percent) => {
            writeln!(
                out,
                "Total: {}/{} ports in use ({:.1}% usage).\n",
                totals.used, totals.total, percent
            )?;

            writeln!(out, "Per site:")?;
            for site in per_site {
                writeln!(
                    out,
                    "  {:15} Switches: {:2}  Ports: {}/{} ({:.1}%)",
                    or_default(&site.site, UNKNOWN_SITE),
                    site.switches,
                    site.used,
                    site.total,
                    site.usage_percent().unwrap_or(0.0)
                )?;
            }
            writeln!(out)?;
        }
    }

    write_title(
        out,
        &format!(
            "SWITCHES WITH HIGH PORT USAGE (> {}%)",
            HIGH_PORT_USAGE_PERCENT
        ),
    )?;

    if high_usage.is_empty() {
        writeln!(out, "  No switches have high port usage.")?;
    }
    for device in high_usage {
        let Some(ports) = device.switch_ports() else {
            continue;
        };
        writeln!(
            out,
            "  {:15} {:2}/{:2} ports  ({:.1}%)  {}",
            or_default(&device.hostname, UNKNOWN_HOST),
            ports.used,
            ports.total,
            ports.usage_percent().unwrap_or(0.0),
            or_default(&device.site, UNKNOWN_SITE)
        )?;
    }

    writeln!(out)
}

fn write_vlan_overview<W: Write>(out: &mut W, vlans: &[VlanId]) -> io::Result<()> {
    write_title(out, "VLAN OVERVIEW")?;

    if vlans.is_empty() {
        return writeln!(out, "  No VLANs found in the data.\n");
    }

    let list: Vec<String> = vlans.iter().map(|v| v.to_string()).collect();
    writeln!(out, "Total number of unique VLANs: {}", vlans.len())?;
    writeln!(out, "VLANs: {}\n", list.join(", "))
}

fn write_site_overview<W: Write>(out: &mut W, sites: &[SiteSummary]) -> io::Result<()> {
    write_title(out, "STATISTICS PER SITE")?;

    if sites.is_empty() {
        return writeln!(out, "  No sites in the inventory.\n");
    }

    for site in sites {
        writeln!(
            out,
            "{} ({}):",
            or_default(&site.site, UNKNOWN_SITE),
            or_default(&site.city, UNKNOWN_CITY)
        )?;
        writeln!(
            out,
            "  Devices: {} (online: {}, offline: {}, warning: {})",
            site.total, site.online, site.offline, site.warning
        )?;
        writeln!(
            out,
            "  Contact: {}\n",
            or_default(&site.contact, UNKNOWN_CONTACT)
        )?;
    }

    Ok(())
}

fn write_executive_summary<W: Write>(out: &mut W, stats: &NetworkStats) -> io::Result<()> {
    write_title(out, "EXECUTIVE SUMMARY")?;

    writeln!(out, "- Critical: {} devices offline.", stats.status.offline.len())?;
    writeln!(
        out,
        "- Warning: {} devices with warning status.",
        stats.status.warning.len()
    )?;
    writeln!(
        out,
        "- Stability: {} devices have low uptime (< {} days).",
        stats.low_uptime.len(),
        LOW_UPTIME_DAYS
    )?;
    writeln!(
        out,
        "- Capacity: {} switches have high port usage (> {}%).\n",
        stats.high_port_usage.len(),
        HIGH_PORT_USAGE_PERCENT
    )?;

    writeln!(out, "Summary:")?;
    for sentence in summary_sentences(stats) {
        for line in sentence.lines() {
            writeln!(out, "  {}", line)?;
        }
    }

    writeln!(out)
}

fn write_priority_matrix<W: Write>(out: &mut W) -> io::Result<()> {
    write_title(out, "PRIORITIZATION MATRIX - ACTION OVERVIEW")?;
    writeln!(out)?;

    for quadrant in PRIORITY_MATRIX {
        writeln!(out, "{}", quadrant.title)?;
        writeln!(out, "{}", quadrant.description)?;
        for action in quadrant.actions {
            writeln!(out, "- {}", action)?;
        }
        writeln!(out)?;
    }

    Ok(())
}

fn write_process_overview<W: Write>(out: &mut W) -> io::Result<()> {
    write_title(out, "ITIL OVERVIEW - LINK TO THE NETWORK REPORT")?;
    writeln!(out)?;

    for area in PROCESS_AREAS {
        writeln!(out, "{}", area.name)?;
        let mut lines = area.text.lines();
        if let Some(first) = lines.next() {
            writeln!(out, "- {}", first)?;
        }
        for line in lines {
            writeln!(out, "  {}", line)?;
        }
        writeln!(out)?;
    }

    Ok(())
}
