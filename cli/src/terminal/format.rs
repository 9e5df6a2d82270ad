use colored::*;
use wavemap_common::config::Config;
use wavemap_common::wifi::ap::AccessPoint;

use crate::terminal::{colors, print};

pub type Detail = (String, ColoredString);

/// Prints one record as an indexed one-level tree.
pub fn print_record(idx: usize, ap: &AccessPoint, cfg: &Config) {
    let name = if ap.ssid.is_empty() {
        "<hidden network>"
    } else {
        ap.ssid.as_str()
    };
    print::tree_head(idx, name);
    print::as_tree_one_level(ap_to_details(ap, cfg));
}

fn ap_to_details(ap: &AccessPoint, cfg: &Config) -> Vec<Detail> {
    let mut details: Vec<Detail> = Vec::new();

    details.push(("BSSID".into(), ap.bssid.to_string().color(colors::BSSID)));

    if let Some(vendor) = &ap.vendor {
        details.push(("Vendor".into(), vendor.normal()));
    }
    if let Some(signal) = ap.signal_dbm {
        details.push(("Signal".into(), signal_detail(signal)));
    }
    if let Some(quality) = ap.quality {
        details.push(("Quality".into(), quality.to_string().normal()));
    }

    details.push(("Channel".into(), channel_detail(ap)));
    details.push((
        "Center".into(),
        format!("{} MHz, {} MHz wide", ap.center_mhz, ap.bandwidth_mhz).color(colors::FREQ),
    ));
    details.push((
        "Spectrum".into(),
        format!("{}..{} MHz", ap.freq_min_mhz, ap.freq_max_mhz).normal(),
    ));

    if cfg.quiet == 0 {
        if let Some(country) = &ap.country {
            let value = match &ap.environment {
                Some(environment) => format!("{country} ({environment})"),
                None => country.clone(),
            };
            details.push(("Country".into(), value.normal()));
        }
    }

    if !ap.diagnostics.is_empty() {
        let joined = ap
            .diagnostics
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<String>>()
            .join("; ");
        details.push(("Notes".into(), joined.yellow()));
    }

    details
}

fn channel_detail(ap: &AccessPoint) -> ColoredString {
    match (ap.channel, ap.channel_20) {
        (Some(channel), Some(legacy)) if channel != legacy => {
            format!("{channel} (primary {legacy})").color(colors::ACCENT)
        }
        (Some(channel), _) => channel.to_string().color(colors::ACCENT),
        (None, Some(legacy)) => format!("primary {legacy}").color(colors::ACCENT),
        (None, None) => "unknown".dimmed(),
    }
}

fn signal_detail(dbm: i32) -> ColoredString {
    let text = format!("{dbm} dBm");
    if dbm >= -55 {
        text.green()
    } else if dbm >= -70 {
        text.yellow()
    } else {
        text.red()
    }
}
