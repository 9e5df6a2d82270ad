//! Tokenizer for `iw <iface> scan` output.
//!
//! A block opens at a `BSS <bssid>` header. Below it, fields arrive as
//! tab-indented `key: value` lines, with two nested sub-sections
//! ("HT operation:" and "VHT operation:") whose `* key: value` entries are
//! scoped to that sub-section only. Leaving the indented `*` lines closes
//! the sub-section again.

use pnet::util::MacAddr;

use super::{RawApBlock, SecondaryOffset, StaWidth};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Top,
    Ht,
    Vht,
}

pub(super) fn tokenize(text: &str) -> Vec<RawApBlock> {
    let mut blocks: Vec<RawApBlock> = Vec::new();
    let mut section = Section::Top;

    for raw in text.lines() {
        let flattened = raw.replace('\t', "");
        let line = flattened.trim_end();

        // Block start. "BSS Load:" and friends also begin with "BSS" but do
        // not carry a parseable address, so they fall through harmlessly.
        if let Some(rest) = line.strip_prefix("BSS ") {
            if let Some(bssid) = rest.get(..17).and_then(|s| s.parse::<MacAddr>().ok()) {
                blocks.push(RawApBlock::new(bssid));
                section = Section::Top;
                continue;
            }
        }

        let Some(block) = blocks.last_mut() else {
            continue;
        };

        // A line that is not a `* key: value` entry ends the open sub-section
        // and is reconsidered as a top-level field.
        if section != Section::Top && !line.starts_with(" * ") {
            section = Section::Top;
        }

        match section {
            Section::Ht => ht_field(block, line),
            Section::Vht => vht_field(block, line),
            Section::Top => top_field(block, line, &mut section),
        }
    }

    blocks
}

fn top_field(block: &mut RawApBlock, line: &str, section: &mut Section) {
    if line == "HT operation:" {
        *section = Section::Ht;
    } else if line == "VHT operation:" {
        *section = Section::Vht;
    } else if let Some(value) = line.strip_prefix("freq: ") {
        match value.parse::<f64>() {
            Ok(freq) => block.freq_mhz = Some(freq as u32),
            Err(_) => block.malformed(line),
        }
    } else if let Some(value) = line.strip_prefix("signal: ") {
        let value = value.strip_suffix(" dBm").unwrap_or(value);
        match value.parse::<f64>() {
            Ok(signal) => block.signal_dbm = Some(signal as i32),
            Err(_) => block.malformed(line),
        }
    } else if let Some(value) = line.strip_prefix("SSID:") {
        let value = value.strip_prefix(' ').unwrap_or(value);
        block.ssid = Some(value.to_string());
    } else if let Some(value) = line.strip_prefix("DS Parameter set: channel ") {
        match value.parse::<u16>() {
            Ok(channel) => block.ds_channel = Some(channel),
            Err(_) => block.malformed(line),
        }
    } else if let Some(value) = line.strip_prefix("Country: ") {
        // Tab flattening glues the two halves together:
        // "Country: DE\tEnvironment: Indoor/Outdoor" arrives here as
        // "DEEnvironment: Indoor/Outdoor".
        match value.split_once("Environment: ") {
            Some((country, environment)) => {
                block.country = Some(country.trim().to_string());
                block.environment = Some(environment.trim().to_string());
            }
            None => block.country = Some(value.trim().to_string()),
        }
    } else if let Some(value) = line.strip_prefix("Channels ") {
        block.supported_channels = Some(value.to_string());
    }
}

fn ht_field(block: &mut RawApBlock, line: &str) {
    let Some((key, value)) = section_entry(line) else {
        return;
    };
    match key {
        "primary channel" => match value.parse::<u16>() {
            Ok(channel) => block.ht_primary_channel = Some(channel),
            Err(_) => block.malformed(line),
        },
        "secondary channel offset" => {
            block.ht_secondary_offset = Some(SecondaryOffset::parse(value));
        }
        "STA channel width" => block.ht_sta_width = Some(StaWidth::parse(value)),
        _ => {}
    }
}

fn vht_field(block: &mut RawApBlock, line: &str) {
    let Some((key, value)) = section_entry(line) else {
        return;
    };
    match key {
        // Printed as "1 (80 MHz)"; the leading code is what matters.
        "channel width" => {
            match value.split_whitespace().next().unwrap_or(value).parse::<u8>() {
                Ok(code) => block.vht_width_code = Some(code),
                Err(_) => block.malformed(line),
            }
        }
        "center freq segment 1" => match value.parse::<u16>() {
            Ok(segment) => block.vht_segment_1 = Some(segment),
            Err(_) => block.malformed(line),
        },
        "center freq segment 2" => match value.parse::<u16>() {
            Ok(segment) => block.vht_segment_2 = Some(segment),
            Err(_) => block.malformed(line),
        },
        _ => {}
    }
}

fn section_entry(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix(" * ")?;
    let (key, value) = rest.split_once(':')?;
    Some((key.trim(), value.trim()))
}
