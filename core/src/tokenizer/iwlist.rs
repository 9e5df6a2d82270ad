//! Tokenizer for `iwlist <iface> scan` output.
//!
//! Blocks open at a `Cell NN - Address:` header. Only a fixed allow-list of
//! fields is retained; everything else the tool prints is discarded. Numeric
//! fields are converted on the spot: GHz frequencies become integer MHz,
//! `Quality=60/94` becomes 60, `Signal level=-50 dBm` becomes -50. Ubiquiti
//! firmwares add `Extra:` annotations carrying the occupied center frequency
//! (`center1`) and channel width (`chanbw`) directly.

use pnet::util::MacAddr;

use super::RawApBlock;

pub(super) fn tokenize(text: &str) -> Vec<RawApBlock> {
    let mut blocks: Vec<RawApBlock> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();

        if let Some(value) = address_value(line) {
            if let Ok(bssid) = value.parse::<MacAddr>() {
                blocks.push(RawApBlock::new(bssid));
            }
            continue;
        }

        let Some(block) = blocks.last_mut() else {
            continue;
        };

        if let Some(value) = line.strip_prefix("ESSID:") {
            block.ssid = Some(value.trim().trim_matches('"').to_string());
        } else if let Some(value) = line.strip_prefix("Frequency:") {
            frequency_field(block, line, value);
        } else if line.starts_with("Quality") || line.starts_with("Signal") {
            link_stats(block, line);
        } else if let Some(value) = line.strip_prefix("Channel:") {
            match value.trim().parse::<u16>() {
                Ok(channel) => block.declared_channel = Some(channel),
                Err(_) => block.malformed(line),
            }
        } else {
            extra_field(block, line);
        }
    }

    blocks
}

/// Matches both `Cell 01 - Address: AA:BB:...` and a bare `Address: ...`.
fn address_value(line: &str) -> Option<&str> {
    let idx = line.find("Address:")?;
    if idx != 0 && !line[..idx].trim_end().ends_with('-') {
        return None;
    }
    Some(line[idx + "Address:".len()..].trim())
}

/// `Frequency:5.18 GHz (Channel 36)`. The declared channel is kept for a
/// cross-check against the plan-derived one.
fn frequency_field(block: &mut RawApBlock, line: &str, value: &str) {
    let freq_text = value
        .split_once('(')
        .map(|(f, _)| f)
        .unwrap_or(value)
        .trim();

    block.freq_mhz = match parse_mhz(freq_text) {
        Some(mhz) => Some(mhz),
        None => {
            block.malformed(line);
            None
        }
    };

    if let Some((_, rest)) = value.split_once("(Channel ") {
        let digits = rest.trim_end_matches(')').trim();
        match digits.parse::<u16>() {
            Ok(channel) => block.declared_channel = Some(channel),
            Err(_) => block.malformed(line),
        }
    }
}

/// `Quality=60/94  Signal level=-50 dBm  Noise level=-96 dBm`, with `=` or
/// `:` as the separator depending on the firmware.
fn link_stats(block: &mut RawApBlock, line: &str) {
    for chunk in line.split("  ").map(str::trim).filter(|c| !c.is_empty()) {
        let Some((key, value)) = chunk.split_once(['=', ':']) else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if key.starts_with("Quality") {
            let numerator = value.split('/').next().unwrap_or(value);
            match numerator.parse::<u32>() {
                Ok(quality) => block.quality = Some(quality),
                Err(_) => block.malformed(line),
            }
        } else if key.starts_with("Signal") {
            let value = value.strip_suffix("dBm").unwrap_or(value).trim();
            match value.parse::<f64>() {
                Ok(signal) => block.signal_dbm = Some(signal as i32),
                Err(_) => block.malformed(line),
            }
        }
    }
}

/// Ubiquiti annotations: `Extra: center1 = 5190`, `Extra: chanbw = 40`.
fn extra_field(block: &mut RawApBlock, line: &str) {
    let rest = line.strip_prefix("Extra:").unwrap_or(line).trim();
    let Some((key, value)) = rest.split_once(['=', ':']) else {
        return;
    };
    let key = key.trim();
    let value = value
        .trim()
        .trim_end_matches("Mhz")
        .trim_end_matches("MHz")
        .trim();

    match key {
        "center1" => match value.parse::<u32>() {
            Ok(center) => block.explicit_center_mhz = Some(center),
            Err(_) => block.malformed(line),
        },
        "chanbw" => match value.parse::<u32>() {
            Ok(width) => block.explicit_width_mhz = Some(width),
            Err(_) => block.malformed(line),
        },
        _ => {}
    }
}

/// Frequencies arrive either as `5.18 GHz` or, rarely, as plain MHz.
fn parse_mhz(text: &str) -> Option<u32> {
    if let Some(ghz) = text.strip_suffix("GHz") {
        let value: f64 = ghz.trim().parse().ok()?;
        return Some((value * 1000.0).round() as u32);
    }
    let text = text.strip_suffix("MHz").unwrap_or(text).trim();
    text.parse::<f64>().ok().map(|v| v.round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"ath0      Scan completed :
          Cell 01 - Address: 00:27:22:AA:BB:CC
                    ESSID:"ptp-link"
                    Mode:Master
                    Frequency:5.18 GHz (Channel 36)
                    Quality=60/94  Signal level=-50 dBm  Noise level=-96 dBm
                    Extra: ieee_mode = 11naht40
                    Extra: center1 = 5190
                    Extra: chanbw = 40
          Cell 02 - Address: 00:27:22:11:22:33
                    ESSID:"village-ap"
                    Frequency:2.437 GHz (Channel 6)
                    Quality=40/94  Signal level=-72 dBm  Noise level=-95 dBm
"#;

    #[test]
    fn splits_cells_and_converts_numbers() {
        let blocks = tokenize(DUMP);
        assert_eq!(blocks.len(), 2);

        let first = &blocks[0];
        assert_eq!(first.bssid.to_string(), "00:27:22:aa:bb:cc");
        assert_eq!(first.ssid.as_deref(), Some("ptp-link"));
        assert_eq!(first.freq_mhz, Some(5180));
        assert_eq!(first.declared_channel, Some(36));
        assert_eq!(first.quality, Some(60));
        assert_eq!(first.signal_dbm, Some(-50));
        assert_eq!(first.explicit_center_mhz, Some(5190));
        assert_eq!(first.explicit_width_mhz, Some(40));

        let second = &blocks[1];
        assert_eq!(second.freq_mhz, Some(2437));
        assert_eq!(second.declared_channel, Some(6));
        assert!(second.explicit_center_mhz.is_none());
    }

    #[test]
    fn ghz_conversion_rounds_to_integer_mhz() {
        assert_eq!(parse_mhz("5.18 GHz"), Some(5180));
        assert_eq!(parse_mhz("2.412 GHz"), Some(2412));
        assert_eq!(parse_mhz("5745 MHz"), Some(5745));
        assert_eq!(parse_mhz("nonsense"), None);
    }

    #[test]
    fn fields_outside_the_allow_list_are_discarded() {
        let blocks = tokenize(DUMP);
        // Mode and Noise are dropped without producing diagnostics.
        assert!(blocks[0].diagnostics.is_empty());
        assert!(blocks[1].diagnostics.is_empty());
    }

    #[test]
    fn block_without_extras_keeps_only_primary_fields() {
        let dump = "Cell 01 - Address: 12:34:56:78:9A:BC\n\
                    Frequency:2.462 GHz (Channel 11)\n";
        let blocks = tokenize(dump);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].freq_mhz, Some(2462));
        assert_eq!(blocks[0].declared_channel, Some(11));
        assert!(blocks[0].explicit_width_mhz.is_none());
    }
}
