//! # Block Tokenizer
//!
//! Splits one raw scan dump into per-access-point field blocks.
//!
//! Parsing is strictly line oriented and single pass: the only lookahead is
//! "does this line start a new block". Each dialect recognizes a small fixed
//! set of line shapes; lines a recognized key opens but whose value fails to
//! parse are skipped with a [`Diagnostic::MalformedInput`], everything else
//! that is not in the allow-list is discarded silently.

use pnet::util::MacAddr;
use wavemap_common::wifi::diag::Diagnostic;
use wavemap_common::wifi::dialect::Dialect;

mod iw;
mod iwlist;

/// Direction of the 40 MHz secondary channel relative to the primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryOffset {
    Above,
    Below,
    NoSecondary,
}

impl SecondaryOffset {
    fn parse(value: &str) -> Self {
        match value {
            "above" => SecondaryOffset::Above,
            "below" => SecondaryOffset::Below,
            _ => SecondaryOffset::NoSecondary,
        }
    }
}

/// Station channel width from the HT operation element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaWidth {
    /// Locked to 20 MHz, no bonding in effect.
    TwentyMhz,
    /// "any": the station may use the full bonded width.
    Any,
}

impl StaWidth {
    fn parse(value: &str) -> Self {
        if value == "any" {
            StaWidth::Any
        } else {
            StaWidth::TwentyMhz
        }
    }
}

/// The raw fields of one access-point block, exactly as tokenized.
///
/// Built incrementally while lines are consumed, then handed to the resolver
/// as an immutable value. Optional bonding annotations stay `None` when the
/// block has no HT/VHT sections (legacy 20 MHz access points).
#[derive(Debug, Clone, PartialEq)]
pub struct RawApBlock {
    pub bssid: MacAddr,
    /// Set only when re-normalizing records captured at an earlier time.
    pub capture_time: Option<u64>,

    pub ssid: Option<String>,
    pub signal_dbm: Option<i32>,
    pub quality: Option<u32>,
    /// Primary frequency in MHz, the legacy 20 MHz channel center.
    pub freq_mhz: Option<u32>,
    pub country: Option<String>,
    pub environment: Option<String>,
    pub supported_channels: Option<String>,

    /// Channel declared by the DS Parameter set element.
    pub ds_channel: Option<u16>,
    pub ht_primary_channel: Option<u16>,
    pub ht_secondary_offset: Option<SecondaryOffset>,
    pub ht_sta_width: Option<StaWidth>,
    pub vht_width_code: Option<u8>,
    pub vht_segment_1: Option<u16>,
    pub vht_segment_2: Option<u16>,

    /// Explicit occupied-center annotation (Ubiquiti `center1`).
    pub explicit_center_mhz: Option<u32>,
    /// Explicit channel width annotation (Ubiquiti `chanbw`).
    pub explicit_width_mhz: Option<u32>,
    /// Channel number printed next to the frequency, used as a cross-check.
    pub declared_channel: Option<u16>,

    /// Lines that opened with a recognized key but failed to parse.
    pub diagnostics: Vec<Diagnostic>,
}

impl RawApBlock {
    pub fn new(bssid: MacAddr) -> Self {
        Self {
            bssid,
            capture_time: None,
            ssid: None,
            signal_dbm: None,
            quality: None,
            freq_mhz: None,
            country: None,
            environment: None,
            supported_channels: None,
            ds_channel: None,
            ht_primary_channel: None,
            ht_secondary_offset: None,
            ht_sta_width: None,
            vht_width_code: None,
            vht_segment_1: None,
            vht_segment_2: None,
            explicit_center_mhz: None,
            explicit_width_mhz: None,
            declared_channel: None,
            diagnostics: Vec::new(),
        }
    }

    fn malformed(&mut self, line: &str) {
        self.diagnostics.push(Diagnostic::MalformedInput {
            line: line.to_string(),
        });
    }
}

/// Tokenizes a whole dump into ordered blocks.
///
/// Returns blocks in order of appearance. Input with zero recognizable
/// block-start lines yields an empty list, never an error.
pub fn tokenize(text: &str, dialect: Dialect) -> Vec<RawApBlock> {
    match dialect {
        Dialect::IwScan => iw::tokenize(text),
        Dialect::Iwlist => iwlist::tokenize(text),
    }
}
