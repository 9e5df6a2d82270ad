//! # Record Normalizer
//!
//! Folds a tokenized block and its resolved spectrum into the final
//! [`AccessPoint`] record, assigns the stable identifier and the batch
//! capture time, and drops the working-only bonding annotations.

use wavemap_common::wifi::ap::AccessPoint;
use wavemap_common::wifi::bssid;
use wavemap_common::wifi::diag::Diagnostic;
use wavemap_common::{debug, warn};

use crate::plan::ChannelPlan;
use crate::resolver::{self, Resolution};
use crate::tokenizer::RawApBlock;

/// One parsed scan: the records in order of appearance, plus diagnostics for
/// blocks that produced no record at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanBatch {
    pub records: Vec<AccessPoint>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanBatch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Normalizes a batch of blocks.
///
/// Every block gets `capture_time` unless it already carries its own (blocks
/// re-normalized from an earlier capture keep theirs). Blocks missing a
/// usable frequency are dropped and flagged; the rest of the batch is
/// unaffected. No deduplication happens here.
pub fn normalize(blocks: Vec<RawApBlock>, plan: &ChannelPlan, capture_time: u64) -> ScanBatch {
    let mut records = Vec::with_capacity(blocks.len());
    let mut diagnostics = Vec::new();

    for block in blocks {
        match resolver::resolve(&block, plan) {
            Some(resolution) => records.push(into_record(block, resolution, capture_time)),
            None => {
                warn!("dropping block {}: no usable frequency field", block.bssid);
                diagnostics.push(Diagnostic::MalformedInput {
                    line: format!("block {} has no frequency field", block.bssid),
                });
            }
        }
    }

    ScanBatch { records, diagnostics }
}

fn into_record(block: RawApBlock, resolution: Resolution, batch_time: u64) -> AccessPoint {
    let mut diagnostics = block.diagnostics;
    diagnostics.extend(resolution.diagnostics);
    for diag in &diagnostics {
        debug!("{}: {}", block.bssid, diag);
    }

    AccessPoint {
        bssid: block.bssid,
        stable_id: bssid::stable_id(block.bssid),
        ssid: block.ssid.unwrap_or_default(),
        vendor: None,
        signal_dbm: block.signal_dbm,
        quality: block.quality,
        country: block.country,
        environment: block.environment,
        supported_channels: block.supported_channels,
        channel_20: resolution.channel_20,
        freq_20_mhz: block.freq_mhz,
        channel: resolution.channel,
        center_mhz: resolution.center_mhz,
        bandwidth_mhz: resolution.bandwidth_mhz,
        freq_min_mhz: resolution.freq_min_mhz,
        freq_max_mhz: resolution.freq_max_mhz,
        capture_time: block.capture_time.unwrap_or(batch_time),
        diagnostics,
    }
}
