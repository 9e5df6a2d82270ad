//! # Parse Diagnostics
//!
//! Non-fatal anomalies found while converting a scan dump into records.
//!
//! Every anomaly degrades to the best available estimate and is attached to
//! the record it belongs to (or to the batch, when no record survives), so a
//! caller can audit the corrections that were applied automatically. Nothing
//! in this taxonomy ever aborts a batch.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// A line opened by a recognized key could not be parsed, or a block was
    /// missing a mandatory field. The line (or block) is skipped.
    #[error("unparseable input: {line}")]
    MalformedInput { line: String },

    /// The data referenced a channel or frequency with no channel-plan entry.
    /// Resolution falls back to the raw frequency with a 20 MHz width.
    #[error("no channel-plan entry for {reference}")]
    UnknownChannelReference { reference: String },

    /// Two redundant fields disagree. The derived value wins.
    #[error("{field} declares {declared} but the derived value is {derived}")]
    CrossCheckMismatch {
        field: &'static str,
        declared: u32,
        derived: u32,
    },

    /// The two VHT segments are not a contiguous 160 MHz block. The first
    /// segment's spectrum is kept; the second segment's center is recorded
    /// here instead of being discarded.
    #[error("non-contiguous bonding, second segment centered at {segment_center_mhz} MHz")]
    UnresolvedBonding { segment_center_mhz: u32 },
}
