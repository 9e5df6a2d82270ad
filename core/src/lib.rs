//! Wavemap's parsing core.
//!
//! Turns the free-text output of wireless scan tools into normalized
//! access-point records carrying the exact slice of spectrum each one
//! occupies. The pipeline is: [`tokenizer`] splits the dump into per-AP
//! field blocks, [`resolver`] applies the channel-bonding rules against the
//! [`plan`] table, and [`normalizer`] produces the final records.
//!
//! The whole pipeline is synchronous and pure: one complete dump in, one
//! finite batch of records out, no shared state between invocations. The
//! async [`source`] and [`position`] modules sit outside that boundary and
//! do the actual talking to tools.

pub mod filter;
pub mod normalizer;
pub mod plan;
pub mod position;
pub mod resolver;
pub mod source;
pub mod tokenizer;

pub use normalizer::ScanBatch;

use wavemap_common::wifi::dialect::Dialect;

/// Parses one complete scan dump into a batch of records.
///
/// `capture_time` (seconds since the epoch) is stamped on every record of
/// the batch. A dump in which no block is recognized yields an empty batch,
/// never an error.
pub fn parse_scan(text: &str, dialect: Dialect, capture_time: u64) -> ScanBatch {
    let plan = plan::ChannelPlan::build();
    let blocks = tokenizer::tokenize(text, dialect);
    normalizer::normalize(blocks, &plan, capture_time)
}
