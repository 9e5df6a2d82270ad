//! # Channel/Bandwidth Resolver
//!
//! Computes the spectrum an access point actually occupies from the raw
//! per-block fields: center frequency, bandwidth and the band edges, after
//! applying channel-bonding rules.
//!
//! The resolution ladder is legacy 20 MHz, then the HT 40 MHz annotation,
//! then the VHT 80/160 MHz annotation; each rung overrides the previous one
//! when its fields are present and consistent. Blocks that carry an explicit
//! occupied center and width (iwlist `center1`/`chanbw`) bypass the ladder.
//!
//! Every internal inconsistency is non-fatal: resolution degrades to the
//! best available estimate and surfaces the correction as a [`Diagnostic`]
//! on the record. Only a block with no usable frequency at all is
//! unresolvable.

use wavemap_common::wifi::diag::Diagnostic;

use crate::plan::ChannelPlan;
use crate::tokenizer::{RawApBlock, SecondaryOffset, StaWidth};

/// The resolved spectrum of one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub center_mhz: u32,
    pub bandwidth_mhz: u32,
    pub freq_min_mhz: u32,
    pub freq_max_mhz: u32,
    /// Channel number of the resolved center, when the plan knows it.
    pub channel: Option<u16>,
    /// The legacy 20 MHz channel derived from the primary frequency.
    pub channel_20: Option<u16>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolves one block against the channel plan.
///
/// Pure: the same block and plan always produce the same resolution, and
/// nothing is mutated. Returns `None` only when the block carries neither a
/// primary frequency nor an explicit center, in which case the caller drops
/// the block and flags it at batch level.
pub fn resolve(block: &RawApBlock, plan: &ChannelPlan) -> Option<Resolution> {
    let mut diags: Vec<Diagnostic> = Vec::new();

    if let (Some(center), Some(width)) = (block.explicit_center_mhz, block.explicit_width_mhz) {
        return Some(resolve_explicit(block, plan, center, width, diags));
    }

    let freq = block.freq_mhz.or(block.explicit_center_mhz)?;

    // Rung one: the legacy channel whose plan center matches the reported
    // primary frequency.
    let channel_20 = match plan.channel_at(freq) {
        Some(entry) => Some(entry.channel),
        None => {
            diags.push(Diagnostic::UnknownChannelReference {
                reference: format!("frequency {freq} MHz"),
            });
            None
        }
    };

    if let (Some(declared), Some(derived)) = (block.declared_channel, channel_20) {
        if declared != derived {
            diags.push(Diagnostic::CrossCheckMismatch {
                field: "declared channel",
                declared: declared as u32,
                derived: derived as u32,
            });
        }
    }

    let mut center = freq;
    let mut bandwidth: u32 = 20;
    let mut channel = channel_20;

    // Rung two: HT 40 MHz bonding.
    if let Some(declared) = block.ht_primary_channel {
        let anchor = match channel_20 {
            Some(derived) if derived != declared => {
                diags.push(Diagnostic::CrossCheckMismatch {
                    field: "HT primary channel",
                    declared: declared as u32,
                    derived: derived as u32,
                });
                derived
            }
            Some(derived) => derived,
            None => declared,
        };

        if let Some(ds) = block.ds_channel {
            if ds != anchor {
                diags.push(Diagnostic::CrossCheckMismatch {
                    field: "DS Parameter set",
                    declared: ds as u32,
                    derived: anchor as u32,
                });
            }
        }

        if block.ht_sta_width == Some(StaWidth::Any) {
            let base = plan
                .entry(anchor)
                .map(|entry| entry.center_mhz)
                .unwrap_or(freq);
            let bonded = match block.ht_secondary_offset {
                Some(SecondaryOffset::Above) => base + 10,
                _ => base - 10,
            };

            center = bonded;
            bandwidth = 40;
            channel = plan.channel_at(bonded).map(|entry| entry.channel);
            // 2.4 GHz bonded centers have no plan entry of their own; in the
            // 5 GHz band a miss means the data pointed somewhere odd.
            if channel.is_none() && bonded > 5000 {
                diags.push(Diagnostic::UnknownChannelReference {
                    reference: format!("bonded center {bonded} MHz"),
                });
            }
        }
    }

    // Rung three: VHT 80/160 MHz bonding, overriding the HT estimate.
    if let Some(code) = block.vht_width_code.filter(|code| *code > 0) {
        if let Some(seg1) = block.vht_segment_1.filter(|seg| *seg > 0) {
            match plan.entry(seg1) {
                Some(first) => {
                    let mut vht_bw: u32 = if code == 1 { 80 } else { 160 };
                    if first.bandwidth_mhz != vht_bw {
                        diags.push(Diagnostic::CrossCheckMismatch {
                            field: "VHT channel width",
                            declared: vht_bw,
                            derived: first.bandwidth_mhz,
                        });
                    }

                    let mut vht_center = first.center_mhz;
                    let mut vht_channel = Some(seg1);

                    if let Some(seg2) = block.vht_segment_2.filter(|seg| *seg > 0) {
                        match plan.entry(seg2) {
                            // A 160 MHz segment-2 names the true center.
                            Some(second) if second.bandwidth_mhz == 160 => {
                                vht_center = second.center_mhz;
                                vht_bw = 160;
                                vht_channel = Some(seg2);
                            }
                            // An 80 MHz block exactly 80 MHz up is the
                            // contiguous extension of segment-1.
                            Some(second)
                                if second.bandwidth_mhz == 80
                                    && second.center_mhz == first.center_mhz + 80 =>
                            {
                                vht_center = first.center_mhz + 40;
                                vht_bw = 160;
                                vht_channel =
                                    plan.channel_at(vht_center).map(|entry| entry.channel);
                            }
                            // Non-contiguous segments are left unresolved:
                            // keep segment-1's spectrum, record the rest.
                            Some(second) => {
                                vht_bw = first.bandwidth_mhz;
                                diags.push(Diagnostic::UnresolvedBonding {
                                    segment_center_mhz: second.center_mhz,
                                });
                            }
                            None => diags.push(Diagnostic::UnknownChannelReference {
                                reference: format!("VHT segment {seg2}"),
                            }),
                        }
                    }

                    center = vht_center;
                    bandwidth = vht_bw;
                    channel = vht_channel;
                }
                None => diags.push(Diagnostic::UnknownChannelReference {
                    reference: format!("VHT segment {seg1}"),
                }),
            }
        }
    }

    Some(finish(center, bandwidth, channel, channel_20, diags))
}

/// A block that reports its occupied center and width outright.
fn resolve_explicit(
    block: &RawApBlock,
    plan: &ChannelPlan,
    center: u32,
    width: u32,
    mut diags: Vec<Diagnostic>,
) -> Resolution {
    let derived_20 = block
        .freq_mhz
        .and_then(|freq| plan.channel_at(freq))
        .map(|entry| entry.channel);

    if let (Some(declared), Some(derived)) = (block.declared_channel, derived_20) {
        if declared != derived {
            diags.push(Diagnostic::CrossCheckMismatch {
                field: "declared channel",
                declared: declared as u32,
                derived: derived as u32,
            });
        }
    }

    let channel_20 = derived_20.or(block.declared_channel);
    let channel = plan.channel_at(center).map(|entry| entry.channel);

    finish(center, width, channel, channel_20, diags)
}

fn finish(
    center_mhz: u32,
    bandwidth_mhz: u32,
    channel: Option<u16>,
    channel_20: Option<u16>,
    diagnostics: Vec<Diagnostic>,
) -> Resolution {
    Resolution {
        center_mhz,
        bandwidth_mhz,
        freq_min_mhz: center_mhz - bandwidth_mhz / 2,
        freq_max_mhz: center_mhz + bandwidth_mhz / 2,
        channel,
        channel_20,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::util::MacAddr;

    fn block(freq: u32) -> RawApBlock {
        let mut b = RawApBlock::new(MacAddr(0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff));
        b.freq_mhz = Some(freq);
        b
    }

    #[test]
    fn legacy_only_block_stays_at_twenty() {
        let plan = ChannelPlan::build();
        let res = resolve(&block(2437), &plan).unwrap();

        assert_eq!(res.center_mhz, 2437);
        assert_eq!(res.bandwidth_mhz, 20);
        assert_eq!(res.channel_20, Some(6));
        assert_eq!((res.freq_min_mhz, res.freq_max_mhz), (2427, 2447));
        assert!(res.diagnostics.is_empty());
    }

    #[test]
    fn ht_bonding_shifts_the_center_ten_up() {
        let plan = ChannelPlan::build();
        let mut b = block(5180);
        b.ht_primary_channel = Some(36);
        b.ht_secondary_offset = Some(SecondaryOffset::Above);
        b.ht_sta_width = Some(StaWidth::Any);

        let res = resolve(&b, &plan).unwrap();
        assert_eq!(res.center_mhz, 5190);
        assert_eq!(res.bandwidth_mhz, 40);
        assert_eq!(res.channel, Some(38));
        assert_eq!(res.channel_20, Some(36));
    }

    #[test]
    fn ht_bonding_below_shifts_down() {
        let plan = ChannelPlan::build();
        let mut b = block(2437);
        b.ht_primary_channel = Some(6);
        b.ht_secondary_offset = Some(SecondaryOffset::Below);
        b.ht_sta_width = Some(StaWidth::Any);

        let res = resolve(&b, &plan).unwrap();
        assert_eq!(res.center_mhz, 2427);
        assert_eq!(res.bandwidth_mhz, 40);
        // 2.4 GHz bonded centers have no channel number and no diagnostic.
        assert_eq!(res.channel, None);
        assert!(res.diagnostics.is_empty());
    }

    #[test]
    fn ht_locked_to_twenty_does_not_bond() {
        let plan = ChannelPlan::build();
        let mut b = block(5180);
        b.ht_primary_channel = Some(36);
        b.ht_secondary_offset = Some(SecondaryOffset::NoSecondary);
        b.ht_sta_width = Some(StaWidth::TwentyMhz);

        let res = resolve(&b, &plan).unwrap();
        assert_eq!((res.center_mhz, res.bandwidth_mhz), (5180, 20));
    }

    #[test]
    fn vht_eighty_takes_the_segment_center() {
        let plan = ChannelPlan::build();
        let mut b = block(5230);
        b.vht_width_code = Some(1);
        b.vht_segment_1 = Some(46);
        b.vht_segment_2 = Some(0);

        let res = resolve(&b, &plan).unwrap();
        assert_eq!(res.center_mhz, 5230);
        assert_eq!(res.bandwidth_mhz, 80);
    }

    #[test]
    fn vht_overrides_ht() {
        let plan = ChannelPlan::build();
        let mut b = block(5180);
        b.ht_primary_channel = Some(36);
        b.ht_secondary_offset = Some(SecondaryOffset::Above);
        b.ht_sta_width = Some(StaWidth::Any);
        b.vht_width_code = Some(1);
        b.vht_segment_1 = Some(42);

        let res = resolve(&b, &plan).unwrap();
        assert_eq!(res.center_mhz, 5210);
        assert_eq!(res.bandwidth_mhz, 80);
        assert_eq!(res.channel, Some(42));
        assert_eq!((res.freq_min_mhz, res.freq_max_mhz), (5170, 5250));
    }

    #[test]
    fn contiguous_segments_make_one_sixty() {
        let plan = ChannelPlan::build();
        let mut b = block(5180);
        b.vht_width_code = Some(1);
        b.vht_segment_1 = Some(42); // centered 5210
        b.vht_segment_2 = Some(58); // centered 5290, exactly 80 up

        let res = resolve(&b, &plan).unwrap();
        assert_eq!(res.center_mhz, 5250);
        assert_eq!(res.bandwidth_mhz, 160);
        assert_eq!(res.channel, Some(50));
    }

    #[test]
    fn non_contiguous_segments_keep_first_and_flag_second() {
        let plan = ChannelPlan::build();
        let mut b = block(5180);
        b.vht_width_code = Some(1);
        b.vht_segment_1 = Some(42); // centered 5210
        b.vht_segment_2 = Some(155); // centered 5775, nowhere near

        let res = resolve(&b, &plan).unwrap();
        assert_eq!(res.center_mhz, 5210);
        assert_eq!(res.bandwidth_mhz, 80);
        assert!(res.diagnostics.contains(&Diagnostic::UnresolvedBonding {
            segment_center_mhz: 5775
        }));
    }

    #[test]
    fn out_of_plan_frequency_degrades_to_raw_center() {
        let plan = ChannelPlan::build();
        let res = resolve(&block(5400), &plan).unwrap();

        assert_eq!(res.center_mhz, 5400);
        assert_eq!(res.bandwidth_mhz, 20);
        assert_eq!(res.channel_20, None);
        assert!(matches!(
            res.diagnostics[0],
            Diagnostic::UnknownChannelReference { .. }
        ));
    }

    #[test]
    fn primary_channel_mismatch_prefers_the_derived_value() {
        let plan = ChannelPlan::build();
        let mut b = block(5180);
        b.ht_primary_channel = Some(40); // lies: 5180 is channel 36
        b.ht_secondary_offset = Some(SecondaryOffset::Above);
        b.ht_sta_width = Some(StaWidth::Any);

        let res = resolve(&b, &plan).unwrap();
        assert_eq!(res.center_mhz, 5190); // bonded off channel 36, not 40
        assert!(res.diagnostics.contains(&Diagnostic::CrossCheckMismatch {
            field: "HT primary channel",
            declared: 40,
            derived: 36,
        }));
    }

    #[test]
    fn lying_channel_annotation_is_flagged() {
        let plan = ChannelPlan::build();
        let mut b = block(2437);
        b.declared_channel = Some(11); // 2437 MHz is channel 6

        let res = resolve(&b, &plan).unwrap();
        assert_eq!(res.center_mhz, 2437);
        assert!(res.diagnostics.contains(&Diagnostic::CrossCheckMismatch {
            field: "declared channel",
            declared: 11,
            derived: 6,
        }));
    }

    #[test]
    fn explicit_center_and_width_bypass_the_ladder() {
        let plan = ChannelPlan::build();
        let mut b = block(5180);
        b.declared_channel = Some(36);
        b.explicit_center_mhz = Some(5190);
        b.explicit_width_mhz = Some(40);

        let res = resolve(&b, &plan).unwrap();
        assert_eq!(res.center_mhz, 5190);
        assert_eq!(res.bandwidth_mhz, 40);
        assert_eq!(res.channel, Some(38));
        assert_eq!(res.channel_20, Some(36));
        assert_eq!((res.freq_min_mhz, res.freq_max_mhz), (5170, 5210));
    }

    #[test]
    fn block_without_any_frequency_is_unresolvable() {
        let plan = ChannelPlan::build();
        let b = RawApBlock::new(MacAddr(1, 2, 3, 4, 5, 6));
        assert!(resolve(&b, &plan).is_none());
    }

    #[test]
    fn resolution_is_idempotent() {
        let plan = ChannelPlan::build();
        let mut b = block(5180);
        b.ht_primary_channel = Some(36);
        b.ht_secondary_offset = Some(SecondaryOffset::Above);
        b.ht_sta_width = Some(StaWidth::Any);
        b.vht_width_code = Some(2);
        b.vht_segment_1 = Some(50);

        let first = resolve(&b, &plan).unwrap();
        let second = resolve(&b, &plan).unwrap();
        assert_eq!(first, second);
    }
}
