//! # Channel Plan Table
//!
//! Static lookup of radio channel number to center frequency and default
//! bandwidth, covering the 2.4 GHz band and the 5 GHz sub-bands.
//!
//! The table is pure data built once per parse. It is never mutated after
//! construction, so one instance can be shared freely across threads.
//! Channel numbers whose center would fall in the unallocated 5350-5470 MHz
//! region are absent by construction.

use std::collections::{BTreeMap, HashMap};

/// One channel's slot in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelPlanEntry {
    pub channel: u16,
    pub center_mhz: u32,
    pub bandwidth_mhz: u32,
    pub freq_min_mhz: u32,
    pub freq_max_mhz: u32,
}

impl ChannelPlanEntry {
    fn new(channel: u16, center_mhz: u32, bandwidth_mhz: u32) -> Self {
        Self {
            channel,
            center_mhz,
            bandwidth_mhz,
            freq_min_mhz: center_mhz - bandwidth_mhz / 2,
            freq_max_mhz: center_mhz + bandwidth_mhz / 2,
        }
    }
}

/// The full channel plan, indexed both ways: by channel number and by center
/// frequency. Center frequencies are unique across the plan, so the reverse
/// index is exact.
pub struct ChannelPlan {
    by_channel: BTreeMap<u16, ChannelPlanEntry>,
    by_center: HashMap<u32, u16>,
}

/// Channels within the unallocated gap between 5350 and 5470 MHz.
const GAP: std::ops::RangeInclusive<u16> = 70..=94;

impl ChannelPlan {
    /// Builds the plan. Deterministic, no side effects.
    pub fn build() -> Self {
        let mut entries: Vec<ChannelPlanEntry> = Vec::new();

        // 2.4 GHz band, 20 MHz channels.
        for ch in 1..=14u16 {
            entries.push(ChannelPlanEntry::new(ch, 2412 + (ch as u32 - 1) * 5, 20));
        }
        // 5 GHz 20 MHz sub-channels.
        for ch in (32..=144u16).step_by(4).chain((149..=177u16).step_by(4)) {
            entries.push(ChannelPlanEntry::new(ch, 5160 + (ch as u32 - 32) * 5, 20));
        }
        // 5 GHz 40 MHz bonded pairs.
        for ch in (38..=142u16).step_by(8).chain((151..=175u16).step_by(8)) {
            entries.push(ChannelPlanEntry::new(ch, 5190 + (ch as u32 - 38) * 5, 40));
        }
        // 5 GHz 80 MHz blocks.
        for ch in (42..=138u16).step_by(16).chain([155, 171]) {
            entries.push(ChannelPlanEntry::new(ch, 5210 + (ch as u32 - 42) * 5, 80));
        }
        // 5 GHz 160 MHz blocks.
        for ch in [50u16, 82, 114, 163] {
            entries.push(ChannelPlanEntry::new(ch, 5250 + (ch as u32 - 50) * 5, 160));
        }

        let mut by_channel = BTreeMap::new();
        let mut by_center = HashMap::new();
        for entry in entries {
            if GAP.contains(&entry.channel) {
                continue;
            }
            by_center.insert(entry.center_mhz, entry.channel);
            by_channel.insert(entry.channel, entry);
        }

        Self { by_channel, by_center }
    }

    /// Looks up a channel number.
    pub fn entry(&self, channel: u16) -> Option<&ChannelPlanEntry> {
        self.by_channel.get(&channel)
    }

    /// Reverse lookup: the channel whose center frequency is exactly
    /// `center_mhz`.
    pub fn channel_at(&self, center_mhz: u32) -> Option<&ChannelPlanEntry> {
        self.by_center
            .get(&center_mhz)
            .and_then(|ch| self.by_channel.get(ch))
    }

    /// All entries in ascending channel order.
    pub fn iter(&self) -> impl Iterator<Item = &ChannelPlanEntry> {
        self.by_channel.values()
    }

    pub fn len(&self) -> usize {
        self.by_channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_channel.is_empty()
    }
}
