//! Spectrum band-of-interest filtering.
//!
//! Used to pick out access points whose occupied spectrum intersects a
//! frequency window, e.g. a radar or weather-sensor allocation one wants to
//! keep clear.

use std::str::FromStr;

use wavemap_common::wifi::ap::AccessPoint;

/// An inclusive frequency window in MHz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandOfInterest {
    pub min_mhz: u32,
    pub max_mhz: u32,
}

impl FromStr for BandOfInterest {
    type Err = String;

    /// Parses `"5600-5650"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min, max) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid band: {s} (expected MIN-MAX)"))?;
        let min_mhz: u32 = min
            .trim()
            .parse()
            .map_err(|e| format!("invalid band minimum '{min}': {e}"))?;
        let max_mhz: u32 = max
            .trim()
            .parse()
            .map_err(|e| format!("invalid band maximum '{max}': {e}"))?;
        if min_mhz >= max_mhz {
            return Err(format!("band minimum {min_mhz} is not below maximum {max_mhz}"));
        }
        Ok(Self { min_mhz, max_mhz })
    }
}

/// The records whose occupied spectrum intersects `band`, in batch order.
pub fn overlapping<'a>(records: &'a [AccessPoint], band: &BandOfInterest) -> Vec<&'a AccessPoint> {
    records
        .iter()
        .filter(|ap| ap.overlaps(band.min_mhz, band.max_mhz))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_band_strings() {
        let band: BandOfInterest = "5600-5650".parse().unwrap();
        assert_eq!((band.min_mhz, band.max_mhz), (5600, 5650));

        assert!("5650-5600".parse::<BandOfInterest>().is_err());
        assert!("5600".parse::<BandOfInterest>().is_err());
        assert!("low-high".parse::<BandOfInterest>().is_err());
    }
}
