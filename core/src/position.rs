//! Position acquisition through a usb-debugged phone.
//!
//! Android's location service keeps a fused fix that `dumpsys location`
//! prints as `last location=Location[fused <lon>,<lat> hAcc=...]`. A missing
//! phone is a normal condition during indoor surveys, so it yields `None`
//! rather than an error.

use anyhow::Context;
use tokio::process::Command;

use wavemap_common::geo::Position;

const FUSED_MARKER: &str = "last location=Location[fused ";

/// Asks the connected phone for its current fused position.
pub async fn adb_position() -> anyhow::Result<Option<Position>> {
    let output = Command::new("adb")
        .args(["shell", "dumpsys", "location"])
        .output()
        .await
        .context("spawning adb")?;

    if !output.status.success() {
        return Ok(None);
    }

    let text = String::from_utf8_lossy(&output.stdout);
    Ok(parse_dumpsys(&text))
}

fn parse_dumpsys(text: &str) -> Option<Position> {
    for line in text.lines() {
        let Some(idx) = line.find(FUSED_MARKER) else {
            continue;
        };
        let rest = &line[idx + FUSED_MARKER.len()..];
        let fix = rest.split_once(" hAcc=").map(|(f, _)| f).unwrap_or(rest);
        let (lon, lat) = fix.split_once(',')?;
        return Some(Position {
            lon: lon.trim().parse().ok()?,
            lat: lat.trim().parse().ok()?,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_fused_fix() {
        let text = "Location Manager State:\n\
                    \x20     last location=Location[fused 2.3488,48.8534 hAcc=12.0 et=+1d2h]\n";
        let pos = parse_dumpsys(text).unwrap();
        assert!((pos.lon - 2.3488).abs() < 1e-9);
        assert!((pos.lat - 48.8534).abs() < 1e-9);
    }

    #[test]
    fn no_fix_line_means_no_position() {
        assert_eq!(parse_dumpsys("nothing useful here\n"), None);
        assert_eq!(parse_dumpsys(""), None);
    }
}
