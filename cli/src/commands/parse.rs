use std::path::Path;

use wavemap_common::config::Config;
use wavemap_common::wifi::ap::AccessPoint;
use wavemap_common::wifi::bssid;
use wavemap_common::wifi::dialect::Dialect;
use wavemap_common::{success, warn};
use wavemap_core::filter::{self, BandOfInterest};
use wavemap_core::source::{FileSource, ScanSource};

use crate::commands::epoch_seconds;
use crate::terminal::{format, print};

pub async fn parse(
    file: &Path,
    dialect: Dialect,
    band: Option<BandOfInterest>,
    cfg: &Config,
) -> anyhow::Result<()> {
    let source = FileSource {
        path: file.to_path_buf(),
        dialect,
    };
    let text = source.fetch().await?;

    let mut batch = wavemap_core::parse_scan(&text, dialect, epoch_seconds());
    for diag in &batch.diagnostics {
        warn!("{diag}");
    }
    for record in &mut batch.records {
        record.vendor = bssid::vendor(record.bssid);
    }

    let shown: Vec<&AccessPoint> = match &band {
        Some(band) => filter::overlapping(&batch.records, band),
        None => batch.records.iter().collect(),
    };

    if shown.is_empty() {
        warn!("no access points resolved from {}", file.display());
        return Ok(());
    }

    print::header("resolved access points", cfg.quiet);
    if cfg.quiet < 2 {
        for (idx, record) in shown.iter().enumerate() {
            format::print_record(idx, record, cfg);
            if idx + 1 != shown.len() {
                crate::wprint!();
            }
        }
    }
    success!("{} access points from {}", shown.len(), file.display());
    Ok(())
}
