use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::Context;
use colored::*;

use wavemap_common::config::Config;
use wavemap_common::geo::Position;
use wavemap_common::wifi::bssid;
use wavemap_common::{error, info, success, warn};
use wavemap_core::position::adb_position;
use wavemap_core::source::{FileSource, IwSource, ScanSource, SshSource};
use wavemap_store::Store;

use crate::commands::{SurveyArgs, epoch_seconds};
use crate::terminal::{colors, format, input, print, spinner};

pub async fn survey(args: SurveyArgs, cfg: &Config) -> anyhow::Result<()> {
    let source = select_source(&args)?;
    info!("surveying with {}", source.describe());

    if args.ssh.is_none() && args.file.is_none() && !is_root::is_root() {
        warn!("live iw scans usually need root, or CAP_NET_ADMIN on the iw binary");
    }

    let mut store = match &args.db {
        Some(path) => Some(Store::open(path)?),
        None => None,
    };

    let running: Arc<AtomicBool> = Arc::new(AtomicBool::new(true));
    let quit_handle = input::spawn_quit_listener(running.clone());
    let start_time: Instant = Instant::now();

    let mut rounds: usize = 0;
    let mut total_records: usize = 0;

    while running.load(Ordering::Relaxed) {
        match run_round(source.as_ref(), &args, store.as_mut(), cfg).await {
            Ok(count) => {
                rounds += 1;
                total_records += count;
                spinner::report_round(count);
            }
            Err(e) => error!("scan round failed: {e:#}"),
        }

        if args.once {
            break;
        }
        wait_interval(&running, args.interval).await;
    }

    running.store(false, Ordering::Relaxed);
    if let Some(handle) = spinner::active() {
        handle.finish_and_clear();
    }
    if let Some(handle) = quit_handle {
        let _ = handle.join();
    }

    survey_ends(rounds, total_records, start_time.elapsed(), cfg);
    Ok(())
}

async fn run_round(
    source: &(dyn ScanSource + Send + Sync),
    args: &SurveyArgs,
    store: Option<&mut Store>,
    cfg: &Config,
) -> anyhow::Result<usize> {
    let text = source.fetch().await?;
    let mut batch = wavemap_core::parse_scan(&text, source.dialect(), epoch_seconds());

    for diag in &batch.diagnostics {
        warn!("{diag}");
    }
    for record in &mut batch.records {
        record.vendor = bssid::vendor(record.bssid);
    }

    let position = if args.gps { fetch_position().await } else { None };

    if cfg.quiet < 2 && !batch.records.is_empty() {
        print::header("scan round", cfg.quiet);
        for (idx, record) in batch.records.iter().enumerate() {
            format::print_record(idx, record, cfg);
            if idx + 1 != batch.records.len() {
                crate::wprint!();
            }
        }
    }

    if let Some(store) = store {
        store.record_batch(&batch.records, position, args.orientation)?;
    }

    Ok(batch.records.len())
}

/// Starts the spinner on the first wait so single-round runs stay plain.
async fn wait_interval(running: &Arc<AtomicBool>, interval: u64) {
    let _ = spinner::get();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(interval);

    while running.load(Ordering::Relaxed) {
        let now = tokio::time::Instant::now();
        if now >= deadline {
            break;
        }
        let step = std::cmp::min(Duration::from_millis(250), deadline - now);
        tokio::select! {
            _ = tokio::time::sleep(step) => {}
            _ = tokio::signal::ctrl_c() => {
                running.store(false, Ordering::Relaxed);
            }
        }
    }
}

async fn fetch_position() -> Option<Position> {
    match adb_position().await {
        Ok(Some(position)) => Some(position),
        Ok(None) => {
            warn!("no GPS fix available from the phone");
            None
        }
        Err(e) => {
            warn!("position lookup failed: {e:#}");
            None
        }
    }
}

fn select_source(args: &SurveyArgs) -> anyhow::Result<Box<dyn ScanSource + Send + Sync>> {
    if let Some(path) = &args.file {
        return Ok(Box::new(FileSource {
            path: path.clone(),
            dialect: args.dialect,
        }));
    }
    if let Some(ssh) = &args.ssh {
        let (user, host) = ssh.split_once('@').context("--ssh expects user@host")?;
        return Ok(Box::new(SshSource {
            user: user.to_string(),
            host: host.to_string(),
            iface: args.ssh_iface.clone(),
        }));
    }
    Ok(Box::new(IwSource {
        iface: args.iface.clone(),
    }))
}

fn survey_ends(rounds: usize, total_records: usize, total_time: Duration, cfg: &Config) {
    let rounds_str: ColoredString = format!("{rounds} rounds").bold().green();
    let time_str: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!(
        "Survey complete: {rounds_str} ({total_records} records) in {time_str}"
    );

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output.color(colors::TEXT_DEFAULT).to_string());
            print::end_of_program();
        }
        _ => success!("{}", output),
    }
}
