#![cfg(test)]
use wavemap_common::wifi::dialect::Dialect;
use wavemap_core::parse_scan;
use wavemap_core::source::{FileSource, ScanSource};
use wavemap_store::Store;

/// A realistic `iw` dump: an 80 MHz VHT access point, a contiguous 160 MHz
/// one, a plain 2.4 GHz one, and a broken block with no frequency at all.
const IW_DUMP: &str = "BSS aa:bb:cc:dd:ee:ff(on wlo1)\n\
\tfreq: 5180\n\
\tsignal: -47.00 dBm\n\
\tSSID: lab-backbone\n\
\tDS Parameter set: channel 36\n\
\tHT operation:\n\
\t\t * primary channel: 36\n\
\t\t * secondary channel offset: above\n\
\t\t * STA channel width: any\n\
\tVHT operation:\n\
\t\t * channel width: 1 (80 MHz)\n\
\t\t * center freq segment 1: 42\n\
\t\t * center freq segment 2: 0\n\
BSS 11:22:33:44:55:66(on wlo1)\n\
\tfreq: 5180\n\
\tsignal: -58.00 dBm\n\
\tSSID: wide-load\n\
\tVHT operation:\n\
\t\t * channel width: 1 (160 MHz)\n\
\t\t * center freq segment 1: 42\n\
\t\t * center freq segment 2: 58\n\
BSS 22:33:44:55:66:77(on wlo1) -- associated\n\
\tfreq: 2462\n\
\tsignal: -71.00 dBm\n\
\tSSID: cafe-guest\n\
BSS 33:44:55:66:77:88(on wlo1)\n\
\tsignal: -80.00 dBm\n\
\tSSID: broken-beacon\n";

const IWLIST_DUMP: &str = r#"ath0      Scan completed :
          Cell 01 - Address: 00:27:22:AA:BB:CC
                    ESSID:"ptp-link"
                    Frequency:5.18 GHz (Channel 36)
                    Quality=60/94  Signal level=-50 dBm  Noise level=-96 dBm
                    Extra: center1 = 5190
                    Extra: chanbw = 40
          Cell 02 - Address: 00:27:22:11:22:33
                    ESSID:"village-ap"
                    Frequency:2.437 GHz (Channel 6)
                    Quality=40/94  Signal level=-72 dBm  Noise level=-95 dBm
"#;

#[test]
fn iw_dump_resolves_every_usable_block_in_order() {
    let batch = parse_scan(IW_DUMP, Dialect::IwScan, 1_700_000_000);

    assert_eq!(batch.records.len(), 3);
    assert_eq!(batch.diagnostics.len(), 1); // the frequency-less block

    let first = &batch.records[0];
    assert_eq!(first.ssid, "lab-backbone");
    assert_eq!((first.center_mhz, first.bandwidth_mhz), (5210, 80));
    assert_eq!((first.freq_min_mhz, first.freq_max_mhz), (5170, 5250));
    assert_eq!(first.channel, Some(42));
    assert_eq!(first.channel_20, Some(36));
    assert_eq!(first.stable_id, 0xaabb_ccdd_eeff);
    assert_eq!(first.capture_time, 1_700_000_000);

    let second = &batch.records[1];
    assert_eq!(second.ssid, "wide-load");
    assert_eq!((second.center_mhz, second.bandwidth_mhz), (5250, 160));
    assert_eq!(second.channel, Some(50));

    let third = &batch.records[2];
    assert_eq!(third.ssid, "cafe-guest");
    assert_eq!((third.center_mhz, third.bandwidth_mhz), (2462, 20));
    assert_eq!(third.channel_20, Some(11));
}

#[test]
fn iwlist_dump_takes_explicit_spectrum_when_present() {
    let batch = parse_scan(IWLIST_DUMP, Dialect::Iwlist, 42);

    assert_eq!(batch.records.len(), 2);
    assert!(batch.diagnostics.is_empty());

    let first = &batch.records[0];
    assert_eq!(first.ssid, "ptp-link");
    assert_eq!((first.center_mhz, first.bandwidth_mhz), (5190, 40));
    assert_eq!((first.freq_min_mhz, first.freq_max_mhz), (5170, 5210));
    assert_eq!(first.quality, Some(60));
    assert_eq!(first.signal_dbm, Some(-50));

    let second = &batch.records[1];
    assert_eq!((second.center_mhz, second.bandwidth_mhz), (2437, 20));
    assert_eq!(second.channel_20, Some(6));
}

#[test]
fn parsing_twice_yields_identical_batches() {
    let once = parse_scan(IW_DUMP, Dialect::IwScan, 7);
    let twice = parse_scan(IW_DUMP, Dialect::IwScan, 7);
    assert_eq!(once, twice);
}

#[test]
fn empty_and_garbage_input_yield_empty_batches() {
    assert!(parse_scan("", Dialect::IwScan, 0).is_empty());
    assert!(parse_scan("no blocks here\n", Dialect::Iwlist, 0).is_empty());
}

#[test]
fn parsed_batches_round_trip_through_the_store() {
    let mut store = Store::in_memory().unwrap();

    let batch = parse_scan(IW_DUMP, Dialect::IwScan, 1_000);
    store.record_batch(&batch.records, None, None).unwrap();

    // The same neighborhood scanned again later.
    let batch = parse_scan(IW_DUMP, Dialect::IwScan, 2_000);
    store.record_batch(&batch.records, None, Some(90.0)).unwrap();

    assert_eq!(store.network_count().unwrap(), 3);
    assert_eq!(store.measurement_count().unwrap(), 6);
}

#[tokio::test]
async fn file_source_feeds_the_parser_end_to_end() {
    let path = std::env::temp_dir().join("wavemap-integration.dump");
    tokio::fs::write(&path, IW_DUMP).await.unwrap();

    let source = FileSource {
        path: path.clone(),
        dialect: Dialect::IwScan,
    };
    let text = source.fetch().await.unwrap();
    let batch = parse_scan(&text, source.dialect(), 0);
    assert_eq!(batch.records.len(), 3);

    let _ = tokio::fs::remove_file(&path).await;
}
