//! SQLite persistence for survey results.
//!
//! Two tables: `networks` holds one row per access point keyed by its stable
//! id and is upserted on every capture (static attributes follow the latest
//! observation); `measurements` is append-only, one row per access point per
//! capture (signal, time, position, orientation). Deduplication across
//! captures therefore happens here, not in the parsing core.

use std::path::Path;

use anyhow::Context;
use rusqlite::{Connection, params};

use wavemap_common::geo::Position;
use wavemap_common::info;
use wavemap_common::wifi::ap::AccessPoint;

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (or creates) a store file.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let conn = Connection::open(&path)
            .with_context(|| format!("opening store {}", path.as_ref().display()))?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;",
        )?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// An in-memory store, used by tests.
    pub fn in_memory() -> anyhow::Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS networks (
                stable_id   INTEGER PRIMARY KEY,
                bssid       TEXT NOT NULL,
                ssid        TEXT,
                vendor      TEXT,
                country     TEXT,
                channel     INTEGER,
                channel_20  INTEGER,
                freq_20     INTEGER,
                center      INTEGER NOT NULL,
                bandwidth   INTEGER NOT NULL,
                freq_min    INTEGER NOT NULL,
                freq_max    INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS measurements (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                stable_id   INTEGER NOT NULL,
                signal      INTEGER,
                quality     INTEGER,
                time        INTEGER NOT NULL,
                lon         REAL,
                lat         REAL,
                orientation REAL,
                FOREIGN KEY(stable_id) REFERENCES networks(stable_id)
            );
            CREATE INDEX IF NOT EXISTS idx_measurements_time ON measurements(time);
            CREATE INDEX IF NOT EXISTS idx_measurements_stable_id ON measurements(stable_id);",
        )?;
        Ok(())
    }

    /// Records one capture batch: upserts the static side of every record
    /// and appends one measurement row per record.
    pub fn record_batch(
        &mut self,
        records: &[AccessPoint],
        position: Option<Position>,
        orientation: Option<f64>,
    ) -> anyhow::Result<()> {
        let tx = self.conn.transaction()?;

        for record in records {
            tx.execute(
                "INSERT INTO networks
                    (stable_id, bssid, ssid, vendor, country, channel,
                     channel_20, freq_20, center, bandwidth, freq_min, freq_max)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                 ON CONFLICT(stable_id) DO UPDATE SET
                    ssid = excluded.ssid,
                    vendor = coalesce(excluded.vendor, vendor),
                    country = coalesce(excluded.country, country),
                    channel = excluded.channel,
                    channel_20 = excluded.channel_20,
                    freq_20 = excluded.freq_20,
                    center = excluded.center,
                    bandwidth = excluded.bandwidth,
                    freq_min = excluded.freq_min,
                    freq_max = excluded.freq_max",
                params![
                    record.stable_id as i64,
                    record.bssid.to_string(),
                    record.ssid,
                    record.vendor,
                    record.country,
                    record.channel,
                    record.channel_20,
                    record.freq_20_mhz,
                    record.center_mhz,
                    record.bandwidth_mhz,
                    record.freq_min_mhz,
                    record.freq_max_mhz,
                ],
            )?;

            tx.execute(
                "INSERT INTO measurements
                    (stable_id, signal, quality, time, lon, lat, orientation)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.stable_id as i64,
                    record.signal_dbm,
                    record.quality,
                    record.capture_time as i64,
                    position.map(|p| p.lon),
                    position.map(|p| p.lat),
                    orientation,
                ],
            )?;
        }

        tx.commit()?;
        info!("stored {} records", records.len());
        Ok(())
    }

    /// Folds another store file into this one: networks are upserted by
    /// stable id, measurements are appended as-is (they keep their own
    /// capture times). Returns (networks, measurements) row counts taken
    /// from the source.
    pub fn merge_from<P: AsRef<Path>>(&mut self, other: P) -> anyhow::Result<(usize, usize)> {
        let path = other.as_ref();
        self.conn
            .execute(
                "ATTACH DATABASE ?1 AS other",
                params![path.to_string_lossy()],
            )
            .with_context(|| format!("attaching {}", path.display()))?;

        let result = (|| -> anyhow::Result<(usize, usize)> {
            let networks = self.conn.execute(
                "INSERT INTO networks
                    (stable_id, bssid, ssid, vendor, country, channel,
                     channel_20, freq_20, center, bandwidth, freq_min, freq_max)
                 SELECT stable_id, bssid, ssid, vendor, country, channel,
                        channel_20, freq_20, center, bandwidth, freq_min, freq_max
                 FROM other.networks WHERE true
                 ON CONFLICT(stable_id) DO UPDATE SET
                    ssid = excluded.ssid,
                    vendor = coalesce(excluded.vendor, vendor),
                    country = coalesce(excluded.country, country),
                    channel = excluded.channel,
                    channel_20 = excluded.channel_20,
                    freq_20 = excluded.freq_20,
                    center = excluded.center,
                    bandwidth = excluded.bandwidth,
                    freq_min = excluded.freq_min,
                    freq_max = excluded.freq_max",
                [],
            )?;
            let measurements = self.conn.execute(
                "INSERT INTO measurements
                    (stable_id, signal, quality, time, lon, lat, orientation)
                 SELECT stable_id, signal, quality, time, lon, lat, orientation
                 FROM other.measurements",
                [],
            )?;
            Ok((networks, measurements))
        })();

        self.conn.execute("DETACH DATABASE other", [])?;
        result
    }

    pub fn network_count(&self) -> anyhow::Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM networks", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn measurement_count(&self) -> anyhow::Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM measurements", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::util::MacAddr;

    fn record(id: u8, signal: i32, time: u64) -> AccessPoint {
        AccessPoint {
            bssid: MacAddr(0, 0, 0, 0, 0, id),
            stable_id: id as u64,
            ssid: format!("net-{id}"),
            vendor: None,
            signal_dbm: Some(signal),
            quality: None,
            country: None,
            environment: None,
            supported_channels: None,
            channel_20: Some(36),
            freq_20_mhz: Some(5180),
            channel: Some(36),
            center_mhz: 5180,
            bandwidth_mhz: 20,
            freq_min_mhz: 5170,
            freq_max_mhz: 5190,
            capture_time: time,
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn upsert_keeps_one_network_row_but_appends_measurements() {
        let mut store = Store::in_memory().unwrap();

        store
            .record_batch(&[record(1, -50, 100)], None, None)
            .unwrap();
        store
            .record_batch(&[record(1, -55, 200)], None, None)
            .unwrap();

        assert_eq!(store.network_count().unwrap(), 1);
        assert_eq!(store.measurement_count().unwrap(), 2);
    }

    #[test]
    fn position_and_orientation_land_in_measurements() {
        let mut store = Store::in_memory().unwrap();
        let position = Position {
            lon: 2.35,
            lat: 48.85,
        };

        store
            .record_batch(&[record(7, -61, 300)], Some(position), Some(135.0))
            .unwrap();

        let (lon, orientation): (f64, f64) = store
            .conn
            .query_row(
                "SELECT lon, orientation FROM measurements WHERE stable_id = 7",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert!((lon - 2.35).abs() < 1e-9);
        assert!((orientation - 135.0).abs() < 1e-9);
    }

    #[test]
    fn merge_upserts_networks_and_appends_measurements() {
        let other_path = std::env::temp_dir().join("wavemap-store-merge-test.db");
        let _ = std::fs::remove_file(&other_path);

        {
            let mut other = Store::open(&other_path).unwrap();
            other
                .record_batch(&[record(1, -40, 400), record(2, -70, 400)], None, None)
                .unwrap();
        }

        let mut store = Store::in_memory().unwrap();
        store
            .record_batch(&[record(1, -50, 100)], None, None)
            .unwrap();

        let (networks, measurements) = store.merge_from(&other_path).unwrap();
        assert_eq!(networks, 2);
        assert_eq!(measurements, 2);
        assert_eq!(store.network_count().unwrap(), 2);
        assert_eq!(store.measurement_count().unwrap(), 3);

        let _ = std::fs::remove_file(&other_path);
    }
}
