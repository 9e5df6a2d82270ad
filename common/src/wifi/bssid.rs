use std::sync::OnceLock;
use mac_oui::Oui;
use pnet::util::MacAddr;

static OUI_DB: OnceLock<Oui> = OnceLock::new();

/// Retrieves or initializes the **Organizationally unique identifier** database.
///
/// Used for linking a vendor to an access point's BSSID.
fn get_oui_db() -> &'static Oui {
    OUI_DB.get_or_init(|| {
        Oui::default().expect("failed to load OUI database")
    })
}

/// Identify the vendor of a BSSID.
pub fn vendor(bssid: MacAddr) -> Option<String> {
    let db = get_oui_db();
    let mac_str = bssid.to_string();
    match db.lookup_by_mac(&mac_str) {
        Ok(Some(entry)) => Some(entry.company_name.clone()),
        _ => None,
    }
}

/// Derive the persistent identifier for an access point: its BSSID read as a
/// 48-bit big-endian integer. Stable across capture sessions, so it serves as
/// the primary key when batches from different scans are stored or merged.
pub fn stable_id(bssid: MacAddr) -> u64 {
    let MacAddr(a, b, c, d, e, f) = bssid;
    u64::from_be_bytes([0, 0, a, b, c, d, e, f])
}
