use std::path::Path;

use wavemap_common::success;
use wavemap_store::Store;

pub fn merge(dest: &Path, src: &Path) -> anyhow::Result<()> {
    let mut store = Store::open(dest)?;
    let (networks, measurements) = store.merge_from(src)?;
    success!(
        "merged {networks} networks and {measurements} measurements from {} into {}",
        src.display(),
        dest.display()
    );
    Ok(())
}
