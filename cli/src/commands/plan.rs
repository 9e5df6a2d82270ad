use wavemap_common::config::Config;
use wavemap_core::plan::ChannelPlan;

use crate::terminal::print;

pub fn plan(cfg: &Config) {
    let plan = ChannelPlan::build();

    print::header("channel plan", cfg.quiet);
    for entry in plan.iter() {
        let key = format!("ch {:>3}", entry.channel);
        let value = format!(
            "{:>4} MHz  {:>3} MHz wide  [{:>4}..{:>4}]",
            entry.center_mhz, entry.bandwidth_mhz, entry.freq_min_mhz, entry.freq_max_mhz
        );
        print::aligned_line(&key, value, 6);
    }
    print::fat_separator();
}
