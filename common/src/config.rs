pub struct Config {
    /// Output verbosity: 0 = full, 1 = results only, 2 = summary only.
    pub quiet: u8,
    /// Suppresses the startup banner.
    pub no_banner: bool,
}
