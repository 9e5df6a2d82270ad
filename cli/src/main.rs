mod commands;
mod terminal;

use commands::{CommandLine, Commands, merge, parse, plan, survey};
use terminal::{logging, print};
use wavemap_common::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init();

    let cfg = Config {
        quiet: commands.quiet,
        no_banner: commands.no_banner,
    };
    print::banner(&cfg);

    match commands.command {
        Commands::Parse { file, dialect, band } => parse::parse(&file, dialect, band, &cfg).await,
        Commands::Survey(args) => survey::survey(args, &cfg).await,
        Commands::Plan => {
            plan::plan(&cfg);
            Ok(())
        }
        Commands::Merge { dest, src } => merge::merge(&dest, &src),
    }
}
