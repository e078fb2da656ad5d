#![forbid(unsafe_code)]

use clap::Parser;
use cmdtree::cli::{self, Cli};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    std::process::exit(cli::run(&cli));
}
