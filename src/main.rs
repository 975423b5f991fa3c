use anyhow::Result;
use clap::Parser;
use safe_icon_gen::icon_gen::{self, DEFAULT_OUTPUT_DIR};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "safe-icon-gen",
    version,
    about = "Draw the SAFE app icon at every launcher size"
)]
struct Args {
    /// Output directory.
    #[clap(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,
}

fn main() -> Result<()> {
    // Caption font failures are reported even without RUST_LOG
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .init();
    let args = Args::parse();

    icon_gen::generate_icons(icon_gen::Args {
        output: args.output,
    })
}
