// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use std::process::ExitCode;

use bimgen::out::img::{self, WriteMode};
use bimgen::utils::{self, LogLevel};
use bimgen::{log_error, log_info, log_verbose};
use bimpart::layout::ImageLayout;
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "bimgen",
    version,
    about = "Bootable GPT + FAT32 disk image generator",
    long_about = None
)]
struct Cli {
    /// Output image path
    #[arg(default_value = "test.img")]
    output: PathBuf,

    /// Print the layout, GUIDs and checksums
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,

    /// Build the image in memory, then write it in one pass
    #[arg(long)]
    staged: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    utils::set_log_level(if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    });

    let mode = if cli.staged {
        WriteMode::Staged
    } else {
        WriteMode::Direct
    };

    match run(&cli, mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, mode: WriteMode) -> anyhow::Result<()> {
    let layout = ImageLayout::new();
    log_info!("Writing disk image to: {}", cli.output.display());

    let report = img::create(&cli.output, &layout, mode)?;
    for line in report.to_string().lines() {
        log_verbose!("{line}");
    }
    Ok(())
}
