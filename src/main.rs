/*!
 * Command-line interface for filemap
 */

use std::io;
use std::process;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use rayon::ThreadPoolBuilder;

use filemap::config::{Args, Config};
use filemap::listing::build_listing;
use filemap::report::{ListingReport, Reporter};

fn main() -> io::Result<()> {
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut command = Args::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        return Ok(());
    }

    let config = Config::from_args(args);
    config.validate()?;

    // Configure thread pool
    if let Err(e) = ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build_global()
    {
        warn!("Failed to set thread pool size: {}", e);
    }

    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} ⏱️  {elapsed_precise}",
    ) {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📊 Walking");
    progress.set_message(format!("📂 {}", config.target_dir.display()));

    let start_time = Instant::now();
    let listing = build_listing(&config, None);
    let duration = start_time.elapsed();
    progress.finish_and_clear();
    let listing = listing?;

    let report = ListingReport {
        directory: config.target_dir.display().to_string(),
        duration,
        records: &listing.records,
    };
    Reporter::new(config.format).print_report(&report)?;

    if let Some(errors) = &listing.errors {
        eprintln!("\n{}", errors);
        process::exit(1);
    }

    Ok(())
}
