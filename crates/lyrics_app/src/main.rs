mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use lyrics_core::RunSummary;
use lyrics_engine::Runner;
use lyrics_logging::{lyrics_info, lyrics_warn};

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    lyrics_logging::initialize(args.log_level(), args.log_file.as_deref());

    let config = args.run_config().context("cannot load configuration")?;
    let mut runner = Runner::from_config(&config).context("invalid configuration")?;
    let cancel = runner.cancellation_token();

    let runtime = tokio::runtime::Runtime::new().context("cannot start tokio runtime")?;
    let summary = runtime.block_on(async {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                lyrics_warn!("Ctrl-C received; stopping after the current step");
                cancel.cancel();
            }
        });
        lyrics_info!("Reading {:?}", config.input);
        runner.run(&config.input).await
    });
    let summary = summary.with_context(|| format!("run over {:?} failed", config.input))?;

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let stats = summary.stats;
    println!("found:          {}", stats.found);
    println!("not found:      {}", stats.not_found);
    println!("failed:         {}", stats.failed);
    println!("other language: {}", stats.redirected);
    println!("skipped:        {}", stats.skipped);
    if summary.interrupted {
        println!("interrupted; rerun the same command to resume");
    }
}
