use clap::Parser;
use fhem_processor::cli::{Args, setup_logging};
use fhem_processor::{FhemError, LogProcessor};
use std::process;
use tokio_util::sync::CancellationToken;
use tracing::warn;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let cancellation_token = CancellationToken::new();

        // Ctrl-C stops scheduling new files and drains the running ones
        let signal_token = cancellation_token.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                    signal_token.cancel();
                }
                Err(e) => warn!("Failed to install CTRL+C signal handler: {}", e),
            }
        });

        let config = args.to_config()?;
        let stats = LogProcessor::new(config)?
            .with_cancellation(cancellation_token.clone())
            .process_pattern(&args.pattern)
            .await?;

        if cancellation_token.is_cancelled() {
            return Err(FhemError::ProcessingInterrupted {
                reason: "Processing interrupted by user".to_string(),
            });
        }

        Ok(stats)
    });

    match result {
        Ok(_stats) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
