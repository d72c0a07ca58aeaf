//! Command implementations

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::AppConfig;
use crate::app::container::AppContainer;
use crate::app::spawn_job;
use crate::cli::args::{ConvertArgs, OptionsArgs, ProbeArgs};
use crate::domain::model::JobReport;
use crate::domain::options::OptionTables;
use crate::engine::progress::{
    ConsoleProgressRenderer, JsonProgressRenderer, ProgressRenderer, ProgressSnapshot,
};

/// How often the progress display is refreshed
const RENDER_INTERVAL: Duration = Duration::from_millis(200);

/// Execute the convert command
pub async fn convert(container: &dyn AppContainer, config: &AppConfig, args: ConvertArgs) -> Result<()> {
    let job = args
        .to_job(container.option_tables(), config.failure_policy)
        .context("Invalid conversion request")?;

    info!(
        dir = %job.working_dir.display(),
        files = job.files.len(),
        start = %job.start,
        end = %job.end,
        "Starting convert operation"
    );

    let renderer: Box<dyn ProgressRenderer> = if args.json {
        Box::new(JsonProgressRenderer)
    } else {
        Box::new(ConsoleProgressRenderer::new())
    };

    let handle = spawn_job(container.convert_interactor(), job);
    let counters = handle.counters();
    let mut ticker = tokio::time::interval(RENDER_INTERVAL);
    let mut last: Option<ProgressSnapshot> = None;
    let mut reported_failures = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            signal = tokio::signal::ctrl_c() => {
                if signal.is_ok() {
                    warn!("Interrupted, cancelling conversion");
                    handle.cancel();
                }
            }
        }

        let snapshot = counters.snapshot();
        if snapshot.failures > reported_failures {
            reported_failures = snapshot.failures;
            if let Some(message) = counters.last_error() {
                renderer.on_error(&message);
            }
        }
        if last != Some(snapshot) {
            renderer.on_progress(&snapshot);
            last = Some(snapshot);
        }
        if handle.is_finished() {
            break;
        }
    }

    let report = handle.join().await.context("Conversion failed")?;
    renderer.on_complete(&summary(&report));
    if args.json {
        println!("{}", serde_json::to_string(&report)?);
    }

    if let Some(frame) = &report.dropped_frame {
        warn!(file = %frame, "A single image cannot form a sequence and was skipped");
    }
    if !report.is_clean() {
        anyhow::bail!("{} file(s) failed to convert", report.failures.len());
    }
    Ok(())
}

fn summary(report: &JobReport) -> String {
    format!(
        "Converted {}, skipped {}, failed {}",
        report.converted.len(),
        report.skipped.len(),
        report.failures.len()
    )
}

/// Execute the probe command
pub async fn probe(container: &dyn AppContainer, args: ProbeArgs) -> Result<()> {
    let summary = container
        .inspect_interactor()
        .inspect(&args.file)
        .await
        .with_context(|| format!("Failed to probe {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.to_text());
    }
    Ok(())
}

/// Execute the options command
pub fn options(tables: &OptionTables, args: OptionsArgs) -> Result<()> {
    if args.json {
        let listing = serde_json::json!({
            "video": tables.video_options().collect::<Vec<_>>(),
            "audio": tables
                .audio_options()
                .map(|(name, command)| serde_json::json!({ "name": name, "command": command }))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("Video options:");
    for option in tables.video_options() {
        let command = if option.command.is_empty() {
            "(extract frames)"
        } else {
            option.command.as_str()
        };
        println!("  {:<14} {:<10} {}", option.name, option.suffix, command);
    }
    println!("Audio options:");
    for (name, command) in tables.audio_options() {
        println!("  {:<14} {}", name, command);
    }
    Ok(())
}
