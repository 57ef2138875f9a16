//! pdfbind - Bind PDF files into a single document.

mod cli;

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pdfbind::bind::BinderFactory;
use pdfbind::config::{Config, OverwriteMode};
use pdfbind::error::{BinderError, Result};
use pdfbind::filters::FileFilterRegistry;
use pdfbind::model::{BindResult, SourceFile, TargetDescriptor};
use pdfbind::output::{
    OutputFormatter, ProgressBar, ProgressStyle, display_bind_result, display_classification,
};
use pdfbind::utils::collect_source_paths;

/// Exit code for an operation stopped by Ctrl-C.
const EXIT_CANCELLED: i32 = 130;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(err.exit_code());
        }
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "pdfbind=debug" } else { "error" };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

/// Main application logic. Returns the process exit code.
async fn run(cli: Cli) -> Result<i32> {
    cli.validate()?;

    let registry = FileFilterRegistry::with_defaults();
    let mut config = cli.to_config()?;
    config.inputs = collect_source_paths(&config.inputs, &registry)?;
    config.validate().map_err(|e| BinderError::invalid_config(e.to_string()))?;

    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", pdfbind::NAME, pdfbind::VERSION));
        formatter.blank_line();
    }

    let factory = BinderFactory::with_options(config.bind_options());

    if config.dry_run {
        dry_run(&config, &factory, &formatter)?;
        return Ok(0);
    }

    handle_output_overwrite(&config, &formatter)?;

    let result = bind(&config, &factory, &formatter).await?;

    if config.json {
        print_json(&result)?;
    } else {
        display_bind_result(&formatter, &result);
    }

    Ok(if result.cancelled { EXIT_CANCELLED } else { 0 })
}

/// Classify every input and report, without touching the output.
fn dry_run(config: &Config, factory: &BinderFactory, formatter: &OutputFormatter) -> Result<()> {
    let binder = factory.binder();
    let classifications: Vec<_> = config.inputs.iter().map(|path| binder.inspect(path)).collect();

    if config.json {
        return print_json(&classifications);
    }

    formatter.info(&format!("Checking {} source(s)...", classifications.len()));
    for (index, classification) in classifications.iter().enumerate() {
        display_classification(formatter, index + 1, classification);
    }

    let usable = classifications.iter().filter(|c| c.state.is_ok()).count();
    formatter.blank_line();
    formatter.success("Dry run completed successfully");
    formatter.info(&format!(
        "  {usable} of {} source(s) would be bound into {}",
        classifications.len(),
        config.output.display()
    ));

    Ok(())
}

/// Run the bind on a worker, cancelling on Ctrl-C.
async fn bind(
    config: &Config,
    factory: &BinderFactory,
    formatter: &OutputFormatter,
) -> Result<BindResult> {
    let sources: Vec<SourceFile> = config.inputs.iter().map(SourceFile::new).collect();
    let total = sources.len();

    formatter.info(&format!("Binding {total} source(s)..."));

    let mut handle = factory
        .orchestrator(sources, TargetDescriptor::new(&config.output))
        .spawn();

    let cancel = handle.cancellation_token();
    let interrupt = formatter.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.warning("Interrupted, stopping after the current source");
            cancel.cancel();
        }
    });

    let mut progress = if formatter.should_print() {
        ProgressBar::new(total, ProgressStyle::Bar)
    } else {
        ProgressBar::disabled()
    };

    while let Some(event) = handle.next_progress().await {
        formatter.debug(&format!(
            "Processed {}",
            event.current_source.as_deref().unwrap_or("")
        ));
        progress.apply(&event);
    }

    let result = handle.wait().await;
    signal_task.abort();

    match result {
        Ok(ref r) if !r.cancelled => progress.finish(),
        _ => progress.clear(),
    }

    result
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| BinderError::other(format!("Failed to serialize result: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Handle output file overwrite scenarios.
fn handle_output_overwrite(config: &Config, formatter: &OutputFormatter) -> Result<()> {
    if !config.output.exists() {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(BinderError::output_exists(config.output.clone())),
        OverwriteMode::Prompt => {
            // No one to ask in quiet or JSON mode.
            if formatter.is_quiet() {
                return Err(BinderError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| BinderError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(BinderError::Cancelled)
            }
        }
    }
}
