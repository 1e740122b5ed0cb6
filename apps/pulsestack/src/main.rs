//! PulseStack synthesizer.
//!
//! Resolves deployment settings from the environment and context, composes
//! the static-site stack, and writes it out as a cloud assembly.
//!
//! # Usage
//!
//! ```text
//! CDK_DEFAULT_ACCOUNT=123456789012 pulsestack synth --output cdk.out
//! pulsestack -c account=123456789012 -c region=eu-west-1 --print
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `APP_ENV` | `dev` | Deployment tier: `dev`, `stage`, `prod` |
//! | `CDK_DEFAULT_ACCOUNT` | *(unset)* | Target account |
//! | `CDK_DEFAULT_REGION` | *(unset)* | Target region |
//! | `AWS_REGION` | *(unset)* | Region fallback after context |
//! | `APP_REMOVAL_POLICY` | tier default | `destroy` or `retain` |
//! | `CDK_CONTEXT_JSON` | *(unset)* | Context object from the CDK CLI |
//! | `CDK_OUTDIR` | `cdk.out` | Cloud assembly directory |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pulsestack_core::{ContextMap, EnvSource, ProcessEnv, RemovalMode, Settings, resolve_settings};
use pulsestack_stack::{AssemblySummary, StackDescription, compose, ids, synth};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Synthesize the PulseStack static-site stack.
#[derive(Debug, Parser)]
#[command(name = "pulsestack", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Context parameter as `key=value`; repeatable.
    #[arg(short = 'c', long = "context", value_name = "KEY=VALUE", global = true)]
    context: Vec<String>,

    /// Cloud assembly output directory.
    #[arg(long, env = "CDK_OUTDIR", default_value = "cdk.out", global = true)]
    output: PathBuf,

    /// Override the removal policy of the site bucket.
    #[arg(long, value_name = "destroy|retain", global = true)]
    removal_policy: Option<RemovalMode>,

    /// Also write the template JSON to stdout.
    #[arg(long, global = true)]
    print: bool,

    /// Log level filter used when `RUST_LOG` is unset.
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Write the cloud assembly (default).
    Synth,
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to `log_level`. Logs go to
/// stderr so stdout carries only `--print` output.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Resolve settings from `env` plus the `-c` overrides on the command line.
fn settings_from(cli: &Cli, env: &impl EnvSource) -> Result<Settings> {
    let context = ContextMap::from_env(env)
        .context("failed to read context from CDK_CONTEXT_JSON")?
        .with_overrides(&cli.context)
        .context("invalid -c context parameter")?;

    let mut settings = resolve_settings(env, &context);
    if let Some(removal) = cli.removal_policy {
        settings.removal = removal;
    }
    Ok(settings)
}

fn run(cli: &Cli, env: &impl EnvSource) -> Result<(StackDescription, AssemblySummary)> {
    let settings = settings_from(cli, env)?;

    // Fail before any composition when no usable account was resolved.
    let target = settings.target()?;
    info!(target = %target, env_name = %settings.env_name, "synthesizing stack");

    let stack = compose(&settings).context("failed to compose stack")?;
    let summary = synth(&stack, &cli.output)
        .with_context(|| format!("failed to synthesize into {}", cli.output.display()))?;
    Ok((stack, summary))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command.unwrap_or(Command::Synth) {
        Command::Synth => {
            let (stack, summary) = run(&cli, &ProcessEnv)?;

            let web_url = stack
                .web_url()
                .map(serde_json::to_string)
                .transpose()
                .context("failed to render WebUrl output")?
                .unwrap_or_default();
            info!(
                out_dir = %summary.out_dir.display(),
                web_url = %web_url,
                bucket = ids::SITE_BUCKET,
                asset = %summary.asset_hash,
                removal = %stack.settings.removal,
                "stack synthesized"
            );

            if cli.print {
                let json = stack
                    .template
                    .to_json_pretty()
                    .context("failed to render template")?;
                println!("{json}");
            }
        }
    }

    Ok(())
}
