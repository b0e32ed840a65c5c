use std::io::IsTerminal;
use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use autotemp::backends::groq::Groq;
use autotemp::report;
use autotemp::secret_store::{SecretStore, GROQ_API_KEY};
use autotemp::sweep::{PromptBatch, DEFAULT_MAX_CONCURRENCY};
use autotemp::TemperatureSweep;

use crate::args::{CliArgs, KeyCommand};

pub async fn run() -> anyhow::Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    if let Some(command) = &args.command {
        return handle_key_command(command);
    }

    let prompts = resolve_prompts(&args)?;
    let api_key = resolve_api_key(&args)?;

    let provider = Groq::with_config(api_key, args.base_url.clone(), args.timeout);
    let sweep = TemperatureSweep::with_max_concurrency(
        Arc::new(provider),
        &args.model,
        args.max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY),
    );

    println!(
        "Testing {} prompts with {} temperatures each...",
        prompts.len(),
        args.temperatures.len()
    );

    let sweep_report = sweep.run(&prompts, &args.temperatures).await?;

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("autotemp-report.html"));
    report::write_report(&sweep_report, &path)
        .with_context(|| format!("failed to write report to {}", path.display()))?;

    println!("Report saved to {}", path.display());
    for (i, batch) in sweep_report.batches.iter().enumerate() {
        println!("Prompt {}: {}", i + 1, batch_summary(batch));
    }
    if let Some(avg) = sweep_report.summary.avg_best_temperature {
        println!("Average best temperature: {avg:.1}");
    }
    println!("Overall success rate: {}%", sweep_report.summary.success_rate);
    Ok(())
}

fn batch_summary(batch: &PromptBatch) -> String {
    match batch.best() {
        Some(best) => format!(
            "best temp = {}, score = {}/100",
            best.temperature,
            best.score.unwrap_or(0)
        ),
        None => "all attempts failed".to_string(),
    }
}

fn handle_key_command(command: &KeyCommand) -> anyhow::Result<()> {
    let mut store = SecretStore::new()?;
    match command {
        KeyCommand::SetKey { value } => {
            store.set(GROQ_API_KEY, value)?;
            println!("Groq API key has been set.");
        }
        KeyCommand::GetKey => match store.get(GROQ_API_KEY) {
            Some(value) => println!("{GROQ_API_KEY}: {value}"),
            None => println!("No Groq API key stored"),
        },
        KeyCommand::DeleteKey => {
            store.delete(GROQ_API_KEY)?;
            println!("Groq API key deleted.");
        }
    }
    Ok(())
}

fn resolve_prompts(args: &CliArgs) -> anyhow::Result<Vec<String>> {
    if !args.prompts.is_empty() {
        return Ok(args.prompts.clone());
    }
    if let Some(prompts) = prompts_from_stdin()? {
        return Ok(prompts);
    }
    Err(anyhow::anyhow!(
        "no prompts provided; use --prompt or pipe one prompt per line"
    ))
}

fn prompts_from_stdin() -> anyhow::Result<Option<Vec<String>>> {
    if std::io::stdin().is_terminal() {
        return Ok(None);
    }
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let prompts: Vec<String> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if prompts.is_empty() {
        Ok(None)
    } else {
        Ok(Some(prompts))
    }
}

fn resolve_api_key(args: &CliArgs) -> anyhow::Result<String> {
    if let Some(key) = &args.api_key {
        return Ok(key.clone());
    }
    if let Ok(key) = std::env::var("GROQ_API_KEY") {
        if !key.is_empty() {
            return Ok(key);
        }
    }
    if let Some(key) = SecretStore::new().ok().and_then(|s| s.get(GROQ_API_KEY).cloned()) {
        return Ok(key);
    }
    Err(anyhow::anyhow!(
        "no Groq API key; pass --api-key, set GROQ_API_KEY, or run `autotemp set-key`"
    ))
}
