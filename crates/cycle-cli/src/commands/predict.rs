//! Predict command for projecting a user's next cycle.
//!
//! With `--enhance`, the configured AI service is asked once for analysis and
//! health tips. Any failure, including a timeout, falls back to the
//! deterministic prediction.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result, anyhow};
use cycle_core::{AiSuggestion, CalendarDate, CycleReport, Prediction, UserId, predict_cycle};
use cycle_llm::{Client, PredictionRequest};
use serde::Serialize;

use crate::Config;
use crate::store::EntryStore;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictOutput<'a> {
    user: &'a UserId,
    #[serde(flatten)]
    report: &'a CycleReport,
}

pub fn run<W: Write>(
    writer: &mut W,
    store: &EntryStore,
    config: &Config,
    user: &UserId,
    today: CalendarDate,
    enhance: bool,
    json: bool,
) -> Result<()> {
    let mut report = predict_cycle(store.entries(user), today, &config.engine());

    if enhance {
        report = enhance_report(report, config, today);
    }

    if json {
        let output = PredictOutput {
            user,
            report: &report,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        write!(writer, "{}", format_prediction(user, &report.prediction))?;
    }
    Ok(())
}

/// Applies AI enhancement when an API key is configured.
fn enhance_report(report: CycleReport, config: &Config, today: CalendarDate) -> CycleReport {
    let Some(api_key) = config.api_key() else {
        tracing::warn!("no API key configured (set CYCLE_API_KEY or config.toml), skipping enhancement");
        return report;
    };
    let outcome = request_suggestion(&report, api_key, config, today);
    report.enhance(outcome.map_err(|err| format!("{err:#}")))
}

fn request_suggestion(
    report: &CycleReport,
    api_key: &str,
    config: &Config,
    today: CalendarDate,
) -> Result<AiSuggestion> {
    let timeout = config.ai_timeout();
    let client = Client::with_timeout(api_key, timeout).context("failed to create LLM client")?;
    let request = PredictionRequest::from_report(report, today);
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;

    let suggestion = runtime
        .block_on(tokio::time::timeout(
            timeout,
            client.suggest_prediction(&config.model, &request),
        ))
        .map_err(|_| anyhow!("AI request timed out after {}s", timeout.as_secs()))?
        .context("failed to get AI prediction")?;
    Ok(suggestion)
}

/// Human-readable prediction block.
pub fn format_prediction(user: &UserId, prediction: &Prediction) -> String {
    let dates = prediction.dates();
    let mut output = String::new();
    writeln!(output, "NEXT CYCLE: {user}").unwrap();
    writeln!(
        output,
        "Period:         {} to {}",
        dates.next_period_start, dates.next_period_end
    )
    .unwrap();
    writeln!(output, "Ovulation:      {}", dates.ovulation_date).unwrap();
    writeln!(
        output,
        "Fertile window: {} to {}",
        dates.fertile_window_start, dates.fertile_window_end
    )
    .unwrap();
    writeln!(output, "Confidence:     {}", dates.confidence).unwrap();

    match prediction {
        Prediction::Deterministic(_) => {
            writeln!(output, "Source:         deterministic").unwrap();
        }
        Prediction::AiEnhanced(enhanced) => {
            writeln!(output, "Source:         AI-enhanced").unwrap();
            writeln!(output).unwrap();
            writeln!(output, "ANALYSIS").unwrap();
            writeln!(output, "{}", enhanced.analysis).unwrap();
            if !enhanced.health_tips.is_empty() {
                writeln!(output).unwrap();
                writeln!(output, "HEALTH TIPS").unwrap();
                for tip in &enhanced.health_tips {
                    writeln!(output, "- {tip}").unwrap();
                }
            }
        }
    }
    output
}
