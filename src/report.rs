//! HTML report rendering for a finished temperature sweep.
//!
//! Receives only fully-ranked data: every result carries both a score
//! and a rank by the time the engine hands a [`SweepReport`] over.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use chrono::Local;

use crate::sweep::{GenerationResult, PromptBatch, SweepReport};

const STYLE: &str = "\
* { margin: 0; padding: 0; box-sizing: border-box; }\n\
body { font-family: sans-serif; background: #f4f7f6; padding: 20px; }\n\
.container { max-width: 1000px; margin: 0 auto; background: white; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }\n\
.header { background: #4caf50; color: white; padding: 20px; text-align: center; }\n\
.overall-stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 15px; padding: 20px; background: #e8f5e9; }\n\
.stat-card { background: white; padding: 15px; border-radius: 5px; text-align: center; }\n\
.stat-number { font-size: 1.5rem; font-weight: bold; color: #4caf50; }\n\
.stat-label { color: #555; font-size: 0.8rem; margin-top: 5px; }\n\
.prompt-section { margin: 0 20px 30px 20px; border-bottom: 1px solid #eee; padding-bottom: 20px; }\n\
.prompt-header { background: #f0f0f0; padding: 15px; margin-bottom: 15px; border-radius: 5px; }\n\
.response-card { background: white; border: 1px solid #ddd; border-radius: 5px; margin-bottom: 15px; }\n\
.response-card.rank-1 { border-color: #ffd700; }\n\
.response-header { display: flex; justify-content: space-between; padding: 10px 15px; background: #f0f0f0; border-bottom: 1px solid #ddd; }\n\
.rank-badge { background: #4caf50; color: white; padding: 4px 8px; border-radius: 12px; font-weight: bold; font-size: 0.8rem; }\n\
.temp-score { font-size: 0.8rem; color: #444; }\n\
.response-content { padding: 15px; line-height: 1.5; color: #333; font-size: 0.9rem; max-height: 200px; overflow-y: auto; }\n\
.error-response { background: #ffebee; color: #c62828; border-color: #ef9a9a; }\n\
.timestamp { text-align: center; color: #777; font-size: 0.8rem; padding: 15px; background: #f0f0f0; }\n";

/// Renders the full report as a standalone HTML document.
pub fn render_report(report: &SweepReport) -> String {
    let summary = &report.summary;
    let avg_best = summary
        .avg_best_temperature
        .map(|t| format!("{t:.1}"))
        .unwrap_or_else(|| "n/a".to_string());

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<title>Temperature Sweep Report</title>\n");
    let _ = write!(html, "<style>\n{STYLE}</style>\n");
    html.push_str("</head>\n<body>\n<div class=\"container\">\n");
    html.push_str(
        "<div class=\"header\"><h1>Temperature Sweep Report</h1>\
         <p>Completion ranking across prompts and temperatures</p></div>\n",
    );

    html.push_str("<div class=\"overall-stats\">\n");
    push_stat(&mut html, &summary.total_prompts.to_string(), "Prompts");
    push_stat(&mut html, &summary.total_responses.to_string(), "Responses");
    push_stat(
        &mut html,
        &summary.temperatures_tested.to_string(),
        "Temperatures Tested",
    );
    push_stat(&mut html, &avg_best, "Avg Best Temperature");
    push_stat(
        &mut html,
        &format!("{}%", summary.success_rate),
        "Success Rate",
    );
    html.push_str("</div>\n");

    for (i, batch) in report.batches.iter().enumerate() {
        render_batch(&mut html, i, batch);
    }

    let _ = write!(
        html,
        "<div class=\"timestamp\">Generated on {}</div>\n",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

/// Renders and writes the report to `path`.
pub fn write_report(report: &SweepReport, path: &Path) -> io::Result<()> {
    fs::write(path, render_report(report))
}

fn render_batch(html: &mut String, index: usize, batch: &PromptBatch) {
    html.push_str("<div class=\"prompt-section\">\n");
    let _ = write!(
        html,
        "<div class=\"prompt-header\"><strong>Prompt #{}</strong><p>{}</p></div>\n",
        index + 1,
        escape(&batch.prompt)
    );

    let successful = batch.successful_count();
    let best_line = match batch.best() {
        Some(best) => format!(
            "Best temperature {} with score {}/100",
            best.temperature,
            best.score.unwrap_or(0)
        ),
        None => "No successful response for this prompt".to_string(),
    };
    let _ = write!(
        html,
        "<p class=\"temp-score\">{} &mdash; {}/{} succeeded</p>\n",
        best_line,
        successful,
        batch.results.len()
    );

    for result in &batch.results {
        render_result(html, result);
    }
    html.push_str("</div>\n");
}

fn render_result(html: &mut String, result: &GenerationResult) {
    let rank = result.rank.unwrap_or(0);
    let mut classes = String::from("response-card");
    if rank == 1 {
        classes.push_str(" rank-1");
    }
    if !result.is_success() {
        classes.push_str(" error-response");
    }
    let rank_label = if rank == 0 {
        "unranked".to_string()
    } else {
        format!("#{rank}")
    };
    let _ = write!(
        html,
        "<div class=\"{}\">\n<div class=\"response-header\">\
         <span class=\"rank-badge\">{}</span>\
         <span class=\"temp-score\">T: {} &middot; {}/100</span></div>\n\
         <div class=\"response-content\">{}</div>\n</div>\n",
        classes,
        rank_label,
        result.temperature,
        result.score.unwrap_or(0),
        escape(&result.text).replace('\n', "<br>")
    );
}

fn push_stat(html: &mut String, number: &str, label: &str) {
    let _ = write!(
        html,
        "<div class=\"stat-card\"><span class=\"stat-number\">{number}</span>\
         <div class=\"stat-label\">{label}</div></div>\n"
    );
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
