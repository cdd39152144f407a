//! Terminal rendering for research briefs
//!
//! Builds the whole brief as a String so it can be tested without a
//! terminal. Missing fields render as placeholders rather than errors;
//! the backend contract leaves every field optional.

use chrono::Local;

use crate::client::ResearchBrief;
use crate::repl::colors::ansi::*;

const NO_TOPIC: &str = "Research Topic";
const NO_SUMMARY: &str = "No summary available.";
const NO_ANALYSIS: &str = "No detailed analysis available.";

/// Render a brief for the terminal
pub fn render_brief(brief: &ResearchBrief) -> String {
    let mut out = String::new();

    let topic = brief.topic.as_deref().unwrap_or(NO_TOPIC);
    out.push_str(&format!("\n{}{}{}{}\n", BOLD, CYAN, topic, RESET));

    let depth = brief
        .research_depth
        .as_ref()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "Medium".to_string());
    let confidence = brief
        .confidence_score
        .map(|c| format!("{}/10", c))
        .unwrap_or_else(|| "N/A".to_string());
    out.push_str(&format!(
        "{}Generated {} | Depth: {} | Confidence: {}{}\n",
        DIM,
        Local::now().format("%B %d, %Y at %H:%M"),
        depth,
        confidence,
        RESET
    ));

    out.push_str(&section_header("Executive Summary"));
    out.push_str(brief.executive_summary.as_deref().unwrap_or(NO_SUMMARY));
    out.push('\n');

    if !brief.key_findings.is_empty() {
        out.push_str(&section_header("Key Findings"));
        for (i, finding) in brief.key_findings.iter().enumerate() {
            out.push_str(&format!("  {}. {}\n", i + 1, finding));
        }
    }

    out.push_str(&section_header("Detailed Analysis"));
    out.push_str(brief.detailed_analysis.as_deref().unwrap_or(NO_ANALYSIS));
    out.push('\n');

    if !brief.sources.is_empty() {
        out.push_str(&section_header(&format!(
            "Sources ({})",
            brief.sources.len()
        )));
        for (i, source) in brief.sources.iter().enumerate() {
            let title = source
                .metadata
                .title
                .as_deref()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Source {}", i + 1));
            out.push_str(&format!("  {}. {}{}{}\n", i + 1, BOLD, title, RESET));
            if let Some(url) = source.metadata.url.as_deref() {
                // Plain text so it can be copied from the terminal
                out.push_str(&format!("     {}{}{}\n", BLUE, url, RESET));
            }
        }
    }

    out
}

fn section_header(title: &str) -> String {
    format!("\n{}{}{}{}\n", BOLD, MAGENTA, title, RESET)
}
