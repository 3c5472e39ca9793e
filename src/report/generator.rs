//! Text report generation.
//!
//! This module renders a [`Report`] as the plain-text collection report
//! or as JSON.

use crate::models::{
    BucketSummary, CommandBlock, CompletenessEntry, DistributionEntry, NumericSummary, Report,
    SamplePoint, Section,
};
use anyhow::{Context, Result};
use std::path::Path;

/// Generate the complete text report.
pub fn generate_text_report(report: &Report) -> String {
    let mut output = String::new();

    for section in &report.sections {
        output.push_str(&generate_section(section));
        output.push('\n');
    }

    output
}

fn generate_section(section: &Section) -> String {
    match section {
        Section::ConnectionStatus {
            title,
            server_url,
            collection,
            total_points,
            vector_size,
            embedding_model,
            status,
        } => {
            let mut s = format!("=== {} ===\n\n", title);
            s.push_str("## Connection Status\n");
            s.push_str(&format!("- Server: {} [OK]\n", server_url));
            s.push_str(&format!("- Collection: {} [OK]\n", collection));
            s.push_str(&format!("- Total points analyzed: {}\n", total_points));
            s.push_str(&format!(
                "- Vector dimensions: {} ({})\n",
                vector_size, embedding_model
            ));
            s.push_str(&format!("- Collection status: {}\n", status));
            s
        }
        Section::DataOverview {
            unique_files,
            payload_fields,
        } => {
            let mut s = String::from("## Data Overview\n");
            s.push_str(&format!("- Unique files processed: {}\n", unique_files));
            s.push_str(&format!("- Payload fields available: {}\n", payload_fields.len()));
            s.push_str(&format!("- Field catalog: {:?}\n", payload_fields));
            s
        }
        Section::Sample { sample } => generate_sample_section(sample.as_ref()),
        Section::Files {
            total,
            listed,
            remaining,
        } => {
            let mut s = format!("## Unique Files Mapped ({} total):\n", total);
            for (i, file) in listed.iter().enumerate() {
                s.push_str(&format!("{:2}. {}\n", i + 1, file));
            }
            if *remaining > 0 {
                s.push_str(&format!("... and {} more files\n", remaining));
            }
            s
        }
        Section::Categories { entries } => {
            generate_distribution("## Categories Distribution:", entries, None)
        }
        Section::IntelligenceTypes { entries } => {
            generate_distribution("## Intelligence Types Analysis:", entries, None)
        }
        Section::ConvergenceChains {
            summary,
            size_distribution,
        } => generate_chain_section(summary.as_ref(), size_distribution),
        Section::ConvergenceScores { summary, buckets } => {
            generate_score_section(summary.as_ref(), buckets)
        }
        Section::EnrichmentLevels { entries } => generate_distribution(
            "## Enrichment Levels Analysis:",
            entries,
            Some("- No enrichment levels data found"),
        ),
        Section::DataQuality { entries } => generate_quality_section(entries),
        Section::Insights { items } => {
            let mut s = String::from("## Key Insights & Recommendations:\n");
            for (i, item) in items.iter().enumerate() {
                s.push_str(&format!("{}. {}\n", i + 1, item));
            }
            s
        }
        Section::Commands { blocks } => generate_commands_section(blocks),
    }
}

fn generate_sample_section(sample: Option<&SamplePoint>) -> String {
    let mut s = String::from("## Sample Point Analysis\n");
    let Some(sample) = sample else {
        s.push_str("- No points loaded\n");
        return s;
    };

    s.push_str(&format!("- Sample Point ID: {}\n", sample.id));
    s.push_str(&format!("- Sample Payload Keys: {:?}\n", sample.keys));
    if let Some(ref file) = sample.file {
        s.push_str(&format!("- Sample File: {}\n", file));
    }
    if let Some(size) = sample.chain_size {
        s.push_str(&format!("- Sample Chain Size: {} participants\n", size));
        s.push_str(&format!(
            "- First {} Participants: [{}]\n",
            sample.participants_shown,
            sample.first_participants.join(", ")
        ));
    }
    s
}

fn generate_distribution(
    heading: &str,
    entries: &[DistributionEntry],
    empty: Option<&str>,
) -> String {
    let mut s = format!("{}\n", heading);

    if entries.is_empty() {
        if let Some(message) = empty {
            s.push_str(message);
            s.push('\n');
        }
        return s;
    }

    for entry in entries {
        s.push_str(&format!(
            "- {}: {} points ({:.1}%)\n",
            entry.label, entry.count, entry.percentage
        ));
    }
    s
}

fn generate_chain_section(
    summary: Option<&NumericSummary>,
    size_distribution: &[(usize, usize)],
) -> String {
    let mut s = String::from("## Convergence Chain Analysis:\n");
    let Some(summary) = summary else {
        s.push_str("- No convergence chains data found\n");
        return s;
    };

    s.push_str(&format!("- Total chains analyzed: {}\n", summary.count));
    s.push_str(&format!("- Average participants per chain: {:.1}\n", summary.mean));
    s.push_str(&format!("- Median participants per chain: {:.1}\n", summary.median));
    s.push_str(&format!("- Max participants in chain: {}\n", summary.max));
    s.push_str(&format!("- Min participants in chain: {}\n", summary.min));

    s.push_str("- Chain size distribution:\n");
    for (size, count) in size_distribution {
        s.push_str(&format!("  * {} participants: {} chains\n", size, count));
    }
    s
}

fn generate_score_section(summary: Option<&NumericSummary>, buckets: &[BucketSummary]) -> String {
    let mut s = String::from("## Convergence Scores Analysis:\n");
    let Some(summary) = summary else {
        s.push_str("- No convergence scores data found\n");
        return s;
    };

    s.push_str(&format!("- Total scores recorded: {}\n", summary.count));
    s.push_str(&format!("- Average convergence score: {:.2}\n", summary.mean));
    s.push_str(&format!("- Median convergence score: {:.2}\n", summary.median));
    s.push_str(&format!("- Max convergence score: {:.2}\n", summary.max));
    s.push_str(&format!("- Min convergence score: {:.2}\n", summary.min));
    match summary.std_dev {
        Some(sd) => s.push_str(&format!("- Standard deviation: {:.2}\n", sd)),
        None => s.push_str("- Standard deviation: n/a (needs at least two scores)\n"),
    }

    s.push_str("- Score distribution by ranges:\n");
    for bucket in buckets {
        s.push_str(&format!(
            "  * {}: {} scores (avg: {:.2})\n",
            bucket.label, bucket.count, bucket.mean
        ));
    }
    s
}

fn generate_quality_section(entries: &[CompletenessEntry]) -> String {
    let mut s = String::from("## Data Quality Assessment:\n");
    for entry in entries {
        s.push_str(&format!(
            "- Points with {}: {}/{} ({:.1}%)\n",
            entry.label, entry.count, entry.total, entry.percentage
        ));
    }
    s
}

fn generate_commands_section(blocks: &[CommandBlock]) -> String {
    let mut s = String::from("## CURL Commands for Verification:\n");
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            s.push('\n');
        }
        s.push_str(&format!("# {}\n", block.title));
        for line in &block.lines {
            s.push_str(line);
            s.push('\n');
        }
    }
    s
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered report content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
