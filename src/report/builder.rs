//! Report construction.
//!
//! Turns aggregated statistics into an ordered list of report sections.
//! Nothing here performs I/O; rendering lives in the generator.

use crate::analysis::CollectionStats;
use crate::config::{CollectionConfig, ReportConfig};
use crate::models::{
    CommandBlock, LogicalField, PayloadValue, PointRecord, Report, SamplePoint, Section,
};
use serde_json::Value;

/// Settings that shape the report but do not come from the data.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub collection: CollectionConfig,
    pub max_listed_files: usize,
    pub sample_participants: usize,
}

impl ReportContext {
    pub fn new(collection: &CollectionConfig, report: &ReportConfig) -> Self {
        Self {
            collection: collection.clone(),
            max_listed_files: report.max_listed_files,
            sample_participants: report.sample_participants,
        }
    }
}

impl Default for ReportContext {
    fn default() -> Self {
        Self::new(&CollectionConfig::default(), &ReportConfig::default())
    }
}

/// Build the full report.
///
/// `sample` is the first point of the export, shown as an example record.
pub fn build_report(
    stats: &CollectionStats,
    sample: Option<&PointRecord>,
    ctx: &ReportContext,
) -> Report {
    let collection = &ctx.collection;

    let mut sections = vec![
        Section::ConnectionStatus {
            title: format!(
                "QDRANT {} ANALYSIS",
                collection.name.replace('_', " ").to_uppercase()
            ),
            server_url: collection.server_url.clone(),
            collection: collection.name.clone(),
            total_points: stats.total_points,
            vector_size: collection.vector_size,
            embedding_model: collection.embedding_model.clone(),
            status: collection.status.clone(),
        },
        Section::DataOverview {
            unique_files: stats.files.len(),
            payload_fields: stats.payload_fields.iter().cloned().collect(),
        },
        Section::Sample {
            sample: sample.map(|point| sample_point(point, ctx.sample_participants)),
        },
    ];

    let listed: Vec<String> = stats
        .files
        .iter()
        .take(ctx.max_listed_files)
        .cloned()
        .collect();
    sections.push(Section::Files {
        total: stats.files.len(),
        remaining: stats.files.len() - listed.len(),
        listed,
    });

    sections.push(Section::Categories {
        entries: stats.category_distribution(),
    });
    sections.push(Section::IntelligenceTypes {
        entries: stats.intelligence_distribution(),
    });

    let chains = stats.chain_summary();
    sections.push(Section::ConvergenceChains {
        size_distribution: if chains.is_some() {
            stats.chain_size_distribution()
        } else {
            Vec::new()
        },
        summary: chains,
    });

    let scores = stats.score_summary();
    sections.push(Section::ConvergenceScores {
        buckets: if scores.is_some() {
            stats.score_buckets()
        } else {
            Vec::new()
        },
        summary: scores,
    });

    sections.push(Section::EnrichmentLevels {
        entries: stats.enrichment_distribution(),
    });
    sections.push(Section::DataQuality {
        entries: stats.completeness_entries(),
    });
    sections.push(Section::Insights {
        items: insights(stats, ctx),
    });
    sections.push(Section::Commands {
        blocks: verification_commands(collection),
    });

    Report { sections }
}

fn sample_point(point: &PointRecord, participants_shown: usize) -> SamplePoint {
    let payload = &point.payload;
    let first_participants = point
        .first_convergence_chain()
        .and_then(|chain| chain.participants());

    SamplePoint {
        id: point.id.to_string(),
        keys: payload.keys().map(String::from).collect(),
        file: payload
            .field(LogicalField::SourceFile)
            .map(PayloadValue::label),
        chain_size: first_participants.map(<[PayloadValue]>::len),
        participants_shown,
        first_participants: first_participants
            .map(|items| {
                items
                    .iter()
                    .take(participants_shown)
                    .map(|p| Value::from(p).to_string())
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn insights(stats: &CollectionStats, ctx: &ReportContext) -> Vec<String> {
    let mut items = vec![
        format!(
            "Data completeness: All {} points successfully retrieved",
            stats.total_points
        ),
        format!(
            "File diversity: {} unique files processed by Intelligence Enrichment Pipeline",
            stats.files.len()
        ),
    ];

    if let Some(scores) = stats.score_summary() {
        items.push(format!(
            "Convergence quality: Average score of {:.2} indicates good semantic relationships",
            scores.mean
        ));
    }

    if !stats.categories.is_empty() {
        items.push(format!(
            "Categorization: {} distinct categories show good knowledge organization",
            stats.categories.len()
        ));
    }

    items.push(format!(
        "Vector quality: {}-dimensional embeddings provide rich semantic representation",
        ctx.collection.vector_size
    ));

    items
}

fn verification_commands(collection: &CollectionConfig) -> Vec<CommandBlock> {
    let base = format!(
        "{}/collections/{}",
        collection.server_url.trim_end_matches('/'),
        collection.name
    );

    vec![
        CommandBlock {
            title: "Collection info:".to_string(),
            lines: vec![format!(r#"curl -s "{}" | python -m json.tool"#, base)],
        },
        CommandBlock {
            title: "Search by similarity (example):".to_string(),
            lines: vec![
                format!(r#"curl -s -X POST "{}/points/search" \"#, base),
                r#"  -H "Content-Type: application/json" \"#.to_string(),
                format!(
                    r#"  -d '{{"vector": [0.1]*{}, "limit": 5, "with_payload": true}}'"#,
                    collection.vector_size
                ),
            ],
        },
        CommandBlock {
            title: "Scroll all points:".to_string(),
            lines: vec![
                format!(r#"curl -s -X POST "{}/points/scroll" \"#, base),
                r#"  -H "Content-Type: application/json" \"#.to_string(),
                r#"  -d '{"limit": 100, "with_payload": true, "with_vector": false}'"#
                    .to_string(),
            ],
        },
    ]
}
