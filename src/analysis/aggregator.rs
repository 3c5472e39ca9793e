//! Point aggregation and statistics.
//!
//! This module reduces the points of a collection export into
//! [`CollectionStats`] in a single pass. Every reduction is order
//! independent, so the result does not depend on batch or point order.

use crate::analysis::stats::{self, percentage};
use crate::models::{
    BucketSummary, CompletenessEntry, DistributionEntry, LogicalField, NumericSummary,
    PayloadValue, PointRecord,
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Number of points carrying each tracked field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Completeness {
    pub with_file: usize,
    pub with_categories: usize,
    pub with_intelligence_type: usize,
    pub with_chains: usize,
}

/// Aggregate state accumulated over all points.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionStats {
    pub total_points: usize,
    pub files: BTreeSet<String>,
    pub payload_fields: BTreeSet<String>,
    pub categories: BTreeMap<String, usize>,
    pub intelligence_types: BTreeMap<String, usize>,
    pub enrichment_levels: BTreeMap<String, usize>,
    /// Participant count of every chain seen.
    pub chain_sizes: Vec<usize>,
    /// Convergence score of every chain seen.
    pub scores: Vec<f64>,
    pub completeness: Completeness,
}

impl CollectionStats {
    /// Aggregate a full set of points.
    pub fn from_points(points: &[PointRecord]) -> Self {
        let mut stats = Self::default();
        for point in points {
            stats.ingest(point);
        }
        stats
    }

    /// Fold a single point into the aggregate.
    pub fn ingest(&mut self, point: &PointRecord) {
        let payload = &point.payload;
        self.total_points += 1;

        for key in payload.keys() {
            self.payload_fields.insert(key.to_string());
        }

        if let Some(file) = payload.field(LogicalField::SourceFile) {
            self.files.insert(file.label());
            self.completeness.with_file += 1;
        }

        if let Some(categories) = payload.field(LogicalField::Categories) {
            // A point counts once per distinct category.
            let labels: BTreeSet<String> = match categories {
                PayloadValue::List(items) => items.iter().map(PayloadValue::label).collect(),
                single => BTreeSet::from([single.label()]),
            };
            for label in labels {
                *self.categories.entry(label).or_default() += 1;
            }
            self.completeness.with_categories += 1;
        }

        if let Some(kind) = payload.field(LogicalField::IntelligenceType) {
            *self.intelligence_types.entry(kind.label()).or_default() += 1;
            self.completeness.with_intelligence_type += 1;
        }

        if payload.has(LogicalField::ConvergenceChains) {
            self.completeness.with_chains += 1;
        }
        for chain in point.convergence_chains() {
            if let Some(participants) = chain.participants() {
                self.chain_sizes.push(participants.len());
            }
            if let Some(score) = chain.score() {
                self.scores.push(score);
            }
        }

        if let Some(level) = payload.field(LogicalField::EnrichmentLevel) {
            *self.enrichment_levels.entry(level.label()).or_default() += 1;
        }
    }

    pub fn category_distribution(&self) -> Vec<DistributionEntry> {
        distribution(&self.categories, self.total_points)
    }

    pub fn intelligence_distribution(&self) -> Vec<DistributionEntry> {
        distribution(&self.intelligence_types, self.total_points)
    }

    pub fn enrichment_distribution(&self) -> Vec<DistributionEntry> {
        distribution(&self.enrichment_levels, self.total_points)
    }

    /// Summary of chain participant counts, `None` when no chain had participants.
    pub fn chain_summary(&self) -> Option<NumericSummary> {
        let sizes: Vec<f64> = self.chain_sizes.iter().map(|s| *s as f64).collect();
        stats::summarize(&sizes)
    }

    pub fn chain_size_distribution(&self) -> Vec<(usize, usize)> {
        stats::size_distribution(&self.chain_sizes)
    }

    pub fn score_summary(&self) -> Option<NumericSummary> {
        stats::summarize(&self.scores)
    }

    pub fn score_buckets(&self) -> Vec<BucketSummary> {
        stats::bucket_scores(&self.scores)
    }

    pub fn completeness_entries(&self) -> Vec<CompletenessEntry> {
        let total = self.total_points;
        let entry = |label: &str, count: usize| CompletenessEntry {
            label: label.to_string(),
            count,
            total,
            percentage: percentage(count, total),
        };

        vec![
            entry("file information", self.completeness.with_file),
            entry("categories", self.completeness.with_categories),
            entry("intelligence type", self.completeness.with_intelligence_type),
            entry("convergence chains", self.completeness.with_chains),
        ]
    }
}

/// Counts sorted by count (highest first), ties broken by label.
pub fn distribution(counts: &BTreeMap<String, usize>, total: usize) -> Vec<DistributionEntry> {
    let mut entries: Vec<DistributionEntry> = counts
        .iter()
        .map(|(label, count)| DistributionEntry {
            label: label.clone(),
            count: *count,
            percentage: percentage(*count, total),
        })
        .collect();

    // BTreeMap iteration is already label-ordered; a stable sort keeps it for ties.
    entries.sort_by_key(|e| std::cmp::Reverse(e.count));
    entries
}
