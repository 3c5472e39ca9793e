//! Batch export loading.
//!
//! Collection exports are split into sequentially numbered batch files
//! (`qdrant_batch_1.json`, `qdrant_batch_2.json`, ...), each holding one
//! scroll page. This module locates those files and merges their points.

use crate::models::{BatchDocument, PointRecord};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Errors raised while loading batch files. All of them abort the report.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read batch file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse batch file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no batch files matching '{prefix}_<n>.json' found in {}", .dir.display())]
    NoBatches { dir: PathBuf, prefix: String },
}

/// How many batch files make up the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchCount {
    /// Exactly `1..=n`; any missing file is an error.
    Fixed(usize),
    /// Whatever `<prefix>_<n>.json` files exist in the directory.
    Discover,
}

/// Location and naming of the batch files.
#[derive(Debug, Clone)]
pub struct BatchSource {
    pub dir: PathBuf,
    pub prefix: String,
    pub count: BatchCount,
}

impl From<&crate::config::InputConfig> for BatchSource {
    fn from(config: &crate::config::InputConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            prefix: config.prefix.clone(),
            count: if config.discover {
                BatchCount::Discover
            } else {
                BatchCount::Fixed(config.batches)
            },
        }
    }
}

impl BatchSource {
    /// Paths of the batch files, in batch order.
    pub fn paths(&self) -> Result<Vec<PathBuf>, LoadError> {
        match self.count {
            BatchCount::Fixed(n) => Ok((1..=n).map(|i| self.batch_path(i)).collect()),
            BatchCount::Discover => self.discover(),
        }
    }

    fn batch_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}_{}.json", self.prefix, index))
    }

    /// Batch number encoded in a file name, if it follows the naming scheme.
    fn batch_index(&self, file_name: &str) -> Option<usize> {
        file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('_')?
            .strip_suffix(".json")?
            .parse()
            .ok()
    }

    fn discover(&self) -> Result<Vec<PathBuf>, LoadError> {
        let mut found: Vec<(usize, PathBuf)> = Vec::new();

        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| LoadError::Io {
                path: self.dir.clone(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if let Some(index) = self.batch_index(&name) {
                debug!("Discovered batch {}: {}", index, entry.path().display());
                found.push((index, entry.path().to_path_buf()));
            }
        }

        if found.is_empty() {
            return Err(LoadError::NoBatches {
                dir: self.dir.clone(),
                prefix: self.prefix.clone(),
            });
        }

        found.sort_by_key(|(index, _)| *index);
        Ok(found.into_iter().map(|(_, path)| path).collect())
    }
}

/// Read one batch file and return its points.
pub fn load_batch(path: &Path) -> Result<Vec<PointRecord>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let document: BatchDocument =
        serde_json::from_str(&content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(document.result.points)
}

/// Load every batch and concatenate the points in batch order.
pub fn load_points(
    source: &BatchSource,
    show_progress: bool,
) -> Result<Vec<PointRecord>, LoadError> {
    let paths = source.paths()?;
    info!("Loading {} batch file(s) from {}", paths.len(), source.dir.display());

    let progress = if show_progress {
        let pb = ProgressBar::new(paths.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    } else {
        None
    };

    let mut points = Vec::new();
    for path in &paths {
        if let Some(ref pb) = progress {
            pb.set_message(path.display().to_string());
        }

        let batch = load_batch(path)?;
        debug!("{}: {} points", path.display(), batch.len());
        points.extend(batch);

        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    info!("Loaded {} points", points.len());
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PointId;
    use tempfile::TempDir;

    fn write_batch(dir: &Path, name: &str, ids: &[u64]) {
        let points: Vec<String> = ids
            .iter()
            .map(|id| format!(r#"{{"id": {}, "payload": {{"file": "f{}.md"}}}}"#, id, id))
            .collect();
        let body = format!(r#"{{"result": {{"points": [{}]}}}}"#, points.join(","));
        std::fs::write(dir.join(name), body).unwrap();
    }

    fn source(dir: &Path, count: BatchCount) -> BatchSource {
        BatchSource {
            dir: dir.to_path_buf(),
            prefix: "qdrant_batch".to_string(),
            count,
        }
    }

    #[test]
    fn test_fixed_paths() {
        let src = source(Path::new("exports"), BatchCount::Fixed(4));
        let paths = src.paths().unwrap();
        assert_eq!(paths.len(), 4);
        assert_eq!(paths[0], Path::new("exports").join("qdrant_batch_1.json"));
        assert_eq!(paths[3], Path::new("exports").join("qdrant_batch_4.json"));
    }

    #[test]
    fn test_load_points_in_batch_order() {
        let temp = TempDir::new().unwrap();
        write_batch(temp.path(), "qdrant_batch_1.json", &[1, 2]);
        write_batch(temp.path(), "qdrant_batch_2.json", &[3]);

        let points = load_points(&source(temp.path(), BatchCount::Fixed(2)), false).unwrap();
        let ids: Vec<PointId> = points.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![PointId::Num(1), PointId::Num(2), PointId::Num(3)]);
    }

    #[test]
    fn test_missing_batch_is_fatal() {
        let temp = TempDir::new().unwrap();
        write_batch(temp.path(), "qdrant_batch_1.json", &[1]);

        let err = load_points(&source(temp.path(), BatchCount::Fixed(2)), false).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("qdrant_batch_2.json"));
    }

    #[test]
    fn test_malformed_batch_is_fatal() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("qdrant_batch_1.json"), r#"{"result": {}}"#).unwrap();

        let err = load_points(&source(temp.path(), BatchCount::Fixed(1)), false).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_discover_orders_numerically() {
        let temp = TempDir::new().unwrap();
        write_batch(temp.path(), "qdrant_batch_10.json", &[10]);
        write_batch(temp.path(), "qdrant_batch_2.json", &[2]);
        write_batch(temp.path(), "other_batch_1.json", &[99]);
        std::fs::write(temp.path().join("qdrant_batch_x.json"), "{}").unwrap();

        let paths = source(temp.path(), BatchCount::Discover).paths().unwrap();
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["qdrant_batch_2.json", "qdrant_batch_10.json"]);
    }

    #[test]
    fn test_discover_nothing() {
        let temp = TempDir::new().unwrap();
        let err = source(temp.path(), BatchCount::Discover).paths().unwrap_err();
        assert!(matches!(err, LoadError::NoBatches { .. }));
    }
}
