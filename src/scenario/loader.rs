//! Scenario discovery on disk

use std::path::{Path, PathBuf};

use super::error::{Result, ScenarioError};
use super::spec::ScenarioSpec;

const SCENARIO_EXTENSION: &str = "json";

/// Finds scenario files below a file or directory
pub struct ScenarioLoader {
    root: PathBuf,
    recursive: bool,
}

impl ScenarioLoader {
    pub fn new(root: &Path, recursive: bool) -> Result<Self> {
        if !root.exists() {
            return Err(ScenarioError::Io {
                path: root.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "path does not exist"),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
            recursive,
        })
    }

    /// All scenario files, sorted by path
    pub fn collect_all(&self) -> Result<Vec<PathBuf>> {
        if self.root.is_file() {
            return Ok(vec![self.root.clone()]);
        }
        let mut files = Vec::new();
        collect_dir(&self.root, self.recursive, &mut files)?;
        files.sort();
        tracing::info!("Found {} scenario file(s) in {}", files.len(), self.root.display());
        Ok(files)
    }

    /// Scenario files carrying at least one of `tags`
    pub fn collect_by_tags(&self, tags: &[String]) -> Result<Vec<PathBuf>> {
        let mut matching = Vec::new();
        for file in self.collect_all()? {
            if ScenarioSpec::from_file(&file)?.has_any_tag(tags) {
                matching.push(file);
            }
        }
        Ok(matching)
    }
}

fn collect_dir(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) -> Result<()> {
    let io_err = |source| ScenarioError::Io {
        path: dir.to_path_buf(),
        source,
    };
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            if recursive {
                collect_dir(&path, recursive, files)?;
            }
        } else if path.extension().is_some_and(|ext| ext == SCENARIO_EXTENSION) {
            files.push(path);
        }
    }
    Ok(())
}
