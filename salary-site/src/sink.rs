//! Destinations for generated artifacts.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Receives generated files. Paths are relative, `/`-separated, and unique
/// within one run.
pub trait ArtifactSink {
    fn write(
        &mut self,
        path: &str,
        contents: &str,
    ) -> io::Result<()>;
}

/// Writes artifacts below a root directory, creating directories as needed.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactSink for FsSink {
    fn write(
        &mut self,
        path: &str,
        contents: &str,
    ) -> io::Result<()> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, contents)?;
        debug!(path = %target.display(), bytes = contents.len(), "wrote artifact");
        Ok(())
    }
}

/// Keeps artifacts in memory, ordered by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    artifacts: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        path: &str,
    ) -> Option<&str> {
        self.artifacts.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(String::as_str)
    }

    pub fn total_bytes(&self) -> usize {
        self.artifacts.values().map(String::len).sum()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.artifacts
    }
}

impl ArtifactSink for MemorySink {
    fn write(
        &mut self,
        path: &str,
        contents: &str,
    ) -> io::Result<()> {
        self.artifacts.insert(path.to_string(), contents.to_string());
        Ok(())
    }
}
