//! Case discovery and fixture resolution strategies
//!
//! Two corpus layouts are supported:
//!
//! - **Flat**: every `<name>.va` in one source directory is a case; its golden output lives in a parallel
//!   directory as `<name>.txt`.
//! - **Case directories**: every subdirectory of the root is a case holding `<name>.va`, `output.txt` and
//!   optionally `input.txt`.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::HarnessError;
use super::fixture::{ExecutionMode, Resolution, TestCase, existing};
use super::interfaces::CaseDiscovery;

/// Source file extension of example programs.
pub const SOURCE_EXTENSION: &str = "va";

// ============================================================================
// Flat layout
// ============================================================================

/// One directory of sources and a parallel directory of golden outputs.
#[derive(Debug, Clone)]
pub struct FlatLayout {
    pub source_dir: PathBuf,
    pub expected_dir: PathBuf,
    /// Directory of `<name>.txt` input fixtures, if the corpus has any.
    pub input_dir: Option<PathBuf>,
    pub source_extension: String,
    pub expected_extension: String,
}

impl Default for FlatLayout {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("test"),
            expected_dir: PathBuf::from("test_output"),
            input_dir: None,
            source_extension: SOURCE_EXTENSION.to_string(),
            expected_extension: "txt".to_string(),
        }
    }
}

impl CaseDiscovery for FlatLayout {
    fn root(&self) -> &Path {
        &self.source_dir
    }

    fn discover(&self) -> Result<Vec<String>, HarnessError> {
        let extension = OsStr::new(&self.source_extension);
        let mut names = Vec::new();
        for path in entries(&self.source_dir)? {
            if path.extension() == Some(extension) {
                names.push(case_name(&path, path.file_stem())?);
            }
        }
        names.sort();
        Ok(names)
    }

    fn resolve(&self, name: &str, mode: ExecutionMode) -> Result<Resolution, HarnessError> {
        let expected = self.expected_dir.join(format!("{}.{}", name, self.expected_extension));
        if !expected.exists() {
            tracing::debug!(case = name, expected = %expected.display(), "no golden output");
            return Ok(Resolution::Skipped);
        }

        let source = self.source_dir.join(format!("{}.{}", name, self.source_extension));
        let input = self
            .input_dir
            .as_ref()
            .and_then(|dir| existing(dir.join(format!("{}.txt", name))));

        Ok(Resolution::Runnable(TestCase::new(name, source, expected, input, mode)))
    }
}

// ============================================================================
// Case-directory layout
// ============================================================================

/// One subdirectory per case, holding all of that case's files.
#[derive(Debug, Clone)]
pub struct CaseDirLayout {
    pub root: PathBuf,
    pub source_extension: String,
    pub expected_file: String,
    pub input_file: String,
}

impl Default for CaseDirLayout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("examples"),
            source_extension: SOURCE_EXTENSION.to_string(),
            expected_file: "output.txt".to_string(),
            input_file: "input.txt".to_string(),
        }
    }
}

impl CaseDiscovery for CaseDirLayout {
    fn root(&self) -> &Path {
        &self.root
    }

    fn discover(&self) -> Result<Vec<String>, HarnessError> {
        let mut names = Vec::new();
        for path in entries(&self.root)? {
            if path.is_dir() {
                names.push(case_name(&path, path.file_name())?);
            }
        }
        names.sort();
        Ok(names)
    }

    fn resolve(&self, name: &str, mode: ExecutionMode) -> Result<Resolution, HarnessError> {
        let dir = self.root.join(name);
        let expected = dir.join(&self.expected_file);
        if !expected.exists() {
            tracing::debug!(case = name, expected = %expected.display(), "no golden output");
            return Ok(Resolution::Skipped);
        }

        let source = dir.join(format!("{}.{}", name, self.source_extension));
        let input = existing(dir.join(&self.input_file));

        Ok(Resolution::Runnable(TestCase::new(name, source, expected, input, mode)))
    }
}

// ============================================================================
// Closed set of layouts
// ============================================================================

/// The corpus layouts the harness knows about.
#[derive(Debug, Clone)]
pub enum Layout {
    Flat(FlatLayout),
    CaseDirs(CaseDirLayout),
}

impl CaseDiscovery for Layout {
    fn root(&self) -> &Path {
        match self {
            Layout::Flat(layout) => layout.root(),
            Layout::CaseDirs(layout) => layout.root(),
        }
    }

    fn discover(&self) -> Result<Vec<String>, HarnessError> {
        match self {
            Layout::Flat(layout) => layout.discover(),
            Layout::CaseDirs(layout) => layout.discover(),
        }
    }

    fn resolve(&self, name: &str, mode: ExecutionMode) -> Result<Resolution, HarnessError> {
        match self {
            Layout::Flat(layout) => layout.resolve(name, mode),
            Layout::CaseDirs(layout) => layout.resolve(name, mode),
        }
    }
}

/// List the path of every entry of `dir`.
///
/// Any read failure, including a single bad entry, is fatal.
fn entries(dir: &Path) -> Result<Vec<PathBuf>, HarnessError> {
    let discovery_error = |source| HarnessError::Discovery {
        root: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(discovery_error)? {
        paths.push(entry.map_err(discovery_error)?.path());
    }
    Ok(paths)
}

/// Case name for an entry that is known to be a case. Only such entries must be valid Unicode.
fn case_name(path: &Path, name: Option<&OsStr>) -> Result<String, HarnessError> {
    name.and_then(OsStr::to_str)
        .map(str::to_string)
        .ok_or_else(|| HarnessError::InvalidName { path: path.to_path_buf() })
}
