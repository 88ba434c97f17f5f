//! Drives a CalGen run: load the schema once, then gate, scan, render and
//! rewrite each target file in worklist order.
//!
//! The first fatal error aborts the run. Files already rewritten by then stay
//! rewritten; the file being processed is only replaced after every one of
//! its blocks rendered successfully.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::config::CalgenConfig;
use crate::error::WeaveError;
use crate::registry::{GeneratorRegistry, SchemaSource};
use crate::resolver::ModuleResolver;
use crate::scanner::scan;
use crate::weaver::{assemble, write_file};

/// Receives per-file progress. All methods default to doing nothing.
pub trait RunObserver {
    /// A file passed the gate and is about to be regenerated.
    fn on_autogenerating(&mut self, _path: &Path) {}
    /// A worklist file has no opening marker.
    fn on_ignored(&mut self, _path: &Path) {}
    /// A worklist file does not exist.
    fn on_missing(&mut self, _path: &Path) {}
}

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl RunObserver for SilentObserver {}

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Rewritten with `blocks` regenerated blocks.
    Generated { blocks: usize },
    /// Passed the gate but a block was never closed; left as is.
    Unclosed,
    /// Worklist file without an opening marker.
    Ignored,
    /// Path is not on the worklist.
    NotInWorklist,
    Symlink,
    Missing,
}

/// Summary of a run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub files: Vec<(PathBuf, FileOutcome)>,
}

impl RunReport {
    pub fn generated(&self) -> impl Iterator<Item = &Path> {
        self.with(|o| matches!(o, FileOutcome::Generated { .. }))
    }

    pub fn ignored(&self) -> impl Iterator<Item = &Path> {
        self.with(|o| matches!(o, FileOutcome::Ignored))
    }

    pub fn missing(&self) -> impl Iterator<Item = &Path> {
        self.with(|o| matches!(o, FileOutcome::Missing))
    }

    /// Total number of blocks regenerated across all files.
    pub fn block_count(&self) -> usize {
        self.files
            .iter()
            .map(|(_, outcome)| match outcome {
                FileOutcome::Generated { blocks } => *blocks,
                _ => 0,
            })
            .sum()
    }

    fn with(&self, pred: fn(&FileOutcome) -> bool) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(move |(_, outcome)| pred(outcome))
            .map(|(path, _)| path.as_path())
    }
}

enum Gate {
    Process(String),
    Skip(FileOutcome),
}

/// Runs CalGen over a project.
#[derive(Debug)]
pub struct Orchestrator {
    config: CalgenConfig,
    schema: SchemaSource,
    resolver: ModuleResolver,
    marker: Regex,
}

impl Orchestrator {
    /// Load and validate the schema and prepare the bundled generators.
    pub fn new(config: CalgenConfig) -> Result<Self, WeaveError> {
        Self::with_registry(config, GeneratorRegistry::with_builtins())
    }

    pub fn with_registry(
        config: CalgenConfig,
        registry: GeneratorRegistry,
    ) -> Result<Self, WeaveError> {
        let marker = marker_regex(&config.sentinel)?;
        let address_map =
            calgen_schema::load_validated(&config.yaml_path, config.address_space_size)?;
        let schema = SchemaSource::new(config.yaml_path.clone(), address_map);
        let resolver = ModuleResolver::new(&config.module_dir, registry)?;

        tracing::info!(
            root = %config.project_root.display(),
            entries = schema.address_map.parameters().len(),
            "CalGen ready"
        );

        Ok(Self {
            config,
            schema,
            resolver,
            marker,
        })
    }

    pub fn config(&self) -> &CalgenConfig {
        &self.config
    }

    pub fn schema(&self) -> &SchemaSource {
        &self.schema
    }

    pub fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }

    /// Process every worklist file in order.
    pub fn run(&self, observer: &mut dyn RunObserver) -> Result<RunReport, WeaveError> {
        let mut report = RunReport::default();
        for path in self.config.worklist_paths() {
            let outcome = self.process_file(&path, observer)?;
            report.files.push((path, outcome));
        }
        tracing::info!(
            files = report.generated().count(),
            blocks = report.block_count(),
            "CalGen run complete"
        );
        Ok(report)
    }

    /// Whether `path` would be regenerated.
    pub fn should_process(&self, path: &Path) -> Result<bool, WeaveError> {
        Ok(matches!(self.gate(path, &mut SilentObserver)?, Gate::Process(_)))
    }

    /// Regenerate a single file, subject to the same gate as a full run.
    pub fn process_file(
        &self,
        path: &Path,
        observer: &mut dyn RunObserver,
    ) -> Result<FileOutcome, WeaveError> {
        let text = match self.gate(path, observer)? {
            Gate::Process(text) => text,
            Gate::Skip(outcome) => return Ok(outcome),
        };

        observer.on_autogenerating(path);
        let scanned = scan(path, &text, &self.config.sentinel)?;
        if scanned.is_empty() {
            return Ok(FileOutcome::Unclosed);
        }

        let mut contents = Vec::with_capacity(scanned.blocks.len());
        for block in &scanned.blocks {
            tracing::debug!(block = %block, "Rendering block");
            contents.push(self.resolver.render(&block.generator_tag, &self.schema)?);
        }

        let woven = assemble(&scanned.spans, &contents);
        write_file(path, &woven, self.config.atomic_write)?;
        tracing::debug!(
            path = %path.display(),
            blocks = scanned.blocks.len(),
            "File regenerated"
        );
        Ok(FileOutcome::Generated {
            blocks: scanned.blocks.len(),
        })
    }

    fn gate(&self, path: &Path, observer: &mut dyn RunObserver) -> Result<Gate, WeaveError> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "No such file or directory");
            observer.on_missing(path);
            return Ok(Gate::Skip(FileOutcome::Missing));
        }
        if path.is_symlink() {
            tracing::debug!(path = %path.display(), "Skipping symlink");
            return Ok(Gate::Skip(FileOutcome::Symlink));
        }
        if !self.config.in_worklist(path) {
            tracing::debug!(path = %path.display(), "Not on the worklist");
            return Ok(Gate::Skip(FileOutcome::NotInWorklist));
        }

        let text = fs::read_to_string(path).map_err(|e| WeaveError::io(path, e))?;
        if !self.marker.is_match(&text) {
            observer.on_ignored(path);
            return Ok(Gate::Skip(FileOutcome::Ignored));
        }
        Ok(Gate::Process(text))
    }
}

/// `<sentinel> | <anything> {` on a single line.
fn marker_regex(sentinel: &str) -> Result<Regex, WeaveError> {
    Regex::new(&format!(r"{} \| .* \{{", regex::escape(sentinel))).map_err(|e| {
        WeaveError::Sentinel {
            sentinel: sentinel.to_string(),
            source: e,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_regex() {
        let re = marker_regex("Impinj_calgen").unwrap();
        assert!(re.is_match("// Impinj_calgen | gen_calibration_v5_h {\n"));
        assert!(!re.is_match("// Impinj_calgen | gen_calibration_v5_h\n{\n"));
        assert!(!re.is_match("// Impinj_calgen gen {\n"));

        let dotted = marker_regex("cal.gen").unwrap();
        assert!(!dotted.is_match("calxgen | gen {"));
        assert!(dotted.is_match("# cal.gen | gen {"));
    }

    #[test]
    fn test_report_queries() {
        let report = RunReport {
            files: vec![
                (PathBuf::from("a.h"), FileOutcome::Generated { blocks: 2 }),
                (PathBuf::from("b.c"), FileOutcome::Ignored),
                (PathBuf::from("c.c"), FileOutcome::Missing),
                (PathBuf::from("d.py"), FileOutcome::Generated { blocks: 1 }),
            ],
        };
        assert_eq!(report.block_count(), 3);
        assert_eq!(
            report.generated().collect::<Vec<_>>(),
            vec![Path::new("a.h"), Path::new("d.py")]
        );
        assert_eq!(report.ignored().collect::<Vec<_>>(), vec![Path::new("b.c")]);
        assert_eq!(report.missing().count(), 1);
    }
}
