//! Worklist and single-file regeneration.

use std::path::Path;

use anyhow::Context;
use calgen_weave::{CalgenConfig, FileOutcome, Orchestrator, RunObserver};

use crate::output;

/// Printed after a full worklist run.
pub(crate) const COMPLETION_BANNER: &str =
    "---------------------CALGEN COMPLETED---------------------";

/// Prints per-file progress to stdout.
#[derive(Debug, Default)]
struct ConsoleObserver;

impl RunObserver for ConsoleObserver {
    fn on_autogenerating(&mut self, path: &Path) {
        output::plain(format!("Autogenerating {}", path.display()));
    }

    fn on_ignored(&mut self, path: &Path) {
        output::plain(format!("Ignoring {}", path.display()));
    }

    fn on_missing(&mut self, path: &Path) {
        output::warning(format!("No such file or directory: {}", path.display()));
        output::hint(
            "Check if the project root directory is set correctly. \
             See 'calgen-ctl --help' for more help.",
        );
    }
}

fn prepare(config: &CalgenConfig) -> anyhow::Result<Orchestrator> {
    Orchestrator::new(config.clone()).with_context(|| {
        format!(
            "failed to prepare CalGen for {}",
            config.project_root.display()
        )
    })
}

pub(crate) fn handle_generate_all(config: &CalgenConfig) -> anyhow::Result<()> {
    let orchestrator = prepare(config)?;
    let report = orchestrator.run(&mut ConsoleObserver)?;

    tracing::info!(
        generated = report.generated().count(),
        ignored = report.ignored().count(),
        missing = report.missing().count(),
        blocks = report.block_count(),
        "Worklist processed"
    );
    output::plain(COMPLETION_BANNER);
    Ok(())
}

pub(crate) fn handle_generate_file(config: &CalgenConfig, path: &Path) -> anyhow::Result<()> {
    let path = std::path::absolute(path)
        .with_context(|| format!("cannot resolve {}", path.display()))?;
    let orchestrator = prepare(config)?;

    match orchestrator.process_file(&path, &mut ConsoleObserver)? {
        FileOutcome::Generated { blocks } => {
            output::success(format!("Regenerated {blocks} block(s)"));
        }
        FileOutcome::Unclosed => {
            output::warning(format!(
                "{} has a CalGen block without an end marker; file left unchanged",
                path.display()
            ));
        }
        FileOutcome::NotInWorklist => {
            output::warning(format!("{} is not on the CalGen worklist", path.display()));
        }
        FileOutcome::Symlink => {
            output::dim(format!("Skipping symlink {}", path.display()));
        }
        FileOutcome::Ignored | FileOutcome::Missing => {}
    }
    Ok(())
}
