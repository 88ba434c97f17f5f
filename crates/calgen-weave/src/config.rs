//! Run configuration, built once and passed by reference through every stage.

use std::path::{Path, PathBuf};

/// Token that identifies a marker line.
pub const DEFAULT_SENTINEL: &str = "Impinj_calgen";

/// Generator modules and templates, relative to the project root.
pub const DEFAULT_MODULE_DIR: &str = "ex10_calgen/content_template";

/// Calibration schema, relative to the project root.
pub const DEFAULT_YAML_PATH: &str = "ex10_cal/cal_yaml/cal_info_page_v5.yml";

/// Files regenerated by a full run, relative to the project root.
/// Add a path here to put another file under CalGen.
pub const DEFAULT_WORKLIST: &[&str] = &[
    "ex10_c_dev_kit/board/e710_ref_design/calibration_v5.h",
    "ex10_c_dev_kit/board/e710_ref_design/calibration_v5.c",
    "ex10_c_dev_kit/examples/print_calibration_v5.c",
    "ex10_dev_kit/py2c_interface/py2c_python_cal.py",
];

/// Everything a run needs to know about the project layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalgenConfig {
    pub project_root: PathBuf,
    /// Root of the template search path; its immediate subdirectories are searched too.
    pub module_dir: PathBuf,
    /// Calibration schema file.
    pub yaml_path: PathBuf,
    pub sentinel: String,
    /// Target files, relative to `project_root`.
    pub worklist: Vec<PathBuf>,
    /// Replace files through a temporary file and rename instead of truncating in place.
    pub atomic_write: bool,
    /// Optional upper bound on `address + length` for every entry.
    pub address_space_size: Option<u64>,
}

impl CalgenConfig {
    /// The default layout below `project_root`.
    pub fn for_project_root(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            module_dir: project_root.join(DEFAULT_MODULE_DIR),
            yaml_path: project_root.join(DEFAULT_YAML_PATH),
            sentinel: DEFAULT_SENTINEL.to_string(),
            worklist: DEFAULT_WORKLIST.iter().map(PathBuf::from).collect(),
            atomic_write: true,
            address_space_size: None,
            project_root,
        }
    }

    /// Absolute paths of the worklist entries, in order.
    pub fn worklist_paths(&self) -> Vec<PathBuf> {
        self.worklist
            .iter()
            .map(|rel| self.resolve(rel))
            .collect()
    }

    /// Whether `path` names one of the worklist files.
    pub fn in_worklist(&self, path: &Path) -> bool {
        self.worklist.iter().any(|rel| path.ends_with(rel))
    }

    /// Resolve a path against the project root unless it is already absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}
