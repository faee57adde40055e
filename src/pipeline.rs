//! Generation pipeline
//!
//! Runs one snapshot through validation, 2D and 3D generation, and export:
//! three cut profiles as DXF and four peripherals as STL.
//! A snapshot with validation errors is refused before anything is written.

use anyhow::{bail, Context};
use harnessgen_camtools::{
    generate_3d, generate_profiles, validate, write_all, write_profiles, ValidationReport,
    VectorOptions,
};
use harnessgen_core::ParameterSet;
use harnessgen_settings::{AppSettings, Autosave, AutosaveRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Files produced by one run
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub report: ValidationReport,
    /// Tile, foam piece and magnet ring, in that order
    pub profile_paths: Vec<PathBuf>,
    pub solid_paths: Vec<PathBuf>,
    pub autosave: Option<AutosaveRecord>,
}

impl GenerationOutput {
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.profile_paths
            .iter()
            .chain(&self.solid_paths)
            .map(PathBuf::as_path)
    }
}

/// Validation, generation and export of one snapshot into a directory
#[derive(Debug, Clone)]
pub struct GenerationPipeline {
    output_dir: PathBuf,
    vector_options: VectorOptions,
    autosave: Option<Autosave>,
}

impl GenerationPipeline {
    /// Pipeline writing into `output_dir` with default options and no autosave
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            vector_options: VectorOptions::default(),
            autosave: None,
        }
    }

    /// Pipeline configured from the application settings
    ///
    /// Autosave copies go into the output directory.
    pub fn from_settings(settings: &AppSettings) -> Self {
        let pipeline = Self::new(&settings.output_directory).with_vector_options(VectorOptions {
            layer_per_role: settings.layer_per_role,
        });
        if settings.write_autosave {
            let autosave =
                Autosave::new(&settings.output_directory).with_keep(settings.autosave_keep);
            pipeline.with_autosave(autosave)
        } else {
            pipeline
        }
    }

    pub fn with_vector_options(mut self, options: VectorOptions) -> Self {
        self.vector_options = options;
        self
    }

    pub fn with_autosave(mut self, autosave: Autosave) -> Self {
        self.autosave = Some(autosave);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Validate, generate and write every output file
    pub fn run(&self, params: &ParameterSet) -> anyhow::Result<GenerationOutput> {
        let report = validate(params);
        for finding in report.warnings() {
            warn!("{}", finding);
        }
        if report.has_errors() {
            let errors: Vec<String> = report.errors().map(ToString::to_string).collect();
            bail!(
                "configuration has {} validation error(s):\n{}",
                errors.len(),
                errors.join("\n")
            );
        }

        let profiles = generate_profiles(params).context("failed to generate cut profiles")?;
        let solids = generate_3d(params).context("failed to generate peripherals")?;

        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("failed to create output directory {}", self.output_dir.display())
        })?;
        let profile_paths = write_profiles(&profiles, &self.output_dir, &self.vector_options)?;
        let solid_paths = write_all(&solids, &self.output_dir)?;

        let autosave = match &self.autosave {
            Some(autosave) => Some(
                autosave
                    .save(params, true)
                    .context("failed to autosave configuration")?,
            ),
            None => None,
        };

        info!(
            "Generation complete: {} files in {}",
            profile_paths.len() + solid_paths.len(),
            self.output_dir.display()
        );
        Ok(GenerationOutput {
            report,
            profile_paths,
            solid_paths,
            autosave,
        })
    }
}
