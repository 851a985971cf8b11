//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a grading
//! policy from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{ExclusionConfig, GradingPolicy, InstitutionMetadata, SemesterConfig};

/// Loads and provides access to the grading policy.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── institution.yaml  # Institution metadata
/// ├── exclusions.yaml   # Excluded course codes and name keywords
/// └── semesters.yaml    # Bucket labels and class-change allowance
/// ```
///
/// # Example
///
/// ```no_run
/// use gpa_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Loaded rules for: {}", loader.policy().metadata().name);
/// # Ok::<(), gpa_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    policy: GradingPolicy,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or misses a field (`ConfigParseError`)
    /// - The resulting policy is unusable (`InvalidPolicy`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<InstitutionMetadata>(&path.join("institution.yaml"))?;
        let exclusions = Self::load_yaml::<ExclusionConfig>(&path.join("exclusions.yaml"))?;
        let semesters = Self::load_yaml::<SemesterConfig>(&path.join("semesters.yaml"))?;

        debug!(
            institution = %metadata.code,
            course_codes = exclusions.course_codes.len(),
            name_keywords = exclusions.name_keywords.len(),
            "Loaded grading configuration"
        );

        let policy = GradingPolicy::new(metadata, exclusions, semesters)?;
        Ok(Self { policy })
    }

    /// Wraps an already-built policy.
    pub fn from_policy(policy: GradingPolicy) -> Self {
        Self { policy }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded grading policy.
    pub fn policy(&self) -> &GradingPolicy {
        &self.policy
    }
}
