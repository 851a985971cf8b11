//! Configuration loading and management for the GPA engine.
//!
//! This module loads the grading policy (excluded courses, semester bucket
//! labels, class-change allowance) from YAML files. A built-in policy with
//! the same rules is available through [`GradingPolicy::default`].
//!
//! # Example
//!
//! ```no_run
//! use gpa_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded rules for: {}", config.policy().metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_ADVANCED_STUDY_LABEL, DEFAULT_CLASS_CHANGE_LIMIT, DEFAULT_EXCLUDED_COURSE_CODES,
    DEFAULT_EXCLUDED_NAME_KEYWORDS, DEFAULT_OTHER_LABEL, ExclusionConfig, GradingPolicy,
    InstitutionMetadata, SemesterConfig,
};
