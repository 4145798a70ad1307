use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkExperience {
    pub company: String,
    pub role: String,
    pub location: String,
    pub dates: String,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TechnicalProject {
    pub title: String,
    pub tech_stack: Vec<String>,
    pub highlights: Vec<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub dates: String,
    pub gpa: String,
    pub honors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HonorAward {
    pub award: String,
    pub project: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Skills {
    pub languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub cloud_tools: Vec<String>,
}

/// The candidate's master data. Every generated artifact draws only from this.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MasterProfile {
    pub contact: Contact,
    pub education: Vec<Education>,
    pub work_experience: Vec<WorkExperience>,
    pub technical_projects: Vec<TechnicalProject>,
    pub honors_and_awards: Vec<HonorAward>,
    pub skills: Skills,
}

impl MasterProfile {
    /// Reads and validates a profile JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile at {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Profile at {} does not match the expected schema", path.display()))
    }

    /// The profile as the JSON record handed to the pipeline.
    pub fn to_record(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).context("Failed to serialize master profile")
    }
}
