//! Core data model: facet selection, generated idea schema, result envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const INDUSTRIES: &[&str] = &[
    "Healthcare",
    "Finance",
    "Education",
    "E-commerce",
    "Entertainment",
    "Transportation",
    "Agriculture",
    "Manufacturing",
    "Real Estate",
    "Social Media",
    "Gaming",
    "Cybersecurity",
    "Artificial Intelligence",
    "Machine Learning",
    "Data Science",
    "Cloud Computing",
    "Blockchain",
    "Cryptocurrency",
    "Fintech",
    "EdTech",
    "HealthTech",
    "AgriTech",
    "Clean Energy",
    "Environmental",
    "Sustainability",
    "Smart Cities",
    "IoT",
    "Robotics",
    "Automation",
    "Telecommunications",
    "Media",
    "Publishing",
    "Retail",
    "Hospitality",
    "Tourism",
    "Sports",
    "Fitness",
    "Wellness",
    "Food & Beverage",
    "Logistics",
    "Supply Chain",
    "Government",
    "Non-profit",
    "Legal",
    "Insurance",
    "Consulting",
    "Marketing",
    "Advertising",
    "Human Resources",
    "Recruitment",
];

pub const PROJECT_TYPES: &[&str] = &["Mobile App", "Web App", "Desktop App", "IoT App"];

pub const DIFFICULTY_LEVELS: &[&str] = &["Beginner", "Intermediate", "Advanced"];

/// The caller's chosen industry / project type / difficulty.
///
/// Values are carried verbatim; nothing here rejects strings outside the
/// known enumerations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetSelection {
    pub industry: String,
    pub project_type: String,
    pub difficulty: String,
}

impl FacetSelection {
    pub fn new(
        industry: impl Into<String>,
        project_type: impl Into<String>,
        difficulty: impl Into<String>,
    ) -> Self {
        Self {
            industry: industry.into(),
            project_type: project_type.into(),
            difficulty: difficulty.into(),
        }
    }

    /// True when every facet is a member of its known enumeration.
    pub fn is_known(&self) -> bool {
        INDUSTRIES.contains(&self.industry.as_str())
            && PROJECT_TYPES.contains(&self.project_type.as_str())
            && DIFFICULTY_LEVELS.contains(&self.difficulty.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyLevel::Beginner => "Beginner",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beginner" => Ok(DifficultyLevel::Beginner),
            "Intermediate" => Ok(DifficultyLevel::Intermediate),
            "Advanced" => Ok(DifficultyLevel::Advanced),
            other => Err(format!("Unknown difficulty level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarProject {
    pub name: String,
    pub description: String,
    pub url: String,
}

/// Idea payload as produced by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedIdea {
    pub title: String,
    pub description: String,
    pub technology_stack: Vec<String>,
    pub similar_projects: Vec<SimilarProject>,
    pub learning_outcomes: Vec<String>,
    pub difficulty_level: DifficultyLevel,
    pub estimated_hours: String,
    pub prerequisites: Vec<String>,
}

/// Number of similar projects the prompt asks for.
pub const EXPECTED_SIMILAR_PROJECTS: usize = 5;

/// Caller-visible result: the model's idea plus the facets of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapstoneIdea {
    #[serde(flatten)]
    pub idea: GeneratedIdea,
    pub industry: String,
    pub project_type: String,
    pub difficulty: String,
}

impl CapstoneIdea {
    /// Attach the request's facets. Request values always win.
    pub fn assemble(idea: GeneratedIdea, request: &FacetSelection) -> Self {
        Self {
            idea,
            industry: request.industry.clone(),
            project_type: request.project_type.clone(),
            difficulty: request.difficulty.clone(),
        }
    }
}

/// Uniform success / failure structure returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CapstoneIdea>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub reset_time: Option<DateTime<Utc>>,
}

impl ResultEnvelope {
    pub fn success(data: CapstoneIdea) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            reset_time: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            reset_time: None,
        }
    }

    pub fn rate_limited(error: impl Into<String>, reset_time: DateTime<Utc>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            reset_time: Some(reset_time),
        }
    }
}
