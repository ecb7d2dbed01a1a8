use std::collections::HashSet;

use crate::interviews::TECH_STACK_KEYWORDS;
use crate::offer::Offer;

pub const MIN_QUERY_LEN: usize = 3;
pub const MAX_SUGGESTIONS: usize = 8;

pub const EXPERIENCE_LEVELS: &[&str] = &["Entry (0-1)", "Mid (2-6)", "Senior (7-10)", "Senior + (11+)"];

/// Which column an autosuggest box draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuggestField {
    Company,
    Location,
    Role,
    InterviewCompany,
    InterviewRole,
    ExperienceLevel,
    TechStack,
}

impl SuggestField {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "company" => Some(Self::Company),
            "location" => Some(Self::Location),
            "role" => Some(Self::Role),
            "interviewcompany" => Some(Self::InterviewCompany),
            "interviewrole" => Some(Self::InterviewRole),
            "experience" | "yoe" => Some(Self::ExperienceLevel),
            "tech" | "techstack" => Some(Self::TechStack),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Location => "location",
            Self::Role => "role",
            Self::InterviewCompany => "interview-company",
            Self::InterviewRole => "interview-role",
            Self::ExperienceLevel => "experience",
            Self::TechStack => "tech",
        }
    }

    /// Distinct values for this field, in first-seen order.
    pub fn corpus(&self, master: &[Offer]) -> Vec<String> {
        let values: Vec<&str> = match self {
            Self::Company => master.iter().map(|o| o.company.as_str()).collect(),
            Self::Location => master.iter().map(|o| o.location.as_str()).collect(),
            Self::Role => master.iter().map(|o| o.mapped_role.as_str()).collect(),
            Self::InterviewCompany => master
                .iter()
                .filter(|o| o.has_interview_experience())
                .map(|o| o.company.as_str())
                .collect(),
            Self::InterviewRole => master
                .iter()
                .filter(|o| o.has_interview_experience())
                .map(|o| o.mapped_role.as_str())
                .collect(),
            Self::ExperienceLevel => EXPERIENCE_LEVELS.to_vec(),
            Self::TechStack => TECH_STACK_KEYWORDS.iter().map(|(tag, _)| *tag).collect(),
        };
        let mut seen: HashSet<&str> = HashSet::new();
        values
            .into_iter()
            .filter(|v| !v.is_empty() && seen.insert(*v))
            .map(str::to_string)
            .collect()
    }
}

/// Up to eight corpus values containing `query`, case-insensitively. Queries shorter
/// than three characters suggest nothing.
pub fn suggest(corpus: &[String], query: &str) -> Vec<String> {
    let q = query.trim();
    if q.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }
    let q = q.to_lowercase();
    corpus
        .iter()
        .filter(|v| v.to_lowercase().contains(&q))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}
