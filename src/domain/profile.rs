use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use validator::Validate;

use super::table::DataTable;

/// Columns the model expects, in the order the single-row table is built.
pub const REQUIRED_COLUMNS: [&str; 5] = ["Age", "Experience", "Gender", "Education", "Occupation"];

pub const AGE_RANGE: RangeInclusive<u32> = 18..=65;
pub const EXPERIENCE_RANGE: RangeInclusive<u32> = 0..=40;

/// Rules shown in the side panel. Only a subset is enforced by the
/// plausibility checker.
pub const DOCUMENTED_RULES: [&str; 8] = [
    "Age must be 18–65",
    "Experience ≤ Age - 18",
    "CEO/Manager roles need Age ≥ 30",
    "PhD holders must be ≥ 24 years",
    "Software/Data roles need Bachelors+",
    "Interns should have ≤ 2 years experience",
    "Senior roles require ≥ 5 years",
    "Overqualified roles (e.g. PhD as Driver) flagged",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Education {
    #[serde(rename = "10th")]
    Tenth,
    #[serde(rename = "12th")]
    Twelfth,
    Diploma,
    Bachelors,
    Masters,
    PhD,
    #[serde(rename = "Professional Certification")]
    ProfessionalCertification,
}

impl Education {
    pub const ALL: [Education; 7] = [
        Education::Tenth,
        Education::Twelfth,
        Education::Diploma,
        Education::Bachelors,
        Education::Masters,
        Education::PhD,
        Education::ProfessionalCertification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Education::Tenth => "10th",
            Education::Twelfth => "12th",
            Education::Diploma => "Diploma",
            Education::Bachelors => "Bachelors",
            Education::Masters => "Masters",
            Education::PhD => "PhD",
            Education::ProfessionalCertification => "Professional Certification",
        }
    }

    /// Schooling below diploma level.
    pub fn is_school_level(&self) -> bool {
        matches!(self, Education::Tenth | Education::Twelfth)
    }
}

impl fmt::Display for Education {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One employee as entered in the side panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    #[validate(range(min = 18, max = 65))]
    pub age: u32,
    pub gender: Gender,
    pub education: Education,
    #[validate(length(min = 1))]
    pub occupation: String,
    #[validate(range(max = 40))]
    pub experience: u32,
}

impl EmployeeProfile {
    /// Single-row model input with `REQUIRED_COLUMNS` as headers.
    pub fn to_table(&self) -> DataTable {
        let headers = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let row = vec![
            self.age.to_string(),
            self.experience.to_string(),
            self.gender.as_str().to_string(),
            self.education.as_str().to_string(),
            self.occupation.clone(),
        ];
        DataTable::new(headers, vec![row])
    }
}
