//! Advisory checks on a profile.
//!
//! Each rule is independent: all are evaluated and every match adds its own
//! warning, in rule order. The side panel documents more rules than are
//! listed here; only these three are enforced.

use crate::domain::profile::{Education, EmployeeProfile};
use crate::domain::warning::PlausibilityWarning;

const DEGREE_ROLES: [&str; 2] = ["software engineer", "data scientist"];

pub fn check_profile(profile: &EmployeeProfile) -> Vec<PlausibilityWarning> {
    let occupation = profile.occupation.to_lowercase();
    let mut warnings = Vec::new();

    if profile.education == Education::Tenth && occupation.contains("ceo") {
        warnings.push(PlausibilityWarning::CeoRequiresEducation);
    }

    // Working life starts at 18
    if i64::from(profile.experience) > i64::from(profile.age) - 18 {
        warnings.push(PlausibilityWarning::ExperienceExceedsAge);
    }

    if profile.education.is_school_level() && DEGREE_ROLES.contains(&occupation.as_str()) {
        warnings.push(PlausibilityWarning::RoleRequiresHigherEducation);
    }

    warnings
}
