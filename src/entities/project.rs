use serde::{Deserialize, Serialize};

use super::Entity;

pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;
pub const URL_MAX: usize = 200;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    ComingSoon,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::ComingSoon => write!(f, "coming_soon"),
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "coming_soon" => Ok(Self::ComingSoon),
            other => Err(format!("unknown project status: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Empty means the project has no public link yet.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub status: ProjectStatus,
    /// Display sort key; duplicates allowed.
    #[serde(default)]
    pub order: i64,
}

impl Project {
    pub fn is_available(&self) -> bool {
        !self.url.is_empty()
    }
}

impl Entity for Project {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Fields accepted on create and update.
#[derive(Clone, Debug, Default)]
pub struct ProjectFields {
    pub title: String,
    pub description: String,
    pub url: String,
    pub status: ProjectStatus,
    pub order: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_as_snake_case() {
        assert_eq!(serde_json::to_value(ProjectStatus::ComingSoon).unwrap(), "coming_soon");
        assert_eq!("coming_soon".parse::<ProjectStatus>().unwrap(), ProjectStatus::ComingSoon);
        assert_eq!(ProjectStatus::Active.to_string(), "active");
        assert!("paused".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn defaults_when_fields_missing() {
        let project: Project =
            serde_json::from_str(r#"{"id":1,"title":"t","description":"d"}"#).unwrap();
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.order, 0);
        assert!(!project.is_available());
    }
}
