//! Users
//!
//! The identity every other entity points to: owners, share targets, managers and members

use std::fmt;
use std::str::FromStr;

use chrono::naive::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// User roles
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Runs teams
    Manager,

    /// Works in teams
    Member,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "manager" => Ok(Self::Manager),
            "member" => Ok(Self::Member),
            other => Err(format!(r#"Unknown role "{other}""#)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manager => write!(f, "manager"),
            Self::Member => write!(f, "member"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(Ok(Role::Manager), "manager".parse::<Role>());
        assert_eq!(Ok(Role::Member), "member".parse::<Role>());
        assert!("admin".parse::<Role>().is_err());
        assert!("Manager".parse::<Role>().is_err());
    }
}
