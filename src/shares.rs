//! Folder and note shares
//!
//! A share grants a single user access to a single folder or note, there is at most one share
//! per (resource, user) pair

use std::fmt;
use std::str::FromStr;

use chrono::naive::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

/// Access level granted by a share
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Access {
    /// Can look, can not touch
    Read,

    /// Can change the resource
    Write,
}

impl FromStr for Access {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            _ => Err(r#"Access must be either "read" or "write""#.to_string()),
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Access to a folder for a user
#[derive(Clone, Debug)]
pub struct FolderShare {
    pub id: Uuid,
    pub folder_id: Uuid,
    pub user_id: Uuid,
    pub access: Access,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Access to a note for a user
#[derive(Clone, Debug)]
pub struct NoteShare {
    pub id: Uuid,
    pub note_id: Uuid,
    pub user_id: Uuid,
    pub access: Access,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// The result of writing a share for a (resource, user) pair
#[derive(Debug)]
pub enum Upsert<T> {
    /// No share existed yet, a new one is created
    Created(T),

    /// The existing share is updated in place
    Updated(T),
}

impl<T> Upsert<T> {
    /// Was a new share created?
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    /// Get the share, however it was written
    pub fn into_inner(self) -> T {
        match self {
            Self::Created(share) | Self::Updated(share) => share,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_access() {
        assert_eq!(Ok(Access::Read), "read".parse::<Access>());
        assert_eq!(Ok(Access::Write), "write".parse::<Access>());
        assert_eq!(
            Err(r#"Access must be either "read" or "write""#.to_string()),
            "owner".parse::<Access>()
        );
        assert!("READ".parse::<Access>().is_err());
        assert!("".parse::<Access>().is_err());
    }

    #[test]
    fn test_upsert() {
        let created = Upsert::Created(1);
        assert!(created.is_created());
        assert_eq!(1, created.into_inner());

        let updated = Upsert::Updated(2);
        assert!(!updated.is_created());
        assert_eq!(2, updated.into_inner());
    }
}
