//! Teams and their managers/members

use chrono::naive::NaiveDateTime;
use uuid::Uuid;

/// A team
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Team {
    /// Team ID
    pub id: Uuid,

    /// Name of the team
    pub name: String,

    /// Creation date
    pub created_at: NaiveDateTime,

    /// Last updated at
    pub updated_at: NaiveDateTime,
}

/// The role a user holds within a team
///
/// Both roles are kept as separate relations, a user can hold both
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TeamRole {
    Manager,
    Member,
}

impl TeamRole {
    /// Human-readable label, used in messages
    pub fn label(self) -> &'static str {
        match self {
            Self::Manager => "Manager",
            Self::Member => "Member",
        }
    }
}

/// Single (team, user) relation for one role
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Membership {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub created_at: NaiveDateTime,
}
