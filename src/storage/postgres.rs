//! Postgres storage

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::folders::Folder;
use crate::notes::Note;
use crate::shares::Access;
use crate::shares::FolderShare;
use crate::shares::NoteShare;
use crate::shares::Upsert;
use crate::teams::Membership;
use crate::teams::Team;
use crate::teams::TeamRole;
use crate::users::Role;
use crate::users::User;
use crate::utils::env_var;

use super::CascadeStep;
use super::CreateFolderValues;
use super::CreateNoteValues;
use super::CreateTeamValues;
use super::CreateUserValues;
use super::Error;
use super::Result;
use super::Storage;
use super::UpdateFolderValues;
use super::UpdateNoteValues;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Steps of a folder delete, in order, each with its query bound to the folder ID
const FOLDER_CASCADE: [(CascadeStep, &str); 4] = [
    (
        CascadeStep::NoteShares,
        r"
        DELETE FROM note_shares
        WHERE note_id IN (SELECT id FROM notes WHERE folder_id = $1)
        ",
    ),
    (
        CascadeStep::Notes,
        r"
        UPDATE notes
        SET deleted_at = CURRENT_TIMESTAMP
        WHERE deleted_at IS NULL AND folder_id = $1
        ",
    ),
    (
        CascadeStep::FolderShares,
        "DELETE FROM folder_shares WHERE folder_id = $1",
    ),
    (
        CascadeStep::Folder,
        r"
        UPDATE folders
        SET deleted_at = CURRENT_TIMESTAMP
        WHERE id = $1
        ",
    ),
];

/// Steps of a note delete, in order, each with its query bound to the note ID
const NOTE_CASCADE: [(CascadeStep, &str); 2] = [
    (
        CascadeStep::NoteShares,
        "DELETE FROM note_shares WHERE note_id = $1",
    ),
    (
        CascadeStep::Notes,
        r"
        UPDATE notes
        SET deleted_at = CURRENT_TIMESTAMP
        WHERE id = $1
        ",
    ),
];

/// Postgres type for user role
#[derive(PartialEq, Debug, sqlx::Type)]
#[sqlx(type_name = "user_role_type")]
#[sqlx(rename_all = "kebab-case")]
enum UserRoleType {
    /// Manager
    Manager,

    /// Member
    Member,
}

impl UserRoleType {
    /// Create user role type from role
    fn from_role(role: Role) -> Self {
        match role {
            Role::Manager => UserRoleType::Manager,
            Role::Member => UserRoleType::Member,
        }
    }

    /// Create role from user role type
    fn to_role(&self) -> Role {
        match self {
            UserRoleType::Manager => Role::Manager,
            UserRoleType::Member => Role::Member,
        }
    }
}

/// Postgres type for share access
#[derive(PartialEq, Debug, sqlx::Type)]
#[sqlx(type_name = "share_access_type")]
#[sqlx(rename_all = "kebab-case")]
enum ShareAccessType {
    /// Read
    Read,

    /// Write
    Write,
}

impl ShareAccessType {
    /// Create share access type from access
    fn from_access(access: Access) -> Self {
        match access {
            Access::Read => ShareAccessType::Read,
            Access::Write => ShareAccessType::Write,
        }
    }

    /// Create access from share access type
    fn to_access(&self) -> Access {
        match self {
            ShareAccessType::Read => Access::Read,
            ShareAccessType::Write => Access::Write,
        }
    }
}

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Use the `DATABASE_URL` environment variable
    ///
    /// Migrations will be run
    pub async fn new() -> anyhow::Result<Self> {
        let database_connection_string =
            env_var("DATABASE_URL").context("`DATABASE_URL` must be set")?;

        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_connection_string)
            .await
            .context("Could not connect to the database")?;

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: PgPool) -> anyhow::Result<Self> {
        MIGRATOR
            .run(&connection_pool)
            .await
            .context("Migrations could not run")?;

        Ok(Self { connection_pool })
    }
}

/// Postgres version of user
#[derive(sqlx::FromRow)]
struct PostgresUser {
    /// User ID
    id: Uuid,

    /// Username
    username: String,

    /// Email address
    email: String,

    /// User role
    role: UserRoleType,

    /// Creation date
    created_at: NaiveDateTime,

    /// Last updated at
    updated_at: NaiveDateTime,
}

impl User {
    /// Create user from postgres version
    fn from_postgres_user(user: PostgresUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role.to_role(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    /// Maybe create user from postgres version
    fn from_postgres_user_optional(user: Option<PostgresUser>) -> Option<Self> {
        user.map(Self::from_postgres_user)
    }

    /// Create multiple user from postgres version
    fn from_postgres_user_multiple(users: Vec<PostgresUser>) -> Vec<Self> {
        users.into_iter().map(Self::from_postgres_user).collect()
    }
}

/// Postgres version of folder share
#[derive(sqlx::FromRow)]
struct PostgresFolderShare {
    id: Uuid,
    folder_id: Uuid,
    user_id: Uuid,
    access: ShareAccessType,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Folder share as returned by an upsert
#[derive(sqlx::FromRow)]
struct PostgresUpsertedFolderShare {
    #[sqlx(flatten)]
    share: PostgresFolderShare,

    /// No row for the pair existed before the upsert
    is_created: bool,
}

impl FolderShare {
    fn from_postgres_share(share: PostgresFolderShare) -> Self {
        Self {
            id: share.id,
            folder_id: share.folder_id,
            user_id: share.user_id,
            access: share.access.to_access(),
            created_at: share.created_at,
            updated_at: share.updated_at,
        }
    }
}

/// Postgres version of note share
#[derive(sqlx::FromRow)]
struct PostgresNoteShare {
    id: Uuid,
    note_id: Uuid,
    user_id: Uuid,
    access: ShareAccessType,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Note share as returned by an upsert
#[derive(sqlx::FromRow)]
struct PostgresUpsertedNoteShare {
    #[sqlx(flatten)]
    share: PostgresNoteShare,

    /// No row for the pair existed before the upsert
    is_created: bool,
}

impl NoteShare {
    fn from_postgres_share(share: PostgresNoteShare) -> Self {
        Self {
            id: share.id,
            note_id: share.note_id,
            user_id: share.user_id,
            access: share.access.to_access(),
            created_at: share.created_at,
            updated_at: share.updated_at,
        }
    }
}

/// Join table holding the memberships of a role
fn membership_table(role: TeamRole) -> &'static str {
    match role {
        TeamRole::Manager => "team_managers",
        TeamRole::Member => "team_members",
    }
}

#[async_trait]
impl Storage for Postgres {
    async fn find_all_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, PostgresUser>(
            r"
            SELECT *
            FROM users
            ORDER BY created_at, id
            ",
        )
        .fetch_all(&self.connection_pool)
        .await
        .map(User::from_postgres_user_multiple)
        .map_err(storage_error)?;

        Ok(users)
    }

    async fn find_all_users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, PostgresUser>(
            r"
            SELECT *
            FROM users
            WHERE id = ANY($1)
            ORDER BY created_at, id
            ",
        )
        .bind(ids)
        .fetch_all(&self.connection_pool)
        .await
        .map(User::from_postgres_user_multiple)
        .map_err(storage_error)?;

        Ok(users)
    }

    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, PostgresUser>(
            r"
            SELECT *
            FROM users
            WHERE id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map(User::from_postgres_user_optional)
        .map_err(storage_error)?;

        Ok(user)
    }

    async fn find_single_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, PostgresUser>(
            r"
            SELECT *
            FROM users
            WHERE username = $1 OR email = $2
            LIMIT 1
            ",
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&self.connection_pool)
        .await
        .map(User::from_postgres_user_optional)
        .map_err(storage_error)?;

        Ok(user)
    }

    async fn create_user(&self, values: &CreateUserValues) -> Result<User> {
        let user = sqlx::query_as::<_, PostgresUser>(
            r"
            INSERT INTO users (id, username, email, role, hashed_password)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.username)
        .bind(values.email)
        .bind(UserRoleType::from_role(values.role))
        .bind(values.hashed_password)
        .fetch_one(&self.connection_pool)
        .await
        .map(User::from_postgres_user)
        .map_err(storage_error)?;

        Ok(user)
    }

    async fn find_single_team_by_id(&self, id: &Uuid) -> Result<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            r"
            SELECT *
            FROM teams
            WHERE id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(team)
    }

    async fn create_team(&self, values: &CreateTeamValues) -> Result<Team> {
        let mut transaction = self
            .connection_pool
            .begin()
            .await
            .map_err(storage_error)?;

        let team = sqlx::query_as::<_, Team>(
            r"
            INSERT INTO teams (id, name)
            VALUES ($1, $2)
            RETURNING *
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.name)
        .fetch_one(&mut *transaction)
        .await
        .map_err(storage_error)?;

        for (role, user_ids) in [
            (TeamRole::Manager, values.manager_ids),
            (TeamRole::Member, values.member_ids),
        ] {
            let query = format!(
                r"
                INSERT INTO {} (id, team_id, user_id)
                VALUES ($1, $2, $3)
                ON CONFLICT (team_id, user_id) DO NOTHING
                ",
                membership_table(role)
            );

            for user_id in user_ids {
                sqlx::query(&query)
                    .bind(Uuid::new_v4())
                    .bind(team.id)
                    .bind(user_id)
                    .execute(&mut *transaction)
                    .await
                    .map_err(|err| {
                        tracing::warn!("Rolling back creation of team {}: {err}", team.name);
                        storage_error(err)
                    })?;
            }
        }

        transaction.commit().await.map_err(storage_error)?;

        Ok(team)
    }

    async fn find_all_memberships(&self, team: &Team, role: TeamRole) -> Result<Vec<Membership>> {
        let query = format!(
            r"
            SELECT *
            FROM {}
            WHERE team_id = $1
            ORDER BY created_at, id
            ",
            membership_table(role)
        );

        let memberships = sqlx::query_as::<_, Membership>(&query)
            .bind(team.id)
            .fetch_all(&self.connection_pool)
            .await
            .map_err(storage_error)?;

        Ok(memberships)
    }

    async fn find_single_membership(
        &self,
        team: &Team,
        user_id: &Uuid,
        role: TeamRole,
    ) -> Result<Option<Membership>> {
        let query = format!(
            r"
            SELECT *
            FROM {}
            WHERE team_id = $1 AND user_id = $2
            LIMIT 1
            ",
            membership_table(role)
        );

        let membership = sqlx::query_as::<_, Membership>(&query)
            .bind(team.id)
            .bind(user_id)
            .fetch_optional(&self.connection_pool)
            .await
            .map_err(storage_error)?;

        Ok(membership)
    }

    async fn create_membership(
        &self,
        team: &Team,
        user: &User,
        role: TeamRole,
    ) -> Result<Option<Membership>> {
        let query = format!(
            r"
            INSERT INTO {} (id, team_id, user_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (team_id, user_id) DO NOTHING
            RETURNING *
            ",
            membership_table(role)
        );

        let membership = sqlx::query_as::<_, Membership>(&query)
            .bind(Uuid::new_v4())
            .bind(team.id)
            .bind(user.id)
            .fetch_optional(&self.connection_pool)
            .await
            .map_err(storage_error)?;

        Ok(membership)
    }

    async fn delete_membership(&self, membership: &Membership, role: TeamRole) -> Result<()> {
        let query = format!("DELETE FROM {} WHERE id = $1", membership_table(role));

        sqlx::query(&query)
            .bind(membership.id)
            .execute(&self.connection_pool)
            .await
            .map_err(storage_error)?;

        Ok(())
    }

    async fn find_single_folder_by_id(&self, id: &Uuid) -> Result<Option<Folder>> {
        let folder = sqlx::query_as::<_, Folder>(
            r"
            SELECT *
            FROM folders
            WHERE deleted_at IS NULL AND id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(folder)
    }

    async fn find_all_folders_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Folder>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let folders = sqlx::query_as::<_, Folder>(
            r"
            SELECT *
            FROM folders
            WHERE deleted_at IS NULL AND id = ANY($1)
            ORDER BY created_at, id
            ",
        )
        .bind(ids)
        .fetch_all(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(folders)
    }

    async fn find_all_folders_by_owners(&self, owner_ids: &[Uuid]) -> Result<Vec<Folder>> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }

        let folders = sqlx::query_as::<_, Folder>(
            r"
            SELECT *
            FROM folders
            WHERE deleted_at IS NULL AND owner_id = ANY($1)
            ORDER BY created_at, id
            ",
        )
        .bind(owner_ids)
        .fetch_all(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(folders)
    }

    async fn create_folder(&self, values: &CreateFolderValues) -> Result<Folder> {
        let folder = sqlx::query_as::<_, Folder>(
            r"
            INSERT INTO folders (id, owner_id, name)
            VALUES ($1, $2, $3)
            RETURNING *
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.owner.id)
        .bind(values.name)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(folder)
    }

    async fn update_folder(&self, folder: &Folder, values: &UpdateFolderValues) -> Result<Folder> {
        let updated_folder = sqlx::query_as::<_, Folder>(
            r"
            UPDATE folders
            SET name = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            RETURNING *
            ",
        )
        .bind(values.name)
        .bind(folder.id)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(updated_folder)
    }

    async fn delete_folder(&self, folder: &Folder) -> Result<()> {
        let mut transaction = self
            .connection_pool
            .begin()
            .await
            .map_err(storage_error)?;

        for (step, query) in FOLDER_CASCADE {
            tracing::debug!("Deleting {step} of folder {}", folder.id);

            sqlx::query(query)
                .bind(folder.id)
                .execute(&mut *transaction)
                .await
                .map_err(|err| {
                    tracing::warn!("Rolling back delete of folder {}: {step} failed", folder.id);
                    storage_error(err)
                })?;
        }

        transaction.commit().await.map_err(storage_error)?;

        Ok(())
    }

    async fn find_single_note_by_id(&self, id: &Uuid) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, Note>(
            r"
            SELECT *
            FROM notes
            WHERE deleted_at IS NULL AND id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(note)
    }

    async fn find_all_notes_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Note>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let notes = sqlx::query_as::<_, Note>(
            r"
            SELECT *
            FROM notes
            WHERE deleted_at IS NULL AND id = ANY($1)
            ORDER BY created_at, id
            ",
        )
        .bind(ids)
        .fetch_all(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(notes)
    }

    async fn find_all_notes_by_owners(&self, owner_ids: &[Uuid]) -> Result<Vec<Note>> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }

        let notes = sqlx::query_as::<_, Note>(
            r"
            SELECT *
            FROM notes
            WHERE deleted_at IS NULL AND owner_id = ANY($1)
            ORDER BY created_at, id
            ",
        )
        .bind(owner_ids)
        .fetch_all(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(notes)
    }

    async fn create_note(&self, folder: &Folder, values: &CreateNoteValues) -> Result<Note> {
        let note = sqlx::query_as::<_, Note>(
            r"
            INSERT INTO notes (id, owner_id, folder_id, title, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.owner.id)
        .bind(folder.id)
        .bind(values.title)
        .bind(values.body)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(note)
    }

    async fn update_note(&self, note: &Note, values: &UpdateNoteValues) -> Result<Note> {
        let updated_note = sqlx::query_as::<_, Note>(
            r"
            UPDATE notes
            SET title = $1, body = $2, updated_at = CURRENT_TIMESTAMP
            WHERE id = $3
            RETURNING *
            ",
        )
        .bind(values.title)
        .bind(values.body)
        .bind(note.id)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(updated_note)
    }

    async fn delete_note(&self, note: &Note) -> Result<()> {
        let mut transaction = self
            .connection_pool
            .begin()
            .await
            .map_err(storage_error)?;

        for (step, query) in NOTE_CASCADE {
            tracing::debug!("Deleting {step} of note {}", note.id);

            sqlx::query(query)
                .bind(note.id)
                .execute(&mut *transaction)
                .await
                .map_err(|err| {
                    tracing::warn!("Rolling back delete of note {}: {step} failed", note.id);
                    storage_error(err)
                })?;
        }

        transaction.commit().await.map_err(storage_error)?;

        Ok(())
    }

    async fn find_all_folder_shares_by_users(
        &self,
        user_ids: &[Uuid],
    ) -> Result<Vec<FolderShare>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let shares = sqlx::query_as::<_, PostgresFolderShare>(
            r"
            SELECT folder_shares.*
            FROM folder_shares
            INNER JOIN folders ON folders.id = folder_shares.folder_id
            WHERE folders.deleted_at IS NULL AND folder_shares.user_id = ANY($1)
            ORDER BY folder_shares.created_at, folder_shares.id
            ",
        )
        .bind(user_ids)
        .fetch_all(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(shares
            .into_iter()
            .map(FolderShare::from_postgres_share)
            .collect())
    }

    async fn find_single_folder_share(
        &self,
        folder_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<FolderShare>> {
        let share = sqlx::query_as::<_, PostgresFolderShare>(
            r"
            SELECT *
            FROM folder_shares
            WHERE folder_id = $1 AND user_id = $2
            LIMIT 1
            ",
        )
        .bind(folder_id)
        .bind(user_id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(share.map(FolderShare::from_postgres_share))
    }

    async fn upsert_folder_share(
        &self,
        folder: &Folder,
        user: &User,
        access: Access,
    ) -> Result<Upsert<FolderShare>> {
        // `xmax` is only set when the row existed and got updated
        let upserted = sqlx::query_as::<_, PostgresUpsertedFolderShare>(
            r"
            INSERT INTO folder_shares (id, folder_id, user_id, access)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (folder_id, user_id)
            DO UPDATE SET access = EXCLUDED.access, updated_at = CURRENT_TIMESTAMP
            RETURNING *, (xmax = 0) AS is_created
            ",
        )
        .bind(Uuid::new_v4())
        .bind(folder.id)
        .bind(user.id)
        .bind(ShareAccessType::from_access(access))
        .fetch_one(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        let share = FolderShare::from_postgres_share(upserted.share);

        if upserted.is_created {
            Ok(Upsert::Created(share))
        } else {
            Ok(Upsert::Updated(share))
        }
    }

    async fn delete_folder_share(&self, share: &FolderShare) -> Result<()> {
        sqlx::query("DELETE FROM folder_shares WHERE id = $1")
            .bind(share.id)
            .execute(&self.connection_pool)
            .await
            .map_err(storage_error)?;

        Ok(())
    }

    async fn find_all_note_shares_by_users(&self, user_ids: &[Uuid]) -> Result<Vec<NoteShare>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let shares = sqlx::query_as::<_, PostgresNoteShare>(
            r"
            SELECT note_shares.*
            FROM note_shares
            INNER JOIN notes ON notes.id = note_shares.note_id
            WHERE notes.deleted_at IS NULL AND note_shares.user_id = ANY($1)
            ORDER BY note_shares.created_at, note_shares.id
            ",
        )
        .bind(user_ids)
        .fetch_all(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(shares
            .into_iter()
            .map(NoteShare::from_postgres_share)
            .collect())
    }

    async fn find_single_note_share(
        &self,
        note_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<NoteShare>> {
        let share = sqlx::query_as::<_, PostgresNoteShare>(
            r"
            SELECT *
            FROM note_shares
            WHERE note_id = $1 AND user_id = $2
            LIMIT 1
            ",
        )
        .bind(note_id)
        .bind(user_id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        Ok(share.map(NoteShare::from_postgres_share))
    }

    async fn upsert_note_share(
        &self,
        note: &Note,
        user: &User,
        access: Access,
    ) -> Result<Upsert<NoteShare>> {
        let upserted = sqlx::query_as::<_, PostgresUpsertedNoteShare>(
            r"
            INSERT INTO note_shares (id, note_id, user_id, access)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (note_id, user_id)
            DO UPDATE SET access = EXCLUDED.access, updated_at = CURRENT_TIMESTAMP
            RETURNING *, (xmax = 0) AS is_created
            ",
        )
        .bind(Uuid::new_v4())
        .bind(note.id)
        .bind(user.id)
        .bind(ShareAccessType::from_access(access))
        .fetch_one(&self.connection_pool)
        .await
        .map_err(storage_error)?;

        let share = NoteShare::from_postgres_share(upserted.share);

        if upserted.is_created {
            Ok(Upsert::Created(share))
        } else {
            Ok(Upsert::Updated(share))
        }
    }

    async fn delete_note_share(&self, share: &NoteShare) -> Result<()> {
        sqlx::query("DELETE FROM note_shares WHERE id = $1")
            .bind(share.id)
            .execute(&self.connection_pool)
            .await
            .map_err(storage_error)?;

        Ok(())
    }
}

/// Convert `SQLx` to storage error
fn storage_error(err: sqlx::Error) -> Error {
    tracing::error!("Storage error: {err}");

    match &err {
        sqlx::Error::RowNotFound => Error::RowNotFound(err.to_string()),
        sqlx::Error::Database(database_error)
            if database_error.is_unique_violation()
                || database_error.is_foreign_key_violation() =>
        {
            Error::Constraint(err.to_string())
        }
        _ => Error::Connection(err.to_string()),
    }
}
