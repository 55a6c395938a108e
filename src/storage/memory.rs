//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use chrono::Utc;
use tokio::sync::Mutex;
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
use crate::users::User;

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

/// All rows, in the order they were inserted
#[derive(Clone, Debug, Default)]
struct Tables {
    users: Vec<User>,
    credentials: HashMap<Uuid, String>,
    teams: Vec<Team>,
    team_managers: Vec<Membership>,
    team_members: Vec<Membership>,
    folders: Vec<Folder>,
    notes: Vec<Note>,
    folder_shares: Vec<FolderShare>,
    note_shares: Vec<NoteShare>,
}

impl Tables {
    fn memberships(&self, role: TeamRole) -> &Vec<Membership> {
        match role {
            TeamRole::Manager => &self.team_managers,
            TeamRole::Member => &self.team_members,
        }
    }

    fn memberships_mut(&mut self, role: TeamRole) -> &mut Vec<Membership> {
        match role {
            TeamRole::Manager => &mut self.team_managers,
            TeamRole::Member => &mut self.team_members,
        }
    }

    fn is_live_folder(&self, folder_id: &Uuid) -> bool {
        self.folders
            .iter()
            .any(|folder| &folder.id == folder_id && !folder.is_deleted())
    }

    fn is_live_note(&self, note_id: &Uuid) -> bool {
        self.notes
            .iter()
            .any(|note| &note.id == note_id && !note.is_deleted())
    }

    fn insert_membership(&mut self, team_id: Uuid, user_id: Uuid, role: TeamRole) -> Membership {
        let membership = Membership {
            id: Uuid::new_v4(),
            team_id,
            user_id,
            created_at: now(),
        };

        self.memberships_mut(role).push(membership.clone());

        membership
    }
}

/// An in-memory storage
///
/// Will be destroyed on system shutdown
#[derive(Clone, Debug)]
pub struct Memory {
    /// All tables, behind a single lock so multi-row writes can be applied at once
    tables: Arc<Mutex<Tables>>,

    /// Cascade step after which a delete fails, to exercise rollbacks
    #[cfg(test)]
    failing_step: Arc<std::sync::Mutex<Option<CascadeStep>>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            #[cfg(test)]
            failing_step: Arc::new(std::sync::Mutex::new(None)),
        }
    }

    /// Make every following cascading delete fail right after the given step
    #[cfg(test)]
    pub fn fail_after(&self, step: Option<CascadeStep>) {
        *self.failing_step.lock().unwrap() = step;
    }

    #[cfg(test)]
    fn check_step(&self, step: CascadeStep) -> Result<()> {
        if *self.failing_step.lock().unwrap() == Some(step) {
            return Err(Error::Connection(format!(
                "Simulated failure after deleting {step}"
            )));
        }

        Ok(())
    }

    #[cfg(not(test))]
    #[allow(clippy::unused_self, clippy::unnecessary_wraps)]
    fn check_step(&self, _step: CascadeStep) -> Result<()> {
        Ok(())
    }

    /// Apply changes on a copy of all tables, the copy replaces the tables only on success
    async fn transaction<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut Tables) -> Result<T> + Send,
    {
        let mut tables = self.tables.lock().await;
        let mut staged = tables.clone();

        match apply(&mut staged) {
            Ok(value) => {
                *tables = staged;

                Ok(value)
            }
            Err(err) => {
                tracing::warn!("Rolled back memory transaction: {err}");

                Err(err)
            }
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[async_trait]
impl Storage for Memory {
    async fn find_all_users(&self) -> Result<Vec<User>> {
        Ok(self.tables.lock().await.users.clone())
    }

    async fn find_all_users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        Ok(self
            .tables
            .lock()
            .await
            .users
            .iter()
            .filter(|user| ids.contains(&user.id))
            .cloned()
            .collect())
    }

    async fn find_single_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        Ok(self
            .tables
            .lock()
            .await
            .users
            .iter()
            .find(|user| &user.id == id)
            .cloned())
    }

    async fn find_single_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>> {
        Ok(self
            .tables
            .lock()
            .await
            .users
            .iter()
            .find(|user| user.username == username || user.email == email)
            .cloned())
    }

    async fn create_user(&self, values: &CreateUserValues) -> Result<User> {
        self.transaction(|tables| {
            if tables
                .users
                .iter()
                .any(|user| user.username == values.username || user.email == values.email)
            {
                return Err(Error::Constraint(
                    "Duplicate key value violates unique username/email".to_string(),
                ));
            }

            let user = User {
                id: Uuid::new_v4(),
                username: values.username.to_string(),
                email: values.email.to_string(),
                role: values.role,
                created_at: now(),
                updated_at: now(),
            };

            tables
                .credentials
                .insert(user.id, values.hashed_password.to_string());
            tables.users.push(user.clone());

            Ok(user)
        })
        .await
    }

    async fn find_single_team_by_id(&self, id: &Uuid) -> Result<Option<Team>> {
        Ok(self
            .tables
            .lock()
            .await
            .teams
            .iter()
            .find(|team| &team.id == id)
            .cloned())
    }

    async fn create_team(&self, values: &CreateTeamValues) -> Result<Team> {
        self.transaction(|tables| {
            let team = Team {
                id: Uuid::new_v4(),
                name: values.name.to_string(),
                created_at: now(),
                updated_at: now(),
            };

            tables.teams.push(team.clone());

            for (role, user_ids) in [
                (TeamRole::Manager, values.manager_ids),
                (TeamRole::Member, values.member_ids),
            ] {
                for user_id in user_ids {
                    if !tables.users.iter().any(|user| &user.id == user_id) {
                        return Err(Error::Constraint(format!(
                            "{} {user_id} violates foreign key",
                            role.label()
                        )));
                    }

                    let exists = tables
                        .memberships(role)
                        .iter()
                        .any(|membership| {
                            membership.team_id == team.id && &membership.user_id == user_id
                        });

                    if !exists {
                        tables.insert_membership(team.id, *user_id, role);
                    }
                }
            }

            Ok(team)
        })
        .await
    }

    async fn find_all_memberships(&self, team: &Team, role: TeamRole) -> Result<Vec<Membership>> {
        Ok(self
            .tables
            .lock()
            .await
            .memberships(role)
            .iter()
            .filter(|membership| membership.team_id == team.id)
            .cloned()
            .collect())
    }

    async fn find_single_membership(
        &self,
        team: &Team,
        user_id: &Uuid,
        role: TeamRole,
    ) -> Result<Option<Membership>> {
        Ok(self
            .tables
            .lock()
            .await
            .memberships(role)
            .iter()
            .find(|membership| membership.team_id == team.id && &membership.user_id == user_id)
            .cloned())
    }

    async fn create_membership(
        &self,
        team: &Team,
        user: &User,
        role: TeamRole,
    ) -> Result<Option<Membership>> {
        self.transaction(|tables| {
            let exists = tables
                .memberships(role)
                .iter()
                .any(|membership| membership.team_id == team.id && membership.user_id == user.id);

            if exists {
                Ok(None)
            } else {
                Ok(Some(tables.insert_membership(team.id, user.id, role)))
            }
        })
        .await
    }

    async fn delete_membership(&self, membership: &Membership, role: TeamRole) -> Result<()> {
        self.tables
            .lock()
            .await
            .memberships_mut(role)
            .retain(|existing| existing.id != membership.id);

        Ok(())
    }

    async fn find_single_folder_by_id(&self, id: &Uuid) -> Result<Option<Folder>> {
        Ok(self
            .tables
            .lock()
            .await
            .folders
            .iter()
            .find(|folder| &folder.id == id && !folder.is_deleted())
            .cloned())
    }

    async fn find_all_folders_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Folder>> {
        Ok(self
            .tables
            .lock()
            .await
            .folders
            .iter()
            .filter(|folder| ids.contains(&folder.id) && !folder.is_deleted())
            .cloned()
            .collect())
    }

    async fn find_all_folders_by_owners(&self, owner_ids: &[Uuid]) -> Result<Vec<Folder>> {
        Ok(self
            .tables
            .lock()
            .await
            .folders
            .iter()
            .filter(|folder| owner_ids.contains(&folder.owner_id) && !folder.is_deleted())
            .cloned()
            .collect())
    }

    async fn create_folder(&self, values: &CreateFolderValues) -> Result<Folder> {
        let folder = Folder {
            id: Uuid::new_v4(),
            owner_id: values.owner.id,
            name: values.name.to_string(),
            created_at: now(),
            updated_at: now(),
            deleted_at: None,
        };

        self.tables.lock().await.folders.push(folder.clone());

        Ok(folder)
    }

    async fn update_folder(&self, folder: &Folder, values: &UpdateFolderValues) -> Result<Folder> {
        self.tables
            .lock()
            .await
            .folders
            .iter_mut()
            .find(|existing| existing.id == folder.id)
            .map(|existing| {
                existing.name = values.name.to_string();
                existing.updated_at = now();

                existing.clone()
            })
            .ok_or_else(|| Error::RowNotFound(format!("Folder {}", folder.id)))
    }

    async fn delete_folder(&self, folder: &Folder) -> Result<()> {
        self.transaction(|tables| {
            let deleted_at = now();

            let note_ids = tables
                .notes
                .iter()
                .filter(|note| note.folder_id == folder.id && !note.is_deleted())
                .map(|note| note.id)
                .collect::<Vec<Uuid>>();

            tables
                .note_shares
                .retain(|share| !note_ids.contains(&share.note_id));
            self.check_step(CascadeStep::NoteShares)?;

            for note in &mut tables.notes {
                if note_ids.contains(&note.id) {
                    note.deleted_at = Some(deleted_at);
                }
            }
            self.check_step(CascadeStep::Notes)?;

            tables
                .folder_shares
                .retain(|share| share.folder_id != folder.id);
            self.check_step(CascadeStep::FolderShares)?;

            for existing in &mut tables.folders {
                if existing.id == folder.id {
                    existing.deleted_at = Some(deleted_at);
                }
            }
            self.check_step(CascadeStep::Folder)?;

            Ok(())
        })
        .await
    }

    async fn find_single_note_by_id(&self, id: &Uuid) -> Result<Option<Note>> {
        Ok(self
            .tables
            .lock()
            .await
            .notes
            .iter()
            .find(|note| &note.id == id && !note.is_deleted())
            .cloned())
    }

    async fn find_all_notes_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Note>> {
        Ok(self
            .tables
            .lock()
            .await
            .notes
            .iter()
            .filter(|note| ids.contains(&note.id) && !note.is_deleted())
            .cloned()
            .collect())
    }

    async fn find_all_notes_by_owners(&self, owner_ids: &[Uuid]) -> Result<Vec<Note>> {
        Ok(self
            .tables
            .lock()
            .await
            .notes
            .iter()
            .filter(|note| owner_ids.contains(&note.owner_id) && !note.is_deleted())
            .cloned()
            .collect())
    }

    async fn create_note(&self, folder: &Folder, values: &CreateNoteValues) -> Result<Note> {
        let note = Note {
            id: Uuid::new_v4(),
            owner_id: values.owner.id,
            folder_id: folder.id,
            title: values.title.to_string(),
            body: values.body.to_string(),
            created_at: now(),
            updated_at: now(),
            deleted_at: None,
        };

        self.tables.lock().await.notes.push(note.clone());

        Ok(note)
    }

    async fn update_note(&self, note: &Note, values: &UpdateNoteValues) -> Result<Note> {
        self.tables
            .lock()
            .await
            .notes
            .iter_mut()
            .find(|existing| existing.id == note.id)
            .map(|existing| {
                existing.title = values.title.to_string();
                existing.body = values.body.to_string();
                existing.updated_at = now();

                existing.clone()
            })
            .ok_or_else(|| Error::RowNotFound(format!("Note {}", note.id)))
    }

    async fn delete_note(&self, note: &Note) -> Result<()> {
        self.transaction(|tables| {
            tables.note_shares.retain(|share| share.note_id != note.id);
            self.check_step(CascadeStep::NoteShares)?;

            for existing in &mut tables.notes {
                if existing.id == note.id {
                    existing.deleted_at = Some(now());
                }
            }
            self.check_step(CascadeStep::Notes)?;

            Ok(())
        })
        .await
    }

    async fn find_all_folder_shares_by_users(
        &self,
        user_ids: &[Uuid],
    ) -> Result<Vec<FolderShare>> {
        let tables = self.tables.lock().await;

        Ok(tables
            .folder_shares
            .iter()
            .filter(|share| user_ids.contains(&share.user_id))
            .filter(|share| tables.is_live_folder(&share.folder_id))
            .cloned()
            .collect())
    }

    async fn find_single_folder_share(
        &self,
        folder_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<FolderShare>> {
        Ok(self
            .tables
            .lock()
            .await
            .folder_shares
            .iter()
            .find(|share| &share.folder_id == folder_id && &share.user_id == user_id)
            .cloned())
    }

    async fn upsert_folder_share(
        &self,
        folder: &Folder,
        user: &User,
        access: Access,
    ) -> Result<Upsert<FolderShare>> {
        let mut tables = self.tables.lock().await;

        let existing = tables
            .folder_shares
            .iter_mut()
            .find(|share| share.folder_id == folder.id && share.user_id == user.id);

        if let Some(share) = existing {
            share.access = access;
            share.updated_at = now();

            return Ok(Upsert::Updated(share.clone()));
        }

        let share = FolderShare {
            id: Uuid::new_v4(),
            folder_id: folder.id,
            user_id: user.id,
            access,
            created_at: now(),
            updated_at: now(),
        };

        tables.folder_shares.push(share.clone());

        Ok(Upsert::Created(share))
    }

    async fn delete_folder_share(&self, share: &FolderShare) -> Result<()> {
        self.tables
            .lock()
            .await
            .folder_shares
            .retain(|existing| existing.id != share.id);

        Ok(())
    }

    async fn find_all_note_shares_by_users(&self, user_ids: &[Uuid]) -> Result<Vec<NoteShare>> {
        let tables = self.tables.lock().await;

        Ok(tables
            .note_shares
            .iter()
            .filter(|share| user_ids.contains(&share.user_id))
            .filter(|share| tables.is_live_note(&share.note_id))
            .cloned()
            .collect())
    }

    async fn find_single_note_share(
        &self,
        note_id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<NoteShare>> {
        Ok(self
            .tables
            .lock()
            .await
            .note_shares
            .iter()
            .find(|share| &share.note_id == note_id && &share.user_id == user_id)
            .cloned())
    }

    async fn upsert_note_share(
        &self,
        note: &Note,
        user: &User,
        access: Access,
    ) -> Result<Upsert<NoteShare>> {
        let mut tables = self.tables.lock().await;

        let existing = tables
            .note_shares
            .iter_mut()
            .find(|share| share.note_id == note.id && share.user_id == user.id);

        if let Some(share) = existing {
            share.access = access;
            share.updated_at = now();

            return Ok(Upsert::Updated(share.clone()));
        }

        let share = NoteShare {
            id: Uuid::new_v4(),
            note_id: note.id,
            user_id: user.id,
            access,
            created_at: now(),
            updated_at: now(),
        };

        tables.note_shares.push(share.clone());

        Ok(Upsert::Created(share))
    }

    async fn delete_note_share(&self, share: &NoteShare) -> Result<()> {
        self.tables
            .lock()
            .await
            .note_shares
            .retain(|existing| existing.id != share.id);

        Ok(())
    }
}
