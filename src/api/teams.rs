//! Team API management
//!
//! Managers and members are separate relations, a user can be both in the same team

use std::collections::HashMap;

use axum::Extension;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::assets::resolve_for_team;
use crate::storage::CreateTeamValues;
use crate::storage::Storage;
use crate::teams::Membership;
use crate::teams::Team;
use crate::teams::TeamRole;
use crate::users::User;

use super::Error;
use super::Form;
use super::Named;
use super::PathParameters;
use super::Success;
use super::assets::AssetsResponse;
use super::request::parse_name;
use super::users::UserResponse;
use super::utils::fetch_team;
use super::utils::fetch_user;
use super::utils::fetch_users_by_ids;
use super::utils::unique;

/// The team response information, with its managers and members
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub team_id: Uuid,
    pub team_name: String,
    pub managers: Vec<UserResponse>,
    pub members: Vec<UserResponse>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TeamResponse {
    fn from_team(
        team: Team,
        managers: &[Membership],
        members: &[Membership],
        users: &HashMap<Uuid, User>,
    ) -> Self {
        let to_users = |memberships: &[Membership]| {
            memberships
                .iter()
                .filter_map(|membership| users.get(&membership.user_id).cloned())
                .map(UserResponse::from_user)
                .collect::<Vec<UserResponse>>()
        };

        Self {
            team_id: team.id,
            team_name: team.name,
            managers: to_users(managers),
            members: to_users(members),
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

/// Single membership of a user in a team
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub user: UserResponse,
    pub created_at: NaiveDateTime,
}

impl MembershipResponse {
    fn from_membership(membership: Membership, user: User) -> Self {
        Self {
            id: membership.id,
            team_id: membership.team_id,
            user_id: membership.user_id,
            user: UserResponse::from_user(user),
            created_at: membership.created_at,
        }
    }
}

/// Load managers and members of a team into a response
async fn team_response<S: Storage>(storage: &S, team: Team) -> Result<TeamResponse, Error> {
    let managers = storage
        .find_all_memberships(&team, TeamRole::Manager)
        .await
        .map_err(Error::internal_server_error)?;

    let members = storage
        .find_all_memberships(&team, TeamRole::Member)
        .await
        .map_err(Error::internal_server_error)?;

    let user_ids = managers
        .iter()
        .chain(members.iter())
        .map(|membership| membership.user_id);
    let users = fetch_users_by_ids(storage, user_ids).await?;

    Ok(TeamResponse::from_team(team, &managers, &members, &users))
}

/// Get a single team
///
/// Request:
/// ```sh
/// curl -v http://localhost:8080/teams/<uuid>
/// ```
///
/// Response:
/// ```json
/// { "team": { "teamId": "<uuid>", "teamName": "Crew", "managers": [ ... ], "members": [ ... ] } }
/// ```
pub async fn single<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(team_id): PathParameters<Uuid>,
) -> Result<Success<Named<TeamResponse>>, Error> {
    let team = fetch_team(&storage, &team_id).await?;

    Ok(Success::ok("team", team_response(&storage, team).await?))
}

/// Manager reference in the create team form
///
/// A `managerName` can be sent along, it is ignored
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerForm {
    manager_id: Uuid,
}

/// Member reference in the create team form
///
/// A `memberName` can be sent along, it is ignored
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberForm {
    member_id: Uuid,
}

/// Create team form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamForm {
    /// Name of the team, can not be empty
    team_name: String,

    #[serde(default)]
    managers: Vec<ManagerForm>,

    #[serde(default)]
    members: Vec<MemberForm>,
}

/// Make sure every referenced user exists
async fn ensure_users<S: Storage>(
    storage: &S,
    user_ids: &[Uuid],
    not_found: &'static str,
) -> Result<(), Error> {
    let users = fetch_users_by_ids(storage, user_ids.iter().copied()).await?;

    if user_ids.iter().all(|user_id| users.contains_key(user_id)) {
        Ok(())
    } else {
        Err(Error::not_found(not_found))
    }
}

/// Create a team with its managers and members
///
/// The team and all its memberships are created at once, or not at all
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "teamName": "Crew", "managers": [ { "managerId": "<uuid>" } ], "members": [ { "memberId": "<uuid>" } ] }' \
///     http://localhost:8080/teams
/// ```
///
/// Response:
/// ```json
/// { "message": "Team created successfully", "team": { "teamId": "<uuid>" ... } }
/// ```
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    Form(form): Form<CreateTeamForm>,
) -> Result<Success<Named<TeamResponse>>, Error> {
    let name = parse_name("Team name", &form.team_name)?;

    let manager_ids = unique(form.managers.iter().map(|manager| manager.manager_id));
    let member_ids = unique(form.members.iter().map(|member| member.member_id));

    ensure_users(&storage, &manager_ids, "Manager not found").await?;
    ensure_users(&storage, &member_ids, "Member not found").await?;

    let values = CreateTeamValues {
        name: &name,
        manager_ids: &manager_ids,
        member_ids: &member_ids,
    };

    let team = storage
        .create_team(&values)
        .await
        .map_err(Error::internal_server_error)?;

    tracing::debug!(
        "Created team {} with {} manager(s) and {} member(s)",
        team.id,
        manager_ids.len(),
        member_ids.len()
    );

    Ok(Success::created(
        "Team created successfully",
        "team",
        team_response(&storage, team).await?,
    ))
}

/// Add membership form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMembershipForm {
    /// The user to add to the team
    user_id: Uuid,
}

async fn add_membership<S: Storage>(
    storage: &S,
    team_id: &Uuid,
    user_id: &Uuid,
    role: TeamRole,
) -> Result<MembershipResponse, Error> {
    let team = fetch_team(storage, team_id).await?;
    let user = fetch_user(storage, user_id, "User not found").await?;

    let membership = storage
        .create_membership(&team, &user, role)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(
            || {
                Err(Error::conflict(format!(
                    "User is already a {} of this team",
                    role.label().to_lowercase()
                )))
            },
            Ok,
        )?;

    tracing::debug!("Added {} as {} to team {}", user.username, role.label(), team.id);

    Ok(MembershipResponse::from_membership(membership, user))
}

async fn remove_membership<S: Storage>(
    storage: &S,
    team_id: &Uuid,
    user_id: &Uuid,
    role: TeamRole,
) -> Result<(), Error> {
    let team = fetch_team(storage, team_id).await?;

    let membership = storage
        .find_single_membership(&team, user_id, role)
        .await
        .map_err(Error::internal_server_error)?
        .map_or_else(
            || Err(Error::not_found(format!("{} not found in team", role.label()))),
            Ok,
        )?;

    storage
        .delete_membership(&membership, role)
        .await
        .map_err(Error::internal_server_error)?;

    tracing::debug!("Removed {} {user_id} from team {}", role.label(), team.id);

    Ok(())
}

/// Add a member to a team
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "userId": "<uuid>" }' \
///     http://localhost:8080/teams/<uuid>/members
/// ```
///
/// Response:
/// ```json
/// { "message": "Member added successfully", "member": { "id": "<uuid>", "user": { ... } ... } }
/// ```
pub async fn add_member<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(team_id): PathParameters<Uuid>,
    Form(form): Form<AddMembershipForm>,
) -> Result<Success<Named<MembershipResponse>>, Error> {
    let membership = add_membership(&storage, &team_id, &form.user_id, TeamRole::Member).await?;

    Ok(Success::created(
        "Member added successfully",
        "member",
        membership,
    ))
}

/// Remove a member from a team
///
/// Request:
/// ```sh
/// curl -v -XDELETE http://localhost:8080/teams/<uuid>/members/<uuid>
/// ```
///
/// Response:
/// ```json
/// { "message": "Member removed successfully" }
/// ```
pub async fn remove_member<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters((team_id, user_id)): PathParameters<(Uuid, Uuid)>,
) -> Result<Success<()>, Error> {
    remove_membership(&storage, &team_id, &user_id, TeamRole::Member).await?;

    Ok(Success::message("Member removed successfully"))
}

/// Add a manager to a team
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "userId": "<uuid>" }' \
///     http://localhost:8080/teams/<uuid>/managers
/// ```
///
/// Response:
/// ```json
/// { "message": "Manager added successfully", "manager": { "id": "<uuid>", "user": { ... } ... } }
/// ```
pub async fn add_manager<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(team_id): PathParameters<Uuid>,
    Form(form): Form<AddMembershipForm>,
) -> Result<Success<Named<MembershipResponse>>, Error> {
    let membership = add_membership(&storage, &team_id, &form.user_id, TeamRole::Manager).await?;

    Ok(Success::created(
        "Manager added successfully",
        "manager",
        membership,
    ))
}

/// Remove a manager from a team
///
/// Request:
/// ```sh
/// curl -v -XDELETE http://localhost:8080/teams/<uuid>/managers/<uuid>
/// ```
///
/// Response:
/// ```json
/// { "message": "Manager removed successfully" }
/// ```
pub async fn remove_manager<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters((team_id, user_id)): PathParameters<(Uuid, Uuid)>,
) -> Result<Success<()>, Error> {
    remove_membership(&storage, &team_id, &user_id, TeamRole::Manager).await?;

    Ok(Success::message("Manager removed successfully"))
}

/// Assets of all members of a team
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAssetsResponse {
    team_id: Uuid,
    assets: AssetsResponse,
}

/// All folders and notes the members of a team own or have been granted access to
///
/// Managers of the team are not taken into account
///
/// Request:
/// ```sh
/// curl -v http://localhost:8080/teams/<uuid>/assets
/// ```
///
/// Response:
/// ```json
/// { "teamId": "<uuid>", "assets": { "folders": [ { "accessType": "owner" ... } ], "notes": [] } }
/// ```
pub async fn assets<S: Storage>(
    Extension(storage): Extension<S>,
    PathParameters(team_id): PathParameters<Uuid>,
) -> Result<Success<TeamAssetsResponse>, Error> {
    let team = fetch_team(&storage, &team_id).await?;

    let assets = resolve_for_team(&storage, &team)
        .await
        .map_err(Error::internal_server_error)?;

    let assets = AssetsResponse::from_assets(&storage, assets).await?;

    Ok(Success::fields(TeamAssetsResponse {
        team_id: team.id,
        assets,
    }))
}
