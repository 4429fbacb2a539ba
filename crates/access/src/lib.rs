//! Granting write access on a shared file to another team member.
//!
//! A grant request passes an ordered chain of checks: required fields,
//! team membership of the grantee, then ownership of the requester. The
//! first failing check decides the response.

pub mod store;

pub use store::{
    FileStore, InMemoryFileStore, InMemoryTeamDirectory, StoreError, Team, TeamDirectory,
};

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

/// Body of a grant request. Every field is optional on the wire; presence
/// is checked by the chain.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WriteAccessRequest {
    pub team_id: Option<String>,
    /// The requester.
    pub email: Option<String>,
    /// The member receiving write access.
    pub member_email: Option<String>,
    pub file_id: Option<String>,
    /// Writers the file currently has, as seen by the client.
    pub written_by: Vec<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessDenied {
    #[error("Parameters missing!!")]
    MissingFields(Vec<&'static str>),
    #[error("User is not member of the team")]
    NotTeamMember,
    #[error("Only owner can make changes!!")]
    NotTeamOwner,
}

impl AccessDenied {
    pub fn status(&self) -> u16 {
        match self {
            AccessDenied::MissingFields(_) => 401,
            AccessDenied::NotTeamMember | AccessDenied::NotTeamOwner => 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Granted { written_by: Vec<String> },
    Denied(AccessDenied),
}

impl AccessDecision {
    pub fn status(&self) -> u16 {
        match self {
            AccessDecision::Granted { .. } => 200,
            AccessDecision::Denied(denied) => denied.status(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            AccessDecision::Granted { .. } => "Changed to Public!!".to_string(),
            AccessDecision::Denied(denied) => denied.to_string(),
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted { .. })
    }
}

/// A request whose required fields are all present.
#[derive(Debug, Clone, Copy)]
struct CheckedRequest<'a> {
    team_id: &'a str,
    email: &'a str,
    member_email: &'a str,
    file_id: &'a str,
}

type TeamRule = fn(&CheckedRequest<'_>, &Team) -> Result<(), AccessDenied>;

const TEAM_RULES: [(&str, TeamRule); 2] = [
    ("membership", check_membership),
    ("ownership", check_ownership),
];

fn check_required(request: &WriteAccessRequest) -> Result<CheckedRequest<'_>, AccessDenied> {
    fn present(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|v| !v.is_empty())
    }

    let fields = [
        ("teamId", present(&request.team_id)),
        ("memberEmail", present(&request.member_email)),
        ("email", present(&request.email)),
        ("fileId", present(&request.file_id)),
    ];
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();

    match fields {
        [(_, Some(team_id)), (_, Some(member_email)), (_, Some(email)), (_, Some(file_id))] => {
            Ok(CheckedRequest {
                team_id,
                email,
                member_email,
                file_id,
            })
        }
        _ => Err(AccessDenied::MissingFields(missing)),
    }
}

fn check_membership(request: &CheckedRequest<'_>, team: &Team) -> Result<(), AccessDenied> {
    if team.has_member(request.member_email) {
        Ok(())
    } else {
        Err(AccessDenied::NotTeamMember)
    }
}

fn check_ownership(request: &CheckedRequest<'_>, team: &Team) -> Result<(), AccessDenied> {
    if team.created_by == request.email {
        Ok(())
    } else {
        Err(AccessDenied::NotTeamOwner)
    }
}

/// Runs the chain and, when every check passes, appends the grantee to the
/// file's writers.
///
/// Denials are returned as decisions; failures of the stores are errors.
pub fn grant_write_access(
    request: &WriteAccessRequest,
    teams: &impl TeamDirectory,
    files: &impl FileStore,
) -> Result<AccessDecision, StoreError> {
    let checked = match check_required(request) {
        Ok(checked) => checked,
        Err(denied) => {
            debug!("Write grant rejected: {denied:?}");
            return Ok(AccessDecision::Denied(denied));
        }
    };

    let team = teams.team(checked.team_id)?;
    for (name, rule) in TEAM_RULES {
        if let Err(denied) = rule(&checked, &team) {
            debug!("Write grant on '{}' failed the {name} check", checked.file_id);
            return Ok(AccessDecision::Denied(denied));
        }
    }

    let mut written_by = request.written_by.clone();
    written_by.push(checked.member_email.to_string());
    files.update_written_by(checked.file_id, written_by.clone())?;
    info!(
        "Granted write access on '{}' to '{}'",
        checked.file_id, checked.member_email
    );
    Ok(AccessDecision::Granted { written_by })
}
