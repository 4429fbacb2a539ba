//! Lookups the access chain depends on.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Team not found: {0}")]
    TeamNotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    /// Email of the owner.
    pub created_by: String,
    #[serde(default)]
    pub members: Vec<String>,
}

impl Team {
    pub fn has_member(&self, email: &str) -> bool {
        self.members.iter().any(|m| m == email)
    }
}

pub trait TeamDirectory: Send + Sync + Debug {
    fn team(&self, team_id: &str) -> Result<Team, StoreError>;
}

pub trait FileStore: Send + Sync + Debug {
    /// Replaces the list of emails allowed to write to `file_id`.
    fn update_written_by(&self, file_id: &str, written_by: Vec<String>) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryTeamDirectory {
    teams: RwLock<HashMap<String, Team>>,
}

impl InMemoryTeamDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, team: Team) -> Result<(), StoreError> {
        let mut teams = self
            .teams
            .write()
            .map_err(|_| StoreError::Unavailable("team directory lock poisoned".to_string()))?;
        teams.insert(team.id.clone(), team);
        Ok(())
    }
}

impl TeamDirectory for InMemoryTeamDirectory {
    fn team(&self, team_id: &str) -> Result<Team, StoreError> {
        let teams = self
            .teams
            .read()
            .map_err(|_| StoreError::Unavailable("team directory lock poisoned".to_string()))?;
        teams
            .get(team_id)
            .cloned()
            .ok_or_else(|| StoreError::TeamNotFound(team_id.to_string()))
    }
}

/// Files and their writer lists. Updating an unknown file is an error.
#[derive(Debug, Default)]
pub struct InMemoryFileStore {
    files: RwLock<HashMap<String, Vec<String>>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, file_id: impl Into<String>, written_by: Vec<String>) -> Result<(), StoreError> {
        let mut files = self
            .files
            .write()
            .map_err(|_| StoreError::Unavailable("file store lock poisoned".to_string()))?;
        files.insert(file_id.into(), written_by);
        Ok(())
    }

    /// Returns `None` if the file is unknown or the lock is poisoned.
    pub fn written_by(&self, file_id: &str) -> Option<Vec<String>> {
        self.files.read().ok()?.get(file_id).cloned()
    }
}

impl FileStore for InMemoryFileStore {
    fn update_written_by(&self, file_id: &str, written_by: Vec<String>) -> Result<(), StoreError> {
        let mut files = self
            .files
            .write()
            .map_err(|_| StoreError::Unavailable("file store lock poisoned".to_string()))?;
        let entry = files
            .get_mut(file_id)
            .ok_or_else(|| StoreError::FileNotFound(file_id.to_string()))?;
        *entry = written_by;
        Ok(())
    }
}
