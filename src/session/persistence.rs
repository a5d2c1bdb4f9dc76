// Saving and loading session snapshots as JSON

use crate::session::EditSession;
use crate::session::types::TimelineState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current session file format
pub const SESSION_FORMAT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported session format version {0}")]
    UnsupportedVersion(u32),
}

/// On-disk envelope around a timeline state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFile {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub state: TimelineState,
}

impl SessionFile {
    pub fn new(state: TimelineState) -> Self {
        Self {
            version: SESSION_FORMAT_VERSION,
            saved_at: Utc::now(),
            state,
        }
    }
}

pub fn session_to_json(session: &EditSession) -> Result<String, PersistenceError> {
    let file = SessionFile::new(session.state().clone());
    Ok(serde_json::to_string_pretty(&file)?)
}

pub fn session_from_json(json: &str) -> Result<EditSession, PersistenceError> {
    let file: SessionFile = serde_json::from_str(json)?;
    if file.version > SESSION_FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(file.version));
    }
    Ok(EditSession::from_state(file.state))
}

/// Write the session state; view channels and history are not persisted
pub fn save_session(session: &EditSession, path: &Path) -> Result<(), PersistenceError> {
    let json = session_to_json(session)?;
    fs::write(path, json)?;
    tracing::info!(path = %path.display(), "Session saved");
    Ok(())
}

pub fn load_session(path: &Path) -> Result<EditSession, PersistenceError> {
    let json = fs::read_to_string(path)?;
    let session = session_from_json(&json)?;
    tracing::info!(path = %path.display(), tracks = session.state().tracks.len(), "Session loaded");
    Ok(session)
}
