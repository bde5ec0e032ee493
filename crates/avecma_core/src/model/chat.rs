//! Assistant conversation records.
//!
//! # Responsibility
//! - Define chat turns, therapist personas and archived chat summaries.
//!
//! # Invariants
//! - Any role other than `user` is treated as the model speaking.
//! - Archived summaries are identified by a random v4 UUID.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Speaker of one turn as understood by the generative model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    /// Maps a free-form client role; only `user` keeps the user role.
    pub fn from_client(role: &str) -> Self {
        if role == "user" {
            Self::User
        } else {
            Self::Model
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// One message of client-provided history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// Persona the assistant should speak as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Therapist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub personality: String,
}

/// Archived summary of a finished conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastChat {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl PastChat {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            summary: summary.into(),
            created_at: Utc::now(),
        }
    }
}
