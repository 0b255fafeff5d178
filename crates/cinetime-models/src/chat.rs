use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::media::MediaKind;

/// A candidate title suggested by the assistant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default)]
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

/// In-memory conversation entry; never persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub author: Author,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommendations: Vec<Recommendation>,
}

impl ChatMessage {
    pub fn user(id: u64, content: impl Into<String>) -> Self {
        Self {
            id,
            author: Author::User,
            content: content.into(),
            timestamp: Utc::now(),
            recommendations: Vec::new(),
        }
    }

    pub fn assistant(id: u64, content: impl Into<String>, recommendations: Vec<Recommendation>) -> Self {
        Self {
            id,
            author: Author::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            recommendations,
        }
    }
}

/// Response of `POST /ai/chat`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Vec<Recommendation>,
}
