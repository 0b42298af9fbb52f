use serde::{Deserialize, Serialize};

/// Participant — a votable world entry with its aggregate like counter.
///
/// All fields map directly to SQL columns. `like_count` is a
/// denormalization of the vote rows referencing this participant; the
/// coordinator keeps it in step inside each vote transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: i64,

    /// Unique serial number assigned at submission (e.g. "W-0134").
    pub serial_number: String,

    /// Link to the submitted world's video.
    pub video_url: String,

    pub like_count: i64,

    pub created_at: String,
    pub updated_at: String,
}

/// Student — a voter identity. The password hash never serializes out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,

    /// Login credential, unique.
    pub email: String,

    /// Argon2id PHC string. Kept out of every JSON response.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

/// Vote — one (student, participant) relationship row.
/// Created on cast, deleted on retract, never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: i64,
    pub student_id: i64,
    pub participant_id: i64,
    pub created_at: String,
}

/// Request body for the vote toggle endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub participant_id: i64,
}

/// One entry of the my-votes listing — just the participant reference.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoteRef {
    pub participant_id: i64,
}
