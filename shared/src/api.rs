use serde::{Deserialize, Serialize};

use crate::prize::{Prize, WonGift};

// === API Types ===

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserRequest {
    pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnnounceResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserStatusQuery {
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UserStatusResponse {
    pub attempts_left: u32,
    #[serde(default)]
    pub gifts: Vec<WonGift>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpinResponse {
    pub won_prize: Prize,
    pub attempts_left: u32,
    /// Catalog position of `won_prize` on the server side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize_index: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddAttemptRequest {
    pub user_id: i64,
    pub admin_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddAttemptResponse {
    pub success: bool,
    pub attempts: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminQuery {
    pub admin_id: Option<i64>,
}

/// The one message sent to the embedding application after each spin.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct HostMessage {
    pub prize: Prize,
}

impl From<Prize> for HostMessage {
    fn from(prize: Prize) -> Self {
        Self { prize }
    }
}
