use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted daily check-in record.
///
/// Holds only the derived assessment JSON and the aggregate risk flag —
/// never the uploaded media or any reference to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood_score: u8,
    pub risk_flag: bool,
    pub analysis: serde_json::Value,
    pub created_at: jiff::Timestamp,
}
