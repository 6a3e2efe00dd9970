//! Per-user OTA opt-out setting.

use serde::{Deserialize, Serialize};

/// Governs whether a user's devices ever receive updates.
///
/// Absence of a row means the user is opted in; an explicit
/// `ota_enabled = false` is an absolute veto.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOtaSetting {
    pub user_id: String,
    pub ota_enabled: bool,
}
