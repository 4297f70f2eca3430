pub const ANNOUNCE_ENDPOINT: &str = "/api/user";
pub const USER_STATUS_ENDPOINT: &str = "/api/get_user_status";
pub const SPIN_ENDPOINT: &str = "/api/spin";
pub const PRIZES_ENDPOINT: &str = "/api/prizes";
pub const ADMIN_ADD_ATTEMPT_ENDPOINT: &str = "/api/admin/add_attempt";
pub const ADMIN_USER_DATA_ENDPOINT: &str = "/api/admin/user_data";

pub const NO_ATTEMPTS_ERROR: &str = "No attempts left";
pub const USER_ID_REQUIRED_ERROR: &str = "user_id is required";
pub const INVALID_DATA_ERROR: &str = "Invalid data";
pub const UNKNOWN_SERVER_ERROR: &str = "Server error";

/// Full catalog traversals before the winning cell. Never below `MIN_ROUNDS`.
pub const DEFAULT_ROUNDS: usize = 5;
pub const MIN_ROUNDS: usize = 3;
/// Padding cells appended after the viewport so the strip never shows a gap.
pub const REEL_TAIL_PADDING: usize = 2;

/// Used only until a real cell has been rendered and measured.
pub const FALLBACK_CELL_WIDTH: f64 = 100.0;

pub const SPIN_DURATION_MS: u32 = 5000;
/// Extra wait past `SPIN_DURATION_MS` before giving up on the transition event.
pub const SPIN_COMPLETION_GRACE_MS: u32 = 1500;
pub const SPIN_EASING: &str = "cubic-bezier(0.2, 0.8, 0.2, 1)";

pub const LOCAL_MAX_ATTEMPTS: u32 = 2;
pub const LOCAL_STORAGE_KEY: &str = "prize_reel_state";
pub const GUEST_USER_ID: i64 = 1;

pub const GIFT_DATE_FORMAT: &str = "%d.%m.%Y";
