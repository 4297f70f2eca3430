use shared::constants::GUEST_USER_ID;
use shared::reel::OutcomeMode;
use web_sys::{window, UrlSearchParams};

use crate::host;

pub fn get_api_base_url() -> String {
    if let Some(window) = window() {
        if let Ok(host) = window.location().host() {
            // Same origin as the page, so the widget works behind any proxy
            let protocol = window.location().protocol().unwrap_or_else(|_| "http:".to_string());
            return format!("{}//{}", protocol, host);
        }
    }

    // Default to 127.0.0.1 for development
    "http://127.0.0.1:3000".to_string()
}

pub fn get_asset_url(path: &str) -> String {
    if path.starts_with("http") {
        path.to_string()
    } else {
        format!("{}/{}", get_api_base_url(), path.trim_start_matches('/'))
    }
}

fn query_param(name: &str) -> Option<String> {
    let search = window()?.location().search().ok()?;
    UrlSearchParams::new_with_str(&search).ok()?.get(name)
}

/// Read once when the widget mounts; the mode never changes mid-session.
pub fn outcome_mode() -> OutcomeMode {
    mode_from_param(query_param("mode").as_deref())
}

pub fn mode_from_param(value: Option<&str>) -> OutcomeMode {
    match value.map(str::trim) {
        Some(mode) if mode.eq_ignore_ascii_case("local") => OutcomeMode::LocalFallback,
        _ => OutcomeMode::Server,
    }
}

pub fn parse_user_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// The chat application's init data wins over the query string. Offline
/// sessions without any identity play as the guest user.
pub fn user_id(mode: OutcomeMode) -> Option<i64> {
    let found = host::telegram_user_id()
        .or_else(|| query_param("user_id").and_then(|raw| parse_user_id(&raw)));
    resolve_identity(found, mode)
}

pub fn resolve_identity(found: Option<i64>, mode: OutcomeMode) -> Option<i64> {
    match (found, mode) {
        (Some(id), _) => Some(id),
        (None, OutcomeMode::LocalFallback) => Some(GUEST_USER_ID),
        (None, OutcomeMode::Server) => None,
    }
}
