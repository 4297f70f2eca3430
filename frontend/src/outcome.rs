use futures::future::LocalBoxFuture;
use futures::FutureExt;
use gloo::net::http::{Request, Response};
use gloo::storage::errors::StorageError;
use gloo::storage::{LocalStorage, Storage};
use serde::de::DeserializeOwned;
use shared::api::{ErrorResponse, SpinResponse, UserRequest, UserStatusResponse};
use shared::constants::{
    ANNOUNCE_ENDPOINT, LOCAL_MAX_ATTEMPTS, LOCAL_STORAGE_KEY, SPIN_ENDPOINT, UNKNOWN_SERVER_ERROR,
    USER_ID_REQUIRED_ERROR, USER_STATUS_ENDPOINT,
};
use shared::reel::{
    AttemptStore, LocalFallbackOutcomeSource, LocalRecord, OutcomeMode, OutcomeSource,
    SessionStatus, SpinOutcome,
};
use shared::{PrizeCatalog, ReelError};

use crate::config::get_api_base_url;

/// Turns a non-2xx answer into the engine's error kinds. A rejected identity
/// is fatal to the session, everything else is a recoverable fetch failure.
pub fn server_error(status: u16, message: String) -> ReelError {
    if status == 400 && message == USER_ID_REQUIRED_ERROR {
        ReelError::InvalidUser(message)
    } else {
        ReelError::OutcomeFetchFailed(message)
    }
}

fn network_error(e: gloo::net::Error) -> ReelError {
    ReelError::OutcomeFetchFailed(format!("Network error: {}", e))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ReelError> {
    if response.ok() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ReelError::OutcomeFetchFailed(format!("Malformed response: {}", e)));
    }

    let status = response.status();
    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => format!("{} ({})", UNKNOWN_SERVER_ERROR, status),
    };
    Err(server_error(status, message))
}

/// The backend is authoritative for attempts and prizes.
pub struct ServerOutcomeSource {
    base_url: String,
}

impl ServerOutcomeSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(url: String, user_id: i64) -> Result<Response, ReelError> {
        Request::post(&url)
            .json(&UserRequest { user_id })
            .map_err(network_error)?
            .send()
            .await
            .map_err(network_error)
    }
}

impl OutcomeSource for ServerOutcomeSource {
    fn mode(&self) -> OutcomeMode {
        OutcomeMode::Server
    }

    fn announce(&self, user_id: i64) -> LocalBoxFuture<'_, Result<(), ReelError>> {
        let url = self.url(ANNOUNCE_ENDPOINT);
        async move {
            let response = Self::post(url, user_id).await?;
            let _: serde_json::Value = read_json(response).await?;
            Ok(())
        }
        .boxed_local()
    }

    fn status(&self, user_id: i64) -> LocalBoxFuture<'_, Result<SessionStatus, ReelError>> {
        let url = format!("{}?user_id={}", self.url(USER_STATUS_ENDPOINT), user_id);
        async move {
            let response = Request::get(&url).send().await.map_err(network_error)?;
            let body: UserStatusResponse = read_json(response).await?;
            Ok(SessionStatus {
                attempts_left: body.attempts_left,
                gifts: body.gifts,
            })
        }
        .boxed_local()
    }

    fn spin(&self, user_id: i64) -> LocalBoxFuture<'_, Result<SpinOutcome, ReelError>> {
        let url = self.url(SPIN_ENDPOINT);
        async move {
            let response = Self::post(url, user_id).await?;
            let body: SpinResponse = read_json(response).await?;
            Ok(SpinOutcome {
                prize: body.won_prize,
                attempts_left: body.attempts_left,
                index_hint: body.prize_index,
            })
        }
        .boxed_local()
    }
}

/// Offline attempt counter kept in `localStorage`.
pub struct BrowserStore {
    key: String,
}

impl BrowserStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for BrowserStore {
    fn default() -> Self {
        Self::new(LOCAL_STORAGE_KEY)
    }
}

impl AttemptStore for BrowserStore {
    fn load(&self) -> LocalRecord {
        match LocalStorage::get::<LocalRecord>(&self.key) {
            Ok(record) => record,
            Err(StorageError::KeyNotFound(_)) => LocalRecord::default(),
            Err(e) => {
                log::warn!("discarding unreadable local reel state: {}", e);
                LocalRecord::default()
            }
        }
    }

    fn save(&self, record: &LocalRecord) -> Result<(), ReelError> {
        LocalStorage::set(&self.key, record).map_err(|e| ReelError::Storage(e.to_string()))
    }
}

/// Picks the strategy once per session.
pub fn outcome_source(mode: OutcomeMode, catalog: &PrizeCatalog) -> Box<dyn OutcomeSource> {
    match mode {
        OutcomeMode::Server => Box::new(ServerOutcomeSource::new(get_api_base_url())),
        OutcomeMode::LocalFallback => Box::new(LocalFallbackOutcomeSource::new(
            catalog.clone(),
            BrowserStore::default(),
            LOCAL_MAX_ATTEMPTS,
        )),
    }
}
