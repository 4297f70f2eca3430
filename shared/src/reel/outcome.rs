use std::cell::RefCell;

use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::prize::{Prize, PrizeCatalog, WonGift};
use crate::reel::error::ReelError;

/// Who decides the winning prize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeMode {
    /// The backend's answer is authoritative; geometry is only a cross-check.
    Server,
    /// No backend. The prize the pointer visually lands on is authoritative.
    LocalFallback,
}

/// Authoritative result of one spin.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinOutcome {
    pub prize: Prize,
    pub attempts_left: u32,
    /// Catalog position as the source saw it, when the source knows it.
    pub index_hint: Option<usize>,
}

impl SpinOutcome {
    /// Stand-in catalog index when the outcome's prize is missing from the
    /// local catalog.
    pub fn fallback_index(&self, catalog_len: usize) -> usize {
        let hint = self.index_hint.unwrap_or_else(|| {
            self.prize
                .name
                .bytes()
                .fold(self.prize.value as usize, |acc, b| {
                    acc.wrapping_mul(31).wrapping_add(b as usize)
                })
        });
        hint % catalog_len.max(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStatus {
    pub attempts_left: u32,
    pub gifts: Vec<WonGift>,
}

/// Strategy interface over the server and the offline outcome sources.
pub trait OutcomeSource {
    fn mode(&self) -> OutcomeMode;

    /// Idempotent; must run once before the first `status`.
    fn announce(&self, user_id: i64) -> LocalBoxFuture<'_, Result<(), ReelError>>;

    fn status(&self, user_id: i64) -> LocalBoxFuture<'_, Result<SessionStatus, ReelError>>;

    /// Produces exactly one outcome. Never retried by the caller.
    fn spin(&self, user_id: i64) -> LocalBoxFuture<'_, Result<SpinOutcome, ReelError>>;

    /// Called once per completed spin with the prize that was finally reported.
    /// Abandoned spins never reach it.
    fn settle(&self, _user_id: i64, _prize: &Prize) -> Result<(), ReelError> {
        Ok(())
    }
}

impl<T: OutcomeSource + ?Sized> OutcomeSource for Box<T> {
    fn mode(&self) -> OutcomeMode {
        (**self).mode()
    }

    fn announce(&self, user_id: i64) -> LocalBoxFuture<'_, Result<(), ReelError>> {
        (**self).announce(user_id)
    }

    fn status(&self, user_id: i64) -> LocalBoxFuture<'_, Result<SessionStatus, ReelError>> {
        (**self).status(user_id)
    }

    fn spin(&self, user_id: i64) -> LocalBoxFuture<'_, Result<SpinOutcome, ReelError>> {
        (**self).spin(user_id)
    }

    fn settle(&self, user_id: i64, prize: &Prize) -> Result<(), ReelError> {
        (**self).settle(user_id, prize)
    }
}

/// What the offline source keeps in durable storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalRecord {
    pub attempts_used: u32,
    #[serde(default)]
    pub gifts: Vec<WonGift>,
}

/// Durable key-value storage the offline source persists into.
pub trait AttemptStore {
    /// A missing or unreadable record loads as the default.
    fn load(&self) -> LocalRecord;
    fn save(&self, record: &LocalRecord) -> Result<(), ReelError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    record: RefCell<LocalRecord>,
}

impl MemoryStore {
    pub fn new(record: LocalRecord) -> Self {
        Self {
            record: RefCell::new(record),
        }
    }
}

impl AttemptStore for MemoryStore {
    fn load(&self) -> LocalRecord {
        self.record.borrow().clone()
    }

    fn save(&self, record: &LocalRecord) -> Result<(), ReelError> {
        *self.record.borrow_mut() = record.clone();
        Ok(())
    }
}

/// Offline outcome source: a capped local counter and a uniform draw. The
/// attempt is only written off in `settle`, once the spin has been shown.
pub struct LocalFallbackOutcomeSource<S, R = StdRng> {
    catalog: PrizeCatalog,
    store: S,
    max_attempts: u32,
    rng: RefCell<R>,
}

impl<S: AttemptStore> LocalFallbackOutcomeSource<S, StdRng> {
    pub fn new(catalog: PrizeCatalog, store: S, max_attempts: u32) -> Self {
        Self::with_rng(catalog, store, max_attempts, StdRng::from_entropy())
    }
}

impl<S: AttemptStore, R: Rng> LocalFallbackOutcomeSource<S, R> {
    pub fn with_rng(catalog: PrizeCatalog, store: S, max_attempts: u32, rng: R) -> Self {
        Self {
            catalog,
            store,
            max_attempts,
            rng: RefCell::new(rng),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn attempts_left(&self, record: &LocalRecord) -> u32 {
        self.max_attempts.saturating_sub(record.attempts_used)
    }

    fn draw(&self) -> Result<SpinOutcome, ReelError> {
        let left = self.attempts_left(&self.store.load());
        if left == 0 {
            return Err(ReelError::OutcomeFetchFailed(
                crate::constants::NO_ATTEMPTS_ERROR.to_string(),
            ));
        }

        let index = self.rng.borrow_mut().gen_range(0..self.catalog.len());
        let prize = self
            .catalog
            .get(index)
            .cloned()
            .ok_or(ReelError::IndexOutOfRange {
                index,
                len: self.catalog.len(),
            })?;

        log::debug!("local draw picked `{}` at index {}", prize.name, index);

        Ok(SpinOutcome {
            prize,
            attempts_left: left - 1,
            index_hint: Some(index),
        })
    }
}

impl<S: AttemptStore, R: Rng> OutcomeSource for LocalFallbackOutcomeSource<S, R> {
    fn mode(&self) -> OutcomeMode {
        OutcomeMode::LocalFallback
    }

    fn announce(&self, _user_id: i64) -> LocalBoxFuture<'_, Result<(), ReelError>> {
        future::ready(Ok(())).boxed_local()
    }

    fn status(&self, _user_id: i64) -> LocalBoxFuture<'_, Result<SessionStatus, ReelError>> {
        let record = self.store.load();
        let status = SessionStatus {
            attempts_left: self.attempts_left(&record),
            gifts: record.gifts,
        };
        future::ready(Ok(status)).boxed_local()
    }

    fn spin(&self, _user_id: i64) -> LocalBoxFuture<'_, Result<SpinOutcome, ReelError>> {
        future::ready(self.draw()).boxed_local()
    }

    fn settle(&self, _user_id: i64, prize: &Prize) -> Result<(), ReelError> {
        let mut record = self.store.load();
        record.attempts_used += 1;
        if prize.is_win() {
            record.gifts.push(WonGift::today(prize.clone()));
        }
        self.store.save(&record)
    }
}
