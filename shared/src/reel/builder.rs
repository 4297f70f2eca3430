use crate::constants::{DEFAULT_ROUNDS, MIN_ROUNDS, REEL_TAIL_PADDING};
use crate::prize::{Prize, PrizeCatalog};
use crate::reel::error::ReelError;

/// The concrete strip of cells for one spin and where the winner sits in it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReelLayout {
    pub sequence: Vec<Prize>,
    pub step_index: usize,
}

impl ReelLayout {
    pub fn winning_cell(&self) -> &Prize {
        &self.sequence[self.step_index]
    }
}

/// Lays the catalog out `rounds` times so the winner lands after a long spin.
/// Deterministic: the same inputs always give the same layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReelBuilder {
    rounds: usize,
}

impl Default for ReelBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_ROUNDS)
    }
}

impl ReelBuilder {
    pub fn new(rounds: usize) -> Self {
        Self {
            rounds: rounds.max(MIN_ROUNDS),
        }
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn step_index(&self, catalog_len: usize, winning_index: usize) -> usize {
        self.rounds * catalog_len + winning_index
    }

    pub fn build(
        &self,
        catalog: &PrizeCatalog,
        winning_index: usize,
        visible_count: usize,
    ) -> Result<ReelLayout, ReelError> {
        let len = catalog.len();
        if winning_index >= len {
            return Err(ReelError::IndexOutOfRange {
                index: winning_index,
                len,
            });
        }

        let step_index = self.step_index(len, winning_index);
        let total = step_index + visible_count + REEL_TAIL_PADDING;
        let prizes = catalog.as_slice();
        let sequence = prizes.iter().cycle().take(total).cloned().collect();

        Ok(ReelLayout {
            sequence,
            step_index,
        })
    }

    /// The resting strip shown before the first spin.
    pub fn idle(catalog: &PrizeCatalog, visible_count: usize) -> ReelLayout {
        let layout = ReelBuilder::new(MIN_ROUNDS).build(catalog, 0, visible_count);
        // Index 0 exists in every constructed catalog.
        layout.unwrap_or_else(|_| ReelLayout {
            sequence: Vec::new(),
            step_index: 0,
        })
    }
}
