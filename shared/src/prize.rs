use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

use crate::reel::error::ReelError;

/// A single prize a reel cell can show.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Prize {
    pub name: String,
    #[serde(
        rename = "img",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_ref: Option<String>,
    #[serde(rename = "starPrice")]
    pub value: u32,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

impl Prize {
    pub fn new(name: impl Into<String>, image_ref: Option<&str>, value: u32) -> Self {
        Self {
            name: name.into(),
            image_ref: image_ref.map(str::to_string),
            value,
        }
    }

    /// A zero value means the cell is an empty, non-winning slot.
    pub fn is_win(&self) -> bool {
        self.value > 0
    }

    /// Outcomes travel separately from the catalog, so they are matched by
    /// name and value rather than by position.
    pub fn same_identity(&self, other: &Prize) -> bool {
        self.name == other.name && self.value == other.value
    }
}

/// A prize the user has won, as stored and reported by the status call.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WonGift {
    #[serde(flatten)]
    pub prize: Prize,
    #[serde(default)]
    pub date: Option<String>,
}

impl WonGift {
    pub fn today(prize: Prize) -> Self {
        let date = chrono::Local::now()
            .format(crate::constants::GIFT_DATE_FORMAT)
            .to_string();
        Self {
            prize,
            date: Some(date),
        }
    }
}

/// The ordered, read-only list of prizes a reel is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct PrizeCatalog {
    prizes: Vec<Prize>,
}

impl PrizeCatalog {
    pub fn new(prizes: Vec<Prize>) -> Result<Self, ReelError> {
        if prizes.is_empty() {
            return Err(ReelError::EmptyCatalog);
        }
        let mut seen = HashSet::new();
        for prize in &prizes {
            if !seen.insert(prize.name.as_str()) {
                return Err(ReelError::DuplicatePrize(prize.name.clone()));
            }
        }
        Ok(Self { prizes })
    }

    /// The catalog both the backend and the widget ship with.
    pub fn standard() -> Self {
        Self {
            prizes: vec![
                Prize::new("Nail Bracelet", Some("images/nail_bracelet.png"), 100_000),
                Prize::new("Bonded Ring", Some("images/bonded_ring.png"), 37_500),
                Prize::new("Neko Helmet", Some("images/neko_helmet.png"), 14_000),
                Prize::new("Empty", None, 0),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Prize> {
        self.prizes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prize> {
        self.prizes.iter()
    }

    pub fn as_slice(&self) -> &[Prize] {
        &self.prizes
    }

    /// Position of `prize` in the catalog, matched by name and value.
    pub fn index_of(&self, prize: &Prize) -> Result<usize, ReelError> {
        self.prizes
            .iter()
            .position(|p| p.same_identity(prize))
            .ok_or_else(|| ReelError::PrizeNotFound {
                name: prize.name.clone(),
                value: prize.value,
            })
    }

    /// Lookup by the name a rendered cell displays.
    pub fn by_name(&self, name: &str) -> Option<(usize, &Prize)> {
        self.prizes.iter().enumerate().find(|(_, p)| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_duplicate_catalogs() {
        assert_eq!(PrizeCatalog::new(vec![]), Err(ReelError::EmptyCatalog));
        let dup = vec![Prize::new("A", None, 0), Prize::new("A", None, 10)];
        assert_eq!(
            PrizeCatalog::new(dup),
            Err(ReelError::DuplicatePrize("A".to_string()))
        );
    }

    #[test]
    fn test_index_of_matches_name_and_value() {
        let catalog = PrizeCatalog::standard();
        let ring = Prize::new("Bonded Ring", None, 37_500);
        assert_eq!(catalog.index_of(&ring), Ok(1));

        let repriced = Prize::new("Bonded Ring", None, 1);
        assert!(matches!(
            catalog.index_of(&repriced),
            Err(ReelError::PrizeNotFound { .. })
        ));
    }

    #[test]
    fn test_prize_wire_format() {
        let prize: Prize =
            serde_json::from_str(r#"{"name":"Empty","starPrice":0,"img":""}"#).unwrap();
        assert_eq!(prize.image_ref, None);
        assert!(!prize.is_win());

        let json = serde_json::to_value(Prize::new("Neko Helmet", Some("images/neko_helmet.png"), 14_000)).unwrap();
        assert_eq!(json["img"], "images/neko_helmet.png");
        assert_eq!(json["starPrice"], 14_000);
    }

    #[test]
    fn test_won_gift_flattens_prize() {
        let gift: WonGift = serde_json::from_str(
            r#"{"name":"Bonded Ring","img":"images/bonded_ring.png","starPrice":37500,"date":"01.02.2025"}"#,
        )
        .unwrap();
        assert_eq!(gift.prize.name, "Bonded Ring");
        assert_eq!(gift.date.as_deref(), Some("01.02.2025"));
    }
}
