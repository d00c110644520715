use crate::Pokemon;
use serde::{Deserialize, Serialize};

/// Fixed number of records per listing page.
pub const PAGE_SIZE: u64 = 20;

/// Largest skip a document store will accept as a signed 64-bit offset.
const MAX_SKIP: u64 = i64::MAX as u64;

/// A requested listing page, always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
}

impl PageRequest {
    pub fn new(page: u64) -> Self {
        Self { page: page.max(1) }
    }

    /// Coerce a raw `page` query value. Anything that is not a positive
    /// integer selects the first page.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse::<u64>().ok())
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(PAGE_SIZE).min(MAX_SKIP)
    }

    pub fn limit(&self) -> u64 {
        PAGE_SIZE
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1 }
    }
}

pub fn total_pages(total: u64) -> u64 {
    total.div_ceil(PAGE_SIZE)
}

/// One page of the listing, as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonPage {
    pub pokemons: Vec<Pokemon>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_pokemons: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_falls_back_to_first_page() {
        for raw in [None, Some(""), Some("abc"), Some("0"), Some("-3"), Some("1.5")] {
            assert_eq!(PageRequest::parse(raw), PageRequest::default(), "{raw:?}");
        }
        assert_eq!(PageRequest::parse(Some("4")).page(), 4);
        assert_eq!(PageRequest::parse(Some(" 2 ")).page(), 2);
    }

    #[test]
    fn window_matches_page_size() {
        assert_eq!(PageRequest::new(1).skip(), 0);
        assert_eq!(PageRequest::new(3).skip(), 40);
        assert_eq!(PageRequest::new(3).limit(), PAGE_SIZE);
        assert_eq!(PageRequest::new(u64::MAX).skip(), MAX_SKIP);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(20), 1);
        assert_eq!(total_pages(21), 2);
        assert_eq!(total_pages(809), 41);
    }

    #[test]
    fn page_serializes_camel_case() {
        let page = PokemonPage {
            pokemons: Vec::new(),
            current_page: 2,
            total_pages: 3,
            total_pokemons: 45,
        };
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            serde_json::json!({
                "pokemons": [],
                "currentPage": 2,
                "totalPages": 3,
                "totalPokemons": 45
            })
        );
    }
}
