//! Mock places services.

use std::cell::{Cell, RefCell};

use trip_map::error::SearchError;
use trip_map::geo::GeoPoint;
use trip_map::places::Suggestion;
use trip_map::traits::PlacesSearch;

/// Answers every query with one suggestion per word and counts calls.
#[derive(Default)]
pub struct CountingPlaces {
    pub calls: Cell<usize>,
    pub queries: RefCell<Vec<String>>,
}

impl CountingPlaces {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl PlacesSearch for CountingPlaces {
    fn search(&self, query: &str) -> Result<Vec<Suggestion>, SearchError> {
        self.calls.set(self.calls.get() + 1);
        self.queries.borrow_mut().push(query.to_string());
        Ok(query
            .split_whitespace()
            .enumerate()
            .map(|(i, word)| Suggestion {
                id: format!("{query}-{i}"),
                label: format!("{word}, Las Vegas, NV, USA"),
                position: GeoPoint::new(36.1 + i as f64 * 0.01, -115.17),
            })
            .collect())
    }
}

/// Always fails with the given status.
pub struct FailingPlaces(pub u16);

impl PlacesSearch for FailingPlaces {
    fn search(&self, _query: &str) -> Result<Vec<Suggestion>, SearchError> {
        Err(SearchError::Status(self.0))
    }
}
