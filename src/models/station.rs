use std::borrow::Cow;
use std::collections::HashMap;

use crate::utils::constants::UNKNOWN_STATION_PREFIX;

/// Station id to display name lookup. Read-only after loading.
#[derive(Debug, Clone, Default)]
pub struct StationDirectory {
    names: HashMap<u32, String>,
}

impl StationDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, station_id: u32, name: String) {
        self.names.insert(station_id, name);
    }

    /// Name for `station_id`, or `Location_<id>` when the id is unknown.
    pub fn resolve(&self, station_id: u32) -> Cow<'_, str> {
        match self.names.get(&station_id) {
            Some(name) => Cow::Borrowed(name.as_str()),
            None => Cow::Owned(format!("{}{}", UNKNOWN_STATION_PREFIX, station_id)),
        }
    }

    pub fn contains(&self, station_id: u32) -> bool {
        self.names.contains_key(&station_id)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(u32, String)> for StationDirectory {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_station() {
        let directory: StationDirectory = vec![(0, "Colombo".to_string())].into_iter().collect();
        assert_eq!(directory.resolve(0), "Colombo");
        assert!(directory.contains(0));
    }

    #[test]
    fn test_unknown_station_gets_placeholder() {
        let directory = StationDirectory::new();
        assert_eq!(directory.resolve(17), "Location_17");
        assert!(directory.is_empty());
    }
}
