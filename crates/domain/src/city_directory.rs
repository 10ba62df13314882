//! Static city directory
//!
//! The known-city table with coordinates, used for suggestions and for
//! resolving a typed name to the coordinates a weather request needs.
//! Lookup is case-insensitive; declaration order is the ranking.

use crate::value_objects::GeoLocation;

/// Builtin city table, declaration order preserved
const BUILTIN: &[(&str, f64, f64)] = &[
    ("Astana", 51.1694, 71.4491),
    ("Almaty", 43.2389, 76.8897),
    ("Shymkent", 42.3417, 69.5901),
    ("Karaganda", 49.8333, 73.1652),
    ("Aktobe", 50.2833, 57.1667),
    ("Taraz", 42.9000, 71.3667),
    ("Pavlodar", 52.3000, 76.9500),
    ("Semey", 50.4112, 80.2273),
    ("Atyrau", 47.1167, 51.8833),
    ("London", 51.5074, -0.1278),
    ("New York", 40.7128, -74.0060),
    ("Paris", 48.8566, 2.3522),
    ("Tokyo", 35.6762, 139.6503),
    ("Dubai", 25.2048, 55.2708),
    ("Singapore", 1.3521, 103.8198),
    ("Sydney", -33.8688, 151.2093),
    ("Toronto", 43.6532, -79.3832),
    ("Berlin", 52.5200, 13.4050),
    ("Moscow", 55.7558, 37.6173),
    ("Rome", 41.9028, 12.4964),
    ("Madrid", 40.4168, -3.7038),
    ("Amsterdam", 52.3676, 4.9041),
    ("Vienna", 48.2082, 16.3738),
    ("Prague", 50.0755, 14.4378),
    ("Warsaw", 52.2297, 21.0122),
    ("Istanbul", 41.0082, 28.9784),
    ("Athens", 37.9838, 23.7275),
    ("Beijing", 39.9042, 116.4074),
    ("Shanghai", 31.2304, 121.4737),
    ("Seoul", 37.5665, 126.9780),
    ("Bangkok", 13.7563, 100.5018),
    ("Mumbai", 19.0760, 72.8777),
    ("Delhi", 28.7041, 77.1025),
    ("Jakarta", -6.2088, 106.8456),
    ("Manila", 14.5995, 120.9842),
    ("Los Angeles", 34.0522, -118.2437),
    ("Chicago", 41.8781, -87.6298),
    ("Miami", 25.7617, -80.1918),
    ("Vancouver", 49.2827, -123.1207),
    ("Mexico City", 19.4326, -99.1332),
    ("São Paulo", -23.5505, -46.6333),
    ("Buenos Aires", -34.6037, -58.3816),
    ("Lima", -12.0464, -77.0428),
    ("Cairo", 30.0444, 31.2357),
    ("Riyadh", 24.7136, 46.6753),
    ("Tel Aviv", 32.0853, 34.7818),
    ("Nairobi", -1.2921, 36.8219),
    ("Cape Town", -33.9249, 18.4241),
    ("Johannesburg", -26.2041, 28.0473),
    ("Casablanca", 33.5731, -7.5898),
    ("Doha", 25.2854, 51.5310),
];

/// Cities suggested when the input is empty
const FEATURED: &[&str] = &["Astana", "Almaty", "London", "New York", "Tokyo", "Paris"];

/// A directory entry: a city name with its coordinates
#[derive(Debug, Clone)]
pub struct CityEntry {
    name: String,
    location: GeoLocation,
}

impl CityEntry {
    /// Create an entry from a name and unchecked coordinates
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            location: GeoLocation::new_unchecked(latitude, longitude),
        }
    }

    /// Get the city name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the coordinates
    #[must_use]
    pub const fn location(&self) -> GeoLocation {
        self.location
    }
}

/// The city directory
///
/// Duplicate names are a configuration error: `resolve` takes the first
/// match and nothing deduplicates at runtime.
#[derive(Debug, Clone)]
pub struct CityDirectory {
    entries: Vec<CityEntry>,
}

impl CityDirectory {
    /// Directory over the builtin city table
    #[must_use]
    pub fn builtin() -> Self {
        Self::with_entries(
            BUILTIN
                .iter()
                .map(|&(name, lat, lon)| CityEntry::new(name, lat, lon))
                .collect(),
        )
    }

    /// Directory over a custom entry list (tests, alternative tables)
    #[must_use]
    pub const fn with_entries(entries: Vec<CityEntry>) -> Self {
        Self { entries }
    }

    /// Suggest city names for a partial input
    ///
    /// Empty input yields the featured subset in directory order. Otherwise
    /// prefix matches win; when there are none, substring matches are the
    /// fallback. Matching is case-insensitive and the input is trimmed.
    #[must_use]
    pub fn suggest(&self, input: &str) -> Vec<&str> {
        let query = input.trim().to_lowercase();

        if query.is_empty() {
            return self
                .entries
                .iter()
                .filter(|e| FEATURED.contains(&e.name()))
                .map(CityEntry::name)
                .collect();
        }

        let prefix_matches: Vec<&str> = self
            .entries
            .iter()
            .filter(|e| e.name().to_lowercase().starts_with(&query))
            .map(CityEntry::name)
            .collect();

        if !prefix_matches.is_empty() {
            return prefix_matches;
        }

        self.entries
            .iter()
            .filter(|e| e.name().to_lowercase().contains(&query))
            .map(CityEntry::name)
            .collect()
    }

    /// Resolve a city name to its coordinates, first match wins
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<GeoLocation> {
        let query = name.trim().to_lowercase();
        self.entries
            .iter()
            .find(|e| e.name().to_lowercase() == query)
            .map(CityEntry::location)
    }

    /// Check whether a name is in the directory
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CityDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_all_cities() {
        let directory = CityDirectory::builtin();
        assert_eq!(directory.len(), 51);
    }

    #[test]
    fn builtin_table_has_no_duplicate_names() {
        let directory = CityDirectory::builtin();
        let mut names: Vec<String> = directory
            .entries
            .iter()
            .map(|e| e.name().to_lowercase())
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), directory.len());
    }

    #[test]
    fn empty_input_yields_featured_cities_in_directory_order() {
        let directory = CityDirectory::builtin();
        assert_eq!(
            directory.suggest(""),
            vec!["Astana", "Almaty", "London", "New York", "Paris", "Tokyo"]
        );
    }

    #[test]
    fn whitespace_input_counts_as_empty() {
        let directory = CityDirectory::builtin();
        assert_eq!(directory.suggest("   "), directory.suggest(""));
    }

    #[test]
    fn prefix_match_is_case_insensitive() {
        let directory = CityDirectory::builtin();
        assert_eq!(directory.suggest("lon"), vec!["London"]);
        assert_eq!(directory.suggest("LON"), vec!["London"]);
    }

    #[test]
    fn prefix_matches_preserve_directory_order() {
        let directory = CityDirectory::builtin();
        assert_eq!(directory.suggest("a"), vec![
            "Astana",
            "Almaty",
            "Aktobe",
            "Atyrau",
            "Amsterdam",
            "Athens",
        ]);
    }

    #[test]
    fn substring_fallback_when_no_prefix_match() {
        let directory = CityDirectory::builtin();
        // No city starts with "ork"; New York contains it.
        assert_eq!(directory.suggest("ork"), vec!["New York"]);
    }

    #[test]
    fn no_match_yields_empty() {
        let directory = CityDirectory::builtin();
        assert!(directory.suggest("xyz").is_empty());
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let directory = CityDirectory::builtin();
        let lower = directory.resolve("astana").unwrap();
        let title = directory.resolve("Astana").unwrap();
        assert_eq!(lower, title);
        assert!((lower.latitude() - 51.1694).abs() < 1e-9);
        assert!((lower.longitude() - 71.4491).abs() < 1e-9);
    }

    #[test]
    fn resolve_unknown_city_is_none() {
        let directory = CityDirectory::builtin();
        assert!(directory.resolve("Atlantis").is_none());
    }

    #[test]
    fn contains_matches_resolve() {
        let directory = CityDirectory::builtin();
        assert!(directory.contains("doha"));
        assert!(!directory.contains("Atlantis"));
    }

    #[test]
    fn custom_entries_are_respected() {
        let directory = CityDirectory::with_entries(vec![
            CityEntry::new("Testville", 1.0, 2.0),
            CityEntry::new("Testburg", 3.0, 4.0),
        ]);
        assert_eq!(directory.suggest("test"), vec!["Testville", "Testburg"]);
        assert!(directory.suggest("").is_empty(), "no featured overlap");
    }
}
