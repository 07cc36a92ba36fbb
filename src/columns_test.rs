/// Tests for the column catalog and selection
#[cfg(test)]
mod tests {
    use crate::columns::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let ids: HashSet<&str> = CATALOG.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), CATALOG.len(), "Catalog ids must be unique");
        assert_eq!(CATALOG.len(), 19);
    }

    #[test]
    fn test_catalog_ids_are_namespaced() {
        for column in CATALOG {
            assert!(column.id.contains(':'), "{} is not namespaced", column.id);
            assert_eq!(format!("{}:{}", column.table(), column.field()), column.id);
            assert!(!column.field().is_empty(), "{} has no field", column.id);
            assert!(["weather_readings", "cities", "countries"].contains(&column.table()));
        }
    }

    #[test]
    fn test_find_known_and_unknown() {
        let city = find("cities:name").expect("cities:name should exist");
        assert_eq!(city.label, "City Name");
        assert_eq!(city.table(), "cities");
        assert_eq!(city.field(), "name");
        assert!(find("cities:population").is_none());
    }

    #[test]
    fn test_toggle_keeps_click_order() {
        let mut selection = ColumnSelection::new();
        assert!(selection.toggle("cities:name"));
        assert!(selection.toggle("weather_readings:date"));
        assert!(selection.toggle("countries:region"));
        assert_eq!(selection.ids(), &["cities:name", "weather_readings:date", "countries:region"]);
    }

    #[test]
    fn test_toggle_twice_removes() {
        let mut selection = ColumnSelection::new();
        selection.toggle("cities:name");
        selection.toggle("cities:latitude");
        assert!(!selection.toggle("cities:name"));
        assert!(!selection.contains("cities:name"));
        assert_eq!(selection.ids(), &["cities:latitude"]);

        // Re-adding goes to the end
        selection.toggle("cities:name");
        assert_eq!(selection.ids(), &["cities:latitude", "cities:name"]);
    }

    #[test]
    fn test_summary() {
        let mut selection = ColumnSelection::new();
        assert_eq!(selection.summary(), "All Columns");
        selection.toggle("cities:name");
        selection.toggle("cities:latitude");
        assert_eq!(selection.summary(), "2 Selected");
        assert_eq!(selection.len(), 2);
    }
}
