//! Column catalog and user selection
//!
//! The catalog is the fixed set of columns the export service knows about.
//! Ids are namespaced as `<table>:<field>` and are unique across the catalog.

/// A single exportable column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub id: &'static str,
    pub label: &'static str,
}

impl ColumnDescriptor {
    /// Table part of the id ("weather_readings" for "weather_readings:date")
    pub fn table(&self) -> &'static str {
        self.id.split_once(':').map(|(table, _)| table).unwrap_or(self.id)
    }

    /// Field part of the id ("date" for "weather_readings:date")
    pub fn field(&self) -> &'static str {
        self.id.split_once(':').map(|(_, field)| field).unwrap_or(self.id)
    }
}

const fn col(id: &'static str, label: &'static str) -> ColumnDescriptor {
    ColumnDescriptor { id, label }
}

pub static CATALOG: &[ColumnDescriptor] = &[
    // weather_readings
    col("weather_readings:date", "Date"),
    col("weather_readings:temperature", "Temperature"),
    col("weather_readings:feels_like", "Feels Like"),
    col("weather_readings:temperature_min", "Min Temp"),
    col("weather_readings:temperature_max", "Max Temp"),
    col("weather_readings:humidity", "Humidity"),
    col("weather_readings:pressure", "Pressure"),
    col("weather_readings:wind_speed", "Wind Speed"),
    col("weather_readings:wind_deg", "Wind Degrees"),
    col("weather_readings:main", "Condition (Main)"),
    col("weather_readings:description", "Condition (Desc)"),
    // cities
    col("cities:name", "City Name"),
    col("cities:latitude", "Latitude"),
    col("cities:longitude", "Longitude"),
    // countries
    col("countries:common_name", "Country Name"),
    col("countries:iso2_code", "ISO Code (2)"),
    col("countries:iso3_code", "ISO Code (3)"),
    col("countries:region", "Region"),
    col("countries:subregion", "Subregion"),
];

/// Look up a column by its namespaced id
pub fn find(id: &str) -> Option<&'static ColumnDescriptor> {
    CATALOG.iter().find(|c| c.id == id)
}

/// Columns picked by the user, in the order they were picked
///
/// Selection is a toggle, so an id is never present twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSelection {
    ids: Vec<String>,
}

impl ColumnSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the id at the end, or remove it if already selected.
    /// Returns true if the id is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|s| s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Short label for the picker button
    pub fn summary(&self) -> String {
        if self.is_empty() { "All Columns".to_string() } else { format!("{} Selected", self.len()) }
    }
}

#[cfg(test)]
#[path = "columns_test.rs"]
mod columns_test;
