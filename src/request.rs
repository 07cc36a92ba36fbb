/// Export request construction
///
/// Turns the raw name input and the column selection into the payload sent
/// to the generation endpoint. Pure, cannot fail.
use crate::columns::ColumnSelection;
use serde_json::json;

/// Name used when the user leaves the name blank
pub const UNNAMED: &str = "unknown";

/// Column list meaning "every column"
pub const ALL_COLUMNS: &str = "*";

/// Body of the generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub name: String,
    pub columns: Vec<String>,
}

impl ExportRequest {
    /// Build a request from a raw name and the ids in selection order
    pub fn build(raw_name: &str, selected: &[String]) -> Self {
        let name = if raw_name.trim().is_empty() { UNNAMED.to_string() } else { raw_name.to_string() };
        let columns = if selected.is_empty() { vec![ALL_COLUMNS.to_string()] } else { selected.to_vec() };
        Self { name, columns }
    }

    pub fn from_selection(raw_name: &str, selection: &ColumnSelection) -> Self {
        Self::build(raw_name, selection.ids())
    }

    pub fn is_all_columns(&self) -> bool {
        self.columns.len() == 1 && self.columns[0] == ALL_COLUMNS
    }

    /// JSON body: `{ "name": ..., "columns": [...] }`
    pub fn to_json(&self) -> String {
        json!({ "name": self.name, "columns": self.columns }).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_blank_name_and_no_columns() {
        let req = ExportRequest::build("", &[]);
        assert_eq!(req.name, "unknown");
        assert_eq!(req.columns, vec!["*"]);
        assert!(req.is_all_columns());
    }

    #[test]
    fn test_whitespace_name_keeps_columns_in_order() {
        let req = ExportRequest::build("  ", &ids(&["a", "b"]));
        assert_eq!(req, ExportRequest { name: "unknown".to_string(), columns: ids(&["a", "b"]) });
        assert!(!req.is_all_columns());
    }

    #[test]
    fn test_name_is_kept_verbatim() {
        let req = ExportRequest::build("weather_export", &ids(&["cities:name"]));
        assert_eq!(req.name, "weather_export");
    }

    #[test]
    fn test_from_selection() {
        let mut selection = ColumnSelection::new();
        selection.toggle("countries:region");
        selection.toggle("cities:name");
        let req = ExportRequest::from_selection("x", &selection);
        assert_eq!(req.columns, ids(&["countries:region", "cities:name"]));
    }

    #[test]
    fn test_json_shape() {
        let req = ExportRequest::build("", &[]);
        let value: serde_json::Value = serde_json::from_str(&req.to_json()).unwrap();
        assert_eq!(value, json!({ "name": "unknown", "columns": ["*"] }));
    }
}
