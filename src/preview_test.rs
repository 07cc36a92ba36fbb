/// Tests for preview and download
#[cfg(test)]
mod tests {
    use crate::preview::*;
    use crate::session::CompletedExport;
    use crate::tabular::{TabularResult, parse};
    use std::fs;

    fn result_with_rows(n: usize) -> TabularResult {
        TabularResult {
            header: vec!["id".to_string(), "value".to_string()],
            rows: (0..n).map(|i| vec![i.to_string(), format!("v{}", i)]).collect(),
        }
    }

    #[test]
    fn test_preview_is_bounded() {
        let result = result_with_rows(1000);
        let preview = Preview::new(&result);
        assert_eq!(preview.count(), 250);
        assert_eq!(preview.rows().len(), 250);
        assert_eq!(preview.total_rows(), 1000);
        assert!(preview.is_truncated());
        assert_eq!(preview.rows()[249][0], "249");
        assert_eq!(preview.caption(), "Previewing 250 Records");
    }

    #[test]
    fn test_small_preview_shows_everything() {
        let result = result_with_rows(10);
        let preview = Preview::new(&result);
        assert_eq!(preview.count(), 10);
        assert_eq!(preview.rows().len(), 10);
        assert!(!preview.is_truncated());
        assert_eq!(preview.header(), &result.header[..]);
    }

    #[test]
    fn test_preview_of_empty_result() {
        let result = TabularResult::default();
        let preview = Preview::new(&result);
        assert_eq!(preview.count(), 0);
        assert!(preview.header().is_empty());
        assert_eq!(preview.caption(), "Previewing 0 Records");
    }

    #[test]
    fn test_preview_json() {
        let result = result_with_rows(300);
        let value = Preview::new(&result).to_json("weather");
        assert_eq!(value["name"], "weather");
        assert_eq!(value["total_rows"], 300);
        assert_eq!(value["preview_rows"], 250);
        assert_eq!(value["rows"].as_array().unwrap().len(), 250);
    }

    #[test]
    fn test_serialize_round_trip() {
        let text = "date,temperature,name\n2025-01-01,3.5,Oslo\n2025-01-02,-1.0,Bergen";
        assert_eq!(serialize(&parse(text)), text);

        // Trailing and interior blank lines are normalized away
        assert_eq!(serialize(&parse("a,b\n1,2\n\n3,4\n")), "a,b\n1,2\n3,4");
    }

    #[test]
    fn test_serialize_keeps_ragged_rows() {
        assert_eq!(serialize(&parse("a,b\n1\n2,3,4")), "a,b\n1\n2,3,4");
        assert_eq!(serialize(&TabularResult::default()), "");
    }

    #[test]
    fn test_serialize_includes_rows_beyond_preview() {
        let result = result_with_rows(400);
        let text = serialize(&result);
        assert_eq!(text.lines().count(), 401);
        assert!(text.ends_with("399,v399"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("weather_export"), "weather_export.csv");
        assert_eq!(file_name("../etc/passwd"), ".._etc_passwd.csv");
        assert_eq!(file_name("  "), "unknown.csv");
        assert_eq!(file_name(".."), "unknown.csv");
    }

    #[test]
    fn test_save_csv_writes_full_result() {
        let dir = tempfile::tempdir().unwrap();
        let export = CompletedExport { display_name: "weather".to_string(), result: result_with_rows(300) };

        let path = save_csv(&export, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("weather.csv"));
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 301);
        assert_eq!(parse(&written), export.result);
    }

    #[test]
    fn test_repeated_saves_leave_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let export = CompletedExport { display_name: "weather".to_string(), result: result_with_rows(3) };

        for _ in 0..3 {
            save_csv(&export, dir.path()).unwrap();
        }
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "Only the final file should remain");
    }

    #[test]
    fn test_save_csv_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("today");
        let export = CompletedExport { display_name: "x".to_string(), result: parse("a\n1") };
        let path = save_csv(&export, &nested).unwrap();
        assert!(path.exists());
    }
}
