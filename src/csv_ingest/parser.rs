use std::collections::HashSet;

use super::models::{CsvIngestError, ParseReport, ParsedCsvRow, RowStatus};
use crate::youtube::extract_video_id;

/// Hard ceiling on rows per upload, header included.
pub const MAX_CSV_ROWS: usize = 5000;

/// Header cell names that mark the URL source column.
const URL_HEADERS: &[&str] = &["url", "link", "video", "id"];
const TITLE_HEADERS: &[&str] = &["title", "name"];
const FOLDER_HEADERS: &[&str] = &["folder", "category"];

/// Upload gate for the file surface: `.csv` filenames, `text/csv`, or the
/// legacy Excel-CSV mimetype. Anything else is rejected before parsing.
pub fn is_accepted_csv_upload(filename: &str, content_type: Option<&str>) -> bool {
    if filename.to_lowercase().ends_with(".csv") {
        return true;
    }
    matches!(content_type, Some("text/csv") | Some("application/vnd.ms-excel"))
}

fn find_column(header: &[String], names: &[&str]) -> Option<usize> {
    header.iter().position(|cell| names.contains(&cell.as_str()))
}

fn non_empty(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse an uploaded CSV file into validated rows.
///
/// The first row is treated as a header when any of its cells names a URL
/// column (`url`, `link`, `video`, `id`); title and folder columns are then
/// looked up independently and are optional. Headerless files use column 0
/// as the URL source. Row indices are 1-based and keep counting across a
/// consumed header, so they match what the user sees in a spreadsheet.
pub fn parse_csv(data: &[u8]) -> Result<ParseReport, CsvIngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut records: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        // The reader already skips blank lines, but a line of separators
        // comes through as all-empty cells.
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        if records.len() >= MAX_CSV_ROWS {
            return Err(CsvIngestError::FileTooLarge(records.len() + 1, MAX_CSV_ROWS));
        }
        records.push(cells);
    }

    if records.is_empty() {
        return Err(CsvIngestError::EmptyFile);
    }

    let first_row: Vec<String> = records[0]
        .iter()
        .map(|c| c.trim().to_lowercase())
        .collect();

    let (has_header, url_col, title_col, folder_col) =
        match find_column(&first_row, URL_HEADERS) {
            Some(url_col) => (
                true,
                url_col,
                find_column(&first_row, TITLE_HEADERS),
                find_column(&first_row, FOLDER_HEADERS),
            ),
            None => (false, 0, None, None),
        };

    let data_rows = if has_header { &records[1..] } else { &records[..] };

    let mut rows = Vec::with_capacity(data_rows.len());
    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicates_removed = 0;

    for (index, record) in data_rows.iter().enumerate() {
        // 1-based, counting the header line if one was consumed
        let row_index = if has_header { index + 2 } else { index + 1 };

        let raw_url = match non_empty(record.get(url_col).map(String::as_str)) {
            Some(url) => url,
            None => continue, // silently skip rows with an empty URL cell
        };
        let title = title_col.and_then(|col| non_empty(record.get(col).map(String::as_str)));
        let folder = folder_col.and_then(|col| non_empty(record.get(col).map(String::as_str)));

        let row = match extract_video_id(&raw_url) {
            None => ParsedCsvRow {
                row_index,
                raw_url,
                video_id: None,
                title,
                folder,
                status: RowStatus::Invalid,
                error: Some("Could not extract a valid video ID".to_string()),
            },
            Some(video_id) if seen.contains(video_id.as_str()) => {
                duplicates_removed += 1;
                ParsedCsvRow {
                    row_index,
                    raw_url,
                    video_id: Some(video_id),
                    title,
                    folder,
                    status: RowStatus::Duplicate,
                    error: Some("Duplicate video ID".to_string()),
                }
            }
            Some(video_id) => {
                seen.insert(video_id.as_str().to_string());
                ParsedCsvRow {
                    row_index,
                    raw_url,
                    video_id: Some(video_id),
                    title,
                    folder,
                    status: RowStatus::Valid,
                    error: None,
                }
            }
        };
        rows.push(row);
    }

    let valid_count = rows.iter().filter(|r| r.status == RowStatus::Valid).count();
    let invalid_count = rows.iter().filter(|r| r.status == RowStatus::Invalid).count();

    Ok(ParseReport {
        raw_count: data_rows.len(),
        rows,
        duplicates_removed,
        valid_count,
        invalid_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID_A: &str = "dQw4w9WgXcQ";
    const ID_B: &str = "9bZkp7q19f0";
    const ID_C: &str = "kJQP7kiw5Fk";

    #[test]
    fn test_headered_file_with_distinct_urls() {
        let data = format!(
            "url,title,folder\n\
             https://youtu.be/{},First,\n\
             https://www.youtube.com/watch?v={},Second,Music\n\
             https://www.youtube.com/shorts/{},Third,Music\n",
            ID_A, ID_B, ID_C
        );
        let report = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(report.valid_count, 3);
        assert_eq!(report.invalid_count, 0);
        assert_eq!(report.duplicates_removed, 0);
        assert_eq!(report.raw_count, 3);
        // Row indices account for the header and strictly increase
        let indices: Vec<usize> = report.rows.iter().map(|r| r.row_index).collect();
        assert_eq!(indices, vec![2, 3, 4]);
        assert_eq!(report.rows[1].title.as_deref(), Some("Second"));
        assert_eq!(report.rows[1].folder.as_deref(), Some("Music"));
    }

    #[test]
    fn test_headerless_file_uses_first_column() {
        let data = format!("https://youtu.be/{}\nhttps://youtu.be/{}\n", ID_A, ID_B);
        let report = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(report.valid_count, 2);
        assert_eq!(report.rows[0].row_index, 1);
        assert_eq!(report.rows[0].title, None);
    }

    #[test]
    fn test_duplicate_id_across_url_spellings() {
        let data = format!(
            "url\nhttps://www.youtube.com/watch?v={}\nhttps://youtu.be/{}\n",
            ID_A, ID_A
        );
        let report = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(report.valid_count, 1);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(report.rows[0].status, RowStatus::Valid);
        assert_eq!(report.rows[1].status, RowStatus::Duplicate);
        // Duplicates are retained in the output, in file order
        assert_eq!(report.rows.len(), 2);
    }

    #[test]
    fn test_invalid_rows_carry_an_error() {
        let data = "url\nhttps://example.com/not-youtube\n";
        let report = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(report.invalid_count, 1);
        assert_eq!(report.rows[0].status, RowStatus::Invalid);
        assert!(report.rows[0].error.is_some());
    }

    #[test]
    fn test_empty_url_cells_are_skipped_silently() {
        let data = format!("url,title\n,orphaned title\nhttps://youtu.be/{},ok\n", ID_A);
        let report = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].row_index, 3);
    }

    #[test]
    fn test_too_many_rows_is_a_structural_failure() {
        let mut data = String::from("url\n");
        for i in 0..MAX_CSV_ROWS {
            data.push_str(&format!("https://example.com/{}\n", i));
        }
        let err = parse_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, CsvIngestError::FileTooLarge(_, _)));
    }

    #[test]
    fn test_empty_file_is_a_structural_failure() {
        assert!(matches!(parse_csv(b""), Err(CsvIngestError::EmptyFile)));
        assert!(matches!(parse_csv(b"\n\n"), Err(CsvIngestError::EmptyFile)));
    }

    #[test]
    fn test_upload_gate() {
        assert!(is_accepted_csv_upload("videos.csv", None));
        assert!(is_accepted_csv_upload("VIDEOS.CSV", Some("application/octet-stream")));
        assert!(is_accepted_csv_upload("export", Some("text/csv")));
        assert!(is_accepted_csv_upload("export.xls", Some("application/vnd.ms-excel")));
        assert!(!is_accepted_csv_upload("notes.txt", Some("text/plain")));
    }
}
