// src/report/csv.rs
// =============================================================================
// CSV report: successful records are appended to a CSV file on disk.
//
// How the store behaves:
// - The file is opened in append mode, so every run adds rows
// - The header row is written only when the file is empty
// - Failed URLs are skipped (a table has no good place for an error)
// - After appending, the whole file is handed back to the caller
//
// Concurrency:
// - A tokio Mutex inside CsvStore serializes appends within this process
// - Two *processes* writing the same file at once is still the caller's
//   problem; nothing here locks the file on disk
//
// Fields are quoted the usual CSV way when they contain a comma, a quote
// or a line break. Rows end with CRLF.
// =============================================================================

use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::run_batch;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::stats::FileRecord;

/// Column names, in order.
pub const HEADER: [&str; 6] = [
    "File name",
    "Sha256 hexdigest",
    "File size",
    "Word count",
    "Number of unique words",
    "Todays date",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug)]
pub struct CsvStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `records` and returns the full contents of the store.
    ///
    /// The header row is written first if the file is empty.
    pub async fn append_and_read(&self, records: &[FileRecord]) -> Result<Vec<u8>> {
        let _guard = self.lock.lock().await;
        self.append_locked(records).await?;
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| Error::io(&self.path, e))
    }

    async fn append_locked(&self, records: &[FileRecord]) -> Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| Error::io(&self.path, e))?;

        let is_empty = file
            .metadata()
            .await
            .map_err(|e| Error::io(&self.path, e))?
            .len()
            == 0;

        let mut out = String::new();
        if is_empty {
            push_row(&mut out, HEADER.iter().map(|h| Cow::Borrowed(*h)));
        }
        for record in records {
            push_row(&mut out, record_fields(record).into_iter());
        }

        file.write_all(out.as_bytes())
            .await
            .map_err(|e| Error::io(&self.path, e))?;
        file.flush().await.map_err(|e| Error::io(&self.path, e))?;

        tracing::debug!(
            path = %self.path.display(),
            rows = records.len(),
            wrote_header = is_empty,
            "appended to CSV store"
        );
        Ok(())
    }
}

/// What `csv_results` did, plus the full contents of the store afterwards.
#[derive(Debug)]
pub struct CsvReport {
    pub contents: Vec<u8>,
    pub appended: usize,
    pub skipped: usize,
}

// Runs the batch, appends the successful records, returns the whole CSV
pub async fn csv_results(config: &Config, store: &CsvStore) -> Result<CsvReport> {
    let (urls, results) = run_batch(config).await?;

    let mut records = Vec::with_capacity(results.len());
    let mut skipped = 0;
    for (url, result) in urls.iter().zip(results) {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                tracing::warn!(%url, error = %e.chain_message(), "skipping failed URL in CSV report");
            }
        }
    }

    let contents = store.append_and_read(&records).await?;
    Ok(CsvReport {
        contents,
        appended: records.len(),
        skipped,
    })
}

/// Reads a CSV store back into records. The header row is required.
pub fn read_csv(path: &Path) -> Result<Vec<FileRecord>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let invalid = |message: String| Error::io(path, io::Error::new(io::ErrorKind::InvalidData, message));

    let mut rows = parse_rows(&content).into_iter();
    match rows.next() {
        Some(header) if header.iter().map(String::as_str).eq(HEADER.iter().copied()) => {}
        Some(header) => return Err(invalid(format!("unexpected header: {:?}", header))),
        None => return Ok(Vec::new()),
    }

    rows.enumerate()
        .map(|(i, row)| parse_record(&row).map_err(|message| invalid(format!("row {}: {}", i + 2, message))))
        .collect()
}

fn record_fields(record: &FileRecord) -> [Cow<'_, str>; 6] {
    [
        Cow::Borrowed(record.file_name()),
        Cow::Borrowed(record.sha256()),
        Cow::Owned(record.size().to_string()),
        Cow::Owned(record.word_count().to_string()),
        Cow::Owned(record.unique_words().to_string()),
        Cow::Owned(record.date().format(DATE_FORMAT).to_string()),
    ]
}

fn parse_record(row: &[String]) -> std::result::Result<FileRecord, String> {
    if row.len() != HEADER.len() {
        return Err(format!("expected {} fields, found {}", HEADER.len(), row.len()));
    }

    let date = NaiveDate::parse_from_str(&row[5], DATE_FORMAT)
        .map_err(|e| format!("{} '{}': {}", HEADER[5], row[5], e))?;

    Ok(FileRecord::new(
        row[0].clone(),
        row[1].clone(),
        parse_field(row, 2)?,
        parse_field(row, 3)?,
        parse_field(row, 4)?,
        date,
    ))
}

fn parse_field<T>(row: &[String], i: usize) -> std::result::Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    row[i]
        .parse::<T>()
        .map_err(|e| format!("{} '{}': {}", HEADER[i], row[i], e))
}

fn push_row<'a>(out: &mut String, fields: impl Iterator<Item = Cow<'a, str>>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(&field));
    }
    out.push_str("\r\n");
}

fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

// Splits CSV text into rows of fields. Quoted fields may contain commas,
// doubled quotes and line breaks. Blank lines are skipped.
fn parse_rows(content: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            // Blank lines carry no record
            '\n' if row.is_empty() && field.is_empty() => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is Cow<str>?
//    - "Clone on write": either a borrowed &str or an owned String
//    - Most fields need no quoting, so escape_field borrows them as-is and
//      only allocates when it actually has to add quotes
//
// 2. Why a tokio Mutex and not std::sync::Mutex?
//    - The guard is held across .await points (open, write, read)
//    - A std Mutex guard must not be held across an await
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(name: &str, words: usize, unique: usize) -> FileRecord {
        FileRecord::new(
            name.to_string(),
            "ab".repeat(32),
            42,
            words,
            unique,
            NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
        )
    }

    const HEADER_LINE: &str =
        "File name,Sha256 hexdigest,File size,Word count,Number of unique words,Todays date\r\n";

    #[tokio::test]
    async fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("interview.csv"));

        store.append_and_read(&[record("a.txt", 3, 2)]).await.unwrap();
        store.append_and_read(&[record("b.txt", 1, 1)]).await.unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.starts_with(HEADER_LINE));
        assert_eq!(content.matches("File name").count(), 1);
        assert_eq!(content.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_header_written_for_empty_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interview.csv");
        std::fs::write(&path, "").unwrap();

        let bytes = CsvStore::new(&path).append_and_read(&[]).await.unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), HEADER_LINE);
    }

    #[tokio::test]
    async fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("interview.csv"));
        let written = vec![
            record("plain.txt", 10, 4),
            record("with, comma.txt", 0, 0),
            record("with \"quotes\"\nand newline.txt", 7, 7),
        ];

        store.append_and_read(&written).await.unwrap();
        let read = read_csv(store.path()).unwrap();
        assert_eq!(read, written);
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(CsvStore::new(dir.path().join("interview.csv")));

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let rows: Vec<_> = (0..5).map(|j| record(&format!("{}_{}.txt", i, j), 1, 1)).collect();
                store.append_and_read(&rows).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(read_csv(store.path()).unwrap().len(), 40);
    }

    #[test]
    fn test_read_csv_rejects_wrong_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "a,b,c\r\n1,2,3\r\n").unwrap();
        assert!(matches!(read_csv(&path), Err(Error::Io { .. })));
    }

    #[test]
    fn test_read_csv_rejects_bad_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, format!("{}f.txt,abc,big,1,1,2024-01-01\r\n", HEADER_LINE)).unwrap();
        let err = read_csv(&path).unwrap_err();
        assert!(format!("{:?}", err).contains("row 2"));
    }

    #[test]
    fn test_read_csv_rejects_word_count_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(
            &path,
            format!("{}f.txt,abc,1,99999999999999999999999,1,2024-01-01\r\n", HEADER_LINE),
        )
        .unwrap();
        let err = read_csv(&path).unwrap_err();
        assert!(format!("{:?}", err).contains("row 2"));
        assert!(format!("{:?}", err).contains("Word count"));
    }

    #[test]
    fn test_read_csv_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interview.csv");
        std::fs::write(
            &path,
            format!("{0}\r\nf.txt,abc,1,2,2,2024-01-01\r\n\n", HEADER_LINE),
        )
        .unwrap();
        let rows = read_csv(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].word_count(), 2);
    }

    #[test]
    fn test_parse_rows_handles_lf_and_missing_final_newline() {
        let rows = parse_rows("a,b\nc,\"d,e\"");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d,e"]]);
    }

    #[tokio::test]
    async fn test_csv_results_appends_after_blank_line_in_store() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x y"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let urls_file = dir.path().join("urls.txt");
        std::fs::write(&urls_file, format!("{}/a.txt\n", server.uri())).unwrap();
        let config = Config {
            urls_file,
            downloads_dir: dir.path().join("downloads"),
            ..Config::default()
        };
        let store = CsvStore::new(dir.path().join("interview.csv"));
        std::fs::write(store.path(), format!("{}\r\n", HEADER_LINE)).unwrap();

        let report = csv_results(&config, &store).await.unwrap();
        assert_eq!(report.appended, 1);

        let rows = read_csv(store.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].word_count(), 2);
    }

    #[tokio::test]
    async fn test_csv_results_skips_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("a a b"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let urls_file = dir.path().join("urls.txt");
        std::fs::write(
            &urls_file,
            format!("{}/a.txt\nhttp://127.0.0.1:1/b.txt\n", server.uri()),
        )
        .unwrap();
        let config = Config {
            urls_file,
            downloads_dir: dir.path().join("downloads"),
            ..Config::default()
        };
        let store = CsvStore::new(dir.path().join("interview.csv"));

        let report = csv_results(&config, &store).await.unwrap();
        assert_eq!((report.appended, report.skipped), (1, 1));
        let text = String::from_utf8(report.contents).unwrap();
        assert!(text.starts_with(HEADER_LINE));

        let rows = read_csv(store.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].file_name(), "downloaded_file_0.txt");
        assert_eq!((rows[0].word_count(), rows[0].unique_words()), (3, 2));
    }
}
