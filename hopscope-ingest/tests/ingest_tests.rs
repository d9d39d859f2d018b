// Tests for loading history exports and Chrome History databases

use hopscope_ingest::chrome_time::EPOCH_DIFF_MICROS;
use hopscope_ingest::history::{HistoryDb, export_history_csv};
use hopscope_ingest::loader::{detect_kind, parse_csv_visits};
use hopscope_ingest::{IngestError, InputKind, load_visits};
use rusqlite::{Connection, params};
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

/// Chrome time for `secs` seconds after the Unix epoch.
fn chrome_secs(secs: i64) -> i64 {
    EPOCH_DIFF_MICROS + secs * 1_000_000
}

fn create_history_db(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "
        CREATE TABLE urls (
            id INTEGER PRIMARY KEY,
            url LONGVARCHAR,
            title LONGVARCHAR,
            visit_count INTEGER DEFAULT 0 NOT NULL
        );
        CREATE TABLE visits (
            id INTEGER PRIMARY KEY,
            url INTEGER NOT NULL,
            visit_time INTEGER NOT NULL
        );
        ",
    )
    .unwrap();

    let urls = [
        (1, "https://news.example.com/a", Some("News, today"), 2),
        (2, "https://mail.example.org/inbox", None, 1),
        (3, "chrome://settings/", Some("Settings"), 1),
    ];
    for (id, url, title, count) in urls {
        conn.execute(
            "INSERT INTO urls (id, url, title, visit_count) VALUES (?1, ?2, ?3, ?4)",
            params![id, url, title, count],
        )
        .unwrap();
    }

    let visits = [(1, 1, 100), (2, 2, 200), (3, 3, 300), (4, 1, 50)];
    for (id, url, secs) in visits {
        conn.execute(
            "INSERT INTO visits (id, url, visit_time) VALUES (?1, ?2, ?3)",
            params![id, url, chrome_secs(secs)],
        )
        .unwrap();
    }
}

// ============================================================================
// CSV Tests
// ============================================================================

#[test]
fn test_parse_csv_visits() {
    let content = format!(
        "url,title,visit_count,visit_time\n\
         https://a.com/x,Alpha,3,{}\n\
         https://b.com/,\"Beta, the site\",1,{}\n",
        chrome_secs(10),
        chrome_secs(20)
    );

    let (visits, stats) = parse_csv_visits(&content).unwrap();
    assert_eq!(stats.rows, 2);
    assert_eq!(stats.accepted, 2);
    assert_eq!(visits[0].domain, "a.com");
    assert_eq!(visits[0].timestamp, 10_000_000);
    assert_eq!(visits[1].title, "Beta, the site");
}

#[test]
fn test_parse_csv_skips_bad_rows() {
    let content = format!(
        "url,title,visit_count,visit_time\n\
         notaurl,Broken,1,{}\n\
         https://a.com/,Bad time,1,yesterday\n\
         https://ok.com/,Fine,x,{}\n\
         https://short.com/\n",
        chrome_secs(1),
        chrome_secs(2)
    );

    let (visits, stats) = parse_csv_visits(&content).unwrap();
    assert_eq!(stats.rows, 4);
    assert_eq!(stats.skipped, 3);
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].domain, "ok.com");
}

#[test]
fn test_parse_csv_skips_out_of_range_visit_time() {
    let content = format!(
        "url,title,visit_count,visit_time\n\
         https://a.com/,A,1,{}\n\
         https://b.com/,B,1,{}\n",
        i64::MIN,
        chrome_secs(7)
    );

    let (visits, stats) = parse_csv_visits(&content).unwrap();
    assert_eq!(stats.rows, 2);
    assert_eq!(stats.skipped, 1);
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].domain, "b.com");
    assert_eq!(visits[0].timestamp, 7_000_000);
}

#[test]
fn test_parse_csv_empty_input() {
    let result = parse_csv_visits("");
    assert!(matches!(result, Err(IngestError::EmptyInput(_))));
}

#[test]
fn test_parse_csv_header_only() {
    let (visits, stats) = parse_csv_visits("url,title,visit_count,visit_time\n").unwrap();
    assert!(visits.is_empty());
    assert_eq!(stats.rows, 0);
}

#[test]
fn test_load_visits_from_csv_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "url,title,visit_count,visit_time")?;
    writeln!(temp_file, "https://a.com/,A,1,{}", chrome_secs(5))?;

    let (kind, visits, stats) = load_visits(temp_file.path())?;
    assert_eq!(kind, InputKind::Csv);
    assert_eq!(visits.len(), 1);
    assert_eq!(stats.accepted, 1);
    Ok(())
}

#[test]
fn test_load_visits_missing_file() {
    let result = load_visits(Path::new("/definitely/not/here.csv"));
    assert!(matches!(result, Err(IngestError::Io(_))));
}

// ============================================================================
// History Database Tests
// ============================================================================

#[test]
fn test_detect_kind() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("History");
    create_history_db(&db_path);
    assert_eq!(detect_kind(&db_path).unwrap(), InputKind::ChromeHistory);

    let csv_path = temp_dir.path().join("history.csv");
    std::fs::write(&csv_path, "url\n").unwrap();
    assert_eq!(detect_kind(&csv_path).unwrap(), InputKind::Csv);
}

#[test]
fn test_history_rows_are_time_ordered() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("History");
    create_history_db(&db_path);

    let rows = HistoryDb::open(&db_path).unwrap().rows().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].visit_time, chrome_secs(50));
    assert_eq!(rows[2].title, None);
}

#[test]
fn test_load_visits_from_history_db() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("History");
    create_history_db(&db_path);

    let (kind, visits, stats) = load_visits(&db_path).unwrap();
    assert_eq!(kind, InputKind::ChromeHistory);
    assert_eq!(stats.rows, 4);
    assert_eq!(stats.skipped, 1); // chrome://settings
    let domains: Vec<_> = visits.iter().map(|v| v.domain.as_str()).collect();
    assert_eq!(
        domains,
        vec!["news.example.com", "news.example.com", "mail.example.org"]
    );
    assert_eq!(visits[2].title, "");
}

#[test]
fn test_export_history_csv_round_trips_through_loader() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("History");
    let csv_path = temp_dir.path().join("full_history.csv");
    create_history_db(&db_path);

    let exported = export_history_csv(&db_path, &csv_path).unwrap();
    assert_eq!(exported, 4);

    let content = std::fs::read_to_string(&csv_path).unwrap();
    assert!(content.starts_with("url,title,visit_count,visit_time\n"));
    assert!(content.contains("\"News, today\""));

    let (_, from_csv, _) = load_visits(&csv_path).unwrap();
    let (_, from_db, _) = load_visits(&db_path).unwrap();
    assert_eq!(from_csv, from_db);
}
