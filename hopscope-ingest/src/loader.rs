use crate::chrome_time::chrome_to_unix_micros;
use crate::csv::parse_records;
use crate::domain::extract_domain;
use crate::error::{IngestError, Result};
use crate::history::HistoryDb;
use hopscope_core::Visit;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

const SQLITE_MAGIC: &[u8; 16] = b"SQLite format 3\0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Csv,
    ChromeHistory,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Csv => "csv",
            InputKind::ChromeHistory => "chrome-history",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub rows: usize,
    pub accepted: usize,
    pub skipped: usize,
}

impl IngestStats {
    fn count(&mut self, accepted: bool) {
        self.rows += 1;
        if accepted {
            self.accepted += 1;
        } else {
            self.skipped += 1;
        }
    }
}

/// Column positions of the fields we need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CsvLayout {
    url: usize,
    title: usize,
    visit_time: usize,
}

impl Default for CsvLayout {
    // url,title,visit_count,visit_time
    fn default() -> Self {
        CsvLayout {
            url: 0,
            title: 1,
            visit_time: 3,
        }
    }
}

impl CsvLayout {
    fn from_header(header: &[String]) -> Self {
        let find = |names: &[&str]| {
            header
                .iter()
                .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
        };
        let fallback = CsvLayout::default();

        CsvLayout {
            url: find(&["url"]).unwrap_or(fallback.url),
            title: find(&["title"]).unwrap_or(fallback.title),
            visit_time: find(&["visit_time", "last_visit_time", "last_visit"])
                .unwrap_or(fallback.visit_time),
        }
    }
}

/// Sniffs the first bytes of `path` for the SQLite file header.
pub fn detect_kind(path: &Path) -> Result<InputKind> {
    let mut head = [0u8; 16];
    let mut file = File::open(path)?;
    let read = file.read(&mut head)?;

    if read == head.len() && &head == SQLITE_MAGIC {
        Ok(InputKind::ChromeHistory)
    } else {
        Ok(InputKind::Csv)
    }
}

/// Turns one raw row into a [`Visit`], or `None` when the URL has no usable
/// domain or the visit time cannot be converted.
pub fn visit_from_row(url: &str, title: &str, chrome_time: i64) -> Option<Visit> {
    let domain = extract_domain(url)?;
    let timestamp = chrome_to_unix_micros(chrome_time)?;
    Some(Visit::new(domain, timestamp, title))
}

/// Parses a CSV history export. The first record is the header.
pub fn parse_csv_visits(content: &str) -> Result<(Vec<Visit>, IngestStats)> {
    let mut records = parse_records(content).into_iter();
    let header = records
        .next()
        .ok_or_else(|| IngestError::EmptyInput("CSV input is empty".to_string()))?;
    let layout = CsvLayout::from_header(&header);
    debug!("CSV layout: {:?}", layout);

    let mut visits = Vec::new();
    let mut stats = IngestStats::default();

    for (idx, record) in records.enumerate() {
        let field = |i: usize| record.get(i).map(String::as_str).unwrap_or("");

        let visit = field(layout.visit_time)
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|time| visit_from_row(field(layout.url), field(layout.title), time));

        stats.count(visit.is_some());
        match visit {
            Some(visit) => visits.push(visit),
            None => debug!("Skipping CSV record {}: {:?}", idx + 2, record),
        }
    }

    Ok((visits, stats))
}

pub fn load_history_db(path: &Path) -> Result<(Vec<Visit>, IngestStats)> {
    let rows = HistoryDb::open(path)?.rows()?;

    let mut visits = Vec::with_capacity(rows.len());
    let mut stats = IngestStats::default();
    for row in rows {
        let visit = visit_from_row(&row.url, row.title.as_deref().unwrap_or(""), row.visit_time);
        stats.count(visit.is_some());
        visits.extend(visit);
    }

    Ok((visits, stats))
}

/// Loads visits from a CSV export or a Chrome History database, whichever
/// `path` turns out to be.
pub fn load_visits(path: &Path) -> Result<(InputKind, Vec<Visit>, IngestStats)> {
    let kind = detect_kind(path)?;
    info!("Loading {} as {}", path.display(), kind.as_str());

    let (visits, stats) = match kind {
        InputKind::ChromeHistory => load_history_db(path)?,
        InputKind::Csv => {
            let bytes = fs::read(path)?;
            parse_csv_visits(&String::from_utf8_lossy(&bytes))?
        }
    };

    if stats.skipped > 0 {
        warn!(
            "Skipped {} of {} rows without a usable URL or visit time",
            stats.skipped, stats.rows
        );
    }
    info!("Loaded {} visits", stats.accepted);

    Ok((kind, visits, stats))
}
