// Chrome `History` database access

use crate::csv::format_record;
use crate::error::Result;
use rusqlite::{Connection, OpenFlags};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

const VISITS_QUERY: &str = "
    SELECT urls.url, urls.title, urls.visit_count, visits.visit_time
    FROM urls, visits
    WHERE urls.id = visits.url
    ORDER BY visits.visit_time, visits.id
";

/// One joined `urls` x `visits` row. `visit_time` is raw Chrome time.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub url: String,
    pub title: Option<String>,
    pub visit_count: i64,
    pub visit_time: i64,
}

pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Opens a History file without taking a write lock on it.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(HistoryDb { conn })
    }

    pub fn rows(&self) -> Result<Vec<HistoryRow>> {
        let mut stmt = self.conn.prepare(VISITS_QUERY)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(HistoryRow {
                    url: row.get(0)?,
                    title: row.get(1)?,
                    visit_count: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
                    visit_time: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        info!("Read {} visit rows from history database", rows.len());
        Ok(rows)
    }
}

/// Writes the joined visit rows of `db_path` to `csv_path` in the
/// `url,title,visit_count,visit_time` export layout. Returns the row count.
pub fn export_history_csv(db_path: &Path, csv_path: &Path) -> Result<usize> {
    let rows = HistoryDb::open(db_path)?.rows()?;

    let mut out = BufWriter::new(File::create(csv_path)?);
    out.write_all(b"url,title,visit_count,visit_time\n")?;
    for row in &rows {
        let line = format_record(&[
            row.url.as_str(),
            row.title.as_deref().unwrap_or(""),
            &row.visit_count.to_string(),
            &row.visit_time.to_string(),
        ]);
        out.write_all(line.as_bytes())?;
    }
    out.flush()?;

    info!("Exported {} rows to {}", rows.len(), csv_path.display());
    Ok(rows.len())
}
