//! Implements SheetPort with CSV files. Uses the `csv` crate for quoting and escaping.
//!
//! Columns: `name,start_date,end_date,teacher,room,shift,weekdays`.
//! Dates are `YYYY-MM-DD`; weekdays are a comma-joined list of English names,
//! so that cell is always quoted on write.

use crate::domain::calendar::{join_weekdays, parse_weekdays};
use crate::domain::{CourseRecord, DomainError, Shift};
use crate::ports::SheetPort;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::info;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw CSV row. Every cell is text until validated.
#[derive(Debug, Serialize, Deserialize)]
struct SheetRow {
    name: String,
    start_date: String,
    end_date: String,
    teacher: String,
    room: String,
    shift: String,
    weekdays: String,
}

impl From<&CourseRecord> for SheetRow {
    fn from(r: &CourseRecord) -> Self {
        Self {
            name: r.name.clone(),
            start_date: r.start_date.format(DATE_FORMAT).to_string(),
            end_date: r.end_date.format(DATE_FORMAT).to_string(),
            teacher: r.teacher.clone(),
            room: r.room.clone(),
            shift: r.shift.as_str().to_string(),
            weekdays: join_weekdays(&r.weekdays),
        }
    }
}

impl SheetRow {
    fn into_record(self) -> Result<CourseRecord, DomainError> {
        Ok(CourseRecord {
            name: self.name,
            start_date: parse_date(&self.start_date)?,
            end_date: parse_date(&self.end_date)?,
            teacher: self.teacher,
            room: self.room,
            shift: self.shift.parse::<Shift>()?,
            weekdays: parse_weekdays(&self.weekdays)?,
        })
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| DomainError::Parse(format!("date '{}': {}", s, e)))
}

/// Serialize records to CSV text with a header row.
pub fn records_to_csv(records: &[CourseRecord]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());

    for record in records {
        wtr.serialize(SheetRow::from(record))?;
    }

    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;

    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}

/// Parse CSV text (with header row) into records. The first bad row aborts with its line number.
pub fn csv_to_records(text: &str) -> Result<Vec<CourseRecord>, DomainError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for row in rdr.deserialize::<SheetRow>() {
        let row = row.map_err(|e| DomainError::Sheet(e.to_string()))?;
        // Header is line 1.
        let line = records.len() + 2;
        let record = row
            .into_record()
            .map_err(|e| DomainError::Sheet(format!("line {}: {}", line, e)))?;
        records.push(record);
    }
    Ok(records)
}

/// CSV-file spreadsheet adapter.
#[derive(Debug, Default)]
pub struct CsvSheet;

impl CsvSheet {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl SheetPort for CsvSheet {
    async fn read_courses(&self, path: &Path) -> Result<Vec<CourseRecord>, DomainError> {
        let text = fs::read_to_string(path)
            .await
            .map_err(|e| DomainError::Sheet(format!("read {}: {}", path.display(), e)))?;
        let records = csv_to_records(&text)?;
        info!(path = %path.display(), rows = records.len(), "read sheet");
        Ok(records)
    }

    async fn write_courses(
        &self,
        path: &Path,
        records: &[CourseRecord],
    ) -> Result<(), DomainError> {
        let text = records_to_csv(records).map_err(|e| DomainError::Sheet(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Sheet(format!("create dir: {}", e)))?;
        }
        fs::write(path, text)
            .await
            .map_err(|e| DomainError::Sheet(format!("write {}: {}", path.display(), e)))?;
        info!(path = %path.display(), rows = records.len(), "wrote sheet");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Weekday;

    fn record() -> CourseRecord {
        CourseRecord {
            name: "Intro, \"Rust\"".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 29).unwrap(),
            teacher: "Ada Lovelace".to_string(),
            room: "B-101".to_string(),
            shift: Shift::Afternoon,
            weekdays: [Weekday::Monday, Weekday::Wednesday].into_iter().collect(),
        }
    }

    #[test]
    fn test_records_to_csv_layout() {
        let csv = records_to_csv(&[record()]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("name,start_date,end_date,teacher,room,shift,weekdays")
        );
        assert_eq!(
            lines.next(),
            Some(
                "\"Intro, \"\"Rust\"\"\",2024-01-08,2024-03-29,Ada Lovelace,B-101,afternoon,\"Monday,Wednesday\""
            )
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_to_records_accepts_loose_cells() {
        let text = "name,start_date,end_date,teacher,room,shift,weekdays\n\
                    Algebra, 2024-02-01 ,2024-02-01,Emmy,R1,Morning,\"tue, Sat\"\n";
        let records = csv_to_records(text).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].shift, Shift::Morning);
        assert_eq!(
            records[0].weekdays.iter().copied().collect::<Vec<_>>(),
            vec![Weekday::Tuesday, Weekday::Saturday]
        );
    }

    #[test]
    fn test_bad_row_reports_line() {
        let text = "name,start_date,end_date,teacher,room,shift,weekdays\n\
                    Ok,2024-01-01,2024-01-02,T,R,morning,Monday\n\
                    Bad,2024-13-01,2024-01-02,T,R,morning,Monday\n";
        let err = csv_to_records(text).unwrap_err().to_string();
        assert!(err.contains("line 3"), "{err}");
    }

    #[tokio::test]
    async fn test_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("room-booking-sheet-{}", uuid::Uuid::new_v4()));
        let path = dir.join("courses.csv");
        let sheet = CsvSheet::new();
        sheet.write_courses(&path, &[record()]).await.unwrap();
        let back = sheet.read_courses(&path).await.unwrap();
        assert_eq!(back, vec![record()]);
        let _ = std::fs::remove_dir_all(dir);
    }
}
