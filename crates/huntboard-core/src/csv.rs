//! CSV import/export for the application table.
//!
//! The format is deliberately plain: one header row, then one fully-quoted
//! row per application with embedded quotes doubled (RFC-4180 style).
//! Import accepts the same column order and is lenient about everything
//! except structure — a row with the wrong shape fails the import, while
//! unknown enum values and missing fields fall back to defaults.

use chrono::{DateTime, Utc};

use crate::model::application::{Application, ApplicationDraft, Platform, Priority, Status};

/// Column order shared by export and import.
pub const CSV_HEADER: &str =
    "Company,Role,Location,Salary,URL,Platform,Status,Applied Date,Last Touch,Priority,Notes";

const COLUMN_COUNT: usize = 11;

/// One imported application: the draft plus the timestamp overrides the
/// file carried. `last_touch_at` is pre-filled with the import time when
/// the file had no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    pub draft: ApplicationDraft,
    pub applied_at: Option<DateTime<Utc>>,
    pub last_touch_at: DateTime<Utc>,
}

/// Import failure, surfaced to the caller as a description. Rows parsed
/// before the failing one are not returned; callers that already inserted
/// rows keep them (no rollback).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("empty input: expected a header row")]
    Empty,
    #[error("unexpected header: '{0}'")]
    BadHeader(String),
    #[error("row {row}: expected {COLUMN_COUNT} columns, found {found}")]
    ColumnCount { row: usize, found: usize },
    #[error("row {row}: unterminated quoted field")]
    UnterminatedQuote { row: usize },
}

/// Render the applications as a CSV document with a trailing newline.
#[must_use]
pub fn export_csv(apps: &[Application]) -> String {
    let mut out = String::with_capacity(64 * (apps.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');

    for app in apps {
        let fields = [
            app.company.clone(),
            app.role.clone(),
            app.location.clone().unwrap_or_default(),
            app.salary.clone().unwrap_or_default(),
            app.url.clone().unwrap_or_default(),
            app.platform.to_string(),
            app.status.to_string(),
            app.applied_at.map(|d| d.to_rfc3339()).unwrap_or_default(),
            app.last_touch_at.to_rfc3339(),
            app.effective_priority().to_string(),
            app.notes.clone().unwrap_or_default(),
        ];

        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push('"');
            for ch in field.chars() {
                if ch == '"' {
                    out.push('"');
                }
                out.push(ch);
            }
            out.push('"');
        }
        out.push('\n');
    }

    out
}

/// Parse a CSV document in the export format.
///
/// Defaults per column: company "Unknown", role "Unknown Role", platform
/// `other`, status `saved`, priority medium, last touch = `now`.
///
/// # Errors
///
/// Returns [`ImportError`] when the input is empty, the header does not
/// match, a row has the wrong column count, or quoting is unterminated.
pub fn import_csv(input: &str, now: DateTime<Utc>) -> Result<Vec<CsvRow>, ImportError> {
    let mut records = parse_records(input)?;
    if records.is_empty() {
        return Err(ImportError::Empty);
    }

    let header = records.remove(0);
    let expected: Vec<&str> = CSV_HEADER.split(',').collect();
    if header.iter().map(String::as_str).collect::<Vec<_>>() != expected {
        return Err(ImportError::BadHeader(header.join(",")));
    }

    let mut rows = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        // Header is row 1 in user-facing numbering.
        let row = index + 2;
        if record.len() != COLUMN_COUNT {
            return Err(ImportError::ColumnCount {
                row,
                found: record.len(),
            });
        }

        let draft = ApplicationDraft {
            company: text_or(&record[0], "Unknown"),
            role: text_or(&record[1], "Unknown Role"),
            location: optional(&record[2]),
            salary: optional(&record[3]),
            url: optional(&record[4]),
            platform: record[5].parse::<Platform>().unwrap_or_default(),
            status: record[6].parse::<Status>().unwrap_or(Status::Saved),
            priority: Some(record[9].parse::<Priority>().unwrap_or_default()),
            notes: optional(&record[10]),
        };

        rows.push(CsvRow {
            draft,
            applied_at: parse_date(&record[7]),
            last_touch_at: parse_date(&record[8]).unwrap_or(now),
        });
    }

    Ok(rows)
}

fn text_or(field: &str, fallback: &str) -> String {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

fn optional(field: &str) -> Option<String> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_date(field: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(field.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Split the document into records, honoring quoted fields (which may
/// contain commas, doubled quotes, and newlines).
fn parse_records(input: &str) -> Result<Vec<Vec<String>>, ImportError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut row = 1;

    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                // Skip blank lines between records.
                if !(record.len() == 1 && record[0].is_empty()) {
                    records.push(std::mem::take(&mut record));
                }
                record.clear();
                row += 1;
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(ImportError::UnterminatedQuote { row });
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::{CSV_HEADER, ImportError, export_csv, import_csv};
    use crate::model::application::{
        Application, ApplicationId, Platform, Priority, Status,
    };
    use chrono::{Duration, Utc};

    fn sample(id: i64, company: &str, status: Status) -> Application {
        let now = Utc::now();
        Application {
            id: ApplicationId::Local(id),
            company: company.to_string(),
            role: "SWE".to_string(),
            location: Some("Remote".to_string()),
            salary: None,
            url: None,
            platform: Platform::Wellfound,
            status,
            priority: Some(Priority::High),
            archived: false,
            notes: Some("said \"next week\"\nsecond line".to_string()),
            created_at: now - Duration::days(5),
            updated_at: now,
            applied_at: (status != Status::Saved).then_some(now - Duration::days(4)),
            last_touch_at: now,
        }
    }

    #[test]
    fn export_starts_with_header_and_quotes_every_field() {
        let csv = export_csv(&[sample(1, "Stripe", Status::Applied)]);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        let row = lines.next().expect("data row");
        assert!(row.starts_with("\"Stripe\",\"SWE\",\"Remote\",\"\",\"\",\"wellfound\""));
    }

    #[test]
    fn export_doubles_embedded_quotes() {
        let csv = export_csv(&[sample(1, "A \"B\" C", Status::Saved)]);
        assert!(csv.contains("\"A \"\"B\"\" C\""));
    }

    #[test]
    fn round_trip_preserves_identity_fields() {
        let apps = vec![
            sample(1, "Stripe", Status::Applied),
            sample(2, "Figma", Status::Saved),
            sample(3, "Linear", Status::Offer),
        ];
        let now = Utc::now();
        let rows = import_csv(&export_csv(&apps), now).expect("round trip");

        assert_eq!(rows.len(), apps.len());
        for (row, app) in rows.iter().zip(&apps) {
            assert_eq!(row.draft.company, app.company);
            assert_eq!(row.draft.role, app.role);
            assert_eq!(row.draft.platform, app.platform);
            assert_eq!(row.draft.status, app.status);
            assert_eq!(row.draft.notes, app.notes.clone().map(|n| n.trim().to_string()));
        }
    }

    #[test]
    fn import_defaults_missing_fields() {
        let input = format!("{CSV_HEADER}\n,,,,,,,,,,\n");
        let now = Utc::now();
        let rows = import_csv(&input, now).expect("import");

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.draft.company, "Unknown");
        assert_eq!(row.draft.role, "Unknown Role");
        assert_eq!(row.draft.platform, Platform::Other);
        assert_eq!(row.draft.status, Status::Saved);
        assert_eq!(row.draft.priority, Some(Priority::Medium));
        assert!(row.applied_at.is_none());
        assert_eq!(row.last_touch_at, now);
    }

    #[test]
    fn import_rejects_wrong_column_count() {
        let input = format!("{CSV_HEADER}\n\"Stripe\",\"SWE\"\n");
        let err = import_csv(&input, Utc::now()).expect_err("short row");
        assert_eq!(err, ImportError::ColumnCount { row: 2, found: 2 });
    }

    #[test]
    fn import_rejects_bad_header_and_empty_input() {
        assert!(matches!(
            import_csv("Company,Role\n", Utc::now()),
            Err(ImportError::BadHeader(_))
        ));
        assert_eq!(import_csv("", Utc::now()), Err(ImportError::Empty));
    }

    #[test]
    fn import_rejects_unterminated_quote() {
        let input = format!("{CSV_HEADER}\n\"Stripe,\"SWE\"");
        assert!(matches!(
            import_csv(&input, Utc::now()),
            Err(ImportError::UnterminatedQuote { .. })
        ));
    }

    #[test]
    fn unknown_enum_values_fall_back_to_defaults() {
        let input = format!(
            "{CSV_HEADER}\n\"Acme\",\"SWE\",\"\",\"\",\"\",\"monster\",\"pending\",\"\",\"\",\"urgent\",\"\"\n"
        );
        let rows = import_csv(&input, Utc::now()).expect("import");
        assert_eq!(rows[0].draft.platform, Platform::Other);
        assert_eq!(rows[0].draft.status, Status::Saved);
        assert_eq!(rows[0].draft.priority, Some(Priority::Medium));
    }
}
