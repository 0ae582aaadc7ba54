use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use finplan::workflows::dialogue::{PersistError, RecordSink, SessionRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes each completed session to `{user_id}_{session_id}.json`.
#[derive(Debug, Clone)]
pub(crate) struct FileRecordSink {
    dir: PathBuf,
}

impl FileRecordSink {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub(crate) fn path_for(&self, record: &SessionRecord) -> PathBuf {
        self.dir
            .join(format!("{}_{}.json", record.user_id, record.session_id))
    }
}

impl RecordSink for FileRecordSink {
    fn persist(&self, record: &SessionRecord) -> Result<String, PersistError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(record);
        let body = serde_json::to_string_pretty(record)?;
        fs::write(&path, body)?;
        info!(path = %path.display(), "session record written");
        Ok(path.display().to_string())
    }
}

pub(crate) fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Noon UTC on `date`.
pub(crate) fn midday(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default())
        .and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use finplan::workflows::assessment::QuestionBank;
    use finplan::workflows::dialogue::{FixedClock, SessionState};

    fn record() -> SessionRecord {
        let clock = FixedClock(midday(parse_date("2025-01-15").expect("valid date")));
        let state = SessionState::new(&clock);
        SessionRecord::from_session(&state, &QuestionBank::standard(), clock.0)
    }

    #[test]
    fn sink_writes_pretty_json_named_after_the_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = FileRecordSink::new(dir.path().join("records"));
        let record = record();

        let location = sink.persist(&record).expect("record persisted");
        let expected = dir
            .path()
            .join("records")
            .join(format!("{}_{}.json", record.user_id, record.session_id));
        assert_eq!(location, expected.display().to_string());

        let body = fs::read_to_string(&expected).expect("record file readable");
        assert!(body.contains("\n  \"user_id\""));
        let parsed: serde_json::Value = serde_json::from_str(&body).expect("valid json");
        assert_eq!(parsed["next_review_date"], "2025-02-14");
    }

    #[test]
    fn sink_reports_io_failures() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("taken");
        fs::write(&blocker, "not a directory").expect("write blocker");

        let sink = FileRecordSink::new(&blocker);
        assert!(matches!(sink.persist(&record()), Err(PersistError::Io(_))));
    }

    #[test]
    fn transcript_lines_skip_comments_and_blanks() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.txt");
        fs::write(&path, "# conservative run\n65\n\n  10  \nwhat is a horizon?\n")
            .expect("write transcript");

        let lines = read_lines(&path).expect("transcript readable");
        assert_eq!(lines, vec!["65", "10", "what is a horizon?"]);
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        assert!(parse_date("2025-03-01").is_ok());
        assert!(parse_date("03/01/2025").is_err());
    }
}
