use crate::attendance::AttendanceLog;
use crate::config::Config;
use crate::roster::{self, SequentialIds, StudentRecord};
use crate::session::SessionContext;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub config: Config,
    pub session: SessionContext,
    /// The active student collection imports are committed into.
    pub students: Vec<StudentRecord>,
    pub attendance: AttendanceLog,
    pub ids: SequentialIds,
}

impl AppState {
    pub fn new(config: Config) -> AppState {
        let students = if config.seed_sample_students {
            roster::sample_roster()
        } else {
            Vec::new()
        };
        let ids = SequentialIds::after(&students);

        let mut session = SessionContext::new(config.session_file.clone());
        if let Err(e) = session.load() {
            tracing::warn!(error = %format!("{e:#}"), "ignoring unreadable session file");
        }

        AppState {
            config,
            session,
            students,
            attendance: AttendanceLog::new(),
            ids,
        }
    }
}
