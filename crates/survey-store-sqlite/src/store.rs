// crates/survey-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Survey Store
// Description: SurveyStore implementation backed by SQLite.
// Purpose: Persist questions, submissions, and responses with atomic batch intake.
// Dependencies: survey-core, rusqlite, serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! All access goes through one mutex-guarded connection. List queries are
//! assembled from fixed clause fragments with bound parameters; sort columns
//! come from a closed enum, never from client text. The `mode` column is
//! optional: [`SqliteSurveyStore::has_mode_column`] probes it with a minimal
//! read and callers pass [`ModeColumn`] to select field sets accordingly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use rusqlite::params_from_iter;
use rusqlite::types::Value as SqlValue;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use survey_core::Location;
use survey_core::ModeColumn;
use survey_core::Page;
use survey_core::PageRequest;
use survey_core::Priority;
use survey_core::Question;
use survey_core::QuestionId;
use survey_core::QuestionPatch;
use survey_core::QuestionQuery;
use survey_core::QuestionStatus;
use survey_core::ResponseId;
use survey_core::ResponsePayload;
use survey_core::ResponseRecord;
use survey_core::SortField;
use survey_core::SortOrder;
use survey_core::StatRow;
use survey_core::StoreError;
use survey_core::Submission;
use survey_core::SubmissionId;
use survey_core::SurveyStore;
use survey_core::SurveyType;
use survey_core::Timestamp;
use survey_core::TitleMap;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum identifiers bound into one `IN (...)` list.
const MAX_IN_LIST: usize = 500;
/// Question columns shared by every schema version.
const QUESTION_COLUMNS: &str =
    "uuid, title, description, category, priority, status, created_at, updated_at, created_by";
/// Response columns in decode order.
const RESPONSE_COLUMNS: &str =
    "uuid, submission_uuid, question_uuid, response_data, user_identifier, survey_type, created_at";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` survey store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a config for `path` with default pragmas.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Constraint violation, such as a duplicate key.
    #[error("sqlite store constraint violation: {0}")]
    Constraint(String),
    /// Persisted row fails to decode.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store input.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Unavailable(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Constraint(message) => Self::Conflict(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => {
                Self::Unavailable(format!("schema version mismatch: {message}"))
            }
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

/// Maps an engine error, separating constraint violations.
fn db_error(err: &rusqlite::Error) -> SqliteStoreError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => SqliteStoreError::Constraint(err.to_string()),
        _ => SqliteStoreError::Db(err.to_string()),
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed survey store with WAL support.
#[derive(Clone)]
pub struct SqliteSurveyStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteSurveyStore {
    /// Opens an `SQLite`-backed survey store and creates missing tables.
    ///
    /// An existing `questions` table is kept as is, so databases provisioned
    /// without the `mode` column stay legacy.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        tracing::debug!(path = %config.path.display(), "sqlite survey store opened");
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Locks the shared connection.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))
    }

    /// Probes `questions.mode` with a minimal read.
    fn probe_mode_column(&self) -> Result<bool, SqliteStoreError> {
        let guard = self.lock()?;
        let probe = guard.prepare("SELECT mode FROM questions LIMIT 1");
        match probe {
            Ok(_) => Ok(true),
            Err(err) if err.to_string().contains("no such column") => Ok(false),
            Err(err) => Err(db_error(&err)),
        }
    }

    /// Lists one page of questions.
    fn query_questions(
        &self,
        query: &QuestionQuery,
        mode: ModeColumn,
    ) -> Result<Page<Question>, SqliteStoreError> {
        let mut clauses: Vec<&'static str> = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();
        let filter = &query.filter;
        if let Some(category) = &filter.category {
            clauses.push("category = ?");
            values.push(SqlValue::Text(category.clone()));
        }
        if let Some(status) = filter.status {
            clauses.push("status = ?");
            values.push(SqlValue::Text(status.as_str().to_string()));
        }
        if let Some(priority) = filter.priority {
            clauses.push("priority = ?");
            values.push(SqlValue::Text(priority.as_str().to_string()));
        }
        if let Some(survey_mode) = filter.mode {
            clauses.push("mode = ?");
            values.push(SqlValue::Text(survey_mode.as_str().to_string()));
        }
        if let Some(search) = &filter.search {
            clauses.push("(title LIKE ? ESCAPE '\\' OR description LIKE ? ESCAPE '\\')");
            let pattern = format!("%{}%", escape_like(search));
            values.push(SqlValue::Text(pattern.clone()));
            values.push(SqlValue::Text(pattern));
        }
        let where_sql =
            if clauses.is_empty() { String::new() } else { format!(" WHERE {}", clauses.join(" AND ")) };

        let guard = self.lock()?;
        let total: i64 = guard
            .query_row(
                &format!("SELECT COUNT(*) FROM questions{where_sql}"),
                params_from_iter(values.iter()),
                |row| row.get(0),
            )
            .map_err(|err| db_error(&err))?;

        let sql = format!(
            "SELECT {} FROM questions{where_sql} ORDER BY {} {}, uuid ASC LIMIT ? OFFSET ?",
            question_columns(mode),
            sort_expression(query.sort_by),
            sort_direction(query.sort_order),
        );
        values.push(SqlValue::Integer(i64::from(query.page.limit)));
        values.push(SqlValue::Integer(offset(query.page)));
        let mut stmt = guard.prepare(&sql).map_err(|err| db_error(&err))?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| Ok(read_question(row, mode)))
            .map_err(|err| db_error(&err))?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row.map_err(|err| db_error(&err))??);
        }
        Ok(Page::new(data, query.page, count(total)))
    }

    /// Loads one question.
    fn load_question(
        connection: &Connection,
        id: &QuestionId,
        mode: ModeColumn,
    ) -> Result<Option<Question>, SqliteStoreError> {
        let sql = format!("SELECT {} FROM questions WHERE uuid = ?1", question_columns(mode));
        connection
            .query_row(&sql, params![id.as_str()], |row| Ok(read_question(row, mode)))
            .optional()
            .map_err(|err| db_error(&err))?
            .transpose()
    }

    /// Inserts one question.
    fn write_question(&self, question: &Question, mode: ModeColumn) -> Result<(), SqliteStoreError> {
        let guard = self.lock()?;
        let mut values = vec![
            SqlValue::Text(question.uuid.as_str().to_string()),
            SqlValue::Text(question.title.clone()),
            optional_text(question.description.as_deref()),
            optional_text(question.category.as_deref()),
            SqlValue::Text(question.priority.as_str().to_string()),
            SqlValue::Text(question.status.as_str().to_string()),
            SqlValue::Integer(question.created_at.as_unix_millis()),
            SqlValue::Integer(question.updated_at.as_unix_millis()),
            optional_text(question.created_by.as_deref()),
        ];
        let sql = if mode.is_present() {
            values.push(SqlValue::Text(question.mode.unwrap_or_default().as_str().to_string()));
            format!("INSERT INTO questions ({QUESTION_COLUMNS}, mode) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)")
        } else {
            format!("INSERT INTO questions ({QUESTION_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)")
        };
        guard.execute(&sql, params_from_iter(values.iter())).map_err(|err| db_error(&err))?;
        Ok(())
    }

    /// Applies a partial update inside one transaction.
    fn patch_question(
        &self,
        id: &QuestionId,
        patch: &QuestionPatch,
        updated_at: Timestamp,
        mode: ModeColumn,
    ) -> Result<Option<Question>, SqliteStoreError> {
        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();
        if let Some(title) = &patch.title {
            sets.push("title = ?");
            values.push(SqlValue::Text(title.clone()));
        }
        if let Some(description) = &patch.description {
            sets.push("description = ?");
            values.push(optional_text(description.as_deref()));
        }
        if let Some(category) = &patch.category {
            sets.push("category = ?");
            values.push(optional_text(category.as_deref()));
        }
        if let Some(priority) = patch.priority {
            sets.push("priority = ?");
            values.push(SqlValue::Text(priority.as_str().to_string()));
        }
        if let Some(status) = patch.status {
            sets.push("status = ?");
            values.push(SqlValue::Text(status.as_str().to_string()));
        }
        if let Some(survey_mode) = patch.mode {
            sets.push("mode = ?");
            values.push(SqlValue::Text(survey_mode.as_str().to_string()));
        }
        sets.push("updated_at = ?");
        values.push(SqlValue::Integer(updated_at.as_unix_millis()));
        values.push(SqlValue::Text(id.as_str().to_string()));

        let mut guard = self.lock()?;
        let tx = guard.transaction().map_err(|err| db_error(&err))?;
        let changed = tx
            .execute(
                &format!("UPDATE questions SET {} WHERE uuid = ?", sets.join(", ")),
                params_from_iter(values.iter()),
            )
            .map_err(|err| db_error(&err))?;
        if changed == 0 {
            return Ok(None);
        }
        let updated = Self::load_question(&tx, id, mode)?;
        tx.commit().map_err(|err| db_error(&err))?;
        Ok(updated)
    }

    /// Resolves titles in bounded `IN (...)` chunks.
    fn load_titles(&self, ids: &[QuestionId]) -> Result<TitleMap, SqliteStoreError> {
        let guard = self.lock()?;
        let mut titles = TitleMap::new();
        for chunk in ids.chunks(MAX_IN_LIST) {
            let sql = format!("SELECT uuid, title FROM questions WHERE uuid IN ({})", placeholders(chunk.len()));
            let mut stmt = guard.prepare(&sql).map_err(|err| db_error(&err))?;
            let rows = stmt
                .query_map(params_from_iter(chunk.iter().map(QuestionId::as_str)), |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })
                .map_err(|err| db_error(&err))?;
            for row in rows {
                let (uuid, title) = row.map_err(|err| db_error(&err))?;
                titles.insert(QuestionId::new(uuid), title);
            }
        }
        Ok(titles)
    }

    /// Writes a submission and its responses in one transaction.
    fn write_submission(
        &self,
        submission: &Submission,
        responses: &[ResponseRecord],
    ) -> Result<(), SqliteStoreError> {
        let mut guard = self.lock()?;
        let tx = guard.transaction().map_err(|err| db_error(&err))?;
        tx.execute(
            "INSERT INTO submissions (uuid, survey_type, location, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                submission.uuid.as_str(),
                submission.survey_type.as_str(),
                submission.location.map(Location::as_str),
                submission.created_at.as_unix_millis(),
            ],
        )
        .map_err(|err| db_error(&err))?;
        {
            let mut stmt = tx
                .prepare(&format!(
                    "INSERT INTO responses ({RESPONSE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
                ))
                .map_err(|err| db_error(&err))?;
            for response in responses {
                let payload = serde_json::to_string(&response.response_data)
                    .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
                stmt.execute(params![
                    response.uuid.as_str(),
                    response.submission_uuid.as_str(),
                    response.question_uuid.as_str(),
                    payload,
                    response.user_identifier.as_deref(),
                    response.survey_type.as_str(),
                    response.created_at.as_unix_millis(),
                ])
                .map_err(|err| db_error(&err))?;
            }
        }
        tx.commit().map_err(|err| db_error(&err))?;
        Ok(())
    }

    /// Lists submissions newest first.
    fn query_submissions(
        &self,
        page: PageRequest,
        survey_type: Option<SurveyType>,
    ) -> Result<Page<Submission>, SqliteStoreError> {
        let mut values: Vec<SqlValue> = Vec::new();
        let where_sql = survey_type.map_or("", |kind| {
            values.push(SqlValue::Text(kind.as_str().to_string()));
            " WHERE survey_type = ?"
        });
        let guard = self.lock()?;
        let total: i64 = guard
            .query_row(
                &format!("SELECT COUNT(*) FROM submissions{where_sql}"),
                params_from_iter(values.iter()),
                |row| row.get(0),
            )
            .map_err(|err| db_error(&err))?;
        values.push(SqlValue::Integer(i64::from(page.limit)));
        values.push(SqlValue::Integer(offset(page)));
        let sql = format!(
            "SELECT uuid, survey_type, location, created_at FROM submissions{where_sql} \
             ORDER BY created_at DESC, uuid DESC LIMIT ? OFFSET ?"
        );
        let mut stmt = guard.prepare(&sql).map_err(|err| db_error(&err))?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| Ok(read_submission(row)))
            .map_err(|err| db_error(&err))?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row.map_err(|err| db_error(&err))??);
        }
        Ok(Page::new(data, page, count(total)))
    }

    /// Loads responses for the given submissions in insertion order.
    fn query_responses_for(&self, ids: &[SubmissionId]) -> Result<Vec<ResponseRecord>, SqliteStoreError> {
        let guard = self.lock()?;
        let mut records = Vec::new();
        for chunk in ids.chunks(MAX_IN_LIST) {
            let sql = format!(
                "SELECT {RESPONSE_COLUMNS} FROM responses WHERE submission_uuid IN ({}) ORDER BY rowid",
                placeholders(chunk.len())
            );
            let mut stmt = guard.prepare(&sql).map_err(|err| db_error(&err))?;
            let rows = stmt
                .query_map(params_from_iter(chunk.iter().map(SubmissionId::as_str)), |row| {
                    Ok(read_response(row))
                })
                .map_err(|err| db_error(&err))?;
            for row in rows {
                records.push(row.map_err(|err| db_error(&err))??);
            }
        }
        Ok(records)
    }

    /// Lists response rows by identifier descending.
    fn query_responses(
        &self,
        page: PageRequest,
        question: Option<&QuestionId>,
    ) -> Result<Page<ResponseRecord>, SqliteStoreError> {
        let mut values: Vec<SqlValue> = Vec::new();
        let where_sql = question.map_or("", |id| {
            values.push(SqlValue::Text(id.as_str().to_string()));
            " WHERE question_uuid = ?"
        });
        let guard = self.lock()?;
        let total: i64 = guard
            .query_row(
                &format!("SELECT COUNT(*) FROM responses{where_sql}"),
                params_from_iter(values.iter()),
                |row| row.get(0),
            )
            .map_err(|err| db_error(&err))?;
        values.push(SqlValue::Integer(i64::from(page.limit)));
        values.push(SqlValue::Integer(offset(page)));
        let sql = format!(
            "SELECT {RESPONSE_COLUMNS} FROM responses{where_sql} ORDER BY uuid DESC LIMIT ? OFFSET ?"
        );
        let mut stmt = guard.prepare(&sql).map_err(|err| db_error(&err))?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| Ok(read_response(row)))
            .map_err(|err| db_error(&err))?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row.map_err(|err| db_error(&err))??);
        }
        Ok(Page::new(data, page, count(total)))
    }

    /// Reads the aggregation projection, joining submissions for a location filter.
    fn query_stat_rows(&self, location: Option<Location>) -> Result<Vec<StatRow>, SqliteStoreError> {
        let guard = self.lock()?;
        let (sql, values) = match location {
            None => (
                "SELECT question_uuid, survey_type, response_data FROM responses ORDER BY rowid",
                Vec::new(),
            ),
            Some(location) => (
                "SELECT r.question_uuid, r.survey_type, r.response_data FROM responses r \
                 JOIN submissions s ON s.uuid = r.submission_uuid \
                 WHERE s.location = ? ORDER BY r.rowid",
                vec![SqlValue::Text(location.as_str().to_string())],
            ),
        };
        let mut stmt = guard.prepare(sql).map_err(|err| db_error(&err))?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
            })
            .map_err(|err| db_error(&err))?;
        let mut stats = Vec::new();
        for row in rows {
            let (question, survey_type, payload) = row.map_err(|err| db_error(&err))?;
            let survey_type = parse_enum("survey_type", &survey_type, SurveyType::parse)?;
            let response_data = serde_json::from_str::<JsonValue>(&payload)
                .map(|value| ResponsePayload::from_json(&value))
                .unwrap_or_default();
            stats.push(StatRow {
                question_uuid: QuestionId::new(question),
                survey_type,
                response_data,
            });
        }
        Ok(stats)
    }
}

// ============================================================================
// SECTION: Store Implementation
// ============================================================================

impl SurveyStore for SqliteSurveyStore {
    fn ping(&self) -> Result<(), StoreError> {
        let guard = self.lock()?;
        guard
            .query_row("SELECT COUNT(*) FROM (SELECT 1 FROM questions LIMIT 1)", params![], |row| {
                row.get::<_, i64>(0)
            })
            .map(|_| ())
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }

    fn has_mode_column(&self) -> Result<bool, StoreError> {
        Ok(self.probe_mode_column()?)
    }

    fn list_questions(
        &self,
        query: &QuestionQuery,
        mode: ModeColumn,
    ) -> Result<Page<Question>, StoreError> {
        Ok(self.query_questions(query, mode)?)
    }

    fn get_question(
        &self,
        id: &QuestionId,
        mode: ModeColumn,
    ) -> Result<Option<Question>, StoreError> {
        let guard = self.lock()?;
        Ok(Self::load_question(&guard, id, mode)?)
    }

    fn insert_question(&self, question: &Question, mode: ModeColumn) -> Result<(), StoreError> {
        Ok(self.write_question(question, mode)?)
    }

    fn update_question(
        &self,
        id: &QuestionId,
        patch: &QuestionPatch,
        updated_at: Timestamp,
        mode: ModeColumn,
    ) -> Result<Option<Question>, StoreError> {
        Ok(self.patch_question(id, patch, updated_at, mode)?)
    }

    fn delete_question(&self, id: &QuestionId) -> Result<bool, StoreError> {
        let guard = self.lock()?;
        let removed = guard
            .execute("DELETE FROM questions WHERE uuid = ?1", params![id.as_str()])
            .map_err(|err| db_error(&err))?;
        Ok(removed > 0)
    }

    fn question_titles(&self, ids: &[QuestionId]) -> Result<TitleMap, StoreError> {
        Ok(self.load_titles(ids)?)
    }

    fn insert_submission(
        &self,
        submission: &Submission,
        responses: &[ResponseRecord],
    ) -> Result<(), StoreError> {
        Ok(self.write_submission(submission, responses)?)
    }

    fn list_submissions(
        &self,
        page: PageRequest,
        survey_type: Option<SurveyType>,
    ) -> Result<Page<Submission>, StoreError> {
        Ok(self.query_submissions(page, survey_type)?)
    }

    fn responses_for_submissions(
        &self,
        ids: &[SubmissionId],
    ) -> Result<Vec<ResponseRecord>, StoreError> {
        Ok(self.query_responses_for(ids)?)
    }

    fn list_responses(
        &self,
        page: PageRequest,
        question: Option<&QuestionId>,
    ) -> Result<Page<ResponseRecord>, StoreError> {
        Ok(self.query_responses(page, question)?)
    }

    fn stat_rows(&self, location: Option<Location>) -> Result<Vec<StatRow>, StoreError> {
        Ok(self.query_stat_rows(location)?)
    }
}

// ============================================================================
// SECTION: Row Decoding
// ============================================================================

/// Parses a stored enum label.
fn parse_enum<T>(
    column: &str,
    raw: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, SqliteStoreError> {
    parse(raw).ok_or_else(|| SqliteStoreError::Corrupt(format!("invalid {column} value: {raw}")))
}

/// Decodes a question row selected with [`question_columns`].
fn read_question(row: &Row<'_>, mode: ModeColumn) -> Result<Question, SqliteStoreError> {
    let get_text = |index: usize| row.get::<_, String>(index).map_err(|err| db_error(&err));
    let get_optional =
        |index: usize| row.get::<_, Option<String>>(index).map_err(|err| db_error(&err));
    let get_millis = |index: usize| row.get::<_, i64>(index).map_err(|err| db_error(&err));
    let survey_mode = if mode.is_present() {
        let raw: Option<String> = get_optional(9)?;
        Some(raw.as_deref().map_or(Ok(SurveyType::Regular), |value| {
            parse_enum("mode", value, SurveyType::parse)
        })?)
    } else {
        None
    };
    Ok(Question {
        uuid: QuestionId::new(get_text(0)?),
        title: get_text(1)?,
        description: get_optional(2)?,
        category: get_optional(3)?,
        priority: parse_enum("priority", &get_text(4)?, Priority::parse)?,
        status: parse_enum("status", &get_text(5)?, QuestionStatus::parse)?,
        mode: survey_mode,
        created_at: Timestamp::from_unix_millis(get_millis(6)?),
        updated_at: Timestamp::from_unix_millis(get_millis(7)?),
        created_by: get_optional(8)?,
    })
}

/// Decodes a submission row.
fn read_submission(row: &Row<'_>) -> Result<Submission, SqliteStoreError> {
    let uuid: String = row.get(0).map_err(|err| db_error(&err))?;
    let survey_type: String = row.get(1).map_err(|err| db_error(&err))?;
    let location: Option<String> = row.get(2).map_err(|err| db_error(&err))?;
    let created_at: i64 = row.get(3).map_err(|err| db_error(&err))?;
    Ok(Submission {
        uuid: SubmissionId::new(uuid),
        survey_type: parse_enum("survey_type", &survey_type, SurveyType::parse)?,
        location: location.as_deref().map(|value| parse_enum("location", value, Location::parse)).transpose()?,
        created_at: Timestamp::from_unix_millis(created_at),
    })
}

/// Decodes a response row selected with [`RESPONSE_COLUMNS`].
fn read_response(row: &Row<'_>) -> Result<ResponseRecord, SqliteStoreError> {
    let get_text = |index: usize| row.get::<_, String>(index).map_err(|err| db_error(&err));
    let payload = get_text(3)?;
    let response_data = serde_json::from_str::<JsonValue>(&payload)
        .map(|value| ResponsePayload::from_json(&value))
        .map_err(|err| SqliteStoreError::Corrupt(format!("response_data: {err}")))?;
    Ok(ResponseRecord {
        uuid: ResponseId::new(get_text(0)?),
        submission_uuid: SubmissionId::new(get_text(1)?),
        question_uuid: QuestionId::new(get_text(2)?),
        response_data,
        user_identifier: row.get(4).map_err(|err| db_error(&err))?,
        survey_type: parse_enum("survey_type", &get_text(5)?, SurveyType::parse)?,
        created_at: Timestamp::from_unix_millis(row.get(6).map_err(|err| db_error(&err))?),
    })
}

// ============================================================================
// SECTION: SQL Helpers
// ============================================================================

/// Returns the question select list for the column mode.
fn question_columns(mode: ModeColumn) -> String {
    if mode.is_present() { format!("{QUESTION_COLUMNS}, mode") } else { QUESTION_COLUMNS.to_string() }
}

/// Returns the ORDER BY expression for a sort field.
const fn sort_expression(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::Title => "title",
        SortField::Priority => {
            "CASE priority WHEN 'low' THEN 0 WHEN 'medium' THEN 1 WHEN 'high' THEN 2 ELSE 3 END"
        }
    }
}

/// Returns the ORDER BY direction keyword.
const fn sort_direction(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

/// Escapes LIKE wildcards with a backslash.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Returns `n` comma-separated `?` placeholders.
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Converts an optional string into an SQL value.
fn optional_text(value: Option<&str>) -> SqlValue {
    value.map_or(SqlValue::Null, |text| SqlValue::Text(text.to_string()))
}

/// Returns the page offset as an SQL integer.
fn offset(page: PageRequest) -> i64 {
    i64::try_from(page.offset()).unwrap_or(i64::MAX)
}

/// Converts a COUNT(*) result into a row count.
fn count(total: i64) -> u64 {
    u64::try_from(total).unwrap_or_default()
}

// ============================================================================
// SECTION: Lifecycle Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.is_empty() {
        return Err(SqliteStoreError::Invalid("store path is empty".to_string()));
    }
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Io(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS questions (
                    uuid TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    description TEXT,
                    category TEXT,
                    priority TEXT NOT NULL DEFAULT 'medium',
                    status TEXT NOT NULL DEFAULT 'active',
                    mode TEXT NOT NULL DEFAULT 'regular',
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL,
                    created_by TEXT
                );
                CREATE TABLE IF NOT EXISTS submissions (
                    uuid TEXT PRIMARY KEY,
                    survey_type TEXT NOT NULL,
                    location TEXT,
                    created_at INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS responses (
                    uuid TEXT PRIMARY KEY,
                    submission_uuid TEXT NOT NULL,
                    question_uuid TEXT NOT NULL,
                    response_data TEXT NOT NULL,
                    user_identifier TEXT,
                    survey_type TEXT NOT NULL,
                    created_at INTEGER NOT NULL,
                    FOREIGN KEY (submission_uuid) REFERENCES submissions(uuid) ON DELETE CASCADE
                );
                CREATE INDEX IF NOT EXISTS idx_responses_submission_uuid
                    ON responses (submission_uuid);
                CREATE INDEX IF NOT EXISTS idx_responses_question_uuid
                    ON responses (question_uuid);
                CREATE INDEX IF NOT EXISTS idx_submissions_created_at
                    ON submissions (created_at);",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn escaped_terms_match_only_literally(term in "[a-z%_\\\\]{0,12}") {
            let connection = Connection::open_in_memory().unwrap();
            let pattern = format!("%{}%", escape_like(&term));
            let literal: bool = connection
                .query_row("SELECT ?1 LIKE ?2 ESCAPE '\\'", params![term, pattern], |row| row.get(0))
                .unwrap();
            prop_assert!(literal);
            if term.contains('%') || term.contains('_') {
                let stripped = term.replace(['%', '_'], "");
                let loose: bool = connection
                    .query_row("SELECT ?1 LIKE ?2 ESCAPE '\\'", params![stripped, pattern], |row| row.get(0))
                    .unwrap();
                prop_assert!(!loose);
            }
        }
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("a_b%c\\d"), "a\\_b\\%c\\\\d");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn placeholders_match_count() {
        assert_eq!(placeholders(3), "?, ?, ?");
    }
}
