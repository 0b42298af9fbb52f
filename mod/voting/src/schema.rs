use worldvote_core::ServiceError;
use worldvote_sql::SQLStore;

/// SQL DDL statements to initialize the voting database schema.
///
/// `UNIQUE(student_id, participant_id)` is the real guard against duplicate
/// votes — the coordinator's existence check is an optimization on top of
/// it. Foreign keys cascade so removing a student or participant sweeps
/// their vote rows with them.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS students (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        full_name TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS participants (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        serial_number TEXT NOT NULL UNIQUE,
        video_url TEXT NOT NULL,
        like_count INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS votes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        student_id INTEGER NOT NULL REFERENCES students(id) ON DELETE CASCADE,
        participant_id INTEGER NOT NULL REFERENCES participants(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        UNIQUE(student_id, participant_id)
    )",
    // Indexes
    "CREATE INDEX IF NOT EXISTS idx_votes_student ON votes(student_id)",
    "CREATE INDEX IF NOT EXISTS idx_votes_participant ON votes(participant_id)",
    "CREATE INDEX IF NOT EXISTS idx_participants_likes ON participants(like_count)",
];

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    for stmt in SCHEMA {
        sql.exec(stmt, &[])
            .map_err(|e| ServiceError::Storage(format!("schema init failed: {}", e)))?;
    }
    Ok(())
}
