//! Persistent stores for participants, students, and vote rows.
//!
//! Each store wraps the shared `SQLStore`. The statement helpers are
//! generic over [`SQLRunner`] so the same SQL serves both autocommit
//! store calls and the coordinator's transaction scope.

use std::sync::Arc;

use worldvote_core::{ListParams, ListResult, ServiceError, now_rfc3339};
use worldvote_sql::{Row, SQLError, SQLRunner, SQLStore, Value};

use crate::model::{Participant, Student, Vote};

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Map a store-layer error to the service taxonomy. Lock-wait expiry is a
/// `Timeout`; everything else is a storage failure.
pub(crate) fn store_err(e: SQLError) -> ServiceError {
    match e {
        SQLError::Busy(msg) => ServiceError::Timeout(msg),
        other => ServiceError::Storage(other.to_string()),
    }
}

pub(crate) fn is_unique_violation(e: &SQLError) -> bool {
    e.to_string().contains("UNIQUE constraint")
}

// ---------------------------------------------------------------------------
// Transaction plumbing
// ---------------------------------------------------------------------------

/// Run `f` inside a single store transaction, carrying a typed domain
/// result across the dyn-closure boundary of [`SQLStore::with_tx`].
///
/// Any `Err` from `f` forces a rollback. That is required for SQL failures
/// (no partial mutation may commit) and harmless for domain aborts, which
/// by construction happen before the first write.
pub(crate) fn in_tx<T>(
    db: &dyn SQLStore,
    mut f: impl FnMut(&dyn SQLRunner) -> Result<T, ServiceError>,
) -> Result<T, ServiceError> {
    let mut outcome: Option<Result<T, ServiceError>> = None;
    let tx_result = db.with_tx(&mut |tx| match f(tx) {
        Ok(v) => {
            outcome = Some(Ok(v));
            Ok(())
        }
        Err(e) => {
            outcome = Some(Err(e));
            Err(SQLError::Execution("transaction aborted".into()))
        }
    });

    match (tx_result, outcome) {
        (Ok(()), Some(Ok(v))) => Ok(v),
        (_, Some(Err(e))) => Err(e),
        // BEGIN or COMMIT failed — the closure's result, if any, is void.
        (Err(e), _) => Err(store_err(e)),
        (Ok(()), None) => Err(ServiceError::Internal(
            "transaction closure did not run".into(),
        )),
    }
}

/// Rowid assigned by the most recent INSERT on this connection. Only valid
/// inside the same transaction as that INSERT.
pub(crate) fn last_insert_id<R: SQLRunner + ?Sized>(db: &R) -> Result<i64, ServiceError> {
    let rows = db
        .query("SELECT last_insert_rowid() AS id", &[])
        .map_err(store_err)?;
    rows.first()
        .and_then(|r| r.get_i64("id"))
        .ok_or_else(|| ServiceError::Internal("no last insert id".into()))
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

fn column_i64(row: &Row, name: &str) -> Result<i64, ServiceError> {
    row.get_i64(name)
        .ok_or_else(|| ServiceError::Storage(format!("missing column {name}")))
}

fn column_str(row: &Row, name: &str) -> Result<String, ServiceError> {
    row.get_str(name)
        .map(str::to_string)
        .ok_or_else(|| ServiceError::Storage(format!("missing column {name}")))
}

fn row_to_participant(row: &Row) -> Result<Participant, ServiceError> {
    Ok(Participant {
        id: column_i64(row, "id")?,
        serial_number: column_str(row, "serial_number")?,
        video_url: column_str(row, "video_url")?,
        like_count: column_i64(row, "like_count")?,
        created_at: column_str(row, "created_at")?,
        updated_at: column_str(row, "updated_at")?,
    })
}

fn row_to_student(row: &Row) -> Result<Student, ServiceError> {
    Ok(Student {
        id: column_i64(row, "id")?,
        email: column_str(row, "email")?,
        password_hash: column_str(row, "password_hash")?,
        full_name: row.get_str("full_name").map(str::to_string),
        created_at: column_str(row, "created_at")?,
        updated_at: column_str(row, "updated_at")?,
    })
}

fn row_to_vote(row: &Row) -> Result<Vote, ServiceError> {
    Ok(Vote {
        id: column_i64(row, "id")?,
        student_id: column_i64(row, "student_id")?,
        participant_id: column_i64(row, "participant_id")?,
        created_at: column_str(row, "created_at")?,
    })
}

const PARTICIPANT_COLS: &str =
    "id, serial_number, video_url, like_count, created_at, updated_at";
const STUDENT_COLS: &str = "id, email, password_hash, full_name, created_at, updated_at";

// ---------------------------------------------------------------------------
// Statement helpers — usable on the store or inside a transaction
// ---------------------------------------------------------------------------

pub(crate) fn find_participant<R: SQLRunner + ?Sized>(
    db: &R,
    id: i64,
) -> Result<Option<Participant>, ServiceError> {
    let rows = db
        .query(
            &format!("SELECT {PARTICIPANT_COLS} FROM participants WHERE id = ?1"),
            &[Value::Integer(id)],
        )
        .map_err(store_err)?;
    rows.first().map(row_to_participant).transpose()
}

pub(crate) fn find_student<R: SQLRunner + ?Sized>(
    db: &R,
    id: i64,
) -> Result<Option<Student>, ServiceError> {
    let rows = db
        .query(
            &format!("SELECT {STUDENT_COLS} FROM students WHERE id = ?1"),
            &[Value::Integer(id)],
        )
        .map_err(store_err)?;
    rows.first().map(row_to_student).transpose()
}

pub(crate) fn find_vote<R: SQLRunner + ?Sized>(
    db: &R,
    student_id: i64,
    participant_id: i64,
) -> Result<Option<Vote>, ServiceError> {
    let rows = db
        .query(
            "SELECT id, student_id, participant_id, created_at FROM votes \
             WHERE student_id = ?1 AND participant_id = ?2",
            &[Value::Integer(student_id), Value::Integer(participant_id)],
        )
        .map_err(store_err)?;
    rows.first().map(row_to_vote).transpose()
}

pub(crate) fn count_student_votes<R: SQLRunner + ?Sized>(
    db: &R,
    student_id: i64,
) -> Result<i64, ServiceError> {
    let rows = db
        .query(
            "SELECT COUNT(*) AS cnt FROM votes WHERE student_id = ?1",
            &[Value::Integer(student_id)],
        )
        .map_err(store_err)?;
    Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0))
}

/// Insert a vote row. Returns `false` when the UNIQUE(student_id,
/// participant_id) constraint rejected a duplicate — the caller decides
/// what a lost cast race means.
pub(crate) fn insert_vote<R: SQLRunner + ?Sized>(
    db: &R,
    student_id: i64,
    participant_id: i64,
    created_at: &str,
) -> Result<bool, ServiceError> {
    match db.exec(
        "INSERT INTO votes (student_id, participant_id, created_at) VALUES (?1, ?2, ?3)",
        &[
            Value::Integer(student_id),
            Value::Integer(participant_id),
            Value::Text(created_at.to_string()),
        ],
    ) {
        Ok(_) => Ok(true),
        Err(e) if is_unique_violation(&e) => Ok(false),
        Err(e) => Err(store_err(e)),
    }
}

pub(crate) fn delete_vote<R: SQLRunner + ?Sized>(
    db: &R,
    student_id: i64,
    participant_id: i64,
) -> Result<u64, ServiceError> {
    db.exec(
        "DELETE FROM votes WHERE student_id = ?1 AND participant_id = ?2",
        &[Value::Integer(student_id), Value::Integer(participant_id)],
    )
    .map_err(store_err)
}

/// Adjust a participant's like counter by `delta`, floored at zero.
/// The floor is defensive — `recount` is the sanctioned repair for drift.
pub(crate) fn adjust_like_count<R: SQLRunner + ?Sized>(
    db: &R,
    participant_id: i64,
    delta: i64,
) -> Result<(), ServiceError> {
    let affected = db
        .exec(
            "UPDATE participants \
             SET like_count = MAX(like_count + ?2, 0), updated_at = ?3 \
             WHERE id = ?1",
            &[
                Value::Integer(participant_id),
                Value::Integer(delta),
                Value::Text(now_rfc3339()),
            ],
        )
        .map_err(store_err)?;
    if affected == 0 {
        return Err(ServiceError::NotFound(format!(
            "participant {participant_id}"
        )));
    }
    Ok(())
}

/// Recompute a participant's like counter from its vote rows and overwrite
/// the stored value. Returns the corrected count.
pub(crate) fn recount_participant<R: SQLRunner + ?Sized>(
    db: &R,
    participant_id: i64,
) -> Result<i64, ServiceError> {
    let affected = db
        .exec(
            "UPDATE participants \
             SET like_count = (SELECT COUNT(*) FROM votes WHERE participant_id = ?1), \
                 updated_at = ?2 \
             WHERE id = ?1",
            &[Value::Integer(participant_id), Value::Text(now_rfc3339())],
        )
        .map_err(store_err)?;
    if affected == 0 {
        return Err(ServiceError::NotFound(format!(
            "participant {participant_id}"
        )));
    }

    let rows = db
        .query(
            "SELECT like_count FROM participants WHERE id = ?1",
            &[Value::Integer(participant_id)],
        )
        .map_err(store_err)?;
    rows.first()
        .and_then(|r| r.get_i64("like_count"))
        .ok_or_else(|| {
            ServiceError::Internal(format!("participant {participant_id} vanished mid-recount"))
        })
}

pub(crate) fn participant_ids_for_student<R: SQLRunner + ?Sized>(
    db: &R,
    student_id: i64,
) -> Result<Vec<i64>, ServiceError> {
    let rows = db
        .query(
            "SELECT participant_id FROM votes WHERE student_id = ?1 ORDER BY participant_id ASC",
            &[Value::Integer(student_id)],
        )
        .map_err(store_err)?;
    rows.iter()
        .map(|r| column_i64(r, "participant_id"))
        .collect()
}

pub(crate) fn all_participant_ids<R: SQLRunner + ?Sized>(
    db: &R,
) -> Result<Vec<i64>, ServiceError> {
    let rows = db
        .query("SELECT id FROM participants ORDER BY id ASC", &[])
        .map_err(store_err)?;
    rows.iter().map(|r| column_i64(r, "id")).collect()
}

pub(crate) fn delete_student<R: SQLRunner + ?Sized>(
    db: &R,
    student_id: i64,
) -> Result<(), ServiceError> {
    let affected = db
        .exec(
            "DELETE FROM students WHERE id = ?1",
            &[Value::Integer(student_id)],
        )
        .map_err(store_err)?;
    if affected == 0 {
        return Err(ServiceError::NotFound(format!("student {student_id}")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ParticipantStore
// ---------------------------------------------------------------------------

/// Persistent storage for participants, backed by SQLStore (SQLite).
#[derive(Clone)]
pub struct ParticipantStore {
    db: Arc<dyn SQLStore>,
}

impl ParticipantStore {
    pub fn new(db: Arc<dyn SQLStore>) -> Self {
        Self { db }
    }

    /// Insert a new participant with a zeroed like counter.
    pub fn create(&self, serial_number: &str, video_url: &str) -> Result<Participant, ServiceError> {
        let serial_number = serial_number.to_string();
        let video_url = video_url.to_string();
        in_tx(self.db.as_ref(), move |tx| {
            let now = now_rfc3339();
            match tx.exec(
                "INSERT INTO participants (serial_number, video_url, like_count, created_at, updated_at) \
                 VALUES (?1, ?2, 0, ?3, ?3)",
                &[
                    Value::Text(serial_number.clone()),
                    Value::Text(video_url.clone()),
                    Value::Text(now),
                ],
            ) {
                Ok(_) => {}
                Err(e) if is_unique_violation(&e) => {
                    return Err(ServiceError::Conflict(format!(
                        "participant with serial number '{serial_number}' already exists"
                    )));
                }
                Err(e) => return Err(store_err(e)),
            }
            let id = last_insert_id(tx)?;
            find_participant(tx, id)?.ok_or_else(|| {
                ServiceError::Internal(format!("participant {id} vanished after insert"))
            })
        })
    }

    /// Get a participant by id.
    pub fn get(&self, id: i64) -> Result<Participant, ServiceError> {
        find_participant(self.db.as_ref(), id)?
            .ok_or_else(|| ServiceError::NotFound(format!("participant {id}")))
    }

    /// Look up a participant by its unique serial number.
    pub fn find_by_serial(&self, serial_number: &str) -> Result<Option<Participant>, ServiceError> {
        let rows = self
            .db
            .query(
                &format!("SELECT {PARTICIPANT_COLS} FROM participants WHERE serial_number = ?1"),
                &[Value::Text(serial_number.to_string())],
            )
            .map_err(store_err)?;
        rows.first().map(row_to_participant).transpose()
    }

    /// List participants in stable id order with pagination.
    pub fn list(&self, params: &ListParams) -> Result<ListResult<Participant>, ServiceError> {
        let count_rows = self
            .db
            .query("SELECT COUNT(*) AS cnt FROM participants", &[])
            .map_err(store_err)?;
        let total = count_rows
            .first()
            .and_then(|r| r.get_i64("cnt"))
            .unwrap_or(0) as usize;

        let rows = self
            .db
            .query(
                &format!(
                    "SELECT {PARTICIPANT_COLS} FROM participants \
                     ORDER BY id ASC LIMIT ?1 OFFSET ?2"
                ),
                &[
                    Value::Integer(params.limit as i64),
                    Value::Integer(params.offset as i64),
                ],
            )
            .map_err(store_err)?;

        let items = rows
            .iter()
            .map(row_to_participant)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ListResult { items, total })
    }

    /// The leaderboard: top `n` participants by like count, ties broken by
    /// ascending id so the order is deterministic.
    pub fn top_n(&self, n: usize) -> Result<Vec<Participant>, ServiceError> {
        let rows = self
            .db
            .query(
                &format!(
                    "SELECT {PARTICIPANT_COLS} FROM participants \
                     ORDER BY like_count DESC, id ASC LIMIT ?1"
                ),
                &[Value::Integer(n as i64)],
            )
            .map_err(store_err)?;
        rows.iter().map(row_to_participant).collect()
    }

    pub fn count(&self) -> Result<i64, ServiceError> {
        let rows = self
            .db
            .query("SELECT COUNT(*) AS cnt FROM participants", &[])
            .map_err(store_err)?;
        Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0))
    }
}

// ---------------------------------------------------------------------------
// VoteStore
// ---------------------------------------------------------------------------

/// Read access to the vote rows. Mutation goes through the coordinator
/// only — vote writes must pair with a counter adjustment in one
/// transaction.
#[derive(Clone)]
pub struct VoteStore {
    db: Arc<dyn SQLStore>,
}

impl VoteStore {
    pub fn new(db: Arc<dyn SQLStore>) -> Self {
        Self { db }
    }

    /// The vote row for (student, participant), if one exists.
    pub fn find(&self, student_id: i64, participant_id: i64) -> Result<Option<Vote>, ServiceError> {
        find_vote(self.db.as_ref(), student_id, participant_id)
    }

    /// How many votes the student currently holds.
    pub fn count_for_student(&self, student_id: i64) -> Result<i64, ServiceError> {
        count_student_votes(self.db.as_ref(), student_id)
    }

    /// The participant ids this student currently votes for, ascending.
    pub fn participant_ids_for_student(&self, student_id: i64) -> Result<Vec<i64>, ServiceError> {
        participant_ids_for_student(self.db.as_ref(), student_id)
    }

    /// True row count for one participant — the ground truth `like_count`
    /// denormalizes.
    pub fn count_for_participant(&self, participant_id: i64) -> Result<i64, ServiceError> {
        let rows = self
            .db
            .query(
                "SELECT COUNT(*) AS cnt FROM votes WHERE participant_id = ?1",
                &[Value::Integer(participant_id)],
            )
            .map_err(store_err)?;
        Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0))
    }
}

// ---------------------------------------------------------------------------
// StudentStore
// ---------------------------------------------------------------------------

/// Persistent storage for students.
#[derive(Clone)]
pub struct StudentStore {
    db: Arc<dyn SQLStore>,
}

impl StudentStore {
    pub fn new(db: Arc<dyn SQLStore>) -> Self {
        Self { db }
    }

    /// Insert a new student. The caller supplies an already-hashed password.
    pub fn create(
        &self,
        email: &str,
        password_hash: &str,
        full_name: Option<&str>,
    ) -> Result<Student, ServiceError> {
        let email = email.to_string();
        let password_hash = password_hash.to_string();
        let full_name = full_name.map(str::to_string);
        in_tx(self.db.as_ref(), move |tx| {
            let now = now_rfc3339();
            match tx.exec(
                "INSERT INTO students (email, password_hash, full_name, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                &[
                    Value::Text(email.clone()),
                    Value::Text(password_hash.clone()),
                    match &full_name {
                        Some(n) => Value::Text(n.clone()),
                        None => Value::Null,
                    },
                    Value::Text(now),
                ],
            ) {
                Ok(_) => {}
                Err(e) if is_unique_violation(&e) => {
                    return Err(ServiceError::Conflict(format!(
                        "student '{email}' already registered"
                    )));
                }
                Err(e) => return Err(store_err(e)),
            }
            let id = last_insert_id(tx)?;
            find_student(tx, id)?
                .ok_or_else(|| ServiceError::Internal(format!("student {id} vanished after insert")))
        })
    }

    /// Get a student by id.
    pub fn get(&self, id: i64) -> Result<Student, ServiceError> {
        find_student(self.db.as_ref(), id)?
            .ok_or_else(|| ServiceError::NotFound(format!("student {id}")))
    }

    /// Look up a student by login email.
    pub fn find_by_email(&self, email: &str) -> Result<Option<Student>, ServiceError> {
        let rows = self
            .db
            .query(
                &format!("SELECT {STUDENT_COLS} FROM students WHERE email = ?1"),
                &[Value::Text(email.to_string())],
            )
            .map_err(store_err)?;
        rows.first().map(row_to_student).transpose()
    }

    pub fn count(&self) -> Result<i64, ServiceError> {
        let rows = self
            .db
            .query("SELECT COUNT(*) AS cnt FROM students", &[])
            .map_err(store_err)?;
        Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use worldvote_sql::SqliteStore;

    fn test_db() -> Arc<dyn SQLStore> {
        let db: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        schema::init_schema(db.as_ref()).unwrap();
        db
    }

    #[test]
    fn participant_create_and_get() {
        let db = test_db();
        let store = ParticipantStore::new(db);

        let p = store.create("W-0001", "https://videos.example/1").unwrap();
        assert_eq!(p.like_count, 0);
        assert_eq!(p.serial_number, "W-0001");

        let got = store.get(p.id).unwrap();
        assert_eq!(got, p);

        let by_serial = store.find_by_serial("W-0001").unwrap();
        assert_eq!(by_serial, Some(p));
        assert!(store.find_by_serial("W-9999").unwrap().is_none());
    }

    #[test]
    fn participant_duplicate_serial_conflicts() {
        let db = test_db();
        let store = ParticipantStore::new(db);
        store.create("W-0002", "https://videos.example/2").unwrap();

        let err = store
            .create("W-0002", "https://videos.example/other")
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn participant_list_is_ordered_by_id() {
        let db = test_db();
        let store = ParticipantStore::new(db);
        for i in 1..=5 {
            store
                .create(&format!("W-{i:04}"), "https://videos.example/x")
                .unwrap();
        }

        let page = store
            .list(&ListParams {
                limit: 2,
                offset: 1,
            })
            .unwrap();
        assert_eq!(page.total, 5);
        let serials: Vec<_> = page.items.iter().map(|p| p.serial_number.as_str()).collect();
        assert_eq!(serials, ["W-0002", "W-0003"]);
    }

    #[test]
    fn top_n_breaks_ties_by_id() {
        let db = test_db();
        let store = ParticipantStore::new(Arc::clone(&db));

        // Four participants with counts [5, 3, 3, 1], created out of order.
        let counts = [3, 5, 1, 3];
        let mut ids = Vec::new();
        for (i, c) in counts.iter().enumerate() {
            let p = store
                .create(&format!("W-1{i:03}"), "https://videos.example/x")
                .unwrap();
            db.exec(
                "UPDATE participants SET like_count = ?2 WHERE id = ?1",
                &[Value::Integer(p.id), Value::Integer(*c)],
            )
            .unwrap();
            ids.push(p.id);
        }

        let top = store.top_n(5).unwrap();
        let ordered: Vec<_> = top.iter().map(|p| (p.like_count, p.id)).collect();
        assert_eq!(
            ordered,
            [(5, ids[1]), (3, ids[0]), (3, ids[3]), (1, ids[2])]
        );
    }

    #[test]
    fn student_create_find_and_conflict() {
        let db = test_db();
        let store = StudentStore::new(db);

        let s = store
            .create("alice@example.edu", "$argon2id$x", Some("Alice"))
            .unwrap();
        assert_eq!(s.full_name.as_deref(), Some("Alice"));

        let found = store.find_by_email("alice@example.edu").unwrap().unwrap();
        assert_eq!(found.id, s.id);
        assert!(store.find_by_email("bob@example.edu").unwrap().is_none());

        let err = store
            .create("alice@example.edu", "$argon2id$y", None)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn vote_store_reads() {
        let db = test_db();
        let students = StudentStore::new(Arc::clone(&db));
        let participants = ParticipantStore::new(Arc::clone(&db));
        let votes = VoteStore::new(Arc::clone(&db));

        let s = students.create("v@example.edu", "h", None).unwrap();
        let a = participants.create("W-A", "https://v/a").unwrap();
        let b = participants.create("W-B", "https://v/b").unwrap();

        insert_vote(db.as_ref(), s.id, b.id, &now_rfc3339()).unwrap();
        insert_vote(db.as_ref(), s.id, a.id, &now_rfc3339()).unwrap();

        assert_eq!(votes.count_for_student(s.id).unwrap(), 2);
        assert!(votes.find(s.id, a.id).unwrap().is_some());
        assert!(votes.find(s.id + 1, a.id).unwrap().is_none());
        // Ascending participant order regardless of insert order.
        assert_eq!(
            votes.participant_ids_for_student(s.id).unwrap(),
            vec![a.id, b.id]
        );
        assert_eq!(votes.count_for_participant(a.id).unwrap(), 1);
    }

    #[test]
    fn duplicate_vote_insert_reports_false() {
        let db = test_db();
        let students = StudentStore::new(Arc::clone(&db));
        let participants = ParticipantStore::new(Arc::clone(&db));

        let s = students.create("d@example.edu", "h", None).unwrap();
        let p = participants.create("W-D", "https://v/d").unwrap();

        assert!(insert_vote(db.as_ref(), s.id, p.id, &now_rfc3339()).unwrap());
        assert!(!insert_vote(db.as_ref(), s.id, p.id, &now_rfc3339()).unwrap());
    }

    #[test]
    fn adjust_like_count_floors_at_zero() {
        let db = test_db();
        let participants = ParticipantStore::new(Arc::clone(&db));
        let p = participants.create("W-F", "https://v/f").unwrap();

        adjust_like_count(db.as_ref(), p.id, -1).unwrap();
        assert_eq!(participants.get(p.id).unwrap().like_count, 0);

        adjust_like_count(db.as_ref(), p.id, 1).unwrap();
        assert_eq!(participants.get(p.id).unwrap().like_count, 1);

        let err = adjust_like_count(db.as_ref(), 9999, 1).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn cascading_delete_sweeps_votes() {
        let db = test_db();
        let students = StudentStore::new(Arc::clone(&db));
        let participants = ParticipantStore::new(Arc::clone(&db));
        let votes = VoteStore::new(Arc::clone(&db));

        let s = students.create("c@example.edu", "h", None).unwrap();
        let p = participants.create("W-C", "https://v/c").unwrap();
        insert_vote(db.as_ref(), s.id, p.id, &now_rfc3339()).unwrap();

        delete_student(db.as_ref(), s.id).unwrap();
        assert_eq!(votes.count_for_participant(p.id).unwrap(), 0);
    }
}
