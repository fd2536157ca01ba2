use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Number, Value};
use sqlx::types::Json;
use sqlx::{FromRow, MySqlPool};
use tracing::debug;

use super::{RecordStore, StoreResult};
use crate::model::employee::{AttendanceEntry, AttendancePatch, EmployeeRecord, PerformanceEntry};

const EMPLOYEE_SELECT_SQL: &str = "SELECT id, email, role, employee_id, profile FROM employees";

const ATTENDANCE_SELECT_SQL: &str = r#"
    SELECT record_id, entry_date, week_day, clock_in, clock_out, payroll, communication_rating
    FROM attendance_entries"#;

const PERFORMANCE_SELECT_SQL: &str =
    "SELECT record_id, entry_date, score FROM performance_entries";

#[derive(FromRow)]
struct EmployeeRow {
    id: String,
    email: String,
    role: Option<String>,
    employee_id: String,
    profile: Json<Map<String, Value>>,
}

#[derive(FromRow)]
struct AttendanceRow {
    record_id: String,
    entry_date: String,
    week_day: String,
    clock_in: String,
    clock_out: String,
    payroll: String,
    communication_rating: i64,
}

#[derive(FromRow)]
struct PerformanceRow {
    record_id: String,
    entry_date: String,
    score: Json<Number>,
}

impl From<AttendanceRow> for AttendanceEntry {
    fn from(row: AttendanceRow) -> Self {
        Self {
            week_day: row.week_day,
            date: row.entry_date,
            clock_in: row.clock_in,
            clock_out: row.clock_out,
            payroll: row.payroll,
            communication_rating: row.communication_rating,
        }
    }
}

impl From<PerformanceRow> for PerformanceEntry {
    fn from(row: PerformanceRow) -> Self {
        Self {
            date: row.entry_date,
            score: row.score.0,
        }
    }
}

/// MySQL-backed store. Attendance and performance arrays live in child
/// tables ordered by an auto-increment `seq`, so insertion order is kept.
#[derive(Clone)]
pub struct MySqlRecordStore {
    pool: MySqlPool,
}

impl MySqlRecordStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Loads the sub-collections for `rows` and assembles full records.
    async fn assemble(&self, rows: Vec<EmployeeRow>) -> StoreResult<Vec<EmployeeRecord>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // A single record is the common case, everything else loads the full tables.
        let (attendance, performance) = if let [row] = rows.as_slice() {
            let attendance = sqlx::query_as::<_, AttendanceRow>(&format!(
                "{ATTENDANCE_SELECT_SQL} WHERE record_id = ? ORDER BY seq"
            ))
            .bind(&row.id)
            .fetch_all(&self.pool)
            .await?;
            let performance = sqlx::query_as::<_, PerformanceRow>(&format!(
                "{PERFORMANCE_SELECT_SQL} WHERE record_id = ? ORDER BY seq"
            ))
            .bind(&row.id)
            .fetch_all(&self.pool)
            .await?;
            (attendance, performance)
        } else {
            let attendance = sqlx::query_as::<_, AttendanceRow>(&format!(
                "{ATTENDANCE_SELECT_SQL} ORDER BY seq"
            ))
            .fetch_all(&self.pool)
            .await?;
            let performance = sqlx::query_as::<_, PerformanceRow>(&format!(
                "{PERFORMANCE_SELECT_SQL} ORDER BY seq"
            ))
            .fetch_all(&self.pool)
            .await?;
            (attendance, performance)
        };

        let mut attendance_by_record: HashMap<String, Vec<AttendanceEntry>> = HashMap::new();
        for row in attendance {
            attendance_by_record
                .entry(row.record_id.clone())
                .or_default()
                .push(row.into());
        }

        let mut performance_by_record: HashMap<String, Vec<PerformanceEntry>> = HashMap::new();
        for row in performance {
            performance_by_record
                .entry(row.record_id.clone())
                .or_default()
                .push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| EmployeeRecord {
                attendance: attendance_by_record.remove(&row.id).unwrap_or_default(),
                performance: performance_by_record.remove(&row.id).unwrap_or_default(),
                id: row.id,
                email: row.email,
                role: row.role,
                employee_id: row.employee_id,
                profile: row.profile.0,
            })
            .collect())
    }

    async fn find_one(&self, column: &str, value: &str) -> StoreResult<Option<EmployeeRecord>> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "{EMPLOYEE_SELECT_SQL} WHERE {column} = ?"
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn entry_exists(&self, table: &str, id: &str, date: &str) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE record_id = ? AND entry_date = ? LIMIT 1)"
        ))
        .bind(id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

#[async_trait]
impl RecordStore for MySqlRecordStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<EmployeeRecord>> {
        self.find_one("id", id).await
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<EmployeeRecord>> {
        self.find_one("email", email).await
    }

    async fn list(&self) -> StoreResult<Vec<EmployeeRecord>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            "{EMPLOYEE_SELECT_SQL} ORDER BY created_at, employee_id"
        ))
        .fetch_all(&self.pool)
        .await?;
        self.assemble(rows).await
    }

    async fn count(&self) -> StoreResult<u64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;
        Ok(total.max(0) as u64)
    }

    async fn insert(&self, record: &EmployeeRecord) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO employees (id, email, role, employee_id, profile)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.email)
        .bind(&record.role)
        .bind(&record.employee_id)
        .bind(Json(&record.profile))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_role(&self, id: &str, role: &str) -> StoreResult<u64> {
        // The guard keeps rows_affected equal to "modified" whatever the client flags are.
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET role = ?
            WHERE id = ?
            AND (role IS NULL OR role <> ?)
            "#,
        )
        .bind(role)
        .bind(id)
        .bind(role)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn update_attendance(
        &self,
        id: &str,
        date: &str,
        patch: &AttendancePatch,
    ) -> StoreResult<u64> {
        let column = match patch {
            AttendancePatch::ClockOut(_) => "clock_out",
            AttendancePatch::Payroll(_) => "payroll",
            AttendancePatch::CommunicationRating(_) => "communication_rating",
        };
        let sql = format!(
            "UPDATE attendance_entries SET {column} = ? WHERE record_id = ? AND entry_date = ?"
        );

        let query = sqlx::query(&sql);
        let query = match patch {
            AttendancePatch::ClockOut(value) | AttendancePatch::Payroll(value) => {
                query.bind(value.as_str())
            }
            AttendancePatch::CommunicationRating(value) => query.bind(*value),
        };

        let result = query.bind(id).bind(date).execute(&self.pool).await?;
        if result.rows_affected() > 0 {
            return Ok(result.rows_affected());
        }

        // An unchanged value reports zero affected rows, the entry may still exist.
        debug!(record_id = id, date, "No rows changed, probing for a matching entry");
        Ok(self.entry_exists("attendance_entries", id, date).await? as u64)
    }

    async fn push_attendance(&self, id: &str, entry: &AttendanceEntry) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO attendance_entries
            (record_id, entry_date, week_day, clock_in, clock_out, payroll, communication_rating)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&entry.date)
        .bind(&entry.week_day)
        .bind(&entry.clock_in)
        .bind(&entry.clock_out)
        .bind(&entry.payroll)
        .bind(entry.communication_rating)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn pull_attendance(&self, id: &str, date: &str) -> StoreResult<u64> {
        let result =
            sqlx::query("DELETE FROM attendance_entries WHERE record_id = ? AND entry_date = ?")
                .bind(id)
                .bind(date)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    async fn update_performance(&self, id: &str, date: &str, score: &Number) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE performance_entries SET score = ? WHERE record_id = ? AND entry_date = ?",
        )
        .bind(Json(score))
        .bind(id)
        .bind(date)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() > 0 {
            return Ok(result.rows_affected());
        }

        Ok(self.entry_exists("performance_entries", id, date).await? as u64)
    }

    async fn push_performance(&self, id: &str, entry: &PerformanceEntry) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO performance_entries (record_id, entry_date, score) VALUES (?, ?, ?)",
        )
        .bind(id)
        .bind(&entry.date)
        .bind(Json(&entry.score))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn pull_performance(&self, id: &str, date: &str) -> StoreResult<u64> {
        let result =
            sqlx::query("DELETE FROM performance_entries WHERE record_id = ? AND entry_date = ?")
                .bind(id)
                .bind(date)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}
