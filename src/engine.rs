//! Record Update Engine.
//!
//! Applies named actions to one employee record. Upsert-or-update actions try
//! the matched-element update first and append only when nothing matched, so
//! a date never gets two entries.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use futures::lock::Mutex;
use serde_json::Value;
use strum::{AsRefStr, EnumString};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::model::employee::{
    AttendanceEntry, AttendancePatch, EmployeeRecord, FeedbackDay, PerformanceEntry,
    RESERVED_PROFILE_KEYS,
};
use crate::models::{ActionRequest, DateRequest, NewEmployee, PerformanceRequest};
use crate::store::RecordStore;
use crate::utils::record_locks::RecordLocks;

/// Actions dispatched by the `action` field of `PATCH /users/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum Action {
    ClockIn,
    ClockOut,
    UpdatePayroll,
    UpdateCommunication,
    UpdateRole,
}

/// Successful result of a mutation. `Created` maps to 201, `Done` to 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created(&'static str),
    Done(&'static str),
}

impl Outcome {
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Created(message) | Outcome::Done(message) => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    pub inserted_id: String,
    pub employee_id: String,
}

const USER_NOT_FOUND: &str = "User not found";
const DATE_REQUIRED: &str = "Date is required";

fn required(value: Option<String>, message: &'static str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(AppError::BadRequest(message))
}

/// `YYYY` followed by the 1-based sequence zero-padded to four digits.
pub fn format_employee_id(year: i32, sequence: u64) -> String {
    format!("{year:04}{sequence:04}")
}

pub struct RecordEngine {
    store: Arc<dyn RecordStore>,
    locks: RecordLocks,
    registration: Mutex<()>,
}

impl RecordEngine {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            locks: RecordLocks::default(),
            registration: Mutex::new(()),
        }
    }

    async fn load(&self, record_id: &str) -> Result<EmployeeRecord, AppError> {
        self.store
            .find_by_id(record_id)
            .await?
            .ok_or(AppError::NotFound(USER_NOT_FOUND))
    }

    // ---------------- reads ----------------

    pub async fn find_by_email(&self, email: &str) -> Result<EmployeeRecord, AppError> {
        self.store
            .find_by_email(email)
            .await?
            .ok_or(AppError::NotFound(USER_NOT_FOUND))
    }

    pub async fn list(&self) -> Result<Vec<EmployeeRecord>, AppError> {
        Ok(self.store.list().await?)
    }

    /// Role is read from the stored record, never from token claims.
    pub async fn is_admin(&self, email: &str) -> Result<bool, AppError> {
        let record = self.store.find_by_email(email).await?;
        Ok(record.is_some_and(|r| r.is_admin()))
    }

    pub async fn feedback(&self, email: Option<String>) -> Result<Vec<FeedbackDay>, AppError> {
        let email = required(email, "Email required")?;
        let record = self.find_by_email(&email).await?;
        Ok(record.attendance.iter().map(FeedbackDay::from).collect())
    }

    // ---------------- registration ----------------

    #[instrument(name = "register", skip(self, candidate))]
    pub async fn register(&self, candidate: NewEmployee) -> Result<Registered, AppError> {
        let email = required(candidate.email, "Email is required")?;

        // Pre-check and the count-based id must not interleave with another registration.
        let _guard = self.registration.lock().await;

        if self.store.find_by_email(&email).await?.is_some() {
            info!(email = %email, "Registration rejected: email taken");
            return Err(AppError::Conflict("User already exists"));
        }

        let count = self.store.count().await?;
        let employee_id = format_employee_id(Utc::now().year(), count + 1);

        let mut profile = candidate.profile;
        for key in RESERVED_PROFILE_KEYS {
            profile.remove(key);
        }

        let record = EmployeeRecord {
            id: Uuid::new_v4().to_string(),
            email,
            role: candidate.role.filter(|r| !r.is_empty()),
            employee_id,
            attendance: Vec::new(),
            performance: Vec::new(),
            profile,
        };

        if let Err(err) = self.store.insert(&record).await {
            let err = AppError::from(err);
            if !matches!(err, AppError::Conflict(_)) {
                return Err(err);
            }
            // Another process may have taken the email or the sequence number.
            if self.store.find_by_email(&record.email).await?.is_some() {
                return Err(AppError::Conflict("User already exists"));
            }
            warn!(employee_id = %record.employee_id, "Employee id already assigned");
            return Err(AppError::Conflict("Employee id already assigned"));
        }

        info!(record_id = %record.id, employee_id = %record.employee_id, "User created");
        Ok(Registered {
            inserted_id: record.id,
            employee_id: record.employee_id,
        })
    }

    // ---------------- actions ----------------

    #[instrument(name = "apply_action", skip(self, request), fields(action = ?request.action))]
    pub async fn apply_action(
        &self,
        record_id: &str,
        request: ActionRequest,
    ) -> Result<Outcome, AppError> {
        let lock = self.locks.for_record(record_id);
        let _guard = lock.lock().await;

        let record = self.load(record_id).await?;

        let action = request
            .action
            .as_deref()
            .and_then(|name| Action::from_str(name).ok())
            .ok_or(AppError::BadRequest("Invalid action"))?;

        match action {
            Action::ClockIn => self.clock_in(&record, request).await,
            Action::ClockOut => self.clock_out(&record, request).await,
            Action::UpdatePayroll => {
                let date = required(request.date, DATE_REQUIRED)?;
                let payroll = request
                    .payroll
                    .ok_or(AppError::BadRequest("Payroll is required"))?;
                let blank = AttendanceEntry {
                    payroll: payroll.clone(),
                    ..AttendanceEntry::blank(date.as_str())
                };
                self.upsert_attendance(&record, &date, AttendancePatch::Payroll(payroll), blank)
                    .await
                    .map(|created| {
                        if created {
                            Outcome::Created("Payroll added to new entry.")
                        } else {
                            Outcome::Done("Payroll updated successfully.")
                        }
                    })
            }
            Action::UpdateCommunication => {
                let date = required(request.date, DATE_REQUIRED)?;
                let rating = request
                    .communication_rating
                    .ok_or(AppError::BadRequest("Communication rating is required"))?;
                let blank = AttendanceEntry {
                    communication_rating: rating,
                    ..AttendanceEntry::blank(date.as_str())
                };
                self.upsert_attendance(
                    &record,
                    &date,
                    AttendancePatch::CommunicationRating(rating),
                    blank,
                )
                .await
                .map(|created| {
                    if created {
                        Outcome::Created("Communication added to new entry.")
                    } else {
                        Outcome::Done("Communication updated")
                    }
                })
            }
            Action::UpdateRole => {
                let role = required(request.role, "Role is required")?;
                let modified = self.store.set_role(&record.id, &role).await?;
                if modified == 0 {
                    return Err(AppError::NotFound("Failed to update role"));
                }
                info!(record_id = %record.id, role = %role, "Role updated");
                Ok(Outcome::Done("Role updated"))
            }
        }
    }

    async fn clock_in(
        &self,
        record: &EmployeeRecord,
        request: ActionRequest,
    ) -> Result<Outcome, AppError> {
        let date = required(request.date, DATE_REQUIRED)?;
        if record.attendance_on(&date).is_some() {
            return Err(AppError::Conflict("Already clocked in today."));
        }

        let entry = AttendanceEntry {
            week_day: request.week_day.unwrap_or_default(),
            clock_in: request.clock_in.unwrap_or_default(),
            ..AttendanceEntry::blank(date)
        };
        self.store
            .push_attendance(&record.id, &entry)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => AppError::Conflict("Already clocked in today."),
                other => other,
            })?;

        Ok(Outcome::Created("Clock-in recorded."))
    }

    async fn clock_out(
        &self,
        record: &EmployeeRecord,
        request: ActionRequest,
    ) -> Result<Outcome, AppError> {
        let date = required(request.date, DATE_REQUIRED)?;
        let clock_out = request
            .clock_out
            .ok_or(AppError::BadRequest("Clock-out time is required"))?;

        let matched = self
            .store
            .update_attendance(&record.id, &date, &AttendancePatch::ClockOut(clock_out))
            .await?;
        if matched == 0 {
            // Reported as success regardless, callers rely on it.
            warn!(record_id = %record.id, date = %date, "Clock-out without a matching clock-in");
        }

        Ok(Outcome::Done("Clock-out recorded."))
    }

    /// Returns `true` when a new entry was appended.
    async fn upsert_attendance(
        &self,
        record: &EmployeeRecord,
        date: &str,
        patch: AttendancePatch,
        blank: AttendanceEntry,
    ) -> Result<bool, AppError> {
        let matched = self.store.update_attendance(&record.id, date, &patch).await?;
        if matched > 0 {
            return Ok(false);
        }

        debug!(record_id = %record.id, date, "No attendance entry for date, appending");
        self.store.push_attendance(&record.id, &blank).await?;
        Ok(true)
    }

    #[instrument(name = "set_performance", skip(self, request))]
    pub async fn set_performance(
        &self,
        record_id: &str,
        request: PerformanceRequest,
    ) -> Result<Outcome, AppError> {
        const INVALID: AppError = AppError::BadRequest("Date and numeric score required");

        let date = request.date.filter(|d| !d.trim().is_empty()).ok_or(INVALID)?;
        let score = match request.score {
            Some(Value::Number(n)) => n,
            _ => return Err(INVALID),
        };

        let lock = self.locks.for_record(record_id);
        let _guard = lock.lock().await;

        let record = self.load(record_id).await?;

        let matched = self.store.update_performance(&record.id, &date, &score).await?;
        if matched > 0 {
            return Ok(Outcome::Done("Performance updated"));
        }

        self.store
            .push_performance(&record.id, &PerformanceEntry { date, score })
            .await?;
        Ok(Outcome::Created("Performance added"))
    }

    // ---------------- resets ----------------

    pub async fn reset_communication(
        &self,
        record_id: &str,
        request: DateRequest,
    ) -> Result<Outcome, AppError> {
        self.patch_day(record_id, request, AttendancePatch::CommunicationRating(0))
            .await?;
        Ok(Outcome::Done("Communication reset"))
    }

    pub async fn reset_payroll(
        &self,
        record_id: &str,
        request: DateRequest,
    ) -> Result<Outcome, AppError> {
        self.patch_day(record_id, request, AttendancePatch::Payroll(String::new()))
            .await?;
        Ok(Outcome::Done("Payroll reset"))
    }

    pub async fn reset_performance(
        &self,
        record_id: &str,
        request: DateRequest,
    ) -> Result<Outcome, AppError> {
        let date = required(request.date, DATE_REQUIRED)?;

        let lock = self.locks.for_record(record_id);
        let _guard = lock.lock().await;

        let record = self.load(record_id).await?;
        let removed = self.store.pull_performance(&record.id, &date).await?;
        debug!(record_id, date = %date, removed, "Performance reset");
        Ok(Outcome::Done("Performance reset"))
    }

    #[instrument(name = "delete_attendance", skip(self, request))]
    pub async fn delete_attendance(
        &self,
        record_id: &str,
        request: DateRequest,
    ) -> Result<Outcome, AppError> {
        let date = required(request.date, DATE_REQUIRED)?;

        let lock = self.locks.for_record(record_id);
        let _guard = lock.lock().await;

        let record = self.load(record_id).await?;
        let attendance = self.store.pull_attendance(&record.id, &date).await?;
        let performance = self.store.pull_performance(&record.id, &date).await?;
        debug!(date = %date, attendance, performance, "Day removed");
        Ok(Outcome::Done("Attendance & performance deleted"))
    }

    /// Sets one field on the entry for the requested date, no-op when none matches.
    async fn patch_day(
        &self,
        record_id: &str,
        request: DateRequest,
        patch: AttendancePatch,
    ) -> Result<(), AppError> {
        let date = required(request.date, DATE_REQUIRED)?;

        let lock = self.locks.for_record(record_id);
        let _guard = lock.lock().await;

        let record = self.load(record_id).await?;
        let matched = self.store.update_attendance(&record.id, &date, &patch).await?;
        debug!(record_id, date = %date, matched, ?patch, "Attendance field reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecordStore;
    use serde_json::{Map, Number, json};

    async fn engine_with_user() -> (RecordEngine, String) {
        let engine = RecordEngine::new(Arc::new(MemoryRecordStore::new()));
        let registered = engine
            .register(NewEmployee {
                email: Some("karim@example.com".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        (engine, registered.inserted_id)
    }

    fn action(name: &str, date: &str) -> ActionRequest {
        ActionRequest {
            action: Some(name.into()),
            date: Some(date.into()),
            ..Default::default()
        }
    }

    fn day(date: &str) -> DateRequest {
        DateRequest {
            date: Some(date.into()),
        }
    }

    #[test]
    fn employee_id_is_year_and_padded_sequence() {
        assert_eq!(format_employee_id(2025, 1), "20250001");
        assert_eq!(format_employee_id(2025, 42), "20250042");
    }

    #[test]
    fn action_names_are_camel_case() {
        assert_eq!(Action::from_str("updatePayroll").unwrap(), Action::UpdatePayroll);
        assert_eq!(Action::ClockIn.as_ref(), "clockIn");
        assert!(Action::from_str("ClockIn").is_err());
    }

    #[actix_web::test]
    async fn registration_assigns_stable_sequential_ids() {
        let engine = RecordEngine::new(Arc::new(MemoryRecordStore::new()));
        let year = Utc::now().year();

        let mut profile = Map::new();
        profile.insert("name".into(), json!("A"));
        profile.insert("employeeId".into(), json!("forged"));

        let first = engine
            .register(NewEmployee {
                email: Some("a@x.io".into()),
                role: None,
                profile,
            })
            .await
            .unwrap();
        let second = engine
            .register(NewEmployee {
                email: Some("b@x.io".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(first.employee_id, format_employee_id(year, 1));
        assert_eq!(second.employee_id, format_employee_id(year, 2));

        let loaded = engine.find_by_email("a@x.io").await.unwrap();
        assert_eq!(loaded.employee_id, first.employee_id);
        assert!(!loaded.profile.contains_key("employeeId"));
        assert_eq!(loaded.profile["name"], "A");
    }

    #[actix_web::test]
    async fn registration_rejects_duplicate_and_missing_email() {
        let (engine, _) = engine_with_user().await;

        let dup = engine
            .register(NewEmployee {
                email: Some("karim@example.com".into()),
                ..Default::default()
            })
            .await;
        assert!(matches!(dup, Err(AppError::Conflict("User already exists"))));

        let missing = engine.register(NewEmployee::default()).await;
        assert!(matches!(missing, Err(AppError::BadRequest("Email is required"))));
    }

    #[actix_web::test]
    async fn employee_id_collision_is_not_reported_as_taken_email() {
        let store = Arc::new(MemoryRecordStore::new());
        let engine = RecordEngine::new(store.clone());
        let year = Utc::now().year();

        // Written by another process: holds the sequence number this one computes next.
        store
            .insert(&EmployeeRecord {
                id: "elsewhere".into(),
                email: "z@x.io".into(),
                role: None,
                employee_id: format_employee_id(year, 2),
                attendance: vec![],
                performance: vec![],
                profile: Map::new(),
            })
            .await
            .unwrap();

        let clash = engine
            .register(NewEmployee {
                email: Some("b@x.io".into()),
                ..Default::default()
            })
            .await;
        assert!(matches!(
            clash,
            Err(AppError::Conflict("Employee id already assigned"))
        ));
        assert!(engine.find_by_email("b@x.io").await.is_err());
    }

    #[actix_web::test]
    async fn clock_in_twice_conflicts_without_growing() {
        let (engine, id) = engine_with_user().await;

        let mut first = action("clockIn", "2025-07-01");
        first.clock_in = Some("09:00".into());
        first.week_day = Some("Tuesday".into());
        let outcome = engine.apply_action(&id, first).await.unwrap();
        assert_eq!(outcome, Outcome::Created("Clock-in recorded."));

        let again = engine.apply_action(&id, action("clockIn", "2025-07-01")).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));

        let record = engine.load(&id).await.unwrap();
        assert_eq!(record.attendance.len(), 1);
        let entry = &record.attendance[0];
        assert_eq!(entry.clock_in, "09:00");
        assert_eq!(entry.week_day, "Tuesday");
        assert_eq!(entry.clock_out, "");
        assert_eq!(entry.payroll, "");
        assert_eq!(entry.communication_rating, 0);
    }

    #[actix_web::test]
    async fn clock_out_succeeds_even_without_match() {
        let (engine, id) = engine_with_user().await;
        engine.apply_action(&id, action("clockIn", "2025-07-01")).await.unwrap();

        let mut out = action("clockOut", "2025-07-01");
        out.clock_out = Some("17:30".into());
        assert_eq!(
            engine.apply_action(&id, out).await.unwrap(),
            Outcome::Done("Clock-out recorded.")
        );

        let mut stray = action("clockOut", "2025-07-09");
        stray.clock_out = Some("17:30".into());
        assert!(engine.apply_action(&id, stray).await.is_ok());

        let record = engine.load(&id).await.unwrap();
        assert_eq!(record.attendance.len(), 1);
        assert_eq!(record.attendance[0].clock_out, "17:30");
    }

    #[actix_web::test]
    async fn update_payroll_creates_then_updates_in_place() {
        let (engine, id) = engine_with_user().await;

        let mut first = action("updatePayroll", "2025-07-01");
        first.payroll = Some("paid".into());
        assert!(matches!(
            engine.apply_action(&id, first).await.unwrap(),
            Outcome::Created(_)
        ));

        let mut second = action("updatePayroll", "2025-07-01");
        second.payroll = Some("bonus".into());
        assert!(matches!(
            engine.apply_action(&id, second).await.unwrap(),
            Outcome::Done(_)
        ));

        let record = engine.load(&id).await.unwrap();
        assert_eq!(record.attendance.len(), 1);
        let entry = &record.attendance[0];
        assert_eq!(entry.payroll, "bonus");
        assert_eq!(entry.clock_in, "");
        assert_eq!(entry.week_day, "");
        assert_eq!(entry.communication_rating, 0);
    }

    #[actix_web::test]
    async fn same_value_update_still_counts_as_match() {
        let (engine, id) = engine_with_user().await;

        let rate = || {
            let mut req = action("updateCommunication", "2025-07-01");
            req.communication_rating = Some(4);
            req
        };

        assert_eq!(
            engine.apply_action(&id, rate()).await.unwrap(),
            Outcome::Created("Communication added to new entry.")
        );
        assert_eq!(
            engine.apply_action(&id, rate()).await.unwrap(),
            Outcome::Done("Communication updated")
        );

        let record = engine.load(&id).await.unwrap();
        assert_eq!(record.attendance.len(), 1);
        assert_eq!(record.attendance[0].communication_rating, 4);
    }

    #[actix_web::test]
    async fn concurrent_upserts_on_one_day_keep_a_single_entry() {
        let (engine, id) = engine_with_user().await;

        let calls = (0..16).map(|i| {
            let mut req = action("updatePayroll", "2025-07-01");
            req.payroll = Some(format!("run-{i}"));
            engine.apply_action(&id, req)
        });
        let outcomes = futures::future::join_all(calls).await;

        let created = outcomes
            .iter()
            .filter(|o| matches!(o, Ok(Outcome::Created(_))))
            .count();
        assert_eq!(created, 1);
        assert!(outcomes.iter().all(|o| o.is_ok()));

        let record = engine.load(&id).await.unwrap();
        assert_eq!(record.attendance.len(), 1);
    }

    #[actix_web::test]
    async fn update_role_requires_role_and_a_modification() {
        let (engine, id) = engine_with_user().await;

        let missing = engine.apply_action(&id, action("updateRole", "")).await;
        assert!(matches!(missing, Err(AppError::BadRequest("Role is required"))));

        let mut req = action("updateRole", "");
        req.role = Some("admin".into());
        assert_eq!(
            engine.apply_action(&id, req).await.unwrap(),
            Outcome::Done("Role updated")
        );
        assert!(engine.is_admin("karim@example.com").await.unwrap());

        let mut same = action("updateRole", "");
        same.role = Some("admin".into());
        let unchanged = engine.apply_action(&id, same).await;
        assert!(matches!(unchanged, Err(AppError::NotFound("Failed to update role"))));
    }

    #[actix_web::test]
    async fn unknown_action_and_unknown_record() {
        let (engine, id) = engine_with_user().await;

        let invalid = engine.apply_action(&id, action("dance", "2025-07-01")).await;
        assert!(matches!(invalid, Err(AppError::BadRequest("Invalid action"))));

        let missing = engine
            .apply_action("no-such-id", action("clockIn", "2025-07-01"))
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(USER_NOT_FOUND))));
    }

    #[actix_web::test]
    async fn performance_set_is_idempotent_per_date() {
        let (engine, id) = engine_with_user().await;

        let set = |score: Value| PerformanceRequest {
            date: Some("2025-07-01".into()),
            score: Some(score),
        };

        assert_eq!(
            engine.set_performance(&id, set(json!(90))).await.unwrap(),
            Outcome::Created("Performance added")
        );
        assert_eq!(
            engine.set_performance(&id, set(json!(85))).await.unwrap(),
            Outcome::Done("Performance updated")
        );

        let record = engine.load(&id).await.unwrap();
        assert_eq!(record.performance.len(), 1);
        assert_eq!(record.performance[0].score, Number::from(85));

        let bad = engine.set_performance(&id, set(json!("90"))).await;
        assert!(matches!(bad, Err(AppError::BadRequest(_))));
    }

    #[actix_web::test]
    async fn resets_clear_fields_and_ignore_missing_dates() {
        let (engine, id) = engine_with_user().await;

        let mut pay = action("updatePayroll", "2025-07-01");
        pay.payroll = Some("paid".into());
        engine.apply_action(&id, pay).await.unwrap();
        let mut comm = action("updateCommunication", "2025-07-01");
        comm.communication_rating = Some(5);
        engine.apply_action(&id, comm).await.unwrap();

        engine.reset_payroll(&id, day("2025-07-01")).await.unwrap();
        engine.reset_communication(&id, day("2025-07-01")).await.unwrap();
        engine.reset_payroll(&id, day("2025-08-01")).await.unwrap();

        let record = engine.load(&id).await.unwrap();
        assert_eq!(record.attendance.len(), 1);
        assert_eq!(record.attendance[0].payroll, "");
        assert_eq!(record.attendance[0].communication_rating, 0);

        let missing = engine.reset_payroll("nope", day("2025-07-01")).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn attendance_delete_removes_both_entries() {
        let (engine, id) = engine_with_user().await;

        engine.apply_action(&id, action("clockIn", "2025-07-01")).await.unwrap();
        engine.apply_action(&id, action("clockIn", "2025-07-02")).await.unwrap();
        engine
            .set_performance(
                &id,
                PerformanceRequest {
                    date: Some("2025-07-01".into()),
                    score: Some(json!(70)),
                },
            )
            .await
            .unwrap();

        engine.delete_attendance(&id, day("2025-07-01")).await.unwrap();
        let record = engine.load(&id).await.unwrap();
        assert_eq!(record.attendance.len(), 1);
        assert_eq!(record.attendance[0].date, "2025-07-02");
        assert!(record.performance.is_empty());

        // No entries for this date: nothing changes, no error.
        engine.delete_attendance(&id, day("2025-12-25")).await.unwrap();
        assert_eq!(engine.load(&id).await.unwrap(), record);

        engine.reset_performance(&id, day("2025-07-02")).await.unwrap();
    }

    #[actix_web::test]
    async fn feedback_maps_defaults() {
        let (engine, id) = engine_with_user().await;
        let mut clock_in = action("clockIn", "2025-07-01");
        clock_in.clock_in = Some("09:00".into());
        engine.apply_action(&id, clock_in).await.unwrap();

        let days = engine
            .feedback(Some("karim@example.com".into()))
            .await
            .unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].clock_in, "09:00");
        assert_eq!(days[0].clock_out, "Not Recorded");
        assert_eq!(days[0].payroll, "N/A");
        assert_eq!(days[0].communication_rating, 0);

        assert!(matches!(
            engine.feedback(None).await,
            Err(AppError::BadRequest("Email required"))
        ));
        assert!(matches!(
            engine.feedback(Some("ghost@x.io".into())).await,
            Err(AppError::NotFound(_))
        ));
    }
}
