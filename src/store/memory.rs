use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde_json::Number;

use super::{RecordStore, StoreError, StoreResult};
use crate::model::employee::{AttendanceEntry, AttendancePatch, EmployeeRecord, PerformanceEntry};

/// In-process store. Mirrors the uniqueness keys of the MySQL schema.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<EmployeeRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Vec<EmployeeRecord>>> {
        self.records
            .read()
            .map_err(|_| StoreError::Unavailable("record lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<EmployeeRecord>>> {
        self.records
            .write()
            .map_err(|_| StoreError::Unavailable("record lock poisoned".into()))
    }

    /// Runs `f` against the record with `id`. A missing record matches nothing.
    fn with_record<T>(
        &self,
        id: &str,
        missing: T,
        f: impl FnOnce(&mut EmployeeRecord) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut records = self.write()?;
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => f(record),
            None => Ok(missing),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<EmployeeRecord>> {
        Ok(self.read()?.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<EmployeeRecord>> {
        Ok(self.read()?.iter().find(|r| r.email == email).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<EmployeeRecord>> {
        Ok(self.read()?.clone())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.read()?.len() as u64)
    }

    async fn insert(&self, record: &EmployeeRecord) -> StoreResult<()> {
        let mut records = self.write()?;
        if records.iter().any(|r| r.email == record.email) {
            return Err(StoreError::Duplicate(format!("email {}", record.email)));
        }
        if records.iter().any(|r| r.employee_id == record.employee_id) {
            return Err(StoreError::Duplicate(format!(
                "employeeId {}",
                record.employee_id
            )));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn set_role(&self, id: &str, role: &str) -> StoreResult<u64> {
        self.with_record(id, 0, |record| {
            if record.role.as_deref() == Some(role) {
                return Ok(0);
            }
            record.role = Some(role.to_string());
            Ok(1)
        })
    }

    async fn update_attendance(
        &self,
        id: &str,
        date: &str,
        patch: &AttendancePatch,
    ) -> StoreResult<u64> {
        self.with_record(id, 0, |record| {
            match record.attendance.iter_mut().find(|e| e.date == date) {
                Some(entry) => {
                    patch.apply(entry);
                    Ok(1)
                }
                None => Ok(0),
            }
        })
    }

    async fn push_attendance(&self, id: &str, entry: &AttendanceEntry) -> StoreResult<()> {
        self.with_record(id, (), |record| {
            if record.attendance_on(&entry.date).is_some() {
                return Err(StoreError::Duplicate(format!("attendance {}", entry.date)));
            }
            record.attendance.push(entry.clone());
            Ok(())
        })
    }

    async fn pull_attendance(&self, id: &str, date: &str) -> StoreResult<u64> {
        self.with_record(id, 0, |record| {
            let before = record.attendance.len();
            record.attendance.retain(|e| e.date != date);
            Ok((before - record.attendance.len()) as u64)
        })
    }

    async fn update_performance(&self, id: &str, date: &str, score: &Number) -> StoreResult<u64> {
        self.with_record(id, 0, |record| {
            match record.performance.iter_mut().find(|e| e.date == date) {
                Some(entry) => {
                    entry.score = score.clone();
                    Ok(1)
                }
                None => Ok(0),
            }
        })
    }

    async fn push_performance(&self, id: &str, entry: &PerformanceEntry) -> StoreResult<()> {
        self.with_record(id, (), |record| {
            if record.performance_on(&entry.date).is_some() {
                return Err(StoreError::Duplicate(format!("performance {}", entry.date)));
            }
            record.performance.push(entry.clone());
            Ok(())
        })
    }

    async fn pull_performance(&self, id: &str, date: &str) -> StoreResult<u64> {
        self.with_record(id, 0, |record| {
            let before = record.performance.len();
            record.performance.retain(|e| e.date != date);
            Ok((before - record.performance.len()) as u64)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn record(id: &str, email: &str, employee_id: &str) -> EmployeeRecord {
        EmployeeRecord {
            id: id.into(),
            email: email.into(),
            role: None,
            employee_id: employee_id.into(),
            attendance: vec![],
            performance: vec![],
            profile: Map::new(),
        }
    }

    #[actix_web::test]
    async fn insert_rejects_duplicate_email() {
        let store = MemoryRecordStore::new();
        store.insert(&record("1", "a@x.io", "20250001")).await.unwrap();

        let err = store
            .insert(&record("2", "a@x.io", "20250002"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn update_reports_matched_even_when_value_is_unchanged() {
        let store = MemoryRecordStore::new();
        store.insert(&record("1", "a@x.io", "20250001")).await.unwrap();
        store
            .push_attendance("1", &AttendanceEntry::blank("2025-07-01"))
            .await
            .unwrap();

        let patch = AttendancePatch::Payroll(String::new());
        assert_eq!(store.update_attendance("1", "2025-07-01", &patch).await.unwrap(), 1);
        assert_eq!(store.update_attendance("1", "2025-07-02", &patch).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn set_role_counts_modifications_only() {
        let store = MemoryRecordStore::new();
        store.insert(&record("1", "a@x.io", "20250001")).await.unwrap();

        assert_eq!(store.set_role("1", "admin").await.unwrap(), 1);
        assert_eq!(store.set_role("1", "admin").await.unwrap(), 0);
        assert_eq!(store.set_role("missing", "admin").await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn pull_removes_only_matching_date() {
        let store = MemoryRecordStore::new();
        store.insert(&record("1", "a@x.io", "20250001")).await.unwrap();
        for date in ["2025-07-01", "2025-07-02"] {
            store
                .push_performance("1", &PerformanceEntry { date: date.into(), score: 1.into() })
                .await
                .unwrap();
        }

        assert_eq!(store.pull_performance("1", "2025-07-01").await.unwrap(), 1);
        let loaded = store.find_by_id("1").await.unwrap().unwrap();
        assert_eq!(loaded.performance.len(), 1);
        assert_eq!(loaded.performance[0].date, "2025-07-02");
    }
}
