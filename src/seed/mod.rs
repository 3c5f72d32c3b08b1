//! One-off bulk load of employees and attendance from JSON documents.

pub mod document;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use sqlx::MySqlPool;
use tracing::{info, warn};

use crate::{
    auth::password::hash_password,
    db,
    model::{attendance::NewAttendance, employee::NewEmployee, role::Role},
};
use document::{BatchReport, read_batch};

#[derive(Args)]
pub struct SeedArgs {
    /// Employee document (array, or object wrapping an array)
    #[arg(long, default_value = "data/employees.json")]
    pub employees: PathBuf,
    /// Attendance document (array, or object wrapping an array)
    #[arg(long, default_value = "data/attendance.json")]
    pub attendance: PathBuf,
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,
    /// Also create or update a login user with this email
    #[arg(long, requires = "admin_password")]
    pub admin_email: Option<String>,
    #[arg(long, env = "SEED_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,
    /// Role given to the seeded login user
    #[arg(long, default_value = "admin")]
    pub admin_role: Role,
}

/// Where a bulk load writes. The seeder only needs these three operations.
pub trait SeedStore {
    async fn clear(&self) -> Result<(), sqlx::Error>;
    async fn insert_employee(&self, employee: NewEmployee) -> Result<(), sqlx::Error>;
    async fn insert_attendance(&self, record: NewAttendance) -> Result<(), sqlx::Error>;
}

impl SeedStore for MySqlPool {
    async fn clear(&self) -> Result<(), sqlx::Error> {
        db::clear_collections(self).await
    }

    async fn insert_employee(&self, employee: NewEmployee) -> Result<(), sqlx::Error> {
        db::insert_employee(self, employee).await.map(drop)
    }

    async fn insert_attendance(&self, record: NewAttendance) -> Result<(), sqlx::Error> {
        db::insert_attendance(self, record).await.map(drop)
    }
}

/// How many entries of one collection made it in.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadOutcome {
    pub read: usize,
    pub invalid: usize,
    pub inserted: usize,
    pub failed: usize,
}

/// Both documents, read and validated.
pub struct Batches {
    pub employees: BatchReport<NewEmployee>,
    pub attendance: BatchReport<NewAttendance>,
}

impl Batches {
    /// Fails if either document cannot be read or parsed.
    pub fn read(employees: &Path, attendance: &Path) -> Result<Self> {
        Ok(Self {
            employees: BatchReport::validate(read_batch(employees)?, NewEmployee::from_value),
            attendance: BatchReport::validate(read_batch(attendance)?, |v| {
                NewAttendance::from_value(v, None)
            }),
        })
    }
}

fn log_invalid<T>(collection: &str, report: &BatchReport<T>) {
    info!(
        collection,
        read = report.read,
        valid = report.valid.len(),
        invalid = report.invalid.len(),
        "Validated batch"
    );
    for entry in &report.invalid {
        warn!(
            collection,
            index = entry.index,
            problems = %entry.describe(),
            item = %entry.item,
            "Skipping invalid entry"
        );
    }
}

/// Inserts every valid entry; a failed insert is counted and the batch carries on.
async fn load_batch<T, Fut>(
    collection: &'static str,
    report: BatchReport<T>,
    key: impl Fn(&T) -> String,
    insert: impl Fn(T) -> Fut,
) -> LoadOutcome
where
    Fut: Future<Output = Result<(), sqlx::Error>>,
{
    log_invalid(collection, &report);
    let mut outcome = LoadOutcome {
        read: report.read,
        invalid: report.invalid.len(),
        ..LoadOutcome::default()
    };

    for entry in report.valid {
        let label = key(&entry);
        match insert(entry).await {
            Ok(()) => outcome.inserted += 1,
            Err(e) => {
                warn!(collection, error = %e, entry = %label, "Insert failed");
                outcome.failed += 1;
            }
        }
    }
    info!(collection, inserted = outcome.inserted, failed = outcome.failed, "Inserted batch");
    outcome
}

/// Clears both collections, then inserts the valid entries of each batch.
pub async fn load(store: &impl SeedStore, batches: Batches) -> Result<(LoadOutcome, LoadOutcome)> {
    info!("Clearing employee and attendance collections...");
    store.clear().await.context("failed to clear collections")?;

    let employees = load_batch(
        "employees",
        batches.employees,
        |e| e.email.clone(),
        |e| store.insert_employee(e),
    )
    .await;
    let attendance = load_batch(
        "attendance",
        batches.attendance,
        |r| r.employee.clone(),
        |r| store.insert_attendance(r),
    )
    .await;

    Ok((employees, attendance))
}

pub async fn run(args: SeedArgs) -> Result<()> {
    // Both documents must parse before anything is cleared.
    let batches = Batches::read(&args.employees, &args.attendance)?;

    info!("Connecting to database...");
    let pool = db::init_db(&args.database_url)
        .await
        .context("failed to connect to database")?;

    let (employees, attendance) = load(&pool, batches).await?;

    if let (Some(email), Some(password)) = (&args.admin_email, &args.admin_password) {
        let hashed = hash_password(password)
            .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;
        db::upsert_user(&pool, email, &hashed, args.admin_role)
            .await
            .context("failed to store login user")?;
        info!(email = %email, role = %args.admin_role, "Login user ready");
    }

    info!(
        read = employees.read + attendance.read,
        employees = employees.inserted,
        attendance = attendance.inserted,
        skipped = employees.invalid + attendance.invalid,
        failed = employees.failed + attendance.failed,
        "Seeding completed successfully!"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::{fs, path::PathBuf, sync::Mutex};

    /// Records every call; inserts for `fail_on` are refused.
    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl RecordingStore {
        fn failing_on(key: &'static str) -> Self {
            Self {
                fail_on: Some(key),
                ..Self::default()
            }
        }

        fn push(&self, call: String) -> Result<(), sqlx::Error> {
            if self.fail_on.is_some_and(|key| call.ends_with(key)) {
                return Err(sqlx::Error::RowNotFound);
            }
            self.calls.lock().unwrap().push(call);
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SeedStore for RecordingStore {
        async fn clear(&self) -> Result<(), sqlx::Error> {
            self.push("clear".into())
        }

        async fn insert_employee(&self, employee: NewEmployee) -> Result<(), sqlx::Error> {
            self.push(format!("employee {}", employee.email))
        }

        async fn insert_attendance(&self, record: NewAttendance) -> Result<(), sqlx::Error> {
            self.push(format!("attendance {}", record.employee))
        }
    }

    fn employee(email: &str) -> Value {
        json!({ "name": "N", "email": email, "designation": "Clerk", "basicSalary": 1000 })
    }

    fn batches(employees: Vec<Value>, attendance: Vec<Value>) -> Batches {
        Batches {
            employees: BatchReport::validate(employees, NewEmployee::from_value),
            attendance: BatchReport::validate(attendance, |v| NewAttendance::from_value(v, None)),
        }
    }

    fn write_temp(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("hr-seed-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[actix_web::test]
    async fn failed_insert_does_not_stop_the_batch() {
        let store = RecordingStore::failing_on("b@company.com");
        let input = batches(
            vec![
                employee("a@company.com"),
                employee("b@company.com"),
                json!({ "name": "no salary" }),
                employee("c@company.com"),
            ],
            vec![json!({ "employee": "E1", "date": "2024-01-03", "status": "Leave" })],
        );

        let (employees, attendance) = load(&store, input).await.unwrap();

        assert_eq!(
            employees,
            LoadOutcome {
                read: 4,
                invalid: 1,
                inserted: 2,
                failed: 1
            }
        );
        assert_eq!(attendance.inserted, 1);
        assert_eq!(
            store.calls(),
            vec![
                "clear",
                "employee a@company.com",
                "employee c@company.com",
                "attendance E1"
            ]
        );
    }

    #[actix_web::test]
    async fn failed_clear_inserts_nothing() {
        let store = RecordingStore::failing_on("clear");
        let input = batches(vec![employee("a@company.com")], Vec::new());

        let err = load(&store, input).await.unwrap_err();
        assert!(err.to_string().contains("failed to clear"));
        assert!(store.calls().is_empty());
    }

    #[test]
    fn malformed_attendance_document_fails_before_loading() {
        let employees = write_temp(&json!([employee("a@company.com")]).to_string());
        let attendance = write_temp("[{\"employee\": \"E1\",");

        let result = Batches::read(&employees, &attendance);
        fs::remove_file(&employees).unwrap();
        fs::remove_file(&attendance).unwrap();

        let err = result.err().unwrap();
        assert!(err.to_string().contains("is not valid JSON"));
    }

    #[test]
    fn reads_and_validates_both_documents() {
        let employees = write_temp(&json!({ "employees": [employee("a@company.com")] }).to_string());
        let attendance = write_temp(
            &json!([{ "employee": "E1", "date": "2024-01-03" }]).to_string(),
        );

        let result = Batches::read(&employees, &attendance);
        fs::remove_file(&employees).unwrap();
        fs::remove_file(&attendance).unwrap();

        let batches = result.unwrap();
        assert_eq!(batches.employees.valid.len(), 1);
        assert_eq!(batches.attendance.invalid[0].describe(), "missing status");
    }
}
