use sqlx::MySqlPool;

use crate::model::{
    attendance::{AttendanceRecord, AttendanceRow, NewAttendance},
    employee::{Employee, NewEmployee},
    role::Role,
    user::UserRow,
};

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        designation VARCHAR(255) NOT NULL,
        basic_salary DOUBLE NOT NULL,
        allowances DOUBLE NOT NULL DEFAULT 0,
        deductions DOUBLE NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        employee VARCHAR(255) NOT NULL,
        date DATE NOT NULL,
        status VARCHAR(16) NOT NULL DEFAULT 'Present',
        INDEX idx_attendance_date (date)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
        email VARCHAR(255) NOT NULL UNIQUE,
        password VARCHAR(255) NOT NULL,
        role_id TINYINT UNSIGNED NOT NULL
    )
    "#,
];

pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPool::connect(database_url).await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await?;
    }
    Ok(pool)
}

// -------------------- employees --------------------

pub async fn fetch_employees(pool: &MySqlPool) -> Result<Vec<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, name, email, designation, basic_salary, allowances, deductions
        FROM employees
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn find_employee(pool: &MySqlPool, id: u64) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, name, email, designation, basic_salary, allowances, deductions
        FROM employees
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn insert_employee(
    pool: &MySqlPool,
    employee: NewEmployee,
) -> Result<Employee, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO employees
        (name, email, designation, basic_salary, allowances, deductions)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&employee.name)
    .bind(&employee.email)
    .bind(&employee.designation)
    .bind(employee.basic_salary)
    .bind(employee.allowances)
    .bind(employee.deductions)
    .execute(pool)
    .await?;

    Ok(employee.with_id(result.last_insert_id()))
}

// -------------------- attendance --------------------

pub async fn fetch_attendance(pool: &MySqlPool) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AttendanceRow>(
        r#"
        SELECT id, employee, date, status
        FROM attendance
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| AttendanceRecord::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e))))
        .collect()
}

pub async fn insert_attendance(
    pool: &MySqlPool,
    record: NewAttendance,
) -> Result<AttendanceRecord, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee, date, status)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&record.employee)
    .bind(record.date)
    .bind(record.status.as_ref())
    .execute(pool)
    .await?;

    Ok(record.with_id(result.last_insert_id()))
}

/// Empties both collections ahead of a bulk load.
pub async fn clear_collections(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM attendance").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM employees").execute(&mut *tx).await?;
    tx.commit().await
}

// -------------------- users --------------------

pub async fn find_user_by_email(
    pool: &MySqlPool,
    email: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email, password, role_id
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn upsert_user(
    pool: &MySqlPool,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (email, password, role_id)
        VALUES (?, ?, ?)
        ON DUPLICATE KEY UPDATE password = VALUES(password), role_id = VALUES(role_id)
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .bind(role.id())
    .execute(pool)
    .await?;
    Ok(())
}
