use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Admin, AdminToken, Division, Employee, EmployeeChanges, EmployeeRecord, EmployeeWithDivision,
    NewAdmin, ProfileUpdate,
};
use crate::database::store::{like_pattern, DivisionFilter, EmployeeFilter, Store};
use crate::types::PageRequest;

const ADMIN_COLUMNS: &str =
    "id, name, username, email, phone, password_hash, created_at, updated_at";
const EMPLOYEE_COLUMNS: &str =
    "id, image, name, phone, division_id, position, created_at, updated_at";

/// PostgreSQL-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map unique-constraint violations on `column` to `DatabaseError::Duplicate`
fn unique_violation(err: sqlx::Error, column: &str, value: &str) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            let constraint = db_err.constraint().unwrap_or_default();
            let field = if constraint.contains("username") {
                "username"
            } else if constraint.contains("email") {
                "email"
            } else {
                column
            };
            DatabaseError::Duplicate {
                field: field.to_string(),
                value: value.to_string(),
            }
        }
        _ => DatabaseError::Sqlx(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_admin(&self, admin: NewAdmin) -> Result<Admin, DatabaseError> {
        let sql = format!(
            "INSERT INTO admins (id, name, username, email, phone, password_hash)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ADMIN_COLUMNS}"
        );
        sqlx::query_as::<_, Admin>(&sql)
            .bind(Uuid::now_v7())
            .bind(&admin.name)
            .bind(&admin.username)
            .bind(&admin.email)
            .bind(&admin.phone)
            .bind(&admin.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_violation(e, "username", &admin.username))
    }

    async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>, DatabaseError> {
        let sql = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE username = $1");
        let admin = sqlx::query_as::<_, Admin>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(admin)
    }

    async fn email_taken(&self, email: &str, except: Uuid) -> Result<bool, DatabaseError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM admins WHERE email = $1 AND id <> $2)",
        )
        .bind(email)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn update_admin_profile(&self, id: Uuid, update: ProfileUpdate) -> Result<Admin, DatabaseError> {
        let sql = format!(
            "UPDATE admins SET name = $2, phone = $3, email = $4, updated_at = now()
             WHERE id = $1
             RETURNING {ADMIN_COLUMNS}"
        );
        sqlx::query_as::<_, Admin>(&sql)
            .bind(id)
            .bind(&update.name)
            .bind(&update.phone)
            .bind(&update.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unique_violation(e, "email", &update.email))?
            .ok_or_else(|| DatabaseError::NotFound(format!("admin {}", id)))
    }

    async fn replace_tokens(&self, token: AdminToken) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM admin_tokens WHERE admin_id = $1")
            .bind(token.admin_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO admin_tokens (id, admin_id, name, token_hash, last_used_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(token.id)
        .bind(token.admin_id)
        .bind(&token.name)
        .bind(&token.token_hash)
        .bind(token.last_used_at)
        .bind(token.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_admin_by_token(&self, token_hash: &str) -> Result<Option<Admin>, DatabaseError> {
        let admin = sqlx::query_as::<_, Admin>(
            "WITH touched AS (
                 UPDATE admin_tokens SET last_used_at = now()
                 WHERE token_hash = $1
                 RETURNING admin_id
             )
             SELECT a.id, a.name, a.username, a.email, a.phone, a.password_hash,
                    a.created_at, a.updated_at
             FROM admins a
             JOIN touched t ON t.admin_id = a.id",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(admin)
    }

    async fn delete_token(&self, token_hash: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM admin_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_division(&self, name: &str) -> Result<Division, DatabaseError> {
        let division = sqlx::query_as::<_, Division>(
            "INSERT INTO divisions (id, name) VALUES ($1, $2)
             RETURNING id, name, created_at, updated_at",
        )
        .bind(Uuid::now_v7())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(division)
    }

    async fn division_exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM divisions WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn list_divisions(
        &self,
        filter: &DivisionFilter,
        page: PageRequest,
    ) -> Result<(Vec<Division>, u64), DatabaseError> {
        let pattern = filter.name.as_deref().map(like_pattern);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM divisions WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, Division>(
            "SELECT id, name, created_at, updated_at FROM divisions
             WHERE ($1::text IS NULL OR name ILIKE $1)
             ORDER BY id
             LIMIT $2 OFFSET $3",
        )
        .bind(&pattern)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total.max(0) as u64))
    }

    async fn insert_employee(&self, record: EmployeeRecord) -> Result<Employee, DatabaseError> {
        let sql = format!(
            "INSERT INTO employees (id, image, name, phone, division_id, position)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {EMPLOYEE_COLUMNS}"
        );
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(Uuid::now_v7())
            .bind(&record.image)
            .bind(&record.name)
            .bind(&record.phone)
            .bind(record.division_id)
            .bind(&record.position)
            .fetch_one(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn find_employee(&self, id: Uuid) -> Result<Option<Employee>, DatabaseError> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn update_employee(
        &self,
        id: Uuid,
        changes: EmployeeChanges,
    ) -> Result<Option<Employee>, DatabaseError> {
        // COALESCE keeps the stored value for every column not supplied
        let sql = format!(
            "UPDATE employees SET
                 name        = COALESCE($2, name),
                 phone       = COALESCE($3, phone),
                 division_id = COALESCE($4, division_id),
                 position    = COALESCE($5, position),
                 image       = COALESCE($6, image),
                 updated_at  = now()
             WHERE id = $1
             RETURNING {EMPLOYEE_COLUMNS}"
        );
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.phone)
            .bind(changes.division_id)
            .bind(&changes.position)
            .bind(&changes.image)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn delete_employee(&self, id: Uuid) -> Result<Option<Employee>, DatabaseError> {
        let sql = format!("DELETE FROM employees WHERE id = $1 RETURNING {EMPLOYEE_COLUMNS}");
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn list_employees(
        &self,
        filter: &EmployeeFilter,
        page: PageRequest,
    ) -> Result<(Vec<EmployeeWithDivision>, u64), DatabaseError> {
        let pattern = filter.name.as_deref().map(like_pattern);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM employees e
             WHERE ($1::text IS NULL OR e.name ILIKE $1)
               AND ($2::uuid IS NULL OR e.division_id = $2)",
        )
        .bind(&pattern)
        .bind(filter.division_id)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, EmployeeWithDivision>(
            "SELECT e.id, e.image, e.name, e.phone, e.division_id,
                    d.name AS division_name, e.position
             FROM employees e
             JOIN divisions d ON d.id = e.division_id
             WHERE ($1::text IS NULL OR e.name ILIKE $1)
               AND ($2::uuid IS NULL OR e.division_id = $2)
             ORDER BY e.id
             LIMIT $3 OFFSET $4",
        )
        .bind(&pattern)
        .bind(filter.division_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total.max(0) as u64))
    }
}
