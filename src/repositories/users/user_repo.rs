//! # 사용자 리포지토리 구현
//!
//! 사용자 엔티티의 데이터 액세스 계층을 담당하는 PostgreSQL 리포지토리입니다.
//!
//! ## 특징
//!
//! - **유니크 제약**: `email` 컬럼의 유니크 인덱스 위반은 `ConflictError`(409)로 변환됩니다
//! - **트랜잭션**: 잔액 이동은 행 잠금(`FOR UPDATE`)을 사용한 단일 트랜잭션으로 수행됩니다
//! - **런타임 쿼리**: 컴파일 시점에 데이터베이스 접속이 필요 없는 `sqlx::query_as`를 사용합니다

use async_trait::async_trait;
use log::{debug, info};
use sqlx::PgPool;

use crate::domain::entities::users::{NewUser, User, UserPatch, UserReplacement};
use crate::errors::AppError;

use super::user_store::UserStore;

const USER_COLUMNS: &str = "id, name, age, email, role, password, balance";

/// 사용자 데이터 액세스 리포지토리
///
/// `users` 테이블에 대한 CRUD 연산과 잔액 이동 트랜잭션을 담당합니다.
///
/// ## 에러 처리
///
/// - **DatabaseError**: 연결 오류, 쿼리 실행 오류
/// - **ConflictError**: 이메일 중복
/// - **NotFound**: 대상 행이 존재하지 않음
///
/// ## 사용 예제
///
/// ```rust,ignore
/// let database = Database::connect(&dsn, 10).await?;
/// let repo = PgUserRepository::new(database.pool().clone());
///
/// let created = repo.create(new_user).await?;
/// let found = repo.get_by_email("lev@x.com").await?;
/// ```
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn not_found(id: i64) -> AppError {
        AppError::NotFound(format!("user {} not found", id))
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY id",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, age, email, role, password) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.name)
        .bind(user.age)
        .bind(&user.email)
        .bind(&user.role)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        info!("✅ 사용자 생성 완료: id={}", created.id);
        Ok(created)
    }

    async fn replace(&self, id: i64, replacement: UserReplacement) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET name = $1, age = $2, email = $3 WHERE id = $4 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&replacement.name)
        .bind(replacement.age)
        .bind(&replacement.email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Self::not_found(id))
    }

    async fn patch(&self, id: i64, patch: UserPatch) -> Result<User, AppError> {
        if patch.is_empty() {
            debug!("빈 패치 요청, 현재 상태 반환: id={}", id);
            return self.get_by_id(id).await?.ok_or_else(|| Self::not_found(id));
        }

        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET \
             name = COALESCE($1, name), \
             age = COALESCE($2, age), \
             email = COALESCE($3, email) \
             WHERE id = $4 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(patch.name.as_deref())
        .bind(patch.age)
        .bind(patch.email.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Self::not_found(id))
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }

        info!("🗑️ 사용자 삭제 완료: id={}", id);
        Ok(())
    }

    async fn transfer_balance(&self, from_id: i64, to_id: i64, amount: f64) -> Result<(), AppError> {
        // tx는 commit 전에 drop되면 롤백됩니다.
        let mut tx = self.pool.begin().await?;

        let balance: Option<f64> =
            sqlx::query_scalar("SELECT balance FROM users WHERE id = $1 FOR UPDATE")
                .bind(from_id)
                .fetch_optional(&mut *tx)
                .await?;
        let balance = balance.ok_or_else(|| Self::not_found(from_id))?;

        if balance < amount {
            return Err(AppError::ValidationError("insufficient funds".to_string()));
        }

        sqlx::query("UPDATE users SET balance = balance - $1 WHERE id = $2")
            .bind(amount)
            .bind(from_id)
            .execute(&mut *tx)
            .await?;

        let deposited = sqlx::query("UPDATE users SET balance = balance + $1 WHERE id = $2")
            .bind(amount)
            .bind(to_id)
            .execute(&mut *tx)
            .await?;

        if deposited.rows_affected() == 0 {
            return Err(Self::not_found(to_id));
        }

        tx.commit().await?;

        info!("💸 잔액 이동 완료: {} -> {} ({})", from_id, to_id, amount);
        Ok(())
    }
}
