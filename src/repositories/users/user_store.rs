//! 사용자 저장소 추상화
//!
//! 서비스 계층은 이 trait에만 의존하며, 실제 구현은 실행 환경에 따라
//! PostgreSQL([`PgUserRepository`](super::user_repo::PgUserRepository)) 또는
//! 프로세스 메모리([`MemoryUserStore`](super::memory_store::MemoryUserStore))가 주입됩니다.

use async_trait::async_trait;

use crate::domain::entities::users::{NewUser, User, UserPatch, UserReplacement};
use crate::errors::AppError;

/// 사용자 저장소 연산
///
/// ## 에러 규약
///
/// - 대상 사용자가 없으면 `AppError::NotFound`
/// - 이메일 중복은 `AppError::ConflictError`
/// - 그 외 저장소 장애는 `AppError::DatabaseError`
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 전체 사용자 목록 (id 오름차순)
    async fn list(&self) -> Result<Vec<User>, AppError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// 새 사용자를 저장하고 부여된 id를 포함한 엔티티를 반환합니다.
    async fn create(&self, user: NewUser) -> Result<User, AppError>;

    /// 이름, 나이, 이메일을 모두 교체합니다.
    async fn replace(&self, id: i64, replacement: UserReplacement) -> Result<User, AppError>;

    /// 값이 있는 필드만 변경합니다. 빈 패치는 현재 상태를 그대로 반환합니다.
    async fn patch(&self, id: i64, patch: UserPatch) -> Result<User, AppError>;

    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// 두 사용자 사이의 잔액 이동을 하나의 원자적 연산으로 수행합니다.
    async fn transfer_balance(&self, from_id: i64, to_id: i64, amount: f64) -> Result<(), AppError>;
}
