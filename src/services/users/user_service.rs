//! # 사용자 관리 서비스 구현
//!
//! 사용자 계정의 전체 생명주기를 관리하는 핵심 비즈니스 로직을 구현합니다.
//! 요청 DTO 검증, 비밀번호 해싱, 저장소 호출, 자격 증명 확인을 담당합니다.
//!
//! ```text
//! Handler ──▶ UserService ──▶ Arc<dyn UserStore>
//!              │                 ├── PgUserRepository (sqlx)
//!              │                 └── MemoryUserStore
//!              └── bcrypt (hash / verify)
//! ```
//!
//! ## 보안 설계 원칙
//!
//! - **bcrypt 해싱**: 환경별 cost (`PasswordConfig::bcrypt_cost`)
//! - **민감 정보 제거**: `User`의 비밀번호 해시는 직렬화되지 않습니다
//! - **동일한 실패 메시지**: 존재하지 않는 이메일과 틀린 비밀번호를 구분하지 않습니다

use std::sync::Arc;
use std::time::Instant;

use bcrypt::hash;
use validator::Validate;

use crate::config::PasswordConfig;
use crate::domain::dto::users::request::{
    CreateUserRequest, LoginRequest, PatchUserRequest, RegisterRequest, ReplaceUserRequest,
};
use crate::domain::entities::users::{NewUser, User, DEFAULT_ROLE};
use crate::errors::{AppError, ErrorContext};
use crate::repositories::users::UserStore;

const INVALID_CREDENTIALS: &str = "잘못된 이메일 또는 비밀번호입니다";

/// 사용자 관리 서비스
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    /// 환경별 bcrypt cost를 사용하는 서비스
    pub fn with_env_cost(store: Arc<dyn UserStore>) -> Self {
        Self::new(store, PasswordConfig::bcrypt_cost())
    }

    /// 회원가입. 항상 기본 역할(`user`)로 생성됩니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 입력값 검증 실패
    /// * `AppError::ConflictError` - 이메일 중복
    pub async fn register(&self, request: RegisterRequest) -> Result<User, AppError> {
        request.validate()?;

        let password_hash = self.hash_password(&request.password)?;
        self.store
            .create(NewUser {
                name: request.name,
                age: request.age,
                email: request.email,
                role: DEFAULT_ROLE.to_string(),
                password_hash,
            })
            .await
    }

    /// 관리자용 사용자 생성. 요청에 역할이 없으면 기본 역할을 사용합니다.
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, AppError> {
        request.validate()?;

        let role = request.role_or_default();
        let password_hash = self.hash_password(&request.password)?;
        self.store
            .create(NewUser {
                name: request.name,
                age: request.age,
                email: request.email,
                role,
                password_hash,
            })
            .await
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.store.list().await
    }

    pub async fn get(&self, id: i64) -> Result<User, AppError> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))
    }

    /// 인증된 사용자 본인의 정보
    ///
    /// 토큰은 유효하지만 사용자가 삭제된 경우 404를 반환합니다.
    pub async fn me(&self, subject_id: i64) -> Result<User, AppError> {
        self.get(subject_id).await
    }

    /// 전체 교체. 본문의 `id`가 경로의 ID와 다르면 400입니다.
    pub async fn replace(&self, path_id: i64, request: ReplaceUserRequest) -> Result<User, AppError> {
        ensure_same_id(path_id, request.id)?;
        request.validate()?;

        self.store.replace(path_id, request.into()).await
    }

    /// 부분 수정. 본문에 있는 필드만 변경합니다.
    pub async fn patch(&self, path_id: i64, request: PatchUserRequest) -> Result<User, AppError> {
        ensure_same_id(path_id, request.id)?;
        request.validate()?;

        self.store.patch(path_id, request.into()).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.store.delete(id).await
    }

    /// 이메일과 비밀번호로 사용자를 인증합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 요청 형식 오류
    /// * `AppError::AuthenticationError` - 이메일 없음 또는 비밀번호 불일치
    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, AppError> {
        request.validate()?;

        let user = self
            .store
            .get_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()))?;

        let verify_start = Instant::now();
        let is_valid =
            bcrypt::verify(&request.password, &user.password_hash).context("비밀번호 검증 실패")?;
        log::debug!("Password verification took: {:?}", verify_start.elapsed());

        if !is_valid {
            return Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()));
        }

        Ok(user)
    }

    /// 두 사용자 사이의 잔액을 원자적으로 이동합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 0 이하의 금액, 자기 자신에게 이동, 잔액 부족
    /// * `AppError::NotFound` - 존재하지 않는 사용자
    pub async fn transfer_funds(&self, from_id: i64, to_id: i64, amount: f64) -> Result<(), AppError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::ValidationError(
                "amount must be greater than zero".to_string(),
            ));
        }
        if from_id == to_id {
            return Err(AppError::ValidationError(
                "cannot transfer to the same user".to_string(),
            ));
        }

        self.store.transfer_balance(from_id, to_id, amount).await
    }

    fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let hash_start = Instant::now();
        let password_hash = hash(password, self.bcrypt_cost)
            .with_context(|| format!("비밀번호 해싱 실패 (cost={})", self.bcrypt_cost))?;
        log::debug!("Password hashing took: {:?}", hash_start.elapsed());

        Ok(password_hash)
    }
}

fn ensure_same_id(path_id: i64, body_id: i64) -> Result<(), AppError> {
    if path_id != body_id {
        return Err(AppError::ValidationError(format!(
            "body id {} does not match path id {}",
            body_id, path_id
        )));
    }
    Ok(())
}
