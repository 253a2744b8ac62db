//! 프로세스 메모리 기반 사용자 저장소
//!
//! 로컬 실행(`USER_STORE=memory`)과 HTTP 통합 테스트에서 사용됩니다.
//! PostgreSQL 구현과 동일한 에러 규약(NotFound, ConflictError)을 따릅니다.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::entities::users::{NewUser, User, UserPatch, UserReplacement};
use crate::errors::AppError;

use super::user_store::UserStore;

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    users: BTreeMap<i64, User>,
}

impl MemoryState {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    state: Mutex<MemoryState>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 특정 사용자의 잔액을 설정합니다. (시드 데이터, 테스트용)
    pub fn set_balance(&self, id: i64, balance: f64) -> Result<(), AppError> {
        let mut state = self.lock()?;
        let user = state.users.get_mut(&id).ok_or_else(|| not_found(id))?;
        user.balance = balance;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, AppError> {
        self.state
            .lock()
            .map_err(|_| AppError::InternalError("user store lock poisoned".to_string()))
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("user {} not found", id))
}

fn duplicate_email(email: &str) -> AppError {
    AppError::ConflictError(format!("email {} already exists", email))
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.lock()?.users.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut state = self.lock()?;
        if state.email_taken(&user.email, None) {
            return Err(duplicate_email(&user.email));
        }

        state.next_id += 1;
        let created = User {
            id: state.next_id,
            name: user.name,
            age: user.age,
            email: user.email,
            role: user.role,
            password_hash: user.password_hash,
            balance: 0.0,
        };
        state.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn replace(&self, id: i64, replacement: UserReplacement) -> Result<User, AppError> {
        let mut state = self.lock()?;
        if state.email_taken(&replacement.email, Some(id)) {
            return Err(duplicate_email(&replacement.email));
        }

        let user = state.users.get_mut(&id).ok_or_else(|| not_found(id))?;
        user.name = replacement.name;
        user.age = replacement.age;
        user.email = replacement.email;
        Ok(user.clone())
    }

    async fn patch(&self, id: i64, patch: UserPatch) -> Result<User, AppError> {
        let mut state = self.lock()?;
        if let Some(email) = patch.email.as_deref() {
            if state.email_taken(email, Some(id)) {
                return Err(duplicate_email(email));
            }
        }

        let user = state.users.get_mut(&id).ok_or_else(|| not_found(id))?;
        patch.apply_to(user);
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.lock()?
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    async fn transfer_balance(&self, from_id: i64, to_id: i64, amount: f64) -> Result<(), AppError> {
        // 검증을 모두 마친 뒤에만 변경하므로 실패 시 상태가 바뀌지 않습니다.
        let mut state = self.lock()?;
        let from_balance = state
            .users
            .get(&from_id)
            .map(|u| u.balance)
            .ok_or_else(|| not_found(from_id))?;
        if !state.users.contains_key(&to_id) {
            return Err(not_found(to_id));
        }
        if from_balance < amount {
            return Err(AppError::ValidationError("insufficient funds".to_string()));
        }

        if let Some(from) = state.users.get_mut(&from_id) {
            from.balance -= amount;
        }
        if let Some(to) = state.users.get_mut(&to_id) {
            to.balance += amount;
        }
        Ok(())
    }
}
