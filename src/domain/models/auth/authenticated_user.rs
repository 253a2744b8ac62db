use std::future::{ready, Ready};

use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};

use crate::domain::models::context::RequestContext;
use crate::errors::AppError;

/// 인증 단계를 통과한 요청의 사용자 정보
///
/// 요청 컨텍스트의 주체 ID와 역할로부터 만들어지는 읽기 전용 뷰입니다.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    /// 사용자 고유 ID (토큰의 `sub`)
    pub user_id: i64,

    /// 토큰의 역할 클레임
    pub role: Option<String>,
}

impl AuthenticatedUser {
    /// 컨텍스트에 인증 정보가 있으면 사용자 정보를 만듭니다.
    pub fn from_context(context: &RequestContext) -> Option<Self> {
        context.subject_id().map(|user_id| Self {
            user_id,
            role: context.role().map(str::to_string),
        })
    }
}

/// ActixWeb FromRequest trait 구현
impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req
            .extensions()
            .get::<RequestContext>()
            .and_then(AuthenticatedUser::from_context);

        match user {
            Some(user) => ready(Ok(user)),
            None => ready(Err(AppError::AuthenticationError(
                "인증되지 않은 요청입니다".to_string(),
            )
            .into())),
        }
    }
}
