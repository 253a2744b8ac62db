use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::domain::models::context::RequestContext;
use crate::domain::models::token::AuthClaims;
use crate::errors::AppError;
use crate::services::auth::TokenService;

pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub required_role: Option<String>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let required_role = self.required_role.clone();

        Box::pin(async move {
            let context = current_context(&req);

            let claims = match authenticate(&req) {
                Ok(claims) => claims,
                Err(err) => {
                    context.logger().warn("인증 실패", &[("reason", &err)]);
                    return Ok(reject(req, err));
                }
            };

            if let Some(required) = required_role.as_deref() {
                if claims.role.as_deref() != Some(required) {
                    context.logger().warn(
                        "권한 부족",
                        &[
                            ("subject_id", &claims.subject_id),
                            ("role", &claims.role.as_deref().unwrap_or("-")),
                        ],
                    );
                    return Ok(reject(
                        req,
                        AppError::AuthorizationError("접근 권한이 부족합니다".to_string()),
                    ));
                }
            }

            attach_identity(&req, &context, claims);

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// 컨텍스트 단계가 저장한 값, 없으면 이 요청만을 위한 새 컨텍스트
fn current_context(req: &ServiceRequest) -> RequestContext {
    req.extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_else(|| {
            RequestContext::detached(
                req.method().as_str(),
                req.path(),
                req.peer_addr().map(|addr| addr.ip().to_string()),
            )
        })
}

/// 인증 정보를 더한 새 컨텍스트로 교체합니다.
fn attach_identity(req: &ServiceRequest, context: &RequestContext, claims: AuthClaims) {
    context
        .logger()
        .debug(
            "인증 성공",
            &[
                ("subject_id", &claims.subject_id),
                ("expires_at", &claims.expires_at),
            ],
        );
    let authed = context.with_identity(claims.subject_id, claims.role);
    req.extensions_mut().insert(authed);
}

fn reject<B>(req: ServiceRequest, err: AppError) -> ServiceResponse<EitherBody<B>> {
    let response = err.error_response();
    let (req, _) = req.into_parts();
    ServiceResponse::new(req, response).map_into_right_body()
}

fn authenticate(req: &ServiceRequest) -> Result<AuthClaims, AppError> {
    let token_service = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| AppError::InternalError("TokenService가 등록되지 않았습니다".to_string()))?;

    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Authorization 헤더가 없습니다".to_string()))?;

    let token = token_service.extract_bearer_token(auth_header)?;
    token_service.verify_token(token)
}
