//! 사용자 관리 서비스 메인 애플리케이션
//!
//! Actix-web 기반의 HTTP 서버를 구동하고 모든 서비스를 초기화합니다.
//! 저장소를 연결하고, 레이트 리미터 정리 작업을 시작한 뒤 서버가 종료되면 정리합니다.

use std::io;
use std::sync::Arc;

use actix_web::HttpServer;
use dotenv::dotenv;
use log::{error, info, warn};

use users_service::config::{
    DatabaseConfig, Environment, LoggerConfig, RateLimitConfig, ServerConfig, StoreBackend,
};
use users_service::db::Database;
use users_service::errors::AppError;
use users_service::logging::{self, LoggerSettings};
use users_service::rate_limit::RateLimiterRegistry;
use users_service::repositories::{MemoryUserStore, PgUserRepository, UserStore};
use users_service::routes::configure_all_routes;
use users_service::server::{build_app, AppState};
use users_service::services::{TokenService, UserService};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    if let Err(e) = logging::init(&LoggerSettings::from_env()) {
        eprintln!("로거 초기화 실패: {}", e);
    }

    info!("🚀 사용자 관리 서비스 시작중... (env={:?})", Environment::current());

    let store = initialize_user_store().await.map_err(into_io_error)?;

    let rate_limiter = Arc::new(
        RateLimiterRegistry::new(RateLimitConfig::from_env()).map_err(into_io_error)?,
    );
    let eviction = rate_limiter.start_eviction();

    let state = AppState::new(
        UserService::with_env_cost(store),
        TokenService::from_env(),
        rate_limiter,
    )
    .with_stack(LoggerConfig::with_stack());

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    let result = start_http_server(state).await;

    eviction.stop().await;
    info!("👋 서버 종료");
    result
}

/// HTTP 서버를 구성하고 실행합니다
///
/// # Errors
///
/// * `std::io::Error` - 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server(state: AppState) -> io::Result<()> {
    let bind_address = format!("{}:{}", ServerConfig::host(), ServerConfig::port());

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Readiness: http://{}/ready", bind_address);

    let config = state.rate_limiter.config();
    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        config.per_second, config.burst_size
    );

    HttpServer::new(move || build_app(state.clone(), configure_all_routes))
        .bind(bind_address)?
        .run()
        .await
}

/// 환경별 설정 파일을 로드합니다
///
/// PROFILE 환경변수에 따라 적절한 .env 파일을 로드합니다.
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
///
/// 로거 설치 전에 실행되므로 결과는 표준 에러로 출력합니다.
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    let loaded = match profile.as_str() {
        "prod" => dotenv::from_filename(".env.prod").map(|_| ".env.prod"),
        "dev" => dotenv::from_filename(".env.dev").map(|_| ".env.dev"),
        _ => dotenv().map(|_| ".env"),
    };

    match loaded {
        Ok(file) => eprintln!("profile={} {} 파일 로드 됨", profile, file),
        Err(e) => eprintln!("profile={} 환경 파일 로드 실패: {}", profile, e),
    }
}

/// 설정된 백엔드의 사용자 저장소를 초기화합니다
///
/// # Errors
///
/// * `AppError::InternalError` - PostgreSQL 백엔드인데 DSN이 없는 경우
/// * `AppError::DatabaseError` - 연결 또는 마이그레이션 실패
async fn initialize_user_store() -> Result<Arc<dyn UserStore>, AppError> {
    match DatabaseConfig::backend() {
        StoreBackend::Postgres => {
            let dsn = DatabaseConfig::dsn().ok_or_else(|| {
                AppError::InternalError("POSTGRES_DSN이 설정되지 않았습니다".to_string())
            })?;

            info!("📡 데이터베이스 연결 중...");
            let database = Database::connect(&dsn, DatabaseConfig::max_connections()).await?;
            database.migrate().await?;

            Ok(Arc::new(PgUserRepository::new(database.pool().clone())))
        }
        StoreBackend::Memory => {
            warn!("⚠️ 인메모리 사용자 저장소 사용 중: 재시작 시 데이터가 사라집니다");
            Ok(Arc::new(MemoryUserStore::new()))
        }
    }
}

fn into_io_error(err: AppError) -> io::Error {
    error!("❌ 초기화 실패: {}", err);
    io::Error::other(err.to_string())
}
