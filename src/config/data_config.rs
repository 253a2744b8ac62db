//! 데이터 및 서버 설정 관리 모듈
//!
//! 데이터베이스, 서버, 실행 환경, 로깅 관련 설정을 관리합니다.

use std::env;

/// 애플리케이션 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 개발 환경 - 사람이 읽기 쉬운 콘솔 로그
    Development,
    /// 테스트 환경 - 자동화된 테스트용 설정
    Test,
    /// 스테이징 환경 - 프로덕션 유사 환경
    Staging,
    /// 프로덕션 환경 - JSON 로그, 내부 에러 메시지 비노출
    Production,
}

impl Environment {
    /// 현재 실행 환경을 감지합니다.
    ///
    /// `APP_ENV` 또는 `ENVIRONMENT` 환경 변수를 확인하며,
    /// 설정되지 않은 경우 `Production`을 기본값으로 사용합니다.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let env = Environment::current();
    /// if env.is_production() {
    ///     log::info!("프로덕션 모드");
    /// }
    /// ```
    pub fn current() -> Self {
        let raw = env::var("APP_ENV")
            .or_else(|_| env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "production".to_string());

        Self::from_str(&raw)
    }

    /// 문자열에서 Environment를 생성합니다.
    ///
    /// # Arguments
    ///
    /// * `s` - 환경 이름 문자열 (대소문자 무관)
    ///
    /// # Returns
    ///
    /// 해당하는 Environment 값. 알 수 없는 값인 경우 `Production`을 반환합니다.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// 프로덕션 환경 여부
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// 패스워드 해싱 설정
pub struct PasswordConfig;

impl PasswordConfig {
    /// 현재 환경에 맞는 bcrypt cost를 반환합니다.
    ///
    /// # Returns
    ///
    /// 4-15 범위의 bcrypt cost 값
    ///
    /// # Environment Defaults
    ///
    /// - Development/Test: 4 (빠른 처리)
    /// - Staging: 10 (중간 보안)
    /// - Production: 12 (고보안)
    pub fn bcrypt_cost() -> u32 {
        if let Ok(cost_str) = env::var("BCRYPT_COST") {
            if let Ok(cost) = cost_str.parse::<u32>() {
                if (4..=15).contains(&cost) {
                    return cost;
                }
            }
        }

        Self::bcrypt_cost_for_env(&Environment::current())
    }

    /// 특정 환경에 대한 bcrypt cost를 반환합니다.
    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }
}

/// 서버 바인딩 설정
pub struct ServerConfig;

impl ServerConfig {
    /// 서버가 바인딩할 포트를 반환합니다.
    ///
    /// # Returns
    ///
    /// 포트 번호. 기본값: 8080
    ///
    /// # Environment Variables
    ///
    /// - `PORT`: 커스텀 포트 설정
    pub fn port() -> u16 {
        env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080)
    }

    /// 서버가 바인딩할 호스트 주소를 반환합니다.
    ///
    /// # Returns
    ///
    /// 호스트 주소. 기본값: "0.0.0.0" (모든 인터페이스)
    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
    }
}

/// 사용자 저장소 백엔드 종류
#[derive(Debug, Clone, PartialEq)]
pub enum StoreBackend {
    /// PostgreSQL (sqlx)
    Postgres,
    /// 프로세스 메모리 (로컬 실행, 테스트)
    Memory,
}

/// 데이터베이스 연결 설정
pub struct DatabaseConfig;

impl DatabaseConfig {
    /// PostgreSQL 접속 DSN을 반환합니다.
    ///
    /// `POSTGRES_DSN`을 우선 확인하고, 없으면 `DATABASE_URL`을 사용합니다.
    pub fn dsn() -> Option<String> {
        env::var("POSTGRES_DSN")
            .or_else(|_| env::var("DATABASE_URL"))
            .ok()
            .filter(|dsn| !dsn.trim().is_empty())
    }

    /// 커넥션 풀 최대 크기. 기본값: 10
    pub fn max_connections() -> u32 {
        env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n: &u32| *n > 0)
            .unwrap_or(10)
    }

    /// 사용할 저장소 백엔드 (`USER_STORE=postgres|memory`, 기본값: postgres)
    pub fn backend() -> StoreBackend {
        match env::var("USER_STORE")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" | "in-memory" => StoreBackend::Memory,
            _ => StoreBackend::Postgres,
        }
    }
}

/// 로그 출력 형식
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// 사람이 읽는 한 줄 형식 (개발 환경)
    Console,
    /// 한 줄에 하나의 JSON 객체
    Json,
}

/// 로깅 설정
pub struct LoggerConfig;

impl LoggerConfig {
    /// `LOG_LEVEL` 값을 로그 레벨 필터로 변환합니다. 기본값: info
    pub fn level() -> log::LevelFilter {
        Self::parse_level(&env::var("LOG_LEVEL").unwrap_or_default())
    }

    /// 문자열을 로그 레벨로 변환합니다. 알 수 없는 값은 info로 처리합니다.
    pub fn parse_level(raw: &str) -> log::LevelFilter {
        match raw.trim().to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "warn" | "warning" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            "off" => log::LevelFilter::Off,
            _ => log::LevelFilter::Info,
        }
    }

    /// 에러 로그에 스택 트레이스를 포함할지 여부 (`LOG_WITH_STACK`)
    pub fn with_stack() -> bool {
        matches!(
            env::var("LOG_WITH_STACK")
                .unwrap_or_default()
                .trim()
                .to_lowercase()
                .as_str(),
            "true" | "1" | "yes"
        )
    }

    /// 실행 환경에 따른 출력 형식. 개발 환경만 콘솔 형식을 사용합니다.
    pub fn format() -> LogFormat {
        Self::format_for_env(&Environment::current())
    }

    pub fn format_for_env(env: &Environment) -> LogFormat {
        match env {
            Environment::Development => LogFormat::Console,
            _ => LogFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_string() {
        assert_eq!(
            Environment::from_str("development"),
            Environment::Development
        );
        assert_eq!(Environment::from_str("dev"), Environment::Development);
        assert_eq!(Environment::from_str("test"), Environment::Test);
        assert_eq!(Environment::from_str("production"), Environment::Production);
        assert_eq!(Environment::from_str("unknown"), Environment::Production);
    }

    #[test]
    fn test_bcrypt_cost_for_each_environment() {
        assert_eq!(
            PasswordConfig::bcrypt_cost_for_env(&Environment::Development),
            4
        );
        assert_eq!(PasswordConfig::bcrypt_cost_for_env(&Environment::Test), 4);
        assert_eq!(
            PasswordConfig::bcrypt_cost_for_env(&Environment::Staging),
            10
        );
        assert_eq!(
            PasswordConfig::bcrypt_cost_for_env(&Environment::Production),
            12
        );
    }

    #[test]
    fn test_server_config_defaults() {
        if env::var("PORT").is_err() {
            assert_eq!(ServerConfig::port(), 8080);
        }

        if env::var("HOST").is_err() {
            assert_eq!(ServerConfig::host(), "0.0.0.0");
        }
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LoggerConfig::parse_level("debug"), log::LevelFilter::Debug);
        assert_eq!(LoggerConfig::parse_level("WARN"), log::LevelFilter::Warn);
        assert_eq!(LoggerConfig::parse_level("error"), log::LevelFilter::Error);
        assert_eq!(LoggerConfig::parse_level(""), log::LevelFilter::Info);
        assert_eq!(LoggerConfig::parse_level("verbose"), log::LevelFilter::Info);
    }

    #[test]
    fn test_log_format_by_environment() {
        assert_eq!(
            LoggerConfig::format_for_env(&Environment::Development),
            LogFormat::Console
        );
        assert_eq!(
            LoggerConfig::format_for_env(&Environment::Production),
            LogFormat::Json
        );
        assert_eq!(
            LoggerConfig::format_for_env(&Environment::Staging),
            LogFormat::Json
        );
    }
}
