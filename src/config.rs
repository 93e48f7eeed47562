use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Argon2 cost parameters. Defaults follow the argon2 crate defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Argon2Cost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for Argon2Cost {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtpConfig {
    pub ttl_seconds: u64,
    /// Number of digits in a code, clamped to 4..=6.
    pub code_length: usize,
    /// Wrong guesses allowed before the code is invalidated.
    pub max_attempts: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            code_length: 6,
            max_attempts: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// When absent the server runs with the in-memory user repository.
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub password_min_len: usize,
    pub argon2: Argon2Cost,
    pub otp: OtpConfig,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        // The signing secret has no fallback: refusing to start beats
        // issuing tokens signed with a guessable default.
        let secret = std::env::var("JWT_SECRET")
            .context("JWT_SECRET must be set; refusing to start without a signing key")?;

        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "makhbaz".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "makhbaz-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60),
        };

        let cost = Argon2Cost::default();
        let argon2 = Argon2Cost {
            memory_kib: env_parse("ARGON2_MEMORY_KIB", cost.memory_kib),
            iterations: env_parse("ARGON2_ITERATIONS", cost.iterations),
            parallelism: env_parse("ARGON2_PARALLELISM", cost.parallelism),
        };

        let otp_defaults = OtpConfig::default();
        let otp = OtpConfig {
            ttl_seconds: env_parse("OTP_TTL_SECONDS", otp_defaults.ttl_seconds),
            code_length: env_parse("OTP_CODE_LENGTH", otp_defaults.code_length).clamp(4, 6),
            max_attempts: env_parse("OTP_MAX_ATTEMPTS", otp_defaults.max_attempts),
        };

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").ok(),
            jwt,
            password_min_len: env_parse("PASSWORD_MIN_LEN", 6),
            argon2,
            otp,
        })
    }

    /// Fixed config for tests, no environment reads.
    pub fn for_tests() -> Self {
        Self {
            database_url: None,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            password_min_len: 6,
            argon2: Argon2Cost::default(),
            otp: OtpConfig::default(),
        }
    }
}
