use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_mutation_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    /// Starting balance used when a user's balance row was never
    /// provisioned.
    pub default_leave_balance: i32,
    /// When true, an approval that would drive the balance negative is
    /// refused with InsufficientBalance and the request stays pending.
    pub enforce_leave_balance: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),

            rate_mutation_per_min: env::var("RATE_MUTATION_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),

            default_leave_balance: env::var("DEFAULT_LEAVE_BALANCE")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .unwrap(),
            enforce_leave_balance: env::var("ENFORCE_LEAVE_BALANCE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap(),
        }
    }
}
