use hygiene_core::catalog::CouncilDetails;

/// Which [`DataStore`](hygiene_core::store::DataStore) implementation backs
/// the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    pub fn from_str_value(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Some(Self::Postgres),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Look-ahead window used when a request omits `months` (default: `6`).
    pub default_within_months: u32,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is `Postgres`.
    pub database_url: Option<String>,
    /// Issuing authority printed on visit sheets.
    pub council: CouncilDetails,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `DEFAULT_WITHIN_MONTHS` | `6`                        |
    /// | `STORE_BACKEND`         | `postgres`                 |
    /// | `DATABASE_URL`          | (none)                     |
    /// | `COUNCIL_NAME`, `COUNCIL_DEPARTMENT`, `COUNCIL_EMAIL`, `COUNCIL_TELEPHONE` | built-in council |
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let default_within_months: u32 = std::env::var("DEFAULT_WITHIN_MONTHS")
            .unwrap_or_else(|_| "6".into())
            .parse()
            .expect("DEFAULT_WITHIN_MONTHS must be a valid u32");
        hygiene_core::scheduling::validate_within_months(default_within_months)
            .unwrap_or_else(|e| panic!("DEFAULT_WITHIN_MONTHS: {e}"));

        let backend_raw = std::env::var("STORE_BACKEND").unwrap_or_else(|_| "postgres".into());
        let store_backend = StoreBackend::from_str_value(&backend_raw)
            .unwrap_or_else(|| panic!("STORE_BACKEND must be 'postgres' or 'memory', got '{backend_raw}'"));

        let database_url = std::env::var("DATABASE_URL").ok();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            default_within_months,
            store_backend,
            database_url,
            council: council_from_env(),
        }
    }
}

fn council_from_env() -> CouncilDetails {
    let mut council = CouncilDetails::default();
    let overrides = [
        ("COUNCIL_NAME", &mut council.name),
        ("COUNCIL_DEPARTMENT", &mut council.department),
        ("COUNCIL_EMAIL", &mut council.email),
        ("COUNCIL_TELEPHONE", &mut council.telephone),
    ];
    for (var, field) in overrides {
        if let Ok(value) = std::env::var(var) {
            if !value.trim().is_empty() {
                *field = value.trim().to_string();
            }
        }
    }
    council
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_backend_parsing() {
        assert_eq!(StoreBackend::from_str_value("postgres"), Some(StoreBackend::Postgres));
        assert_eq!(StoreBackend::from_str_value(" Memory "), Some(StoreBackend::Memory));
        assert_eq!(StoreBackend::from_str_value("sqlite"), None);
    }
}
