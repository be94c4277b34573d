use clap::Args;
use std::fmt;

/// Database connection settings.
///
/// Each value can come from a flag or an environment variable; `.env` is
/// loaded by the binary before parsing so it feeds the same variables.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    /// Full connection URL; takes precedence over the individual parts
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Database server host
    #[arg(long, env = "STUDENTDB_HOST", default_value = "localhost")]
    pub host: String,

    /// Database server port
    #[arg(long, env = "STUDENTDB_PORT", default_value_t = 5432)]
    pub port: u16,

    /// Database user
    #[arg(long, env = "STUDENTDB_USER", default_value = "postgres")]
    pub user: String,

    #[arg(skip = std::env::var("STUDENTDB_PASSWORD").ok())]
    pub password: Option<String>,

    /// Database name
    #[arg(long, env = "STUDENTDB_DATABASE", default_value = "student_management_db")]
    pub database: String,

    /// Client character set
    #[arg(long, env = "STUDENTDB_CHARSET", default_value = "UTF8")]
    pub charset: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            database_url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: None,
            database: "student_management_db".to_string(),
            charset: "UTF8".to_string(),
        }
    }
}

impl ConnectionConfig {
    pub fn from_url(url: &str) -> Self {
        ConnectionConfig {
            database_url: Some(url.to_string()),
            ..Default::default()
        }
    }

    /// The string handed to libpq: the URL verbatim when one is set,
    /// otherwise a keyword/value connection string.
    pub fn connection_string(&self) -> String {
        if let Some(url) = &self.database_url {
            return url.clone();
        }
        let mut parts = vec![
            format!("host={}", quote_value(&self.host)),
            format!("port={}", self.port),
            format!("user={}", quote_value(&self.user)),
            format!("dbname={}", quote_value(&self.database)),
            format!("client_encoding={}", quote_value(&self.charset)),
        ];
        if let Some(password) = &self.password {
            parts.push(format!("password={}", quote_value(password)));
        }
        parts.join(" ")
    }
}

impl fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.database_url {
            Some(_) => write!(f, "DATABASE_URL"),
            None => write!(
                f,
                "{}@{}:{}/{}",
                self.user, self.host, self.port, self.database
            ),
        }
    }
}

fn quote_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}
