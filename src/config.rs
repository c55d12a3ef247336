use std::env;

const DEFAULT_USERS_TABLE: &str = "users";
const DEFAULT_CERTIFICATES_TABLE: &str = "certificates";
const DEFAULT_CODE_BUCKET: &str = "rsmachiner-user-code";
const DEFAULT_TOPIC_NAMESPACE: &str = "rsmachiner";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Lambda,
    Unset(Option<String>),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub platform: Platform,
    pub users_table: String,
    pub certificates_table: String,
    pub code_bucket: String,
    pub topic_namespace: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value_or = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let platform = match lookup("PLATFORM") {
            Some(p) if p == "lambda" => Platform::Lambda,
            other => Platform::Unset(other),
        };

        Self {
            platform,
            users_table: value_or("USERS_TABLE", DEFAULT_USERS_TABLE),
            certificates_table: value_or("CERTIFICATES_TABLE", DEFAULT_CERTIFICATES_TABLE),
            code_bucket: value_or("CODE_BUCKET", DEFAULT_CODE_BUCKET),
            topic_namespace: value_or("TOPIC_NAMESPACE", DEFAULT_TOPIC_NAMESPACE),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::default();
        assert_eq!(config.platform, Platform::Unset(None));
        assert_eq!(config.users_table, "users");
        assert_eq!(config.certificates_table, "certificates");
        assert_eq!(config.code_bucket, "rsmachiner-user-code");
        assert_eq!(config.topic_namespace, "rsmachiner");
    }

    #[test]
    fn overrides_and_blank_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("PLATFORM", "lambda"),
            ("USERS_TABLE", "users-staging"),
            ("CODE_BUCKET", "  "),
        ]);
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.platform, Platform::Lambda);
        assert_eq!(config.users_table, "users-staging");
        assert_eq!(config.code_bucket, "rsmachiner-user-code");
    }

    #[test]
    fn unknown_platform_is_kept_for_logging() {
        let config = Config::from_lookup(|k| (k == "PLATFORM").then(|| "local".to_string()));
        assert_eq!(config.platform, Platform::Unset(Some("local".to_string())));
    }
}
