// Run settings read from the environment. Credentials have no
// command-line flag.

use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api/v1";
pub const DEFAULT_EMAIL: &str = "admin@hsi.local";
pub const DEFAULT_PASSWORD: &str = "admin123";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub email: String,
    pub password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_url: DEFAULT_API_URL.into(),
            email: DEFAULT_EMAIL.into(),
            password: DEFAULT_PASSWORD.into(),
        }
    }
}

impl Settings {
    /// `IMPORTER_API_URL`, `IMPORTER_EMAIL` and `IMPORTER_PASSWORD`, each
    /// falling back to the local development defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        Settings {
            api_url: lookup("IMPORTER_API_URL").unwrap_or(defaults.api_url),
            email: lookup("IMPORTER_EMAIL").unwrap_or(defaults.email),
            password: lookup("IMPORTER_PASSWORD").unwrap_or(defaults.password),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variables_use_defaults() {
        assert_eq!(Settings::from_lookup(|_| None), Settings::default());
    }

    #[test]
    fn variables_override_defaults() {
        let settings = Settings::from_lookup(|key| match key {
            "IMPORTER_API_URL" => Some("https://inventory.example/api/v1".into()),
            _ => None,
        });
        assert_eq!(settings.api_url, "https://inventory.example/api/v1");
        assert_eq!(settings.email, DEFAULT_EMAIL);
    }
}
