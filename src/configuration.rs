use config::ConfigError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub auth: AuthSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    /// Deployment platform; `dev` unlocks the admin reset endpoint
    #[serde(default)]
    pub platform: String,
}

impl ApplicationSettings {
    pub fn is_dev(&self) -> bool {
        self.platform == "dev"
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }
}

/// Credential and session settings, immutable for the process lifetime
#[derive(serde::Deserialize, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    /// Key expected in `Authorization: ApiKey <key>` on the payment webhook
    pub polka_key: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,   // seconds (3600 = one hour)
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,  // seconds (5184000 = 60 days)
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl AuthSettings {
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.access_token_expiry)
    }

    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.refresh_token_expiry)
    }

    /// Reject settings that would make every login or registration fail
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::Message("auth.jwt_secret must not be empty".to_string()));
        }
        if self.polka_key.is_empty() {
            return Err(ConfigError::Message("auth.polka_key must not be empty".to_string()));
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::Message(format!(
                "auth.bcrypt_cost must be within {}..={}, got {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST, self.bcrypt_cost
            )));
        }
        if self.access_token_expiry <= 0 {
            return Err(ConfigError::Message(
                "auth.access_token_expiry must be positive".to_string(),
            ));
        }
        if self.refresh_token_expiry <= 0 {
            return Err(ConfigError::Message(
                "auth.refresh_token_expiry must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_access_token_expiry() -> i64 {
    60 * 60
}

fn default_refresh_token_expiry() -> i64 {
    60 * 24 * 60 * 60
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

/// Load settings from `configuration.{yaml,toml,json}` (optional) and
/// `APP_`-prefixed environment variables, e.g. `APP_AUTH__JWT_SECRET`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    let settings = settings.try_deserialize::<Settings>()?;
    settings.auth.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_settings() -> AuthSettings {
        AuthSettings {
            jwt_secret: "secret".to_string(),
            polka_key: "key".to_string(),
            access_token_expiry: default_access_token_expiry(),
            refresh_token_expiry: default_refresh_token_expiry(),
            bcrypt_cost: 4,
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(auth_settings().validate().is_ok());
        let settings = AuthSettings {
            bcrypt_cost: default_bcrypt_cost(),
            ..auth_settings()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rejects_bcrypt_cost_out_of_range() {
        for cost in [0, 3, 32] {
            let settings = AuthSettings {
                bcrypt_cost: cost,
                ..auth_settings()
            };
            assert!(settings.validate().is_err(), "cost {} accepted", cost);
        }
        let settings = AuthSettings {
            bcrypt_cost: 31,
            ..auth_settings()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_ttls() {
        for ttl in [0, -1] {
            let access = AuthSettings {
                access_token_expiry: ttl,
                ..auth_settings()
            };
            assert!(access.validate().is_err());

            let refresh = AuthSettings {
                refresh_token_expiry: ttl,
                ..auth_settings()
            };
            assert!(refresh.validate().is_err());
        }
    }

    #[test]
    fn test_rejects_empty_secrets() {
        let settings = AuthSettings {
            jwt_secret: String::new(),
            ..auth_settings()
        };
        assert!(settings.validate().is_err());

        let settings = AuthSettings {
            polka_key: String::new(),
            ..auth_settings()
        };
        assert!(settings.validate().is_err());
    }
}
