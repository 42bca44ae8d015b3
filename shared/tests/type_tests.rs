/// Integration-level tests for the `shared` crate.
///
/// Each section tests one module; unit tests tied to private helpers live
/// inside the modules themselves.
// ---------------------------------------------------------------------------
// Session claims
// ---------------------------------------------------------------------------
#[cfg(test)]
mod jwt_tests {
    use shared::types::*;

    fn sample_claims() -> SessionClaims {
        SessionClaims {
            user_id: "9b2f6a7e-6f1c-4a4e-9d36-1a0d4c7c2b11".to_string(),
            user_name: "alice".to_string(),
            role: "user".to_string(),
            password_verifier: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            expires_at: 1_700_003_600,
            issued_at: 1_700_000_000,
            jti: "550e8400-e29b-41d4-a716-446655440000".to_string(),
        }
    }

    #[test]
    fn claims_use_short_wire_names() {
        let json = serde_json::to_value(sample_claims()).unwrap();
        for key in &["id", "username", "role", "password", "exp", "iat", "jti"] {
            assert!(json.get(key).is_some(), "missing key: {}", key);
        }
        assert!(json.get("user_name").is_none());
        assert!(json.get("password_verifier").is_none());
    }

    #[test]
    fn claims_missing_a_field_do_not_deserialize() {
        let mut json = serde_json::to_value(sample_claims()).unwrap();
        json.as_object_mut().unwrap().remove("role");
        assert!(serde_json::from_value::<SessionClaims>(json).is_err());
    }

    #[test]
    fn expiry_boundary_counts_as_expired() {
        let c = sample_claims();
        assert!(!c.is_expired_at(c.expires_at - 1));
        assert!(c.is_expired_at(c.expires_at));
        assert!(c.is_expired_at(c.expires_at + 1));
    }
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[cfg(test)]
mod request_tests {
    use shared::types::*;

    #[test]
    fn signup_body_deserializes() {
        let json = r#"{"name":"alice","password":"p1","email":"a@x.com"}"#;
        let d: SignupData = serde_json::from_str(json).unwrap();
        assert_eq!(d.name, "alice");
        assert!(d.validate().is_ok());
    }

    #[test]
    fn signup_without_email_fails_to_parse() {
        let json = r#"{"name":"alice","password":"p1"}"#;
        assert!(serde_json::from_str::<SignupData>(json).is_err());
    }

    #[test]
    fn signup_with_bad_email_is_rejected() {
        let json = r#"{"name":"alice","password":"p1","email":"nope"}"#;
        let d: SignupData = serde_json::from_str(json).unwrap();
        assert_eq!(d.validate(), Err(FieldError::InvalidEmail));
    }

    #[test]
    fn blank_login_name_is_missing() {
        let json = r#"{"name":"   ","password":"p1"}"#;
        let d: LoginData = serde_json::from_str(json).unwrap();
        assert_eq!(d.validate(), Err(FieldError::Missing("name")));
    }

    #[test]
    fn authorize_body_carries_roles() {
        let json = r#"{"refresh_token":"abc","roles":["user","admin"]}"#;
        let d: AuthorizeData = serde_json::from_str(json).unwrap();
        assert_eq!(d.roles, vec!["user".to_string(), "admin".to_string()]);
        assert!(d.validate().is_ok());
    }

    #[test]
    fn authorize_without_roles_fails_to_parse() {
        let json = r#"{"refresh_token":"abc"}"#;
        assert!(serde_json::from_str::<AuthorizeData>(json).is_err());
    }

    #[test]
    fn logout_with_empty_token_is_missing() {
        let d: LogoutData = serde_json::from_str(r#"{"refresh_token":""}"#).unwrap();
        assert_eq!(d.validate(), Err(FieldError::Missing("refresh_token")));
    }

    #[test]
    fn token_response_serializes_refresh_token() {
        let json = serde_json::to_value(TokenResponse::new("t".into())).unwrap();
        assert_eq!(json["refresh_token"], "t");
    }

    #[test]
    fn error_response_carries_numeric_status() {
        let json =
            serde_json::to_value(ErrorResponse::new(401, "WRONG_CREDENTIALS", "wrong creds"))
                .unwrap();
        assert_eq!(json["status"], 401);
        assert_eq!(json["message"], "wrong creds");
    }

    #[test]
    fn user_display_hides_password() {
        let u = User {
            id: "1".into(),
            name: "alice".into(),
            password: "secret-hash".into(),
            role: "user".into(),
            is_logged_in: true,
        };
        assert!(!u.to_string().contains("secret-hash"));
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[cfg(test)]
mod config_tests {
    use std::io::Write;
    use std::path::Path;

    use shared::config::{load_config, parse_config, resolve_config_path};
    use shared::types::{ConfigError, Environment};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn minimal(secret: &str) -> String {
        format!(
            r#"
[server]

[database]
url = "sqlite::memory:"

[auth]
jwt_secret = "{secret}"
"#
        )
    }

    #[test]
    fn defaults_are_applied() {
        let cfg = parse_config(&minimal(SECRET)).unwrap();
        assert_eq!(cfg.env, Environment::Local);
        assert_eq!(cfg.server.addr(), "0.0.0.0:8080");
        assert_eq!(cfg.server.timeout_secs, 4);
        assert_eq!(cfg.server.idle_timeout_secs, 60);
        assert_eq!(cfg.auth.token_expiry_minutes, 60);
        assert_eq!(cfg.auth.store_timeout_ms, 2000);
        assert_eq!(cfg.auth.default_role, "user");
    }

    #[test]
    fn env_and_server_fields_parse() {
        let toml = format!(
            "env = \"prod\"\n{}",
            minimal(SECRET).replace("[server]", "[server]\nhost = \"127.0.0.1\"\nport = 9000")
        );
        let cfg = parse_config(&toml).unwrap();
        assert_eq!(cfg.env, Environment::Prod);
        assert_eq!(cfg.server.addr(), "127.0.0.1:9000");
    }

    #[test]
    fn unknown_env_is_a_parse_error() {
        let toml = format!("env = \"staging\"\n{}", minimal(SECRET));
        assert!(matches!(parse_config(&toml), Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn zero_expiry_is_rejected() {
        let toml = minimal(SECRET).replace("[auth]", "[auth]\ntoken_expiry_minutes = 0");
        assert!(matches!(
            parse_config(&toml),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_database_url_is_rejected() {
        let toml = minimal(SECRET).replace("sqlite::memory:", "");
        assert!(matches!(
            parse_config(&toml),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(minimal(SECRET).as_bytes()).unwrap();
        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.database.url, "sqlite::memory:");
    }

    #[test]
    fn empty_file_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn explicit_path_wins_over_env() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let resolved =
            resolve_config_path(Some(file.path()), Some("/does/not/exist.toml".into())).unwrap();
        assert_eq!(resolved, file.path());
    }

    #[test]
    fn env_path_used_when_no_explicit_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let env = file.path().to_string_lossy().into_owned();
        let resolved = resolve_config_path(None, Some(env)).unwrap();
        assert_eq!(resolved, file.path());
    }

    #[test]
    fn missing_path_sources_error() {
        assert!(matches!(
            resolve_config_path(None, None),
            Err(ConfigError::NotFound(_))
        ));
        assert!(matches!(
            resolve_config_path(Some(Path::new("/does/not/exist.toml")), None),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn oversized_expiry_is_rejected() {
        let toml = minimal(SECRET).replace(
            "[auth]",
            "[auth]\ntoken_expiry_minutes = 288230376151711744",
        );
        assert!(matches!(
            parse_config(&toml),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn one_year_expiry_is_accepted() {
        let toml = minimal(SECRET).replace("[auth]", "[auth]\ntoken_expiry_minutes = 525600");
        let cfg = parse_config(&toml).unwrap();
        assert_eq!(cfg.auth.token_expiry_secs().unwrap(), 525_600 * 60);

        let toml = minimal(SECRET).replace("[auth]", "[auth]\ntoken_expiry_minutes = 525601");
        assert!(parse_config(&toml).is_err());
    }
}

mod redaction_tests {
    use shared::types::{SessionClaims, User};

    const VERIFIER: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA";

    #[test]
    fn user_debug_hides_verifier() {
        let user = User {
            id: "u-1".into(),
            name: "alice".into(),
            password: VERIFIER.into(),
            role: "user".into(),
            is_logged_in: true,
        };
        let shown = format!("{:?} {}", user, user);
        assert!(shown.contains("alice"));
        assert!(!shown.contains(VERIFIER));
    }

    #[test]
    fn claims_debug_hides_verifier() {
        let claims = SessionClaims {
            user_id: "u-1".into(),
            user_name: "alice".into(),
            role: "user".into(),
            password_verifier: VERIFIER.into(),
            expires_at: 100,
            issued_at: 40,
            jti: "j-1".into(),
        };
        let shown = format!("{:?}", claims);
        assert!(shown.contains("alice"));
        assert!(!shown.contains(VERIFIER));
    }
}
