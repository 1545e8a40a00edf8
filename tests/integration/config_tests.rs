//! Configuration loading integration tests
//!
//! Layering of YAML, environment and command-line sources, and validation of
//! the resulting configuration.

#[cfg(test)]
mod tests {
    use clap::Parser;
    use shortener_rs::config::{CliArgs, Config, Validate};
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const YAML: &str = r#"
server:
  host: "0.0.0.0"
  port: 9000
deletion:
  workers: 4
  buffer_size: 40
  chunk_size: 5
  lanes: 2
auth:
  cookie_secret: "file-secret-0123456789"
"#;

    // ==================== Precedence ====================

    #[tokio::test]
    async fn test_sources_layer_in_order() {
        let file = yaml_file(YAML);
        let mut config = Config::from_file(file.path()).await.unwrap();
        assert_eq!(config.deletion().workers, 4);

        let env: HashMap<&str, &str> = [
            ("NUMBER_OF_WORKERS", "6"),
            ("WORKERS_BUFFER", "60"),
            ("BASE_URL", "https://sho.rt"),
        ]
        .into_iter()
        .collect();
        config
            .gateway
            .apply_env_from(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        let args = CliArgs::try_parse_from(["shortener", "-w", "8"]).unwrap();
        args.apply(&mut config.gateway).unwrap();
        config.validate().unwrap();

        // CLI beats env beats file beats defaults
        assert_eq!(config.deletion().workers, 8);
        assert_eq!(config.deletion().buffer_size, 60);
        assert_eq!(config.deletion().chunk_size, 5);
        assert_eq!(config.deletion().lanes, 2);
        assert_eq!(config.server().port, 9000);
        assert_eq!(config.server().base_url(), "https://sho.rt/");
        assert_eq!(config.auth().cookie_secret, "file-secret-0123456789");
        assert_eq!(config.auth().cookie_name, "userId");
    }

    #[tokio::test]
    async fn test_load_with_flags() {
        let file = yaml_file(YAML);
        let path = file.path().to_string_lossy().to_string();
        let args = CliArgs::try_parse_from([
            "shortener",
            "-c",
            path.as_str(),
            "-a",
            "127.0.0.1:9999",
            "-b",
            "https://links.example",
            "--wb",
            "7",
            "--lanes",
            "3",
        ])
        .unwrap();

        let config = Config::load(&args).await.unwrap();
        assert_eq!(config.server().address(), "127.0.0.1:9999");
        assert_eq!(config.server().base_url(), "https://links.example/");
        assert_eq!(config.deletion().buffer_size, 7);
        assert_eq!(config.deletion().lanes, 3);
    }

    #[tokio::test]
    async fn test_missing_file_is_a_config_error() {
        let result = Config::from_file("/definitely/not/here.yaml").await;
        assert!(matches!(result, Err(shortener_rs::ShortenerError::Config(_))));
    }

    // ==================== Validation ====================

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.deletion().workers, 10);
        assert_eq!(config.deletion().buffer_size, 100);
        assert_eq!(config.deletion().chunk_size, 10);
        assert_eq!(config.deletion().lanes, 10);
    }

    #[test]
    fn test_zero_sizes_are_rejected() {
        for field in ["workers", "buffer_size", "chunk_size", "lanes"] {
            let yaml = format!("deletion:\n  {}: 0\n", field);
            assert!(Config::from_yaml(&yaml).is_err(), "{} = 0 accepted", field);
        }
    }

    #[test]
    fn test_short_cookie_secret_is_rejected() {
        let mut config = Config::default();
        config.gateway.auth.cookie_secret = "short".to_string();
        let err = config.gateway.auth.validate().unwrap_err();
        assert!(err.contains("16"), "{}", err);
    }

    #[test]
    fn test_bad_env_value_is_reported() {
        let mut config = Config::default();
        let result = config.gateway.apply_env_from(|key| {
            (key == "DELETE_LANES").then(|| "many".to_string())
        });
        let err = result.unwrap_err().to_string();
        assert!(err.contains("DELETE_LANES"), "{}", err);
    }
}
