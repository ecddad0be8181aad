#[cfg(feature = "cli")]
use clap::Parser;
use crate::error::Result;
use crate::factory::ResponseEnvelopeConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(author, version, about, long_about = None))]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Title of the generated document
    #[cfg_attr(feature = "cli", arg(short = 't', long = "title"))]
    pub title: Option<String>,

    /// Version of the documented API
    #[cfg_attr(feature = "cli", arg(id = "api_version", long = "api-version"))]
    pub version: Option<String>,

    /// Description of the documented API
    #[cfg_attr(feature = "cli", arg(short = 'd', long = "description"))]
    pub description: Option<String>,

    /// Output file for the generated OpenAPI definition (defaults to openapi.yaml)
    #[cfg_attr(feature = "cli", arg(short = 'o', long = "output"))]
    pub output: Option<PathBuf>,

    /// Default status field name of response envelopes
    #[cfg_attr(feature = "cli", arg(long = "status-key"))]
    pub status_key: Option<String>,

    /// Default data field name of response envelopes
    #[cfg_attr(feature = "cli", arg(long = "wrapper-key"))]
    pub wrapper_key: Option<String>,

    /// Path to a configuration file (toml)
    #[cfg_attr(feature = "cli", arg(long = "config"))]
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
}

#[derive(Deserialize)]
struct CargoConfig {
    package: Option<CargoPackage>,
}

#[derive(Deserialize)]
struct CargoPackage {
    metadata: Option<CargoMetadata>,
}

#[derive(Deserialize)]
struct CargoMetadata {
    #[serde(rename = "openapi-compose")]
    openapi_compose: Option<Config>,
}

impl Config {
    /// Load configuration with priority:
    /// 1. CLI Arguments (Highest)
    /// 2. --config file
    /// 3. openapi.toml
    /// 4. Cargo.toml [package.metadata.openapi-compose]
    #[cfg(feature = "cli")]
    pub fn load() -> Self {
        let cli_args = Config::parse();
        Self::resolve(cli_args, Path::new("."))
    }

    /// Layers the file sources found in `dir` under `cli_args`.
    pub fn resolve(cli_args: Config, dir: &Path) -> Self {
        let mut final_config = Config::default();

        match load_cargo_toml(dir.join("Cargo.toml")) {
            Ok(cargo_conf) => final_config.merge(cargo_conf),
            Err(e) => log::debug!("No Cargo.toml metadata used: {}", e),
        }

        match load_toml_file(dir.join("openapi.toml")) {
            Ok(toml_conf) => final_config.merge(toml_conf),
            Err(e) => log::debug!("No openapi.toml used: {}", e),
        }

        if let Some(path) = &cli_args.config_file {
            match load_toml_file(path) {
                Ok(file_conf) => final_config.merge(file_conf),
                Err(e) => log::warn!("Ignoring config file {:?}: {}", path, e),
            }
        }

        final_config.merge(cli_args);
        final_config
    }

    /// Default envelope for builders created from this configuration.
    pub fn envelope(&self) -> ResponseEnvelopeConfig {
        ResponseEnvelopeConfig {
            status_key: self.status_key.clone(),
            wrapper_key: self.wrapper_key.clone(),
        }
    }

    fn merge(&mut self, other: Config) {
        if let Some(title) = other.title {
            self.title = Some(title);
        }
        if let Some(version) = other.version {
            self.version = Some(version);
        }
        if let Some(description) = other.description {
            self.description = Some(description);
        }
        if let Some(output) = other.output {
            self.output = Some(output);
        }
        if let Some(status_key) = other.status_key {
            self.status_key = Some(status_key);
        }
        if let Some(wrapper_key) = other.wrapper_key {
            self.wrapper_key = Some(wrapper_key);
        }
    }
}

fn load_cargo_toml<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: CargoConfig = toml::from_str(&content)?;
    Ok(config
        .package
        .and_then(|p| p.metadata)
        .and_then(|m| m.openapi_compose)
        .unwrap_or_default())
}

pub fn load_toml_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_priority() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            r#"
[package]
name = "users"

[package.metadata.openapi-compose]
title = "From Cargo"
version = "0.1.0"
status-key = "status"
"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("openapi.toml"),
            r#"
title = "From openapi.toml"
wrapper-key = "data"
"#,
        )
        .unwrap();

        let cli = Config {
            output: Some(PathBuf::from("out.json")),
            ..Config::default()
        };
        let config = Config::resolve(cli, dir.path());

        assert_eq!(config.title.as_deref(), Some("From openapi.toml"));
        assert_eq!(config.version.as_deref(), Some("0.1.0"));
        assert_eq!(config.output, Some(PathBuf::from("out.json")));
        assert_eq!(
            config.envelope(),
            ResponseEnvelopeConfig::new().status_key("status").wrapper_key("data")
        );
    }

    #[test]
    fn test_explicit_config_file_beats_openapi_toml() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("openapi.toml"), "title = \"Base\"\n").unwrap();
        let explicit = dir.path().join("custom.toml");
        fs::write(&explicit, "title = \"Custom\"\n").unwrap();

        let cli = Config {
            config_file: Some(explicit),
            ..Config::default()
        };
        let config = Config::resolve(cli, dir.path());
        assert_eq!(config.title.as_deref(), Some("Custom"));
    }

    #[test]
    fn test_missing_sources() {
        let dir = tempdir().unwrap();
        let config = Config::resolve(Config::default(), dir.path());
        assert_eq!(config, Config::default());
        assert!(config.envelope().is_empty());
    }
}
