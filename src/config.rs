//! Service configuration.
//!
//! Values come from command-line flags with environment fallbacks. They are
//! validated once at startup into an [`AppConfig`]; a missing signing secret
//! stops the process before it binds a socket.

use clap::Parser;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
#[command(name = "vmdeck")]
#[command(about = "Session-authenticated access to per-user VM records")]
pub struct Args {
    /// HMAC secret used to sign session tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Credentials file (JSON array of {username, password_hash})
    #[arg(long, env = "USERS_FILE", default_value = "mock_data/users.json")]
    pub users_file: PathBuf,

    /// User profiles with their VMs
    #[arg(long, env = "USERS_DATA_FILE", default_value = "mock_data/users_data.json")]
    pub users_data_file: PathBuf,

    /// Flat list of every deployed VM
    #[arg(long, env = "VMS_ALL_FILE", default_value = "mock_data/vms_all.json")]
    pub vms_all_file: PathBuf,

    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:5000")]
    pub bind_addr: SocketAddr,
}

/// Validated startup configuration
#[derive(Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub users_file: PathBuf,
    pub users_data_file: PathBuf,
    pub vms_all_file: PathBuf,
    pub bind_addr: SocketAddr,
}

// Keep the secret out of logs
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("users_file", &self.users_file)
            .field("users_data_file", &self.users_data_file)
            .field("vms_all_file", &self.vms_all_file)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingSecret,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingSecret => write!(f, "JWT_SECRET environment variable not set"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    /// Validate parsed arguments. Relative paths resolve against `base_dir`.
    pub fn from_args(args: Args, base_dir: &Path) -> Result<Self, ConfigError> {
        let jwt_secret = args
            .jwt_secret
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        Ok(Self {
            jwt_secret,
            users_file: resolve_data_path(base_dir, args.users_file),
            users_data_file: resolve_data_path(base_dir, args.users_data_file),
            vms_all_file: resolve_data_path(base_dir, args.vms_all_file),
            bind_addr: args.bind_addr,
        })
    }
}

fn resolve_data_path(base_dir: &Path, p: PathBuf) -> PathBuf {
    if p.is_absolute() {
        p
    } else {
        base_dir.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(flags: &[&str]) -> Args {
        let mut argv = vec!["vmdeck"];
        argv.extend_from_slice(flags);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_secret_required() {
        let mut args = parse(&[]);
        args.jwt_secret = None;
        assert_eq!(
            AppConfig::from_args(args, Path::new("/srv")).unwrap_err(),
            ConfigError::MissingSecret
        );

        let args = parse(&["--jwt-secret", "   "]);
        assert_eq!(
            AppConfig::from_args(args, Path::new("/srv")).unwrap_err(),
            ConfigError::MissingSecret
        );
    }

    #[test]
    fn test_relative_paths_resolve_against_base() {
        let args = parse(&[
            "--jwt-secret",
            "s3cret",
            "--users-file",
            "/etc/vmdeck/users.json",
        ]);
        let config = AppConfig::from_args(args, Path::new("/srv/vmdeck")).unwrap();

        assert_eq!(config.users_file, PathBuf::from("/etc/vmdeck/users.json"));
        assert_eq!(
            config.users_data_file,
            PathBuf::from("/srv/vmdeck/mock_data/users_data.json")
        );
        assert_eq!(
            config.vms_all_file,
            PathBuf::from("/srv/vmdeck/mock_data/vms_all.json")
        );
        assert_eq!(config.bind_addr.port(), 5000);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let args = parse(&["--jwt-secret", "do-not-print"]);
        let config = AppConfig::from_args(args, Path::new("/srv")).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("do-not-print"));
        assert!(rendered.contains("<redacted>"));
    }
}
