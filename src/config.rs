use clap::Parser;
use num_cpus;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use log::{info, warn};
use std::fs::File;
use std::io::prelude::*;

use crate::param::DEFAULT_CONFIG_PATH;

/// 命令行参数
#[derive(Parser, Debug, Clone)]
#[command(name = "minihttpd")]
#[command(about = "A minimal HTTP/1.1 server with echo, user-agent and file endpoints", long_about = None)]
pub struct Args {
    /// `/files/` 端点使用的基础目录，覆盖配置文件中的值
    #[arg(long)]
    pub directory: Option<String>,

    /// 监听端口，覆盖配置文件中的值
    #[arg(long)]
    pub port: Option<u16>,

    /// TOML 配置文件路径
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// `/files/` 端点使用的基础目录，原样使用，不做校验
    #[serde(default = "default_directory")]
    directory: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    worker_threads: usize,
    #[serde(default)]
    local: bool,
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_port() -> u16 {
    4221
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            directory: default_directory(),
            port: default_port(),
            worker_threads: 0,
            local: false,
        }
    }

    /// 从 TOML 文件加载配置，文件缺失或格式错误时退回默认配置
    pub fn from_toml(filename: &str) -> Self {
        let mut file = match File::open(filename) {
            Ok(f) => f,
            Err(e) => {
                warn!("无法打开配置文件{}：{}，使用默认配置", filename, e);
                return Self::new().normalized();
            }
        };
        let mut str_val = String::new();
        if let Err(e) = file.read_to_string(&mut str_val) {
            warn!("读取配置文件{}失败：{}，使用默认配置", filename, e);
            return Self::new().normalized();
        }

        let raw_config = match toml::from_str(&str_val) {
            Ok(t) => t,
            Err(e) => {
                warn!("无法成功从配置文件构建配置对象：{}，使用默认配置", e);
                Config::new()
            }
        };
        raw_config.normalized()
    }

    /// 按命令行参数加载配置，命令行的值优先于配置文件
    pub fn from_args(args: &Args) -> Self {
        let mut config = Self::from_toml(&args.config);
        config.apply_args(args);
        config
    }

    /// 用命令行参数覆盖已有配置，未指定的参数保持原值
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(dir) = &args.directory {
            info!("命令行指定基础目录：{}", dir);
            self.directory = dir.clone();
        }
        if let Some(port) = args.port {
            self.port = port;
        }
    }

    fn normalized(mut self) -> Self {
        if self.worker_threads == 0 {
            self.worker_threads = num_cpus::get();
        }
        self
    }
}

impl Config {
    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    pub fn local(&self) -> bool {
        self.local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(list: &[&str]) -> Args {
        Args::parse_from(std::iter::once("minihttpd").chain(list.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.directory(), ".");
        assert_eq!(config.port(), 4221);
        assert!(!config.local());
    }

    #[test]
    fn test_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "directory = \"/tmp/files\"\nport = 8080\nworker_threads = 2\nlocal = true").unwrap();

        let config = Config::from_toml(file.path().to_str().unwrap());
        assert_eq!(config.directory(), "/tmp/files");
        assert_eq!(config.port(), 8080);
        assert_eq!(config.worker_threads(), 2);
        assert!(config.local());
    }

    #[test]
    fn test_from_toml_partial_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "directory = \"/data\"").unwrap();

        let config = Config::from_toml(file.path().to_str().unwrap());
        assert_eq!(config.directory(), "/data");
        assert_eq!(config.port(), 4221);
        assert!(config.worker_threads() > 0);
    }

    #[test]
    fn test_from_toml_missing_file() {
        let config = Config::from_toml("/definitely/not/here.toml");
        assert_eq!(config.directory(), ".");
        assert!(config.worker_threads() > 0);
    }

    #[test]
    fn test_from_toml_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();

        let config = Config::from_toml(file.path().to_str().unwrap());
        assert_eq!(config.port(), 4221);
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::new();
        config.apply_args(&args(&["--directory", "/tmp/x", "--port", "9000"]));

        assert_eq!(config.directory(), "/tmp/x");
        assert_eq!(config.port(), 9000);
    }

    #[test]
    fn test_apply_args_keeps_unset_values() {
        let mut config = Config::new();
        config.apply_args(&args(&[]));

        assert_eq!(config.port(), 4221);
        assert_eq!(config.directory(), ".");
    }

    #[test]
    fn test_args_default_config_path() {
        assert_eq!(args(&[]).config, DEFAULT_CONFIG_PATH);
    }

    #[test]
    fn test_args_reject_bad_port() {
        let result = Args::try_parse_from(["minihttpd", "--port", "abc"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_args_reject_missing_directory_value() {
        let result = Args::try_parse_from(["minihttpd", "--directory"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_args_with_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "directory = \"/from/file\"\nport = 7000").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = Config::from_args(&args(&["--config", path.as_str(), "--directory", "/from/cli"]));
        assert_eq!(config.directory(), "/from/cli");
        assert_eq!(config.port(), 7000);
    }
}
