// SSH 连接配置

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::SshError;
use crate::error::{Error, Result};

/// 环境变量前缀（from_env 使用）
pub const ENV_PREFIX: &str = "SHELL_AUTOMATOR";

/// SSH 连接配置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    /// 目标主机
    pub host: String,
    /// 端口
    pub port: u16,
    /// 用户名
    pub username: String,
    /// 密码
    pub password: Option<String>,
    /// 私钥文件路径（同时提供密码时优先使用私钥）
    pub key_path: Option<PathBuf>,
    /// 私钥密码
    pub key_passphrase: Option<String>,
    /// 连接超时（秒），覆盖 TCP 连接与 SSH 握手
    pub connect_timeout: u64,
    /// 认证超时（秒）
    pub auth_timeout: u64,
    /// 未知主机密钥策略
    pub host_key_policy: HostKeyPolicy,
    /// known_hosts 文件，默认 ~/.ssh/known_hosts
    pub known_hosts_path: Option<PathBuf>,
    /// 是否在连接时初始化 SFTP 子通道
    pub enable_sftp: bool,
    /// 心跳配置
    pub keepalive: KeepaliveConfig,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 22,
            username: String::new(),
            password: None,
            key_path: None,
            key_passphrase: None,
            connect_timeout: 10,
            auth_timeout: 10,
            host_key_policy: HostKeyPolicy::default(),
            known_hosts_path: None,
            enable_sftp: false,
            keepalive: KeepaliveConfig::default(),
        }
    }
}

/// 认证方式
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthMethod {
    /// 密码认证
    Password(String),
    /// 公钥认证
    PublicKey {
        /// 私钥文件路径
        key_path: PathBuf,
        /// 私钥密码（如果有）
        passphrase: Option<String>,
    },
}

/// 未知主机密钥的处理策略
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostKeyPolicy {
    /// 首次连接时信任并写入 known_hosts
    #[default]
    AcceptNew,
    /// 拒绝 known_hosts 中不存在的主机
    Reject,
}

/// 心跳配置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct KeepaliveConfig {
    /// 是否启用心跳
    pub enabled: bool,
    /// 心跳间隔（秒）
    pub interval: u64,
    /// 最大重试次数
    pub max_retries: u32,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: 60,
            max_retries: 3,
        }
    }
}

impl SshConfig {
    /// 以主机和用户名创建配置，其余取默认值
    pub fn new(host: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            ..Default::default()
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_key(mut self, key_path: impl Into<PathBuf>, passphrase: Option<String>) -> Self {
        self.key_path = Some(key_path.into());
        self.key_passphrase = passphrase;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_sftp(mut self, enabled: bool) -> Self {
        self.enable_sftp = enabled;
        self
    }

    pub fn with_host_key_policy(mut self, policy: HostKeyPolicy) -> Self {
        self.host_key_policy = policy;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout)
    }

    /// 检查配置是否可用于连接
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(SshError::Config("host must not be empty".to_string()).into());
        }
        if self.username.trim().is_empty() {
            return Err(SshError::Config("username must not be empty".to_string()).into());
        }
        self.auth_method().map(|_| ())
    }

    /// 解析认证方式：私钥优先，其次密码，均未提供时报认证错误
    pub fn auth_method(&self) -> Result<AuthMethod> {
        if let Some(key_path) = &self.key_path {
            return Ok(AuthMethod::PublicKey {
                key_path: key_path.clone(),
                passphrase: self.key_passphrase.clone(),
            });
        }
        match self.password.as_deref() {
            Some(password) if !password.is_empty() => Ok(AuthMethod::Password(password.to_string())),
            _ => Err(Error::Authentication(
                "Either password or private key must be provided".to_string(),
            )),
        }
    }

    /// known_hosts 文件路径
    pub fn resolved_known_hosts_path(&self) -> Option<PathBuf> {
        self.known_hosts_path
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(".ssh").join("known_hosts")))
    }

    /// 从 JSON 文件加载配置
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SshError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config: SshConfig = serde_json::from_str(&content).map_err(|e| {
            SshError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }

    /// 从环境变量加载配置
    ///
    /// 读取 `SHELL_AUTOMATOR_HOST`、`_USERNAME`、`_PASSWORD`、`_KEY`、`_PORT`，
    /// 未设置的项保留默认值
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |suffix: &str| lookup(&format!("{}_{}", ENV_PREFIX, suffix));

        let mut config = SshConfig {
            host: var("HOST").unwrap_or_default(),
            username: var("USERNAME").unwrap_or_default(),
            password: var("PASSWORD"),
            key_path: var("KEY").map(PathBuf::from),
            ..Default::default()
        };
        if let Some(port) = var("PORT") {
            config.port = port
                .parse()
                .map_err(|_| SshError::Config(format!("Invalid port: {}", port)))?;
        }
        Ok(config)
    }

    /// 构建 russh 配置
    pub fn to_russh_config(&self) -> russh::client::Config {
        let mut config = russh::client::Config::default();
        // 命令可能长时间无输出，不设置不活动超时
        config.inactivity_timeout = None;
        if self.keepalive.enabled {
            config.keepalive_interval = Some(Duration::from_secs(self.keepalive.interval));
            config.keepalive_max = self.keepalive.max_retries as usize;
        }
        config
    }
}
