// SSH 客户端核心实现

use std::path::Path;
use std::sync::Arc;

use russh::client::Handle;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::config::{AuthMethod, SshConfig};
use super::error::SshError;
use super::handler::SshClientHandler;
use super::session::SshSession;
use crate::error::{Error, Result};
use crate::executor::{CommandRequest, CommandRunner};

/// SSH 客户端
/// 负责建立 SSH 连接并返回 SshSession
pub struct SshClient {
    /// 连接配置
    config: SshConfig,
}

impl SshClient {
    /// 创建新的 SSH 客户端
    pub fn new(config: SshConfig) -> Self {
        Self { config }
    }

    /// 直接连接
    pub async fn connect_with(config: SshConfig) -> Result<SshSession> {
        SshClient::new(config).connect().await
    }

    /// 执行连接
    ///
    /// 连接阶段的任何故障都返回错误，不会降级为结果值，也不会重试。
    pub async fn connect(&self) -> Result<SshSession> {
        // 凭据检查在任何网络操作之前
        self.config.validate()?;
        let auth = self.config.auth_method()?;

        let session_id = uuid::Uuid::new_v4().to_string();
        info!(
            "[SSH] [{}] Connecting to {}@{}:{}",
            session_id, self.config.username, self.config.host, self.config.port
        );

        let mut handle = self
            .establish()
            .await
            .map_err(|source| self.connection_error(source))?;

        info!("[SSH] [{}] Authenticating as '{}'", session_id, self.config.username);
        match timeout(self.config.auth_timeout(), self.authenticate(&mut handle, &auth)).await {
            Ok(Ok(())) => {}
            Ok(Err(SshError::Auth(message))) => return Err(Error::Authentication(message)),
            Ok(Err(source)) => return Err(self.connection_error(source)),
            Err(_) => {
                return Err(self.connection_error(SshError::Timeout {
                    stage: "Authentication",
                    secs: self.config.auth_timeout,
                }))
            }
        }
        info!("[SSH] [{}] Authentication successful", session_id);

        let mut session = SshSession::new(
            session_id,
            handle,
            self.config.host.clone(),
            self.config.port,
            self.config.username.clone(),
        );

        if self.config.enable_sftp {
            session.init_transfer().await?;
        }

        let hostname = session
            .run(CommandRequest::new("hostname -s").raise_on_failure(false))
            .await;
        match hostname {
            Ok(result) if result.is_success() => session.set_hostname(result.output),
            Ok(result) => warn!(
                "[SSH] [{}] hostname -s exited with {}: {}",
                session.id(),
                result.exit_code,
                result.output
            ),
            Err(e) => warn!("[SSH] [{}] Failed to read hostname: {}", session.id(), e),
        }

        info!(
            "[SSH] [{}] Connected to {} ({})",
            session.id(),
            self.config.host,
            session.hostname()
        );
        Ok(session)
    }

    fn connection_error(&self, source: SshError) -> Error {
        Error::Connection {
            host: self.config.host.clone(),
            source,
        }
    }

    /// TCP 连接 + SSH 握手，各自受 connect_timeout 约束
    async fn establish(&self) -> std::result::Result<Handle<SshClientHandler>, SshError> {
        let connect_timeout = self.config.connect_timeout();
        let timed_out = || SshError::Timeout {
            stage: "Connection",
            secs: self.config.connect_timeout,
        };

        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr = tokio::net::lookup_host(&addr)
            .await
            .map_err(|e| SshError::Config(format!("Failed to resolve address: {}", e)))?
            .next()
            .ok_or_else(|| SshError::Config("No valid address found".to_string()))?;

        debug!("[SSH] Connecting to {}...", socket_addr);
        let tcp_stream = timeout(connect_timeout, TcpStream::connect(socket_addr))
            .await
            .map_err(|_| timed_out())?
            .map_err(SshError::Io)?;

        debug!("[SSH] TCP connection established, starting handshake");
        let russh_config = Arc::new(self.config.to_russh_config());
        let handler = SshClientHandler::new(
            self.config.host.clone(),
            self.config.port,
            self.config.host_key_policy,
            self.config.resolved_known_hosts_path(),
        );

        let handle = timeout(
            connect_timeout,
            russh::client::connect_stream(russh_config, tcp_stream, handler),
        )
        .await
        .map_err(|_| timed_out())?
        .map_err(|e| match e {
            russh::Error::UnknownKey => SshError::HostKeyRejected {
                host: self.config.host.clone(),
                port: self.config.port,
            },
            other => SshError::from(other),
        })?;

        debug!("[SSH] SSH handshake completed");
        Ok(handle)
    }

    /// 执行认证
    async fn authenticate(
        &self,
        handle: &mut Handle<SshClientHandler>,
        auth: &AuthMethod,
    ) -> std::result::Result<(), SshError> {
        use russh::client::AuthResult;

        let (method, auth_result) = match auth {
            AuthMethod::Password(password) => {
                debug!("[SSH] Using password authentication");
                let result = handle
                    .authenticate_password(&self.config.username, password)
                    .await?;
                ("Password", result)
            }
            AuthMethod::PublicKey {
                key_path,
                passphrase,
            } => {
                debug!("[SSH] Using public key authentication: {:?}", key_path);
                let key = load_private_key(key_path, passphrase.as_deref()).await?;
                let key_with_alg = russh::keys::PrivateKeyWithHashAlg::new(
                    Arc::new(key),
                    None, // Use default hash algorithm
                );
                let result = handle
                    .authenticate_publickey(&self.config.username, key_with_alg)
                    .await?;
                ("Public key", result)
            }
        };

        match auth_result {
            AuthResult::Success => Ok(()),
            AuthResult::Failure {
                partial_success: true,
                ..
            } => Err(SshError::Auth(
                "Partial authentication - additional auth required".to_string(),
            )),
            AuthResult::Failure {
                remaining_methods, ..
            } => Err(SshError::Auth(format!(
                "{} authentication failed. Server suggests: {:?}",
                method, remaining_methods
            ))),
        }
    }
}

/// 加载私钥文件
async fn load_private_key(
    key_path: &Path,
    passphrase: Option<&str>,
) -> std::result::Result<russh::keys::PrivateKey, SshError> {
    let key_data = tokio::fs::read(key_path)
        .await
        .map_err(|e| SshError::Key(format!("Failed to read key file {:?}: {}", key_path, e)))?;

    russh::keys::decode_secret_key(&String::from_utf8_lossy(&key_data), passphrase)
        .map_err(|e| SshError::Key(format!("Failed to decode key {:?}: {}", key_path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_credentials_fail_before_connecting() {
        // 不可路由地址：若真的发起连接，测试会因超时而变慢/失败
        let config = SshConfig::new("192.0.2.1", "nobody");
        let result = SshClient::new(config).connect().await;
        assert!(matches!(result, Err(Error::Authentication(_))));
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_connection_error() {
        let config = SshConfig::new("host.invalid", "nobody").with_password("x");
        match SshClient::new(config).connect().await {
            Err(Error::Connection { host, .. }) => assert_eq!(host, "host.invalid"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("connection to .invalid should fail"),
        }
    }

    #[tokio::test]
    async fn test_missing_key_file_is_key_error() {
        let key = load_private_key(Path::new("/nonexistent/id_ed25519"), None).await;
        assert!(matches!(key, Err(SshError::Key(_))));
    }
}
