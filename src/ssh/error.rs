// SSH 传输层错误类型定义

use thiserror::Error;

/// SSH 传输层错误
/// 只描述连接、认证、通道层面的故障，命令语义错误见 `crate::error::Error`
#[derive(Debug, Error)]
pub enum SshError {
    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO 错误（网络连接等）
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 认证失败
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// SSH 协议错误
    #[error("SSH protocol error: {0}")]
    Protocol(String),

    /// 密钥错误
    #[error("Key error: {0}")]
    Key(String),

    /// 主机密钥被拒绝
    #[error("Host key rejected for {host}:{port}")]
    HostKeyRejected { host: String, port: u16 },

    /// 连接/认证超时
    #[error("{stage} timeout after {secs}s")]
    Timeout { stage: &'static str, secs: u64 },

    /// 通道错误
    #[error("Channel error: {0}")]
    Channel(String),

    /// 会话已断开
    #[error("Session disconnected: {0}")]
    Disconnected(String),
}

impl From<russh::Error> for SshError {
    fn from(e: russh::Error) -> Self {
        match e {
            russh::Error::Disconnect => SshError::Disconnected(e.to_string()),
            russh::Error::ChannelOpenFailure(reason) => {
                SshError::Channel(format!("Channel open refused: {:?}", reason))
            }
            russh::Error::IO(io) => SshError::Io(io),
            other => SshError::Protocol(other.to_string()),
        }
    }
}

impl From<russh::keys::Error> for SshError {
    fn from(e: russh::keys::Error) -> Self {
        SshError::Key(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_russh_errors_are_mapped_by_layer() {
        assert!(matches!(
            SshError::from(russh::Error::Disconnect),
            SshError::Disconnected(_)
        ));

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        assert!(matches!(SshError::from(russh::Error::IO(io)), SshError::Io(_)));
    }

    #[test]
    fn test_timeout_names_stage() {
        let err = SshError::Timeout {
            stage: "Authentication",
            secs: 10,
        };
        assert_eq!(err.to_string(), "Authentication timeout after 10s");
    }
}
