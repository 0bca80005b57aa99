// 对外错误类型
//
// 每种失败对应一个变体；命令失败额外携带调用方给出的分类标签 (ErrorKind)，
// 消息文本保持远端输出原样，不做截断或清洗。

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::ssh::SshError;

pub type Result<T> = std::result::Result<T, Error>;

/// 命令失败的分类标签
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 通用命令失败
    #[default]
    Command,
    FileRemoval,
    DirectoryRemoval,
    DirectoryCreation,
    ListDirectoryContent,
    GetFileContent,
    OwnerChange,
    KillProcess,
    GetProcessesStatus,
    UserCreation,
    UserDeletion,
    GetSystemInfo,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "command failed",
            Self::FileRemoval => "file removal failed",
            Self::DirectoryRemoval => "directory removal failed",
            Self::DirectoryCreation => "directory creation failed",
            Self::ListDirectoryContent => "directory listing failed",
            Self::GetFileContent => "reading file content failed",
            Self::OwnerChange => "owner change failed",
            Self::KillProcess => "killing process failed",
            Self::GetProcessesStatus => "listing processes failed",
            Self::UserCreation => "user creation failed",
            Self::UserDeletion => "user deletion failed",
            Self::GetSystemInfo => "reading system info failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 库的统一错误类型
#[derive(Debug, Error)]
pub enum Error {
    /// 连接阶段失败（TCP、握手、主机密钥），不会自动重试
    #[error("Error connecting to {host}: {source}")]
    Connection {
        host: String,
        #[source]
        source: SshError,
    },

    /// 未提供凭据，或远端拒绝了凭据
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// 远端命令以非零状态退出
    #[error("{kind}: {message}")]
    Command { kind: ErrorKind, message: String },

    /// 命令未在时限内完成；远端进程状态未知
    #[error("Command did not complete within {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// 文件传输失败
    #[error("File transfer error: {0}")]
    Transfer(String),

    /// 传输子通道未初始化
    #[error("SFTP is not initialized")]
    TransferNotInitialized,

    /// 输出不符合预期格式
    #[error("Failed to parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },

    /// 连接建立后的传输层故障
    #[error(transparent)]
    Ssh(#[from] SshError),
}

impl Error {
    /// 命令失败时的分类标签
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Command { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// 把通用命令失败改写为更具体的分类，保留原消息
    pub fn reclassify(self, kind: ErrorKind) -> Self {
        match self {
            Error::Command { message, .. } => Error::Command { kind, message },
            other => other,
        }
    }

    pub(crate) fn parse(what: &'static str, detail: impl Into<String>) -> Self {
        Error::Parse {
            what,
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_message_is_verbatim() {
        let err = Error::Command {
            kind: ErrorKind::FileRemoval,
            message: "rm: cannot remove '/x': No such file or directory".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "file removal failed: rm: cannot remove '/x': No such file or directory"
        );
        assert_eq!(err.kind(), Some(ErrorKind::FileRemoval));
    }

    #[test]
    fn test_reclassify_keeps_message() {
        let err = Error::Command {
            kind: ErrorKind::Command,
            message: "permission denied".to_string(),
        }
        .reclassify(ErrorKind::DirectoryCreation);

        match err {
            Error::Command { kind, message } => {
                assert_eq!(kind, ErrorKind::DirectoryCreation);
                assert_eq!(message, "permission denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reclassify_ignores_other_variants() {
        let err = Error::TransferNotInitialized.reclassify(ErrorKind::FileRemoval);
        assert!(matches!(err, Error::TransferNotInitialized));
        assert_eq!(err.kind(), None);
    }

    #[test]
    fn test_timeout_display() {
        let err = Error::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "Command did not complete within 1.5s");
    }
}
