// 文件传输服务 - 封装 russh-sftp 客户端

use std::path::Path;

use russh::client::Handle;
use russh_sftp::client::SftpSession;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::ssh::handler::SshClientHandler;
use crate::ssh::SshError;

/// 会话上的传输子通道状态
///
/// 连接配置未启用 SFTP 时为 `Absent`；初始化过程中为 `Initializing`；
/// 只有 `Ready` 状态可以传输文件。
#[derive(Default)]
pub enum TransferChannel {
    #[default]
    Absent,
    Initializing,
    Ready(SftpService),
}

impl TransferChannel {
    pub fn is_ready(&self) -> bool {
        matches!(self, TransferChannel::Ready(_))
    }

    /// 取出可用的 SFTP 服务，未就绪时报错
    pub fn service(&self) -> Result<&SftpService> {
        match self {
            TransferChannel::Ready(service) => Ok(service),
            TransferChannel::Absent | TransferChannel::Initializing => {
                Err(Error::TransferNotInitialized)
            }
        }
    }

    pub fn state_name(&self) -> &'static str {
        match self {
            TransferChannel::Absent => "absent",
            TransferChannel::Initializing => "initializing",
            TransferChannel::Ready(_) => "ready",
        }
    }
}

impl std::fmt::Debug for TransferChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TransferChannel::{}", self.state_name())
    }
}

/// SFTP 服务
pub struct SftpService {
    /// 会话 ID（用于日志）
    session_id: String,
    /// russh-sftp 客户端会话
    sftp: SftpSession,
}

impl SftpService {
    /// 在已认证的连接上打开 SFTP 子系统
    pub async fn open(session_id: &str, handle: &Handle<SshClientHandler>) -> Result<Self> {
        info!("[SFTP] Opening SFTP subsystem for session {}", session_id);

        let channel = handle
            .channel_open_session()
            .await
            .map_err(SshError::from)?;

        channel
            .request_subsystem(true, "sftp")
            .await
            .map_err(|e| Error::Transfer(format!("Failed to request sftp subsystem: {}", e)))?;

        let sftp = SftpSession::new(channel.into_stream())
            .await
            .map_err(|e| Error::Transfer(format!("Failed to create SFTP session: {}", e)))?;

        Ok(Self {
            session_id: session_id.to_string(),
            sftp,
        })
    }

    /// 上传本地文件到远端
    pub async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<u64> {
        debug!(
            "[SFTP] [{}] Uploading {:?} -> {}",
            self.session_id, local_path, remote_path
        );

        let mut local = tokio::fs::File::open(local_path).await.map_err(|e| {
            Error::Transfer(format!("Error copying file to remote: {}", e))
        })?;
        let mut remote = self.sftp.create(remote_path).await.map_err(|e| {
            Error::Transfer(format!("Error copying file to remote: {}", e))
        })?;

        let bytes = tokio::io::copy(&mut local, &mut remote)
            .await
            .map_err(|e| Error::Transfer(format!("Error copying file to remote: {}", e)))?;
        remote
            .shutdown()
            .await
            .map_err(|e| Error::Transfer(format!("Error copying file to remote: {}", e)))?;

        info!(
            "[SFTP] [{}] Uploaded {} bytes to {}",
            self.session_id, bytes, remote_path
        );
        Ok(bytes)
    }

    /// 下载远端文件到本地
    pub async fn download(&self, remote_path: &str, local_path: &Path) -> Result<u64> {
        debug!(
            "[SFTP] [{}] Downloading {} -> {:?}",
            self.session_id, remote_path, local_path
        );

        let mut remote = self.sftp.open(remote_path).await.map_err(|e| {
            Error::Transfer(format!("Error copying file from remote: {}", e))
        })?;
        let mut local = tokio::fs::File::create(local_path).await.map_err(|e| {
            Error::Transfer(format!("Error copying file from remote: {}", e))
        })?;

        let bytes = tokio::io::copy(&mut remote, &mut local)
            .await
            .map_err(|e| Error::Transfer(format!("Error copying file from remote: {}", e)))?;
        local
            .sync_all()
            .await
            .map_err(|e| Error::Transfer(format!("Error copying file from remote: {}", e)))?;

        info!(
            "[SFTP] [{}] Downloaded {} bytes from {}",
            self.session_id, bytes, remote_path
        );
        Ok(bytes)
    }

    /// 关闭 SFTP 会话
    pub async fn close(self) {
        if let Err(e) = self.sftp.close().await {
            warn!(
                "[SFTP] [{}] Failed to close SFTP session: {}",
                self.session_id, e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_channel_is_not_ready() {
        let channel = TransferChannel::default();
        assert!(!channel.is_ready());
        assert!(matches!(
            channel.service(),
            Err(Error::TransferNotInitialized)
        ));
    }

    #[test]
    fn test_initializing_channel_is_not_usable() {
        let channel = TransferChannel::Initializing;
        assert!(matches!(
            channel.service(),
            Err(Error::TransferNotInitialized)
        ));
        assert_eq!(format!("{:?}", channel), "TransferChannel::initializing");
    }
}
