// SSH 客户端 Handler 实现
// 实现 russh::client::Handler trait，负责主机密钥校验

use std::future::Future;
use std::path::PathBuf;

use russh::keys::PublicKey;
use tracing::{debug, info, warn};

use super::config::HostKeyPolicy;

/// known_hosts 查询结果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostKeyStatus {
    /// 已知且匹配
    Known,
    /// 未记录
    Unknown,
    /// 已记录但不匹配，或 known_hosts 无法读取
    Mismatch,
}

/// 根据策略决定是否接受服务器公钥
pub fn accept_host_key(status: HostKeyStatus, policy: HostKeyPolicy) -> bool {
    match (status, policy) {
        (HostKeyStatus::Known, _) => true,
        (HostKeyStatus::Unknown, HostKeyPolicy::AcceptNew) => true,
        (HostKeyStatus::Unknown, HostKeyPolicy::Reject) => false,
        (HostKeyStatus::Mismatch, _) => false,
    }
}

/// SSH 客户端 Handler
pub struct SshClientHandler {
    /// 服务器主机名
    host: String,
    /// 服务器端口
    port: u16,
    /// 未知主机策略
    policy: HostKeyPolicy,
    /// known_hosts 文件
    known_hosts: Option<PathBuf>,
}

impl SshClientHandler {
    pub fn new(
        host: String,
        port: u16,
        policy: HostKeyPolicy,
        known_hosts: Option<PathBuf>,
    ) -> Self {
        Self {
            host,
            port,
            policy,
            known_hosts,
        }
    }

    fn lookup(&self, key: &PublicKey) -> HostKeyStatus {
        let Some(path) = &self.known_hosts else {
            return HostKeyStatus::Unknown;
        };
        if !path.exists() {
            return HostKeyStatus::Unknown;
        }
        match russh::keys::check_known_hosts_path(&self.host, self.port, key, path) {
            Ok(true) => HostKeyStatus::Known,
            Ok(false) => HostKeyStatus::Unknown,
            Err(e) => {
                warn!(
                    "[SSH] Host key check failed for {}:{}: {}",
                    self.host, self.port, e
                );
                HostKeyStatus::Mismatch
            }
        }
    }

    fn learn(&self, key: &PublicKey) {
        let Some(path) = &self.known_hosts else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("[SSH] Cannot create {:?}: {}", parent, e);
                return;
            }
        }
        match russh::keys::known_hosts::learn_known_hosts_path(&self.host, self.port, key, path) {
            Ok(()) => info!("[SSH] Added {}:{} to {:?}", self.host, self.port, path),
            Err(e) => warn!(
                "[SSH] Failed to record host key for {}:{}: {}",
                self.host, self.port, e
            ),
        }
    }
}

impl russh::client::Handler for SshClientHandler {
    type Error = russh::Error;

    /// 检查服务器公钥
    fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        let fingerprint = server_public_key.fingerprint(russh::keys::ssh_key::HashAlg::Sha256);
        debug!(
            "[SSH] Server key {} {} for {}:{}",
            server_public_key.algorithm(),
            fingerprint,
            self.host,
            self.port
        );

        let status = self.lookup(server_public_key);
        let accepted = accept_host_key(status, self.policy);
        if accepted && status == HostKeyStatus::Unknown {
            self.learn(server_public_key);
        }
        if !accepted {
            warn!(
                "[SSH] Rejecting host key for {}:{} ({:?}, fingerprint {})",
                self.host, self.port, status, fingerprint
            );
        }

        async move { Ok(accepted) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST_KEY: &str =
        "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAILM+rvN+ot98qgEN796jTiQfZfG1KaT0PtFDJ/XFSqti";

    #[test]
    fn test_learned_key_is_known_afterwards() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ssh").join("known_hosts");
        let key = PublicKey::from_openssh(HOST_KEY).unwrap();
        let handler = SshClientHandler::new(
            "build.example.com".to_string(),
            2222,
            HostKeyPolicy::AcceptNew,
            Some(path.clone()),
        );

        assert_eq!(handler.lookup(&key), HostKeyStatus::Unknown);
        handler.learn(&key);
        assert!(path.exists());
        assert_eq!(handler.lookup(&key), HostKeyStatus::Known);
    }

    #[test]
    fn test_known_key_always_accepted() {
        assert!(accept_host_key(HostKeyStatus::Known, HostKeyPolicy::AcceptNew));
        assert!(accept_host_key(HostKeyStatus::Known, HostKeyPolicy::Reject));
    }

    #[test]
    fn test_unknown_key_follows_policy() {
        assert!(accept_host_key(HostKeyStatus::Unknown, HostKeyPolicy::AcceptNew));
        assert!(!accept_host_key(HostKeyStatus::Unknown, HostKeyPolicy::Reject));
    }

    #[test]
    fn test_mismatch_always_rejected() {
        assert!(!accept_host_key(HostKeyStatus::Mismatch, HostKeyPolicy::AcceptNew));
        assert!(!accept_host_key(HostKeyStatus::Mismatch, HostKeyPolicy::Reject));
    }
}
