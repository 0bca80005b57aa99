// SSH 连接模块
//
// 模块结构:
// - config: 连接配置 (SshConfig, AuthMethod, HostKeyPolicy)
// - error: 传输层错误 (SshError)
// - handler: russh Handler 实现（主机密钥校验）
// - client: 建立连接与认证
// - session: 已连接会话 (SshSession, ExecChannel)

pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod session;

// 公开导出
pub use client::SshClient;
pub use config::{AuthMethod, HostKeyPolicy, KeepaliveConfig, SshConfig};
pub use error::SshError;
pub use session::{CommandOutput, ExecChannel, PtyRequest, SshSession};
