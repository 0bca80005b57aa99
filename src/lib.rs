//! 基于 SSH 的远端主机自动化
//!
//! 核心是命令执行器：对命令做换行清理、按需包装为 sudo / su、
//! 在超时约束下执行并把结果归一化为 [`CommandResult`]。
//! 文件、进程、用户、系统信息等操作集以扩展 trait 的形式挂在
//! [`CommandRunner`] 上，连接建立后导入对应 trait 即可使用。
//!
//! ```no_run
//! use shell_automator::{FileOperations, SshClient, SshConfig, SystemInfo};
//!
//! # async fn demo() -> shell_automator::Result<()> {
//! let config = SshConfig::new("10.0.0.5", "deploy").with_password("secret");
//! let mut session = SshClient::connect_with(config).await?;
//!
//! session.create_directory("/srv/app/releases", true).await?;
//! let cpu = session.get_cpu_usage(false).await?;
//! println!("{} cpu: {}", session.hostname(), cpu);
//!
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod error;
pub mod executor;
pub mod models;
pub mod parsers;
pub mod services;
pub mod ssh;

pub use blocking::BlockingSession;
pub use error::{Error, ErrorKind, Result};
pub use executor::{CommandRequest, CommandRunner, Impersonation, RemoteExec, ShellCommand};
pub use models::{CommandResult, Directory, MetricKind, Process, SystemMetric};
pub use services::{FileOperations, ProcessOperations, SystemInfo, UserOperations};
pub use ssh::{HostKeyPolicy, SshClient, SshConfig, SshError, SshSession};
