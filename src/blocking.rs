// 同步调用封装
// 为没有异步运行时的调用方持有一个单线程 tokio 运行时

use std::future::Future;
use std::path::Path;

use tokio::runtime::{Builder, Runtime};

use crate::error::{Error, Result};
use crate::executor::{CommandRequest, CommandRunner};
use crate::models::CommandResult;
use crate::ssh::{SshClient, SshConfig, SshError, SshSession};

/// 阻塞式会话
///
/// 每个方法都在内部运行时上执行到完成后才返回。
pub struct BlockingSession {
    runtime: Runtime,
    session: SshSession,
}

impl BlockingSession {
    /// 建立连接
    pub fn connect(config: SshConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Ssh(SshError::Io(e)))?;
        let session = runtime.block_on(SshClient::connect_with(config))?;
        Ok(Self { runtime, session })
    }

    /// 底层异步会话
    pub fn session(&self) -> &SshSession {
        &self.session
    }

    /// 执行命令
    pub fn run(&mut self, request: impl Into<CommandRequest>) -> Result<CommandResult> {
        let request = request.into();
        self.runtime.block_on(self.session.run(request))
    }

    /// 在会话上执行任意异步操作，例如
    /// `blocking.call(|s| s.get_cpu_usage(false))`
    pub fn call<'s, T, F, Fut>(&'s mut self, f: F) -> T
    where
        F: FnOnce(&'s mut SshSession) -> Fut,
        Fut: Future<Output = T>,
    {
        let Self { runtime, session } = self;
        runtime.block_on(f(session))
    }

    pub fn upload(&self, local_path: impl AsRef<Path>, remote_path: &str) -> Result<u64> {
        self.runtime
            .block_on(self.session.upload(local_path, remote_path))
    }

    pub fn download(&self, remote_path: &str, local_path: impl AsRef<Path>) -> Result<u64> {
        self.runtime
            .block_on(self.session.download(remote_path, local_path))
    }

    /// 初始化 SFTP 传输通道
    pub fn init_transfer(&mut self) -> Result<()> {
        let Self { runtime, session } = self;
        runtime.block_on(session.init_transfer())
    }

    /// 关闭连接
    pub fn close(self) -> Result<()> {
        let Self { runtime, session } = self;
        runtime.block_on(session.close())
    }
}
