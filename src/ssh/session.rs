// SSH 会话管理
// 连接成功后的会话对象：命令通道 + 可选的 SFTP 传输通道

use std::path::Path;

use async_trait::async_trait;
use russh::client::{Handle, Msg};
use russh::{ChannelMsg, Disconnect};
use tracing::{debug, info, warn};

use super::error::SshError;
use super::handler::SshClientHandler;
use crate::error::Result;
use crate::executor::RemoteExec;
use crate::services::transfer::{SftpService, TransferChannel};

/// PTY 请求参数
#[derive(Clone, Debug)]
pub struct PtyRequest {
    /// 终端类型
    pub term: String,
    /// 列数
    pub col_width: u32,
    /// 行数
    pub row_height: u32,
}

impl Default for PtyRequest {
    fn default() -> Self {
        Self {
            term: "xterm".to_string(),
            col_width: 200,
            row_height: 24,
        }
    }
}

/// SSH 会话（连接成功后）
///
/// 会话独占一条连接，不做多路复用。执行命令需要 `&mut self`，
/// 多个任务共享同一会话时需自行加锁（如 `Arc<tokio::sync::Mutex<SshSession>>`）。
pub struct SshSession {
    /// 会话 ID
    id: String,
    /// russh Handle
    handle: Handle<SshClientHandler>,
    /// 服务器主机名
    host: String,
    /// 端口
    port: u16,
    /// 用户名
    username: String,
    /// 远端短主机名（hostname -s）
    hostname: String,
    /// PTY 参数
    pty: PtyRequest,
    /// 文件传输子通道
    transfer: TransferChannel,
    /// 连接状态
    is_connected: bool,
}

impl SshSession {
    pub(crate) fn new(
        id: String,
        handle: Handle<SshClientHandler>,
        host: String,
        port: u16,
        username: String,
    ) -> Self {
        Self {
            id,
            handle,
            host,
            port,
            username,
            hostname: String::new(),
            pty: PtyRequest::default(),
            transfer: TransferChannel::Absent,
            is_connected: true,
        }
    }

    /// 获取会话 ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// 获取主机地址
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// 获取用户名
    pub fn username(&self) -> &str {
        &self.username
    }

    /// 远端短主机名，获取失败时为空
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub(crate) fn set_hostname(&mut self, hostname: String) {
        self.hostname = hostname;
    }

    /// 检查会话是否活跃
    pub fn is_alive(&self) -> bool {
        self.is_connected && !self.handle.is_closed()
    }

    /// 修改执行命令时申请的 PTY
    pub fn set_pty(&mut self, pty: PtyRequest) {
        self.pty = pty;
    }

    /// 文件传输通道状态
    pub fn transfer(&self) -> &TransferChannel {
        &self.transfer
    }

    /// 初始化 SFTP 传输通道，已就绪时直接返回
    pub async fn init_transfer(&mut self) -> Result<()> {
        if self.transfer.is_ready() {
            return Ok(());
        }
        self.ensure_alive()?;

        self.transfer = TransferChannel::Initializing;
        match SftpService::open(&self.id, &self.handle).await {
            Ok(service) => {
                self.transfer = TransferChannel::Ready(service);
                info!("[SSH] [{}] SFTP channel ready", self.id);
                Ok(())
            }
            Err(e) => {
                self.transfer = TransferChannel::Absent;
                Err(e)
            }
        }
    }

    /// 上传本地文件
    pub async fn upload(&self, local_path: impl AsRef<Path>, remote_path: &str) -> Result<u64> {
        self.transfer
            .service()?
            .upload(local_path.as_ref(), remote_path)
            .await
    }

    /// 下载远端文件
    pub async fn download(&self, remote_path: &str, local_path: impl AsRef<Path>) -> Result<u64> {
        self.transfer
            .service()?
            .download(remote_path, local_path.as_ref())
            .await
    }

    /// 打开执行通道
    pub async fn open_exec(&self) -> std::result::Result<ExecChannel, SshError> {
        self.ensure_alive()?;

        let channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(SshError::from)?;

        Ok(ExecChannel::new(channel))
    }

    /// 关闭会话（消耗自身，只会执行一次）
    pub async fn close(mut self) -> Result<()> {
        if let TransferChannel::Ready(service) = std::mem::take(&mut self.transfer) {
            service.close().await;
        }
        self.is_connected = false;

        info!("[SSH] [{}] Closing session to {}", self.id, self.host);
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(SshError::from)?;
        Ok(())
    }

    fn ensure_alive(&self) -> std::result::Result<(), SshError> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(SshError::Disconnected(
                "Session is disconnected".to_string(),
            ))
        }
    }
}

#[async_trait]
impl RemoteExec for SshSession {
    async fn exec_raw(&mut self, command: &str) -> std::result::Result<CommandOutput, SshError> {
        let exec = self.open_exec().await?;
        exec.exec(command, Some(&self.pty)).await
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        if self.is_connected {
            debug!(
                "[SSH] [{}] Session dropped without close, connection released",
                self.id
            );
        }
    }
}

// 使用 russh::client::Msg 作为消息类型
type RusshChannel = russh::Channel<Msg>;

/// 执行通道（每条命令一个通道）
pub struct ExecChannel {
    channel: RusshChannel,
}

impl ExecChannel {
    fn new(channel: RusshChannel) -> Self {
        Self { channel }
    }

    /// 执行命令并等待通道关闭
    pub async fn exec(
        mut self,
        command: &str,
        pty: Option<&PtyRequest>,
    ) -> std::result::Result<CommandOutput, SshError> {
        if let Some(pty) = pty {
            self.channel
                .request_pty(
                    true,
                    &pty.term,
                    pty.col_width,
                    pty.row_height,
                    0,
                    0,
                    &[],
                )
                .await
                .map_err(|e| SshError::Channel(e.to_string()))?;
        }

        self.channel
            .exec(true, command)
            .await
            .map_err(|e| SshError::Channel(e.to_string()))?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_status = None;

        // exit-status 可能在 EOF 之后到达，读到通道关闭为止
        while let Some(channel_msg) = self.channel.wait().await {
            match channel_msg {
                ChannelMsg::Data { data } => {
                    stdout.extend_from_slice(&data);
                }
                ChannelMsg::ExtendedData { data, ext } => {
                    if ext == 1 {
                        stderr.extend_from_slice(&data);
                    }
                }
                ChannelMsg::ExitStatus { exit_status: status } => {
                    exit_status = Some(status);
                }
                ChannelMsg::ExitSignal { signal_name, .. } => {
                    warn!("[Exec] Remote process terminated by signal {:?}", signal_name);
                }
                ChannelMsg::Close => break,
                _ => {}
            }
        }

        Ok(CommandOutput {
            stdout,
            stderr,
            exit_status,
        })
    }
}

/// 命令原始输出
#[derive(Clone, Debug, Default)]
pub struct CommandOutput {
    /// 标准输出
    pub stdout: Vec<u8>,
    /// 标准错误
    pub stderr: Vec<u8>,
    /// 远端上报的退出码（被信号终止时没有）
    pub exit_status: Option<u32>,
}

impl CommandOutput {
    /// 获取标准输出字符串
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// 获取标准错误字符串
    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }

    /// 退出码，未上报时为 -1
    pub fn exit_code(&self) -> i32 {
        self.exit_status.map(|s| s as i32).unwrap_or(-1)
    }

    /// 检查命令是否成功
    pub fn is_success(&self) -> bool {
        self.exit_status == Some(0)
    }
}
