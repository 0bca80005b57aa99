// 测试用的脚本化远端
//
// 按顺序返回预设的输出，并记录收到的每一条最终命令。

#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use shell_automator::ssh::CommandOutput;
use shell_automator::{RemoteExec, SshError};

pub enum Reply {
    Output(CommandOutput),
    Fail(SshError),
}

#[derive(Default)]
pub struct FakeRemote {
    /// 收到的命令，按执行顺序
    pub commands: Vec<String>,
    replies: VecDeque<Reply>,
    delay: Option<Duration>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, exit_status: u32, stdout: &str, stderr: &str) -> Self {
        self.replies.push_back(Reply::Output(CommandOutput {
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
            exit_status: Some(exit_status),
        }));
        self
    }

    pub fn ok(self, stdout: &str) -> Self {
        self.reply(0, stdout, "")
    }

    pub fn fail(self, exit_status: u32, stderr: &str) -> Self {
        self.reply(exit_status, "", stderr)
    }

    /// 通道关闭但没有上报退出码
    pub fn no_status(mut self, stdout: &str) -> Self {
        self.replies.push_back(Reply::Output(CommandOutput {
            stdout: stdout.as_bytes().to_vec(),
            stderr: Vec::new(),
            exit_status: None,
        }));
        self
    }

    pub fn transport_error(mut self, error: SshError) -> Self {
        self.replies.push_back(Reply::Fail(error));
        self
    }

    /// 每条命令执行前等待
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn last_command(&self) -> &str {
        self.commands.last().map(String::as_str).unwrap_or("")
    }
}

#[async_trait]
impl RemoteExec for FakeRemote {
    async fn exec_raw(&mut self, command: &str) -> Result<CommandOutput, SshError> {
        self.commands.push(command.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.replies.pop_front() {
            Some(Reply::Output(output)) => Ok(output),
            Some(Reply::Fail(error)) => Err(error),
            // 未预设时按成功且无输出处理
            None => Ok(CommandOutput {
                exit_status: Some(0),
                ..Default::default()
            }),
        }
    }
}
