// 命令执行请求

use std::time::Duration;

use super::command::{sanitize, wrap, Impersonation, ShellCommand};
use crate::error::ErrorKind;

/// 默认命令超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// 一次命令执行的全部参数
#[derive(Clone, Debug)]
pub struct CommandRequest {
    /// 原始命令文本
    pub command: String,
    /// 执行身份
    pub impersonate: Impersonation,
    /// 非零退出时是否返回错误
    pub raise_on_failure: bool,
    /// 失败时的错误分类
    pub error_kind: ErrorKind,
    /// 失败时替代远端输出的错误消息
    pub error_message: Option<String>,
    /// 超时，None 表示不限时
    pub timeout: Option<Duration>,
    /// 命令含敏感信息时不写入日志
    pub redacted: bool,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            impersonate: Impersonation::None,
            raise_on_failure: true,
            error_kind: ErrorKind::Command,
            error_message: None,
            timeout: Some(DEFAULT_TIMEOUT),
            redacted: false,
        }
    }

    pub fn as_root(mut self) -> Self {
        self.impersonate = Impersonation::Root;
        self
    }

    pub fn as_user(mut self, user: impl Into<String>) -> Self {
        self.impersonate = Impersonation::user(user);
        self
    }

    pub fn run_as_root(mut self, run_as_root: bool) -> Self {
        self.impersonate = Impersonation::from_run_as_root(run_as_root);
        self
    }

    pub fn impersonate(mut self, target: Impersonation) -> Self {
        self.impersonate = target;
        self
    }

    pub fn raise_on_failure(mut self, raise: bool) -> Self {
        self.raise_on_failure = raise;
        self
    }

    pub fn error_kind(mut self, kind: ErrorKind) -> Self {
        self.error_kind = kind;
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    pub fn redacted(mut self) -> Self {
        self.redacted = true;
        self
    }

    /// 实际发往远端的命令文本
    pub fn final_command(&self) -> String {
        wrap(&sanitize(&self.command), &self.impersonate)
    }

    /// 日志中展示的命令文本
    pub(crate) fn display_command(&self) -> String {
        if self.redacted {
            "<redacted>".to_string()
        } else {
            self.final_command()
        }
    }
}

impl From<&str> for CommandRequest {
    fn from(command: &str) -> Self {
        CommandRequest::new(command)
    }
}

impl From<String> for CommandRequest {
    fn from(command: String) -> Self {
        CommandRequest::new(command)
    }
}

impl From<ShellCommand> for CommandRequest {
    fn from(command: ShellCommand) -> Self {
        CommandRequest::new(command.build())
    }
}
