// 命令执行器
//
// 模块结构:
// - command: 命令清理、提权包装、参数转义
// - request: 执行请求 (CommandRequest)
//
// 执行器本身无状态：同一请求执行两次就会在远端执行两次。

pub mod command;
pub mod request;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::CommandResult;
use crate::ssh::{CommandOutput, SshError};

pub use command::{quote, sanitize, wrap, Impersonation, ShellCommand, ROOT};
pub use request::{CommandRequest, DEFAULT_TIMEOUT};

/// 远端执行通道
///
/// 执行器与传输层之间唯一的接口：发送一条最终命令，等待其结束，
/// 返回原始 stdout/stderr/退出码。
#[async_trait]
pub trait RemoteExec: Send {
    async fn exec_raw(&mut self, command: &str) -> std::result::Result<CommandOutput, SshError>;
}

/// 命令执行能力
///
/// 所有 `RemoteExec` 实现都自动获得该能力。`&mut self` 保证同一会话
/// 同一时刻只有一个调用方；并发使用需要外部互斥或每个任务一个会话。
#[async_trait]
pub trait CommandRunner: Send {
    /// 执行请求并按约定归一化结果
    async fn run(&mut self, request: CommandRequest) -> Result<CommandResult>;

    /// 以默认参数执行命令
    async fn run_cmd(&mut self, command: &str) -> Result<CommandResult> {
        self.run(CommandRequest::new(command)).await
    }
}

#[async_trait]
impl<T: RemoteExec + ?Sized> CommandRunner for T {
    async fn run(&mut self, request: CommandRequest) -> Result<CommandResult> {
        execute(self, &request).await
    }
}

/// 构建最终命令、在超时约束下执行、归一化输出
pub async fn execute<R>(remote: &mut R, request: &CommandRequest) -> Result<CommandResult>
where
    R: RemoteExec + ?Sized,
{
    let command = request.final_command();
    debug!("[Exec] Running: {}", request.display_command());

    let output = match request.timeout {
        Some(limit) => match tokio::time::timeout(limit, remote.exec_raw(&command)).await {
            Ok(output) => output?,
            Err(_) => {
                warn!(
                    "[Exec] Timed out after {:?}: {}",
                    limit,
                    request.display_command()
                );
                return Err(Error::Timeout(limit));
            }
        },
        None => remote.exec_raw(&command).await?,
    };

    let result = normalize(output, request);
    match &result {
        Ok(r) => debug!("[Exec] Exit code {}", r.exit_code),
        Err(e) => debug!("[Exec] Failed: {}", e),
    }
    result
}

/// 把原始输出转换为 CommandResult
///
/// - 退出码为 0：返回 (0, stdout)
/// - 非零：错误文本取 stderr，stderr 为空时取 stdout；
///   `raise_on_failure` 时返回错误（消息优先用调用方覆盖值），否则作为数据返回
pub fn normalize(output: CommandOutput, request: &CommandRequest) -> Result<CommandResult> {
    let exit_code = output.exit_code();
    let stdout = output.stdout_string().trim_end().to_string();

    if exit_code == 0 {
        return Ok(CommandResult::new(0, stdout));
    }

    let stderr = output.stderr_string().trim_end().to_string();
    let err_text = if stderr.is_empty() { stdout } else { stderr };

    if request.raise_on_failure {
        return Err(Error::Command {
            kind: request.error_kind,
            message: request.error_message.clone().unwrap_or(err_text),
        });
    }

    Ok(CommandResult::new(exit_code, err_text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn output(exit_status: Option<u32>, stdout: &str, stderr: &str) -> CommandOutput {
        CommandOutput {
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
            exit_status,
        }
    }

    #[test]
    fn test_success_returns_trimmed_stdout() {
        let request = CommandRequest::new("echo hi");
        let result = normalize(output(Some(0), "hi  \r\n", "warning\n"), &request).unwrap();
        assert!(result.is_success());
        assert_eq!(result.output, "hi");
    }

    #[test]
    fn test_failure_without_raise_prefers_stderr() {
        let request = CommandRequest::new("ls /nope").raise_on_failure(false);
        let result = normalize(output(Some(2), "partial\n", "no such file\n"), &request).unwrap();
        assert_eq!(result.exit_code, 2);
        assert!(!result.is_success());
        assert_eq!(result.output, "no such file");
    }

    #[test]
    fn test_failure_without_raise_falls_back_to_stdout() {
        let request = CommandRequest::new("false").raise_on_failure(false);
        let result = normalize(output(Some(1), "only stdout \n", "  \n"), &request).unwrap();
        assert_eq!(result.output, "only stdout");
    }

    #[test]
    fn test_failure_with_raise_uses_error_text() {
        let request = CommandRequest::new("rm x").error_kind(ErrorKind::FileRemoval);
        let err = normalize(output(Some(1), "", "rm: x: denied\n"), &request).unwrap_err();
        match err {
            Error::Command { kind, message } => {
                assert_eq!(kind, ErrorKind::FileRemoval);
                assert_eq!(message, "rm: x: denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_failure_with_raise_uses_override_message() {
        let request = CommandRequest::new("pgrep x").error_message("Process x not found");
        let err = normalize(output(Some(1), "", "boom"), &request).unwrap_err();
        assert_eq!(err.to_string(), "command failed: Process x not found");
    }

    #[test]
    fn test_missing_exit_status_is_failure() {
        let request = CommandRequest::new("sleep 100").raise_on_failure(false);
        let result = normalize(output(None, "", "Killed"), &request).unwrap();
        assert_eq!(result.exit_code, -1);
        assert_eq!(result.output, "Killed");
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let request = CommandRequest::new("cat bin");
        let raw = CommandOutput {
            stdout: vec![b'o', b'k', 0xff],
            stderr: Vec::new(),
            exit_status: Some(0),
        };
        assert_eq!(normalize(raw, &request).unwrap().output, "ok\u{fffd}");
    }
}
