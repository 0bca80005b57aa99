// 进程操作

use async_trait::async_trait;

use crate::error::{Error, ErrorKind, Result};
use crate::executor::{CommandRequest, CommandRunner, ShellCommand};
use crate::models::Process;
use crate::parsers::{parse_process_list, ProcessListing};

/// 远端进程操作
#[async_trait]
pub trait ProcessOperations: CommandRunner {
    /// 按名称查找进程，没有匹配时返回空列表
    async fn get_single_process_status(
        &mut self,
        process: &str,
        run_as_root: bool,
    ) -> Result<Vec<Process>> {
        let command = ShellCommand::new("ps")
            .raw("aux")
            .pipe(ShellCommand::new("grep").arg(process))
            .pipe(ShellCommand::new("grep").raw("-v grep"));
        let request = CommandRequest::from(command)
            .run_as_root(run_as_root)
            .raise_on_failure(false);

        let result = self.run(request).await?;
        if !result.is_success() {
            // grep 无匹配时退出码为 1 且没有输出
            if result.output.trim().is_empty() {
                return Ok(Vec::new());
            }
            return Err(Error::Command {
                kind: ErrorKind::GetProcessesStatus,
                message: result.output,
            });
        }

        parse_process_list(&result.output, ProcessListing::Filtered)
    }

    /// 列出所有进程
    async fn get_all_running_processes(&mut self, run_as_root: bool) -> Result<Vec<Process>> {
        let request = CommandRequest::new("ps aux")
            .run_as_root(run_as_root)
            .error_kind(ErrorKind::GetProcessesStatus);
        let result = self.run(request).await?;
        parse_process_list(&result.output, ProcessListing::All)
    }

    /// 按名称结束进程
    async fn kill_process(&mut self, process: &str, run_as_root: bool) -> Result<()> {
        let request = CommandRequest::from(ShellCommand::new("pkill").arg(process))
            .run_as_root(run_as_root)
            .error_kind(ErrorKind::KillProcess);
        self.run(request).await?;
        Ok(())
    }
}

impl<T: CommandRunner + ?Sized> ProcessOperations for T {}
