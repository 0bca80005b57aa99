// 命令行入口：连接一台主机，执行一条命令，以远端退出码退出

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use shell_automator::{
    BlockingSession, CommandRequest, CommandResult, ErrorKind, Impersonation, ShellCommand,
    SshConfig,
};

#[derive(Debug, Parser)]
#[command(name = "shell-automator", version, about = "Run a command on a remote host over SSH")]
struct Cli {
    /// 连接配置 JSON 文件；未指定时从 SHELL_AUTOMATOR_* 环境变量读取
    #[arg(long, value_name = "FILE")]
    json_config: Option<PathBuf>,

    /// 以 root 身份执行 (sudo)
    #[arg(long, conflicts_with = "user")]
    sudo: bool,

    /// 以指定用户身份执行 (sudo su)
    #[arg(long, value_name = "NAME")]
    user: Option<String>,

    /// 命令超时（秒），0 表示不限时
    #[arg(long, value_name = "SECS", default_value_t = 10)]
    timeout: u64,

    /// 非零退出时把输出打印到 stdout，而不是作为错误打印到 stderr
    #[arg(long)]
    no_raise: bool,

    /// 远端命令
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

impl Cli {
    fn request(&self) -> CommandRequest {
        let impersonate = match (&self.user, self.sudo) {
            (Some(user), _) => Impersonation::user(user.as_str()),
            (None, true) => Impersonation::Root,
            (None, false) => Impersonation::None,
        };

        // 单个参数视为完整命令行，多个参数逐个转义
        let command = match self.command.as_slice() {
            [single] => single.clone(),
            [program, args @ ..] => args
                .iter()
                .fold(ShellCommand::new(program), |cmd, arg| cmd.arg(arg))
                .build(),
            [] => String::new(),
        };

        // 失败也作为结果返回，进程以远端退出码退出
        let request = CommandRequest::new(command)
            .impersonate(impersonate)
            .raise_on_failure(false);
        if self.timeout == 0 {
            request.no_timeout()
        } else {
            request.timeout(Duration::from_secs(self.timeout))
        }
    }

    fn config(&self) -> Result<SshConfig> {
        let config = match &self.json_config {
            Some(path) => SshConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SshConfig::from_env().context("reading SHELL_AUTOMATOR_* environment")?,
        };
        Ok(config)
    }
}

fn main() -> Result<ExitCode> {
    // 通过 RUST_LOG 控制日志级别，例如：RUST_LOG=debug
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    let host = config.host.clone();

    let mut session = BlockingSession::connect(config)?;
    let outcome = session.run(cli.request());
    if let Err(e) = session.close() {
        tracing::warn!("[SSH] Failed to close session to {}: {}", host, e);
    }

    let result = outcome.with_context(|| format!("running command on {}", host))?;
    Ok(report(&result, cli.no_raise))
}

/// 未设置或无法解析 RUST_LOG 时使用 info
fn log_filter(spec: Option<&str>) -> EnvFilter {
    spec.and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// 打印输出并返回远端退出码
fn report(result: &CommandResult, no_raise: bool) -> ExitCode {
    if !result.output.is_empty() {
        if result.is_success() || no_raise {
            println!("{}", result.output);
        } else {
            eprintln!("{}: {}", ErrorKind::Command, result.output);
        }
    }
    exit_code(result.exit_code)
}

/// 远端退出码映射到本地进程退出码
fn exit_code(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_builds_sudo_request() {
        let cli = Cli::parse_from(["shell-automator", "--sudo", "systemctl restart nginx"]);
        let request = cli.request();
        assert_eq!(request.final_command(), "sudo systemctl restart nginx");
        assert!(!request.raise_on_failure);
        assert_eq!(request.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_cli_escapes_separate_arguments() {
        let cli = Cli::parse_from([
            "shell-automator",
            "--user",
            "www-data",
            "--timeout",
            "0",
            "--no-raise",
            "ls",
            "-la",
            "/srv/my app",
        ]);
        let request = cli.request();
        assert_eq!(
            request.final_command(),
            "sudo /usr/bin/su - www-data -c \"ls -la '/srv/my app'\""
        );
        assert!(!request.raise_on_failure);
        assert_eq!(request.timeout, None);
    }

    #[test]
    fn test_sudo_conflicts_with_user() {
        let parsed = Cli::try_parse_from(["shell-automator", "--sudo", "--user", "bob", "id"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(exit_code(0), ExitCode::SUCCESS);
        assert_eq!(exit_code(-1), ExitCode::FAILURE);
    }

    #[test]
    fn test_failed_command_exits_with_remote_status() {
        let result = CommandResult::new(127, "sh: nosuchcmd: command not found");
        assert_eq!(report(&result, false), ExitCode::from(127));
        assert_eq!(report(&result, true), ExitCode::from(127));
        assert_eq!(report(&CommandResult::new(0, ""), false), ExitCode::SUCCESS);
    }

    #[test]
    fn test_log_filter_honours_rust_log() {
        assert_eq!(log_filter(Some("debug")).to_string(), "debug");
        assert_eq!(log_filter(None).to_string(), "info");
        assert_eq!(log_filter(Some("app=notalevel")).to_string(), "info");
    }

    #[test]
    fn test_empty_user_runs_without_impersonation() {
        let cli = Cli::parse_from(["shell-automator", "--user", "", "id"]);
        assert_eq!(cli.request().final_command(), "id");
    }
}
