// 命令文本构建：清理、提权包装、参数转义

use std::borrow::Cow;
use std::fmt;

/// 代表 root 的目标用户名
pub const ROOT: &str = "root";

/// 命令以谁的身份执行
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Impersonation {
    /// 使用登录用户
    #[default]
    None,
    /// 通过 sudo 提权
    Root,
    /// 通过 sudo su 切换到指定用户
    User(String),
}

impl Impersonation {
    /// 任意用户名；正好为 "root" 时走 sudo 路径，空用户名不切换
    pub fn user(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            Impersonation::None
        } else if name == ROOT {
            Impersonation::Root
        } else {
            Impersonation::User(name)
        }
    }

    pub fn from_run_as_root(run_as_root: bool) -> Self {
        if run_as_root {
            Impersonation::Root
        } else {
            Impersonation::None
        }
    }
}

/// 去掉换行和回车，防止通过续行注入额外命令
pub fn sanitize(command: &str) -> String {
    command.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}

/// 按目标用户包装命令
///
/// 切换到非 root 用户时只转义用户名，命令本身原样放进双引号，
/// 其中插入的值需要调用方自行转义。
pub fn wrap(command: &str, target: &Impersonation) -> String {
    match target {
        Impersonation::None => command.to_string(),
        Impersonation::User(name) if name.is_empty() => command.to_string(),
        Impersonation::Root => format!("sudo {}", command),
        Impersonation::User(name) if name == ROOT => format!("sudo {}", command),
        Impersonation::User(name) => format!(
            "sudo /usr/bin/su - {} -c \"{}\"",
            quote(name),
            command
        ),
    }
}

/// POSIX shell 单引号转义
pub fn quote(value: &str) -> Cow<'_, str> {
    shell_escape::unix::escape(Cow::Borrowed(value))
}

/// Shell 命令构建器
///
/// `raw` 追加可信的字面片段，`arg` 追加需要转义的外部值。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShellCommand {
    parts: Vec<String>,
}

impl ShellCommand {
    pub fn new(program: &str) -> Self {
        Self {
            parts: vec![program.to_string()],
        }
    }

    /// 追加可信片段（不转义）
    pub fn raw(mut self, fragment: &str) -> Self {
        self.parts.push(fragment.to_string());
        self
    }

    /// 追加外部值（总是转义）
    pub fn arg(mut self, value: &str) -> Self {
        self.parts.push(quote(value).into_owned());
        self
    }

    pub fn raw_if(self, condition: bool, fragment: &str) -> Self {
        if condition {
            self.raw(fragment)
        } else {
            self
        }
    }

    /// 通过管道连接下一条命令
    pub fn pipe(mut self, next: ShellCommand) -> Self {
        self.parts.push("|".to_string());
        self.parts.extend(next.parts);
        self
    }

    pub fn build(&self) -> String {
        self.parts.join(" ")
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

impl From<ShellCommand> for String {
    fn from(command: ShellCommand) -> Self {
        command.build()
    }
}
