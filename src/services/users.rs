// 用户管理

use async_trait::async_trait;

use crate::error::{ErrorKind, Result};
use crate::executor::{quote, CommandRequest, CommandRunner, ShellCommand};

/// 远端用户管理
#[async_trait]
pub trait UserOperations: CommandRunner {
    /// 创建用户（含主目录）并设置密码
    async fn create_user(&mut self, username: &str, password: &str, run_as_root: bool) -> Result<()> {
        let create = CommandRequest::from(ShellCommand::new("useradd").raw("-m").arg(username))
            .run_as_root(run_as_root)
            .error_kind(ErrorKind::UserCreation);
        self.run(create).await?;

        // 密码经 stdin 传给 chpasswd，不出现在日志里
        let credentials = format!("{}:{}", username, password);
        let set_password = format!("printf '%s\\n' {} | sudo chpasswd", quote(&credentials));
        let request = CommandRequest::new(set_password)
            .run_as_root(run_as_root)
            .error_kind(ErrorKind::UserCreation)
            .redacted();
        self.run(request).await?;
        Ok(())
    }

    /// 删除用户及其主目录
    async fn delete_user(&mut self, username: &str, run_as_root: bool) -> Result<()> {
        let request = CommandRequest::from(ShellCommand::new("userdel").raw("-r").arg(username))
            .run_as_root(run_as_root)
            .error_kind(ErrorKind::UserDeletion);
        self.run(request).await?;
        Ok(())
    }
}

impl<T: CommandRunner + ?Sized> UserOperations for T {}
