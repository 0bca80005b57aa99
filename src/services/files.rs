// 文件操作

use async_trait::async_trait;
use tracing::debug;

use crate::error::{ErrorKind, Result};
use crate::executor::{CommandRequest, CommandRunner, ShellCommand};
use crate::models::Directory;
use crate::parsers::{parse_directory_paths, parse_file_names};

/// 远端文件操作
///
/// 路径等参数都经过转义后再拼入命令。
#[async_trait]
pub trait FileOperations: CommandRunner {
    /// 读取文件内容
    async fn get_file_content(&mut self, path: &str, run_as_root: bool) -> Result<String> {
        let request = request(
            ShellCommand::new("cat").arg(path),
            run_as_root,
            ErrorKind::GetFileContent,
        );
        Ok(self.run(request).await?.output)
    }

    /// 删除文件；`force` 时忽略写保护
    async fn remove_file(&mut self, path: &str, force: bool, run_as_root: bool) -> Result<()> {
        let command = ShellCommand::new("rm").raw_if(force, "-f").arg(path);
        self.run(request(command, run_as_root, ErrorKind::FileRemoval))
            .await?;
        Ok(())
    }

    /// 删除目录；`force` 时不提示直接删除
    async fn remove_directory(&mut self, path: &str, force: bool, run_as_root: bool) -> Result<()> {
        let command = ShellCommand::new("rm")
            .raw(if force { "-rf" } else { "-r" })
            .arg(path);
        self.run(request(command, run_as_root, ErrorKind::DirectoryRemoval))
            .await?;
        Ok(())
    }

    /// 创建目录（含父目录）
    async fn create_directory(&mut self, path: &str, run_as_root: bool) -> Result<()> {
        let command = ShellCommand::new("mkdir").raw("-p").arg(path);
        self.run(request(command, run_as_root, ErrorKind::DirectoryCreation))
            .await?;
        Ok(())
    }

    /// 修改属主
    async fn change_owner(
        &mut self,
        path: &str,
        owner: &str,
        recursive: bool,
        run_as_root: bool,
    ) -> Result<()> {
        let command = ShellCommand::new("chown")
            .raw_if(recursive, "-R")
            .arg(owner)
            .arg(path);
        self.run(request(command, run_as_root, ErrorKind::OwnerChange))
            .await?;
        Ok(())
    }

    /// 递归列出目录结构
    ///
    /// 先列出所有子目录，再对每个目录单独列出其直接包含的文件；
    /// 空目录也会出现在结果中。顺序与远端 find 输出一致。
    async fn get_directory_structure(
        &mut self,
        path: &str,
        run_as_root: bool,
    ) -> Result<Vec<Directory>> {
        let dirs_command = ShellCommand::new("find").arg(path).raw("-type d");
        let dirs = self
            .run(request(dirs_command, run_as_root, ErrorKind::ListDirectoryContent))
            .await?;

        let mut structure = Vec::new();
        for dir in parse_directory_paths(&dirs.output) {
            let files_command = ShellCommand::new("find")
                .arg(&dir)
                .raw("-maxdepth 1 -type f");
            let files = self
                .run(request(files_command, run_as_root, ErrorKind::ListDirectoryContent))
                .await?;
            let files = parse_file_names(&files.output);
            debug!("[Files] {} contains {} files", dir, files.len());
            structure.push(Directory::new(dir, files));
        }

        Ok(structure)
    }
}

impl<T: CommandRunner + ?Sized> FileOperations for T {}

fn request(command: ShellCommand, run_as_root: bool, kind: ErrorKind) -> CommandRequest {
    CommandRequest::from(command)
        .run_as_root(run_as_root)
        .error_kind(kind)
}
