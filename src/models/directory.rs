// 目录结构记录

use serde::Serialize;

/// 单个目录及其直接包含的文件名
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Directory {
    dir: String,
    files: Vec<String>,
}

impl Directory {
    pub(crate) fn new(dir: String, files: Vec<String>) -> Self {
        Self { dir, files }
    }

    /// 目录路径（远端 find 输出原样）
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// 文件名（不含路径），顺序与远端列出顺序一致
    pub fn files(&self) -> &[String] {
        &self.files
    }
}
