// 命令执行结果

use serde::Serialize;

/// 归一化后的命令结果
///
/// 成功时 `output` 为 stdout；失败时为 stderr（为空则回退到 stdout）。
/// 两者都已去掉末尾空白。
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    /// 退出码，远端未上报退出码时为 -1
    pub exit_code: i32,
    /// 输出文本
    pub output: String,
}

impl CommandResult {
    pub fn new(exit_code: i32, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }

    /// 检查命令是否成功
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}
