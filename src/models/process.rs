// 进程记录

use serde::Serialize;

/// `ps aux` 中的一行
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Process {
    user: String,
    pid: u32,
    cpu: f64,
    mem: f64,
    command: String,
}

impl Process {
    pub(crate) fn new(user: String, pid: u32, cpu: f64, mem: f64, command: String) -> Self {
        Self {
            user,
            pid,
            cpu,
            mem,
            command,
        }
    }

    /// 进程所属用户
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// CPU 占用百分比
    pub fn cpu(&self) -> f64 {
        self.cpu
    }

    /// 内存占用百分比
    pub fn mem(&self) -> f64 {
        self.mem
    }

    /// 启动命令（含参数）
    pub fn command(&self) -> &str {
        &self.command
    }
}
