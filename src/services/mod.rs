// 远端操作服务
//
// 模块结构:
// - transfer: SFTP 文件传输子通道
// - files: 文件与目录操作
// - processes: 进程查询与结束
// - users: 用户创建与删除
// - system_info: 系统指标采集
//
// 各操作集都是 CommandRunner 上的扩展 trait，任何能执行命令的类型都自动拥有。

pub mod files;
pub mod processes;
pub mod system_info;
pub mod transfer;
pub mod users;

pub use files::FileOperations;
pub use processes::ProcessOperations;
pub use system_info::{metric_command, SystemInfo};
pub use transfer::{SftpService, TransferChannel};
pub use users::UserOperations;
