// 数据模型模块

pub mod command;
pub mod directory;
pub mod metric;
pub mod process;

pub use command::CommandResult;
pub use directory::Directory;
pub use metric::{MetricKind, SystemMetric};
pub use process::Process;
