// 输出解析
//
// 纯函数：输入为一次成功执行的输出文本，输出为类型化记录。
// 解析器不调用执行器，也不持有任何状态。

pub mod directory;
pub mod metric;
pub mod process;

pub use directory::{parse_directory_paths, parse_file_names};
pub use metric::parse_metric;
pub use process::{parse_process_list, ProcessListing};
