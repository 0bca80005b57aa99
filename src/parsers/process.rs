// `ps aux` 输出解析

use crate::error::{Error, Result};
use crate::models::Process;

/// `ps aux` 的 COMMAND 列下标
const COMMAND_COLUMN: usize = 10;

/// 输出来源
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessListing {
    /// 完整的 `ps aux`，首行为表头；命令保留原有的空白
    All,
    /// 经过 grep 过滤，无表头；命令各字段以单个空格重新连接
    Filtered,
}

/// 解析进程列表
///
/// 任一行的 PID/CPU/MEM 不是数字时整体失败。
pub fn parse_process_list(text: &str, listing: ProcessListing) -> Result<Vec<Process>> {
    let skip = match listing {
        ProcessListing::All => 1,
        ProcessListing::Filtered => 0,
    };

    text.lines()
        .skip(skip)
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_line(line, listing))
        .collect()
}

fn parse_line(line: &str, listing: ProcessListing) -> Result<Process> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(Error::parse(
            "process list",
            format!("expected at least 4 columns in {:?}", line),
        ));
    }

    let pid = fields[1]
        .parse::<u32>()
        .map_err(|e| Error::parse("process list", format!("pid {:?}: {}", fields[1], e)))?;
    let cpu = parse_percent(fields[2])?;
    let mem = parse_percent(fields[3])?;

    let command = match command_column(fields.len()) {
        None => String::new(),
        Some(index) => match listing {
            ProcessListing::Filtered => fields[index..].join(" "),
            ProcessListing::All => line[field_offset(line, index)..].trim_end().to_string(),
        },
    };

    Ok(Process::new(fields[0].to_string(), pid, cpu, mem, command))
}

/// 标准 `ps aux` 有 11 列；缺少 VSZ/RSS 等列的精简输出取最后一列作为命令
fn command_column(field_count: usize) -> Option<usize> {
    if field_count > COMMAND_COLUMN {
        Some(COMMAND_COLUMN)
    } else if field_count > 4 {
        Some(field_count - 1)
    } else {
        None
    }
}

/// 第 `index` 个空白分隔字段在行内的字节偏移
fn field_offset(line: &str, index: usize) -> usize {
    let mut seen = 0;
    let mut in_field = false;
    for (offset, c) in line.char_indices() {
        if c.is_whitespace() {
            in_field = false;
        } else if !in_field {
            if seen == index {
                return offset;
            }
            seen += 1;
            in_field = true;
        }
    }
    line.len()
}

fn parse_percent(value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|e| Error::parse("process list", format!("percentage {:?}: {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PS_AUX: &str = "\
USER         PID %CPU %MEM    VSZ   RSS TTY      STAT START   TIME COMMAND
root           1  0.1  1.4 168940 13120 ?        Ss   10:00   0:01 /sbin/init splash
www-data    1042  2.0  4.0 210000 40960 ?        S    10:01   0:12 /usr/sbin/apache2   -k start
";

    #[test]
    fn test_short_line_without_header() {
        let out = "root     1  0.1  1.4  ?  Ss  10:00  0:01 /sbin/init\n";
        let processes = parse_process_list(out, ProcessListing::Filtered).unwrap();
        assert_eq!(processes.len(), 1);

        let p = &processes[0];
        assert_eq!(p.user(), "root");
        assert_eq!(p.pid(), 1);
        assert_eq!(p.cpu(), 0.1);
        assert_eq!(p.mem(), 1.4);
        assert_eq!(p.command(), "/sbin/init");
    }

    #[test]
    fn test_all_skips_header_and_keeps_spacing() {
        let processes = parse_process_list(PS_AUX, ProcessListing::All).unwrap();
        assert_eq!(processes.len(), 2);
        assert_eq!(processes[0].command(), "/sbin/init splash");
        assert_eq!(processes[1].user(), "www-data");
        assert_eq!(processes[1].pid(), 1042);
        assert_eq!(processes[1].command(), "/usr/sbin/apache2   -k start");
    }

    #[test]
    fn test_all_slices_at_command_column_not_first_match() {
        let out = "USER PID %CPU %MEM VSZ RSS TTY STAT START TIME COMMAND\n\
                   app    7  0.0  0.0 100 100 ?   S    10:00 0:00 7   --flag\n";
        let processes = parse_process_list(out, ProcessListing::All).unwrap();
        assert_eq!(processes[0].pid(), 7);
        assert_eq!(processes[0].command(), "7   --flag");
    }

    #[test]
    fn test_filtered_rejoins_with_single_space() {
        let out = "www-data    1042  2.0  4.0 210000 40960 ?  S  10:01  0:12 /usr/sbin/apache2   -k start\r\n";
        let processes = parse_process_list(out, ProcessListing::Filtered).unwrap();
        assert_eq!(processes[0].command(), "/usr/sbin/apache2 -k start");
    }

    #[test]
    fn test_empty_output_yields_no_processes() {
        assert!(parse_process_list("", ProcessListing::Filtered)
            .unwrap()
            .is_empty());
        assert!(parse_process_list("\n\n", ProcessListing::Filtered)
            .unwrap()
            .is_empty());
        let header_only = PS_AUX.lines().next().unwrap();
        assert!(parse_process_list(header_only, ProcessListing::All)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_non_numeric_field_fails_whole_parse() {
        let out = "root 1 0.1 1.4 0 0 ? Ss 10:00 0:01 /sbin/init\nroot abc 0.0 0.0 0 0 ? S 10:00 0:00 sh\n";
        let err = parse_process_list(out, ProcessListing::Filtered).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));

        let bad_cpu = "root 1 high 1.4 0 0 ? Ss 10:00 0:01 /sbin/init\n";
        assert!(parse_process_list(bad_cpu, ProcessListing::Filtered).is_err());
    }

    #[test]
    fn test_too_few_columns_fails() {
        assert!(parse_process_list("root 1 0.1\n", ProcessListing::Filtered).is_err());
    }
}
