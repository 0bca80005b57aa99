// `find` 输出解析

/// `find <path> -type d` 的输出：每行一个目录，顺序保持不变
pub fn parse_directory_paths(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// `find <dir> -maxdepth 1 -type f` 的输出：只保留文件名
pub fn parse_file_names(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.is_empty())
        .map(|line| line.rsplit('/').next().unwrap_or(line).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_paths_keep_remote_order() {
        let out = "/srv/app\r\n/srv/app/logs\r\n/srv/app/bin\r\n";
        assert_eq!(
            parse_directory_paths(out),
            vec!["/srv/app", "/srv/app/logs", "/srv/app/bin"]
        );
    }

    #[test]
    fn test_file_names_strip_directories() {
        let out = "/srv/app/run.sh\n/srv/app/config [old].yml\nREADME\n";
        assert_eq!(
            parse_file_names(out),
            vec!["run.sh", "config [old].yml", "README"]
        );
    }

    #[test]
    fn test_empty_listing() {
        assert!(parse_file_names("").is_empty());
        assert!(parse_directory_paths("").is_empty());
    }
}
