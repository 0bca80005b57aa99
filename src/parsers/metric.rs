// 标量指标解析：输出即取值，只去掉首尾空白

pub fn parse_metric(text: &str) -> String {
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_trimmed_but_otherwise_unmodified() {
        assert_eq!(parse_metric("  10.00%\r\n"), "10.00%");
        assert_eq!(parse_metric("\"Arch Linux\""), "\"Arch Linux\"");
    }

    #[test]
    fn test_parse_is_repeatable() {
        let input = "1024/2048MB (50.00%)\n";
        assert_eq!(parse_metric(input), parse_metric(input));
    }
}
