//! Line-oriented input helpers

use anyhow::{anyhow, Context};
use aoc22_solver::ParseError;
use std::str::FromStr;

/// Split input into blank-line separated blocks, skipping empty blocks.
pub fn blocks(input: &str) -> impl Iterator<Item = &str> {
    input
        .split("\n\n")
        .map(|block| block.trim_matches('\n'))
        .filter(|block| !block.trim().is_empty())
}

/// Parse every non-empty line with `parse_line`, tagging failures with their line number.
pub fn parse_lines<T, F>(input: &str, mut parse_line: F) -> Result<Vec<T>, ParseError>
where
    F: FnMut(&str) -> anyhow::Result<T>,
{
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_line(line.trim_end()).map_err(|e| ParseError::at_line(idx, e)))
        .collect()
}

/// Parse a comma separated list such as `79, 98` or `498,4`.
pub fn parse_list<T>(text: &str) -> anyhow::Result<Vec<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<T>()
                .with_context(|| format!("invalid number '{}'", part))
        })
        .collect()
}

/// Parse a single number, naming `what` in the error.
pub fn parse_num<T>(text: &str, what: &str) -> anyhow::Result<T>
where
    T: FromStr,
{
    text.trim()
        .parse()
        .map_err(|_| anyhow!("invalid {} '{}'", what, text.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_skip_extra_blank_lines() {
        let input = "a\nb\n\n\n\nc\n";
        let blocks: Vec<_> = blocks(input).collect();
        assert_eq!(blocks, vec!["a\nb", "c"]);
    }

    #[test]
    fn test_parse_lines_reports_line() {
        let err = parse_lines("1\n\nx\n", |l| parse_num::<u32>(l, "value")).unwrap_err();
        assert_eq!(err, ParseError::InvalidFormat("(line 3) invalid value 'x'".into()));
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list::<i64>("79, 98").unwrap(), vec![79, 98]);
        assert!(parse_list::<i64>("1,,2").is_err());
    }
}
