//! Daily box-office feed: the locally provided list of currently-screening
//! titles. The feed ships six preamble lines, then a column-header row,
//! then CSV rows whose second column is the title.

use tracing::{debug, warn};

const PREAMBLE_LINES: usize = 6;
const TITLE_COLUMN: usize = 1;

pub async fn load_screening_titles(path: &str) -> Vec<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => {
            let titles = parse_feed(&raw);
            debug!(path = %path, titles = titles.len(), "loaded box-office feed");
            titles
        },
        Err(err) => {
            warn!(path = %path, error = %err, "box-office feed unavailable, screening list is empty");
            Vec::new()
        },
    }
}

fn parse_feed(raw: &str) -> Vec<String> {
    raw.lines()
        .skip(PREAMBLE_LINES + 1)
        .filter_map(|line| split_csv_line(line).into_iter().nth(TITLE_COLUMN))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
        .collect()
}

fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            },
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(rows: &[&str]) -> String {
        let mut out = String::new();
        for i in 0..PREAMBLE_LINES {
            out.push_str(&format!("preamble {i}\n"));
        }
        out.push_str("순위,영화명,개봉일,매출액\n");
        for row in rows {
            out.push_str(row);
            out.push('\n');
        }
        out
    }

    #[test]
    fn extracts_the_title_column() {
        let raw = feed(&["1,서울의 봄,2023.11.22,100", "2,노량,2023.12.20,90"]);
        assert_eq!(parse_feed(&raw), vec!["서울의 봄", "노량"]);
    }

    #[test]
    fn preamble_and_header_are_skipped() {
        let raw = feed(&[]);
        assert!(parse_feed(&raw).is_empty());
    }

    #[test]
    fn blank_titles_are_dropped() {
        let raw = feed(&["1,서울의 봄,2023.11.22,100", "2,,2023.12.20,90", "3,  ,x,y"]);
        assert_eq!(parse_feed(&raw), vec!["서울의 봄"]);
    }

    #[test]
    fn quoted_fields_may_contain_commas_and_quotes() {
        let raw = feed(&[r#"1,"나, 다니엘 블레이크",2016.12.08,80"#, r#"2,"그 ""영화""",2020.01.01,70"#]);
        assert_eq!(parse_feed(&raw), vec!["나, 다니엘 블레이크", r#"그 "영화""#]);
    }

    #[test]
    fn short_rows_are_ignored() {
        let raw = feed(&["just-one-column"]);
        assert!(parse_feed(&raw).is_empty());
    }
}
