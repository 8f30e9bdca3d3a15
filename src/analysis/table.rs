//! Tolerant parsing of CSV tables written by the model.
//!
//! Replies are asked to quote every value and double inner quotes, but
//! models drift: spaces before quotes, unquoted numbers, fenced blocks,
//! CRLF. The splitter here accepts all of those.

use crate::ingest::headers::canonical;

/// A coerced table value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    fn coerce(raw: &str) -> Self {
        match raw.parse::<f64>() {
            Ok(n) if !raw.is_empty() && n.is_finite() => Value::Number(n),
            _ => Value::Text(raw.to_string()),
        }
    }
}

/// One data row, keyed by the cleaned header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow(pub Vec<(String, Value)>);

impl TableRow {
    #[cfg(test)]
    fn get(&self, header: &str) -> Option<&Value> {
        self.0.iter().find(|(h, _)| h == header).map(|(_, v)| v)
    }

    /// Column of the first header whose canonical form is one of `keys`.
    pub fn position(&self, keys: &[&str]) -> Option<usize> {
        self.0
            .iter()
            .position(|(h, _)| keys.contains(&canonical(h).as_str()))
    }

    /// Columns other than `skip`, with their positions.
    pub fn others(&self, skip: usize) -> impl Iterator<Item = (usize, &Value)> {
        self.0
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != skip)
            .map(|(i, (_, v))| (i, v))
    }

    /// Value at a column position.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.0.get(index).map(|(_, v)| v)
    }
}

/// Split one CSV line, honouring double quotes and `""` escapes.
pub fn split_quoted(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else {
            match c {
                '"' => in_quotes = true,
                ',' => fields.push(std::mem::take(&mut current).trim().to_string()),
                _ => current.push(c),
            }
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Drop a surrounding ```csv fence if present.
fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a headered CSV table. Fewer than two non-blank lines yields no rows.
pub fn parse_csv_table(text: &str) -> Vec<TableRow> {
    let mut lines = strip_fence(text)
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers = split_quoted(header_line);

    lines
        .map(|line| {
            let mut values = split_quoted(line).into_iter();
            TableRow(
                headers
                    .iter()
                    .map(|h| {
                        let raw = values.next().unwrap_or_default();
                        (h.clone(), Value::coerce(&raw))
                    })
                    .collect(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_plain_and_quoted() {
        assert_eq!(split_quoted("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_quoted("\"a\",\"b\""), vec!["a", "b"]);
        assert_eq!(split_quoted("\"1,5\",2"), vec!["1,5", "2"]);
    }

    #[test]
    fn split_escaped_quotes() {
        assert_eq!(
            split_quoted(r#""say ""hi""","x""#),
            vec![r#"say "hi""#, "x"]
        );
    }

    #[test]
    fn split_tolerates_spaces_around_quotes() {
        assert_eq!(
            split_quoted(r#" "Date" , "Forecasted Cost" "#),
            vec!["Date", "Forecasted Cost"]
        );
    }

    #[test]
    fn split_trailing_empty_field() {
        assert_eq!(split_quoted("a,"), vec!["a", ""]);
    }

    #[test]
    fn parses_quoted_table_with_numbers() {
        let text = "\"Date\",\"Forecasted Cost\"\n\"2024-07-01\",\"120000\"\n\"2024-08-01\",\"125000.5\"";
        let rows = parse_csv_table(text);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get("Date"),
            Some(&Value::Text("2024-07-01".to_string()))
        );
        assert_eq!(rows[1].get("Forecasted Cost"), Some(&Value::Number(125000.5)));
    }

    #[test]
    fn header_only_is_empty() {
        assert!(parse_csv_table("\"Date\",\"Forecasted Cost\"").is_empty());
        assert!(parse_csv_table("").is_empty());
        assert!(parse_csv_table("   \n  ").is_empty());
    }

    #[test]
    fn missing_values_are_empty_text() {
        let rows = parse_csv_table("a,b,c\n1");
        assert_eq!(rows[0].get("a"), Some(&Value::Number(1.0)));
        assert_eq!(rows[0].get("c"), Some(&Value::Text(String::new())));
    }

    #[test]
    fn fenced_crlf_and_blank_lines() {
        let text = "```csv\r\nDate,Forecasted Cost\r\n\r\n2024-07-01,10\r\n```";
        let rows = parse_csv_table(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Forecasted Cost"), Some(&Value::Number(10.0)));
    }

    #[test]
    fn non_numeric_stays_text() {
        let rows = parse_csv_table("a,b\nNaN,inf");
        assert_eq!(rows[0].get("a"), Some(&Value::Text("NaN".to_string())));
        assert_eq!(rows[0].get("b"), Some(&Value::Text("inf".to_string())));
    }

    #[test]
    fn position_by_canonical_header() {
        let rows = parse_csv_table("Date,\"Forecasted Cost\"\n2024-07-01,5");
        assert_eq!(rows[0].position(&["forecastedcost"]), Some(1));
        assert_eq!(rows[0].position(&["volume"]), None);
        assert_eq!(rows[0].at(1), Some(&Value::Number(5.0)));
        let others: Vec<usize> = rows[0].others(0).map(|(i, _)| i).collect();
        assert_eq!(others, vec![1]);
    }
}
