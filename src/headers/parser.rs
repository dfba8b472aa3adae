//! Line grammar for header identity files
//!
//! Each line holds one mapping written as a dictionary literal:
//!
//! ```text
//! {'User-Agent': 'Mozilla/5.0 (X11; Linux x86_64)', "Accept-Language": "en-US"}
//! ```
//!
//! Keys and values are single- or double-quoted strings. Supported escapes are
//! `\\`, `\'`, `\"`, `\n` and `\t`. A trailing comma before `}` is accepted.
//! Anything else is rejected; lines are never evaluated.

/// Parses one mapping line into ordered `(name, value)` pairs
///
/// # Arguments
///
/// * `line` - The raw line (surrounding whitespace is allowed)
///
/// # Returns
///
/// * `Ok(Vec<(String, String)>)` - The pairs in the order they were written
/// * `Err(String)` - Description of the first syntax error, with its column
///
/// # Example
///
/// ```
/// use sumi_scrape::headers::parse_header_line;
///
/// let pairs = parse_header_line(r#"{'User-Agent': "Bot/1.0"}"#).unwrap();
/// assert_eq!(pairs, vec![("User-Agent".to_string(), "Bot/1.0".to_string())]);
/// ```
pub fn parse_header_line(line: &str) -> Result<Vec<(String, String)>, String> {
    let mut cursor = Cursor::new(line);
    let mut pairs = Vec::new();

    cursor.skip_whitespace();
    cursor.expect('{')?;

    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            Some('}') => {
                cursor.bump();
                break;
            }
            Some('\'') | Some('"') => {}
            Some(c) => {
                return Err(format!(
                    "expected quoted key or '}}' at column {}, found '{}'",
                    cursor.column(),
                    c
                ))
            }
            None => return Err("unterminated mapping, expected '}'".to_string()),
        }

        let key = cursor.quoted_string()?;
        cursor.skip_whitespace();
        cursor.expect(':')?;
        cursor.skip_whitespace();
        let value = cursor.quoted_string()?;
        pairs.push((key, value));

        cursor.skip_whitespace();
        match cursor.bump() {
            Some(',') => continue,
            Some('}') => break,
            Some(c) => {
                return Err(format!(
                    "expected ',' or '}}' at column {}, found '{}'",
                    cursor.column() - 1,
                    c
                ))
            }
            None => return Err("unterminated mapping, expected '}'".to_string()),
        }
    }

    cursor.skip_whitespace();
    if let Some(c) = cursor.peek() {
        return Err(format!(
            "unexpected '{}' at column {} after closing '}}'",
            c,
            cursor.column()
        ));
    }

    Ok(pairs)
}

/// Character cursor over a single line
struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn new(line: &str) -> Self {
        Self {
            chars: line.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// 1-based column of the next character
    fn column(&self) -> usize {
        self.pos + 1
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), String> {
        let column = self.column();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(format!(
                "expected '{}' at column {}, found '{}'",
                expected, column, c
            )),
            None => Err(format!("expected '{}' at column {}, found end of line", expected, column)),
        }
    }

    fn quoted_string(&mut self) -> Result<String, String> {
        let start = self.column();
        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            Some(c) => return Err(format!("expected quoted string at column {}, found '{}'", start, c)),
            None => return Err(format!("expected quoted string at column {}", start)),
        };

        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(value),
                Some('\\') => {
                    let escape_column = self.column() - 1;
                    match self.bump() {
                        Some('\\') => value.push('\\'),
                        Some('\'') => value.push('\''),
                        Some('"') => value.push('"'),
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some(c) => {
                            return Err(format!(
                                "unsupported escape '\\{}' at column {}",
                                c, escape_column
                            ))
                        }
                        None => return Err(format!("unterminated string starting at column {}", start)),
                    }
                }
                Some(c) => value.push(c),
                None => return Err(format!("unterminated string starting at column {}", start)),
            }
        }
    }
}
