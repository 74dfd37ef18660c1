use serde_json::{Map, Number, Value};

/// Parses a Python-style literal row dump into JSON values.
///
/// Database tool results often arrive as the printed form of a list of
/// tuples, e.g. `[(1, 'Alice'), (2, 'Bob')]`. This accepts the literal subset
/// needed for that shape: `None`/`True`/`False`, integers, floats, quoted
/// strings with backslash escapes, tuples, lists, and dicts. The top level
/// must be a list; tuples become JSON arrays. Returns `None` on anything it
/// does not recognize.
pub fn parse_literal_rows(text: &str) -> Option<Vec<Value>> {
    let mut parser = Parser::new(text);
    parser.skip_whitespace();
    let value = parser.parse_value()?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return None;
    }
    match value {
        Value::Array(rows) => Some(rows),
        _ => None,
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let end = self.pos + keyword.len();
        if end <= self.chars.len()
            && self.chars[self.pos..end].iter().collect::<String>() == keyword
        {
            self.pos = end;
            true
        } else {
            false
        }
    }

    fn parse_value(&mut self) -> Option<Value> {
        self.skip_whitespace();
        match self.peek()? {
            'N' => self.eat_keyword("None").then_some(Value::Null),
            'T' => self.eat_keyword("True").then_some(Value::Bool(true)),
            'F' => self.eat_keyword("False").then_some(Value::Bool(false)),
            '\'' | '"' => self.parse_string().map(Value::String),
            '(' => self.parse_sequence('(', ')').map(Value::Array),
            '[' => self.parse_sequence('[', ']').map(Value::Array),
            '{' => self.parse_dict(),
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.parse_number(),
            _ => None,
        }
    }

    fn parse_string(&mut self) -> Option<String> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            match self.bump()? {
                '\\' => match self.bump()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    '0' => out.push('\0'),
                    other => out.push(other),
                },
                c if c == quote => return Some(out),
                c => out.push(c),
            }
        }
    }

    fn parse_sequence(&mut self, open: char, close: char) -> Option<Vec<Value>> {
        if self.bump()? != open {
            return None;
        }
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek()? {
                c if c == close => {
                    self.pos += 1;
                    return Some(items);
                }
                ',' => {
                    // Empty element means malformed input, except the
                    // trailing comma of a one-tuple like `(1,)`.
                    return None;
                }
                _ => {
                    items.push(self.parse_value()?);
                    self.skip_whitespace();
                    match self.peek()? {
                        ',' => {
                            self.pos += 1;
                        }
                        c if c == close => {}
                        _ => return None,
                    }
                }
            }
        }
    }

    fn parse_dict(&mut self) -> Option<Value> {
        if self.bump()? != '{' {
            return None;
        }
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            match self.peek()? {
                '}' => {
                    self.pos += 1;
                    return Some(Value::Object(map));
                }
                _ => {
                    let key = match self.parse_value()? {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    self.skip_whitespace();
                    if self.bump()? != ':' {
                        return None;
                    }
                    let value = self.parse_value()?;
                    map.insert(key, value);
                    self.skip_whitespace();
                    match self.peek()? {
                        ',' => {
                            self.pos += 1;
                        }
                        '}' => {}
                        _ => return None,
                    }
                }
            }
        }
    }

    fn parse_number(&mut self) -> Option<Value> {
        let start = self.pos;
        if matches!(self.peek(), Some('-') | Some('+')) {
            self.pos += 1;
        }
        let mut prev = ' ';
        while let Some(c) = self.peek() {
            let is_exp_sign = (c == '+' || c == '-') && (prev == 'e' || prev == 'E');
            if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || is_exp_sign {
                prev = c;
                self.pos += 1;
            } else {
                break;
            }
        }

        let text: String = self.chars[start..self.pos].iter().collect();
        if let Ok(i) = text.parse::<i64>() {
            return Some(Value::Number(i.into()));
        }
        let f = text.parse::<f64>().ok()?;
        Number::from_f64(f).map(Value::Number)
    }
}
