use std::fmt::{self, Write};
use super::{Callable, Value};

/// A value paired with a rendering mode.
///
/// Readable mode quotes and escapes strings so the output reads back as the
/// same value; display mode writes string contents verbatim.
pub struct Printed<'a> {
    value: &'a Value,
    readable: bool,
}

impl<'a> Printed<'a> {
    pub fn new(value: &'a Value, readable: bool) -> Self {
        Self { value, readable }
    }

    pub fn readable(value: &'a Value) -> Self {
        Self::new(value, true)
    }

    fn child(&self, value: &'a Value) -> Self {
        Self::new(value, self.readable)
    }

    fn seq(&self, f: &mut fmt::Formatter, open: char, items: &'a [Value], close: char) -> fmt::Result {
        f.write_char(open)?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_char(' ')?;
            }
            write!(f, "{}", self.child(item))?;
        }
        f.write_char(close)
    }
}

fn write_escaped(f: &mut fmt::Formatter, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

impl<'a> fmt::Display for Printed<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.value {
            Value::List(items) => self.seq(f, '(', items, ')'),
            Value::Vector(items) => self.seq(f, '[', items, ']'),
            Value::Map(map) => {
                f.write_char('{')?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_char(' ')?;
                    }
                    write!(f, "{} {}", self.child(k), self.child(v))?;
                }
                f.write_char('}')
            },
            Value::Symbol(sym) => f.write_str(sym.as_str()),
            Value::Keyword(kw) => write!(f, ":{}", kw),
            Value::String(s) if self.readable => write_escaped(f, s),
            Value::String(s) => f.write_str(s),
            Value::Integer(x) => write!(f, "{}", x),
            Value::True => f.write_str("true"),
            Value::False => f.write_str("false"),
            Value::Nil => f.write_str("nil"),
            Value::Callable(Callable::Native(native)) => write!(f, "#<builtin {}>", native.name),
            Value::Callable(Callable::Closure(_)) => f.write_str("#<function>"),
        }
    }
}

pub fn pr_str(value: &Value, readable: bool) -> String {
    Printed::new(value, readable).to_string()
}

/// Render every value and join them with `sep`.
pub fn pr_all(values: &[Value], readable: bool, sep: &str) -> String {
    values
        .iter()
        .map(|v| pr_str(v, readable))
        .collect::<Vec<_>>()
        .join(sep)
}
