use std::iter::Peekable;
use crate::{
    error::{ReadError, ReadErrorKind, Thing},
    lex::{Lexeme, Token, Tokenizer},
    util::{SrcLoc, SrcRegion},
    value::{Map, Value},
};

/// The outcome of reading: whatever structure could be built, plus every
/// error reported on the way. Reading never gives up early.
#[derive(Debug, PartialEq)]
pub struct Parsed<T> {
    pub output: T,
    pub errors: Vec<ReadError>,
}

impl<T> Parsed<T> {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<T, Vec<ReadError>> {
        if self.errors.is_empty() {
            Ok(self.output)
        } else {
            Err(self.errors)
        }
    }
}

pub struct Reader<'a> {
    tokens: Peekable<Tokenizer<'a>>,
    end: SrcLoc,
    errors: Vec<ReadError>,
}

impl<'a> Reader<'a> {
    pub fn new(src: &'a str) -> Self {
        let tokens = Tokenizer::new(src);
        Self {
            end: tokens.end(),
            tokens: tokens.peekable(),
            errors: Vec::new(),
        }
    }

    /// The next meaningful token. Comments are skipped and tokenizer errors
    /// are recorded as they are passed.
    fn peek(&mut self) -> Option<Token<'a>> {
        loop {
            match self.tokens.peek()? {
                Ok(tok) if tok.lexeme != Lexeme::Comment => return Some(*tok),
                _ => {},
            }
            if let Some(Err(err)) = self.tokens.next() {
                self.errors.push(err);
            }
        }
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let tok = self.peek()?;
        self.tokens.next();
        Some(tok)
    }

    fn eof(&self) -> SrcRegion {
        SrcRegion::at(self.end)
    }

    /// Report running out of input, unless a nested structure opened since
    /// `mark` already has.
    fn unexpected_eof(&mut self, mark: usize) {
        let reported = self.errors[mark..]
            .iter()
            .any(|err| err.kind() == &ReadErrorKind::UnexpectedEof);
        if !reported {
            let err = ReadError::unexpected_eof().at(self.eof());
            self.errors.push(err);
        }
    }

    /// Tag every error raised since `mark` as happening inside `thing`.
    fn enclose_since(&mut self, mark: usize, thing: Thing) {
        for err in &mut self.errors[mark..] {
            err.enclose(thing);
        }
    }

    /// Read a single form, or `None` if the input is exhausted or the next
    /// token cannot start a form.
    pub fn read_form(&mut self) -> Option<Value> {
        let tok = self.peek()?;
        match tok.lexeme {
            Lexeme::LParen => Some(Value::list(self.read_seq(Lexeme::RParen, Thing::List))),
            Lexeme::LBrack => Some(Value::vector(self.read_seq(Lexeme::RBrack, Thing::Vector))),
            Lexeme::LBrace => Some(Value::map(self.read_map())),
            Lexeme::Quote => Some(self.read_macro("quote")),
            Lexeme::Quasiquote => Some(self.read_macro("quasiquote")),
            Lexeme::Unquote => Some(self.read_macro("unquote")),
            Lexeme::SpliceUnquote => Some(self.read_macro("splice-unquote")),
            Lexeme::Deref => Some(self.read_macro("deref")),
            Lexeme::Meta => Some(self.read_with_meta()),
            lexeme if lexeme.is_closer() => {
                self.next();
                let c = tok.text.chars().next().unwrap_or(')');
                self.errors.push(ReadError::unexpected_delimiter(c).at(tok.region));
                None
            },
            _ => {
                self.next();
                self.read_atom(tok)
            },
        }
    }

    /// Read every remaining top-level form.
    pub fn read_all(&mut self) -> Vec<Value> {
        let mut forms = Vec::new();
        while self.peek().is_some() {
            if let Some(form) = self.read_form() {
                forms.push(form);
            }
        }
        forms
    }

    pub fn finish<T>(self, output: T) -> Parsed<T> {
        Parsed {
            output,
            errors: self.errors,
        }
    }

    fn read_operand(&mut self, mark: usize) -> Option<Value> {
        if self.peek().is_none() {
            self.unexpected_eof(mark);
            return None;
        }
        self.read_form()
    }

    fn read_seq(&mut self, close: Lexeme, thing: Thing) -> Vec<Value> {
        self.next();
        let mark = self.errors.len();
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => {
                    self.unexpected_eof(mark);
                    break;
                },
                Some(tok) if tok.lexeme == close => {
                    self.next();
                    break;
                },
                Some(_) => items.extend(self.read_form()),
            }
        }
        self.enclose_since(mark, thing);
        items
    }

    fn read_map(&mut self) -> Map {
        self.next();
        let mark = self.errors.len();
        let mut map = Map::new();
        loop {
            match self.peek() {
                None => {
                    self.unexpected_eof(mark);
                    break;
                },
                Some(tok) if tok.lexeme == Lexeme::RBrace => {
                    self.next();
                    break;
                },
                Some(_) => {},
            }

            let key = match self.read_form() {
                Some(key) => key,
                None => continue,
            };
            match self.peek() {
                Some(tok) if tok.lexeme == Lexeme::RBrace => {
                    self.next();
                    self.errors.push(ReadError::missing_map_value().at(tok.region));
                    break;
                },
                _ => {},
            }
            if let Some(value) = self.read_operand(mark) {
                map.insert(key, value);
            }
        }
        self.enclose_since(mark, Thing::Map);
        map
    }

    fn read_macro(&mut self, name: &'static str) -> Value {
        self.next();
        let mark = self.errors.len();
        let mut items = vec![Value::symbol(name)];
        items.extend(self.read_operand(mark));
        self.enclose_since(mark, Thing::ReaderMacro(name));
        Value::list(items)
    }

    // `^M V` reads the metadata first but emits `(with-meta V M)`.
    fn read_with_meta(&mut self) -> Value {
        self.next();
        let mark = self.errors.len();
        let meta = self.read_operand(mark);
        let value = self.read_operand(mark);
        self.enclose_since(mark, Thing::ReaderMacro("with-meta"));
        let mut items = vec![Value::symbol("with-meta")];
        items.extend(value);
        items.extend(meta);
        Value::list(items)
    }

    fn read_atom(&mut self, tok: Token<'a>) -> Option<Value> {
        match tok.lexeme {
            Lexeme::Number => match tok.text.parse::<i64>() {
                Ok(x) => Some(Value::Integer(x)),
                Err(_) => {
                    self.errors.push(ReadError::invalid_number(tok.text).at(tok.region));
                    None
                },
            },
            Lexeme::Str => Some(Value::string(unescape(tok.text))),
            _ => Some(match tok.text {
                "nil" => Value::Nil,
                "true" => Value::True,
                "false" => Value::False,
                text => match text.strip_prefix(':') {
                    Some(name) => Value::keyword(name),
                    None => Value::symbol(text),
                },
            }),
        }
    }
}

/// Strip the surrounding quotes of a string token and decode its escapes.
fn unescape(text: &str) -> String {
    let inner = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some(c) => out.push(c),
                None => {},
            },
            c => out.push(c),
        }
    }
    out
}

/// Read the first form of `src`; `output` is `None` for input holding no form.
pub fn read_str(src: &str) -> Parsed<Option<Value>> {
    let mut reader = Reader::new(src);
    let form = reader.read_form();
    reader.finish(form)
}

/// Read every top-level form of `src`.
pub fn read_all(src: &str) -> Parsed<Vec<Value>> {
    let mut reader = Reader::new(src);
    let forms = reader.read_all();
    reader.finish(forms)
}
