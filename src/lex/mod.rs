use crate::{
    error::{ReadError, Thing},
    util::{SrcLoc, SrcRegion},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lexeme {
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,

    Quote,
    Quasiquote,
    Unquote,
    SpliceUnquote,
    Deref,
    Meta,

    Str,
    Comment,
    Number,
    Atom,
}

impl Lexeme {
    fn punctuation(c: char) -> Option<Self> {
        Some(match c {
            '(' => Lexeme::LParen,
            ')' => Lexeme::RParen,
            '[' => Lexeme::LBrack,
            ']' => Lexeme::RBrack,
            '{' => Lexeme::LBrace,
            '}' => Lexeme::RBrace,
            '\'' => Lexeme::Quote,
            '`' => Lexeme::Quasiquote,
            '~' => Lexeme::Unquote,
            '@' => Lexeme::Deref,
            '^' => Lexeme::Meta,
            _ => return None,
        })
    }

    pub fn is_closer(&self) -> bool {
        matches!(self, Lexeme::RParen | Lexeme::RBrack | Lexeme::RBrace)
    }
}

/// A token borrowing its text from the source.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub lexeme: Lexeme,
    pub text: &'a str,
    pub region: SrcRegion,
}

impl<'a> Token<'a> {
    pub fn new(lexeme: Lexeme, text: &'a str, region: SrcRegion) -> Self {
        Self {
            lexeme,
            text,
            region,
        }
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn ends_atom(c: char) -> bool {
    is_separator(c) || matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | '\'' | '`' | '^' | '"' | ';')
}

/// Lazily splits source text into tokens.
///
/// The tokenizer is cheap to clone, so a stream can be restarted from any
/// point by cloning it before advancing.
#[derive(Clone, Debug)]
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
        }
    }

    /// Location just past the last byte of the source.
    pub fn end(&self) -> SrcLoc {
        SrcLoc::from(self.src.len())
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn emit(&mut self, lexeme: Lexeme, len: usize) -> Token<'a> {
        let start = self.pos;
        self.pos += len;
        Token::new(lexeme, &self.src[start..self.pos], SrcRegion::from((start, self.pos)))
    }

    fn scan_string(&mut self) -> Result<Token<'a>, ReadError> {
        let mut chars = self.rest().char_indices().skip(1);
        while let Some((i, c)) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                },
                '"' => return Ok(self.emit(Lexeme::Str, i + 1)),
                _ => {},
            }
        }

        let start = self.pos;
        self.pos = self.src.len();
        Err(ReadError::unterminated_string()
            .at(SrcRegion::from((start, self.pos)))
            .while_parsing(Thing::String))
    }

    fn scan_number(&self) -> Option<usize> {
        let rest = self.rest();
        let sign = if rest.starts_with('-') { 1 } else { 0 };
        let digits = rest[sign..]
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits > 0 {
            Some(sign + digits)
        } else {
            None
        }
    }

    fn scan_atom(&self) -> usize {
        self.rest()
            .char_indices()
            .find(|(_, c)| ends_atom(*c))
            .map(|(i, _)| i)
            .unwrap_or_else(|| self.rest().len())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let skipped = self
            .rest()
            .char_indices()
            .find(|(_, c)| !is_separator(*c))
            .map(|(i, _)| i)?;
        self.pos += skipped;

        let rest = self.rest();
        let c = rest.chars().next()?;
        Some(Ok(match c {
            '~' if rest.starts_with("~@") => self.emit(Lexeme::SpliceUnquote, 2),
            '"' => return Some(self.scan_string()),
            ';' => {
                let len = rest.find('\n').unwrap_or_else(|| rest.len());
                self.emit(Lexeme::Comment, len)
            },
            c => match Lexeme::punctuation(c) {
                Some(lexeme) => self.emit(lexeme, 1),
                None => match self.scan_number() {
                    Some(len) => self.emit(Lexeme::Number, len),
                    None => {
                        let len = self.scan_atom();
                        self.emit(Lexeme::Atom, len)
                    },
                },
            },
        }))
    }
}

pub fn tokenize(src: &str) -> Tokenizer<'_> {
    Tokenizer::new(src)
}

#[cfg(test)]
mod tests;
