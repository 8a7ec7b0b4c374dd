use std::fmt;
use crate::{
    util::SrcRegion,
    walker::ExecError,
};

/// The structure the reader was inside of when an error occurred.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Thing {
    List,
    Vector,
    Map,
    String,
    ReaderMacro(&'static str),
}

impl fmt::Display for Thing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Thing::List => write!(f, "a list"),
            Thing::Vector => write!(f, "a vector"),
            Thing::Map => write!(f, "a map"),
            Thing::String => write!(f, "a string"),
            Thing::ReaderMacro(name) => write!(f, "a {} form", name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ReadErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected '{0}'")]
    UnexpectedDelimiter(char),
    #[error("map key has no value")]
    MissingMapValue,
    #[error("'{0}' is not a valid integer")]
    InvalidNumber(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReadError {
    kind: ReadErrorKind,
    region: SrcRegion,
    while_parsing: Vec<Thing>,
}

impl ReadError {
    pub fn unterminated_string() -> Self {
        Self::from(ReadErrorKind::UnterminatedString)
    }

    pub fn unexpected_eof() -> Self {
        Self::from(ReadErrorKind::UnexpectedEof)
    }

    pub fn unexpected_delimiter(c: char) -> Self {
        Self::from(ReadErrorKind::UnexpectedDelimiter(c))
    }

    pub fn missing_map_value() -> Self {
        Self::from(ReadErrorKind::MissingMapValue)
    }

    pub fn invalid_number(text: impl Into<String>) -> Self {
        Self::from(ReadErrorKind::InvalidNumber(text.into()))
    }

    pub fn at(mut self, region: SrcRegion) -> Self {
        self.region = region;
        self
    }

    pub fn while_parsing(mut self, thing: Thing) -> Self {
        self.while_parsing.push(thing);
        self
    }

    /// Record that this error happened inside `thing`, one level further out.
    pub(crate) fn enclose(&mut self, thing: Thing) {
        self.while_parsing.push(thing);
    }

    pub fn kind(&self) -> &ReadErrorKind {
        &self.kind
    }

    /// The structures open when the error happened, innermost first.
    pub fn parsing(&self) -> &[Thing] {
        &self.while_parsing
    }

    pub fn region(&self) -> SrcRegion {
        self.region
    }

    /// Render the error with a `line:col` position resolved against `code`.
    pub fn describe(&self, code: &str) -> String {
        let mut msg = match self.region.in_context(code) {
            Some(((line, col), _)) => format!("{}:{}: {}", line + 1, col + 1, self.kind),
            None => self.kind.to_string(),
        };
        if let Some(thing) = self.while_parsing.first() {
            msg += &format!(" while parsing {}", thing);
        }
        msg
    }
}

impl From<ReadErrorKind> for ReadError {
    fn from(kind: ReadErrorKind) -> Self {
        Self {
            kind,
            region: SrcRegion::none(),
            while_parsing: Vec::new(),
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(loc) = self.region.start() {
            write!(f, " at offset {:?}", loc)?;
        }
        if let Some(thing) = self.while_parsing.first() {
            write!(f, " while parsing {}", thing)?;
        }
        Ok(())
    }
}

impl std::error::Error for ReadError {}

/// Failure of a single read-eval request.
#[derive(Debug, PartialEq)]
pub enum Error {
    Read(Vec<ReadError>),
    Exec(ExecError),
}

impl Error {
    pub fn describe(&self, code: &str) -> String {
        match self {
            Error::Read(errors) => errors
                .iter()
                .map(|e| e.describe(code))
                .collect::<Vec<_>>()
                .join("\n"),
            Error::Exec(e) => e.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Read(errors) => {
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", e)?;
                }
                Ok(())
            },
            Error::Exec(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<Vec<ReadError>> for Error {
    fn from(errors: Vec<ReadError>) -> Self {
        Error::Read(errors)
    }
}

impl From<ExecError> for Error {
    fn from(e: ExecError) -> Self {
        Error::Exec(e)
    }
}
