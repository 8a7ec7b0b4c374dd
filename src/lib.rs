mod builtin;
mod error;
mod lex;
mod parse;
mod util;
mod value;
mod walker;

use std::io::Write;
use tracing::{debug, warn};

pub use self::{
    builtin::Output,
    error::{Error, ReadError, ReadErrorKind, Thing},
    lex::{tokenize, Lexeme, Token, Tokenizer},
    parse::{read_all, read_str, Parsed, Reader},
    util::{SrcLoc, SrcRegion},
    value::{pr_all, pr_str, Callable, Closure, Kind, Map, Native, Params, Printed, Symbol, Value},
    walker::{apply, eval, eval_ast, Arity, Env, ExecError},
};

/// A read-eval-print session.
///
/// Bindings made with `def!` persist across requests. A failed request
/// leaves every earlier binding in place.
pub struct Engine {
    env: Env,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_output(Output::stdout())
    }

    /// A session whose `prn` and `println` write to `output`.
    pub fn with_output(output: Output) -> Self {
        Self {
            env: Env::top_level(builtin::core(&output)),
        }
    }

    pub fn with_writer(sink: impl Write + 'static) -> Self {
        Self::with_output(Output::new(sink))
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Read and evaluate the first form of `code`. Returns `None` when the
    /// input holds no form.
    pub fn eval_str(&mut self, code: &str) -> Result<Option<Value>, Error> {
        debug!(code, "request");
        let form = read_str(code).into_result().map_err(|errors| {
            warn!(count = errors.len(), "read failed");
            Error::Read(errors)
        })?;
        match form {
            Some(form) => Ok(Some(eval(&form, &self.env)?)),
            None => Ok(None),
        }
    }

    /// Read, evaluate and print (readable mode) the first form of `code`.
    pub fn rep(&mut self, code: &str) -> Result<Option<String>, Error> {
        Ok(self.eval_str(code)?.map(|value| pr_str(&value, true)))
    }

    /// Evaluate every top-level form of `code` in order, returning the value
    /// of the last one (`nil` for a program with no forms).
    pub fn execute(&mut self, code: &str) -> Result<Value, Error> {
        let forms = read_all(code).into_result().map_err(|errors| {
            warn!(count = errors.len(), "read failed");
            Error::Read(errors)
        })?;
        debug!(forms = forms.len(), "executing program");
        let mut last = Value::Nil;
        for form in &forms {
            last = eval(form, &self.env)?;
        }
        Ok(last)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
