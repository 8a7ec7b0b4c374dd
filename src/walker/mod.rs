mod env;

use std::fmt;
use tracing::{debug, trace};
use crate::value::{Callable, Closure, Kind, Map, Params, Value};

pub use self::env::Env;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ExecError {
    #[error("'{0}' not found")]
    NoSuchSymbol(String),
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: Kind },
    #[error("cannot call a value of type {0}")]
    NotCallable(Kind),
    #[error("{callee}: expected {expected} argument(s), found {found}")]
    WrongNumberOfArgs { callee: String, expected: Arity, found: usize },
    #[error("division by zero")]
    DivisionByZero,
    #[error("malformed {form}: {reason}")]
    MalformedForm { form: &'static str, reason: &'static str },
    #[error("failed to write output: {0}")]
    Output(String),
}

impl ExecError {
    pub fn malformed(form: &'static str, reason: &'static str) -> Self {
        ExecError::MalformedForm { form, reason }
    }
}

/// Evaluate a form in `env`.
///
/// Lists whose head is a special-form symbol are dispatched on their
/// unevaluated operands; every other list is an application.
#[tracing::instrument(level = "trace", skip(env))]
pub fn eval(ast: &Value, env: &Env) -> Result<Value, ExecError> {
    let items = match ast {
        Value::List(items) => items,
        _ => return eval_ast(ast, env),
    };
    let (head, args) = match items.split_first() {
        Some(split) => split,
        None => return Ok(ast.clone()),
    };

    if let Value::Symbol(sym) = head {
        match sym.as_str() {
            "def!" => return eval_def(args, env),
            "let*" => return eval_let(args, env),
            "do" => return eval_do(args, env),
            "if" => return eval_if(args, env),
            "fn*" => return eval_fn(args, env),
            "quote" => return eval_quote(args),
            _ => {},
        }
    }

    let func = eval(head, env)?;
    let args = args
        .iter()
        .map(|arg| eval(arg, env))
        .collect::<Result<Vec<_>, _>>()?;
    apply(&func, &args)
}

/// Evaluate a non-list form: symbols are looked up, collections are
/// evaluated element-wise, everything else evaluates to itself.
pub fn eval_ast(ast: &Value, env: &Env) -> Result<Value, ExecError> {
    match ast {
        Value::Symbol(sym) => env.get(*sym),
        Value::List(items) => Ok(Value::list(eval_each(items, env)?)),
        Value::Vector(items) => Ok(Value::vector(eval_each(items, env)?)),
        Value::Map(map) => {
            let mut evaluated = Map::new();
            for (k, v) in map.iter() {
                evaluated.insert(k.clone(), eval(v, env)?);
            }
            Ok(Value::map(evaluated))
        },
        _ => Ok(ast.clone()),
    }
}

fn eval_each(items: &[Value], env: &Env) -> Result<Vec<Value>, ExecError> {
    items.iter().map(|item| eval(item, env)).collect()
}

pub fn apply(func: &Value, args: &[Value]) -> Result<Value, ExecError> {
    match func {
        Value::Callable(Callable::Native(native)) => (native.func)(args),
        Value::Callable(Callable::Closure(closure)) => {
            trace!(args = args.len(), "calling closure");
            let env = Env::with_bindings(&closure.env, &closure.params, args)?;
            eval(&closure.body, &env)
        },
        other => Err(ExecError::NotCallable(other.kind())),
    }
}

fn eval_def(args: &[Value], env: &Env) -> Result<Value, ExecError> {
    let (target, expr) = match args {
        [target, expr] => (target, expr),
        _ => return Err(ExecError::malformed("def!", "expected a symbol and a value")),
    };
    let sym = target.as_symbol().ok_or_else(|| ExecError::TypeMismatch {
        expected: "a symbol",
        found: target.kind(),
    })?;
    let value = eval(expr, env)?;
    debug!(symbol = sym.as_str(), "def!");
    env.set(sym, value.clone());
    Ok(value)
}

fn eval_let(args: &[Value], env: &Env) -> Result<Value, ExecError> {
    let (bindings, body) = match args {
        [bindings, body] => (bindings, body),
        _ => return Err(ExecError::malformed("let*", "expected a binding list and a body")),
    };
    let bindings = bindings.as_seq().ok_or_else(|| ExecError::TypeMismatch {
        expected: "a binding list",
        found: bindings.kind(),
    })?;
    if bindings.len() % 2 != 0 {
        return Err(ExecError::malformed("let*", "bindings must come in pairs"));
    }

    let let_env = Env::with_outer(env);
    for pair in bindings.chunks(2) {
        let sym = pair[0].as_symbol().ok_or_else(|| ExecError::TypeMismatch {
            expected: "a symbol",
            found: pair[0].kind(),
        })?;
        // Evaluated in the new scope so later bindings see earlier ones.
        let value = eval(&pair[1], &let_env)?;
        let_env.set(sym, value);
    }
    eval(body, &let_env)
}

fn eval_do(args: &[Value], env: &Env) -> Result<Value, ExecError> {
    let mut last = Value::Nil;
    for form in args {
        last = eval(form, env)?;
    }
    Ok(last)
}

fn eval_if(args: &[Value], env: &Env) -> Result<Value, ExecError> {
    let (cond, then, otherwise) = match args {
        [cond, then] => (cond, then, None),
        [cond, then, otherwise] => (cond, then, Some(otherwise)),
        _ => return Err(ExecError::malformed("if", "expected a condition and one or two branches")),
    };
    if eval(cond, env)?.is_truthy() {
        eval(then, env)
    } else {
        match otherwise {
            Some(otherwise) => eval(otherwise, env),
            None => Ok(Value::Nil),
        }
    }
}

fn eval_fn(args: &[Value], env: &Env) -> Result<Value, ExecError> {
    let (params, body) = match args {
        [params, body] => (params, body),
        _ => return Err(ExecError::malformed("fn*", "expected a parameter list and a body")),
    };
    Ok(Value::closure(Closure {
        params: Params::from_value(params)?,
        body: body.clone(),
        env: env.clone(),
    }))
}

fn eval_quote(args: &[Value]) -> Result<Value, ExecError> {
    match args {
        [form] => Ok(form.clone()),
        _ => Err(ExecError::malformed("quote", "expected exactly one form")),
    }
}
