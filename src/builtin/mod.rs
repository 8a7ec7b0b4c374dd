use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
};
use crate::{
    value::{pr_all, Native, Value},
    walker::{Arity, ExecError},
};

/// The sink `prn` and `println` write to.
#[derive(Clone)]
pub struct Output(Rc<RefCell<dyn Write>>);

impl Output {
    pub fn new(sink: impl Write + 'static) -> Self {
        Output(Rc::new(RefCell::new(sink)))
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    fn write_line(&self, line: &str) -> Result<(), ExecError> {
        let mut sink = self.0.borrow_mut();
        writeln!(sink, "{}", line)
            .and_then(|_| sink.flush())
            .map_err(|err| ExecError::Output(err.to_string()))
    }
}

fn check_arity(name: &'static str, args: &[Value], n: usize) -> Result<(), ExecError> {
    if args.len() == n {
        Ok(())
    } else {
        Err(ExecError::WrongNumberOfArgs {
            callee: name.to_string(),
            expected: Arity::Exactly(n),
            found: args.len(),
        })
    }
}

fn integer(value: &Value) -> Result<i64, ExecError> {
    value.as_integer().ok_or_else(|| ExecError::TypeMismatch {
        expected: "an integer",
        found: value.kind(),
    })
}

fn arithmetic(name: &'static str, op: fn(i64, i64) -> Result<i64, ExecError>) -> Native {
    Native::new(name, move |args| {
        check_arity(name, args, 2)?;
        Ok(Value::Integer(op(integer(&args[0])?, integer(&args[1])?)?))
    })
}

fn comparison(name: &'static str, op: fn(i64, i64) -> bool) -> Native {
    Native::new(name, move |args| {
        check_arity(name, args, 2)?;
        Ok(Value::bool(op(integer(&args[0])?, integer(&args[1])?)))
    })
}

fn divide(a: i64, b: i64) -> Result<i64, ExecError> {
    if b == 0 {
        Err(ExecError::DivisionByZero)
    } else {
        Ok(a.wrapping_div(b))
    }
}

fn is_empty(args: &[Value]) -> Result<Value, ExecError> {
    check_arity("empty?", args, 1)?;
    match &args[0] {
        Value::List(items) | Value::Vector(items) => Ok(Value::bool(items.is_empty())),
        Value::Map(map) => Ok(Value::bool(map.is_empty())),
        Value::Nil => Ok(Value::True),
        other => Err(ExecError::TypeMismatch {
            expected: "a collection",
            found: other.kind(),
        }),
    }
}

fn count(args: &[Value]) -> Result<Value, ExecError> {
    check_arity("count", args, 1)?;
    let len = match &args[0] {
        Value::List(items) | Value::Vector(items) => items.len(),
        Value::Map(map) => map.len(),
        Value::Nil => 0,
        other => return Err(ExecError::TypeMismatch {
            expected: "a collection",
            found: other.kind(),
        }),
    };
    Ok(Value::Integer(len as i64))
}

/// The primitives every top-level environment starts with.
pub fn core(output: &Output) -> Vec<Native> {
    let prn_out = output.clone();
    let println_out = output.clone();

    vec![
        arithmetic("+", |a, b| Ok(a.wrapping_add(b))),
        arithmetic("-", |a, b| Ok(a.wrapping_sub(b))),
        arithmetic("*", |a, b| Ok(a.wrapping_mul(b))),
        arithmetic("/", divide),
        Native::new("=", |args| {
            check_arity("=", args, 2)?;
            Ok(Value::bool(args[0] == args[1]))
        }),
        comparison("<", |a, b| a < b),
        comparison("<=", |a, b| a <= b),
        comparison(">", |a, b| a > b),
        comparison(">=", |a, b| a >= b),
        Native::new("list", |args| Ok(Value::list(args.to_vec()))),
        Native::new("list?", |args| {
            check_arity("list?", args, 1)?;
            Ok(Value::bool(matches!(args[0], Value::List(_))))
        }),
        Native::new("empty?", is_empty),
        Native::new("count", count),
        Native::new("not", |args| {
            check_arity("not", args, 1)?;
            Ok(Value::bool(!args[0].is_truthy()))
        }),
        Native::new("prn", move |args| {
            prn_out.write_line(&pr_all(args, true, " "))?;
            Ok(Value::Nil)
        }),
        Native::new("println", move |args| {
            println_out.write_line(&pr_all(args, false, " "))?;
            Ok(Value::Nil)
        }),
        Native::new("pr-str", |args| Ok(Value::string(pr_all(args, true, " ")))),
        Native::new("str", |args| Ok(Value::string(pr_all(args, false, "")))),
    ]
}
