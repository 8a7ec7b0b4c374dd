pub mod print;

use std::{
    fmt,
    hash::{Hash, Hasher},
    rc::Rc,
};
use internment::Intern;
use rustc_hash::FxHashMap;
use crate::walker::{Env, ExecError};

pub use self::print::{pr_all, pr_str, Printed};

/// A symbol name, interned so that comparison and hashing are pointer-cheap.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(Intern<String>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Self(Intern::new(name.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value pairs in insertion order. Keys are unique under structural
/// equality.
#[derive(Clone, Default)]
pub struct Map {
    entries: Vec<(Value, Value)>,
    index: FxHashMap<Value, usize>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, replacing the value of an equal key in place.
    pub fn insert(&mut self, key: Value, value: Value) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            },
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter().all(|(k, v)| other.get(k).map_or(false, |w| v == w))
    }
}

impl FromIterator<(Value, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, ExecError>;

/// A primitive implemented in Rust.
#[derive(Clone)]
pub struct Native {
    pub name: &'static str,
    pub func: Rc<NativeFn>,
}

impl Native {
    pub fn new(name: &'static str, func: impl Fn(&[Value]) -> Result<Value, ExecError> + 'static) -> Self {
        Self {
            name,
            func: Rc::new(func),
        }
    }
}

/// A closure's parameter list: positional names plus an optional `& rest`.
#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    pub positional: Vec<Symbol>,
    pub rest: Option<Symbol>,
}

impl Params {
    pub fn from_value(form: &Value) -> Result<Self, ExecError> {
        let items = form.as_seq().ok_or_else(|| ExecError::TypeMismatch {
            expected: "a parameter list",
            found: form.kind(),
        })?;

        let mut positional = Vec::with_capacity(items.len());
        let mut items = items.iter();
        while let Some(item) = items.next() {
            let sym = item.as_symbol().ok_or_else(|| ExecError::TypeMismatch {
                expected: "a symbol",
                found: item.kind(),
            })?;
            if sym.as_str() == "&" {
                let rest = match (items.next(), items.next()) {
                    (Some(Value::Symbol(rest)), None) => *rest,
                    _ => return Err(ExecError::malformed("fn*", "'&' must be followed by exactly one symbol")),
                };
                return Ok(Self { positional, rest: Some(rest) });
            }
            positional.push(sym);
        }
        Ok(Self { positional, rest: None })
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut names = self.positional.iter().map(Symbol::as_str).collect::<Vec<_>>();
        if let Some(rest) = &self.rest {
            names.push("&");
            names.push(rest.as_str());
        }
        write!(f, "({})", names.join(" "))
    }
}

pub struct Closure {
    pub params: Params,
    pub body: Value,
    pub env: Env,
}

#[derive(Clone)]
pub enum Callable {
    Native(Native),
    Closure(Rc<Closure>),
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Native(a), Callable::Native(b)) => Rc::ptr_eq(&a.func, &b.func),
            (Callable::Closure(a), Callable::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// The coarse type of a value, used in error messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    List,
    Vector,
    Map,
    Symbol,
    Keyword,
    String,
    Integer,
    Bool,
    Nil,
    Function,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Kind::List => "list",
            Kind::Vector => "vector",
            Kind::Map => "map",
            Kind::Symbol => "symbol",
            Kind::Keyword => "keyword",
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Bool => "boolean",
            Kind::Nil => "nil",
            Kind::Function => "function",
        })
    }
}

#[derive(Clone)]
pub enum Value {
    List(Rc<Vec<Value>>),
    Vector(Rc<Vec<Value>>),
    Map(Rc<Map>),
    Symbol(Symbol),
    Keyword(Symbol),
    String(Rc<str>),
    Integer(i64),
    True,
    False,
    Nil,
    Callable(Callable),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    pub fn vector(items: Vec<Value>) -> Self {
        Value::Vector(Rc::new(items))
    }

    pub fn map(map: Map) -> Self {
        Value::Map(Rc::new(map))
    }

    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Symbol::new(name))
    }

    pub fn keyword(name: &str) -> Self {
        Value::Keyword(Symbol::new(name))
    }

    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn bool(b: bool) -> Self {
        if b { Value::True } else { Value::False }
    }

    pub fn native(native: Native) -> Self {
        Value::Callable(Callable::Native(native))
    }

    pub fn closure(closure: Closure) -> Self {
        Value::Callable(Callable::Closure(Rc::new(closure)))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::List(_) => Kind::List,
            Value::Vector(_) => Kind::Vector,
            Value::Map(_) => Kind::Map,
            Value::Symbol(_) => Kind::Symbol,
            Value::Keyword(_) => Kind::Keyword,
            Value::String(_) => Kind::String,
            Value::Integer(_) => Kind::Integer,
            Value::True | Value::False => Kind::Bool,
            Value::Nil => Kind::Nil,
            Value::Callable(_) => Kind::Function,
        }
    }

    /// Only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::False)
    }

    /// The elements of a list or vector.
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Vector(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            Value::Symbol(sym) => Some(*sym),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(x) => Some(*x),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::List(a) | Value::Vector(a), Value::List(b) | Value::Vector(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::True, Value::True) | (Value::False, Value::False) | (Value::Nil, Value::Nil) => true,
            (Value::Callable(a), Value::Callable(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

// Must agree with `PartialEq`: lists and vectors hash alike, maps hash only
// their size, and callables hash their address.
impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::List(items) | Value::Vector(items) => {
                state.write_u8(0);
                items.hash(state);
            },
            Value::Map(map) => {
                state.write_u8(1);
                map.len().hash(state);
            },
            Value::Symbol(sym) => {
                state.write_u8(2);
                sym.hash(state);
            },
            Value::Keyword(sym) => {
                state.write_u8(3);
                sym.hash(state);
            },
            Value::String(s) => {
                state.write_u8(4);
                s.hash(state);
            },
            Value::Integer(x) => {
                state.write_u8(5);
                x.hash(state);
            },
            Value::True => state.write_u8(6),
            Value::False => state.write_u8(7),
            Value::Nil => state.write_u8(8),
            Value::Callable(callable) => {
                state.write_u8(9);
                let addr = match callable {
                    Callable::Native(native) => Rc::as_ptr(&native.func) as *const u8 as usize,
                    Callable::Closure(closure) => Rc::as_ptr(closure) as *const u8 as usize,
                };
                addr.hash(state);
            },
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", Printed::readable(self))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", Printed::readable(self))
    }
}

#[cfg(test)]
mod tests;
