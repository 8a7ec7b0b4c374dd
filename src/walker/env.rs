use std::{
    cell::RefCell,
    fmt,
    rc::Rc,
};
use rustc_hash::FxHashMap;
use crate::value::{Native, Params, Symbol, Value};
use super::{Arity, ExecError};

struct Frame {
    bindings: RefCell<FxHashMap<Symbol, Value>>,
    outer: Option<Env>,
}

/// A lexical scope. Cloning an `Env` shares the frame, so closures and
/// nested scopes keep their defining scope alive for as long as they need
/// it.
#[derive(Clone)]
pub struct Env(Rc<Frame>);

impl Env {
    fn with_frame(outer: Option<Env>) -> Self {
        Env(Rc::new(Frame {
            bindings: RefCell::new(FxHashMap::default()),
            outer,
        }))
    }

    /// An empty scope with no outer scope.
    pub fn new() -> Self {
        Self::with_frame(None)
    }

    /// A top-level scope holding the given primitives.
    pub fn top_level(natives: impl IntoIterator<Item = Native>) -> Self {
        let env = Self::new();
        for native in natives {
            env.set(Symbol::new(native.name), Value::native(native));
        }
        env
    }

    pub fn with_outer(outer: &Env) -> Self {
        Self::with_frame(Some(outer.clone()))
    }

    /// A child of `outer` binding `params` to `args` positionally, with any
    /// `& rest` parameter collecting the remaining arguments into a list.
    pub fn with_bindings(outer: &Env, params: &Params, args: &[Value]) -> Result<Self, ExecError> {
        let arity_ok = match params.rest {
            Some(_) => args.len() >= params.positional.len(),
            None => args.len() == params.positional.len(),
        };
        if !arity_ok {
            let expected = match params.rest {
                Some(_) => Arity::AtLeast(params.positional.len()),
                None => Arity::Exactly(params.positional.len()),
            };
            return Err(ExecError::WrongNumberOfArgs {
                callee: format!("fn* {}", params),
                expected,
                found: args.len(),
            });
        }

        let env = Self::with_outer(outer);
        for (param, arg) in params.positional.iter().zip(args) {
            env.set(*param, arg.clone());
        }
        if let Some(rest) = params.rest {
            env.set(rest, Value::list(args[params.positional.len()..].to_vec()));
        }
        Ok(env)
    }

    pub fn set(&self, sym: Symbol, value: Value) {
        self.0.bindings.borrow_mut().insert(sym, value);
    }

    /// The innermost scope, starting from this one, that binds `sym`.
    pub fn find(&self, sym: Symbol) -> Option<Env> {
        let mut env = self;
        loop {
            if env.0.bindings.borrow().contains_key(&sym) {
                return Some(env.clone());
            }
            env = env.0.outer.as_ref()?;
        }
    }

    pub fn get(&self, sym: Symbol) -> Result<Value, ExecError> {
        let env = self
            .find(sym)
            .ok_or_else(|| ExecError::NoSuchSymbol(sym.as_str().to_string()))?;
        let value = env.0.bindings.borrow().get(&sym).cloned();
        value.ok_or_else(|| ExecError::NoSuchSymbol(sym.as_str().to_string()))
    }

    pub fn same_scope(&self, other: &Env) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bindings = self.0.bindings.borrow();
        let mut names = bindings.keys().map(|sym| sym.as_str()).collect::<Vec<_>>();
        names.sort_unstable();
        f.debug_struct("Env")
            .field("bindings", &names)
            .field("outer", &self.0.outer)
            .finish()
    }
}
