//! Special forms.
//!
//! These receive the raw call form - head included, operands unevaluated -
//! together with the current environment, so operand indexing starts at 1.

use crate::runtime::environment::EnvRef;
use crate::runtime::threading::spawn_thread;
use crate::runtime::value::{NativeFn, Node, NodeRef};
use crate::runtime::{symbols, Environment, Interp};

/// Register special forms into the global frame
pub fn register(env: &mut Environment) {
    let mut special = |name: &str, f: NativeFn| {
        env.define(symbols::to_code(name), Node::Special(f).cell());
    };
    special("def", special_def);
    special("set", special_set);
    special("if", special_if);
    special("fn", special_fn);
    special("begin", special_begin);
    special("while", special_while);
    special("quote", special_quote);
    special("&&", special_and);
    special("||", special_or);
    special("thread", special_thread);
}

/// (def SYM V) - evaluate V, clone it into a fresh cell, bind in the
/// current frame. Returns the bound cell.
fn special_def(interp: &Interp, raw: &[NodeRef], env: &EnvRef) -> NodeRef {
    let (Some(sym), Some(value_form)) = (raw.get(1), raw.get(2)) else {
        return Node::nil();
    };
    let Node::Symbol { code, .. } = *sym.read() else {
        return Node::nil();
    };
    let value = interp.eval(value_form, env).read().clone().cell();
    env.write().define(code, value)
}

/// (set SYM-OR-PLACE V) - an unbound symbol gets a fresh binding in the
/// current frame; any other place is overwritten in-place, so every
/// binding sharing the cell observes the change
fn special_set(interp: &Interp, raw: &[NodeRef], env: &EnvRef) -> NodeRef {
    let (Some(place_form), Some(value_form)) = (raw.get(1), raw.get(2)) else {
        return Node::nil();
    };
    let place = interp.eval(place_form, env);
    let value = interp.eval(value_form, env).read().clone();

    if let Node::Symbol { code, .. } = *place_form.read() {
        if env.read().lookup(code).is_none() {
            return env.write().define(code, value.cell());
        }
    }
    *place.write() = value;
    place
}

/// (if C T [E])
fn special_if(interp: &Interp, raw: &[NodeRef], env: &EnvRef) -> NodeRef {
    let Some(cond) = raw.get(1) else {
        return Node::nil();
    };
    if interp.eval(cond, env).read().truth() {
        match raw.get(2) {
            Some(then) => interp.eval(then, env),
            None => Node::nil(),
        }
    } else {
        match raw.get(3) {
            Some(alt) => interp.eval(alt, env),
            None => Node::nil(),
        }
    }
}

/// (fn (P..) BODY..) - lexical closure over the current environment
fn special_fn(_interp: &Interp, raw: &[NodeRef], env: &EnvRef) -> NodeRef {
    Node::Fn {
        form: raw.to_vec(),
        env: env.clone(),
    }
    .cell()
}

/// (begin E..) - evaluate in order, return the last (nil when empty)
fn special_begin(interp: &Interp, raw: &[NodeRef], env: &EnvRef) -> NodeRef {
    let mut result = Node::nil();
    for expr in &raw[1..] {
        result = interp.eval(expr, env);
    }
    result
}

/// (while C E..) - returns nil
fn special_while(interp: &Interp, raw: &[NodeRef], env: &EnvRef) -> NodeRef {
    let Some(cond) = raw.get(1) else {
        return Node::nil();
    };
    while interp.eval(cond, env).read().truth() {
        for expr in &raw[2..] {
            interp.eval(expr, env);
        }
    }
    Node::nil()
}

/// (quote X) - X unevaluated
fn special_quote(_interp: &Interp, raw: &[NodeRef], _env: &EnvRef) -> NodeRef {
    raw.get(1).cloned().unwrap_or_else(Node::nil)
}

/// (&& X..) - short-circuit; true with no operands
fn special_and(interp: &Interp, raw: &[NodeRef], env: &EnvRef) -> NodeRef {
    for expr in &raw[1..] {
        if !interp.eval(expr, env).read().truth() {
            return Node::Bool(false).cell();
        }
    }
    Node::Bool(true).cell()
}

/// (|| X..) - short-circuit; false with no operands
fn special_or(interp: &Interp, raw: &[NodeRef], env: &EnvRef) -> NodeRef {
    for expr in &raw[1..] {
        if interp.eval(expr, env).read().truth() {
            return Node::Bool(true).cell();
        }
    }
    Node::Bool(false).cell()
}

/// (thread E..) - spawn an OS thread evaluating the body against the
/// spawner's environment; returns the handle
fn special_thread(interp: &Interp, raw: &[NodeRef], env: &EnvRef) -> NodeRef {
    spawn_thread(interp, raw[1..].to_vec(), env).cell()
}
