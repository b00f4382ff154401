//! Numeric builtins: arithmetic, comparison, powers and logs.
//!
//! The variadic arithmetic operators pick their numeric mode from the
//! first operand: an `int` first operand coerces everything to `int` and
//! yields `int`; anything else runs in `double`. Integer arithmetic wraps;
//! an integer division or modulo by zero yields nil.

use rand::Rng;

use crate::builtins::arg;
use crate::runtime::environment::EnvRef;
use crate::runtime::value::{NativeFn, Node, NodeRef};
use crate::runtime::{symbols, Environment, Interp};

/// Register numeric builtins into the global frame
pub fn register(env: &mut Environment) {
    let mut builtin = |name: &str, f: NativeFn| {
        env.define(symbols::to_code(name), Node::Builtin(f).cell());
    };
    builtin("+", builtin_plus);
    builtin("-", builtin_minus);
    builtin("*", builtin_mul);
    builtin("/", builtin_div);
    builtin("%", builtin_percent);
    builtin("^", builtin_caret);
    builtin("<", builtin_lt);
    builtin("==", builtin_eqeq);
    builtin("!", builtin_not);
    builtin("++", builtin_incr);
    builtin("--", builtin_decr);
    builtin("sqrt", builtin_sqrt);
    builtin("floor", builtin_floor);
    builtin("ceil", builtin_ceil);
    builtin("ln", builtin_ln);
    builtin("log10", builtin_log10);
    builtin("rand", builtin_rand);
}

/// Folds the operands in the mode chosen by the first one. `empty` is the
/// identity returned for zero operands. An int-mode step returning None
/// (division by zero) aborts to nil.
fn arith(
    args: &[NodeRef],
    empty: i64,
    int_op: impl Fn(i64, i64) -> Option<i64>,
    double_op: impl Fn(f64, f64) -> f64,
) -> NodeRef {
    let Some(first) = args.first() else {
        return Node::Int(empty).cell();
    };
    let first = first.read().clone();
    if let Node::Int(mut acc) = first {
        for operand in &args[1..] {
            match int_op(acc, operand.read().to_int()) {
                Some(next) => acc = next,
                None => return Node::nil(),
            }
        }
        Node::Int(acc).cell()
    } else {
        let mut acc = first.to_double();
        for operand in &args[1..] {
            acc = double_op(acc, operand.read().to_double());
        }
        Node::Double(acc).cell()
    }
}

/// (+ X ..)
fn builtin_plus(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    arith(args, 0, |a, b| Some(a.wrapping_add(b)), |a, b| a + b)
}

/// (- X ..)
fn builtin_minus(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    arith(args, 0, |a, b| Some(a.wrapping_sub(b)), |a, b| a - b)
}

/// (* X ..)
fn builtin_mul(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    arith(args, 1, |a, b| Some(a.wrapping_mul(b)), |a, b| a * b)
}

/// (/ X ..)
fn builtin_div(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    arith(args, 1, i64::checked_div, |a, b| a / b)
}

/// (% DIVIDEND DIVISOR) - integer modulo
fn builtin_percent(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    match arg(args, 0).to_int().checked_rem(arg(args, 1).to_int()) {
        Some(m) => Node::Int(m).cell(),
        None => Node::nil(),
    }
}

/// (^ BASE EXPONENT)
fn builtin_caret(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    Node::Double(arg(args, 0).to_double().powf(arg(args, 1).to_double())).cell()
}

/// (< X Y) - int compare when X is an int, double compare otherwise
fn builtin_lt(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    let result = match arg(args, 0) {
        Node::Int(a) => a < arg(args, 1).to_int(),
        other => other.to_double() < arg(args, 1).to_double(),
    };
    Node::Bool(result).cell()
}

/// (== X ..) - n-ary; false on the first mismatch against operand 0
fn builtin_eqeq(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    if args.is_empty() {
        return Node::Bool(true).cell();
    }
    let equal = match arg(args, 0) {
        Node::Int(first) => args[1..].iter().all(|x| x.read().to_int() == first),
        other => {
            let first = other.to_double();
            args[1..].iter().all(|x| x.read().to_double() == first)
        }
    };
    Node::Bool(equal).cell()
}

/// (! X)
fn builtin_not(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    Node::Bool(!arg(args, 0).truth()).cell()
}

/// (++ X) - increments the cell in place and returns it
fn builtin_incr(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    step(args, 1)
}

/// (-- X) - decrements the cell in place and returns it
fn builtin_decr(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    step(args, -1)
}

fn step(args: &[NodeRef], delta: i64) -> NodeRef {
    let Some(first) = args.first() else {
        return Node::Int(0).cell();
    };
    {
        let mut node = first.write();
        match &mut *node {
            Node::Int(n) => *n = n.wrapping_add(delta),
            Node::Double(d) => *d += delta as f64,
            _ => {}
        }
    }
    first.clone()
}

/// (sqrt X)
fn builtin_sqrt(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    Node::Double(arg(args, 0).to_double().sqrt()).cell()
}

/// (floor X)
fn builtin_floor(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    Node::Double(arg(args, 0).to_double().floor()).cell()
}

/// (ceil X)
fn builtin_ceil(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    Node::Double(arg(args, 0).to_double().ceil()).cell()
}

/// (ln X)
fn builtin_ln(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    Node::Double(arg(args, 0).to_double().ln()).cell()
}

/// (log10 X)
fn builtin_log10(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    Node::Double(arg(args, 0).to_double().log10()).cell()
}

/// (rand) - uniform double in [0, 1)
fn builtin_rand(_: &Interp, _: &[NodeRef], _: &EnvRef) -> NodeRef {
    Node::Double(rand::thread_rng().gen::<f64>()).cell()
}
