//! String and coercion builtins.

use crate::builtins::arg;
use crate::parser::parse;
use crate::runtime::environment::EnvRef;
use crate::runtime::value::{NativeFn, Node, NodeRef};
use crate::runtime::{symbols, Environment, Interp};

/// Register string and coercion builtins into the global frame
pub fn register(env: &mut Environment) {
    let mut builtin = |name: &str, f: NativeFn| {
        env.define(symbols::to_code(name), Node::Builtin(f).cell());
    };
    builtin("strlen", builtin_strlen);
    builtin("char-at", builtin_char_at);
    builtin("chr", builtin_chr);
    builtin("string", builtin_string);
    builtin("read-string", builtin_read_string);
    builtin("int", builtin_int);
    builtin("double", builtin_double);
    builtin("type", builtin_type);
}

/// (strlen X) - byte length; 0 for non-strings
fn builtin_strlen(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    match arg(args, 0) {
        Node::Str(s) => Node::Int(s.len() as i64).cell(),
        _ => Node::Int(0).cell(),
    }
}

/// (char-at STR I) - the byte at index I as an int; `chr` is the inverse.
/// Out of range asserts in debug builds and yields nil in release.
fn builtin_char_at(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    let Node::Str(s) = arg(args, 0) else {
        return Node::nil();
    };
    let i = arg(args, 1).to_int();
    debug_assert!(i >= 0 && (i as usize) < s.len(), "string index out of range");
    match s.as_bytes().get(i as usize) {
        Some(b) => Node::Int(i64::from(*b)).cell(),
        None => Node::nil(),
    }
}

/// (chr X) - one-character string from a byte value
fn builtin_chr(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    let byte = arg(args, 0).to_int() as u8;
    Node::Str((byte as char).to_string()).cell()
}

/// (string X ..) - concatenation of the printed forms of all operands;
/// empty string for one operand or none
fn builtin_string(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    if args.len() <= 1 {
        return Node::Str(String::new()).cell();
    }
    let mut acc = String::new();
    for operand in args {
        acc.push_str(&operand.read().to_display());
    }
    Node::Str(acc).cell()
}

/// (read-string X) - the first form parsed out of the string
fn builtin_read_string(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    parse(&arg(args, 0).to_display())
        .into_iter()
        .next()
        .unwrap_or_else(Node::nil)
}

/// (int X)
fn builtin_int(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    Node::Int(arg(args, 0).to_int()).cell()
}

/// (double X)
fn builtin_double(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    Node::Double(arg(args, 0).to_double()).cell()
}

/// (type X) - the type name as a string
fn builtin_type(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    Node::Str(arg(args, 0).type_name().to_string()).cell()
}
