//! Higher-order builtins: apply, fold, map, filter.

use crate::builtins::arg;
use crate::runtime::environment::EnvRef;
use crate::runtime::value::{NativeFn, Node, NodeRef};
use crate::runtime::{symbols, Environment, Interp};

/// Register higher-order builtins into the global frame
pub fn register(env: &mut Environment) {
    let mut builtin = |name: &str, f: NativeFn| {
        env.define(symbols::to_code(name), Node::Builtin(f).cell());
    };
    builtin("apply", builtin_apply);
    builtin("fold", builtin_fold);
    builtin("map", builtin_map);
    builtin("filter", builtin_filter);
}

/// (apply FUNC LIST)
fn builtin_apply(interp: &Interp, args: &[NodeRef], env: &EnvRef) -> NodeRef {
    let Some(func) = args.first() else {
        return Node::nil();
    };
    let call_args = match arg(args, 1) {
        Node::List(items) => items,
        _ => Vec::new(),
    };
    interp.apply(func, call_args, env)
}

/// (fold FUNC LIST) - left fold seeded with element 0; nil on an empty
/// list
fn builtin_fold(interp: &Interp, args: &[NodeRef], env: &EnvRef) -> NodeRef {
    let Some(func) = args.first() else {
        return Node::nil();
    };
    let Node::List(items) = arg(args, 1) else {
        return Node::nil();
    };
    let Some(seed) = items.first() else {
        return Node::nil();
    };
    let mut acc = seed.clone();
    for item in &items[1..] {
        acc = interp.apply(func, vec![acc, item.clone()], env);
    }
    acc
}

/// (map FUNC LIST)
fn builtin_map(interp: &Interp, args: &[NodeRef], env: &EnvRef) -> NodeRef {
    let Some(func) = args.first() else {
        return Node::nil();
    };
    let Node::List(items) = arg(args, 1) else {
        return Node::List(Vec::new()).cell();
    };
    let mapped = items
        .iter()
        .map(|item| interp.apply(func, vec![item.clone()], env))
        .collect();
    Node::List(mapped).cell()
}

/// (filter FUNC LIST) - keeps the elements FUNC maps to a true value
fn builtin_filter(interp: &Interp, args: &[NodeRef], env: &EnvRef) -> NodeRef {
    let Some(func) = args.first() else {
        return Node::nil();
    };
    let Node::List(items) = arg(args, 1) else {
        return Node::List(Vec::new()).cell();
    };
    let kept = items
        .iter()
        .filter(|item| interp.apply(func, vec![(*item).clone()], env).read().truth())
        .cloned()
        .collect();
    Node::List(kept).cell()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_str(source: &str) -> Node {
        let interp = Interp::new();
        let node = interp.eval_source(source).read().clone();
        node
    }

    #[test]
    fn test_apply_spreads_the_list() {
        assert_eq!(eval_str("(apply + (list 1 2 3))"), Node::Int(6));
        assert_eq!(eval_str("(apply (fn (a b) (* a b)) (list 6 7))"), Node::Int(42));
    }

    #[test]
    fn test_fold_seeds_with_first_element() {
        assert_eq!(eval_str("(fold + (list 1 2 3 4))"), Node::Int(10));
        assert_eq!(eval_str("(fold (fn (a b) b) (list 1 2 3))"), Node::Int(3));
        assert_eq!(eval_str("(fold + (list 5))"), Node::Int(5));
    }

    #[test]
    fn test_fold_empty_list_is_nil() {
        assert_eq!(eval_str("(fold + (list))"), Node::Nil);
    }

    #[test]
    fn test_map_applies_elementwise() {
        assert_eq!(eval_str("(map (fn (x) (* x x)) (list 1 2 3))").to_display(), "(1 4 9)");
        assert_eq!(eval_str("(map (fn (x) x) (list))").to_display(), "()");
    }

    #[test]
    fn test_filter_keeps_true_elements() {
        assert_eq!(eval_str("(filter (fn (x) (< x 3)) (list 1 2 3 4))").to_display(), "(1 2)");
        assert_eq!(eval_str("(filter (fn (x) false) (list 1 2))").to_display(), "()");
    }

    #[test]
    fn test_map_with_builtin_head() {
        assert_eq!(eval_str("(map type (list 1 1.5))").to_display(), "(int double)");
    }
}
