//! List builtins.
//!
//! `list` shares its argument cells and `nth` hands out the element cell
//! itself, so element writes through one holder are seen by all.
//! `push-back!` and `pop-back!` mutate their list in place.

use crate::builtins::arg;
use crate::runtime::environment::EnvRef;
use crate::runtime::value::{NativeFn, Node, NodeRef};
use crate::runtime::{symbols, Environment, Interp};

/// Register list builtins into the global frame
pub fn register(env: &mut Environment) {
    let mut builtin = |name: &str, f: NativeFn| {
        env.define(symbols::to_code(name), Node::Builtin(f).cell());
    };
    builtin("list", builtin_list);
    builtin("cons", builtin_cons);
    builtin("nth", builtin_nth);
    builtin("length", builtin_length);
    builtin("push-back!", builtin_push_back);
    builtin("pop-back!", builtin_pop_back);
}

/// (list X ..)
fn builtin_list(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    Node::List(args.to_vec()).cell()
}

/// (cons X LST) - a new list with X prepended; LST itself is untouched
fn builtin_cons(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    let Some(head) = args.first() else {
        return Node::nil();
    };
    let mut items = vec![head.clone()];
    if let Node::List(rest) = arg(args, 1) {
        items.extend(rest);
    }
    Node::List(items).cell()
}

/// (nth I LST) - the element cell at index I. Out of range asserts in
/// debug builds and yields nil in release.
fn builtin_nth(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    let i = arg(args, 0).to_int();
    let Node::List(items) = arg(args, 1) else {
        return Node::nil();
    };
    debug_assert!(i >= 0 && (i as usize) < items.len(), "list index out of range");
    items.get(i as usize).cloned().unwrap_or_else(Node::nil)
}

/// (length LST) - 0 for non-lists
fn builtin_length(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    match arg(args, 0) {
        Node::List(items) => Node::Int(items.len() as i64).cell(),
        _ => Node::Int(0).cell(),
    }
}

/// (push-back! LST ITEM) - destructive append of a copy of ITEM; returns
/// the list
fn builtin_push_back(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    let Some(list) = args.first() else {
        return Node::nil();
    };
    let item = arg(args, 1).cell();
    if let Node::List(items) = &mut *list.write() {
        items.push(item);
    }
    list.clone()
}

/// (pop-back! LST) - destructive removal of the last element; nil when
/// there is none
fn builtin_pop_back(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    let Some(list) = args.first() else {
        return Node::nil();
    };
    let popped = match &mut *list.write() {
        Node::List(items) => items.pop(),
        _ => None,
    };
    popped.unwrap_or_else(Node::nil)
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
    fn test_list_and_length() {
        assert_eq!(eval_str("(length (list 1 2 3))"), Node::Int(3));
        assert_eq!(eval_str("(length (list))"), Node::Int(0));
        assert_eq!(eval_str("(length 5)"), Node::Int(0));
    }

    #[test]
    fn test_cons_prepends_into_a_new_list() {
        assert_eq!(eval_str("(cons 1 (list 2 3))").to_display(), "(1 2 3)");
        // the original list is unchanged
        let src = "(def xs (list 2 3)) (cons 1 xs) (length xs)";
        assert_eq!(eval_str(src), Node::Int(2));
        assert_eq!(eval_str("(cons 1 (list))").to_display(), "(1)");
    }

    #[test]
    fn test_nth_indexes_from_zero() {
        assert_eq!(eval_str("(nth 0 (list 7 8 9))"), Node::Int(7));
        assert_eq!(eval_str("(nth 2 (list 7 8 9))"), Node::Int(9));
    }

    #[test]
    fn test_push_back_mutates_in_place() {
        let src = "(def xs (list 1 2 3)) (push-back! xs 4) (length xs)";
        assert_eq!(eval_str(src), Node::Int(4));
        let src = "(def xs (list 1)) (push-back! xs 2) (nth 1 xs)";
        assert_eq!(eval_str(src), Node::Int(2));
    }

    #[test]
    fn test_push_back_copies_the_item() {
        // the pushed element is a copy, not x's own cell
        let src = "(def xs (list)) (def x 1) (push-back! xs x) (set x 9) (nth 0 xs)";
        assert_eq!(eval_str(src), Node::Int(1));
    }

    #[test]
    fn test_pop_back_returns_the_removed_element() {
        let src = "(def xs (list 1 2 3)) (pop-back! xs)";
        assert_eq!(eval_str(src), Node::Int(3));
        let src = "(def xs (list 1 2 3)) (pop-back! xs) (length xs)";
        assert_eq!(eval_str(src), Node::Int(2));
        assert_eq!(eval_str("(pop-back! (list))"), Node::Nil);
    }
}
