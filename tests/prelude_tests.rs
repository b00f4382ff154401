//! Tests for the shipped prelude (`library.paren`).
//!
//! Integration tests run from the package root, which is where the
//! prelude lives, so `load_prelude` picks up the real file.

use paren::{Interp, Node};

fn interp() -> Interp {
    let interp = Interp::new();
    interp.load_prelude();
    interp
}

fn eval(source: &str) -> Node {
    let node = interp().eval_source(source).read().clone();
    node
}

#[test]
fn test_defn_defines_functions() {
    assert_eq!(eval("(defn triple (x) (* 3 x)) (triple 4)"), Node::Int(12));
}

#[test]
fn test_when_and_unless() {
    assert_eq!(eval("(when true 1 2 3)"), Node::Int(3));
    assert_eq!(eval("(when false 1)"), Node::Nil);
    assert_eq!(eval("(unless false 1 2)"), Node::Int(2));
    assert_eq!(eval("(unless true 1)"), Node::Nil);
}

#[test]
fn test_numeric_helpers() {
    assert_eq!(eval("(inc 41)"), Node::Int(42));
    assert_eq!(eval("(dec 43)"), Node::Int(42));
    assert_eq!(eval("(abs -5)"), Node::Int(5));
    assert_eq!(eval("(abs 5)"), Node::Int(5));
    assert_eq!(eval("(min 3 9)"), Node::Int(3));
    assert_eq!(eval("(max 3 9)"), Node::Int(9));
    assert_eq!(eval("(zero? 0)"), Node::Bool(true));
    assert_eq!(eval("(pos? 2)"), Node::Bool(true));
    assert_eq!(eval("(neg? -2)"), Node::Bool(true));
    assert_eq!(eval("(even? 4)"), Node::Bool(true));
    assert_eq!(eval("(odd? 3)"), Node::Bool(true));
}

#[test]
fn test_list_helpers() {
    assert_eq!(eval("(first (list 7 8 9))"), Node::Int(7));
    assert_eq!(eval("(second (list 7 8 9))"), Node::Int(8));
    assert_eq!(eval("(last (list 7 8 9))"), Node::Int(9));
    assert_eq!(eval("(empty? (list))"), Node::Bool(true));
    assert_eq!(eval("(empty? (list 1))"), Node::Bool(false));
}

#[test]
fn test_range_and_sum() {
    assert_eq!(eval("(range 1 5)").to_display(), "(1 2 3 4)");
    assert_eq!(eval("(sum (range 1 11))"), Node::Int(55));
    assert_eq!(eval("(sum (list))"), Node::Int(0));
    assert_eq!(eval("(product (list 2 3 4))"), Node::Int(24));
}

#[test]
fn test_reverse() {
    assert_eq!(eval("(reverse (list 1 2 3))").to_display(), "(3 2 1)");
    assert_eq!(eval("(reverse (list))").to_display(), "()");
}

#[test]
fn test_prelude_macros_are_recorded() {
    let interp = interp();
    let names = interp.macros().names();
    assert!(names.contains(&"defn".to_string()));
    assert!(names.contains(&"when".to_string()));
    assert!(names.contains(&"unless".to_string()));
}

#[test]
fn test_kernel_works_without_the_prelude() {
    let interp = Interp::new();
    assert_eq!(*interp.eval_source("(+ 1 2)").read(), Node::Int(3));
    // prelude helpers are simply unbound, which folds to nil
    assert_eq!(*interp.eval_source("(inc 1)").read(), Node::Nil);
}
