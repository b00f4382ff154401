//! Macro table, macro expansion and the compile pass.
//!
//! Compilation walks each parsed form once: `defmacro` forms side-effect
//! the macro table and compile to nil, macro calls are substituted and
//! re-compiled until none remain, `quote` is left untouched so quoted macro
//! calls stay literal, and everything else is mapped structurally. The
//! compiled form has the same shape as the parsed form - there is no
//! separate bytecode.
//!
//! Expansion is not hygienic: names introduced by a macro body can collide
//! with user bindings at the call site.

use std::collections::HashMap;

use dashmap::DashMap;

use crate::runtime::value::{Node, NodeRef};

/// A recorded `defmacro`: parameter list and body form
#[derive(Debug, Clone)]
pub struct MacroDef {
    /// Parameter symbols; the literal symbol `...` captures the remaining
    /// argument forms as a list
    pub params: NodeRef,
    /// Replacement form, substituted positionally
    pub body: NodeRef,
}

/// Table of macro rewrite rules, keyed by name.
///
/// Keys are the textual names, not interned codes: the compile pass matches
/// any head whose text equals a recorded name.
#[derive(Debug, Default)]
pub struct MacroTable {
    defs: DashMap<String, MacroDef>,
}

impl MacroTable {
    /// Creates an empty table
    pub fn new() -> Self {
        MacroTable::default()
    }

    /// Records (or replaces) a macro definition
    pub fn define(&self, name: &str, params: NodeRef, body: NodeRef) {
        self.defs.insert(name.to_string(), MacroDef { params, body });
    }

    /// Looks up a definition by name
    pub fn get(&self, name: &str) -> Option<MacroDef> {
        self.defs.get(name).map(|d| d.value().clone())
    }

    /// All recorded names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.defs.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

/// Compiles one form against `macros` (see module docs)
pub fn compile(macros: &MacroTable, form: &NodeRef) -> NodeRef {
    let items = match &*form.read() {
        Node::List(items) => items.clone(),
        _ => return form.clone(),
    };
    if items.is_empty() {
        return form.clone();
    }

    let head = compile(macros, &items[0]);
    if let Node::Symbol { name, .. } = &*head.read() {
        if name == "defmacro" {
            // (defmacro NAME (PARAMS..) BODY); anything shorter records nothing
            if items.len() >= 4 {
                if let Some(macro_name) = items[1].read().text() {
                    macros.define(macro_name, items[2].clone(), items[3].clone());
                }
            }
            return Node::nil();
        }
        if name == "quote" {
            return form.clone();
        }
    }

    let head_name = head.read().text().map(str::to_string);
    if let Some(def) = head_name.and_then(|name| macros.get(&name)) {
        let expanded = expand_call(&def, &items);
        return compile(macros, &expanded);
    }

    let children = items.iter().map(|child| compile(macros, child)).collect();
    Node::List(children).cell()
}

/// Compiles every top-level form
pub fn compile_all(macros: &MacroTable, forms: &[NodeRef]) -> Vec<NodeRef> {
    forms.iter().map(|form| compile(macros, form)).collect()
}

/// Expands one macro call: binds formals to argument forms positionally,
/// then substitutes through the body
fn expand_call(def: &MacroDef, call: &[NodeRef]) -> NodeRef {
    let params = match &*def.params.read() {
        Node::List(params) => params.clone(),
        _ => Vec::new(),
    };

    let mut vars: HashMap<String, NodeRef> = HashMap::new();
    for (i, param) in params.iter().enumerate() {
        let name = match param.read().text() {
            Some(name) => name.to_string(),
            None => continue,
        };
        if name == "..." {
            let rest: Vec<NodeRef> = call.iter().skip(i + 1).cloned().collect();
            vars.insert(name, Node::List(rest).cell());
            break;
        }
        // a call with too few arguments binds the leftover formals to nil
        let arg = call.get(i + 1).cloned().unwrap_or_else(Node::nil);
        vars.insert(name, arg);
    }

    substitute(&def.body, &vars)
}

/// Substitutes bound names through a body form; `...` splices its captured
/// list in place instead of nesting it
fn substitute(body: &NodeRef, vars: &HashMap<String, NodeRef>) -> NodeRef {
    let node = body.read().clone();
    match node {
        Node::List(items) => {
            let mut out = Vec::new();
            for item in &items {
                let splices = item.read().text() == Some("...");
                if splices {
                    if let Some(bound) = vars.get("...") {
                        if let Node::List(elems) = &*bound.read() {
                            out.extend(elems.iter().cloned());
                        }
                    }
                } else {
                    out.push(substitute(item, vars));
                }
            }
            Node::List(out).cell()
        }
        other => match other.text().and_then(|name| vars.get(name)) {
            Some(bound) => bound.clone(),
            None => body.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn compile_source(macros: &MacroTable, source: &str) -> Vec<NodeRef> {
        compile_all(macros, &parse(source))
    }

    #[test]
    fn test_non_list_forms_pass_through() {
        let macros = MacroTable::new();
        let forms = compile_source(&macros, "42 x \"s\"");
        assert_eq!(*forms[0].read(), Node::Int(42));
        assert_eq!(*forms[1].read(), Node::symbol("x"));
        assert_eq!(*forms[2].read(), Node::Str("s".to_string()));
    }

    #[test]
    fn test_defmacro_records_and_compiles_to_nil() {
        let macros = MacroTable::new();
        let forms = compile_source(&macros, "(defmacro seven () 7)");
        assert_eq!(*forms[0].read(), Node::Nil);
        assert!(macros.get("seven").is_some());
    }

    #[test]
    fn test_macro_call_is_expanded() {
        let macros = MacroTable::new();
        let forms = compile_source(&macros, "(defmacro unless (c body) (if c nil body)) (unless false 42)");
        let expanded = forms[1].read().to_display();
        assert_eq!(expanded, "(if false nil 42)");
    }

    #[test]
    fn test_rest_parameter_splices() {
        let macros = MacroTable::new();
        let forms = compile_source(&macros, "(defmacro prog (...) (begin ...)) (prog 1 2 3)");
        assert_eq!(forms[1].read().to_display(), "(begin 1 2 3)");
    }

    #[test]
    fn test_rest_parameter_empty_splice() {
        let macros = MacroTable::new();
        let forms = compile_source(&macros, "(defmacro prog2 (...) (begin ...)) (prog2)");
        assert_eq!(forms[1].read().to_display(), "(begin)");
    }

    #[test]
    fn test_quote_protects_macro_calls() {
        let macros = MacroTable::new();
        let forms = compile_source(&macros, "(defmacro m (x) x) (quote (m 1))");
        assert_eq!(forms[1].read().to_display(), "(quote (m 1))");
    }

    #[test]
    fn test_expansion_recompiles_nested_macros() {
        let macros = MacroTable::new();
        let forms = compile_source(
            &macros,
            "(defmacro twice (x) (+ x x)) (defmacro quad (x) (twice (twice x))) (quad 3)",
        );
        assert_eq!(forms[2].read().to_display(), "(+ (+ 3 3) (+ 3 3))");
    }

    #[test]
    fn test_compile_is_a_fixed_point() {
        let macros = MacroTable::new();
        let forms = compile_source(&macros, "(defmacro unless (c body) (if c nil body)) (unless false 42)");
        let once = forms[1].clone();
        let twice = compile(&macros, &once);
        assert_eq!(*once.read(), *twice.read());
    }

    #[test]
    fn test_missing_macro_args_bind_nil() {
        let macros = MacroTable::new();
        let forms = compile_source(&macros, "(defmacro pair (a b) (list a b)) (pair 1)");
        assert_eq!(forms[1].read().to_display(), "(list 1 )");
    }

    #[test]
    fn test_macro_table_names_sorted() {
        let macros = MacroTable::new();
        macros.define("zz", Node::List(vec![]).cell(), Node::nil());
        macros.define("aa", Node::List(vec![]).cell(), Node::nil());
        assert_eq!(macros.names(), vec!["aa".to_string(), "zz".to_string()]);
    }
}
