use std::fs;
use std::sync::Arc;

use crate::builtins;
use crate::compiler::{compile, compile_all, MacroTable};
use crate::parser::parse;
use crate::runtime::environment::{EnvRef, Environment};
use crate::runtime::symbols;
use crate::runtime::value::{Node, NodeRef};

/// Name of the prelude script loaded at init from the working directory
pub const PRELUDE_FILE: &str = "library.paren";

/// The interpreter kernel: global environment plus macro table.
///
/// Cloning is cheap (two `Arc`s) and yields a handle onto the same kernel;
/// the `thread` special form moves such a handle into each spawned thread.
/// The symbol table is process-wide and shared between kernels.
#[derive(Debug, Clone)]
pub struct Interp {
    globals: EnvRef,
    macros: Arc<MacroTable>,
}

impl Interp {
    /// Creates a kernel with builtins, special forms and constants
    /// installed. The prelude is not loaded; see [`Interp::load_prelude`].
    pub fn new() -> Self {
        let interp = Interp {
            globals: Environment::new().into_ref(),
            macros: Arc::new(MacroTable::new()),
        };
        builtins::install(&interp.globals);
        interp
    }

    /// The global environment
    pub fn globals(&self) -> &EnvRef {
        &self.globals
    }

    /// The macro table
    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    /// Evaluates one compiled form against `env`.
    ///
    /// Symbols look up their binding (nil when unbound), lists apply their
    /// evaluated head, everything else evaluates to itself - the same cell,
    /// not a copy, so mutating builtins write through to shared structure.
    pub fn eval(&self, form: &NodeRef, env: &EnvRef) -> NodeRef {
        let node = form.read().clone();
        match node {
            Node::Symbol { code, .. } => env.read().get(code),
            Node::List(items) => {
                if items.is_empty() {
                    return Node::nil();
                }
                let head = self.eval(&items[0], env);
                let head_node = head.read().clone();
                match head_node {
                    // specials see the raw form, head included
                    Node::Special(f) => f(self, &items, env),
                    Node::Builtin(f) => {
                        let args = self.eval_args(&items, env);
                        // builtins run against a fresh frame with no outer
                        // link; only `eval` ever looks at it
                        let frame = Environment::new().into_ref();
                        f(self, &args, &frame)
                    }
                    Node::Fn { form, env: captured } => {
                        let args = self.eval_args(&items, env);
                        self.apply_fn(&form, &captured, args)
                    }
                    // a head that is no kind of function yields nil
                    _ => Node::nil(),
                }
            }
            _ => form.clone(),
        }
    }

    /// Evaluates the non-head children of a call form, left to right
    fn eval_args(&self, items: &[NodeRef], env: &EnvRef) -> Vec<NodeRef> {
        items[1..].iter().map(|item| self.eval(item, env)).collect()
    }

    /// Applies a callable to already-evaluated arguments.
    ///
    /// Builtins get the arguments and `env` as-is; user functions get a
    /// fresh frame chained onto their captured environment. Anything else
    /// yields nil.
    pub fn apply(&self, func: &NodeRef, args: Vec<NodeRef>, env: &EnvRef) -> NodeRef {
        let node = func.read().clone();
        match node {
            Node::Builtin(f) => f(self, &args, env),
            Node::Fn { form, env: captured } => self.apply_fn(&form, &captured, args),
            _ => Node::nil(),
        }
    }

    /// Applies a user function: binds parameters positionally in a new
    /// frame (missing arguments bind nil, extras are dropped), then
    /// evaluates the body forms in order
    fn apply_fn(&self, form: &[NodeRef], captured: &EnvRef, args: Vec<NodeRef>) -> NodeRef {
        let mut frame = Environment::with_outer(captured.clone());
        if let Some(param_list) = form.get(1) {
            if let Node::List(params) = &*param_list.read() {
                for (i, param) in params.iter().enumerate() {
                    if let Node::Symbol { code, .. } = &*param.read() {
                        let arg = args.get(i).cloned().unwrap_or_else(Node::nil);
                        frame.define(*code, arg);
                    }
                }
            }
        }
        let frame = frame.into_ref();

        let mut result = Node::nil();
        for expr in form.iter().skip(2) {
            result = self.eval(expr, &frame);
        }
        result
    }

    /// Runs the full pipeline over a source buffer: tokenize, read,
    /// compile, then evaluate every form against the global environment.
    /// Returns the value of the last form (nil for an empty buffer).
    pub fn eval_source(&self, source: &str) -> NodeRef {
        let forms = parse(source);
        let compiled = compile_all(&self.macros, &forms);
        let mut result = Node::nil();
        for form in &compiled {
            result = self.eval(form, &self.globals);
        }
        result
    }

    /// Compiles a single form against this kernel's macro table
    pub fn compile(&self, form: &NodeRef) -> NodeRef {
        compile(&self.macros, form)
    }

    /// Reads a file and evaluates it as source, reporting an unreadable
    /// file to stderr
    pub fn import_file(&self, path: &str) {
        match fs::read_to_string(path) {
            Ok(code) => {
                self.eval_source(&code);
            }
            Err(_) => eprintln!("Unable to read file `{}`", path),
        }
    }

    /// Loads `library.paren` from the working directory. A missing or
    /// unreadable prelude is reported to stderr; the kernel stays usable
    /// with builtins only.
    pub fn load_prelude(&self) {
        match fs::read_to_string(PRELUDE_FILE) {
            Ok(code) => {
                self.eval_source(&code);
            }
            Err(_) => eprintln!("Error loading {}", PRELUDE_FILE),
        }
    }

    /// Host accessor: the global binding of `name`, nil when unbound
    pub fn get_global(&self, name: &str) -> NodeRef {
        self.globals.read().get(symbols::to_code(name))
    }

    /// Host accessor: binds `name` in the global environment
    pub fn set_global(&self, name: &str, value: Node) {
        self.globals.write().define(symbols::to_code(name), value.cell());
    }

    /// Names bound in the global environment, sorted (REPL banner)
    pub fn global_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .globals
            .read()
            .codes()
            .into_iter()
            .map(symbols::name_of)
            .collect();
        names.sort();
        names
    }
}

impl Default for Interp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_str(source: &str) -> Node {
        let interp = Interp::new();
        let result = interp.eval_source(source);
        let node = result.read().clone();
        node
    }

    #[test]
    fn test_self_evaluating_atoms() {
        assert_eq!(eval_str("42"), Node::Int(42));
        assert_eq!(eval_str("2.5"), Node::Double(2.5));
        assert_eq!(eval_str("\"s\""), Node::Str("s".to_string()));
        assert_eq!(eval_str("true"), Node::Bool(true));
        assert_eq!(eval_str("false"), Node::Bool(false));
    }

    #[test]
    fn test_unbound_symbol_is_nil() {
        assert_eq!(eval_str("no-such-binding"), Node::Nil);
    }

    #[test]
    fn test_empty_list_evaluates_to_nil() {
        assert_eq!(eval_str("()"), Node::Nil);
    }

    #[test]
    fn test_non_callable_head_is_nil() {
        assert_eq!(eval_str("(1 2 3)"), Node::Nil);
    }

    #[test]
    fn test_last_form_wins() {
        assert_eq!(eval_str("(def x 1) (def y 2) (+ x y)"), Node::Int(3));
    }

    #[test]
    fn test_fn_application_binds_positionally() {
        assert_eq!(eval_str("((fn (a b) (- a b)) 10 4)"), Node::Int(6));
    }

    #[test]
    fn test_fn_missing_args_bind_nil() {
        assert_eq!(eval_str("((fn (a b) b) 1)"), Node::Nil);
    }

    #[test]
    fn test_fn_extra_args_are_dropped() {
        assert_eq!(eval_str("((fn (a) a) 1 2 3)"), Node::Int(1));
    }

    #[test]
    fn test_empty_body_fn_returns_nil() {
        assert_eq!(eval_str("((fn (a)) 1)"), Node::Nil);
    }

    #[test]
    fn test_host_accessors() {
        let interp = Interp::new();
        interp.set_global("host-var", Node::Int(9));
        assert_eq!(*interp.get_global("host-var").read(), Node::Int(9));
        assert_eq!(*interp.eval_source("(+ host-var 1)").read(), Node::Int(10));
    }

    #[test]
    fn test_global_names_contains_builtins() {
        let interp = Interp::new();
        let names = interp.global_names();
        assert!(names.iter().any(|n| n == "+"));
        assert!(names.iter().any(|n| n == "def"));
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
    }
}
