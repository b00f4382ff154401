//! I/O builtins and the slurp/spit file helpers.

use std::fs;
use std::io::{self, BufRead, Write};

use crate::builtins::arg;
use crate::runtime::environment::EnvRef;
use crate::runtime::value::{NativeFn, Node, NodeRef};
use crate::runtime::{symbols, Environment, Interp};

/// Register I/O builtins into the global frame
pub fn register(env: &mut Environment) {
    let mut builtin = |name: &str, f: NativeFn| {
        env.define(symbols::to_code(name), Node::Builtin(f).cell());
    };
    builtin("pr", builtin_pr);
    builtin("prn", builtin_prn);
    builtin("read-line", builtin_read_line);
    builtin("slurp", builtin_slurp);
    builtin("spit", builtin_spit);
}

/// Reads a whole file into a string
pub fn slurp(path: &str) -> Option<String> {
    fs::read_to_string(path).ok()
}

/// Writes a string to a file; the byte count written, or -1 on failure
pub fn spit(path: &str, content: &str) -> i64 {
    match fs::write(path, content) {
        Ok(()) => content.len() as i64,
        Err(_) => -1,
    }
}

/// (pr X ..) - printed forms, space-separated, no newline
fn builtin_pr(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    let line = args
        .iter()
        .map(|a| a.read().to_display())
        .collect::<Vec<_>>()
        .join(" ");
    print!("{}", line);
    io::stdout().flush().ok();
    Node::nil()
}

/// (prn X ..) - like `pr` with a trailing newline
fn builtin_prn(interp: &Interp, args: &[NodeRef], env: &EnvRef) -> NodeRef {
    builtin_pr(interp, args, env);
    println!();
    Node::nil()
}

/// (read-line) - one line from stdin without its terminator; nil at EOF
fn builtin_read_line(_: &Interp, _: &[NodeRef], _: &EnvRef) -> NodeRef {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => Node::nil(),
        Ok(_) => {
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }
            Node::Str(line).cell()
        }
    }
}

/// (slurp FILENAME) - file contents as a string, nil on failure
fn builtin_slurp(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    match slurp(&arg(args, 0).to_display()) {
        Some(contents) => Node::Str(contents).cell(),
        None => Node::nil(),
    }
}

/// (spit FILENAME STRING) - bytes written, or -1 on failure
fn builtin_spit(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    let path = arg(args, 0).to_display();
    let content = arg(args, 1).to_display();
    Node::Int(spit(&path, &content)).cell()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spit_then_slurp_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("io-round-trip.txt");
        let path = path.to_str().unwrap();

        assert_eq!(spit(path, "hello\nworld"), 11);
        assert_eq!(slurp(path).unwrap(), "hello\nworld");
    }

    #[test]
    fn test_slurp_missing_file_is_none() {
        assert!(slurp("/no/such/file/anywhere.paren").is_none());
    }

    #[test]
    fn test_spit_unwritable_path_is_minus_one() {
        assert_eq!(spit("/no/such/dir/out.txt", "x"), -1);
    }

    #[test]
    fn test_builtin_spit_and_slurp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("via-script.txt");
        let path = path.to_str().unwrap();

        let interp = Interp::new();
        let wrote = interp.eval_source(&format!("(spit \"{}\" \"abc\")", path));
        assert_eq!(*wrote.read(), Node::Int(3));
        let read = interp.eval_source(&format!("(slurp \"{}\")", path));
        assert_eq!(*read.read(), Node::Str("abc".to_string()));
        let missing = interp.eval_source("(slurp \"definitely-not-here.txt\")");
        assert_eq!(*missing.read(), Node::Nil);
    }
}
