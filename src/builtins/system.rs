//! Control and host-facing builtins: eval, exit, system, import, join.

use std::process::{self, Command};

use crate::builtins::arg;
use crate::runtime::environment::EnvRef;
use crate::runtime::threading::join_thread;
use crate::runtime::value::{NativeFn, Node, NodeRef};
use crate::runtime::{symbols, Environment, Interp};

/// Register control builtins into the global frame
pub fn register(env: &mut Environment) {
    let mut builtin = |name: &str, f: NativeFn| {
        env.define(symbols::to_code(name), Node::Builtin(f).cell());
    };
    builtin("eval", builtin_eval);
    builtin("exit", builtin_exit);
    builtin("system", builtin_system);
    builtin("import", builtin_import);
    builtin("join", builtin_join);
}

/// (eval X) - evaluate a form. Like every builtin this runs against a
/// fresh frame with no outer link, so only self-contained forms resolve.
fn builtin_eval(interp: &Interp, args: &[NodeRef], env: &EnvRef) -> NodeRef {
    match args.first() {
        Some(form) => interp.eval(form, env),
        None => Node::nil(),
    }
}

/// (exit {X}) - terminate the process with X (default 0)
fn builtin_exit(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    println!();
    let code = args.first().map_or(0, |a| a.read().to_int());
    process::exit(code as i32);
}

/// (system X ..) - run the concatenated command through the shell and
/// return its exit status
fn builtin_system(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    let mut cmd = String::new();
    for operand in args {
        cmd.push_str(&operand.read().to_display());
    }
    let status = shell_command(&cmd).status();
    let code = match status {
        Ok(status) => status.code().unwrap_or(-1),
        Err(_) => -1,
    };
    Node::Int(i64::from(code)).cell()
}

#[cfg(unix)]
fn shell_command(cmd: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(cmd);
    command
}

#[cfg(windows)]
fn shell_command(cmd: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(cmd);
    command
}

/// (import X) - read the file and evaluate it as source
fn builtin_import(interp: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    interp.import_file(&arg(args, 0).to_display());
    Node::nil()
}

/// (join THREAD) - wait for the thread to finish; nil
fn builtin_join(_: &Interp, args: &[NodeRef], _: &EnvRef) -> NodeRef {
    match args.first() {
        Some(handle) => join_thread(handle),
        None => Node::nil(),
    }
}
