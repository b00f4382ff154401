//! Ahead-of-time driver emitter.
//!
//! The AOT path performs no language analysis: it lowers a source file into
//! a tiny LLVM IR module whose `main` initializes the kernel, imports each
//! requested file and hands the embedded source text to
//! `paren_eval_string`. The module text either goes out as-is
//! (`--emit-llvm`) or through `llc` for assembly and object output.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, Result};

/// Output kind of the AOT path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// Textual LLVM IR
    LlvmIr,
    /// Target assembly via `llc`
    Asm,
    /// Object file via `llc`
    Object,
}

impl Emission {
    /// Default file extension for this kind
    pub fn extension(self) -> &'static str {
        match self {
            Emission::LlvmIr => "ll",
            Emission::Asm => "s",
            Emission::Object => "o",
        }
    }
}

/// Lowers a source buffer into the driver module text.
///
/// `imports` are the paths handed to `paren_import`, in order, before the
/// source itself is evaluated.
pub fn emit_driver(source: &str, imports: &[String], module_name: &str) -> String {
    let mut globals = Vec::new();
    let mut calls = vec!["  call void @paren_init()".to_string()];

    for (i, import) in imports.iter().enumerate() {
        let name = format!("@.imp.{}", i);
        globals.push(global_string(&name, import));
        calls.push(format!("  call void @paren_import(ptr {})", name));
    }
    globals.push(global_string("@.src", source));
    calls.push("  call void @paren_eval_string(ptr @.src)".to_string());

    let mut out = String::new();
    out.push_str(&format!("; paren driver for {}\n", module_name));
    out.push_str(&format!("source_filename = \"{}\"\n\n", module_name));
    for global in &globals {
        out.push_str(global);
        out.push('\n');
    }
    out.push('\n');
    out.push_str("declare void @paren_init()\n");
    out.push_str("declare void @paren_eval_string(ptr)\n");
    out.push_str("declare void @paren_import(ptr)\n\n");
    out.push_str("define i32 @main() {\n");
    out.push_str("entry:\n");
    for call in &calls {
        out.push_str(call);
        out.push('\n');
    }
    out.push_str("  ret i32 0\n");
    out.push_str("}\n");
    out
}

/// One nul-terminated private string constant
fn global_string(name: &str, text: &str) -> String {
    let bytes = text.as_bytes();
    format!(
        "{} = private unnamed_addr constant [{} x i8] c\"{}\\00\"",
        name,
        bytes.len() + 1,
        escape_bytes(bytes)
    )
}

/// LLVM string-constant escaping: printable ASCII stays, everything else
/// becomes a two-digit hex escape
fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'"' | b'\\' => out.push_str(&format!("\\{:02X}", b)),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\{:02X}", b)),
        }
    }
    out
}

/// Writes the module in the requested form. `output` of `-` goes to
/// stdout; a missing `output` derives `input` with the kind's extension.
pub fn write_module(
    ir: &str,
    emission: Emission,
    output: Option<&Path>,
    input: &Path,
) -> Result<()> {
    let to_stdout = output.is_some_and(|p| p == Path::new("-"));
    let output: PathBuf = match output {
        Some(path) if !to_stdout => path.to_path_buf(),
        _ => input.with_extension(emission.extension()),
    };

    match emission {
        Emission::LlvmIr => {
            if to_stdout {
                print!("{}", ir);
                return Ok(());
            }
            std::fs::write(&output, ir).map_err(|source| Error::FileWrite {
                path: output.clone(),
                source,
            })
        }
        Emission::Asm | Emission::Object => {
            let filetype = if emission == Emission::Asm { "asm" } else { "obj" };
            let out_arg: &Path = if to_stdout { Path::new("-") } else { &output };
            run_llc(ir, filetype, out_arg)
        }
    }
}

/// Pipes the module text through `llc`
fn run_llc(ir: &str, filetype: &str, output: &Path) -> Result<()> {
    let toolchain_err = |reason: String| Error::Toolchain {
        tool: "llc".to_string(),
        reason,
    };

    let mut child = Command::new("llc")
        .arg("-")
        .arg(format!("--filetype={}", filetype))
        .arg("-o")
        .arg(output)
        .stdin(Stdio::piped())
        .spawn()
        .map_err(|e| toolchain_err(e.to_string()))?;

    child
        .stdin
        .take()
        .expect("stdin was piped")
        .write_all(ir.as_bytes())
        .map_err(|e| toolchain_err(e.to_string()))?;

    let status = child.wait().map_err(|e| toolchain_err(e.to_string()))?;
    if !status.success() {
        return Err(toolchain_err(format!("exited with {}", status)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_emit_driver_without_imports() {
        let ir = emit_driver("(prn 1)", &[], "demo.paren");
        let expected = r#"; paren driver for demo.paren
source_filename = "demo.paren"

@.src = private unnamed_addr constant [8 x i8] c"(prn 1)\00"

declare void @paren_init()
declare void @paren_eval_string(ptr)
declare void @paren_import(ptr)

define i32 @main() {
entry:
  call void @paren_init()
  call void @paren_eval_string(ptr @.src)
  ret i32 0
}
"#;
        assert_eq!(ir, expected);
    }

    #[test]
    fn test_emit_driver_with_imports() {
        let imports = vec!["/lib/a.paren".to_string(), "/lib/b.paren".to_string()];
        let ir = emit_driver("x", &imports, "m");
        assert!(ir.contains("@.imp.0 = private unnamed_addr constant [13 x i8] c\"/lib/a.paren\\00\""));
        assert!(ir.contains("  call void @paren_import(ptr @.imp.0)"));
        assert!(ir.contains("  call void @paren_import(ptr @.imp.1)"));
        // imports run before the source
        let import_pos = ir.find("@paren_import(ptr @.imp.1)").unwrap();
        let eval_pos = ir.find("@paren_eval_string").unwrap();
        assert!(import_pos < eval_pos);
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(escape_bytes(b"ab"), "ab");
        assert_eq!(escape_bytes(b"a\"b"), "a\\22b");
        assert_eq!(escape_bytes(b"a\\b"), "a\\5Cb");
        assert_eq!(escape_bytes(b"a\nb"), "a\\0Ab");
    }

    #[test]
    fn test_newlines_in_source_are_escaped() {
        let ir = emit_driver("(prn 1)\n(prn 2)", &[], "m");
        assert!(ir.contains("c\"(prn 1)\\0A(prn 2)\\00\""));
    }

    #[test]
    fn test_emission_extensions() {
        assert_eq!(Emission::LlvmIr.extension(), "ll");
        assert_eq!(Emission::Asm.extension(), "s");
        assert_eq!(Emission::Object.extension(), "o");
    }
}
