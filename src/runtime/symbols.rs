//! Process-wide symbol interning.
//!
//! Every distinct symbol name gets a dense non-negative code; the table is
//! monotonic and lives for the whole process. The reader interns while
//! parsing and environments key their bindings on the code, so name lookup
//! during evaluation is an integer map probe rather than a string compare.

use std::collections::HashMap;

use lazy_static::lazy_static;
use parking_lot::Mutex;

#[derive(Default)]
struct SymbolTable {
    codes: HashMap<String, usize>,
    names: Vec<String>,
}

lazy_static! {
    static ref SYMBOLS: Mutex<SymbolTable> = Mutex::new(SymbolTable::default());
}

/// Returns the code for `name`, interning it on first sight
pub fn to_code(name: &str) -> usize {
    let mut table = SYMBOLS.lock();
    if let Some(&code) = table.codes.get(name) {
        return code;
    }
    let code = table.names.len();
    table.codes.insert(name.to_string(), code);
    table.names.push(name.to_string());
    code
}

/// Returns the name interned under `code`.
///
/// Codes come from `to_code` and the table never shrinks, so any code a
/// caller legitimately holds resolves; an unknown code yields an empty
/// string.
pub fn name_of(code: usize) -> String {
    let table = SYMBOLS.lock();
    table.names.get(code).cloned().unwrap_or_default()
}
