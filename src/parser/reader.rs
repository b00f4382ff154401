use crate::lexer::Tokenizer;
use crate::runtime::value::{double_prefix, int_prefix, Node, NodeRef};

/// Reader over a token stream.
///
/// Builds S-expression trees out of the tokenizer's token strings. Like the
/// tokenizer it is total: surplus closers end the enclosing list (or the
/// whole parse at top level) and malformed atoms degrade to symbols or zero
/// rather than erroring.
pub struct Reader {
    tokens: Vec<String>,
    pos: usize,
}

impl Reader {
    /// Creates a reader over a token list
    pub fn new(tokens: Vec<String>) -> Self {
        Reader { tokens, pos: 0 }
    }

    /// Reads forms until the token stream (or the current list) ends
    pub fn parse(&mut self) -> Vec<NodeRef> {
        let mut forms = Vec::new();
        while self.pos < self.tokens.len() {
            let tok = self.tokens[self.pos].clone();
            // a token opening with a high-bit byte ends the parse
            if tok.as_bytes().first().is_some_and(|b| b & 0x80 != 0) {
                break;
            }
            if let Some(body) = tok.strip_prefix('"') {
                forms.push(Node::Str(body.to_string()).cell());
            } else if tok == "(" {
                self.pos += 1;
                let items = self.parse();
                forms.push(Node::List(items).cell());
            } else if tok == ")" {
                break;
            } else if is_numeric(&tok) {
                if tok.contains('.') || tok.contains('e') {
                    forms.push(Node::Double(double_prefix(&tok)).cell());
                } else {
                    forms.push(Node::Int(int_prefix(&tok)).cell());
                }
            } else {
                forms.push(Node::symbol(&tok).cell());
            }
            self.pos += 1;
        }
        forms
    }
}

/// Numeric atoms start with a digit, or `-` directly followed by one
fn is_numeric(tok: &str) -> bool {
    let bytes = tok.as_bytes();
    match bytes.first() {
        Some(b) if b.is_ascii_digit() => true,
        Some(b'-') => bytes.get(1).is_some_and(|b| b.is_ascii_digit()),
        _ => false,
    }
}

/// Tokenizes and reads a source buffer into its top-level forms
pub fn parse(source: &str) -> Vec<NodeRef> {
    Reader::new(Tokenizer::new(source).tokenize()).parse()
}
