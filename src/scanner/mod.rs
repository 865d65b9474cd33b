//! Module statement recognition.
//!
//! Each source line is classified on its own against two grammars: a module
//! declaration (`module foo.bar;`) and an import (`import foo;`,
//! `export import <vector>;`, `import "config.h";`). A grammar only matches
//! when it consumes the whole line once surrounding whitespace is trimmed, so
//! statements that share a line with other code, or span several lines, are
//! treated as ordinary code.
//!
//! Recognition never fails. Lines that look almost like a statement, such as
//! `module foo` without the semicolon, are simply not references.
//!
//! # Examples
//!
//! ```
//! use modscan::scanner::{ReferenceKind, recognize};
//!
//! let reference = recognize("export import <vector>;").expect("angle import");
//! assert_eq!(reference.kind, ReferenceKind::AngleHeader);
//! assert_eq!(reference.name, "vector");
//! assert!(recognize("int importance = 1;").is_none());
//! ```

use std::borrow::Cow;
use std::io::{self, BufRead};

/// Which statement form produced a [`Reference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `module name;`
    ModuleDeclaration,
    /// `import name;`
    NamedImport,
    /// `import "name";`
    QuotedHeader,
    /// `import <name>;`
    AngleHeader,
}

/// A module or header unit named by a recognised statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Statement form the name was taken from.
    pub kind: ReferenceKind,
    /// Captured name, without quotes or angle brackets.
    pub name: String,
}

impl Reference {
    fn new(kind: ReferenceKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_owned(),
        }
    }
}

/// Whitespace as C++ `std::regex` `\s` sees it; ASCII only, including `\v`.
const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

const fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

const fn is_module_name_char(c: char) -> bool {
    is_word_char(c) || c == ':' || c == '.'
}

const fn is_header_name_char(c: char) -> bool {
    is_word_char(c) || c == '.'
}

/// Return `text` when it is a non-empty run of characters accepted by `accept`.
fn whole_token(text: &str, accept: fn(char) -> bool) -> Option<&str> {
    (!text.is_empty() && text.chars().all(accept)).then_some(text)
}

/// Strip `keyword` and the mandatory whitespace that follows it.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let after_keyword = text.strip_prefix(keyword)?;
    let operand = after_keyword.trim_start_matches(is_space);
    (operand.len() < after_keyword.len()).then_some(operand)
}

/// Strip the terminating semicolon and any whitespace before it.
fn strip_terminator(text: &str) -> Option<&str> {
    text.strip_suffix(';')
        .map(|body| body.trim_end_matches(is_space))
}

fn strip_delimiters(text: &str, open: char, close: char) -> Option<&str> {
    text.strip_prefix(open)?.strip_suffix(close)
}

fn module_declaration(statement: &str) -> Option<Reference> {
    let operand = strip_terminator(strip_keyword(statement, "module")?)?;
    whole_token(operand, is_module_name_char)
        .map(|name| Reference::new(ReferenceKind::ModuleDeclaration, name))
}

fn import_statement(statement: &str) -> Option<Reference> {
    let unexported = strip_keyword(statement, "export").unwrap_or(statement);
    let operand = strip_terminator(strip_keyword(unexported, "import")?)?;
    let (kind, name) = if let Some(quoted) = strip_delimiters(operand, '"', '"') {
        (ReferenceKind::QuotedHeader, whole_token(quoted, is_header_name_char)?)
    } else if let Some(angled) = strip_delimiters(operand, '<', '>') {
        (ReferenceKind::AngleHeader, whole_token(angled, is_header_name_char)?)
    } else {
        (
            ReferenceKind::NamedImport,
            whole_token(operand, is_module_name_char)?,
        )
    };
    Some(Reference::new(kind, name))
}

/// Classify a single source line.
///
/// The module declaration grammar is tried first, then the import grammar.
/// Both must match the entire line after trimming surrounding whitespace.
/// Returns `None` for ordinary code.
#[must_use]
pub fn recognize(line: &str) -> Option<Reference> {
    let statement = line.trim_matches(is_space);
    module_declaration(statement).or_else(|| import_statement(statement))
}

/// Streams references out of a line-oriented reader in source order.
///
/// Items carry the 0-based index of the line the reference was found on.
/// Lines are split on `\n`; invalid UTF-8 is decoded lossily, which never
/// affects a match because the replacement character is not a name
/// character. A read error is yielded once and ends the iteration.
#[derive(Debug)]
pub struct Scanner<R> {
    reader: R,
    buf: Vec<u8>,
    next_line: usize,
    finished: bool,
}

impl<R: BufRead> Scanner<R> {
    /// Scan lines from `reader`.
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            next_line: 0,
            finished: false,
        }
    }

    /// Number of lines consumed so far.
    #[must_use]
    pub const fn lines_read(&self) -> usize {
        self.next_line
    }
}

impl<R: BufRead> Iterator for Scanner<R> {
    type Item = io::Result<(usize, Reference)>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.finished = true,
                Ok(_) => {
                    let index = self.next_line;
                    self.next_line += 1;
                    let line: Cow<'_, str> = String::from_utf8_lossy(&self.buf);
                    if let Some(reference) = recognize(&line) {
                        return Some(Ok((index, reference)));
                    }
                }
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}

/// Collect every reference in an in-memory source.
#[must_use]
pub fn scan_str(source: &str) -> Vec<Reference> {
    source.lines().filter_map(recognize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::{Cursor, Read};

    #[rstest]
    #[case("module foo.bar;", ReferenceKind::ModuleDeclaration, "foo.bar")]
    #[case("module M:part;", ReferenceKind::ModuleDeclaration, "M:part")]
    #[case("\tmodule   a ;  ", ReferenceKind::ModuleDeclaration, "a")]
    #[case("import foo;", ReferenceKind::NamedImport, "foo")]
    #[case("  import   foo;  ", ReferenceKind::NamedImport, "foo")]
    #[case("export import foo::bar;", ReferenceKind::NamedImport, "foo::bar")]
    #[case("export import :partition;", ReferenceKind::NamedImport, ":partition")]
    #[case("import \"config.h\";", ReferenceKind::QuotedHeader, "config.h")]
    #[case("import <vector>;", ReferenceKind::AngleHeader, "vector")]
    #[case("export import <vector>;", ReferenceKind::AngleHeader, "vector")]
    #[case("export\timport\t<std.io> ;\r", ReferenceKind::AngleHeader, "std.io")]
    #[case("\x0Bimport\x0Cfoo\x0B;\x0C", ReferenceKind::NamedImport, "foo")]
    #[case("module\x0Bm\x0C;", ReferenceKind::ModuleDeclaration, "m")]
    fn recognizes_statements(
        #[case] line: &str,
        #[case] kind: ReferenceKind,
        #[case] name: &str,
    ) {
        assert_eq!(
            recognize(line),
            Some(Reference::new(kind, name)),
            "line {line:?}"
        );
    }

    #[rstest]
    #[case("int importance = 1;")]
    #[case("import\u{a0}foo;")]
    #[case("\timport\u{85}a;")]
    #[case("\u{3000}module m;")]
    #[case("import foo;\u{2003}")]
    #[case("export\u{a0}import foo;")]
    #[case("module foo")]
    #[case("module;")]
    #[case("modulefoo;")]
    #[case("importfoo;")]
    #[case("import;")]
    #[case("export module foo;")]
    #[case("exportimport foo;")]
    #[case("export foo;")]
    #[case("import foo; import bar;")]
    #[case("int x; import foo;")]
    #[case("import foo bar;")]
    #[case("import \"sys/config.h\";")]
    #[case("import \"config.h;")]
    #[case("import <vec-tor>;")]
    #[case("import <a:b>;")]
    #[case("import \"\";")]
    #[case("import <>;")]
    #[case("module foo;;")]
    #[case("// import foo")]
    #[case("")]
    fn ignores_ordinary_code(#[case] line: &str) {
        assert_eq!(recognize(line), None, "line {line:?}");
    }

    #[test]
    fn non_ascii_word_characters_are_not_names() {
        assert_eq!(recognize("import caf\u{e9};"), None);
    }

    #[test]
    fn scanner_reports_line_indices_in_order() {
        let source = "module M;\nint x;\nimport A;\n\nimport A;\n";
        let found: Vec<_> = Scanner::new(Cursor::new(source))
            .collect::<io::Result<_>>()
            .expect("scan in-memory source");
        assert_eq!(
            found,
            vec![
                (0, Reference::new(ReferenceKind::ModuleDeclaration, "M")),
                (2, Reference::new(ReferenceKind::NamedImport, "A")),
                (4, Reference::new(ReferenceKind::NamedImport, "A")),
            ]
        );
    }

    #[test]
    fn scanner_handles_crlf_and_missing_final_newline() {
        let source = "import a;\r\nimport <b.h>;";
        let mut scanner = Scanner::new(Cursor::new(source));
        let names: Vec<_> = scanner
            .by_ref()
            .map(|item| item.expect("scan").1.name)
            .collect();
        assert_eq!(names, ["a", "b.h"]);
        assert_eq!(scanner.lines_read(), 2);
    }

    #[test]
    fn scanner_tolerates_invalid_utf8_lines() {
        let source: &[u8] = b"// caf\xe9\nimport a;\nimport b\xff;\n";
        let names: Vec<_> = Scanner::new(source)
            .map(|item| item.expect("scan").1.name)
            .collect();
        assert_eq!(names, ["a"]);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn scanner_yields_read_error_once() {
        let mut scanner = Scanner::new(io::BufReader::new(FailingReader));
        let first = scanner.next().expect("an item");
        assert!(first.is_err());
        assert!(scanner.next().is_none());
    }

    #[test]
    fn scan_str_preserves_duplicates() {
        let names: Vec<_> = scan_str("import A;\nimport A;\n")
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["A", "A"]);
    }
}
