//! Import discovery over a parsed source file

use portico_foundation::{RewriteError, RewriteResult};
use std::path::{Path, PathBuf};
use swc_common::{sync::Lrc, BytePos, FileName, FilePathMapping, SourceMap};
use swc_ecma_ast::{ImportDecl, Module, ModuleDecl, ModuleItem};
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax, TsSyntax};

const BOM: char = '\u{feff}';

/// Literal specifier of one import declaration
///
/// `start..end` covers the quoted literal, quotes included, as UTF-8 byte
/// offsets into the original text. `specifier` is the decoded value, so
/// escapes in the source are already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportToken {
    pub specifier: String,
    pub quote: char,
    pub start: usize,
    pub end: usize,
    /// End of the whole declaration, past its terminator if it has one
    pub statement_end: usize,
}

impl ImportToken {
    /// Relative specifiers start with `.`; everything else is a package import
    pub fn is_relative(&self) -> bool {
        self.specifier.starts_with('.')
    }
}

/// Top-level node kinds the scanner distinguishes
enum TopLevel<'a> {
    Import(&'a ImportDecl),
    Other,
}

impl<'a> From<&'a ModuleItem> for TopLevel<'a> {
    fn from(item: &'a ModuleItem) -> Self {
        match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) => TopLevel::Import(decl),
            _ => TopLevel::Other,
        }
    }
}

/// A file's path, text and AST for the duration of one rewrite
pub struct SourceUnit<'s> {
    path: PathBuf,
    text: &'s str,
    module: Module,
    start_pos: BytePos,
    /// Bytes of a leading BOM, which the parser never sees
    bom_len: usize,
}

impl<'s> SourceUnit<'s> {
    /// Parse `text` as a TypeScript (or JavaScript, by extension) module
    pub fn parse(path: &Path, text: &'s str) -> RewriteResult<Self> {
        let (bom_len, body) = match text.strip_prefix(BOM) {
            Some(rest) => (BOM.len_utf8(), rest),
            None => (0, text),
        };

        let cm: Lrc<SourceMap> = Lrc::new(SourceMap::new(FilePathMapping::empty()));
        let file_name = Lrc::new(FileName::Real(path.to_path_buf()));
        let source_file = cm.new_source_file(file_name, body.to_string());

        let extension = path.extension().and_then(|ext| ext.to_str());
        let syntax = match extension {
            Some("js") | Some("mjs") | Some("cjs") | Some("jsx") => Syntax::Es(Default::default()),
            _ => Syntax::Typescript(TsSyntax {
                tsx: extension == Some("tsx"),
                decorators: true,
                ..Default::default()
            }),
        };

        let lexer = Lexer::new(
            syntax,
            Default::default(),
            StringInput::from(&*source_file),
            None,
        );
        let mut parser = Parser::new_from(lexer);
        let module = parser
            .parse_module()
            .map_err(|e| RewriteError::parse(path, format!("{:?}", e.kind())))?;

        Ok(Self {
            path: path.to_path_buf(),
            text,
            module,
            start_pos: source_file.start_pos,
            bom_len,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &'s str {
        self.text
    }

    /// Import tokens of every top-level import declaration, in document order
    pub fn imports(&self) -> Vec<ImportToken> {
        self.module
            .body
            .iter()
            .filter_map(|item| match TopLevel::from(item) {
                TopLevel::Import(decl) => self.token_for(decl),
                TopLevel::Other => None,
            })
            .collect()
    }

    /// Byte offset into the original text, BOM included
    fn offset(&self, pos: BytePos) -> usize {
        (pos.0 - self.start_pos.0) as usize + self.bom_len
    }

    fn token_for(&self, decl: &ImportDecl) -> Option<ImportToken> {
        let start = self.offset(decl.src.span.lo);
        let end = self.offset(decl.src.span.hi);
        let literal = self.text.get(start..end)?;
        let quote = literal.chars().next().filter(|c| *c == '\'' || *c == '"')?;
        let specifier = decl.src.value.to_atom_lossy();
        let specifier: &str = specifier.as_ref();

        Some(ImportToken {
            specifier: specifier.to_string(),
            quote,
            start,
            end,
            statement_end: self.offset(decl.span.hi).max(end),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scan(source: &str) -> Vec<ImportToken> {
        SourceUnit::parse(Path::new("/ws/a.ts"), source)
            .unwrap()
            .imports()
    }

    #[test]
    fn test_tokens_in_document_order_with_spans() {
        let source = "import { A } from './a';\nimport * as b from \"../b/index\";\n";
        let tokens = scan(source);

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].specifier, "./a");
        assert_eq!(tokens[0].quote, '\'');
        assert_eq!(&source[tokens[0].start..tokens[0].end], "'./a'");
        assert_eq!(tokens[1].specifier, "../b/index");
        assert_eq!(tokens[1].quote, '"');
        assert_eq!(&source[tokens[1].start..tokens[1].end], "\"../b/index\"");
    }

    #[test]
    fn test_side_effect_and_type_imports_are_scanned() {
        let tokens = scan("import './polyfills';\nimport type { T } from '../types';\n");
        let specifiers: Vec<_> = tokens.iter().map(|t| t.specifier.as_str()).collect();
        assert_eq!(specifiers, vec!["./polyfills", "../types"]);
    }

    #[test]
    fn test_non_import_nodes_are_ignored() {
        let source = r#"
export { A } from '../a';
export * from '../b';
const lazy = () => import('../c');
function load() {
    return require('../d');
}
import { E } from '../e';
"#;
        let tokens = scan(source);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].specifier, "../e");
    }

    #[test]
    fn test_spans_are_byte_offsets_after_multibyte_text() {
        let source = "// héllo wörld\nimport { A } from '../a';\n";
        let tokens = scan(source);
        assert_eq!(&source[tokens[0].start..tokens[0].end], "'../a'");
    }

    #[test]
    fn test_leading_bom_keeps_offsets_aligned() {
        let source = "\u{feff}import { A } from '../a';\n";
        let tokens = scan(source);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].specifier, "../a");
        assert_eq!(&source[tokens[0].start..tokens[0].end], "'../a'");
        assert!(tokens[0].statement_end <= source.len());
    }

    #[test]
    fn test_escaped_specifier_is_decoded() {
        let source = r"import { A } from '\x2e\x2e/lib-b/a';";
        let tokens = scan(source);
        assert_eq!(tokens[0].specifier, "../lib-b/a");
        assert!(tokens[0].is_relative());
        assert_eq!(&source[tokens[0].start..tokens[0].end], r"'\x2e\x2e/lib-b/a'");
    }

    #[test]
    fn test_statement_end_covers_import_attributes() {
        let source = "import data from '../data.json' with { type: 'json' };\nconst a = 1;\n";
        let tokens = scan(source);
        assert!(source[tokens[0].end..tokens[0].statement_end].starts_with(" with { type: 'json' }"));
    }

    #[test]
    fn test_decorated_angular_file_parses() {
        let source = r#"import { Component } from '@angular/core';
import { Thing } from '../../lib-b/src/lib/thing';

@Component({ selector: 'app-root', template: '' })
export class AppComponent {
    constructor(private readonly thing: Thing) {}
}
"#;
        let tokens = scan(source);
        assert_eq!(tokens.len(), 2);
        assert!(!tokens[0].is_relative());
        assert!(tokens[1].is_relative());
    }

    #[test]
    fn test_invalid_source_is_parse_error() {
        let err = SourceUnit::parse(Path::new("/ws/a.ts"), "import { A } from ;")
            .err()
            .unwrap();
        assert!(matches!(err, RewriteError::Parse { .. }));
    }
}
