//! Import extraction using tree-sitter for JavaScript/TypeScript.
//!
//! This module parses source files and returns every module specifier they
//! reference through `import`, `export ... from`, `require()` or `import()`.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tree_sitter::{Language, Node, Parser, Tree, TreeCursor};

use super::builtins::is_builtin;

/// Errors that can occur during import analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse file: {}", path.display())]
    ParseError { path: PathBuf },

    #[error("Syntax error in {} at line {line}", path.display())]
    SyntaxError { path: PathBuf, line: usize },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Tree-sitter language initialization failed")]
    LanguageInit,
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// The kind of import statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// ES6 import statement: `import ... from 'module'`
    ES6,
    /// Re-export: `export { x } from 'module'`, `export * from 'module'`
    ReExport,
    /// CommonJS require: `const x = require('module')`
    CommonJS,
    /// Dynamic import: `import('module')`
    DynamicImport,
}

/// A single module reference found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// The module specifier (e.g., "react", "./utils", "@scope/package/sub")
    pub source: String,
    /// The kind of import
    pub kind: ImportKind,
    /// Line number in the source file (1-indexed)
    pub line: usize,
}

impl Import {
    pub fn new(source: impl Into<String>, kind: ImportKind, line: usize) -> Self {
        Self {
            source: source.into(),
            kind,
            line,
        }
    }

    /// Returns true if the specifier points into the local file tree.
    pub fn is_relative(&self) -> bool {
        self.source.starts_with('.') || self.source.starts_with('/')
    }

    /// Returns the package name for bare specifiers, or `None` for relative
    /// paths and Node built-ins.
    pub fn package_name(&self) -> Option<&str> {
        if self.is_relative() {
            return None;
        }
        package_name(&self.source).filter(|name| !is_builtin(name))
    }
}

/// Reduces a bare specifier to its package name.
///
/// `lodash/fp` becomes `lodash`, `@scope/pkg/sub` becomes `@scope/pkg`.
/// Returns `None` for an empty specifier or a bare scope.
///
/// ```
/// use checkdeps::analysis::package_name;
///
/// assert_eq!(package_name("lodash/debounce"), Some("lodash"));
/// assert_eq!(package_name("@tanstack/react-query/devtools"), Some("@tanstack/react-query"));
/// assert_eq!(package_name("@scope"), None);
/// ```
pub fn package_name(specifier: &str) -> Option<&str> {
    let mut segments = specifier.splitn(3, '/');
    let first = segments.next().filter(|s| !s.is_empty())?;

    if first.starts_with('@') {
        let second = segments.next().filter(|s| !s.is_empty())?;
        Some(&specifier[..first.len() + 1 + second.len()])
    } else {
        Some(first)
    }
}

/// Language type for file analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    Tsx,
    Jsx,
}

impl SourceLanguage {
    /// Determine language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
            "jsx" => Some(SourceLanguage::Jsx),
            "ts" | "mts" | "cts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            _ => None,
        }
    }

    /// Determine language from a file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Get tree-sitter language for this source language.
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            SourceLanguage::JavaScript | SourceLanguage::Jsx => {
                tree_sitter_javascript::LANGUAGE.into()
            }
            SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SourceLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Analyzer for extracting imports from JavaScript/TypeScript source files.
pub struct ImportAnalyzer {
    js_parser: Parser,
    ts_parser: Parser,
    tsx_parser: Parser,
}

impl ImportAnalyzer {
    /// Create a new ImportAnalyzer.
    pub fn new() -> AnalysisResult<Self> {
        Ok(Self {
            js_parser: Self::parser_for(SourceLanguage::JavaScript)?,
            ts_parser: Self::parser_for(SourceLanguage::TypeScript)?,
            tsx_parser: Self::parser_for(SourceLanguage::Tsx)?,
        })
    }

    fn parser_for(language: SourceLanguage) -> AnalysisResult<Parser> {
        let mut parser = Parser::new();
        parser
            .set_language(&language.tree_sitter_language())
            .map_err(|_| AnalysisError::LanguageInit)?;
        Ok(parser)
    }

    /// Analyze a single file and extract all imports.
    pub fn analyze_file(&mut self, path: &Path) -> AnalysisResult<Vec<Import>> {
        let language = SourceLanguage::from_path(path).ok_or_else(|| {
            AnalysisError::UnsupportedFileType(path.display().to_string())
        })?;

        let content = fs::read_to_string(path).map_err(|source| AnalysisError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.analyze_source(&content, language, path)
    }

    /// Analyze source code directly.
    ///
    /// A file that does not parse cleanly is an error: an import hidden
    /// behind a syntax error would otherwise go unnoticed.
    pub fn analyze_source(
        &mut self,
        source: &str,
        language: SourceLanguage,
        path: &Path,
    ) -> AnalysisResult<Vec<Import>> {
        let parser = match language {
            SourceLanguage::JavaScript | SourceLanguage::Jsx => &mut self.js_parser,
            SourceLanguage::TypeScript => &mut self.ts_parser,
            SourceLanguage::Tsx => &mut self.tsx_parser,
        };

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::ParseError {
                path: path.to_path_buf(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(AnalysisError::SyntaxError {
                path: path.to_path_buf(),
                line: first_error_line(root),
            });
        }

        Ok(extract_imports(&tree, source))
    }
}

/// Extract imports from a parsed tree.
fn extract_imports(tree: &Tree, source: &str) -> Vec<Import> {
    let mut imports = Vec::new();
    let mut cursor = tree.root_node().walk();
    visit_node(&mut cursor, source, &mut imports);
    imports
}

/// Recursively visit nodes to find imports.
fn visit_node(cursor: &mut TreeCursor, source: &str, imports: &mut Vec<Import>) {
    let node = cursor.node();

    let found = match node.kind() {
        "import_statement" => statement_source(&node, source, ImportKind::ES6),
        "export_statement" => statement_source(&node, source, ImportKind::ReExport),
        "import_require_clause" => statement_source(&node, source, ImportKind::CommonJS),
        "call_expression" => call_source(&node, source),
        _ => None,
    };
    imports.extend(found);

    if cursor.goto_first_child() {
        loop {
            visit_node(cursor, source, imports);
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }
}

/// The module specifier of an `import`/`export ... from` statement.
fn statement_source(node: &Node, source: &str, kind: ImportKind) -> Option<Import> {
    // `export const x = 1` has no source.
    let string = node.child_by_field_name("source")?;
    let specifier = string_value(&string, source)?;
    Some(Import::new(specifier, kind, node.start_position().row + 1))
}

/// Parse require() calls or dynamic import().
fn call_source(node: &Node, source: &str) -> Option<Import> {
    let func_node = node.child_by_field_name("function")?;
    let kind = match func_node.kind() {
        "import" => ImportKind::DynamicImport,
        "identifier" if node_text(&func_node, source) == Some("require") => ImportKind::CommonJS,
        _ => return None,
    };

    let args_node = node.child_by_field_name("arguments")?;
    let mut args_cursor = args_node.walk();
    let first_arg = args_node.named_children(&mut args_cursor).next()?;
    if first_arg.kind() != "string" {
        return None;
    }

    let specifier = string_value(&first_arg, source)?;
    Some(Import::new(specifier, kind, node.start_position().row + 1))
}

/// Extract the text content of a node.
fn node_text<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

/// Extract string value (removes quotes).
fn string_value(node: &Node, source: &str) -> Option<String> {
    let text = node_text(node, source)?;
    let trimmed = text
        .trim_start_matches(['"', '\''])
        .trim_end_matches(['"', '\'']);
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// Line (1-indexed) of the first error or missing node in the tree.
fn first_error_line(root: Node<'_>) -> usize {
    let mut cursor = root.walk();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return node.start_position().row + 1;
        }
        if node.has_error() {
            let mut children: Vec<_> = node.children(&mut cursor).collect();
            children.reverse();
            stack.extend(children);
        }
    }
    root.start_position().row + 1
}

/// Analyze a single file and return its imports.
pub fn analyze_file(path: &Path) -> AnalysisResult<Vec<Import>> {
    let mut analyzer = ImportAnalyzer::new()?;
    analyzer.analyze_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_source(source: &str) -> Vec<Import> {
        let mut analyzer = ImportAnalyzer::new().unwrap();
        analyzer
            .analyze_source(source, SourceLanguage::JavaScript, Path::new("test.js"))
            .unwrap()
    }

    fn parse_ts_source(source: &str) -> Vec<Import> {
        let mut analyzer = ImportAnalyzer::new().unwrap();
        analyzer
            .analyze_source(source, SourceLanguage::TypeScript, Path::new("test.ts"))
            .unwrap()
    }

    fn sources(imports: &[Import]) -> Vec<&str> {
        imports.iter().map(|i| i.source.as_str()).collect()
    }

    // ===== ES6 Import Tests =====

    #[test]
    fn test_default_import() {
        let imports = parse_source(r#"import React from 'react';"#);

        assert_eq!(imports, vec![Import::new("react", ImportKind::ES6, 1)]);
    }

    #[test]
    fn test_named_and_namespace_imports() {
        let source = r#"
import { useState, useEffect } from "react";
import * as path from 'path';
"#;
        let imports = parse_source(source);

        assert_eq!(sources(&imports), vec!["react", "path"]);
        assert_eq!(imports[0].line, 2);
    }

    #[test]
    fn test_side_effect_import() {
        let imports = parse_source(r#"import './styles.css';"#);

        assert_eq!(sources(&imports), vec!["./styles.css"]);
        assert!(imports[0].is_relative());
    }

    #[test]
    fn test_re_exports() {
        let source = r#"
export * from 'lodash';
export { default as chalk } from 'chalk';
export const local = 1;
"#;
        let imports = parse_source(source);

        assert_eq!(sources(&imports), vec!["lodash", "chalk"]);
        assert!(imports.iter().all(|i| i.kind == ImportKind::ReExport));
    }

    // ===== CommonJS Tests =====

    #[test]
    fn test_require_simple() {
        let imports = parse_source(r#"const React = require('react');"#);

        assert_eq!(imports, vec![Import::new("react", ImportKind::CommonJS, 1)]);
    }

    #[test]
    fn test_require_without_assignment() {
        let imports = parse_source(r#"require('./polyfills');"#);

        assert_eq!(sources(&imports), vec!["./polyfills"]);
    }

    #[test]
    fn test_require_with_expression_is_ignored() {
        let imports = parse_source(r#"const name = 'x'; const m = require(name);"#);

        assert!(imports.is_empty());
    }

    #[test]
    fn test_require_resolve_is_not_an_import() {
        let imports = parse_source(r#"const p = require.resolve('webpack');"#);

        assert!(imports.is_empty());
    }

    #[test]
    fn test_nested_require() {
        let source = r#"
function load() {
    if (process.env.DEBUG) {
        return require('debug')('app');
    }
}
"#;
        assert_eq!(sources(&parse_source(source)), vec!["debug"]);
    }

    // ===== Dynamic Import Tests =====

    #[test]
    fn test_dynamic_import() {
        let source = r#"async function f() { const module = await import('lodash'); }"#;
        let imports = parse_source(source);

        assert_eq!(sources(&imports), vec!["lodash"]);
        assert_eq!(imports[0].kind, ImportKind::DynamicImport);
    }

    // ===== JSX / TypeScript Tests =====

    #[test]
    fn test_jsx_source() {
        let source = r#"
import React from 'react';
const App = () => <div className="app">hi</div>;
"#;
        assert_eq!(sources(&parse_source(source)), vec!["react"]);
    }

    #[test]
    fn test_typescript_type_import() {
        let imports = parse_ts_source(r#"import type { FC } from 'react';"#);

        assert_eq!(sources(&imports), vec!["react"]);
    }

    #[test]
    fn test_typescript_import_equals_require() {
        let imports = parse_ts_source(r#"import fs = require('fs-extra');"#);

        assert_eq!(sources(&imports), vec!["fs-extra"]);
        assert_eq!(imports[0].kind, ImportKind::CommonJS);
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let mut analyzer = ImportAnalyzer::new().unwrap();
        let result = analyzer.analyze_source(
            "const = require('x';\n",
            SourceLanguage::JavaScript,
            Path::new("broken.js"),
        );

        assert!(matches!(
            result,
            Err(AnalysisError::SyntaxError { line: 1, .. })
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let mut analyzer = ImportAnalyzer::new().unwrap();
        let result = analyzer.analyze_file(Path::new("README.md"));

        assert!(matches!(result, Err(AnalysisError::UnsupportedFileType(_))));
    }

    // ===== Package Name Tests =====

    #[test]
    fn test_package_name_simple() {
        assert_eq!(package_name("react"), Some("react"));
        assert_eq!(package_name("lodash/debounce"), Some("lodash"));
    }

    #[test]
    fn test_package_name_scoped() {
        assert_eq!(package_name("@tanstack/react-query"), Some("@tanstack/react-query"));
        assert_eq!(
            package_name("@tanstack/react-query/devtools"),
            Some("@tanstack/react-query")
        );
        assert_eq!(package_name("@tanstack"), None);
        assert_eq!(package_name(""), None);
    }

    #[test]
    fn test_import_package_name_skips_relative_and_builtins() {
        assert_eq!(Import::new("./utils", ImportKind::ES6, 1).package_name(), None);
        assert_eq!(Import::new("/abs/path", ImportKind::ES6, 1).package_name(), None);
        assert_eq!(Import::new("fs", ImportKind::CommonJS, 1).package_name(), None);
        assert_eq!(Import::new("node:path", ImportKind::ES6, 1).package_name(), None);
        assert_eq!(Import::new("fs/promises", ImportKind::ES6, 1).package_name(), None);
        assert_eq!(
            Import::new("lodash/fp", ImportKind::ES6, 1).package_name(),
            Some("lodash")
        );
    }
}
