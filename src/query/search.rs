// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Free-text search compilation.
//!
//! A query string such as `"red shoes" small` becomes the filter
//!
//! ```text
//! (name ~ "red shoes" OR description ~ "red shoes")
//!     AND (name ~ "small" OR description ~ "small")
//! ```
//!
//! where `~` is a case-insensitive substring match. This module only builds
//! the expression; the storage layer evaluates it.

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Search compilation errors. Both are caller bugs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("field `{0}` is not searchable")]
    FieldNotAllowed(String),

    #[error("at least one search field is required")]
    NoFields,
}

/// One unit of a query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum SearchTerm {
    /// Contents of a double-quoted run, whitespace collapsed
    Phrase(String),
    /// A whitespace-delimited run
    Word(String),
}

impl SearchTerm {
    pub fn text(&self) -> &str {
        match self {
            SearchTerm::Phrase(text) | SearchTerm::Word(text) => text,
        }
    }
}

/// Split a query string into terms, in order of appearance.
///
/// A `"` opens a phrase only if a closing `"` follows with at least one
/// character in between; otherwise the quote is part of an ordinary word.
pub fn tokenize(query: &str) -> Vec<SearchTerm> {
    let mut terms = Vec::new();
    let mut rest = query;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if let Some(quoted) = rest.strip_prefix('"') {
            if let Some(end) = quoted.find('"').filter(|&end| end > 0) {
                let phrase = collapse_whitespace(&quoted[..end]);
                if !phrase.is_empty() {
                    terms.push(SearchTerm::Phrase(phrase));
                }
                rest = &quoted[end + 1..];
                continue;
            }
        }

        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        terms.push(SearchTerm::Word(rest[..end].to_string()));
        rest = &rest[end..];
    }

    terms
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// How a predicate compares a field with its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOp {
    /// Case-insensitive substring match
    ContainsIgnoreCase,
}

/// `field <op> value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldPredicate {
    pub field: String,
    pub op: MatchOp,
    pub value: String,
}

/// A term matched against every search field: OR of predicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnyOf {
    pub term: SearchTerm,
    pub predicates: Vec<FieldPredicate>,
}

/// AND of per-term disjunctions. No clauses means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompiledFilter {
    pub clauses: Vec<AnyOf>,
}

impl CompiledFilter {
    /// The always-true filter.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Compiles query strings against a fixed allow-list of fields.
#[derive(Debug, Clone)]
pub struct SearchCompiler {
    allowed_fields: Vec<String>,
}

impl SearchCompiler {
    /// Create a compiler for the given fields. Order is preserved and
    /// duplicates are dropped.
    pub fn new<I, S>(allowed_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields: Vec<String> = Vec::new();
        for field in allowed_fields {
            let field = field.into();
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        Self {
            allowed_fields: fields,
        }
    }

    pub fn allowed_fields(&self) -> &[String] {
        &self.allowed_fields
    }

    /// Compile `query` against `fields`, each of which must be allow-listed.
    pub fn compile<S: AsRef<str>>(&self, query: &str, fields: &[S]) -> Result<CompiledFilter, SearchError> {
        let mut selected: Vec<&str> = Vec::with_capacity(fields.len());
        for field in fields {
            let field: &str = field.as_ref();
            if !self.allowed_fields.iter().any(|allowed| allowed == field) {
                return Err(SearchError::FieldNotAllowed(field.to_string()));
            }
            if !selected.contains(&field) {
                selected.push(field);
            }
        }
        if selected.is_empty() {
            return Err(SearchError::NoFields);
        }

        let clauses = tokenize(query)
            .into_iter()
            .map(|term| {
                let predicates = selected
                    .iter()
                    .map(|field| FieldPredicate {
                        field: field.to_string(),
                        op: MatchOp::ContainsIgnoreCase,
                        value: term.text().to_string(),
                    })
                    .collect();
                AnyOf { term, predicates }
            })
            .collect();

        Ok(CompiledFilter { clauses })
    }

    /// Compile `query` against every allow-listed field.
    pub fn compile_all(&self, query: &str) -> Result<CompiledFilter, SearchError> {
        self.compile(query, self.allowed_fields.as_slice())
    }
}

/// Raw search parameters from a query string.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Free-text query; quote phrases with `"`
    pub search: Option<String>,
    /// Comma-separated fields to search (defaults to all searchable fields)
    pub fields: Option<String>,
}

impl SearchQuery {
    /// Requested fields, or `None` to search all of them.
    pub fn requested_fields(&self) -> Option<Vec<&str>> {
        let fields: Vec<&str> = self
            .fields
            .as_deref()?
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();
        Some(fields)
    }

    /// Compile these parameters with `compiler`.
    pub fn compile(&self, compiler: &SearchCompiler) -> Result<CompiledFilter, SearchError> {
        let query = self.search.as_deref().unwrap_or("");
        match self.requested_fields() {
            Some(fields) => compiler.compile(query, &fields),
            None => compiler.compile_all(query),
        }
    }
}
