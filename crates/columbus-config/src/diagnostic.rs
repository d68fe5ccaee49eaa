// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Every problem found while loading `columbus.toml` becomes a [`ConfigError`]
//! rendered by miette. Misspelled keys and mode ids carry a "did you mean"
//! hint, and errors that can be traced to a file point at the offending line.

#![allow(unused_assignments)] // emitted by miette's Diagnostic derive

use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a candidate must beat to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no Columbus setting uses.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(columbus::config::unknown_key),
        help("{}", did_you_mean(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// Dotted path, e.g. `api.base_ulr`.
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a Columbus setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(columbus::config::wrong_type), help("expected {expected}"))]
    WrongType {
        key: String,
        found: String,
        expected: String,
        #[label("wrong type")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(columbus::config::missing_key),
        help("every [[session.modes]] entry needs `id` and `name`")
    )]
    MissingKey { key: String },

    /// A mode id that is not in the mode catalog.
    #[error("unknown mode `{mode}` in {key}")]
    #[diagnostic(
        code(columbus::config::unknown_mode),
        help("{}", did_you_mean(suggestion.as_deref(), known))
    )]
    UnknownMode {
        /// Where the id came from: a dotted key or a command-line flag.
        key: String,
        mode: String,
        suggestion: Option<String>,
        known: String,
        #[label("not in session.modes")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that parsed but is not acceptable.
    #[error("invalid `{key}`: {message}")]
    #[diagnostic(code(columbus::config::invalid_value))]
    Invalid {
        key: String,
        message: String,
        #[label("here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("configuration error: {0}")]
    #[diagnostic(code(columbus::config::other))]
    Other(String),
}

fn did_you_mean(suggestion: Option<&str>, options: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? options: {options}"),
        None => format!("options: {options}"),
    }
}

impl ConfigError {
    /// An unacceptable value at `key`.
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.into(),
            message: message.into(),
            span: None,
            src: None,
        }
    }

    /// `mode` was requested through `key` but the catalog only has `known`.
    pub fn unknown_mode<'a>(
        key: impl Into<String>,
        mode: &str,
        known: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let known: Vec<&str> = known.into_iter().collect();
        ConfigError::UnknownMode {
            key: key.into(),
            mode: mode.to_string(),
            suggestion: closest_match(mode, known.iter().copied()),
            known: known.join(", "),
            span: None,
            src: None,
        }
    }

    /// The source label of this error, if it has been located.
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            ConfigError::UnknownKey { span, .. }
            | ConfigError::WrongType { span, .. }
            | ConfigError::UnknownMode { span, .. }
            | ConfigError::Invalid { span, .. } => *span,
            ConfigError::MissingKey { .. } | ConfigError::Other(_) => None,
        }
    }

    /// Points a validation error at its key in `sources`, if it appears there.
    fn locate_in(&mut self, sources: &SourceSet) {
        let (key, span, src) = match self {
            ConfigError::UnknownMode { key, span, src, .. }
            | ConfigError::Invalid { key, span, src, .. } => (key, span, src),
            _ => return,
        };
        if span.is_none()
            && let Some((found_span, found_src)) = sources.find(None, key)
        {
            *span = Some(found_span);
            *src = Some(found_src);
        }
    }
}

/// The TOML texts a configuration was loaded from, highest precedence first.
#[derive(Debug, Clone, Default)]
pub struct SourceSet {
    files: Vec<(String, String)>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single unnamed TOML text.
    pub fn inline(content: &str) -> Self {
        let mut set = Self::new();
        set.push("<inline>", content);
        set
    }

    pub fn push(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.files.push((name.into(), content.into()));
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Finds `dotted_key` in the file named `origin`, or in every file when
    /// `origin` is `None` or names no file of the set.
    fn find(
        &self,
        origin: Option<&str>,
        dotted_key: &str,
    ) -> Option<(SourceSpan, NamedSource<String>)> {
        let (table, field) = dotted_key.rsplit_once('.').unwrap_or(("", dotted_key));
        let pinned = origin.filter(|o| self.files.iter().any(|(name, _)| name.as_str() == *o));
        self.files
            .iter()
            .filter(|(name, _)| pinned.is_none_or(|o| o == name.as_str()))
            .find_map(|(name, content)| {
                let (offset, len) = key_offset(content, table, field)?;
                Some((
                    SourceSpan::new(offset.into(), len),
                    NamedSource::new(name, content.clone()),
                ))
            })
    }
}

/// Byte offset and length of `field` inside the TOML table `table`
/// (`""` for the root table).
///
/// Matches `field = ...` lines while tracking the current `[table]` or
/// `[[table]]` header, and also a header that names `table.field` itself.
pub fn key_offset(content: &str, table: &str, field: &str) -> Option<(usize, usize)> {
    let qualified = if table.is_empty() {
        field.to_string()
    } else {
        format!("{table}.{field}")
    };

    let mut current = String::new();
    let mut start = 0;
    for line in content.split_inclusive('\n') {
        let line_start = start;
        start += line.len();

        let body = line.trim_start();
        if body.starts_with('[') {
            let name = body
                .trim_start_matches('[')
                .split(']')
                .next()
                .unwrap_or_default()
                .trim();
            if name == qualified {
                let at = line.find(name).unwrap_or_default();
                return Some((line_start + at, name.len()));
            }
            current = name.to_string();
            continue;
        }

        if current != table {
            continue;
        }
        if let Some((key, _)) = body.split_once('=')
            && key.trim().trim_matches('"') == field
        {
            let indent = line.len() - body.len();
            return Some((line_start + indent, field.len()));
        }
    }

    None
}

/// The candidate most similar to `input`, if any is similar enough.
pub fn closest_match<'a>(
    input: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    candidates
        .into_iter()
        .map(|candidate| (strsim::jaro_winkler(input, candidate), candidate))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, candidate)| candidate.to_string())
}

/// Converts every error held by a `figment::Error` into a diagnostic.
pub fn from_figment(err: figment::Error, sources: &SourceSet) -> Vec<ConfigError> {
    err.into_iter().map(|error| convert(error, sources)).collect()
}

fn convert(error: figment::Error, sources: &SourceSet) -> ConfigError {
    use figment::error::Kind;

    let origin = match error.metadata.as_ref().and_then(|m| m.source.as_ref()) {
        Some(figment::Source::File(path)) => Some(path.display().to_string()),
        _ => None,
    };
    let path = error.path.join(".");

    match &error.kind {
        Kind::UnknownField(field, expected) => {
            let key = if path.is_empty() {
                field.clone()
            } else {
                format!("{path}.{field}")
            };
            let (span, src) = sources.find(origin.as_deref(), &key).unzip();
            ConfigError::UnknownKey {
                suggestion: closest_match(field, expected.iter().copied()),
                valid_keys: expected.join(", "),
                key,
                span,
                src,
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: field.to_string(),
        },
        Kind::InvalidType(found, expected) | Kind::InvalidValue(found, expected) => {
            let (span, src) = sources.find(origin.as_deref(), &path).unzip();
            ConfigError::WrongType {
                key: path,
                found: found.to_string(),
                expected: expected.clone(),
                span,
                src,
            }
        }
        _ => ConfigError::Other(error.to_string()),
    }
}

/// Points each validation error at its key in `sources`.
pub fn locate_all(errors: &mut [ConfigError], sources: &SourceSet) {
    for error in errors {
        error.locate_in(sources);
    }
}

/// Renders `errors` as miette reports, one after another.
pub fn render_to_string(errors: &[ConfigError]) -> String {
    let handler = GraphicalReportHandler::new();
    let mut out = String::new();
    for error in errors {
        if handler.render_report(&mut out, error).is_err() {
            out.push_str(&format!("Error: {error}\n"));
        }
    }
    out
}

/// Prints `errors` to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    eprint!("{}", render_to_string(errors));
}
