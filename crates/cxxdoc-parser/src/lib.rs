//! # cxxdoc-parser
//!
//! Builds the semantic entity tree of a C++ translation unit.
//!
//! The tree-sitter C++ grammar (through ast-grep) supplies the cursor tree:
//! where declarations, declarators and parameter lists begin and end. A
//! logos lexer reads the finer details from the source under those ranges,
//! since the cursor tree is unreliable around attributes:
//!
//! - [`frontend`]: cursor kinds, syntax diagnostics, declarator shapes
//! - [`tokens`] / [`type_name`]: lexing and type spelling
//! - [`signature`] / [`qualifiers`]: function signatures and hints
//! - `builder`: the entity tree walk and redeclaration merging
//! - [`virtuals`]: implicit override resolution across the finished tree
//! - [`unique_name`]: scope-qualified and unique names
//!
//! Each translation unit is independent; [`parse_translation_units`] builds
//! a batch on the rayon thread pool.

mod builder;
pub mod error;
pub mod frontend;
pub mod lookup;
pub mod qualifiers;
pub mod signature;
pub mod tokens;
pub mod type_name;
pub mod unique_name;
pub mod virtuals;

#[cfg(test)]
mod tests;

use rayon::prelude::*;

use cxxdoc_config::ParserConfig;
use cxxdoc_core::TranslationUnit;

pub use builder::Builder;
pub use error::ParserError;

/// Parse one translation unit and build its entity tree.
///
/// Syntax errors fail the unit unless `config.allow_partial` is set, in
/// which case they are recorded on the unit and the builder skips the
/// affected regions.
///
/// # Errors
/// - [`ParserError::Config`] if the configuration is invalid
/// - [`ParserError::FrontEnd`] for syntax errors without `allow_partial`
/// - [`ParserError::Parse`] for declarations with malformed tokens
/// - [`ParserError::NameCollision`] if two siblings share a unique name
pub fn parse_translation_unit(
    name: &str,
    source: &str,
    config: &ParserConfig,
) -> Result<TranslationUnit, ParserError> {
    config.validate()?;
    let _span = tracing::debug_span!("translation_unit", unit = name).entered();

    let masked = frontend::mask_vendor_attributes(source);
    let source = masked.as_ref();
    let tree = frontend::parse_source(source);
    let root = tree.root();
    let mut diagnostics = frontend::syntax_diagnostics(&root, source);
    if !diagnostics.is_empty() && !config.allow_partial {
        diagnostics.truncate(config.max_reported_diagnostics);
        tracing::warn!(unit = name, "syntax errors, unit rejected");
        return Err(ParserError::FrontEnd {
            unit: name.to_string(),
            diagnostics,
        });
    }
    for diagnostic in &diagnostics {
        tracing::warn!(unit = name, %diagnostic, "building around syntax error");
    }

    let mut builder = Builder::new(source, config, diagnostics);
    builder.build(&root)?;
    builder.finish(name)
}

/// Parse a batch of `(name, source)` units in parallel.
///
/// Results are returned in input order; one failing unit does not affect
/// the others.
pub fn parse_translation_units<N, S>(
    units: &[(N, S)],
    config: &ParserConfig,
) -> Vec<Result<TranslationUnit, ParserError>>
where
    N: AsRef<str> + Sync,
    S: AsRef<str> + Sync,
{
    units
        .par_iter()
        .map(|(name, source)| parse_translation_unit(name.as_ref(), source.as_ref(), config))
        .collect()
}
