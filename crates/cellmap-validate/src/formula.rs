//! Formula-injection guards for values written into the target workbook.

use std::borrow::Cow;

use tracing::warn;

use crate::error::{Result, ValidationError};

/// Leading characters spreadsheet applications treat as a formula start.
pub const FORMULA_TRIGGERS: [char; 4] = ['=', '+', '-', '@'];

/// Characters that could close the quoted `'[file]sheet'` part of a reference.
pub const REFERENCE_BREAKERS: [char; 4] = ['\'', '"', '[', ']'];

/// How a value ends up in the target sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Written as a plain cell value.
    Literal,
    /// Interpolated into a generated formula; `field` names it in errors.
    Interpolated { field: &'static str },
}

/// Make `value` safe for its placement.
///
/// Literal values that would be read as a formula are neutralised with a
/// leading apostrophe. Interpolated values are rejected if they contain a
/// quote or bracket.
pub fn sanitize_formula_input(value: &str, placement: Placement) -> Result<Cow<'_, str>> {
    match placement {
        Placement::Literal => Ok(sanitize_literal(value)),
        Placement::Interpolated { field } => check_interpolated(field, value).map(Cow::Borrowed),
    }
}

/// Prefix an apostrophe when `value` starts (after whitespace) with a formula trigger.
pub fn sanitize_literal(value: &str) -> Cow<'_, str> {
    if is_formula_like(value) {
        warn!(
            preview = %value.chars().take(50).collect::<String>(),
            "neutralised formula-like literal"
        );
        Cow::Owned(format!("'{value}"))
    } else {
        Cow::Borrowed(value)
    }
}

/// True when a spreadsheet application would interpret `value` as a formula.
pub fn is_formula_like(value: &str) -> bool {
    value
        .trim_start()
        .starts_with(|ch: char| FORMULA_TRIGGERS.contains(&ch))
}

/// Reject values that could break out of a quoted external reference.
pub fn check_interpolated<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    match value.chars().find(|ch| REFERENCE_BREAKERS.contains(ch)) {
        Some(character) => Err(ValidationError::FormulaInjection {
            field,
            value: value.to_string(),
            character,
        }),
        None => Ok(value),
    }
}
