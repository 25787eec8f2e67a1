//! Generic SQL dialect.

use super::Dialect;

/// A generic dialect using ANSI SQL standards and the baseline capability
/// table.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::BindStyle;

    #[test]
    fn generic_dialect_defaults() {
        let dialect = GenericDialect::new();
        assert_eq!(dialect.name(), "generic");
        assert_eq!(dialect.identifier_quote(), '"');
        assert_eq!(dialect.bind_style(), BindStyle::Positional);
        assert_eq!(dialect.default_schema(), "");
        assert!(!dialect.supports().upserts);
    }
}
