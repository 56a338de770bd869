use super::super::filter::FilterConverter;
use crate::filter::FieldType;

/// SQLite-specific filter converter
///
/// `LIKE` only ignores case for ASCII letters. Text fields are matched on
/// their folded column instead, so the plain operator is enough here.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteFilterConverter;

impl SqliteFilterConverter {
    pub fn new() -> Self {
        Self
    }
}

impl FilterConverter for SqliteFilterConverter {
    fn placeholder(&self, index: usize) -> String {
        format!("?{}", index)
    }

    fn contains_expression(
        &self,
        column: &str,
        _field_type: FieldType,
        placeholder: &str,
    ) -> String {
        format!("{} LIKE {}", column, placeholder)
    }
}
