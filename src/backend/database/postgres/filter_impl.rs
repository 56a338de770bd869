use super::super::filter::FilterConverter;
use crate::filter::FieldType;

/// PostgreSQL-specific filter converter
///
/// Text fields are matched with `LIKE` on their folded column. Other columns
/// are cast to text and matched with `ILIKE`, so a partial date such as
/// `2026-03` matches.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresFilterConverter;

impl PostgresFilterConverter {
    pub fn new() -> Self {
        Self
    }
}

impl FilterConverter for PostgresFilterConverter {
    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn contains_expression(
        &self,
        column: &str,
        field_type: FieldType,
        placeholder: &str,
    ) -> String {
        match field_type {
            FieldType::Text => format!("{} LIKE {}", column, placeholder),
            FieldType::Timestamp | FieldType::Uuid | FieldType::Bool | FieldType::Enum(_) => {
                format!("CAST({} AS TEXT) ILIKE {}", column, placeholder)
            }
        }
    }
}
