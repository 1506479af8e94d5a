//! Column-to-field mapping.
//!
//! A [`Schema`] binds an ordered list of field names to positional input
//! columns and designates one field as the primary key. Projecting a row
//! through the schema yields a [`Record`] ready for an upsert: the field
//! values in schema order plus the extracted key.
//!
//! Field names become store column names, so they are restricted to
//! identifier characters at construction time.

use serde::Serialize;

use crate::error_handling::SchemaError;

/// Returns true if `name` is usable as a table or column identifier.
///
/// Identifiers are interpolated into DDL and upsert statements (bind
/// parameters cannot carry identifiers), so anything outside
/// `[A-Za-z_][A-Za-z0-9_]*` is rejected up front.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// An ordered field-name-to-column mapping with a designated primary key.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<String>,
    key_index: usize,
}

impl Schema {
    /// Builds a schema from field names in input column order.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the field list is empty, contains an
    /// invalid or duplicate name, or does not contain `primary_key`.
    pub fn new(fields: Vec<String>, primary_key: &str) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }
        for (i, field) in fields.iter().enumerate() {
            if !is_valid_identifier(field) {
                return Err(SchemaError::InvalidFieldName(field.clone()));
            }
            if fields[..i].contains(field) {
                return Err(SchemaError::DuplicateField(field.clone()));
            }
        }
        let key_index = fields
            .iter()
            .position(|f| f == primary_key)
            .ok_or_else(|| SchemaError::UnknownPrimaryKey(primary_key.to_string()))?;
        Ok(Schema { fields, key_index })
    }

    /// Field names in column order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Number of fields (and therefore required input columns).
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the schema has no fields. Never true for a constructed
    /// schema; provided for completeness alongside [`Schema::len`].
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The primary-key field name.
    pub fn primary_key(&self) -> &str {
        &self.fields[self.key_index]
    }

    /// Column index of the primary-key field.
    pub fn key_index(&self) -> usize {
        self.key_index
    }

    /// Maps a row's columns to a [`Record`] in schema order.
    ///
    /// Columns beyond the schema length are ignored. `row_index` is the
    /// 1-based line number, used only for error reporting.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeMismatch`] when the row has fewer columns than the
    /// schema requires.
    pub fn project(&self, row_index: usize, columns: &[String]) -> Result<Record, ShapeMismatch> {
        if columns.len() < self.fields.len() {
            return Err(ShapeMismatch {
                row_index,
                expected: self.fields.len(),
                actual: columns.len(),
            });
        }
        Ok(Record {
            key: columns[self.key_index].clone(),
            values: columns[..self.fields.len()].to_vec(),
        })
    }
}

/// One named record ready to be written, keyed for upsert.
///
/// `values` are aligned with the owning schema's field order; `key` is the
/// value of the primary-key field. Records are created per row and consumed
/// by a write, never retained.
#[derive(Debug, Clone)]
pub struct Record {
    /// Primary-key value used for upsert deduplication.
    pub key: String,
    /// Field values in schema order.
    pub values: Vec<String>,
}

/// A row that had fewer columns than the schema requires.
///
/// Collected into the run report so callers can see exactly which input
/// lines were dropped.
#[derive(Debug, Clone, Serialize)]
pub struct ShapeMismatch {
    /// 1-based line number of the offending row.
    pub row_index: usize,
    /// Schema length.
    pub expected: usize,
    /// Columns actually present.
    pub actual: usize,
}

impl From<ShapeMismatch> for crate::error_handling::LoadError {
    fn from(m: ShapeMismatch) -> Self {
        crate::error_handling::LoadError::RecordShapeMismatch {
            row_index: m.row_index,
            expected: m.expected,
            actual: m.actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_identifier_validation() {
        assert!(is_valid_identifier("reportIdx"));
        assert!(is_valid_identifier("_private"));
        assert!(is_valid_identifier("a1"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("1abc"));
        assert!(!is_valid_identifier("bad-name"));
        assert!(!is_valid_identifier("drop table\"; --"));
    }

    #[test]
    fn test_schema_rejects_bad_configurations() {
        assert!(matches!(
            Schema::new(vec![], "id"),
            Err(SchemaError::Empty)
        ));
        assert!(matches!(
            Schema::new(strings(&["id", "bad name"]), "id"),
            Err(SchemaError::InvalidFieldName(_))
        ));
        assert!(matches!(
            Schema::new(strings(&["id", "id"]), "id"),
            Err(SchemaError::DuplicateField(_))
        ));
        assert!(matches!(
            Schema::new(strings(&["id", "name"]), "email"),
            Err(SchemaError::UnknownPrimaryKey(_))
        ));
    }

    #[test]
    fn test_project_maps_columns_in_order() {
        let schema = Schema::new(strings(&["id", "name", "email"]), "id").unwrap();
        let record = schema
            .project(1, &strings(&["42", "Ada", "ada@example.com"]))
            .unwrap();
        assert_eq!(record.key, "42");
        assert_eq!(record.values, strings(&["42", "Ada", "ada@example.com"]));
    }

    #[test]
    fn test_project_ignores_extra_columns() {
        let schema = Schema::new(strings(&["id", "name"]), "id").unwrap();
        let record = schema
            .project(1, &strings(&["42", "Ada", "extra", "more"]))
            .unwrap();
        assert_eq!(record.values, strings(&["42", "Ada"]));
    }

    #[test]
    fn test_project_reports_short_rows() {
        let schema = Schema::new(strings(&["id", "name", "email"]), "id").unwrap();
        let err = schema.project(5, &strings(&["42"])).unwrap_err();
        assert_eq!(err.row_index, 5);
        assert_eq!(err.expected, 3);
        assert_eq!(err.actual, 1);
    }

    #[test]
    fn test_primary_key_position() {
        let schema = Schema::new(strings(&["date", "stockId", "reportIdx"]), "reportIdx").unwrap();
        assert_eq!(schema.key_index(), 2);
        assert_eq!(schema.primary_key(), "reportIdx");
        let record = schema
            .project(1, &strings(&["2024-01-01", "ACM", "r-001"]))
            .unwrap();
        assert_eq!(record.key, "r-001");
    }
}
