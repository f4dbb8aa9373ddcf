//! Table metadata and the record layout derived from it.

use serde::{Deserialize, Serialize};
use tessera_common::constants::MAX_IDENTIFIER_LEN;
use tessera_common::{DbError, DbResult, TableId};
use tessera_types::AttrType;

use crate::field::FieldMeta;

/// A column definition as written in `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrInfo {
    /// Column name.
    pub name: String,
    /// Column kind.
    pub kind: AttrType,
    /// Declared length for character kinds.
    pub length: Option<usize>,
}

impl AttrInfo {
    /// Creates a column definition without a declared length.
    pub fn new(name: impl Into<String>, kind: AttrType) -> Self {
        Self {
            name: name.into(),
            kind,
            length: None,
        }
    }

    /// Creates a `CHAR(length)` column.
    pub fn chars(name: impl Into<String>, length: usize) -> Self {
        Self {
            name: name.into(),
            kind: AttrType::Chars,
            length: Some(length),
        }
    }

    /// Creates a `TEXT` column with an explicit length.
    pub fn text(name: impl Into<String>, length: usize) -> Self {
        Self {
            name: name.into(),
            kind: AttrType::Text,
            length: Some(length),
        }
    }
}

/// Metadata for one table: its name and the fixed layout of its records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMeta {
    id: TableId,
    name: String,
    fields: Vec<FieldMeta>,
    record_size: usize,
}

impl TableMeta {
    /// Lays out fields back to back in declaration order.
    ///
    /// `text_width` is used for `TEXT` columns without a declared length.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty or over-long name, no columns,
    /// duplicate column names or a character column without a usable length.
    pub fn new(id: TableId, name: &str, attrs: &[AttrInfo], text_width: usize) -> DbResult<Self> {
        validate_identifier("table", name)?;
        if attrs.is_empty() {
            return Err(DbError::invalid_argument(format!(
                "table '{name}' has no fields"
            )));
        }

        let mut fields: Vec<FieldMeta> = Vec::with_capacity(attrs.len());
        let mut offset = 0;
        for attr in attrs {
            validate_identifier("field", &attr.name)?;
            if fields.iter().any(|f| f.name() == attr.name) {
                return Err(DbError::invalid_argument(format!(
                    "duplicate field '{}' in table '{name}'",
                    attr.name
                )));
            }

            let len = match (attr.kind.fixed_width(), attr.kind, attr.length) {
                (Some(width), _, _) => width,
                (None, _, Some(0)) | (None, AttrType::Chars, None) => {
                    return Err(DbError::invalid_argument(format!(
                        "field '{}' needs a positive length",
                        attr.name
                    )));
                }
                (None, _, Some(len)) => len,
                (None, _, None) => text_width,
            };

            fields.push(FieldMeta::new(attr.name.clone(), attr.kind, offset, len));
            offset = offset.checked_add(len).ok_or_else(|| {
                DbError::invalid_argument(format!("record of table '{name}' is too wide"))
            })?;
        }

        Ok(Self {
            id,
            name: name.to_string(),
            fields,
            record_size: offset,
        })
    }

    /// Table id.
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldMeta] {
        &self.fields
    }

    /// Number of fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Total record width in bytes.
    pub fn record_size(&self) -> usize {
        self.record_size
    }
}

fn validate_identifier(what: &str, name: &str) -> DbResult<()> {
    if name.trim().is_empty() {
        return Err(DbError::invalid_argument(format!("{what} name is empty")));
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(DbError::invalid_argument(format!(
            "{what} name '{name}' exceeds {MAX_IDENTIFIER_LEN} bytes"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_common::StatusCode;

    #[test]
    fn test_layout() {
        let meta = TableMeta::new(
            TableId::new(1),
            "t",
            &[
                AttrInfo::new("id", AttrType::Ints),
                AttrInfo::chars("name", 4),
                AttrInfo::new("born", AttrType::Dates),
                AttrInfo::new("bio", AttrType::Text),
            ],
            64,
        )
        .unwrap();

        let offsets: Vec<_> = meta.fields().iter().map(|f| (f.offset(), f.len())).collect();
        assert_eq!(offsets, vec![(0, 4), (4, 4), (8, 4), (12, 64)]);
        assert_eq!(meta.record_size(), 76);
        assert_eq!(meta.field("born").unwrap().kind(), AttrType::Dates);
        assert!(meta.field("missing").is_none());
    }

    #[test]
    fn test_rejects_bad_definitions() {
        let id = TableId::new(1);
        let int = AttrInfo::new("a", AttrType::Ints);

        for (name, attrs) in [
            ("", vec![int.clone()]),
            ("t", vec![]),
            ("t", vec![int.clone(), int.clone()]),
            ("t", vec![AttrInfo::new("c", AttrType::Chars)]),
            ("t", vec![AttrInfo::chars("c", 0)]),
        ] {
            let err = TableMeta::new(id, name, &attrs, 16).unwrap_err();
            assert_eq!(err.code(), StatusCode::InvalidArgument);
        }
    }

    #[test]
    fn test_rejects_overflowing_width() {
        let attrs = [AttrInfo::new("id", AttrType::Ints), AttrInfo::chars("c", usize::MAX)];
        let err = TableMeta::new(TableId::new(1), "t", &attrs, 16).unwrap_err();
        assert_eq!(err.code(), StatusCode::InvalidArgument);
        assert!(err.to_string().contains("too wide"));
    }
}
