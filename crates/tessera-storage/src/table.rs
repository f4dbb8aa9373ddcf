//! Tables: metadata plus a heap of records.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tessera_common::{DbError, DbResult, Rid};
use tessera_types::Value;
use tracing::debug;

use crate::field::FieldMeta;
use crate::heap::Heap;
use crate::record::{Record, RecordBuf};
use crate::scanner::{RecordScanner, ScanMode};
use crate::table_meta::TableMeta;

/// A table.
///
/// Mutations go through `insert_record`, `update_record` and
/// `delete_record`. They fail with `RecordLocked` while a read-write
/// scanner over the table is open.
#[derive(Debug)]
pub struct Table {
    meta: TableMeta,
    heap: Heap,
    rw_scanners: AtomicUsize,
}

impl Table {
    /// Creates an empty table.
    pub fn new(meta: TableMeta, records_per_page: usize) -> Self {
        let heap = Heap::new(meta.record_size(), records_per_page);
        Self {
            meta,
            heap,
            rw_scanners: AtomicUsize::new(0),
        }
    }

    /// Table metadata.
    pub fn meta(&self) -> &TableMeta {
        &self.meta
    }

    /// Table name.
    pub fn name(&self) -> &str {
        self.meta.name()
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.meta.field(name)
    }

    /// Number of live records.
    pub fn record_count(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn heap(&self) -> &Heap {
        &self.heap
    }

    // =========================================================================
    // Record encoding
    // =========================================================================

    /// Encodes one row of values into a record image.
    ///
    /// Values whose kind differs from the field's are cast first.
    ///
    /// # Errors
    ///
    /// - `SchemaFieldMissing` if the value count differs from the field count
    /// - `SchemaFieldTypeMismatch` if a value cannot be cast to its field kind
    /// - `InvalidArgument` for a malformed literal or a character value
    ///   longer than its field
    pub fn make_record(&self, values: &[Value]) -> DbResult<RecordBuf> {
        let fields = self.meta.fields();
        if values.len() != fields.len() {
            let field = match fields.get(values.len()) {
                Some(missing) => missing.name().to_string(),
                None => format!("#{}", fields.len() + 1),
            };
            return Err(DbError::SchemaFieldMissing {
                field,
                table: self.name().to_string(),
            });
        }

        let mut buf = RecordBuf::zeroed(self.meta.record_size());
        for (field, value) in fields.iter().zip(values) {
            let value = coerce(value, field)?;
            let bytes = value.to_field_bytes();
            if bytes.len() > field.len() {
                return Err(DbError::invalid_argument(format!(
                    "value of {} bytes does not fit field '{}' of {} bytes",
                    bytes.len(),
                    field.name(),
                    field.len()
                )));
            }
            buf.write_field(field, &bytes)?;
        }
        Ok(buf)
    }

    /// Decodes the named field of a record.
    pub fn value_of(&self, record: &Record, field: &str) -> DbResult<Value> {
        let meta = self.field(field).ok_or_else(|| DbError::SchemaFieldMissing {
            field: field.to_string(),
            table: self.name().to_string(),
        })?;
        record.value(meta)
    }

    /// Decodes every field of a record in declaration order.
    pub fn values_of(&self, record: &Record) -> DbResult<Vec<Value>> {
        self.meta.fields().iter().map(|f| record.value(f)).collect()
    }

    // =========================================================================
    // Record access
    // =========================================================================

    /// Fetches the current image of a row.
    pub fn get_record(&self, rid: Rid) -> DbResult<Record> {
        self.heap.get(rid)
    }

    /// Opens a scanner over this table.
    pub fn get_record_scanner(self: &Arc<Self>, mode: ScanMode) -> RecordScanner {
        RecordScanner::open(Arc::clone(self), mode)
    }

    /// Stores a new row.
    pub fn insert_record(&self, buf: RecordBuf) -> DbResult<Record> {
        self.check_writable()?;
        self.heap.insert(buf.freeze())
    }

    /// Replaces a row. `old` must be the row's current snapshot.
    pub fn update_record(&self, old: &Record, buf: RecordBuf) -> DbResult<Record> {
        self.check_writable()?;
        self.heap.update(old, buf.freeze())
    }

    /// Removes a row. `old` must be the row's current snapshot.
    pub fn delete_record(&self, old: &Record) -> DbResult<()> {
        self.check_writable()?;
        self.heap.delete(old)
    }

    fn check_writable(&self) -> DbResult<()> {
        if self.rw_scanners.load(Ordering::Acquire) > 0 {
            debug!(table = self.name(), "mutation refused, read-write scanner open");
            return Err(DbError::RecordLocked {
                table: self.name().to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn acquire_scan_marker(&self) {
        self.rw_scanners.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn release_scan_marker(&self) {
        self.rw_scanners.fetch_sub(1, Ordering::AcqRel);
    }
}

fn coerce(value: &Value, field: &FieldMeta) -> DbResult<Value> {
    value.materialize(field.kind()).map_err(|e| match e {
        DbError::Unsupported { .. } => DbError::type_mismatch(field.kind(), value.kind()),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table_meta::AttrInfo;
    use tessera_common::{StatusCode, TableId};
    use tessera_types::AttrType;

    fn table() -> Arc<Table> {
        let meta = TableMeta::new(
            TableId::new(1),
            "t",
            &[
                AttrInfo::new("id", AttrType::Ints),
                AttrInfo::chars("name", 4),
                AttrInfo::new("born", AttrType::Dates),
            ],
            16,
        )
        .unwrap();
        Arc::new(Table::new(meta, 4))
    }

    fn row(id: i32, name: &str, born: &str) -> Vec<Value> {
        vec![Value::from_int(id), Value::from(name), Value::from(born)]
    }

    #[test]
    fn test_make_record_casts_literals() {
        let t = table();
        let rec = t.insert_record(t.make_record(&row(1, "ab", "2024-02-29")).unwrap()).unwrap();
        let values = t.values_of(&rec).unwrap();
        assert_eq!(values[0], Value::from_int(1));
        assert_eq!(values[1], Value::from("ab"));
        assert_eq!(values[2], Value::from_date(20240229));
    }

    #[test]
    fn test_make_record_errors() {
        let t = table();

        let err = t.make_record(&row(1, "ab", "2024-01-01")[..2]).unwrap_err();
        assert_eq!(err.code(), StatusCode::SchemaFieldMissing);

        let err = t.make_record(&row(1, "abcde", "2024-01-01")).unwrap_err();
        assert_eq!(err.code(), StatusCode::InvalidArgument);

        let err = t.make_record(&row(1, "ab", "2023-02-29")).unwrap_err();
        assert_eq!(err.code(), StatusCode::InvalidArgument);

        let bad_text = vec![Value::from("x"), Value::from("ab"), Value::from("2024-01-01")];
        let err = t.make_record(&bad_text).unwrap_err();
        assert_eq!(err.code(), StatusCode::InvalidArgument);

        let bad_kind = vec![Value::from(1), Value::from("ab"), Value::from(true)];
        let err = t.make_record(&bad_kind).unwrap_err();
        assert_eq!(err.code(), StatusCode::SchemaFieldTypeMismatch);
    }

    #[test]
    fn test_read_write_scanner_locks_table() {
        let t = table();
        let rec = t.insert_record(t.make_record(&row(1, "ab", "2024-01-01")).unwrap()).unwrap();

        let mut scanner = t.get_record_scanner(ScanMode::ReadWrite);
        let buf = RecordBuf::from_record(&rec);
        assert_eq!(
            t.update_record(&rec, buf.clone()).unwrap_err().code(),
            StatusCode::RecordLocked
        );

        scanner.close();
        scanner.close();
        t.update_record(&rec, buf).unwrap();
    }

    #[test]
    fn test_dropped_scanner_releases_lock() {
        let t = table();
        {
            let _reader = t.get_record_scanner(ScanMode::ReadOnly);
            let _writer = t.get_record_scanner(ScanMode::ReadWrite);
        }
        assert!(t.insert_record(t.make_record(&row(2, "cd", "2024-01-01")).unwrap()).is_ok());
    }

    #[test]
    fn test_scan_order_and_eof() {
        let t = table();
        for i in 0..6 {
            t.insert_record(t.make_record(&row(i, "x", "2024-01-01")).unwrap()).unwrap();
        }
        let mut scanner = t.get_record_scanner(ScanMode::ReadOnly);
        let mut ids = Vec::new();
        while let Some(rec) = scanner.next_record().unwrap() {
            ids.push(t.value_of(&rec, "id").unwrap().as_int().unwrap());
        }
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
        assert!(scanner.next_record().unwrap().is_none());
    }
}
