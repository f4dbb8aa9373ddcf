//! Tuples: one row flowing between operators.

use std::sync::Arc;

use tessera_common::DbResult;
use tessera_storage::{Record, Table};
use tessera_types::Value;

/// Names one cell of a tuple.
///
/// Cells read from a table carry the table and field name. Computed cells,
/// such as aggregate results, have an empty table name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleCellSpec {
    /// Source table, empty for computed cells.
    pub table: String,
    /// Field or expression name.
    pub field: String,
}

impl TupleCellSpec {
    /// Creates a spec.
    pub fn new(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            field: field.into(),
        }
    }

    /// Spec of a computed cell.
    pub fn computed(name: impl Into<String>) -> Self {
        Self::new(String::new(), name)
    }

    /// Specs for every field of a table, in declaration order.
    pub fn for_table(table: &Table) -> Arc<Vec<TupleCellSpec>> {
        Arc::new(
            table
                .meta()
                .fields()
                .iter()
                .map(|f| TupleCellSpec::new(table.name(), f.name()))
                .collect(),
        )
    }
}

/// A row of values with shared cell specs.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    specs: Arc<Vec<TupleCellSpec>>,
    cells: Vec<Value>,
}

impl Tuple {
    /// Creates a tuple. `cells` and `specs` must have the same length.
    pub fn new(specs: Arc<Vec<TupleCellSpec>>, cells: Vec<Value>) -> Self {
        debug_assert_eq!(specs.len(), cells.len());
        Self { specs, cells }
    }

    /// Decodes a record of `table`.
    pub fn from_record(
        table: &Table,
        specs: Arc<Vec<TupleCellSpec>>,
        record: &Record,
    ) -> DbResult<Self> {
        Ok(Self::new(specs, table.values_of(record)?))
    }

    /// Concatenates two tuples under `specs`, which must be the
    /// concatenation of both tuples' specs.
    pub fn join(left: &Tuple, right: &Tuple, specs: Arc<Vec<TupleCellSpec>>) -> Self {
        let mut cells = Vec::with_capacity(left.cells.len() + right.cells.len());
        cells.extend_from_slice(&left.cells);
        cells.extend_from_slice(&right.cells);
        Self::new(specs, cells)
    }

    /// Concatenation of two tuples' specs.
    pub fn joined_specs(left: &Tuple, right: &Tuple) -> Arc<Vec<TupleCellSpec>> {
        Arc::new(
            left.specs
                .iter()
                .chain(right.specs.iter())
                .cloned()
                .collect(),
        )
    }

    /// Finds a cell by table and field name.
    pub fn find_cell(&self, table: &str, field: &str) -> Option<&Value> {
        self.specs
            .iter()
            .position(|s| s.table == table && s.field == field)
            .map(|i| &self.cells[i])
    }

    /// Cell specs.
    pub fn specs(&self) -> &Arc<Vec<TupleCellSpec>> {
        &self.specs
    }

    /// Cell values.
    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true for a tuple without cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(table: &str, fields: &[&str], cells: Vec<Value>) -> Tuple {
        let specs = Arc::new(fields.iter().map(|f| TupleCellSpec::new(table, *f)).collect());
        Tuple::new(specs, cells)
    }

    #[test]
    fn test_find_cell() {
        let t = tuple("t", &["id", "name"], vec![Value::from_int(1), Value::from("ab")]);
        assert_eq!(t.find_cell("t", "name"), Some(&Value::from("ab")));
        assert_eq!(t.find_cell("u", "name"), None);
    }

    #[test]
    fn test_join() {
        let l = tuple("t", &["id"], vec![Value::from_int(1)]);
        let r = tuple("u", &["id"], vec![Value::from_int(2)]);
        let specs = Tuple::joined_specs(&l, &r);
        let j = Tuple::join(&l, &r, specs);
        assert_eq!(j.len(), 2);
        assert_eq!(j.find_cell("u", "id"), Some(&Value::from_int(2)));
        assert_eq!(j.find_cell("t", "id"), Some(&Value::from_int(1)));
    }
}
