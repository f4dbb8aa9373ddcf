//! Name resolution for statement binding.

use std::sync::Arc;

use tessera_common::{DbError, DbResult};
use tessera_storage::Table;
use tessera_types::AttrType;
use tracing::warn;

use crate::ast::{AggregateFunc, ExprSqlNode, RelAttrSqlNode};
use crate::expr::{Expression, FieldExpr};

/// Tables visible while binding one statement or clause.
#[derive(Debug, Clone, Default)]
pub struct BinderContext {
    tables: Vec<Arc<Table>>,
    default_table: Option<Arc<Table>>,
}

impl BinderContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes a table visible.
    pub fn add_table(&mut self, table: Arc<Table>) {
        self.tables.push(table);
    }

    /// Resolves unqualified fields against `table` only.
    pub fn set_default_table(&mut self, table: Arc<Table>) {
        self.default_table = Some(table);
    }

    /// Visible tables, in the order they were added.
    pub fn tables(&self) -> &[Arc<Table>] {
        &self.tables
    }

    /// Finds a visible table by name.
    pub fn find_table(&self, name: &str) -> Option<&Arc<Table>> {
        self.tables.iter().find(|t| t.name() == name)
    }

    /// Resolves a field reference.
    ///
    /// # Errors
    ///
    /// - `SchemaTableNotExist` for an unknown qualifier
    /// - `SchemaFieldMissing` when no visible table has the field
    /// - `SchemaFieldAmbiguous` when an unqualified name matches several tables
    pub fn resolve_field(&self, node: &RelAttrSqlNode) -> DbResult<FieldExpr> {
        let qualified = self.tables.len() > 1;

        if let Some(relation) = &node.relation {
            let table = self.find_table(relation).ok_or_else(|| {
                warn!(table = %relation, "no such table in this statement");
                DbError::SchemaTableNotExist {
                    table: relation.clone(),
                }
            })?;
            let field = table.field(&node.attribute).ok_or_else(|| missing(node, relation))?;
            return Ok(FieldExpr::new(Arc::clone(table), field.clone(), qualified));
        }

        if let Some(table) = &self.default_table {
            let field = table
                .field(&node.attribute)
                .ok_or_else(|| missing(node, table.name()))?;
            return Ok(FieldExpr::new(Arc::clone(table), field.clone(), qualified));
        }

        let mut found = self
            .tables
            .iter()
            .filter_map(|t| t.field(&node.attribute).map(|f| (t, f)));
        match (found.next(), found.next()) {
            (Some((table, field)), None) => {
                Ok(FieldExpr::new(Arc::clone(table), field.clone(), qualified))
            }
            (Some(_), Some(_)) => {
                warn!(field = %node.attribute, "ambiguous field");
                Err(DbError::SchemaFieldAmbiguous {
                    field: node.attribute.clone(),
                })
            }
            (None, _) => {
                let names: Vec<&str> = self.tables.iter().map(|t| t.name()).collect();
                Err(missing(node, &names.join(", ")))
            }
        }
    }
}

fn missing(node: &RelAttrSqlNode, table: &str) -> DbError {
    warn!(field = %node, table, "no such field");
    DbError::SchemaFieldMissing {
        field: node.attribute.clone(),
        table: table.to_string(),
    }
}

/// Binds select-list, GROUP BY and ORDER BY items.
#[derive(Debug)]
pub struct ExpressionBinder<'a> {
    context: &'a BinderContext,
}

impl<'a> ExpressionBinder<'a> {
    /// Creates a binder over a context.
    pub fn new(context: &'a BinderContext) -> Self {
        Self { context }
    }

    /// Binds one item, appending the results to `out`. A star expands to
    /// every field of every visible table.
    pub fn bind_expression(&self, node: &ExprSqlNode, out: &mut Vec<Expression>) -> DbResult<()> {
        match node {
            ExprSqlNode::Star => {
                for table in self.context.tables() {
                    self.expand_table(table, out);
                }
                Ok(())
            }
            ExprSqlNode::Field(rel) if rel.attribute == "*" => {
                let table = match &rel.relation {
                    Some(name) => self.context.find_table(name).ok_or_else(|| {
                        DbError::SchemaTableNotExist {
                            table: name.clone(),
                        }
                    })?,
                    None => {
                        return self.bind_expression(&ExprSqlNode::Star, out);
                    }
                };
                self.expand_table(table, out);
                Ok(())
            }
            ExprSqlNode::Field(rel) => {
                out.push(Expression::Field(self.context.resolve_field(rel)?));
                Ok(())
            }
            ExprSqlNode::Value(v) => {
                out.push(Expression::Value(v.clone()));
                Ok(())
            }
            ExprSqlNode::Aggregate { func, arg } => {
                out.push(self.bind_aggregate(*func, arg)?);
                Ok(())
            }
        }
    }

    /// Binds an item that must produce exactly one expression.
    pub fn bind_single(&self, node: &ExprSqlNode) -> DbResult<Expression> {
        let mut out = Vec::with_capacity(1);
        self.bind_expression(node, &mut out)?;
        match (out.pop(), out.is_empty()) {
            (Some(expr), true) => Ok(expr),
            _ => Err(DbError::invalid_argument(
                "expected a single expression, not a star",
            )),
        }
    }

    fn bind_aggregate(&self, func: AggregateFunc, arg: &ExprSqlNode) -> DbResult<Expression> {
        if matches!(arg, ExprSqlNode::Star) {
            if func != AggregateFunc::Count {
                return Err(DbError::invalid_argument(format!("{func}(*) is not allowed")));
            }
            return Ok(Expression::Aggregate { func, child: None });
        }
        if matches!(arg, ExprSqlNode::Aggregate { .. }) {
            return Err(DbError::invalid_argument("aggregates cannot be nested"));
        }

        let child = self.bind_single(arg)?;
        let kind = child.value_type();
        let numeric_only = matches!(func, AggregateFunc::Sum | AggregateFunc::Avg);
        if numeric_only && !kind.is_numeric() {
            warn!(%func, %kind, "aggregate needs a numeric argument");
            return Err(DbError::type_mismatch(AttrType::Floats, kind));
        }
        Ok(Expression::Aggregate {
            func,
            child: Some(Box::new(child)),
        })
    }

    fn expand_table(&self, table: &Arc<Table>, out: &mut Vec<Expression>) {
        let qualified = self.context.tables().len() > 1;
        for field in table.meta().fields() {
            out.push(Expression::Field(FieldExpr::new(
                Arc::clone(table),
                field.clone(),
                qualified,
            )));
        }
    }
}
