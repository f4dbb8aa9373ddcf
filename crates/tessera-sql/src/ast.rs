//! Raw statement nodes.
//!
//! These are what a SQL front end produces: names are plain strings and
//! nothing has been checked against the catalog yet. The binder in
//! [`crate::stmt`] turns them into bound statements.

use std::fmt;

use tessera_storage::AttrInfo;
use tessera_types::Value;

/// A possibly qualified field reference, `name` or `table.name`.
#[derive(Debug, Clone, PartialEq)]
pub struct RelAttrSqlNode {
    /// Table qualifier.
    pub relation: Option<String>,
    /// Field name, or `*` for every field of the qualifier.
    pub attribute: String,
}

impl RelAttrSqlNode {
    /// Unqualified reference.
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            relation: None,
            attribute: attribute.into(),
        }
    }

    /// Qualified reference.
    pub fn qualified(relation: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            relation: Some(relation.into()),
            attribute: attribute.into(),
        }
    }
}

impl fmt::Display for RelAttrSqlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.relation {
            Some(rel) => write!(f, "{rel}.{}", self.attribute),
            None => f.write_str(&self.attribute),
        }
    }
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunc {
    /// `COUNT`
    Count,
    /// `SUM`
    Sum,
    /// `AVG`
    Avg,
    /// `MAX`
    Max,
    /// `MIN`
    Min,
}

impl fmt::Display for AggregateFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregateFunc::Count => "COUNT",
            AggregateFunc::Sum => "SUM",
            AggregateFunc::Avg => "AVG",
            AggregateFunc::Max => "MAX",
            AggregateFunc::Min => "MIN",
        })
    }
}

/// An item of a select list, GROUP BY or ORDER BY.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprSqlNode {
    /// `*`
    Star,
    /// A field reference.
    Field(RelAttrSqlNode),
    /// A literal.
    Value(Value),
    /// `FUNC(arg)`; `COUNT(*)` has a `Star` argument.
    Aggregate {
        /// Function.
        func: AggregateFunc,
        /// Argument.
        arg: Box<ExprSqlNode>,
    },
}

impl ExprSqlNode {
    /// Unqualified field.
    pub fn field(attribute: impl Into<String>) -> Self {
        ExprSqlNode::Field(RelAttrSqlNode::new(attribute))
    }

    /// Qualified field.
    pub fn qualified(relation: impl Into<String>, attribute: impl Into<String>) -> Self {
        ExprSqlNode::Field(RelAttrSqlNode::qualified(relation, attribute))
    }

    /// Aggregate over `arg`.
    pub fn aggregate(func: AggregateFunc, arg: ExprSqlNode) -> Self {
        ExprSqlNode::Aggregate {
            func,
            arg: Box::new(arg),
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompOp {
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl fmt::Display for CompOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompOp::Eq => "=",
            CompOp::Ne => "<>",
            CompOp::Lt => "<",
            CompOp::Le => "<=",
            CompOp::Gt => ">",
            CompOp::Ge => ">=",
        })
    }
}

/// One side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionOperand {
    /// Field reference.
    Field(RelAttrSqlNode),
    /// Literal.
    Value(Value),
}

impl ConditionOperand {
    /// Unqualified field operand.
    pub fn field(attribute: impl Into<String>) -> Self {
        ConditionOperand::Field(RelAttrSqlNode::new(attribute))
    }

    /// Qualified field operand.
    pub fn qualified(relation: impl Into<String>, attribute: impl Into<String>) -> Self {
        ConditionOperand::Field(RelAttrSqlNode::qualified(relation, attribute))
    }

    /// Literal operand.
    pub fn value(value: impl Into<Value>) -> Self {
        ConditionOperand::Value(value.into())
    }
}

/// `left op right`. Conditions in one list are AND-ed.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSqlNode {
    /// Left operand.
    pub left: ConditionOperand,
    /// Operator.
    pub op: CompOp,
    /// Right operand.
    pub right: ConditionOperand,
}

impl ConditionSqlNode {
    /// Creates a condition.
    pub fn new(left: ConditionOperand, op: CompOp, right: ConditionOperand) -> Self {
        Self { left, op, right }
    }
}

/// `JOIN relation ON conditions`.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSqlNode {
    /// Joined table.
    pub relation: String,
    /// ON conditions.
    pub conditions: Vec<ConditionSqlNode>,
}

/// One ORDER BY key.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBySqlNode {
    /// Sort key.
    pub expr: ExprSqlNode,
    /// Descending when true; ascending is the default.
    pub desc: bool,
}

/// `SELECT`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectSqlNode {
    /// Select list.
    pub expressions: Vec<ExprSqlNode>,
    /// FROM tables.
    pub relations: Vec<String>,
    /// JOIN clauses, applied after the FROM tables.
    pub joins: Vec<JoinSqlNode>,
    /// WHERE conditions.
    pub conditions: Vec<ConditionSqlNode>,
    /// GROUP BY keys.
    pub group_by: Vec<ExprSqlNode>,
    /// ORDER BY keys.
    pub order_by: Vec<OrderBySqlNode>,
}

impl SelectSqlNode {
    /// `SELECT ... FROM relation`.
    pub fn from(relation: impl Into<String>) -> Self {
        Self {
            relations: vec![relation.into()],
            ..Self::default()
        }
    }

    /// Adds a select-list item.
    #[must_use]
    pub fn select(mut self, expr: ExprSqlNode) -> Self {
        self.expressions.push(expr);
        self
    }

    /// Adds a FROM table.
    #[must_use]
    pub fn also_from(mut self, relation: impl Into<String>) -> Self {
        self.relations.push(relation.into());
        self
    }

    /// Adds a JOIN clause.
    #[must_use]
    pub fn join(mut self, relation: impl Into<String>, conditions: Vec<ConditionSqlNode>) -> Self {
        self.joins.push(JoinSqlNode {
            relation: relation.into(),
            conditions,
        });
        self
    }

    /// Adds a WHERE condition.
    #[must_use]
    pub fn filter(mut self, condition: ConditionSqlNode) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Adds a GROUP BY key.
    #[must_use]
    pub fn group_by(mut self, expr: ExprSqlNode) -> Self {
        self.group_by.push(expr);
        self
    }

    /// Adds an ORDER BY key.
    #[must_use]
    pub fn order_by(mut self, expr: ExprSqlNode, desc: bool) -> Self {
        self.order_by.push(OrderBySqlNode { expr, desc });
        self
    }
}

/// `INSERT INTO relation VALUES (...), (...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertSqlNode {
    /// Target table.
    pub relation: String,
    /// Rows, in insertion order.
    pub rows: Vec<Vec<Value>>,
}

/// `UPDATE relation SET attribute = value WHERE conditions`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSqlNode {
    /// Target table.
    pub relation: String,
    /// Field to set.
    pub attribute: String,
    /// New value.
    pub value: Value,
    /// WHERE conditions.
    pub conditions: Vec<ConditionSqlNode>,
}

/// `DELETE FROM relation WHERE conditions`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteSqlNode {
    /// Target table.
    pub relation: String,
    /// WHERE conditions.
    pub conditions: Vec<ConditionSqlNode>,
}

/// `CREATE TABLE relation (attrs)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableSqlNode {
    /// New table name.
    pub relation: String,
    /// Column definitions.
    pub attrs: Vec<AttrInfo>,
}

/// `DROP TABLE relation`.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTableSqlNode {
    /// Table to drop.
    pub relation: String,
}

/// A raw statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlNode {
    /// `SELECT`
    Select(SelectSqlNode),
    /// `INSERT`
    Insert(InsertSqlNode),
    /// `UPDATE`
    Update(UpdateSqlNode),
    /// `DELETE`
    Delete(DeleteSqlNode),
    /// `CREATE TABLE`
    CreateTable(CreateTableSqlNode),
    /// `DROP TABLE`
    DropTable(DropTableSqlNode),
}
