//! Expression evaluation for filters
//!
//! Evaluates filter expressions row by row, producing a boolean mask.

use crate::ast::*;
use homeview_io::{CellValue, DataTable};
use thiserror::Error;

/// Evaluation errors
#[derive(Debug, Error, PartialEq)]
pub enum EvalError {
    #[error("Field not found: {0}")]
    FieldNotFound(String),
}

/// Result type for evaluation
pub type EvalResult<T> = Result<T, EvalError>;

/// Context for evaluation - provides row values
pub trait FilterContext {
    /// Get the value of a field at a row
    fn field_value(&self, field: &str, row: usize) -> CellValue;

    /// Check whether a field exists
    fn has_field(&self, field: &str) -> bool;

    /// Get the number of rows
    fn num_rows(&self) -> usize;
}

impl FilterContext for DataTable {
    fn field_value(&self, field: &str, row: usize) -> CellValue {
        self.column(field)
            .map(|c| c.cell(row))
            .unwrap_or(CellValue::Null)
    }

    fn has_field(&self, field: &str) -> bool {
        self.column(field).is_some()
    }

    fn num_rows(&self) -> usize {
        DataTable::num_rows(self)
    }
}

/// Evaluator for filter expressions
pub struct Evaluator<'a, C: FilterContext> {
    context: &'a C,
}

impl<'a, C: FilterContext> Evaluator<'a, C> {
    /// Create a new evaluator
    pub fn new(context: &'a C) -> Self {
        Self { context }
    }

    /// Evaluate an expression, returning a selection mask
    ///
    /// Every referenced field must exist, even when there are no rows.
    pub fn evaluate(&self, expr: &FilterExpr) -> EvalResult<Vec<bool>> {
        if let Some(missing) = expr.fields().into_iter().find(|f| !self.context.has_field(f)) {
            return Err(EvalError::FieldNotFound(missing.to_string()));
        }

        Ok((0..self.context.num_rows())
            .map(|row| self.evaluate_at(expr, row))
            .collect())
    }

    /// Evaluate an expression at a single row
    pub fn evaluate_at(&self, expr: &FilterExpr, row: usize) -> bool {
        match expr {
            FilterExpr::All => true,
            FilterExpr::None => false,
            FilterExpr::And(left, right) => {
                self.evaluate_at(left, row) && self.evaluate_at(right, row)
            }
            FilterExpr::Or(left, right) => {
                self.evaluate_at(left, row) || self.evaluate_at(right, row)
            }
            FilterExpr::Not(inner) => !self.evaluate_at(inner, row),
            FilterExpr::In { field, values } => {
                let cell = self.context.field_value(field, row);
                values
                    .iter()
                    .any(|v| compare_cell(&cell, ComparisonOp::Eq, v))
            }
            FilterExpr::Compare { field, op, value } => {
                let cell = self.context.field_value(field, row);
                compare_cell(&cell, *op, value)
            }
        }
    }
}

/// Compare a cell against a literal. Null cells never match.
fn compare_cell(cell: &CellValue, op: ComparisonOp, literal: &Literal) -> bool {
    match (cell, literal) {
        (CellValue::Null, _) => false,
        (CellValue::Text(text), Literal::Text(s)) => op.evaluate_str(text, s),
        (CellValue::Text(text), Literal::Number(n)) => text
            .trim()
            .parse::<f64>()
            .map(|x| op.evaluate(x, *n))
            .unwrap_or(false),
        (cell, Literal::Number(n)) => cell_number(cell).is_some_and(|x| op.evaluate(x, *n)),
        (cell, Literal::Text(s)) => op.evaluate_str(&cell.to_string(), s),
    }
}

fn cell_number(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Int(v) => Some(*v as f64),
        CellValue::Float(v) => Some(*v),
        CellValue::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
        CellValue::Null | CellValue::Text(_) => None,
    }
}

/// Rows of `table` matching `expr`, in their original order
pub fn filter_table(table: &DataTable, expr: &FilterExpr) -> EvalResult<DataTable> {
    let mask = Evaluator::new(table).evaluate(expr)?;
    Ok(table.take(&selected_indices(&mask)))
}

/// Count the number of selected rows
pub fn count_selected(mask: &[bool]) -> usize {
    mask.iter().filter(|&&b| b).count()
}

/// Get indices of selected rows
pub fn selected_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &b)| if b { Some(i) } else { None })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use homeview_io::DataColumn;

    fn table() -> DataTable {
        DataTable::new()
            .with_column(
                "zipcode",
                DataColumn::Int64(vec![Some(98001), Some(98002), None, Some(98001)]),
            )
            .with_column(
                "price",
                DataColumn::Float64(vec![Some(100.0), Some(250.0), Some(300.0), None]),
            )
            .with_column(
                "season",
                DataColumn::String(vec![
                    Some("summer".into()),
                    Some("fall".into()),
                    Some("summer".into()),
                    None,
                ]),
            )
    }

    #[test]
    fn test_evaluate_in() {
        let t = table();
        let mask = Evaluator::new(&t)
            .evaluate(&FilterExpr::in_ints("zipcode", [98001]))
            .unwrap();
        assert_eq!(mask, vec![true, false, false, true]);
    }

    #[test]
    fn test_evaluate_compare_and_not() {
        let t = table();
        let eval = Evaluator::new(&t);

        let gt = FilterExpr::compare("price", ComparisonOp::Gt, 200.0);
        assert_eq!(eval.evaluate(&gt).unwrap(), vec![false, true, true, false]);

        // Null cells fail the predicate, so NOT selects them
        let not = FilterExpr::not(gt);
        assert_eq!(eval.evaluate(&not).unwrap(), vec![true, false, false, true]);
    }

    #[test]
    fn test_evaluate_text() {
        let t = table();
        let expr = FilterExpr::compare("season", ComparisonOp::Eq, "summer");
        let mask = Evaluator::new(&t).evaluate(&expr).unwrap();
        assert_eq!(mask, vec![true, false, true, false]);
    }

    #[test]
    fn test_missing_field() {
        let t = DataTable::new();
        let err = Evaluator::new(&t)
            .evaluate(&FilterExpr::in_ints("zipcode", [1]))
            .unwrap_err();
        assert_eq!(err, EvalError::FieldNotFound("zipcode".into()));
    }

    #[test]
    fn test_filter_table() {
        let filtered = filter_table(&table(), &FilterExpr::in_ints("zipcode", [98002])).unwrap();
        assert_eq!(filtered.num_rows(), 1);
        assert_eq!(filtered.column("price").unwrap().f64_at(0), Some(250.0));
    }

    #[test]
    fn test_mask_helpers() {
        let mask = vec![true, false, true, false, true];
        assert_eq!(count_selected(&mask), 3);
        assert_eq!(selected_indices(&mask), vec![0, 2, 4]);
    }
}
