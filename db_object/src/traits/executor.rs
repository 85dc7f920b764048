//! Stored procedure execution contract
//!
//! The core never talks to a database directly. Every verb builds a
//! `ProcedureCall` and hands it to a `ProcedureExecutor`, which returns the
//! produced result sets with JSON columns already decoded.

use crate::errors::ProcedureError;
use async_trait::async_trait;
use serde_json::Value;

pub use type_mapping::Row;

/// One stored procedure invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureCall {
    pub database: String,
    pub procedure: String,
    /// Arguments in binding order
    pub args: Vec<(String, Value)>,
    /// Discard the attempted write when execution fails
    pub rollback: bool,
}

impl ProcedureCall {
    pub fn new(database: &str, procedure: String, args: Vec<(String, Value)>) -> Self {
        Self {
            database: database.to_string(),
            procedure,
            args,
            rollback: false,
        }
    }

    pub fn with_rollback(mut self, rollback: bool) -> Self {
        self.rollback = rollback;
        self
    }

    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}

/// A single result set: its column description and rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Build a result set whose column description is taken from the first row
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        Self { columns, rows }
    }
}

/// Ordered result sets produced by one call, with a cursor over them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSets {
    sets: Vec<ResultSet>,
    position: usize,
}

impl ResultSets {
    pub fn new(sets: Vec<ResultSet>) -> Self {
        Self { sets, position: 0 }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Rows of the current result set
    pub fn data(&self) -> &[Row] {
        self.sets
            .get(self.position)
            .map(|set| set.rows.as_slice())
            .unwrap_or(&[])
    }

    /// Advance to the next result set.
    ///
    /// Returns `true` when a next set exists and carries a non-empty column
    /// description.
    pub fn next_set(&mut self) -> bool {
        if self.position < self.sets.len() {
            self.position += 1;
        }
        self.sets
            .get(self.position)
            .is_some_and(|set| !set.columns.is_empty())
    }

    pub fn get(&self, index: usize) -> Option<&ResultSet> {
        self.sets.get(index)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn into_sets(self) -> Vec<ResultSet> {
        self.sets
    }
}

/// The database collaborator used by every procedure store
#[async_trait]
pub trait ProcedureExecutor: Send + Sync {
    /// Execute the call and return all of its result sets.
    ///
    /// Implementations must commit unless `call.rollback` is set and the
    /// execution failed, and must release every acquired resource before
    /// returning.
    async fn execute(&self, call: &ProcedureCall) -> Result<ResultSets, ProcedureError>;

    /// Check that the database is reachable
    async fn health_check(&self) -> Result<(), ProcedureError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("row must be an object"),
        }
    }

    #[test]
    fn test_result_set_cursor() {
        let mut sets = ResultSets::new(vec![
            ResultSet::from_rows(vec![row(json!({"id": 1})), row(json!({"id": 2}))]),
            ResultSet::from_rows(vec![row(json!({"page": 1, "page_size": 10, "total": 2}))]),
        ]);

        assert_eq!(sets.data().len(), 2);
        assert!(sets.next_set());
        assert_eq!(sets.data()[0]["total"], json!(2));
        assert!(!sets.next_set());
        assert!(sets.data().is_empty());
        assert!(!sets.next_set());
    }

    #[test]
    fn test_next_set_ignores_sets_without_columns() {
        let mut sets = ResultSets::new(vec![
            ResultSet::from_rows(vec![row(json!({"id": 1}))]),
            ResultSet::default(),
        ]);
        assert!(!sets.next_set());
    }

    #[test]
    fn test_call_arguments() {
        let call = ProcedureCall::new("testing", "A_load".to_string(), vec![("id".into(), json!(2))])
            .with_rollback(true);
        assert_eq!(call.arg("id"), Some(&json!(2)));
        assert_eq!(call.arg("x"), None);
        assert!(call.rollback);
    }
}
