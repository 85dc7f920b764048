//! MySQL stored procedure client
//!
//! Executes `CALL \`db\`.\`procedure\`(?, ...)` statements through a sqlx
//! pool and collects every result set the procedure produces.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use futures::TryStreamExt;
use serde_json::Value;
use sqlx::mysql::{MySql, MySqlArguments, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, Either, Executor, Row as _, TypeInfo};
use std::collections::HashMap;
use std::time::Duration;

use config::DatabaseConfig;
use db_object::{ProcedureCall, ProcedureError, ProcedureExecutor, ResultSet, ResultSets, Row};
use db_object::validation::ValidatedIdentifier;
use type_mapping::{ColumnType, SqlValue, DATETIME_FORMAT};

use crate::errors::DbAbleError;

/// `ProcedureExecutor` backed by a MySQL connection pool
#[derive(Debug, Clone)]
pub struct MySqlProcedureClient {
    pool: MySqlPool,
}

impl MySqlProcedureClient {
    /// Connect a pool using the database configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbAbleError> {
        let mut pool_options = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        // Set max lifetime if specified
        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&config.connection_string()).await?;
        crate::debug_log!("[CLIENT] connected to {}:{}", config.host, config.port);

        Ok(Self { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Get database pool reference
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Build the `CALL` statement, one placeholder per argument
    pub fn statement(call: &ProcedureCall) -> Result<String, ProcedureError> {
        let database = ValidatedIdentifier::new(&call.database).map_err(ProcedureError::database)?;
        let procedure = ValidatedIdentifier::new(&call.procedure).map_err(ProcedureError::database)?;
        let placeholders = vec!["?"; call.args.len()].join(", ");
        Ok(format!(
            "CALL {}.{}({})",
            database.quoted(),
            procedure.quoted(),
            placeholders
        ))
    }

    async fn run<'c, E>(executor: E, sql: &str, args: Vec<SqlValue>) -> Result<ResultSets, ProcedureError>
    where
        E: Executor<'c, Database = MySql>,
    {
        let query = args.into_iter().fold(sqlx::query(sql), bind);

        // A CALL answers with one result per produced set plus a final status
        #[allow(deprecated)]
        let mut stream = query.fetch_many(executor);

        let mut sets = Vec::new();
        let mut current = PendingSet::default();
        while let Some(item) = stream.try_next().await.map_err(ProcedureError::database)? {
            match item {
                Either::Left(_) => sets.push(std::mem::take(&mut current).finish()?),
                Either::Right(row) => current.push(&row)?,
            }
        }
        if !current.rows.is_empty() {
            sets.push(current.finish()?);
        }

        // Drop the trailing status of the CALL itself
        if sets.last().is_some_and(|set: &ResultSet| set.columns.is_empty()) {
            sets.pop();
        }
        Ok(ResultSets::new(sets))
    }
}

fn bind<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: SqlValue,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        SqlValue::Text(s) | SqlValue::Json(s) => query.bind(s),
        SqlValue::BigInt(i) => query.bind(i),
        SqlValue::UnsignedBigInt(u) => query.bind(u),
        SqlValue::Double(f) => query.bind(f),
        SqlValue::Boolean(b) => query.bind(b),
        SqlValue::Null => query.bind(None::<String>),
    }
}

/// Rows of the result set being read
#[derive(Default)]
struct PendingSet {
    columns: Vec<String>,
    column_types: HashMap<String, ColumnType>,
    rows: Vec<Row>,
}

impl PendingSet {
    fn push(&mut self, row: &MySqlRow) -> Result<(), ProcedureError> {
        if self.rows.is_empty() {
            self.columns = row.columns().iter().map(|c| c.name().to_string()).collect();
            self.column_types = row
                .columns()
                .iter()
                .map(|c| (c.name().to_string(), ColumnType::from_type_name(c.type_info().name())))
                .collect();
        }

        let mut decoded = Row::new();
        for (index, column) in row.columns().iter().enumerate() {
            let column_type = self
                .column_types
                .get(column.name())
                .copied()
                .unwrap_or(ColumnType::Text);
            let value = decode_value(row, index, column_type).map_err(ProcedureError::database)?;
            decoded.insert(column.name().to_string(), value);
        }
        self.rows.push(decoded);
        Ok(())
    }

    fn finish(self) -> Result<ResultSet, ProcedureError> {
        let rows = self
            .rows
            .into_iter()
            .map(|row| type_mapping::decode_row(row, &self.column_types))
            .collect::<Result<Vec<_>, _>>()
            .map_err(ProcedureError::database)?;
        Ok(ResultSet::new(self.columns, rows))
    }
}

fn decode_value(row: &MySqlRow, index: usize, column_type: ColumnType) -> Result<Value, sqlx::Error> {
    let value = match column_type {
        ColumnType::Integer => row.try_get::<Option<i64>, _>(index)?.map(Value::from),
        ColumnType::UnsignedInteger => row.try_get::<Option<u64>, _>(index)?.map(Value::from),
        ColumnType::Float => row.try_get::<Option<f64>, _>(index)?.map(Value::from),
        ColumnType::Boolean => row.try_get::<Option<bool>, _>(index)?.map(Value::from),
        ColumnType::DateTime => row
            .try_get::<Option<NaiveDateTime>, _>(index)?
            .map(|dt| Value::from(dt.format(DATETIME_FORMAT).to_string())),
        ColumnType::Date => row
            .try_get::<Option<NaiveDate>, _>(index)?
            .map(|d| Value::from(d.format("%Y-%m-%d").to_string())),
        ColumnType::Time => row
            .try_get::<Option<NaiveTime>, _>(index)?
            .map(|t| Value::from(t.format("%H:%M:%S%.f").to_string())),
        ColumnType::Binary => row
            .try_get::<Option<Vec<u8>>, _>(index)?
            .map(|bytes| Value::from(String::from_utf8_lossy(&bytes).into_owned())),
        // Decimals keep their exact text; JSON text is parsed by `decode_row`
        ColumnType::Decimal | ColumnType::Text | ColumnType::Json => {
            row.try_get_unchecked::<Option<String>, _>(index)?.map(Value::from)
        }
        ColumnType::Null => None,
    };
    Ok(value.unwrap_or(Value::Null))
}

#[async_trait]
impl ProcedureExecutor for MySqlProcedureClient {
    async fn execute(&self, call: &ProcedureCall) -> Result<ResultSets, ProcedureError> {
        let sql = Self::statement(call)?;
        let args = type_mapping::encode_args(&call.args);
        crate::trace_log!("[CLIENT] {} with {:?}", sql, args);

        if !call.rollback {
            return Self::run(&self.pool, &sql, args).await;
        }

        let mut tx = self.pool.begin().await.map_err(ProcedureError::database)?;
        match Self::run(&mut *tx, &sql, args).await {
            Ok(sets) => {
                tx.commit().await.map_err(ProcedureError::database)?;
                Ok(sets)
            }
            Err(e) => {
                crate::debug_log!("[CLIENT] rolling back {}: {}", sql, e);
                tx.rollback().await.map_err(ProcedureError::database)?;
                Err(e)
            }
        }
    }

    async fn health_check(&self) -> Result<(), ProcedureError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(ProcedureError::database)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_statement_has_one_placeholder_per_argument() {
        let call = ProcedureCall::new(
            "testing",
            "Post_list_v2".to_string(),
            vec![("after".to_string(), json!(0)), ("limit".to_string(), json!(6))],
        );
        assert_eq!(
            MySqlProcedureClient::statement(&call).unwrap(),
            "CALL `testing`.`Post_list_v2`(?, ?)"
        );

        let bare = ProcedureCall::new("testing", "Post_list".to_string(), vec![]);
        assert_eq!(
            MySqlProcedureClient::statement(&bare).unwrap(),
            "CALL `testing`.`Post_list`()"
        );
    }

    #[test]
    fn test_statement_rejects_unsafe_identifiers() {
        let call = ProcedureCall::new("testing`; DROP DATABASE x; --", "A_load".to_string(), vec![]);
        assert!(MySqlProcedureClient::statement(&call).is_err());
    }
}
