//! Statement execution boundary and the helpers built on top of it.
//!
//! [`StatementFacade`] is implemented by a driver adapter; it owns connections,
//! statement preparation and parameter binding. [`Statements`] layers the row
//! materializer and value coercion over it.

use std::collections::HashSet;

use async_trait::async_trait;
use log::debug;

use crate::accessor::RowModel;
use crate::coerce::coerce;
use crate::config::BridgeConfig;
use crate::core::{BridgeError, Record, Representation, Result, Value};
use crate::materialize::{materialize_records, materialize_typed, single_cell, single_row};
use crate::result::ResultSet;

/// One positional slot of a stored procedure call.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    In(Value),
    Out(Representation),
}

/// An output parameter at a 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutParameter {
    pub index: usize,
    pub representation: Representation,
}

impl OutParameter {
    pub fn new(index: usize, representation: Representation) -> Self {
        Self {
            index,
            representation,
        }
    }
}

/// Database access consumed by the helpers.
#[async_trait]
pub trait StatementFacade: Send + Sync {
    /// Run a query and return its full result.
    async fn query(&self, sql: &str, params: &[Value]) -> Result<ResultSet>;

    /// Run an INSERT, UPDATE or DELETE; returns the affected row count.
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64>;

    /// Run one statement once per parameter set, as a single unit.
    async fn execute_batch(&self, sql: &str, batches: &[Vec<Value>]) -> Result<u64>;

    /// Call a stored procedure; returns the `Out` slot values in slot order.
    async fn call(&self, sql: &str, bindings: &[Binding]) -> Result<Vec<Value>>;
}

/// Lays out a procedure's slots: out-parameters take their declared
/// positions and `params` fill the remaining ones in order.
pub fn bind_positions(outs: &[OutParameter], params: &[Value]) -> Result<Vec<Binding>> {
    let total = outs.len() + params.len();
    let mut seen = HashSet::new();
    for out in outs {
        if out.index == 0 || out.index > total || !seen.insert(out.index) {
            return Err(BridgeError::Statement(format!(
                "Out parameter index {} is invalid for {} slot(s)",
                out.index, total
            )));
        }
    }

    let mut inputs = params.iter();
    let mut bindings = Vec::with_capacity(total);
    for position in 1..=total {
        match outs.iter().find(|out| out.index == position) {
            Some(out) => bindings.push(Binding::Out(out.representation)),
            None => match inputs.next() {
                Some(value) => bindings.push(Binding::In(value.clone())),
                None => {
                    return Err(BridgeError::Statement(format!(
                        "Missing input parameter for slot {}",
                        position
                    )));
                }
            },
        }
    }

    Ok(bindings)
}

/// True when every input is present and non-empty.
///
/// Handlers check request parameters with this before building a statement.
pub fn has_inputs<I, S>(inputs: I) -> bool
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    inputs
        .into_iter()
        .all(|input| input.is_some_and(|text| !text.as_ref().is_empty()))
}

/// Query and update helpers over a [`StatementFacade`].
///
/// # Examples
///
/// ```ignore
/// let statements = Statements::new(driver);
/// let users: Vec<User> = statements
///     .query_as("SELECT id, first_name FROM users WHERE active = ?", &[Value::Boolean(true)])
///     .await?;
/// let total = statements.query_single_cell("SELECT COUNT(*) FROM users", &[]).await?;
/// ```
pub struct Statements<F> {
    facade: F,
    config: BridgeConfig,
}

impl<F: StatementFacade> Statements<F> {
    pub fn new(facade: F) -> Self {
        Self::with_config(facade, BridgeConfig::default())
    }

    pub fn with_config(facade: F, config: BridgeConfig) -> Self {
        Self { facade, config }
    }

    pub fn facade(&self) -> &F {
        &self.facade
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub async fn execute_update(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.log_statement(sql, params);
        self.facade.execute(sql, params).await
    }

    pub async fn execute_insert(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.execute_update(sql, params).await
    }

    pub async fn execute_delete(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.execute_update(sql, params).await
    }

    pub async fn execute_batch_update(&self, sql: &str, batches: &[Vec<Value>]) -> Result<u64> {
        if self.config.log_statements {
            debug!("Executing batch: {} ({} parameter set(s))", sql, batches.len());
        }
        self.facade.execute_batch(sql, batches).await
    }

    pub async fn query_records(&self, sql: &str, params: &[Value]) -> Result<Vec<Record>> {
        let result = self.run_query(sql, params).await?;
        let (columns, rows) = result.into_rows();
        materialize_records(&columns, rows)
    }

    pub async fn query_as<T: RowModel>(&self, sql: &str, params: &[Value]) -> Result<Vec<T>> {
        let result = self.run_query(sql, params).await?;
        let (columns, rows) = result.into_rows();
        materialize_typed(&columns, rows)
    }

    /// The only row of the result as `T`; `None` unless exactly one row came back.
    pub async fn query_single_row<T: RowModel>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<T>> {
        Ok(single_row(self.query_as(sql, params).await?))
    }

    pub async fn query_single_record(&self, sql: &str, params: &[Value]) -> Result<Option<Record>> {
        Ok(single_row(self.query_records(sql, params).await?))
    }

    /// Single value coerced to the configured default representation.
    pub async fn query_single_cell(&self, sql: &str, params: &[Value]) -> Result<Option<Value>> {
        self.query_single_cell_as(sql, self.config.default_cell_representation, params)
            .await
    }

    pub async fn query_single_cell_as(
        &self,
        sql: &str,
        representation: Representation,
        params: &[Value],
    ) -> Result<Option<Value>> {
        match self.query_single_record(sql, params).await? {
            Some(record) => single_cell(&record, representation),
            None => Ok(None),
        }
    }

    /// Calls a stored procedure and coerces each output to its declared
    /// representation, position by position.
    pub async fn call_procedure(
        &self,
        sql: &str,
        outs: &[OutParameter],
        params: &[Value],
    ) -> Result<Vec<Value>> {
        let bindings = bind_positions(outs, params)?;
        self.log_statement(sql, params);

        let outputs = self.facade.call(sql, &bindings).await?;
        if outputs.len() != outs.len() {
            return Err(BridgeError::Statement(format!(
                "Expected {} output value(s), got {}",
                outs.len(),
                outputs.len()
            )));
        }

        outputs
            .into_iter()
            .zip(outs)
            .map(|(value, out)| coerce(value, out.representation))
            .collect()
    }

    pub async fn call_for_single_output(
        &self,
        sql: &str,
        out: OutParameter,
        params: &[Value],
    ) -> Result<Option<Value>> {
        let outputs = self.call_procedure(sql, &[out], params).await?;
        Ok(outputs.into_iter().next())
    }

    async fn run_query(&self, sql: &str, params: &[Value]) -> Result<ResultSet> {
        self.log_statement(sql, params);
        let result = self.facade.query(sql, params).await?;
        if self.config.log_statements {
            debug!("Query successful, rows: {}", result.row_count());
        }
        Ok(result)
    }

    fn log_statement(&self, sql: &str, params: &[Value]) {
        if self.config.log_statements {
            debug!("Executing statement: {} with params: {:?}", sql, params);
        }
    }
}
