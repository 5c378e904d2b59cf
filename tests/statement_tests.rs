use std::collections::HashMap;

use async_trait::async_trait;
use futures::lock::Mutex;
use rowbridge::{
    Binding, BridgeConfig, BridgeError, ColumnSet, OutParameter, Representation, Result,
    ResultSet, RowModel, StatementFacade, Statements, Value, has_inputs, read_blob,
};

#[derive(Debug, PartialEq, RowModel)]
struct Account {
    id: i64,
    owner: String,
    balance: Option<f64>,
}

/// Facade double that answers queries from canned results and records writes.
#[derive(Default)]
struct ScriptedFacade {
    results: HashMap<String, ResultSet>,
    outputs: Vec<Value>,
    executed: Mutex<Vec<(String, usize)>>,
    calls: Mutex<Vec<Vec<Binding>>>,
}

impl ScriptedFacade {
    fn with_result(mut self, sql: &str, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        self.results.insert(
            sql.to_string(),
            ResultSet::new(ColumnSet::new(columns.iter().copied()), rows),
        );
        self
    }

    fn with_outputs(mut self, outputs: Vec<Value>) -> Self {
        self.outputs = outputs;
        self
    }
}

#[async_trait]
impl StatementFacade for ScriptedFacade {
    async fn query(&self, sql: &str, _params: &[Value]) -> Result<ResultSet> {
        self.results
            .get(sql)
            .cloned()
            .ok_or_else(|| BridgeError::Statement(format!("no result scripted for {}", sql)))
    }

    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64> {
        self.executed.lock().await.push((sql.to_string(), params.len()));
        Ok(params.len() as u64)
    }

    async fn execute_batch(&self, sql: &str, batches: &[Vec<Value>]) -> Result<u64> {
        let mut executed = self.executed.lock().await;
        for batch in batches {
            executed.push((sql.to_string(), batch.len()));
        }
        Ok(batches.len() as u64)
    }

    async fn call(&self, _sql: &str, bindings: &[Binding]) -> Result<Vec<Value>> {
        self.calls.lock().await.push(bindings.to_vec());
        Ok(self.outputs.clone())
    }
}

const ACCOUNTS: &str = "SELECT id, owner, balance FROM accounts";

fn accounts_facade() -> ScriptedFacade {
    ScriptedFacade::default().with_result(
        ACCOUNTS,
        &["ID", "OWNER", "BALANCE"],
        vec![
            vec![Value::Int64(1), Value::from("ann"), Value::from("10.5")],
            vec![Value::Int64(2), Value::from("bob"), Value::Null],
        ],
    )
}

#[tokio::test]
async fn test_query_records_keep_column_order() {
    let statements = Statements::new(accounts_facade());
    let records = statements.query_records(ACCOUNTS, &[]).await.unwrap();

    assert_eq!(records.len(), 2);
    let keys: Vec<_> = records[0].keys().collect();
    assert_eq!(keys, ["ID", "OWNER", "BALANCE"]);
    assert_eq!(records[1].get("BALANCE"), Some(&Value::Null));
}

#[tokio::test]
async fn test_query_as_materializes_models() {
    let statements = Statements::new(accounts_facade());
    let accounts: Vec<Account> = statements.query_as(ACCOUNTS, &[]).await.unwrap();

    assert_eq!(
        accounts,
        vec![
            Account {
                id: 1,
                owner: "ann".into(),
                balance: Some(10.5),
            },
            Account {
                id: 2,
                owner: "bob".into(),
                balance: None,
            },
        ]
    );
}

#[tokio::test]
async fn test_query_as_unknown_column_fails() {
    let facade = ScriptedFacade::default().with_result(
        "SELECT nickname FROM accounts",
        &["nickname"],
        vec![vec![Value::from("x")]],
    );
    let statements = Statements::new(facade);
    let err = statements
        .query_as::<Account>("SELECT nickname FROM accounts", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::AccessorNotFound { ref attribute, .. } if attribute == "nickname"));
}

#[tokio::test]
async fn test_single_row_requires_exactly_one_row() {
    let facade = accounts_facade().with_result(
        "SELECT * FROM accounts WHERE id = ?",
        &["id", "owner"],
        vec![vec![Value::Int32(1), Value::from("ann")]],
    );
    let statements = Statements::new(facade);

    let many = statements.query_single_row::<Account>(ACCOUNTS, &[]).await.unwrap();
    assert!(many.is_none());

    let one = statements
        .query_single_row::<Account>("SELECT * FROM accounts WHERE id = ?", &[Value::Int32(1)])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(one.owner, "ann");
    assert_eq!(one.balance, None);
}

#[tokio::test]
async fn test_single_cell_uses_last_column() {
    let facade = ScriptedFacade::default()
        .with_result(
            "SELECT name, COUNT(*) FROM accounts",
            &["name", "count"],
            vec![vec![Value::from("ann"), Value::Int64(42)]],
        )
        .with_result("SELECT NULL", &["n"], vec![vec![Value::Null]])
        .with_result("SELECT id FROM nothing", &["id"], vec![]);
    let statements = Statements::new(facade);

    let text = statements
        .query_single_cell("SELECT name, COUNT(*) FROM accounts", &[])
        .await
        .unwrap();
    assert_eq!(text, Some(Value::from("42")));

    let count = statements
        .query_single_cell_as("SELECT name, COUNT(*) FROM accounts", Representation::Int32, &[])
        .await
        .unwrap();
    assert_eq!(count, Some(Value::Int32(42)));

    assert_eq!(statements.query_single_cell("SELECT NULL", &[]).await.unwrap(), None);
    assert_eq!(
        statements.query_single_cell("SELECT id FROM nothing", &[]).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_single_cell_default_comes_from_config() {
    let facade = ScriptedFacade::default().with_result(
        "SELECT MAX(balance) FROM accounts",
        &["max"],
        vec![vec![Value::from("99.25")]],
    );
    let config = BridgeConfig::new().default_cell_representation(Representation::Float64);
    let statements = Statements::with_config(facade, config);

    let max = statements
        .query_single_cell("SELECT MAX(balance) FROM accounts", &[])
        .await
        .unwrap();
    assert_eq!(max, Some(Value::Float64(99.25)));
}

#[tokio::test]
async fn test_updates_and_batches_reach_the_facade() {
    let statements = Statements::new(ScriptedFacade::default());

    let affected = statements
        .execute_update("UPDATE accounts SET owner = ? WHERE id = ?", &[Value::from("cy"), Value::Int32(3)])
        .await
        .unwrap();
    assert_eq!(affected, 2);
    statements
        .execute_insert("INSERT INTO accounts (owner) VALUES (?)", &[Value::from("dee")])
        .await
        .unwrap();
    statements
        .execute_delete("DELETE FROM accounts", &[])
        .await
        .unwrap();

    let batches = vec![vec![Value::Int32(1)], vec![Value::Int32(2)], vec![Value::Int32(3)]];
    let total = statements
        .execute_batch_update("DELETE FROM accounts WHERE id = ?", &batches)
        .await
        .unwrap();
    assert_eq!(total, 3);

    let executed = statements.facade().executed.lock().await;
    assert_eq!(executed.len(), 6);
    assert_eq!(executed[0], ("UPDATE accounts SET owner = ? WHERE id = ?".to_string(), 2));
    assert_eq!(executed[2], ("DELETE FROM accounts".to_string(), 0));
}

#[tokio::test]
async fn test_call_procedure_interleaves_and_coerces_outputs() {
    let facade = ScriptedFacade::default().with_outputs(vec![Value::from("7"), Value::from("TRUE")]);
    let statements = Statements::new(facade);

    let outs = [
        OutParameter::new(1, Representation::Int64),
        OutParameter::new(3, Representation::Boolean),
    ];
    let outputs = statements
        .call_procedure("{call transfer(?, ?, ?, ?)}", &outs, &[Value::from("ann"), Value::Int32(5)])
        .await
        .unwrap();
    assert_eq!(outputs, vec![Value::Int64(7), Value::Boolean(true)]);

    let calls = statements.facade().calls.lock().await;
    assert_eq!(
        calls[0],
        vec![
            Binding::Out(Representation::Int64),
            Binding::In(Value::from("ann")),
            Binding::Out(Representation::Boolean),
            Binding::In(Value::Int32(5)),
        ]
    );
}

#[tokio::test]
async fn test_call_procedure_output_count_mismatch() {
    let facade = ScriptedFacade::default().with_outputs(vec![]);
    let statements = Statements::new(facade);

    let err = statements
        .call_procedure("{call ping(?)}", &[OutParameter::new(1, Representation::Text)], &[])
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Statement(_)));
}

#[test]
fn test_call_for_single_output_blocking() {
    let facade = ScriptedFacade::default().with_outputs(vec![Value::Int64(12)]);
    let statements = Statements::new(facade);

    let output = tokio_test::block_on(statements.call_for_single_output(
        "{? = call next_id(?)}",
        OutParameter::new(1, Representation::Text),
        &[Value::from("accounts")],
    ))
    .unwrap();
    assert_eq!(output, Some(Value::from("12")));
}

#[tokio::test]
async fn test_blob_column_reads_as_text() {
    let facade = ScriptedFacade::default().with_result(
        "SELECT id, body FROM documents WHERE slug = ?",
        &["id", "body"],
        vec![vec![Value::Int64(5), Value::Binary(r#"{"title": "Zoë"}"#.as_bytes().to_vec())]],
    );
    let statements = Statements::new(facade);

    let slug = Some("welcome");
    assert!(has_inputs([slug]));
    assert!(!has_inputs([slug, Some("")]));

    let record = statements
        .query_single_record("SELECT id, body FROM documents WHERE slug = ?", &[Value::from("welcome")])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read_blob(&record, "body").unwrap().as_deref(), Some(r#"{"title": "Zoë"}"#));
    assert!(matches!(
        read_blob(&record, "BODY"),
        Err(BridgeError::ColumnNotFound(_))
    ));
}
