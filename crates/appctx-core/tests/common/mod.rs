use std::sync::{Arc, Mutex};

use appctx_core::{DatabaseTransactionConnection, TransactionConnection, TransactionHandler};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Transaction connection double that records the statements it receives
#[allow(dead_code)]
pub struct RecordingConnection {
    pub label: String,
    pub statements: Mutex<Vec<String>>,
}

#[async_trait]
impl DatabaseTransactionConnection for RecordingConnection {
    async fn query(&self, sql: &str, values: &[Value]) -> anyhow::Result<Value> {
        if let Ok(mut statements) = self.statements.lock() {
            statements.push(sql.to_string());
        }
        Ok(json!({ "connection": self.label, "params": values.len() }))
    }

    async fn transaction(
        &self,
        handler: TransactionHandler,
        _retry_limit: Option<u32>,
    ) -> anyhow::Result<Value> {
        let nested: TransactionConnection = recording_connection(&format!("{}/nested", self.label));
        handler(nested).await
    }
}

/// Create a connection handle labelled `label`
#[allow(dead_code)]
pub fn recording_connection(label: &str) -> TransactionConnection {
    Arc::new(RecordingConnection {
        label: label.to_string(),
        statements: Mutex::new(Vec::new()),
    })
}

/// True if both handles point at the same connection object
#[allow(dead_code)]
pub fn same_connection(a: &TransactionConnection, b: &TransactionConnection) -> bool {
    Arc::ptr_eq(a, b)
}
