//! Driver-free `DbConn` for tests: a queue of expected calls, each with the
//! SQL fragment it must contain, optionally the exact arguments, and the
//! canned outcome to hand back.

use super::DbConn;
use crate::sql::{PgBindValue, Row};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Call {
    Query,
    QueryOne,
    Execute,
}

#[derive(Clone, Debug)]
enum Outcome {
    Rows(Vec<Row>),
    Affected(u64),
    Error(String),
}

/// One expected call. Build with [`Expect::query`], [`Expect::query_one`] or
/// [`Expect::execute`] and refine with the `with_*` / `returning_*` methods.
#[derive(Clone, Debug)]
pub struct Expect {
    call: Call,
    sql: String,
    args: Option<Vec<PgBindValue>>,
    outcome: Outcome,
}

impl Expect {
    fn new(call: Call, sql: &str) -> Self {
        let outcome = match call {
            Call::Execute => Outcome::Affected(0),
            Call::Query | Call::QueryOne => Outcome::Rows(Vec::new()),
        };
        Expect {
            call,
            sql: normalize(sql),
            args: None,
            outcome,
        }
    }

    pub fn query(sql: &str) -> Self {
        Self::new(Call::Query, sql)
    }

    pub fn query_one(sql: &str) -> Self {
        Self::new(Call::QueryOne, sql)
    }

    pub fn execute(sql: &str) -> Self {
        Self::new(Call::Execute, sql)
    }

    /// Require these exact positional arguments.
    pub fn with_args(mut self, args: Vec<PgBindValue>) -> Self {
        self.args = Some(args);
        self
    }

    /// Rows as JSON objects; anything that is not an object is skipped.
    pub fn returning_rows(mut self, rows: Vec<Value>) -> Self {
        let rows = rows
            .into_iter()
            .filter_map(|r| match r {
                Value::Object(m) => Some(m),
                _ => None,
            })
            .collect();
        self.outcome = Outcome::Rows(rows);
        self
    }

    pub fn returning_row(self, row: Value) -> Self {
        self.returning_rows(vec![row])
    }

    pub fn returning_affected(mut self, n: u64) -> Self {
        self.outcome = Outcome::Affected(n);
        self
    }

    pub fn returning_error(mut self, message: &str) -> Self {
        self.outcome = Outcome::Error(message.to_string());
        self
    }
}

#[derive(Default)]
pub struct MockConn {
    expected: Mutex<VecDeque<Expect>>,
    failures: Mutex<Vec<String>>,
}

impl MockConn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(&self, e: Expect) -> &Self {
        lock(&self.expected).push_back(e);
        self
    }

    /// `Err` lists every mismatched call and every expectation left unused.
    pub fn expectations_were_met(&self) -> Result<(), String> {
        let mut problems = lock(&self.failures).clone();
        for e in lock(&self.expected).iter() {
            problems.push(format!("expected {:?} containing `{}` was never made", e.call, e.sql));
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }

    fn take(&self, call: Call, sql: &str, params: &[PgBindValue]) -> Result<Outcome, sqlx::Error> {
        let actual = normalize(sql);
        let next = lock(&self.expected).pop_front();
        let problem = match next {
            None => format!("unexpected {:?}: `{}`", call, actual),
            Some(e) if e.call != call => {
                format!("expected {:?} but got {:?}: `{}`", e.call, call, actual)
            }
            Some(e) if !actual.contains(&e.sql) => {
                format!("expected SQL containing `{}`, got `{}`", e.sql, actual)
            }
            Some(Expect { args: Some(args), .. }) if args.as_slice() != params => {
                format!("arguments {:?} do not match expected {:?}", params, args)
            }
            Some(e) => {
                return match e.outcome {
                    Outcome::Error(message) => Err(sqlx::Error::Protocol(message)),
                    other => Ok(other),
                }
            }
        };
        lock(&self.failures).push(problem.clone());
        Err(sqlx::Error::Protocol(problem))
    }
}

#[async_trait]
impl DbConn for MockConn {
    async fn query(&self, sql: &str, params: &[PgBindValue]) -> Result<Vec<Row>, sqlx::Error> {
        match self.take(Call::Query, sql, params)? {
            Outcome::Rows(rows) => Ok(rows),
            _ => Ok(Vec::new()),
        }
    }

    async fn query_one(
        &self,
        sql: &str,
        params: &[PgBindValue],
    ) -> Result<Option<Row>, sqlx::Error> {
        match self.take(Call::QueryOne, sql, params)? {
            Outcome::Rows(rows) => Ok(rows.into_iter().next()),
            _ => Ok(None),
        }
    }

    async fn execute(&self, sql: &str, params: &[PgBindValue]) -> Result<u64, sqlx::Error> {
        match self.take(Call::Execute, sql, params)? {
            Outcome::Affected(n) => Ok(n),
            _ => Ok(0),
        }
    }
}

fn normalize(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn matches_fragment_and_args() {
        let mock = MockConn::new();
        mock.expect(
            Expect::query_one("FROM t WHERE id = $1")
                .with_args(vec![PgBindValue::from(7)])
                .returning_row(json!({"id": 7})),
        );
        let row = mock
            .query_one("SELECT *\n   FROM t\n  WHERE id = $1", &[PgBindValue::from(7)])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row["id"], 7);
        mock.expectations_were_met().unwrap();
    }

    #[tokio::test]
    async fn reports_wrong_call_and_leftovers() {
        let mock = MockConn::new();
        mock.expect(Expect::execute("DELETE FROM t"))
            .expect(Expect::query("SELECT"));
        assert!(mock.query("DELETE FROM t", &[]).await.is_err());
        let err = mock.expectations_were_met().unwrap_err();
        assert!(err.contains("expected Execute but got Query"));
        assert!(err.contains("never made"));
    }

    #[tokio::test]
    async fn canned_error_is_returned() {
        let mock = MockConn::new();
        mock.expect(Expect::query("SELECT").returning_error("test error"));
        assert!(matches!(
            mock.query("SELECT 1", &[]).await,
            Err(sqlx::Error::Protocol(m)) if m == "test error"
        ));
        mock.expectations_were_met().unwrap();
    }
}
