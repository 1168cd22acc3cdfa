//! Bind a record type to a table, write a few rows, and scan them back
//! in primary-key order.
//!
//! Run with: cargo run --example user_table

use std::sync::Arc;

use strata_engine::MemoryEngine;
use strata_table_client::{Datum, DatumKind, Db, Field, Record, Result};

#[derive(Debug, Clone, Default, PartialEq)]
struct User {
    id: String,
    name: String,
    title: String,
}

impl Record for User {
    fn fields() -> &'static [Field] {
        const FIELDS: &[Field] = &[
            Field::new("id", DatumKind::String),
            Field::new("name", DatumKind::String),
            Field::new("title", DatumKind::String),
        ];
        FIELDS
    }

    fn datum(&self, column: &str) -> Option<Datum> {
        match column {
            "id" => Some(Datum::String(self.id.clone())),
            "name" => Some(Datum::String(self.name.clone())),
            "title" => Some(Datum::String(self.title.clone())),
            _ => None,
        }
    }

    fn set_datum(&mut self, column: &str, datum: Datum) -> Result<()> {
        match column {
            "id" => self.id = datum.into_string()?,
            "name" => self.name = datum.into_string()?,
            "title" => self.title = datum.into_string()?,
            _ => {}
        }
        Ok(())
    }
}

fn user(id: &str, name: &str, title: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        title: title.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let db = Db::new(Arc::new(MemoryEngine::new()));
    db.bind_model::<User>("users", &["id"])?;

    // Write three rows in one batch.
    let users = [
        user("3", "cara", "ops"),
        user("1", "ada", "admin"),
        user("2", "brin", "dev"),
    ];
    let mut batch = db.batch();
    for u in &users {
        batch.put(u, &[]);
    }
    for result in db.run(batch).await? {
        result?;
    }

    // Read one row back by primary key.
    let mut ada = User {
        id: "1".to_string(),
        ..Default::default()
    };
    db.get(&mut ada, &[]).await?;
    println!("get id=1 -> {ada:?}");

    // Scan the full range: rows come back in id order.
    let mut rows: Vec<User> = Vec::new();
    let start = User {
        id: "0".to_string(),
        ..Default::default()
    };
    let end = User {
        id: "9".to_string(),
        ..Default::default()
    };
    db.scan(&mut rows, &start, &end, 0, &[]).await?;
    for row in &rows {
        println!("scan -> {row:?}");
    }

    Ok(())
}
