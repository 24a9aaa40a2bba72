use anyhow::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, Statement, TransactionTrait, Value,
};
use std::collections::HashSet;
use std::path::PathBuf;
use tokio::fs;

pub type OrmConn = DatabaseConnection;

const MIGRATIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    name TEXT PRIMARY KEY,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<OrmConn> {
    let conn = Database::connect(database_url).await?;
    tracing::info!("connected to database");
    Ok(conn)
}

/// Runs the SQL files in `migrations/` in filename order. Each file is applied
/// once; its name is recorded in `schema_migrations` in the same transaction.
pub async fn run_migrations(conn: &OrmConn) -> Result<()> {
    let mut entries = fs::read_dir("migrations").await?;
    let mut files: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }

    let backend = conn.get_database_backend();
    conn.execute(Statement::from_string(backend, MIGRATIONS_TABLE))
        .await?;

    let mut applied = HashSet::new();
    let rows = conn
        .query_all(Statement::from_string(
            backend,
            "SELECT name FROM schema_migrations",
        ))
        .await?;
    for row in rows {
        applied.insert(row.try_get::<String>("", "name")?);
    }

    for (name, file) in pending_migrations(files, &applied) {
        tracing::info!(migration = %name, "applying migration");
        let sql = fs::read_to_string(&file).await?;

        let txn = conn.begin().await?;
        for stmt in split_statements(&sql) {
            txn.execute(Statement::from_string(backend, stmt)).await?;
        }
        txn.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO schema_migrations (name) VALUES ($1)",
            [Value::from(name.clone())],
        ))
        .await?;
        txn.commit().await?;
    }

    Ok(())
}

/// Files not yet recorded as applied, sorted by name.
fn pending_migrations(files: Vec<PathBuf>, applied: &HashSet<String>) -> Vec<(String, PathBuf)> {
    let mut pending: Vec<(String, PathBuf)> = files
        .into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_owned();
            Some((name, path))
        })
        .filter(|(name, _)| !applied.contains(name))
        .collect();
    pending.sort_by(|a, b| a.0.cmp(&b.0));
    pending
}

/// Postgres prepared statements cannot hold several commands, so a file is
/// split on `;` and run one statement at a time.
fn split_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .map(|stmt| format!("{stmt};"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applied_files_are_skipped_and_the_rest_sorted() {
        let files = vec![
            PathBuf::from("migrations/0002_relax.sql"),
            PathBuf::from("migrations/0001_init.sql"),
            PathBuf::from("migrations/0003_next.sql"),
        ];
        let applied = HashSet::from(["0001_init.sql".to_owned()]);

        let names: Vec<String> = pending_migrations(files, &applied)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["0002_relax.sql", "0003_next.sql"]);
    }

    #[test]
    fn statements_are_split_and_blank_ones_dropped() {
        let sql = "CREATE TABLE a (id INT);\n\n  ;ALTER TABLE a ADD b INT;\n";
        assert_eq!(
            split_statements(sql),
            ["CREATE TABLE a (id INT);", "ALTER TABLE a ADD b INT;"]
        );
    }
}
