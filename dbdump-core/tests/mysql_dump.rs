//! End-to-end dump tests against a real MySQL server.
//!
//! These tests start a MySQL container and therefore need Docker:
//! `cargo test -p dbdump-core --features container-tests`.

#![cfg(feature = "container-tests")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use dbdump_core::{
    ConnectionConfig, DbDumpError, DumpLogger, DumpOptions, Result, SchemaInspector,
    adapters::mysql::MySqlAdapter, dump_database,
};
use sqlx::MySqlPool;
use testcontainers_modules::{mysql::Mysql, testcontainers::ContainerAsync, testcontainers::runners::AsyncRunner};

struct SilentLogger;

impl DumpLogger for SilentLogger {
    fn info(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Helper function to wait for MySQL to be ready
async fn wait_for_mysql_ready(database_url: &str, max_attempts: u32) -> Result<()> {
    for attempt in 1..=max_attempts {
        if let Ok(pool) = MySqlPool::connect(database_url).await {
            let ready = sqlx::query("SELECT 1").fetch_one(&pool).await.is_ok();
            pool.close().await;
            if ready {
                return Ok(());
            }
        }
        if attempt < max_attempts {
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    }
    Err(DbDumpError::connection_failed(
        "MySQL container never became ready",
        std::io::Error::new(std::io::ErrorKind::TimedOut, "readiness probe timed out"),
    ))
}

async fn start_mysql(setup: &[&str]) -> (ContainerAsync<Mysql>, ConnectionConfig) {
    let mysql = Mysql::default().start().await.unwrap();
    let port = mysql.get_host_port_ipv4(3306).await.unwrap();
    let database_url = format!("mysql://root@127.0.0.1:{}/test", port);

    wait_for_mysql_ready(&database_url, 60).await.unwrap();

    let pool = MySqlPool::connect(&database_url).await.unwrap();
    for statement in setup {
        sqlx::raw_sql(statement).execute(&pool).await.unwrap();
    }
    pool.close().await;

    let config = ConnectionConfig::new("127.0.0.1", port, "root", "", "test");
    (mysql, config)
}

async fn dump_to_string(config: &ConnectionConfig, options: &DumpOptions) -> Result<String> {
    let mut out = Vec::new();
    dump_database(config, options, &mut out, &SilentLogger).await?;
    Ok(String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_container_dump_rows_and_generated_columns() {
    let (_mysql, config) = start_mysql(&[
        "CREATE TABLE users (
            id INT AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            email VARCHAR(255),
            score DOUBLE,
            name_upper VARCHAR(100) AS (UPPER(name)) VIRTUAL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
        "INSERT INTO users (name, email, score, created_at) VALUES
            ('Ada', 'ada@example.com', 1.5, '2024-01-01 00:00:00'),
            ('O''Brien', NULL, 2.25, '2024-01-02 00:00:00'),
            ('Tab\there', 'x@example.com', NULL, '2024-01-03 00:00:00')",
        "CREATE TABLE logs (id INT PRIMARY KEY, message TEXT)",
        "INSERT INTO logs VALUES (1, 'boot')",
    ])
    .await;

    let text = dump_to_string(&config, &DumpOptions::default().ignore_table("logs"))
        .await
        .unwrap();

    let inserts: Vec<&str> = text
        .lines()
        .filter(|line| line.starts_with("INSERT INTO"))
        .collect();
    assert_eq!(
        inserts,
        vec![
            "INSERT INTO `users` (`id`, `name`, `email`, `score`, `created_at`) VALUES ('1', 'Ada', 'ada@example.com', '1.50', '2024-01-01 00:00:00');",
            "INSERT INTO `users` (`id`, `name`, `email`, `score`, `created_at`) VALUES ('2', 'O''Brien', NULL, '2.25', '2024-01-02 00:00:00');",
            "INSERT INTO `users` (`id`, `name`, `email`, `score`, `created_at`) VALUES ('3', 'Tab\\there', 'x@example.com', NULL, '2024-01-03 00:00:00');",
        ]
    );
    assert!(text.contains("CREATE DATABASE /*!32312 IF NOT EXISTS*/ `test`"));
    assert!(text.contains("DROP TABLE IF EXISTS `users`;"));
    assert!(!text.contains("`logs`"));
}

#[tokio::test]
async fn test_container_views_and_triggers_are_portable() {
    let (_mysql, config) = start_mysql(&[
        "CREATE TABLE items (id INT PRIMARY KEY, label VARCHAR(20))",
        "CREATE VIEW item_labels AS SELECT label FROM items",
        "CREATE TRIGGER items_bi BEFORE INSERT ON items FOR EACH ROW SET NEW.label = LOWER(NEW.label)",
    ])
    .await;

    let options = DumpOptions::default().with_views(true).with_triggers(true);
    let text = dump_to_string(&config, &options).await.unwrap();

    assert!(text.contains("/*!50001 DROP VIEW IF EXISTS `item_labels`*/;"));
    assert!(text.contains("CREATE OR REPLACE ALGORITHM=UNDEFINED DEFINER=CURRENT_USER"));
    assert!(text.contains("/*!50032 DROP TRIGGER IF EXISTS `items_bi` */;"));
    assert!(!text.contains("`root`@"));
    // Views are not base tables.
    assert!(!text.contains("DROP TABLE IF EXISTS `item_labels`"));
}

#[tokio::test]
async fn test_container_server_info() {
    let (_mysql, config) = start_mysql(&[]).await;

    let mut adapter = MySqlAdapter::connect(&config).await.unwrap();
    let info = adapter.server_info().await.unwrap();
    adapter.close().await.unwrap();

    assert!(info.version.starts_with('8') || info.version.starts_with('9'));
    assert!(info.timezone.starts_with('+') || info.timezone.starts_with('-'));
}

#[tokio::test]
async fn test_container_empty_database_is_no_tables() {
    let (_mysql, config) = start_mysql(&[]).await;

    let err = dump_to_string(&config, &DumpOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DbDumpError::NoTables { .. }));
}
