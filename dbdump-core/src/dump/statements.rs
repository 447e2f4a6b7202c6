//! Fixed text blocks of the dump file.
//!
//! The layout mirrors what `mysqldump` produces so the output can be replayed
//! with the stock `mysql` client. Session variables changed by the preamble
//! are restored by [`write_trailer`].

use std::io::{self, Write};

use crate::format::quote_identifier;
use crate::models::{ServerInfo, TriggerInfo, ViewInfo};

/// Header comments and session settings written before anything else.
pub fn write_preamble<W: Write + ?Sized>(
    out: &mut W,
    host: &str,
    database: &str,
    server: &ServerInfo,
) -> io::Result<()> {
    writeln!(
        out,
        "-- dbdump {}  Distrib {}, for {} ({})",
        env!("CARGO_PKG_VERSION"),
        server.version,
        std::env::consts::OS,
        std::env::consts::ARCH
    )?;
    writeln!(out, "--")?;
    writeln!(out, "-- Host: {}    Database: {}", host, database)?;
    writeln!(
        out,
        "-- ------------------------------------------------------"
    )?;
    writeln!(out, "-- Server version\t{}", server.version)?;
    writeln!(out)?;
    writeln!(
        out,
        "/*!40101 SET @OLD_CHARACTER_SET_CLIENT=@@CHARACTER_SET_CLIENT */;"
    )?;
    writeln!(
        out,
        "/*!40101 SET @OLD_CHARACTER_SET_RESULTS=@@CHARACTER_SET_RESULTS */;"
    )?;
    writeln!(
        out,
        "/*!40101 SET @OLD_COLLATION_CONNECTION=@@COLLATION_CONNECTION */;"
    )?;
    writeln!(out, "/*!50503 SET NAMES utf8mb4 */;")?;
    writeln!(out, "/*!40103 SET @OLD_TIME_ZONE=@@TIME_ZONE */;")?;
    writeln!(out, "/*!40103 SET TIME_ZONE='{}' */;", server.timezone)?;
    writeln!(
        out,
        "/*!40014 SET @OLD_UNIQUE_CHECKS=@@UNIQUE_CHECKS, UNIQUE_CHECKS=0 */;"
    )?;
    writeln!(
        out,
        "/*!40014 SET @OLD_FOREIGN_KEY_CHECKS=@@FOREIGN_KEY_CHECKS, FOREIGN_KEY_CHECKS=0 */;"
    )?;
    writeln!(
        out,
        "/*!40101 SET @OLD_SQL_MODE=@@SQL_MODE, SQL_MODE='NO_AUTO_VALUE_ON_ZERO' */;"
    )?;
    writeln!(
        out,
        "/*!40111 SET @OLD_SQL_NOTES=@@SQL_NOTES, SQL_NOTES=0 */;"
    )?;
    writeln!(out)
}

/// Restores every session variable saved by [`write_preamble`].
pub fn write_trailer<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "/*!40101 SET SQL_MODE=@OLD_SQL_MODE */;")?;
    writeln!(out, "/*!40014 SET FOREIGN_KEY_CHECKS=@OLD_FOREIGN_KEY_CHECKS */;")?;
    writeln!(out, "/*!40014 SET UNIQUE_CHECKS=@OLD_UNIQUE_CHECKS */;")?;
    writeln!(out, "/*!40103 SET TIME_ZONE=@OLD_TIME_ZONE */;")?;
    writeln!(
        out,
        "/*!40101 SET CHARACTER_SET_CLIENT=@OLD_CHARACTER_SET_CLIENT */;"
    )?;
    writeln!(
        out,
        "/*!40101 SET CHARACTER_SET_RESULTS=@OLD_CHARACTER_SET_RESULTS */;"
    )?;
    writeln!(
        out,
        "/*!40101 SET COLLATION_CONNECTION=@OLD_COLLATION_CONNECTION */;"
    )?;
    writeln!(out, "/*!40111 SET SQL_NOTES=@OLD_SQL_NOTES */;")?;
    writeln!(out)
}

/// Adds the versioned `IF NOT EXISTS` guard to `CREATE DATABASE` text.
pub fn guard_create_database(ddl: &str) -> String {
    ddl.replacen(
        "CREATE DATABASE",
        "CREATE DATABASE /*!32312 IF NOT EXISTS*/",
        1,
    )
}

/// `Current Database` header, optional `CREATE DATABASE` and `USE`.
///
/// `create_ddl` is the raw `SHOW CREATE DATABASE` text; it gets the
/// `IF NOT EXISTS` guard before being written.
pub fn write_database_header<W: Write + ?Sized>(
    out: &mut W,
    database: &str,
    create_ddl: Option<&str>,
) -> io::Result<()> {
    let quoted = quote_identifier(database);
    writeln!(out, "--")?;
    writeln!(out, "-- Current Database: {}", quoted)?;
    writeln!(out, "--")?;
    if let Some(ddl) = create_ddl {
        writeln!(out)?;
        writeln!(out, "{};", guard_create_database(ddl))?;
    }
    writeln!(out)?;
    writeln!(out, "USE {};", quoted)?;
    writeln!(out)
}

/// `DROP TABLE IF EXISTS` followed by the table's `CREATE TABLE`.
pub fn write_table_structure<W: Write + ?Sized>(
    out: &mut W,
    table: &str,
    ddl: &str,
) -> io::Result<()> {
    let quoted = quote_identifier(table);
    writeln!(out, "--")?;
    writeln!(out, "-- Table structure for table {}", quoted)?;
    writeln!(out, "--")?;
    writeln!(out)?;
    writeln!(out, "DROP TABLE IF EXISTS {};", quoted)?;
    writeln!(
        out,
        "/*!40101 SET @saved_cs_client     = @@character_set_client */;"
    )?;
    writeln!(out, "/*!40101 SET character_set_client = utf8mb4 */;")?;
    writeln!(out, "{};", ddl)?;
    writeln!(
        out,
        "/*!40101 SET character_set_client = @saved_cs_client */;"
    )?;
    writeln!(out)
}

/// Comment block opening the data section of `table`.
pub fn write_data_header<W: Write + ?Sized>(out: &mut W, table: &str) -> io::Result<()> {
    writeln!(out, "--")?;
    writeln!(out, "-- Dumping data for table {}", quote_identifier(table))?;
    writeln!(out, "--")?;
    writeln!(out)
}

/// Drop-and-create block for a view.
pub fn write_view<W: Write + ?Sized>(out: &mut W, view: &ViewInfo) -> io::Result<()> {
    let quoted = quote_identifier(&view.name);
    writeln!(out)?;
    writeln!(out, "--")?;
    writeln!(out, "-- Temporary table structure for view {}", quoted)?;
    writeln!(out, "--")?;
    writeln!(out)?;
    writeln!(out, "/*!50001 DROP VIEW IF EXISTS {}*/;", quoted)?;
    writeln!(out, "SET @saved_cs_client     = @@character_set_client;")?;
    writeln!(out, "SET character_set_client = utf8mb4;")?;
    writeln!(out, "{};", view.ddl)?;
    writeln!(out, "SET character_set_client = @saved_cs_client;")
}

/// Drop-and-create block for a trigger, wrapped in `DELIMITER ;;`.
pub fn write_trigger<W: Write + ?Sized>(out: &mut W, trigger: &TriggerInfo) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "--")?;
    writeln!(
        out,
        "-- Trigger {} on table {}",
        quote_identifier(&trigger.name),
        quote_identifier(&trigger.table)
    )?;
    writeln!(out, "--")?;
    writeln!(out)?;
    writeln!(
        out,
        "/*!50032 DROP TRIGGER IF EXISTS {} */;",
        quote_identifier(&trigger.name)
    )?;
    writeln!(out, "DELIMITER ;;")?;
    writeln!(out, "{} ;;", trigger.ddl)?;
    writeln!(out, "DELIMITER ;")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn render(write: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn server() -> ServerInfo {
        ServerInfo {
            version: "8.0.36".to_string(),
            charset: "utf8mb4".to_string(),
            timezone: "+08:00".to_string(),
        }
    }

    #[test]
    fn test_preamble_header_and_settings() {
        let text = render(|out| write_preamble(out, "db.internal", "shop", &server()));
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("-- dbdump "));
        assert!(lines[0].contains("Distrib 8.0.36"));
        assert!(text.contains("-- Host: db.internal    Database: shop\n"));
        assert!(text.contains("-- Server version\t8.0.36\n"));
        assert!(text.contains("/*!40103 SET TIME_ZONE='+08:00' */;\n"));
        assert!(text.contains("SQL_MODE='NO_AUTO_VALUE_ON_ZERO'"));
        assert!(text.ends_with("/*!40111 SET @OLD_SQL_NOTES=@@SQL_NOTES, SQL_NOTES=0 */;\n\n"));
    }

    #[test]
    fn test_trailer_restores_in_order() {
        let text = render(|out| write_trailer(out));
        let restored: Vec<&str> = text
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.split_whitespace()
                    .nth(2)
                    .and_then(|assignment| assignment.split('=').next())
                    .unwrap()
            })
            .collect();

        assert_eq!(
            restored,
            vec![
                "SQL_MODE",
                "FOREIGN_KEY_CHECKS",
                "UNIQUE_CHECKS",
                "TIME_ZONE",
                "CHARACTER_SET_CLIENT",
                "CHARACTER_SET_RESULTS",
                "COLLATION_CONNECTION",
                "SQL_NOTES",
            ]
        );
    }

    #[test]
    fn test_database_header_with_create() {
        let text = render(|out| {
            write_database_header(
                out,
                "shop",
                Some("CREATE DATABASE `shop` /*!40100 DEFAULT CHARACTER SET utf8mb4 */"),
            )
        });

        assert_eq!(
            text,
            "--\n-- Current Database: `shop`\n--\n\nCREATE DATABASE /*!32312 IF NOT EXISTS*/ `shop` /*!40100 DEFAULT CHARACTER SET utf8mb4 */;\n\nUSE `shop`;\n\n"
        );
    }

    #[test]
    fn test_guard_create_database_only_first_occurrence() {
        let ddl = "CREATE DATABASE `CREATE DATABASE` /*!40100 DEFAULT CHARACTER SET utf8mb4 */";
        assert_eq!(
            guard_create_database(ddl),
            "CREATE DATABASE /*!32312 IF NOT EXISTS*/ `CREATE DATABASE` /*!40100 DEFAULT CHARACTER SET utf8mb4 */"
        );
    }

    #[test]
    fn test_database_header_without_create_still_uses() {
        let text = render(|out| write_database_header(out, "shop", None));
        assert!(!text.contains("CREATE DATABASE"));
        assert!(text.contains("USE `shop`;"));
    }

    #[test]
    fn test_table_structure_block() {
        let ddl = "CREATE TABLE `users` (\n  `id` int NOT NULL\n) ENGINE=InnoDB";
        let text = render(|out| write_table_structure(out, "users", ddl));

        assert_eq!(
            text,
            "--\n-- Table structure for table `users`\n--\n\n\
             DROP TABLE IF EXISTS `users`;\n\
             /*!40101 SET @saved_cs_client     = @@character_set_client */;\n\
             /*!40101 SET character_set_client = utf8mb4 */;\n\
             CREATE TABLE `users` (\n  `id` int NOT NULL\n) ENGINE=InnoDB;\n\
             /*!40101 SET character_set_client = @saved_cs_client */;\n\n"
        );
    }

    #[test]
    fn test_view_block() {
        let view = ViewInfo {
            name: "active_users".to_string(),
            ddl: "CREATE OR REPLACE VIEW `active_users` AS select 1".to_string(),
        };
        let text = render(|out| write_view(out, &view));

        assert!(text.contains("/*!50001 DROP VIEW IF EXISTS `active_users`*/;\n"));
        assert!(text.contains("CREATE OR REPLACE VIEW `active_users` AS select 1;\n"));
        assert!(text.ends_with("SET character_set_client = @saved_cs_client;\n"));
    }

    #[test]
    fn test_trigger_block_uses_custom_delimiter() {
        let trigger = TriggerInfo {
            name: "users_bi".to_string(),
            table: "users".to_string(),
            ddl: "CREATE DEFINER=CURRENT_USER TRIGGER `users_bi` BEFORE INSERT ON `users` FOR EACH ROW BEGIN SET NEW.id = NEW.id; END".to_string(),
        };
        let text = render(|out| write_trigger(out, &trigger));

        assert!(text.contains("/*!50032 DROP TRIGGER IF EXISTS `users_bi` */;\nDELIMITER ;;\n"));
        assert!(text.contains("END ;;\nDELIMITER ;\n"));
    }
}
