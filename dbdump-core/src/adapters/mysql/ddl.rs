//! Rewrites applied to view and trigger DDL as it is read from the server.

use std::sync::OnceLock;

use regex::Regex;

/// Replacement definer used for views and triggers.
pub const CURRENT_USER_DEFINER: &str = "DEFINER=CURRENT_USER";

fn definer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"DEFINER=[^ ]+").expect("Invalid definer pattern"))
}

/// Points every `DEFINER=...` clause at the account replaying the dump.
pub fn rewrite_definer(ddl: &str) -> String {
    definer_pattern()
        .replace_all(ddl, CURRENT_USER_DEFINER)
        .into_owned()
}

/// Turns `CREATE ALGORITHM=...` view DDL into `CREATE OR REPLACE ALGORITHM=...`.
pub fn make_view_replaceable(ddl: &str) -> String {
    ddl.replace("CREATE ALGORITHM", "CREATE OR REPLACE ALGORITHM")
}

/// Full rewrite for `SHOW CREATE VIEW` output.
pub fn portable_view_ddl(ddl: &str) -> String {
    rewrite_definer(&make_view_replaceable(ddl))
}
