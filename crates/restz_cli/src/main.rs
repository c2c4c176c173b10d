//! CLI smoke entry point.
//!
//! Usage: `restz_cli [db_path]`. Without a path it only prints the core
//! version; with a path it opens (and migrates) the database and prints row
//! counts per table. Setting `RESTZ_LOG_DIR` (absolute) enables file logging.

use restz_core::db::migrations::latest_version;
use restz_core::db::open_db;
use std::process::ExitCode;

const TABLES: [&str; 5] = [
    "tbl_product",
    "tbl_product_image",
    "tbl_review",
    "tbl_cart",
    "tbl_todo",
];

fn main() -> ExitCode {
    println!("restz_core version={}", restz_core::core_version());

    if let Ok(log_dir) = std::env::var("RESTZ_LOG_DIR") {
        if let Err(err) = restz_core::init_logging(restz_core::default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let Some(path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let conn = match open_db(&path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open `{path}`: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!("schema_version={}", latest_version());

    for table in TABLES {
        let count = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
            row.get::<_, i64>(0)
        });
        match count {
            Ok(count) => println!("{table}={count}"),
            Err(err) => {
                eprintln!("failed to count {table}: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
