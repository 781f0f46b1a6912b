//! services/api/src/bin/openapi.rs
//!
//! Dumps the REST document for the quiz API. Usage: `openapi [PATH]`, where
//! `PATH` defaults to `openapi.json` and `-` writes to stdout.

use quiz_api_lib::web::rest::ApiDoc;
use std::io::Write;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let doc = ApiDoc::openapi();
    let json = doc.to_pretty_json()?;

    match std::env::args().nth(1).as_deref() {
        Some("-") => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            writeln!(stdout)?;
        }
        target => {
            let path = target.unwrap_or("openapi.json");
            std::fs::write(path, &json)?;
            eprintln!("Wrote {} route(s) to {}", doc.paths.paths.len(), path);
        }
    }
    Ok(())
}
