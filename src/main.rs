mod attendance;
mod bundle;
mod config;
mod csv;
mod export;
mod ipc;
mod logging;
mod registry;
mod roster;
mod session;
mod template;

use std::io::{self, BufRead, Write};

fn main() {
    let config = match config::Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("asistenciad: {e:#}");
            std::process::exit(2);
        }
    };
    if let Err(e) = logging::init(&config.logging) {
        eprintln!("asistenciad: {e:#}");
        std::process::exit(2);
    }

    let mut state = ipc::AppState::new(config);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        students = state.students.len(),
        "asistenciad ready"
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                tracing::warn!(error = %e, "malformed request");
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{}", resp);
                let _ = stdout.flush();
                continue;
            }
        };

        tracing::debug!(id = %req.id, method = %req.method, "request");
        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(stdout, "{}", resp);
        let _ = stdout.flush();
    }
    tracing::info!("stdin closed, shutting down");
}
