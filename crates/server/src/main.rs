//! Serves a document root over HTTP/1.1.
//!
//! Usage: `origin-server <port>`. The document root defaults to `resources`
//! and can be changed with the `ORIGIN_DOC_ROOT` environment variable.

use std::env;
use std::path::Path;
use std::process::ExitCode;

use origin_http::server::Server;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

const DOC_ROOT_ENV: &str = "ORIGIN_DOC_ROOT";

fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut args = env::args();
    let program = args.next().unwrap_or_default();
    let Some(port) = args.next() else {
        let name = Path::new(&program).file_name().map_or(program.clone(), |name| name.to_string_lossy().into_owned());
        eprintln!("usage: {name} port_number");
        return ExitCode::FAILURE;
    };

    let port = match port.parse::<u16>() {
        Ok(port) => port,
        Err(e) => {
            error!(cause = %e, port = %port, "invalid port");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = Server::builder().port(port);
    if let Some(doc_root) = env::var_os(DOC_ROOT_ENV) {
        builder = builder.doc_root(doc_root);
    }

    let server = match builder.build() {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "invalid server configuration");
            return ExitCode::FAILURE;
        }
    };

    match server.start() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(cause = %e, "server stopped");
            ExitCode::FAILURE
        }
    }
}
