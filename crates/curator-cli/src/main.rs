//! Thin entrypoint for the `curator` binary.

use std::process;

#[tokio::main]
async fn main() {
    curator_cli::init_logging();
    process::exit(curator_cli::run().await);
}
