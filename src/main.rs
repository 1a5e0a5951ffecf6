mod cli;
mod demo;
mod render;

use tracing::warn;

fn main() {
    if let Err(err) = cli::run() {
        if err.is_input_error() {
            warn!(error = %err, "input rejected; no result files were written");
        }
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}
