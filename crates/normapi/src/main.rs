//! The `normapi` executable.

fn main() {
    normapi_cli::init_tracing();
    std::process::exit(normapi_cli::run_cli(std::env::args_os()));
}
