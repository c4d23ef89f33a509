use std::process::ExitCode;

use log::error;

use weever_chess::uci::uci_top::run_stdio_loop;

fn main() -> ExitCode {
    // stdout carries the protocol, so logs go to stderr.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    match run_stdio_loop() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("uci loop failed: {err}");
            ExitCode::FAILURE
        }
    }
}
