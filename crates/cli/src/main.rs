use std::process::ExitCode;

fn main() -> ExitCode {
    tradein_cli::run()
}
