use std::process::ExitCode;

fn main() -> ExitCode {
    supportbot_cli::run()
}
