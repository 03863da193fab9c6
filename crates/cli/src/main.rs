use std::process::ExitCode;

fn main() -> ExitCode {
    statusbot_cli::run()
}
