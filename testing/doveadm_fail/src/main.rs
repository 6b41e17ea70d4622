use std::process::ExitCode;

fn main() -> ExitCode {
    eprintln!("Fatal: pw: simulated failure");
    ExitCode::from(75)
}
