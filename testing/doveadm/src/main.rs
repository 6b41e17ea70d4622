use std::env;
use std::process::ExitCode;

// Stands in for `doveadm pw`; the "hash" is the hex encoding of the
// plaintext so callers can check exactly what was received.
fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        [pw, s, scheme, p, plaintext] if pw == "pw" && s == "-s" && p == "-p" => {
            let encoded: String = plaintext.bytes()
                .map(|b| format!("{b:02x}"))
                .collect();
            println!("{{{scheme}}}$6$fakesalt${encoded}");
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("usage: doveadm pw -s <scheme> -p <password>");
            ExitCode::from(64)
        }
    }
}
