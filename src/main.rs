use std::process::ExitCode;

fn main() -> ExitCode {
    match mix_strength::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("mix: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
