use std::process::ExitCode;

fn main() -> ExitCode {
    pretty_env_logger::init_custom_env("RUST_LOG");

    match crime_forecast::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
