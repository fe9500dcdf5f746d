use fieldsync::config::Config;
use fieldsync::sync;
use log::{error, warn};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() -> ExitCode {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Err(err) = TermLogger::init(
        LevelFilter::Info,
        log_config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("failed to initialize logger: {err}");
        return ExitCode::FAILURE;
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = interrupted.clone();
        if let Err(err) = ctrlc::set_handler(move || {
            warn!("interrupt received, finishing the current file");
            interrupted.store(true, Ordering::SeqCst);
        }) {
            warn!("failed to install interrupt handler: {err}");
        }
    }

    let config = Config::from_args(std::env::args().skip(1));
    match sync::run(&config, &interrupted) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
