use sevlog::cli::{build_cli, parse_config, run};
use sevlog::internal::logger::init_logger;

fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();
    let config = match parse_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let logger = match init_logger(&config) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logger: {}", e);
            std::process::exit(1);
        }
    };

    run(&logger, &matches);
    logger.flush();
    Ok(())
}
