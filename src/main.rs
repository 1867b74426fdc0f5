use clap::Parser;
use log::{error, info};

use pinit::{App, Cli, Config, NominatimGeocoder, NullGeocoder, Result, ReverseGeocoder};

pub fn initialize_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::with_defaults()?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to build configuration: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let geocoder: Box<dyn ReverseGeocoder> = if cli.offline {
        Box::new(NullGeocoder)
    } else {
        Box::new(NominatimGeocoder::new())
    };

    let app = match App::new(config, geocoder) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = app.run(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
