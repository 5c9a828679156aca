//! Inkbunny Downloader - CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use inkbunny_downloader::{
    api::InkbunnyApi,
    cli::Args,
    config::{read_raw, write_default_config, Config},
    download::download_artist,
    error::{exit_codes, Error, Result},
    logging::init_logging,
    output::{
        print_artist_stats, print_banner, print_config_summary, print_error, print_info,
        print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            tracing::error!("Program error: {}", e);
            print_error(&format!("{}", e));
            match e {
                Error::Config(_)
                | Error::InvalidConfig(_)
                | Error::MissingConfig(_)
                | Error::TomlParse(_)
                | Error::Json(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Authentication(_)
                | Error::AccountNotFound(_)
                | Error::Api(_)
                | Error::HttpStatus { .. }
                | Error::Http(_) => ExitCode::from(exit_codes::API_ERROR as u8),
                Error::Io(_) | Error::InvalidFilename(_) => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_dir = (!args.no_log_file).then_some(args.log_dir.as_path());
    let log_path = init_logging(args.debug, log_dir)?;

    print_banner();
    if let Some(path) = log_path {
        print_info(&format!("Logging to {}", path.display()));
    }

    // Load configuration, writing a template on first run
    if !args.config.exists() {
        write_default_config(&args.config)?;
        print_warning(&format!(
            "Configuration file not found, wrote a template to {}. Fill in your credentials and the artist to download.",
            args.config.display()
        ));
    }

    let mut raw = read_raw(&args.config)?;
    args.merge_into_config(&mut raw);
    let config = Config::from_value(raw)?;

    print_config_summary(
        &config.download.artist_username,
        &config.api.submission_types.joined(),
        &config.artist_directory()?.display().to_string(),
    );

    // Run the pipeline
    print_info("Connecting to Inkbunny...");
    let mut api = InkbunnyApi::from_config(&config)?;
    let state = download_artist(&mut api, &config).await?;

    print_artist_stats(&state);

    Ok(())
}
