use std::{path::PathBuf, time::Duration};

use dotenv::dotenv;

use crate::{
    config::{self, CheckOptions, Command},
    images,
};

const API_URL_VAR: &str = "API_URL";

pub fn parse_arguments_and_env_vars(
    args: pico_args::Arguments,
) -> Result<config::Config, anyhow::Error> {
    let command = parse_command(args)?;

    // a missing .env file is fine, the process environment still applies
    let _ = dotenv();

    Ok(config::Config {
        api_url: std::env::var(API_URL_VAR).ok().filter(|url| !url.is_empty()),
        command,
    })
}

pub(crate) fn parse_command(mut args: pico_args::Arguments) -> Result<Command, anyhow::Error> {
    let command = match args.subcommand()?.as_deref() {
        None | Some("posts") => Command::Posts {
            compact: args.contains("--compact"),
        },
        Some("check-images") => {
            let delay_ms: Option<u64> = args.opt_value_from_str("--delay-ms")?;
            let timeout_secs: Option<u64> = args.opt_value_from_str("--timeout-secs")?;
            let json = args.contains("--json");
            let file: PathBuf = args
                .free_from_str()
                .map_err(|_| anyhow::anyhow!("check-images needs a FILE argument"))?;

            Command::CheckImages(CheckOptions {
                file,
                delay: delay_ms
                    .map(Duration::from_millis)
                    .unwrap_or(images::DEFAULT_PROBE_DELAY),
                timeout: timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(images::DEFAULT_PROBE_TIMEOUT),
                json,
            })
        }
        Some(other) => return Err(anyhow::anyhow!("Unknown command: {other}")),
    };

    let remaining = args.finish();
    if !remaining.is_empty() {
        return Err(anyhow::anyhow!("Unexpected arguments: {remaining:?}"));
    }

    Ok(command)
}
