use std::{env, io, process::ExitCode};

use airdrop_token_scripts::{
    cli::Cli,
    commands::{deploy_token, report_outcome},
    constants::DEFAULT_LOG_FILTER,
    deployer::setup_client,
    errors::ScriptError,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    let res = match Cli::parse_args(env::args_os()) {
        Ok(cli) => run(cli).await,
        Err(e) => Err(e),
    };

    ExitCode::from(report_outcome(res, &mut io::stderr()))
}

async fn run(cli: Cli) -> Result<(), ScriptError> {
    let Cli {
        priv_key,
        rpc_url,
        deploy,
    } = cli;

    let client = setup_client(&priv_key, &rpc_url).await?;

    deploy_token(&deploy, &client, |var| env::var(var).ok(), &mut io::stdout()).await?;
    Ok(())
}
