//! Implementation of the token deployment

use std::io::Write;

use tracing::{debug, error, info, warn};

use crate::{
    cli::DeployArgs,
    constants::{FAILURE_EXIT_CODE, SUCCESS_EXIT_CODE, TOKEN_DISPLAY_NAME},
    deployer::DeployBackend,
    errors::ScriptError,
    factory::ContractFactory,
    types::{ConstructorVariant, DeployedContract, DeploymentParams, DeploymentState},
    utils::{explorer_address_url, write_deployed_address},
};

/// Deploy the token described by `args` through `backend`.
///
/// Constructor arguments are read with `lookup`. Two notices are written to
/// `out`: one before anything is resolved, and one carrying the explorer
/// page of the contract once the creation transaction is confirmed. Exactly
/// one contract creation is submitted, and only after the artifact, the
/// constructor variant and every argument have been validated.
pub async fn deploy_token<B, F, W>(
    args: &DeployArgs,
    backend: &B,
    lookup: F,
    out: &mut W,
) -> Result<DeployedContract, ScriptError>
where
    B: DeployBackend,
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    writeln!(out, "Starting deploy {}...", TOKEN_DISPLAY_NAME)
        .map_err(|e| ScriptError::Output(e.to_string()))?;

    let state = DeploymentState::Pending;
    let deployed = resolve_and_deploy(args, backend, lookup)
        .await
        .inspect_err(|_| debug!("Deployment {}", state.fail()))?;

    let state = state.confirm(deployed.address);
    info!(
        "Deployment {}: `{}` at {} (tx {})",
        state, args.contract, deployed.address, deployed.tx_hash
    );

    writeln!(
        out,
        "{} deployed to: {}",
        TOKEN_DISPLAY_NAME,
        explorer_address_url(&args.explorer_url, deployed.address)
    )
    .map_err(|e| ScriptError::Output(e.to_string()))?;

    // The contract is on-chain at this point, a failed record must not
    // fail the run
    if let Some(deployments_path) = &args.deployments_path {
        match write_deployed_address(deployments_path, &args.contract, deployed.address) {
            Ok(()) => info!("Recorded address in {}", deployments_path.display()),
            Err(e) => warn!(
                "Could not record {} in {}: {}",
                deployed.address,
                deployments_path.display(),
                e
            ),
        }
    }

    debug!("Deployment {}", state.finish());
    Ok(deployed)
}

/// Map the outcome of a run to the process exit code, writing the error of
/// a failed run to `stderr`
pub fn report_outcome<W: Write>(res: Result<(), ScriptError>, stderr: &mut W) -> u8 {
    match res {
        Ok(()) => SUCCESS_EXIT_CODE,
        Err(e) => {
            error!("Deployment failed: {e}");
            // Nothing is left to report to if stderr itself is gone
            let _ = writeln!(stderr, "Error: {e}");
            FAILURE_EXIT_CODE
        }
    }
}

/// Pick the constructor variant to deploy `factory` with.
///
/// An explicitly chosen variant must match the arity of the contract's
/// constructor; otherwise the variant is inferred from it.
pub fn select_variant(
    factory: &ContractFactory,
    requested: Option<ConstructorVariant>,
) -> Result<ConstructorVariant, ScriptError> {
    let arity = factory.constructor_arity();
    match requested {
        Some(variant) if variant.arity() != arity => Err(ScriptError::ConstructorMismatch {
            expected: arity,
            found: variant.arity(),
        }),
        Some(variant) => Ok(variant),
        None => ConstructorVariant::for_arity(arity).ok_or_else(|| {
            ScriptError::Configuration(format!(
                "no constructor variant takes the {} argument(s) of `{}`",
                arity,
                factory.name()
            ))
        }),
    }
}

/// Resolve the artifact, validate the arguments and submit the deployment
async fn resolve_and_deploy<B, F>(
    args: &DeployArgs,
    backend: &B,
    lookup: F,
) -> Result<DeployedContract, ScriptError>
where
    B: DeployBackend,
    F: Fn(&str) -> Option<String>,
{
    let factory = ContractFactory::from_artifacts_dir(&args.artifacts_dir, &args.contract)?;
    let variant = select_variant(&factory, args.variant)?;
    info!("Deploying `{}` with the {} constructor", factory.name(), variant);

    let params = DeploymentParams::from_env(variant, lookup)?;
    let code = factory.deploy_code(&params.args)?;

    backend.deploy(code).await
}
