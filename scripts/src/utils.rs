//! Utilities for the deploy script.

use std::{
    fs::{self, File},
    io::Read,
    path::Path,
    str::FromStr,
};

use alloy::primitives::Address;
use json::JsonValue;

use crate::{
    constants::{DEPLOYMENTS_INDENT, DEPLOYMENTS_KEY, EXPLORER_ADDRESS_PATH_SEGMENT},
    errors::ScriptError,
};

/// The block explorer page of `address`
pub fn explorer_address_url(explorer_url: &str, address: Address) -> String {
    format!(
        "{}/{}/{}",
        explorer_url.trim_end_matches('/'),
        EXPLORER_ADDRESS_PATH_SEGMENT,
        address
    )
}

/// Read and parse a JSON file
pub fn get_json_from_file(file_path: &Path) -> Result<JsonValue, ScriptError> {
    let mut file_contents = String::new();
    File::open(file_path)
        .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?
        .read_to_string(&mut file_contents)
        .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Read the address recorded for `contract_key` in a deployments file
pub fn parse_addr_from_deployments_file(
    file_path: &Path,
    contract_key: &str,
) -> Result<Address, ScriptError> {
    let parsed_json = get_json_from_file(file_path)?;

    Address::from_str(
        parsed_json[DEPLOYMENTS_KEY][contract_key]
            .as_str()
            .ok_or_else(|| {
                ScriptError::ReadDeployments(format!(
                    "no `{}` address in deployments file",
                    contract_key
                ))
            })?,
    )
    .map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Record the address of `contract_key` in a deployments file,
/// creating the file if needed and keeping the other entries
pub fn write_deployed_address(
    file_path: &Path,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !file_path.exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    }
    let mut parsed_json = get_json_from_file(file_path)?;

    parsed_json[DEPLOYMENTS_KEY][contract_key] = JsonValue::String(format!("{address:#x}"));

    fs::write(
        file_path,
        json::stringify_pretty(parsed_json, DEPLOYMENTS_INDENT),
    )
    .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;

    Ok(())
}
