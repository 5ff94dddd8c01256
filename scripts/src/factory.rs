//! Resolution of contract compilation artifacts and preparation of their
//! creation code

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{
    dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier},
    json_abi::{JsonAbi, Param},
    primitives::Bytes,
};
use itertools::Itertools;
use serde_json::Value;
use tracing::debug;

use crate::{
    constants::{ABI_KEY, ARTIFACT_EXTENSION, BYTECODE_KEY, BYTECODE_OBJECT_KEY},
    errors::ScriptError,
};

/// A deployable contract, resolved from its compilation artifact
#[derive(Clone, Debug)]
pub struct ContractFactory {
    /// The name of the contract
    name: String,
    /// The contract's ABI
    abi: JsonAbi,
    /// The contract's creation bytecode
    bytecode: Bytes,
}

impl ContractFactory {
    /// Locate the artifact for `name` under `artifacts_dir` and parse it.
    ///
    /// Both the Hardhat (`<dir>/contracts/<Name>.sol/<Name>.json`) and the
    /// Foundry (`<dir>/<Name>.sol/<Name>.json`) layouts are found by the
    /// recursive search. Two artifacts sharing a name are ambiguous.
    pub fn from_artifacts_dir(artifacts_dir: &Path, name: &str) -> Result<Self, ScriptError> {
        let file_name = format!("{name}.{ARTIFACT_EXTENSION}");

        let mut matches = Vec::new();
        find_artifacts(artifacts_dir, &file_name, &mut matches)?;

        let artifact_path = match matches.as_slice() {
            [] => {
                return Err(ScriptError::ReadArtifact(format!(
                    "no artifact named `{}` under {}",
                    name,
                    artifacts_dir.display()
                )))
            }
            [path] => path,
            paths => {
                return Err(ScriptError::ReadArtifact(format!(
                    "multiple artifacts named `{}`: {}",
                    name,
                    paths.iter().map(|p| p.display()).join(", ")
                )))
            }
        };

        debug!("Reading artifact {}", artifact_path.display());
        let contents = fs::read_to_string(artifact_path)
            .map_err(|e| ScriptError::ReadArtifact(e.to_string()))?;

        Self::from_artifact_json(name, &contents)
    }

    /// Parse a contract from the contents of its compilation artifact
    pub fn from_artifact_json(name: &str, contents: &str) -> Result<Self, ScriptError> {
        let artifact: Value = serde_json::from_str(contents)
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

        let abi_value = artifact
            .get(ABI_KEY)
            .cloned()
            .ok_or_else(|| ScriptError::ArtifactParsing(format!("`{name}` artifact has no ABI")))?;
        let abi: JsonAbi = serde_json::from_value(abi_value)
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

        let bytecode_hex = match artifact.get(BYTECODE_KEY) {
            Some(Value::String(hex_str)) => hex_str.as_str(),
            Some(Value::Object(obj)) => obj
                .get(BYTECODE_OBJECT_KEY)
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ScriptError::ArtifactParsing(format!("`{name}` bytecode has no object"))
                })?,
            _ => {
                return Err(ScriptError::ArtifactParsing(format!(
                    "`{name}` artifact has no bytecode"
                )))
            }
        };

        let bytecode = hex::decode(bytecode_hex.strip_prefix("0x").unwrap_or(bytecode_hex))
            .map_err(|e| ScriptError::ArtifactParsing(format!("invalid `{name}` bytecode: {e}")))?;

        // Interfaces and abstract contracts compile to empty bytecode
        if bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "`{name}` is not deployable, its bytecode is empty"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            abi,
            bytecode: bytecode.into(),
        })
    }

    /// The name of the contract
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The contract's creation bytecode, without constructor arguments
    pub fn bytecode(&self) -> &Bytes {
        &self.bytecode
    }

    /// The inputs of the contract's constructor
    pub fn constructor_inputs(&self) -> &[Param] {
        self.abi
            .constructor
            .as_ref()
            .map(|constructor| constructor.inputs.as_slice())
            .unwrap_or_default()
    }

    /// The number of arguments the contract's constructor takes
    pub fn constructor_arity(&self) -> usize {
        self.constructor_inputs().len()
    }

    /// Build the creation code deploying the contract with `args`.
    ///
    /// Each argument is coerced to the type its constructor input declares
    /// and the ABI-encoded arguments are appended to the bytecode.
    pub fn deploy_code(&self, args: &[String]) -> Result<Bytes, ScriptError> {
        let inputs = self.constructor_inputs();
        if inputs.len() != args.len() {
            return Err(ScriptError::ConstructorMismatch {
                expected: inputs.len(),
                found: args.len(),
            });
        }

        let encoded_args = match self.abi.constructor.as_ref() {
            Some(constructor) => {
                let values = inputs
                    .iter()
                    .zip_eq(args)
                    .map(|(param, arg)| coerce_arg(param, arg))
                    .collect::<Result<Vec<_>, _>>()?;

                constructor
                    .abi_encode_input(&values)
                    .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?
            }
            None => Vec::new(),
        };

        let mut code = self.bytecode.to_vec();
        code.extend_from_slice(&encoded_args);
        Ok(code.into())
    }
}

/// Coerce a raw string argument to the type of a constructor input
fn coerce_arg(param: &Param, arg: &str) -> Result<DynSolValue, ScriptError> {
    let ty: DynSolType = param.resolve().map_err(|e| {
        ScriptError::CalldataConstruction(format!(
            "unsupported type `{}` for `{}`: {}",
            param.ty, param.name, e
        ))
    })?;

    ty.coerce_str(arg).map_err(|e| {
        ScriptError::CalldataConstruction(format!(
            "cannot use `{}` as `{}` for `{}`: {}",
            arg, param.ty, param.name, e
        ))
    })
}

/// Recursively collect the files named `file_name` under `dir`
fn find_artifacts(
    dir: &Path,
    file_name: &str,
    matches: &mut Vec<PathBuf>,
) -> Result<(), ScriptError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ScriptError::ReadArtifact(format!("cannot read {}: {}", dir.display(), e))
    })?;

    // Symlinked directories are not descended into, so links cannot cycle
    let mut paths = entries
        .map(|entry| entry.and_then(|e| Ok((e.path(), e.file_type()?))))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ScriptError::ReadArtifact(e.to_string()))?;
    paths.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (path, file_type) in paths {
        if file_type.is_dir() {
            find_artifacts(&path, file_name, matches)?;
        } else if path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == file_name)
        {
            matches.push(path);
        }
    }

    Ok(())
}
