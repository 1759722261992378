//! Artifact records - raw compiler output and the canonical schema
//!
//! [`RawArtifact`] accepts whatever the compiler (or an earlier normalization
//! run) produced and is permissive about every field except `functions`.
//! [`CanonicalArtifact`] is what deployment tooling consumes: every field is
//! present, nothing is optional.
//!
//! Keys neither record knows about are carried through untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::classifier::FunctionType;
use crate::types::TypeDescriptor;
use crate::{Error, Result};

/// Keys computed by classification; stale copies on input are discarded
pub const DERIVED_FUNCTION_KEYS: &[&str] = &["functionType", "isInternal", "isStatic", "isInitializer"];

/// Legacy nested ABI block emitted by older compilers
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegacyAbi {
    #[serde(default)]
    pub parameters: Option<Vec<Value>>,
    #[serde(default)]
    pub return_type: Option<Value>,
    #[serde(default)]
    pub error_types: Option<Map<String, Value>>,
}

/// One function as found in the input document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawFunction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_attributes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_unconstrained: bool,
    #[serde(default)]
    pub abi: Option<LegacyAbi>,
    #[serde(default)]
    pub parameters: Option<Vec<Value>>,
    #[serde(default, rename = "returnTypes")]
    pub return_types: Option<Vec<Value>>,
    #[serde(default, rename = "errorTypes")]
    pub error_types: Option<Map<String, Value>>,
    #[serde(default)]
    pub verification_key: Option<Value>,
    #[serde(default, rename = "verificationKey")]
    pub canonical_verification_key: Option<Value>,
    #[serde(default)]
    pub debug_symbols: Option<Value>,
    #[serde(default, rename = "debugSymbols")]
    pub canonical_debug_symbols: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An explicit `null` reads the same as an absent key
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The input document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawArtifact {
    pub functions: Vec<RawFunction>,
    #[serde(default, rename = "fileMap")]
    pub file_map: Option<Map<String, Value>>,
    #[serde(default, rename = "file_map")]
    pub legacy_file_map: Option<Map<String, Value>>,
    #[serde(default, rename = "storageLayout")]
    pub storage_layout: Option<Map<String, Value>>,
    #[serde(default, rename = "nonDispatchPublicFunctions")]
    pub non_dispatch_public_functions: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawArtifact {
    /// Parse an input document.
    ///
    /// # Errors
    /// - `Parse` if the text is not JSON, is not an object, or a known field
    ///   has the wrong shape
    /// - `MissingField` if `functions` is absent
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::Parse("artifact must be a JSON object".into()))?;
        match object.get("functions") {
            None | Some(Value::Null) => {
                return Err(Error::MissingField {
                    field: "functions".into(),
                })
            }
            Some(Value::Array(_)) => {}
            Some(_) => return Err(Error::Parse("`functions` must be a sequence".into())),
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// One function in canonical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    #[serde(rename = "functionType")]
    pub function_type: FunctionType,
    #[serde(rename = "isInternal")]
    pub is_internal: bool,
    #[serde(rename = "isStatic")]
    pub is_static: bool,
    #[serde(rename = "isInitializer")]
    pub is_initializer: bool,
    pub custom_attributes: Vec<String>,
    pub is_unconstrained: bool,
    pub parameters: Vec<Value>,
    #[serde(rename = "returnTypes")]
    pub return_types: Vec<Value>,
    #[serde(rename = "errorTypes")]
    pub error_types: Map<String, Value>,
    #[serde(rename = "verificationKey")]
    pub verification_key: Value,
    #[serde(rename = "debugSymbols")]
    pub debug_symbols: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FunctionRecord {
    /// Parameter object with the given `name`
    pub fn parameter(&self, name: &str) -> Result<&Value> {
        self.parameters
            .iter()
            .find(|p| p.get("name").and_then(Value::as_str) == Some(name))
            .ok_or_else(|| Error::ParameterNotFound {
                function: self.name.clone(),
                parameter: name.to_string(),
            })
    }

    /// Type tree of the parameter with the given `name`
    pub fn parameter_type(&self, name: &str) -> Result<TypeDescriptor> {
        let param = self.parameter(name)?;
        let ty = param.get("type").ok_or_else(|| Error::MissingField {
            field: format!("{}.{}.type", self.name, name),
        })?;
        TypeDescriptor::from_value(ty)
    }
}

/// The canonical output document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalArtifact {
    pub functions: Vec<FunctionRecord>,
    #[serde(rename = "fileMap")]
    pub file_map: Map<String, Value>,
    #[serde(rename = "storageLayout")]
    pub storage_layout: Map<String, Value>,
    #[serde(rename = "nonDispatchPublicFunctions")]
    pub non_dispatch_public_functions: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanonicalArtifact {
    pub fn function(&self, name: &str) -> Result<&FunctionRecord> {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::FunctionNotFound {
                name: name.to_string(),
            })
    }
}
