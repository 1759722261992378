//! Scraping of the deployment tool's human-readable output
//!
//! The companion CLI reports a deployment with two lines this module relies on:
//!
//! ```text
//! Contract deployed at 0x<hex>
//! Contract registered as '<alias>'
//! ```
//!
//! Everything else in its output is ignored. Output missing either line is an
//! error; there is no fallback format.

use crate::{Error, Result};

const DEPLOYED_MARKER: &str = "Contract deployed at ";
const REGISTERED_MARKER: &str = "registered as '";

/// Address and alias reported by one deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutput {
    pub address: String,
    pub alias: String,
}

/// Extract the `0x`-prefixed address following `Contract deployed at `
pub fn parse_deployed_address(stdout: &str) -> Result<String> {
    let start = stdout
        .find(DEPLOYED_MARKER)
        .map(|i| i + DEPLOYED_MARKER.len())
        .ok_or_else(|| Error::OutputFormat("no `Contract deployed at` line".into()))?;
    let rest = &stdout[start..];
    let hex = rest
        .strip_prefix("0x")
        .ok_or_else(|| Error::OutputFormat("deployed address is not 0x-prefixed".into()))?;
    let digits: String = hex.chars().take_while(|c| c.is_ascii_hexdigit()).collect();
    if digits.is_empty() {
        return Err(Error::OutputFormat("deployed address has no hex digits".into()));
    }
    Ok(format!("0x{}", digits))
}

/// Extract `<alias>` from `registered as '<alias>'`
pub fn parse_registered_alias(stdout: &str) -> Result<String> {
    let start = stdout
        .find(REGISTERED_MARKER)
        .map(|i| i + REGISTERED_MARKER.len())
        .ok_or_else(|| Error::OutputFormat("no `registered as` line".into()))?;
    let rest = &stdout[start..];
    let end = rest
        .find('\'')
        .ok_or_else(|| Error::OutputFormat("unterminated alias quote".into()))?;
    Ok(rest[..end].to_string())
}

/// Extract both the deployed address and the registered alias
pub fn parse_deploy_output(stdout: &str) -> Result<DeployOutput> {
    Ok(DeployOutput {
        address: parse_deployed_address(stdout)?,
        alias: parse_registered_alias(stdout)?,
    })
}
