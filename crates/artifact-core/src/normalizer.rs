//! Artifact normalizer - raw compiler artifact to canonical artifact
//!
//! # Pipeline
//!
//! `JSON text → RawArtifact → per-function normalization → filter → backfill → CanonicalArtifact`
//!
//! Per function, in order:
//! 1. Classify (kind + modifiers, `public` dropped from utility functions)
//! 2. Migrate the legacy `abi` block into `parameters` / `returnTypes` / `errorTypes`
//! 3. Constructors always get empty `returnTypes`
//! 4. Private functions always get empty `returnTypes`
//! 5. `verification_key` → `verificationKey`
//! 6. `debugSymbols` defaults to `""`
//!
//! Then for the whole artifact:
//! 7. Drop functions whose name is excluded (the public dispatch wrapper)
//! 8. Backfill `fileMap`, `storageLayout`, `nonDispatchPublicFunctions`
//!
//! # Guarantees
//!
//! - **Idempotent**: `normalize(normalize(x)) == normalize(x)`
//! - **Deterministic**: same input always produces same output
//! - **All-or-nothing**: a missing `functions` list fails the run; nothing
//!   partial is returned

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::artifact::{
    CanonicalArtifact, FunctionRecord, RawArtifact, RawFunction, DERIVED_FUNCTION_KEYS,
};
use crate::classifier::{classify, FunctionType, CONSTRUCTOR_NAME};
use crate::config::NormalizerConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, NullSink};
use crate::Result;

// ── Public API ─────────────────────────────────────────────

/// Normalize artifact JSON text to canonical JSON text with default settings
///
/// # Errors
/// Returns `Parse` for malformed input or `MissingField` if `functions` is absent.
pub fn normalize(text: &str) -> Result<String> {
    let raw = RawArtifact::from_json(text)?;
    let canonical = normalize_artifact(raw, &NormalizerConfig::default(), &mut NullSink);
    serialize_canonical(&canonical)
}

/// Normalize a parsed artifact
pub fn normalize_artifact(
    raw: RawArtifact,
    config: &NormalizerConfig,
    sink: &mut dyn DiagnosticSink,
) -> CanonicalArtifact {
    let RawArtifact {
        functions,
        file_map,
        legacy_file_map,
        storage_layout,
        non_dispatch_public_functions,
        extra,
    } = raw;

    // ── Steps 1-6: per function ────────────────────────
    let functions: Vec<FunctionRecord> = functions
        .into_iter()
        .map(|f| normalize_function(f, sink))
        .collect();

    // ── Step 7: exclusion filter ───────────────────────
    let functions = functions
        .into_iter()
        .filter(|f| {
            let excluded = config.is_excluded(&f.name);
            if excluded {
                sink.emit(Diagnostic::info(
                    DiagnosticKind::FunctionExcluded,
                    Some(f.name.as_str()),
                    "removed compiler-generated wrapper from function list".into(),
                ));
            }
            !excluded
        })
        .collect();

    // ── Step 8: top-level backfill ─────────────────────
    let file_map = match (file_map, legacy_file_map) {
        (Some(map), None) => map,
        (Some(map), Some(_)) => {
            sink.emit(Diagnostic::warning(
                DiagnosticKind::Migration,
                None,
                "both fileMap and file_map present, file_map discarded".into(),
            ));
            map
        }
        (None, Some(map)) => {
            sink.emit(Diagnostic::info(
                DiagnosticKind::Migration,
                None,
                "file_map copied to fileMap".into(),
            ));
            map
        }
        (None, None) => {
            backfilled(sink, "fileMap");
            Map::new()
        }
    };
    let storage_layout = storage_layout.unwrap_or_else(|| {
        backfilled(sink, "storageLayout");
        Map::new()
    });
    let non_dispatch_public_functions = non_dispatch_public_functions.unwrap_or_else(|| {
        backfilled(sink, "nonDispatchPublicFunctions");
        Vec::new()
    });

    CanonicalArtifact {
        functions,
        file_map,
        storage_layout,
        non_dispatch_public_functions,
        extra,
    }
}

/// Normalize a single function record (steps 1-6)
pub fn normalize_function(raw: RawFunction, sink: &mut dyn DiagnosticSink) -> FunctionRecord {
    let RawFunction {
        name,
        custom_attributes,
        is_unconstrained,
        abi,
        parameters,
        return_types,
        error_types,
        verification_key,
        canonical_verification_key,
        debug_symbols,
        canonical_debug_symbols,
        mut extra,
    } = raw;

    for key in DERIVED_FUNCTION_KEYS {
        extra.remove(*key);
    }

    // ── Step 1: classification ─────────────────────────
    let classification = classify(&name, &custom_attributes, is_unconstrained);
    for token in &classification.unrecognized {
        sink.emit(Diagnostic::warning(
            DiagnosticKind::UnrecognizedAttribute,
            Some(name.as_str()),
            format!("ignoring unrecognized attribute `{}`", token),
        ));
    }
    if classification.dropped_public {
        sink.emit(Diagnostic::warning(
            DiagnosticKind::AttributeDropped,
            Some(name.as_str()),
            "dropped `public` attribute from utility function".into(),
        ));
    }
    sink.emit(Diagnostic::info(
        DiagnosticKind::Classification,
        Some(name.as_str()),
        format!(
            "classified as {} by rule `{}`",
            classification.function_type, classification.rule
        ),
    ));

    // ── Step 2: legacy ABI migration ───────────────────
    let (parameters, mut return_types, error_types) = match abi {
        Some(abi) => {
            sink.emit(Diagnostic::info(
                DiagnosticKind::Migration,
                Some(name.as_str()),
                "migrated legacy abi block".into(),
            ));
            (
                abi.parameters.unwrap_or_default(),
                // Kept wrapped: downstream selector computation hashes the wrapped shape.
                abi.return_type.map(|rt| vec![rt]).unwrap_or_default(),
                abi.error_types.unwrap_or_default(),
            )
        }
        None => (
            parameters.unwrap_or_default(),
            return_types.unwrap_or_default(),
            error_types.unwrap_or_default(),
        ),
    };

    // ── Steps 3-4: return type overrides ───────────────
    let is_constructor = name == CONSTRUCTOR_NAME;
    if (is_constructor || classification.function_type == FunctionType::Private)
        && !return_types.is_empty()
    {
        let reason = if is_constructor {
            "constructor"
        } else {
            "private function"
        };
        sink.emit(Diagnostic::info(
            DiagnosticKind::ReturnTypesCleared,
            Some(name.as_str()),
            format!("cleared {} return type(s) of {}", return_types.len(), reason),
        ));
        return_types.clear();
    }

    // ── Step 5: verification key ───────────────────────
    let verification_key = match (verification_key, canonical_verification_key) {
        (Some(vk), _) => vk,
        (None, Some(vk)) => vk,
        (None, None) => Value::String(String::new()),
    };

    // ── Step 6: debug symbols ──────────────────────────
    let debug_symbols = canonical_debug_symbols
        .or(debug_symbols)
        .unwrap_or_else(|| Value::String(String::new()));

    FunctionRecord {
        name,
        function_type: classification.function_type,
        is_internal: classification.modifiers.is_internal,
        is_static: classification.modifiers.is_static,
        is_initializer: classification.modifiers.is_initializer,
        custom_attributes: classification.attributes,
        is_unconstrained,
        parameters,
        return_types,
        error_types,
        verification_key,
        debug_symbols,
        extra,
    }
}

fn backfilled(sink: &mut dyn DiagnosticSink, field: &str) {
    sink.emit(Diagnostic::info(
        DiagnosticKind::Backfill,
        None,
        format!("{} absent, defaulted to empty", field),
    ));
}

// ── Canonical serializer ───────────────────────────────────

/// Serialize a canonical artifact as pretty-printed JSON
pub fn serialize_canonical(artifact: &CanonicalArtifact) -> Result<String> {
    Ok(serde_json::to_string_pretty(artifact)?)
}

// ── SHA-256 artifact hash ──────────────────────────────────

/// SHA-256 digest of a canonical artifact
///
/// Computed over compact JSON with object keys sorted at every level, so the
/// digest does not depend on the key order of the input document.
pub fn artifact_hash(artifact: &CanonicalArtifact) -> Result<String> {
    let value = sort_keys(serde_json::to_value(artifact)?);
    let bytes = serde_json::to_vec(&value)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Diagnostics, Severity};
    use crate::Error;
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    fn read_fixture(name: &str) -> String {
        let full = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../tests/fixtures")
            .join(name);
        fs::read_to_string(&full)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", full.display(), e))
    }

    fn run(input: Value) -> (CanonicalArtifact, Diagnostics) {
        let raw = RawArtifact::from_value(input).unwrap();
        let mut sink = Diagnostics::new();
        let out = normalize_artifact(raw, &NormalizerConfig::default(), &mut sink);
        (out, sink)
    }

    fn one(function: Value) -> FunctionRecord {
        let (out, _) = run(json!({ "functions": [function] }));
        out.functions.into_iter().next().unwrap()
    }

    // ── End-to-end scenarios ───────────────────────────

    #[test]
    fn test_public_constructor_drops_legacy_return_type() {
        let f = one(json!({
            "name": "constructor",
            "custom_attributes": ["public", "initializer"],
            "is_unconstrained": false,
            "abi": {
                "parameters": [
                    {"name": "admin", "type": {"kind": "field"}, "visibility": "private"},
                    {"name": "supply", "type": {"kind": "integer", "sign": "unsigned", "width": 64}, "visibility": "private"}
                ],
                "return_type": {"abi_type": {"kind": "field"}, "visibility": "public"},
                "error_types": {}
            }
        }));
        assert_eq!(f.function_type, FunctionType::Public);
        assert!(f.is_initializer);
        assert_eq!(f.parameters.len(), 2);
        assert!(f.return_types.is_empty());
    }

    #[test]
    fn test_dispatch_wrapper_is_removed_regardless_of_attributes() {
        let (out, sink) = run(json!({
            "functions": [
                {"name": "transfer", "custom_attributes": ["public"]},
                {"name": "public_dispatch", "custom_attributes": ["public"], "is_unconstrained": true},
                {"name": "balance_of", "is_unconstrained": true}
            ]
        }));
        let names: Vec<&str> = out.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["transfer", "balance_of"]);
        assert_eq!(sink.of_kind(DiagnosticKind::FunctionExcluded).len(), 1);
    }

    #[test]
    fn test_custom_exclusion_list() {
        let raw = RawArtifact::from_value(json!({
            "functions": [{"name": "public_dispatch"}, {"name": "sync_notes"}]
        }))
        .unwrap();
        let config = NormalizerConfig {
            excluded_functions: vec!["sync_notes".into()],
            ..NormalizerConfig::default()
        };
        let out = normalize_artifact(raw, &config, &mut NullSink);
        let names: Vec<&str> = out.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["public_dispatch"]);
    }

    // ── Field migration ────────────────────────────────

    #[test]
    fn test_legacy_return_type_is_wrapped() {
        let f = one(json!({
            "name": "get_price",
            "custom_attributes": ["public", "view"],
            "abi": {
                "parameters": [],
                "return_type": {"abi_type": {"kind": "integer", "sign": "unsigned", "width": 128}, "visibility": "public"}
            }
        }));
        assert_eq!(
            f.return_types,
            vec![json!({"abi_type": {"kind": "integer", "sign": "unsigned", "width": 128}, "visibility": "public"})]
        );
        assert_eq!(f.error_types, Map::new());
    }

    #[test]
    fn test_legacy_block_defaults() {
        let f = one(json!({"name": "ping", "custom_attributes": ["public"], "abi": {}}));
        assert!(f.parameters.is_empty());
        assert!(f.return_types.is_empty());
        assert!(f.error_types.is_empty());
    }

    #[test]
    fn test_legacy_block_wins_over_top_level() {
        let f = one(json!({
            "name": "ping",
            "custom_attributes": ["public"],
            "parameters": [{"name": "stale"}],
            "abi": {"parameters": [{"name": "fresh"}]}
        }));
        assert_eq!(f.parameters, vec![json!({"name": "fresh"})]);
    }

    #[test]
    fn test_top_level_fields_kept_without_legacy_block() {
        let f = one(json!({
            "name": "ping",
            "custom_attributes": ["public"],
            "parameters": [{"name": "x", "type": {"kind": "field"}}],
            "returnTypes": [{"kind": "boolean"}],
            "errorTypes": {"123": {"error_kind": "string", "string": "boom"}}
        }));
        assert_eq!(f.parameters.len(), 1);
        assert_eq!(f.return_types, vec![json!({"kind": "boolean"})]);
        assert_eq!(f.error_types.len(), 1);
    }

    #[test]
    fn test_private_function_return_types_cleared() {
        let (out, sink) = run(json!({
            "functions": [{
                "name": "transfer_in_private",
                "custom_attributes": ["private"],
                "abi": {"parameters": [], "return_type": {"abi_type": {"kind": "struct", "fields": []}}}
            }]
        }));
        assert!(out.functions[0].return_types.is_empty());
        assert_eq!(sink.of_kind(DiagnosticKind::ReturnTypesCleared).len(), 1);
    }

    #[test]
    fn test_utility_function_keeps_return_types() {
        let f = one(json!({
            "name": "balance_of_private",
            "custom_attributes": ["public"],
            "is_unconstrained": true,
            "returnTypes": [{"kind": "field"}]
        }));
        assert_eq!(f.function_type, FunctionType::Utility);
        assert!(f.custom_attributes.is_empty());
        assert_eq!(f.return_types, vec![json!({"kind": "field"})]);
    }

    #[test]
    fn test_verification_key_migrated() {
        let f = one(json!({"name": "mint", "verification_key": "AAAA"}));
        assert_eq!(f.verification_key, json!("AAAA"));

        let f = one(json!({"name": "mint", "verificationKey": "BBBB"}));
        assert_eq!(f.verification_key, json!("BBBB"));

        let f = one(json!({"name": "mint"}));
        assert_eq!(f.verification_key, json!(""));
    }

    #[test]
    fn test_debug_symbols_default_and_migration() {
        assert_eq!(one(json!({"name": "f"})).debug_symbols, json!(""));
        assert_eq!(
            one(json!({"name": "f", "debug_symbols": "eJy"})).debug_symbols,
            json!("eJy")
        );
        assert_eq!(
            one(json!({"name": "f", "debug_symbols": "old", "debugSymbols": "new"})).debug_symbols,
            json!("new")
        );
    }

    #[test]
    fn test_stale_derived_keys_are_recomputed() {
        let f = one(json!({
            "name": "f",
            "custom_attributes": ["private"],
            "functionType": "public",
            "isStatic": true
        }));
        assert_eq!(f.function_type, FunctionType::Private);
        assert!(!f.is_static);
        assert!(f.extra.is_empty());
    }

    #[test]
    fn test_unknown_function_keys_pass_through() {
        let f = one(json!({"name": "f", "bytecode": "H4sIAAAA", "brillig_names": ["x"]}));
        assert_eq!(f.extra.get("bytecode"), Some(&json!("H4sIAAAA")));
        assert_eq!(f.extra.get("brillig_names"), Some(&json!(["x"])));
    }

    // ── Top-level backfill ─────────────────────────────

    #[test]
    fn test_top_level_backfill() {
        let (out, sink) = run(json!({"functions": []}));
        assert!(out.file_map.is_empty());
        assert!(out.storage_layout.is_empty());
        assert!(out.non_dispatch_public_functions.is_empty());
        assert_eq!(sink.of_kind(DiagnosticKind::Backfill).len(), 3);

        let text = serialize_canonical(&out).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["fileMap"], json!({}));
        assert_eq!(value["storageLayout"], json!({}));
        assert_eq!(value["nonDispatchPublicFunctions"], json!([]));
    }

    #[test]
    fn test_present_top_level_fields_kept() {
        let (out, sink) = run(json!({
            "functions": [],
            "fileMap": {"1": {"source": "fn main() {}", "path": "main.nr"}},
            "storageLayout": {"balances": {"slot": "0x01"}},
            "nonDispatchPublicFunctions": [{"name": "transfer"}],
            "name": "Token"
        }));
        assert_eq!(out.file_map.len(), 1);
        assert_eq!(out.storage_layout.len(), 1);
        assert_eq!(out.non_dispatch_public_functions.len(), 1);
        assert_eq!(out.extra.get("name"), Some(&json!("Token")));
        assert!(sink.of_kind(DiagnosticKind::Backfill).is_empty());
    }

    #[test]
    fn test_snake_case_file_map_migrated() {
        let (out, _) = run(json!({"functions": [], "file_map": {"7": {"path": "lib.nr"}}}));
        assert!(out.file_map.contains_key("7"));
    }

    #[test]
    fn test_conflicting_file_maps_warn() {
        let (out, sink) = run(json!({
            "functions": [],
            "fileMap": {"1": {"path": "main.nr"}},
            "file_map": {"7": {"path": "lib.nr"}}
        }));
        assert!(out.file_map.contains_key("1"));
        assert!(!out.file_map.contains_key("7"));
        let migrations = sink.of_kind(DiagnosticKind::Migration);
        assert_eq!(migrations.len(), 1);
        assert_eq!(migrations[0].severity, Severity::Warning);
        assert!(migrations[0].message.contains("file_map discarded"));
    }

    #[test]
    fn test_null_function_fields_are_permissive() {
        let text =
            normalize(r#"{"functions":[{"name":"f","custom_attributes":null,"is_unconstrained":null}]}"#)
                .unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        let f = &value["functions"][0];
        assert_eq!(f["functionType"], "private");
        assert_eq!(f["custom_attributes"], json!([]));
        assert_eq!(f["is_unconstrained"], false);
        assert_eq!(normalize(&text).unwrap(), text);
    }

    // ── Output schema ──────────────────────────────────

    #[test]
    fn test_output_function_has_every_canonical_field() {
        let text = normalize(r#"{"functions": [{"name": "f"}]}"#).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        let f = &value["functions"][0];
        for key in [
            "name",
            "functionType",
            "isInternal",
            "isStatic",
            "isInitializer",
            "parameters",
            "returnTypes",
            "errorTypes",
            "verificationKey",
            "debugSymbols",
        ] {
            assert!(f.get(key).is_some(), "missing `{}` in output", key);
        }
        assert_eq!(f["functionType"], json!("private"));
    }

    #[test]
    fn test_missing_function_list_fails() {
        let err = normalize(r#"{"fileMap": {}}"#).unwrap_err();
        assert_eq!(
            err,
            Error::MissingField {
                field: "functions".into()
            }
        );
    }

    // ── Diagnostics ────────────────────────────────────

    #[test]
    fn test_diagnostics_record_classification_path() {
        let (_, sink) = run(json!({
            "functions": [
                {"name": "get_config", "custom_attributes": ["public", "abi_view"], "is_unconstrained": true}
            ]
        }));
        assert_eq!(sink.of_kind(DiagnosticKind::UnrecognizedAttribute).len(), 1);
        assert_eq!(sink.of_kind(DiagnosticKind::AttributeDropped).len(), 1);
        let classification = sink.of_kind(DiagnosticKind::Classification);
        assert_eq!(classification.len(), 1);
        assert!(classification[0].message.contains("utility"));
        assert!(classification[0].message.contains("unconstrained"));
    }

    // ── Idempotence proof ──────────────────────────────

    #[test]
    fn test_idempotence() {
        let input = read_fixture("token_contract.json");
        let once = normalize(&input).unwrap();
        let twice = normalize(&once).unwrap();
        assert_eq!(once, twice, "normalize(normalize(x)) must equal normalize(x)");
    }

    #[test]
    fn test_idempotence_minimal() {
        let once = normalize(r#"{"functions": []}"#).unwrap();
        let twice = normalize(&once).unwrap();
        assert_eq!(once, twice);
    }

    // ── Determinism proof (100 iterations) ─────────────

    #[test]
    fn test_determinism_100_iterations() {
        let input = read_fixture("token_contract.json");
        let first = normalize(&input).unwrap();
        for i in 0..100 {
            let result = normalize(&input).unwrap();
            assert_eq!(first, result, "Determinism failure at iteration {}", i);
        }
    }

    #[test]
    fn test_fixture_classification() {
        let raw = RawArtifact::from_json(&read_fixture("token_contract.json")).unwrap();
        let out = normalize_artifact(raw, &NormalizerConfig::default(), &mut NullSink);
        let kind = |name: &str| out.function(name).unwrap().function_type;
        assert_eq!(kind("constructor"), FunctionType::Public);
        assert_eq!(kind("transfer"), FunctionType::Public);
        assert_eq!(kind("transfer_in_private"), FunctionType::Private);
        assert_eq!(kind("balance_of_private"), FunctionType::Utility);
        assert!(out.function("public_dispatch").is_err());
        assert!(out.function("_increase_public_balance").unwrap().is_internal);
    }

    // ── Hashing ────────────────────────────────────────

    #[test]
    fn test_hash_is_sha256_hex() {
        let (out, _) = run(json!({"functions": []}));
        let hash = artifact_hash(&out).unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_ignores_input_key_order() {
        let (a, _) = run(json!({"name": "T", "functions": [{"name": "f", "bytecode": "x", "z": 1}]}));
        let b_text = r#"{"functions": [{"z": 1, "bytecode": "x", "name": "f"}], "name": "T"}"#;
        let b = normalize_artifact(
            RawArtifact::from_json(b_text).unwrap(),
            &NormalizerConfig::default(),
            &mut NullSink,
        );
        assert_eq!(artifact_hash(&a).unwrap(), artifact_hash(&b).unwrap());
    }

    #[test]
    fn test_hash_changes_with_content() {
        let (a, _) = run(json!({"functions": [{"name": "f"}]}));
        let (b, _) = run(json!({"functions": [{"name": "g"}]}));
        assert_ne!(artifact_hash(&a).unwrap(), artifact_hash(&b).unwrap());
    }

    #[test]
    fn test_hash_stable_across_normalization_passes() {
        let input = read_fixture("token_contract.json");
        let once = normalize(&input).unwrap();
        let a = normalize_artifact(
            RawArtifact::from_json(&input).unwrap(),
            &NormalizerConfig::default(),
            &mut NullSink,
        );
        let b = normalize_artifact(
            RawArtifact::from_json(&once).unwrap(),
            &NormalizerConfig::default(),
            &mut NullSink,
        );
        assert_eq!(artifact_hash(&a).unwrap(), artifact_hash(&b).unwrap());
    }
}
