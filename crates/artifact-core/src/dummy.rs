//! Dummy value generator - placeholder values shaped like an ABI type
//!
//! Used to build fixture inputs (e.g. a constructor's `inputs` argument)
//! without a live value. Output is plain JSON so it can be handed straight
//! to deployment tooling.

use serde_json::{Map, Value};

use crate::types::{TypeDescriptor, TypeMode, TypePath};
use crate::{Error, Result};

/// Zero field element, 32 bytes as 64 hex digits
pub const ZERO_FIELD: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

/// Placeholder for `ty`. Unknown kinds become `null`.
pub fn dummy(ty: &TypeDescriptor) -> Value {
    // lenient walks never fail
    generate(ty, TypeMode::Lenient, &mut TypePath::root()).unwrap_or(Value::Null)
}

/// Placeholder for `ty`, failing on the first unknown kind.
///
/// # Errors
/// Returns `UnknownTypeKind` with the path of the offending node.
pub fn try_dummy(ty: &TypeDescriptor) -> Result<Value> {
    generate(ty, TypeMode::Strict, &mut TypePath::root())
}

/// Placeholder under an explicit [`TypeMode`]
pub fn dummy_with_mode(ty: &TypeDescriptor, mode: TypeMode) -> Result<Value> {
    generate(ty, mode, &mut TypePath::root())
}

fn generate(ty: &TypeDescriptor, mode: TypeMode, path: &mut TypePath) -> Result<Value> {
    match ty {
        TypeDescriptor::Struct { fields } => {
            let mut map = Map::with_capacity(fields.len());
            for field in fields {
                path.push_field(&field.name);
                let value = generate(&field.ty, mode, path)?;
                path.pop();
                map.insert(field.name.clone(), value);
            }
            Ok(Value::Object(map))
        }
        TypeDescriptor::Array { length, element } => {
            path.push_element();
            let items = (0..*length)
                .map(|_| generate(element, mode, path))
                .collect::<Result<Vec<_>>>()?;
            path.pop();
            Ok(Value::Array(items))
        }
        TypeDescriptor::Integer => Ok(Value::from(0)),
        TypeDescriptor::Field => Ok(Value::String(ZERO_FIELD.to_string())),
        TypeDescriptor::Boolean => Ok(Value::Bool(false)),
        TypeDescriptor::String { .. } => Ok(Value::String(String::new())),
        TypeDescriptor::Unknown => match mode {
            TypeMode::Lenient => Ok(Value::Null),
            TypeMode::Strict => Err(Error::UnknownTypeKind {
                path: path.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zero_field_literal() {
        assert_eq!(ZERO_FIELD.len(), 66);
        assert!(ZERO_FIELD.starts_with("0x"));
        assert!(ZERO_FIELD[2..].chars().all(|c| c == '0'));
        assert_eq!(dummy(&TypeDescriptor::Field), json!(ZERO_FIELD));
    }

    #[test]
    fn test_scalar_placeholders() {
        assert_eq!(dummy(&TypeDescriptor::Integer), json!(0));
        assert_eq!(dummy(&TypeDescriptor::Boolean), json!(false));
        assert_eq!(dummy(&TypeDescriptor::String { length: 12 }), json!(""));
        assert_eq!(dummy(&TypeDescriptor::Unknown), Value::Null);
    }

    #[test]
    fn test_array_has_declared_length() {
        let value = dummy(&TypeDescriptor::array_of(3, TypeDescriptor::Boolean));
        assert_eq!(value, json!([false, false, false]));
        assert_eq!(dummy(&TypeDescriptor::array_of(0, TypeDescriptor::Field)), json!([]));
    }

    #[test]
    fn test_struct_preserves_field_order() {
        let ty = TypeDescriptor::struct_of(vec![
            ("zeta", TypeDescriptor::Integer),
            ("alpha", TypeDescriptor::Boolean),
            ("mid", TypeDescriptor::array_of(2, TypeDescriptor::Field)),
        ]);
        let value = dummy(&ty);
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            format!(r#"{{"zeta":0,"alpha":false,"mid":["{0}","{0}"]}}"#, ZERO_FIELD)
        );
    }

    #[test]
    fn test_nested_shape_mirrors_type() {
        let ty = TypeDescriptor::struct_of(vec![(
            "call_context",
            TypeDescriptor::struct_of(vec![
                ("sender", TypeDescriptor::Field),
                ("args", TypeDescriptor::array_of(2, TypeDescriptor::Integer)),
                ("extra", TypeDescriptor::Unknown),
            ]),
        )]);
        assert_eq!(
            dummy(&ty),
            json!({"call_context": {"sender": ZERO_FIELD, "args": [0, 0], "extra": null}})
        );
    }

    #[test]
    fn test_strict_reports_unknown_path() {
        let ty = TypeDescriptor::struct_of(vec![(
            "call_context",
            TypeDescriptor::struct_of(vec![("extra", TypeDescriptor::Unknown)]),
        )]);
        assert_eq!(
            try_dummy(&ty).unwrap_err(),
            Error::UnknownTypeKind {
                path: "$.call_context.extra".into()
            }
        );
    }

    #[test]
    fn test_strict_matches_lenient_on_known_kinds() {
        let ty = TypeDescriptor::array_of(2, TypeDescriptor::struct_of(vec![("v", TypeDescriptor::Field)]));
        assert_eq!(try_dummy(&ty).unwrap(), dummy(&ty));
        assert_eq!(dummy_with_mode(&ty, TypeMode::Strict).unwrap(), dummy(&ty));
    }

    #[test]
    fn test_string_dummy_ignores_nonzero_size() {
        // size() counts the declared length, dummy() is always empty
        let ty = TypeDescriptor::String { length: 4 };
        assert_eq!(crate::size::size(&ty), 4);
        assert_eq!(dummy(&ty), json!(""));
    }
}
