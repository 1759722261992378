//! Size calculator - storage word count of an ABI type
//!
//! One scalar leaf occupies one word. Aggregates sum (structs) or multiply
//! (arrays) their members. Strings count their declared length directly.
//!
//! # Example
//!
//! ```
//! use artifact_core::size::size;
//! use artifact_core::types::TypeDescriptor;
//!
//! let ty = TypeDescriptor::struct_of(vec![
//!     ("amount", TypeDescriptor::Integer),
//!     ("flags", TypeDescriptor::array_of(3, TypeDescriptor::Boolean)),
//! ]);
//! assert_eq!(size(&ty), 4);
//! ```

use crate::types::{TypeDescriptor, TypeMode, TypePath};
use crate::{Error, Result};

/// Words occupied by a scalar leaf (integer, field, boolean)
pub const SCALAR_SIZE: u64 = 1;

/// Size an unknown kind resolves to on the lenient path
pub const UNKNOWN_KIND_SIZE: u64 = 0;

/// Bytes per word when rendering a zeroed input blob
pub const WORD_BYTES: usize = 32;

/// Largest blob [`zeroed_input_hex`] renders (32 MiB of zero bytes)
pub const MAX_BLOB_WORDS: u64 = 1 << 20;

/// Storage size of `ty` in words. Unknown kinds count as [`UNKNOWN_KIND_SIZE`].
pub fn size(ty: &TypeDescriptor) -> u64 {
    // lenient walks never fail
    measure(ty, TypeMode::Lenient, &mut TypePath::root()).unwrap_or(UNKNOWN_KIND_SIZE)
}

/// Storage size of `ty` in words, failing on the first unknown kind.
///
/// # Errors
/// Returns `UnknownTypeKind` with the path of the offending node.
pub fn try_size(ty: &TypeDescriptor) -> Result<u64> {
    measure(ty, TypeMode::Strict, &mut TypePath::root())
}

/// Size under an explicit [`TypeMode`]
pub fn size_with_mode(ty: &TypeDescriptor, mode: TypeMode) -> Result<u64> {
    measure(ty, mode, &mut TypePath::root())
}

fn measure(ty: &TypeDescriptor, mode: TypeMode, path: &mut TypePath) -> Result<u64> {
    match ty {
        TypeDescriptor::Struct { fields } => {
            let mut total: u64 = 0;
            for field in fields {
                path.push_field(&field.name);
                let field_size = measure(&field.ty, mode, path)?;
                path.pop();
                total = total.saturating_add(field_size);
            }
            Ok(total)
        }
        TypeDescriptor::Array { length, element } => {
            path.push_element();
            let element_size = measure(element, mode, path)?;
            path.pop();
            Ok(length.saturating_mul(element_size))
        }
        TypeDescriptor::Integer | TypeDescriptor::Field | TypeDescriptor::Boolean => {
            Ok(SCALAR_SIZE)
        }
        // Declared length passed through as-is; no byte/char/field conversion.
        TypeDescriptor::String { length } => Ok(*length),
        TypeDescriptor::Unknown => match mode {
            TypeMode::Lenient => Ok(UNKNOWN_KIND_SIZE),
            TypeMode::Strict => Err(Error::UnknownTypeKind {
                path: path.to_string(),
            }),
        },
    }
}

/// Per-leaf sizes in declaration order.
///
/// Structs are expanded; arrays, strings, scalars and unknown kinds are
/// reported as single entries. The entries always sum to [`size`].
pub fn size_breakdown(ty: &TypeDescriptor) -> Vec<(String, u64)> {
    let mut out = Vec::new();
    collect_breakdown(ty, &mut TypePath::root(), &mut out);
    out
}

fn collect_breakdown(ty: &TypeDescriptor, path: &mut TypePath, out: &mut Vec<(String, u64)>) {
    match ty {
        TypeDescriptor::Struct { fields } => {
            for field in fields {
                path.push_field(&field.name);
                collect_breakdown(&field.ty, path, out);
                path.pop();
            }
        }
        other => out.push((path.to_string(), size(other))),
    }
}

/// Render an all-zero input blob of `words` words as `0x`-prefixed hex
///
/// # Errors
/// Returns `BlobTooLarge` above [`MAX_BLOB_WORDS`].
pub fn zeroed_input_hex(words: u64) -> Result<String> {
    let too_large = || Error::BlobTooLarge {
        words,
        limit: MAX_BLOB_WORDS,
    };
    if words > MAX_BLOB_WORDS {
        return Err(too_large());
    }
    let bytes = usize::try_from(words)
        .ok()
        .and_then(|w| w.checked_mul(WORD_BYTES))
        .ok_or_else(too_large)?;
    Ok(format!("0x{}", "00".repeat(bytes)))
}
