//! EIP-712 encoding over a runtime type schema.
//!
//! Message schemas are data (see [`super::schema`]), so struct hashes are
//! computed by walking the schema rather than from compiled `sol!` structs.
//!
//! Supported field types: `string`, `bytes`, `bool`, `address`, `bytes1`..`bytes32`,
//! `uint8`..`uint256`, fixed and dynamic arrays of any of these, and references
//! to other structs in the schema. `uint` values may be JSON numbers or decimal
//! / `0x`-hex strings.

use std::collections::BTreeSet;

use alloy_primitives::{keccak256, Address, FixedBytes, B256, U256};
use alloy_sol_types::SolValue;
use serde_json::Value;

use super::domain::{Domain, DOMAIN_TYPE_NAME};
use super::schema::TypeSchema;
use crate::{Error, Result};

/// Find the primary type: the single struct no other struct references.
#[allow(clippy::result_large_err)]
pub fn primary_type(types: &TypeSchema) -> Result<&str> {
    let referenced: BTreeSet<&str> = types
        .values()
        .flatten()
        .map(|field| base_type(&field.kind))
        .collect();

    let candidates: Vec<&str> = types
        .keys()
        .map(String::as_str)
        .filter(|name| *name != DOMAIN_TYPE_NAME && !referenced.contains(name))
        .collect();

    match candidates.as_slice() {
        [primary] => Ok(*primary),
        [] => Err(Error::typed_data("no primary type (cyclic schema?)")),
        _ => Err(Error::typed_data(format!(
            "ambiguous primary type: {}",
            candidates.join(", ")
        ))),
    }
}

/// Canonical type string: the primary struct, then its dependencies sorted by name.
#[allow(clippy::result_large_err)]
pub fn encode_type(primary: &str, types: &TypeSchema) -> Result<String> {
    let mut deps = BTreeSet::new();
    collect_dependencies(primary, types, &mut deps)?;
    deps.remove(primary);

    let mut encoded = String::new();
    for name in std::iter::once(primary).chain(deps.iter().map(String::as_str)) {
        let fields = types
            .get(name)
            .ok_or_else(|| Error::typed_data(format!("unknown struct type: {}", name)))?;
        let members: Vec<String> = fields
            .iter()
            .map(|f| format!("{} {}", f.kind, f.name))
            .collect();
        encoded.push_str(name);
        encoded.push('(');
        encoded.push_str(&members.join(","));
        encoded.push(')');
    }
    Ok(encoded)
}

/// `keccak256(encodeType(primary))`.
#[allow(clippy::result_large_err)]
pub fn type_hash(primary: &str, types: &TypeSchema) -> Result<B256> {
    Ok(keccak256(encode_type(primary, types)?.as_bytes()))
}

/// `keccak256(typeHash ‖ encodeData(value))`.
#[allow(clippy::result_large_err)]
pub fn hash_struct(primary: &str, types: &TypeSchema, value: &Value) -> Result<B256> {
    let fields = types
        .get(primary)
        .ok_or_else(|| Error::typed_data(format!("unknown struct type: {}", primary)))?;
    let object = value
        .as_object()
        .ok_or_else(|| Error::typed_data(format!("{} value must be an object", primary)))?;

    let mut encoded = Vec::with_capacity(32 * (fields.len() + 1));
    encoded.extend_from_slice(type_hash(primary, types)?.as_slice());

    for field in fields {
        let field_value = object.get(&field.name).ok_or_else(|| {
            Error::typed_data(format!("missing field {}.{}", primary, field.name))
        })?;
        let word = encode_value(&field.kind, types, field_value)
            .map_err(|e| match e {
                Error::TypedData { message } => {
                    Error::typed_data(format!("{}.{}: {}", primary, field.name, message))
                }
                other => other,
            })?;
        encoded.extend_from_slice(word.as_slice());
    }

    Ok(keccak256(&encoded))
}

/// Final digest to sign: `keccak256(0x1901 ‖ domainSeparator ‖ hashStruct(message))`.
#[allow(clippy::result_large_err)]
pub fn signing_hash(domain: &Domain, types: &TypeSchema, message: &Value) -> Result<B256> {
    let primary = primary_type(types)?;
    let struct_hash = hash_struct(primary, types, message)?;
    Ok(compute_typed_data_hash(domain.separator()?, struct_hash))
}

fn compute_typed_data_hash(domain_separator: B256, struct_hash: B256) -> B256 {
    let prefix = FixedBytes::<2>::new([0x19, 0x01]);
    let data = (prefix, domain_separator, struct_hash).abi_encode_packed();
    keccak256(&data)
}

/// Strip any array suffixes: `string[][2]` → `string`.
fn base_type(kind: &str) -> &str {
    kind.split('[').next().unwrap_or(kind)
}

#[allow(clippy::result_large_err)]
fn collect_dependencies(name: &str, types: &TypeSchema, found: &mut BTreeSet<String>) -> Result<()> {
    if found.contains(name) {
        return Ok(());
    }
    let fields = types
        .get(name)
        .ok_or_else(|| Error::typed_data(format!("unknown struct type: {}", name)))?;
    found.insert(name.to_string());

    for field in fields {
        let base = base_type(&field.kind);
        if types.contains_key(base) {
            collect_dependencies(base, types, found)?;
        }
    }
    Ok(())
}

/// Encode one value as a 32-byte word.
#[allow(clippy::result_large_err)]
fn encode_value(kind: &str, types: &TypeSchema, value: &Value) -> Result<B256> {
    if let Some(inner) = kind.strip_suffix(']') {
        let open = inner
            .rfind('[')
            .ok_or_else(|| Error::typed_data(format!("malformed array type: {}", kind)))?;
        let (element_kind, length) = (&inner[..open], &inner[open + 1..]);

        let items = value
            .as_array()
            .ok_or_else(|| Error::typed_data(format!("expected array for {}", kind)))?;
        if !length.is_empty() {
            let expected: usize = length
                .parse()
                .map_err(|_| Error::typed_data(format!("malformed array type: {}", kind)))?;
            if items.len() != expected {
                return Err(Error::typed_data(format!(
                    "expected {} items for {}, got {}",
                    expected,
                    kind,
                    items.len()
                )));
            }
        }

        let mut encoded = Vec::with_capacity(32 * items.len());
        for item in items {
            encoded.extend_from_slice(encode_value(element_kind, types, item)?.as_slice());
        }
        return Ok(keccak256(&encoded));
    }

    if types.contains_key(kind) {
        return hash_struct(kind, types, value);
    }

    match kind {
        "string" => {
            let s = value
                .as_str()
                .ok_or_else(|| Error::typed_data("expected string"))?;
            Ok(keccak256(s.as_bytes()))
        }
        "bytes" => Ok(keccak256(decode_hex(value)?)),
        "bool" => {
            let b = value
                .as_bool()
                .ok_or_else(|| Error::typed_data("expected bool"))?;
            Ok(B256::from(U256::from(b as u8)))
        }
        "address" => {
            let s = value
                .as_str()
                .ok_or_else(|| Error::typed_data("expected address string"))?;
            let address: Address = s
                .parse()
                .map_err(|_| Error::typed_data(format!("invalid address: {}", s)))?;
            Ok(B256::left_padding_from(address.as_slice()))
        }
        _ => {
            if let Some(bits) = kind.strip_prefix("uint") {
                let bits = parse_width(kind, bits, 8, 256)?;
                let n = parse_uint(value)?;
                if n.bit_len() > bits {
                    return Err(Error::typed_data(format!("{} overflows {}", n, kind)));
                }
                return Ok(B256::from(n));
            }
            if let Some(len) = kind.strip_prefix("bytes") {
                let len = parse_width(kind, len, 1, 32)?;
                let bytes = decode_hex(value)?;
                if bytes.len() != len {
                    return Err(Error::typed_data(format!(
                        "expected {} bytes for {}, got {}",
                        len,
                        kind,
                        bytes.len()
                    )));
                }
                return Ok(B256::right_padding_from(&bytes));
            }
            Err(Error::typed_data(format!("unsupported type: {}", kind)))
        }
    }
}

#[allow(clippy::result_large_err)]
fn parse_width(kind: &str, raw: &str, min: usize, max: usize) -> Result<usize> {
    let width = if raw.is_empty() && kind.starts_with("uint") {
        256
    } else {
        raw.parse()
            .map_err(|_| Error::typed_data(format!("unsupported type: {}", kind)))?
    };
    let aligned = !kind.starts_with("uint") || width % 8 == 0;
    if width < min || width > max || !aligned {
        return Err(Error::typed_data(format!("unsupported type: {}", kind)));
    }
    Ok(width)
}

#[allow(clippy::result_large_err)]
fn parse_uint(value: &Value) -> Result<U256> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(U256::from)
            .ok_or_else(|| Error::typed_data(format!("not an unsigned integer: {}", n))),
        Value::String(s) => {
            let parsed = match s.strip_prefix("0x") {
                Some(hex) => U256::from_str_radix(hex, 16),
                None => U256::from_str_radix(s, 10),
            };
            parsed.map_err(|_| Error::typed_data(format!("not an unsigned integer: {:?}", s)))
        }
        other => Err(Error::typed_data(format!(
            "expected integer, got {}",
            other
        ))),
    }
}

#[allow(clippy::result_large_err)]
fn decode_hex(value: &Value) -> Result<Vec<u8>> {
    let s = value
        .as_str()
        .ok_or_else(|| Error::typed_data("expected hex string"))?;
    hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| Error::typed_data(format!("invalid hex {:?}: {}", s, e)))
}
