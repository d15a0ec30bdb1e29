//! Instruction-level trace records in the go-ethereum `--json` log shape

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Opcode as emitted by the VM: either the raw byte or its mnemonic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Opcode {
    Byte(u8),
    Mnemonic(String),
}

/// One executed instruction.
///
/// Every field is optional on the wire and falls back to its zero value,
/// whether it is missing or `null`, so a successful decode says nothing about whether the line was an
/// instruction. Use [`TraceRecord::is_instruction`] for that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TraceRecord {
    #[serde(deserialize_with = "null_default")]
    pub pc: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op: Option<Opcode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op_name: Option<String>,
    #[serde(deserialize_with = "quantity")]
    pub gas: u64,
    #[serde(deserialize_with = "quantity")]
    pub gas_cost: u64,
    #[serde(deserialize_with = "null_default")]
    pub mem_size: u64,
    #[serde(deserialize_with = "null_default")]
    pub stack: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_data: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub depth: u64,
    #[serde(deserialize_with = "quantity")]
    pub refund: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TraceRecord {
    /// Depth 0 is reserved for run summaries and all-default artifacts.
    pub fn is_instruction(&self) -> bool {
        self.depth >= 1
    }

    /// Human-readable opcode, if the VM reported one
    pub fn mnemonic(&self) -> Option<&str> {
        if let Some(name) = self.op_name.as_deref().filter(|n| !n.is_empty()) {
            return Some(name);
        }
        match &self.op {
            Some(Opcode::Mnemonic(name)) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Raw opcode byte, if the VM reported one
    pub fn opcode(&self) -> Option<u8> {
        match self.op {
            Some(Opcode::Byte(byte)) => Some(byte),
            _ => None,
        }
    }

    /// True when this step reported a non-empty error
    pub fn failed(&self) -> bool {
        self.error.as_deref().is_some_and(|e| !e.is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Quantity {
    Number(u64),
    Text(String),
}

/// Read `null` as the field's zero value.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept `u64` quantities as JSON numbers, `0x`-prefixed hex, or decimal
/// strings. `null` reads as 0.
fn quantity<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Quantity>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Quantity::Number(value)) => Ok(value),
        Some(Quantity::Text(text)) => parse_quantity(&text).map_err(serde::de::Error::custom),
    }
}

fn parse_quantity(text: &str) -> Result<u64, String> {
    let trimmed = text.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some("") => Ok(0),
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid quantity {:?}: {}", text, e))
}
