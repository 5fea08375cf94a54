//! Call data encoding and return data decoding for the case contract.

use alloy_primitives::hex;
use alloy_sol_types::{Revert, SolCall, SolError, sol};
use detective_core::model::{Address, CaseId, CaseRecord};

use crate::error::AbiError;

sol! {
    function startCase(uint8 caseId);
    function completeCase(uint8 caseId, uint8 result);
    function playerCases(address player, uint8 caseId)
        returns (uint256 seed, uint8 result, uint256 timestamp, bool completed);
    function getCompletedUsers() returns (address[] users);
}

#[must_use]
pub fn start_case_calldata(case_id: CaseId) -> Vec<u8> {
    startCaseCall {
        caseId: case_id.value(),
    }
    .abi_encode()
}

#[must_use]
pub fn complete_case_calldata(case_id: CaseId, result: u8) -> Vec<u8> {
    completeCaseCall {
        caseId: case_id.value(),
        result,
    }
    .abi_encode()
}

#[must_use]
pub fn player_cases_calldata(player: Address, case_id: CaseId) -> Vec<u8> {
    playerCasesCall {
        player: player.inner(),
        caseId: case_id.value(),
    }
    .abi_encode()
}

#[must_use]
pub fn completed_users_calldata() -> Vec<u8> {
    getCompletedUsersCall {}.abi_encode()
}

/// Decode the `(uint256 seed, uint8 result, uint256 timestamp, bool completed)`
/// tuple returned by `playerCases`.
///
/// # Errors
///
/// Returns `AbiError` if the data is malformed or the timestamp exceeds `u64`.
pub fn decode_player_case(data: &[u8]) -> Result<CaseRecord, AbiError> {
    let decoded = playerCasesCall::abi_decode_returns(data, true)?;
    let timestamp =
        u64::try_from(decoded.timestamp).map_err(|_| AbiError::Overflow("timestamp"))?;

    Ok(CaseRecord {
        seed: decoded.seed.to_be_bytes::<32>(),
        result: decoded.result,
        timestamp,
        completed: decoded.completed,
    })
}

/// Decode the `address[]` returned by `getCompletedUsers`.
///
/// # Errors
///
/// Returns `AbiError` if offsets or lengths point outside the data.
pub fn decode_address_array(data: &[u8]) -> Result<Vec<Address>, AbiError> {
    let decoded = getCompletedUsersCall::abi_decode_returns(data, true)?;
    Ok(decoded.users.into_iter().map(Address::from).collect())
}

/// Extract the message of an `Error(string)` revert payload.
#[must_use]
pub fn decode_revert_reason(data: &[u8]) -> Option<String> {
    Revert::abi_decode(data, true).ok().map(|revert| revert.reason)
}

/// `0x`-prefixed lowercase hex.
#[must_use]
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode_prefixed(bytes)
}

/// Decode `0x`-prefixed (or bare) hex; `"0x"` decodes to an empty vec.
///
/// # Errors
///
/// Returns `AbiError::InvalidHex` for odd lengths or non-hex characters.
pub fn decode_hex(raw: &str) -> Result<Vec<u8>, AbiError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(digits).map_err(|_| AbiError::InvalidHex)
}

/// Parse a JSON-RPC hex quantity such as `"0x1bc16d674ec80000"`.
///
/// # Errors
///
/// Returns `AbiError` for malformed hex or values above `u128::MAX`.
pub fn parse_quantity(raw: &str) -> Result<u128, AbiError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    if digits.is_empty() {
        return Ok(0);
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AbiError::InvalidHex);
    }
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(significant, 16).map_err(|_| AbiError::Overflow("quantity"))
}
