//! Bitcoin Cash opcode constants and name tables.
//!
//! Defines the opcode byte values used throughout the SDK and provides
//! conversions between opcode bytes and their canonical OP_xxx names for
//! ASM parsing and rendering.

// ---------------------------------------------------------------------------
// Push data
// ---------------------------------------------------------------------------

/// Push an empty byte array onto the stack.
pub const OP_0: u8 = 0x00;
/// Alias for OP_0.
pub const OP_FALSE: u8 = 0x00;
/// Smallest direct data push (1 byte).
pub const OP_DATA_1: u8 = 0x01;
/// Direct push of 20 bytes (public key hashes).
pub const OP_DATA_20: u8 = 0x14;
/// Direct push of 32 bytes (script hashes, categories).
pub const OP_DATA_32: u8 = 0x20;
/// Largest direct data push (75 bytes).
pub const OP_DATA_75: u8 = 0x4b;
/// Push data with a 1-byte length prefix.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// Push data with a 2-byte length prefix.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// Push data with a 4-byte length prefix.
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Push the number -1 onto the stack.
pub const OP_1NEGATE: u8 = 0x4f;
/// Push the number 1 onto the stack.
pub const OP_1: u8 = 0x51;
/// Alias for OP_1.
pub const OP_TRUE: u8 = 0x51;
/// Push the number 2 onto the stack.
pub const OP_2: u8 = 0x52;
/// Push the number 3 onto the stack.
pub const OP_3: u8 = 0x53;
/// Push the number 16 onto the stack.
pub const OP_16: u8 = 0x60;

// ---------------------------------------------------------------------------
// Flow control
// ---------------------------------------------------------------------------

/// No operation.
pub const OP_NOP: u8 = 0x61;
/// Conditional execution start.
pub const OP_IF: u8 = 0x63;
/// Inverted conditional execution start.
pub const OP_NOTIF: u8 = 0x64;
/// Conditional alternative branch.
pub const OP_ELSE: u8 = 0x67;
/// Conditional execution end.
pub const OP_ENDIF: u8 = 0x68;
/// Fail unless the top stack value is truthy.
pub const OP_VERIFY: u8 = 0x69;
/// Mark the output as unspendable; remaining bytes are data.
pub const OP_RETURN: u8 = 0x6a;

// ---------------------------------------------------------------------------
// Stack
// ---------------------------------------------------------------------------

/// Move the top stack item to the alt stack.
pub const OP_TOALTSTACK: u8 = 0x6b;
/// Move the top alt stack item to the stack.
pub const OP_FROMALTSTACK: u8 = 0x6c;
/// Drop the top two stack items.
pub const OP_2DROP: u8 = 0x6d;
/// Duplicate the top two stack items.
pub const OP_2DUP: u8 = 0x6e;
/// Duplicate the top three stack items.
pub const OP_3DUP: u8 = 0x6f;
/// Copy the second-from-top pair to the top.
pub const OP_2OVER: u8 = 0x70;
/// Rotate the top three pairs.
pub const OP_2ROT: u8 = 0x71;
/// Swap the top two pairs.
pub const OP_2SWAP: u8 = 0x72;
/// Duplicate the top item if it is truthy.
pub const OP_IFDUP: u8 = 0x73;
/// Push the stack depth.
pub const OP_DEPTH: u8 = 0x74;
/// Drop the top stack item.
pub const OP_DROP: u8 = 0x75;
/// Duplicate the top stack item.
pub const OP_DUP: u8 = 0x76;
/// Remove the second-from-top stack item.
pub const OP_NIP: u8 = 0x77;
/// Copy the second-from-top stack item to the top.
pub const OP_OVER: u8 = 0x78;
/// Copy the n-th stack item to the top.
pub const OP_PICK: u8 = 0x79;
/// Move the n-th stack item to the top.
pub const OP_ROLL: u8 = 0x7a;
/// Rotate the top three stack items.
pub const OP_ROT: u8 = 0x7b;
/// Swap the top two stack items.
pub const OP_SWAP: u8 = 0x7c;
/// Copy the top item below the second item.
pub const OP_TUCK: u8 = 0x7d;

// ---------------------------------------------------------------------------
// Splice / data
// ---------------------------------------------------------------------------

/// Concatenate the top two byte arrays.
pub const OP_CAT: u8 = 0x7e;
/// Split a byte array at an index.
pub const OP_SPLIT: u8 = 0x7f;
/// Pad/truncate a number to a byte length.
pub const OP_NUM2BIN: u8 = 0x80;
/// Convert a byte array to a minimally-encoded number.
pub const OP_BIN2NUM: u8 = 0x81;
/// Push the length of the top byte array.
pub const OP_SIZE: u8 = 0x82;
/// Reverse the top byte array.
pub const OP_REVERSEBYTES: u8 = 0xbc;

// ---------------------------------------------------------------------------
// Bitwise / comparison
// ---------------------------------------------------------------------------

/// Bitwise AND.
pub const OP_AND: u8 = 0x84;
/// Bitwise OR.
pub const OP_OR: u8 = 0x85;
/// Bitwise XOR.
pub const OP_XOR: u8 = 0x86;
/// Byte-equality check.
pub const OP_EQUAL: u8 = 0x87;
/// Byte-equality check followed by OP_VERIFY.
pub const OP_EQUALVERIFY: u8 = 0x88;

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

/// Add 1 to the top number.
pub const OP_1ADD: u8 = 0x8b;
/// Subtract 1 from the top number.
pub const OP_1SUB: u8 = 0x8c;
/// Negate the top number.
pub const OP_NEGATE: u8 = 0x8f;
/// Absolute value of the top number.
pub const OP_ABS: u8 = 0x90;
/// Boolean NOT of the top number.
pub const OP_NOT: u8 = 0x91;
/// 1 if the top number is non-zero, else 0.
pub const OP_0NOTEQUAL: u8 = 0x92;
/// Add the top two numbers.
pub const OP_ADD: u8 = 0x93;
/// Subtract the top number from the second.
pub const OP_SUB: u8 = 0x94;
/// Multiply the top two numbers.
pub const OP_MUL: u8 = 0x95;
/// Integer division.
pub const OP_DIV: u8 = 0x96;
/// Modulo.
pub const OP_MOD: u8 = 0x97;
/// Boolean AND of the top two numbers.
pub const OP_BOOLAND: u8 = 0x9a;
/// Boolean OR of the top two numbers.
pub const OP_BOOLOR: u8 = 0x9b;
/// Numeric equality check.
pub const OP_NUMEQUAL: u8 = 0x9c;
/// Numeric equality check followed by OP_VERIFY.
pub const OP_NUMEQUALVERIFY: u8 = 0x9d;
/// Numeric inequality check.
pub const OP_NUMNOTEQUAL: u8 = 0x9e;
/// Less-than comparison.
pub const OP_LESSTHAN: u8 = 0x9f;
/// Greater-than comparison.
pub const OP_GREATERTHAN: u8 = 0xa0;
/// Less-than-or-equal comparison.
pub const OP_LESSTHANOREQUAL: u8 = 0xa1;
/// Greater-than-or-equal comparison.
pub const OP_GREATERTHANOREQUAL: u8 = 0xa2;
/// Minimum of the top two numbers.
pub const OP_MIN: u8 = 0xa3;
/// Maximum of the top two numbers.
pub const OP_MAX: u8 = 0xa4;
/// Range check: min <= x < max.
pub const OP_WITHIN: u8 = 0xa5;

// ---------------------------------------------------------------------------
// Crypto
// ---------------------------------------------------------------------------

/// RIPEMD-160 hash.
pub const OP_RIPEMD160: u8 = 0xa6;
/// SHA-1 hash.
pub const OP_SHA1: u8 = 0xa7;
/// SHA-256 hash.
pub const OP_SHA256: u8 = 0xa8;
/// SHA-256 then RIPEMD-160.
pub const OP_HASH160: u8 = 0xa9;
/// Double SHA-256.
pub const OP_HASH256: u8 = 0xaa;
/// Mark the signed portion of the script.
pub const OP_CODESEPARATOR: u8 = 0xab;
/// Verify a transaction signature.
pub const OP_CHECKSIG: u8 = 0xac;
/// OP_CHECKSIG followed by OP_VERIFY.
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
/// Verify an m-of-n multisignature.
pub const OP_CHECKMULTISIG: u8 = 0xae;
/// OP_CHECKMULTISIG followed by OP_VERIFY.
pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;
/// Verify a data signature against arbitrary data.
pub const OP_CHECKDATASIG: u8 = 0xba;
/// OP_CHECKDATASIG followed by OP_VERIFY.
pub const OP_CHECKDATASIGVERIFY: u8 = 0xbb;

// ---------------------------------------------------------------------------
// Locktime
// ---------------------------------------------------------------------------

/// Fail if the transaction locktime is below the top number.
pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb1;
/// Fail if the input sequence encodes a shorter relative locktime.
pub const OP_CHECKSEQUENCEVERIFY: u8 = 0xb2;

// ---------------------------------------------------------------------------
// Introspection (BCH 2022)
// ---------------------------------------------------------------------------

/// Push the index of the input being evaluated.
pub const OP_INPUTINDEX: u8 = 0xc0;
/// Push the active bytecode being evaluated.
pub const OP_ACTIVEBYTECODE: u8 = 0xc1;
/// Push the transaction version.
pub const OP_TXVERSION: u8 = 0xc2;
/// Push the number of transaction inputs.
pub const OP_TXINPUTCOUNT: u8 = 0xc3;
/// Push the number of transaction outputs.
pub const OP_TXOUTPUTCOUNT: u8 = 0xc4;
/// Push the transaction locktime.
pub const OP_TXLOCKTIME: u8 = 0xc5;
/// Push the value of the input at an index.
pub const OP_UTXOVALUE: u8 = 0xc6;
/// Push the locking bytecode of the input at an index.
pub const OP_UTXOBYTECODE: u8 = 0xc7;
/// Push the outpoint transaction hash of an input.
pub const OP_OUTPOINTTXHASH: u8 = 0xc8;
/// Push the outpoint index of an input.
pub const OP_OUTPOINTINDEX: u8 = 0xc9;
/// Push the unlocking bytecode of an input.
pub const OP_INPUTBYTECODE: u8 = 0xca;
/// Push the sequence number of an input.
pub const OP_INPUTSEQUENCENUMBER: u8 = 0xcb;
/// Push the value of the output at an index.
pub const OP_OUTPUTVALUE: u8 = 0xcc;
/// Push the locking bytecode of the output at an index.
pub const OP_OUTPUTBYTECODE: u8 = 0xcd;

/// Convert an opcode byte to its canonical OP_xxx name.
///
/// Data push opcodes in the range 0x01..=0x4b render as `OP_DATA_n`.
///
/// # Arguments
/// * `op` - The opcode byte.
///
/// # Returns
/// The canonical opcode name, or `OP_UNKNOWN` for unassigned bytes.
pub fn opcode_to_string(op: u8) -> &'static str {
    match op {
        OP_0 => "OP_0",
        0x01..=0x4b => "OP_DATA",
        OP_PUSHDATA1 => "OP_PUSHDATA1",
        OP_PUSHDATA2 => "OP_PUSHDATA2",
        OP_PUSHDATA4 => "OP_PUSHDATA4",
        OP_1NEGATE => "OP_1NEGATE",
        OP_1 => "OP_1",
        OP_2 => "OP_2",
        OP_3 => "OP_3",
        0x54 => "OP_4",
        0x55 => "OP_5",
        0x56 => "OP_6",
        0x57 => "OP_7",
        0x58 => "OP_8",
        0x59 => "OP_9",
        0x5a => "OP_10",
        0x5b => "OP_11",
        0x5c => "OP_12",
        0x5d => "OP_13",
        0x5e => "OP_14",
        0x5f => "OP_15",
        OP_16 => "OP_16",
        OP_NOP => "OP_NOP",
        OP_IF => "OP_IF",
        OP_NOTIF => "OP_NOTIF",
        OP_ELSE => "OP_ELSE",
        OP_ENDIF => "OP_ENDIF",
        OP_VERIFY => "OP_VERIFY",
        OP_RETURN => "OP_RETURN",
        OP_TOALTSTACK => "OP_TOALTSTACK",
        OP_FROMALTSTACK => "OP_FROMALTSTACK",
        OP_2DROP => "OP_2DROP",
        OP_2DUP => "OP_2DUP",
        OP_3DUP => "OP_3DUP",
        OP_2OVER => "OP_2OVER",
        OP_2ROT => "OP_2ROT",
        OP_2SWAP => "OP_2SWAP",
        OP_IFDUP => "OP_IFDUP",
        OP_DEPTH => "OP_DEPTH",
        OP_DROP => "OP_DROP",
        OP_DUP => "OP_DUP",
        OP_NIP => "OP_NIP",
        OP_OVER => "OP_OVER",
        OP_PICK => "OP_PICK",
        OP_ROLL => "OP_ROLL",
        OP_ROT => "OP_ROT",
        OP_SWAP => "OP_SWAP",
        OP_TUCK => "OP_TUCK",
        OP_CAT => "OP_CAT",
        OP_SPLIT => "OP_SPLIT",
        OP_NUM2BIN => "OP_NUM2BIN",
        OP_BIN2NUM => "OP_BIN2NUM",
        OP_SIZE => "OP_SIZE",
        OP_AND => "OP_AND",
        OP_OR => "OP_OR",
        OP_XOR => "OP_XOR",
        OP_EQUAL => "OP_EQUAL",
        OP_EQUALVERIFY => "OP_EQUALVERIFY",
        OP_1ADD => "OP_1ADD",
        OP_1SUB => "OP_1SUB",
        OP_NEGATE => "OP_NEGATE",
        OP_ABS => "OP_ABS",
        OP_NOT => "OP_NOT",
        OP_0NOTEQUAL => "OP_0NOTEQUAL",
        OP_ADD => "OP_ADD",
        OP_SUB => "OP_SUB",
        OP_MUL => "OP_MUL",
        OP_DIV => "OP_DIV",
        OP_MOD => "OP_MOD",
        OP_BOOLAND => "OP_BOOLAND",
        OP_BOOLOR => "OP_BOOLOR",
        OP_NUMEQUAL => "OP_NUMEQUAL",
        OP_NUMEQUALVERIFY => "OP_NUMEQUALVERIFY",
        OP_NUMNOTEQUAL => "OP_NUMNOTEQUAL",
        OP_LESSTHAN => "OP_LESSTHAN",
        OP_GREATERTHAN => "OP_GREATERTHAN",
        OP_LESSTHANOREQUAL => "OP_LESSTHANOREQUAL",
        OP_GREATERTHANOREQUAL => "OP_GREATERTHANOREQUAL",
        OP_MIN => "OP_MIN",
        OP_MAX => "OP_MAX",
        OP_WITHIN => "OP_WITHIN",
        OP_RIPEMD160 => "OP_RIPEMD160",
        OP_SHA1 => "OP_SHA1",
        OP_SHA256 => "OP_SHA256",
        OP_HASH160 => "OP_HASH160",
        OP_HASH256 => "OP_HASH256",
        OP_CODESEPARATOR => "OP_CODESEPARATOR",
        OP_CHECKSIG => "OP_CHECKSIG",
        OP_CHECKSIGVERIFY => "OP_CHECKSIGVERIFY",
        OP_CHECKMULTISIG => "OP_CHECKMULTISIG",
        OP_CHECKMULTISIGVERIFY => "OP_CHECKMULTISIGVERIFY",
        OP_CHECKLOCKTIMEVERIFY => "OP_CHECKLOCKTIMEVERIFY",
        OP_CHECKSEQUENCEVERIFY => "OP_CHECKSEQUENCEVERIFY",
        OP_CHECKDATASIG => "OP_CHECKDATASIG",
        OP_CHECKDATASIGVERIFY => "OP_CHECKDATASIGVERIFY",
        OP_REVERSEBYTES => "OP_REVERSEBYTES",
        OP_INPUTINDEX => "OP_INPUTINDEX",
        OP_ACTIVEBYTECODE => "OP_ACTIVEBYTECODE",
        OP_TXVERSION => "OP_TXVERSION",
        OP_TXINPUTCOUNT => "OP_TXINPUTCOUNT",
        OP_TXOUTPUTCOUNT => "OP_TXOUTPUTCOUNT",
        OP_TXLOCKTIME => "OP_TXLOCKTIME",
        OP_UTXOVALUE => "OP_UTXOVALUE",
        OP_UTXOBYTECODE => "OP_UTXOBYTECODE",
        OP_OUTPOINTTXHASH => "OP_OUTPOINTTXHASH",
        OP_OUTPOINTINDEX => "OP_OUTPOINTINDEX",
        OP_INPUTBYTECODE => "OP_INPUTBYTECODE",
        OP_INPUTSEQUENCENUMBER => "OP_INPUTSEQUENCENUMBER",
        OP_OUTPUTVALUE => "OP_OUTPUTVALUE",
        OP_OUTPUTBYTECODE => "OP_OUTPUTBYTECODE",
        _ => "OP_UNKNOWN",
    }
}

/// Look up an opcode byte by its canonical OP_xxx name.
///
/// Accepts the aliases `OP_FALSE` and `OP_TRUE`. Data push opcodes
/// (OP_DATA_n / OP_PUSHDATAn) are not resolvable by name; push data is
/// encoded via [`crate::chunk::push_data_prefix`].
///
/// # Arguments
/// * `name` - The opcode name (e.g. "OP_DUP").
///
/// # Returns
/// `Some(opcode)` if the name is recognized, otherwise `None`.
pub fn string_to_opcode(name: &str) -> Option<u8> {
    match name {
        "OP_FALSE" => return Some(OP_FALSE),
        "OP_TRUE" => return Some(OP_TRUE),
        _ => {}
    }
    // The name table is total over non-push opcodes, so a reverse scan
    // over the byte range resolves any canonical name.
    std::iter::once(OP_0).chain(0x4f..=0xff).find(|&op| {
        let s = opcode_to_string(op);
        s != "OP_UNKNOWN" && s == name
    })
}

/// Check whether an opcode is a small integer push (OP_0, OP_1..OP_16).
///
/// # Arguments
/// * `op` - The opcode byte.
///
/// # Returns
/// `true` for OP_0 and OP_1 through OP_16.
pub fn is_small_int_op(op: u8) -> bool {
    op == OP_0 || (OP_1..=OP_16).contains(&op)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify opcode names round-trip through string_to_opcode.
    #[test]
    fn test_name_roundtrip() {
        for op in [OP_DUP, OP_HASH160, OP_EQUALVERIFY, OP_CHECKSIG, OP_PICK, OP_3, OP_RETURN] {
            let name = opcode_to_string(op);
            assert_eq!(string_to_opcode(name), Some(op), "roundtrip for {name}");
        }
    }

    /// Verify aliases resolve to the canonical bytes.
    #[test]
    fn test_aliases() {
        assert_eq!(string_to_opcode("OP_FALSE"), Some(OP_0));
        assert_eq!(string_to_opcode("OP_TRUE"), Some(OP_1));
    }

    /// Verify unknown names return None.
    #[test]
    fn test_unknown_name() {
        assert_eq!(string_to_opcode("OP_BOGUS"), None);
        assert_eq!(string_to_opcode("deadbeef"), None);
    }

    /// Verify small int classification.
    #[test]
    fn test_is_small_int_op() {
        assert!(is_small_int_op(OP_0));
        assert!(is_small_int_op(OP_1));
        assert!(is_small_int_op(OP_16));
        assert!(!is_small_int_op(OP_DUP));
        assert!(!is_small_int_op(OP_1NEGATE));
    }
}
