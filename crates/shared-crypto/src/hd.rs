//! # Hierarchical Deterministic Keys (BIP-39 / BIP-32)
//!
//! Wallets exported from Cosmos tooling are BIP-39 mnemonics whose signing
//! key lives at [`COSMOS_HD_PATH`]. Only private (secp256k1) derivation is
//! supported; extended public keys are never needed by the node.

use hmac::{Hmac, Mac};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, NonZeroScalar, Scalar, SecretKey};
use sha2::Sha512;
use zeroize::Zeroize;

use crate::{CryptoError, Secp256k1KeyPair};

type HmacSha512 = Hmac<Sha512>;

/// Derivation path of the first Cosmos account (coin type 118).
pub const COSMOS_HD_PATH: &str = "m/44'/118'/0'/0/0";

const HARDENED: u32 = 0x8000_0000;
const MASTER_KEY: &[u8] = b"Bitcoin seed";

/// Parse `m/44'/118'/0'/0/0` style paths into child indices.
///
/// Both `'` and `h` mark hardened components.
pub fn parse_path(path: &str) -> Result<Vec<u32>, CryptoError> {
    let invalid = || CryptoError::KeyDerivation(format!("invalid derivation path `{path}`"));

    let mut parts = path.trim().split('/');
    if parts.next() != Some("m") {
        return Err(invalid());
    }

    parts
        .map(|part| {
            let (digits, hardened) = match part.strip_suffix(['\'', 'h']) {
                Some(digits) => (digits, true),
                None => (part, false),
            };
            let index: u32 = digits.parse().map_err(|_| invalid())?;
            if index >= HARDENED {
                return Err(invalid());
            }
            Ok(if hardened { index | HARDENED } else { index })
        })
        .collect()
}

/// Derive the signing key at `path` from a BIP-39 seed.
pub fn derive_from_seed(seed: &[u8], path: &str) -> Result<Secp256k1KeyPair, CryptoError> {
    let indices = parse_path(path)?;

    let (mut key, mut chain_code) = split(hmac_sha512(MASTER_KEY, &[seed])?)?;
    for index in indices {
        let (child, child_chain) = derive_child(&key, &chain_code, index)?;
        chain_code.zeroize();
        key = child;
        chain_code = child_chain;
    }
    chain_code.zeroize();

    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&key.to_bytes());
    let keypair = Secp256k1KeyPair::from_bytes(bytes);
    bytes.zeroize();
    keypair
}

/// Derive the signing key at `path` from an English BIP-39 mnemonic with
/// an empty passphrase.
pub fn derive_from_mnemonic(phrase: &str, path: &str) -> Result<Secp256k1KeyPair, CryptoError> {
    let words = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
    let mnemonic = bip39::Mnemonic::parse_normalized(&words)
        .map_err(|e| CryptoError::InvalidMnemonic(e.to_string()))?;

    let mut seed = mnemonic.to_seed_normalized("");
    let keypair = derive_from_seed(&seed, path);
    seed.zeroize();
    keypair
}

fn derive_child(
    parent: &SecretKey,
    chain_code: &[u8; 32],
    index: u32,
) -> Result<(SecretKey, [u8; 32]), CryptoError> {
    let mut parent_bytes = parent.to_bytes();
    let output = if index & HARDENED != 0 {
        hmac_sha512(
            chain_code,
            &[&[0u8][..], parent_bytes.as_slice(), &index.to_be_bytes()[..]],
        )
    } else {
        let point = parent.public_key().to_encoded_point(true);
        hmac_sha512(chain_code, &[point.as_bytes(), &index.to_be_bytes()[..]])
    };
    parent_bytes.as_mut_slice().zeroize();
    let mut output = output?;

    let tweak: Option<Scalar> =
        Scalar::from_repr(FieldBytes::clone_from_slice(&output[..32])).into();
    let mut child_chain = [0u8; 32];
    child_chain.copy_from_slice(&output[32..]);
    output.zeroize();

    let tweak = tweak.ok_or_else(|| unusable(index))?;
    let child: Option<NonZeroScalar> =
        NonZeroScalar::new(tweak + parent.to_nonzero_scalar().as_ref()).into();
    let child = child.ok_or_else(|| unusable(index))?;

    Ok((SecretKey::from(child), child_chain))
}

fn split(mut output: [u8; 64]) -> Result<(SecretKey, [u8; 32]), CryptoError> {
    let key = SecretKey::from_slice(&output[..32]).map_err(|_| CryptoError::InvalidPrivateKey);
    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&output[32..]);
    output.zeroize();
    Ok((key?, chain_code))
}

fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<[u8; 64], CryptoError> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    for part in parts {
        mac.update(part);
    }
    let mut output = [0u8; 64];
    output.copy_from_slice(&mac.finalize().into_bytes());
    Ok(output)
}

fn unusable(index: u32) -> CryptoError {
    CryptoError::KeyDerivation(format!("child index {index:#x} yields an invalid key"))
}

impl Secp256k1KeyPair {
    /// Key of the first Cosmos account of a BIP-39 mnemonic.
    pub fn from_mnemonic(phrase: &str) -> Result<Self, CryptoError> {
        derive_from_mnemonic(phrase, COSMOS_HD_PATH)
    }
}
