//! Account address derivation.
//!
//! `bech32(prefix, RIPEMD-160(SHA-256(compressed_pubkey)))`

use bech32::{ToBase32, Variant};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::{CryptoError, Secp256k1PublicKey};

/// 20-byte account identifier hashed from a public key.
pub fn account_id(public_key: &Secp256k1PublicKey) -> [u8; 20] {
    let sha = Sha256::digest(public_key.as_bytes());
    Ripemd160::digest(sha).into()
}

/// Bech32 account address for `public_key` under `prefix` (e.g. `allo`).
pub fn account_address(
    prefix: &str,
    public_key: &Secp256k1PublicKey,
) -> Result<String, CryptoError> {
    bech32::encode(prefix, account_id(public_key).to_base32(), Variant::Bech32)
        .map_err(|e| CryptoError::AddressEncoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Secp256k1KeyPair;
    use bech32::FromBase32;

    #[test]
    fn test_address_has_prefix_and_decodes_to_account_id() {
        let keypair = Secp256k1KeyPair::from_bytes([0x11; 32]).unwrap();
        let public_key = keypair.public_key();
        let address = account_address("allo", &public_key).unwrap();

        assert!(address.starts_with("allo1"));

        let (hrp, data, variant) = bech32::decode(&address).unwrap();
        assert_eq!(hrp, "allo");
        assert_eq!(variant, Variant::Bech32);
        let bytes = Vec::<u8>::from_base32(&data).unwrap();
        assert_eq!(bytes, account_id(&public_key).to_vec());
    }

    #[test]
    fn test_distinct_keys_distinct_addresses() {
        let a = Secp256k1KeyPair::from_bytes([0x11; 32]).unwrap();
        let b = Secp256k1KeyPair::from_bytes([0x22; 32]).unwrap();
        assert_ne!(
            account_address("allo", &a.public_key()).unwrap(),
            account_address("allo", &b.public_key()).unwrap()
        );
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        let keypair = Secp256k1KeyPair::from_bytes([0x11; 32]).unwrap();
        assert!(matches!(
            account_address("Allo", &keypair.public_key()),
            Err(CryptoError::AddressEncoding(_))
        ));
    }
}
