//! Passphrase-sealed envelope for the diary vault.
//!
//! Layout: `salt (32) || nonce (12) || AES-256-GCM(tag || payload)`, key from
//! Argon2id over the passphrase and salt.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

const SALT_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
const HEADER_LEN: usize = SALT_LEN + NONCE_LEN;

/// Prefix of every sealed payload; a wrong passphrase never reproduces it.
const TAG: &[u8] = b"PDIARY_V1";

// Argon2id cost: 64 MiB, 3 passes, 1 lane
const KDF_MEMORY_KIB: u32 = 65536;
const KDF_PASSES: u32 = 3;
const KDF_LANES: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("key derivation failed")]
    KeyDerivation,
    #[error("sealing failed")]
    Seal,
    #[error("cannot open vault: wrong passphrase or damaged file")]
    Open,
    #[error("vault file is truncated")]
    Truncated,
}

fn derive_key(passphrase: &str, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>, CryptoError> {
    let params = Params::new(KDF_MEMORY_KIB, KDF_PASSES, KDF_LANES, Some(KEY_LEN))
        .map_err(|_| CryptoError::KeyDerivation)?;
    let kdf = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    kdf.hash_password_into(passphrase.as_bytes(), salt, &mut *key)
        .map_err(|_| CryptoError::KeyDerivation)?;
    Ok(key)
}

fn cipher_for(passphrase: &str, salt: &[u8]) -> Result<Aes256Gcm, CryptoError> {
    let key = derive_key(passphrase, salt)?;
    Aes256Gcm::new_from_slice(&key[..]).map_err(|_| CryptoError::KeyDerivation)
}

/// Seal `payload` under `passphrase` with a fresh salt and nonce.
pub fn seal(passphrase: &str, payload: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut header = [0u8; HEADER_LEN];
    rand::thread_rng().fill_bytes(&mut header);
    let (salt, nonce) = header.split_at(SALT_LEN);

    let cipher = cipher_for(passphrase, salt)?;

    let mut plaintext = Zeroizing::new(Vec::<u8>::with_capacity(TAG.len() + payload.len()));
    plaintext.extend_from_slice(TAG);
    plaintext.extend_from_slice(payload);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(nonce), plaintext.as_slice())
        .map_err(|_| CryptoError::Seal)?;

    let mut sealed = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    sealed.extend_from_slice(&header);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Open an envelope produced by [`seal`].
pub fn open(passphrase: &str, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < HEADER_LEN + TAG.len() {
        return Err(CryptoError::Truncated);
    }
    let (header, ciphertext) = sealed.split_at(HEADER_LEN);
    let (salt, nonce) = header.split_at(SALT_LEN);

    let cipher = cipher_for(passphrase, salt)?;
    let mut plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Open)?;

    if !plaintext.starts_with(TAG) {
        plaintext.zeroize();
        return Err(CryptoError::Open);
    }
    let payload = plaintext[TAG.len()..].to_vec();
    plaintext.zeroize();
    Ok(payload)
}
