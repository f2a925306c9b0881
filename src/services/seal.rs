// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Device-key sealing for values kept in secure storage.
//!
//! Values are encrypted with AES-256-GCM under a per-device key. The storage
//! key name is bound as additional authenticated data, so a sealed token
//! cannot be swapped into the user slot (or vice versa).
//!
//! Sealed format: base64(nonce || ciphertext || tag).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::AppError;

/// Length of the raw device key in bytes.
pub const DEVICE_KEY_LEN: usize = 32;

/// AES-256-GCM key used to seal stored credentials.
pub struct DeviceKey {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl DeviceKey {
    /// Generate fresh key material. Returns the key and its raw bytes so the
    /// caller can persist them.
    pub fn generate() -> Result<(Self, [u8; DEVICE_KEY_LEN]), AppError> {
        let rng = SystemRandom::new();
        let mut bytes = [0u8; DEVICE_KEY_LEN];
        rng.fill(&mut bytes)
            .map_err(|_| AppError::Storage("Failed to generate device key".to_string()))?;
        let key = Self::from_bytes(&bytes)?;
        Ok((key, bytes))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AppError> {
        let unbound = UnboundKey::new(&AES_256_GCM, bytes)
            .map_err(|_| AppError::Storage("Invalid device key length".to_string()))?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Encrypt `plaintext`, binding it to `context`.
    pub fn seal(&self, plaintext: &str, context: &str) -> Result<String, AppError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| AppError::Storage("Failed to generate nonce".to_string()))?;

        let mut in_out = plaintext.as_bytes().to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::from(context.as_bytes()),
                &mut in_out,
            )
            .map_err(|_| AppError::Storage("Seal failed".to_string()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&in_out);
        Ok(BASE64.encode(sealed))
    }

    /// Decrypt a value produced by [`DeviceKey::seal`] with the same context.
    pub fn open(&self, sealed_b64: &str, context: &str) -> Result<String, AppError> {
        let mut sealed = BASE64
            .decode(sealed_b64.trim())
            .map_err(|e| AppError::Storage(format!("Base64 decode failed: {}", e)))?;
        if sealed.len() < NONCE_LEN {
            return Err(AppError::Storage("Sealed value too short".to_string()));
        }

        let mut ciphertext = sealed.split_off(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(&sealed)
            .map_err(|_| AppError::Storage("Invalid nonce".to_string()))?;

        let plaintext = self
            .key
            .open_in_place(nonce, Aad::from(context.as_bytes()), &mut ciphertext)
            .map_err(|_| AppError::Storage(format!("Failed to open sealed {}", context)))?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|e| AppError::Storage(format!("UTF-8 decode failed: {}", e)))
    }
}
