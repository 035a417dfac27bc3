//! At-rest record encryption (component 3). Values are snappy-compressed
//! then sealed with AES-256-GCM before they reach the key value store; a
//! random 96-bit nonce is generated per call and stored alongside the
//! ciphertext so decryption never needs external nonce bookkeeping.
use crate::err::Error;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;

const NONCE_LEN: usize = 12;

/// A 256-bit key used to seal/unseal values for one datastore.
#[derive(Clone)]
pub struct CipherKey([u8; 32]);

impl CipherKey {
	pub fn from_bytes(bytes: [u8; 32]) -> Self {
		Self(bytes)
	}

	pub fn try_from_slice(bytes: &[u8]) -> Result<Self, Error> {
		let arr: [u8; 32] = bytes.try_into().map_err(|_| Error::InvalidCipherKey("key must be 32 bytes".into()))?;
		Ok(Self(arr))
	}

	pub fn generate() -> Self {
		let mut bytes = [0u8; 32];
		rand::thread_rng().fill_bytes(&mut bytes);
		Self(bytes)
	}
}

/// Compress `plaintext` and seal it. Output layout is `nonce || ciphertext`.
pub fn encrypt(key: &CipherKey, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
	let compressed = snap::raw::Encoder::new().compress_vec(plaintext).map_err(|_| Error::Cipher)?;
	let cipher = Aes256Gcm::new_from_slice(&key.0).map_err(|_| Error::Cipher)?;
	let mut nonce_bytes = [0u8; NONCE_LEN];
	rand::thread_rng().fill_bytes(&mut nonce_bytes);
	let nonce = Nonce::from_slice(&nonce_bytes);
	let ciphertext = cipher.encrypt(nonce, compressed.as_ref()).map_err(|_| Error::Cipher)?;
	let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
	out.extend_from_slice(&nonce_bytes);
	out.extend_from_slice(&ciphertext);
	Ok(out)
}

/// Reverse of [`encrypt`]: unseal then decompress.
pub fn decrypt(key: &CipherKey, sealed: &[u8]) -> Result<Vec<u8>, Error> {
	if sealed.len() < NONCE_LEN {
		return Err(Error::Cipher);
	}
	let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
	let cipher = Aes256Gcm::new_from_slice(&key.0).map_err(|_| Error::Cipher)?;
	let compressed =
		cipher.decrypt(Nonce::from_slice(nonce_bytes), ciphertext).map_err(|_| Error::Cipher)?;
	snap::raw::Decoder::new().decompress_vec(&compressed).map_err(|_| Error::Cipher)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn roundtrip() {
		let key = CipherKey::generate();
		let plaintext = b"{\"name\":\"alice\"}".to_vec();
		let sealed = encrypt(&key, &plaintext).unwrap();
		assert_ne!(sealed, plaintext);
		let opened = decrypt(&key, &sealed).unwrap();
		assert_eq!(opened, plaintext);
	}

	#[test]
	fn tampered_ciphertext_fails() {
		let key = CipherKey::generate();
		let mut sealed = encrypt(&key, b"hello").unwrap();
		let last = sealed.len() - 1;
		sealed[last] ^= 0xff;
		assert!(decrypt(&key, &sealed).is_err());
	}
}
