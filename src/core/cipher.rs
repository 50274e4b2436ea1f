// Copyright 2022 Parity Technologies (UK) Ltd.
//
// Permission is hereby granted, free of charge, to any person obtaining a
// copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
// OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

//! Per-layer symmetric cipher and its self-describing token format.
//!
//! A token is `base64(iv) ":" base64(ciphertext)`, with the authentication tag
//! carried at the end of the ciphertext segment. The IV is drawn fresh on every
//! encryption; it is never reused across calls, even under the same key.

use super::{
	crypto::{self, DerivedSecrets, Iv, IV_SIZE, MAC_SIZE},
	error::Error,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::{CryptoRng, Rng};
use zeroize::Zeroizing;

/// Size in bytes of a symmetric layer key.
pub const KEY_SIZE: usize = 32;

/// Symmetric key protecting exactly one layer of one message: used for one
/// encryption by the sender and one decryption by one relay, then discarded.
pub struct SymmetricKey(Zeroizing<[u8; KEY_SIZE]>);

impl std::fmt::Debug for SymmetricKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("SymmetricKey").field(&"<redacted>").finish()
	}
}

impl SymmetricKey {
	pub fn generate(rng: &mut (impl Rng + CryptoRng)) -> Self {
		let mut key = [0; KEY_SIZE];
		rng.fill_bytes(&mut key);
		Self(Zeroizing::new(key))
	}

	/// Transport-safe textual encoding. Lossless: `from_base64` of the result yields
	/// the same key.
	pub fn to_base64(&self) -> String {
		STANDARD.encode(&self.0[..])
	}

	pub fn from_base64(encoded: &str) -> Result<Self, Error> {
		let bytes = STANDARD.decode(encoded).map_err(|_| Error::InvalidKey)?;
		let key: [u8; KEY_SIZE] = bytes.try_into().map_err(|_| Error::InvalidKey)?;
		Ok(Self(Zeroizing::new(key)))
	}

	/// Encrypt `plaintext` into a token, drawing a fresh IV.
	pub fn encrypt(&self, rng: &mut (impl Rng + CryptoRng), plaintext: &[u8]) -> String {
		let secrets = DerivedSecrets::for_token(&self.0);
		let mut iv: Iv = [0; IV_SIZE];
		rng.fill_bytes(&mut iv);
		let mut ciphertext = plaintext.to_vec();
		crypto::apply_keystream(&mut ciphertext, secrets.encryption_key(), &iv);
		let mac = crypto::compute_mac(secrets.mac_key(), &[&iv, &ciphertext]);
		ciphertext.extend_from_slice(&mac);
		format!("{}:{}", STANDARD.encode(iv), STANDARD.encode(ciphertext))
	}

	/// Reverse [`Self::encrypt`]. A token without its separator is
	/// [`Error::MalformedToken`]; any decode, length, or authentication failure is
	/// [`Error::DecryptionFailure`], with no further detail by design.
	pub fn decrypt(&self, token: &str) -> Result<Vec<u8>, Error> {
		let (iv, ciphertext) = token.split_once(':').ok_or(Error::MalformedToken)?;
		let iv = STANDARD.decode(iv).map_err(|_| Error::DecryptionFailure)?;
		let iv: Iv = iv.try_into().map_err(|_| Error::DecryptionFailure)?;
		let mut ciphertext = STANDARD.decode(ciphertext).map_err(|_| Error::DecryptionFailure)?;
		if ciphertext.len() < MAC_SIZE {
			return Err(Error::DecryptionFailure)
		}
		let mac_offset = ciphertext.len() - MAC_SIZE;
		let mac: crypto::Mac =
			ciphertext[mac_offset..].try_into().expect("MAC_SIZE bytes sliced above");
		ciphertext.truncate(mac_offset);
		let secrets = DerivedSecrets::for_token(&self.0);
		if !crypto::mac_ok(&mac, secrets.mac_key(), &[&iv, &ciphertext]) {
			return Err(Error::DecryptionFailure)
		}
		crypto::apply_keystream(&mut ciphertext, secrets.encryption_key(), &iv);
		Ok(ciphertext)
	}
}
