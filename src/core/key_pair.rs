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

//! Relay key pairs and symmetric key wrapping.

use super::{
	crypto::{
		self, derive_public, derive_shared_secret, gen_secret, DerivedSecrets, Public, Secret,
		MAC_SIZE, SECRET_SIZE,
	},
	error::Error,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::{CryptoRng, Rng};
use zeroize::Zeroizing;

/// X25519 public key of one relay, as published to the directory.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PublicKey(Public);

impl PublicKey {
	pub fn as_bytes(&self) -> &Public {
		&self.0
	}

	/// Transport-safe textual encoding. Lossless: `from_base64` of the result yields
	/// the same key.
	pub fn to_base64(&self) -> String {
		STANDARD.encode(self.0)
	}

	pub fn from_base64(encoded: &str) -> Result<Self, Error> {
		let bytes = STANDARD.decode(encoded).map_err(|_| Error::InvalidKey)?;
		let bytes: Public = bytes.try_into().map_err(|_| Error::InvalidKey)?;
		Ok(Self(bytes))
	}
}

impl From<Public> for PublicKey {
	fn from(bytes: Public) -> Self {
		Self(bytes)
	}
}

/// Key pair held by one relay for its process lifetime. The secret half never
/// leaves the relay.
pub struct KeyPair {
	/// Boxed to avoid leaving copies of the secret key around in memory if `KeyPair` is moved.
	secret: Box<Zeroizing<Secret>>,
	public: PublicKey,
}

impl KeyPair {
	pub fn generate(rng: &mut (impl Rng + CryptoRng)) -> Self {
		gen_secret(rng).into()
	}

	pub fn public(&self) -> &PublicKey {
		&self.public
	}

	/// Recover key material sealed to this key pair by [`wrap_key`].
	///
	/// A blob sealed for another relay and a corrupted blob fail identically; nothing
	/// here distinguishes the two.
	pub fn unwrap_key(&self, wrapped: &str) -> Result<Vec<u8>, Error> {
		let blob = STANDARD.decode(wrapped).map_err(|_| Error::DecryptionFailure)?;
		if blob.len() < SECRET_SIZE + MAC_SIZE {
			return Err(Error::DecryptionFailure)
		}
		let (ephemeral, rest) = blob.split_at(SECRET_SIZE);
		let (mac, ciphertext) = rest.split_at(MAC_SIZE);
		let ephemeral: Public = ephemeral.try_into().expect("Split at SECRET_SIZE above");
		let mac: crypto::Mac = mac.try_into().expect("Split at MAC_SIZE above");
		let shared_secret = derive_shared_secret(&ephemeral, self.secret.as_ref());
		if crypto::shared_secret_is_identity(&shared_secret) {
			return Err(Error::DecryptionFailure)
		}
		let secrets = DerivedSecrets::for_key_wrap(&shared_secret);
		if !crypto::mac_ok(&mac, secrets.mac_key(), &[&ephemeral, ciphertext]) {
			return Err(Error::DecryptionFailure)
		}
		let mut plaintext = ciphertext.to_vec();
		crypto::apply_oneshot_keystream(&mut plaintext, secrets.encryption_key());
		Ok(plaintext)
	}
}

impl From<Secret> for KeyPair {
	fn from(secret: Secret) -> Self {
		// We box the secret to avoid leaving copies of it in memory when the KeyPair is
		// moved. Note that we will likely leave some copies on the stack here; I'm not
		// aware of any good way of avoiding this.
		let secret = Box::new(Zeroizing::new(curve25519_dalek::scalar::clamp_integer(secret)));
		let public = PublicKey(derive_public(&secret));
		Self { secret, public }
	}
}

/// Seal short key material to `public`, such that only the holder of the matching
/// secret key can recover it. A fresh ephemeral key pair is generated per call.
///
/// Blob layout before encoding: `ephemeral_public || mac || ciphertext`.
pub fn wrap_key(
	rng: &mut (impl Rng + CryptoRng),
	plaintext: &[u8],
	public: &PublicKey,
) -> Result<String, Error> {
	let ephemeral_secret = gen_secret(rng);
	let ephemeral = derive_public(&ephemeral_secret);
	let shared_secret = derive_shared_secret(public.as_bytes(), &ephemeral_secret);
	if crypto::shared_secret_is_identity(&shared_secret) {
		return Err(Error::InvalidKey)
	}
	let secrets = DerivedSecrets::for_key_wrap(&shared_secret);
	let mut ciphertext = plaintext.to_vec();
	crypto::apply_oneshot_keystream(&mut ciphertext, secrets.encryption_key());
	let mac = crypto::compute_mac(secrets.mac_key(), &[&ephemeral, &ciphertext]);
	let mut blob = Vec::with_capacity(SECRET_SIZE + MAC_SIZE + ciphertext.len());
	blob.extend_from_slice(&ephemeral);
	blob.extend_from_slice(&mac);
	blob.extend_from_slice(&ciphertext);
	Ok(STANDARD.encode(blob))
}
