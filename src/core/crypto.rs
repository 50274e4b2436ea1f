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

//! Key exchange, secret derivation, MAC computation, and keystream encryption.

use arrayref::array_refs;
use blake2::{
	digest::{
		consts::{U16, U64},
		FixedOutput, Mac as DigestMac,
	},
	Blake2bMac,
};
use c2_chacha::{
	stream_cipher::{NewStreamCipher, SyncStreamCipher},
	ChaCha20,
};
use curve25519_dalek::{
	edwards::EdwardsPoint, montgomery::MontgomeryPoint, scalar::clamp_integer,
	traits::IsIdentity,
};
use rand::{CryptoRng, Rng};
use subtle::ConstantTimeEq;

const KEY_WRAP_PERSONAL: &[u8; 16] = b"onion-wrap-keys-";
const TOKEN_PERSONAL: &[u8; 16] = b"onion-token-keys";

/// Size in bytes of an X25519 secret, public key, or shared secret.
pub const SECRET_SIZE: usize = 32;
/// Clamped X25519 secret key.
pub type Secret = [u8; SECRET_SIZE];
/// X25519 public key, Montgomery form.
pub type Public = [u8; SECRET_SIZE];
/// Produced by key exchange between a secret and a public key.
pub type SharedSecret = [u8; SECRET_SIZE];

const ENCRYPTION_KEY_SIZE: usize = 32;
pub type EncryptionKey = [u8; ENCRYPTION_KEY_SIZE];
const MAC_KEY_SIZE: usize = 16;
pub type MacKey = [u8; MAC_KEY_SIZE];
/// Size in bytes of a [`Mac`].
pub const MAC_SIZE: usize = 16;
pub type Mac = [u8; MAC_SIZE];
/// Size in bytes of a cipher token initialization vector.
pub const IV_SIZE: usize = 8;
pub type Iv = [u8; IV_SIZE];

////////////////////////////////////////////////////////////////////////////////
// Key exchange
////////////////////////////////////////////////////////////////////////////////

/// Generate a clamped key-exchange secret key.
pub fn gen_secret(rng: &mut (impl Rng + CryptoRng)) -> Secret {
	let mut secret = [0; SECRET_SIZE];
	rng.fill_bytes(&mut secret);
	clamp_integer(secret)
}

/// Derive the public key corresponding to a secret key.
pub fn derive_public(secret: &Secret) -> Public {
	EdwardsPoint::mul_base_clamped(*secret).to_montgomery().to_bytes()
}

pub fn derive_shared_secret(public: &Public, secret: &Secret) -> SharedSecret {
	MontgomeryPoint(*public).mul_clamped(*secret).to_bytes()
}

pub fn shared_secret_is_identity(shared_secret: &SharedSecret) -> bool {
	MontgomeryPoint(*shared_secret).is_identity()
}

////////////////////////////////////////////////////////////////////////////////
// Secret derivation
////////////////////////////////////////////////////////////////////////////////

fn derive_secret(derived: &mut [u8], secret: &[u8], personal: &[u8; 16]) {
	for (i, chunk) in derived.chunks_mut(64).enumerate() {
		// This is the construction libsodium uses for crypto_kdf_derive_from_key; see
		// https://doc.libsodium.org/key_derivation/
		let h = Blake2bMac::<U64>::new_with_salt_and_personal(secret, &i.to_le_bytes(), personal)
			.expect("Key, salt, and personalisation sizes are fixed and small enough");
		let full = h.finalize_fixed();
		chunk.copy_from_slice(&full[..chunk.len()]);
	}
}

const DERIVED_SECRETS_SIZE: usize = ENCRYPTION_KEY_SIZE + MAC_KEY_SIZE;

/// Encryption and MAC keys derived from a single input secret.
pub struct DerivedSecrets([u8; DERIVED_SECRETS_SIZE]);

impl DerivedSecrets {
	/// Secrets protecting a wrapped symmetric key.
	pub fn for_key_wrap(shared_secret: &SharedSecret) -> Self {
		let mut derived = [0; DERIVED_SECRETS_SIZE];
		derive_secret(&mut derived, shared_secret, KEY_WRAP_PERSONAL);
		Self(derived)
	}

	/// Secrets protecting one cipher token.
	pub fn for_token(key: &[u8; SECRET_SIZE]) -> Self {
		let mut derived = [0; DERIVED_SECRETS_SIZE];
		derive_secret(&mut derived, key, TOKEN_PERSONAL);
		Self(derived)
	}

	fn split(&self) -> (&EncryptionKey, &MacKey) {
		array_refs![&self.0, ENCRYPTION_KEY_SIZE, MAC_KEY_SIZE]
	}

	pub fn encryption_key(&self) -> &EncryptionKey {
		self.split().0
	}

	pub fn mac_key(&self) -> &MacKey {
		self.split().1
	}
}

////////////////////////////////////////////////////////////////////////////////
// MAC computation
////////////////////////////////////////////////////////////////////////////////

pub fn compute_mac(key: &MacKey, parts: &[&[u8]]) -> Mac {
	let mut h = Blake2bMac::<U16>::new_from_slice(key).expect("Key size is fixed and small enough");
	for part in parts {
		h.update(part);
	}
	h.finalize().into_bytes().into()
}

/// Constant-time MAC check.
pub fn mac_ok(mac: &Mac, key: &MacKey, parts: &[&[u8]]) -> bool {
	compute_mac(key, parts).ct_eq(mac).unwrap_u8() == 1
}

////////////////////////////////////////////////////////////////////////////////
// Keystream encryption
////////////////////////////////////////////////////////////////////////////////

pub fn apply_keystream(data: &mut [u8], key: &EncryptionKey, iv: &Iv) {
	let mut c = ChaCha20::new(key.into(), iv.into());
	c.apply_keystream(data);
}

pub fn apply_oneshot_keystream(data: &mut [u8], key: &EncryptionKey) {
	// Key is only used once, so fine for nonce to be 0
	apply_keystream(data, key, &[0; IV_SIZE]);
}
