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

//! Onion message construction and per-hop peeling.
//!
//! One layer on the wire is `wrapped_key ":" token`: the layer's symmetric key
//! sealed to one relay, then the cipher token it decrypts. Peeling splits on the
//! first `":"` only; the token keeps its own internal separator.

use super::{
	cipher::SymmetricKey,
	error::Error,
	key_pair::{wrap_key, KeyPair, PublicKey},
	layer::{build_layer, split_layer},
};
use crate::{traits::RelayEntry, NetworkAddress, RelayId};
use rand::{seq::SliceRandom, CryptoRng, Rng};

/// Minimum number of relays on a circuit.
pub const MIN_HOPS: usize = 3;

/// Separator between the wrapped key and the cipher token of one layer.
const WRAP_SEPARATOR: u8 = b':';

/// One relay on a circuit.
#[derive(Clone, Debug)]
pub struct Hop {
	pub id: RelayId,
	pub address: NetworkAddress,
	pub public_key: PublicKey,
}

/// Ordered relay path for a single message, entry hop first. Built fresh per
/// message and discarded once the message is dispatched; never reused implicitly.
#[derive(Clone, Debug)]
pub struct Circuit(Vec<Hop>);

impl Circuit {
	/// Wrap an explicit relay path.
	pub fn new(hops: Vec<Hop>) -> Result<Self, Error> {
		if hops.len() < MIN_HOPS {
			return Err(Error::InsufficientRelays)
		}
		Ok(Self(hops))
	}

	/// Choose `num_hops` relays from `entries`, uniformly at random without
	/// replacement and in random order. No weighting, no exclusion of previously
	/// used relays.
	pub fn select(
		rng: &mut (impl Rng + CryptoRng),
		entries: &[RelayEntry],
		num_hops: usize,
	) -> Result<Self, Error> {
		if entries.len() < num_hops {
			return Err(Error::InsufficientRelays)
		}
		let mut chosen: Vec<&RelayEntry> = entries.choose_multiple(rng, num_hops).collect();
		chosen.shuffle(rng);
		let hops = chosen
			.into_iter()
			.map(|entry| {
				Ok(Hop {
					id: entry.id,
					address: entry.address,
					public_key: PublicKey::from_base64(&entry.public_key)?,
				})
			})
			.collect::<Result<Vec<_>, Error>>()?;
		Self::new(hops)
	}

	pub fn hops(&self) -> &[Hop] {
		&self.0
	}

	/// Relay identities along the path, entry hop first.
	pub fn ids(&self) -> Vec<RelayId> {
		self.0.iter().map(|hop| hop.id).collect()
	}

	/// Address the finished onion message is handed to.
	pub fn entry_address(&self) -> NetworkAddress {
		self.0[0].address
	}
}

/// The layered ciphertext exactly as transmitted between hops. After `k` peels of
/// an `N`-hop message, `N - k` layers remain; after the last peel the bytes are the
/// original plaintext.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct OnionMessage(Vec<u8>);

impl OnionMessage {
	pub fn from_vec(data: Vec<u8>) -> Self {
		Self(data)
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}
}

/// Build the onion message carrying `plaintext` through `circuit` to
/// `destination`.
///
/// Layers are applied innermost first: the last hop's layer frames the destination
/// address around the plaintext, every earlier layer frames the address of the hop
/// after it around the blob built so far. Each layer gets a fresh symmetric key,
/// sealed to that hop alone; the keys are dropped here and survive nowhere.
pub fn build_message(
	rng: &mut (impl Rng + CryptoRng),
	plaintext: &[u8],
	destination: NetworkAddress,
	circuit: &Circuit,
) -> Result<OnionMessage, Error> {
	let hops = circuit.hops();
	let mut payload = plaintext.to_vec();
	for (i, hop) in hops.iter().enumerate().rev() {
		let next_hop = match hops.get(i + 1) {
			Some(next) => next.address,
			None => destination,
		};
		let layer = build_layer(next_hop, &payload)?;
		let key = SymmetricKey::generate(rng);
		let token = key.encrypt(rng, &layer);
		let wrapped = wrap_key(rng, key.to_base64().as_bytes(), &hop.public_key)?;
		payload = format!("{}:{}", wrapped, token).into_bytes();
	}
	Ok(OnionMessage(payload))
}

/// Result of removing one layer from an onion message.
#[derive(Debug, PartialEq, Eq)]
pub struct Peeled {
	/// Where the remaining payload should be delivered.
	pub next_hop: NetworkAddress,
	/// One less layer of wrapping; the original plaintext after the final peel.
	pub payload: Vec<u8>,
}

/// Remove exactly one layer of encryption with the receiving relay's key pair.
///
/// Any failure is terminal for the message: a relay that cannot peel cannot
/// recover anything else from the blob, so there is no retry and no partial
/// forward.
pub fn peel(keys: &KeyPair, message: &OnionMessage) -> Result<Peeled, Error> {
	let bytes = message.as_bytes();
	let separator =
		bytes.iter().position(|b| *b == WRAP_SEPARATOR).ok_or(Error::MalformedMessage)?;
	let wrapped =
		std::str::from_utf8(&bytes[..separator]).map_err(|_| Error::DecryptionFailure)?;
	let token =
		std::str::from_utf8(&bytes[separator + 1..]).map_err(|_| Error::MalformedToken)?;
	let key_bytes = keys.unwrap_key(wrapped)?;
	let key_text = std::str::from_utf8(&key_bytes).map_err(|_| Error::InvalidKey)?;
	let key = SymmetricKey::from_base64(key_text)?;
	let layer = key.decrypt(token)?;
	let (next_hop, inner) = split_layer(&layer)?;
	Ok(Peeled { next_hop, payload: inner.to_vec() })
}

#[cfg(test)]
mod test {
	use super::*;
	use rand::rngs::OsRng;

	fn new_circuit(num_hops: usize) -> (Vec<KeyPair>, Circuit) {
		let keys: Vec<_> = (0..num_hops).map(|_| KeyPair::generate(&mut OsRng)).collect();
		let hops = keys
			.iter()
			.enumerate()
			.map(|(i, keys)| Hop {
				id: i as u64 + 1,
				address: 6001 + i as u64,
				public_key: *keys.public(),
			})
			.collect();
		(keys, Circuit::new(hops).unwrap())
	}

	#[test]
	fn build_and_peel_all_hops() {
		let plaintext = b"the payload under every layer";
		for num_hops in MIN_HOPS..=5 {
			let (keys, circuit) = new_circuit(num_hops);
			let mut message = build_message(&mut OsRng, plaintext, 5000, &circuit).unwrap();
			for (i, keys) in keys.iter().enumerate() {
				let peeled = peel(keys, &message).unwrap();
				if let Some(next) = circuit.hops().get(i + 1) {
					assert_eq!(peeled.next_hop, next.address);
				} else {
					assert_eq!(peeled.next_hop, 5000);
					assert_eq!(peeled.payload, plaintext);
				}
				message = OnionMessage::from_vec(peeled.payload);
			}
		}
	}

	#[test]
	fn short_path_rejected() {
		let (_, circuit) = new_circuit(MIN_HOPS);
		let mut hops = circuit.hops().to_vec();
		hops.pop();
		assert!(matches!(Circuit::new(hops), Err(Error::InsufficientRelays)));
	}

	#[test]
	fn peel_out_of_order_fails() {
		let (keys, circuit) = new_circuit(MIN_HOPS);
		let message = build_message(&mut OsRng, b"hello", 5000, &circuit).unwrap();
		assert_eq!(peel(&keys[1], &message).unwrap_err(), Error::DecryptionFailure);
		assert_eq!(peel(&keys[2], &message).unwrap_err(), Error::DecryptionFailure);
	}

	#[test]
	fn message_without_separator_rejected() {
		let keys = KeyPair::generate(&mut OsRng);
		let message = OnionMessage::from_vec(b"no separator here".to_vec());
		assert_eq!(peel(&keys, &message).unwrap_err(), Error::MalformedMessage);
	}

	#[test]
	fn oversized_destination_aborts_build() {
		let (_, circuit) = new_circuit(MIN_HOPS);
		let result = build_message(&mut OsRng, b"hello", 10_000_000_000, &circuit);
		assert!(matches!(result, Err(Error::AddressOverflow)));
	}
}
