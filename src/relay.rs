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

//! Relay node: removes one encryption layer from each inbound message and forwards
//! the remainder to the hop it names.

use crate::{
	core::{peel, Error, KeyPair, OnionMessage, Peeled, PublicKey},
	inspect::Inspect,
	traits::{Directory, RelayEntry, Transport},
	NetworkAddress, RelayId,
};
use rand::{CryptoRng, Rng};

/// One relay process. The key pair is generated at construction, is immutable for
/// the relay's lifetime, and may be read by any number of concurrent peels; a
/// relay holds no per-message state, so inbound messages need no ordering.
pub struct Relay<I = ()> {
	id: RelayId,
	address: NetworkAddress,
	keys: KeyPair,
	inspect: I,
}

impl Relay {
	pub fn new(rng: &mut (impl Rng + CryptoRng), id: RelayId, address: NetworkAddress) -> Self {
		Self::with_inspect(rng, id, address, ())
	}
}

impl<I: Inspect> Relay<I> {
	pub fn with_inspect(
		rng: &mut (impl Rng + CryptoRng),
		id: RelayId,
		address: NetworkAddress,
		inspect: I,
	) -> Self {
		Self { id, address, keys: KeyPair::generate(rng), inspect }
	}

	pub fn id(&self) -> RelayId {
		self.id
	}

	pub fn address(&self) -> NetworkAddress {
		self.address
	}

	pub fn public_key(&self) -> &PublicKey {
		self.keys.public()
	}

	pub fn inspect(&self) -> &I {
		&self.inspect
	}

	/// Publish this relay's identity, address, and public key.
	pub fn register(&self, directory: &impl Directory) {
		directory.register(RelayEntry {
			id: self.id,
			public_key: self.keys.public().to_base64(),
			address: self.address,
		});
	}

	/// Remove exactly one layer from `message`. Does not forward.
	pub fn peel(&self, message: &OnionMessage) -> Result<Peeled, Error> {
		peel(&self.keys, message)
	}

	/// Handle one inbound message: peel a layer and forward the remainder through
	/// `transport`. Every failure is terminal for this message; nothing is
	/// forwarded and nothing is retried. Returns the hop forwarded to.
	pub fn handle(
		&self,
		transport: &impl Transport,
		message: OnionMessage,
	) -> Result<NetworkAddress, Error> {
		self.inspect.message_received(message.as_bytes());
		let Peeled { next_hop, payload } = match self.peel(&message) {
			Ok(peeled) => peeled,
			Err(e) => {
				log::debug!(target: "onionet", "Relay {} rejecting message: {}", self.id, e);
				return Err(e)
			},
		};
		self.inspect.layer_peeled(&payload, next_hop);
		log::trace!(target: "onionet", "Relay {} forwarding {} bytes to {}", self.id, payload.len(), next_hop);
		transport.deliver(next_hop, &payload)?;
		Ok(next_hop)
	}
}
