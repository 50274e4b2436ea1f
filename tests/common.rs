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

//! Tests utility: an in-process overlay wiring relays, a registry and recipient
//! mailboxes together over a synchronous local transport.

use onionet::{
	core::{Error, OnionMessage},
	LastSeen, NetworkAddress, Registry, Relay, RelayId, Transport,
};
use parking_lot::RwLock;
use rand::{CryptoRng, Rng};
use std::{collections::HashMap, sync::Arc};

/// Relay `id` listens at `RELAY_PORT_BASE + id`.
pub const RELAY_PORT_BASE: NetworkAddress = 6000;

pub type TestRelay = Arc<Relay<Arc<LastSeen>>>;

/// In-process overlay. A delivery lands either in a relay, which peels and
/// forwards back through the overlay, or in a recipient mailbox.
#[derive(Default)]
pub struct LocalOverlay {
	pub registry: Arc<Registry>,
	relays: RwLock<HashMap<NetworkAddress, TestRelay>>,
	mailboxes: RwLock<HashMap<NetworkAddress, Vec<Vec<u8>>>>,
	deliveries: RwLock<usize>,
}

impl LocalOverlay {
	pub fn new() -> Arc<Self> {
		let _ = env_logger::try_init();
		Arc::new(Self::default())
	}

	/// Spawn relays with ids `1..=count`, registered with the registry.
	pub fn spawn_relays(&self, rng: &mut (impl Rng + CryptoRng), count: RelayId) -> Vec<TestRelay> {
		(1..=count).map(|id| self.spawn_relay(rng, id)).collect()
	}

	pub fn spawn_relay(&self, rng: &mut (impl Rng + CryptoRng), id: RelayId) -> TestRelay {
		let relay = Arc::new(Relay::with_inspect(
			rng,
			id,
			RELAY_PORT_BASE + id,
			Arc::new(LastSeen::new()),
		));
		relay.register(&self.registry);
		self.relays.write().insert(relay.address(), relay.clone());
		relay
	}

	pub fn add_mailbox(&self, address: NetworkAddress) {
		self.mailboxes.write().insert(address, Vec::new());
	}

	/// Everything delivered to `address` so far.
	pub fn mailbox(&self, address: NetworkAddress) -> Vec<Vec<u8>> {
		self.mailboxes.read().get(&address).cloned().unwrap_or_default()
	}

	/// Total number of transport deliveries, including hop-to-hop forwards.
	pub fn delivery_count(&self) -> usize {
		*self.deliveries.read()
	}
}

impl Transport for LocalOverlay {
	fn deliver(&self, to: NetworkAddress, message: &[u8]) -> Result<(), Error> {
		*self.deliveries.write() += 1;
		let relay = self.relays.read().get(&to).cloned();
		if let Some(relay) = relay {
			relay.handle(self, OnionMessage::from_vec(message.to_vec()))?;
			return Ok(())
		}
		let mut mailboxes = self.mailboxes.write();
		match mailboxes.get_mut(&to) {
			Some(mailbox) => {
				mailbox.push(message.to_vec());
				Ok(())
			},
			None => Err(Error::ForwardingFailure(to)),
		}
	}
}
