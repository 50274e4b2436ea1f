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

//! Per-node observation hooks.
//!
//! Message bookkeeping is not part of the protocol and nothing in the protocol
//! reads it back; nodes accept an observer and call it at the interesting points.
//! `()` is the no-op observer.

use crate::{NetworkAddress, RelayId};
use parking_lot::RwLock;
use std::sync::Arc;

/// Observer over one node's activity. All hooks default to no-ops.
pub trait Inspect {
	/// An encrypted message arrived at a relay, before any peeling.
	fn message_received(&self, _message: &[u8]) {}

	/// A relay removed one layer, revealing the remaining payload and the hop it
	/// goes to.
	fn layer_peeled(&self, _payload: &[u8], _next_hop: NetworkAddress) {}

	/// A sender dispatched `plaintext` over `circuit`.
	fn message_sent(&self, _plaintext: &[u8], _circuit: &[RelayId]) {}
}

impl Inspect for () {}

impl<T: Inspect + ?Sized> Inspect for Arc<T> {
	fn message_received(&self, message: &[u8]) {
		(**self).message_received(message)
	}

	fn layer_peeled(&self, payload: &[u8], next_hop: NetworkAddress) {
		(**self).layer_peeled(payload, next_hop)
	}

	fn message_sent(&self, plaintext: &[u8], circuit: &[RelayId]) {
		(**self).message_sent(plaintext, circuit)
	}
}

#[derive(Default)]
struct Seen {
	received: Option<Vec<u8>>,
	peeled: Option<Vec<u8>>,
	destination: Option<NetworkAddress>,
	sent: Option<Vec<u8>>,
	circuit: Vec<RelayId>,
}

/// Observer recording the most recent activity on a node.
#[derive(Default)]
pub struct LastSeen(RwLock<Seen>);

impl LastSeen {
	pub fn new() -> Self {
		Self::default()
	}

	/// Last encrypted message received, as it arrived.
	pub fn received(&self) -> Option<Vec<u8>> {
		self.0.read().received.clone()
	}

	/// Payload revealed by the last successful peel.
	pub fn peeled(&self) -> Option<Vec<u8>> {
		self.0.read().peeled.clone()
	}

	/// Next hop revealed by the last successful peel.
	pub fn destination(&self) -> Option<NetworkAddress> {
		self.0.read().destination
	}

	/// Last plaintext dispatched.
	pub fn sent(&self) -> Option<Vec<u8>> {
		self.0.read().sent.clone()
	}

	/// Circuit of the last dispatch, entry hop first.
	pub fn circuit(&self) -> Vec<RelayId> {
		self.0.read().circuit.clone()
	}
}

impl Inspect for LastSeen {
	fn message_received(&self, message: &[u8]) {
		self.0.write().received = Some(message.to_vec());
	}

	fn layer_peeled(&self, payload: &[u8], next_hop: NetworkAddress) {
		let mut seen = self.0.write();
		seen.peeled = Some(payload.to_vec());
		seen.destination = Some(next_hop);
	}

	fn message_sent(&self, plaintext: &[u8], circuit: &[RelayId]) {
		let mut seen = self.0.write();
		seen.sent = Some(plaintext.to_vec());
		seen.circuit = circuit.to_vec();
	}
}
