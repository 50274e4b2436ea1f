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

//! Collaborator interfaces consumed by the overlay core.
//!
//! The directory and the hop-to-hop transport live outside the protocol. The core
//! only ever asks the directory who exists and hands the transport a blob with an
//! address; it never inspects how either is implemented.

use crate::{core::Error, NetworkAddress, RelayId};
use std::sync::Arc;

/// One relay as published in the directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayEntry {
	pub id: RelayId,
	/// Textual encoding of the relay's public key (see [`crate::PublicKey`]).
	pub public_key: String,
	/// Where the transport can reach the relay.
	pub address: NetworkAddress,
}

/// Directory of live relays. External in a real deployment; [`crate::Registry`]
/// provides an in-process implementation.
pub trait Directory {
	/// Publish a relay so senders can route through it.
	fn register(&self, entry: RelayEntry);

	/// Snapshot of every relay currently known.
	fn relays(&self) -> Vec<RelayEntry>;
}

/// Hop-to-hop message delivery.
pub trait Transport {
	/// Deliver `message` to `to`, blocking until the hop has accepted it or
	/// delivery has failed. Failures surface as [`Error::ForwardingFailure`]; the
	/// core never retries.
	fn deliver(&self, to: NetworkAddress, message: &[u8]) -> Result<(), Error>;
}

impl<T: Directory + ?Sized> Directory for Arc<T> {
	fn register(&self, entry: RelayEntry) {
		(**self).register(entry)
	}

	fn relays(&self) -> Vec<RelayEntry> {
		(**self).relays()
	}
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
	fn deliver(&self, to: NetworkAddress, message: &[u8]) -> Result<(), Error> {
		(**self).deliver(to, message)
	}
}
