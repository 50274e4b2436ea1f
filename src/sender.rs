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

//! Sender endpoint: builds a fresh circuit per message and dispatches the layered
//! blob to its entry hop.

use crate::{
	core::{build_message, Circuit, Config, Error},
	inspect::Inspect,
	traits::{Directory, Transport},
	NetworkAddress,
};
use rand::{CryptoRng, Rng};

/// Message origin. Owns handles to the directory and transport collaborators;
/// holds no circuit or key state between messages.
pub struct Sender<D, T, I = ()> {
	directory: D,
	transport: T,
	config: Config,
	inspect: I,
}

impl<D: Directory, T: Transport> Sender<D, T> {
	pub fn new(directory: D, transport: T, config: Config) -> Self {
		Self::with_inspect(directory, transport, config, ())
	}
}

impl<D: Directory, T: Transport, I: Inspect> Sender<D, T, I> {
	pub fn with_inspect(directory: D, transport: T, config: Config, inspect: I) -> Self {
		Self { directory, transport, config, inspect }
	}

	/// Send `plaintext` to `destination` over a freshly selected circuit, returning
	/// the circuit used. Nothing reaches the transport unless the whole onion
	/// message was built; construction errors abort before any delivery.
	pub fn send(
		&self,
		rng: &mut (impl Rng + CryptoRng),
		plaintext: &[u8],
		destination: NetworkAddress,
	) -> Result<Circuit, Error> {
		let entries = self.directory.relays();
		let circuit = Circuit::select(rng, &entries, self.config.num_hops)?;
		let message = build_message(rng, plaintext, destination, &circuit)?;
		log::trace!(
			target: "onionet",
			"Sending {} bytes to {} over circuit {:?}",
			plaintext.len(),
			destination,
			circuit.ids()
		);
		self.inspect.message_sent(plaintext, &circuit.ids());
		self.transport.deliver(circuit.entry_address(), message.as_bytes())?;
		Ok(circuit)
	}
}
