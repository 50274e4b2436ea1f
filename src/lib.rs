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

//! A minimal onion routing overlay.
//!
//! A sender wraps a message in one encryption layer per relay on a chosen
//! circuit; each relay removes exactly one layer and forwards the remainder, so
//! no single relay learns both the plaintext and anything beyond its immediate
//! neighbours. The relay directory and the hop-to-hop transport are collaborator
//! traits; the protocol core is network agnostic.

pub mod core;
pub mod traits;

mod inspect;
mod registry;
mod relay;
mod sender;

pub use crate::core::{
	build_message, peel, Circuit, Config, Error, Hop, KeyPair, OnionMessage, Peeled, PublicKey,
	SymmetricKey, ADDRESS_WIDTH, MIN_HOPS,
};
pub use inspect::{Inspect, LastSeen};
pub use registry::Registry;
pub use relay::Relay;
pub use sender::Sender;
pub use traits::{Directory, RelayEntry, Transport};

/// Relay identity as published in the directory.
pub type RelayId = u64;

/// Network locator of a node; rendered as a fixed-width decimal field on the
/// wire.
pub type NetworkAddress = u64;
