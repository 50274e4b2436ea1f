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

//! In-process relay directory.

use crate::traits::{Directory, RelayEntry};
use parking_lot::RwLock;

/// Directory keeping registered relays in memory. Registration is first-wins per
/// relay id; a relay that re-registers with new keys is ignored.
#[derive(Default)]
pub struct Registry {
	relays: RwLock<Vec<RelayEntry>>,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Directory for Registry {
	fn register(&self, entry: RelayEntry) {
		let mut relays = self.relays.write();
		if relays.iter().any(|existing| existing.id == entry.id) {
			log::debug!(target: "onionet", "Ignoring duplicate registration of relay {}", entry.id);
			return
		}
		log::trace!(target: "onionet", "Registered relay {} at {}", entry.id, entry.address);
		relays.push(entry);
	}

	fn relays(&self) -> Vec<RelayEntry> {
		self.relays.read().clone()
	}
}
