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

// Onion routing core logic. This module is network agnostic: it builds and peels
// layered messages, and knows nothing about how blobs move between processes.

mod cipher;
mod config;
mod crypto;
mod error;
mod key_pair;
mod layer;
mod onion;

pub use cipher::{SymmetricKey, KEY_SIZE};
pub use config::Config;
pub use error::Error;
pub use key_pair::{wrap_key, KeyPair, PublicKey};
pub use layer::{build_layer, split_layer, ADDRESS_WIDTH, MAX_ADDRESS};
pub use onion::{build_message, peel, Circuit, Hop, OnionMessage, Peeled, MIN_HOPS};
