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

//! Error handling.

use crate::NetworkAddress;
use thiserror::Error as DeriveError;

/// Onion overlay error. Every cryptographic or framing failure during a peel is
/// terminal for that message at that relay: nothing is forwarded and nothing is
/// retried.
#[derive(Debug, PartialEq, Eq, DeriveError)]
pub enum Error {
	/// Key material that does not parse as a key.
	#[error("invalid key encoding")]
	InvalidKey,
	/// Key unwrap or layer decrypt failed. Deliberately silent on whether the
	/// material was corrupted or sealed for another relay.
	#[error("decryption failure")]
	DecryptionFailure,
	/// Cipher token without its IV separator.
	#[error("malformed cipher token")]
	MalformedToken,
	/// Decrypted layer too short, or with a non-decimal address field.
	#[error("malformed plaintext layer")]
	MalformedLayer,
	/// Onion message without its wrapped-key separator.
	#[error("malformed onion message")]
	MalformedMessage,
	/// Next-hop address does not fit the fixed-width address field.
	#[error("next-hop address does not fit the address field")]
	AddressOverflow,
	/// Not enough relays to build a circuit.
	#[error("not enough relays to build a circuit")]
	InsufficientRelays,
	/// The transport could not deliver to the next hop. The peeled message is
	/// dropped, not requeued.
	#[error("could not deliver to {0}")]
	ForwardingFailure(NetworkAddress),
}
