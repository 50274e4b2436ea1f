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

//! Fixed-width layer framing.
//!
//! A plaintext layer is the next-hop address rendered as a fixed-width decimal
//! field, followed by the inner payload. The fixed width is what lets a relay
//! separate routing metadata from arbitrary payload bytes without any length
//! negotiation or delimiter search.

use super::error::Error;
use crate::NetworkAddress;

/// Width in bytes of the zero-padded decimal address field.
pub const ADDRESS_WIDTH: usize = 10;

/// Largest address representable in the address field.
pub const MAX_ADDRESS: NetworkAddress = 9_999_999_999;

/// Prefix `inner` with the address field for `next_hop`.
pub fn build_layer(next_hop: NetworkAddress, inner: &[u8]) -> Result<Vec<u8>, Error> {
	if next_hop > MAX_ADDRESS {
		return Err(Error::AddressOverflow)
	}
	let mut layer = format!("{:0width$}", next_hop, width = ADDRESS_WIDTH).into_bytes();
	layer.extend_from_slice(inner);
	Ok(layer)
}

/// Split a decrypted layer back into the next-hop address and the inner payload.
pub fn split_layer(layer: &[u8]) -> Result<(NetworkAddress, &[u8]), Error> {
	if layer.len() < ADDRESS_WIDTH {
		return Err(Error::MalformedLayer)
	}
	let (prefix, inner) = layer.split_at(ADDRESS_WIDTH);
	if !prefix.iter().all(u8::is_ascii_digit) {
		return Err(Error::MalformedLayer)
	}
	let prefix = std::str::from_utf8(prefix).expect("ASCII digits checked above");
	let next_hop = prefix.parse().expect("Ten decimal digits always fit a u64");
	Ok((next_hop, inner))
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn address_field_is_zero_padded() {
		let layer = build_layer(6002, b"inner").unwrap();
		assert_eq!(&layer, b"0000006002inner");
	}

	#[test]
	fn round_trip_with_binary_payload() {
		let inner = [0, 255, b':', 10, 13, 0];
		let layer = build_layer(MAX_ADDRESS, &inner).unwrap();
		assert_eq!(split_layer(&layer).unwrap(), (MAX_ADDRESS, &inner[..]));
	}

	#[test]
	fn oversized_address_rejected() {
		assert_eq!(build_layer(MAX_ADDRESS + 1, b""), Err(Error::AddressOverflow));
	}

	#[test]
	fn short_layer_rejected() {
		assert_eq!(split_layer(b"123456789"), Err(Error::MalformedLayer));
	}

	#[test]
	fn non_decimal_prefix_rejected() {
		assert_eq!(split_layer(b"00000o6002payload"), Err(Error::MalformedLayer));
		assert_eq!(split_layer(b"-000006002payload"), Err(Error::MalformedLayer));
	}

	#[test]
	fn empty_inner_payload_allowed() {
		assert_eq!(split_layer(b"0000005000").unwrap(), (5000, &b""[..]));
	}
}
