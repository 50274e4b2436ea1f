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

//! End-to-end onion overlay tests.

mod common;

use common::{LocalOverlay, RELAY_PORT_BASE};
use onionet::{
	build_message, peel, Circuit, Config, Directory, Error, Hop, KeyPair, LastSeen, OnionMessage,
	RelayEntry, Sender, Transport,
};
use rand::{rngs::OsRng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use std::{collections::HashSet, sync::Arc, thread};

fn three_hop_circuit() -> (Vec<KeyPair>, Circuit) {
	let keys: Vec<_> = (0..3).map(|_| KeyPair::generate(&mut OsRng)).collect();
	let hops = keys
		.iter()
		.enumerate()
		.map(|(i, keys)| Hop {
			id: i as u64 + 1,
			address: 6001 + i as u64,
			public_key: *keys.public(),
		})
		.collect();
	(keys, Circuit::new(hops).unwrap())
}

/// An intermediate blob still parses as `wrapped_key ":" token`: text, with a
/// base64 wrapped key up to the first colon and a token with its own separator
/// after it.
fn parses_as_layered(blob: &[u8]) -> bool {
	use base64::{engine::general_purpose::STANDARD, Engine};
	let Ok(text) = std::str::from_utf8(blob) else { return false };
	let Some((wrapped, token)) = text.split_once(':') else { return false };
	STANDARD.decode(wrapped).is_ok() && token.contains(':')
}

#[test]
fn hello_through_three_relays() {
	let (keys, circuit) = three_hop_circuit();
	let message = build_message(&mut OsRng, b"hello", 5000, &circuit).unwrap();
	assert!(parses_as_layered(message.as_bytes()));

	let first = peel(&keys[0], &message).unwrap();
	assert_eq!(first.next_hop, 6002);
	assert!(parses_as_layered(&first.payload));

	let second = peel(&keys[1], &OnionMessage::from_vec(first.payload)).unwrap();
	assert_eq!(second.next_hop, 6003);
	assert!(parses_as_layered(&second.payload));

	let third = peel(&keys[2], &OnionMessage::from_vec(second.payload)).unwrap();
	assert_eq!(third.next_hop, 5000);
	assert_eq!(third.payload, b"hello");
	assert!(!parses_as_layered(&third.payload));
}

#[test]
fn large_binary_payload_round_trips() {
	let mut rng = Xoshiro256StarStar::seed_from_u64(42);
	let mut plaintext = vec![0u8; 4096];
	rng.fill_bytes(&mut plaintext);

	let (keys, circuit) = three_hop_circuit();
	let mut message = build_message(&mut OsRng, &plaintext, 5000, &circuit).unwrap();
	for keys in &keys {
		message = OnionMessage::from_vec(peel(keys, &message).unwrap().payload);
	}
	assert_eq!(message.as_bytes(), plaintext);
}

#[test]
fn sender_delivers_end_to_end() {
	let overlay = LocalOverlay::new();
	let mut rng = OsRng;
	let relays = overlay.spawn_relays(&mut rng, 5);
	overlay.add_mailbox(5000);

	let seen = Arc::new(LastSeen::new());
	let sender = Sender::with_inspect(
		overlay.registry.clone(),
		overlay.clone(),
		Config::default(),
		seen.clone(),
	);
	let circuit = sender.send(&mut rng, b"hello", 5000).unwrap();

	assert_eq!(overlay.mailbox(5000), vec![b"hello".to_vec()]);
	assert_eq!(seen.sent().unwrap(), b"hello");
	assert_eq!(seen.circuit(), circuit.ids());

	// Three distinct relays, selected from the registered five.
	let ids: HashSet<_> = circuit.ids().into_iter().collect();
	assert_eq!(ids.len(), 3);
	assert!(ids.iter().all(|id| (1..=5).contains(id)));

	// Every relay on the circuit saw the message; each peel revealed the address
	// of the hop after it, the final destination at the exit.
	for (i, hop) in circuit.hops().iter().enumerate() {
		let inspect = relays[hop.id as usize - 1].inspect();
		assert!(inspect.received().is_some());
		let expected = match circuit.hops().get(i + 1) {
			Some(next) => next.address,
			None => 5000,
		};
		assert_eq!(inspect.destination(), Some(expected));
	}
	// Off-circuit relays saw nothing.
	for relay in &relays {
		if !circuit.ids().contains(&relay.id()) {
			assert!(relay.inspect().received().is_none());
		}
	}
}

#[test]
fn insufficient_relays_makes_no_network_call() {
	let overlay = LocalOverlay::new();
	let mut rng = OsRng;
	overlay.spawn_relays(&mut rng, 2);

	let sender = Sender::new(overlay.registry.clone(), overlay.clone(), Config::default());
	assert_eq!(sender.send(&mut rng, b"hello", 5000).unwrap_err(), Error::InsufficientRelays);
	assert_eq!(overlay.delivery_count(), 0);
}

#[test]
fn oversized_destination_makes_no_network_call() {
	let overlay = LocalOverlay::new();
	let mut rng = OsRng;
	overlay.spawn_relays(&mut rng, 3);

	let sender = Sender::new(overlay.registry.clone(), overlay.clone(), Config::default());
	assert_eq!(
		sender.send(&mut rng, b"hello", 10_000_000_000).unwrap_err(),
		Error::AddressOverflow
	);
	assert_eq!(overlay.delivery_count(), 0);
}

#[test]
fn unreachable_next_hop_surfaces_as_forwarding_failure() {
	let overlay = LocalOverlay::new();
	let mut rng = OsRng;
	overlay.spawn_relays(&mut rng, 3);

	let sender = Sender::new(overlay.registry.clone(), overlay.clone(), Config::default());
	// No mailbox at 4242: the exit relay's forward fails and the failure travels
	// back up the synchronous delivery chain.
	assert_eq!(sender.send(&mut rng, b"hello", 4242).unwrap_err(), Error::ForwardingFailure(4242));
}

#[test]
fn tampering_any_byte_is_rejected() {
	let (keys, circuit) = three_hop_circuit();
	let message = build_message(&mut OsRng, b"hello", 5000, &circuit).unwrap();
	let bytes = message.as_bytes();

	for i in 0..bytes.len() {
		let mut tampered = bytes.to_vec();
		tampered[i] ^= 0x01;
		let result = peel(&keys[0], &OnionMessage::from_vec(tampered));
		if bytes[i] == b':' {
			// Breaking a separator is a framing failure at the latest.
			assert!(result.is_err(), "separator flip at {} not rejected", i);
		} else {
			assert_eq!(result, Err(Error::DecryptionFailure), "flip at {} not rejected", i);
		}
	}
}

#[test]
fn wrapped_key_is_bound_to_one_relay() {
	let (keys, circuit) = three_hop_circuit();
	let stranger = KeyPair::generate(&mut OsRng);
	let message = build_message(&mut OsRng, b"hello", 5000, &circuit).unwrap();

	assert_eq!(peel(&stranger, &message).unwrap_err(), Error::DecryptionFailure);
	assert_eq!(peel(&keys[1], &message).unwrap_err(), Error::DecryptionFailure);
	assert!(peel(&keys[0], &message).is_ok());
}

#[test]
fn registry_keeps_first_registration_per_id() {
	let overlay = LocalOverlay::new();
	let first = RelayEntry { id: 9, public_key: "a".into(), address: 6009 };
	let second = RelayEntry { id: 9, public_key: "b".into(), address: 6010 };
	overlay.registry.register(first.clone());
	overlay.registry.register(second);
	assert_eq!(overlay.registry.relays(), vec![first]);
}

#[test]
fn concurrent_peels_do_not_interfere() {
	let overlay = LocalOverlay::new();
	let mut rng = OsRng;
	let relays = overlay.spawn_relays(&mut rng, 3);
	overlay.add_mailbox(5000);

	// All messages enter at relay 1 and traverse the same three relays.
	let hops: Vec<_> = relays
		.iter()
		.map(|relay| Hop {
			id: relay.id(),
			address: relay.address(),
			public_key: *relay.public_key(),
		})
		.collect();
	let circuit = Circuit::new(hops).unwrap();

	let payloads: Vec<Vec<u8>> =
		(0..8).map(|i| format!("payload {}", i).into_bytes()).collect();
	let messages: Vec<_> = payloads
		.iter()
		.map(|payload| build_message(&mut rng, payload, 5000, &circuit).unwrap())
		.collect();

	thread::scope(|s| {
		for message in &messages {
			let overlay = overlay.clone();
			s.spawn(move || {
				overlay.deliver(RELAY_PORT_BASE + 1, message.as_bytes()).unwrap();
			});
		}
	});

	let delivered: HashSet<_> = overlay.mailbox(5000).into_iter().collect();
	let expected: HashSet<_> = payloads.into_iter().collect();
	assert_eq!(delivered, expected);
}
