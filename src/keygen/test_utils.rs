// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! In-memory multi-node harness for protocol tests.

use crate::keygen::error::KeygenError;
use crate::keygen::local_node::LocalNode;
use crate::keygen::messages::{KeygenMessage, Recipient};
use crate::keygen::params::KeygenParams;
use crate::keygen::save_data::LocalSaveData;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::mpsc::{channel, Receiver};

/// Keeps the Paillier/N~ prime searches fast enough for CI.
pub const TEST_PAILLIER_BITS: usize = 256;

pub struct TestNet {
    pub nodes: Vec<LocalNode<StdRng>>,
    pub outs: Vec<Receiver<KeygenMessage>>,
    pub ends: Vec<Receiver<LocalSaveData>>,
}

/// Builds `n` nodes with per-party seeded RNGs (`seeds[i]`).
pub fn make_network_seeded(
    n: usize,
    threshold: usize,
    paillier_bits: usize,
    seeds: &[u64],
) -> TestNet {
    let mut nodes = Vec::with_capacity(n);
    let mut outs = Vec::with_capacity(n);
    let mut ends = Vec::with_capacity(n);
    for i in 0..n {
        let params = KeygenParams::new(n, threshold, i, paillier_bits)
            .unwrap()
            .set_concurrency(2);
        let (out_tx, out_rx) = channel();
        let (end_tx, end_rx) = channel();
        let node =
            LocalNode::new(params, out_tx, end_tx, StdRng::seed_from_u64(seeds[i])).unwrap();
        nodes.push(node);
        outs.push(out_rx);
        ends.push(end_rx);
    }
    TestNet { nodes, outs, ends }
}

pub fn make_network(n: usize, threshold: usize, paillier_bits: usize) -> TestNet {
    let seeds: Vec<u64> = (0..n as u64).map(|i| 0x5eed + i).collect();
    make_network_seeded(n, threshold, paillier_bits, &seeds)
}

/// Starts every node and routes messages until the network is quiet.
///
/// `tamper(from, to, msg)` may rewrite a message in flight; returning
/// `false` drops it. Returns the first error each node's `update` hit.
pub fn run_protocol<F>(net: &TestNet, mut tamper: F) -> Vec<Option<KeygenError>>
where
    F: FnMut(usize, usize, &mut KeygenMessage) -> bool,
{
    let n = net.nodes.len();
    let mut errors: Vec<Option<KeygenError>> = vec![None; n];

    for node in &net.nodes {
        node.start().unwrap();
    }

    loop {
        let mut delivered = false;
        for (from, out) in net.outs.iter().enumerate() {
            while let Ok(msg) = out.try_recv() {
                let targets: Vec<usize> = match msg.recipient() {
                    Recipient::Broadcast => (0..n).filter(|j| *j != from).collect(),
                    Recipient::Unicast(to) => vec![to],
                };
                for to in targets {
                    let mut copy = msg.clone();
                    if !tamper(from, to, &mut copy) {
                        continue;
                    }
                    if errors[to].is_some() {
                        continue;
                    }
                    delivered = true;
                    if let Err(e) = net.nodes[to].update(copy) {
                        errors[to] = Some(e);
                    }
                }
            }
        }
        if !delivered {
            break;
        }
    }
    errors
}

/// Routes honestly and asserts the whole group terminates.
pub fn run_honest(net: &TestNet) -> Vec<LocalSaveData> {
    let errors = run_protocol(net, |_, _, _| true);
    for (i, e) in errors.iter().enumerate() {
        assert!(e.is_none(), "party {} failed: {:?}", i, e);
    }
    net.ends
        .iter()
        .map(|end| end.try_recv().expect("party did not finish"))
        .collect()
}
