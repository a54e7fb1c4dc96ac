// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! Fixed-width per-round message slots.
//!
//! One slot per sender index and message type; the first write wins and a
//! round is gated on its slice being full. Messages for rounds ahead of
//! the current one simply rest in their slots until the gate opens.

use crate::keygen::messages::*;

/// `n` optional slots keyed by sender index.
#[derive(Debug)]
pub(crate) struct RoundSlots<M> {
    slots: Vec<Option<M>>,
}

impl<M> RoundSlots<M> {
    pub fn new(party_count: usize) -> Self {
        let mut slots = Vec::with_capacity(party_count);
        slots.resize_with(party_count, || None);
        RoundSlots { slots }
    }

    /// Stores `msg` unless the slot is already occupied. Returns whether
    /// the message was newly stored.
    pub fn store(&mut self, index: usize, msg: M) -> bool {
        match self.slots.get_mut(index) {
            Some(slot @ None) => {
                *slot = Some(msg);
                true
            }
            _ => false,
        }
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn get(&self, index: usize) -> Option<&M> {
        self.slots.get(index).and_then(Option::as_ref)
    }
}

/// All round slices for one session.
#[derive(Debug)]
pub(crate) struct MessageInbox {
    pub round0: RoundSlots<KGRound0Message>,
    pub round1: RoundSlots<KGRound1Message>,
    pub round2: RoundSlots<KGRound2Message>,
    pub round2_poly: RoundSlots<KGRound2Message1>,
    pub round2_share: RoundSlots<KGRound2Message2>,
    pub round3: RoundSlots<KGRound3Message>,
    pub round3_bind: RoundSlots<KGRound3Message1>,
    pub round4: RoundSlots<KGRound4Message>,
    pub round5: RoundSlots<KGRound5Message>,
    pub round5_open: RoundSlots<KGRound5Message1>,
    pub round6: RoundSlots<KGRound6Message>,
    pub round6_digest: RoundSlots<KGRound6Message1>,
    pub round7: RoundSlots<KGRound7Message>,
}

impl MessageInbox {
    pub fn new(party_count: usize) -> Self {
        MessageInbox {
            round0: RoundSlots::new(party_count),
            round1: RoundSlots::new(party_count),
            round2: RoundSlots::new(party_count),
            round2_poly: RoundSlots::new(party_count),
            round2_share: RoundSlots::new(party_count),
            round3: RoundSlots::new(party_count),
            round3_bind: RoundSlots::new(party_count),
            round4: RoundSlots::new(party_count),
            round5: RoundSlots::new(party_count),
            round5_open: RoundSlots::new(party_count),
            round6: RoundSlots::new(party_count),
            round6_digest: RoundSlots::new(party_count),
            round7: RoundSlots::new(party_count),
        }
    }

    /// Files the message under its sender's slot. Returns whether it was
    /// newly stored (duplicates are dropped silently).
    pub fn store(&mut self, msg: KeygenMessage) -> bool {
        let from = msg.from_index();
        match msg {
            KeygenMessage::Round0(m) => self.round0.store(from, m),
            KeygenMessage::Round1(m) => self.round1.store(from, m),
            KeygenMessage::Round2(m) => self.round2.store(from, m),
            KeygenMessage::Round2Poly(m) => self.round2_poly.store(from, m),
            KeygenMessage::Round2Share(m) => self.round2_share.store(from, m),
            KeygenMessage::Round3(m) => self.round3.store(from, m),
            KeygenMessage::Round3Bind(m) => self.round3_bind.store(from, m),
            KeygenMessage::Round4(m) => self.round4.store(from, m),
            KeygenMessage::Round5(m) => self.round5.store(from, m),
            KeygenMessage::Round5Open(m) => self.round5_open.store(from, m),
            KeygenMessage::Round6(m) => self.round6.store(from, m),
            KeygenMessage::Round6Digest(m) => self.round6_digest.store(from, m),
            KeygenMessage::Round7(m) => self.round7.store(from, m),
        }
    }
}
