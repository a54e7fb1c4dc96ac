// Copyright © 2019 Binance
//
// This file is part of Binance. The full Binance copyright notice, including
// terms governing use, modification, and redistribution, is contained in the
// file LICENSE at the root of the source code distribution tree.

//! The per-party keygen driver.
//!
//! `LocalNode` owns the session state behind one mutex: the transport may
//! call [`LocalNode::update`] from any thread, but round execution is
//! strictly serialized and never blocks on I/O. Outbound messages leave
//! through an unbounded channel; the sealed save data is emitted on the
//! completion channel when round 7 finishes.

use crate::keygen::error::{Abort, KeygenError};
use crate::keygen::inbox::MessageInbox;
use crate::keygen::messages::{KeygenMessage, Recipient};
use crate::keygen::params::KeygenParams;
use crate::keygen::rounds::{self, RoundCtx};
use crate::keygen::save_data::{LocalSaveData, NtildeH1H2, TempState};
use num_bigint_dig::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use std::sync::mpsc::Sender;
use std::sync::Mutex;

/// Driver state; `RoundK` means round `k` has executed and its messages
/// are being collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeygenStage {
    Round0,
    Round1,
    Round2,
    Round3,
    Round4,
    Round5,
    Round6,
    Round7,
    Finished,
    Aborted,
}

struct NodeState<R> {
    started: bool,
    stage: KeygenStage,
    temp: TempState,
    save: LocalSaveData,
    inbox: MessageInbox,
    rng: R,
    abort: Option<Abort>,
}

/// One participant of a keygen session.
pub struct LocalNode<R: CryptoRng + RngCore> {
    params: KeygenParams,
    out: Sender<KeygenMessage>,
    end: Sender<LocalSaveData>,
    state: Mutex<NodeState<R>>,
}

impl<R: CryptoRng + RngCore> LocalNode<R> {
    /// Creates the node and samples its VSS evaluation point.
    pub fn new(
        params: KeygenParams,
        out: Sender<KeygenMessage>,
        end: Sender<LocalSaveData>,
        mut rng: R,
    ) -> Result<Self, KeygenError> {
        let share_id = rounds::round_0::sample_scalar(&mut rng)?;
        let mut save = LocalSaveData::new(params.party_count(), params.party_index());
        save.share_ids[params.party_index()] = Some(share_id);

        let inbox = MessageInbox::new(params.party_count());
        Ok(LocalNode {
            params,
            out,
            end,
            state: Mutex::new(NodeState {
                started: false,
                stage: KeygenStage::Round0,
                temp: TempState::default(),
                save,
                inbox,
                rng,
                abort: None,
            }),
        })
    }

    pub fn params(&self) -> &KeygenParams {
        &self.params
    }

    pub fn party_index(&self) -> usize {
        self.params.party_index()
    }

    /// Runs round 0 and broadcasts its messages.
    pub fn start(&self) -> Result<(), KeygenError> {
        let mut st = self.lock();
        if st.abort.is_some() {
            return Err(KeygenError::Aborted);
        }
        if st.started {
            return Err(KeygenError::AlreadyStarted);
        }
        st.started = true;
        if let Err(e) = self.execute_round(&mut st, 0) {
            return Err(self.record_abort(&mut st, 0, e));
        }
        self.advance(&mut st).map(|_| ())
    }

    /// Stores an inbound message and advances as far as the inbox allows.
    /// Returns whether at least one round executed.
    pub fn update(&self, msg: KeygenMessage) -> Result<bool, KeygenError> {
        let mut st = self.lock();
        if st.abort.is_some() {
            return Err(KeygenError::Aborted);
        }
        if st.stage == KeygenStage::Finished {
            return Ok(false);
        }
        let msg_round = msg.round_number();
        let stored = match self.store_message(&mut st, msg) {
            Ok(stored) => stored,
            Err(e) => return Err(self.record_abort(&mut st, msg_round, e)),
        };
        if !stored {
            // Duplicate or stale; first write wins, silently.
            return Ok(false);
        }
        self.advance(&mut st)
    }

    pub fn current_stage(&self) -> KeygenStage {
        self.lock().stage
    }

    /// The sealed output, once the session finished.
    pub fn finished(&self) -> Option<LocalSaveData> {
        let st = self.lock();
        match st.stage {
            KeygenStage::Finished => Some(st.save.clone()),
            _ => None,
        }
    }

    pub fn abort_reason(&self) -> Option<Abort> {
        self.lock().abort.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NodeState<R>> {
        self.state.lock().expect("local node lock poisoned")
    }

    /// Validates and files one message. KG1 and KG4 carry material that is
    /// checked (and recorded) the moment it arrives; everything else is
    /// verified when its round executes.
    fn store_message(
        &self,
        st: &mut NodeState<R>,
        msg: KeygenMessage,
    ) -> Result<bool, KeygenError> {
        let from = msg.from_index();
        if from >= self.params.party_count() {
            return Err(KeygenError::MalformedMessage(format!(
                "sender index {} out of range",
                from
            )));
        }
        if !msg.validate_basic() {
            return Err(KeygenError::MalformedMessage(format!(
                "structurally invalid round {} message from {}",
                msg.round_number(),
                from
            )));
        }
        if let Recipient::Unicast(to) = msg.recipient() {
            if to != self.params.party_index() {
                return Err(KeygenError::MalformedMessage(format!(
                    "unicast for party {} delivered to party {}",
                    to,
                    self.params.party_index()
                )));
            }
        }

        let mut store_pk = None;
        let mut store_ntilde = None;
        match &msg {
            KeygenMessage::Round1(m) => {
                self.check_paillier_pk(from, &m.paillier_pk.n)?;
                store_pk = Some(m.paillier_pk.clone());
            }
            KeygenMessage::Round4(m) => {
                self.check_ntilde(from, m)?;
                store_ntilde = Some(NtildeH1H2 {
                    ntilde: m.ntilde.clone(),
                    h1: m.h1.clone(),
                    h2: m.h2.clone(),
                });
            }
            _ => {}
        }

        let stored = st.inbox.store(msg);
        if stored {
            if let Some(pk) = store_pk {
                st.save.paillier_pks[from] = Some(pk);
            }
            if let Some(ntilde) = store_ntilde {
                st.save.ntilde_h1h2[from] = Some(ntilde);
            }
        }
        Ok(stored)
    }

    fn check_paillier_pk(&self, from: usize, n: &BigInt) -> Result<(), KeygenError> {
        if n.is_even() || n.bits() < self.params.paillier_key_length() {
            return Err(KeygenError::MalformedMessage(format!(
                "paillier modulus from {} is even or below {} bits",
                from,
                self.params.paillier_key_length()
            )));
        }
        Ok(())
    }

    /// The security anchor for the signing protocol's range proofs: h1 and
    /// h2 must be nontrivial, distinct, and tied together by both DLN
    /// proofs.
    fn check_ntilde(
        &self,
        from: usize,
        m: &crate::keygen::messages::KGRound4Message,
    ) -> Result<(), KeygenError> {
        let blame = from;
        if m.ntilde.bits() + 1 < self.params.paillier_key_length() {
            return Err(KeygenError::NtildeCheckFail { blame });
        }
        let h1 = m.h1.mod_floor(&m.ntilde);
        let h2 = m.h2.mod_floor(&m.ntilde);
        let one = BigInt::one();
        if h1.is_zero() || h1 == one || h2.is_zero() || h2 == one {
            return Err(KeygenError::NtildeCheckFail { blame });
        }
        if h1 == h2 {
            return Err(KeygenError::NtildeCheckFail { blame });
        }
        if !m.proof1.verify(&m.h1, &m.h2, &m.ntilde)
            || !m.proof2.verify(&m.h2, &m.h1, &m.ntilde)
        {
            return Err(KeygenError::NtildeCheckFail { blame });
        }
        Ok(())
    }

    /// Runs every round whose gate is satisfied; finalizes after round 7.
    fn advance(&self, st: &mut NodeState<R>) -> Result<bool, KeygenError> {
        let mut advanced = false;
        loop {
            let next = match st.stage {
                KeygenStage::Round0 if st.inbox.round0.is_full() => 1,
                KeygenStage::Round1 if st.inbox.round1.is_full() => 2,
                KeygenStage::Round2
                    if st.inbox.round2.is_full()
                        && st.inbox.round2_poly.is_full()
                        && st.inbox.round2_share.is_full() =>
                {
                    3
                }
                KeygenStage::Round3
                    if st.inbox.round3.is_full() && st.inbox.round3_bind.is_full() =>
                {
                    4
                }
                KeygenStage::Round4 if st.inbox.round4.is_full() => 5,
                KeygenStage::Round5
                    if st.inbox.round5.is_full() && st.inbox.round5_open.is_full() =>
                {
                    6
                }
                KeygenStage::Round6
                    if st.inbox.round6.is_full() && st.inbox.round6_digest.is_full() =>
                {
                    7
                }
                _ => break,
            };

            if let Err(e) = self.execute_round(st, next) {
                return Err(self.record_abort(st, next, e));
            }
            advanced = true;
            st.stage = stage_of(next);

            if st.stage == KeygenStage::Round7 {
                // Terminal: seal the output and destroy the ephemerals.
                st.temp.clear();
                st.stage = KeygenStage::Finished;
                if self.end.send(st.save.clone()).is_err() {
                    log::warn!(
                        "party {}: completion channel closed",
                        self.params.party_index()
                    );
                }
                break;
            }
        }
        Ok(advanced)
    }

    fn execute_round(&self, st: &mut NodeState<R>, round: u8) -> Result<(), KeygenError> {
        let mut outbound = Vec::new();
        {
            let mut ctx = RoundCtx {
                params: &self.params,
                temp: &mut st.temp,
                save: &mut st.save,
                inbox: &st.inbox,
                rng: &mut st.rng,
                outbound: &mut outbound,
            };
            match round {
                0 => rounds::round_0::execute(&mut ctx)?,
                1 => rounds::round_1::execute(&mut ctx)?,
                2 => rounds::round_2::execute(&mut ctx)?,
                3 => rounds::round_3::execute(&mut ctx)?,
                4 => rounds::round_4::execute(&mut ctx)?,
                5 => rounds::round_5::execute(&mut ctx)?,
                6 => rounds::round_6::execute(&mut ctx)?,
                7 => rounds::round_7::execute(&mut ctx)?,
                _ => {
                    return Err(KeygenError::InvalidParameters(format!(
                        "no round {}",
                        round
                    )))
                }
            }
        }
        self.dispatch(st, outbound)
    }

    /// Files the node's own copies and hands the rest to the transport.
    fn dispatch(
        &self,
        st: &mut NodeState<R>,
        outbound: Vec<KeygenMessage>,
    ) -> Result<(), KeygenError> {
        for msg in outbound {
            match msg.recipient() {
                Recipient::Broadcast => {
                    self.store_message(st, msg.clone())?;
                    self.out
                        .send(msg)
                        .map_err(|_| KeygenError::ChannelClosed)?;
                }
                Recipient::Unicast(to) if to == self.params.party_index() => {
                    self.store_message(st, msg)?;
                }
                Recipient::Unicast(_) => {
                    self.out
                        .send(msg)
                        .map_err(|_| KeygenError::ChannelClosed)?;
                }
            }
        }
        Ok(())
    }

    fn record_abort(
        &self,
        st: &mut NodeState<R>,
        round: u8,
        cause: KeygenError,
    ) -> KeygenError {
        log::error!(
            "party {}: aborted in round {}: {}",
            self.params.party_index(),
            round,
            cause
        );
        st.stage = KeygenStage::Aborted;
        st.abort = Some(Abort {
            round,
            blame: cause.blame(),
            cause: cause.clone(),
        });
        st.temp.clear();
        cause
    }
}

fn stage_of(round: u8) -> KeygenStage {
    match round {
        0 => KeygenStage::Round0,
        1 => KeygenStage::Round1,
        2 => KeygenStage::Round2,
        3 => KeygenStage::Round3,
        4 => KeygenStage::Round4,
        5 => KeygenStage::Round5,
        6 => KeygenStage::Round6,
        _ => KeygenStage::Round7,
    }
}
