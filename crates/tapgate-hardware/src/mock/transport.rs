//! Mock card transport for testing and development.
//!
//! Simulates a contactless reader by queueing card presentations that the
//! polling side picks up one at a time.

use crate::{
    Result,
    traits::{BlockKey, CardTransport},
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tapgate_core::{CardUid, constants::BLOCK_LENGTH};
use tokio::sync::mpsc;

/// One simulated card presentation.
#[derive(Debug, Clone)]
struct PresentedCard {
    uid: CardUid,
    /// Token block content; `None` simulates a block-read failure.
    block: Option<[u8; BLOCK_LENGTH]>,
    /// When set, sector authentication fails for this card.
    fail_auth: bool,
}

#[derive(Debug, Default)]
struct TransportStats {
    auth_attempts: AtomicUsize,
    releases: AtomicUsize,
}

/// Mock contactless transport for testing and development.
///
/// Created together with a [`MockTransportHandle`] used to present cards and
/// observe transport activity.
///
/// # Examples
///
/// ```
/// use tapgate_core::CardUid;
/// use tapgate_hardware::mock::MockCardTransport;
/// use tapgate_hardware::traits::CardTransport;
///
/// #[tokio::main]
/// async fn main() -> tapgate_hardware::Result<()> {
///     let (mut transport, handle) = MockCardTransport::new();
///
///     let uid = CardUid::new(vec![0x04, 0xAB, 0xCD, 0xEF]).unwrap();
///     let mut block = [0u8; 16];
///     block[..5].copy_from_slice(b"DOOR1");
///     handle.present_card(uid, block).await?;
///
///     let selected = transport.request_card().await?;
///     assert!(selected.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockCardTransport {
    queue: mpsc::Receiver<PresentedCard>,
    active: Option<PresentedCard>,
    stats: Arc<TransportStats>,
}

impl MockCardTransport {
    /// Create a new mock transport together with its control handle.
    pub fn new() -> (Self, MockTransportHandle) {
        let (tx, rx) = mpsc::channel(32);
        let stats = Arc::new(TransportStats::default());

        let transport = Self {
            queue: rx,
            active: None,
            stats: stats.clone(),
        };
        let handle = MockTransportHandle { tx, stats };

        (transport, handle)
    }
}

impl CardTransport for MockCardTransport {
    async fn request_card(&mut self) -> Result<Option<CardUid>> {
        match self.queue.try_recv() {
            Ok(card) => {
                let uid = card.uid.clone();
                self.active = Some(card);
                Ok(Some(uid))
            }
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(
                crate::HardwareError::disconnected("mock transport handle dropped"),
            ),
        }
    }

    async fn authenticate_block(&mut self, block: u8, _key: &BlockKey) -> Result<()> {
        self.stats.auth_attempts.fetch_add(1, Ordering::SeqCst);
        let card = self
            .active
            .as_ref()
            .ok_or_else(|| crate::HardwareError::invalid_data("no card selected"))?;
        if card.fail_auth {
            return Err(crate::HardwareError::authentication_failed(block));
        }
        Ok(())
    }

    async fn read_block(&mut self, block: u8) -> Result<[u8; BLOCK_LENGTH]> {
        let card = self
            .active
            .as_ref()
            .ok_or_else(|| crate::HardwareError::invalid_data("no card selected"))?;
        card.block
            .ok_or_else(|| crate::HardwareError::block_read(block, "simulated read failure"))
    }

    async fn release(&mut self) -> Result<()> {
        self.active = None;
        self.stats.releases.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Handle for controlling a [`MockCardTransport`].
///
/// Cloneable; every clone feeds the same transport and observes the same
/// counters.
#[derive(Debug, Clone)]
pub struct MockTransportHandle {
    tx: mpsc::Sender<PresentedCard>,
    stats: Arc<TransportStats>,
}

impl MockTransportHandle {
    /// Present a card whose token block authenticates and reads normally.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport has been dropped.
    pub async fn present_card(&self, uid: CardUid, block: [u8; BLOCK_LENGTH]) -> Result<()> {
        self.send(PresentedCard {
            uid,
            block: Some(block),
            fail_auth: false,
        })
        .await
    }

    /// Present a card whose sector authentication fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport has been dropped.
    pub async fn present_card_with_auth_failure(&self, uid: CardUid) -> Result<()> {
        self.send(PresentedCard {
            uid,
            block: None,
            fail_auth: true,
        })
        .await
    }

    /// Present a card that authenticates but whose block read fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport has been dropped.
    pub async fn present_card_with_read_failure(&self, uid: CardUid) -> Result<()> {
        self.send(PresentedCard {
            uid,
            block: None,
            fail_auth: false,
        })
        .await
    }

    /// Number of sector authentication attempts observed.
    pub fn auth_attempts(&self) -> usize {
        self.stats.auth_attempts.load(Ordering::SeqCst)
    }

    /// Number of times the card was halted and the crypto session stopped.
    pub fn release_count(&self) -> usize {
        self.stats.releases.load(Ordering::SeqCst)
    }

    async fn send(&self, card: PresentedCard) -> Result<()> {
        self.tx
            .send(card)
            .await
            .map_err(|_| crate::HardwareError::disconnected("mock transport dropped"))
    }
}
