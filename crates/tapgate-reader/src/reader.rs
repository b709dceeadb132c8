use tapgate_core::{CardReading, ProgrammedToken, constants::TOKEN_BLOCK};
use tapgate_hardware::{BlockKey, CardTransport};
use tracing::{debug, trace, warn};

/// Polls a contactless transport and produces complete card readings.
///
/// One poll covers the whole card session: presence check, uid capture,
/// token-block authentication and read, sanitization, and release. Card
/// protocol failures after detection degrade the reading (empty token)
/// instead of aborting it; the uid alone is still worth reporting.
///
/// # Examples
///
/// ```no_run
/// use tapgate_hardware::CardTransport;
/// use tapgate_reader::CardReader;
///
/// async fn wait_for_card<T: CardTransport>(reader: &mut CardReader<T>) {
///     loop {
///         if let Some(reading) = reader.poll_card().await {
///             println!("card {}: {}", reading.uid(), reading.token());
///             break;
///         }
///         // no card in the field, poll again later
///     }
/// }
/// ```
pub struct CardReader<T> {
    transport: T,
    block: u8,
    key: BlockKey,
}

impl<T: CardTransport> CardReader<T> {
    /// Create a reader for the standard token block and the factory key.
    pub fn new(transport: T) -> Self {
        Self::with_block(transport, TOKEN_BLOCK, BlockKey::FACTORY)
    }

    /// Create a reader for a specific block and key.
    pub fn with_block(transport: T, block: u8, key: BlockKey) -> Self {
        Self {
            transport,
            block,
            key,
        }
    }

    /// Poll once for a card.
    ///
    /// Returns `None` when no card is in the field, including when the
    /// presence check itself fails; the caller re-polls later either way.
    /// On detection the card is released unconditionally before the reading
    /// is returned, even if authentication or the block read failed.
    pub async fn poll_card(&mut self) -> Option<CardReading> {
        let uid = match self.transport.request_card().await {
            Ok(Some(uid)) => uid,
            Ok(None) => return None,
            Err(e) => {
                trace!(error = %e, "presence check failed, treating as no card");
                return None;
            }
        };

        let token = self.read_token().await;

        if let Err(e) = self.transport.release().await {
            warn!(error = %e, "card release failed");
        }

        Some(CardReading::new(uid, token))
    }

    /// Authenticate and read the token block, degrading to an empty token on
    /// any card protocol failure.
    async fn read_token(&mut self) -> ProgrammedToken {
        if let Err(e) = self.transport.authenticate_block(self.block, &self.key).await {
            debug!(block = self.block, error = %e, "block authentication failed, token left empty");
            return ProgrammedToken::empty();
        }

        match self.transport.read_block(self.block).await {
            Ok(raw) => ProgrammedToken::from_block_bytes(&raw),
            Err(e) => {
                debug!(block = self.block, error = %e, "block read failed, token left empty");
                ProgrammedToken::empty()
            }
        }
    }

    /// Access the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Consume the reader and return the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapgate_core::CardUid;
    use tapgate_core::constants::BLOCK_LENGTH;
    use tapgate_hardware::mock::MockCardTransport;

    fn uid() -> CardUid {
        CardUid::new(vec![0x04, 0xA1, 0x2B, 0x7C]).unwrap()
    }

    fn door1_block() -> [u8; BLOCK_LENGTH] {
        let mut block = [0u8; BLOCK_LENGTH];
        block[..5].copy_from_slice(b"DOOR1");
        block
    }

    #[tokio::test]
    async fn test_poll_without_card() {
        let (transport, _handle) = MockCardTransport::new();
        let mut reader = CardReader::new(transport);

        assert!(reader.poll_card().await.is_none());
    }

    #[tokio::test]
    async fn test_poll_reads_uid_and_token() {
        let (transport, handle) = MockCardTransport::new();
        handle.present_card(uid(), door1_block()).await.unwrap();

        let mut reader = CardReader::new(transport);
        let reading = reader.poll_card().await.unwrap();

        assert_eq!(reading.uid().to_hex(), "04A12B7C");
        assert_eq!(reading.token().as_str(), "DOOR1");
        assert_eq!(handle.release_count(), 1);
    }

    #[tokio::test]
    async fn test_auth_failure_degrades_to_empty_token() {
        let (transport, handle) = MockCardTransport::new();
        handle.present_card_with_auth_failure(uid()).await.unwrap();

        let mut reader = CardReader::new(transport);
        let reading = reader.poll_card().await.unwrap();

        assert_eq!(reading.uid().to_hex(), "04A12B7C");
        assert!(reading.token().is_empty());
        // The card is released even though authentication failed.
        assert_eq!(handle.release_count(), 1);
    }

    #[tokio::test]
    async fn test_read_failure_degrades_to_empty_token() {
        let (transport, handle) = MockCardTransport::new();
        handle.present_card_with_read_failure(uid()).await.unwrap();

        let mut reader = CardReader::new(transport);
        let reading = reader.poll_card().await.unwrap();

        assert!(reading.token().is_empty());
        assert_eq!(handle.release_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_treated_as_no_card() {
        let (transport, handle) = MockCardTransport::new();
        drop(handle);

        let mut reader = CardReader::new(transport);
        assert!(reader.poll_card().await.is_none());
    }

    #[tokio::test]
    async fn test_consecutive_polls_release_every_card() {
        let (transport, handle) = MockCardTransport::new();
        handle.present_card(uid(), door1_block()).await.unwrap();
        handle
            .present_card_with_auth_failure(CardUid::new(vec![0x01, 0x02, 0x03, 0x04]).unwrap())
            .await
            .unwrap();

        let mut reader = CardReader::new(transport);
        assert!(reader.poll_card().await.is_some());
        assert!(reader.poll_card().await.is_some());
        assert!(reader.poll_card().await.is_none());

        assert_eq!(handle.release_count(), 2);
    }
}
