use crate::transport::AuthorizationTransport;
use serde::Deserialize;
use tapgate_core::{AuthorizationOutcome, CardReading, IndicatorState};
use tracing::{info, warn};

/// Decision body of the authorization service.
///
/// Only `estadoLED` is interpreted; anything else in the response is ignored.
#[derive(Debug, Deserialize)]
struct DecisionBody {
    #[serde(rename = "estadoLED")]
    indicator: Option<String>,
}

/// Performs the one-shot authorization round trip for a card reading.
///
/// # Examples
///
/// ```
/// use tapgate_authorize::{AuthorizationClient, mock::MockAuthorizationTransport};
/// use tapgate_core::{AuthorizationOutcome, CardReading, CardUid, IndicatorState, ProgrammedToken};
///
/// #[tokio::main]
/// async fn main() {
///     let transport = MockAuthorizationTransport::online();
///     transport.enqueue_body(r#"{"estadoLED":"rojo"}"#);
///
///     let client = AuthorizationClient::new(transport);
///     let reading = CardReading::new(
///         CardUid::new(vec![0x04, 0xA1, 0x2B, 0x7C]).unwrap(),
///         ProgrammedToken::new("DOOR1"),
///     );
///
///     let outcome = client.authorize(&reading).await;
///     assert_eq!(outcome, AuthorizationOutcome::Resolved(IndicatorState::Red));
/// }
/// ```
pub struct AuthorizationClient<T> {
    transport: T,
}

impl<T: AuthorizationTransport> AuthorizationClient<T> {
    /// Create a client over the given transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Run one authorization round trip for the reading.
    ///
    /// Never fails: every failure mode (no connectivity, request error,
    /// unusable response) is folded into
    /// [`AuthorizationOutcome::Unresolved`] and logged. When the transport
    /// reports no connectivity, no request is attempted at all.
    pub async fn authorize(&self, reading: &CardReading) -> AuthorizationOutcome {
        if !self.transport.is_connected() {
            warn!(uid = %reading.uid(), "network unavailable, authorization unresolved");
            return AuthorizationOutcome::Unresolved;
        }

        let body = match self.transport.submit(reading).await {
            Ok(body) => body,
            Err(e) => {
                warn!(uid = %reading.uid(), error = %e, "authorization request failed");
                return AuthorizationOutcome::Unresolved;
            }
        };

        match decode_decision(&body) {
            Some(state) => {
                info!(uid = %reading.uid(), indicator = %state, "authorization resolved");
                AuthorizationOutcome::Resolved(state)
            }
            None => {
                warn!(uid = %reading.uid(), body = %body, "authorization response unusable");
                AuthorizationOutcome::Unresolved
            }
        }
    }

    /// Access the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

/// Extract an indicator decision from a raw response body.
///
/// Returns `None` for non-JSON bodies, a missing `estadoLED` field, or a
/// token outside the recognized set.
fn decode_decision(body: &str) -> Option<IndicatorState> {
    let decision: DecisionBody = serde_json::from_str(body).ok()?;
    IndicatorState::from_token(&decision.indicator?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockAuthorizationTransport;
    use rstest::rstest;
    use tapgate_core::{CardUid, ProgrammedToken};

    fn reading() -> CardReading {
        CardReading::new(
            CardUid::new(vec![0x04, 0xA1, 0x2B, 0x7C]).unwrap(),
            ProgrammedToken::new("DOOR1"),
        )
    }

    #[rstest]
    #[case(r#"{"estadoLED":"verde"}"#, IndicatorState::Green)]
    #[case(r#"{"estadoLED":"amarillo"}"#, IndicatorState::Yellow)]
    #[case(r#"{"estadoLED":"rojo"}"#, IndicatorState::Red)]
    #[case(r#"{"estadoLED":"rojo","detalle":"bloqueada"}"#, IndicatorState::Red)]
    #[tokio::test]
    async fn test_recognized_decisions(#[case] body: &str, #[case] expected: IndicatorState) {
        let transport = MockAuthorizationTransport::online();
        transport.enqueue_body(body);

        let client = AuthorizationClient::new(transport);
        assert_eq!(
            client.authorize(&reading()).await,
            AuthorizationOutcome::Resolved(expected)
        );
    }

    #[rstest]
    #[case(r#"{"estadoLED":"azul"}"#)] // unrecognized token
    #[case(r#"{"estadoLED":""}"#)]
    #[case(r#"{"otraCosa":"verde"}"#)] // field absent
    #[case(r#"{}"#)]
    #[case("not json at all")]
    #[case("")]
    #[tokio::test]
    async fn test_unusable_responses_are_unresolved(#[case] body: &str) {
        let transport = MockAuthorizationTransport::online();
        transport.enqueue_body(body);

        let client = AuthorizationClient::new(transport);
        assert_eq!(
            client.authorize(&reading()).await,
            AuthorizationOutcome::Unresolved
        );
    }

    #[tokio::test]
    async fn test_request_failure_is_unresolved() {
        let transport = MockAuthorizationTransport::online();
        transport.enqueue_error("connection reset");

        let client = AuthorizationClient::new(transport);
        assert_eq!(
            client.authorize(&reading()).await,
            AuthorizationOutcome::Unresolved
        );
    }

    #[tokio::test]
    async fn test_offline_attempts_no_request() {
        let transport = MockAuthorizationTransport::offline();
        let client = AuthorizationClient::new(transport);

        assert_eq!(
            client.authorize(&reading()).await,
            AuthorizationOutcome::Unresolved
        );
        assert_eq!(client.transport().attempts(), 0);
    }

    #[tokio::test]
    async fn test_one_request_per_authorization() {
        let transport = MockAuthorizationTransport::online();
        transport.enqueue_body(r#"{"estadoLED":"verde"}"#);

        let client = AuthorizationClient::new(transport);
        client.authorize(&reading()).await;

        // One shot, no retry, even though no further response is scripted.
        assert_eq!(client.transport().attempts(), 1);
    }

    #[test]
    fn test_decode_decision_table() {
        assert_eq!(
            decode_decision(r#"{"estadoLED":"verde"}"#),
            Some(IndicatorState::Green)
        );
        assert_eq!(decode_decision(r#"{"estadoLED":"VERDE"}"#), None);
        assert_eq!(decode_decision("[1,2,3]"), None);
    }
}
