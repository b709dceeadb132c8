//! Index page rendering.

use axum::extract::State;
use axum::response::Html;
use tapgate_core::CardReading;

use crate::serve::PageState;

/// Render the viewer page.
///
/// The page embeds the last known reading as initial content and a script
/// that subscribes to the notification channel on `notify_port` of the same
/// host, updating both fields on every message.
pub fn render_index(last: Option<&CardReading>, notify_port: u16) -> String {
    let (uid, token) = match last {
        Some(reading) => (reading.uid().to_hex(), reading.token().as_str().to_string()),
        None => (String::new(), String::new()),
    };

    format!(
        "<html><head><title>Access Terminal</title></head><body>\
         <h2>Present a card</h2>\
         <p><strong>Card uid:</strong> <span id='uid'>{uid}</span></p>\
         <p><strong>Programmed id:</strong> <span id='idProgramado'>{token}</span></p>\
         <script>\
         var ws = new WebSocket('ws://' + location.hostname + ':{notify_port}/');\
         ws.onmessage = function(event) {{\
         var data = JSON.parse(event.data);\
         document.getElementById('uid').innerText = data.uid;\
         document.getElementById('idProgramado').innerText = data.idProgramado;\
         }};\
         </script></body></html>"
    )
}

/// Single route of the page server.
pub(crate) async fn index(State(state): State<PageState>) -> Html<String> {
    let last = state.hub.last_reading().await;
    Html(render_index(last.as_ref(), state.notify_port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapgate_core::{CardUid, ProgrammedToken};

    #[test]
    fn test_render_embeds_last_reading() {
        let reading = CardReading::new(
            CardUid::new(vec![0x04, 0xA1, 0x2B, 0x7C]).unwrap(),
            ProgrammedToken::new("DOOR1"),
        );
        let html = render_index(Some(&reading), 8081);

        assert!(html.contains("<span id='uid'>04A12B7C</span>"));
        assert!(html.contains("<span id='idProgramado'>DOOR1</span>"));
        assert!(html.contains(":8081/"));
    }

    #[test]
    fn test_render_without_reading_is_blank() {
        let html = render_index(None, 8081);
        assert!(html.contains("<span id='uid'></span>"));
        assert!(html.contains("<span id='idProgramado'></span>"));
    }
}
