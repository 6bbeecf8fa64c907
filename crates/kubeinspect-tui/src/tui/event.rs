use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Terminal events
#[derive(Clone, Debug)]
pub enum Event {
    /// Key press event
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Error reading the terminal
    Error(String),
}

/// Reads terminal input on a background task
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventHandler {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let token = cancel.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();

            loop {
                let event = tokio::select! {
                    _ = token.cancelled() => break,
                    event = reader.next() => event,
                };

                let forwarded = match event {
                    // Release and repeat events would double every key on Windows
                    Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        Event::Key(key)
                    }
                    Some(Ok(CrosstermEvent::Resize(w, h))) => Event::Resize(w, h),
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => Event::Error(e.to_string()),
                    None => break,
                };

                if sender.send(forwarded).is_err() {
                    break;
                }
            }
        });

        Self { receiver, cancel }
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Drop keys typed while the loop was blocked on the cluster, so they
    /// do not act on the screen the response opens. Returns how many went.
    pub fn discard_pending(&mut self) -> usize {
        discard_keys(&mut self.receiver)
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Empties the queue and counts the keys that were in it. Resizes need no
/// replay since every frame reads the current terminal size.
fn discard_keys(receiver: &mut mpsc::UnboundedReceiver<Event>) -> usize {
    let mut keys = 0;
    while let Ok(event) = receiver.try_recv() {
        if matches!(event, Event::Key(_)) {
            keys += 1;
        }
    }
    keys
}
