use crate::store::Snapshot;
use tokio::sync::watch;

/// Receives every snapshot the store publishes.
///
/// Closures taking `&Snapshot` implement this trait directly.
pub trait BoardListener: Send {
    fn on_change(&mut self, snapshot: &Snapshot);
}

impl<F> BoardListener for F
where
    F: FnMut(&Snapshot) + Send,
{
    fn on_change(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}

/// Forwards snapshots into a `tokio::sync::watch` channel so async
/// consumers (sync, analytics) can await the latest board.
#[derive(Debug)]
pub struct WatchListener {
    sender: watch::Sender<Snapshot>,
}

impl WatchListener {
    /// Creates a listener and a receiver primed with `initial`
    pub fn channel(initial: Snapshot) -> (Self, watch::Receiver<Snapshot>) {
        let (sender, receiver) = watch::channel(initial);
        (Self { sender }, receiver)
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.sender.subscribe()
    }
}

impl BoardListener for WatchListener {
    fn on_change(&mut self, snapshot: &Snapshot) {
        // Keeps publishing even when every receiver is gone
        self.sender.send_replace(snapshot.clone());
    }
}
