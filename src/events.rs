use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

/// Which list a successful mutation has invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Courses,
    Instances,
}

#[derive(Clone, Debug)]
pub struct RefreshSender(UnboundedSender<Refresh>);

#[derive(Debug)]
pub struct RefreshReceiver(UnboundedReceiver<Refresh>);

pub fn refresh_channel() -> (RefreshSender, RefreshReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (RefreshSender(tx), RefreshReceiver(rx))
}

impl RefreshSender {
    pub fn request(&self, refresh: Refresh) {
        if self.0.send(refresh).is_err() {
            debug!("refresh listener gone, dropping {:?}", refresh);
        }
    }
}

impl RefreshReceiver {
    /// Next pending request, without waiting.
    pub fn try_next(&mut self) -> Option<Refresh> {
        self.0.try_recv().ok()
    }
}
