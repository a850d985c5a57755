use futures::channel::oneshot;
use futures::future::{FutureExt, Shared};

/// create a linked cancellation pair
///
/// the handle side triggers, the token side observes. tokens are cheap to
/// clone and all clones observe the same trigger. dropping the handle
/// without calling cancel also counts as cancellation.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = oneshot::channel();
    (CancelHandle(tx), CancelToken(rx.shared()))
}

pub struct CancelHandle(oneshot::Sender<()>);

impl CancelHandle {
    pub fn cancel(self) {
        let _ = self.0.send(());
    }
}

#[derive(Clone)]
pub struct CancelToken(Shared<oneshot::Receiver<()>>);

impl CancelToken {
    /// future resolving once cancellation fires
    pub fn cancelled(&self) -> Shared<oneshot::Receiver<()>> {
        self.0.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.peek().is_some()
    }
}
