use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Sleeps for `duration` unless `token` is cancelled first.
pub async fn cancellable_delay(duration: Duration, token: &CancellationToken) -> Result<(), Cancelled> {
    if duration.is_zero() {
        return if token.is_cancelled() { Err(Cancelled) } else { Ok(()) };
    }
    tokio::select! {
        _ = token.cancelled() => Err(Cancelled),
        _ = sleep(duration) => Ok(()),
    }
}

/// Decorative flag that switches itself off after a fixed interval.
///
/// Dropping the handle cancels the pending switch-off task.
#[derive(Debug)]
pub struct Highlight {
    active: Arc<AtomicBool>,
    token: CancellationToken,
}

impl Highlight {
    /// Starts a highlight. Outside a tokio runtime the highlight stays off.
    pub fn start(duration: Duration) -> Self {
        let active = Arc::new(AtomicBool::new(false));
        let token = CancellationToken::new();

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            active.store(true, Ordering::SeqCst);
            let flag = Arc::clone(&active);
            let child = token.clone();
            handle.spawn(async move {
                if cancellable_delay(duration, &child).await.is_ok() {
                    flag.store(false, Ordering::SeqCst);
                    debug!("suggestion highlight cleared");
                }
            });
        }

        Self { active, token }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn cancel(&self) {
        self.token.cancel();
        self.active.store(false, Ordering::SeqCst);
    }
}

impl Drop for Highlight {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn delay_completes_without_cancellation() {
        let token = CancellationToken::new();
        assert_eq!(cancellable_delay(Duration::from_secs(1), &token).await, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn delay_stops_when_cancelled() {
        let token = CancellationToken::new();
        let waiter = {
            let token = token.clone();
            tokio::spawn(async move { cancellable_delay(Duration::from_secs(60), &token).await })
        };
        tokio::task::yield_now().await;
        token.cancel();
        assert_eq!(waiter.await.unwrap(), Err(Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn highlight_clears_itself() {
        let highlight = Highlight::start(Duration::from_millis(3000));
        assert!(highlight.is_active());

        tokio::time::sleep(Duration::from_millis(3001)).await;
        tokio::task::yield_now().await;
        assert!(!highlight.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_highlight_is_off() {
        let highlight = Highlight::start(Duration::from_millis(3000));
        highlight.cancel();
        assert!(!highlight.is_active());
    }

    #[test]
    fn highlight_outside_runtime_is_inert() {
        let highlight = Highlight::start(Duration::from_millis(10));
        assert!(!highlight.is_active());
    }
}
