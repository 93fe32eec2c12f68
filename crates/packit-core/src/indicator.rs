//! Spinning progress indicator that runs next to the build.
//!
//! The indicator lives on its own thread and only ever talks to the build
//! through a [`CancellationToken`]. Rendering is delegated to a
//! [`SpinnerRender`] so the library stays terminal-agnostic.
//!
//! Shutdown is synchronous: [`ProgressIndicator::stop`] cancels the token
//! and joins the thread, so the renderer has restored the terminal before
//! anything else is printed.

use std::sync::Arc;
use std::sync::Condvar;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

/// Glyphs cycled by the indicator.
pub const FRAMES: [&str; 5] = ["|", "/", "-", "\\", "-"];

/// Delay between two glyphs.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(200);

/// One-shot cancellation signal shared between the build and the indicator.
///
/// Cloning yields another handle to the same signal.
///
/// # Examples
///
/// ```
/// use packit_core::indicator::CancellationToken;
/// use std::time::Duration;
///
/// let token = CancellationToken::new();
/// let observer = token.clone();
///
/// token.cancel();
/// assert!(observer.is_cancelled());
/// assert!(observer.wait_timeout(Duration::from_secs(60)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation and wakes every waiter. Idempotent.
    pub fn cancel(&self) {
        let (_, cvar) = &*self.inner;
        *self.lock() = true;
        cvar.notify_all();
    }

    /// Returns `true` once [`CancellationToken::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.lock()
    }

    /// Blocks for at most `timeout`, returning early on cancellation.
    ///
    /// Returns `true` if the token is cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (_, cvar) = &*self.inner;
        let guard = self.lock();
        let (guard, _) = cvar
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }

    // A panicking renderer must not wedge the build thread.
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Draws the indicator. Called only from the indicator thread.
pub trait SpinnerRender: Send {
    /// Called once before the first frame (hide the cursor, ...).
    fn start(&mut self) {}

    /// Draws one glyph, replacing the previous one.
    fn frame(&mut self, glyph: &str);

    /// Called once on shutdown (erase the glyph, restore the cursor, ...).
    fn finish(&mut self) {}
}

/// Renderer that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRender;

impl SpinnerRender for NoopRender {
    fn frame(&mut self, _glyph: &str) {}
}

/// Handle to a running indicator thread.
///
/// Dropping the handle stops the indicator as well.
#[derive(Debug)]
pub struct ProgressIndicator {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ProgressIndicator {
    /// Starts the indicator with the default frame interval.
    pub fn start<R: SpinnerRender + 'static>(render: R) -> Self {
        Self::with_interval(render, FRAME_INTERVAL)
    }

    /// Starts the indicator with a custom frame interval.
    ///
    /// If the thread cannot be spawned the build goes on without an
    /// indicator.
    pub fn with_interval<R: SpinnerRender + 'static>(render: R, interval: Duration) -> Self {
        let token = CancellationToken::new();
        let worker_token = token.clone();

        let handle = thread::Builder::new()
            .name("packit-indicator".to_string())
            .spawn(move || run(render, &worker_token, interval))
            .map_err(|e| warn!("cannot start progress indicator: {e}"))
            .ok();

        Self { token, handle }
    }

    /// Cancels the indicator and waits for it to clean up.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("progress indicator thread panicked");
        }
    }
}

impl Drop for ProgressIndicator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run<R: SpinnerRender>(mut render: R, token: &CancellationToken, interval: Duration) {
    render.start();
    for glyph in FRAMES.iter().cycle() {
        if token.wait_timeout(interval) {
            break;
        }
        render.frame(glyph);
    }
    render.finish();
}
