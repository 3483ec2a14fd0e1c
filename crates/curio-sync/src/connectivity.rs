//! Connectivity monitoring: a repeating reachability probe with an
//! explicit start/stop lifecycle owned by the embedding application.
//!
//! Deliberately the simplest component: one boolean flag, no state
//! machine. On an offline-to-online transition with a non-empty queue
//! the registered reconnect callback fires (the app wires it to a
//! queue drain or a full sync).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use curio_core::RemoteStore;

use crate::queue::MutationQueue;

type ReconnectCallback = Arc<dyn Fn() + Send + Sync>;

pub struct ConnectivityMonitor {
    remote: Arc<dyn RemoteStore>,
    queue: Arc<MutationQueue>,
    online: Arc<AtomicBool>,
    interval: Duration,
    on_reconnect: Mutex<Option<ReconnectCallback>>,
    stop_flag: Arc<AtomicBool>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl ConnectivityMonitor {
    /// `online` is shared with the sync engine (`SyncEngine::online_flag`).
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        queue: Arc<MutationQueue>,
        online: Arc<AtomicBool>,
        interval: Duration,
    ) -> Self {
        Self {
            remote,
            queue,
            online,
            interval,
            on_reconnect: Mutex::new(None),
            stop_flag: Arc::new(AtomicBool::new(false)),
            handle: Mutex::new(None),
        }
    }

    /// Register the callback fired on reconnect with pending mutations.
    pub fn set_on_reconnect(&self, callback: impl Fn() + Send + Sync + 'static) {
        *self.lock_callback() = Some(Arc::new(callback));
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Probe once, update the flag, and fire the reconnect callback on
    /// an offline-to-online transition with queued work.
    pub fn probe(&self) -> bool {
        let now_online = self.remote.probe();
        let was_online = self.online.swap(now_online, Ordering::AcqRel);
        if now_online != was_online {
            tracing::info!(
                "connectivity: {}",
                if now_online { "online" } else { "offline" }
            );
        }
        if now_online && !was_online && self.queue.pending_count() > 0 {
            let callback = self.lock_callback().clone();
            if let Some(callback) = callback {
                callback();
            }
        }
        now_online
    }

    /// Start the background probe loop. Idempotent while running.
    pub fn start(self: &Arc<Self>) {
        let mut handle = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if handle.is_some() {
            return;
        }
        self.stop_flag.store(false, Ordering::Release);
        let monitor = Arc::clone(self);
        *handle = Some(thread::spawn(move || {
            tracing::debug!("connectivity: monitor started");
            while !monitor.stop_flag.load(Ordering::Acquire) {
                monitor.probe();
                // Sleep in slices so stop() stays responsive.
                let mut slept = Duration::ZERO;
                while slept < monitor.interval {
                    if monitor.stop_flag.load(Ordering::Acquire) {
                        return;
                    }
                    let slice = Duration::from_millis(250).min(monitor.interval - slept);
                    thread::sleep(slice);
                    slept += slice;
                }
            }
        }));
    }

    /// Stop the probe loop and join the thread.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Release);
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = handle {
            let _ = handle.join();
            tracing::debug!("connectivity: monitor stopped");
        }
    }

    fn lock_callback(&self) -> std::sync::MutexGuard<'_, Option<ReconnectCallback>> {
        self.on_reconnect
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Release);
    }
}
