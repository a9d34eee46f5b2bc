use std::time::{Duration, Instant};

/// Identifies one requested frame. Cancelling needs the handle returned at
/// request time; a newer request never reuses an old id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct FrameHandle(u64);

#[derive(Clone, Copy, Debug)]
struct Pending {
    handle: FrameHandle,
    due: Instant,
}

/// Display-refresh stand-in: at most one frame is pending at a time and it
/// becomes due one interval after it was requested.
pub(crate) struct FrameScheduler {
    interval: Duration,
    next_id: u64,
    pending: Option<Pending>,
}

impl FrameScheduler {
    pub(crate) fn new(fps: u32) -> Self {
        Self {
            interval: interval_for(fps),
            next_id: 1,
            pending: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    pub(crate) fn set_fps(&mut self, fps: u32) {
        self.interval = interval_for(fps);
    }

    /// Schedules the next frame, replacing any request still pending.
    pub(crate) fn request(&mut self, now: Instant) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.pending = Some(Pending {
            handle,
            due: now + self.interval,
        });
        handle
    }

    /// Returns true if `handle` was still pending.
    pub(crate) fn cancel(&mut self, handle: FrameHandle) -> bool {
        match self.pending {
            Some(p) if p.handle == handle => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Hands out the pending frame once its deadline has passed.
    pub(crate) fn take_due(&mut self, now: Instant) -> Option<FrameHandle> {
        match self.pending {
            Some(p) if now >= p.due => {
                self.pending = None;
                Some(p.handle)
            }
            _ => None,
        }
    }

    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

fn interval_for(fps: u32) -> Duration {
    Duration::from_secs_f32(1.0 / fps.clamp(1, 240) as f32)
}
