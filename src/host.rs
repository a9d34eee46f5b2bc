use crate::config::CellMetrics;
use crate::frames::FrameScheduler;

/// Terminal size in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub(crate) cols: u16,
    pub(crate) rows: u16,
}

impl Viewport {
    pub(crate) fn width_px(&self, m: CellMetrics) -> f32 {
        self.cols as f32 * m.px_per_col
    }

    pub(crate) fn height_px(&self, m: CellMetrics) -> f32 {
        self.rows as f32 * m.px_per_row
    }
}

/// What the host says about its pointing device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Capabilities {
    pub(crate) touch_events: bool,
    pub(crate) max_touch_points: u8,
    pub(crate) coarse_pointer: bool,
}

impl Capabilities {
    pub(crate) fn fine() -> Self {
        Self::default()
    }

    pub(crate) fn coarse() -> Self {
        Self {
            touch_events: true,
            max_touch_points: 1,
            coarse_pointer: true,
        }
    }

    pub(crate) fn is_touch_primary(&self) -> bool {
        self.touch_events || self.max_touch_points > 0 || self.coarse_pointer
    }
}

pub(crate) trait Environment {
    fn viewport(&self) -> Viewport;
    fn capabilities(&self) -> Capabilities;
}

/// Environment whose answers are set by the event loop as events arrive.
#[derive(Clone, Debug)]
pub(crate) struct StaticEnv {
    pub(crate) viewport: Viewport,
    pub(crate) caps: Capabilities,
}

impl Environment for StaticEnv {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn capabilities(&self) -> Capabilities {
        self.caps
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ListenerKind {
    PointerMove,
    Resize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ListenerId(u64);

/// Registry of live event subscriptions. Events are only delivered to a
/// subscriber while its id is registered here.
#[derive(Debug, Default)]
pub(crate) struct Listeners {
    next_id: u64,
    active: Vec<(ListenerId, ListenerKind)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, kind: ListenerKind) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.active.push((id, kind));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.active.len();
        self.active.retain(|(i, _)| *i != id);
        self.active.len() != before
    }

    pub(crate) fn is_live(&self, id: ListenerId) -> bool {
        self.active.iter().any(|(i, _)| *i == id)
    }

    #[cfg(test)]
    pub(crate) fn count(&self, kind: ListenerKind) -> usize {
        self.active.iter().filter(|(_, k)| *k == kind).count()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Everything the overlay borrows from its surroundings.
pub(crate) struct Host<E: Environment> {
    pub(crate) env: E,
    pub(crate) frames: FrameScheduler,
    pub(crate) listeners: Listeners,
}

impl<E: Environment> Host<E> {
    pub(crate) fn new(env: E, fps: u32) -> Self {
        Self {
            env,
            frames: FrameScheduler::new(fps),
            listeners: Listeners::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_primary_signals() {
        assert!(!Capabilities::fine().is_touch_primary());
        assert!(Capabilities::coarse().is_touch_primary());
        let points = Capabilities {
            max_touch_points: 5,
            ..Capabilities::default()
        };
        assert!(points.is_touch_primary());
        let media = Capabilities {
            coarse_pointer: true,
            ..Capabilities::default()
        };
        assert!(media.is_touch_primary());
    }

    #[test]
    fn test_viewport_px() {
        let v = Viewport { cols: 100, rows: 30 };
        let m = CellMetrics::default();
        assert_eq!(v.width_px(m), 900.0);
        assert_eq!(v.height_px(m), 540.0);
    }

    #[test]
    fn test_listeners_add_remove() {
        let mut l = Listeners::default();
        let a = l.add(ListenerKind::PointerMove);
        let b = l.add(ListenerKind::Resize);
        assert_ne!(a, b);
        assert_eq!(l.count(ListenerKind::PointerMove), 1);
        assert!(l.is_live(a));
        assert!(l.remove(a));
        assert!(!l.remove(a));
        assert!(!l.is_live(a));
        assert!(l.is_live(b));
        assert!(l.remove(b));
        assert!(l.is_empty());
    }
}
