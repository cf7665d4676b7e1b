//! Explicit event registration.
//!
//! Handlers are keyed by target and kind and receive the owning widget state
//! as an explicit `&mut W`. The registry only routes; it never interprets
//! what an event means for the board.

use crate::error::Result;
use crate::point::Point;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    MouseOver,
    MouseOut,
    TouchEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// A single intersection's hit target
    Intersection(Point),
    /// Wildcard matching every intersection
    AnyIntersection,
    /// An icon, by name
    Icon(String),
}

/// What a handler is told about the event it runs for
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub target: EventTarget,
}

impl Event {
    /// The intersection the event happened on, if any
    pub fn point(&self) -> Option<Point> {
        match self.target {
            EventTarget::Intersection(pt) => Some(pt),
            _ => None,
        }
    }
}

type Handler<W> = Box<dyn Fn(&mut W, &Event) -> Result<()>>;

pub struct EventRegistry<W> {
    handlers: HashMap<(EventTarget, EventKind), Vec<Handler<W>>>,
}

impl<W> Default for EventRegistry<W> {
    fn default() -> Self {
        Self { handlers: HashMap::new() }
    }
}

impl<W> EventRegistry<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Several handlers on the same key run in
    /// registration order.
    pub fn on_event<F>(&mut self, target: EventTarget, kind: EventKind, handler: F)
    where
        F: Fn(&mut W, &Event) -> Result<()> + 'static,
    {
        self.handlers.entry((target, kind)).or_default().push(Box::new(handler));
    }

    /// Drop every handler for the key
    pub fn off(&mut self, target: &EventTarget, kind: EventKind) {
        self.handlers.remove(&(target.clone(), kind));
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run the handlers for an event: exact target first, then the
    /// `AnyIntersection` wildcard for intersection targets. Returns whether
    /// any handler ran. The first handler error stops dispatch.
    pub fn dispatch(&self, widget: &mut W, target: EventTarget, kind: EventKind) -> Result<bool> {
        let event = Event { kind, target };
        let mut ran = false;
        let mut keys = vec![(event.target.clone(), kind)];
        if matches!(event.target, EventTarget::Intersection(_)) {
            keys.push((EventTarget::AnyIntersection, kind));
        }
        for key in keys {
            if let Some(handlers) = self.handlers.get(&key) {
                for h in handlers {
                    h(widget, &event)?;
                    ran = true;
                }
            }
        }
        Ok(ran)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[derive(Default)]
    struct Widget {
        clicks: Vec<Point>,
        icon_hits: usize,
    }

    #[test]
    fn exact_then_wildcard() {
        let mut reg = EventRegistry::<Widget>::new();
        reg.on_event(EventTarget::Intersection(Point::new(1, 1)), EventKind::Click, |w, _| {
            w.icon_hits += 100;
            Ok(())
        });
        reg.on_event(EventTarget::AnyIntersection, EventKind::Click, |w, e| {
            w.clicks.extend(e.point());
            Ok(())
        });

        let mut w = Widget::default();
        assert!(reg.dispatch(&mut w, EventTarget::Intersection(Point::new(1, 1)), EventKind::Click).unwrap());
        assert!(reg.dispatch(&mut w, EventTarget::Intersection(Point::new(2, 2)), EventKind::Click).unwrap());
        assert_eq!(w.clicks, vec![Point::new(1, 1), Point::new(2, 2)]);
        assert_eq!(w.icon_hits, 100);
    }

    #[test]
    fn unmatched_events_report_false() {
        let mut reg = EventRegistry::<Widget>::new();
        reg.on_event(EventTarget::Icon("undo".into()), EventKind::Click, |w, _| {
            w.icon_hits += 1;
            Ok(())
        });
        let mut w = Widget::default();
        assert!(!reg.dispatch(&mut w, EventTarget::Icon("redo".into()), EventKind::Click).unwrap());
        assert!(!reg.dispatch(&mut w, EventTarget::Icon("undo".into()), EventKind::MouseOver).unwrap());
        assert!(reg.dispatch(&mut w, EventTarget::Icon("undo".into()), EventKind::Click).unwrap());
        assert_eq!(w.icon_hits, 1);

        reg.off(&EventTarget::Icon("undo".into()), EventKind::Click);
        assert!(reg.is_empty());
    }

    #[test]
    fn handler_errors_propagate() {
        let mut reg = EventRegistry::<Widget>::new();
        reg.on_event(EventTarget::AnyIntersection, EventKind::MouseOut, |_, _| Err(Error::NotDrawn));
        let mut w = Widget::default();
        let res = reg.dispatch(&mut w, EventTarget::Intersection(Point::new(0, 0)), EventKind::MouseOut);
        assert_eq!(res, Err(Error::NotDrawn));
    }
}
