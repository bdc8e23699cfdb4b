//! A tiny element model for the theme slider: inline style plus event
//! listeners, and the slide animation wired on top of it.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

pub const SLIDE_DURATION: Duration = Duration::from_secs(1);
/// How far the knob travels, in percent of the track.
pub const SLIDE_OFFSET: f32 = 85.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    AnimationEnd,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslateX(pub f32);

impl TranslateX {
    pub fn is_identity(self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for TranslateX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translateX({}%)", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slide {
    Right,
    Left,
}

impl Slide {
    pub fn name(self) -> &'static str {
        match self {
            Slide::Right => "slideRight",
            Slide::Left => "slideLeft",
        }
    }

    /// Knob offset at `progress` (0.0 to 1.0) through the slide.
    pub fn offset_at(self, progress: f32) -> f32 {
        let progress = progress.clamp(0.0, 1.0);
        match self {
            Slide::Right => SLIDE_OFFSET * progress,
            Slide::Left => SLIDE_OFFSET * (1.0 - progress),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub slide: Slide,
    pub duration: Duration,
    pub started_at: Instant,
}

impl Animation {
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.duration
    }
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}s ease", self.slide.name(), self.duration.as_secs_f32())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    pub transform: Option<TranslateX>,
    pub animation: Option<Animation>,
}

type Handler = Rc<RefCell<dyn FnMut()>>;

struct Listener {
    kind: EventKind,
    once: bool,
    handler: Handler,
}

#[derive(Default)]
pub struct Element {
    pub style: InlineStyle,
    listeners: Vec<Listener>,
}

pub type ElementRef = Rc<RefCell<Element>>;

impl Element {
    pub fn new_ref() -> ElementRef {
        Rc::new(RefCell::new(Element::default()))
    }

    /// `None` stands for the computed value `none`.
    pub fn computed_transform(&self) -> Option<TranslateX> {
        self.style.transform
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|l| l.kind == kind).count()
    }

    pub fn add_listener(&mut self, kind: EventKind, once: bool, handler: impl FnMut() + 'static) {
        self.listeners.push(Listener {
            kind,
            once,
            handler: Rc::new(RefCell::new(handler)),
        });
    }
}

/// Runs every listener for `kind`, dropping the one-shot ones.
pub fn dispatch(element: &ElementRef, kind: EventKind) {
    let handlers: Vec<Handler> = {
        let mut element = element.borrow_mut();
        let handlers = element
            .listeners
            .iter()
            .filter(|listener| listener.kind == kind)
            .map(|listener| Rc::clone(&listener.handler))
            .collect();
        element
            .listeners
            .retain(|listener| !(listener.kind == kind && listener.once));
        handlers
    };
    for handler in handlers {
        (handler.borrow_mut())();
    }
}

/// Makes clicks on `toggle` slide `target` back and forth.
pub fn set_animation(toggle: &ElementRef, target: &ElementRef) {
    let target: Weak<RefCell<Element>> = Rc::downgrade(target);
    toggle
        .borrow_mut()
        .add_listener(EventKind::Click, false, move || {
            if let Some(target) = target.upgrade() {
                slide(&target, Instant::now());
            }
        });
}

fn slide(target: &ElementRef, now: Instant) {
    let at_start = target
        .borrow()
        .computed_transform()
        .map_or(true, TranslateX::is_identity);
    let (transform, slide) = if at_start {
        (TranslateX(SLIDE_OFFSET), Slide::Right)
    } else {
        (TranslateX(0.0), Slide::Left)
    };

    let weak = Rc::downgrade(target);
    let mut element = target.borrow_mut();
    element.style.transform = Some(transform);
    element.style.animation = Some(Animation {
        slide,
        duration: SLIDE_DURATION,
        started_at: now,
    });
    element.add_listener(EventKind::AnimationEnd, true, move || {
        if let Some(target) = weak.upgrade() {
            target.borrow_mut().style.animation = None;
        }
    });
}

/// Fires `animationend` on `target` once its animation has run its course.
pub fn finish_if_elapsed(target: &ElementRef, now: Instant) -> bool {
    let finished = target
        .borrow()
        .style
        .animation
        .is_some_and(|animation| animation.is_finished(now));
    if finished {
        dispatch(target, EventKind::AnimationEnd);
    }
    finished
}
