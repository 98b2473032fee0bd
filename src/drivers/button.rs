//! Push-button line shared between the edge ISR and the debounce machine.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up: a high level means released.
//! The line interrupts on both edges; [`ButtonLine::on_edge`] is the ISR
//! body and only stores single-word flags.

use core::sync::atomic::{AtomicBool, Ordering};

pub struct ButtonLine {
    pressed: AtomicBool,
    raw_high: AtomicBool,
    pending: AtomicBool,
    irq_enabled: AtomicBool,
}

impl ButtonLine {
    pub const fn new() -> Self {
        Self {
            pressed: AtomicBool::new(false),
            raw_high: AtomicBool::new(true),
            pending: AtomicBool::new(false),
            irq_enabled: AtomicBool::new(false),
        }
    }

    /// Configure the line: released, nothing pending, interrupts armed.
    pub fn init(&self) {
        self.pressed.store(false, Ordering::Release);
        self.raw_high.store(true, Ordering::Release);
        self.pending.store(false, Ordering::Release);
        self.irq_enabled.store(true, Ordering::Release);
    }

    /// Edge ISR.  `level_high` is the line level sampled after the edge.
    /// Ignored while interrupts are disabled.
    pub fn on_edge(&self, level_high: bool) {
        if !self.irq_enabled.load(Ordering::Acquire) {
            return;
        }
        self.raw_high.store(level_high, Ordering::Release);
        self.pressed.store(!level_high, Ordering::Release);
        self.pending.store(true, Ordering::Release);
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::Acquire)
    }

    pub fn set_pressed(&self, pressed: bool) {
        self.pressed.store(pressed, Ordering::Release);
    }

    pub fn raw_high(&self) -> bool {
        self.raw_high.load(Ordering::Acquire)
    }

    pub fn pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    pub fn clear_pending(&self) {
        self.pending.store(false, Ordering::Release);
    }

    pub fn disable_interrupts(&self) {
        self.irq_enabled.store(false, Ordering::Release);
    }

    pub fn interrupts_enabled(&self) -> bool {
        self.irq_enabled.load(Ordering::Acquire)
    }
}

impl Default for ButtonLine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_ignored_until_init() {
        let line = ButtonLine::new();
        line.on_edge(false);
        assert!(!line.is_pressed());
        assert!(!line.pending());
    }

    #[test]
    fn falling_edge_is_a_press() {
        let line = ButtonLine::new();
        line.init();
        line.on_edge(false);
        assert!(line.is_pressed());
        assert!(!line.raw_high());
        assert!(line.pending());

        line.clear_pending();
        line.on_edge(true);
        assert!(!line.is_pressed());
        assert!(line.raw_high());
    }

    #[test]
    fn disabled_line_keeps_last_state() {
        let line = ButtonLine::new();
        line.init();
        line.on_edge(false);
        line.disable_interrupts();
        line.on_edge(true);
        assert!(line.is_pressed());
        assert!(!line.interrupts_enabled());
    }
}
