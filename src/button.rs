//! Button input and press classification
//!
//! The classifier only sees a boolean "pressed" signal. Where that signal
//! comes from is decided once at startup by picking a [`ButtonInput`]
//! implementation; [`ButtonSource`] covers the usual "use this if present,
//! else that, else nothing" wiring.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;

/// Default hold time that turns a press into a long press
pub const DEFAULT_LONG_PRESS: Duration = Duration::from_millis(700);

/// Source of the raw "currently pressed" signal
///
/// Implementations never fail: an unreadable source reads as not pressed.
pub trait ButtonInput {
    fn is_pressed(&mut self) -> bool;
}

/// Absent input, never pressed
#[derive(Debug, Clone, Copy, Default)]
pub struct NoButton;

impl ButtonInput for NoButton {
    fn is_pressed(&mut self) -> bool {
        false
    }
}

/// Push button wired to ground with a pull-up
#[derive(Debug)]
pub struct ActiveLowPin<P> {
    pin: P,
}

impl<P: InputPin> ActiveLowPin<P> {
    pub const fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: InputPin> ButtonInput for ActiveLowPin<P> {
    fn is_pressed(&mut self) -> bool {
        self.pin.is_low().unwrap_or(false)
    }
}

/// Input read through a closure, e.g. a board's BOOTSEL probe
pub struct FnButton<F>(pub F);

impl<F: FnMut() -> bool> ButtonInput for FnButton<F> {
    fn is_pressed(&mut self) -> bool {
        (self.0)()
    }
}

/// Input resolved at startup from an ordered list of candidates
#[derive(Debug)]
pub enum ButtonSource<A, B> {
    Primary(A),
    Fallback(B),
    Absent,
}

impl<A, B> ButtonSource<A, B> {
    /// Pick the primary source if available, else the fallback
    pub fn select(primary: Option<A>, fallback: Option<B>) -> Self {
        match (primary, fallback) {
            (Some(primary), _) => Self::Primary(primary),
            (None, Some(fallback)) => Self::Fallback(fallback),
            (None, None) => Self::Absent,
        }
    }

    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl<A: ButtonInput, B: ButtonInput> ButtonInput for ButtonSource<A, B> {
    fn is_pressed(&mut self) -> bool {
        match self {
            Self::Primary(input) => input.is_pressed(),
            Self::Fallback(input) => input.is_pressed(),
            Self::Absent => false,
        }
    }
}

/// Classified press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Short,
    Long,
}

/// Debounce state of the button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub is_down: bool,
    pub press_start: Option<Instant>,
}

/// Turns press/release edges into short and long presses
#[derive(Debug, Clone)]
pub struct ButtonClassifier {
    long_press: Duration,
    state: ButtonState,
}

impl ButtonClassifier {
    pub const fn new(long_press: Duration) -> Self {
        Self {
            long_press,
            state: ButtonState {
                is_down: false,
                press_start: None,
            },
        }
    }

    pub const fn state(&self) -> ButtonState {
        self.state
    }

    /// Feed one sample of the input
    ///
    /// Emits an event on release only.
    pub fn poll(&mut self, pressed: bool, now: Instant) -> Option<ButtonEvent> {
        match (pressed, self.state.is_down) {
            (true, false) => {
                self.state = ButtonState {
                    is_down: true,
                    press_start: Some(now),
                };
                None
            }
            (false, true) => {
                let start = self.state.press_start.unwrap_or(now);
                let held = now.saturating_duration_since(start);
                self.state = ButtonState::default();
                if held >= self.long_press {
                    Some(ButtonEvent::Long)
                } else {
                    Some(ButtonEvent::Short)
                }
            }
            _ => None,
        }
    }
}

impl Default for ButtonClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_LONG_PRESS)
    }
}
