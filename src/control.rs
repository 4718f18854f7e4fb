//! Control signals for the frame loop
//!
//! Interrupt handlers, a UI thread or a Ctrl-C hook post signals here and the
//! frame scheduler drains them once per frame. The queue is a fixed-size
//! `heapless::Deque` guarded by a critical section.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// Request posted to the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Start a lightning burst now
    TriggerLightning,
    /// Blank the strip and leave the loop
    Shutdown,
}

/// Returned when the queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError(pub ControlSignal);

/// Bounded queue of control signals
pub struct ControlChannel<const SIZE: usize> {
    queue: Mutex<RefCell<Deque<ControlSignal, SIZE>>>,
}

impl<const SIZE: usize> ControlChannel<SIZE> {
    pub const fn new() -> Self {
        Self {
            queue: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub const fn sender(&self) -> ControlSender<'_, SIZE> {
        ControlSender { channel: self }
    }

    pub const fn receiver(&self) -> ControlReceiver<'_, SIZE> {
        ControlReceiver { channel: self }
    }

    pub fn try_send(&self, signal: ControlSignal) -> Result<(), TrySendError> {
        critical_section::with(|cs| {
            let mut queue = self.queue.borrow(cs).borrow_mut();
            queue.push_back(signal).map_err(TrySendError)
        })
    }

    pub fn try_receive(&self) -> Option<ControlSignal> {
        critical_section::with(|cs| self.queue.borrow(cs).borrow_mut().pop_front())
    }
}

impl<const SIZE: usize> Default for ControlChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Posting end of a [`ControlChannel`]
#[derive(Clone, Copy)]
pub struct ControlSender<'a, const SIZE: usize> {
    channel: &'a ControlChannel<SIZE>,
}

impl<const SIZE: usize> ControlSender<'_, SIZE> {
    pub fn try_send(&self, signal: ControlSignal) -> Result<(), TrySendError> {
        self.channel.try_send(signal)
    }

    pub fn trigger_lightning(&self) -> Result<(), TrySendError> {
        self.try_send(ControlSignal::TriggerLightning)
    }

    pub fn shutdown(&self) -> Result<(), TrySendError> {
        self.try_send(ControlSignal::Shutdown)
    }
}

/// Draining end of a [`ControlChannel`]
#[derive(Clone, Copy)]
pub struct ControlReceiver<'a, const SIZE: usize> {
    channel: &'a ControlChannel<SIZE>,
}

impl<const SIZE: usize> ControlReceiver<'_, SIZE> {
    pub fn try_receive(&self) -> Option<ControlSignal> {
        self.channel.try_receive()
    }
}
