mod tests {
    use core::cell::Cell;

    use embassy_time::{Duration, Instant};
    use embedded_hal::digital::{Error, ErrorKind, ErrorType, InputPin};
    use myrtio_storm_composer::button::{
        ActiveLowPin, ButtonClassifier, ButtonEvent, ButtonInput, ButtonSource, FnButton,
        NoButton,
    };

    #[derive(Debug)]
    struct PinError;

    impl Error for PinError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    struct MockPin {
        low: bool,
        broken: bool,
    }

    impl ErrorType for MockPin {
        type Error = PinError;
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, PinError> {
            if self.broken { Err(PinError) } else { Ok(!self.low) }
        }

        fn is_low(&mut self) -> Result<bool, PinError> {
            if self.broken { Err(PinError) } else { Ok(self.low) }
        }
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn test_short_press() {
        let mut classifier = ButtonClassifier::default();
        assert_eq!(classifier.poll(true, at(0)), None);
        assert_eq!(classifier.poll(true, at(250)), None);
        assert_eq!(classifier.poll(false, at(500)), Some(ButtonEvent::Short));
        assert!(!classifier.state().is_down);
    }

    #[test]
    fn test_long_press() {
        let mut classifier = ButtonClassifier::default();
        assert_eq!(classifier.poll(true, at(100)), None);
        assert_eq!(classifier.poll(false, at(1_000)), Some(ButtonEvent::Long));
    }

    #[test]
    fn test_threshold_is_long() {
        let mut classifier = ButtonClassifier::new(Duration::from_millis(700));
        classifier.poll(true, at(0));
        assert_eq!(classifier.poll(false, at(700)), Some(ButtonEvent::Long));

        classifier.poll(true, at(1_000));
        assert_eq!(classifier.poll(false, at(1_699)), Some(ButtonEvent::Short));
    }

    #[test]
    fn test_no_transition_no_event() {
        let mut classifier = ButtonClassifier::default();
        assert_eq!(classifier.poll(false, at(0)), None);
        assert_eq!(classifier.poll(false, at(10)), None);

        classifier.poll(true, at(20));
        let state = classifier.state();
        assert!(state.is_down);
        assert_eq!(state.press_start, Some(at(20)));
        assert_eq!(classifier.poll(true, at(5_000)), None);
        assert_eq!(classifier.state().press_start, Some(at(20)));
    }

    #[test]
    fn test_active_low_pin() {
        let mut pressed = ActiveLowPin::new(MockPin { low: true, broken: false });
        let mut released = ActiveLowPin::new(MockPin { low: false, broken: false });
        assert!(pressed.is_pressed());
        assert!(!released.is_pressed());
    }

    #[test]
    fn test_unreadable_pin_is_not_pressed() {
        let mut broken = ActiveLowPin::new(MockPin { low: true, broken: true });
        assert!(!broken.is_pressed());
    }

    #[test]
    fn test_fn_button() {
        let level = Cell::new(false);
        let mut button = FnButton(|| level.get());
        assert!(!button.is_pressed());
        level.set(true);
        assert!(button.is_pressed());
    }

    #[test]
    fn test_source_selection_order() {
        let primary = Some(FnButton(|| true));
        let fallback = Some(ActiveLowPin::new(MockPin { low: false, broken: false }));
        let mut source = ButtonSource::select(primary, fallback);
        assert!(matches!(source, ButtonSource::Primary(_)));
        assert!(source.is_pressed());

        let pin = ActiveLowPin::new(MockPin { low: true, broken: false });
        let mut source = ButtonSource::<NoButton, _>::select(None, Some(pin));
        assert!(matches!(source, ButtonSource::Fallback(_)));
        assert!(source.is_pressed());

        let mut source = ButtonSource::<NoButton, NoButton>::select(None, None);
        assert!(source.is_absent());
        assert!(!source.is_pressed());
    }
}
