mod tests {
    use embassy_time::Duration;
    use myrtio_storm_composer::{ConfigError, Span, StormConfig};

    const CAPACITY: usize = 64;

    #[test]
    fn test_defaults_are_valid() {
        let config = StormConfig::default();
        assert_eq!(config.validate(CAPACITY), Ok(()));
        assert_eq!(config.led_count, 50);
        assert_eq!(config.frame_duration(), Duration::from_millis(16));
        assert_eq!(config.palette.len(), 12);
        assert_eq!(config.lightning.post_flicker_decay(), Duration::from_millis(84));
    }

    #[test]
    fn test_led_count_limits() {
        let mut config = StormConfig::default();
        config.led_count = 0;
        assert_eq!(config.validate(CAPACITY), Err(ConfigError::NoLeds));

        config.led_count = 65;
        assert_eq!(
            config.validate(CAPACITY),
            Err(ConfigError::TooManyLeds { requested: 65, capacity: 64 })
        );
    }

    #[test]
    fn test_warp_depth_must_stay_below_one() {
        let mut config = StormConfig::default();
        config.warp.depth = 1.0;
        assert_eq!(config.validate(CAPACITY), Err(ConfigError::WarpDepthOutOfRange));

        config.warp.depth = 0.0;
        assert_eq!(config.validate(CAPACITY), Ok(()));
    }

    #[test]
    fn test_zero_durations_rejected() {
        let mut config = StormConfig::default();
        config.fade = Duration::from_millis(0);
        assert_eq!(config.validate(CAPACITY), Err(ConfigError::ZeroFade));

        let mut config = StormConfig::default();
        config.fps = 0;
        assert_eq!(config.validate(CAPACITY), Err(ConfigError::ZeroFrameRate));

        let mut config = StormConfig::default();
        config.lightning.decay = Duration::from_millis(1);
        assert_eq!(config.validate(CAPACITY), Err(ConfigError::ZeroDecay));
    }

    #[test]
    fn test_lightning_ranges() {
        let mut config = StormConfig::default();
        config.lightning.flash_count = Span::new(5, 2);
        assert_eq!(
            config.validate(CAPACITY),
            Err(ConfigError::InvalidRange("flash count"))
        );

        let mut config = StormConfig::default();
        config.lightning.flash_count = Span::new(2, 8);
        assert_eq!(
            config.validate(CAPACITY),
            Err(ConfigError::TooManyFlashes { max: 7 })
        );

        let mut config = StormConfig::default();
        config.lightning.gap_ms = Span::new(10, 200);
        assert_eq!(config.validate(CAPACITY), Err(ConfigError::NegativeSpacing));

        let mut config = StormConfig::default();
        config.lightning.post_flicker_probability = 1.5;
        assert_eq!(
            config.validate(CAPACITY),
            Err(ConfigError::ProbabilityOutOfRange)
        );
    }

    #[test]
    fn test_error_messages() {
        let error = ConfigError::TooManyLeds { requested: 65, capacity: 64 };
        assert_eq!(
            error.to_string(),
            "65 LEDs requested but the frame buffer holds 64"
        );
        assert_eq!(
            ConfigError::InvalidRange("flash gap").to_string(),
            "flash gap range is empty or inverted"
        );
    }
}
