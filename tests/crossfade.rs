mod tests {
    use embassy_time::Duration;
    use myrtio_storm_composer::{
        HALLOWEEN_PALETTE, PaletteCrossfade, Rgb,
    };

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
    const RED_GREEN: [Rgb; 2] = [RED, GREEN];
    const EMPTY: [Rgb; 0] = [];

    #[test]
    fn test_two_pixels_at_start() {
        let fade = PaletteCrossfade::new(&RED_GREEN, Duration::from_millis(1_000), 1.0);
        let mut leds = [Rgb::default(); 2];
        fade.render(0.0, &mut leds);
        assert_eq!(leds, [RED, GREEN]);
    }

    #[test]
    fn test_midpoint_blends_evenly() {
        let fade = PaletteCrossfade::new(&RED_GREEN, Duration::from_millis(1_000), 1.0);
        let color = fade.color_at(500.0, 0, 1).unwrap();
        assert_eq!(color, Rgb { r: 127, g: 127, b: 0 });
    }

    #[test]
    fn test_palette_entries_are_exact() {
        let fade = PaletteCrossfade::new(&HALLOWEEN_PALETTE, Duration::from_millis(30_000), 1.0);
        for (i, expected) in HALLOWEEN_PALETTE.iter().enumerate() {
            let warped = i as f64 * 30_000.0;
            assert_eq!(fade.color_at(warped, 0, 50), Some(*expected));
        }
    }

    #[test]
    fn test_wraps_around_cycle() {
        let fade = PaletteCrossfade::new(&HALLOWEEN_PALETTE, Duration::from_millis(1_000), 0.28);
        let cycle = 12_000.0;
        for warped in [0.0, 123.0, 4_567.0, 11_999.0] {
            let mut a = [Rgb::default(); 2];
            let mut b = [Rgb::default(); 2];
            fade.render(warped, &mut a);
            fade.render(warped + cycle, &mut b);
            assert_eq!(a, b, "mismatch at {warped}");
        }
    }

    #[test]
    fn test_last_entry_fades_into_first() {
        let fade = PaletteCrossfade::new(&RED_GREEN, Duration::from_millis(1_000), 1.0);
        assert_eq!(fade.color_at(1_000.0, 0, 1), Some(GREEN));
        assert_eq!(fade.color_at(2_000.0, 0, 1), Some(RED));
        let late = fade.color_at(1_900.0, 0, 1).unwrap();
        assert!(late.r > 240 && late.g < 15);
    }

    #[test]
    fn test_brightness_scales_output() {
        let fade = PaletteCrossfade::new(&RED_GREEN, Duration::from_millis(1_000), 0.5);
        assert_eq!(fade.color_at(0.0, 0, 1), Some(Rgb { r: 127, g: 0, b: 0 }));

        let off = PaletteCrossfade::new(&RED_GREEN, Duration::from_millis(1_000), 0.0);
        assert_eq!(off.color_at(0.0, 0, 1), Some(Rgb::default()));
    }

    #[test]
    fn test_empty_palette_leaves_buffer() {
        let fade = PaletteCrossfade::new(&EMPTY, Duration::from_millis(1_000), 1.0);
        let mut leds = [GREEN; 3];
        fade.render(250.0, &mut leds);
        assert_eq!(leds, [GREEN; 3]);
        assert_eq!(fade.color_at(250.0, 0, 3), None);
    }

    #[test]
    fn test_single_led_has_no_offset() {
        let fade = PaletteCrossfade::new(&RED_GREEN, Duration::from_millis(1_000), 1.0);
        let mut leds = [Rgb::default(); 1];
        fade.render(0.0, &mut leds);
        assert_eq!(leds, [RED]);
    }
}
