use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{ALL_METHODS, noise};
use crate::operations::{
    Ola, TimeScaleModification, Tsm, TsmConfig, TsmMethod, Wsola, rectangular, reconstruct,
    segment,
};

#[test]
fn test_engines_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Tsm<f32>>();
    assert_send_sync::<Tsm<f64>>();
}

#[test]
fn test_all_zero_input_stays_finite_for_every_method() {
    let signal = vec![0.0f64; 2048];
    for method in ALL_METHODS {
        for &speed in &[0.5, 1.0, 1.7] {
            let output = Tsm::new(method, &TsmConfig::new(128, speed))
                .unwrap()
                .run(&signal)
                .unwrap();
            assert!(
                output.iter().all(|x| x.is_finite()),
                "{method} at speed {speed} produced non-finite samples"
            );
        }
    }
}

#[test]
fn test_every_method_is_deterministic() {
    let signal = noise(6000, 11);
    let config = TsmConfig::new(256, 1.3);
    for method in ALL_METHODS {
        let engine = Tsm::new(method, &config).unwrap();
        let first = engine.run(&signal).unwrap();
        let second = Tsm::new(method, &config).unwrap().run(&signal).unwrap();
        assert_eq!(
            first.iter().map(|x| x.to_bits()).collect::<Vec<_>>(),
            second.iter().map(|x| x.to_bits()).collect::<Vec<_>>(),
            "{method} is not deterministic"
        );
    }
}

#[test]
fn test_ola_length_follows_effective_speed_for_random_setups() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let frame_size = [64usize, 128, 256][rng.random_range(0..3)];
        let len = rng.random_range(frame_size..6000);
        let speed = rng.random_range(0.5..2.0);
        let signal = noise(len, rng.random());

        let ola = Ola::new(&TsmConfig::new(frame_size, speed)).unwrap();
        let expected = len as f64 / ola.hop_sizes().effective_speed();
        let output = ola.run(&signal).unwrap();
        assert!(
            (output.len() as f64 - expected).abs() <= frame_size as f64,
            "frame {frame_size} len {len} speed {speed}: got {} expected ~{expected}",
            output.len()
        );
    }
}

#[test]
fn test_wsola_output_is_bounded_for_random_input() {
    // Windowed sums of samples in [-1, 1) divided by the mean overlap gain
    // cannot exceed the peak overlap gain ratio.
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let speed = rng.random_range(0.5..2.0);
        let signal = noise(rng.random_range(1000..8000), rng.random());
        let output = Wsola::new(&TsmConfig::new(128, speed))
            .unwrap()
            .run(&signal)
            .unwrap();
        assert!(!output.is_empty());
        assert!(output.iter().all(|x| x.is_finite() && x.abs() <= 1.5));
    }
}

#[test]
fn test_rectangular_round_trip_for_random_signals() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..100 {
        let frame_size = rng.random_range(1..64usize);
        let len = rng.random_range(frame_size..500);
        let signal = noise(len, rng.random());

        let mut frames = segment(&signal, frame_size, frame_size).unwrap();
        frames.apply_window(&rectangular(frame_size)).unwrap();
        let rebuilt = reconstruct(&frames, frame_size).unwrap();

        assert!(rebuilt.len() >= len);
        assert_eq!(&rebuilt[..len], &signal[..]);
        assert!(rebuilt[len..].iter().all(|&x| x == 0.0));
    }
}

#[test]
fn test_method_labels() {
    let labels: Vec<String> = ALL_METHODS.iter().map(TsmMethod::to_string).collect();
    assert_eq!(labels, ["OLA", "WSOLA", "PV", "HPS"]);
}
