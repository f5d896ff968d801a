mod test_signals;

use cafsurf::CafError;
use cafsurf::caf::{ExecutionStrategy, create_builder, locate_peak};
use cafsurf::signal_processing::{FrequencySweep, cross_correlate, doppler_shift};

const SAMPLE_RATE: f64 = 48000.0;

fn strategies() -> [ExecutionStrategy; 3] {
    [
        ExecutionStrategy::Sequential,
        ExecutionStrategy::Rayon,
        ExecutionStrategy::Threads,
    ]
}

#[test]
fn test_surface_shape_is_sweep_by_twice_needle() {
    let needle = test_signals::generate_test_chirp(300, SAMPLE_RATE, 2000.0);
    let haystack = test_signals::delayed_shifted_copy(&needle[..280], 20, 0, 10.0, SAMPLE_RATE);
    let sweep = FrequencySweep::arange(-20.0, 20.0, 2.5).unwrap();

    for strategy in strategies() {
        let surface = create_builder(strategy, Some(3))
            .build(&needle, &haystack, &sweep, SAMPLE_RATE)
            .unwrap();
        assert_eq!(surface.rows(), 16, "{:?}", strategy);
        assert_eq!(surface.cols(), 600, "{:?}", strategy);
    }
}

#[test]
fn test_all_strategies_agree_bit_for_bit() {
    let needle = test_signals::generate_test_chirp(512, SAMPLE_RATE, 4000.0);
    let haystack = test_signals::delayed_shifted_copy(&needle[..470], 42, 0, -31.0, SAMPLE_RATE);
    let sweep = FrequencySweep::arange(-50.0, 50.0, 1.0).unwrap();

    let reference = create_builder(ExecutionStrategy::Sequential, None)
        .build(&needle, &haystack, &sweep, SAMPLE_RATE)
        .unwrap();

    for strategy in [ExecutionStrategy::Rayon, ExecutionStrategy::Threads] {
        for workers in [None, Some(1), Some(4), Some(13)] {
            let surface = create_builder(strategy, workers)
                .build(&needle, &haystack, &sweep, SAMPLE_RATE)
                .unwrap();
            assert_eq!(surface, reference, "{:?}/{:?} workers", strategy, workers);
        }
    }
}

#[test]
fn test_each_row_is_shift_then_correlate() {
    let needle = test_signals::generate_test_chirp(128, SAMPLE_RATE, 1000.0);
    let haystack = test_signals::delayed_shifted_copy(&needle[..120], 8, 0, 5.0, SAMPLE_RATE);
    let sweep = FrequencySweep::from_values(vec![-5.0, 0.0, 5.0, 12.5]).unwrap();

    let surface = create_builder(ExecutionStrategy::Threads, Some(2))
        .build(&needle, &haystack, &sweep, SAMPLE_RATE)
        .unwrap();

    for (k, freq) in sweep.iter().enumerate() {
        let shifted = doppler_shift(&needle, freq, SAMPLE_RATE);
        let expected = cross_correlate(&shifted, &haystack).unwrap();
        assert_eq!(surface.row(k), &expected[..], "row {}", k);
    }
}

#[test]
fn test_peak_sits_at_injected_offsets() {
    let n = 1024;
    let needle = test_signals::generate_test_chirp(n, SAMPLE_RATE, 3000.0);
    let haystack = test_signals::delayed_shifted_copy(&needle[..n - 33], 33, 0, 24.0, SAMPLE_RATE);
    let sweep = FrequencySweep::arange(-40.0, 40.0, 2.0).unwrap();

    let surface = create_builder(ExecutionStrategy::Rayon, None)
        .build(&needle, &haystack, &sweep, SAMPLE_RATE)
        .unwrap();
    let peak = locate_peak(&surface);

    assert!(peak.is_detection());
    assert_eq!(sweep[peak.row], 24.0);
    assert_eq!(peak.col, n - 33);
}

#[test]
fn test_mismatched_lengths_are_errors_for_every_strategy() {
    let needle = test_signals::generate_test_chirp(10, SAMPLE_RATE, 0.0);
    let haystack = test_signals::generate_test_chirp(11, SAMPLE_RATE, 0.0);
    let sweep = FrequencySweep::arange(-1.0, 1.0, 0.5).unwrap();

    for strategy in strategies() {
        let builder = create_builder(strategy, Some(2));
        let result = builder.build(&needle, &haystack, &sweep, SAMPLE_RATE);
        assert!(
            matches!(
                result,
                Err(CafError::ShapeMismatch {
                    needle: 10,
                    haystack: 11
                })
            ),
            "{:?}",
            strategy
        );
    }
}

#[test]
fn test_degenerate_inputs_give_empty_surfaces() {
    let needle = test_signals::generate_test_chirp(16, SAMPLE_RATE, 0.0);
    let empty_sweep = FrequencySweep::arange(5.0, 5.0, 1.0).unwrap();
    let sweep = FrequencySweep::arange(0.0, 3.0, 1.0).unwrap();

    for strategy in strategies() {
        let builder = create_builder(strategy, None);

        let surface = builder
            .build(&needle, &needle, &empty_sweep, SAMPLE_RATE)
            .unwrap();
        assert_eq!(surface.rows(), 0);
        assert!(!locate_peak(&surface).is_detection());

        let surface = builder.build(&[], &[], &sweep, SAMPLE_RATE).unwrap();
        assert_eq!(surface.rows(), 3);
        assert_eq!(surface.cols(), 0);
        assert!(!locate_peak(&surface).is_detection());
    }
}
