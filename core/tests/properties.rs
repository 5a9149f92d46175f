use approx::assert_abs_diff_eq;
use linescan::{Channel, Feature, KernelKind, LineScan, Lut, ScanError, SourceHandle};
use proptest::prelude::*;

fn profile() -> LineScan {
    let samples = [12.0, 40.0, 87.0, 140.0, 201.0, 233.0, 190.0, 120.0, 64.0, 30.0, 18.0, 25.0];
    LineScan::builder(samples)
        .coordinates((0..samples.len()).map(|i| (10.0 + i as f64, 4.0)))
        .source(SourceHandle::new(String::from("frame-42")))
        .endpoints((10.0, 4.0), (21.0, 4.0))
        .row(4)
        .channel(Channel::Gray)
        .build()
        .unwrap()
}

fn byte_samples(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..max_len)
}

fn max_of(scan: &LineScan) -> f64 {
    scan.iter().cloned().fold(f64::MIN, f64::max)
}

fn min_of(scan: &LineScan) -> f64 {
    scan.iter().cloned().fold(f64::MAX, f64::min)
}

/// Every reported feature must beat the other samples of its own window by `delta`.
fn assert_dominates(samples: &[f64], features: &[Feature], window: usize, delta: f64, sign: f64) {
    let width = window / 2;
    let mut previous = None;
    for feature in features {
        let p = feature.index;
        assert_eq!(samples[p], feature.value);
        assert!(previous.map_or(true, |prev| prev < p));
        previous = Some(p);

        let rivals: Vec<f64> = (p.saturating_sub(width)..(p + width).min(samples.len()))
            .filter(|&j| j != p)
            .map(|j| sign * samples[j])
            .collect();
        assert!(!rivals.is_empty());
        assert!(rivals.iter().all(|&r| sign * feature.value - r >= delta));
    }
}

proptest! {
    #[test]
    fn invert_is_self_inverse(samples in byte_samples(64), max in 0u8..=255) {
        let scan = LineScan::new(samples);
        let max = f64::from(max);
        let twice = scan.invert(max).unwrap().invert(max).unwrap();
        prop_assert_eq!(twice, scan);
    }

    #[test]
    fn normalize_yields_unit_maximum(samples in prop::collection::vec(0.0f64..1.0e6, 1..64)) {
        let scan = LineScan::new(samples);
        prop_assume!(max_of(&scan) > 0.0);
        prop_assert_eq!(max_of(&scan.normalize().unwrap()), 1.0);
    }

    #[test]
    fn scale_hits_both_ends_of_target_range(
        samples in prop::collection::vec(-1000i32..1000, 2..64),
        low in -100.0f64..100.0,
        span in 0.001f64..100.0,
    ) {
        let scan = LineScan::new(samples);
        prop_assume!(max_of(&scan) > min_of(&scan));
        let high = low + span;
        let scaled = scan.scale((low, high)).unwrap();
        prop_assert_eq!(min_of(&scaled), low);
        prop_assert_eq!(max_of(&scaled), high);
    }

    #[test]
    fn identity_lut_leaves_byte_samples_unchanged(samples in byte_samples(64)) {
        let scan = LineScan::new(samples);
        prop_assert!(scan.apply_lut(&Lut::identity()).unwrap().sample_eq(&scan));
    }

    #[test]
    fn filters_preserve_length(samples in byte_samples(48), size in 0usize..12, degree in 1usize..12) {
        let scan = LineScan::new(samples);
        prop_assert_eq!(scan.median(size).unwrap().len(), scan.len());
        prop_assert_eq!(scan.smooth(degree).unwrap().len(), scan.len());
    }

    #[test]
    fn global_extrema_are_exhaustive(samples in prop::collection::vec(0u8..8, 1..40)) {
        let scan = LineScan::new(samples.clone());
        let top = f64::from(*samples.iter().max().unwrap());
        let expected: Vec<usize> = (0..samples.len()).filter(|&i| f64::from(samples[i]) == top).collect();
        prop_assert_eq!(scan.maxima().iter().map(|e| e.index).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn detected_features_dominate_their_window(
        samples in prop::collection::vec(0u8..20, 1..60),
        window in 2usize..12,
        delta in 0.5f64..6.0,
    ) {
        let values: Vec<f64> = samples.iter().map(|&v| f64::from(v)).collect();
        let scan = LineScan::new(values.clone());
        assert_dominates(&values, &scan.find_peaks(window, delta).unwrap(), window, delta, 1.0);
        assert_dominates(&values, &scan.find_valleys(window, delta).unwrap(), window, delta, -1.0);
    }
}

#[test]
fn peak_finder_on_alternating_samples() {
    let scan = LineScan::new([1, 5, 1, 5, 1, 5, 1]);
    let peaks = scan.find_peaks(2, 1.0).unwrap();
    let indices: Vec<usize> = peaks.iter().map(|p: &Feature| p.index).collect();
    assert_eq!(indices, vec![1, 3, 5]);
    assert!(peaks.iter().all(|p| p.value == 5.0));
}

#[test]
fn shoulders_and_ramps_report_one_feature() {
    let shoulder = LineScan::new([0, 0, 10, 9, 0, 0, 0, 0]);
    assert_eq!(shoulder.find_peaks(4, 1.0).unwrap(), vec![Feature { index: 2, value: 10.0 }]);

    let ramp = LineScan::new((0..=10).rev().map(f64::from));
    assert_eq!(ramp.find_peaks(4, 1.0).unwrap(), vec![Feature { index: 0, value: 10.0 }]);
    assert_eq!(ramp.find_valleys(4, 1.0).unwrap(), vec![Feature { index: 10, value: 0.0 }]);
}

#[test]
fn population_statistics() {
    let scan = LineScan::new([3, 1, 4, 1, 5, 9, 2, 6]);
    assert_eq!(scan.mean().unwrap(), 3.875);
    assert_abs_diff_eq!(scan.variance().unwrap(), 6.609375, epsilon = 1e-12);
    assert_abs_diff_eq!(
        scan.deviation().unwrap(),
        scan.variance().unwrap().sqrt(),
        epsilon = 1e-12
    );
}

#[test]
fn threshold_scenario() {
    let scan = LineScan::new([10, 100, 200]);
    assert_eq!(scan.threshold(128.0, false).unwrap().to_vec(), vec![0.0, 0.0, 255.0]);
    assert_eq!(scan.threshold(128.0, true).unwrap().to_vec(), vec![255.0, 255.0, 0.0]);
}

#[test]
fn mismatched_arithmetic_always_fails() {
    let a = profile();
    let b = LineScan::new([1.0, 2.0, 3.0]);
    for result in [&a + &b, &a - &b, &a * &b, &a / &b] {
        assert!(matches!(result, Err(ScanError::Shape(_))));
    }
}

#[test]
fn transformations_carry_metadata_and_leave_input_alone() {
    let scan = profile();
    let before = scan.clone();
    let outputs = [
        scan.smooth(2).unwrap(),
        scan.median(3).unwrap(),
        scan.normalize().unwrap(),
        scan.scale((0.0, 1.0)).unwrap(),
        scan.derivative().unwrap(),
        scan.running_average(3, KernelKind::Uniform).unwrap(),
        scan.threshold(100.0, false).unwrap(),
        scan.invert(255.0).unwrap(),
        scan.add(&scan).unwrap(),
    ];
    for output in &outputs {
        assert_eq!(output.metadata(), scan.metadata());
    }
    assert_eq!(scan, before);
}

#[test]
fn smoothing_then_peak_detection_finds_the_bump() {
    let scan = profile().smooth(2).unwrap();
    let peaks = scan.find_peaks(4, 10.0).unwrap();
    assert_eq!(peaks.len(), 1);
    assert_eq!(peaks[0].index, 5);
    assert_abs_diff_eq!(peaks[0].value, scan[5], epsilon = 1e-12);

    let valleys: Vec<usize> = scan.find_valleys(4, 10.0).unwrap().iter().map(|v| v.index).collect();
    assert_eq!(valleys, vec![0]);
}
