use approx::assert_relative_eq;
use mmult::matrix::buffer::MatrixBuffer;
use mmult::{
    BenchConfig, BenchError, BenchmarkRunner, Kernel, OutlierFilter, RunSet, Workload,
    run_benchmark, run_workload,
};

#[test]
fn end_to_end_every_kernel_passes() {
    for kernel in Kernel::ALL {
        let config = BenchConfig::new(kernel).with_dims(17, 17, 17).with_runs(7);
        let report = run_benchmark(&config).unwrap();

        assert_eq!(report.kernel, kernel);
        assert_eq!(report.runs.len(), 7);
        assert!(report.verification.passed(), "{}: {}", kernel, report.verification);
        assert!(report.mean.active >= 1);
        assert_eq!(report.mean.active + report.mean.masked, 7);
        assert_eq!(report.macs, 17 * 17 * 17);
    }
}

#[test]
fn last_output_is_kept_for_verification() {
    let a = MatrixBuffer::from_vec(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap();
    let b = MatrixBuffer::from_vec(vec![5.0, 6.0, 7.0, 8.0], 2, 2).unwrap();
    let mut workload = Workload::from_inputs(a, b).unwrap();

    let runner = BenchmarkRunner::new(3).unwrap();
    let report = run_workload(
        Kernel::CacheBlocked,
        &mut workload,
        &runner,
        &OutlierFilter::default(),
        0.0,
    )
    .unwrap();

    assert_eq!(workload.output.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    assert_eq!(workload.reference.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    assert!(report.verification.matches);
    assert!(report.verification.guard_ok);
}

#[test]
fn corrupted_guard_fails_only_the_guard_check() {
    let config = BenchConfig::new(Kernel::Naive).with_dims(5, 4, 3);
    let mut workload = Workload::new(&config).unwrap();
    workload.output.guards_mut()[0] = 0.0;

    let report = run_workload(
        Kernel::Naive,
        &mut workload,
        &BenchmarkRunner::new(2).unwrap(),
        &OutlierFilter::default(),
        config.tolerance,
    )
    .unwrap();

    assert!(report.verification.matches);
    assert!(!report.verification.guard_ok);
    assert_eq!(
        report.verification.status(),
        "Success, but failed buffer overruns check"
    );
}

#[test]
fn invalid_configuration_refuses_to_run() {
    let config = BenchConfig::new(Kernel::Reference).with_dims(0, 4, 4);
    assert!(matches!(
        run_benchmark(&config),
        Err(BenchError::InvalidDimension { .. })
    ));

    let config = BenchConfig::new(Kernel::Reference)
        .with_dims(4, 4, 4)
        .with_runs(0);
    assert!(matches!(
        run_benchmark(&config),
        Err(BenchError::InvalidRuns(0))
    ));

    assert!(matches!(
        "avx512".parse::<Kernel>(),
        Err(BenchError::UnknownKernel(_))
    ));
}

#[test]
fn statistics_on_recorded_style_samples() {
    let mut runs = RunSet::from_nanos([100, 101, 99, 102, 100, 9]);
    let mean = OutlierFilter::new(2.0).unwrap().reduce(&mut runs).unwrap();

    assert_eq!(mean.masked, 1);
    assert_eq!(runs.masked_count(), 1);
    assert!(!runs.samples()[5].active);
    assert_relative_eq!(mean.average_ns, (100.0 + 101.0 + 99.0 + 102.0 + 100.0) / 5.0);
}

#[test]
fn zero_variance_samples() {
    let mut runs = RunSet::from_nanos(std::iter::repeat_n(4242, 32));
    let mean = OutlierFilter::default().reduce(&mut runs).unwrap();

    assert_eq!(mean.average_ns, 4242.0);
    assert_eq!(mean.masked, 0);
    assert_eq!(mean.iterations, 1);
}

#[test]
fn refiltering_a_run_set_starts_from_a_clean_mask() {
    let mut runs = RunSet::from_nanos([100, 101, 99, 102, 100, 9]);
    let strict = OutlierFilter::new(2.0).unwrap();

    let first = strict.reduce(&mut runs).unwrap();
    let again = strict.reduce(&mut runs).unwrap();
    assert_eq!(again.masked, 1);
    assert_eq!(again.active, 5);
    assert_eq!(again, first);

    // A looser threshold keeps every sample once the old mask is gone
    let loose = OutlierFilter::new(100.0).unwrap().reduce(&mut runs).unwrap();
    assert_eq!(loose.masked, 0);
    assert_eq!(loose.active, runs.len());
    assert_eq!(runs.masked_count(), 0);
}
