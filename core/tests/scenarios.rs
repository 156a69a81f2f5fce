use sensorcore::acquisition::{FixedTable, RawSample, SourceConfig};
use sensorcore::control::{Motor, StatusRegister};
use sensorcore::diagnostics::MetricsRecorder;
use sensorcore::processing::{
    Calibration, ChannelPipeline, DeviceState, FilterConfig, FilterSeed, FlightEnvelope,
    FlightReadings, LowPassFilter, Telemetry, TemperatureStatus, UnitConverter,
};
use sensorcore::{ChannelConfig, PipelineConfig, StageConfig};
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn readings(battery_percent: u8, altitude_m: i16, signal_strength: u8) -> FlightReadings {
    FlightReadings {
        battery_percent,
        altitude_m,
        signal_strength,
    }
}

#[test]
fn mid_scale_tmp36_reading_follows_linear_formula() {
    let converter = UnitConverter::new(Calibration::tmp36()).unwrap();
    let conversion = converter.convert(RawSample::new(2048).unwrap());

    let voltage = (2048.0_f32 / 4095.0) * 3.3;
    assert!((conversion.voltage - voltage).abs() <= f32::EPSILON * 4.0);
    let temperature = (voltage - 0.5) * 100.0;
    assert!((conversion.temperature - temperature).abs() <= 1e-4);
    assert!((conversion.temperature - 115.04).abs() < 0.01);
}

#[test]
fn noisy_readings_are_smoothed_deterministically() {
    let noisy = [25.0, 28.0, 26.0, 24.0, 27.0, 25.0, 26.0];
    let run = || {
        let mut filter = LowPassFilter::new(0.3, FilterSeed::Zero).unwrap();
        noisy.iter().map(|&v| filter.apply(v)).collect::<Vec<f32>>()
    };

    let first = run();
    assert_eq!(first, run());
    assert!((first[0] - 7.5).abs() < 1e-5);
    assert!((first[1] - 13.65).abs() < 1e-4);
    // zero seed: output climbs toward the ~26 input level on every step
    assert!(first.windows(2).all(|pair| pair[1] > pair[0]));
}

#[test]
fn drone_scenarios_classify_by_priority() {
    assert_eq!(Telemetry::new(75, 50, 85).state(), DeviceState::On);
    assert_eq!(Telemetry::new(25, 30, 70).state(), DeviceState::Blinking);
    assert_eq!(Telemetry::new(5, 10, 40).state(), DeviceState::Error);
    assert_eq!(Telemetry::new(75, 10, 30).state(), DeviceState::Off);
}

#[test]
fn draining_battery_walks_through_states() {
    let mut telemetry = Telemetry::new(40, 50, 85);
    let mut states = Vec::new();
    for step in 0..8u8 {
        let battery = 40 - step * 5;
        states.push(telemetry.record(readings(battery, 50 + i16::from(step) * 10, 85)));
    }
    assert_eq!(
        states,
        vec![
            DeviceState::On,
            DeviceState::On,
            DeviceState::On,
            DeviceState::Blinking,
            DeviceState::Blinking,
            DeviceState::Blinking,
            DeviceState::Blinking,
            DeviceState::Error,
        ]
    );
}

#[test]
fn real_time_loop_over_sensor_table() {
    init_logging();
    let metrics = Arc::new(MetricsRecorder::new());
    let config = StageConfig {
        calibration: Calibration::tmp36(),
        filter: FilterConfig {
            alpha: 0.2,
            seed: FilterSeed::Zero,
        },
    };
    let mut pipeline = ChannelPipeline::new(
        "adc1",
        &config,
        FlightEnvelope::default(),
        Box::new(FixedTable::default()),
        metrics.clone(),
    )
    .unwrap();

    let statuses: Vec<TemperatureStatus> = (0..5)
        .map(|_| pipeline.run_cycle(readings(80, 100, 90)).unwrap().sensor.status)
        .collect();

    assert_eq!(
        statuses,
        vec![
            TemperatureStatus::Cold,
            TemperatureStatus::Normal,
            TemperatureStatus::Hot,
            TemperatureStatus::Hot,
            TemperatureStatus::Cold,
        ]
    );
    assert_eq!(metrics.snapshot().cycles, 5);
}

#[test]
fn invalid_flight_parameters_are_all_reported() {
    init_logging();
    let metrics = Arc::new(MetricsRecorder::new());
    let mut pipeline = ChannelPipeline::new(
        "adc0",
        &StageConfig {
            filter: FilterConfig {
                alpha: 1.0,
                seed: FilterSeed::Zero,
            },
            ..Default::default()
        },
        FlightEnvelope::default(),
        Box::new(FixedTable::from_raw(&[0]).unwrap()),
        metrics.clone(),
    )
    .unwrap();

    let report = pipeline.run_cycle(readings(120, 600, 90)).unwrap();
    let labels: Vec<&str> = report
        .validation
        .violations
        .iter()
        .map(|violation| violation.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Altitude (m)", "Battery (%)", "Temperature (C)"]);
    assert_eq!(metrics.snapshot().violations, 3);
}

#[test]
fn channels_keep_independent_filter_history() {
    let mut hot = ChannelConfig::new("hot");
    hot.source = SourceConfig::FixedTable {
        samples: vec![RawSample::MAX],
    };
    let mut cold = ChannelConfig::new("cold");
    cold.source = SourceConfig::FixedTable {
        samples: vec![RawSample::MIN],
    };
    let config = PipelineConfig {
        channels: vec![hot, cold],
        envelope: FlightEnvelope::default(),
    };

    let metrics = Arc::new(MetricsRecorder::new());
    let mut handles = config.build_channels(metrics.clone()).unwrap();
    for _ in 0..3 {
        for handle in handles.iter_mut() {
            handle.pipeline.run_cycle(readings(90, 10, 90)).unwrap();
        }
    }

    let hot_report = handles[0].pipeline.run_cycle(readings(90, 10, 90)).unwrap();
    let cold_report = handles[1].pipeline.run_cycle(readings(90, 10, 90)).unwrap();
    assert!(hot_report.sensor.filtered > 0.0);
    assert!(cold_report.sensor.filtered < 0.0);
    assert_eq!(metrics.snapshot().cycles, 8);
}

#[test]
fn single_channel_config_round_trips_through_json() {
    let config = PipelineConfig::single(ChannelConfig::new("solo"));
    let encoded = serde_json::to_string(&config).unwrap();
    let decoded: PipelineConfig = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, config);
}

#[test]
fn classified_state_drives_motor_output() {
    let mut motor = Motor::new(0);
    for (telemetry, speed) in [
        (Telemetry::new(75, 50, 85), 60),
        (Telemetry::new(25, 50, 85), 30),
        (Telemetry::new(5, 50, 85), 0),
    ] {
        motor.follow_state(telemetry.state(), 60);
        assert_eq!(motor.speed_percent(), speed);
    }
    assert!(motor.status().is_set(StatusRegister::POWER_ON | StatusRegister::INTERRUPT));
}
