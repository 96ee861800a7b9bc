//! Settings dispatcher tests

use fcset_link::dispatch::{DispatchError, SettingsDispatcher};
use fcset_link::fake::{FakeDevice, RecordingTelemetry};
use fcset_proto::sync::FieldWrite;

#[tokio::test(start_paused = true)]
async fn test_structured_path_leaves_telemetry_alone() {
    let mut dev = FakeDevice::new();
    let mut telemetry = RecordingTelemetry::default();
    let dispatcher = SettingsDispatcher::default();

    let res = dispatcher
        .set_field(&mut dev, &mut telemetry, &FieldWrite::int("roll_rate", 70))
        .await;

    assert!(res.is_ok());
    assert_eq!(dev.settings.get("roll_rate").map(String::as_str), Some("70"));
    assert_eq!(telemetry.pauses, 0);
    assert_eq!(telemetry.resumes, 0);
    assert!(dev.log.iter().all(|l| !l.starts_with("cli")));
}

#[tokio::test(start_paused = true)]
async fn test_unsupported_falls_back_to_console() {
    let mut dev = FakeDevice::without_structured(&["roll_rate"]);
    let mut telemetry = RecordingTelemetry::default();
    let dispatcher = SettingsDispatcher::default();

    let res = dispatcher
        .set_field(&mut dev, &mut telemetry, &FieldWrite::int("roll_rate", 70))
        .await;

    assert!(res.is_ok());
    assert_eq!(dev.settings.get("roll_rate").map(String::as_str), Some("70"));

    // pause/resume exactly once each, in that order
    assert_eq!(telemetry.events, vec!["pause", "resume"]);

    // the console sequence: set line, then explicit save
    assert!(dev.log.contains(&"cli set roll_rate = 70".to_string()));
    assert!(dev.log.contains(&"cli save".to_string()));
    assert_eq!(dev.commits, 1);
}

#[tokio::test(start_paused = true)]
async fn test_unsupported_on_both_paths() {
    let mut dev = FakeDevice::without_structured(&["magic_field"]);
    dev.console_rejects.insert("magic_field".into());
    let mut telemetry = RecordingTelemetry::default();
    let dispatcher = SettingsDispatcher::default();

    let res = dispatcher
        .set_field(&mut dev, &mut telemetry, &FieldWrite::int("magic_field", 1))
        .await;

    assert_eq!(res, Err(DispatchError::Unsupported("magic_field".into())));

    // resume still runs when the fallback fails
    assert_eq!(telemetry.events, vec!["pause", "resume"]);
    assert_eq!(dev.commits, 0);
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_short_circuits() {
    let mut dev = FakeDevice::new();
    dev.transport_down = true;
    let mut telemetry = RecordingTelemetry::default();
    let dispatcher = SettingsDispatcher::default();

    let res = dispatcher
        .set_field(&mut dev, &mut telemetry, &FieldWrite::int("roll_rate", 70))
        .await;

    assert!(matches!(res, Err(DispatchError::Transport(_))));
    // no fallback was taken, so telemetry was never touched
    assert_eq!(telemetry.pauses, 0);
    assert_eq!(telemetry.resumes, 0);
}

#[tokio::test(start_paused = true)]
async fn test_commit_prefers_structured_path() {
    let mut dev = FakeDevice::new();
    let mut telemetry = RecordingTelemetry::default();
    let dispatcher = SettingsDispatcher::default();

    dispatcher.commit(&mut dev, &mut telemetry).await.unwrap();

    assert_eq!(dev.commits, 1);
    assert_eq!(telemetry.pauses, 0);
    assert!(dev.log.contains(&"msp commit".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_text_values_render_as_console_literals() {
    let mut dev = FakeDevice::without_structured(&["platform_type"]);
    let mut telemetry = RecordingTelemetry::default();
    let dispatcher = SettingsDispatcher::default();

    dispatcher
        .set_field(&mut dev, &mut telemetry, &FieldWrite::text("platform_type", "AIRPLANE"))
        .await
        .unwrap();

    assert!(dev.log.contains(&"cli set platform_type = AIRPLANE".to_string()));
    assert_eq!(dev.settings.get("platform_type").map(String::as_str), Some("AIRPLANE"));
}
