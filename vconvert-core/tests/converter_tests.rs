mod common;

use common::{BANNER, Script, ScriptedSpawner, touch};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;
use vconvert_core::{
    ConversionRequest, Converter, CoreError, JobEvent, JobState, OutputFormat, Resolution,
};

const STEP: Duration = Duration::from_secs(5);

/// Drains events until the terminal one.
fn collect_events(converter: &mut Converter<ScriptedSpawner>) -> Vec<JobEvent> {
    let mut events = Vec::new();
    while converter.is_busy() {
        if let Some(event) = converter.wait_event(STEP) {
            events.push(event);
        }
    }
    events
}

#[test]
fn test_mp4_balanced_conversion_end_to_end() {
    let dir = tempdir().unwrap();
    let input = touch(dir.path(), "clip.mov");
    let stats = "frame=10 fps=0.0 q=28.0 size=0kB time=00:00:30.00 bitrate=N/A speed=1x\r\
                 frame=20 fps=20 q=28.0 size=256kB time=00:01:00.50 bitrate=N/A speed=1x\r";
    let spawner = ScriptedSpawner::new(BANNER, vec![Script::run(stats, 0)]);
    let mut converter = Converter::new(spawner);

    converter.select_input(&input).unwrap();
    let request = converter
        .prepare_request(None, Some(OutputFormat::Mp4), Some("Balanced"))
        .unwrap();
    let expected_output = dir.path().join("clip_converted.mp4");
    assert_eq!(request.output, expected_output);

    converter.start(request).unwrap();
    assert!(converter.is_busy());

    let events = collect_events(&mut converter);
    assert_eq!(
        events,
        vec![
            JobEvent::Progress { elapsed_secs: 30, total_secs: 120.0 },
            JobEvent::Progress { elapsed_secs: 60, total_secs: 120.0 },
            JobEvent::Completed { exit_code: 0 },
        ]
    );

    let job = converter.last_job().unwrap();
    assert_eq!(job.state, JobState::Succeeded);
    assert_eq!(job.snapshot().percent(), 100.0);
    assert!(
        job.completion_message()
            .unwrap()
            .contains(&expected_output.display().to_string())
    );

    let spawner = converter.spawner();
    assert_eq!(
        spawner.probe_calls(),
        vec![vec!["-i".to_string(), input.display().to_string()]]
    );
    let calls = spawner.spawn_calls();
    assert_eq!(calls.len(), 1);
    let input_arg = input.display().to_string();
    let output_arg = expected_output.display().to_string();
    let expected = vec![
        "-i",
        input_arg.as_str(),
        "-c:v",
        "libx264",
        "-crf",
        "23",
        "-preset",
        "medium",
        "-c:a",
        "copy",
        "-y",
        output_arg.as_str(),
    ];
    assert_eq!(calls[0], expected);
    assert!(!calls[0].iter().any(|a| a == "-vf"));
}

#[test]
fn test_nonzero_exit_fails_without_completing_progress() {
    let dir = tempdir().unwrap();
    let input = touch(dir.path(), "clip.mp4");
    let spawner = ScriptedSpawner::new(
        BANNER,
        vec![Script::run("time=00:00:45.00\rError while decoding stream\n", 1)],
    );
    let mut converter = Converter::new(spawner);
    converter.select_input(&input).unwrap();
    let request = converter
        .prepare_request(None, Some(OutputFormat::Webm), None)
        .unwrap();
    converter.start(request).unwrap();

    let events = collect_events(&mut converter);
    assert_eq!(events.last(), Some(&JobEvent::Completed { exit_code: 1 }));
    assert!(!converter.is_busy());

    let job = converter.last_job().unwrap();
    assert!(matches!(job.state, JobState::Failed { .. }));
    assert!(job.snapshot().percent() < 100.0);
    assert_eq!(job.elapsed_secs, 45.0);
    let message = job.completion_message().unwrap();
    assert!(message.contains("Conversion failed (exit code 1)"));
    assert!(message.contains("FFmpeg is installed"));
}

#[test]
fn test_unknown_duration_rejects_before_spawning() {
    let dir = tempdir().unwrap();
    let input = touch(dir.path(), "notes.mp4");
    let spawner = ScriptedSpawner::new(
        "notes.mp4: Invalid data found when processing input\n",
        vec![Script::run("time=00:00:01.00\r", 0)],
    );
    let mut converter = Converter::new(spawner);
    converter.select_input(&input).unwrap();
    let request = converter.prepare_request(None, None, None).unwrap();

    let err = converter.start(request).unwrap_err();
    assert!(matches!(err, CoreError::DurationUnknown(ref path) if *path == input));
    assert!(!converter.is_busy());
    assert_eq!(converter.spawner().probe_calls().len(), 1);
    assert!(converter.spawner().spawn_calls().is_empty());
}

#[test]
fn test_second_start_rejected_while_busy() {
    let dir = tempdir().unwrap();
    let input = touch(dir.path(), "clip.avi");
    let spawner = ScriptedSpawner::new(BANNER, vec![Script::run("time=00:00:10.00\r", 0)]);
    let mut converter = Converter::new(spawner);
    converter.select_input(&input).unwrap();

    let first = converter.prepare_request(None, Some(OutputFormat::Mkv), None).unwrap();
    let second = first.clone();
    converter.start(first).unwrap();

    let err = converter.start(second).unwrap_err();
    assert!(matches!(err, CoreError::JobActive));
    assert_eq!(converter.spawner().probe_calls().len(), 1);

    converter.wait_until_finished();
    assert!(!converter.is_busy());
    assert_eq!(converter.spawner().spawn_calls().len(), 1);
}

#[test]
fn test_busy_flag_clears_and_next_job_runs() {
    let dir = tempdir().unwrap();
    let input = touch(dir.path(), "clip.mov");
    let spawner = ScriptedSpawner::new(
        BANNER,
        vec![Script::run("", 1), Script::run("time=00:02:00.00\r", 0)],
    );
    let mut converter = Converter::new(spawner);
    converter.select_input(&input).unwrap();

    let request = converter.prepare_request(None, None, None).unwrap();
    let first = converter.start(request.clone()).unwrap();
    converter.wait_until_finished();
    assert!(matches!(converter.last_job().unwrap().state, JobState::Failed { .. }));

    let second = converter.start(request).unwrap();
    assert_ne!(first, second);
    let job = converter.wait_until_finished().unwrap();
    assert_eq!(job.id, second);
    assert_eq!(job.state, JobState::Succeeded);
}

#[test]
fn test_spawn_failure_is_terminal_failure() {
    let dir = tempdir().unwrap();
    let input = touch(dir.path(), "clip.mov");
    let spawner = ScriptedSpawner::new(BANNER, vec![Script::SpawnError]);
    let mut converter = Converter::new(spawner);
    converter.select_input(&input).unwrap();
    let request = converter.prepare_request(None, None, None).unwrap();
    converter.start(request).unwrap();

    let events = collect_events(&mut converter);
    assert_eq!(events.len(), 1);
    match &events[0] {
        JobEvent::Failed { reason } => {
            assert!(reason.contains("Failed to start 'ffmpeg'"));
            assert!(reason.contains("FFmpeg is installed"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(!converter.is_busy());
}

#[test]
fn test_read_error_kills_process_and_fails() {
    let dir = tempdir().unwrap();
    let input = touch(dir.path(), "clip.mov");
    let spawner = ScriptedSpawner::new(
        BANNER,
        vec![Script::read_error("time=00:00:10.00\r")],
    );
    let mut converter = Converter::new(spawner);
    converter.select_input(&input).unwrap();
    let request = converter.prepare_request(None, None, None).unwrap();
    converter.start(request).unwrap();

    let events = collect_events(&mut converter);
    assert_eq!(events[0], JobEvent::Progress { elapsed_secs: 10, total_secs: 120.0 });
    assert_eq!(events.len(), 2);
    match &events[1] {
        JobEvent::Failed { reason } => assert!(reason.contains("reading 'ffmpeg' output")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(converter.spawner().was_killed());
    assert!(converter.spawner().stream_closed());
    assert!(!converter.is_busy());
}

#[test]
fn test_poll_drains_without_blocking() {
    let dir = tempdir().unwrap();
    let input = touch(dir.path(), "clip.mov");
    let spawner = ScriptedSpawner::new(BANNER, vec![Script::run("time=00:00:05.00\n", 0)]);
    let mut converter = Converter::new(spawner);
    converter.select_input(&input).unwrap();
    let request = converter.prepare_request(None, None, None).unwrap();
    converter.start(request).unwrap();

    let mut events = Vec::new();
    let deadline = std::time::Instant::now() + STEP;
    while converter.is_busy() && std::time::Instant::now() < deadline {
        events.extend(converter.poll());
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(!converter.is_busy());
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    assert!(events.last().unwrap().is_terminal());
    assert!(converter.poll().is_empty());
}

#[test]
fn test_request_requires_selection() {
    let converter = Converter::new(ScriptedSpawner::new(BANNER, Vec::new()));
    assert!(matches!(
        converter.prepare_request(None, None, None),
        Err(CoreError::NoInputSelected)
    ));
}

#[test]
fn test_invalid_selection_keeps_previous() {
    let dir = tempdir().unwrap();
    let good = touch(dir.path(), "my clip.mkv");
    let text = touch(dir.path(), "readme.txt");
    let mut converter = Converter::new(ScriptedSpawner::new(BANNER, Vec::new()));

    let dropped = format!("{{{}}}", good.display());
    converter.select_dropped(&dropped).unwrap();
    assert_eq!(converter.selected_input(), Some(good.as_path()));

    assert!(matches!(
        converter.select_input(&text),
        Err(CoreError::UnsupportedInput(_))
    ));
    assert!(matches!(
        converter.select_input(&dir.path().join("gone.mp4")),
        Err(CoreError::InputNotFound(_))
    ));
    assert_eq!(converter.selected_input(), Some(good.as_path()));
}

#[test]
fn test_output_equal_to_input_rejected() {
    let dir = tempdir().unwrap();
    let input = touch(dir.path(), "clip.mp4");
    let mut converter = Converter::new(ScriptedSpawner::new(BANNER, Vec::new()));
    converter.select_input(&input).unwrap();
    let err = converter
        .prepare_request(Some(input.clone()), Some(OutputFormat::Mp4), None)
        .unwrap_err();
    assert!(matches!(err, CoreError::OutputSameAsInput(_)));
}

#[test]
fn test_scaled_request_reaches_arguments() {
    let dir = tempdir().unwrap();
    let input = touch(dir.path(), "clip.mov");
    let spawner = ScriptedSpawner::new(BANNER, vec![Script::run("", 0)]);
    let mut converter = Converter::new(spawner);
    let request = ConversionRequest::new(&input, dir.path().join("small.mp4"), OutputFormat::Mp4, None)
        .unwrap()
        .with_resolution(Resolution::Hd720);
    converter.start(request).unwrap();
    converter.wait_until_finished();

    let calls = converter.spawner().spawn_calls();
    let args = &calls[0];
    let vf = args.iter().position(|a| a == "-vf").unwrap();
    assert_eq!(args[vf + 1], "scale=1280:-2");
    assert_eq!(args.last().unwrap(), &dir.path().join("small.mp4").display().to_string());
}

#[test]
fn test_probe_spawn_failure_is_an_error() {
    let mut converter = Converter::new(ScriptedSpawner::missing_program());
    let request = ConversionRequest::new(
        PathBuf::from("/v/clip.mov"),
        PathBuf::from("/v/out.mp4"),
        OutputFormat::Mp4,
        None,
    )
    .unwrap();
    assert!(matches!(converter.start(request), Err(CoreError::CommandStart(..))));
    assert!(!converter.is_busy());
}
