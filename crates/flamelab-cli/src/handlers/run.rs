//! `run`: wire a frame source, a hand detector and a sink to the simulator.
//!
//! The frame loop is blocking, so it runs on tokio's blocking pool while an
//! async task drains the event channel into the log.

use anyhow::Result;
use flamelab_core::{FrameSource, HandDetector, KeySource, NoHands, NoKeys, Settings};
use flamelab_runtime::{
    Backdrop, BackdropSource, CaptureThreadHandle, FlameTestSimulator, FrameClock, FrameSink,
    ImageSequenceSource, NullSink, PngSequenceSink, RunOptions, RunSummary, Trace, help_text,
};

use crate::bootstrap::CliContext;
use crate::commands::RunArgs;
use crate::error::CliError;
use crate::presentation::describe_event;

/// Backdrop length when neither `--length` nor a trace gives one.
pub const DEFAULT_BACKDROP_FRAMES: u64 = 300;

/// Outcome of a finished run.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub summary: RunSummary,
    /// Events that reached the log task.
    pub logged_events: u64,
}

/// Fold command-line overrides into the loaded settings.
pub fn effective_settings(base: &Settings, args: &RunArgs) -> Settings {
    let mut settings = base.clone();
    if let Some(seed) = args.seed {
        settings.particles.seed = Some(seed);
    }
    if let Some(font) = &args.font {
        settings.ui.font_path = Some(font.clone());
    }
    if args.no_mirror {
        settings.camera.mirror = false;
    }
    if let Some(width) = args.width {
        settings.camera.width = width;
    }
    if let Some(height) = args.height {
        settings.camera.height = height;
    }
    settings
}

fn open_source(
    args: &RunArgs,
    settings: &Settings,
    trace: Option<&Trace>,
) -> Result<Box<dyn FrameSource>, CliError> {
    let mirror = settings.camera.mirror;
    if let Some(dir) = &args.frames {
        let source = ImageSequenceSource::open(dir, args.looping, mirror)?;
        return Ok(Box::new(source));
    }

    let frames = args
        .length
        .or_else(|| trace.and_then(Trace::last_frame).map(|last| last + 1))
        .unwrap_or(DEFAULT_BACKDROP_FRAMES);
    Ok(Box::new(BackdropSource::new(
        settings.camera.width,
        settings.camera.height,
        Backdrop::default(),
        Some(frames),
        mirror,
    )))
}

fn open_sink(args: &RunArgs) -> Result<Box<dyn FrameSink>, CliError> {
    match &args.output {
        Some(dir) => Ok(Box::new(PngSequenceSink::create(dir)?)),
        None => Ok(Box::new(NullSink::default())),
    }
}

/// Run the simulator to completion without printing anything.
pub async fn simulate(ctx: &CliContext, args: &RunArgs) -> Result<RunReport, CliError> {
    let settings = effective_settings(&ctx.settings, args);
    let trace = args.trace.as_deref().map(Trace::load).transpose()?;

    let source = open_source(args, &settings, trace.as_ref())?;
    let mut source = CaptureThreadHandle::spawn(source)?;
    let mut detector: Box<dyn HandDetector> = Box::new(NoHands);
    let mut keys: Box<dyn KeySource> = Box::new(NoKeys);
    if let Some(trace) = trace {
        tracing::info!(frames = trace.len(), "Replaying hand trace");
        let (replay, scripted) = trace.into_parts(&settings.tracker);
        detector = Box::new(replay);
        keys = Box::new(scripted);
    }
    let mut sink = open_sink(args)?;

    let options = RunOptions {
        max_frames: args.max_frames,
        clock: if args.realtime {
            FrameClock::Realtime
        } else {
            FrameClock::Fixed {
                fps: settings.camera.target_fps,
            }
        },
    };
    let (mut simulator, mut events) = FlameTestSimulator::from_settings(settings)?;

    let logger = tokio::spawn(async move {
        let mut logged = 0u64;
        while let Some(event) = events.recv().await {
            logged += 1;
            tracing::info!(kind = event.kind(), "{}", describe_event(&event));
        }
        logged
    });

    let summary = tokio::task::spawn_blocking(move || {
        simulator.run(
            &mut source,
            detector.as_mut(),
            keys.as_mut(),
            sink.as_mut(),
            &options,
        )
    })
    .await
    .map_err(|e| CliError::Process(format!("Simulation thread failed: {e}")))??;

    let logged_events = logger
        .await
        .map_err(|e| CliError::Process(format!("Event log task failed: {e}")))?;

    Ok(RunReport {
        summary,
        logged_events,
    })
}

pub async fn execute(ctx: &CliContext, args: RunArgs) -> Result<()> {
    println!("{}\n", help_text());
    let report = simulate(ctx, &args).await?;
    let summary = report.summary;

    println!(
        "Stopped after {} frames ({}), {} events, {:.1} fps",
        summary.frames,
        summary.stop,
        summary.events,
        summary.average_fps()
    );
    if let Some(dir) = &args.output {
        println!("Frames written to {}", dir.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flamelab_runtime::StopReason;
    use std::fs;
    use std::path::{Path, PathBuf};

    const TRACE: &str = r#"
{"frame": 0, "hands": [{"handedness": "Left", "score": 0.95, "tips": {"index": [0.08, 0.8056]}}]}
{"hands": [{"handedness": "Left", "score": 0.95, "tips": {"index": [0.3, 0.5]}}]}
{"hands": [{"handedness": "Left", "score": 0.95, "tips": {"index": [0.1, 0.4]}}]}
{"hands": [{"handedness": "Left", "score": 0.95, "tips": {"index": [0.1, 0.4]}}]}
{"frame": 4, "keys": "h"}
"#;

    fn context(dir: &Path) -> CliContext {
        CliContext {
            settings: Settings::default(),
            settings_path: dir.join("settings.json"),
        }
    }

    fn small(args: RunArgs) -> RunArgs {
        RunArgs {
            width: Some(640),
            height: Some(480),
            seed: Some(3),
            ..args
        }
    }

    #[test]
    fn overrides_replace_loaded_values() {
        let args = RunArgs {
            seed: Some(5),
            font: Some(PathBuf::from("lab.ttf")),
            no_mirror: true,
            width: Some(640),
            ..RunArgs::default()
        };
        let settings = effective_settings(&Settings::default(), &args);
        assert_eq!(settings.particles.seed, Some(5));
        assert_eq!(settings.ui.font_path, Some(PathBuf::from("lab.ttf")));
        assert!(!settings.camera.mirror);
        assert_eq!(settings.camera.width, 640);
        assert_eq!(settings.camera.height, Settings::default().camera.height);
    }

    #[test]
    fn backdrop_runs_default_length() {
        let dir = tempfile::tempdir().unwrap();
        let report = tokio_test::block_on(simulate(&context(dir.path()), &small(RunArgs::default())))
            .unwrap();
        assert_eq!(report.summary.frames, DEFAULT_BACKDROP_FRAMES);
        assert_eq!(report.summary.stop, StopReason::SourceExhausted);
        assert_eq!(report.logged_events, 0);
    }

    #[test]
    fn trace_sets_length_and_events_reach_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let trace = dir.path().join("t.jsonl");
        fs::write(&trace, TRACE).unwrap();
        let out = dir.path().join("out");

        // Full-size frames: the trace coordinates target the default bench.
        let args = RunArgs {
            trace: Some(trace),
            output: Some(out.clone()),
            seed: Some(3),
            ..RunArgs::default()
        };
        let report = tokio_test::block_on(simulate(&context(dir.path()), &args)).unwrap();

        assert_eq!(report.summary.frames, 5);
        assert_eq!(report.summary.events, 2);
        assert_eq!(report.logged_events, 2);
        assert_eq!(fs::read_dir(&out).unwrap().count(), 5);
    }

    #[test]
    fn max_frames_caps_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let args = small(RunArgs {
            length: Some(50),
            max_frames: Some(4),
            ..RunArgs::default()
        });
        let report = tokio_test::block_on(simulate(&context(dir.path()), &args)).unwrap();
        assert_eq!(report.summary.frames, 4);
        assert_eq!(report.summary.stop, StopReason::MaxFrames);
    }

    #[test]
    fn missing_trace_is_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let args = small(RunArgs {
            trace: Some(dir.path().join("absent.jsonl")),
            ..RunArgs::default()
        });
        let err = tokio_test::block_on(simulate(&context(dir.path()), &args)).unwrap_err();
        assert_eq!(err.exit_code(), 66);
    }

    #[test]
    fn corrupt_frame_mid_sequence_is_a_data_error() {
        let dir = tempfile::tempdir().unwrap();
        let frames = dir.path().join("in");
        fs::create_dir(&frames).unwrap();
        let mut recorder = PngSequenceSink::create(&frames).unwrap();
        let mut backdrop = BackdropSource::new(640, 480, Backdrop::default(), Some(1), false);
        while let Some(frame) = backdrop.next_frame().unwrap() {
            recorder.write(&frame).unwrap();
        }
        fs::write(frames.join("zz_truncated.png"), b"\x89PNG\r\n").unwrap();

        let args = small(RunArgs {
            frames: Some(frames),
            ..RunArgs::default()
        });
        let err = tokio_test::block_on(simulate(&context(dir.path()), &args)).unwrap_err();
        assert_eq!(err.exit_code(), 65);
        assert!(err.to_string().contains("zz_truncated.png"));
    }
}
