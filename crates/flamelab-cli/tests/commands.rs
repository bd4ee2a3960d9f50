//! Handlers driven the way `main` drives them.

use std::fs;

use clap::Parser;
use flamelab_cli::handlers::{chemicals, config, run};
use flamelab_cli::{Cli, Commands, ConfigCommand, bootstrap};
use flamelab_core::{FrameSource, Settings};
use flamelab_runtime::{Backdrop, BackdropSource, FrameSink, PngSequenceSink};

#[test]
fn config_init_then_load_round_trips_through_the_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lab").join("settings.json");
    let path_arg = path.to_str().unwrap();

    let cli = Cli::parse_from(["flamelab", "--config", path_arg, "config", "init"]);
    let ctx = bootstrap(cli.config).unwrap();
    let Some(Commands::Config { command }) = cli.command else {
        panic!("expected config");
    };
    config::execute(&ctx, command).unwrap();
    assert!(path.is_file());

    let ctx = bootstrap(Some(path.clone())).unwrap();
    assert_eq!(ctx.settings, Settings::default());
    config::execute(&ctx, ConfigCommand::Validate).unwrap();
}

#[test]
fn edited_bench_shows_in_the_chemicals_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(
        &path,
        r#"{"lab": {"bench": [{"element": "Ba", "x_ratio": 0.5}]}}"#,
    )
    .unwrap();

    let ctx = bootstrap(Some(path)).unwrap();
    let table = chemicals::render_chemicals(&ctx.settings.lab);
    let row = |sym: &str| {
        table
            .lines()
            .find(|l| l.starts_with(&format!("{sym} ")))
            .unwrap()
            .to_string()
    };
    assert!(row("Ba").contains("yes"));
    assert!(!row("Na").contains("yes"));
}

#[test]
fn run_over_a_frame_directory_writes_every_frame() {
    let dir = tempfile::tempdir().unwrap();
    let frames = dir.path().join("in");
    fs::create_dir(&frames).unwrap();
    let mut recorder = PngSequenceSink::create(&frames).unwrap();
    let mut backdrop = BackdropSource::new(640, 480, Backdrop::default(), Some(3), false);
    while let Some(frame) = backdrop.next_frame().unwrap() {
        recorder.write(&frame).unwrap();
    }
    let out = dir.path().join("out");

    let cli = Cli::parse_from([
        "flamelab",
        "--config",
        dir.path().join("none.json").to_str().unwrap(),
        "run",
        "--frames",
        frames.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
        "--seed",
        "1",
    ]);
    let ctx = bootstrap(cli.config).unwrap();
    let Some(Commands::Run(args)) = cli.command else {
        panic!("expected run");
    };

    let report = tokio_test::block_on(run::simulate(&ctx, &args)).unwrap();
    assert_eq!(report.summary.frames, 3);
    assert!(out.join("frame_000003.png").is_file());
}

#[test]
fn empty_frame_directory_maps_to_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = bootstrap(Some(dir.path().join("none.json"))).unwrap();
    let args = flamelab_cli::RunArgs {
        frames: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    let err = tokio_test::block_on(run::simulate(&ctx, &args)).unwrap_err();
    assert_eq!(err.exit_code(), 66);
}
