// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the frame-advance scheduler

use std::io::Cursor;
use std::time::Duration;
use stillcam::backends::camera::{CameraConfig, CameraPipeline, SimulatedCamera};
use stillcam::config::{AdvanceMode, RunConfig};
use stillcam::constants::TIMELAPSE_WARMUP;
use stillcam::gpu::{HeadlessRenderer, Renderer, Scene};
use stillcam::scheduler::{delay_for_frame, FrameScheduler};

fn preview_renderer() -> HeadlessRenderer<SimulatedCamera> {
    let config = RunConfig {
        width: 32,
        height: 24,
        quality: 85,
        add_raw: false,
        output: None,
        link: None,
        verbose: false,
        advance_mode: AdvanceMode::Interactive,
    };
    let mut camera = SimulatedCamera::new();
    camera
        .configure(&CameraConfig {
            width: config.width,
            height: config.height,
            quality: config.quality,
        })
        .unwrap();
    let mut renderer = HeadlessRenderer::new(camera);
    renderer.start(&config).unwrap();
    renderer
}

#[test]
fn exit_keypress_stops_after_counting_once() {
    let mut renderer = preview_renderer();
    let mut scheduler = FrameScheduler::with_input(
        AdvanceMode::Interactive,
        Box::new(Cursor::new(b"X\n".to_vec())),
    );

    assert!(!scheduler.advance(&mut renderer));
    assert_eq!(scheduler.frame(), 1);
    // Teardown still runs exactly once through the normal path.
    renderer.stop();
    renderer.into_camera().teardown();
}

#[test]
fn keypresses_alternate_preview_scene() {
    let mut renderer = preview_renderer();
    let mut scheduler = FrameScheduler::with_input(
        AdvanceMode::Interactive,
        Box::new(Cursor::new(b"\n\n\nx\n".to_vec())),
    );

    assert!(scheduler.advance(&mut renderer));
    assert_eq!(renderer.scene(), Scene::Calibration);
    assert!(scheduler.advance(&mut renderer));
    assert_eq!(renderer.scene(), Scene::Live);
    assert!(scheduler.advance(&mut renderer));
    assert_eq!(renderer.scene(), Scene::Calibration);
    assert!(!scheduler.advance(&mut renderer));
    assert_eq!(scheduler.frame(), 4);
}

#[test]
fn timelapse_warms_up_then_uses_interval() {
    let interval = Duration::from_millis(250);
    let mode = AdvanceMode::Timelapse { interval };

    assert_eq!(delay_for_frame(&mode, 0), Some(TIMELAPSE_WARMUP));
    assert_eq!(delay_for_frame(&mode, 1), Some(interval));
    assert!(TIMELAPSE_WARMUP > interval);
}

#[test]
fn free_run_never_stops_on_its_own() {
    let mut renderer = preview_renderer();
    let mut scheduler =
        FrameScheduler::with_input(AdvanceMode::FreeRun, Box::new(Cursor::new(Vec::new())));

    for expected in 1..=5u64 {
        assert!(scheduler.advance(&mut renderer));
        assert_eq!(scheduler.frame(), expected);
    }
    // Free-run never touches the scene.
    assert_eq!(renderer.scene(), Scene::Live);
}
