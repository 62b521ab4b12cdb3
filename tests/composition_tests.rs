//! Integration Tests
//!
//! End-to-end tests for the composition pipeline, using synthetic buffers
//! only. No audio file is decoded anywhere in this suite.

use std::process::Command;

use approx::assert_relative_eq;
use pretty_assertions::assert_eq as assert_eq_pretty;

use overture::audio::{ChannelLayout, SampleBuffer, TARGET_SAMPLE_RATE};
use overture::compose::{compose, compose_intro};
use overture::dsp::{apply_fade, apply_gain, overlay};
use overture::timeline::{plan, BufferMeta, FadeSpec, Recipe, RegionKind};
use overture::OvertureError;

/// Stereo buffer holding a constant value, sized in milliseconds
fn constant_buffer(ms: u64, value: f32) -> SampleBuffer {
    let frames = (ms * TARGET_SAMPLE_RATE as u64 / 1000) as usize;
    SampleBuffer::from_interleaved(
        vec![value; frames * 2],
        ChannelLayout::Stereo,
        TARGET_SAMPLE_RATE,
    )
    .unwrap()
}

/// Stereo sine buffer, sized in milliseconds
fn sine_buffer(ms: u64, frequency: f32, amplitude: f32) -> SampleBuffer {
    let frames = (ms * TARGET_SAMPLE_RATE as u64 / 1000) as usize;
    let mut samples = Vec::with_capacity(frames * 2);
    for i in 0..frames {
        let t = i as f32 / TARGET_SAMPLE_RATE as f32;
        let s = amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin();
        samples.push(s);
        samples.push(s);
    }
    SampleBuffer::from_interleaved(samples, ChannelLayout::Stereo, TARGET_SAMPLE_RATE).unwrap()
}

fn scenario_recipe() -> Recipe {
    Recipe {
        lead_in_ms: 6000,
        bed_attenuation_db: -10.0,
        post_roll_ms: 2500,
        fade_out_ms: 3000,
        effect_gain_db: 0.0,
    }
}

// === End-to-end scenario ===

#[test]
fn test_scenario_output_duration_is_exact() {
    let bed = constant_buffer(30_000, 0.5);
    let effect = constant_buffer(1200, 0.1);
    let speech = constant_buffer(4000, 0.3);
    let recipe = scenario_recipe();

    let plan = plan(
        BufferMeta::of(&bed),
        Some(BufferMeta::of(&effect)),
        BufferMeta::of(&speech),
        &recipe,
    )
    .unwrap();
    let master = compose(&bed, Some(&effect), &speech, &plan).unwrap();

    assert_eq!(master.duration_ms(), 6000 + 1200 + 4000 + 2500 + 3000);
    // 16700ms at 44.1kHz is a whole number of frames
    assert_eq!(master.frames(), 16_700 * 44_100 / 1000);
}

#[test]
fn test_scenario_effect_region_ramps_the_bed() {
    let bed = constant_buffer(30_000, 0.5);
    let effect = constant_buffer(1200, 0.0); // silent effect isolates the bed
    let speech = constant_buffer(4000, 0.0);
    let recipe = scenario_recipe();

    let plan = plan(
        BufferMeta::of(&bed),
        Some(BufferMeta::of(&effect)),
        BufferMeta::of(&speech),
        &recipe,
    )
    .unwrap();
    let master = compose(&bed, Some(&effect), &speech, &plan).unwrap();
    let samples = master.samples();

    // At the start of the effect region the bed is still at 0 dB
    let effect_start = master.frames_for_ms(6000) * 2;
    assert_relative_eq!(samples[effect_start], 0.5, epsilon = 1e-3);

    // Halfway through, the linear amplitude ramp sits between the levels
    let halfway = master.frames_for_ms(6600) * 2;
    let expected_mid = 0.5 * (1.0 + 10f32.powf(-10.0 / 20.0)) / 2.0;
    assert_relative_eq!(samples[halfway], expected_mid, epsilon = 1e-2);

    // By the end of the effect region it has ducked to -10 dB
    let effect_end = (master.frames_for_ms(7200) - 1) * 2;
    assert_relative_eq!(samples[effect_end], 0.5 * 10f32.powf(-10.0 / 20.0), epsilon = 1e-3);
}

#[test]
fn test_scenario_speech_bed_held_flat() {
    let bed = constant_buffer(30_000, 0.5);
    let effect = constant_buffer(1200, 0.0);
    let speech = constant_buffer(4000, 0.0);
    let recipe = scenario_recipe();

    let plan = plan(
        BufferMeta::of(&bed),
        Some(BufferMeta::of(&effect)),
        BufferMeta::of(&speech),
        &recipe,
    )
    .unwrap();
    let master = compose(&bed, Some(&effect), &speech, &plan).unwrap();
    let samples = master.samples();

    let attenuated = 0.5 * 10f32.powf(-10.0 / 20.0);
    for probe_ms in [7300, 8000, 10_000, 11_100] {
        let idx = master.frames_for_ms(probe_ms) * 2;
        assert_relative_eq!(samples[idx], attenuated, epsilon = 1e-4);
    }
}

#[test]
fn test_scenario_fade_out_reaches_silence() {
    let bed = constant_buffer(30_000, 0.5);
    let effect = constant_buffer(1200, 0.1);
    let speech = constant_buffer(4000, 0.3);
    let recipe = scenario_recipe();

    let plan = plan(
        BufferMeta::of(&bed),
        Some(BufferMeta::of(&effect)),
        BufferMeta::of(&speech),
        &recipe,
    )
    .unwrap();
    let master = compose(&bed, Some(&effect), &speech, &plan).unwrap();
    let samples = master.samples();

    // Fade-out starts at the attenuated level
    let fade_start = master.frames_for_ms(13_700) * 2;
    assert_relative_eq!(
        samples[fade_start],
        0.5 * 10f32.powf(-10.0 / 20.0),
        epsilon = 1e-3
    );
    // And lands on true silence
    assert_eq!(samples[samples.len() - 1], 0.0);
    assert_eq!(samples[samples.len() - 2], 0.0);
}

#[test]
fn test_scenario_without_effect() {
    let bed = constant_buffer(30_000, 0.5);
    let speech = constant_buffer(4000, 0.3);
    let recipe = scenario_recipe();

    let plan = plan(BufferMeta::of(&bed), None, BufferMeta::of(&speech), &recipe).unwrap();
    assert!(plan.region(RegionKind::Effect).is_none());

    let master = compose(&bed, None, &speech, &plan).unwrap();
    assert_eq!(master.duration_ms(), 6000 + 4000 + 2500 + 3000);
}

#[test]
fn test_scenario_speech_rides_on_attenuated_bed() {
    let bed = constant_buffer(30_000, 0.4);
    let speech = constant_buffer(4000, 0.3);
    let recipe = scenario_recipe();

    let plan = plan(BufferMeta::of(&bed), None, BufferMeta::of(&speech), &recipe).unwrap();
    let master = compose(&bed, None, &speech, &plan).unwrap();

    // Attenuated bed (0.4 * 10^(-0.5)) plus speech (0.3)
    let idx = master.frames_for_ms(8000) * 2;
    let expected = 0.4 * 10f32.powf(-10.0 / 20.0) + 0.3;
    assert_relative_eq!(master.samples()[idx], expected, epsilon = 1e-4);
}

// === Pipeline properties ===

#[test]
fn test_pipeline_is_deterministic() {
    let bed = sine_buffer(20_000, 110.0, 0.4);
    let effect = sine_buffer(800, 880.0, 0.2);
    let speech = sine_buffer(3000, 220.0, 0.5);
    let recipe = Recipe::default();

    let run = |bed: &SampleBuffer, effect: &SampleBuffer, speech: &SampleBuffer| {
        let plan = plan(
            BufferMeta::of(bed),
            Some(BufferMeta::of(effect)),
            BufferMeta::of(speech),
            &recipe,
        )
        .unwrap();
        compose(bed, Some(effect), speech, &plan).unwrap()
    };

    let first = run(&bed, &effect, &speech);
    let second = run(&bed, &effect, &speech);
    assert_eq!(first, second);
}

#[test]
fn test_plan_values_match_across_calls() {
    let recipe = scenario_recipe();
    let a = plan(
        BufferMeta::new(30_000),
        Some(BufferMeta::new(1200)),
        BufferMeta::new(4000),
        &recipe,
    )
    .unwrap();
    let b = plan(
        BufferMeta::new(30_000),
        Some(BufferMeta::new(1200)),
        BufferMeta::new(4000),
        &recipe,
    )
    .unwrap();
    assert_eq_pretty!(a, b);
}

#[test]
fn test_gain_composes_additively_in_db() {
    let buf = sine_buffer(500, 440.0, 0.8);
    let twice = apply_gain(&apply_gain(&buf, -10.0).unwrap(), -10.0).unwrap();
    let once = apply_gain(&buf, -20.0).unwrap();

    for (a, b) in twice.samples().iter().zip(once.samples()) {
        assert_relative_eq!(a, b, epsilon = 1e-6);
    }
}

#[test]
fn test_fade_endpoints_are_exact() {
    let buf = constant_buffer(500, 1.0);
    let faded = apply_fade(&buf, &FadeSpec::ramp(500, -20.0, 0.0)).unwrap();

    assert_relative_eq!(faded.samples()[0], 0.1, epsilon = 1e-6);
    assert_relative_eq!(
        faded.samples()[faded.samples().len() - 1],
        1.0,
        epsilon = 1e-6
    );
}

#[test]
fn test_overlay_matches_manual_sum_and_bounds_are_enforced() {
    let base = sine_buffer(1000, 110.0, 0.3);
    let top = sine_buffer(1000, 440.0, 0.3);

    let merged = overlay(&base, &top, 0).unwrap();
    for ((&m, &b), &t) in merged
        .samples()
        .iter()
        .zip(base.samples())
        .zip(top.samples())
    {
        assert_relative_eq!(m, (b + t).clamp(-1.0, 1.0), epsilon = 1e-7);
    }

    let oversized = sine_buffer(2000, 440.0, 0.3);
    assert!(matches!(
        overlay(&base, &oversized, 0),
        Err(OvertureError::OverlayOutOfBounds { .. })
    ));
}

#[test]
fn test_short_bed_fails_before_composition() {
    let result = plan(
        BufferMeta::new(10_000),
        Some(BufferMeta::new(1200)),
        BufferMeta::new(4000),
        &scenario_recipe(),
    );

    match result {
        Err(OvertureError::InsufficientSourceLength {
            required_ms,
            available_ms,
            ..
        }) => {
            assert!(required_ms > available_ms);
            assert_eq!(available_ms, 10_000);
        }
        other => panic!("expected InsufficientSourceLength, got {:?}", other),
    }
}

// === Full pipeline including encode ===

#[test]
fn test_compose_intro_produces_mp3_bytes() {
    // The encode boundary shells out to ffmpeg; skip when it is absent
    let ffmpeg_available = Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    if !ffmpeg_available {
        eprintln!("skipping: ffmpeg not found on PATH");
        return;
    }

    let bed = sine_buffer(12_000, 110.0, 0.4);
    let speech = sine_buffer(2000, 220.0, 0.5);
    let result = compose_intro(&bed, None, &speech, &Recipe::default()).unwrap();

    assert_eq!(result.format.content_type, "audio/mpeg");
    assert_eq!(result.format.bitrate_kbps, 192);
    assert!(!result.bytes.is_empty());
    // MP3 frame sync or ID3 header at the front of the stream
    let header_ok = result.bytes.starts_with(b"ID3") || result.bytes[0] == 0xFF;
    assert!(header_ok, "unexpected stream header: {:?}", &result.bytes[..4]);
    assert_eq!(result.buffer.duration_ms(), 5000 + 2000 + 5000);
}
