//! End-to-end behaviour of a headless scene.

use glowsphere::prelude::*;
use glowsphere::synth::SPRITE_SIZE;

fn scene(count: u32, seed: u64) -> Scene {
    let config = SceneConfig {
        particle_count: count,
        seed: Some(seed),
        ..Default::default()
    };
    Scene::new(&config).unwrap()
}

fn click(scene: &mut Scene, at: Vec2) {
    scene.handle_pointer(PointerEvent::Down(at));
    scene.handle_pointer(PointerEvent::Up);
}

#[test]
fn test_click_disperses_and_second_click_reforms() {
    let mut scene = scene(200, 1);
    let mut time = Time::stepped(1.0 / 60.0);

    click(&mut scene, Vec2::new(400.0, 300.0));
    assert!(scene.is_expanded());
    for _ in 0..400 {
        time.update();
        scene.frame(&time);
    }
    assert!((scene.field().scale() - 6.0).abs() < 0.01);

    click(&mut scene, Vec2::new(400.0, 300.0));
    assert!(!scene.is_expanded());
    for _ in 0..600 {
        time.update();
        scene.frame(&time);
    }
    // Settled again: only the breathing pulse moves the scale.
    assert!((scene.field().scale() - 1.0).abs() <= 0.02 + 1e-3);
}

#[test]
fn test_drag_rotates_without_toggling() {
    let mut scene = scene(50, 2);
    let before = scene.engine().state().yaw;

    scene.handle_pointer(PointerEvent::Down(Vec2::new(100.0, 100.0)));
    let action = scene.handle_pointer(PointerEvent::Move(Vec2::new(120.0, 100.0)));
    scene.handle_pointer(PointerEvent::Up);

    match action {
        RouterAction::Rotate { yaw, pitch } => {
            assert!((yaw - 0.1).abs() < 1e-6);
            assert_eq!(pitch, 0.0);
        }
        other => panic!("expected a rotation, got {other:?}"),
    }
    assert!(!scene.is_expanded());
    assert!((scene.engine().state().yaw - before - 0.1).abs() < 1e-6);
}

#[test]
fn test_idle_rotation_pauses_during_gesture() {
    let mut scene = scene(50, 3);
    let mut time = Time::stepped(1.0 / 60.0);

    scene.handle_pointer(PointerEvent::Down(Vec2::ZERO));
    time.update();
    let held = scene.frame(&time);
    assert_eq!(held.yaw, 0.0);

    scene.handle_pointer(PointerEvent::Leave);
    time.update();
    let released = scene.frame(&time);
    assert!(released.yaw > 0.0);
    assert!(!scene.is_expanded());
}

#[test]
fn test_appearance_change_keeps_layout() {
    let mut scene = scene(300, 4);
    let layout = scene.field().layout().clone();

    for shape in ParticleShape::ALL {
        scene.set_shape(shape);
        scene.set_color(Rgb::new(170, 0, 255));
    }
    assert_eq!(scene.field().layout(), &layout);
    assert_eq!(scene.field().sprite().width, SPRITE_SIZE);
    assert_eq!(
        scene.field().sprite(),
        &synthesize(ParticleShape::Star, Rgb::new(170, 0, 255))
    );
}

#[test]
fn test_seeded_layouts_are_reproducible() {
    let a = scene(500, 42);
    let b = scene(500, 42);
    let c = scene(500, 43);
    assert_eq!(a.field().layout(), b.field().layout());
    assert_ne!(a.field().layout(), c.field().layout());
    assert!(a
        .field()
        .layout()
        .positions()
        .iter()
        .all(|p| p.length() <= 14.0 + 1e-3));
}
