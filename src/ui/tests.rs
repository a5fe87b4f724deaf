use super::*;
use crate::knob::Knob;
use crate::types::KnobEvents;
use eframe::egui;

fn raw_input(events: Vec<egui::Event>) -> egui::RawInput {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(800.0, 600.0),
    ));
    raw.events = events;
    raw
}

fn press(pos: egui::Pos2, pressed: bool) -> egui::Event {
    egui::Event::PointerButton {
        pos,
        button: egui::PointerButton::Primary,
        pressed,
        modifiers: egui::Modifiers::NONE,
    }
}

/// Draws the knob for one frame on `ctx` and returns its rect and events.
fn knob_frame(
    ctx: &egui::Context,
    knob: &mut Knob,
    events: Vec<egui::Event>,
) -> (egui::Rect, KnobEvents, bool) {
    let mut out = (egui::Rect::NOTHING, KnobEvents::default(), false);
    let _ = ctx.run(raw_input(events), |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            let shown = KnobWidget::new(knob).size(200.0).show(ui);
            out = (shown.response.rect, shown.events, shown.response.changed());
        });
    });
    out
}

/// Drives a drag from angle 0 to 1 rad around the knob center, then releases.
fn drag_one_radian(knob: &mut Knob) -> Vec<(KnobEvents, bool)> {
    let ctx = egui::Context::default();
    let (rect, _, _) = knob_frame(&ctx, knob, Vec::new());
    let center = rect.center();
    let at = |angle: f32| center + 80.0 * egui::Vec2::angled(angle);

    let mut frames = Vec::new();
    let script = vec![
        vec![egui::Event::PointerMoved(at(0.0))],
        vec![press(at(0.0), true)],
        vec![egui::Event::PointerMoved(at(0.5))],
        vec![egui::Event::PointerMoved(at(1.0))],
        vec![press(at(1.0), false)],
    ];
    for events in script {
        let (_, knob_events, changed) = knob_frame(&ctx, knob, events);
        frames.push((knob_events, changed));
    }
    frames
}

/// Runs one frame on `ctx` without drawing the knob.
fn hidden_frame(ctx: &egui::Context, events: Vec<egui::Event>) {
    let _ = ctx.run(raw_input(events), |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label("knob hidden");
        });
    });
}

fn knob_0_to_100() -> Knob {
    Knob::new(KnobConfig {
        minimum_value: 0.0,
        maximum_value: 100.0,
        start_angle: -std::f32::consts::PI,
        end_angle: std::f32::consts::PI,
        graduations: 10,
        large_graduations: 0,
        ..KnobConfig::default()
    })
}

#[test]
fn dragging_knob_snaps_and_notifies_once_on_release() {
    let mut knob = knob_0_to_100();
    let frames = drag_one_radian(&mut knob);

    // 1 rad of a full turn is ~15.9, which snaps to the next graduation.
    assert_eq!(knob.value(), 20.0);
    assert!(!knob.is_dragging());

    let changed: Vec<bool> = frames.iter().map(|(_, changed)| *changed).collect();
    assert_eq!(changed.iter().filter(|c| **c).count(), 1);
    assert_eq!(changed.last(), Some(&true));
    assert!(frames.iter().all(|(events, changed)| events.value_changed == *changed));
}

#[test]
fn continuous_knob_notifies_while_dragging() {
    let mut knob = knob_0_to_100();
    knob.set_continuous(true);
    let frames = drag_one_radian(&mut knob);

    let notifications = frames.iter().filter(|(_, changed)| *changed).count();
    assert!(notifications >= 2, "expected drag and release notifications, got {notifications}");
    assert_eq!(frames.last().map(|(_, changed)| *changed), Some(true));
}

#[test]
fn drag_released_while_hidden_is_cancelled_and_snapped() {
    let mut knob = knob_0_to_100();
    let ctx = egui::Context::default();
    let (rect, _, _) = knob_frame(&ctx, &mut knob, Vec::new());
    let center = rect.center();
    let at = |angle: f32| center + 80.0 * egui::Vec2::angled(angle);

    let mut changed = Vec::new();
    for events in [
        vec![egui::Event::PointerMoved(at(0.0))],
        vec![press(at(0.0), true)],
        vec![egui::Event::PointerMoved(at(0.5))],
    ] {
        changed.push(knob_frame(&ctx, &mut knob, events).2);
    }
    assert!(knob.is_dragging());

    hidden_frame(&ctx, vec![press(at(0.5), false)]);
    assert!(knob.is_dragging());

    let (_, events, shown_changed) = knob_frame(&ctx, &mut knob, Vec::new());
    changed.push(shown_changed);

    // 0.5 rad of a full turn is ~8.0, which snaps to 10.
    assert!(!knob.is_dragging());
    assert!(events.value_changed);
    assert_eq!(knob.value(), 10.0);
    assert_eq!(changed.iter().filter(|c| **c).count(), 1);
    assert_eq!(changed.last(), Some(&true));
}

#[test]
fn hovering_without_dragging_leaves_value_alone() {
    let mut knob = knob_0_to_100();
    knob.set_value(30.0, false);
    let ctx = egui::Context::default();
    let (rect, _, _) = knob_frame(&ctx, &mut knob, Vec::new());
    let (_, events, changed) =
        knob_frame(&ctx, &mut knob, vec![egui::Event::PointerMoved(rect.center())]);
    assert_eq!(events, KnobEvents::default());
    assert!(!changed);
    assert_eq!(knob.value(), 30.0);
}

#[test]
fn demo_app_persists_settings_and_value() {
    let mut app = KnobDemoApp::default();
    let mut config = app.config.clone();
    config.is_continuous = true;
    config.graduations = 52;
    app.apply_settings(config);
    app.knob.set_value(120.0, false);
    app.saved_value = app.knob.value();

    let json = app.to_json().expect("app state should serialize");
    let restored = KnobDemoApp::from_json(&json).expect("app state should parse");

    assert!(restored.config.is_continuous);
    assert_eq!(restored.config.graduations, 52);
    assert_eq!(restored.knob.value(), 120.0);
    assert_eq!(restored.knob.config(), &restored.config);
    assert_eq!(restored.notifications, 0);
}

#[test]
fn applying_narrower_range_reclamps_knob() {
    let mut app = KnobDemoApp::default();
    app.knob.set_value(200.0, false);
    let mut config = app.config.clone();
    config.maximum_value = 100.0;
    app.apply_settings(config);
    assert_eq!(app.knob.value(), 100.0);
    assert_eq!(app.saved_value, 100.0);
}

#[test]
fn reset_restores_demo_configuration() {
    let mut app = KnobDemoApp::default();
    let mut config = app.config.clone();
    config.large_graduations = 3;
    app.apply_settings(config);
    app.knob.set_value(50.0, false);
    app.notifications = 4;

    app.reset();

    assert_eq!(app.config, state::demo_config());
    assert_eq!(app.knob.value(), 0.0);
    assert_eq!(app.notifications, 0);
}

#[test]
fn knob_panel_renders_headless() {
    let mut app = KnobDemoApp::default();
    let ctx = egui::Context::default();
    let output = ctx.run(raw_input(Vec::new()), |ctx| {
        egui::SidePanel::left("settings").show(ctx, |ui| {
            app.draw_settings(ui);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            app.draw_knob_panel(ui);
        });
    });
    assert!(!output.shapes.is_empty());
    assert_eq!(app.notifications, 0);
}
