//! Scenario tests for the tools and the tool manager

use super::*;
use crate::core::settings::EditorSettings;
use crate::core::state::{Contour, Glyph, Point as GlyphPoint, PointId};
use crate::editing::{Editor, MemoryFontEngine};
use kurbo::{Point, Vec2};

fn editor_with(contours: Vec<(Vec<GlyphPoint>, bool)>) -> (Editor, Vec<Vec<PointId>>) {
    let mut glyph = Glyph::new("a", Some(0x61), 500.0);
    let mut ids = Vec::new();
    for (points, closed) in contours {
        ids.push(points.iter().map(|p| p.id).collect());
        glyph.contours.push(Contour::with_points(points, closed));
    }
    let mut engine = MemoryFontEngine::new();
    engine.insert_glyph(glyph);
    let mut editor = Editor::new(Box::new(engine), EditorSettings::default());
    editor.start_session(0x61).unwrap();
    (editor, ids)
}

fn empty_editor() -> Editor {
    editor_with(Vec::new()).0
}

fn square() -> (Editor, Vec<PointId>) {
    let (editor, mut ids) = editor_with(vec![(
        vec![
            GlyphPoint::on_curve(0.0, 0.0),
            GlyphPoint::on_curve(100.0, 0.0),
            GlyphPoint::on_curve(100.0, 100.0),
            GlyphPoint::on_curve(0.0, 100.0),
        ],
        true,
    )]);
    (editor, ids.remove(0))
}

fn position(editor: &Editor, id: PointId) -> Point {
    editor.glyph().unwrap().point(id).unwrap().position()
}

fn assert_near(actual: Point, expected: Point) {
    assert!(
        actual.distance(expected) < 1e-9,
        "expected {expected:?}, got {actual:?}"
    );
}

fn down(x: f64, y: f64) -> ToolEvent {
    ToolEvent::PointerDown {
        pos: Point::new(x, y),
        modifiers: Modifiers::NONE,
    }
}

fn up(x: f64, y: f64) -> ToolEvent {
    ToolEvent::PointerUp {
        pos: Point::new(x, y),
        modifiers: Modifiers::NONE,
    }
}

fn drag(origin: (f64, f64), pos: (f64, f64)) -> ToolEvent {
    ToolEvent::Drag {
        pos: Point::new(pos.0, pos.1),
        origin: Point::new(origin.0, origin.1),
        modifiers: Modifiers::NONE,
    }
}

fn drag_end(origin: (f64, f64), pos: (f64, f64)) -> ToolEvent {
    ToolEvent::DragEnd {
        pos: Point::new(pos.0, pos.1),
        origin: Point::new(origin.0, origin.1),
        modifiers: Modifiers::NONE,
    }
}

fn key(key: Key, modifiers: Modifiers) -> ToolEvent {
    ToolEvent::KeyDown { key, modifiers }
}

/// Every logged transition must be in the tool's declared table
fn assert_compliant(tool: &dyn Tool) {
    for record in tool.transition_log() {
        assert!(
            tool.states().contains(&record.from) && tool.states().contains(&record.to),
            "{:?} uses an undeclared state: {:?}",
            tool.id(),
            record
        );
        assert!(
            tool.transitions()
                .iter()
                .any(|r| r.from == record.from && r.event == record.event && r.to == record.to),
            "{:?} took an undeclared transition: {:?}",
            tool.id(),
            record
        );
    }
}

fn assert_all_compliant(manager: &ToolManager) {
    for id in ToolId::ALL {
        assert_compliant(manager.tool(id));
    }
}

mod manager_tests {
    use super::*;

    #[test]
    fn test_tool_activation() {
        let mut editor = empty_editor();
        let mut manager = ToolManager::new(&mut editor);

        assert_eq!(manager.active(), ToolId::Select);
        assert_eq!(manager.state_name(), "ready");
        assert!(!manager.just_changed());

        manager.activate(ToolId::Pen, &mut editor);
        assert!(manager.is_active(ToolId::Pen));
        assert!(manager.just_changed());
        assert_eq!(manager.previous(), Some(ToolId::Select));
        assert_eq!(manager.tool(ToolId::Select).state_name(), "idle");

        manager.clear_changed();
        manager.activate(ToolId::Pen, &mut editor);
        assert!(!manager.just_changed());
        assert_all_compliant(&manager);
    }

    #[test]
    fn test_space_holds_hand_tool() {
        let mut editor = empty_editor();
        let mut manager = ToolManager::new(&mut editor);
        manager.activate(ToolId::Pen, &mut editor);

        assert!(manager.handle_event(&key(Key::Space, Modifiers::NONE), &mut editor));
        assert!(manager.is_active(ToolId::Hand));
        assert!(manager.is_temporary());

        let release = ToolEvent::KeyUp {
            key: Key::Space,
            modifiers: Modifiers::NONE,
        };
        assert!(manager.handle_event(&release, &mut editor));
        assert!(manager.is_active(ToolId::Pen));
        assert!(!manager.is_temporary());
        assert!(!manager.pop_temporary(&mut editor));
    }

    #[test]
    fn test_tool_id_conversion() {
        assert_eq!(ToolId::from_name("select"), Some(ToolId::Select));
        assert_eq!(ToolId::from_name("hand"), Some(ToolId::Hand));
        assert_eq!(ToolId::from_name("knife"), None);
        assert_eq!(ToolId::Pen.as_str(), "pen");
        assert_eq!(ToolId::Pen.name(), "Pen");
    }

    #[test]
    fn switching_tools_mid_gesture_cancels_it() {
        let mut editor = empty_editor();
        let mut manager = ToolManager::new(&mut editor);
        manager.activate(ToolId::Pen, &mut editor);

        manager.handle_event(&down(0.0, 0.0), &mut editor);
        assert!(editor.is_batching());

        manager.activate(ToolId::Select, &mut editor);
        assert!(!editor.is_batching());
        assert!(editor.glyph().unwrap().contours.is_empty());
        assert!(!editor.history().can_undo());
        assert_eq!(manager.tool(ToolId::Pen).state_name(), "idle");
        assert_all_compliant(&manager);
    }
}

mod pen_tests {
    use super::*;

    fn pen(editor: &mut Editor) -> ToolManager {
        let mut manager = ToolManager::new(editor);
        manager.activate(ToolId::Pen, editor);
        manager
    }

    fn click(manager: &mut ToolManager, editor: &mut Editor, x: f64, y: f64) {
        assert!(manager.handle_event(&down(x, y), editor));
        assert!(manager.handle_event(&up(x, y), editor));
    }

    #[test]
    fn click_places_anchors_one_undo_step_each() {
        let mut editor = empty_editor();
        let mut manager = pen(&mut editor);

        click(&mut manager, &mut editor, 0.0, 0.0);
        click(&mut manager, &mut editor, 100.0, 0.0);

        let glyph = editor.glyph().unwrap();
        assert_eq!(glyph.contours.len(), 1);
        assert_eq!(glyph.contours[0].len(), 2);
        assert!(!glyph.contours[0].closed);
        assert_eq!(editor.history().past_len(), 2);
        assert_eq!(editor.history().undo_label(), Some("Add Point"));
        assert_eq!(manager.state_name(), "ready");

        editor.undo();
        assert_eq!(editor.glyph().unwrap().contours[0].len(), 1);
        assert_all_compliant(&manager);
    }

    #[test]
    fn drag_pulls_mirrored_handles() {
        let mut editor = empty_editor();
        let mut manager = pen(&mut editor);
        click(&mut manager, &mut editor, 0.0, 0.0);

        manager.handle_event(&down(100.0, 0.0), &mut editor);
        assert_eq!(manager.state_name(), "anchored");
        manager.handle_event(&drag((100.0, 0.0), (100.0, 50.0)), &mut editor);
        assert_eq!(manager.state_name(), "dragging");
        manager.handle_event(&drag((100.0, 0.0), (120.0, 50.0)), &mut editor);
        manager.handle_event(&drag_end((100.0, 0.0), (120.0, 50.0)), &mut editor);
        assert_eq!(manager.state_name(), "anchored");
        manager.handle_event(&up(120.0, 50.0), &mut editor);
        assert_eq!(manager.state_name(), "ready");

        let contour = &editor.glyph().unwrap().contours[0];
        let positions: Vec<Point> = contour.points.iter().map(|p| p.position()).collect();
        assert_eq!(
            positions,
            vec![
                Point::new(0.0, 0.0),
                Point::new(80.0, -50.0),
                Point::new(100.0, 0.0),
                Point::new(120.0, 50.0),
            ]
        );
        assert!(contour.points[2].smooth);
        assert!(!contour.points[1].is_on_curve());

        // Anchor and both handles go in one step
        assert_eq!(editor.history().past_len(), 2);
        editor.undo();
        assert_eq!(editor.glyph().unwrap().contours[0].len(), 1);
        assert_all_compliant(&manager);
    }

    #[test]
    fn small_drag_stays_a_click() {
        let mut editor = empty_editor();
        let mut manager = pen(&mut editor);
        manager.handle_event(&down(0.0, 0.0), &mut editor);
        manager.handle_event(&drag((0.0, 0.0), (1.0, 1.0)), &mut editor);
        assert_eq!(manager.state_name(), "anchored");
        manager.handle_event(&drag_end((0.0, 0.0), (1.0, 1.0)), &mut editor);
        assert_eq!(manager.state_name(), "ready");
        assert_eq!(editor.glyph().unwrap().point_count(), 1);
    }

    #[test]
    fn click_on_start_point_closes_contour() {
        let mut editor = empty_editor();
        let mut manager = pen(&mut editor);
        click(&mut manager, &mut editor, 0.0, 0.0);
        click(&mut manager, &mut editor, 100.0, 0.0);
        click(&mut manager, &mut editor, 100.0, 100.0);

        let hover = ToolEvent::PointerMove {
            pos: Point::new(1.0, 1.0),
        };
        manager.handle_event(&hover, &mut editor);
        assert_eq!(
            *manager.pen_tool().state(),
            PenState::Ready {
                hint: Some(pen::PenHint::Close)
            }
        );

        click(&mut manager, &mut editor, 1.0, 1.0);
        let glyph = editor.glyph().unwrap();
        assert!(glyph.contours[0].closed);
        assert_eq!(glyph.contours[0].len(), 3);
        assert_eq!(glyph.active_contour_id, None);
        assert_eq!(editor.history().undo_label(), Some("Close Contour"));

        editor.undo();
        let glyph = editor.glyph().unwrap();
        assert!(!glyph.contours[0].closed);
        assert_eq!(glyph.active_contour_id, Some(glyph.contours[0].id));
    }

    #[test]
    fn lone_anchor_with_handle_does_not_close() {
        let mut editor = empty_editor();
        let mut manager = pen(&mut editor);
        manager.handle_event(&down(0.0, 0.0), &mut editor);
        manager.handle_event(&drag((0.0, 0.0), (50.0, 50.0)), &mut editor);
        manager.handle_event(&drag_end((0.0, 0.0), (50.0, 50.0)), &mut editor);
        manager.handle_event(&up(50.0, 50.0), &mut editor);
        let contour = &editor.glyph().unwrap().contours[0];
        assert!(contour.len() >= 2);
        assert_eq!(contour.points.iter().filter(|p| p.is_on_curve()).count(), 1);

        let hover = ToolEvent::PointerMove {
            pos: Point::new(0.0, 0.0),
        };
        manager.handle_event(&hover, &mut editor);
        assert_ne!(
            *manager.pen_tool().state(),
            PenState::Ready {
                hint: Some(pen::PenHint::Close)
            }
        );

        click(&mut manager, &mut editor, 0.0, 0.0);
        let glyph = editor.glyph().unwrap();
        assert!(!glyph.contours[0].closed);
        assert_ne!(editor.history().undo_label(), Some("Close Contour"));
    }

    #[test]
    fn escape_discards_the_press() {
        let mut editor = empty_editor();
        let mut manager = pen(&mut editor);
        manager.handle_event(&down(0.0, 0.0), &mut editor);
        manager.handle_event(&drag((0.0, 0.0), (0.0, 40.0)), &mut editor);
        assert!(editor.glyph().unwrap().point_count() > 1);

        manager.handle_event(&key(Key::Escape, Modifiers::NONE), &mut editor);
        assert_eq!(manager.state_name(), "ready");
        assert!(editor.glyph().unwrap().contours.is_empty());
        assert!(!editor.history().can_undo());
        assert_all_compliant(&manager);
    }

    #[test]
    fn escape_in_ready_finishes_contour() {
        let mut editor = empty_editor();
        let mut manager = pen(&mut editor);
        click(&mut manager, &mut editor, 0.0, 0.0);
        click(&mut manager, &mut editor, 100.0, 0.0);
        manager.handle_event(&key(Key::Escape, Modifiers::NONE), &mut editor);
        assert_eq!(editor.glyph().unwrap().active_contour_id, None);

        // The next click starts a new contour
        click(&mut manager, &mut editor, 0.0, 200.0);
        assert_eq!(editor.glyph().unwrap().contours.len(), 2);
    }

    #[test]
    fn click_on_open_end_continues_contour() {
        let (mut editor, ids) = editor_with(vec![(
            vec![
                GlyphPoint::on_curve(0.0, 0.0),
                GlyphPoint::on_curve(100.0, 0.0),
            ],
            false,
        )]);
        let mut manager = pen(&mut editor);

        click(&mut manager, &mut editor, 100.0, 0.0);
        click(&mut manager, &mut editor, 200.0, 0.0);

        let glyph = editor.glyph().unwrap();
        assert_eq!(glyph.contours.len(), 1);
        assert_eq!(glyph.contours[0].len(), 3);
        assert_eq!(glyph.contours[0].points[1].id, ids[0][1]);
    }

    #[test]
    fn click_on_open_start_reverses_then_continues() {
        let (mut editor, ids) = editor_with(vec![(
            vec![
                GlyphPoint::on_curve(0.0, 0.0),
                GlyphPoint::on_curve(100.0, 0.0),
            ],
            false,
        )]);
        let mut manager = pen(&mut editor);

        click(&mut manager, &mut editor, 0.0, 0.0);
        click(&mut manager, &mut editor, -100.0, 0.0);

        let contour = &editor.glyph().unwrap().contours[0];
        assert_eq!(contour.points[0].id, ids[0][1]);
        assert_eq!(contour.points[1].id, ids[0][0]);
        assert_eq!(contour.points[2].position(), Point::new(-100.0, 0.0));
    }

    #[test]
    fn click_on_line_splits_it() {
        let (mut editor, ids) = square();
        let mut manager = pen(&mut editor);

        click(&mut manager, &mut editor, 50.0, 0.0);

        let contour = &editor.glyph().unwrap().contours[0];
        assert_eq!(contour.len(), 5);
        assert_eq!(contour.points[1].position(), Point::new(50.0, 0.0));
        assert_eq!(contour.points[2].id, ids[1]);
        assert_eq!(editor.history().undo_label(), Some("Split Segment"));
    }

    #[test]
    fn click_on_interior_anchor_splits_contour() {
        let (mut editor, ids) = editor_with(vec![(
            vec![
                GlyphPoint::on_curve(0.0, 0.0),
                GlyphPoint::on_curve(100.0, 0.0),
                GlyphPoint::on_curve(200.0, 0.0),
            ],
            false,
        )]);
        let mut manager = pen(&mut editor);
        click(&mut manager, &mut editor, 100.0, 0.0);

        let glyph = editor.glyph().unwrap();
        assert_eq!(glyph.contours.len(), 2);
        assert_eq!(glyph.contours[0].len(), 2);
        assert_eq!(glyph.contours[0].points[1].id, ids[0][1]);
        assert_eq!(glyph.contours[1].points[1].id, ids[0][2]);

        editor.undo();
        assert_eq!(editor.glyph().unwrap().contours.len(), 1);
    }
}

mod select_tests {
    use super::*;

    fn select_all(manager: &mut ToolManager, editor: &mut Editor) {
        assert!(manager.handle_event(&key(Key::Char('a'), Modifiers::CMD), editor));
        assert_eq!(manager.state_name(), "selected");
    }

    #[test]
    fn activation_reflects_selection() {
        let (mut editor, ids) = square();
        editor.selection_mut().select(ids[0]);
        let manager = ToolManager::new(&mut editor);
        assert_eq!(manager.state_name(), "selected");
    }

    #[test]
    fn click_point_then_empty_space() {
        let (mut editor, ids) = square();
        let mut manager = ToolManager::new(&mut editor);

        manager.handle_event(&down(100.0, 0.0), &mut editor);
        manager.handle_event(&up(100.0, 0.0), &mut editor);
        assert_eq!(manager.state_name(), "selected");
        assert!(editor.selection().contains(ids[1]));

        let shift_down = ToolEvent::PointerDown {
            pos: Point::new(0.0, 100.0),
            modifiers: Modifiers::SHIFT,
        };
        manager.handle_event(&shift_down, &mut editor);
        assert_eq!(editor.selection().len(), 2);

        manager.handle_event(&down(50.0, 50.0), &mut editor);
        assert_eq!(manager.state_name(), "ready");
        assert!(editor.selection().is_empty());
        assert_all_compliant(&manager);
    }

    #[test]
    fn click_segment_selects_its_points() {
        let (mut editor, ids) = square();
        let mut manager = ToolManager::new(&mut editor);
        manager.handle_event(&down(50.0, 0.0), &mut editor);
        assert_eq!(editor.selection().len(), 2);
        assert!(editor.selection().contains(ids[0]));
        assert!(editor.selection().contains(ids[1]));
    }

    #[test]
    fn marquee_selects_enclosed_points() {
        let (mut editor, ids) = square();
        let mut manager = ToolManager::new(&mut editor);

        manager.handle_event(&down(-10.0, -10.0), &mut editor);
        manager.handle_event(&drag((-10.0, -10.0), (20.0, 50.0)), &mut editor);
        assert_eq!(manager.state_name(), "marquee");
        assert_eq!(editor.selection().len(), 1);
        manager.handle_event(&drag((-10.0, -10.0), (50.0, 110.0)), &mut editor);
        manager.handle_event(&drag_end((-10.0, -10.0), (50.0, 110.0)), &mut editor);

        assert_eq!(manager.state_name(), "selected");
        assert_eq!(editor.selection().len(), 2);
        assert!(editor.selection().contains(ids[0]));
        assert!(editor.selection().contains(ids[3]));
        assert_all_compliant(&manager);
    }

    #[test]
    fn escape_restores_marquee_base() {
        let (mut editor, ids) = square();
        editor.selection_mut().select(ids[2]);
        let mut manager = ToolManager::new(&mut editor);

        let shift_drag = ToolEvent::Drag {
            pos: Point::new(50.0, 50.0),
            origin: Point::new(-10.0, -10.0),
            modifiers: Modifiers::SHIFT,
        };
        manager.handle_event(&shift_drag, &mut editor);
        assert_eq!(editor.selection().len(), 2);

        manager.handle_event(&key(Key::Escape, Modifiers::NONE), &mut editor);
        assert_eq!(manager.state_name(), "selected");
        assert_eq!(editor.selection().len(), 1);
        assert!(editor.selection().contains(ids[2]));
    }

    #[test]
    fn drag_move_is_one_step_with_smart_edits() {
        let (mut editor, ids) = editor_with(vec![(
            vec![
                GlyphPoint::on_curve(0.0, 0.0),
                GlyphPoint::off_curve(40.0, 0.0),
                GlyphPoint::on_curve(100.0, 50.0).with_smooth(true),
                GlyphPoint::off_curve(160.0, 100.0),
                GlyphPoint::on_curve(200.0, 100.0),
            ],
            false,
        )]);
        let ids = &ids[0];
        let mut manager = ToolManager::new(&mut editor);

        manager.handle_event(&down(100.0, 50.0), &mut editor);
        manager.handle_event(&drag((100.0, 50.0), (105.0, 48.0)), &mut editor);
        assert_eq!(manager.state_name(), "dragging");
        manager.handle_event(&drag((100.0, 50.0), (110.0, 45.0)), &mut editor);
        manager.handle_event(&drag_end((100.0, 50.0), (110.0, 45.0)), &mut editor);
        assert_eq!(manager.state_name(), "selected");

        assert_eq!(position(&editor, ids[1]), Point::new(50.0, -5.0));
        assert_eq!(position(&editor, ids[2]), Point::new(110.0, 45.0));
        assert_eq!(position(&editor, ids[3]), Point::new(170.0, 95.0));
        assert_eq!(editor.history().past_len(), 1);
        assert_eq!(editor.history().undo_label(), Some("Move Points"));

        editor.undo();
        assert_eq!(position(&editor, ids[2]), Point::new(100.0, 50.0));
        assert_eq!(position(&editor, ids[3]), Point::new(160.0, 100.0));
        assert_all_compliant(&manager);
    }

    #[test]
    fn shift_drag_locks_axis() {
        let (mut editor, ids) = square();
        let mut manager = ToolManager::new(&mut editor);
        manager.handle_event(&down(100.0, 100.0), &mut editor);
        let shift_drag = ToolEvent::Drag {
            pos: Point::new(130.0, 105.0),
            origin: Point::new(100.0, 100.0),
            modifiers: Modifiers::SHIFT,
        };
        manager.handle_event(&shift_drag, &mut editor);
        assert_eq!(position(&editor, ids[2]), Point::new(130.0, 100.0));
    }

    #[test]
    fn escape_during_drag_reverts_move() {
        let (mut editor, ids) = square();
        let mut manager = ToolManager::new(&mut editor);
        manager.handle_event(&down(0.0, 0.0), &mut editor);
        manager.handle_event(&drag((0.0, 0.0), (30.0, 30.0)), &mut editor);
        assert_eq!(position(&editor, ids[0]), Point::new(30.0, 30.0));

        manager.handle_event(&key(Key::Escape, Modifiers::NONE), &mut editor);
        assert_eq!(position(&editor, ids[0]), Point::new(0.0, 0.0));
        assert!(!editor.history().can_undo());
        assert_eq!(manager.state_name(), "selected");
    }

    #[test]
    fn rotation_commits_one_history_entry() {
        let (mut editor, ids) = square();
        let mut manager = ToolManager::new(&mut editor);
        select_all(&mut manager, &mut editor);

        manager.handle_event(&down(110.0, 110.0), &mut editor);
        assert_eq!(manager.state_name(), "rotating");
        // 88 degrees from the press angle snaps to 90
        let pos = Point::new(50.0, 50.0) + Vec2::from_angle((45.0f64 + 88.0).to_radians()) * 84.85;
        manager.handle_event(&drag((110.0, 110.0), (pos.x, pos.y)), &mut editor);
        assert!(editor.is_previewing());
        assert_near(position(&editor, ids[0]), Point::new(100.0, 0.0));
        assert!(!editor.history().can_undo());

        manager.handle_event(&drag_end((110.0, 110.0), (pos.x, pos.y)), &mut editor);
        assert_eq!(manager.state_name(), "selected");
        assert!(!editor.is_previewing());
        assert_near(position(&editor, ids[0]), Point::new(100.0, 0.0));
        assert_near(position(&editor, ids[1]), Point::new(100.0, 100.0));
        assert_eq!(editor.history().past_len(), 1);
        assert_eq!(editor.history().undo_label(), Some("Rotate"));

        editor.undo();
        assert_eq!(position(&editor, ids[0]), Point::new(0.0, 0.0));
        assert_all_compliant(&manager);
    }

    #[test]
    fn escape_cancels_rotation() {
        let (mut editor, ids) = square();
        let mut manager = ToolManager::new(&mut editor);
        select_all(&mut manager, &mut editor);

        manager.handle_event(&down(110.0, 110.0), &mut editor);
        manager.handle_event(&drag((110.0, 110.0), (-10.0, 110.0)), &mut editor);
        manager.handle_event(&key(Key::Escape, Modifiers::NONE), &mut editor);

        assert_eq!(position(&editor, ids[0]), Point::new(0.0, 0.0));
        assert!(!editor.is_previewing());
        assert!(!editor.history().can_undo());
    }

    #[test]
    fn resize_scales_about_opposite_corner() {
        let (mut editor, ids) = square();
        let mut manager = ToolManager::new(&mut editor);
        select_all(&mut manager, &mut editor);

        manager.handle_event(&down(100.0, 100.0), &mut editor);
        assert_eq!(manager.state_name(), "resizing");
        manager.handle_event(&drag((100.0, 100.0), (150.0, 150.0)), &mut editor);
        manager.handle_event(&drag((100.0, 100.0), (200.0, 150.0)), &mut editor);
        manager.handle_event(&drag_end((100.0, 100.0), (200.0, 150.0)), &mut editor);

        assert_eq!(position(&editor, ids[0]), Point::new(0.0, 0.0));
        assert_eq!(position(&editor, ids[2]), Point::new(200.0, 150.0));
        assert_eq!(editor.history().past_len(), 1);
        assert_eq!(editor.history().undo_label(), Some("Scale"));
        assert_all_compliant(&manager);
    }

    #[test]
    fn nudge_and_delete() {
        let (mut editor, ids) = square();
        let mut manager = ToolManager::new(&mut editor);
        manager.handle_event(&down(0.0, 0.0), &mut editor);
        manager.handle_event(&up(0.0, 0.0), &mut editor);

        manager.handle_event(&key(Key::ArrowRight, Modifiers::SHIFT), &mut editor);
        assert_eq!(position(&editor, ids[0]), Point::new(10.0, 0.0));
        manager.handle_event(&key(Key::ArrowUp, Modifiers::NONE), &mut editor);
        assert_eq!(position(&editor, ids[0]), Point::new(10.0, 1.0));

        manager.handle_event(&key(Key::Delete, Modifiers::NONE), &mut editor);
        assert_eq!(manager.state_name(), "ready");
        assert_eq!(editor.glyph().unwrap().contours[0].len(), 3);
        assert_eq!(editor.history().past_len(), 3);
        assert_all_compliant(&manager);
    }

    #[test]
    fn escape_clears_selection() {
        let (mut editor, _) = square();
        let mut manager = ToolManager::new(&mut editor);
        select_all(&mut manager, &mut editor);
        manager.handle_event(&key(Key::Escape, Modifiers::NONE), &mut editor);
        assert_eq!(manager.state_name(), "ready");
        assert!(editor.selection().is_empty());
    }
}

mod hand_tests {
    use super::*;

    #[test]
    fn drag_pans_viewport() {
        let mut editor = empty_editor();
        let mut manager = ToolManager::new(&mut editor);
        manager.activate(ToolId::Hand, &mut editor);

        manager.handle_event(&drag((0.0, 0.0), (10.0, 10.0)), &mut editor);
        assert_eq!(manager.state_name(), "panning");
        assert_eq!(editor.viewport().pan, Vec2::new(10.0, -10.0));

        manager.handle_event(&drag((0.0, 0.0), (20.0, 5.0)), &mut editor);
        assert_eq!(editor.viewport().pan, Vec2::new(20.0, -5.0));

        manager.handle_event(&drag_end((0.0, 0.0), (20.0, 5.0)), &mut editor);
        assert_eq!(manager.state_name(), "ready");
        assert_eq!(editor.viewport().pan, Vec2::new(20.0, -5.0));
        assert_all_compliant(&manager);
    }

    #[test]
    fn escape_restores_pan() {
        let mut editor = empty_editor();
        let mut manager = ToolManager::new(&mut editor);
        manager.activate(ToolId::Hand, &mut editor);

        manager.handle_event(&drag((0.0, 0.0), (10.0, 10.0)), &mut editor);
        manager.handle_event(&key(Key::Escape, Modifiers::NONE), &mut editor);
        assert_eq!(editor.viewport().pan, Vec2::ZERO);
        assert_eq!(manager.state_name(), "ready");
    }
}
