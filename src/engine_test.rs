#![allow(clippy::float_cmp)]

use super::*;
use crate::selection::Corner;

// =============================================================
// Helpers
// =============================================================

/// Engine at zoom 1 with no pan, so screen and world coincide.
fn core_at_origin() -> EngineCore {
    let mut core = EngineCore::new();
    core.camera = Camera::default();
    core.set_viewport(600.0, 400.0, 1.0);
    core
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn key(name: &str) -> Key {
    Key(name.into())
}

fn bounds(core: &EngineCore, id: ObjectId) -> (f64, f64, f64, f64) {
    let o = core.object(id).unwrap();
    (o.x, o.y, o.w, o.h)
}

fn with_categories() -> EngineCore {
    let mut core = core_at_origin();
    core.import_layout(
        r##"{
            "wall": {"color": "#333333", "objects": [{"x":0,"y":0,"w":30,"h":30}]},
            "door": {"color": "#aa5522", "objects": [{"x":60,"y":0,"w":15,"h":30}]}
        }"##,
    )
    .unwrap();
    core
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_core_starts_panned_four_cells() {
    let core = EngineCore::new();
    assert_eq!(core.camera(), Camera { pan_x: 60.0, pan_y: 60.0, zoom: 1.0 });
    assert!(core.selected_object().is_none());
    assert!(core.hovering().is_none());
    assert!(core.dragging().is_none());
    assert_eq!(core.snap().unit(), 15);
}

#[test]
fn with_config_uses_configured_snap_for_initial_pan() {
    let config = EditorConfig { snap: 10, initial_pan_cells: 2, ..EditorConfig::default() };
    let core = EngineCore::with_config(config).unwrap();
    assert_eq!(core.camera().pan(), pt(20.0, 20.0));
    assert_eq!(core.config().snap, 10);
}

#[test]
fn with_config_rejects_invalid_config() {
    let inverted = EditorConfig { min_zoom: 2.5, ..EditorConfig::default() };
    assert!(matches!(EngineCore::with_config(inverted), Err(ConfigError::InvalidZoomRange { .. })));
    let no_snap = EditorConfig { snap: 0, ..EditorConfig::default() };
    assert!(matches!(EngineCore::with_config(no_snap), Err(ConfigError::InvalidSnap)));
}

// =============================================================
// Viewport: pan / zoom / snap
// =============================================================

#[test]
fn pan_moves_by_snap_units() {
    let mut core = EngineCore::new();
    core.pan(1.0, -1.0);
    assert_eq!(core.camera().pan(), pt(45.0, 75.0));
}

#[test]
fn zoom_keeps_hovered_point_fixed() {
    let mut core = EngineCore::new();
    core.update_cursor(pt(200.0, 100.0));
    let before = core.hover_world();
    assert!(core.zoom(0.5));
    assert_eq!(core.camera().zoom, 1.5);
    assert_eq!(core.camera().world_to_screen(before), pt(200.0, 100.0));
    assert_eq!(core.hover_world(), before);
}

#[test]
fn zoom_clamps_and_reports_no_change_at_bounds() {
    let mut core = EngineCore::new();
    assert!(core.zoom(5.0));
    assert_eq!(core.camera().zoom, 2.0);
    let cam = core.camera();
    assert!(!core.zoom(0.1));
    assert_eq!(core.camera(), cam);

    assert!(core.zoom(-10.0));
    assert_eq!(core.camera().zoom, 0.3);
    assert!(!core.zoom(-0.1));
}

#[test]
fn wheel_zooms_by_scaled_delta() {
    let mut core = EngineCore::new();
    let actions = core.on_wheel(pt(100.0, 100.0), WheelDelta { dx: 0.0, dy: -100.0 });
    assert_eq!(actions, [Action::RenderNeeded]);
    assert!((core.camera().zoom - 1.1).abs() < 1e-12);

    core.zoom(1.0);
    assert!(core.on_wheel(pt(100.0, 100.0), WheelDelta { dx: 0.0, dy: -100.0 }).is_empty());
}

#[test]
fn set_snap_rejects_zero() {
    let mut core = EngineCore::new();
    assert!(matches!(core.set_snap(0), Err(ConfigError::InvalidSnap)));
    assert_eq!(core.snap().unit(), 15);
    core.set_snap(10).unwrap();
    assert_eq!(core.snap().unit(), 10);
    assert_eq!(core.config().snap, 10);
}

#[test]
fn hover_snapped_follows_unit() {
    let mut core = core_at_origin();
    core.update_cursor(pt(22.0, 8.0));
    assert_eq!(core.hover_snapped(), pt(15.0, 15.0));
    core.set_snap(10).unwrap();
    assert_eq!(core.hover_snapped(), pt(20.0, 10.0));
}

// =============================================================
// Hover resolution
// =============================================================

#[test]
fn single_object_hover() {
    let mut core = EngineCore::new();
    let id = core.doc.insert(MapObject::new(0.0, 0.0, 75.0, 45.0));
    // pan is 60: screen = world + 60
    core.update_cursor(pt(70.0, 70.0));
    assert_eq!(core.hovering(), Some(Entity::Object(id)));
    core.update_cursor(pt(140.0, 110.0));
    assert_eq!(core.hovering(), None);
}

#[test]
fn overlapping_objects_hover_the_later_one() {
    let mut core = core_at_origin();
    let _a = core.doc.insert(MapObject::new(0.0, 0.0, 30.0, 30.0));
    let b = core.doc.insert(MapObject::new(15.0, 15.0, 30.0, 30.0));
    core.update_cursor(pt(20.0, 20.0));
    assert_eq!(core.hovering(), Some(Entity::Object(b)));
}

#[test]
fn overlap_hover_after_raise() {
    let mut core = core_at_origin();
    let a = core.doc.insert(MapObject::new(0.0, 0.0, 30.0, 30.0));
    let b = core.doc.insert(MapObject::new(15.0, 15.0, 30.0, 30.0));

    core.on_pointer_down(pt(5.0, 5.0), Button::Primary);
    core.on_pointer_up(pt(5.0, 5.0), Button::Primary);
    assert_eq!(core.doc.ids(), [b, a]);

    core.update_cursor(pt(20.0, 20.0));
    assert_eq!(core.hovering(), Some(Entity::Object(a)));
}

#[test]
fn selected_handle_beats_object_underneath() {
    let mut core = core_at_origin();
    let a = core.doc.insert(MapObject::new(0.0, 0.0, 30.0, 30.0));
    let b = core.doc.insert(MapObject::new(20.0, 20.0, 30.0, 30.0));
    core.set_selected(Some(a), None);
    // (31, 31) is inside b and within the bottom-right handle of a.
    core.update_cursor(pt(31.0, 31.0));
    assert_eq!(core.hovering(), Some(Entity::Handle { object: a, corner: Corner::BottomRight }));

    core.set_selected(Some(b), None);
    core.update_cursor(pt(31.0, 31.0));
    assert_eq!(core.hovering(), Some(Entity::Object(b)));
}

#[test]
fn handle_hit_radius_is_screen_constant() {
    let mut core = core_at_origin();
    let id = core.doc.insert(MapObject::new(0.0, 0.0, 75.0, 45.0));
    core.set_selected(Some(id), None);
    core.camera.zoom = 2.0;
    // World (79, 45) is 4 units from the corner: 8 px at zoom 2, outside 6 px.
    core.update_cursor(core.camera().world_to_screen(pt(79.0, 45.0)));
    assert_eq!(core.hovering(), None);
    // World (77, 45) is 4 px away.
    core.update_cursor(core.camera().world_to_screen(pt(77.0, 45.0)));
    assert_eq!(core.hovering(), Some(Entity::Handle { object: id, corner: Corner::BottomRight }));
}

// =============================================================
// Selection
// =============================================================

#[test]
fn selecting_places_handles_on_corners() {
    let mut core = core_at_origin();
    let id = core.doc.insert(MapObject::new(15.0, 30.0, 75.0, 45.0));
    core.set_selected(Some(id), None);
    let positions: Vec<Point> = core.selection().handles().iter().map(|h| h.position()).collect();
    assert_eq!(positions, [pt(15.0, 30.0), pt(15.0, 75.0), pt(90.0, 30.0), pt(90.0, 75.0)]);
}

#[test]
fn selection_is_exclusive() {
    let mut core = core_at_origin();
    let a = core.doc.insert(MapObject::new(0.0, 0.0, 30.0, 30.0));
    let b = core.doc.insert(MapObject::new(60.0, 0.0, 30.0, 30.0));
    core.set_selected(Some(a), None);
    core.set_selected(Some(b), None);
    assert_eq!(core.selected_object(), Some(b));
    assert_eq!(core.selection().handle(Corner::TopLeft).position(), pt(60.0, 0.0));
}

#[test]
fn selecting_takes_category_from_object() {
    let mut core = with_categories();
    let door = core.doc.category("door").unwrap().objects[0];
    core.set_selected(Some(door), None);
    assert_eq!(core.selected_category(), Some("door"));
    core.set_selected(None, Some("wall".into()));
    assert_eq!(core.selected_object(), None);
    assert_eq!(core.selected_category(), Some("wall"));
}

#[test]
fn selecting_removed_object_clears_selection() {
    let mut core = core_at_origin();
    let id = core.doc.insert(MapObject::new(0.0, 0.0, 30.0, 30.0));
    core.doc.remove(id);
    core.set_selected(Some(id), None);
    assert_eq!(core.selected_object(), None);
}

#[test]
fn externally_removed_selection_is_dropped_next_frame() {
    let mut core = core_at_origin();
    let id = core.doc.insert(MapObject::new(0.0, 0.0, 30.0, 30.0));
    core.set_selected(Some(id), None);
    core.doc.remove(id);
    core.update_cursor(pt(0.0, 0.0));
    assert_eq!(core.selected_object(), None);
}

#[test]
fn escape_clears_object_selection() {
    let mut core = core_at_origin();
    let id = core.doc.insert(MapObject::new(0.0, 0.0, 30.0, 30.0));
    core.set_selected(Some(id), None);
    assert_eq!(core.on_key_down(&key("Escape")), [Action::SelectionChanged(None), Action::RenderNeeded]);
    assert_eq!(core.selected_object(), None);
    assert!(core.on_key_down(&key("Escape")).is_empty());
}

// =============================================================
// Drag state
// =============================================================

#[test]
fn set_dragging_none_always_clears() {
    let mut core = core_at_origin();
    let id = core.doc.insert(MapObject::new(0.0, 0.0, 30.0, 30.0));
    core.set_dragging(None);
    assert!(core.dragging().is_none());

    for target in [Entity::Object(id), Entity::Viewport, Entity::Handle { object: id, corner: Corner::TopLeft }] {
        core.set_dragging(Some(target));
        assert_eq!(core.dragging(), Some(target));
        core.set_dragging(None);
        assert!(core.dragging().is_none());
    }
}

#[test]
fn dragging_removed_object_is_refused() {
    let mut core = core_at_origin();
    let id = core.doc.insert(MapObject::new(0.0, 0.0, 30.0, 30.0));
    core.doc.remove(id);
    core.set_dragging(Some(Entity::Object(id)));
    assert!(core.dragging().is_none());
}

#[test]
fn drag_target_is_hovered_while_dragging() {
    let mut core = core_at_origin();
    let a = core.doc.insert(MapObject::new(0.0, 0.0, 30.0, 30.0));
    let b = core.doc.insert(MapObject::new(300.0, 0.0, 30.0, 30.0));
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary);
    // Pointer passes over b; a follows and stays hovered.
    core.update_cursor(pt(310.0, 10.0));
    assert_eq!(core.hovering(), Some(Entity::Object(a)));
    assert_eq!(bounds(&core, a).0, 300.0);
    assert_eq!(bounds(&core, b), (300.0, 0.0, 30.0, 30.0));
}

#[test]
fn object_drag_snaps_position() {
    let mut core = core_at_origin();
    let id = core.doc.insert(MapObject::new(0.0, 0.0, 75.0, 45.0));
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary);
    assert_eq!(core.dragging(), Some(Entity::Object(id)));
    core.tick(pt(33.0, 52.0));
    // 23 -> 30, 42 -> 45
    assert_eq!(bounds(&core, id), (30.0, 45.0, 75.0, 45.0));
    // Handles follow.
    assert_eq!(core.selection().handle(Corner::BottomRight).position(), pt(105.0, 90.0));
}

#[test]
fn resize_scenario_bottom_right_to_150_by_90() {
    let mut core = core_at_origin();
    let id = core.doc.insert(MapObject::new(0.0, 0.0, 75.0, 45.0));
    core.set_selected(Some(id), None);

    let actions = core.on_pointer_down(pt(75.0, 45.0), Button::Primary);
    assert_eq!(actions, [Action::RenderNeeded]);
    assert_eq!(core.dragging(), Some(Entity::Handle { object: id, corner: Corner::BottomRight }));

    core.on_pointer_move(pt(150.0, 90.0));
    core.on_pointer_up(pt(150.0, 90.0), Button::Primary);

    assert_eq!(bounds(&core, id), (0.0, 0.0, 150.0, 90.0));
    assert_eq!(core.selection().handle(Corner::BottomRight).position(), pt(150.0, 90.0));
    assert!(core.dragging().is_none());
}

#[test]
fn top_left_resize_keeps_opposite_corner() {
    let mut core = core_at_origin();
    let id = core.doc.insert(MapObject::new(30.0, 30.0, 60.0, 60.0));
    core.set_selected(Some(id), None);
    core.on_pointer_down(pt(31.0, 29.0), Button::Primary);
    for p in [pt(0.0, 0.0), pt(45.0, 15.0), pt(120.0, 150.0)] {
        core.update_cursor(p);
        let (x, y, w, h) = bounds(&core, id);
        assert_eq!((x + w, y + h), (90.0, 90.0));
    }
}

#[test]
fn viewport_drag_pans_and_clears_selection() {
    let mut core = core_at_origin();
    let id = core.doc.insert(MapObject::new(0.0, 0.0, 30.0, 30.0));
    core.set_selected(Some(id), None);

    let actions = core.on_pointer_down(pt(200.0, 200.0), Button::Primary);
    assert_eq!(actions, [Action::SelectionChanged(None), Action::RenderNeeded]);
    assert_eq!(core.dragging(), Some(Entity::Viewport));

    core.update_cursor(pt(207.0, 193.0));
    assert_eq!(core.camera().pan(), pt(7.0, -7.0));
    assert_eq!(core.cursor(), "grabbing");
    core.on_pointer_up(pt(207.0, 193.0), Button::Primary);
    assert!(core.dragging().is_none());
}

#[test]
fn pointer_down_on_object_raises_selects_and_drags() {
    let mut core = core_at_origin();
    let a = core.doc.insert(MapObject::new(0.0, 0.0, 30.0, 30.0));
    let b = core.doc.insert(MapObject::new(60.0, 0.0, 30.0, 30.0));
    let actions = core.on_pointer_down(pt(10.0, 10.0), Button::Primary);
    assert_eq!(actions, [Action::SelectionChanged(Some(a)), Action::RenderNeeded]);
    assert_eq!(core.doc.ids(), [b, a]);
    assert_eq!(core.selected_object(), Some(a));
    assert_eq!(core.dragging(), Some(Entity::Object(a)));
}

#[test]
fn secondary_button_is_ignored() {
    let mut core = core_at_origin();
    core.doc.insert(MapObject::new(0.0, 0.0, 30.0, 30.0));
    assert!(core.on_pointer_down(pt(10.0, 10.0), Button::Secondary).is_empty());
    assert!(core.dragging().is_none());
    assert!(core.on_pointer_up(pt(10.0, 10.0), Button::Primary).is_empty());
}

#[test]
fn deleting_dragged_object_ends_drag() {
    let mut core = core_at_origin();
    let id = core.doc.insert(MapObject::new(0.0, 0.0, 30.0, 30.0));
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary);
    let actions = core.on_key_down(&key("Delete"));
    assert_eq!(actions, [Action::ObjectDeleted(id), Action::SelectionChanged(None), Action::RenderNeeded]);
    assert!(core.dragging().is_none());
    assert!(core.hovering().is_none());
    assert!(core.doc.is_empty());
}

#[test]
fn cursor_reflects_hover() {
    let mut core = core_at_origin();
    let id = core.doc.insert(MapObject::new(0.0, 0.0, 30.0, 30.0));
    core.update_cursor(pt(10.0, 10.0));
    assert_eq!(core.cursor(), "move");
    core.set_selected(Some(id), None);
    core.update_cursor(pt(1.0, 29.0));
    assert_eq!(core.cursor(), "nesw-resize");
    core.update_cursor(pt(100.0, 100.0));
    assert_eq!(core.cursor(), "default");
}

// =============================================================
// Keyboard panning
// =============================================================

#[test]
fn held_arrows_pan_once_per_tick() {
    let mut core = core_at_origin();
    assert_eq!(core.on_key_down(&key("ArrowRight")), [Action::RenderNeeded]);
    core.tick(pt(0.0, 0.0));
    core.tick(pt(0.0, 0.0));
    assert_eq!(core.camera().pan(), pt(-30.0, 0.0));

    core.on_key_up(&key("ArrowRight"));
    core.tick(pt(0.0, 0.0));
    assert_eq!(core.camera().pan(), pt(-30.0, 0.0));
}

#[test]
fn unrelated_keys_do_nothing() {
    let mut core = core_at_origin();
    assert!(core.on_key_down(&key("a")).is_empty());
    assert!(core.on_key_down(&key("Delete")).is_empty());
}

// =============================================================
// Object creation
// =============================================================

#[test]
fn new_object_at_snapped_viewport_center() {
    let mut core = EngineCore::new();
    core.set_viewport(640.0, 480.0, 1.0);
    // Center screen (320, 240) is world (260, 180).
    let obj = core.new_object();
    assert_eq!((obj.x, obj.y, obj.w, obj.h), (255.0, 180.0, 75.0, 45.0));
    assert_eq!(obj.kind, None);

    core.camera.zoom = 2.0;
    let obj = core.new_object();
    // (320 - 60) / 2 = 130 -> 135; (240 - 60) / 2 = 90
    assert_eq!((obj.x, obj.y), (135.0, 90.0));
}

#[test]
fn spawn_object_joins_selected_category() {
    let mut core = with_categories();
    core.select_category("door").unwrap();
    let actions = core.spawn_object();
    let Action::ObjectCreated(id) = actions[0] else {
        panic!("expected ObjectCreated, got {actions:?}");
    };
    assert_eq!(core.selected_object(), Some(id));
    assert_eq!(core.object(id).unwrap().kind.as_deref(), Some("door"));
    assert_eq!(core.doc.category("door").unwrap().objects.len(), 2);
    assert_eq!(*core.doc.ids().last().unwrap(), id);
}

#[test]
fn handles_follow_bounds_edited_outside_a_drag() {
    let mut core = with_categories();
    let wall = core.doc.category("wall").unwrap().objects[0];
    core.set_selected(Some(wall), None);
    let obj = core.doc.get_mut(wall).unwrap();
    obj.x = 90.0;
    obj.w = 45.0;
    core.update_cursor(pt(300.0, 300.0));
    let br = core.selection().handle(Corner::BottomRight);
    assert_eq!((br.x, br.y), (135.0, 30.0));
    assert!(core.hovering().is_none());
}

#[test]
fn delete_without_selection_is_noop() {
    let mut core = core_at_origin();
    core.doc.insert(MapObject::new(0.0, 0.0, 30.0, 30.0));
    assert!(core.delete_selected().is_empty());
    assert_eq!(core.doc.len(), 1);
}

// =============================================================
// Categories and rename
// =============================================================

#[test]
fn add_category_selects_it() {
    let mut core = with_categories();
    core.add_category("tree", "#0a0").unwrap();
    assert_eq!(core.selected_category(), Some("tree"));
    assert!(matches!(core.add_category("tree", "#0a0"), Err(DocError::DuplicateCategory(_))));
}

#[test]
fn remove_selected_category_moves_selection_and_deletes_members() {
    let mut core = with_categories();
    let door = core.doc.category("door").unwrap().objects[0];
    core.set_selected(Some(door), None);

    let actions = core.remove_category("door").unwrap();
    assert_eq!(actions, [Action::ObjectDeleted(door), Action::SelectionChanged(None), Action::RenderNeeded]);
    assert_eq!(core.selected_object(), None);
    assert_eq!(core.selected_category(), Some("wall"));
    assert!(core.object(door).is_none());

    assert!(matches!(core.remove_category("wall"), Err(DocError::LastCategory(_))));
}

#[test]
fn rename_round_trip() {
    let mut core = with_categories();
    core.select_category("wall").unwrap();
    assert_eq!(core.request_rename("wall").unwrap(), Action::RenameRequested { category: "wall".into() });
    core.commit_rename("stone").unwrap();
    assert_eq!(core.selected_category(), Some("stone"));
    assert!(core.doc.category("wall").is_none());
    let member = core.doc.category("stone").unwrap().objects[0];
    assert_eq!(core.object(member).unwrap().kind.as_deref(), Some("stone"));
    assert!(core.pending_rename().is_none());
}

#[test]
fn selection_cancels_pending_rename() {
    let mut core = with_categories();
    core.request_rename("wall").unwrap();
    core.set_selected(None, None);
    assert!(matches!(core.commit_rename("stone"), Err(RenameError::NoPendingRename)));
    assert!(core.doc.category("wall").is_some());
}

#[test]
fn rejected_rename_stays_pending() {
    let mut core = with_categories();
    core.request_rename("wall").unwrap();
    assert!(matches!(core.commit_rename("door"), Err(RenameError::Doc(DocError::DuplicateCategory(_)))));
    assert_eq!(core.pending_rename(), Some("wall"));
    core.commit_rename("brick").unwrap();
}

#[test]
fn delete_cancels_pending_rename() {
    let mut core = with_categories();
    let wall = core.doc.category("wall").unwrap().objects[0];
    core.set_selected(Some(wall), None);
    core.request_rename("wall").unwrap();
    core.delete_selected();
    assert!(core.pending_rename().is_none());
    assert!(matches!(core.commit_rename("stone"), Err(RenameError::NoPendingRename)));
}

#[test]
fn request_rename_of_unknown_category_fails() {
    let mut core = with_categories();
    assert!(matches!(core.request_rename("moat"), Err(DocError::UnknownCategory(_))));
    assert!(core.pending_rename().is_none());
}

#[test]
fn set_category_color_validates() {
    let mut core = with_categories();
    assert_eq!(core.set_category_color("wall", "#123").unwrap(), [Action::RenderNeeded]);
    assert!(matches!(core.set_category_color("wall", "blue"), Err(DocError::InvalidColor(_))));
}

// =============================================================
// Import / export
// =============================================================

#[test]
fn import_replaces_document_and_resets_session() {
    let mut core = with_categories();
    let old = core.doc.ids()[0];
    core.set_selected(Some(old), None);
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary);

    let actions = core.import_layout(r#"[{"x":0,"y":0,"w":15,"h":15}]"#).unwrap();
    assert_eq!(actions, [Action::SelectionChanged(None), Action::RenderNeeded]);
    assert_eq!(core.doc.len(), 1);
    assert!(core.object(old).is_none());
    assert!(core.selected_object().is_none());
    assert!(core.dragging().is_none());
    assert_eq!(core.selected_category(), None);
}

#[test]
fn failed_import_leaves_document_untouched() {
    let mut core = with_categories();
    let before = core.export_layout();
    let id = core.doc.ids()[0];
    core.set_selected(Some(id), None);

    assert!(core.import_layout(r#"[{"x":0,"y":0,"w":"wide","h":15}]"#).is_err());
    assert!(core.import_layout("not json").is_err());
    assert_eq!(core.export_layout(), before);
    assert_eq!(core.selected_object(), Some(id));
}

#[test]
fn export_keeps_objects_without_a_category() {
    let mut core = core_at_origin();
    core.import_layout(r#"[{"x":0,"y":0,"w":30,"h":30},{"x":60,"y":0,"w":15,"h":15,"type":"wall"}]"#)
        .unwrap();
    core.add_category("door", "#aa5522").unwrap();

    let mut other = EngineCore::new();
    other.import_layout(&core.export_layout()).unwrap();
    assert_eq!(other.doc.len(), core.doc.len());
    assert_eq!(other.doc.layout().objects, core.doc.layout().objects);
}

#[test]
fn export_import_round_trip_after_edits() {
    let mut core = with_categories();
    let wall = core.doc.category("wall").unwrap().objects[0];
    core.set_selected(Some(wall), None);
    core.on_pointer_down(pt(29.0, 29.0), Button::Primary);
    core.update_cursor(pt(90.0, 60.0));
    core.on_pointer_up(pt(90.0, 60.0), Button::Primary);

    let exported = core.export_layout();
    let mut other = EngineCore::new();
    other.import_layout(&exported).unwrap();
    assert_eq!(other.doc.layout().categories, core.doc.layout().categories);
    let mut ours = core.doc.layout().objects;
    let mut theirs = other.doc.layout().objects;
    let key = |o: &MapObject| (o.kind.clone(), o.x.to_bits(), o.y.to_bits());
    ours.sort_by_key(key);
    theirs.sort_by_key(key);
    assert_eq!(ours, theirs);
    assert!(theirs.iter().any(|o| (o.w, o.h) == (90.0, 60.0)));
}
