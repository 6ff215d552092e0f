use nav3d::frame::{render_frame, DrawCommand, GRID_COLOR};
use nav3d::state::{DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};
use nav3d::vertex::{Vertex, CUBE_VERTICES};
use nav3d::{Interaction, NavigationWidget, ViewerState, Viewport};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn drag_zoom_reset_scenario() {
    let mut widget = NavigationWidget::new();
    widget.mount(Viewport::new(300.0, 192.0, 2.0));
    assert_eq!(widget.state().zoom(), DEFAULT_ZOOM);
    let mounted = widget.surface().unwrap().as_bytes().to_vec();

    widget.handle(Interaction::PointerDown { x: 100.0, y: 100.0 });
    widget.handle(Interaction::PointerMove { x: 150.0, y: 130.0 });
    widget.handle(Interaction::PointerUp);
    assert!(close(widget.state().angle_x, 0.30));
    assert!(close(widget.state().angle_y, 0.50));
    assert_ne!(widget.surface().unwrap().as_bytes(), &mounted[..]);

    widget.handle(Interaction::ZoomOut);
    assert_eq!(widget.state().zoom(), 4);

    widget.handle(Interaction::Reset);
    assert_eq!(*widget.state(), ViewerState::default());
    assert_eq!(widget.surface().unwrap().as_bytes(), &mounted[..]);
}

#[test]
fn zoom_never_leaves_its_range() {
    let mut widget = NavigationWidget::new();
    widget.mount(Viewport::new(50.0, 50.0, 1.0));
    let presses = [1, 1, 1, 1, 1, 1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 1];
    for press in presses {
        if press > 0 {
            widget.zoom_in();
        } else {
            widget.zoom_out();
        }
        let zoom = widget.state().zoom();
        assert!((MIN_ZOOM..=MAX_ZOOM).contains(&zoom));
    }
    assert_eq!(widget.state().zoom(), MIN_ZOOM + 1);
}

#[test]
fn painted_center_matches_projection() {
    let viewport = Viewport::new(300.0, 192.0, 1.0);
    let mut widget = NavigationWidget::new();
    widget.mount(viewport);

    // the origin probe lands on the center at rest
    let origin = Vertex::project(&[0.0, 0.0, 0.0], 0.0, 0.0, viewport.center(), 1.0);
    assert_eq!(origin.screen_position, [150.0, 96.0]);

    // a back-face corner is painted where the projection puts it
    let corner = Vertex::project(&CUBE_VERTICES[0], 0.0, 0.0, viewport.center(), 1.0);
    assert!(close(corner.screen_position[0], 100.0));
    assert!(close(corner.screen_position[1], 46.0));
    let [r, g, b, a] = widget.surface().unwrap().pixel(120, 46).unwrap();
    assert_eq!((r, g, b), (0, 255, 255));
    assert!(a > 200);
}

#[test]
fn frame_depends_only_on_state_and_viewport() {
    let viewport = Viewport::new(240.0, 160.0, 1.0);
    let mut dragged = NavigationWidget::new();
    dragged.mount(viewport);
    dragged.pointer_down(0.0, 0.0);
    dragged.pointer_move(20.0, -10.0);
    dragged.pointer_move(35.0, 5.0);
    dragged.pointer_leave();
    dragged.zoom_in();

    let direct = ViewerState::new(0.05, 0.35, 6);
    assert!(close(dragged.state().angle_x, direct.angle_x));
    assert!(close(dragged.state().angle_y, direct.angle_y));

    let mut placed = NavigationWidget::with_state(*dragged.state());
    placed.mount(viewport);
    assert_eq!(
        dragged.surface().unwrap().as_bytes(),
        placed.surface().unwrap().as_bytes()
    );

    let frame = render_frame(&viewport, dragged.state());
    let grid = frame
        .commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Line { style, .. } if style.color == GRID_COLOR))
        .count();
    assert_eq!(grid, 42);
}
