//! End-to-end scenarios driven through the host entry points.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_motion::pipeline::viewport;
use spark_motion::{
    listener_count, mount_narrative, mount_reveal, reset_clock, reset_listeners, total_listener_count,
    ElementHandle, LayoutProbe, ListenerKind, Mode, MotionConfig, NodeState, Rect, RevealConfig,
    ScrollHost, ScrubPhase, StaticProbe, StepDescriptor, VisualState,
};

fn setup(width: f32, height: f32) {
    reset_listeners();
    reset_clock();
    viewport::reset_viewport();
    viewport::set_viewport_size(width, height);
}

fn process_steps() -> Vec<StepDescriptor> {
    vec![
        StepDescriptor::new("01", "Discovery").with_body("Understand the problem space"),
        StepDescriptor::new("02", "Design").with_tags(["wireframes", "prototypes"]),
        StepDescriptor::new("03", "Build"),
        StepDescriptor::new("04", "Launch"),
    ]
}

/// Section whose document position can move, like a real layout.
struct MovableSection {
    rect: Cell<Option<Rect>>,
}

impl LayoutProbe for MovableSection {
    fn document_rect(&self) -> Option<Rect> {
        self.rect.get()
    }
}

/// Host that applies programmatic scroll writes like a browser would.
struct PageHost {
    writes: RefCell<Vec<f32>>,
}

impl ScrollHost for PageHost {
    fn scroll_to(&self, y: f32) {
        self.writes.borrow_mut().push(y);
        viewport::scroll_to(y);
    }
}

fn section_at(y: f32, height: f32) -> Rc<dyn LayoutProbe> {
    Rc::new(StaticProbe(Some(Rect::new(0.0, y, 1024.0, height))))
}

#[test]
fn test_halfway_through_four_steps() {
    setup(1024.0, 800.0);
    let handle = mount_narrative(Some(section_at(1000.0, 800.0)), process_steps(), &MotionConfig::default(), None);
    assert_eq!(handle.mode(), Mode::Slider);

    // Region is 3 × 800 = 2400 px starting at 1000
    viewport::scroll_to(1000.0 + 1200.0);

    let frame = handle.frame();
    assert_eq!(frame.phase, ScrubPhase::Scrubbing);
    assert_eq!(frame.progress, 0.5);
    assert_eq!(frame.active_step, 2);
    assert_eq!(frame.bar_fraction, 2.0 / 3.0);
    assert_eq!(frame.offset_x, -0.5 * 3.0 * 1024.0);
    assert!(frame.pinned);

    use NodeState::*;
    assert_eq!(handle.node_states_derived().get(), vec![Past, Past, Current, Future]);
    assert!(handle.node_state(2).label_visible());
    assert!(!handle.node_state(1).label_visible());
}

#[test]
fn test_boundaries() {
    setup(1024.0, 800.0);
    let handle = mount_narrative(Some(section_at(1000.0, 800.0)), process_steps(), &MotionConfig::default(), None);

    viewport::scroll_to(1000.0);
    assert_eq!(handle.active_step(), 0);
    assert_eq!(handle.offset_x(), 0.0);

    viewport::scroll_to(3400.0);
    assert_eq!(handle.active_step(), 3);
    assert_eq!(handle.offset_x(), -3.0 * 1024.0);
    assert_eq!(handle.bar_fraction(), 1.0);

    // Past the end: pin released, progress frozen at 1
    viewport::scroll_to(5000.0);
    let frame = handle.frame();
    assert_eq!(frame.phase, ScrubPhase::After);
    assert_eq!(frame.progress, 1.0);
    assert!(!frame.pinned);

    // Scrolling back in resumes without a jump
    viewport::scroll_to(3300.0);
    let frame = handle.frame();
    assert_eq!(frame.phase, ScrubPhase::Scrubbing);
    assert!(frame.progress < 1.0 && frame.progress > 0.95);

    viewport::scroll_to(0.0);
    assert_eq!(handle.frame().phase, ScrubPhase::Before);
    assert_eq!(handle.frame().progress, 0.0);
}

#[test]
fn test_narrow_viewport_is_static() {
    setup(500.0, 800.0);
    let handle = mount_narrative(Some(section_at(1000.0, 800.0)), process_steps(), &MotionConfig::default(), None);

    assert_eq!(handle.mode(), Mode::Stacked);
    assert_eq!(listener_count(ListenerKind::SCROLL), 0);
    assert_eq!(listener_count(ListenerKind::FRAME), 0);
    assert_eq!(handle.stacked_steps().map(|steps| steps.len()), Some(4));
    assert_eq!(handle.steps()[1].tags, vec!["wireframes".to_string(), "prototypes".to_string()]);

    for y in [0.0, 1500.0, 2200.0, 4000.0] {
        viewport::scroll_to(y);
        assert!(!handle.is_pinned());
    }
}

#[test]
fn test_rotation_leaves_no_dangling_listeners() {
    setup(1024.0, 800.0);
    let handle = mount_narrative(Some(section_at(1000.0, 800.0)), process_steps(), &MotionConfig::default(), None);
    let baseline = total_listener_count();

    let mut now = 1.0;
    for width in [500.0, 1024.0, 500.0, 1024.0] {
        viewport::tick(now);
        viewport::resize(width, 800.0);
        now += 0.5;
        viewport::tick(now);
        now += 0.5;
    }

    assert_eq!(handle.mode(), Mode::Slider);
    assert_eq!(listener_count(ListenerKind::SCROLL), 1);
    assert_eq!(total_listener_count(), baseline);

    viewport::tick(now);
    viewport::resize(500.0, 800.0);
    viewport::tick(now + 0.5);
    assert_eq!(handle.mode(), Mode::Stacked);
    assert_eq!(listener_count(ListenerKind::SCROLL), 0);
    assert!(!handle.is_pinned());
}

#[test]
fn test_unmount_while_scrubbing_detaches_everything() {
    setup(1024.0, 800.0);
    let handle = mount_narrative(Some(section_at(1000.0, 800.0)), process_steps(), &MotionConfig::default(), None);
    let frame = handle.frame_signal();

    viewport::scroll_to(2000.0);
    assert!(frame.get().pinned);

    drop(handle);
    assert_eq!(total_listener_count(), 0);
    assert!(!frame.get().pinned);

    // Nothing reacts any more
    viewport::scroll_to(2600.0);
    viewport::tick(5.0);
    assert_eq!(total_listener_count(), 0);
}

#[test]
fn test_snap_settles_on_nearest_step() {
    setup(1024.0, 800.0);
    let host = Rc::new(PageHost { writes: RefCell::new(Vec::new()) });
    let handle = mount_narrative(
        Some(section_at(1000.0, 800.0)),
        process_steps(),
        &MotionConfig::default(),
        Some(host.clone() as Rc<dyn ScrollHost>),
    );

    viewport::tick(1.0);
    // progress 0.7 → step 2, boundary 2/3
    viewport::scroll_to(1000.0 + 0.7 * 2400.0);
    assert_eq!(handle.active_step(), 2);

    let mut now = 1.0;
    for _ in 0..90 {
        now += 1.0 / 60.0;
        viewport::tick(now);
        assert_eq!(handle.active_step(), 2);
    }

    let frame = handle.frame();
    assert!((frame.progress - 2.0 / 3.0).abs() < 1e-4);
    assert!(!host.writes.borrow().is_empty());
    assert!((viewport::scroll_y() - 2600.0).abs() < 0.5);
}

#[test]
fn test_user_scroll_interrupts_snap() {
    setup(1024.0, 800.0);
    let host = Rc::new(PageHost { writes: RefCell::new(Vec::new()) });
    let handle = mount_narrative(
        Some(section_at(1000.0, 800.0)),
        process_steps(),
        &MotionConfig::default(),
        Some(host.clone() as Rc<dyn ScrollHost>),
    );

    viewport::tick(1.0);
    viewport::scroll_to(1000.0 + 0.4 * 2400.0);
    // Idle long enough to start the snap, then run one frame of it
    viewport::tick(1.2);
    viewport::tick(1.25);
    let writes_before = host.writes.borrow().len();
    assert!(writes_before > 0);

    // User scrolls elsewhere: snap is abandoned, user position wins
    viewport::scroll_to(2900.0);
    viewport::tick(1.26);
    assert_eq!(host.writes.borrow().len(), writes_before);
    assert_eq!(viewport::scroll_y(), 2900.0);
    assert_eq!(handle.active_step(), 2);
}

#[test]
fn test_resize_mid_scrub_keeps_step() {
    setup(1024.0, 800.0);
    let section = Rc::new(MovableSection { rect: Cell::new(Some(Rect::new(0.0, 1000.0, 1024.0, 800.0))) });
    let host = Rc::new(PageHost { writes: RefCell::new(Vec::new()) });
    let handle = mount_narrative(
        Some(section.clone() as Rc<dyn LayoutProbe>),
        process_steps(),
        &MotionConfig::default(),
        Some(host.clone() as Rc<dyn ScrollHost>),
    );

    viewport::scroll_to(1000.0 + 0.5 * 2400.0);
    assert_eq!(handle.active_step(), 2);

    // Content reflows above the section
    section.rect.set(Some(Rect::new(0.0, 1400.0, 1200.0, 600.0)));
    viewport::resize(1200.0, 600.0);

    assert_eq!(handle.active_step(), 2);
    assert_eq!(handle.frame().progress, 0.5);
    assert_eq!(host.writes.borrow().last().copied(), Some(1400.0 + 0.5 * 1800.0));
    assert_eq!(handle.offset_x(), -0.5 * 3.0 * 1200.0);
}

#[test]
fn test_resize_mid_scrub_without_host_continues_smoothly() {
    setup(1024.0, 800.0);
    let mut config = MotionConfig::default();
    config.narrative.snap.enabled = false;
    let handle = mount_narrative(Some(section_at(1000.0, 800.0)), process_steps(), &config, None);

    viewport::scroll_to(1000.0 + 0.45 * 2400.0);
    assert_eq!(handle.active_step(), 1);

    // Nothing can move the page, so the region follows the reader instead
    viewport::resize(1024.0, 600.0);
    assert_eq!(handle.active_step(), 1);
    assert!((handle.frame().progress - 0.45).abs() < 1e-5);

    viewport::scroll_to(viewport::scroll_y() + 1.0);
    let frame = handle.frame();
    assert_eq!(frame.active_step, 1);
    assert!((frame.progress - (0.45 + 1.0 / 1800.0)).abs() < 1e-4);
}

#[test]
fn test_reveal_tall_container() {
    setup(400.0, 700.0);
    let container = Rc::new(StaticProbe(Some(Rect::new(0.0, 1000.0, 400.0, 10000.0)))) as Rc<dyn LayoutProbe>;
    let items = vec![ElementHandle(1), ElementHandle(2)];
    let handle = mount_reveal(Some(container), ElementHandle(0), items, &RevealConfig::default());

    let mut now = 0.0;
    let mut y = 0.0;
    while y <= 12000.0 && !handle.has_activated() {
        viewport::scroll_to(y);
        now += 0.016;
        viewport::tick(now);
        y += 50.0;
    }
    assert!(handle.has_activated());
    assert!(viewport::scroll_y() < 1000.0);

    viewport::tick(now + 2.0);
    assert_eq!(handle.state(), VisualState::Revealed);
    assert_eq!(total_listener_count(), 0);
}

#[test]
fn test_reveal_stagger_starts() {
    setup(1024.0, 800.0);
    let container = section_at(200.0, 400.0);
    let items = vec![ElementHandle(1), ElementHandle(2), ElementHandle(3)];
    let handle = mount_reveal(Some(container), ElementHandle(0), items, &RevealConfig::default());

    viewport::tick(0.016);
    let t0 = handle.item_start(0).unwrap();
    let t2 = handle.item_start(2).unwrap();
    assert!((t2 - t0 - 0.16).abs() < 1e-9);

    // Item 2 is still hidden before its start, item 0 already moving
    viewport::tick(t0 + 0.1);
    assert!(handle.visual(0).unwrap().opacity > 0.0);
    assert_eq!(handle.visual(2).unwrap().state, VisualState::Hidden);
    assert!(!handle.visual(2).unwrap().visible);
}

#[test]
fn test_reveal_is_idempotent() {
    setup(1024.0, 800.0);
    let container = section_at(200.0, 400.0);
    let items = vec![ElementHandle(1), ElementHandle(2)];
    let handle = mount_reveal(Some(container), ElementHandle(0), items, &RevealConfig::default());

    viewport::tick(0.1);
    viewport::tick(2.0);
    assert_eq!(handle.state(), VisualState::Revealed);
    let settled = handle.visuals();

    // Leaving and re-entering the viewport does nothing
    viewport::scroll_to(5000.0);
    viewport::tick(3.0);
    viewport::scroll_to(0.0);
    viewport::tick(4.0);
    assert_eq!(handle.visuals(), settled);
    assert_eq!(handle.state(), VisualState::Revealed);
    assert_eq!(total_listener_count(), 0);
}

#[test]
fn test_reveal_fails_open_without_observation() {
    setup(1024.0, 800.0);
    viewport::set_observation_support(false);

    let container = section_at(9000.0, 400.0);
    let handle = mount_reveal(Some(container), ElementHandle(0), vec![ElementHandle(1)], &RevealConfig::default());

    viewport::tick(0.5);
    assert!(handle.has_activated());
    viewport::tick(2.0);
    assert_eq!(handle.state(), VisualState::Revealed);
}

#[test]
fn test_reveal_fallback_timeout() {
    setup(1024.0, 800.0);
    let config = RevealConfig { fallback_timeout: Some(1.5), ..RevealConfig::default() };

    let container = section_at(9000.0, 400.0);
    let handle = mount_reveal(Some(container), ElementHandle(0), vec![ElementHandle(1)], &config);

    viewport::tick(1.0);
    assert!(!handle.has_activated());
    viewport::tick(1.6);
    assert!(handle.has_activated());
}
