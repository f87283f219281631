//! Headless tour of every widget: a scripted pointer session played against
//! a synthetic clock. Run with `RUST_LOG=debug` to watch the state machines.

use std::cell::Cell;
use std::rc::Rc;

use glissade_core::*;
use glissade_ui::*;
use web_time::{Duration, Instant};

const SURFACE: Size = Size {
    width: 800.0,
    height: 600.0,
};
const FRAME: Duration = Duration::from_millis(16);

struct App {
    volume: FloatSlider,
    rating: IntSlider,
    scrollbar: Scrollbar,
    drawer: Drawer,
    modals: ModalStack,
    menu: GlobalMenu,
    open_dialog: MenuItemKey,
    dialogs_opened: Rc<Cell<u32>>,
}

impl App {
    fn new(now: Instant) -> anyhow::Result<Self> {
        let mut menu = GlobalMenu::default();
        let open_dialog = menu.add_item("Open dialog", now);
        menu.add_item("Toggle drawer", now);

        let mut volume = FloatSlider::new(0.0, 100.0, 50.0)
            .with_style(SliderStyle::default().with_label("Volume"));
        volume.set_change_hook(|v| log::debug!("volume hook: {v:.1}"));

        Ok(Self {
            volume,
            rating: IntSlider::new(1, 5, 3),
            scrollbar: Scrollbar::new(0.3),
            drawer: DrawerConfig::default()
                .with_edge(Edge::Left)
                .with_label("Navigation")
                .build()?,
            modals: ModalStack::default(),
            menu,
            open_dialog,
            dialogs_opened: Rc::new(Cell::new(0)),
        })
    }

    fn frame(&mut self, f: &mut Frame) {
        self.volume.layout(f, Rect::new(320.0, 40.0, 300.0, 48.0));
        self.rating.layout(f, Rect::new(320.0, 120.0, 300.0, 48.0));
        self.scrollbar.layout(f, Rect::new(780.0, 0.0, 16.0, 600.0));

        if self.volume.changed() {
            log::info!("volume -> {:.1}", self.volume.value());
        }
        if self.rating.changed() {
            log::info!("rating -> {}", self.rating.value());
        }
        if self.scrollbar.changed() {
            log::info!("scroll -> {:.3}", self.scrollbar.position());
        }

        self.drawer.layout(f, |f, r| {
            f.push(SceneNode::Text {
                rect: r.inset(16.0),
                text: "Drawer".into(),
                color: theme().on_surface,
                size: 16.0,
            });
        });
        self.modals.layout(f);

        for ev in self.menu.layout(f) {
            match ev {
                MenuEvent::Selected(key) if key == self.open_dialog => {
                    let n = self.dialogs_opened.get() + 1;
                    self.dialogs_opened.set(n);
                    self.modals.push(
                        move |f: &mut Frame, r: Rect| {
                            f.push(SceneNode::Text {
                                rect: r.inset(24.0),
                                text: format!("Dialog #{n}"),
                                color: theme().on_surface,
                                size: 16.0,
                            });
                        },
                        f.now(),
                    );
                }
                MenuEvent::Selected(_) => self.drawer.toggle(f.now()),
                MenuEvent::Opened(p) => log::info!("menu opened at ({:.0}, {:.0})", p.x, p.y),
                MenuEvent::Closed => log::info!("menu closed"),
            }
        }
    }
}

/// Minimal host: routes input, renders frames and follows redraw requests.
struct Host {
    router: Router,
    now: Instant,
    frames: u32,
}

impl Host {
    fn render(&mut self, app: &mut App) -> Option<Instant> {
        let mut frame = self.router.begin_frame(self.now, SURFACE);
        app.frame(&mut frame);
        let out = self.router.end_frame(frame);
        self.frames += 1;
        log::trace!("frame {}: {} scene nodes", self.frames, out.scene.len());
        out.redraw_at
    }

    /// Renders until nothing asks for another frame or `budget` has passed.
    fn settle(&mut self, app: &mut App, budget: Duration) {
        let deadline = self.now + budget;
        while let Some(at) = self.render(app) {
            let next = at.max(self.now + FRAME);
            if next > deadline {
                self.now = deadline;
                break;
            }
            self.now = next;
        }
    }

    fn input(&mut self, app: &mut App, events: impl IntoIterator<Item = PointerEvent>) {
        self.router.queue_all(events);
        self.settle(app, Duration::from_secs(2));
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let start = Instant::now();
    let mut host = Host {
        router: Router::new(),
        now: start,
        frames: 0,
    };
    let mut app = App::new(start)?;
    host.settle(&mut app, Duration::from_millis(100));

    let t = host.now;
    log::info!("-- slider: press at 80%");
    host.input(
        &mut app,
        [
            PointerEvent::press(Vec2::new(560.0, 64.0), Buttons::PRIMARY, t),
            PointerEvent::release(Vec2::new(560.0, 64.0), Buttons::PRIMARY, t),
        ],
    );
    anyhow::ensure!((app.volume.value() - 80.0).abs() < 1e-3, "volume should be 80");

    let t = host.now;
    log::info!("-- scrollbar: page down");
    host.input(
        &mut app,
        [
            PointerEvent::press(Vec2::new(788.0, 540.0), Buttons::PRIMARY, t),
            PointerEvent::release(Vec2::new(788.0, 540.0), Buttons::PRIMARY, t),
        ],
    );
    log::info!("scroll position {:.3}", app.scrollbar.position());

    let t = host.now;
    log::info!("-- menu: right click, open a dialog");
    host.input(
        &mut app,
        [
            PointerEvent::press(Vec2::new(200.0, 300.0), Buttons::SECONDARY, t),
            PointerEvent::release(Vec2::new(200.0, 300.0), Buttons::SECONDARY, t),
        ],
    );
    let item = app.menu.rect().center();
    let first_item = Vec2::new(item.x, app.menu.rect().y + 20.0);
    let t = host.now;
    host.input(
        &mut app,
        [
            PointerEvent::press(first_item, Buttons::PRIMARY, t),
            PointerEvent::release(first_item, Buttons::PRIMARY, t),
        ],
    );
    log::info!("modals on stack: {}", app.modals.count());

    let t = host.now;
    log::info!("-- modal: dismiss through the scrim");
    host.input(
        &mut app,
        [
            PointerEvent::press(Vec2::new(20.0, 20.0), Buttons::PRIMARY, t),
            PointerEvent::release(Vec2::new(20.0, 20.0), Buttons::PRIMARY, t),
        ],
    );
    anyhow::ensure!(app.modals.is_empty(), "dialog should be gone");

    log::info!("-- drawer: open and close");
    app.drawer.show(host.now);
    host.settle(&mut app, Duration::from_secs(1));
    log::info!("drawer phase {:?}", app.drawer.phase());
    let t = host.now;
    host.input(
        &mut app,
        [
            PointerEvent::press(Vec2::new(600.0, 300.0), Buttons::PRIMARY, t),
            PointerEvent::release(Vec2::new(600.0, 300.0), Buttons::PRIMARY, t),
        ],
    );
    log::info!("drawer phase {:?}", app.drawer.phase());

    log::info!(
        "tour done: {} frames over {:?}, {} dialog(s) opened",
        host.frames,
        host.now.saturating_duration_since(start),
        app.dialogs_opened.get()
    );
    Ok(())
}
