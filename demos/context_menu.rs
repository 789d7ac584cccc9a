//! Drives the application from the tray's right-click menu.

#[cfg(target_os = "windows")]
#[path = "common/mod.rs"]
mod common;

#[cfg(target_os = "windows")]
mod demo {
    use std::time::Instant;

    use raytray::{ContextMenu, Notification, NotificationIcon, Tray, MENU_END, MENU_SEPARATOR};
    use winit::application::ApplicationHandler;
    use winit::dpi::LogicalSize;
    use winit::event::WindowEvent;
    use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
    use winit::window::{Window, WindowId};

    use crate::common;

    const SHOW: u16 = 1;
    const HIDE: u16 = 2;
    const NOTIFY: u16 = 3;
    const QUIT: u16 = 4;

    const LABELS: [&str; 7] = ["Show window", "Hide window", "", "Send notification", "", "Quit", ""];
    const IDS: [u16; 7] = [SHOW, HIDE, MENU_SEPARATOR, NOTIFY, MENU_SEPARATOR, QUIT, MENU_END];

    struct App {
        tray: Tray,
        window: Option<Window>,
        quit: bool,
    }

    impl App {
        fn handle_selection(&mut self, id: u16) {
            match (id, &self.window) {
                (SHOW, Some(window)) => {
                    window.set_visible(true);
                    window.focus_window();
                }
                (HIDE, Some(window)) => window.set_visible(false),
                (NOTIFY, _) => self.tray.send_notification(
                    &Notification::new("raytray", "Sent from the context menu")
                        .icon(NotificationIcon::Info)
                        .sound(true),
                ),
                (QUIT, _) => self.quit = true,
                (id, _) => tracing::warn!("Unhandled menu item {id}"),
            }
        }
    }

    impl ApplicationHandler for App {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.window.is_some() {
                return;
            }

            let attrs = Window::default_attributes()
                .with_title("raytray - context menu")
                .with_inner_size(LogicalSize::new(850.0, 400.0));

            match event_loop.create_window(attrs) {
                Ok(window) => self.window = Some(window),
                Err(e) => {
                    tracing::error!("Failed to create window: {e}");
                    event_loop.exit();
                }
            }
        }

        fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
            // closing only hides, quitting goes through the tray menu
            if event == WindowEvent::CloseRequested {
                if let Some(window) = &self.window {
                    window.set_visible(false);
                }
            }
        }

        fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
            while let Some(event) = self.tray.poll_event() {
                tracing::debug!("Tray event: {event}");
            }

            if let Some(id) = self.tray.poll_menu_selection() {
                self.handle_selection(id);
            }

            if self.quit {
                event_loop.exit();
                return;
            }

            event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + common::FRAME));
        }
    }

    pub fn run() -> anyhow::Result<()> {
        let menu = ContextMenu::from_parallel(&LABELS, &IDS);
        let config = common::load_config("Right click me")?.with_menu(&menu);
        let tray = Tray::new(&config)?;

        let event_loop = EventLoop::new()?;
        let mut app = App {
            tray,
            window: None,
            quit: false,
        };
        event_loop.run_app(&mut app)?;

        Ok(())
    }
}

#[cfg(target_os = "windows")]
fn main() -> anyhow::Result<()> {
    common::main(demo::run)
}

#[cfg(not(target_os = "windows"))]
fn main() {
    eprintln!("the tray demos only run on Windows");
}
