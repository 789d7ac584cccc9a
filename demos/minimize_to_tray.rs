//! Minimising the window moves it to the tray; clicking the icon brings it back.

#[cfg(target_os = "windows")]
#[path = "common/mod.rs"]
mod common;

#[cfg(target_os = "windows")]
mod demo {
    use std::time::Instant;

    use raytray::{Notification, NotificationIcon, Tray, TrayEvent};
    use winit::application::ApplicationHandler;
    use winit::dpi::LogicalSize;
    use winit::event::WindowEvent;
    use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
    use winit::window::{Window, WindowId};

    use crate::common;

    struct App {
        tray: Tray,
        window: Option<Window>,
        minimised_to_tray: bool,
    }

    impl App {
        fn minimise_to_tray(&mut self, window: &Window) {
            tracing::info!("Minimising to tray");
            window.set_visible(false);
            self.tray.show();
            self.tray.send_notification(
                &Notification::new("Still running", "Click the tray icon to restore the window")
                    .icon(NotificationIcon::User),
            );
            self.minimised_to_tray = true;
        }

        fn restore(&mut self, window: &Window) {
            tracing::info!("Restoring from tray");
            window.set_visible(true);
            window.set_minimized(false);
            window.focus_window();
            self.tray.hide();
            self.minimised_to_tray = false;
        }
    }

    impl ApplicationHandler for App {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.window.is_some() {
                return;
            }

            let attrs = Window::default_attributes()
                .with_title("raytray - minimise to tray")
                .with_inner_size(LogicalSize::new(850.0, 400.0));

            match event_loop.create_window(attrs) {
                Ok(window) => self.window = Some(window),
                Err(e) => {
                    tracing::error!("Failed to create window: {e}");
                    event_loop.exit();
                }
            }
        }

        fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
            if event == WindowEvent::CloseRequested {
                event_loop.exit();
            }
        }

        fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
            let Some(window) = self.window.take() else {
                return;
            };

            if !self.minimised_to_tray && window.is_minimized() == Some(true) {
                self.minimise_to_tray(&window);
            }

            while let Some(event) = self.tray.poll_event() {
                tracing::debug!("Tray event: {event}");
                let restores = matches!(
                    event,
                    TrayEvent::Clicked | TrayEvent::DoubleClicked | TrayEvent::BalloonClicked
                );
                if restores && self.minimised_to_tray {
                    self.restore(&window);
                }
            }

            self.window = Some(window);
            event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + common::FRAME));
        }
    }

    pub fn run() -> anyhow::Result<()> {
        let config = common::load_config("Minimised to tray")?;
        let tray = Tray::new(&config)?;
        tray.hide();

        let event_loop = EventLoop::new()?;
        let mut app = App {
            tray,
            window: None,
            minimised_to_tray: false,
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
