//! Places an icon in the tray and logs everything that happens to it.

#[cfg(target_os = "windows")]
#[path = "common/mod.rs"]
mod common;

#[cfg(target_os = "windows")]
mod demo {
    use std::time::Instant;

    use raytray::{Notification, Tray, TrayEvent};
    use winit::application::ApplicationHandler;
    use winit::dpi::LogicalSize;
    use winit::event::WindowEvent;
    use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
    use winit::window::{Window, WindowId};

    use crate::common;

    struct App {
        tray: Tray,
        window: Option<Window>,
    }

    impl ApplicationHandler for App {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.window.is_some() {
                return;
            }

            let attrs = Window::default_attributes()
                .with_title("raytray - tray icon")
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
            while let Some(event) = self.tray.poll_event() {
                match event {
                    TrayEvent::Clicked => tracing::info!("Tray icon clicked"),
                    TrayEvent::DoubleClicked => {
                        tracing::info!("Tray icon double clicked");
                        self.tray.send_notification(&Notification::new(
                            "Hello from the tray",
                            "Double clicks show this balloon",
                        ));
                    }
                    TrayEvent::BalloonTimedOut => tracing::info!("Balloon timed out"),
                    TrayEvent::BalloonHidden => tracing::info!("Balloon hidden"),
                    TrayEvent::BalloonClicked => tracing::info!("Balloon clicked"),
                }
            }

            event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + common::FRAME));
        }
    }

    pub fn run() -> anyhow::Result<()> {
        let config = common::load_config("Tooltip text")?;
        let tray = Tray::new(&config)?;

        let event_loop = EventLoop::new()?;
        let mut app = App { tray, window: None };
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
