//! Each click on the tray icon swaps its image and tooltip.

#[cfg(target_os = "windows")]
#[path = "common/mod.rs"]
mod common;

#[cfg(target_os = "windows")]
mod demo {
    use std::time::Instant;

    use raytray::{Tray, TrayConfig, TrayEvent};
    use winit::application::ApplicationHandler;
    use winit::dpi::LogicalSize;
    use winit::event::WindowEvent;
    use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
    use winit::window::{Window, WindowId};

    use crate::common;

    const ICONS: [(&str, &str); 2] = [
        ("raytray.ico", "All quiet"),
        ("raytray_alert.ico", "Something needs attention"),
    ];

    struct App {
        tray: Tray,
        window: Option<Window>,
        current: usize,
    }

    impl App {
        fn swap_icon(&mut self) {
            self.current = (self.current + 1) % ICONS.len();
            let (icon, tooltip) = ICONS[self.current];

            tracing::info!("Switching tray icon to {icon}");
            self.tray.change_icon(common::asset(icon));
            self.tray.change_tooltip(tooltip);

            if let Some(window) = &self.window {
                window.set_title(&format!("raytray - {tooltip}"));
            }
        }
    }

    impl ApplicationHandler for App {
        fn resumed(&mut self, event_loop: &ActiveEventLoop) {
            if self.window.is_some() {
                return;
            }

            let attrs = Window::default_attributes()
                .with_title("raytray - click the tray icon")
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
                if event == TrayEvent::Clicked {
                    self.swap_icon();
                }
            }

            event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + common::FRAME));
        }
    }

    pub fn run() -> anyhow::Result<()> {
        let (icon, tooltip) = ICONS[0];
        let tray = Tray::new(&TrayConfig::new(Some(common::asset(icon)), tooltip))?;

        let event_loop = EventLoop::new()?;
        let mut app = App {
            tray,
            window: None,
            current: 0,
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
