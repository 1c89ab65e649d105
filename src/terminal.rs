// SPDX-License-Identifier: GPL-3.0-only

//! Terminal rendering of the capture screen
//!
//! The single screen of the app, drawn with Unicode half-block characters
//! for improved vertical resolution. Key presses stand in for the touch
//! gestures:
//!
//! - space: take a picture          - d: delete the picture
//! - left/right: cycle filters      - f: flip the picture (up-swipe)
//! - t: show/hide the label         - i/j/k/l: drag the label
//! - +/-: resize the label          - e: export to the photo library
//! - c: switch camera               - h: help, q: quit

use crate::backends::camera::types::{CameraDevice, CameraFrame};
use crate::backends::camera::{CameraBackend, PreviewStream, default_backend};
use crate::compositor::FilterCompositor;
use crate::compositor::catalog::FilterCatalog;
use crate::config::Config;
use crate::errors::ExportError;
use crate::permissions::{GrantAllBroker, authorize_capture};
use crate::session::alerts::{Alert, AlertSink};
use crate::session::{CaptureSession, ScreenMode};
use crate::storage;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::channel::mpsc;
use image::RgbaImage;
use ratatui::{
    Terminal, backend::CrosstermBackend, buffer::Buffer, layout::Rect, style::Color,
    widgets::Widget,
};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};

/// Logical view width the label coordinates are relative to; stands in for
/// the phone's screen width in points.
const VIEW_WIDTH: f32 = 360.0;

/// Label pan step per keypress, in view coordinates
const PAN_STEP: f32 = 8.0;

/// Run the capture screen
pub fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;

    // Authorization first; the camera only starts once both checks pass
    if !runtime.block_on(authorize_capture(&GrantAllBroker)) {
        return Err("App needs permission to use the camera and microphone".into());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &runtime, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

struct App {
    session: CaptureSession,
    backend: Box<dyn CameraBackend>,
    devices: Vec<CameraDevice>,
    stream: Option<PreviewStream>,
    live_frame: Option<CameraFrame>,
    output_format: crate::constants::OutputFormat,
    status: String,
    save_sender: mpsc::Sender<Result<PathBuf, ExportError>>,
    save_receiver: mpsc::Receiver<Result<PathBuf, ExportError>>,
}

impl App {
    fn new(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let backend = default_backend();
        let devices = backend.enumerate();
        if devices.is_empty() {
            return Err("No cameras found".into());
        }
        info!(count = devices.len(), backend = backend.name(), "Found cameras");

        let catalog = FilterCatalog::load_or_builtin(config.filter_dir.as_deref());
        let compositor = FilterCompositor::new(catalog);
        let session = CaptureSession::new(&config, compositor, (VIEW_WIDTH, VIEW_WIDTH));
        let (save_sender, save_receiver) = mpsc::channel(4);

        let mut app = Self {
            session,
            backend,
            devices,
            stream: None,
            live_frame: None,
            output_format: config.output_format,
            status: String::new(),
            save_sender,
            save_receiver,
        };
        app.start_camera()?;
        app.status = help_line(app.session.mode());
        Ok(app)
    }

    /// Device for the current facing; clamps to the last device when there
    /// is no front camera to switch to.
    fn current_device(&self) -> &CameraDevice {
        let index = self
            .session
            .facing()
            .device_index()
            .min(self.devices.len() - 1);
        &self.devices[index]
    }

    fn start_camera(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        // Drop the old stream first so its producer stops
        self.stream = None;
        self.live_frame = None;

        let device = self.current_device().clone();
        info!(device = %device.name, "Initializing camera");
        match self.backend.open_preview(&device) {
            Ok(stream) => {
                self.stream = Some(stream);
                Ok(())
            }
            Err(e) => {
                // Best-effort: stay on the screen without a stream
                error!(error = %e, "Failed to start camera");
                self.status = format!("Error: {}", e);
                Ok(())
            }
        }
    }

    fn capture(&mut self) {
        let Some(frame) = self.live_frame.as_ref() else {
            info!("No frame available to capture");
            return;
        };
        let Some(image) = frame.to_rgba() else {
            warn!("Captured frame could not be decoded, skipping");
            return;
        };

        self.session.photo_captured(image);
        // Label coordinates follow a fixed-width view; keep its aspect
        // matched to the photo so centering looks right.
        let aspect = frame.height as f32 / frame.width as f32;
        self.session.set_view_size(VIEW_WIDTH, VIEW_WIDTH * aspect);
        self.status = help_line(self.session.mode());
    }

    fn export(&mut self, runtime: &tokio::runtime::Runtime) {
        let image = match self.session.export_image() {
            Ok(image) => image,
            Err(e) => {
                // Nothing captured yet; skip quietly
                info!(error = %e, "Nothing to export");
                return;
            }
        };

        let format = self.output_format;
        let mut sender = self.save_sender.clone();
        runtime.spawn(async move {
            let result = storage::save_to_library(image, format).await;
            let _ = sender.try_send(result);
        });
        self.status = "Saving...".to_string();
    }

    /// Apply finished saves; success and failure both surface as alerts
    fn poll_save_results(&mut self) {
        while let Ok(Some(result)) = self.save_receiver.try_next() {
            match result {
                Ok(path) => self.present(Alert::photo_saved(&path)),
                Err(e) => {
                    error!(error = %e, "Export failed");
                    self.present(Alert::save_failed(&e));
                }
            }
        }
    }

    /// The image the review screen shows: composited photo plus the label
    fn review_image(&self) -> Option<RgbaImage> {
        self.session.export_image().ok()
    }
}

impl AlertSink for App {
    fn present(&mut self, alert: Alert) {
        let actions = alert
            .actions
            .iter()
            .map(|a| format!("[{}]", a.label))
            .collect::<Vec<_>>()
            .join(" ");
        self.status = match alert.message {
            Some(message) => format!("{} - {} {}", alert.title, message, actions),
            None => format!("{} {}", alert.title, actions),
        };
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    runtime: &tokio::runtime::Runtime,
    config: Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(config)?;

    loop {
        // Drain the stream to the latest frame; frames keep flowing while
        // reviewing, the review image just wins on screen
        if let Some(stream) = app.stream.as_mut()
            && let Some(frame) = stream.latest_frame()
        {
            app.live_frame = Some(frame);
        }
        app.poll_save_results();

        let display = match app.session.mode() {
            ScreenMode::Review => app.review_image().map(DisplayImage::Photo),
            ScreenMode::Live => app.live_frame.clone().map(DisplayImage::Live),
        };

        terminal.draw(|f| {
            let area = f.area();

            // Reserve bottom line for status
            let camera_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(1),
            };
            f.render_widget(FrameWidget { image: &display }, camera_area);

            let status_area = Rect {
                x: area.x,
                y: area.y + area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };
            f.render_widget(
                StatusBar {
                    message: &app.status,
                },
                status_area,
            );
        })?;

        // Handle input with timeout for frame updates
        if event::poll(Duration::from_millis(16))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }

            match key.code {
                KeyCode::Char('q') => break,
                KeyCode::Char('h') => app.status = help_line(app.session.mode()),

                // Live controls
                KeyCode::Char(' ') => {
                    if app.session.mode() == ScreenMode::Live {
                        app.capture();
                    }
                }
                KeyCode::Char('c') => {
                    if app.session.mode() == ScreenMode::Live {
                        let facing = app.session.toggle_facing();
                        info!(%facing, "Switching camera");
                        app.start_camera()?;
                    }
                }

                // Review controls; each no-ops without a photo
                KeyCode::Right => {
                    app.session.swipe_left(); // swiping left shows the next filter
                    app.status = filter_line(&app.session);
                }
                KeyCode::Left => {
                    app.session.swipe_right();
                    app.status = filter_line(&app.session);
                }
                KeyCode::Char('f') => app.session.swipe_up(),
                KeyCode::Char('t') => app.session.toggle_label(),
                KeyCode::Char('d') => {
                    app.session.delete();
                    app.status = help_line(app.session.mode());
                }
                KeyCode::Char('e') => app.export(runtime),

                // Label drag: one keypress is one small pan gesture
                KeyCode::Char('i') => pan_label(&mut app, 0.0, -PAN_STEP),
                KeyCode::Char('k') => pan_label(&mut app, 0.0, PAN_STEP),
                KeyCode::Char('j') => pan_label(&mut app, -PAN_STEP, 0.0),
                KeyCode::Char('l') => pan_label(&mut app, PAN_STEP, 0.0),

                // Label pinch
                KeyCode::Char('+') | KeyCode::Char('=') => pinch_label(&mut app, 1.25),
                KeyCode::Char('-') => pinch_label(&mut app, 0.8),

                _ => {}
            }
        }
    }

    Ok(())
}

fn pan_label(app: &mut App, dx: f32, dy: f32) {
    let overlay = app.session.overlay_mut();
    if overlay.is_hidden() {
        return;
    }
    overlay.begin_pan();
    overlay.pan(dx, dy);
    overlay.end_pan();
}

fn pinch_label(app: &mut App, factor: f32) {
    let overlay = app.session.overlay_mut();
    if overlay.is_hidden() {
        return;
    }
    overlay.begin_pinch();
    overlay.pinch(factor);
    overlay.end_pinch();
}

fn help_line(mode: ScreenMode) -> String {
    match mode {
        ScreenMode::Live => "space: picture | c: switch camera | h: help | q: quit".to_string(),
        ScreenMode::Review => {
            "←/→: filters | f: flip | t: label | ijkl/+-: move/size | e: export | d: delete"
                .to_string()
        }
    }
}

fn filter_line(session: &CaptureSession) -> String {
    match session.selection() {
        None => "Filter: none".to_string(),
        Some(i) => format!("Filter: {}", i + 1),
    }
}

/// What the preview area shows
enum DisplayImage {
    /// Raw frame from the camera stream
    Live(CameraFrame),
    /// Composited review image
    Photo(RgbaImage),
}

impl DisplayImage {
    fn dimensions(&self) -> (u32, u32) {
        match self {
            DisplayImage::Live(frame) => (frame.width, frame.height),
            DisplayImage::Photo(img) => img.dimensions(),
        }
    }

    fn sample(&self, x: u32, y: u32) -> Color {
        match self {
            DisplayImage::Live(frame) => {
                let (r, g, b) = frame.sample_rgb(x, y);
                Color::Rgb(r, g, b)
            }
            DisplayImage::Photo(img) => {
                let x = x.min(img.width().saturating_sub(1));
                let y = y.min(img.height().saturating_sub(1));
                let p = img.get_pixel(x, y).0;
                Color::Rgb(p[0], p[1], p[2])
            }
        }
    }
}

/// Widget that renders an image using half-block characters
struct FrameWidget<'a> {
    image: &'a Option<DisplayImage>,
}

impl Widget for FrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(image) = self.image else {
            let msg = "Waiting for camera...";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, ratatui::style::Style::default());
            }
            return;
        };

        let (img_width, img_height) = image.dimensions();
        if img_width == 0 || img_height == 0 {
            return;
        }

        // Each terminal cell displays 2 vertical pixels using half-blocks
        let aspect = img_width as f64 / img_height as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > aspect {
            let h = term_height;
            let w = h * aspect;
            (w as u16, (h / 2.0) as u16)
        } else {
            let w = term_width;
            let h = w / aspect;
            (w as u16, (h / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = img_width as f64 / display_width as f64;
        let y_scale = img_height as f64 / (display_height * 2) as f64;

        for ty in 0..display_height {
            for tx in 0..display_width {
                let term_x = x_offset + tx;
                let term_y = y_offset + ty;

                if term_x >= area.x + area.width || term_y >= area.y + area.height {
                    continue;
                }

                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let top_color = image.sample(src_x, src_y_top);
                let bottom_color = image.sample(src_x, src_y_bottom);

                if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                    cell.set_char('▀');
                    cell.set_fg(top_color);
                    cell.set_bg(bottom_color);
                }
            }
        }
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        let width = area.width as usize;
        let text: String = self.message.chars().take(width).collect();
        buf.set_string(
            area.x,
            area.y,
            text,
            ratatui::style::Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray),
        );
    }
}
