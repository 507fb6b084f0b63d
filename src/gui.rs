// src/gui.rs
use crate::drivers::scheduler::{BATTERY_SERIES, SPEED_SERIES};
use crate::drivers::{
    render_telemetry_png, CommandSender, LineSink, LinkStatus, PlotSink, PlotStyle,
    RedrawScheduler, SharedBuffer,
};
use crate::types::MonitorMessage;
use anyhow::Context;
use eframe::egui;
use egui::{Color32, RichText};
use egui_plot::{Legend, Line, Plot, PlotPoints};
use log::{error, info};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

// Upper bound on lines kept per log view
const LOG_LIMIT: usize = 2000;
// How often the logs are refreshed while idle
const LOG_REFRESH: Duration = Duration::from_millis(100);

/// Series as last pushed by the redraw scheduler; drawn every frame.
#[derive(Default)]
pub struct PlotCurves {
    series: Vec<(String, Vec<[f64; 2]>)>,
}

impl PlotSink for PlotCurves {
    fn set_series(&mut self, name: &str, x: &[f64], y: &[f64]) {
        let points: Vec<[f64; 2]> = x.iter().zip(y).map(|(&x, &y)| [x, y]).collect();
        match self.series.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = points,
            None => self.series.push((name.to_owned(), points)),
        }
    }
}

pub struct MonitorApp {
    status: LinkStatus,
    plot_log: Vec<String>,
    reply_log: Vec<String>,
    last_diagnostic: Option<String>,
    curves: PlotCurves,
    scheduler: RedrawScheduler,
    commands: CommandSender<Box<dyn LineSink>>,
    buffer: SharedBuffer,
    rx: Receiver<MonitorMessage>,
}

impl MonitorApp {
    pub fn new(
        status: LinkStatus,
        scheduler: RedrawScheduler,
        commands: CommandSender<Box<dyn LineSink>>,
        buffer: SharedBuffer,
        rx: Receiver<MonitorMessage>,
    ) -> Self {
        Self {
            status,
            plot_log: Vec::new(),
            reply_log: Vec::new(),
            last_diagnostic: None,
            curves: PlotCurves::default(),
            scheduler,
            commands,
            buffer,
            rx,
        }
    }

    fn push_line(log: &mut Vec<String>, line: String) {
        log.push(line);
        if log.len() > LOG_LIMIT {
            log.remove(0);
        }
    }

    fn drain_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                MonitorMessage::PlotLog(s) => Self::push_line(&mut self.plot_log, s),
                MonitorMessage::ReplyLog(s) => Self::push_line(&mut self.reply_log, s),
                MonitorMessage::Diagnostic(s) => self.last_diagnostic = Some(s),
            }
        }
    }

    fn export_png(buffer: &SharedBuffer) -> anyhow::Result<PathBuf> {
        let png = render_telemetry_png(&buffer.frame(), PlotStyle::default())?;
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let path = PathBuf::from(format!("telemetry_{stamp}.png"));
        std::fs::write(&path, png).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    fn log_view(ui: &mut egui::Ui, id: &str, placeholder: &str, lines: &[String]) {
        egui::ScrollArea::vertical()
            .id_source(id)
            .max_height(160.0)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if lines.is_empty() {
                    ui.weak(placeholder);
                }
                for line in lines {
                    ui.monospace(line);
                }
            });
    }
}

impl eframe::App for MonitorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 1. background traffic
        self.drain_messages();

        // 2. timer-driven redraw
        let now = Instant::now();
        self.scheduler.tick(now, &mut self.curves);
        let until_redraw = self.scheduler.next_due(now).saturating_duration_since(now);
        ctx.request_repaint_after(until_redraw.min(LOG_REFRESH));

        // 3. UI
        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.button("Power ON").clicked() {
                    self.commands.toggle_power(true);
                }
                if ui.button("Power OFF").clicked() {
                    self.commands.toggle_power(false);
                }
                if ui.button("Request Log").clicked() {
                    self.commands.request_log();
                }
                if ui.button("Export PNG").clicked() {
                    match Self::export_png(&self.buffer) {
                        Ok(path) => {
                            info!("plot exported to {}", path.display());
                            self.last_diagnostic = Some(format!("Plot saved to {}", path.display()));
                        }
                        Err(e) => {
                            error!("plot export failed: {e:#}");
                            self.last_diagnostic = Some(format!("Export failed: {e:#}"));
                        }
                    }
                }
            });
            ui.horizontal(|ui| {
                let (text, color) = match &self.status {
                    LinkStatus::Disconnected { .. } => (self.status.to_string(), Color32::RED),
                    _ => (self.status.to_string(), Color32::GREEN),
                };
                ui.label(RichText::new(text).color(color).small());
                let state = if self.commands.is_active() { "running" } else { "stopped" };
                ui.label(RichText::new(format!("| {state} | {} samples", self.buffer.len())).small());
            });
            if let Some(diag) = &self.last_diagnostic {
                ui.label(RichText::new(diag).color(Color32::YELLOW).small());
            }
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |cols| {
                Self::log_view(&mut cols[0], "plot_log", "Received Plot Data", &self.plot_log);
                Self::log_view(
                    &mut cols[1],
                    "reply_log",
                    "Command Replies / Log Data",
                    &self.reply_log,
                );
            });
            ui.separator();
            ui.heading(crate::drivers::plot::PLOT_TITLE);
            Plot::new("telemetry_plot")
                .legend(Legend::default())
                .x_axis_label("Time (s)")
                .y_axis_label("Speed (%) / Battery Voltage (V)")
                .show(ui, |plot_ui| {
                    for (name, points) in &self.curves.series {
                        let color = match name.as_str() {
                            SPEED_SERIES => Color32::RED,
                            BATTERY_SERIES => Color32::BLUE,
                            _ => Color32::WHITE,
                        };
                        plot_ui.line(
                            Line::new(PlotPoints::new(points.clone()))
                                .name(name)
                                .color(color),
                        );
                    }
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::RecordingPlotSink;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    #[test]
    fn curves_replace_series_by_name() {
        let mut curves = PlotCurves::default();
        curves.set_series(SPEED_SERIES, &[0.0], &[42.0]);
        curves.set_series(BATTERY_SERIES, &[0.0], &[7.4]);
        curves.set_series(SPEED_SERIES, &[0.0, 1.0], &[42.0, 43.0]);
        assert_eq!(curves.series.len(), 2);
        assert_eq!(curves.series[0].1, vec![[0.0, 42.0], [1.0, 43.0]]);
    }

    #[test]
    fn curves_match_what_the_scheduler_pushed() {
        let buffer = SharedBuffer::new();
        buffer.append(42, 7.4);
        let scheduler = RedrawScheduler::new(
            buffer,
            Arc::new(AtomicBool::new(true)),
            Duration::from_secs(2),
        );
        let mut curves = PlotCurves::default();
        let mut recorded = RecordingPlotSink::default();
        scheduler.redraw(&mut curves);
        scheduler.redraw(&mut recorded);
        for ((name, points), (pushed, x, y)) in curves.series.iter().zip(&recorded.pushes) {
            assert_eq!(name, pushed);
            assert_eq!(points, &vec![[x[0], y[0]]]);
        }
    }
}
