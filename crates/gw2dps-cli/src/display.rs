//! Terminal displays.

use std::io::Write;

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use gw2dps_core::{
    Colour, DisplayFrame, DisplaySink, MeterDisplay, Result, TickReport, TimingConfig,
};
use owo_colors::OwoColorize;

const HEALTH_BAR_WIDTH: usize = 20;

/// Single redrawn status line
pub struct ConsoleSink<W: Write> {
    out: W,
    display: MeterDisplay,
    background: Colour,
    attached: bool,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, timing: &TimingConfig) -> Self {
        Self {
            out,
            display: MeterDisplay::new(timing),
            background: Colour::default(),
            attached: false,
        }
    }

    fn paint(&self, text: &str, fg: Colour) -> String {
        let bg = self.background;
        text.truecolor(fg.r, fg.g, fg.b)
            .on_truecolor(bg.r, bg.g, bg.b)
            .to_string()
    }

    fn readout(&self, label: &str, frame: DisplayFrame) -> String {
        format!(
            "{}{}",
            self.paint(&format!("{label:>10} "), Colour::WHITE),
            self.paint(&format!("{:>6}", frame.value), frame.emphasis.colour())
        )
    }

    fn render(&mut self, report: &TickReport) -> String {
        let frame = self.display.update(report);
        let combat = if report.in_combat {
            self.paint("  in combat ", Colour::RED)
        } else {
            self.paint("            ", Colour::WHITE)
        };
        let target = self.paint(
            &format!(
                " {} {}",
                health_bar(report.target_health, report.target_max_health, HEALTH_BAR_WIDTH),
                format_health(report.target_health, report.target_max_health)
            ),
            Colour::WHITE,
        );

        format!(
            "{}{}{}{}",
            self.readout("Instant", frame.instant),
            self.readout("Sustained", frame.sustained),
            combat,
            target
        )
    }
}

impl<W: Write> DisplaySink for ConsoleSink<W> {
    fn attach(&mut self) -> Result<()> {
        self.attached = true;
        writeln!(self.out, "Press Esc or q to quit, r to reset")?;
        Ok(())
    }

    fn detach(&mut self) -> Result<()> {
        if !self.attached {
            return Ok(());
        }
        self.attached = false;

        let (instant_max, instant_average) = self.display.instant().summary();
        let (sustained_max, sustained_average) = self.display.sustained().summary();
        writeln!(self.out)?;
        writeln!(
            self.out,
            "Instant   max {instant_max}, last combat average {instant_average}"
        )?;
        writeln!(
            self.out,
            "Sustained max {sustained_max}, last combat average {sustained_average}"
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn update_data(&mut self, report: &TickReport) -> Result<()> {
        if !self.attached {
            return Ok(());
        }
        let line = self.render(report);
        queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        write!(self.out, "{line}")?;
        self.out.flush()?;
        Ok(())
    }

    fn set_background(&mut self, colour: Colour) -> Result<()> {
        self.background = colour;
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.display.reset();
        Ok(())
    }
}

/// One JSON object per tick, for piping into other tools
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> DisplaySink for JsonSink<W> {
    fn update_data(&mut self, report: &TickReport) -> Result<()> {
        serde_json::to_writer(&mut self.out, report).map_err(std::io::Error::from)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    fn set_background(&mut self, _colour: Colour) -> Result<()> {
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        Ok(())
    }
}

/// `current / max`, or a placeholder without a target
pub fn format_health(current: f32, max: f32) -> String {
    if current < 0.0 || max <= 0.0 {
        return "no target".to_string();
    }
    format!("{} / {}", current as i64, max as i64)
}

pub fn health_bar(current: f32, max: f32, width: usize) -> String {
    if current < 0.0 || max <= 0.0 {
        return " ".repeat(width);
    }
    let filled = ((current / max).clamp(0.0, 1.0) * width as f32).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
