//! Operator-facing rendering of the progress stream.

use crate::progress::event::{DigestEvent, Phase, ProgressEnvelope};
use crate::verify::VerifyStatus;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

/// How progress is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReportStyle {
    /// Transient status line per file, replaced by DONE on completion
    #[default]
    Line,
    /// One JSON object per event
    Json,
    /// Nothing
    Off,
}

const BANNER_WIDTH: usize = 79;

/// Consumes progress envelopes and writes them to `out`.
pub struct Reporter<W: Write> {
    style: ReportStyle,
    color: bool,
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(style: ReportStyle, color: bool, out: W) -> Self {
        Self { style, color, out }
    }

    /// Render one envelope.
    pub fn handle(&mut self, envelope: &ProgressEnvelope) -> io::Result<()> {
        match self.style {
            ReportStyle::Off => Ok(()),
            ReportStyle::Json => {
                serde_json::to_writer(&mut self.out, envelope)?;
                self.out.write_all(b"\n")?;
                self.out.flush()
            }
            ReportStyle::Line => self.render_line(&envelope.event),
        }
    }

    /// Drain the receiver until every sender is gone, then hand the writer back.
    pub fn run(mut self, receiver: Receiver<ProgressEnvelope>) -> io::Result<W> {
        for envelope in receiver {
            self.handle(&envelope)?;
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn render_line(&mut self, event: &DigestEvent) -> io::Result<()> {
        match event {
            DigestEvent::PhaseStarted { phase } => {
                if *phase == Phase::Aggregate {
                    writeln!(self.out, "{}", banner(" aggregating directory checksums "))?;
                }
            }
            DigestEvent::FileStarted { path, .. } => {
                write!(self.out, "\r{:<10}{}", "0%", path.display())?;
            }
            DigestEvent::FileProgress { path, percent } => {
                let pct = format!("{:.0}%", percent);
                write!(self.out, "\r{:<10}{}", pct, path.display())?;
            }
            DigestEvent::FileDone { path, .. } => {
                let label = self.paint_ok("DONE");
                writeln!(self.out, "\r{}        {}", label, path.display())?;
            }
            DigestEvent::FileFailed { error, .. } | DigestEvent::DirectoryFailed { error, .. } => {
                let label = self.paint_err("ERROR:");
                writeln!(self.out, "\r{} {}", label, error)?;
            }
            DigestEvent::DirectoryDone { .. } => {}
            DigestEvent::Verified { path, status } => {
                let label = match status {
                    VerifyStatus::Match => self.paint_ok("OK"),
                    VerifyStatus::Mismatch { .. } => self.paint_err("MISMATCH"),
                    VerifyStatus::Missing => self.paint_err("MISSING"),
                };
                // Padding is applied to the plain label so ANSI codes don't skew columns.
                let pad = 10usize.saturating_sub(status.label().len());
                writeln!(self.out, "\r{}{}{}", label, " ".repeat(pad), path.display())?;
            }
        }
        self.out.flush()
    }

    fn paint_ok(&self, label: &str) -> String {
        if self.color {
            label.green().bold().to_string()
        } else {
            label.to_string()
        }
    }

    fn paint_err(&self, label: &str) -> String {
        if self.color {
            label.red().bold().to_string()
        } else {
            label.to_string()
        }
    }
}

impl<W: Write + Send + 'static> Reporter<W> {
    /// Run the reporter on its own thread.
    pub fn spawn(self, receiver: Receiver<ProgressEnvelope>) -> JoinHandle<io::Result<W>> {
        thread::spawn(move || self.run(receiver))
    }
}

fn banner(title: &str) -> String {
    let fill = BANNER_WIDTH.saturating_sub(title.len());
    let left = fill / 2;
    format!("{}{}{}", "=".repeat(left), title, "=".repeat(fill - left))
}
