//! Terminal readout: status line, input level, current emotion, and one
//! confidence bar per category.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{cursor, execute};
use emovox::audio::LiveMeter;
use emovox::classify::Emotion;
use emovox::pipeline::Outcome;
use emovox::session::{ClassifySession, SessionEvent};
use std::io::{stdout, Stdout, Write};
use std::sync::mpsc::TryRecvError;
use std::time::Duration;

const BAR_WIDTH: usize = 40;
const POLL: Duration = Duration::from_millis(50);

pub fn run(session: &ClassifySession, meter: &LiveMeter, device: &str) -> Result<()> {
    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), cursor::Hide)?;

    let result = event_loop(session, meter, device, &mut out);

    execute!(out, cursor::Show, ResetColor)?;
    terminal::disable_raw_mode()?;
    result
}

struct View {
    status: String,
    headline: String,
    headline_color: Color,
    scores: Vec<f32>,
}

fn event_loop(
    session: &ClassifySession,
    meter: &LiveMeter,
    device: &str,
    out: &mut Stdout,
) -> Result<()> {
    let mut view = View {
        status: format!("Listening on {device} — press q to quit"),
        headline: "Emotion: —".to_string(),
        headline_color: Color::Grey,
        scores: vec![0.0; Emotion::COUNT],
    };

    loop {
        // Drain everything pending so the readout shows the newest state.
        loop {
            match session.receiver.try_recv() {
                Ok(event) => apply_event(&mut view, event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    view.status = "capture worker exited".to_string();
                    break;
                }
            }
        }

        draw(out, &view, meter.level())?;

        if event::poll(POLL)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    _ => {}
                }
            }
        }
    }
}

fn apply_event(view: &mut View, event: SessionEvent) {
    match event {
        SessionEvent::Outcome(Outcome::Silence) => {
            view.headline = "Emotion: Silence".to_string();
            view.headline_color = Color::DarkGrey;
        }
        SessionEvent::Outcome(Outcome::NotReady) => {
            view.headline = "Emotion: (model not ready)".to_string();
            view.headline_color = Color::DarkYellow;
        }
        SessionEvent::Outcome(Outcome::Decision { decision, scores }) => {
            view.headline = format!(
                "Emotion: {} ({:.1}%)",
                decision.emotion.label(),
                decision.confidence * 100.0
            );
            view.headline_color = emotion_color(decision.emotion);
            view.scores = scores;
        }
        SessionEvent::DeviceLost(reason) => {
            view.status = format!("device lost: {reason}; retrying");
        }
    }
}

/// Terminal mirror of `Emotion::color_hex`.
fn emotion_color(emotion: Emotion) -> Color {
    match emotion {
        Emotion::Angry => Color::Rgb {
            r: 0xe7,
            g: 0x4c,
            b: 0x3c,
        },
        Emotion::Happy => Color::Rgb {
            r: 0xf1,
            g: 0xc4,
            b: 0x0f,
        },
        Emotion::Sad => Color::Rgb {
            r: 0x34,
            g: 0x98,
            b: 0xdb,
        },
        Emotion::Neutral => Color::Rgb {
            r: 0x95,
            g: 0xa5,
            b: 0xa6,
        },
    }
}

fn draw(out: &mut Stdout, view: &View, level: f32) -> Result<()> {
    execute!(
        out,
        cursor::MoveTo(0, 0),
        Clear(ClearType::CurrentLine),
        Print(&view.status)
    )?;
    execute!(
        out,
        cursor::MoveTo(0, 1),
        Clear(ClearType::CurrentLine),
        Print(format!("input rms {level:.4}"))
    )?;
    execute!(
        out,
        cursor::MoveTo(0, 2),
        Clear(ClearType::CurrentLine),
        SetForegroundColor(view.headline_color),
        Print(&view.headline),
        ResetColor
    )?;

    for (index, emotion) in Emotion::ALL.iter().enumerate() {
        let value = view.scores.get(index).copied().unwrap_or(0.0);
        let filled = (value.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize;
        let bar = format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled));
        execute!(
            out,
            cursor::MoveTo(0, 4 + index as u16),
            Clear(ClearType::CurrentLine),
            Print(format!("{:<8}", emotion.label())),
            SetForegroundColor(emotion_color(*emotion)),
            Print(bar),
            ResetColor,
            Print(format!(" {:5.1}%", value * 100.0))
        )?;
    }
    out.flush()?;
    Ok(())
}
