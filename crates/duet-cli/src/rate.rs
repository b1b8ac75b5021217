//! `duet rate`: an interactive rating loop on the terminal.
//!
//! Each prompt shows the anchor first. A digit records a score, `s` shows a
//! different pair and `q` (or end of input) quits.

use std::io::Write;

use duet_core::{
  Error,
  answer::{MAX_SCORE, MIN_SCORE, Score},
  log::AnswerLog,
  remaining::Progress,
  session::{Presentation, Session},
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _};

/// One line of terminal input.
#[derive(Debug, PartialEq, Eq)]
enum Command {
  Score(i64),
  Skip,
  Quit,
  Unknown,
}

fn parse_command(line: &str) -> Command {
  match line.trim() {
    "q" | "quit" => Command::Quit,
    "s" | "skip" => Command::Skip,
    other => other.parse().map(Command::Score).unwrap_or(Command::Unknown),
  }
}

fn score_legend() -> String {
  (i64::from(MIN_SCORE)..=i64::from(MAX_SCORE))
    .filter_map(|n| Score::new(n).ok())
    .map(|s| format!("{} {}", s.get(), s.label()))
    .collect::<Vec<_>>()
    .join(", ")
}

fn fmt_progress(p: Progress) -> String {
  format!("{}/{} ({:.0}%)", p.answered, p.total, p.ratio() * 100.0)
}

/// Run the loop until the catalog is exhausted or the rater quits.
pub async fn run<L, R, W>(session: &mut Session<L>, input: R, out: &mut W) -> anyhow::Result<()>
where
  L: AnswerLog,
  R: AsyncBufRead + Unpin,
  W: Write,
{
  let legend = score_legend();
  let mut lines = input.lines();

  loop {
    let (anchor, other, anchor_progress, global_progress) = match session.current_display() {
      Presentation::Pair { anchor_item, other_item, anchor_progress, global_progress } => {
        (anchor_item, other_item, anchor_progress, global_progress)
      }
      Presentation::Done { global_progress } => {
        writeln!(out, "All {} pairs rated.", global_progress.total)?;
        return Ok(());
      }
    };

    writeln!(out)?;
    writeln!(
      out,
      "{anchor} ({}) | overall {}",
      fmt_progress(anchor_progress),
      fmt_progress(global_progress)
    )?;
    writeln!(out, "  {anchor} + {other}")?;
    write!(out, "[{legend}; s skip, q quit] > ")?;
    out.flush()?;

    let Some(line) = lines.next_line().await? else {
      writeln!(out)?;
      return Ok(());
    };

    match parse_command(&line) {
      Command::Quit => return Ok(()),
      Command::Skip => session.skip(),
      Command::Score(n) => match session.submit(n).await {
        Ok(answer) => tracing::debug!(pair = ?answer.pair, score = %answer.score, "rated"),
        Err(Error::ScoreOutOfRange(n)) => {
          writeln!(out, "{n} is not a score between {MIN_SCORE} and {MAX_SCORE}")?;
        }
        Err(e) => writeln!(out, "could not record the answer: {e}")?,
      },
      Command::Unknown => writeln!(out, "enter a score, s or q")?,
    }
  }
}
