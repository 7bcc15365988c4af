//! Terminal progress display for a running interval

use pomo_api::Interval;
use pomo_core::IntervalObserver;
use pomo_util::{format_clock, format_duration};
use std::io::Write;

const BAR_WIDTH: usize = 24;

/// Redraws a single countdown line on every tick.
///
/// Write failures are ignored; losing the display never stops the interval.
pub struct Dashboard<W> {
    out: W,
}

impl<W: Write + Send> Dashboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn redraw(&mut self, interval: &Interval) {
        let _ = write!(self.out, "\r{}", status_line(interval));
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> IntervalObserver for Dashboard<W> {
    fn on_start(&mut self, interval: &Interval) {
        let _ = writeln!(
            self.out,
            "{} #{} ({})",
            interval.category,
            interval.id,
            format_duration(interval.planned_duration)
        );
        self.redraw(interval);
    }

    fn on_tick(&mut self, interval: &Interval) {
        self.redraw(interval);
    }

    fn on_end(&mut self, interval: &Interval) {
        self.redraw(interval);
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "{} finished", interval.category);
        let _ = self.out.flush();
    }
}

/// `[#####-----] 12:30 left`
pub fn status_line(interval: &Interval) -> String {
    let filled = (interval.progress() * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);

    format!(
        "[{}{}] {} left",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        format_clock(interval.remaining())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomo_api::Category;
    use std::time::Duration;

    #[test]
    fn status_line_shows_bar_and_countdown() {
        let mut interval = Interval::new(Category::Work, Duration::from_secs(1500));
        assert_eq!(
            status_line(&interval),
            format!("[{}] 25:00 left", "-".repeat(BAR_WIDTH))
        );

        interval.actual_duration = Duration::from_secs(750);
        assert_eq!(
            status_line(&interval),
            format!("[{}{}] 12:30 left", "#".repeat(12), "-".repeat(12))
        );

        interval.actual_duration = Duration::from_secs(1500);
        assert_eq!(
            status_line(&interval),
            format!("[{}] 00:00 left", "#".repeat(BAR_WIDTH))
        );
    }

    #[test]
    fn end_notice_follows_final_line() {
        let mut dashboard = Dashboard::new(Vec::new());
        let mut interval = Interval::new(Category::ShortBreak, Duration::from_secs(60));

        dashboard.on_start(&interval);
        interval.actual_duration = Duration::from_secs(60);
        dashboard.on_end(&interval);

        let output = String::from_utf8(dashboard.into_inner()).unwrap();
        assert!(output.starts_with("Short break #0 (1m 0s)\n"));
        assert!(output.contains("00:00 left"));
        assert!(output.ends_with("\nShort break finished\n"));
    }
}
