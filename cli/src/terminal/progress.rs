use std::sync::{Mutex, MutexGuard, PoisonError};

use blackhole_common::progress::ProgressSink;
use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TEMPLATE: &str = "{spinner:.blue} {msg} [{bar:30.green/bright_black}] {pos}/{len}";

/// Progress bar drawn by the indicatif layer, one span per phase.
///
/// Dropping the phase span removes its bar.
#[derive(Default)]
pub struct SpanProgress {
    current: Mutex<Option<Span>>,
}

impl SpanProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&self) -> MutexGuard<'_, Option<Span>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn style() -> ProgressStyle {
    ProgressStyle::with_template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▆▁")
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ])
}

impl ProgressSink for SpanProgress {
    fn set_description(&self, description: &str) {
        let span = info_span!("phase", indicatif.pb_show = true);
        span.pb_set_style(&style());
        span.pb_set_message(description);
        span.pb_start();
        *self.current() = Some(span);
    }

    fn set_tasks(&self, tasks: u64) {
        if let Some(span) = self.current().as_ref() {
            span.pb_set_length(tasks);
        }
    }

    fn task_done(&self) {
        if let Some(span) = self.current().as_ref() {
            span.pb_inc(1);
        }
    }

    fn clear(&self) {
        self.current().take();
    }
}
