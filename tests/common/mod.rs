//! Test utilities and helper functions for the progress table test suite

use std::cell::Cell;
use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Result, anyhow};
use scraper::{Html, Selector};
use table_progress_tracking::{Clock, RenderHost};

/// Builds a tag attribute map
#[allow(dead_code)]
pub fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Values of `attr` on every element matching `selector`, in document order
#[allow(dead_code)]
pub fn attr_values(html: &str, selector: &str, attr: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);
    let selector = Selector::parse(selector).expect("test selector is valid");
    fragment
        .select(&selector)
        .filter_map(|el| el.value().attr(attr).map(str::to_string))
        .collect()
}

/// Number of elements matching `selector`
#[allow(dead_code)]
pub fn count(html: &str, selector: &str) -> usize {
    let fragment = Html::parse_fragment(html);
    let selector = Selector::parse(selector).expect("test selector is valid");
    fragment.select(&selector).count()
}

/// Whether the output is the error box rather than a table
#[allow(dead_code)]
pub fn is_error_box(html: &str) -> bool {
    html.starts_with("<div class=\"cdx-message cdx-message--block cdx-message--error\">")
}

/// Clock that reads zero for the first `trip_after` calls and one hour after
#[allow(dead_code)]
pub struct TrippingClock {
    calls: Cell<usize>,
    trip_after: usize,
}

#[allow(dead_code)]
impl TrippingClock {
    pub fn new(trip_after: usize) -> Self {
        Self {
            calls: Cell::new(0),
            trip_after,
        }
    }
}

impl Clock for TrippingClock {
    fn now(&self) -> Duration {
        let calls = self.calls.get() + 1;
        self.calls.set(calls);
        if calls > self.trip_after {
            Duration::from_secs(3600)
        } else {
            Duration::ZERO
        }
    }
}

/// Manually advanced clock
#[allow(dead_code)]
#[derive(Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Host whose renderer takes `render_time` on a shared [`ManualClock`]
#[allow(dead_code)]
pub struct SlowHost<'a> {
    pub clock: &'a ManualClock,
    pub render_time: Duration,
}

impl RenderHost for SlowHost<'_> {
    fn render(&mut self, raw: &str) -> Result<String> {
        self.clock.advance(self.render_time);
        Ok(raw.to_string())
    }
}

/// Host returning fixed markup regardless of input
#[allow(dead_code)]
pub struct FixedHost {
    pub output: String,
    pub cache_disabled: bool,
}

#[allow(dead_code)]
impl FixedHost {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            cache_disabled: false,
        }
    }
}

impl RenderHost for FixedHost {
    fn render(&mut self, _raw: &str) -> Result<String> {
        Ok(self.output.clone())
    }

    fn disable_cache(&mut self) {
        self.cache_disabled = true;
    }
}

/// Host whose renderer always fails
#[allow(dead_code)]
pub struct FailingHost;

impl RenderHost for FailingHost {
    fn render(&mut self, _raw: &str) -> Result<String> {
        Err(anyhow!("template loop detected"))
    }
}
