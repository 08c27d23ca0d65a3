//! MediaPoint schedule generation
//!
//! Expands a template `Media` whose first two points describe one window
//! (a start point and an end point) into a schedule covering a whole span.
//! Each generated pair is shifted one window further than the previous pair
//! and gets the template id suffixed with `/<index>`.

use chrono::{Duration as Span, DurationRound, Utc};

use crate::documents::{format_timestamp, Timestamp};
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::v2018::{Media, MediaPoint};

/// Default span of the generated schedule: two weeks
pub const DEFAULT_SPAN_HOURS: i64 = 336;

/// Default window of each point pair
pub const DEFAULT_WINDOW_MINUTES: i64 = 30;

/// Schedule parameters
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Start of the schedule; also the `lastUpdated` of every entity
    pub start: Timestamp,
    /// Total time the Media stays effective
    pub span: Span,
    /// Time each point pair stays effective
    pub window: Span,
    /// Bounds on the schedule size
    pub limits: Limits,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            span: Span::hours(DEFAULT_SPAN_HOURS),
            window: Span::minutes(DEFAULT_WINDOW_MINUTES),
            limits: Limits::default(),
        }
    }
}

impl GeneratorConfig {
    /// Configuration starting at `start` with the default span and window
    pub fn starting_at(start: Timestamp) -> Self {
        Self {
            start,
            ..Self::default()
        }
    }

    /// Set the span
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Set the window
    pub fn with_window(mut self, window: Span) -> Self {
        self.window = window;
        self
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Number of point pairs the span holds
    pub fn pair_count(&self) -> Result<usize> {
        let window = self.window.num_seconds();
        if window <= 0 {
            return Err(Error::Value(format!(
                "window must be at least one second, got {}s",
                window
            )));
        }
        let span = self.span.num_seconds();
        if span < 0 {
            return Err(Error::Value(format!("span must not be negative, got {}s", span)));
        }
        let pairs = usize::try_from(span / window)
            .map_err(|_| Error::Value(format!("{} point pairs do not fit in memory", span / window)))?;
        let points = pairs
            .checked_mul(2)
            .ok_or_else(|| Error::Value(format!("{} point pairs do not fit in memory", pairs)))?;
        self.limits.check_generated_points(points)?;
        Ok(pairs)
    }
}

/// The top of the previous hour, in UTC
pub fn default_start() -> Timestamp {
    let now = Utc::now();
    let hour = now.duration_trunc(Span::hours(1)).unwrap_or(now);
    (hour - Span::hours(1)).fixed_offset()
}

/// Build the schedule described by `config` from `template`
pub fn generate(template: &Media, config: &GeneratorConfig) -> Result<Media> {
    let pairs = config.pair_count()?;
    let (start_point, end_point) = match template.media_points.as_slice() {
        [start, end, ..] => (start, end),
        points => {
            return Err(Error::Value(format!(
                "template needs a start and an end MediaPoint, found {}",
                points.len()
            )))
        }
    };

    let window_end = offset(config.start, config.window)?;
    let expires = offset(config.start, config.span)?;
    let mut start_point = reset(start_point, config.start, window_end);
    let mut end_point = reset(end_point, config.start, window_end);
    let start_id = start_point.identity.id.clone().unwrap_or_default();
    let end_id = end_point.identity.id.clone().unwrap_or_default();

    let mut media_points = Vec::with_capacity(pairs * 2);
    for index in 0..pairs {
        start_point = shift(&start_point, config.window, format!("{}/{}", start_id, index))?;
        end_point = shift(&end_point, config.window, format!("{}/{}", end_id, index))?;
        media_points.push(start_point.clone());
        media_points.push(end_point.clone());
    }

    let mut media = template.clone();
    media.reusable.identity.last_updated = Some(config.start);
    media.effective = Some(config.start);
    media.expires = Some(expires);
    media.media_points = media_points;

    tracing::debug!(
        media = media.id().unwrap_or(""),
        points = media.media_points.len(),
        "generated media point schedule"
    );
    Ok(media)
}

fn reset(point: &MediaPoint, effective: Timestamp, expires: Timestamp) -> MediaPoint {
    let mut point = point.clone();
    point.identity.last_updated = Some(effective);
    point.effective = Some(effective);
    point.expires = Some(expires);
    point
}

fn shift(point: &MediaPoint, window: Span, id: String) -> Result<MediaPoint> {
    let mut point = point.clone();
    point.effective = point.effective.map(|t| offset(t, window)).transpose()?;
    point.expires = point.expires.map(|t| offset(t, window)).transpose()?;
    point.identity.id = Some(id);
    Ok(point)
}

fn offset(at: Timestamp, by: Span) -> Result<Timestamp> {
    at.checked_add_signed(by).ok_or_else(|| {
        Error::Value(format!(
            "{} shifted by {}s is out of range",
            format_timestamp(&at),
            by.num_seconds()
        ))
    })
}
