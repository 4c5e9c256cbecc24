use url::form_urlencoded;

pub const DEFAULT_START: usize = 0;
pub const DEFAULT_LIMIT: usize = 100;

/// A `[start, start + limit)` slice of a logical sequence.
///
/// `start` is an absolute offset over the whole merged sequence, never a
/// per-source offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub start: usize,
    pub limit: usize,
}

impl Default for PageWindow {
    fn default() -> Self {
        PageWindow {
            start: DEFAULT_START,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageWindow {
    pub fn new(start: usize, limit: usize) -> Self {
        PageWindow { start, limit }
    }

    /// Builds a window from raw `start` / `limit` parameter values.
    ///
    /// A value that is missing or does not parse as a non-negative integer
    /// falls back to its default. Garbage is not rejected.
    pub fn from_params(start: Option<&str>, limit: Option<&str>) -> Self {
        let parse = |raw: Option<&str>, default: usize| {
            raw.and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(default)
        };

        PageWindow {
            start: parse(start, DEFAULT_START),
            limit: parse(limit, DEFAULT_LIMIT),
        }
    }

    /// Builds a window from a raw query string. The last occurrence of a
    /// repeated parameter wins.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut start = None;
        let mut limit = None;

        for (name, value) in form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match name.as_ref() {
                "start" => start = Some(value),
                "limit" => limit = Some(value),
                _ => {}
            }
        }

        Self::from_params(start.as_deref(), limit.as_deref())
    }

    /// Exclusive end offset of the window.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.limit)
    }

    /// The window immediately following this one, with the same limit.
    pub fn next(&self) -> PageWindow {
        PageWindow {
            start: self.end(),
            limit: self.limit,
        }
    }
}
