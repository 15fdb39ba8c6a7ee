//! Token bucket rate limiting.

/// Default token bucket size, in bytes.
pub const DEFAULT_BUFFER: u32 = 1_600;

/// Default number of bytes that can wait for tokens.
pub const DEFAULT_LIMIT: u32 = 3_000;

/// Rate limiting as requested by a caller. Every field is optional; see
/// [`Request::validate`](crate::Request::validate) for how they depend on each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimit {
    /// Token bucket rate, e.g. `256kbit`.
    pub rate: Option<String>,
    /// Bucket size in bytes. Defaults to [`DEFAULT_BUFFER`].
    pub buffer: Option<u32>,
    /// Queue size in bytes. Defaults to [`DEFAULT_LIMIT`].
    pub limit: Option<u32>,
    /// Only limit traffic sent to this CIDR.
    pub destination: Option<String>,
}

impl RateLimit {
    pub fn new(rate: impl Into<String>) -> Self {
        Self { rate: Some(rate.into()), ..Default::default() }
    }

    pub fn with_buffer(mut self, buffer: u32) -> Self {
        self.buffer = Some(buffer);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// The rate, if present and not blank.
    pub fn rate(&self) -> Option<&str> {
        non_blank(&self.rate)
    }

    /// The destination, if present and not blank.
    pub fn destination(&self) -> Option<&str> {
        non_blank(&self.destination)
    }

    /// Returns `true` if any option depending on the rate is set.
    pub fn has_rate_options(&self) -> bool {
        self.buffer.is_some() || self.limit.is_some() || self.destination().is_some()
    }

    /// Returns `true` if nothing is set.
    pub fn is_empty(&self) -> bool {
        self.rate().is_none() && !self.has_rate_options()
    }

    /// The token bucket described by this request, with defaults applied. `None` without a rate.
    pub fn token_bucket(&self) -> Option<TokenBucket> {
        let bucket = TokenBucket::new(self.rate()?)
            .with_buffer(self.buffer.unwrap_or(DEFAULT_BUFFER))
            .with_limit(self.limit.unwrap_or(DEFAULT_LIMIT));

        Some(bucket)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A `tbf` qdisc configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBucket {
    pub rate: String,
    pub buffer: u32,
    pub limit: u32,
}

impl TokenBucket {
    /// A token bucket with the default buffer and limit.
    pub fn new(rate: impl Into<String>) -> Self {
        Self { rate: rate.into(), buffer: DEFAULT_BUFFER, limit: DEFAULT_LIMIT }
    }

    pub fn with_buffer(mut self, buffer: u32) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Renders the `tbf` options.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "rate".to_owned(),
            self.rate.trim().to_owned(),
            "buffer".to_owned(),
            self.buffer.to_string(),
            "limit".to_owned(),
            self.limit.to_string(),
        ]
    }
}
