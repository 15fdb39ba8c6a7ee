//! Link impairment parameters.
//!
//! An [`Impairment`] holds one optional value per option understood by the `netem` qdisc. Values
//! are kept as the caller wrote them (e.g. `"100ms,10ms,25%"`) and normalized only when rendered
//! into a command line. Blank values are the same as absent ones.

use std::{fmt, str::FromStr};

use crate::request::ValidationError;

/// The options of the `netem` qdisc we know how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetemOption {
    Delay,
    Distribution,
    Reorder,
    Loss,
    Duplicate,
    Corrupt,
    /// Rate limiting done by netem itself, as opposed to a token bucket.
    Rate,
    /// Maximum number of packets queued by netem.
    Limit,
}

impl NetemOption {
    /// Every option, in the order they are rendered.
    pub const ALL: [Self; 8] = [
        Self::Delay,
        Self::Distribution,
        Self::Reorder,
        Self::Loss,
        Self::Duplicate,
        Self::Corrupt,
        Self::Rate,
        Self::Limit,
    ];

    /// The keyword introducing the option on the `tc` command line.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Delay => "delay",
            Self::Distribution => "distribution",
            Self::Reorder => "reorder",
            Self::Loss => "loss",
            Self::Duplicate => "duplicate",
            Self::Corrupt => "corrupt",
            Self::Rate => "rate",
            Self::Limit => "limit",
        }
    }

    /// Options taking several space separated values (e.g. `delay 100ms 10ms 25%`).
    pub const fn is_list(self) -> bool {
        matches!(self, Self::Delay | Self::Reorder | Self::Loss)
    }
}

impl fmt::Display for NetemOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Delay distribution tables shipped with iproute2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Distribution {
    Normal,
    Pareto,
    ParetoNormal,
}

impl Distribution {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Pareto => "pareto",
            Self::ParetoNormal => "paretonormal",
        }
    }
}

impl FromStr for Distribution {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "pareto" => Ok(Self::Pareto),
            "paretonormal" => Ok(Self::ParetoNormal),
            other => Err(ValidationError::UnknownDistribution(other.to_owned())),
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splits a multi-valued parameter. Values can be separated by commas or semicolons, in their
/// ASCII or full-width form, or by whitespace.
pub fn split_values(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(|c: char| matches!(c, ',' | ';' | '，' | '；') || c.is_whitespace())
        .filter(|v| !v.is_empty())
}

/// Impairments to apply with netem.
///
/// # Example
///
/// ```
/// use netem_tc::Impairment;
///
/// let impairment = Impairment::default().with_delay("100ms,10ms,25%").with_distribution("normal");
///
/// assert_eq!(impairment.to_args(), ["delay", "100ms 10ms 25%", "distribution", "normal"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Impairment {
    /// Base delay, optionally followed by jitter and correlation.
    pub delay: Option<String>,
    /// Jitter distribution. Requires a delay with jitter.
    pub distribution: Option<String>,
    /// Reordering probability and correlation. Requires a delay.
    pub reorder: Option<String>,
    /// Loss probability and correlation.
    pub loss: Option<String>,
    pub duplicate: Option<String>,
    pub corrupt: Option<String>,
    /// Netem rate limit, e.g. `256kbit`.
    pub rate: Option<String>,
    /// Netem queue limit, in packets.
    pub limit: Option<u32>,
}

impl Impairment {
    pub fn with_delay(mut self, delay: impl Into<String>) -> Self {
        self.delay = Some(delay.into());
        self
    }

    pub fn with_distribution(mut self, distribution: impl Into<String>) -> Self {
        self.distribution = Some(distribution.into());
        self
    }

    pub fn with_reorder(mut self, reorder: impl Into<String>) -> Self {
        self.reorder = Some(reorder.into());
        self
    }

    pub fn with_loss(mut self, loss: impl Into<String>) -> Self {
        self.loss = Some(loss.into());
        self
    }

    pub fn with_duplicate(mut self, duplicate: impl Into<String>) -> Self {
        self.duplicate = Some(duplicate.into());
        self
    }

    pub fn with_corrupt(mut self, corrupt: impl Into<String>) -> Self {
        self.corrupt = Some(corrupt.into());
        self
    }

    pub fn with_rate(mut self, rate: impl Into<String>) -> Self {
        self.rate = Some(rate.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the raw value of the option, or `None` if it is absent or blank.
    ///
    /// [`NetemOption::Limit`] is numeric and has no raw value; use [`Impairment::value`].
    pub fn raw(&self, option: NetemOption) -> Option<&str> {
        let value = match option {
            NetemOption::Delay => &self.delay,
            NetemOption::Distribution => &self.distribution,
            NetemOption::Reorder => &self.reorder,
            NetemOption::Loss => &self.loss,
            NetemOption::Duplicate => &self.duplicate,
            NetemOption::Corrupt => &self.corrupt,
            NetemOption::Rate => &self.rate,
            NetemOption::Limit => return None,
        };

        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .filter(|v| !option.is_list() || split_values(v).next().is_some())
    }

    /// Returns `true` if the option is present and not blank.
    pub fn is_set(&self, option: NetemOption) -> bool {
        match option {
            NetemOption::Limit => self.limit.is_some(),
            _ => self.raw(option).is_some(),
        }
    }

    /// Returns the value of the option as it is rendered on the command line.
    pub fn value(&self, option: NetemOption) -> Option<String> {
        if option == NetemOption::Limit {
            return self.limit.map(|limit| limit.to_string());
        }

        let raw = self.raw(option)?;
        if option.is_list() {
            Some(split_values(raw).collect::<Vec<_>>().join(" "))
        } else {
            Some(raw.to_owned())
        }
    }

    /// Number of delay values (base delay, jitter, correlation).
    pub fn delay_values(&self) -> usize {
        self.raw(NetemOption::Delay).map_or(0, |delay| split_values(delay).count())
    }

    /// Returns `true` if no option is set.
    pub fn is_empty(&self) -> bool {
        !NetemOption::ALL.iter().any(|option| self.is_set(*option))
    }

    /// Iterates over the options that are set, with their rendered value.
    pub fn options(&self) -> impl Iterator<Item = (NetemOption, String)> + '_ {
        NetemOption::ALL.into_iter().filter_map(|option| Some((option, self.value(option)?)))
    }

    /// Renders the options as `keyword value` pairs, each option at most once.
    pub fn to_args(&self) -> Vec<String> {
        self.options().flat_map(|(option, value)| [option.keyword().to_owned(), value]).collect()
    }

    /// Checks the dependencies between options:
    ///
    /// 1. a distribution requires a delay,
    /// 2. with at least a jitter value,
    /// 3. and must be a known one;
    /// 4. reordering requires a delay.
    ///
    /// The first violated rule is reported. Values are then checked to render as their own
    /// option's arguments only, see [`ValidationError::MalformedValue`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let has_delay = self.is_set(NetemOption::Delay);

        if let Some(distribution) = self.raw(NetemOption::Distribution) {
            if !has_delay {
                return Err(ValidationError::DistributionWithoutDelay);
            }
            if self.delay_values() < 2 {
                return Err(ValidationError::DistributionWithoutJitter);
            }
            distribution.parse::<Distribution>()?;
        }

        if self.is_set(NetemOption::Reorder) && !has_delay {
            return Err(ValidationError::ReorderWithoutDelay);
        }

        for option in NetemOption::ALL {
            let Some(value) = self.raw(option) else { continue };

            let malformed = if option.is_list() {
                split_values(value).any(|piece| NetemOption::ALL.iter().any(|o| o.keyword() == piece))
            } else {
                value.contains(char::is_whitespace)
            };

            if malformed {
                return Err(ValidationError::MalformedValue {
                    option: option.keyword(),
                    value: value.to_owned(),
                });
            }
        }

        Ok(())
    }
}
