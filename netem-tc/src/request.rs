//! Requests and their validation.

use crate::{
    filter::Subnet,
    impairment::{Impairment, NetemOption},
    rate::RateLimit,
    topology::Topology,
};

/// A request violating the dependencies between parameters. Always reported before any command
/// is run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("cannot use distribution without delay")]
    DistributionWithoutDelay,
    #[error("distribution specified but no latency and jitter values")]
    DistributionWithoutJitter,
    #[error("distribution must be normal, pareto or paretonormal, got {0:?}")]
    UnknownDistribution(String),
    #[error("cannot use reorder without delay")]
    ReorderWithoutDelay,
    #[error("cannot use rate (token bucket) and netem rate together")]
    ConflictingRates,
    #[error("cannot use buffer, limit or destination without rate")]
    OptionsWithoutRate,
    #[error("invalid destination {0:?}, expected address[/prefix]")]
    InvalidDestination(String),
    #[error("must supply at least one parameter")]
    NoParameters,
    #[error("must use netem parameters, such as delay, loss, duplicate, corrupt")]
    TokenBucketWithoutImpairment,
    /// A value that would not render as the arguments of its own option: whitespace in a
    /// single-valued option, or another option's keyword in a list.
    #[error("malformed {option} value {value:?}")]
    MalformedValue { option: &'static str, value: String },
    #[error("invalid interface name {0:?}")]
    InvalidInterface(String),
}

/// Checks that `name` is passed to `tc` or `brctl` as exactly one device argument.
pub fn check_device(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(ValidationError::InvalidInterface(name.to_owned()));
    }

    Ok(())
}

/// Everything a caller can ask for on one interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub impairment: Impairment,
    pub rate_limit: RateLimit,
}

impl Request {
    pub fn new(impairment: Impairment, rate_limit: RateLimit) -> Self {
        Self { impairment, rate_limit }
    }

    /// Validates the request and picks the hierarchy implementing it.
    ///
    /// Rules are checked in this order, the first violation is reported:
    ///
    /// 1. a distribution requires a delay,
    /// 2. with a jitter,
    /// 3. and must be `normal`, `pareto` or `paretonormal`;
    /// 4. reordering requires a delay;
    /// 5. a token bucket rate excludes the netem rate;
    /// 6. buffer, limit and destination require a token bucket rate;
    /// 7. the destination must be a valid CIDR;
    /// 8. at least one parameter must be set.
    ///
    /// Without a rate the result is [`Topology::Plain`], with a rate and a destination
    /// [`Topology::Filtered`] and otherwise [`Topology::TokenBucket`], which requires at least one
    /// impairment.
    pub fn validate(&self) -> Result<Topology, ValidationError> {
        let Self { impairment, rate_limit } = self;

        impairment.validate()?;

        if rate_limit.rate().is_some() && impairment.is_set(NetemOption::Rate) {
            return Err(ValidationError::ConflictingRates);
        }

        let Some(bucket) = rate_limit.token_bucket() else {
            if rate_limit.has_rate_options() {
                return Err(ValidationError::OptionsWithoutRate);
            }

            return Topology::plain(impairment.clone());
        };

        match rate_limit.destination() {
            Some(destination) => {
                let destination = destination.parse::<Subnet>()?;
                Topology::filtered(bucket, destination, impairment.clone())
            }
            None => Topology::token_bucket(bucket, impairment.clone()),
        }
    }
}
