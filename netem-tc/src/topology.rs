//! The queueing hierarchies we know how to install, and their compilation into `tc` commands.

use crate::{
    command::{Parent, Qdisc, Tc},
    filter::Subnet,
    handle::{
        FILTERED_NETEM, FILTERED_TBF, FILTERED_TBF_CLASS, NETEM_ROOT, NETEM_ROOT_CLASS,
        PRIO_FILTERED_BAND, PRIO_ROOT, TBF,
    },
    impairment::{Impairment, NetemOption},
    rate::TokenBucket,
    request::ValidationError,
    step::{Step, StepKind},
};

/// A validated hierarchy, ready to be compiled.
///
/// Use the constructors, which enforce each variant's requirements, or
/// [`Request::validate`](crate::Request::validate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topology {
    /// A single root netem qdisc.
    Plain { impairment: Impairment },
    /// A root netem qdisc feeding a token bucket.
    TokenBucket { bucket: TokenBucket, impairment: Impairment },
    /// A priority qdisc whose third band, selected by a destination filter, goes through a token
    /// bucket and, if there is any impairment, netem. Other traffic is untouched.
    Filtered { bucket: TokenBucket, destination: Subnet, impairment: Impairment },
}

impl Topology {
    pub fn plain(impairment: Impairment) -> Result<Self, ValidationError> {
        impairment.validate()?;
        if impairment.is_empty() {
            return Err(ValidationError::NoParameters);
        }

        Ok(Self::Plain { impairment })
    }

    pub fn token_bucket(bucket: TokenBucket, impairment: Impairment) -> Result<Self, ValidationError> {
        check_bucket(&bucket, &impairment)?;
        if impairment.is_empty() {
            return Err(ValidationError::TokenBucketWithoutImpairment);
        }

        Ok(Self::TokenBucket { bucket, impairment })
    }

    pub fn filtered(
        bucket: TokenBucket,
        destination: Subnet,
        impairment: Impairment,
    ) -> Result<Self, ValidationError> {
        check_bucket(&bucket, &impairment)?;

        Ok(Self::Filtered { bucket, destination, impairment })
    }

    /// Compiles the hierarchy into the ordered commands installing it on `dev`.
    ///
    /// The first command always deletes the current root qdisc; it fails on a device without
    /// one, which is tolerated.
    pub fn compile(&self, tc: &Tc, dev: &str) -> Vec<Step> {
        let mut steps = vec![Step::tolerant(StepKind::DeleteRoot, tc.qdisc_del_root(dev))];

        match self {
            Self::Plain { impairment } => {
                steps.push(Step::new(
                    StepKind::AddNetem,
                    tc.qdisc_add(dev, Parent::Root, None, Qdisc::Netem(impairment)),
                ));
            }
            Self::TokenBucket { bucket, impairment } => {
                steps.push(Step::new(
                    StepKind::AddNetem,
                    tc.qdisc_add(dev, Parent::Root, Some(NETEM_ROOT), Qdisc::Netem(impairment)),
                ));
                steps.push(Step::new(
                    StepKind::AddTbf,
                    tc.qdisc_add(dev, Parent::Class(NETEM_ROOT_CLASS), Some(TBF), Qdisc::Tbf(bucket)),
                ));
            }
            Self::Filtered { bucket, destination, impairment } => {
                steps.push(Step::new(
                    StepKind::AddPrio,
                    tc.qdisc_add(dev, Parent::Root, Some(PRIO_ROOT), Qdisc::Prio),
                ));
                steps.push(Step::new(
                    StepKind::AddTbf,
                    tc.qdisc_add(
                        dev,
                        Parent::Class(PRIO_FILTERED_BAND),
                        Some(FILTERED_TBF),
                        Qdisc::Tbf(bucket),
                    ),
                ));
                if !impairment.is_empty() {
                    steps.push(Step::new(
                        StepKind::AddNetem,
                        tc.qdisc_add(
                            dev,
                            Parent::Class(FILTERED_TBF_CLASS),
                            Some(FILTERED_NETEM),
                            Qdisc::Netem(impairment),
                        ),
                    ));
                }
                steps.push(Step::new(
                    StepKind::AddFilter,
                    tc.filter_add(dev, PRIO_ROOT, destination, PRIO_FILTERED_BAND),
                ));
            }
        }

        steps
    }
}

fn check_bucket(bucket: &TokenBucket, impairment: &Impairment) -> Result<(), ValidationError> {
    impairment.validate()?;
    if impairment.is_set(NetemOption::Rate) {
        return Err(ValidationError::ConflictingRates);
    }
    let rate = bucket.rate.trim();
    if rate.is_empty() {
        return Err(ValidationError::OptionsWithoutRate);
    }
    if rate.contains(char::is_whitespace) {
        return Err(ValidationError::MalformedValue { option: "rate", value: rate.to_owned() });
    }

    Ok(())
}
