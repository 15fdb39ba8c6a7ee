use netem_channel::Channel;

use crate::{
    command::Tc,
    config::Options,
    filter::Subnet,
    impairment::Impairment,
    rate::TokenBucket,
    request::{check_device, Request},
    step::{self, Step},
    topology::Topology,
    Result,
};

/// Installs, lists and removes queueing hierarchies on network interfaces through a
/// [`Channel`].
///
/// The shaper holds no state besides its channel: the hierarchy lives in the kernel. Calls are
/// blocking and run their commands one at a time. Two callers working on the same interface at
/// the same time can interleave their commands; the last one to delete and re-create the root
/// qdisc wins.
///
/// # Example
///
/// ```
/// use netem_channel::DryRun;
/// use netem_tc::{Impairment, RateLimit, Request, Shaper};
///
/// let shaper = Shaper::new(DryRun::new());
/// let request = Request::new(
///     Impairment::default().with_loss("0.3%,25%"),
///     RateLimit::new("256kbit").with_destination("10.10.10.0/24"),
/// );
///
/// shaper.apply("eth0", &request).unwrap();
/// assert_eq!(shaper.channel().commands().len(), 5);
/// ```
#[derive(Debug)]
pub struct Shaper<C> {
    channel: C,
    tc: Tc,
}

impl<C: Channel> Shaper<C> {
    pub fn new(channel: C) -> Self {
        Self::with_options(channel, &Options::default())
    }

    pub fn with_options(channel: C, options: &Options) -> Self {
        Self { channel, tc: Tc::new(options.sudo) }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Deletes the root qdisc of `dev`, and with it the whole hierarchy.
    ///
    /// Fails on an interface without a hierarchy, every time.
    pub fn delete_root(&self, dev: &str) -> Result<String> {
        check_device(dev)?;
        tracing::debug!(dev, "deleting root qdisc");
        Ok(self.channel.execute(&self.tc.qdisc_del_root(dev))?)
    }

    /// Lists the qdiscs of `dev`, one per line, as reported by `tc`.
    pub fn list(&self, dev: &str) -> Result<String> {
        check_device(dev)?;
        Ok(self.channel.execute(&self.tc.qdisc_show(dev))?)
    }

    /// Installs a single root netem qdisc.
    pub fn apply_impairment(&self, dev: &str, impairment: &Impairment) -> Result<String> {
        self.install(dev, &Topology::plain(impairment.clone())?)
    }

    /// Installs a root netem qdisc feeding a token bucket. Requires at least one impairment.
    pub fn apply_token_bucket_only(
        &self,
        dev: &str,
        bucket: &TokenBucket,
        impairment: &Impairment,
    ) -> Result<String> {
        self.install(dev, &Topology::token_bucket(bucket.clone(), impairment.clone())?)
    }

    /// Limits, and optionally impairs, only the traffic sent to `destination`.
    pub fn apply_filtered_token_bucket(
        &self,
        dev: &str,
        bucket: &TokenBucket,
        destination: &Subnet,
        impairment: &Impairment,
    ) -> Result<String> {
        self.install(dev, &Topology::filtered(bucket.clone(), *destination, impairment.clone())?)
    }

    /// Validates the request and installs the hierarchy implementing it.
    pub fn apply(&self, dev: &str, request: &Request) -> Result<String> {
        check_device(dev)?;
        let topology = request.validate()?;
        self.install(dev, &topology)
    }

    /// Returns the commands that would install `topology` on `dev`.
    pub fn compile(&self, dev: &str, topology: &Topology) -> Vec<Step> {
        topology.compile(&self.tc, dev)
    }

    /// Installs `topology` on `dev`, replacing the current hierarchy.
    ///
    /// If a command fails the remaining ones are skipped and nothing is rolled back.
    pub fn install(&self, dev: &str, topology: &Topology) -> Result<String> {
        check_device(dev)?;
        let steps = self.compile(dev, topology);

        tracing::debug!(dev, ?topology, steps = steps.len(), "installing hierarchy");

        step::run(&self.channel, &steps)
    }
}
