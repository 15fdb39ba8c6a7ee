/// The name of the bridge device managed by [`Bridge`](crate::Bridge).
///
/// NOTE: device names can be at most 15 characters long.
pub const DEFAULT_BRIDGE_NAME: &str = "netem-br0";

/// Options shared by the [`Shaper`](crate::Shaper) and the [`Bridge`](crate::Bridge).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Prefix every command with `sudo`. Default is `true`.
    pub sudo: bool,
    /// The bridge device to manage. Default is [`DEFAULT_BRIDGE_NAME`].
    pub bridge_name: String,
}

impl Options {
    pub fn with_sudo(mut self, sudo: bool) -> Self {
        self.sudo = sudo;
        self
    }

    pub fn with_bridge_name(mut self, name: impl Into<String>) -> Self {
        self.bridge_name = name.into();
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self { sudo: true, bridge_name: DEFAULT_BRIDGE_NAME.to_owned() }
    }
}
