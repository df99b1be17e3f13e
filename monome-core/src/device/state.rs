//! Connection lifecycle
//!
//! Whether the controller reads the line and transmits is a function of the
//! current state and an event, the same way for every connection.

/// Kind of control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Button + LED matrix
    Grid,
    /// Encoders + LED rings
    Arc,
}

/// Connection states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Fresh connection, nothing sent or configured
    #[default]
    Unconfigured,
    /// Device info requested, waiting for the reply
    Probing,
    /// Mode and size known; input is queued and LEDs are sent
    Configured(Mode),
    /// Transport failed; idle until probed or configured again
    Disconnected,
}

/// Events that move the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// Device info requested
    Probe,
    /// Mode set, by the application or by a device info reply
    Configure(Mode),
    /// Transport read or write failed
    TransportLost,
    /// New physical connection
    Reset,
}

impl LinkState {
    /// Check if the device counts as active
    pub fn is_active(&self) -> bool {
        matches!(self, LinkState::Configured(_))
    }

    /// Check if incoming bytes should be read and decoded
    pub fn reads_input(&self) -> bool {
        matches!(self, LinkState::Probing | LinkState::Configured(_))
    }

    /// Mode, once configured
    pub fn mode(&self) -> Option<Mode> {
        match self {
            LinkState::Configured(mode) => Some(*mode),
            _ => None,
        }
    }

    /// Process an event and return the next state
    ///
    /// A configured mode never changes to the other mode; that request is
    /// ignored here and reported by the controller.
    pub fn transition(self, event: LinkEvent) -> Self {
        use LinkEvent::*;
        use LinkState::*;

        match (self, event) {
            (_, Reset) => Unconfigured,
            (_, TransportLost) => Disconnected,

            (Unconfigured, Probe) => Probing,
            (Disconnected, Probe) => Probing,
            // Re-querying a configured device keeps it active
            (Configured(mode), Probe) => Configured(mode),

            (Unconfigured | Probing | Disconnected, Configure(mode)) => Configured(mode),
            (Configured(current), Configure(mode)) if current == mode => Configured(mode),

            // Default: stay in current state
            _ => self,
        }
    }
}
