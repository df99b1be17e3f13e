//! Serial byte-transport abstractions
//!
//! Provides traits for the byte stream a monome device is attached to. The
//! host environment implements them on top of its USB CDC or UART driver.
//! Neither side may block: the control loop polls and refreshes on its own
//! schedule.

/// Serial transmitter
pub trait SerialTx {
    /// Error type for transmit operations
    type Error;

    /// Queue all of `data` for transmission
    ///
    /// Returns an error if the link is gone or the bytes could not be
    /// accepted in full.
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Serial receiver
pub trait SerialRx {
    /// Error type for receive operations
    type Error;

    /// Copy bytes that have already arrived into `buf`
    ///
    /// Returns the number of bytes copied, `Ok(0)` when nothing is pending.
    /// Must never wait for more data.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Combined serial interface
///
/// For transports that provide both directions on one connection.
pub trait Serial: SerialTx + SerialRx {}

// Blanket implementation
impl<T: SerialTx + SerialRx> Serial for T {}

/// Reason a transport reported a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Device unplugged or port closed
    Disconnected,
    /// Transmit buffer could not take the whole write
    Overrun,
}
