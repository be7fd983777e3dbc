//! Device configuration.
//!
//! Retry budgets and delays used by every polling loop of the driver.
//! The defaults follow the timings of the hardware reference driver; tests
//! typically shrink the delays to zero and the budgets to a few attempts.

use embassy_time::Duration;

/// Driver configuration, passed at construction
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Number of attempts when polling a busy bit (indirect banks, MCU mailbox, DMA idle, ...)
    pub busy_count: u32,
    /// Delay between two polling attempts on an indirect bank
    pub busy_delay: Duration,
    /// Delay between two attempts while waiting for the CSR bus to answer
    pub csr_ready_delay: Duration,
    /// Delay between two attempts while waiting for the DMA engine to become idle
    pub wpdma_delay: Duration,
    /// Number of full power-up retries before the RT3290 wake sequence gives up
    pub wlan_enable_retries: u32,
    /// Enable the adaptive VGC tuner
    pub link_tuning: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            busy_count: 100,
            busy_delay: Duration::from_micros(100),
            csr_ready_delay: Duration::from_micros(1),
            wpdma_delay: Duration::from_micros(10),
            wlan_enable_retries: 10,
            link_tuning: true,
        }
    }
}

impl Config {
    /// Configuration without any sleep between polling attempts
    pub fn no_delay() -> Self {
        Self {
            busy_delay: Duration::from_ticks(0),
            csr_ready_delay: Duration::from_ticks(0),
            wpdma_delay: Duration::from_ticks(0),
            ..Self::default()
        }
    }

    /// Set the polling budget
    pub const fn with_busy_count(mut self, busy_count: u32) -> Self {
        self.busy_count = busy_count;
        self
    }

    /// Set the delay between polling attempts on indirect banks
    pub const fn with_busy_delay(mut self, busy_delay: Duration) -> Self {
        self.busy_delay = busy_delay;
        self
    }

    /// Set the RT3290 wake retry budget
    pub const fn with_wlan_enable_retries(mut self, retries: u32) -> Self {
        self.wlan_enable_retries = retries;
        self
    }

    /// Enable or disable the link tuner
    pub const fn with_link_tuning(mut self, en: bool) -> Self {
        self.link_tuning = en;
        self
    }
}
