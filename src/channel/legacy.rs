//! RF2820/2850/2720/2750: 32-bit RF words written through RF_CSR_CFG0

use embedded_hal::blocking::delay::DelayUs;

use crate::regs::rfcsr::*;
use crate::{RegisterBus, Rt2800, Rt2800Error};

use super::ChannelDescriptor;

/// Bit toggled on RF word 3 between the three programming passes
const RF3_PLL_LATCH: u32 = 0x0000_0004;

/// 5GHz TX power field of the legacy RF words.
///
/// Powers below 0 are raised by 7 (minimum -7), so values 0 to 7 have a double meaning
/// resolved by the 7dBm boost flag, set for non-negative powers.
pub(crate) fn a_band_power(power: i8) -> (bool, u32) {
    if power >= 0 {
        (true, power as u32)
    } else {
        (false, power.saturating_add(7).max(0) as u32)
    }
}

impl<B, D> Rt2800<B, D> where
    B: RegisterBus, D: DelayUs<u32>
{
    pub(super) fn config_channel_rf2xxx(&mut self, desc: &ChannelDescriptor) -> Result<(), Rt2800Error> {
        let mut rf = desc.rf;
        RF4_FREQ_OFFSET.set(&mut rf.rf4, self.freq_offset as u32);

        if self.tx_chain_num == 1 {
            RF2_ANTENNA_TX1.set(&mut rf.rf2, 1);
        }
        match self.rx_chain_num {
            1 => {
                RF2_ANTENNA_RX1.set(&mut rf.rf2, 1);
                RF2_ANTENNA_RX2.set(&mut rf.rf2, 1);
            }
            2 => RF2_ANTENNA_RX2.set(&mut rf.rf2, 1),
            _ => {}
        }

        if desc.bg() {
            RF3_TXPOWER_G.set(&mut rf.rf3, desc.default_power1 as u8 as u32);
            RF4_TXPOWER_G.set(&mut rf.rf4, desc.default_power2 as u8 as u32);
        } else {
            let (boost, power) = a_band_power(desc.default_power1);
            RF3_TXPOWER_A_7DBM_BOOST.set_bool(&mut rf.rf3, boost);
            RF3_TXPOWER_A.set(&mut rf.rf3, power);
            let (boost, power) = a_band_power(desc.default_power2);
            RF4_TXPOWER_A_7DBM_BOOST.set_bool(&mut rf.rf4, boost);
            RF4_TXPOWER_A.set(&mut rf.rf4, power);
        }
        RF4_HT40.set_bool(&mut rf.rf4, desc.ht40);

        // Latch low, high, low with 200us between passes
        for (pass, latch) in [false, true, false].into_iter().enumerate() {
            if pass > 0 {
                self.usleep(200);
            }
            let rf3 = if latch { rf.rf3 | RF3_PLL_LATCH } else { rf.rf3 & !RF3_PLL_LATCH };
            self.rf_write(1, rf.rf1)?;
            self.rf_write(2, rf.rf2)?;
            self.rf_write(3, rf3)?;
            self.rf_write(4, rf.rf4)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_boost() {
        assert_eq!(a_band_power(5), (true, 5));
        assert_eq!(a_band_power(0), (true, 0));
        assert_eq!(a_band_power(-3), (false, 4));
        assert_eq!(a_band_power(-7), (false, 0));
        assert_eq!(a_band_power(-20), (false, 0));
    }
}
