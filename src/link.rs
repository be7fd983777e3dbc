//! # Link quality tuner
//!
//! Adapts the receiver gain (VGC, BBP66) to the measured signal strength.
//! The default gain depends on the chip family, the band and the EEPROM LNA gain; strong signals
//! get a chip specific boost to trade sensitivity for noise isolation.
//! The VGC register is only written when the target level changes.
//!
//! ## Available Methods
//! - [`link_stats`](Rt2800::link_stats) - Read (and clear) the RX error counters
//! - [`reset_tuner`](Rt2800::reset_tuner) - Forget the link state and apply the default gain
//! - [`link_tuner`](Rt2800::link_tuner) - Apply the gain matching the measured RSSI

use embedded_hal::blocking::delay::DelayUs;

use crate::channel::Band;
use crate::chip::{ChipFamily, REV_RT2860C};
use crate::regs::mac::*;
use crate::{RegisterBus, Rt2800, Rt2800Error};

/// Link state owned by the tuner
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkQual {
    /// Averaged RSSI of the received frames (dBm), as provided to the last tuner call
    pub rssi: i8,
    /// VGC level last written to the baseband, 0 when none was applied since the reset
    pub vgc_level: u8,
    /// Frames received with a bad FCS
    pub rx_failed: u32,
    /// Frames dropped for a PHY error
    pub rx_phy_errors: u32,
}

/// Default VGC level
pub fn default_vgc(family: ChipFamily, band: Band, ht40: bool, lna_gain: u8) -> u8 {
    let lna = lna_gain as u16;
    let vgc = match band {
        Band::Bg => match family {
            ChipFamily::Rt3070 | ChipFamily::Rt3071 | ChipFamily::Rt3090 | ChipFamily::Rt3290 |
            ChipFamily::Rt3390 | ChipFamily::Rt3572 | ChipFamily::Rt3593 | ChipFamily::Rt5390 |
            ChipFamily::Rt5392 | ChipFamily::Rt5592 | ChipFamily::Rt6352 => 0x1c + 2 * lna,
            _ => 0x2e + lna,
        },
        Band::A => match family {
            ChipFamily::Rt3593 | ChipFamily::Rt3883 => 0x20 + lna * 5 / 3,
            ChipFamily::Rt5592 => 0x24 + 2 * lna,
            _ if ht40 => 0x3a + lna * 5 / 3,
            _ => 0x32 + lna * 5 / 3,
        },
    };
    vgc as u8
}

/// Gain boost applied on top of the default when the signal is strong
pub fn vgc_boost(family: ChipFamily, band: Band, rssi: i8) -> u8 {
    match family {
        ChipFamily::Rt3572 | ChipFamily::Rt3593 if rssi > -65 =>
            if band == Band::Bg { 0x20 } else { 0x10 },
        ChipFamily::Rt3572 | ChipFamily::Rt3593 => 0,
        ChipFamily::Rt3883 if rssi > -65 => 0x10,
        ChipFamily::Rt5592 if rssi > -65 => 0x20,
        ChipFamily::Rt3883 | ChipFamily::Rt5592 => 0,
        _ if rssi > -80 => 0x10,
        _ => 0,
    }
}

impl<B, D> Rt2800<B, D> where
    B: RegisterBus, D: DelayUs<u32>
{
    /// Current link state
    pub fn link_qual(&self) -> &LinkQual {
        &self.link
    }

    /// Update the error counters from the statistic registers (read to clear)
    pub fn link_stats(&mut self) -> Result<LinkQual, Rt2800Error> {
        let reg = self.read_reg(RX_STA_CNT0)?;
        self.link.rx_failed = RX_STA_CNT0_CRC_ERR.get(reg);
        self.link.rx_phy_errors = RX_STA_CNT0_PHY_ERR.get(reg);
        Ok(self.link)
    }

    /// Clear the link state and write the default VGC for the current channel
    pub fn reset_tuner(&mut self) -> Result<(), Rt2800Error> {
        self.link = LinkQual::default();
        let vgc = self.default_vgc();
        self.set_vgc(vgc)
    }

    /// Tune the receiver gain for the averaged RSSI of the last frames.
    ///
    /// Nothing is written when the resulting level matches the one already applied.
    pub fn link_tuner(&mut self, rssi: i8) -> Result<(), Rt2800Error> {
        if !self.config.link_tuning || self.chip.rev_eq(ChipFamily::Rt2860, REV_RT2860C) {
            return Ok(());
        }
        self.link.rssi = rssi;
        let vgc = self.default_vgc()
            .wrapping_add(vgc_boost(self.chip.family, self.channel.band, rssi));
        self.set_vgc(vgc)
    }

    fn default_vgc(&self) -> u8 {
        default_vgc(self.chip.family, self.channel.band, self.channel.ht40, self.lna_gain)
    }

    fn set_vgc(&mut self, vgc: u8) -> Result<(), Rt2800Error> {
        if self.link.vgc_level == vgc {
            return Ok(());
        }
        match self.chip.family {
            ChipFamily::Rt3572 | ChipFamily::Rt3593 | ChipFamily::Rt3883 =>
                self.bbp_write_with_rx_chain(66, vgc)?,
            ChipFamily::Rt5592 => {
                self.bbp_write(83, if self.link.rssi > -65 { 0x4a } else { 0x7a })?;
                self.bbp_write_with_rx_chain(66, vgc)?;
            }
            _ => self.bbp_write(66, vgc)?,
        }
        trace!("VGC {:#04x} -> {:#04x}", self.link.vgc_level, vgc);
        self.link.vgc_level = vgc;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_levels() {
        assert_eq!(default_vgc(ChipFamily::Rt3070, Band::Bg, false, 4), 0x24);
        assert_eq!(default_vgc(ChipFamily::Rt2860, Band::Bg, false, 4), 0x32);
        assert_eq!(default_vgc(ChipFamily::Rt3883, Band::A, false, 6), 0x2a);
        assert_eq!(default_vgc(ChipFamily::Rt5592, Band::A, true, 3), 0x2a);
        assert_eq!(default_vgc(ChipFamily::Rt2860, Band::A, false, 3), 0x37);
        assert_eq!(default_vgc(ChipFamily::Rt2860, Band::A, true, 3), 0x3f);
    }

    #[test]
    fn boost_thresholds() {
        assert_eq!(vgc_boost(ChipFamily::Rt3572, Band::Bg, -60), 0x20);
        assert_eq!(vgc_boost(ChipFamily::Rt3593, Band::A, -60), 0x10);
        assert_eq!(vgc_boost(ChipFamily::Rt3593, Band::A, -70), 0);
        assert_eq!(vgc_boost(ChipFamily::Rt5592, Band::Bg, -64), 0x20);
        assert_eq!(vgc_boost(ChipFamily::Rt5390, Band::Bg, -79), 0x10);
        assert_eq!(vgc_boost(ChipFamily::Rt5390, Band::Bg, -80), 0);
    }
}
