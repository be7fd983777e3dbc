//! RFCSR based synthesizers of the RT30xx/RT35xx/RT38xx generation

use embedded_hal::blocking::delay::DelayUs;

use crate::chip::ChipFamily;
use crate::regs::bbp::*;
use crate::regs::mac::*;
use crate::regs::rfcsr::*;
use crate::{RegisterBus, Rt2800, Rt2800Error};

use super::{enable_chains, ChannelDescriptor};

/// Upper bound of the RFCSR49/50 TX power field on 2.4GHz
pub(crate) const POWER_BOUND: u8 = 0x27;
/// Upper bound of the RFCSR49/50 TX power field on 5GHz
pub(crate) const POWER_BOUND_5G: u8 = 0x2b;

/// Split a 5-bit power into the 5GHz layout of RFCSR53-55: bits 3-4 move up by one
pub(crate) fn pack_power_5g(power: u8) -> u8 {
    ((power & 0x18) << 1) | (power & 0x07)
}

/// RF3052 5GHz power layout of RFCSR12/13: bits 2-3 move up by one
fn pack_power_3052(power: u8) -> u8 {
    (power & 0x03) | ((power & 0x0c) << 1)
}

impl<B, D> Rt2800<B, D> where
    B: RegisterBus, D: DelayUs<u32>
{
    pub(super) fn config_channel_rf3xxx(&mut self, desc: &ChannelDescriptor) -> Result<(), Rt2800Error> {
        let rf = desc.rf;
        let (tx, rx) = (self.tx_chain_num, self.rx_chain_num);

        self.rfcsr_write(2, rf.rf1 as u8)?;
        self.rfcsr_write_field(3, RFCSR3_K, rf.rf3 as u8)?;
        self.rfcsr_write_field(6, RFCSR6_R1, rf.rf2 as u8)?;
        self.rfcsr_write_field(12, RFCSR12_TX_POWER, desc.default_power1 as u8)?;
        self.rfcsr_write_field(13, RFCSR13_TX_POWER, desc.default_power2 as u8)?;

        self.rfcsr_modify(1, |r| {
            RFCSR1_RX0_PD.set(r, 0);
            RFCSR1_RX1_PD.set_bool(r, rx <= 1);
            RFCSR1_RX2_PD.set_bool(r, rx <= 2);
            RFCSR1_TX0_PD.set(r, 0);
            RFCSR1_TX1_PD.set_bool(r, tx <= 1);
            RFCSR1_TX2_PD.set_bool(r, tx <= 2);
        })?;

        self.rfcsr_write_field(23, RFCSR23_FREQ_OFFSET, self.freq_offset)?;

        let (calib_tx, calib_rx) = if self.chip.is(ChipFamily::Rt3390) {
            if desc.ht40 { (0x68, 0x6f) } else { (0x4f, 0x4f) }
        } else {
            let calib = self.calib.rx_filter(desc.ht40);
            (calib, calib)
        };
        self.rfcsr_write_field(24, RFCSR24_TX_CALIB, calib_tx)?;
        self.rfcsr_write_field(31, RFCSR31_RX_CALIB, calib_rx)?;

        self.rfcsr_write_field(7, RFCSR7_RF_TUNING, 1)?;

        let mut rfcsr = self.rfcsr_modify(30, |r| RFCSR30_RF_CALIBRATION.set(r, 1))?;
        self.msleep(1);
        RFCSR30_RF_CALIBRATION.set(&mut rfcsr, 0);
        self.rfcsr_write(30, rfcsr)
    }

    pub(super) fn config_channel_rf3052(&mut self, desc: &ChannelDescriptor) -> Result<(), Rt2800Error> {
        let rf = desc.rf;
        let bg = desc.bg();
        let (tx, rx) = (self.tx_chain_num, self.rx_chain_num);
        let bt_coexist = self.chip.caps.has_bt_coexist();

        self.restore_bbp25_26(bg)?;

        self.rfcsr_write(2, rf.rf1 as u8)?;
        self.rfcsr_write(3, rf.rf3 as u8)?;

        self.rfcsr_modify(6, |r| {
            RFCSR6_R1.set(r, rf.rf2 as u8);
            RFCSR6_TXDIV.set(r, if bg { 2 } else { 1 });
        })?;
        self.rfcsr_write_field(5, RFCSR5_R1, if bg { 1 } else { 2 })?;

        let (dr0, power1, power2) = if bg {
            (3, desc.default_power1 as u8, desc.default_power2 as u8)
        } else {
            (7, pack_power_3052(desc.default_power1 as u8), pack_power_3052(desc.default_power2 as u8))
        };
        self.rfcsr_modify(12, |r| {
            RFCSR12_DR0.set(r, dr0);
            RFCSR12_TX_POWER.set(r, power1);
        })?;
        self.rfcsr_modify(13, |r| {
            RFCSR13_DR0.set(r, dr0);
            RFCSR13_TX_POWER.set(r, power2);
        })?;

        self.rfcsr_modify(1, |r| {
            enable_chains(r, 0, 0);
            if bt_coexist {
                if bg {
                    RFCSR1_RX0_PD.set(r, 1);
                    RFCSR1_TX0_PD.set(r, 1);
                }
                RFCSR1_RX2_PD.set(r, 1);
                RFCSR1_TX2_PD.set(r, 1);
            } else {
                // Power down bits here mark the unused chains
                RFCSR1_TX1_PD.set_bool(r, tx == 1);
                RFCSR1_TX2_PD.set_bool(r, tx == 1 || tx == 2);
                RFCSR1_RX1_PD.set_bool(r, rx == 1);
                RFCSR1_RX2_PD.set_bool(r, rx == 1 || rx == 2);
            }
        })?;

        self.rfcsr_write_field(23, RFCSR23_FREQ_OFFSET, self.freq_offset)?;

        let calib = self.calib.rx_filter(desc.ht40);
        self.rfcsr_write(24, calib)?;
        self.rfcsr_write(31, calib)?;

        if bg {
            let mixer = RFCSR16_TXMIXER_GAIN.with(0x4c, self.calib.txmixer_gain_24g);
            self.rfcsr_write_table(&[
                (7, 0xd8), (9, 0xc3), (10, 0xf1), (11, 0xb9), (15, 0x53), (16, mixer),
                (17, 0x23), (19, 0x93), (20, 0xb3), (25, 0x15), (26, 0x85), (27, 0x00),
                (29, 0x9b),
            ])?;
        } else {
            self.rfcsr_modify(7, |r| {
                RFCSR7_BIT2.set(r, 1);
                RFCSR7_BIT3.set(r, 0);
                RFCSR7_BIT4.set(r, 1);
                RFCSR7_BITS67.set(r, 0);
            })?;
            let mixer = RFCSR16_TXMIXER_GAIN.with(0x7a, self.calib.txmixer_gain_5g);
            self.rfcsr_write_table(&[
                (9, 0xc0), (10, 0xf1), (11, 0x00), (15, 0x43), (16, mixer), (17, 0x23),
            ])?;
            let (r19, r20, r25) = match desc.channel {
                0..=64 => (0xb7, 0xf6, 0x3d),
                65..=128 => (0x74, 0xf4, 0x01),
                _ => (0x72, 0xf3, 0x01),
            };
            self.rfcsr_write_table(&[(19, r19), (20, r20), (25, r25), (26, 0x87), (27, 0x01), (29, 0x9f)])?;
        }

        self.modify_reg(GPIO_CTRL, |reg| {
            GPIO_CTRL_DIR7.set(reg, 0);
            GPIO_CTRL_VAL7.set_bool(reg, bg);
        })?;

        self.rfcsr_write_field(7, RFCSR7_RF_TUNING, 1)
    }

    pub(super) fn config_channel_rf3053(&mut self, desc: &ChannelDescriptor) -> Result<(), Rt2800Error> {
        let rf = desc.rf;
        let bg = desc.bg();
        let usb = self.chip.bus.is_usb();

        // Fine power control left at 0
        self.bbp_modify(109, |r| {
            BBP109_TX0_POWER.set(r, 0);
            BBP109_TX1_POWER.set(r, 0);
        })?;
        self.bbp_write_field(110, BBP110_TX2_POWER, 0)?;

        self.restore_bbp25_26(bg)?;

        self.rfcsr_write(8, rf.rf1 as u8)?;
        self.rfcsr_write(9, (rf.rf3 & 0xf) as u8)?;
        self.rfcsr_modify(11, |r| {
            RFCSR11_R.set(r, (rf.rf2 & 0x3) as u8);
            RFCSR11_PLL_IDOH.set(r, 1);
            RFCSR11_PLL_MOD.set(r, if bg { 1 } else { 2 });
        })?;

        for (word, power) in [(53, desc.default_power1), (55, desc.default_power2), (54, desc.default_power3)] {
            let power = power as u8;
            let value = if bg {
                RFCSR53_TX_POWER.with(0, power & 0x1f)
            } else {
                let base = if usb { 0x40 } else { self.rfcsr_read(word)? };
                RFCSR53_TX_POWER.with(base, pack_power_5g(power))
            };
            self.rfcsr_write(word, value)?;
        }

        let (tx, rx) = (self.tx_chain_num, self.rx_chain_num);
        self.rfcsr_modify(1, |r| {
            enable_chains(r, tx, rx);
            RFCSR1_RF_BLOCK_EN.set(r, 1);
            RFCSR1_PLL_PD.set(r, 1);
        })?;

        self.freq_cal_mode1()?;

        let calib = self.calib.rx_filter(desc.ht40);
        let h20m = RFCSR24_TX_H20M.get(calib);

        self.rfcsr_write(31, if bg { 0xa0 } else { 0x80 })?;
        self.rfcsr_modify(30, |r| {
            RFCSR30_TX_H20M.set(r, h20m);
            RFCSR30_RX_H20M.set(r, h20m);
        })?;

        self.rfcsr_write_field(36, RFCSR36_RF_BS, bg as u8)?;
        self.rfcsr_write(34, if bg { 0x3c } else { 0x20 })?;
        self.rfcsr_write(12, if bg { 0x1a } else { 0x12 })?;

        let vco_ic = match desc.channel {
            36..=64 | 100..=128 => 2,
            _ => 1,
        };
        self.rfcsr_write_field(6, RFCSR6_VCO_IC, vco_ic)?;
        self.rfcsr_write_field(30, RFCSR30_RX_VCM, 2)?;
        self.rfcsr_write(46, 0x60)?;

        if bg {
            self.rfcsr_write(10, 0xd3)?;
            self.rfcsr_write(13, 0x12)?;
        } else {
            self.rfcsr_write(10, 0xd8)?;
            self.rfcsr_write(13, 0x23)?;
        }

        self.rfcsr_write_field(51, RFCSR51_BITS01, 1)?;
        self.rfcsr_modify(51, |r| {
            RFCSR51_BITS24.set(r, if bg { 5 } else { 4 });
            RFCSR51_BITS57.set(r, if bg { 3 } else { 2 });
        })?;
        self.rfcsr_write_field(49, RFCSR49_TX_LO1_IC, if bg { 3 } else { 2 })?;
        self.rfcsr_write_field(50, RFCSR50_TX_LO1_EN, 0)?;
        self.rfcsr_write_field(57, RFCSR57_DRV_CC, if bg { 0x1b } else { 0x0f })?;

        if bg {
            self.rfcsr_write(44, 0x93)?;
            self.rfcsr_write(52, 0x45)?;
        } else {
            self.rfcsr_write(44, 0x9b)?;
            self.rfcsr_write(52, 0x05)?;
        }

        self.rfcsr_modify(3, |r| {
            if !bg {
                for bit in [RFCSR3_BIT1, RFCSR3_BIT2, RFCSR3_BIT3, RFCSR3_BIT4, RFCSR3_BIT5] {
                    bit.set(r, 1);
                }
            }
            RFCSR3_VCOCAL_EN.set(r, 1);
        })?;

        let (r39, r45) = match desc.channel {
            1..=14 => (0x23, 0xbb),
            36..=64 => (0x36, 0xeb),
            100..=128 => (0x32, 0xb3),
            _ => (0x30, 0x9b),
        };
        self.rfcsr_write(39, r39)?;
        self.rfcsr_write(45, r45)
    }

    pub(super) fn config_channel_rf3853(&mut self, desc: &ChannelDescriptor) -> Result<(), Rt2800Error> {
        let rf = desc.rf;
        let bg = desc.bg();
        let ch = desc.channel;

        self.rfcsr_write(6, if !bg && ch < 132 { 0x80 } else { 0x40 })?;
        self.rfcsr_write(8, rf.rf1 as u8)?;
        self.rfcsr_write(9, rf.rf3 as u8)?;
        self.rfcsr_write(11, if bg { 0x46 } else { 0x48 })?;
        self.rfcsr_write(12, if bg { 0x1a } else { 0x52 })?;
        self.rfcsr_write(13, 0x12)?;

        let (tx, rx) = (self.tx_chain_num, self.rx_chain_num);
        self.rfcsr_modify(1, |r| {
            enable_chains(r, tx, rx);
            RFCSR1_RF_BLOCK_EN.set(r, 1);
            RFCSR1_PLL_PD.set(r, 1);
        })?;

        self.freq_cal_mode1()?;

        self.rfcsr_modify(30, |r| {
            if desc.ht40 { *r |= 0x06 } else { *r &= !0x06 }
        })?;
        self.rfcsr_write(31, if bg { 0xa0 } else { 0x80 })?;
        self.rfcsr_write(32, if desc.ht40 { 0x80 } else { 0xd8 })?;
        self.rfcsr_write(34, if bg { 0x3c } else { 0x20 })?;
        // Loopback band select
        self.rfcsr_write_field(36, RFCSR36_RF_BS, bg as u8)?;

        let (r39, r45) = match ch {
            0..=14 => (0x23, 0xbb),
            15..=99 => (0x36, 0xeb),
            100..=131 => (0x32, 0xb3),
            _ => (0x30, 0x9b),
        };
        self.rfcsr_write(39, r39)?;
        self.rfcsr_write(44, if bg { 0x93 } else { 0x9b })?;
        self.rfcsr_write(45, r45)?;
        self.rfcsr_write(49, if bg { 0x8e } else { 0x8a })?;
        self.rfcsr_write(50, 0x86)?;
        self.rfcsr_write(51, if bg { 0x75 } else { 0x51 })?;
        self.rfcsr_write(52, if bg { 0x45 } else { 0x05 })?;

        let powers = [desc.default_power1 as u8, desc.default_power2 as u8, desc.default_power3 as u8];
        for (word, power) in [53, 54, 55].into_iter().zip(powers) {
            let value = if bg { power & 0x1f } else { 0x48 | pack_power_5g(power) };
            self.rfcsr_write(word, value)?;
        }
        trace!("Channel {} power {:02x} {:02x} {:02x}", ch, powers[0], powers[1], powers[2]);

        // Bits 5-7 of each power go to the baseband fine power registers
        self.bbp_write(109, (powers[0] >> 5) | ((powers[1] & 0xe0) >> 1))?;
        self.bbp_modify(110, |r| *r = (*r & 0x0f) | ((powers[2] & 0xe0) >> 1))?;

        self.rfcsr_write(57, if bg { 0x6e } else { 0x3e })?;

        self.rfcsr_write_field(3, RFCSR3_VCOCAL_EN, 1)?;
        self.msleep(2);

        // Pulse the update flag
        let bbp = self.bbp_read(49)?;
        self.bbp_write(49, bbp & 0xfe)?;
        self.bbp_write(49, bbp)
    }

    pub(super) fn config_channel_rf3290(&mut self, desc: &ChannelDescriptor) -> Result<(), Rt2800Error> {
        let rf = desc.rf;
        self.rfcsr_write(8, rf.rf1 as u8)?;
        self.rfcsr_write(9, rf.rf3 as u8)?;
        self.rfcsr_write_field(11, RFCSR11_R, rf.rf2 as u8)?;
        self.rfcsr_write_field(49, RFCSR49_TX, bounded_power(desc.default_power1, POWER_BOUND))?;

        self.freq_cal_mode1()?;

        if desc.bg() {
            self.bbp_write(68, if desc.channel == 6 { 0x0c } else { 0x0b })?;
            match desc.channel {
                1..=6 => self.bbp_write(59, 0x0f)?,
                7..=11 => self.bbp_write(59, 0x0e)?,
                12..=14 => self.bbp_write(59, 0x0d)?,
                _ => {}
            }
        }
        Ok(())
    }

    pub(super) fn config_channel_rf3322(&mut self, desc: &ChannelDescriptor) -> Result<(), Rt2800Error> {
        let rf = desc.rf;
        self.rfcsr_write(8, rf.rf1 as u8)?;
        self.rfcsr_write(9, rf.rf3 as u8)?;
        self.rfcsr_write_table(&[(11, 0x42), (12, 0x1c), (13, 0x00)])?;
        self.rfcsr_write(47, bounded_power(desc.default_power1, POWER_BOUND))?;
        self.rfcsr_write(48, bounded_power(desc.default_power2, POWER_BOUND))?;

        self.freq_cal_mode1()?;

        let (tx, rx) = (self.tx_chain_num, self.rx_chain_num);
        self.rfcsr_modify(1, |r| {
            RFCSR1_RX0_PD.set(r, 1);
            RFCSR1_TX0_PD.set(r, 1);
            RFCSR1_TX1_PD.set_bool(r, tx == 2);
            RFCSR1_RX1_PD.set_bool(r, rx == 2);
            RFCSR1_RX2_PD.set(r, 0);
            RFCSR1_TX2_PD.set(r, 0);
        })?;

        self.rfcsr_write(31, 80)
    }

    /// BBP25/26 hold the IQ phase correction: calibration snapshot on 2.4GHz, fixed on 5GHz
    fn restore_bbp25_26(&mut self, bg: bool) -> Result<(), Rt2800Error> {
        if bg {
            self.bbp_write(25, self.calib.bbp25)?;
            self.bbp_write(26, self.calib.bbp26)
        } else {
            self.bbp_write(25, 0x09)?;
            self.bbp_write(26, 0xff)
        }
    }
}

/// Default power limited to `bound`. Negative powers are passed through as their raw byte.
pub(crate) fn bounded_power(power: i8, bound: u8) -> u8 {
    if power > bound as i8 { bound } else { power as u8 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_layouts() {
        assert_eq!(pack_power_5g(0x1f), 0x37);
        assert_eq!(pack_power_5g(0x08), 0x10);
        assert_eq!(pack_power_3052(0x0f), 0x1b);
    }

    #[test]
    fn power_bound() {
        assert_eq!(bounded_power(0x10, POWER_BOUND), 0x10);
        assert_eq!(bounded_power(0x30, POWER_BOUND), POWER_BOUND);
        assert_eq!(bounded_power(0x30, POWER_BOUND_5G), 0x2b);
        assert_eq!(bounded_power(-1, POWER_BOUND), 0xff);
    }
}
