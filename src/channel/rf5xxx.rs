//! RF3070/RF53xx, RF5592 and the MT7620 integrated RF

use embedded_hal::blocking::delay::DelayUs;

use crate::chip::{ChipFamily, REV_RT5390F};
use crate::regs::mac::*;
use crate::regs::rfcsr::*;
use crate::{RegisterBus, Rt2800, Rt2800Error};

use super::rf3xxx::{bounded_power, POWER_BOUND, POWER_BOUND_5G};
use super::ChannelDescriptor;

/// RFCSR55/59 values for channels 1 to 14
mod rt53xx {
    pub const R55_BT_REV: [u8; 14] = [
        0x83, 0x83, 0x83, 0x73, 0x73, 0x63, 0x53, 0x53, 0x53, 0x43, 0x43, 0x43, 0x43, 0x43,
    ];
    pub const R59_BT_REV: [u8; 14] = [
        0x0e, 0x0e, 0x0e, 0x0e, 0x0e, 0x0b, 0x0a, 0x09, 0x07, 0x07, 0x07, 0x07, 0x07, 0x07,
    ];
    pub const R59_BT: [u8; 14] = [
        0x8b, 0x8b, 0x8b, 0x8b, 0x8b, 0x8b, 0x8b, 0x8a, 0x89, 0x88, 0x88, 0x86, 0x85, 0x84,
    ];
    pub const R55_NONBT_REV: [u8; 14] = [
        0x23, 0x23, 0x23, 0x23, 0x13, 0x13, 0x03, 0x03, 0x03, 0x03, 0x03, 0x03, 0x03, 0x03,
    ];
    pub const R59_NONBT_REV: [u8; 14] = [
        0x07, 0x07, 0x07, 0x07, 0x07, 0x07, 0x07, 0x07, 0x07, 0x07, 0x06, 0x05, 0x04, 0x04,
    ];
    pub const R59_NONBT: [u8; 14] = [
        0x8f, 0x8f, 0x8f, 0x8f, 0x8f, 0x8f, 0x8f, 0x8d, 0x8a, 0x88, 0x88, 0x87, 0x87, 0x86,
    ];
    pub const R59_NONBT_5350: [u8; 14] = [
        0x0b, 0x0b, 0x0b, 0x0b, 0x0b, 0x0b, 0x0b, 0x0a, 0x0a, 0x09, 0x08, 0x07, 0x07, 0x06,
    ];
}

/// 2.4GHz OFDM register set of the RF5592
const RF5592_BG: &[(u16, u8)] = &[
    (10, 0x90), (11, 0x4a), (12, 0x52), (13, 0x42), (22, 0x40), (24, 0x4a), (25, 0x80),
    (27, 0x42), (36, 0x80), (37, 0x08), (38, 0x89), (39, 0x1b), (40, 0x0d), (41, 0x9b),
    (42, 0xd5), (43, 0x72), (44, 0x0e), (45, 0xa2), (46, 0x6b), (48, 0x10), (51, 0x3e),
    (52, 0x48), (54, 0x38), (56, 0xa1), (57, 0x00), (58, 0x39), (60, 0x45), (61, 0x91),
    (62, 0x39),
];

/// 5GHz register set of the RF5592 shared by all sub-bands
const RF5592_A: &[(u16, u8)] = &[
    (10, 0x97), (11, 0x40), (25, 0xbf), (27, 0x42), (36, 0x00), (37, 0x04), (38, 0x85),
    (40, 0x42), (41, 0xbb), (42, 0xd7), (45, 0x41), (48, 0x00), (57, 0x77), (60, 0x05),
    (61, 0x01),
];

/// RF5592 low 5GHz sub-band (channels 36 to 64)
const RF5592_A_LOW: &[(u16, u8)] = &[
    (12, 0x2e), (13, 0x22), (22, 0x60), (23, 0x7f), (39, 0x1c), (43, 0x5b), (44, 0x40),
    (46, 0x00), (51, 0xfe), (52, 0x0c), (54, 0xf8), (58, 0x15), (59, 0x7f), (62, 0x15),
];

/// RF5592 registers of the high 5GHz sub-band (channels 100 to 165), by channel threshold
fn rf5592_a_high(channel: u8) -> [(u16, u8); 14] {
    let upper = |split: u8, low: u8, high: u8| if channel <= split { low } else { high };
    [
        (12, 0x0e),
        (13, 0x42),
        (22, 0x40),
        (23, upper(153, 0x3c, 0x38)),
        (24, upper(153, 0x06, 0x05)),
        (39, upper(138, 0x1a, 0x18)),
        (43, upper(138, 0x3b, 0x1b)),
        (44, upper(138, 0x20, 0x10)),
        (46, upper(138, 0x18, 0x08)),
        (51, upper(124, 0xfc, 0xec)),
        (52, 0x06),
        (54, 0xeb),
        (55, upper(138, 0x01, 0x00)),
        (56, upper(128, 0xbb, 0xab)),
    ]
}

/// RF5592 baseband AGC and GLRT values: (2.4GHz, 5GHz)
const RF5592_BBP: [(u8, u8, u8); 4] = [(79, 0x1c, 0x18), (80, 0x0e, 0x08), (81, 0x3a, 0x38), (82, 0x62, 0x92)];
const RF5592_GLRT: [(u8, u8, u8); 6] = [
    (128, 0xe0, 0xf0), (129, 0x1f, 0x1e), (130, 0x38, 0x28),
    (131, 0x32, 0x20), (133, 0x28, 0x7f), (124, 0x19, 0x7f),
];

/// MT7620 RX/TX filter registers updated with the calibrated AGC code: (bank, reg)
const RF7620_RX_AGC_REGS: [(u8, u8); 4] = [(5, 6), (5, 7), (7, 6), (7, 7)];
const RF7620_TX_AGC_REGS: [(u8, u8); 4] = [(5, 58), (5, 59), (7, 58), (7, 59)];

impl<B, D> Rt2800<B, D> where
    B: RegisterBus, D: DelayUs<u32>
{
    pub(super) fn config_channel_rf53xx(&mut self, desc: &ChannelDescriptor) -> Result<(), Rt2800Error> {
        let rf = desc.rf;
        let rt5392 = self.chip.is(ChipFamily::Rt5392);

        self.rfcsr_write(8, rf.rf1 as u8)?;
        self.rfcsr_write(9, rf.rf3 as u8)?;
        self.rfcsr_write_field(11, RFCSR11_R, rf.rf2 as u8)?;
        self.rfcsr_write_field(49, RFCSR49_TX, bounded_power(desc.default_power1, POWER_BOUND))?;
        if rt5392 {
            self.rfcsr_write_field(50, RFCSR50_TX, bounded_power(desc.default_power2, POWER_BOUND))?;
        }

        self.rfcsr_modify(1, |r| {
            if rt5392 {
                RFCSR1_RX1_PD.set(r, 1);
                RFCSR1_TX1_PD.set(r, 1);
            }
            RFCSR1_RF_BLOCK_EN.set(r, 1);
            RFCSR1_PLL_PD.set(r, 1);
            RFCSR1_RX0_PD.set(r, 1);
            RFCSR1_TX0_PD.set(r, 1);
        })?;

        self.freq_cal_mode1()?;

        let Some(idx) = (desc.channel as usize).checked_sub(1).filter(|i| *i < 14) else {
            return Ok(());
        };
        let rev_f = self.chip.rev_gte(ChipFamily::Rt5390, REV_RT5390F);
        if self.chip.caps.has_bt_coexist() {
            if rev_f {
                self.rfcsr_write(55, rt53xx::R55_BT_REV[idx])?;
                self.rfcsr_write(59, rt53xx::R59_BT_REV[idx])?;
            } else {
                self.rfcsr_write(59, rt53xx::R59_BT[idx])?;
            }
        } else if rev_f {
            self.rfcsr_write(55, rt53xx::R55_NONBT_REV[idx])?;
            self.rfcsr_write(59, rt53xx::R59_NONBT_REV[idx])?;
        } else {
            match self.chip.family {
                ChipFamily::Rt5390 | ChipFamily::Rt5392 | ChipFamily::Rt6352 =>
                    self.rfcsr_write(59, rt53xx::R59_NONBT[idx])?,
                ChipFamily::Rt5350 =>
                    self.rfcsr_write(59, rt53xx::R59_NONBT_5350[idx])?,
                _ => {}
            }
        }
        Ok(())
    }

    /// RF5592, OFDM only: CCK and the external PA variant are not used in receive-only operation
    pub(super) fn config_channel_rf55xx(&mut self, desc: &ChannelDescriptor) -> Result<(), Rt2800Error> {
        let rf = desc.rf;
        let bg = desc.bg();
        let ch = desc.channel;
        info!("RF5592 configure channel {}", ch);

        self.write_field(LDO_CFG0, LDO_CFG0_LDO_CORE_VLEVEL, if !bg || desc.ht40 { 5 } else { 0 })?;

        // rf1 = N, rf2 = K, rf3 = mod, rf4 = R
        let modulo = rf.rf3.wrapping_sub(8);
        self.rfcsr_write(8, rf.rf1 as u8)?;
        self.rfcsr_modify(9, |r| {
            RFCSR9_K.set(r, (rf.rf2 & 0xf) as u8);
            RFCSR9_N.set(r, ((rf.rf1 & 0x100) >> 8) as u8);
            RFCSR9_MOD.set(r, ((modulo & 0x4) >> 2) as u8);
        })?;
        self.rfcsr_modify(11, |r| {
            RFCSR11_R.set(r, rf.rf4.wrapping_sub(1) as u8);
            RFCSR11_MOD.set(r, (modulo & 0x3) as u8);
        })?;

        let power_bound = if bg {
            self.rfcsr_write_table(RF5592_BG)?;
            let r23 = if ch <= 10 { 0x07 } else { 0x06 };
            self.rfcsr_write(23, r23)?;
            self.rfcsr_write(59, r23)?;
            self.rfcsr_write(55, 0x43)?;
            POWER_BOUND
        } else {
            self.rfcsr_write_table(RF5592_A)?;
            match ch {
                36..=64 => {
                    self.rfcsr_write_table(RF5592_A_LOW)?;
                    let (r24, r55, r56) = if ch <= 50 { (0x09, 0x06, 0xd3) } else { (0x07, 0x04, 0xbb) };
                    self.rfcsr_write_table(&[(24, r24), (55, r55), (56, r56)])?;
                }
                100..=165 => {
                    self.rfcsr_write_table(&rf5592_a_high(ch))?;
                    let r58 = if ch <= 116 { 0x1d } else { 0x15 };
                    self.rfcsr_write(58, r58)?;
                    self.rfcsr_write(59, if ch <= 138 { 0x3f } else { 0x7c })?;
                    self.rfcsr_write(62, r58)?;
                }
                _ => {}
            }
            POWER_BOUND_5G
        };

        self.rfcsr_write_field(49, RFCSR49_TX, bounded_power(desc.default_power1, power_bound))?;
        self.rfcsr_write_field(50, RFCSR50_TX, bounded_power(desc.default_power2, power_bound))?;

        let (tx, rx) = (self.tx_chain_num, self.rx_chain_num);
        self.rfcsr_modify(1, |r| {
            RFCSR1_RF_BLOCK_EN.set(r, 1);
            RFCSR1_PLL_PD.set(r, 1);
            RFCSR1_TX0_PD.set_bool(r, tx >= 1);
            RFCSR1_TX1_PD.set_bool(r, tx == 2);
            RFCSR1_TX2_PD.set(r, 0);
            RFCSR1_RX0_PD.set_bool(r, rx >= 1);
            RFCSR1_RX1_PD.set_bool(r, rx == 2);
            RFCSR1_RX2_PD.set(r, 0);
        })?;
        self.rfcsr_write(6, 0xe4)?;
        self.rfcsr_write(30, if desc.ht40 { 0x16 } else { 0x10 })?;
        self.rfcsr_write(31, 0x80)?;
        self.rfcsr_write(32, 0x80)?;

        self.freq_cal_mode1()?;
        self.rfcsr_write_field(3, RFCSR3_VCOCAL_EN, 1)?;

        let agc = 0x37u8.wrapping_sub(self.lna_gain);
        for word in [62, 63, 64] {
            self.bbp_write(word, agc)?;
        }
        for (word, bg_value, a_value) in RF5592_BBP {
            self.bbp_write(word, if bg { bg_value } else { a_value })?;
        }
        for (reg, bg_value, a_value) in RF5592_GLRT {
            self.bbp_glrt_write(reg, if bg { bg_value } else { a_value })?;
        }
        Ok(())
    }

    pub(super) fn config_channel_rf7620(&mut self, desc: &ChannelDescriptor) -> Result<(), Rt2800Error> {
        let rf = desc.rf;
        let ht40 = desc.ht40;
        let (tx, rx) = (self.tx_chain_num, self.rx_chain_num);

        // Frequency plan: Rdiv, N, K = 0, D = 0, then Ksd spread over R17-R19
        let rdiv = if self.bus.clk_is_20mhz() { 3 } else { 0 };
        self.rfcsr_write_field(13, RFCSR13_RDIV_MT7620, rdiv)?;
        self.rfcsr_write(20, rf.rf1 as u8)?;
        self.rfcsr_write_field(21, RFCSR21_BIT1, 0)?;
        self.rfcsr_write_field(16, RFCSR16_RF_PLL_FREQ_SEL_MT7620, 0)?;
        self.rfcsr_write_field(22, RFCSR22_FREQPLAN_D_MT7620, 0)?;
        self.rfcsr_write(17, rf.rf2 as u8)?;
        self.rfcsr_write(18, rf.rf3 as u8)?;
        self.rfcsr_write_field(19, RFCSR19_K, rf.rf4 as u8)?;

        // SDM mode
        self.rfcsr_write_field(16, RFCSR16_SDM_MODE_MT7620, 0x80)?;
        self.rfcsr_write_field(21, RFCSR21_BIT8, 1)?;

        self.rfcsr_modify(1, |r| RFCSR1_TX2_EN_MT7620.set_bool(r, tx != 1))?;
        self.rfcsr_modify(2, |r| {
            RFCSR2_TX2_EN_MT7620.set_bool(r, tx != 1);
            RFCSR2_RX2_EN_MT7620.set_bool(r, rx != 1);
        })?;
        self.rfcsr_modify(42, |r| RFCSR42_TX2_EN_MT7620.set_bool(r, tx != 1))?;

        // DC calibration bandwidth
        let (bw, r8, r58) = if ht40 { (0x10, 0x04, 0x08) } else { (0x20, 0x00, 0x28) };
        for (reg, value) in [(6, bw), (7, bw), (8, r8), (58, r58), (59, r58)] {
            self.rfcsr_write_dccal(reg, value)?;
        }

        self.rfcsr_modify(28, |r| RFCSR28_CH11_HT40.set_bool(r, ht40 && desc.channel == 11))?;

        let (rx_agc_fc, tx_agc_fc) = if ht40 {
            (self.calib.rx_calibration_bw40, self.calib.tx_calibration_bw40)
        } else {
            (self.calib.rx_calibration_bw20, self.calib.tx_calibration_bw20)
        };
        for ((bank, reg), code) in RF7620_RX_AGC_REGS.into_iter().map(|r| (r, rx_agc_fc))
            .chain(RF7620_TX_AGC_REGS.into_iter().map(|r| (r, tx_agc_fc)))
        {
            let value = (self.rfcsr_read_bank(bank, reg)? & !0x3f) | code;
            self.rfcsr_write_bank(bank, reg, value)?;
        }

        // New synthesizer words need a VCO recalibration
        self.vco_calibration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rf5592_high_band_splits() {
        let low = rf5592_a_high(100);
        let high = rf5592_a_high(165);
        let find = |t: &[(u16, u8); 14], w: u16| t.iter().find(|(r, _)| *r == w).map(|(_, v)| *v);
        assert_eq!(find(&low, 23), Some(0x3c));
        assert_eq!(find(&high, 23), Some(0x38));
        assert_eq!(find(&low, 51), Some(0xfc));
        assert_eq!(find(&rf5592_a_high(126), 51), Some(0xec));
        assert_eq!(find(&rf5592_a_high(138), 55), Some(0x01));
        assert_eq!(find(&rf5592_a_high(140), 55), Some(0x00));
    }
}
