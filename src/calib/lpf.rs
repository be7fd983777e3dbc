//! RT6352 (MT7620) RF bring-up: banked register tables and the TX/RX low-pass filter calibration

use embedded_hal::blocking::delay::DelayUs;

use crate::regs::bbp::*;
use crate::regs::mac::{RF_BYPASS0, RF_CONTROL0};
use crate::{RegisterBus, Rt2800, Rt2800Error};

/// Filter code sweep upper bound (6 bits)
const AGC_FC_MAX: u8 = 0x3f;

/// Maximum number of polls on the LPF calibration done flag
const LP_CAL_POLLS: usize = 20;

/// Bank 5 registers touched by the filter calibration, restored afterwards
const BANK5_SAVED: [u8; 24] = [
    0, 1, 3, 4, 5, 6, 7, 8, 17, 18, 19, 20,
    37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 58, 59,
];

const RFCSR_6352_CENTRAL: &[(u16, u8)] = &[
    (14, 0x7c), (16, 0x80), (17, 0x99), (18, 0x99), (19, 0x09), (20, 0x50), (21, 0xb0), (22, 0x00),
    (23, 0x06), (24, 0x00), (25, 0x00), (26, 0x5d), (27, 0x00), (28, 0x61), (29, 0xb5), (43, 0x02),
    (28, 0x62), (29, 0xad), (39, 0x80),
];

/// Channel registers 0 to 49, written in both channel banks
const CHANREG_6352: [u8; 50] = [
    0x03, 0x00, 0x00, 0x00, 0x00, 0x08, 0x00, 0x51, 0x53, 0x16,
    0x61, 0x53, 0x22, 0x3d, 0x06, 0x13, 0x22, 0x27, 0x02, 0xa7,
    0x01, 0x52, 0x80, 0xb3, 0x00, 0x00, 0x00, 0x00, 0x5c, 0x6b,
    0x6b, 0x31, 0x5d, 0x00, 0xe6, 0x55, 0x00, 0xbb, 0xb3, 0xb3,
    0x03, 0x00, 0x00, 0xb3, 0xd3, 0xd5, 0x07, 0x68, 0xef, 0x1c,
];

/// Channel registers 54 to 63
const CHANREG_6352_HIGH: [u8; 10] = [0x07, 0xa8, 0x85, 0x10, 0x07, 0x6a, 0x85, 0x10, 0x1c, 0x00];

/// Initialisation step on the banked RF register file
#[derive(Clone, Copy)]
enum BankWrite {
    /// Same value in both channel banks (4 and 6)
    Chan(u8, u8),
    /// Single bank
    Bank(u8, u8, u8),
}

use BankWrite::{Bank, Chan};

/// Channel register overrides applied in order after the base table
const CHANREG_6352_OVERRIDES: &[BankWrite] = &[
    Bank(6, 45, 0xc5),
    Chan(9, 0x47), Chan(10, 0x71), Chan(11, 0x33), Chan(14, 0x0e), Chan(17, 0x23), Chan(19, 0xa4),
    Chan(20, 0x02), Chan(21, 0x12), Chan(28, 0x1c), Chan(29, 0xeb), Chan(32, 0x7d), Chan(34, 0xd6),
    Chan(36, 0x08), Chan(38, 0xb4), Chan(43, 0xd3), Chan(44, 0xb3), Chan(45, 0xd5), Chan(46, 0x27),
    Bank(4, 47, 0x67), Bank(6, 47, 0x69),
    Chan(48, 0xff),
    Bank(4, 54, 0x27), Bank(6, 54, 0x20),
    Chan(55, 0x66), Chan(56, 0xff), Chan(57, 0x1c), Chan(58, 0x20), Chan(59, 0x6b), Chan(60, 0xf7),
    Chan(61, 0x09),
    Chan(10, 0x51), Chan(14, 0x06), Chan(19, 0xa7), Chan(28, 0x2c), Chan(55, 0x64), Chan(8, 0x51),
    Chan(9, 0x36), Chan(11, 0x53), Chan(14, 0x16),
    Chan(47, 0x6c), Chan(48, 0xfc), Chan(49, 0x1f), Chan(54, 0x27), Chan(55, 0x66), Chan(59, 0x6b),
    // DRQFN package
    Chan(43, 0xd3), Chan(44, 0xe3), Chan(45, 0xe5), Chan(47, 0x28), Chan(55, 0x68), Chan(56, 0xf7),
    Chan(58, 0x02), Chan(60, 0xc7),
];

/// DC calibration registers 0 to 35
const DCCAL_6352: [u8; 36] = [
    0x47, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x10, 0x04, 0x00,
    0x07, 0x01, 0x07, 0x07, 0x07, 0x20, 0x22, 0x00, 0x00, 0x00,
    0x00, 0xf1, 0x11, 0x02, 0x41, 0x20, 0x00, 0xd7, 0xa2, 0x20,
    0x49, 0x20, 0x04, 0xf1, 0xa1, 0x01,
];

/// DC calibration registers 41 to 63
const DCCAL_6352_HIGH: [u8; 23] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x3e, 0x3d, 0x3e, 0x3d,
    0x3e, 0x3d, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x10, 0x0a,
    0x00, 0x00, 0x00,
];

/// Target drop of the calibration tone between the unfiltered and filtered runs
fn lp_filter_target(tx: bool, ht40: bool) -> i8 {
    match (tx, ht40) {
        (true, false) => 0x09,
        (true, true) => 0x02,
        (false, false) => 0x27,
        (false, true) => 0x31,
    }
}

/// Calibration result register: 7-bit two's complement
fn lp_cal_value(raw: u8) -> i8 {
    let v = (raw & 0x7f) as i16;
    (if v >= 0x40 { v - 128 } else { v }) as i8
}

/// `Ok` with the next filter code to try, or `Err` with the code kept once settled
fn lp_sweep_step(fc: u8, diff: i8, target: i8) -> Result<u8, u8> {
    if (diff > target && fc == 0) || (diff < target && fc == AGC_FC_MAX) {
        Err(0)
    } else if diff <= target && fc < AGC_FC_MAX {
        Ok(fc + 1)
    } else {
        Err(fc)
    }
}

impl<B, D> Rt2800<B, D> where
    B: RegisterBus, D: DelayUs<u32>
{
    pub(super) fn init_rfcsr_6352(&mut self) -> Result<(), Rt2800Error> {
        // Central registers
        let head = [0x02, 0x03, 0x33, 0xff, 0x0c, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        for (reg, &value) in head.iter().enumerate() {
            self.rfcsr_write(reg as u16, value)?;
        }
        self.rfcsr_write(12, self.freq_offset)?;
        let mid = [0x00, 0x40, 0x22, 0x4c, 0x00, 0x00, 0x00, 0xa0, 0x12, 0x07, 0x13, 0xfe, 0x24, 0x7a, 0x00, 0x00, 0x05];
        for (i, &value) in mid.iter().enumerate() {
            self.rfcsr_write(13 + i as u16, value)?;
        }
        for reg in 30..=40 {
            self.rfcsr_write(reg, 0x00)?;
        }
        self.rfcsr_write_table(&[(41, 0xd0), (42, 0x5b), (43, 0x00)])?;

        self.rfcsr_write(11, 0x21)?;
        let rfcsr13 = if self.bus.clk_is_20mhz() { 0x03 } else { 0x00 };
        self.rfcsr_write(13, rfcsr13)?;
        self.rfcsr_write_table(RFCSR_6352_CENTRAL)?;

        // Channel banks
        for (reg, &value) in CHANREG_6352.iter().enumerate() {
            self.rfcsr_write_chanreg(reg as u8, value)?;
        }
        for (i, &value) in CHANREG_6352_HIGH.iter().enumerate() {
            self.rfcsr_write_chanreg(54 + i as u8, value)?;
        }
        for step in CHANREG_6352_OVERRIDES {
            match *step {
                Chan(reg, value) => self.rfcsr_write_chanreg(reg, value)?,
                Bank(bank, reg, value) => self.rfcsr_write_bank(bank, reg, value)?,
            }
        }

        // DC calibration banks
        for (reg, &value) in DCCAL_6352.iter().enumerate() {
            self.rfcsr_write_dccal(reg as u8, value)?;
        }
        for (i, &value) in DCCAL_6352_HIGH.iter().enumerate() {
            self.rfcsr_write_dccal(41 + i as u8, value)?;
        }
        for (reg, value) in [(3, 0x08), (4, 0x04), (5, 0x20), (5, 0x00), (17, 0x7c)] {
            self.rfcsr_write_dccal(reg, value)?;
        }

        self.bw_filter_calibration(true)?;
        self.bw_filter_calibration(false)
    }

    /// Pulse the baseband core reset, optionally switching the bandwidth while held
    fn bbp_core_soft_reset(&mut self, set_bw: bool, ht40: bool) -> Result<(), Rt2800Error> {
        self.bbp_modify(21, |v| *v |= 0x01)?;
        self.usleep(100);
        if set_bw {
            self.bbp_write_field(4, BBP4_BANDWIDTH, 2 * ht40 as u8)?;
            self.usleep(100);
        }
        self.bbp_modify(21, |v| *v &= !0x01)?;
        self.usleep(100);
        Ok(())
    }

    /// Route the loopback path for a TX or RX filter measurement
    fn rf_lp_config(&mut self, tx: bool) -> Result<(), Rt2800Error> {
        self.write_reg(RF_CONTROL0, if tx { 0x04 } else { 0x02 })?;
        self.write_reg(RF_BYPASS0, 0x06)?;

        let r17 = self.rfcsr_read_bank(5, 17)?;
        self.rfcsr_write_bank(5, 17, r17 | 0x80)?;

        let (r18, r19, r20, gain) = if tx { (0xc1, 0x20, 0x02, 0x3f) } else { (0xf1, 0x18, 0x02, 0x34) };
        self.rfcsr_write_bank(5, 18, r18)?;
        self.rfcsr_write_bank(5, 19, r19)?;
        self.rfcsr_write_bank(5, 20, r20)?;
        for reg in [3, 4] {
            let v = self.rfcsr_read_bank(5, reg)?;
            self.rfcsr_write_bank(5, reg, (v & !0x3f) | gain)?;
        }
        if tx {
            self.rfcsr_write_bank(5, 5, 0x31)?;
        }
        Ok(())
    }

    /// Run one tone measurement and return the signed level
    fn lp_tx_filter_bw_cal(&mut self) -> Result<i8, Rt2800Error> {
        self.bbp_dcoc_write(0, 0x82)?;
        for _ in 0..LP_CAL_POLLS {
            self.usleep(500);
            if self.bbp_read(159)? == 0x02 {
                break;
            }
        }
        let raw = self.bbp_dcoc_read(0x39)?;
        Ok(lp_cal_value(raw))
    }

    fn set_agc_fc(&mut self, regs: [u8; 2], fc: u8) -> Result<(), Rt2800Error> {
        for reg in regs {
            let v = self.rfcsr_read_bank(5, reg)?;
            self.rfcsr_write_bank(5, reg, (v & !0x7f) | fc)?;
        }
        Ok(())
    }

    /// Sweep the TX or RX low-pass filter code for 20 and 40MHz and store the results.
    /// Every register touched is restored before returning.
    fn bw_filter_calibration(&mut self, tx: bool) -> Result<(), Rt2800Error> {
        let saved_rf_control0 = self.read_reg(RF_CONTROL0)?;
        let saved_rf_bypass0 = self.read_reg(RF_BYPASS0)?;
        let saved_bbp23 = self.bbp_read(23)?;
        let saved_dcoc0 = self.bbp_dcoc_read(0)?;
        let saved_dcoc2 = self.bbp_dcoc_read(2)?;
        let mut saved_bank5 = [0u8; BANK5_SAVED.len()];
        for (slot, &reg) in saved_bank5.iter_mut().zip(BANK5_SAVED.iter()) {
            *slot = self.rfcsr_read_bank(5, reg)?;
        }

        // Power the calibration block and wait for it to come up
        let r0 = self.rfcsr_read_bank(5, 0)?;
        self.rfcsr_write_bank(5, 0, r0 | 0x03)?;
        let r1 = self.rfcsr_read_bank(5, 1)?;
        self.rfcsr_write_bank(5, 1, r1 | 0x01)?;
        for _ in 0..40 {
            self.usleep(500);
            if self.rfcsr_read_bank(5, 1)? & 0x01 == 0 {
                break;
            }
        }
        let r0 = self.rfcsr_read_bank(5, 0)?;
        self.rfcsr_write_bank(5, 0, (r0 & !0x03) | 0x01)?;
        self.bbp_modify(23, |v| *v = (*v & !0x1f) | 0x10)?;

        let agc_regs = if tx { [58, 59] } else { [6, 7] };
        for ht40 in [false, true] {
            let r8 = self.rfcsr_read_bank(5, 8)?;
            self.rfcsr_write_bank(5, 8, if ht40 { r8 | 0x04 } else { r8 & !0x04 })?;
            self.bbp_core_soft_reset(true, ht40)?;
            self.rf_lp_config(tx)?;
            self.set_agc_fc(agc_regs, 0)?;
            self.msleep(1);

            // Reference level with the filter bypassed
            self.bbp_modify_dcoc(2, |v| *v &= !0x06)?;
            self.bbp_core_soft_reset(false, false)?;
            let init = self.lp_tx_filter_bw_cal()?;
            self.bbp_modify_dcoc(2, |v| *v |= 0x06)?;

            let target = lp_filter_target(tx, ht40);
            let mut fc = 0;
            let result = loop {
                self.set_agc_fc(agc_regs, fc)?;
                self.usleep(500);
                self.bbp_core_soft_reset(false, false)?;
                let val = self.lp_tx_filter_bw_cal()?;
                match lp_sweep_step(fc, init.wrapping_sub(val), target) {
                    Ok(next) => fc = next,
                    Err(done) => break done,
                }
            };
            trace!("LPF {} ht40={}: fc={:#x}", if tx { "tx" } else { "rx" }, ht40, result);

            match (tx, ht40) {
                (true, false) => self.calib.tx_calibration_bw20 = result,
                (true, true) => self.calib.tx_calibration_bw40 = result,
                (false, false) => self.calib.rx_calibration_bw20 = result,
                (false, true) => self.calib.rx_calibration_bw40 = result,
            }
        }

        for (&value, &reg) in saved_bank5.iter().zip(BANK5_SAVED.iter()) {
            self.rfcsr_write_bank(5, reg, value)?;
        }
        self.bbp_write(23, saved_bbp23)?;
        self.bbp_dcoc_write(0, saved_dcoc0)?;
        self.bbp_dcoc_write(2, saved_dcoc2)?;
        let ht40 = self.channel.ht40;
        self.bbp_write_field(4, BBP4_BANDWIDTH, 2 * ht40 as u8)?;
        self.write_reg(RF_CONTROL0, saved_rf_control0)?;
        self.write_reg(RF_BYPASS0, saved_rf_bypass0)
    }

    fn bbp_modify_dcoc<F>(&mut self, reg: u8, f: F) -> Result<(), Rt2800Error>
        where F: FnOnce(&mut u8)
    {
        let mut v = self.bbp_dcoc_read(reg)?;
        f(&mut v);
        self.bbp_dcoc_write(reg, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cal_value_sign() {
        assert_eq!(lp_cal_value(0x10), 0x10);
        assert_eq!(lp_cal_value(0x3f), 0x3f);
        assert_eq!(lp_cal_value(0x40), -64);
        assert_eq!(lp_cal_value(0x7f), -1);
        // Bit 7 is not part of the result
        assert_eq!(lp_cal_value(0x90), 0x10);
    }

    #[test]
    fn sweep_rules() {
        // Drop not reached yet: raise the code
        assert_eq!(lp_sweep_step(0, 0x05, 0x09), Ok(1));
        assert_eq!(lp_sweep_step(4, 0x09, 0x09), Ok(5));
        // Crossed the target: keep the current code
        assert_eq!(lp_sweep_step(7, 0x0a, 0x09), Err(7));
        // Overshoot on the first code or no crossing at the top: fall back to 0
        assert_eq!(lp_sweep_step(0, 0x0a, 0x09), Err(0));
        assert_eq!(lp_sweep_step(AGC_FC_MAX, 0x01, 0x09), Err(0));
        assert_eq!(lp_sweep_step(AGC_FC_MAX, 0x09, 0x09), Err(AGC_FC_MAX));
    }

    #[test]
    fn targets() {
        assert_eq!(lp_filter_target(true, false), 0x09);
        assert_eq!(lp_filter_target(true, true), 0x02);
        assert_eq!(lp_filter_target(false, false), 0x27);
        assert_eq!(lp_filter_target(false, true), 0x31);
    }
}
