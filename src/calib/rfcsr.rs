//! RF control register initialisation, one sequence per chip family, with the RX filter
//! calibration and the normal-mode setups they share

use embedded_hal::blocking::delay::DelayUs;

use crate::chip::{REV_RT3070F, REV_RT3071E, REV_RT3090E, REV_RT3390E, REV_RT5390F, REV_RT5592C};
use crate::eeprom::{EepromField, NIC_CONF1_DAC_TEST};
use crate::regs::bbp::*;
use crate::regs::mac::*;
use crate::regs::rfcsr::*;
use crate::{ChipFamily, RegisterBus, Rt2800, Rt2800Error};

use super::RfcsrTable;

const RFCSR_305X_SOC: &[(u16, u8)] = &[
    (0, 0x50), (1, 0x01), (2, 0xf7), (3, 0x75), (4, 0x40), (5, 0x03), (6, 0x02), (7, 0x50),
    (8, 0x39), (9, 0x0f), (10, 0x60), (11, 0x21), (12, 0x75), (13, 0x75), (14, 0x90), (15, 0x58),
    (16, 0xb3), (17, 0x92), (18, 0x2c), (19, 0x02), (20, 0xba), (21, 0xdb), (22, 0x00), (23, 0x31),
    (24, 0x08), (25, 0x01), (26, 0x25), (27, 0x23), (28, 0x13), (29, 0x83), (30, 0x00), (31, 0x00),
];

const RFCSR_30XX: &[(u16, u8)] = &[
    (4, 0x40), (5, 0x03), (6, 0x02), (7, 0x60), (9, 0x0f), (10, 0x41), (11, 0x21), (12, 0x7b),
    (14, 0x90), (15, 0x58), (16, 0xb3), (17, 0x92), (18, 0x2c), (19, 0x02), (20, 0xba), (21, 0xdb),
    (24, 0x16), (25, 0x03), (29, 0x1f),
];

const RFCSR_3290: &[(u16, u8)] = &[
    (1, 0x0f), (2, 0x80), (3, 0x08), (4, 0x00), (6, 0xa0), (8, 0xf3), (9, 0x02), (10, 0x53),
    (11, 0x4a), (12, 0x46), (13, 0x9f), (18, 0x02), (22, 0x20), (25, 0x83), (26, 0x82), (27, 0x09),
    (29, 0x10), (30, 0x10), (31, 0x80), (32, 0x80), (33, 0x00), (34, 0x05), (35, 0x12), (36, 0x00),
    (38, 0x85), (39, 0x1b), (40, 0x0b), (41, 0xbb), (42, 0xd5), (43, 0x7b), (44, 0x0e), (45, 0xa2),
    (46, 0x73), (47, 0x00), (48, 0x10), (49, 0x98), (52, 0x38), (53, 0x00), (54, 0x78), (55, 0x43),
    (56, 0x02), (57, 0x80), (58, 0x7f), (59, 0x09), (60, 0x45), (61, 0xc1),
];

/// RT3352 registers up to RFCSR33, the rest depends on the external PAs
const RFCSR_3352: &[(u16, u8)] = &[
    (0, 0xf0), (1, 0x23), (2, 0x50), (3, 0x18), (4, 0x00), (5, 0x00), (6, 0x33), (7, 0x00),
    (8, 0xf1), (9, 0x02), (10, 0xd2), (11, 0x42), (12, 0x1c), (13, 0x00), (14, 0x5a), (15, 0x00),
    (16, 0x01), (18, 0x45), (19, 0x02), (20, 0x00), (21, 0x00), (22, 0x00), (23, 0x00), (24, 0x00),
    (25, 0x80), (26, 0x00), (27, 0x03), (28, 0x03), (29, 0x00), (30, 0x10), (31, 0x80), (32, 0x80),
    (33, 0x00),
];

const RFCSR_3390: &[(u16, u8)] = &[
    (0, 0xa0), (1, 0xe1), (2, 0xf1), (3, 0x62), (4, 0x40), (5, 0x8b), (6, 0x42), (7, 0x34),
    (8, 0x00), (9, 0xc0), (10, 0x61), (11, 0x21), (12, 0x3b), (13, 0xe0), (14, 0x90), (15, 0x53),
    (16, 0xe0), (17, 0x94), (18, 0x5c), (19, 0x4a), (20, 0xb2), (21, 0xf6), (22, 0x00), (23, 0x14),
    (24, 0x08), (25, 0x3d), (26, 0x85), (27, 0x00), (28, 0x41), (29, 0x8f), (30, 0x20), (31, 0x0f),
];

const RFCSR_3572: &[(u16, u8)] = &[
    (0, 0x70), (1, 0x81), (2, 0xf1), (3, 0x02), (4, 0x4c), (5, 0x05), (6, 0x4a), (7, 0xd8),
    (9, 0xc3), (10, 0xf1), (11, 0xb9), (12, 0x70), (13, 0x65), (14, 0xa0), (15, 0x53), (16, 0x4c),
    (17, 0x23), (18, 0xac), (19, 0x93), (20, 0xb3), (21, 0xd0), (22, 0x00), (23, 0x3c), (24, 0x16),
    (25, 0x15), (26, 0x85), (27, 0x00), (28, 0x00), (29, 0x9b), (30, 0x09), (31, 0x10),
];

const RFCSR_3593: &[(u16, u8)] = &[
    (1, 0x03), (3, 0x80), (5, 0x00), (6, 0x40), (8, 0xf1), (9, 0x02), (10, 0xd3), (11, 0x40),
    (12, 0x4e), (13, 0x12), (18, 0x40), (22, 0x20), (30, 0x10), (31, 0x80), (32, 0x78), (33, 0x3b),
    (34, 0x3c), (35, 0xe0), (38, 0x86), (39, 0x23), (44, 0xd3), (45, 0xbb), (46, 0x60), (49, 0x8e),
    (50, 0x86), (51, 0x75), (52, 0x45), (53, 0x18), (54, 0x18), (55, 0x18), (56, 0xdb), (57, 0x6e),
];

/// RT5350 after RFCSR13, which depends on the crystal
const RFCSR_5350: &[(u16, u8)] = &[
    (14, 0x00), (15, 0x00), (16, 0xc0), (18, 0x03), (19, 0x00), (20, 0x00), (21, 0x00), (22, 0x20),
    (23, 0x00), (24, 0x00), (25, 0x80), (26, 0x00), (27, 0x03), (28, 0x00), (29, 0xd0), (30, 0x10),
    (31, 0x80), (32, 0x80), (33, 0x00), (34, 0x07), (35, 0x12), (36, 0x00), (37, 0x08), (38, 0x85),
    (39, 0x1b), (40, 0x0b), (41, 0xbb), (42, 0xd5), (43, 0x9b), (44, 0x0c), (45, 0xa6), (46, 0x73),
    (47, 0x00), (48, 0x10), (49, 0x80), (50, 0x00), (51, 0x00), (52, 0x38), (53, 0x00), (54, 0x38),
    (55, 0x43), (56, 0x82), (57, 0x00), (58, 0x39), (59, 0x0b), (60, 0x45), (61, 0xd1), (62, 0x00),
    (63, 0x00),
];

/// RFCSR17 is left out: it is programmed later from the EEPROM frequency offset
const RFCSR_3883: &[(u16, u8)] = &[
    (0, 0xe0), (1, 0x03), (2, 0x50), (3, 0x20), (4, 0x00), (5, 0x00), (6, 0x40), (7, 0x00),
    (8, 0x5b), (9, 0x08), (10, 0xd3), (11, 0x48), (12, 0x1a), (13, 0x12), (14, 0x00), (15, 0x00),
    (16, 0x00), (18, 0x40), (19, 0x00), (20, 0x00), (21, 0x00), (22, 0x20), (23, 0xc0), (24, 0x00),
    (25, 0x00), (26, 0x00), (27, 0x00), (28, 0x00), (29, 0x00), (30, 0x10), (31, 0x80), (32, 0x80),
    (33, 0x00), (34, 0x20), (35, 0x00), (36, 0x00), (37, 0x00), (38, 0x86), (39, 0x23), (40, 0x00),
    (41, 0x00), (42, 0x00), (43, 0x00), (44, 0x93), (45, 0xbb), (46, 0x60), (47, 0x00), (48, 0x00),
    (49, 0x8e), (50, 0x86), (51, 0x51), (52, 0x05), (53, 0x76), (54, 0x76), (55, 0x76), (56, 0xdb),
    (57, 0x3e), (58, 0x00), (59, 0x00), (60, 0x00), (61, 0x00), (62, 0x00), (63, 0x00),
];

const RFCSR_5392: &[(u16, u8)] = &[
    (1, 0x17), (3, 0x88), (5, 0x10), (6, 0xe0), (7, 0x00), (10, 0x53), (11, 0x4a), (12, 0x46),
    (13, 0x9f), (14, 0x00), (15, 0x00), (16, 0x00), (18, 0x03), (19, 0x4d), (20, 0x00), (21, 0x8d),
    (22, 0x20), (23, 0x0b), (24, 0x44), (25, 0x80), (26, 0x82), (27, 0x09), (28, 0x00), (29, 0x10),
    (30, 0x10), (31, 0x80), (32, 0x20), (33, 0xc0), (34, 0x07), (35, 0x12), (36, 0x00), (37, 0x08),
    (38, 0x89), (39, 0x1b), (40, 0x0f), (41, 0xbb), (42, 0xd5), (43, 0x9b), (44, 0x0e), (45, 0xa2),
    (46, 0x73), (47, 0x0c), (48, 0x10), (49, 0x94), (50, 0x94), (51, 0x3a), (52, 0x48), (53, 0x44),
    (54, 0x38), (55, 0x43), (56, 0xa1), (57, 0x00), (58, 0x39), (59, 0x07), (60, 0x45), (61, 0x91),
    (62, 0x39), (63, 0x07),
];

const RFCSR_5592: &[(u16, u8)] = &[
    (1, 0x3f), (3, 0x08), (5, 0x10), (6, 0xe4), (7, 0x00), (14, 0x00), (15, 0x00), (16, 0x00),
    (18, 0x03), (19, 0x4d), (20, 0x10), (21, 0x8d), (26, 0x82), (28, 0x00), (29, 0x10), (33, 0xc0),
    (34, 0x07), (35, 0x12), (47, 0x0c), (53, 0x22), (63, 0x07), (2, 0x80),
];

/// RX filter sweep targets (passband minus stopband) for 20 and 40MHz
fn rx_filter_targets(family: ChipFamily) -> (u8, u8) {
    if family == ChipFamily::Rt3070 { (0x16, 0x19) } else { (0x13, 0x15) }
}

impl<B, D> Rt2800<B, D> where
    B: RegisterBus, D: DelayUs<u32>
{
    /// Write a list of (register, value) pairs to the RF control registers, in order
    pub(crate) fn rfcsr_write_table(&mut self, table: &[(u16, u8)]) -> Result<(), Rt2800Error> {
        for &(reg, value) in table {
            self.rfcsr_write(reg, value)?;
        }
        Ok(())
    }

    pub(crate) fn run_rfcsr_table(&mut self, table: RfcsrTable) -> Result<(), Rt2800Error> {
        debug!("RFCSR init table {:?}", table);
        match table {
            RfcsrTable::Soc305x => {
                self.rf_init_calibration(30)?;
                self.rfcsr_write_table(RFCSR_305X_SOC)
            }
            RfcsrTable::Rt30xx => self.init_rfcsr_30xx(),
            RfcsrTable::Rt3290 => self.init_rfcsr_3290(),
            RfcsrTable::Rt3352 => self.init_rfcsr_3352(),
            RfcsrTable::Rt3390 => self.init_rfcsr_3390(),
            RfcsrTable::Rt3572 => self.init_rfcsr_3572(),
            RfcsrTable::Rt3593 => self.init_rfcsr_3593(),
            RfcsrTable::Rt3883 => self.init_rfcsr_3883(),
            RfcsrTable::Rt5350 => self.init_rfcsr_5350(),
            RfcsrTable::Rt5390 => self.init_rfcsr_5390(),
            RfcsrTable::Rt5392 => self.init_rfcsr_5392(),
            RfcsrTable::Rt5592 => self.init_rfcsr_5592(),
            RfcsrTable::Rt6352 => self.init_rfcsr_6352(),
        }
    }

    /// Pulse bit 7 of an RF register to start its internal calibration
    fn rf_init_calibration(&mut self, reg: u16) -> Result<(), Rt2800Error> {
        let mut rfcsr = self.rfcsr_read(reg)?;
        rfcsr |= 0x80;
        self.rfcsr_write(reg, rfcsr)?;
        self.msleep(1);
        rfcsr &= !0x80;
        self.rfcsr_write(reg, rfcsr)
    }

    fn led_open_drain_enable(&mut self) -> Result<(), Rt2800Error> {
        self.write_field(OPT_14_CSR, OPT_14_CSR_BIT0, 1)
    }

    fn disable_gpio_switch(&mut self) -> Result<(), Rt2800Error> {
        self.write_field(GPIO_SWITCH, GPIO_SWITCH_5, 0)
    }

    /// Sweep RFCSR24 with a baseband loopback tone until the stopband rejection
    /// exceeds `target`. Return the filter value kept.
    fn init_rx_filter(&mut self, bw40: bool, target: u8) -> Result<u8, Rt2800Error> {
        let mut rfcsr24: u8 = if bw40 { 0x27 } else { 0x07 };
        let mut overtuned = false;

        self.rfcsr_write(24, rfcsr24)?;
        self.bbp_set_bandwidth(bw40)?;
        self.rfcsr_write_field(31, RFCSR31_RX_H20M, bw40 as u8)?;
        self.rfcsr_write_field(22, RFCSR22_BASEBAND_LOOPBACK, 1)?;

        // Passband test tone
        self.bbp_write(24, 0)?;
        let mut passband = 0;
        for _ in 0..100 {
            self.bbp_write(25, 0x90)?;
            self.msleep(1);
            passband = self.bbp_read(55)?;
            if passband != 0 {
                break;
            }
        }

        // Stopband test tone
        self.bbp_write(24, 0x06)?;
        for _ in 0..100 {
            self.bbp_write(25, 0x90)?;
            self.msleep(1);
            let stopband = self.bbp_read(55)?;
            // Signed: a stopband louder than the passband keeps the sweep going
            let delta = passband as i16 - stopband as i16;
            if delta > target as i16 {
                break;
            }
            rfcsr24 = rfcsr24.wrapping_add(1);
            overtuned |= delta == target as i16;
            self.rfcsr_write(24, rfcsr24)?;
        }

        if overtuned {
            rfcsr24 = rfcsr24.wrapping_sub(1);
        }
        self.rfcsr_write(24, rfcsr24)?;
        Ok(rfcsr24)
    }

    /// Calibrate the RX filter for both bandwidths and store the results
    fn rx_filter_calibration(&mut self) -> Result<(), Rt2800Error> {
        let (target_bw20, target_bw40) = rx_filter_targets(self.chip.family);
        self.calib.calibration_bw20 = self.init_rx_filter(false, target_bw20)?;
        self.calib.calibration_bw40 = self.init_rx_filter(true, target_bw40)?;
        debug!("RX filter calibration: bw20 {:#x}, bw40 {:#x}",
            self.calib.calibration_bw20, self.calib.calibration_bw40);
        self.save_bbp25_26()?;

        self.bbp_write(24, 0)?;
        self.rfcsr_write_field(22, RFCSR22_BASEBAND_LOOPBACK, 0)?;
        self.bbp_set_bandwidth(false)
    }

    /// Keep BBP25/26 for the channel switches of the RF3052/RF3053
    fn save_bbp25_26(&mut self) -> Result<(), Rt2800Error> {
        self.calib.bbp25 = self.bbp_read(25)?;
        self.calib.bbp26 = self.bbp_read(26)?;
        Ok(())
    }

    fn normal_mode_setup_3xxx(&mut self) -> Result<(), Rt2800Error> {
        let chip = self.chip;
        let r_bit = (chip.is(ChipFamily::Rt3070)
            || chip.rev_lt(ChipFamily::Rt3071, REV_RT3071E)
            || chip.rev_lt(ChipFamily::Rt3090, REV_RT3090E)
            || chip.rev_lt(ChipFamily::Rt3390, REV_RT3390E))
            && !chip.caps.has_external_lna_bg();
        let min_gain = if chip.is(ChipFamily::Rt3070) { 1 } else { 2 };
        let gain = self.calib.txmixer_gain_24g;
        self.rfcsr_modify(17, |r| {
            RFCSR17_TX_LO1_EN.set(r, 0);
            if r_bit {
                RFCSR17_R.set(r, 1);
            }
            if gain >= min_gain {
                RFCSR17_TXMIXER_GAIN.set(r, gain);
            }
        })?;

        if chip.is(ChipFamily::Rt3090) {
            self.disable_unused_dac_adc()?;
        }

        if chip.is(ChipFamily::Rt3070) {
            let r1 = if chip.rev_lt(ChipFamily::Rt3070, REV_RT3070F) { 3 } else { 0 };
            self.rfcsr_modify(27, |r| {
                RFCSR27_R1.set(r, r1);
                RFCSR27_R2.set(r, 0);
                RFCSR27_R3.set(r, 0);
                RFCSR27_R4.set(r, 0);
            })?;
        } else if matches!(chip.family, ChipFamily::Rt3071 | ChipFamily::Rt3090 | ChipFamily::Rt3390) {
            self.rfcsr_modify(1, |r| {
                RFCSR1_RF_BLOCK_EN.set(r, 1);
                RFCSR1_RX0_PD.set(r, 0);
                RFCSR1_TX0_PD.set(r, 0);
                RFCSR1_RX1_PD.set(r, 1);
                RFCSR1_TX1_PD.set(r, 1);
            })?;
            self.rfcsr_write_field(15, RFCSR15_TX_LO2_EN, 0)?;
            self.rfcsr_write_field(20, RFCSR20_RX_LO1_EN, 0)?;
            self.rfcsr_write_field(21, RFCSR21_RX_LO2_EN, 0)?;
        }
        Ok(())
    }

    fn normal_mode_setup_3593(&mut self) -> Result<(), Rt2800Error> {
        self.rfcsr_write_field(50, RFCSR50_TX_LO2_EN, 0)?;
        let tx_gain = RFCSR17_TXMIXER_GAIN.get(self.calib.txmixer_gain_24g);
        self.rfcsr_write_field(51, RFCSR51_BITS24, tx_gain)?;
        self.rfcsr_write_field(38, RFCSR38_RX_LO1_EN, 0)?;
        self.rfcsr_write_field(39, RFCSR39_RX_LO2_EN, 0)?;
        self.rfcsr_modify(1, |r| {
            RFCSR1_RF_BLOCK_EN.set(r, 1);
            RFCSR1_PLL_PD.set(r, 1);
        })?;
        self.rfcsr_write_field(30, RFCSR30_RX_VCM, 2)
    }

    fn normal_mode_setup_5xxx(&mut self) -> Result<(), Rt2800Error> {
        self.disable_unused_dac_adc()?;
        self.rfcsr_write_field(38, RFCSR38_RX_LO1_EN, 0)?;
        self.rfcsr_write_field(39, RFCSR39_RX_LO2_EN, 0)?;
        self.bbp4_mac_if_ctrl()?;
        self.rfcsr_write_field(30, RFCSR30_RX_VCM, 2)
    }

    /// Core voltage pulse: VLEVEL 3 for 1ms then back to 0
    fn ldo_core_pulse(&mut self) -> Result<(), Rt2800Error> {
        self.modify_reg(LDO_CFG0, |reg| {
            LDO_CFG0_LDO_CORE_VLEVEL.set(reg, 3);
            LDO_CFG0_BGSEL.set(reg, 1);
        })?;
        self.msleep(1);
        self.modify_reg(LDO_CFG0, |reg| {
            LDO_CFG0_LDO_CORE_VLEVEL.set(reg, 0);
            LDO_CFG0_BGSEL.set(reg, 1);
        })?;
        Ok(())
    }

    fn init_rfcsr_30xx(&mut self) -> Result<(), Rt2800Error> {
        let chip = self.chip;
        self.rf_init_calibration(30)?;
        self.rfcsr_write_table(RFCSR_30XX)?;

        if chip.rev_lt(ChipFamily::Rt3070, REV_RT3070F) {
            self.modify_reg(LDO_CFG0, |reg| {
                LDO_CFG0_BGSEL.set(reg, 1);
                LDO_CFG0_LDO_CORE_VLEVEL.set(reg, 3);
            })?;
        } else if matches!(chip.family, ChipFamily::Rt3071 | ChipFamily::Rt3090) {
            self.rfcsr_write(31, 0x14)?;
            self.rfcsr_write_field(6, RFCSR6_R2, 1)?;

            let early = chip.rev_lt(ChipFamily::Rt3071, REV_RT3071E) || chip.rev_lt(ChipFamily::Rt3090, REV_RT3090E);
            let dac_test = NIC_CONF1_DAC_TEST.is_set(self.eeprom.read(EepromField::NicConf1));
            self.modify_reg(LDO_CFG0, |reg| {
                LDO_CFG0_BGSEL.set(reg, 1);
                if early {
                    LDO_CFG0_LDO_CORE_VLEVEL.set(reg, if dac_test { 3 } else { 0 });
                }
            })?;
            self.disable_gpio_switch()?;
        }

        self.rx_filter_calibration()?;

        if chip.rev_lt(ChipFamily::Rt3070, REV_RT3070F)
            || chip.rev_lt(ChipFamily::Rt3071, REV_RT3071E)
            || chip.rev_lt(ChipFamily::Rt3090, REV_RT3090E)
        {
            self.rfcsr_write(27, 0x03)?;
        }

        self.led_open_drain_enable()?;
        self.normal_mode_setup_3xxx()
    }

    fn init_rfcsr_3290(&mut self) -> Result<(), Rt2800Error> {
        self.rf_init_calibration(2)?;
        self.rfcsr_write_table(RFCSR_3290)?;
        self.rfcsr_write_field(29, RFCSR29_RSSI_GAIN, 3)?;
        self.led_open_drain_enable()?;
        self.normal_mode_setup_3xxx()
    }

    fn init_rfcsr_3352(&mut self) -> Result<(), Rt2800Error> {
        let tx0_ext_pa = self.chip.caps.has_external_pa_tx0();
        let tx1_ext_pa = self.chip.caps.has_external_pa_tx1();
        let pick = |ext: bool, with_pa: u8, without: u8| if ext { with_pa } else { without };

        self.rf_init_calibration(30)?;
        self.rfcsr_write_table(RFCSR_3352)?;

        let mut rfcsr = 0x01;
        RFCSR34_TX0_EXT_PA.set_bool(&mut rfcsr, tx0_ext_pa);
        RFCSR34_TX1_EXT_PA.set_bool(&mut rfcsr, tx1_ext_pa);
        self.rfcsr_write(34, rfcsr)?;
        self.rfcsr_write_table(&[(35, 0x03), (36, 0xbd), (37, 0x3c), (38, 0x5f), (39, 0xc5), (40, 0x33)])?;

        let mut rfcsr = 0x52;
        if !tx0_ext_pa {
            RFCSR41_BIT1.set(&mut rfcsr, 1);
            RFCSR41_BIT4.set(&mut rfcsr, 1);
        }
        self.rfcsr_write(41, rfcsr)?;
        let mut rfcsr = 0x52;
        if !tx1_ext_pa {
            RFCSR42_BIT1.set(&mut rfcsr, 1);
            RFCSR42_BIT4.set(&mut rfcsr, 1);
        }
        self.rfcsr_write(42, rfcsr)?;
        self.rfcsr_write_table(&[(43, 0xdb), (44, 0xdb), (45, 0xdb), (46, 0xdd), (47, 0x0d), (48, 0x14), (49, 0x00)])?;

        let mut rfcsr = 0x2d;
        RFCSR50_TX0_EXT_PA.set_bool(&mut rfcsr, tx0_ext_pa);
        RFCSR50_TX1_EXT_PA.set_bool(&mut rfcsr, tx1_ext_pa);
        self.rfcsr_write(50, rfcsr)?;

        self.rfcsr_write_table(&[
            (51, pick(tx0_ext_pa, 0x52, 0x7f)),
            (52, pick(tx0_ext_pa, 0xc0, 0x00)),
            (53, pick(tx0_ext_pa, 0xd2, 0x52)),
            (54, pick(tx0_ext_pa, 0xc0, 0x1b)),
            (55, pick(tx1_ext_pa, 0x52, 0x7f)),
            (56, pick(tx1_ext_pa, 0xc0, 0x00)),
            (57, pick(tx0_ext_pa, 0x49, 0x52)),
            (58, pick(tx1_ext_pa, 0xc0, 0x1b)),
            (59, 0x00), (60, 0x00), (61, 0x00), (62, 0x00), (63, 0x00),
        ])?;

        self.rx_filter_calibration()?;
        self.led_open_drain_enable()?;
        self.normal_mode_setup_3xxx()
    }

    fn init_rfcsr_3390(&mut self) -> Result<(), Rt2800Error> {
        self.rf_init_calibration(30)?;
        self.rfcsr_write_table(RFCSR_3390)?;
        self.disable_gpio_switch()?;
        self.rx_filter_calibration()?;
        if self.chip.rev_lt(ChipFamily::Rt3390, REV_RT3390E) {
            self.rfcsr_write(27, 0x03)?;
        }
        self.led_open_drain_enable()?;
        self.normal_mode_setup_3xxx()
    }

    fn init_rfcsr_3572(&mut self) -> Result<(), Rt2800Error> {
        self.rf_init_calibration(30)?;
        self.rfcsr_write_table(RFCSR_3572)?;
        self.rfcsr_write_field(6, RFCSR6_R2, 1)?;
        self.ldo_core_pulse()?;
        self.rx_filter_calibration()?;
        self.led_open_drain_enable()?;
        self.normal_mode_setup_3xxx()
    }

    /// Baseband setup run once the RT3593 RF registers are programmed
    fn rt3593_post_bbp_init(&mut self) -> Result<(), Rt2800Error> {
        let mld = self.rx_chain_num != 1;
        self.bbp_write_field(105, BBP105_MLD, mld as u8)?;
        self.bbp4_mac_if_ctrl()?;
        // TX beamforming stays off: BBP163 = 0x9d
        self.bbp_write_table(&[
            (92, 0x02), (82, 0x82), (106, 0x05), (104, 0x92), (88, 0x90), (148, 0xc8),
            (47, 0x48), (120, 0x50), (163, 0x9d),
        ])?;
        // SNR mapping
        self.bbp_write_table(&[(142, 6), (143, 160), (142, 7), (143, 161), (142, 8), (143, 162)])?;
        // ADC/DAC control, RX AGC energy lower bound
        self.bbp_write_table(&[(31, 0x08), (68, 0x0b), (105, 0x04)])
    }

    fn init_rfcsr_3593(&mut self) -> Result<(), Rt2800Error> {
        // GPIO #4 and #7 no longer drive LNA PE
        self.modify_reg(GPIO_SWITCH, |reg| {
            GPIO_SWITCH_4.set(reg, 0);
            GPIO_SWITCH_7.set(reg, 0);
        })?;

        self.rfcsr_write_table(RFCSR_3593)?;
        self.rfcsr_write_field(2, RFCSR2_RESCAL_EN, 1)?;
        self.freq_cal_mode1()?;
        self.rfcsr_write_field(18, RFCSR18_XO_TUNE_BYPASS, 1)?;

        self.modify_reg(LDO_CFG0, |reg| {
            LDO_CFG0_LDO_CORE_VLEVEL.set(reg, 3);
            LDO_CFG0_BGSEL.set(reg, 1);
        })?;
        self.msleep(1);
        self.write_field(LDO_CFG0, LDO_CFG0_LDO_CORE_VLEVEL, 0)?;

        // No filter sweep on this chip: fixed starting values
        self.calib.calibration_bw20 = 0x1f;
        self.calib.calibration_bw40 = 0x2f;
        self.save_bbp25_26()?;

        self.led_open_drain_enable()?;
        self.normal_mode_setup_3593()?;
        self.rt3593_post_bbp_init()
    }

    fn init_rfcsr_5350(&mut self) -> Result<(), Rt2800Error> {
        self.rfcsr_write_table(&[
            (0, 0xf0), (1, 0x23), (2, 0x50), (3, 0x08), (4, 0x49), (5, 0x10), (6, 0xe0), (7, 0x00),
            (8, 0xf1), (9, 0x02), (10, 0x53), (11, 0x4a), (12, 0x46),
        ])?;
        let rfcsr13 = if self.bus.clk_is_20mhz() { 0x1f } else { 0x9f };
        self.rfcsr_write(13, rfcsr13)?;
        self.rfcsr_write_table(RFCSR_5350)
    }

    fn init_rfcsr_3883(&mut self) -> Result<(), Rt2800Error> {
        // ECO revision of the SoC is not exposed, assume 5
        const ECO: u8 = 5;

        self.rf_init_calibration(2)?;
        self.rfcsr_write_table(RFCSR_3883)?;

        self.bbp_write_table(&[(137, 0x0f), (163, 0x9d), (105, 0x05)])?;
        self.bbp_write_table(super::bbp::BBP_ITXBF_TIMEOUT)?;
        self.bbp_write_table(super::bbp::BBP_INBAND_RXWI)?;

        if ECO == 5 {
            self.rfcsr_write(32, 0xd8)?;
            self.rfcsr_write(33, 0x32)?;
        }

        let mut rfcsr = self.rfcsr_read(2)?;
        RFCSR2_RESCAL_BP.set(&mut rfcsr, 0);
        RFCSR2_RESCAL_EN.set(&mut rfcsr, 1);
        self.rfcsr_write(2, rfcsr)?;
        self.msleep(1);
        RFCSR2_RESCAL_EN.set(&mut rfcsr, 0);
        self.rfcsr_write(2, rfcsr)?;

        self.rfcsr_write_field(1, RFCSR1_RF_BLOCK_EN, 1)?;
        self.rfcsr_modify(6, |r| *r |= 0xc0)?;
        self.rfcsr_modify(22, |r| *r |= 0x20)?;
        self.rfcsr_modify(46, |r| *r |= 0x20)?;
        self.rfcsr_modify(20, |r| *r &= !0xee)?;
        Ok(())
    }

    fn init_rfcsr_5390(&mut self) -> Result<(), Rt2800Error> {
        let rev_f = self.chip.rev_gte(ChipFamily::Rt5390, REV_RT5390F);
        let usb = self.chip.bus.is_usb();
        let pick = |later: u8, early: u8| if rev_f { later } else { early };

        self.rf_init_calibration(2)?;
        self.rfcsr_write_table(&[(1, 0x0f), (2, 0x80), (3, 0x88), (5, 0x10), (6, pick(0xe0, 0xa0))])?;
        self.rfcsr_write_table(&[
            (7, 0x00), (10, 0x53), (11, 0x4a), (12, 0x46), (13, 0x9f), (14, 0x00), (15, 0x00), (16, 0x00),
            (18, 0x03), (19, 0x00), (20, 0x00), (21, 0x00), (22, 0x20), (23, 0x00), (24, 0x00),
        ])?;
        self.rfcsr_write(25, if usb && rev_f { 0x80 } else { 0xc0 })?;
        self.rfcsr_write_table(&[
            (26, 0x00), (27, 0x09), (28, 0x00), (29, 0x10), (30, 0x10), (31, 0x80), (32, 0x80), (33, 0x00),
            (34, 0x07), (35, 0x12), (36, 0x00), (37, 0x08), (38, 0x85), (39, 0x1b), (40, 0x0b), (41, 0xbb),
            (42, 0xd2), (43, 0x9a), (44, 0x0e), (45, 0xa2),
        ])?;
        self.rfcsr_write_table(&[
            (46, pick(0x73, 0x7b)), (47, 0x00), (48, 0x10), (49, 0x94), (52, 0x38),
            (53, pick(0x00, 0x84)), (54, 0x78), (55, 0x44), (56, pick(0x42, 0x22)),
            (57, 0x80), (58, 0x7f), (59, 0x8f), (60, 0x45),
        ])?;
        let rfcsr61 = match (rev_f, usb) {
            (true, true) => 0xd1,
            (true, false) => 0xd5,
            (false, true) => 0xdd,
            (false, false) => 0xb5,
        };
        self.rfcsr_write(61, rfcsr61)?;
        self.rfcsr_write_table(&[(62, 0x00), (63, 0x00)])?;

        self.normal_mode_setup_5xxx()?;
        self.led_open_drain_enable()
    }

    fn init_rfcsr_5392(&mut self) -> Result<(), Rt2800Error> {
        self.rf_init_calibration(2)?;
        self.rfcsr_write_table(RFCSR_5392)?;
        self.normal_mode_setup_5xxx()?;
        self.led_open_drain_enable()
    }

    fn init_rfcsr_5592(&mut self) -> Result<(), Rt2800Error> {
        self.rf_init_calibration(30)?;
        self.rfcsr_write_table(RFCSR_5592)?;
        self.msleep(1);
        self.freq_cal_mode1()?;

        // DC filter
        if self.chip.rev_gte(ChipFamily::Rt5592, REV_RT5592C) {
            self.bbp_write(103, 0xc0)?;
        }
        self.normal_mode_setup_5xxx()?;
        if self.chip.rev_lt(ChipFamily::Rt5592, REV_RT5592C) {
            self.rfcsr_write(27, 0x03)?;
        }
        self.led_open_drain_enable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rx_filter_targets_per_family() {
        assert_eq!(rx_filter_targets(ChipFamily::Rt3070), (0x16, 0x19));
        assert_eq!(rx_filter_targets(ChipFamily::Rt3572), (0x13, 0x15));
    }

    #[test]
    fn tables_stay_in_rf_range() {
        for table in [RFCSR_305X_SOC, RFCSR_30XX, RFCSR_3290, RFCSR_3352, RFCSR_3390, RFCSR_3572,
                      RFCSR_3593, RFCSR_5350, RFCSR_3883, RFCSR_5392, RFCSR_5592] {
            assert!(table.iter().all(|&(reg, _)| reg < 64));
        }
        // RFCSR17 holds the crystal trim, never overwritten by the RT3883 table
        assert!(RFCSR_3883.iter().all(|&(reg, _)| reg != 17));
        assert_eq!(RFCSR_5592.last(), Some(&(2, 0x80)));
    }
}
