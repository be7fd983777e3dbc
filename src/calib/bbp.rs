//! Baseband initialisation tables, one per chip family

use embedded_hal::blocking::delay::DelayUs;

use crate::chip::{REV_RT2860C, REV_RT2860D, REV_RT3070F, REV_RT3071E, REV_RT3090E, REV_RT3390E, REV_RT3593E, REV_RT5370G, REV_RT5390R, REV_RT5592C};
use crate::eeprom::{EepromField, NIC_CONF0_RXPATH, NIC_CONF0_TXPATH, NIC_CONF1_ANT_DIVERSITY};
use crate::regs::bbp::*;
use crate::regs::mac::{GPIO_CTRL, GPIO_CTRL_DIR3, GPIO_CTRL_DIR6, GPIO_CTRL_VAL3, GPIO_CTRL_VAL6};
use crate::{ChipFamily, RegisterBus, Rt2800, Rt2800Error};

use super::BbpTable;

const BBP_305X_SOC: &[(u8, u8)] = &[
    (31, 0x08), (65, 0x2c), (66, 0x38), (69, 0x12), (73, 0x10), (70, 0x0a),
    (78, 0x0e), (80, 0x08), (82, 0x62), (83, 0x6a), (84, 0x99), (86, 0x00),
    (91, 0x04), (92, 0x00), (103, 0xc0), (105, 0x01), (106, 0x35),
];

/// Common start of the RT3593/RT3883/RT5592 tables
const BBP_EARLY: &[(u8, u8)] = &[
    (65, 0x2c), (66, 0x38), (68, 0x0b), (69, 0x12), (70, 0x0a), (73, 0x10),
    (81, 0x37), (82, 0x62), (83, 0x6a), (84, 0x99), (86, 0x00), (91, 0x04),
    (92, 0x00), (103, 0x00), (105, 0x05), (106, 0x35),
];

/// Shared by RT3070/71/90, RT3390 and RT3572 up to BBP92
const BBP_30XX: &[(u8, u8)] = &[
    (65, 0x2c), (66, 0x38), (69, 0x12), (73, 0x10), (70, 0x0a), (79, 0x13),
    (80, 0x05), (81, 0x33), (82, 0x62), (83, 0x6a), (84, 0x99), (86, 0x00),
    (91, 0x04), (92, 0x00),
];

const BBP_3290: &[(u8, u8)] = &[
    (31, 0x08), (65, 0x2c), (66, 0x38), (68, 0x0b), (69, 0x12), (73, 0x13),
    (75, 0x46), (76, 0x28), (77, 0x58), (70, 0x0a), (74, 0x0b), (79, 0x18),
    (80, 0x09), (81, 0x33), (82, 0x62), (83, 0x7a), (84, 0x9a), (86, 0x38),
    (91, 0x04), (92, 0x02), (103, 0xc0), (104, 0x92), (105, 0x1c), (106, 0x03),
    (128, 0x12), (67, 0x24), (143, 0x04), (142, 0x99), (150, 0x30), (151, 0x2e),
    (152, 0x20), (153, 0x34), (154, 0x40), (155, 0x3b), (253, 0x04),
];

/// ITxBF timeout set to 0x9c40 (1000 ms)
pub(super) const BBP_ITXBF_TIMEOUT: &[(u8, u8)] = &[
    (179, 0x02), (180, 0x00), (182, 0x40), (180, 0x01), (182, 0x9c), (179, 0x00),
];

/// Inband interface reprogrammed for proper RXWI values
pub(super) const BBP_INBAND_RXWI: &[(u8, u8)] = &[
    (142, 0x04), (143, 0x3b), (142, 0x06), (143, 0xa0), (142, 0x07), (143, 0xa1),
    (142, 0x08), (143, 0xa2), (148, 0xc8),
];

const BBP_3883: &[(u8, u8)] = &[
    (4, 0x50), (47, 0x48), (86, 0x46), (88, 0x90), (92, 0x02), (103, 0xc0),
    (104, 0x92), (105, 0x34), (106, 0x12), (120, 0x50), (137, 0x0f), (163, 0x9d),
];

const BBP_5592: &[(u8, u8)] = &[
    (20, 0x06), (31, 0x08), (65, 0x2c), (68, 0xdd), (69, 0x1a), (70, 0x05),
    (73, 0x13), (74, 0x0f), (75, 0x4f), (76, 0x28), (77, 0x59), (84, 0x9a),
    (86, 0x38), (88, 0x90), (91, 0x04), (92, 0x02), (95, 0x9a), (98, 0x12),
    (103, 0xc0), (104, 0x92), (105, 0x3c), (106, 0x35), (128, 0x12), (134, 0xd0),
    (135, 0xf6), (137, 0x0f),
];

/// GLRT registers 128 to 211 (RT5592)
const GLRT_5592: [u8; 84] = [
    0xe0, 0x1f, 0x38, 0x32, 0x08, 0x28, 0x19, 0x0a, 0xff, 0x00,
    0x16, 0x10, 0x10, 0x0b, 0x36, 0x2c, 0x26, 0x24, 0x42, 0x36,
    0x30, 0x2d, 0x4c, 0x46, 0x3d, 0x40, 0x3e, 0x42, 0x3d, 0x40,
    0x3c, 0x34, 0x2c, 0x2f, 0x3c, 0x35, 0x2e, 0x2a, 0x49, 0x41,
    0x36, 0x31, 0x30, 0x30, 0x0e, 0x0d, 0x28, 0x21, 0x1c, 0x16,
    0x50, 0x4a, 0x43, 0x40, 0x10, 0x10, 0x10, 0x10, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x7d, 0x14, 0x32, 0x2c, 0x36, 0x4c, 0x43, 0x2c,
    0x2e, 0x36, 0x30, 0x6e,
];

const BBP_6352: &[(u8, u8)] = &[
    (3, 0x08), (4, 0x00), (6, 0x08), (14, 0x09), (15, 0xff), (16, 0x01),
    (20, 0x06), (21, 0x00), (22, 0x00), (27, 0x00), (28, 0x00), (30, 0x00),
    (31, 0x48), (47, 0x40), (62, 0x00), (63, 0x00), (64, 0x00), (65, 0x2c),
    (66, 0x1c), (67, 0x20), (68, 0xdd), (69, 0x10), (70, 0x05), (73, 0x18),
    (74, 0x0f), (75, 0x60), (76, 0x44), (77, 0x59), (78, 0x1e), (79, 0x1c),
    (80, 0x0c), (81, 0x3a), (82, 0xb6), (83, 0x9a), (84, 0x9a), (86, 0x38),
    (88, 0x90), (91, 0x04), (92, 0x02), (95, 0x9a), (96, 0x00), (103, 0xc0),
    (104, 0x92), (105, 0x3c), (106, 0x12), (109, 0x00), (134, 0x10), (135, 0xa6),
    (137, 0x04), (142, 0x30), (143, 0xf7), (160, 0xec), (161, 0xc4), (162, 0x77),
    (163, 0xf9), (164, 0x00), (165, 0x00), (186, 0x00), (187, 0x00), (188, 0x00),
    (186, 0x00), (187, 0x01), (188, 0x00), (189, 0x00),
    (91, 0x06), (92, 0x04), (93, 0x54), (99, 0x50), (148, 0x84), (167, 0x80),
    (178, 0xff), (106, 0x13),
];

/// G band GLRT registers (RT6352)
const GLRT_6352: &[(u8, u8)] = &[
    (0, 0x00), (1, 0x14), (2, 0x20), (3, 0x0a), (10, 0x16), (11, 0x06),
    (12, 0x02), (13, 0x07), (14, 0x05), (15, 0x09), (16, 0x20), (17, 0x08),
    (18, 0x4a), (19, 0x00), (20, 0x00), (128, 0xe0), (129, 0x1f), (130, 0x4f),
    (131, 0x32), (132, 0x08), (133, 0x28), (134, 0x19), (135, 0x0a), (138, 0x16),
    (139, 0x10), (140, 0x10), (141, 0x1a), (142, 0x36), (143, 0x2c), (144, 0x26),
    (145, 0x24), (146, 0x42), (147, 0x40), (148, 0x30), (149, 0x29), (150, 0x4c),
    (151, 0x46), (152, 0x3d), (153, 0x40), (154, 0x3e), (155, 0x38), (156, 0x3d),
    (157, 0x2f), (158, 0x3c), (159, 0x34), (160, 0x2c), (161, 0x2f), (162, 0x3c),
    (163, 0x35), (164, 0x2e), (165, 0x2f), (166, 0x49), (167, 0x41), (168, 0x36),
    (169, 0x39), (170, 0x30), (171, 0x30), (172, 0x0e), (173, 0x0d), (174, 0x28),
    (175, 0x21), (176, 0x1c), (177, 0x16), (178, 0x50), (179, 0x4a), (180, 0x43),
    (181, 0x50), (182, 0x10), (183, 0x10), (184, 0x10), (185, 0x10), (200, 0x7d),
    (201, 0x14), (202, 0x32), (203, 0x2c), (204, 0x36), (205, 0x4c), (206, 0x43),
    (207, 0x2c), (208, 0x2e), (209, 0x36), (210, 0x30), (211, 0x6e),
];

/// G band DC offset registers (RT6352)
const DCOC_6352: &[(u8, u8)] = &[
    (140, 0x0c), (141, 0x00), (142, 0x10), (143, 0x10), (144, 0x10), (145, 0x10),
    (146, 0x08), (147, 0x40), (148, 0x04), (149, 0x04), (150, 0x08), (151, 0x08),
    (152, 0x03), (153, 0x03), (154, 0x03), (155, 0x02), (156, 0x40), (157, 0x40),
    (158, 0x64), (159, 0x64),
];

impl<B, D> Rt2800<B, D> where
    B: RegisterBus, D: DelayUs<u32>
{
    /// Write a list of (register, value) pairs to the baseband, in order
    pub(crate) fn bbp_write_table(&mut self, table: &[(u8, u8)]) -> Result<(), Rt2800Error> {
        for &(reg, value) in table {
            self.bbp_write(reg, value)?;
        }
        Ok(())
    }

    /// Run one baseband initialisation table
    pub(crate) fn run_bbp_table(&mut self, table: BbpTable) -> Result<(), Rt2800Error> {
        debug!("BBP init table {:?}", table);
        match table {
            BbpTable::Soc305x => {
                self.bbp_write_table(BBP_305X_SOC)?;
                self.init_bbp_28xx()
            }
            BbpTable::Rt28xx => self.init_bbp_28xx(),
            BbpTable::Rt30xx => self.init_bbp_30xx(),
            BbpTable::Rt3290 => self.init_bbp_3290(),
            BbpTable::Rt3352 => self.init_bbp_3352(),
            BbpTable::Rt3390 => self.init_bbp_3390(),
            BbpTable::Rt3572 => self.init_bbp_3572(),
            BbpTable::Rt3593 => self.init_bbp_3593(),
            BbpTable::Rt3883 => self.init_bbp_3883(),
            BbpTable::Rt53xx => self.init_bbp_53xx(),
            BbpTable::Rt5592 => self.init_bbp_5592(),
            BbpTable::Rt6352 => self.init_bbp_6352(),
        }
    }

    /// Apply the baseband override words stored in EEPROM
    pub(crate) fn bbp_eeprom_overrides(&mut self) -> Result<(), Rt2800Error> {
        for i in 0..crate::eeprom::EEPROM_BBP_SIZE {
            let word = self.eeprom.read_from_array(EepromField::BbpStart, i);
            if word != 0xffff && word != 0x0000 {
                let [value, reg] = word.to_le_bytes();
                self.bbp_write(reg, value)?;
            }
        }
        Ok(())
    }

    /// Set the MAC interface control bit: avoids data loss and CRC errors
    pub(crate) fn bbp4_mac_if_ctrl(&mut self) -> Result<(), Rt2800Error> {
        self.bbp_write_field(4, BBP4_MAC_IF_CTRL, 1)
    }

    fn init_freq_calibration(&mut self) -> Result<(), Rt2800Error> {
        self.bbp_write(142, 1)?;
        self.bbp_write(143, 57)
    }

    /// Power down TX DAC and RX ADC of the unused chains
    pub(crate) fn disable_unused_dac_adc(&mut self) -> Result<(), Rt2800Error> {
        let nic_conf0 = self.eeprom.read(EepromField::NicConf0);
        let mut value = self.bbp_read(138)?;
        if NIC_CONF0_TXPATH.get(nic_conf0) == 1 {
            value |= 0x20;
        }
        if NIC_CONF0_RXPATH.get(nic_conf0) == 1 {
            value &= !0x02;
        }
        self.bbp_write(138, value)
    }

    /// RX default antenna from the EEPROM diversity mode: main unless mode 3
    fn bbp_default_antenna(&mut self) -> Result<bool, Rt2800Error> {
        let main = NIC_CONF1_ANT_DIVERSITY.get(self.eeprom.read(EepromField::NicConf1)) != 3;
        self.bbp_write_field(152, BBP152_RX_DEFAULT_ANT, main as u8)?;
        Ok(main)
    }

    fn init_bbp_28xx(&mut self) -> Result<(), Rt2800Error> {
        self.bbp_write(65, 0x2c)?;
        self.bbp_write(66, 0x38)?;
        if self.chip.rev_eq(ChipFamily::Rt2860, REV_RT2860C) {
            self.bbp_write(69, 0x16)?;
            self.bbp_write(73, 0x12)?;
        } else {
            self.bbp_write(69, 0x12)?;
            self.bbp_write(73, 0x10)?;
        }
        self.bbp_write_table(&[(70, 0x0a), (81, 0x37), (82, 0x62), (83, 0x6a)])?;
        let bbp84 = if self.chip.rev_eq(ChipFamily::Rt2860, REV_RT2860D) { 0x19 } else { 0x99 };
        self.bbp_write(84, bbp84)?;
        self.bbp_write_table(&[(86, 0x00), (91, 0x04), (92, 0x00), (103, 0x00), (105, 0x05), (106, 0x35)])
    }

    fn init_bbp_30xx(&mut self) -> Result<(), Rt2800Error> {
        self.bbp_write_table(BBP_30XX)?;
        let dc_filter = self.chip.rev_gte(ChipFamily::Rt3070, REV_RT3070F)
            || self.chip.rev_gte(ChipFamily::Rt3071, REV_RT3071E)
            || self.chip.rev_gte(ChipFamily::Rt3090, REV_RT3090E);
        self.bbp_write(103, if dc_filter { 0xc0 } else { 0x00 })?;
        self.bbp_write(105, 0x05)?;
        self.bbp_write(106, 0x35)?;
        if matches!(self.chip.family, ChipFamily::Rt3071 | ChipFamily::Rt3090) {
            self.disable_unused_dac_adc()?;
        }
        Ok(())
    }

    fn init_bbp_3290(&mut self) -> Result<(), Rt2800Error> {
        self.bbp4_mac_if_ctrl()?;
        self.bbp_write_table(BBP_3290)?;
        self.bbp_write_field(47, BBP47_TSSI_ADC6, 1)?;
        // 5-bit ADC for acquisition, 8-bit ADC for data
        self.bbp_modify(3, |v| {
            BBP3_ADC_MODE_SWITCH.set(v, 1);
            BBP3_ADC_INIT_MODE.set(v, 1);
        })?;
        Ok(())
    }

    fn init_bbp_3352(&mut self) -> Result<(), Rt2800Error> {
        let rt5350 = self.chip.is(ChipFamily::Rt5350);
        self.bbp_write_table(&[
            (3, 0x00), (4, 0x50), (31, 0x08), (47, 0x48), (65, 0x2c), (66, 0x38),
            (68, 0x0b), (69, 0x12), (73, 0x13), (75, 0x46), (76, 0x28), (77, 0x59),
            (70, 0x0a), (78, 0x0e), (80, 0x08), (81, 0x37), (82, 0x62),
        ])?;
        if rt5350 {
            self.bbp_write_table(&[(83, 0x7a), (84, 0x9a)])?;
        } else {
            self.bbp_write_table(&[(83, 0x6a), (84, 0x99)])?;
        }
        self.bbp_write_table(&[(86, 0x38), (88, 0x90), (91, 0x04), (92, 0x02), (103, 0xc0), (104, 0x92)])?;
        if rt5350 {
            self.bbp_write_table(&[(105, 0x3c), (106, 0x03)])?;
        } else {
            self.bbp_write_table(&[(105, 0x34), (106, 0x05)])?;
        }
        self.bbp_write_table(&[(120, 0x50), (137, 0x0f), (163, 0xbd)])?;
        self.bbp_write_table(BBP_ITXBF_TIMEOUT)?;
        self.bbp_write_table(BBP_INBAND_RXWI)?;
        if rt5350 {
            // Software antenna for OFDM and CCK, then clear the previously selected antenna
            self.bbp_write_table(&[(150, 0x40), (151, 0x30), (152, 0xa3), (154, 0x00)])?;
        }
        Ok(())
    }

    fn init_bbp_3390(&mut self) -> Result<(), Rt2800Error> {
        self.bbp_write_table(BBP_30XX)?;
        let dc_filter = self.chip.rev_gte(ChipFamily::Rt3390, REV_RT3390E);
        self.bbp_write(103, if dc_filter { 0xc0 } else { 0x00 })?;
        self.bbp_write(105, 0x05)?;
        self.bbp_write(106, 0x35)?;
        self.disable_unused_dac_adc()
    }

    fn init_bbp_3572(&mut self) -> Result<(), Rt2800Error> {
        self.bbp_write(31, 0x08)?;
        self.bbp_write_table(BBP_30XX)?;
        self.bbp_write_table(&[(103, 0xc0), (105, 0x05), (106, 0x35)])?;
        self.disable_unused_dac_adc()
    }

    fn init_bbp_3593(&mut self) -> Result<(), Rt2800Error> {
        self.bbp_write_table(BBP_EARLY)?;
        self.bbp_write_table(&[(79, 0x13), (80, 0x05), (81, 0x33), (137, 0x0f), (84, 0x19)])?;
        // DC filter
        if self.chip.rev_gte(ChipFamily::Rt3593, REV_RT3593E) {
            self.bbp_write(103, 0xc0)?;
        }
        Ok(())
    }

    fn init_bbp_3883(&mut self) -> Result<(), Rt2800Error> {
        self.bbp_write_table(BBP_EARLY)?;
        self.bbp_write_table(BBP_3883)?;
        self.bbp_write_table(BBP_ITXBF_TIMEOUT)?;
        self.bbp_write_table(BBP_INBAND_RXWI)
    }

    fn init_bbp_53xx(&mut self) -> Result<(), Rt2800Error> {
        let rt5392 = self.chip.is(ChipFamily::Rt5392);
        self.bbp4_mac_if_ctrl()?;
        self.bbp_write_table(&[
            (31, 0x08), (65, 0x2c), (66, 0x38), (68, 0x0b), (69, 0x12), (73, 0x13),
            (75, 0x46), (76, 0x28), (77, 0x59), (70, 0x0a), (79, 0x13), (80, 0x05),
            (81, 0x33), (82, 0x62), (83, 0x7a), (84, 0x9a), (86, 0x38),
        ])?;
        if rt5392 {
            self.bbp_write(88, 0x90)?;
        }
        self.bbp_write(91, 0x04)?;
        self.bbp_write(92, 0x02)?;
        if rt5392 {
            self.bbp_write(95, 0x9a)?;
            self.bbp_write(98, 0x12)?;
        }
        self.bbp_write_table(&[(103, 0xc0), (104, 0x92), (105, 0x3c)])?;
        self.bbp_write(106, if rt5392 { 0x12 } else { 0x03 })?;
        self.bbp_write(128, 0x12)?;
        if rt5392 {
            self.bbp_write(134, 0xd0)?;
            self.bbp_write(135, 0xf6)?;
        }
        self.disable_unused_dac_adc()?;

        let main = NIC_CONF1_ANT_DIVERSITY.get(self.eeprom.read(EepromField::NicConf1)) != 3;

        // Bluetooth combo card: antenna selected through GPIO3 or GPIO6
        if self.chip.caps.has_bt_coexist() {
            self.modify_reg(GPIO_CTRL, |reg| {
                GPIO_CTRL_DIR3.set(reg, 0);
                GPIO_CTRL_DIR6.set(reg, 0);
                GPIO_CTRL_VAL3.set_bool(reg, main);
                GPIO_CTRL_VAL6.set_bool(reg, !main);
            })?;
        }

        // Hardware RX antenna diversity: disable the software antenna selection
        if self.chip.rev_gte(ChipFamily::Rt5390, REV_RT5390R) || self.chip.rev_gte(ChipFamily::Rt5390, REV_RT5370G) {
            self.bbp_write_table(&[(150, 0), (151, 0), (154, 0)])?;
        }

        self.bbp_default_antenna()?;
        self.init_freq_calibration()
    }

    fn init_bbp_5592(&mut self) -> Result<(), Rt2800Error> {
        self.bbp_write_table(BBP_EARLY)?;
        let mld = self.rx_chain_num == 2;
        self.bbp_write_field(105, BBP105_MLD, mld as u8)?;
        self.bbp4_mac_if_ctrl()?;
        self.bbp_write_table(BBP_5592)?;

        // Generalized likelihood ratio test
        for (i, &value) in GLRT_5592.iter().enumerate() {
            self.bbp_glrt_write(128 + i as u8, value)?;
        }

        self.bbp4_mac_if_ctrl()?;
        self.bbp_default_antenna()?;

        if self.chip.rev_gte(ChipFamily::Rt5592, REV_RT5592C) {
            self.bbp_write_field(254, BBP254_BIT7, 1)?;
        }

        self.init_freq_calibration()?;
        self.bbp_write(84, 0x19)?;
        if self.chip.rev_gte(ChipFamily::Rt5592, REV_RT5592C) {
            self.bbp_write(103, 0xc0)?;
        }
        Ok(())
    }

    fn init_bbp_6352(&mut self) -> Result<(), Rt2800Error> {
        // Maximum likelihood detection for 2 streams
        let mld = self.rx_chain_num == 2;
        self.bbp_write_field(105, BBP105_MLD, mld as u8)?;
        self.bbp4_mac_if_ctrl()?;

        // I/Q swap fix
        self.bbp_modify(1, |v| *v |= 0x04)?;

        self.bbp_write_table(BBP_6352)?;
        for &(reg, value) in GLRT_6352 {
            self.bbp_glrt_write(reg, value)?;
        }
        for &(reg, value) in DCOC_6352 {
            self.bbp_dcoc_write(reg, value)?;
        }
        self.bbp4_mac_if_ctrl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glrt_6352_in_window() {
        // The GLRT window only addresses registers up to 221
        assert!(GLRT_6352.iter().all(|&(reg, _)| reg <= 221));
        assert_eq!(GLRT_5592.len(), 211 - 128 + 1);
    }

    #[test]
    fn early_table_ends_with_bbp106() {
        assert_eq!(BBP_EARLY.last(), Some(&(106, 0x35)));
        assert_eq!(BBP_305X_SOC.first(), Some(&(31, 0x08)));
    }
}
