//! # EEPROM / eFuse calibration data
//!
//! The device keeps its per-unit configuration (antenna paths, RF type, LED behaviour, RSSI offsets,
//! baseband override words, IQ calibration bytes, ...) in an EEPROM or in an eFuse block.
//! It is read once into an [`EepromImage`] and then accessed through named [`EepromField`]s.
//!
//! Two layouts exist: RT3593/RT3883 use an extended map where most fields moved. A few offsets
//! intentionally hold two fields, for example the TX mixer gain shares its word with an RSSI offset.
//!
//! ## Available Methods
//! - [`efuse_detect`](Rt2800::efuse_detect) - Check if the configuration lives in eFuse
//! - [`read_efuse`](Rt2800::read_efuse) - Read the whole eFuse content into the image
//! - [`read_eeprom`](Rt2800::read_eeprom) - Fill the image from eFuse or from the bus EEPROM
//! - [`validate_eeprom`](Rt2800::validate_eeprom) - Patch unprogrammed words with defaults, clamp corrupt offsets
//! - [`init_eeprom`](Rt2800::init_eeprom) - Derive RF type, chains, capabilities, frequency offset and LED words

use embedded_hal::blocking::delay::DelayUs;

use crate::chip::{REV_RT5370G, REV_RT5390R};
use crate::channel::Antenna;
use crate::field::Field16;
use crate::indirect::RegisterBank;
use crate::regs::mac::*;
use crate::{ChipFamily, RegisterBus, RfType, Rt2800, Rt2800Error};

/// Size of the EEPROM image in bytes
pub const EEPROM_SIZE: usize = 0x200;
/// Number of 16-bit words in the image
pub const EEPROM_WORDS: usize = EEPROM_SIZE / 2;
/// Number of baseband override words following [`EepromField::BbpStart`]
pub const EEPROM_BBP_SIZE: usize = 16;

/// EIRP limit below which the power limit capability is set
pub const EIRP_MAX_TX_POWER_LIMIT: u16 = 0x50;

/// RSSI offsets above this magnitude are considered corrupt
const RSSI_OFFSET_MAX: i16 = 10;

/// LED mode written when the EEPROM leaves it unprogrammed
const LED_MODE_TXRX_ACTIVITY: u16 = 1;

// NIC_CONF0: antenna paths and RF type
pub const NIC_CONF0_RXPATH: Field16 = Field16::new(0x000f);
pub const NIC_CONF0_TXPATH: Field16 = Field16::new(0x00f0);
pub const NIC_CONF0_RF_TYPE: Field16 = Field16::new(0x0f00);

// NIC_CONF1: board options
pub const NIC_CONF1_HW_RADIO: Field16 = Field16::new(0x0001);
pub const NIC_CONF1_EXTERNAL_TX_ALC: Field16 = Field16::new(0x0002);
pub const NIC_CONF1_EXTERNAL_LNA_2G: Field16 = Field16::new(0x0004);
pub const NIC_CONF1_EXTERNAL_LNA_5G: Field16 = Field16::new(0x0008);
pub const NIC_CONF1_CARDBUS_ACCEL: Field16 = Field16::new(0x0010);
pub const NIC_CONF1_BW40M_SB_2G: Field16 = Field16::new(0x0020);
pub const NIC_CONF1_BW40M_SB_5G: Field16 = Field16::new(0x0040);
pub const NIC_CONF1_WPS_PBC: Field16 = Field16::new(0x0080);
pub const NIC_CONF1_BW40M_2G: Field16 = Field16::new(0x0100);
pub const NIC_CONF1_BW40M_5G: Field16 = Field16::new(0x0200);
pub const NIC_CONF1_BROADBAND_EXT_LNA: Field16 = Field16::new(0x0400);
pub const NIC_CONF1_ANT_DIVERSITY: Field16 = Field16::new(0x1800);
pub const NIC_CONF1_INTERNAL_TX_ALC: Field16 = Field16::new(0x2000);
pub const NIC_CONF1_BT_COEXIST: Field16 = Field16::new(0x4000);
pub const NIC_CONF1_DAC_TEST: Field16 = Field16::new(0x8000);
/// RT3352 reuses the two top bits for the external PA of each TX chain
pub const NIC_CONF1_EXTERNAL_TX0_PA_3352: Field16 = Field16::new(0x4000);
pub const NIC_CONF1_EXTERNAL_TX1_PA_3352: Field16 = Field16::new(0x8000);

// FREQ: crystal offset and LED mode
pub const FREQ_OFFSET: Field16 = Field16::new(0x00ff);
pub const FREQ_LED_MODE: Field16 = Field16::new(0x7f00);
pub const FREQ_LED_POLARITY: Field16 = Field16::new(0x1000);

// LNA gains
pub const LNA_BG: Field16 = Field16::new(0x00ff);
pub const LNA_A0: Field16 = Field16::new(0xff00);

// RSSI offsets
pub const RSSI_BG_OFFSET0: Field16 = Field16::new(0x00ff);
pub const RSSI_BG_OFFSET1: Field16 = Field16::new(0xff00);
pub const RSSI_BG2_OFFSET2: Field16 = Field16::new(0x00ff);
pub const RSSI_BG2_LNA_A1: Field16 = Field16::new(0xff00);
pub const RSSI_A_OFFSET0: Field16 = Field16::new(0x00ff);
pub const RSSI_A_OFFSET1: Field16 = Field16::new(0xff00);
pub const RSSI_A2_OFFSET2: Field16 = Field16::new(0x00ff);
pub const RSSI_A2_LNA_A2: Field16 = Field16::new(0xff00);

// Extended map only
pub const EXT_LNA2_A1: Field16 = Field16::new(0x00ff);
pub const EXT_LNA2_A2: Field16 = Field16::new(0xff00);

pub const TXMIXER_GAIN_BG_VAL: Field16 = Field16::new(0x0007);
pub const TXMIXER_GAIN_A_VAL: Field16 = Field16::new(0x0007);

pub const EIRP_MAX_TX_POWER_2GHZ: Field16 = Field16::new(0x00ff);
pub const EIRP_MAX_TX_POWER_5GHZ: Field16 = Field16::new(0xff00);

// Baseband override words
pub const BBP_VALUE: Field16 = Field16::new(0x00ff);
pub const BBP_REG_ID: Field16 = Field16::new(0xff00);

/// Byte offsets of the TX IQ calibration values
pub mod iq {
    pub const GAIN_CAL_TX0_2G: usize = 0x130;
    pub const PHASE_CAL_TX0_2G: usize = 0x131;
    pub const GAIN_CAL_TX1_2G: usize = 0x133;
    pub const PHASE_CAL_TX1_2G: usize = 0x134;
    pub const RF_IQ_COMPENSATION_CONTROL: usize = 0x13c;
    pub const RF_IQ_IMBALANCE_COMPENSATION_CONTROL: usize = 0x13d;
    pub const GAIN_CAL_TX0_CH36_TO_CH64_5G: usize = 0x144;
    pub const PHASE_CAL_TX0_CH36_TO_CH64_5G: usize = 0x145;
    pub const GAIN_CAL_TX0_CH100_TO_CH138_5G: usize = 0x146;
    pub const PHASE_CAL_TX0_CH100_TO_CH138_5G: usize = 0x147;
    pub const GAIN_CAL_TX0_CH140_TO_CH165_5G: usize = 0x148;
    pub const PHASE_CAL_TX0_CH140_TO_CH165_5G: usize = 0x149;
    pub const GAIN_CAL_TX1_CH36_TO_CH64_5G: usize = 0x14a;
    pub const PHASE_CAL_TX1_CH36_TO_CH64_5G: usize = 0x14b;
    pub const GAIN_CAL_TX1_CH100_TO_CH138_5G: usize = 0x14c;
    pub const PHASE_CAL_TX1_CH100_TO_CH138_5G: usize = 0x14d;
    pub const GAIN_CAL_TX1_CH140_TO_CH165_5G: usize = 0x14e;
    pub const PHASE_CAL_TX1_CH140_TO_CH165_5G: usize = 0x14f;
}

/// EEPROM layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromMap {
    #[default]
    Default,
    /// RT3593 / RT3883
    Extended,
}

/// Named EEPROM words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromField {
    ChipId,
    Version,
    MacAddr0,
    MacAddr1,
    MacAddr2,
    NicConf0,
    NicConf1,
    NicConf2,
    Freq,
    LedAgConf,
    LedActConf,
    LedPolarity,
    Lna,
    ExtLna2,
    RssiBg,
    RssiBg2,
    TxMixerGainBg,
    RssiA,
    RssiA2,
    TxMixerGainA,
    EirpMaxTxPower,
    TxPowerDelta,
    TxPowerBg1,
    TxPowerBg2,
    ExtTxPowerBg3,
    TssiBoundBg1,
    TssiBoundBg2,
    TssiBoundBg3,
    TssiBoundBg4,
    TssiBoundBg5,
    TxPowerA1,
    TxPowerA2,
    ExtTxPowerA3,
    TxPowerInit,
    TssiBoundA1,
    TssiBoundA2,
    TssiBoundA3,
    TssiBoundA4,
    TssiBoundA5,
    TxPowerByRate,
    BbpStart,
}

const FIELD_COUNT: usize = EepromField::BbpStart as usize + 1;

/// Word offsets, indexed by [`EepromField`]. 0 marks a field absent from the layout.
const MAP_DEFAULT: [u16; FIELD_COUNT] = [
    0x0000, 0x0001, 0x0002, 0x0003, 0x0004, // ChipId .. MacAddr2
    0x001a, 0x001b, 0x0021, 0x001d,         // NicConf0, NicConf1, NicConf2, Freq
    0x001e, 0x001f, 0x0020, 0x0022, 0x0000, // LedAgConf, LedActConf, LedPolarity, Lna, ExtLna2
    0x0023, 0x0024, 0x0024,                 // RssiBg, RssiBg2, TxMixerGainBg
    0x0025, 0x0026, 0x0026,                 // RssiA, RssiA2, TxMixerGainA
    0x0027, 0x0028, 0x0029, 0x0030, 0x0000, // EirpMaxTxPower, TxPowerDelta, TxPowerBg1, TxPowerBg2, ExtTxPowerBg3
    0x0037, 0x0038, 0x0039, 0x003a, 0x003b, // TssiBoundBg1..5
    0x003c, 0x0053, 0x0000, 0x0068,         // TxPowerA1, TxPowerA2, ExtTxPowerA3, TxPowerInit
    0x006a, 0x006b, 0x006c, 0x006d, 0x006e, // TssiBoundA1..5
    0x006f, 0x0078,                         // TxPowerByRate, BbpStart
];

const MAP_EXTENDED: [u16; FIELD_COUNT] = [
    0x0000, 0x0001, 0x0002, 0x0003, 0x0004,
    0x001a, 0x001b, 0x001c, 0x0022,
    0x0023, 0x0024, 0x0025, 0x0026, 0x0027,
    0x0028, 0x0029, 0x0000,
    0x002a, 0x002b, 0x0000,
    0x0020, 0x0000, 0x0030, 0x0037, 0x003e,
    0x0045, 0x0046, 0x0047, 0x0048, 0x0049,
    0x004b, 0x0065, 0x007f, 0x0000,
    0x009a, 0x009b, 0x009c, 0x009d, 0x009e,
    0x00a0, 0x0000,
];

impl EepromMap {
    /// Word index of `field`. Fields absent from this layout resolve to 0 and are reported.
    pub fn word_index(&self, field: EepromField) -> usize {
        let table = match self {
            EepromMap::Default => &MAP_DEFAULT,
            EepromMap::Extended => &MAP_EXTENDED,
        };
        let index = table[field as usize] as usize;
        if index == 0 && field != EepromField::ChipId {
            error!("Invalid access of EEPROM word {:?}", field);
        }
        index
    }
}

/// Local copy of the EEPROM/eFuse content
#[derive(Clone, PartialEq, Eq)]
pub struct EepromImage {
    words: [u16; EEPROM_WORDS],
    map: EepromMap,
}

impl core::fmt::Debug for EepromImage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EepromImage").field("map", &self.map).finish_non_exhaustive()
    }
}

impl Default for EepromImage {
    fn default() -> Self {
        Self::blank()
    }
}

impl EepromImage {
    /// Unprogrammed image: every word reads 0xffff
    pub fn blank() -> Self {
        Self { words: [0xffff; EEPROM_WORDS], map: EepromMap::Default }
    }

    /// Image from a raw little-endian dump. Missing bytes stay unprogrammed.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut image = Self::blank();
        image.load_bytes(data);
        image
    }

    /// Same content interpreted with another layout
    pub fn with_map(mut self, map: EepromMap) -> Self {
        self.map = map;
        self
    }

    pub fn map(&self) -> EepromMap {
        self.map
    }

    pub(crate) fn load_bytes(&mut self, data: &[u8]) {
        for (word, chunk) in self.words.iter_mut().zip(data.chunks_exact(2)) {
            *word = u16::from_le_bytes([chunk[0], chunk[1]]);
        }
    }

    /// Raw word at `index` (0xffff past the end)
    pub fn word(&self, index: usize) -> u16 {
        self.words.get(index).copied().unwrap_or(0xffff)
    }

    pub fn set_word(&mut self, index: usize, value: u16) {
        if let Some(w) = self.words.get_mut(index) {
            *w = value;
        }
    }

    /// Raw byte at `offset`
    pub fn byte(&self, offset: usize) -> u8 {
        let bytes = self.word(offset / 2).to_le_bytes();
        bytes[offset % 2]
    }

    /// Read a named word
    pub fn read(&self, field: EepromField) -> u16 {
        self.word(self.map.word_index(field))
    }

    /// Overwrite a named word
    pub fn write(&mut self, field: EepromField, value: u16) {
        let index = self.map.word_index(field);
        self.set_word(index, value);
    }

    /// Read the word `offset` positions after a named array start
    pub fn read_from_array(&self, field: EepromField, offset: usize) -> u16 {
        self.word(self.map.word_index(field) + offset)
    }

    /// MAC address stored in the first three words after the version
    pub fn mac_address(&self) -> [u8; 6] {
        let mut mac = [0; 6];
        for (i, field) in [EepromField::MacAddr0, EepromField::MacAddr1, EepromField::MacAddr2].into_iter().enumerate() {
            mac[2 * i..2 * i + 2].copy_from_slice(&self.read(field).to_le_bytes());
        }
        mac
    }

    fn modify<F>(&mut self, field: EepromField, f: F) where F: FnOnce(&mut u16) {
        let mut word = self.read(field);
        f(&mut word);
        self.write(field, word);
    }
}

/// Clear an RSSI offset whose signed magnitude is out of range
fn clamp_rssi_offset(word: &mut u16, field: Field16) {
    let offset = field.get(*word) as u8 as i8 as i16;
    if offset.abs() > RSSI_OFFSET_MAX {
        field.set(word, 0);
    }
}

/// LNA gain byte left unprogrammed (or zeroed) by the manufacturer
fn lna_unset(value: u16) -> bool {
    value == 0x00 || value == 0xff
}

impl<B, D> Rt2800<B, D> where
    B: RegisterBus, D: DelayUs<u32>
{
    fn efuse_registers(&self) -> (u32, [u32; 4]) {
        if self.chip.is(ChipFamily::Rt3290) {
            (EFUSE_CTRL_3290, [EFUSE_DATA0_3290, EFUSE_DATA1_3290, EFUSE_DATA2_3290, EFUSE_DATA3_3290])
        } else {
            (EFUSE_CTRL, [EFUSE_DATA0, EFUSE_DATA1, EFUSE_DATA2, EFUSE_DATA3])
        }
    }

    /// Configuration is stored in eFuse rather than in an external EEPROM
    pub fn efuse_detect(&mut self) -> Result<bool, Rt2800Error> {
        let (ctrl, _) = self.efuse_registers();
        Ok(EFUSE_CTRL_PRESENT.is_set(self.read_reg(ctrl)?))
    }

    /// Read one 8-word eFuse block starting at word `index`
    fn efuse_read_block(&mut self, index: usize) -> Result<(), Rt2800Error> {
        let (ctrl, data) = self.efuse_registers();
        self.modify_reg(ctrl, |reg| {
            EFUSE_CTRL_ADDRESS_IN.set(reg, index as u32);
            EFUSE_CTRL_MODE.set(reg, 0);
            EFUSE_CTRL_KICK.set(reg, 1);
        })?;
        self.poll_until_clear(RegisterBank::Efuse, ctrl, EFUSE_CTRL_KICK)?;

        // Data registers come out from last to first
        for (i, &offset) in data.iter().rev().enumerate() {
            let value = self.read_reg(offset)?;
            self.eeprom.set_word(index + 2 * i, value as u16);
            self.eeprom.set_word(index + 2 * i + 1, (value >> 16) as u16);
        }
        Ok(())
    }

    /// Read the whole eFuse content into the EEPROM image
    pub fn read_efuse(&mut self) -> Result<(), Rt2800Error> {
        for index in (0..EEPROM_WORDS).step_by(8) {
            self.efuse_read_block(index)?;
        }
        Ok(())
    }

    /// Fill the EEPROM image, from eFuse when present, otherwise through the bus
    pub fn read_eeprom(&mut self) -> Result<(), Rt2800Error> {
        if self.efuse_detect()? {
            debug!("Reading configuration from eFuse");
            return self.read_efuse();
        }
        let mut raw = [0u8; EEPROM_SIZE];
        self.bus.read_eeprom(&mut raw).map_err(|_| Rt2800Error::Bus)?;
        self.eeprom.load_bytes(&raw);
        Ok(())
    }

    /// Patch unprogrammed words with defaults and clear out-of-range RSSI offsets
    pub fn validate_eeprom(&mut self) -> Result<(), Rt2800Error> {
        let family = self.chip.family;
        let extended = self.eeprom.map() == EepromMap::Extended;
        let ee = &mut self.eeprom;

        let word = ee.read(EepromField::NicConf0);
        if word == 0xffff {
            let mut word = 0;
            NIC_CONF0_RXPATH.set(&mut word, 2);
            NIC_CONF0_TXPATH.set(&mut word, 1);
            NIC_CONF0_RF_TYPE.set(&mut word, RfType::Rf2820.id());
            ee.write(EepromField::NicConf0, word);
            debug!("EEPROM antenna: {:#06x}", word);
        } else if matches!(family, ChipFamily::Rt2860 | ChipFamily::Rt2872) {
            // RT28x0 has at most 2 RX streams
            ee.modify(EepromField::NicConf0, |w| {
                if NIC_CONF0_RXPATH.get(*w) > 2 {
                    NIC_CONF0_RXPATH.set(w, 2);
                }
            });
        }

        if ee.read(EepromField::NicConf1) == 0xffff {
            ee.write(EepromField::NicConf1, 0);
            debug!("EEPROM NIC: 0x0000");
        }

        let mut word = ee.read(EepromField::Freq);
        if word & 0x00ff == 0x00ff {
            FREQ_OFFSET.set(&mut word, 0);
            ee.write(EepromField::Freq, word);
            debug!("EEPROM freq: {:#06x}", word);
        }
        if word & 0xff00 == 0xff00 {
            FREQ_LED_MODE.set(&mut word, LED_MODE_TXRX_ACTIVITY);
            FREQ_LED_POLARITY.set(&mut word, 0);
            ee.write(EepromField::Freq, word);
            ee.write(EepromField::LedAgConf, 0x5555);
            ee.write(EepromField::LedActConf, 0x2221);
            ee.write(EepromField::LedPolarity, 0xa9f8);
            debug!("EEPROM LED mode: {:#06x}", word);
        }

        // LNA0 is the reference for the other gains, it is never validated itself
        let default_lna_gain = LNA_A0.get(ee.read(EepromField::Lna));

        ee.modify(EepromField::RssiBg, |w| {
            clamp_rssi_offset(w, RSSI_BG_OFFSET0);
            clamp_rssi_offset(w, RSSI_BG_OFFSET1);
        });
        ee.modify(EepromField::RssiBg2, |w| {
            clamp_rssi_offset(w, RSSI_BG2_OFFSET2);
            if !extended && lna_unset(RSSI_BG2_LNA_A1.get(*w)) {
                RSSI_BG2_LNA_A1.set(w, default_lna_gain);
            }
        });
        ee.modify(EepromField::RssiA, |w| {
            clamp_rssi_offset(w, RSSI_A_OFFSET0);
            clamp_rssi_offset(w, RSSI_A_OFFSET1);
        });
        ee.modify(EepromField::RssiA2, |w| {
            clamp_rssi_offset(w, RSSI_A2_OFFSET2);
            if !extended && lna_unset(RSSI_A2_LNA_A2.get(*w)) {
                RSSI_A2_LNA_A2.set(w, default_lna_gain);
            }
        });
        if extended {
            ee.modify(EepromField::ExtLna2, |w| {
                if lna_unset(EXT_LNA2_A1.get(*w)) {
                    EXT_LNA2_A1.set(w, default_lna_gain);
                }
                if lna_unset(EXT_LNA2_A2.get(*w)) {
                    EXT_LNA2_A2.set(w, default_lna_gain);
                }
            });
        }
        Ok(())
    }

    /// RF type: from the chip id word on the newer families, fixed on SoCs, else from NIC_CONF0
    fn eeprom_rf_id(&self) -> u16 {
        match self.chip.family {
            ChipFamily::Rt3290 | ChipFamily::Rt5390 | ChipFamily::Rt5392 | ChipFamily::Rt6352 =>
                self.eeprom.read(EepromField::ChipId),
            ChipFamily::Rt3352 => RfType::Rf3322.id(),
            ChipFamily::Rt3883 => RfType::Rf3853.id(),
            ChipFamily::Rt5350 => RfType::Rf5350.id(),
            _ => NIC_CONF0_RF_TYPE.get(self.eeprom.read(EepromField::NicConf0)),
        }
    }

    fn txmixer_gain(&self, field: EepromField, val: Field16) -> u8 {
        if matches!(self.chip.family, ChipFamily::Rt3593 | ChipFamily::Rt3883) {
            return 0;
        }
        let word = self.eeprom.read(field);
        if word & 0x00ff != 0x00ff { val.get_u8(word) } else { 0 }
    }

    /// Derive the RF type, chain counts, capabilities, frequency offset and LED word from the EEPROM
    pub fn init_eeprom(&mut self) -> Result<(), Rt2800Error> {
        let rf_id = self.eeprom_rf_id();
        let Some(rf) = RfType::from_id(rf_id) else {
            error!("Invalid RF chipset {:#06x} detected", rf_id);
            return Err(Rt2800Error::UnsupportedRfType(rf_id));
        };
        info!("Found RF chipset {:?}", rf);
        self.chip.rf = Some(rf);

        let nic_conf0 = self.eeprom.read(EepromField::NicConf0);
        self.tx_chain_num = NIC_CONF0_TXPATH.get_u8(nic_conf0);
        self.rx_chain_num = NIC_CONF0_RXPATH.get_u8(nic_conf0);

        let nic_conf1 = self.eeprom.read(EepromField::NicConf1);
        let family = self.chip.family;
        self.rx_antenna = match family {
            ChipFamily::Rt3070 | ChipFamily::Rt3090 | ChipFamily::Rt3352 | ChipFamily::Rt3390
                if NIC_CONF1_ANT_DIVERSITY.get(nic_conf1) == 3 => Antenna::B,
            _ => Antenna::A,
        };

        let mut caps = self.chip.caps;
        if NIC_CONF1_EXTERNAL_LNA_5G.is_set(nic_conf1) {
            caps = caps.with_external_lna_a();
        }
        if NIC_CONF1_EXTERNAL_LNA_2G.is_set(nic_conf1) {
            caps = caps.with_external_lna_bg();
        }
        if NIC_CONF1_HW_RADIO.is_set(nic_conf1) {
            caps = caps.with_hw_button();
        }
        if family != ChipFamily::Rt3352 && NIC_CONF1_BT_COEXIST.is_set(nic_conf1) {
            caps = caps.with_bt_coexist();
        }
        if family == ChipFamily::Rt3352 {
            if NIC_CONF1_EXTERNAL_TX0_PA_3352.is_set(nic_conf1) {
                caps = caps.with_external_pa_tx0();
            }
            if NIC_CONF1_EXTERNAL_TX1_PA_3352.is_set(nic_conf1) {
                caps = caps.with_external_pa_tx1();
            }
        }
        // Hardware RX diversity
        if self.chip.rev_gte(ChipFamily::Rt5390, REV_RT5390R) || self.chip.rev_gte(ChipFamily::Rt5390, REV_RT5370G) {
            caps = caps.with_ant_diversity();
        }

        let freq = self.eeprom.read(EepromField::Freq);
        self.freq_offset = FREQ_OFFSET.get_u8(freq);
        self.led_mcu_reg = freq;

        let eirp = self.eeprom.read(EepromField::EirpMaxTxPower);
        if EIRP_MAX_TX_POWER_2GHZ.get(eirp) < EIRP_MAX_TX_POWER_LIMIT {
            caps = caps.with_power_limit();
        }
        self.chip.caps = caps;

        self.calib.txmixer_gain_24g = self.txmixer_gain(EepromField::TxMixerGainBg, TXMIXER_GAIN_BG_VAL);
        self.calib.txmixer_gain_5g = self.txmixer_gain(EepromField::TxMixerGainA, TXMIXER_GAIN_A_VAL);

        debug!("EEPROM: {} TX / {} RX chains, caps {:?}, freq offset {:#x}",
            self.tx_chain_num, self.rx_chain_num, caps, self.freq_offset);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_alias_rssi_and_mixer_gain() {
        let map = EepromMap::Default;
        assert_eq!(map.word_index(EepromField::TxMixerGainBg), map.word_index(EepromField::RssiBg2));
        assert_eq!(map.word_index(EepromField::TxMixerGainA), map.word_index(EepromField::RssiA2));
        assert_eq!(map.word_index(EepromField::BbpStart), 0x78);
        assert_eq!(EepromMap::Extended.word_index(EepromField::Freq), 0x22);
        assert_eq!(EepromMap::Extended.word_index(EepromField::Lna), 0x26);
    }

    #[test]
    fn absent_field_resolves_to_zero() {
        assert_eq!(EepromMap::Default.word_index(EepromField::ExtLna2), 0);
        assert_eq!(EepromMap::Extended.word_index(EepromField::TxMixerGainBg), 0);
        assert_eq!(EepromMap::Extended.word_index(EepromField::BbpStart), 0);
    }

    #[test]
    fn field_round_trip() {
        let mut ee = EepromImage::blank();
        ee.write(EepromField::NicConf1, 0x1234);
        assert_eq!(ee.read(EepromField::NicConf1), 0x1234);
        assert_eq!(ee.word(0x1b), 0x1234);
        // The other layout sees another word
        let ext = ee.clone().with_map(EepromMap::Extended);
        assert_eq!(ext.read(EepromField::Freq), 0xffff);
    }

    #[test]
    fn bytes_and_mac() {
        let mut raw = [0xffu8; 16];
        raw[4..10].copy_from_slice(&[0x00, 0x13, 0xef, 0x01, 0x02, 0x03]);
        let ee = EepromImage::from_bytes(&raw);
        assert_eq!(ee.mac_address(), [0x00, 0x13, 0xef, 0x01, 0x02, 0x03]);
        assert_eq!(ee.byte(5), 0x13);
        assert_eq!(ee.word(0x40), 0xffff);
        assert_eq!(ee.word(EEPROM_WORDS + 3), 0xffff);
    }

    #[test]
    fn rssi_offset_clamp() {
        let mut w = 0x0a_f6; // +10 / -10 stay
        clamp_rssi_offset(&mut w, RSSI_BG_OFFSET0);
        clamp_rssi_offset(&mut w, RSSI_BG_OFFSET1);
        assert_eq!(w, 0x0a_f6);

        let mut w = 0x0b_f5; // +11 / -11 cleared
        clamp_rssi_offset(&mut w, RSSI_BG_OFFSET0);
        clamp_rssi_offset(&mut w, RSSI_BG_OFFSET1);
        assert_eq!(w, 0);
    }
}
