//! # Channel configuration
//!
//! A channel switch runs one RF-specific programming routine, picked from the RF type through
//! [`RF_TABLE`](crate::chip::RF_TABLE), followed by a common baseband/MAC post-processing:
//! LNA gain dependent AGC registers, band selection, PA/LNA enables for the active chains,
//! IQ imbalance compensation on RT5592/RT6352 and a clear of the channel statistics counters.
//!
//! The synthesizer words come from a per-chip channel table owned by the caller and are passed
//! in a [`ChannelDescriptor`]. Their meaning depends on the RF:
//!
//! | RF              | rf1     | rf2       | rf3       | rf4      |
//! |-----------------|---------|-----------|-----------|----------|
//! | RF2xxx          | word 1  | word 2    | word 3    | word 4   |
//! | RFCSR based     | N       | R         | K         | -        |
//! | RF5592          | N       | K         | mod       | R        |
//! | RF7620          | N       | Ksd[7:0]  | Ksd[15:8] | Ksd[17:16] |
//!
//! ## Available Methods
//! - [`config`](Rt2800::config) - Select the LNA gain, switch channel and reset the link tuner
//! - [`config_channel`](Rt2800::config_channel) - Program the synthesizer and the band dependent registers
//! - [`config_lna_gain`](Rt2800::config_lna_gain) - Select the EEPROM LNA gain for a channel
//! - [`iq_calibrate`](Rt2800::iq_calibrate) - Load the per-channel IQ compensation bytes into the baseband

use embedded_hal::blocking::delay::DelayUs;

use crate::chip::{BusKind, ChipFamily, RfType, REV_RT2860C};
use crate::eeprom::{iq, EepromField, EXT_LNA2_A1, EXT_LNA2_A2, LNA_A0, LNA_BG, RSSI_A2_LNA_A2, RSSI_BG2_LNA_A1};
use crate::regs::bbp::*;
use crate::regs::mac::*;
use crate::regs::rfcsr::*;
use crate::{RegisterBus, Rt2800, Rt2800Error};

mod legacy;
mod rf3xxx;
mod rf5xxx;

/// RF programming routine, one per synthesizer generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelRoutine {
    /// Legacy 32-bit RF words (RF2820/2850/2720/2750)
    Rf2xxx,
    Rf3xxx,
    Rf3052,
    Rf3053,
    Rf3853,
    Rf3290,
    Rf3322,
    /// RF3070 and the RF53xx series
    Rf53xx,
    Rf55xx,
    Rf7620,
}

/// Frequency band
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Band {
    /// 2.4GHz, channels 1 to 14
    #[default]
    Bg,
    /// 5GHz
    A,
}

impl Band {
    pub fn from_channel(channel: u8) -> Self {
        if channel <= 14 { Band::Bg } else { Band::A }
    }
}

/// Antenna used by a single RX chain
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Antenna {
    #[default]
    A,
    B,
}

/// Synthesizer words of one channel
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RfWords {
    pub rf1: u32,
    pub rf2: u32,
    pub rf3: u32,
    pub rf4: u32,
}

impl RfWords {
    pub const fn new(rf1: u32, rf2: u32, rf3: u32, rf4: u32) -> Self {
        Self { rf1, rf2, rf3, rf4 }
    }
}

/// N/K/R divider triple of the RFCSR based synthesizers
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelSpec {
    pub n: u32,
    pub k: u32,
    pub r: u32,
}

impl From<ChannelSpec> for RfWords {
    fn from(nkr: ChannelSpec) -> Self {
        RfWords { rf1: nkr.n, rf2: nkr.r, rf3: nkr.k, rf4: 0 }
    }
}

/// Target channel of a switch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelDescriptor {
    /// IEEE channel number
    pub channel: u8,
    pub band: Band,
    /// 40MHz channel
    pub ht40: bool,
    /// Secondary channel below the primary one
    pub ht40_minus: bool,
    pub rf: RfWords,
    /// Default TX power per chain
    pub default_power1: i8,
    pub default_power2: i8,
    pub default_power3: i8,
}

impl ChannelDescriptor {
    /// 20MHz channel, band derived from the channel number
    pub fn new(channel: u8, rf: impl Into<RfWords>) -> Self {
        Self {
            channel,
            band: Band::from_channel(channel),
            rf: rf.into(),
            ..Default::default()
        }
    }

    /// 40MHz channel, secondary channel above (`minus == false`) or below
    pub fn with_ht40(mut self, minus: bool) -> Self {
        self.ht40 = true;
        self.ht40_minus = minus;
        self
    }

    pub fn with_power(mut self, power1: i8, power2: i8, power3: i8) -> Self {
        self.default_power1 = power1;
        self.default_power2 = power2;
        self.default_power3 = power3;
        self
    }

    pub fn is_5ghz(&self) -> bool {
        self.band == Band::A
    }

    fn bg(&self) -> bool {
        self.channel <= 14
    }
}

/// Enable the RFCSR1 power-up bits of the first `tx`/`rx` chains (up to 3)
pub(crate) fn enable_chains(rfcsr: &mut u8, tx: u8, rx: u8) {
    for (chain, (tx_pd, rx_pd)) in [
        (RFCSR1_TX0_PD, RFCSR1_RX0_PD),
        (RFCSR1_TX1_PD, RFCSR1_RX1_PD),
        (RFCSR1_TX2_PD, RFCSR1_RX2_PD),
    ].into_iter().enumerate() {
        tx_pd.set_bool(rfcsr, (chain as u8) < tx);
        rx_pd.set_bool(rfcsr, (chain as u8) < rx);
    }
}

/// Compute the PA/LNA pin enables for a channel and chain count
pub(crate) fn tx_pin_value(mut tx_pin: u32, channel: u8, tx: u8, rx: u8, bt_coexist: bool) -> u32 {
    let a = channel > 14;
    let pa = [
        (TX_PIN_CFG_PA_PE_A0_EN, TX_PIN_CFG_PA_PE_G0_EN),
        (TX_PIN_CFG_PA_PE_A1_EN, TX_PIN_CFG_PA_PE_G1_EN),
        (TX_PIN_CFG_PA_PE_A2_EN, TX_PIN_CFG_PA_PE_G2_EN),
    ];
    let lna = [
        (TX_PIN_CFG_LNA_PE_A0_EN, TX_PIN_CFG_LNA_PE_G0_EN),
        (TX_PIN_CFG_LNA_PE_A1_EN, TX_PIN_CFG_LNA_PE_G1_EN),
        (TX_PIN_CFG_LNA_PE_A2_EN, TX_PIN_CFG_LNA_PE_G2_EN),
    ];
    for (chain, (pe_a, pe_g)) in pa.into_iter().enumerate().take(tx.min(3) as usize) {
        pe_a.set_bool(&mut tx_pin, a);
        // BT coexistence keeps the 2.4GHz PA of the first chain on
        pe_g.set_bool(&mut tx_pin, !a || (chain == 0 && bt_coexist));
    }
    for (pe_a, pe_g) in lna.into_iter().take(rx.min(3) as usize) {
        pe_a.set_bool(&mut tx_pin, a);
        pe_g.set_bool(&mut tx_pin, !a);
    }
    TX_PIN_CFG_RFTR_EN.set(&mut tx_pin, 1);
    TX_PIN_CFG_TRSW_EN.set(&mut tx_pin, 1);
    tx_pin
}

/// EEPROM byte offsets of one IQ compensation value, per channel range
struct IqCal {
    selector: u8,
    offsets: [usize; 4],
}

const IQ_CAL: [IqCal; 4] = [
    IqCal { selector: 0x2c, offsets: [
        iq::GAIN_CAL_TX0_2G, iq::GAIN_CAL_TX0_CH36_TO_CH64_5G,
        iq::GAIN_CAL_TX0_CH100_TO_CH138_5G, iq::GAIN_CAL_TX0_CH140_TO_CH165_5G] },
    IqCal { selector: 0x2d, offsets: [
        iq::PHASE_CAL_TX0_2G, iq::PHASE_CAL_TX0_CH36_TO_CH64_5G,
        iq::PHASE_CAL_TX0_CH100_TO_CH138_5G, iq::PHASE_CAL_TX0_CH140_TO_CH165_5G] },
    IqCal { selector: 0x4a, offsets: [
        iq::GAIN_CAL_TX1_2G, iq::GAIN_CAL_TX1_CH36_TO_CH64_5G,
        iq::GAIN_CAL_TX1_CH100_TO_CH138_5G, iq::GAIN_CAL_TX1_CH140_TO_CH165_5G] },
    IqCal { selector: 0x4b, offsets: [
        iq::PHASE_CAL_TX1_2G, iq::PHASE_CAL_TX1_CH36_TO_CH64_5G,
        iq::PHASE_CAL_TX1_CH100_TO_CH138_5G, iq::PHASE_CAL_TX1_CH140_TO_CH165_5G] },
];

/// Index of the IQ calibration range holding a channel
pub(crate) fn iq_range(channel: u8) -> Option<usize> {
    match channel {
        0..=14 => Some(0),
        36..=64 => Some(1),
        100..=138 => Some(2),
        140..=165 => Some(3),
        _ => None,
    }
}

impl<B, D> Rt2800<B, D> where
    B: RegisterBus, D: DelayUs<u32>
{
    /// Switch to a new channel: refresh the LNA gain, program the channel
    /// and restart the link tuner from its default gain.
    pub fn config(&mut self, desc: &ChannelDescriptor) -> Result<(), Rt2800Error> {
        self.config_lna_gain(desc.channel);
        self.config_channel(desc)?;
        self.reset_tuner()
    }

    /// Select the LNA gain stored in EEPROM for the range holding `channel`
    pub fn config_lna_gain(&mut self, channel: u8) -> u8 {
        let ext_lna2 = matches!(self.chip.family, ChipFamily::Rt3593 | ChipFamily::Rt3883);
        let ee = &self.eeprom;
        let gain = match channel {
            0..=14 => LNA_BG.get_u8(ee.read(EepromField::Lna)),
            15..=64 => LNA_A0.get_u8(ee.read(EepromField::Lna)),
            65..=128 if ext_lna2 => EXT_LNA2_A1.get_u8(ee.read(EepromField::ExtLna2)),
            65..=128 => RSSI_BG2_LNA_A1.get_u8(ee.read(EepromField::RssiBg2)),
            _ if ext_lna2 => EXT_LNA2_A2.get_u8(ee.read(EepromField::ExtLna2)),
            _ => RSSI_A2_LNA_A2.get_u8(ee.read(EepromField::RssiA2)),
        };
        self.lna_gain = gain;
        gain
    }

    /// Program the RF for `desc` then the band dependent baseband and MAC registers
    pub fn config_channel(&mut self, desc: &ChannelDescriptor) -> Result<(), Rt2800Error> {
        let rf = self.rf();
        let routine = rf.info().routine;
        debug!("Configuring channel {} ({:?}, ht40={}) with {:?}", desc.channel, desc.band, desc.ht40, routine);
        self.channel = *desc;

        if self.chip.is(ChipFamily::Rt3883) {
            self.rt3883_bbp_adjust(desc)?;
        }

        match routine {
            ChannelRoutine::Rf2xxx => self.config_channel_rf2xxx(desc)?,
            ChannelRoutine::Rf3xxx => self.config_channel_rf3xxx(desc)?,
            ChannelRoutine::Rf3052 => self.config_channel_rf3052(desc)?,
            ChannelRoutine::Rf3053 => self.config_channel_rf3053(desc)?,
            ChannelRoutine::Rf3853 => self.config_channel_rf3853(desc)?,
            ChannelRoutine::Rf3290 => self.config_channel_rf3290(desc)?,
            ChannelRoutine::Rf3322 => self.config_channel_rf3322(desc)?,
            ChannelRoutine::Rf53xx => self.config_channel_rf53xx(desc)?,
            ChannelRoutine::Rf55xx => self.config_channel_rf55xx(desc)?,
            ChannelRoutine::Rf7620 => self.config_channel_rf7620(desc)?,
        }

        if rf.has_rfcsr30_bw() {
            let (tx_h20m, rx_h20m) = if rf == RfType::Rf3322 {
                (RF3322_RFCSR30_TX_H20M, RF3322_RFCSR30_RX_H20M)
            } else {
                (RFCSR30_TX_H20M, RFCSR30_RX_H20M)
            };
            self.rfcsr_modify(30, |r| {
                tx_h20m.set_bool(r, desc.ht40);
                rx_h20m.set_bool(r, desc.ht40);
            })?;
            self.rfcsr_write_field(3, RFCSR3_VCOCAL_EN, 1)?;
        }

        self.config_channel_bbp(desc)?;
        self.config_channel_pins(desc)?;
        self.config_channel_agc(desc)?;

        self.bbp_set_bandwidth(desc.ht40)?;
        self.bbp_write_field(3, BBP3_HT40_MINUS, desc.ht40_minus as u8)?;

        if self.chip.rev_eq(ChipFamily::Rt2860, REV_RT2860C) {
            let values = if desc.ht40 { [0x1a, 0x0a, 0x16] } else { [0x16, 0x08, 0x11] };
            for (word, value) in [69, 70, 73].into_iter().zip(values) {
                self.bbp_write(word, value)?;
            }
        }

        self.msleep(1);

        // Read to clear
        for offset in [CH_IDLE_STA, CH_BUSY_STA, CH_BUSY_STA_SEC] {
            self.read_reg(offset)?;
        }

        if matches!(self.chip.family, ChipFamily::Rt3352 | ChipFamily::Rt5350) {
            self.bbp_write_field(49, BBP49_UPDATE_FLAG, 0)?;
        }
        Ok(())
    }

    /// LNA gain dependent AGC and the band specific baseband tuning
    fn config_channel_bbp(&mut self, desc: &ChannelDescriptor) -> Result<(), Rt2800Error> {
        let family = self.chip.family;
        let lna = self.lna_gain;
        let agc = 0x37u8.wrapping_sub(lna);
        for word in [62, 63, 64] {
            self.bbp_write(word, agc)?;
        }

        match family {
            ChipFamily::Rt3352 => {
                let gain = 0x26u8.wrapping_add(lna);
                self.bbp_write(27, 0x00)?;
                self.bbp_write(66, gain)?;
                self.bbp_write(27, 0x20)?;
                self.bbp_write(66, gain)?;
                self.bbp_write(86, 0x38)?;
                self.bbp_write(83, 0x6a)?;
            }
            ChipFamily::Rt3593 => {
                // No CCK detection on 5GHz
                self.bbp_write(70, if desc.bg() { 0x0a } else { 0x00 })?;
                self.bbp_write(105, if desc.ht40 { 0x04 } else { 0x34 })?;
                self.bbp_write(77, 0x98)?;
            }
            ChipFamily::Rt3883 => {
                self.bbp_write(86, if self.rx_chain_num > 1 { 0x46 } else { 0x00 })?;
            }
            _ => self.bbp_write(86, 0x00)?,
        }

        let ext_lna_family = matches!(family, ChipFamily::Rt3593 | ChipFamily::Rt3883);
        if desc.bg() {
            if !matches!(family, ChipFamily::Rt5390 | ChipFamily::Rt5392 | ChipFamily::Rt6352) {
                if self.chip.caps.has_external_lna_bg() {
                    self.bbp_write(82, 0x62)?;
                    self.bbp_write(75, 0x46)?;
                } else {
                    self.bbp_write(82, if family == ChipFamily::Rt3593 { 0x62 } else { 0x84 })?;
                    self.bbp_write(75, 0x50)?;
                }
                if ext_lna_family {
                    self.bbp_write(83, 0x8a)?;
                }
            }
        } else {
            match family {
                ChipFamily::Rt3572 => self.bbp_write(82, 0x94)?,
                ChipFamily::Rt3593 | ChipFamily::Rt3883 => self.bbp_write(82, 0x82)?,
                ChipFamily::Rt6352 => {}
                _ => self.bbp_write(82, 0xf2)?,
            }
            if ext_lna_family {
                self.bbp_write(83, 0x9a)?;
            }
            self.bbp_write(75, if self.chip.caps.has_external_lna_a() { 0x46 } else { 0x50 })?;
        }

        self.modify_reg(TX_BAND_CFG, |reg| {
            TX_BAND_CFG_HT40_MINUS.set_bool(reg, desc.ht40_minus);
            TX_BAND_CFG_A.set_bool(reg, !desc.bg());
            TX_BAND_CFG_BG.set_bool(reg, desc.bg());
        })?;
        Ok(())
    }

    /// PA/LNA enables of the active chains
    fn config_channel_pins(&mut self, desc: &ChannelDescriptor) -> Result<(), Rt2800Error> {
        let rt3572 = self.chip.is(ChipFamily::Rt3572);
        if rt3572 {
            self.rfcsr_write(8, 0)?;
        }

        let base = if self.chip.is(ChipFamily::Rt6352) {
            TX_PIN_CFG_RFRX_EN.with(self.read_reg(TX_PIN_CFG)?, 1)
        } else {
            0
        };
        let tx_pin = tx_pin_value(base, desc.channel, self.tx_chain_num, self.rx_chain_num,
            self.chip.caps.has_bt_coexist());
        self.write_reg(TX_PIN_CFG, tx_pin)?;

        if rt3572 {
            self.rfcsr_write(8, 0x80)?;
        }
        Ok(())
    }

    /// Family specific AGC init (BBP66) and band GPIOs
    fn config_channel_agc(&mut self, desc: &ChannelDescriptor) -> Result<(), Rt2800Error> {
        let lna = self.lna_gain;
        let lna_a = ((lna as u16 * 5) / 3) as u8;
        match self.chip.family {
            ChipFamily::Rt3572 => {
                let agc = if desc.bg() { 0x1cu8.wrapping_add(2u8.wrapping_mul(lna)) } else { 0x22u8.wrapping_add(lna_a) };
                self.bbp_write_with_rx_chain(66, agc)?;
            }
            ChipFamily::Rt3593 => {
                let bus = self.chip.bus;
                let bg = desc.bg();
                self.modify_reg(GPIO_CTRL, |reg| {
                    // GPIO8 selects the band, GPIO4 drives the LNA PE (PE2 on GPIO7 for USB)
                    if matches!(bus, BusKind::Usb | BusKind::Pcie) {
                        GPIO_CTRL_DIR8.set(reg, 0);
                        GPIO_CTRL_VAL8.set_bool(reg, bg);
                        GPIO_CTRL_DIR4.set(reg, 0);
                        GPIO_CTRL_VAL4.set(reg, 1);
                    }
                    if bus == BusKind::Usb {
                        GPIO_CTRL_DIR7.set(reg, 0);
                        GPIO_CTRL_VAL7.set(reg, 1);
                    }
                })?;
                let agc = if bg { 0x1cu8.wrapping_add(2u8.wrapping_mul(lna)) } else { 0x22u8.wrapping_add(lna_a) };
                self.bbp_write_with_rx_chain(66, agc)?;
                self.msleep(1);
            }
            ChipFamily::Rt3883 => {
                self.bbp_write(105, if desc.ht40 { 0x04 } else { 0x34 })?;
                let agc = if desc.bg() { 0x2eu8.wrapping_add(lna) } else { 0x20u8.wrapping_add(lna_a) };
                self.bbp_write_with_rx_chain(66, agc)?;
                self.msleep(1);
            }
            family @ (ChipFamily::Rt5592 | ChipFamily::Rt6352) => {
                let mut glrt = 0x10;
                if !desc.ht40 {
                    glrt |= if family == ChipFamily::Rt6352 && self.chip.caps.has_external_lna_bg() { 0x05 } else { 0x0a };
                }
                self.bbp_glrt_write(141, glrt)?;

                let base: u8 = if desc.bg() { 0x1c } else { 0x24 };
                self.bbp_write_with_rx_chain(66, base.wrapping_add(2u8.wrapping_mul(lna)))?;
                self.iq_calibrate(desc.channel)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Write the EEPROM IQ gain/phase compensation of both TX chains for `channel`,
    /// then the global compensation controls (0xff reads as disabled).
    pub fn iq_calibrate(&mut self, channel: u8) -> Result<(), Rt2800Error> {
        let range = iq_range(channel);
        for cal in IQ_CAL.iter() {
            let value = range.map_or(0, |idx| self.eeprom.byte(cal.offsets[idx]));
            self.bbp_dcoc_write(cal.selector, value)?;
        }
        for (selector, offset) in [
            (0x04, iq::RF_IQ_COMPENSATION_CONTROL),
            (0x03, iq::RF_IQ_IMBALANCE_COMPENSATION_CONTROL),
        ] {
            let value = match self.eeprom.byte(offset) {
                0xff => 0,
                v => v,
            };
            self.bbp_dcoc_write(selector, value)?;
        }
        Ok(())
    }

    fn rt3883_bbp_adjust(&mut self, desc: &ChannelDescriptor) -> Result<(), Rt2800Error> {
        let bg = desc.bg();
        self.bbp_write_with_rx_chain(66, if bg { 0x38 } else { 0x48 })?;
        self.bbp_write(69, 0x12)?;
        // CCK detection off on 5GHz
        self.bbp_write(70, if bg { 0x0a } else { 0x00 })?;
        self.bbp_write(73, 0x10)?;
        let agc = if bg { 0x2d } else { 0x1d };
        for word in [62, 63, 64] {
            self.bbp_write(word, agc)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_from_channel() {
        assert_eq!(Band::from_channel(14), Band::Bg);
        assert_eq!(Band::from_channel(36), Band::A);
        let desc = ChannelDescriptor::new(149, ChannelSpec { n: 0x4a, k: 0x2, r: 0x3 });
        assert!(desc.is_5ghz());
        assert_eq!(desc.rf, RfWords::new(0x4a, 0x3, 0x2, 0));
    }

    #[test]
    fn chain_enables() {
        let mut r = 0;
        enable_chains(&mut r, 1, 2);
        assert_eq!(r, 0x08 | 0x04 | 0x10);
        enable_chains(&mut r, 3, 3);
        assert_eq!(r, 0xfc);
        enable_chains(&mut r, 0, 0);
        assert_eq!(r, 0);
    }

    #[test]
    fn tx_pin_per_band() {
        let g = tx_pin_value(0, 6, 1, 2, false);
        assert!(TX_PIN_CFG_PA_PE_G0_EN.is_set(g));
        assert!(!TX_PIN_CFG_PA_PE_A0_EN.is_set(g));
        assert!(!TX_PIN_CFG_PA_PE_G1_EN.is_set(g));
        assert!(TX_PIN_CFG_LNA_PE_G1_EN.is_set(g));
        assert!(TX_PIN_CFG_RFTR_EN.is_set(g) && TX_PIN_CFG_TRSW_EN.is_set(g));

        let a = tx_pin_value(0, 36, 2, 1, true);
        assert!(TX_PIN_CFG_PA_PE_A1_EN.is_set(a));
        assert!(TX_PIN_CFG_PA_PE_G0_EN.is_set(a), "BT coexistence keeps PA G0");
        assert!(!TX_PIN_CFG_PA_PE_G1_EN.is_set(a));
        assert!(!TX_PIN_CFG_LNA_PE_A1_EN.is_set(a));
    }

    #[test]
    fn iq_ranges() {
        assert_eq!(iq_range(1), Some(0));
        assert_eq!(iq_range(64), Some(1));
        assert_eq!(iq_range(100), Some(2));
        assert_eq!(iq_range(165), Some(3));
        assert_eq!(iq_range(96), None);
        assert_eq!(iq_range(139), None);
    }
}
