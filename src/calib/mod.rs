//! # Calibration engine
//!
//! Brings the baseband and RF control registers to a chip-correct state and refines it with
//! the dynamic procedures: RX filter sweep, crystal frequency trim, VCO recalibration and the
//! RT6352 low-pass filter loop.
//!
//! Table selection is a single lookup on the [`ChipIdentity`]: every family carries one baseband
//! table and, for RFCSR-based chips, one RF table in [`CHIP_TABLE`](crate::chip::CHIP_TABLE).
//! Calibration never fails on its own: a chip without RF table keeps its power-on defaults.
//!
//! ## Available Methods
//! - [`init_bbp`](Rt2800::init_bbp) - Run the baseband table then the EEPROM override words
//! - [`init_rfcsr`](Rt2800::init_rfcsr) - Run the RF table, including the RX/LP filter calibrations
//! - [`vco_calibration`](Rt2800::vco_calibration) - Retrigger the VCO calibration and restore the PA enables
//! - [`freq_cal_mode1`](Rt2800::freq_cal_mode1) - Step the crystal trim code toward the EEPROM frequency offset

use embedded_hal::blocking::delay::DelayUs;

use crate::chip::{ChipFamily, ChipIdentity};
use crate::regs::bbp::*;
use crate::regs::mac::*;
use crate::regs::rfcsr::*;
use crate::{RegisterBus, Rt2800, Rt2800Error};

mod bbp;
mod lpf;
mod rfcsr;

/// Baseband initialisation tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BbpTable {
    /// RT305x SoC prelude followed by the RT28xx table
    Soc305x,
    Rt28xx,
    Rt30xx,
    Rt3290,
    /// RT3352 and RT5350
    Rt3352,
    Rt3390,
    Rt3572,
    Rt3593,
    Rt3883,
    /// RT5390 and RT5392
    Rt53xx,
    Rt5592,
    Rt6352,
}

impl BbpTable {
    /// Tables after which the EEPROM baseband override words are applied
    pub fn applies_eeprom_overrides(&self) -> bool {
        !matches!(self, BbpTable::Rt3593 | BbpTable::Rt3883 | BbpTable::Rt5592)
    }
}

/// RF control register initialisation tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RfcsrTable {
    Soc305x,
    /// RT3070, RT3071 and RT3090
    Rt30xx,
    Rt3290,
    Rt3352,
    Rt3390,
    Rt3572,
    Rt3593,
    Rt3883,
    Rt5350,
    Rt5390,
    Rt5392,
    Rt5592,
    Rt6352,
}

/// How a VCO recalibration is triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VcoTrigger {
    /// No VCO calibration for this RF
    None,
    /// RF tuning bit in RFCSR7, no settling delay
    Rfcsr7,
    /// VCOCAL_EN bit in RFCSR3, 1ms settling
    Rfcsr3,
    /// RFCSR4/RFCSR5 sequence of the MT7620 RF, 2ms settling
    Mt7620,
}

impl VcoTrigger {
    /// Settling delay after the trigger, in microseconds
    pub fn settle_us(&self) -> u32 {
        match self {
            VcoTrigger::None | VcoTrigger::Rfcsr7 => 0,
            VcoTrigger::Rfcsr3 => 1000,
            VcoTrigger::Mt7620 => 2000,
        }
    }
}

/// Tables selected for a chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationTables {
    pub bbp: BbpTable,
    pub rfcsr: Option<RfcsrTable>,
}

/// Select the baseband and RF tables for a chip.
/// RT305x SoCs share the RT2872 identifier but run their own tables.
pub fn select_tables(chip: &ChipIdentity) -> CalibrationTables {
    if chip.is_305x_soc() {
        return CalibrationTables { bbp: BbpTable::Soc305x, rfcsr: Some(RfcsrTable::Soc305x) };
    }
    let info = chip.info();
    CalibrationTables { bbp: info.bbp, rfcsr: info.rfcsr }
}

/// Results of the dynamic calibrations, reused on every channel switch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationData {
    /// RX filter value for 20MHz channels (RFCSR24/31)
    pub calibration_bw20: u8,
    /// RX filter value for 40MHz channels
    pub calibration_bw40: u8,
    /// RT6352 TX low-pass filter compensation
    pub tx_calibration_bw20: u8,
    pub tx_calibration_bw40: u8,
    /// RT6352 RX low-pass filter compensation
    pub rx_calibration_bw20: u8,
    pub rx_calibration_bw40: u8,
    /// BBP25/26 snapshot taken after the filter calibration
    pub bbp25: u8,
    pub bbp26: u8,
    /// TX mixer gain from EEPROM
    pub txmixer_gain_24g: u8,
    pub txmixer_gain_5g: u8,
}

impl CalibrationData {
    /// RX filter value for the given bandwidth
    pub fn rx_filter(&self, ht40: bool) -> u8 {
        if ht40 { self.calibration_bw40 } else { self.calibration_bw20 }
    }
}

impl<B, D> Rt2800<B, D> where
    B: RegisterBus, D: DelayUs<u32>
{
    /// Initialise the baseband: chip table, then the override words stored in EEPROM
    pub fn init_bbp(&mut self) -> Result<(), Rt2800Error> {
        let tables = select_tables(&self.chip);
        self.run_bbp_table(tables.bbp)?;
        if tables.bbp.applies_eeprom_overrides() {
            self.bbp_eeprom_overrides()?;
        }
        Ok(())
    }

    /// Initialise the RF control registers. Chips driven through legacy RF words have no table
    pub fn init_rfcsr(&mut self) -> Result<(), Rt2800Error> {
        match select_tables(&self.chip).rfcsr {
            Some(table) => self.run_rfcsr_table(table),
            None => {
                debug!("No RFCSR table for {:?}", self.chip.family);
                Ok(())
            }
        }
    }

    /// Step the crystal trim code (RFCSR17) toward the EEPROM frequency offset.
    /// USB devices hand the change to the MCU instead.
    pub fn freq_cal_mode1(&mut self) -> Result<(), Rt2800Error> {
        let target = RFCSR17_CODE.get(self.freq_offset).min(FREQ_OFFSET_BOUND);
        let prev_rfcsr = self.rfcsr_read(17)?;
        let mut rfcsr = RFCSR17_CODE.with(prev_rfcsr, target);
        if rfcsr == prev_rfcsr {
            return Ok(());
        }

        if self.chip.bus.is_usb() {
            return self.mcu_request(MCU_FREQ_OFFSET, 0xff, target, prev_rfcsr);
        }

        let mut code = RFCSR17_CODE.get(prev_rfcsr);
        while code != target {
            if code < target {
                code += 1;
            } else {
                code -= 1;
            }
            RFCSR17_CODE.set(&mut rfcsr, code);
            self.rfcsr_write(17, rfcsr)?;
            self.msleep(1);
        }
        Ok(())
    }

    /// Retrigger the VCO calibration of the current RF, then restore the PA enables
    /// for the current band and TX chain count.
    pub fn vco_calibration(&mut self) -> Result<(), Rt2800Error> {
        self.modify_reg(TX_PIN_CFG, |reg| *reg &= TX_PIN_CFG_PA_PE_DISABLE)?;

        let trigger = self.rf().info().vco;
        match trigger {
            VcoTrigger::Rfcsr7 => self.rfcsr_write_field(7, RFCSR7_RF_TUNING, 1)?,
            VcoTrigger::Rfcsr3 => self.rfcsr_write_field(3, RFCSR3_VCOCAL_EN, 1)?,
            VcoTrigger::Mt7620 => {
                self.rfcsr_write(5, 0x40)?;
                self.rfcsr_write(4, 0x0c)?;
                self.rfcsr_write_field(4, RFCSR4_VCOCAL_EN, 1)?;
            }
            VcoTrigger::None => {
                warn!("Not supported RF chipset {:?} for VCO recalibration", self.rf());
                return Ok(());
            }
        }
        let settle = trigger.settle_us();
        if settle > 0 {
            self.usleep(settle);
        }

        let bg = self.channel.channel <= 14;
        let chains = self.tx_chain_num;
        self.modify_reg(TX_PIN_CFG, |reg| {
            let (pe0, pe1, pe2) = if bg {
                (TX_PIN_CFG_PA_PE_G0_EN, TX_PIN_CFG_PA_PE_G1_EN, TX_PIN_CFG_PA_PE_G2_EN)
            } else {
                (TX_PIN_CFG_PA_PE_A0_EN, TX_PIN_CFG_PA_PE_A1_EN, TX_PIN_CFG_PA_PE_A2_EN)
            };
            pe0.set(reg, 1);
            if chains >= 2 {
                pe1.set(reg, 1);
            }
            if chains >= 3 {
                pe2.set(reg, 1);
            }
        })?;

        if self.chip.is(ChipFamily::Rt6352) {
            if self.rx_chain_num == 1 {
                self.bbp_write(91, 0x07)?;
                self.bbp_write(95, 0x1a)?;
                self.bbp_glrt_write(128, 0xa0)?;
                self.bbp_glrt_write(170, 0x12)?;
                self.bbp_glrt_write(171, 0x10)?;
            } else {
                self.bbp_write(91, 0x06)?;
                self.bbp_write(95, 0x9a)?;
                self.bbp_glrt_write(128, 0xe0)?;
                self.bbp_glrt_write(170, 0x30)?;
                self.bbp_glrt_write(171, 0x30)?;
            }
            if self.chip.caps.has_external_lna_bg() {
                self.bbp_write_table(&[(75, 0x68), (76, 0x4c), (79, 0x1c), (80, 0x0c), (82, 0xb6)])?;
            }
            // RF and BBP need 1ms to settle on both bands
            self.msleep(1);
        }
        Ok(())
    }

    /// Set the baseband bandwidth field: 0 for 20MHz, 2 for 40MHz
    pub(crate) fn bbp_set_bandwidth(&mut self, ht40: bool) -> Result<(), Rt2800Error> {
        self.bbp_write_field(4, BBP4_BANDWIDTH, 2 * ht40 as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelRoutine;
    use crate::chip::{BusKind, Capabilities, RfType, CHIP_TABLE, RF_TABLE};

    fn identity(family: ChipFamily, bus: BusKind, rf: RfType) -> ChipIdentity {
        ChipIdentity { family, revision: 0x0200, rf: Some(rf), bus, caps: Capabilities::none() }
    }

    #[test]
    fn one_table_per_family() {
        for chip in CHIP_TABLE.iter() {
            for rf in RF_TABLE.iter().filter(|r| r.supported) {
                for bus in [BusKind::Pci, BusKind::Usb, BusKind::Soc] {
                    let t = select_tables(&identity(chip.family, bus, rf.rf));
                    let soc_305x = chip.family == ChipFamily::Rt2872 && bus == BusKind::Soc
                        && matches!(rf.rf, RfType::Rf3020 | RfType::Rf3021 | RfType::Rf3022);
                    let expected = if soc_305x {
                        CalibrationTables { bbp: BbpTable::Soc305x, rfcsr: Some(RfcsrTable::Soc305x) }
                    } else {
                        CalibrationTables { bbp: chip.bbp, rfcsr: chip.rfcsr }
                    };
                    assert_eq!(t, expected, "{:?} with {:?} on {:?}", chip.family, rf.rf, bus);
                }
            }
        }
        let t = select_tables(&identity(ChipFamily::Rt5350, BusKind::Soc, RfType::Rf5350));
        assert_eq!(t, CalibrationTables { bbp: BbpTable::Rt3352, rfcsr: Some(RfcsrTable::Rt5350) });
        let t = select_tables(&identity(ChipFamily::Rt2860, BusKind::Pci, RfType::Rf2820));
        assert_eq!(t.rfcsr, None);
    }

    #[test]
    fn one_routine_per_rf() {
        for entry in RF_TABLE.iter() {
            if !entry.supported {
                assert_eq!(RfType::from_id(entry.id), None);
                continue;
            }
            let rf = RfType::from_id(entry.id);
            assert_eq!(rf, Some(entry.rf));
            let info = entry.rf.info();
            assert_eq!(info.routine, entry.routine, "{:?}", entry.rf);
            assert_eq!(info.vco, entry.vco, "{:?}", entry.rf);
        }
        assert_eq!(RfType::from_id(0x000a), None);
        assert!(!RfType::Rf2853.info().supported);
        assert_eq!(RfType::Rf7620.info().routine, ChannelRoutine::Rf7620);
        assert_eq!(RfType::Rf7620.info().vco, VcoTrigger::Mt7620);
        assert_eq!(RfType::Rf3052.info().routine, ChannelRoutine::Rf3052);
        assert_eq!(RfType::Rf2820.info().vco, VcoTrigger::None);
    }

    #[test]
    fn soc_305x_tables() {
        let t = select_tables(&identity(ChipFamily::Rt2872, BusKind::Soc, RfType::Rf3022));
        assert_eq!(t, CalibrationTables { bbp: BbpTable::Soc305x, rfcsr: Some(RfcsrTable::Soc305x) });
        let t = select_tables(&identity(ChipFamily::Rt2872, BusKind::Usb, RfType::Rf3022));
        assert_eq!(t.bbp, BbpTable::Rt28xx);
    }

    #[test]
    fn eeprom_overrides_skipped() {
        assert!(!BbpTable::Rt3593.applies_eeprom_overrides());
        assert!(!BbpTable::Rt5592.applies_eeprom_overrides());
        assert!(BbpTable::Rt6352.applies_eeprom_overrides());
    }
}
