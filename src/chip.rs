//! # Chipset identification
//!
//! The chip family and silicon revision come from the identification register, the RF synthesizer
//! type from the EEPROM (or a fixed value for some families). Per-family and per-RF behaviour is
//! described once in the [`CHIP_TABLE`] and [`RF_TABLE`] lookup tables: supporting a new chip means adding an entry there.
//!
//! ## Available Methods
//! - [`probe_rt`] - Read the identification register and build a [`ChipIdentity`]
//! - [`ChipFamily::from_id`] / [`RfType::from_id`] - Validate raw identifiers against the supported set
//! - [`ChipIdentity::is_305x_soc`] - RT305x SoC detection

use crate::calib::{BbpTable, RfcsrTable, VcoTrigger};
use crate::channel::ChannelRoutine;
use crate::eeprom::EepromMap;
use crate::regs::mac::{MAC_CSR0, MAC_CSR0_3290, MAC_CSR0_CHIPSET, MAC_CSR0_REVISION};
use crate::{RegisterBus, Rt2800Error};

/// Kind of bus the chip is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusKind {
    Usb,
    Pci,
    Pcie,
    /// Embedded in a system-on-chip
    Soc,
}

impl BusKind {
    pub fn is_usb(&self) -> bool {
        *self == BusKind::Usb
    }

    /// PCI or PCIe
    pub fn is_pci(&self) -> bool {
        matches!(self, BusKind::Pci | BusKind::Pcie)
    }
}

/// Chip family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipFamily {
    Rt2860,
    Rt2872,
    Rt2883,
    Rt3070,
    Rt3071,
    Rt3090,
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
    /// MT7620 integrated WiSoC: reports itself as RT5390 on the SoC bus
    Rt6352,
}

/// Static description of a chip family
#[derive(Debug, Clone, Copy)]
pub struct ChipInfo {
    pub family: ChipFamily,
    /// Value of the chipset field in the identification register
    pub id: u16,
    /// Baseband initialisation table
    pub bbp: BbpTable,
    /// RF register initialisation table (RF-word chips have none)
    pub rfcsr: Option<RfcsrTable>,
    /// EEPROM layout
    pub eeprom_map: EepromMap,
}

const fn chip(family: ChipFamily, id: u16, bbp: BbpTable, rfcsr: Option<RfcsrTable>, eeprom_map: EepromMap) -> ChipInfo {
    ChipInfo { family, id, bbp, rfcsr, eeprom_map }
}

/// All supported chip families
pub const CHIP_TABLE: [ChipInfo; 17] = [
    chip(ChipFamily::Rt2860, 0x2860, BbpTable::Rt28xx, None, EepromMap::Default),
    chip(ChipFamily::Rt2872, 0x2872, BbpTable::Rt28xx, None, EepromMap::Default),
    chip(ChipFamily::Rt2883, 0x2883, BbpTable::Rt28xx, None, EepromMap::Default),
    chip(ChipFamily::Rt3070, 0x3070, BbpTable::Rt30xx, Some(RfcsrTable::Rt30xx), EepromMap::Default),
    chip(ChipFamily::Rt3071, 0x3071, BbpTable::Rt30xx, Some(RfcsrTable::Rt30xx), EepromMap::Default),
    chip(ChipFamily::Rt3090, 0x3090, BbpTable::Rt30xx, Some(RfcsrTable::Rt30xx), EepromMap::Default),
    chip(ChipFamily::Rt3290, 0x3290, BbpTable::Rt3290, Some(RfcsrTable::Rt3290), EepromMap::Default),
    chip(ChipFamily::Rt3352, 0x3352, BbpTable::Rt3352, Some(RfcsrTable::Rt3352), EepromMap::Default),
    chip(ChipFamily::Rt3390, 0x3390, BbpTable::Rt3390, Some(RfcsrTable::Rt3390), EepromMap::Default),
    chip(ChipFamily::Rt3572, 0x3572, BbpTable::Rt3572, Some(RfcsrTable::Rt3572), EepromMap::Default),
    chip(ChipFamily::Rt3593, 0x3593, BbpTable::Rt3593, Some(RfcsrTable::Rt3593), EepromMap::Extended),
    chip(ChipFamily::Rt3883, 0x3883, BbpTable::Rt3883, Some(RfcsrTable::Rt3883), EepromMap::Extended),
    chip(ChipFamily::Rt5350, 0x5350, BbpTable::Rt3352, Some(RfcsrTable::Rt5350), EepromMap::Default),
    chip(ChipFamily::Rt5390, 0x5390, BbpTable::Rt53xx, Some(RfcsrTable::Rt5390), EepromMap::Default),
    chip(ChipFamily::Rt5392, 0x5392, BbpTable::Rt53xx, Some(RfcsrTable::Rt5392), EepromMap::Default),
    chip(ChipFamily::Rt5592, 0x5592, BbpTable::Rt5592, Some(RfcsrTable::Rt5592), EepromMap::Default),
    chip(ChipFamily::Rt6352, 0x6352, BbpTable::Rt6352, Some(RfcsrTable::Rt6352), EepromMap::Default),
];

impl ChipFamily {
    /// Family from the chipset field of the identification register.
    /// RT6352 is never reported directly and is not matched here.
    pub fn from_id(id: u16) -> Option<Self> {
        CHIP_TABLE.iter()
            .filter(|c| c.family != ChipFamily::Rt6352)
            .find(|c| c.id == id)
            .map(|c| c.family)
    }

    pub fn info(&self) -> &'static ChipInfo {
        // The table holds one entry per variant, in declaration order
        &CHIP_TABLE[*self as usize]
    }

    pub fn id(&self) -> u16 {
        self.info().id
    }
}

// Silicon revisions
pub const REV_RT2860C: u16 = 0x0100;
pub const REV_RT2860D: u16 = 0x0101;
pub const REV_RT2872E: u16 = 0x0200;
pub const REV_RT3070E: u16 = 0x0200;
pub const REV_RT3070F: u16 = 0x0201;
pub const REV_RT3071E: u16 = 0x0211;
pub const REV_RT3090E: u16 = 0x0211;
pub const REV_RT3390E: u16 = 0x0211;
pub const REV_RT3593E: u16 = 0x0211;
pub const REV_RT5390F: u16 = 0x0502;
pub const REV_RT5370G: u16 = 0x0503;
pub const REV_RT5390R: u16 = 0x1502;
pub const REV_RT5592C: u16 = 0x0221;

/// RF synthesizer type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RfType {
    #[default]
    Rf2820,
    Rf2850,
    Rf2720,
    Rf2750,
    Rf3020,
    Rf2020,
    Rf3021,
    Rf3022,
    Rf3052,
    Rf2853,
    Rf3320,
    Rf3322,
    Rf3053,
    Rf5592,
    Rf3070,
    Rf3290,
    Rf3853,
    Rf5350,
    Rf5360,
    Rf5362,
    Rf5370,
    Rf5372,
    Rf5390,
    Rf5392,
    Rf7620,
}

/// Static description of an RF synthesizer
#[derive(Debug, Clone, Copy)]
pub struct RfInfo {
    pub rf: RfType,
    /// Identifier as stored in EEPROM
    pub id: u16,
    /// Channel programming routine
    pub routine: ChannelRoutine,
    /// How the VCO calibration is triggered
    pub vco: VcoTrigger,
    /// Supported by the driver (RF2853 is known but never programmed)
    pub supported: bool,
}

const fn rf(rf: RfType, id: u16, routine: ChannelRoutine, vco: VcoTrigger) -> RfInfo {
    RfInfo { rf, id, routine, vco, supported: true }
}

/// All known RF synthesizers
pub const RF_TABLE: [RfInfo; 25] = [
    rf(RfType::Rf2820, 0x0001, ChannelRoutine::Rf2xxx, VcoTrigger::None),
    rf(RfType::Rf2850, 0x0002, ChannelRoutine::Rf2xxx, VcoTrigger::None),
    rf(RfType::Rf2720, 0x0003, ChannelRoutine::Rf2xxx, VcoTrigger::None),
    rf(RfType::Rf2750, 0x0004, ChannelRoutine::Rf2xxx, VcoTrigger::None),
    rf(RfType::Rf3020, 0x0005, ChannelRoutine::Rf3xxx, VcoTrigger::Rfcsr7),
    rf(RfType::Rf2020, 0x0006, ChannelRoutine::Rf3xxx, VcoTrigger::Rfcsr7),
    rf(RfType::Rf3021, 0x0007, ChannelRoutine::Rf3xxx, VcoTrigger::Rfcsr7),
    rf(RfType::Rf3022, 0x0008, ChannelRoutine::Rf3xxx, VcoTrigger::Rfcsr7),
    rf(RfType::Rf3052, 0x0009, ChannelRoutine::Rf3052, VcoTrigger::Rfcsr7),
    RfInfo { rf: RfType::Rf2853, id: 0x000a, routine: ChannelRoutine::Rf2xxx, vco: VcoTrigger::None, supported: false },
    rf(RfType::Rf3320, 0x000b, ChannelRoutine::Rf3xxx, VcoTrigger::Rfcsr7),
    rf(RfType::Rf3322, 0x000c, ChannelRoutine::Rf3322, VcoTrigger::None),
    rf(RfType::Rf3053, 0x000d, ChannelRoutine::Rf3053, VcoTrigger::Rfcsr3),
    rf(RfType::Rf5592, 0x000f, ChannelRoutine::Rf55xx, VcoTrigger::Rfcsr3),
    rf(RfType::Rf3070, 0x3070, ChannelRoutine::Rf53xx, VcoTrigger::Rfcsr3),
    rf(RfType::Rf3290, 0x3290, ChannelRoutine::Rf3290, VcoTrigger::Rfcsr3),
    rf(RfType::Rf3853, 0x3853, ChannelRoutine::Rf3853, VcoTrigger::Rfcsr3),
    rf(RfType::Rf5350, 0x5350, ChannelRoutine::Rf53xx, VcoTrigger::Rfcsr3),
    rf(RfType::Rf5360, 0x5360, ChannelRoutine::Rf53xx, VcoTrigger::Rfcsr3),
    rf(RfType::Rf5362, 0x5362, ChannelRoutine::Rf53xx, VcoTrigger::Rfcsr3),
    rf(RfType::Rf5370, 0x5370, ChannelRoutine::Rf53xx, VcoTrigger::Rfcsr3),
    rf(RfType::Rf5372, 0x5372, ChannelRoutine::Rf53xx, VcoTrigger::Rfcsr3),
    rf(RfType::Rf5390, 0x5390, ChannelRoutine::Rf53xx, VcoTrigger::Rfcsr3),
    rf(RfType::Rf5392, 0x5392, ChannelRoutine::Rf53xx, VcoTrigger::Rfcsr3),
    rf(RfType::Rf7620, 0x7620, ChannelRoutine::Rf7620, VcoTrigger::Mt7620),
];

impl RfType {
    /// Supported RF type from its EEPROM identifier
    pub fn from_id(id: u16) -> Option<Self> {
        RF_TABLE.iter()
            .find(|r| r.id == id && r.supported)
            .map(|r| r.rf)
    }

    pub fn info(&self) -> &'static RfInfo {
        // The table holds one entry per variant, in declaration order
        &RF_TABLE[*self as usize]
    }

    pub fn id(&self) -> u16 {
        self.info().id
    }

    /// RF types that share the RFCSR30 bandwidth / RFCSR3 VCO sequence after channel programming
    pub fn has_rfcsr30_bw(&self) -> bool {
        matches!(self,
            RfType::Rf3070 | RfType::Rf3290 | RfType::Rf3322 | RfType::Rf5350 |
            RfType::Rf5360 | RfType::Rf5362 | RfType::Rf5370 | RfType::Rf5372 |
            RfType::Rf5390 | RfType::Rf5392)
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Hardware capabilities derived from the EEPROM
pub struct Capabilities(u16);

impl core::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Capabilities({:#06x})", self.0)
    }
}

impl Capabilities {
    pub fn none() -> Self {
        Self(0)
    }

    /// Raw flags
    pub fn value(&self) -> u16 {
        self.0
    }

    /// External LNA on the 5GHz band
    pub fn with_external_lna_a(&self) -> Self {
        Self(self.0 | 0x0001)
    }

    /// External LNA on the 2.4GHz band
    pub fn with_external_lna_bg(&self) -> Self {
        Self(self.0 | 0x0002)
    }

    /// Hardware radio on/off switch
    pub fn with_hw_button(&self) -> Self {
        Self(self.0 | 0x0004)
    }

    /// Bluetooth coexistence
    pub fn with_bt_coexist(&self) -> Self {
        Self(self.0 | 0x0008)
    }

    /// EIRP TX power limit enforced
    pub fn with_power_limit(&self) -> Self {
        Self(self.0 | 0x0010)
    }

    /// External PA on TX chain 0
    pub fn with_external_pa_tx0(&self) -> Self {
        Self(self.0 | 0x0020)
    }

    /// External PA on TX chain 1
    pub fn with_external_pa_tx1(&self) -> Self {
        Self(self.0 | 0x0040)
    }

    /// Hardware RX antenna diversity
    pub fn with_ant_diversity(&self) -> Self {
        Self(self.0 | 0x0080)
    }

    pub fn has_external_lna_a(&self) -> bool {
        self.0 & 0x0001 != 0
    }

    pub fn has_external_lna_bg(&self) -> bool {
        self.0 & 0x0002 != 0
    }

    pub fn has_hw_button(&self) -> bool {
        self.0 & 0x0004 != 0
    }

    pub fn has_bt_coexist(&self) -> bool {
        self.0 & 0x0008 != 0
    }

    pub fn has_power_limit(&self) -> bool {
        self.0 & 0x0010 != 0
    }

    pub fn has_external_pa_tx0(&self) -> bool {
        self.0 & 0x0020 != 0
    }

    pub fn has_external_pa_tx1(&self) -> bool {
        self.0 & 0x0040 != 0
    }

    pub fn has_ant_diversity(&self) -> bool {
        self.0 & 0x0080 != 0
    }
}

/// Identity of the chip behind the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChipIdentity {
    pub family: ChipFamily,
    /// Silicon revision
    pub revision: u16,
    /// RF synthesizer, resolved from the EEPROM
    pub rf: Option<RfType>,
    pub bus: BusKind,
    pub caps: Capabilities,
}

impl ChipIdentity {
    pub fn is(&self, family: ChipFamily) -> bool {
        self.family == family
    }

    /// Chip is `family` with a revision strictly below `rev`
    pub fn rev_lt(&self, family: ChipFamily, rev: u16) -> bool {
        self.family == family && self.revision < rev
    }

    /// Chip is `family` with a revision at least `rev`
    pub fn rev_gte(&self, family: ChipFamily, rev: u16) -> bool {
        self.family == family && self.revision >= rev
    }

    /// Chip is `family` with exactly revision `rev`
    pub fn rev_eq(&self, family: ChipFamily, rev: u16) -> bool {
        self.family == family && self.revision == rev
    }

    pub fn is_rf(&self, rf: RfType) -> bool {
        self.rf == Some(rf)
    }

    /// RT305x boards: RT2872 on the SoC bus with one of the RF302x synthesizers
    pub fn is_305x_soc(&self) -> bool {
        if self.bus != BusKind::Soc || self.family != ChipFamily::Rt2872 {
            return false;
        }
        match self.rf {
            Some(RfType::Rf3020 | RfType::Rf3021 | RfType::Rf3022) => true,
            _ => {
                warn!("Unknown RF chipset on rt305x");
                false
            }
        }
    }

    pub fn info(&self) -> &'static ChipInfo {
        self.family.info()
    }
}

/// Read the identification register and check the chip is supported.
///
/// RT3290 exposes its identification at a different offset: the transport signals it
/// through [`RegisterBus::is_rt3290`]. An RT5390 found on the SoC bus is an RT6352.
pub fn probe_rt<B: RegisterBus>(bus: &mut B) -> Result<ChipIdentity, Rt2800Error> {
    let offset = if bus.is_rt3290() { MAC_CSR0_3290 } else { MAC_CSR0 };
    let reg = bus.read32(offset).map_err(|_| Rt2800Error::Bus)?;
    let rt = MAC_CSR0_CHIPSET.get(reg) as u16;
    let revision = MAC_CSR0_REVISION.get(reg) as u16;

    let Some(mut family) = ChipFamily::from_id(rt) else {
        error!("Invalid RT chipset {:#x}, rev {:#x} detected", rt, revision);
        return Err(Rt2800Error::UnsupportedChipset(rt));
    };

    let kind = bus.kind();
    if family == ChipFamily::Rt5390 && kind == BusKind::Soc {
        family = ChipFamily::Rt6352;
    }
    info!("Chipset detected: {:?} rev {:#x} on {:?}", family, revision, kind);

    Ok(ChipIdentity { family, revision, rf: None, bus: kind, caps: Capabilities::none() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_follow_declaration_order() {
        for (i, c) in CHIP_TABLE.iter().enumerate() {
            assert_eq!(c.family as usize, i);
        }
        for (i, r) in RF_TABLE.iter().enumerate() {
            assert_eq!(r.rf as usize, i);
        }
    }

    #[test]
    fn family_lookup() {
        assert_eq!(ChipFamily::from_id(0x3070), Some(ChipFamily::Rt3070));
        assert_eq!(ChipFamily::from_id(0x5592), Some(ChipFamily::Rt5592));
        assert_eq!(ChipFamily::from_id(0x6352), None);
        assert_eq!(ChipFamily::from_id(0x1234), None);
        assert_eq!(ChipFamily::Rt6352.id(), 0x6352);
    }

    #[test]
    fn rf_lookup() {
        assert_eq!(RfType::from_id(0x0001), Some(RfType::Rf2820));
        assert_eq!(RfType::from_id(0x7620), Some(RfType::Rf7620));
        assert_eq!(RfType::from_id(0x000a), None);
        assert_eq!(RfType::from_id(0x000e), None);
        assert_eq!(RfType::Rf5370.id(), 0x5370);
    }

    #[test]
    fn capabilities() {
        let caps = Capabilities::none().with_bt_coexist().with_external_lna_bg();
        assert!(caps.has_bt_coexist());
        assert!(caps.has_external_lna_bg());
        assert!(!caps.has_external_lna_a());
        assert!(!caps.has_hw_button());
    }

    #[test]
    fn soc_305x() {
        let mut id = ChipIdentity {
            family: ChipFamily::Rt2872,
            revision: 0x0200,
            rf: Some(RfType::Rf3020),
            bus: BusKind::Soc,
            caps: Capabilities::none(),
        };
        assert!(id.is_305x_soc());
        id.bus = BusKind::Pci;
        assert!(!id.is_305x_soc());
    }
}
