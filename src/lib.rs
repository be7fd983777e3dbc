#![cfg_attr(not(test), no_std)]
//! # RT2800 hardware control and calibration core
//!
//! Driver core for the Ralink/MediaTek rt2800 family of WiFi chipsets used as passive capture radios.
//! The register transport (USB, PCI or SoC bus) is provided by the caller through the [`RegisterBus`] trait,
//! and all timing goes through an injected `DelayUs` implementation.
//!
//! A device session is created with [`Rt2800::open`]: it identifies the chip, loads and validates the
//! EEPROM, and resolves the RF synthesizer type. From there the usual sequence is
//! [`load_firmware`](Rt2800::load_firmware), [`enable_radio`](Rt2800::enable_radio) and then
//! [`config`](Rt2800::config) for every channel switch, with [`link_tuner`](Rt2800::link_tuner) called periodically.
//!
//! ## Available Methods
//! - [`open`](Rt2800::open) - Identify the chip and load the EEPROM
//! - [`with_eeprom`](Rt2800::with_eeprom) - Identify the chip and use a provided EEPROM image
//! - [`settings`](Rt2800::settings) - Driver configuration given at open
//! - [`read_reg`](Rt2800::read_reg) - Read a 32-bit CSR register
//! - [`write_reg`](Rt2800::write_reg) - Write a 32-bit CSR register
//! - [`modify_reg`](Rt2800::modify_reg) - Read once, update several fields, write once
//! - [`write_field`](Rt2800::write_field) - Update a single field of a CSR register
//! - [`poll_until_clear`](Rt2800::poll_until_clear) - Poll a busy bit until it clears
//! - [`read_multi`](Rt2800::read_multi) / [`write_multi`](Rt2800::write_multi) - Block access to the register space

#[macro_use]
mod fmt;

pub mod field;
pub mod config;
pub mod regs;
pub mod chip;
pub mod indirect;
pub mod eeprom;
pub mod firmware;
pub mod calib;
pub mod channel;
pub mod link;
pub mod radio;

use embassy_time::Duration;
use embedded_hal::blocking::delay::DelayUs;

pub use config::Config;
pub use field::{Field, Field8, Field16, Field32};
pub use chip::{BusKind, Capabilities, ChipFamily, ChipIdentity, RfType};
pub use eeprom::EepromImage;
pub use calib::CalibrationData;
pub use channel::{Band, ChannelDescriptor};
pub use indirect::RegisterBank;
pub use link::LinkQual;
pub use radio::FilterFlags;

/// Register transport towards the chip
///
/// Implemented by the USB/PCI/SoC glue. All offsets are byte offsets in the 32-bit CSR space.
pub trait RegisterBus {
    type Error: core::fmt::Debug;

    /// Kind of bus the chip sits on
    fn kind(&self) -> BusKind;

    /// The transport identified an RT3290 (PCI device 0x3290), whose identification
    /// register lives at a different offset
    fn is_rt3290(&self) -> bool {
        false
    }

    /// SoC variants clocked from a 20 MHz crystal instead of 40 MHz
    fn clk_is_20mhz(&self) -> bool {
        false
    }

    fn read32(&mut self, offset: u32) -> Result<u32, Self::Error>;

    fn write32(&mut self, offset: u32, value: u32) -> Result<(), Self::Error>;

    /// Read a block of registers, little-endian
    fn read_multi(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), Self::Error> {
        for (i, chunk) in buf.chunks_mut(4).enumerate() {
            let word = self.read32(offset + 4 * i as u32)?.to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
        Ok(())
    }

    /// Write a block of registers, little-endian
    fn write_multi(&mut self, offset: u32, data: &[u8]) -> Result<(), Self::Error> {
        for (i, chunk) in data.chunks(4).enumerate() {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            self.write32(offset + 4 * i as u32, u32::from_le_bytes(word))?;
        }
        Ok(())
    }

    /// Read the raw EEPROM content when no eFuse is present
    fn read_eeprom(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Transfer a validated firmware chunk to the MCU memory
    fn write_firmware(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.write_multi(regs::mac::FIRMWARE_IMAGE_BASE, data)
    }

    /// Transport specific register setup run at the start of the MAC bring-up
    fn init_registers(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Error using the RT2800
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rt2800Error {
    /// Register transport failure
    Bus,
    /// A busy bit was still set after the whole polling budget
    RegisterBusyTimeout { bank: RegisterBank, offset: u32 },
    /// Identification register holds a chip outside the supported family
    UnsupportedChipset(u16),
    /// RF synthesizer type is not supported
    UnsupportedRfType(u16),
    /// Firmware size is not a multiple of the expected image size
    FirmwareBadLength(usize),
    /// Firmware bundle does not match this chip
    FirmwareBadVersion,
    /// Firmware checksum mismatch on one of the image chunks
    FirmwareBadCrc { chunk: usize },
    /// Radio subsystem never reported PLL lock and crystal ready
    HardwareUnstable,
}

impl core::fmt::Display for Rt2800Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Rt2800Error::Bus => write!(f, "register bus access failed"),
            Rt2800Error::RegisterBusyTimeout { bank, offset } =>
                write!(f, "{bank:?} register busy at {offset:#06x}"),
            Rt2800Error::UnsupportedChipset(rt) => write!(f, "unsupported chipset {rt:#06x}"),
            Rt2800Error::UnsupportedRfType(rf) => write!(f, "unsupported RF chipset {rf:#06x}"),
            Rt2800Error::FirmwareBadLength(len) => write!(f, "invalid firmware file length {len}"),
            Rt2800Error::FirmwareBadVersion => write!(f, "firmware does not match the chipset"),
            Rt2800Error::FirmwareBadCrc { chunk } => write!(f, "firmware checksum mismatch in chunk {chunk}"),
            Rt2800Error::HardwareUnstable => write!(f, "unstable hardware"),
        }
    }
}

impl core::error::Error for Rt2800Error {}

/// RT2800 device session
pub struct Rt2800<B, D> {
    /// Register transport
    bus: B,
    /// Delay provider used by all polling loops
    delay: D,
    /// Retry budgets and delays
    config: Config,
    /// Chip family, revision, RF type and capabilities
    chip: ChipIdentity,
    /// Local copy of the EEPROM/eFuse content
    eeprom: EepromImage,
    /// Results of the dynamic calibrations
    calib: CalibrationData,
    /// Link tuner state
    link: LinkQual,
    /// Number of active TX chains
    tx_chain_num: u8,
    /// Number of active RX chains
    rx_chain_num: u8,
    /// Shadow of the words written through the legacy RF interface (index 1 to 4)
    rf_shadow: [u32; 5],
    /// LNA gain selected for the current channel
    lna_gain: u8,
    /// Current channel
    channel: ChannelDescriptor,
    /// LED mode word pushed to the MCU
    led_mcu_reg: u16,
    /// Crystal frequency offset from EEPROM
    freq_offset: u8,
    /// RX antenna selected when only one RX chain is used with software diversity
    rx_antenna: channel::Antenna,
}

impl<B, D> Rt2800<B, D> where
    B: RegisterBus, D: DelayUs<u32>
{
    /// Identify the chip, load the EEPROM (eFuse when present) and resolve the RF configuration
    pub fn open(bus: B, delay: D, config: Config) -> Result<Self, Rt2800Error> {
        let mut dev = Self::probe(bus, delay, config)?;
        dev.read_eeprom()?;
        dev.validate_eeprom()?;
        dev.init_eeprom()?;
        Ok(dev)
    }

    /// Identify the chip and use the provided EEPROM image instead of reading it from the device
    pub fn with_eeprom(bus: B, delay: D, config: Config, eeprom: EepromImage) -> Result<Self, Rt2800Error> {
        let mut dev = Self::probe(bus, delay, config)?;
        dev.eeprom = eeprom.with_map(dev.chip.info().eeprom_map);
        dev.validate_eeprom()?;
        dev.init_eeprom()?;
        Ok(dev)
    }

    fn probe(mut bus: B, delay: D, config: Config) -> Result<Self, Rt2800Error> {
        let chip = chip::probe_rt(&mut bus)?;
        Ok(Self {
            bus,
            delay,
            config,
            chip,
            eeprom: EepromImage::blank().with_map(chip.info().eeprom_map),
            calib: CalibrationData::default(),
            link: LinkQual::default(),
            tx_chain_num: 1,
            rx_chain_num: 1,
            rf_shadow: [0; 5],
            lna_gain: 0,
            channel: ChannelDescriptor::default(),
            led_mcu_reg: 0,
            freq_offset: 0,
            rx_antenna: channel::Antenna::A,
        })
    }

    /// Release the bus and delay provider
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    /// Chip identity
    pub fn chip(&self) -> &ChipIdentity {
        &self.chip
    }

    /// Driver configuration
    pub fn settings(&self) -> &Config {
        &self.config
    }

    /// EEPROM content
    pub fn eeprom(&self) -> &EepromImage {
        &self.eeprom
    }

    /// Calibration results
    pub fn calibration(&self) -> &CalibrationData {
        &self.calib
    }

    /// Direct access to the bus (debug)
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Number of TX and RX chains
    pub fn chains(&self) -> (u8, u8) {
        (self.tx_chain_num, self.rx_chain_num)
    }

    /// Current channel
    pub fn channel(&self) -> &ChannelDescriptor {
        &self.channel
    }

    /// Resolved RF synthesizer type
    pub fn rf(&self) -> RfType {
        self.chip.rf.unwrap_or_default()
    }

    /// Read a 32-bit register
    pub fn read_reg(&mut self, offset: u32) -> Result<u32, Rt2800Error> {
        self.bus.read32(offset).map_err(|_| Rt2800Error::Bus)
    }

    /// Write a 32-bit register
    pub fn write_reg(&mut self, offset: u32, value: u32) -> Result<(), Rt2800Error> {
        self.bus.write32(offset, value).map_err(|_| Rt2800Error::Bus)
    }

    /// Read a register, let `f` update any number of fields, then write it back once.
    /// Return the value written
    pub fn modify_reg<F>(&mut self, offset: u32, f: F) -> Result<u32, Rt2800Error>
        where F: FnOnce(&mut u32)
    {
        let mut reg = self.read_reg(offset)?;
        f(&mut reg);
        self.write_reg(offset, reg)?;
        Ok(reg)
    }

    /// Update a single field of a register
    pub fn write_field(&mut self, offset: u32, field: Field32, value: u32) -> Result<(), Rt2800Error> {
        self.modify_reg(offset, |reg| field.set(reg, value))?;
        Ok(())
    }

    /// Read a single field of a register
    pub fn read_field(&mut self, offset: u32, field: Field32) -> Result<u32, Rt2800Error> {
        Ok(field.get(self.read_reg(offset)?))
    }

    /// Read a block of registers
    pub fn read_multi(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), Rt2800Error> {
        self.bus.read_multi(offset, buf).map_err(|_| Rt2800Error::Bus)
    }

    /// Write a block of registers
    pub fn write_multi(&mut self, offset: u32, data: &[u8]) -> Result<(), Rt2800Error> {
        self.bus.write_multi(offset, data).map_err(|_| Rt2800Error::Bus)
    }

    /// Poll the register at `offset` until `field` reads as 0.
    /// Makes exactly `busy_count` attempts and returns the last value read,
    /// so sibling fields can be extracted without another access.
    pub fn poll_until_clear(&mut self, bank: RegisterBank, offset: u32, field: Field32) -> Result<u32, Rt2800Error> {
        let delay = self.config.busy_delay;
        let attempts = self.config.busy_count;
        self.poll_reg(bank, offset, attempts, delay, |reg| !field.is_set(reg))
    }

    /// Poll a register until `done` returns true, sleeping `delay` after each failed attempt
    pub(crate) fn poll_reg<F>(&mut self, bank: RegisterBank, offset: u32, attempts: u32, delay: Duration, done: F)
        -> Result<u32, Rt2800Error>
        where F: Fn(u32) -> bool
    {
        let mut reg = 0;
        for _ in 0..attempts {
            reg = self.read_reg(offset)?;
            if done(reg) {
                return Ok(reg);
            }
            self.sleep(delay);
        }
        error!("{:?} busy timeout at {:#x} (last {:#x})", bank, offset, reg);
        Err(Rt2800Error::RegisterBusyTimeout { bank, offset })
    }

    pub(crate) fn sleep(&mut self, delay: Duration) {
        let us = delay.as_micros();
        if us > 0 {
            self.delay.delay_us(us.min(u32::MAX as u64) as u32);
        }
    }

    pub(crate) fn usleep(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    pub(crate) fn msleep(&mut self, ms: u32) {
        self.delay.delay_us(ms * 1000);
    }
}
