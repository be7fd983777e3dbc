//! # Indirect register banks
//!
//! Baseband (BBP), RF control (RFCSR), legacy RF words and the MCU mailbox are not mapped in the CSR space:
//! each access writes a request word to a control register and polls the busy bit of that same register.
//! The whole issue/poll/read sequence runs under the `&mut self` borrow of the device, so two requests
//! can never interleave on one device.
//!
//! ## Available Methods
//!
//! ### Baseband
//! - [`bbp_read`](Rt2800::bbp_read) - Read a BBP register
//! - [`bbp_write`](Rt2800::bbp_write) - Write a BBP register
//! - [`bbp_modify`](Rt2800::bbp_modify) - Read-modify-write a BBP register
//! - [`bbp_write_with_rx_chain`](Rt2800::bbp_write_with_rx_chain) - Write a BBP register on every RX chain
//! - [`bbp_glrt_write`](Rt2800::bbp_glrt_write) - Write a GLRT register through BBP195/196
//! - [`bbp_dcoc_write`](Rt2800::bbp_dcoc_write) / [`bbp_dcoc_read`](Rt2800::bbp_dcoc_read) - DC offset registers through BBP158/159
//!
//! ### RF
//! - [`rfcsr_read`](Rt2800::rfcsr_read) / [`rfcsr_write`](Rt2800::rfcsr_write) - RF control registers
//! - [`rfcsr_modify`](Rt2800::rfcsr_modify) - Read-modify-write an RF control register
//! - [`rfcsr_read_bank`](Rt2800::rfcsr_read_bank) / [`rfcsr_write_bank`](Rt2800::rfcsr_write_bank) - Banked RF registers (RT6352)
//! - [`rfcsr_write_chanreg`](Rt2800::rfcsr_write_chanreg) - Write both channel banks
//! - [`rfcsr_write_dccal`](Rt2800::rfcsr_write_dccal) - Write both DC calibration banks
//! - [`rf_write`](Rt2800::rf_write) - Write a legacy 24-bit RF word
//!
//! ### MCU and status
//! - [`mcu_request`](Rt2800::mcu_request) - Send a command through the MCU mailbox
//! - [`wait_csr_ready`](Rt2800::wait_csr_ready) - Wait for the CSR bus to answer
//! - [`wait_wpdma_ready`](Rt2800::wait_wpdma_ready) - Wait for the DMA engine to be idle
//! - [`disable_wpdma`](Rt2800::disable_wpdma) - Stop the DMA engine
//! - [`wait_bbp_rf_ready`](Rt2800::wait_bbp_rf_ready) - Wait for the MAC to release the BBP/RF
//! - [`wait_bbp_ready`](Rt2800::wait_bbp_ready) - Wait for the baseband to answer

use embedded_hal::blocking::delay::DelayUs;

use crate::field::Field8;
use crate::regs::{bbp, mac::*};
use crate::{ChipFamily, RegisterBus, Rt2800, Rt2800Error};

/// Register banks, used to report which access timed out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterBank {
    /// Direct CSR space
    Csr,
    /// Baseband processor
    Bbp,
    /// RF control registers
    Rfcsr,
    /// Legacy RF word interface
    Rf,
    /// Host to MCU mailbox
    Mcu,
    /// eFuse controller
    Efuse,
}

impl RegisterBank {
    /// Control register and busy bit of the bank
    pub fn busy_field(&self, family: ChipFamily) -> Option<(u32, crate::Field32)> {
        match self {
            RegisterBank::Bbp => Some((BBP_CSR_CFG, BBP_CSR_CFG_BUSY)),
            RegisterBank::Rfcsr if family == ChipFamily::Rt6352 => Some((RF_CSR_CFG, RF_CSR_CFG_BUSY_MT7620)),
            RegisterBank::Rfcsr => Some((RF_CSR_CFG, RF_CSR_CFG_BUSY)),
            RegisterBank::Rf => Some((RF_CSR_CFG0, RF_CSR_CFG0_BUSY)),
            RegisterBank::Mcu => Some((H2M_MAILBOX_CSR, H2M_MAILBOX_CSR_OWNER)),
            RegisterBank::Efuse => Some((EFUSE_CTRL, EFUSE_CTRL_KICK)),
            RegisterBank::Csr => None,
        }
    }
}

/// BBP used by the GLRT window
const BBP_GLRT_ADDR: u8 = 195;
const BBP_GLRT_DATA: u8 = 196;
/// BBP used by the DC offset window
const BBP_DCOC_ADDR: u8 = 158;
const BBP_DCOC_DATA: u8 = 159;

impl<B, D> Rt2800<B, D> where
    B: RegisterBus, D: DelayUs<u32>
{
    fn wait_bank(&mut self, bank: RegisterBank) -> Result<u32, Rt2800Error> {
        match bank.busy_field(self.chip.family) {
            Some((offset, field)) => self.poll_until_clear(bank, offset, field),
            None => Ok(0),
        }
    }

    /// Read a baseband register
    pub fn bbp_read(&mut self, word: u8) -> Result<u8, Rt2800Error> {
        self.wait_bank(RegisterBank::Bbp)?;
        let mut reg = 0;
        BBP_CSR_CFG_REGNUM.set(&mut reg, word as u32);
        BBP_CSR_CFG_BUSY.set(&mut reg, 1);
        BBP_CSR_CFG_READ_CONTROL.set(&mut reg, 1);
        BBP_CSR_CFG_BBP_RW_MODE.set(&mut reg, 1);
        self.write_reg(BBP_CSR_CFG, reg)?;
        let reg = self.wait_bank(RegisterBank::Bbp)?;
        Ok(BBP_CSR_CFG_VALUE.get_u8(reg))
    }

    /// Write a baseband register
    pub fn bbp_write(&mut self, word: u8, value: u8) -> Result<(), Rt2800Error> {
        self.wait_bank(RegisterBank::Bbp)?;
        let mut reg = 0;
        BBP_CSR_CFG_VALUE.set(&mut reg, value as u32);
        BBP_CSR_CFG_REGNUM.set(&mut reg, word as u32);
        BBP_CSR_CFG_BUSY.set(&mut reg, 1);
        BBP_CSR_CFG_BBP_RW_MODE.set(&mut reg, 1);
        self.write_reg(BBP_CSR_CFG, reg)
    }

    /// Read a baseband register, update it with `f` and write it back. Return the written value
    pub fn bbp_modify<F>(&mut self, word: u8, f: F) -> Result<u8, Rt2800Error>
        where F: FnOnce(&mut u8)
    {
        let mut value = self.bbp_read(word)?;
        f(&mut value);
        self.bbp_write(word, value)?;
        Ok(value)
    }

    /// Update a single field of a baseband register
    pub fn bbp_write_field(&mut self, word: u8, field: Field8, value: u8) -> Result<(), Rt2800Error> {
        self.bbp_modify(word, |r| field.set(r, value))?;
        Ok(())
    }

    /// Write the same value to a baseband register for every active RX chain
    pub fn bbp_write_with_rx_chain(&mut self, word: u8, value: u8) -> Result<(), Rt2800Error> {
        for chain in 0..self.rx_chain_num {
            self.bbp_write_field(27, bbp::BBP27_RX_CHAIN_SEL, chain)?;
            self.bbp_write(word, value)?;
        }
        Ok(())
    }

    /// Write a GLRT register (RT5592/RT6352)
    pub fn bbp_glrt_write(&mut self, reg: u8, value: u8) -> Result<(), Rt2800Error> {
        self.bbp_write(BBP_GLRT_ADDR, reg)?;
        self.bbp_write(BBP_GLRT_DATA, value)
    }

    /// Write a DC offset calibration register (RT5592/RT6352)
    pub fn bbp_dcoc_write(&mut self, reg: u8, value: u8) -> Result<(), Rt2800Error> {
        self.bbp_write(BBP_DCOC_ADDR, reg)?;
        self.bbp_write(BBP_DCOC_DATA, value)
    }

    /// Read a DC offset calibration register
    pub fn bbp_dcoc_read(&mut self, reg: u8) -> Result<u8, Rt2800Error> {
        self.bbp_write(BBP_DCOC_ADDR, reg)?;
        self.bbp_read(BBP_DCOC_DATA)
    }

    /// Read an RF control register
    pub fn rfcsr_read(&mut self, word: u16) -> Result<u8, Rt2800Error> {
        self.wait_bank(RegisterBank::Rfcsr)?;
        let mut reg = 0;
        if self.chip.family == ChipFamily::Rt6352 {
            RF_CSR_CFG_REGNUM_MT7620.set(&mut reg, word as u32);
            RF_CSR_CFG_BUSY_MT7620.set(&mut reg, 1);
            self.write_reg(RF_CSR_CFG, reg)?;
            let reg = self.wait_bank(RegisterBank::Rfcsr)?;
            Ok(RF_CSR_CFG_DATA_MT7620.get_u8(reg))
        } else {
            RF_CSR_CFG_REGNUM.set(&mut reg, word as u32);
            RF_CSR_CFG_BUSY.set(&mut reg, 1);
            self.write_reg(RF_CSR_CFG, reg)?;
            let reg = self.wait_bank(RegisterBank::Rfcsr)?;
            Ok(RF_CSR_CFG_DATA.get_u8(reg))
        }
    }

    /// Write an RF control register
    pub fn rfcsr_write(&mut self, word: u16, value: u8) -> Result<(), Rt2800Error> {
        self.wait_bank(RegisterBank::Rfcsr)?;
        let mut reg = 0;
        if self.chip.family == ChipFamily::Rt6352 {
            RF_CSR_CFG_DATA_MT7620.set(&mut reg, value as u32);
            RF_CSR_CFG_REGNUM_MT7620.set(&mut reg, word as u32);
            RF_CSR_CFG_WRITE_MT7620.set(&mut reg, 1);
            RF_CSR_CFG_BUSY_MT7620.set(&mut reg, 1);
        } else {
            RF_CSR_CFG_DATA.set(&mut reg, value as u32);
            RF_CSR_CFG_REGNUM.set(&mut reg, word as u32);
            RF_CSR_CFG_WRITE.set(&mut reg, 1);
            RF_CSR_CFG_BUSY.set(&mut reg, 1);
        }
        self.write_reg(RF_CSR_CFG, reg)
    }

    /// Read an RF control register, update it with `f` and write it back. Return the written value
    pub fn rfcsr_modify<F>(&mut self, word: u16, f: F) -> Result<u8, Rt2800Error>
        where F: FnOnce(&mut u8)
    {
        let mut value = self.rfcsr_read(word)?;
        f(&mut value);
        self.rfcsr_write(word, value)?;
        Ok(value)
    }

    /// Update a single field of an RF control register
    pub fn rfcsr_write_field(&mut self, word: u16, field: Field8, value: u8) -> Result<(), Rt2800Error> {
        self.rfcsr_modify(word, |r| field.set(r, value))?;
        Ok(())
    }

    /// Read a register from one of the RF banks (RT6352)
    pub fn rfcsr_read_bank(&mut self, bank: u8, reg: u8) -> Result<u8, Rt2800Error> {
        self.rfcsr_read(reg as u16 | ((bank as u16) << 6))
    }

    /// Write a register in one of the RF banks (RT6352)
    pub fn rfcsr_write_bank(&mut self, bank: u8, reg: u8, value: u8) -> Result<(), Rt2800Error> {
        self.rfcsr_write(reg as u16 | ((bank as u16) << 6), value)
    }

    /// Write a channel register in both channel banks
    pub fn rfcsr_write_chanreg(&mut self, reg: u8, value: u8) -> Result<(), Rt2800Error> {
        self.rfcsr_write_bank(4, reg, value)?;
        self.rfcsr_write_bank(6, reg, value)
    }

    /// Write a DC calibration register in both calibration banks
    pub fn rfcsr_write_dccal(&mut self, reg: u8, value: u8) -> Result<(), Rt2800Error> {
        self.rfcsr_write_bank(5, reg, value)?;
        self.rfcsr_write_bank(7, reg, value)
    }

    /// Write a legacy RF word (index 1 to 4) and keep a shadow copy
    pub fn rf_write(&mut self, word: usize, value: u32) -> Result<(), Rt2800Error> {
        self.wait_bank(RegisterBank::Rf)?;
        let mut reg = 0;
        RF_CSR_CFG0_REG_VALUE_BW.set(&mut reg, value);
        RF_CSR_CFG0_STANDBYMODE.set(&mut reg, 0);
        RF_CSR_CFG0_SEL.set(&mut reg, 0);
        RF_CSR_CFG0_BUSY.set(&mut reg, 1);
        self.write_reg(RF_CSR_CFG0, reg)?;
        if let Some(shadow) = self.rf_shadow.get_mut(word) {
            *shadow = value;
        }
        Ok(())
    }

    /// Last value written to a legacy RF word
    pub fn rf_read(&self, word: usize) -> u32 {
        self.rf_shadow.get(word).copied().unwrap_or(0)
    }

    /// Send a command to the MCU through the mailbox
    pub fn mcu_request(&mut self, command: u8, token: u8, arg0: u8, arg1: u8) -> Result<(), Rt2800Error> {
        let mut reg = self.wait_bank(RegisterBank::Mcu)?;
        H2M_MAILBOX_CSR_OWNER.set(&mut reg, 1);
        H2M_MAILBOX_CSR_CMD_TOKEN.set(&mut reg, token as u32);
        H2M_MAILBOX_CSR_ARG0.set(&mut reg, arg0 as u32);
        H2M_MAILBOX_CSR_ARG1.set(&mut reg, arg1 as u32);
        self.write_reg(H2M_MAILBOX_CSR, reg)?;
        self.write_reg(HOST_CMD_CSR, HOST_CMD_CSR_HOST_COMMAND.with(0, command as u32))
    }

    /// Wait until the CSR bus returns something else than 0 or all ones
    pub fn wait_csr_ready(&mut self) -> Result<(), Rt2800Error> {
        let delay = self.config.csr_ready_delay;
        let attempts = self.config.busy_count;
        self.poll_reg(RegisterBank::Csr, MAC_CSR0, attempts, delay, |reg| reg != 0 && reg != u32::MAX)
            .inspect_err(|_| error!("Unstable hardware"))?;
        Ok(())
    }

    /// Wait until both DMA directions are idle
    pub fn wait_wpdma_ready(&mut self) -> Result<(), Rt2800Error> {
        let delay = self.config.wpdma_delay;
        let attempts = self.config.busy_count;
        self.poll_reg(RegisterBank::Csr, WPDMA_GLO_CFG, attempts, delay, |reg| {
            !WPDMA_GLO_CFG_TX_DMA_BUSY.is_set(reg) && !WPDMA_GLO_CFG_RX_DMA_BUSY.is_set(reg)
        })?;
        Ok(())
    }

    /// Stop TX/RX DMA
    pub fn disable_wpdma(&mut self) -> Result<(), Rt2800Error> {
        self.modify_reg(WPDMA_GLO_CFG, |reg| {
            WPDMA_GLO_CFG_ENABLE_TX_DMA.set(reg, 0);
            WPDMA_GLO_CFG_TX_DMA_BUSY.set(reg, 0);
            WPDMA_GLO_CFG_ENABLE_RX_DMA.set(reg, 0);
            WPDMA_GLO_CFG_RX_DMA_BUSY.set(reg, 0);
            WPDMA_GLO_CFG_TX_WRITEBACK_DONE.set(reg, 1);
        })?;
        Ok(())
    }

    /// Wait until the MAC releases the BBP and RF
    pub fn wait_bbp_rf_ready(&mut self) -> Result<(), Rt2800Error> {
        let delay = self.config.busy_delay;
        let attempts = self.config.busy_count;
        self.poll_reg(RegisterBank::Csr, MAC_STATUS_CFG, attempts, delay, |reg| !MAC_STATUS_CFG_BBP_RF_BUSY.is_set(reg))
            .inspect_err(|_| error!("BBP/RF register access failed, aborting"))?;
        Ok(())
    }

    /// Reactivate the baseband and wait until BBP0 reads as something else than 0x00 or 0xff
    pub fn wait_bbp_ready(&mut self) -> Result<(), Rt2800Error> {
        self.write_reg(H2M_BBP_AGENT, 0)?;
        self.write_reg(H2M_MAILBOX_CSR, 0)?;
        self.usleep(1);
        for _ in 0..self.config.busy_count {
            let value = self.bbp_read(0)?;
            if value != 0xff && value != 0x00 {
                return Ok(());
            }
            self.sleep(self.config.busy_delay);
        }
        error!("BBP register access failed, aborting");
        Err(Rt2800Error::RegisterBusyTimeout { bank: RegisterBank::Bbp, offset: 0 })
    }
}
