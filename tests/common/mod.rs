//! Register level model of an rt2800 chip used by the integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::convert::Infallible;

use embedded_hal::blocking::delay::DelayUs;
use embassy_time::Duration;

use rt2800::regs::mac::*;
use rt2800::{BusKind, Config, RegisterBus, Rt2800};

/// Host command issued through HOST_CMD_CSR with the mailbox content at that time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McuCommand {
    pub command: u8,
    pub token: u8,
    pub arg0: u8,
    pub arg1: u8,
}

/// Fake register bus: a flat CSR space plus the BBP and RFCSR banks behind their control registers
pub struct FakeBus {
    pub kind: BusKind,
    pub regs: HashMap<u32, u32>,
    pub bbp: [u8; 256],
    /// DC offset registers behind BBP158/159
    pub dcoc: [u8; 256],
    /// RF control registers, banked as `bank << 6 | reg` on the MT7620 layout
    pub rfcsr: [u8; 1024],
    /// RF_CSR_CFG uses the MT7620 layout (RT6352)
    pub mt7620: bool,
    pub eeprom: [u8; 512],
    /// Every CSR write, in order
    pub writes: Vec<(u32, u32)>,
    pub bbp_writes: Vec<(u8, u8)>,
    pub rfcsr_writes: Vec<(u16, u8)>,
    /// Values sent through the legacy RF word interface
    pub rf_words: Vec<u32>,
    pub mcu_commands: Vec<McuCommand>,
    /// Number of reads of BBP_CSR_CFG
    pub bbp_csr_reads: usize,
    /// BBP control register never clears its busy bit
    pub bbp_stuck: bool,
    /// DMA engine always reports busy
    pub dma_stuck: bool,
    /// Analog measurements: value returned by a BBP read instead of the stored one
    pub bbp_model: Option<fn(&FakeBus, u8) -> Option<u8>>,
}

impl FakeBus {
    /// Chip reporting `rt`/`rev` in MAC_CSR0 with an EEPROM image full of 0xff.
    /// An RT5390 on a SoC bus is an RT6352 and gets the MT7620 RF interface.
    pub fn new(kind: BusKind, rt: u16, rev: u16) -> Self {
        let mut regs = HashMap::new();
        regs.insert(MAC_CSR0, ((rt as u32) << 16) | rev as u32);
        regs.insert(PBF_SYS_CTRL, PBF_SYS_CTRL_READY.mask());
        let mut bbp = [0u8; 256];
        bbp[0] = 0x12;
        Self {
            kind,
            regs,
            bbp,
            dcoc: [0; 256],
            rfcsr: [0; 1024],
            mt7620: kind == BusKind::Soc && rt == 0x5390,
            eeprom: [0xff; 512],
            writes: Vec::new(),
            bbp_writes: Vec::new(),
            rfcsr_writes: Vec::new(),
            rf_words: Vec::new(),
            mcu_commands: Vec::new(),
            bbp_csr_reads: 0,
            bbp_stuck: false,
            dma_stuck: false,
            bbp_model: None,
        }
    }

    /// Set an EEPROM word (little-endian)
    pub fn with_eeprom_word(mut self, index: usize, value: u16) -> Self {
        self.eeprom[2 * index..2 * index + 2].copy_from_slice(&value.to_le_bytes());
        self
    }

    pub fn reg(&self, offset: u32) -> u32 {
        self.regs.get(&offset).copied().unwrap_or(0)
    }

    pub fn with_bbp_model(mut self, model: fn(&FakeBus, u8) -> Option<u8>) -> Self {
        self.bbp_model = Some(model);
        self
    }

    /// Banked RF register (MT7620 layout)
    pub fn rfcsr_bank(&self, bank: u8, reg: u8) -> u8 {
        self.rfcsr[((bank as usize) << 6) | reg as usize]
    }

    pub fn rfcsr_writes_to(&self, word: u16) -> Vec<u8> {
        self.rfcsr_writes.iter().filter(|(w, _)| *w == word).map(|(_, v)| *v).collect()
    }

    pub fn bbp_writes_to(&self, word: u8) -> Vec<u8> {
        self.bbp_writes.iter().filter(|(w, _)| *w == word).map(|(_, v)| *v).collect()
    }

    pub fn clear_logs(&mut self) {
        self.writes.clear();
        self.bbp_writes.clear();
        self.rfcsr_writes.clear();
        self.rf_words.clear();
        self.mcu_commands.clear();
        self.bbp_csr_reads = 0;
    }

    fn bbp_access(&mut self, value: u32) -> u32 {
        let word = BBP_CSR_CFG_REGNUM.get(value) as usize;
        let mut reg = value;
        if BBP_CSR_CFG_READ_CONTROL.is_set(value) {
            let stored = match word {
                159 => self.dcoc[self.bbp[158] as usize],
                _ => self.bbp[word],
            };
            let data = self.bbp_model.and_then(|model| model(self, word as u8)).unwrap_or(stored);
            BBP_CSR_CFG_VALUE.set(&mut reg, data as u32);
        } else {
            let data = BBP_CSR_CFG_VALUE.get_u8(value);
            self.bbp[word] = data;
            self.bbp_writes.push((word as u8, data));
            if word == 159 {
                let dcoc = self.bbp[158];
                // The filter calibration engine completes as soon as it is started
                self.dcoc[dcoc as usize] = if dcoc == 0 && data == 0x82 { 0x02 } else { data };
            }
        }
        BBP_CSR_CFG_BUSY.set(&mut reg, 0);
        reg
    }

    fn rfcsr_access(&mut self, value: u32) -> u32 {
        let (regnum, write, data, busy) = if self.mt7620 {
            (RF_CSR_CFG_REGNUM_MT7620, RF_CSR_CFG_WRITE_MT7620, RF_CSR_CFG_DATA_MT7620, RF_CSR_CFG_BUSY_MT7620)
        } else {
            (RF_CSR_CFG_REGNUM, RF_CSR_CFG_WRITE, RF_CSR_CFG_DATA, RF_CSR_CFG_BUSY)
        };
        let word = regnum.get(value) as usize;
        let mut reg = value;
        if write.is_set(value) {
            let byte = data.get(value) as u8;
            self.rfcsr[word] = byte;
            self.rfcsr_writes.push((word as u16, byte));
        } else {
            data.set(&mut reg, self.rfcsr[word] as u32);
        }
        busy.set(&mut reg, 0);
        reg
    }
}

impl RegisterBus for FakeBus {
    type Error = Infallible;

    fn kind(&self) -> BusKind {
        self.kind
    }

    fn read32(&mut self, offset: u32) -> Result<u32, Self::Error> {
        let mut value = self.reg(offset);
        match offset {
            BBP_CSR_CFG => {
                self.bbp_csr_reads += 1;
                if self.bbp_stuck {
                    BBP_CSR_CFG_BUSY.set(&mut value, 1);
                }
            }
            WPDMA_GLO_CFG if self.dma_stuck => WPDMA_GLO_CFG_TX_DMA_BUSY.set(&mut value, 1),
            _ => {}
        }
        Ok(value)
    }

    fn write32(&mut self, offset: u32, value: u32) -> Result<(), Self::Error> {
        self.writes.push((offset, value));
        let stored = match offset {
            BBP_CSR_CFG if self.bbp_stuck => value,
            BBP_CSR_CFG => self.bbp_access(value),
            RF_CSR_CFG => self.rfcsr_access(value),
            RF_CSR_CFG0 => {
                self.rf_words.push(RF_CSR_CFG0_REG_VALUE_BW.get(value));
                RF_CSR_CFG0_BUSY.with(value, 0)
            }
            // The MCU picks up mailbox requests immediately
            H2M_MAILBOX_CSR => H2M_MAILBOX_CSR_OWNER.with(value, 0),
            HOST_CMD_CSR => {
                let mailbox = self.reg(H2M_MAILBOX_CSR);
                self.mcu_commands.push(McuCommand {
                    command: HOST_CMD_CSR_HOST_COMMAND.get_u8(value),
                    token: H2M_MAILBOX_CSR_CMD_TOKEN.get_u8(mailbox),
                    arg0: H2M_MAILBOX_CSR_ARG0.get_u8(mailbox),
                    arg1: H2M_MAILBOX_CSR_ARG1.get_u8(mailbox),
                });
                value
            }
            _ => value,
        };
        self.regs.insert(offset, stored);
        Ok(())
    }

    fn read_eeprom(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        let len = buf.len().min(self.eeprom.len());
        buf[..len].copy_from_slice(&self.eeprom[..len]);
        Ok(())
    }
}

/// Delay provider counting the requested waits without sleeping
#[derive(Debug, Default)]
pub struct CountingDelay {
    pub calls: usize,
    pub total_us: u64,
}

impl DelayUs<u32> for CountingDelay {
    fn delay_us(&mut self, us: u32) {
        self.calls += 1;
        self.total_us += us as u64;
    }
}

/// Small polling budget with a visible delay between attempts
pub fn test_config() -> Config {
    Config::no_delay()
        .with_busy_count(7)
        .with_busy_delay(Duration::from_micros(5))
}

pub type TestDevice = Rt2800<FakeBus, CountingDelay>;

/// Open a device on a fake bus
pub fn open(bus: FakeBus) -> TestDevice {
    match Rt2800::open(bus, CountingDelay::default(), test_config()) {
        Ok(dev) => dev,
        Err(e) => panic!("open failed: {e}"),
    }
}
