//! Baseband register fields

use crate::field::Field8;

/// BBP1: TX antenna
pub const BBP1_TX_POWER_CTRL: Field8 = Field8::new(0x03);
pub const BBP1_TX_ANTENNA: Field8 = Field8::new(0x18);

/// BBP3: RX antenna and bandwidth
pub const BBP3_RX_ADC: Field8 = Field8::new(0x03);
pub const BBP3_RX_ANTENNA: Field8 = Field8::new(0x18);
pub const BBP3_HT40_MINUS: Field8 = Field8::new(0x20);
pub const BBP3_ADC_MODE_SWITCH: Field8 = Field8::new(0x40);
pub const BBP3_ADC_INIT_MODE: Field8 = Field8::new(0x80);

/// BBP4: bandwidth and MAC interface
pub const BBP4_TX_BF: Field8 = Field8::new(0x01);
pub const BBP4_BANDWIDTH: Field8 = Field8::new(0x18);
pub const BBP4_MAC_IF_CTRL: Field8 = Field8::new(0x40);

/// BBP27: RX chain selection for per-chain writes
pub const BBP27_RX_CHAIN_SEL: Field8 = Field8::new(0x60);

/// BBP47: TSSI
pub const BBP47_TSSI_REPORT_SEL: Field8 = Field8::new(0x03);
pub const BBP47_TSSI_UPDATE_REQ: Field8 = Field8::new(0x04);
pub const BBP47_TSSI_TSSI_MODE: Field8 = Field8::new(0x18);
pub const BBP47_TSSI_ADC6: Field8 = Field8::new(0x80);

/// BBP49: update flag
pub const BBP49_UPDATE_FLAG: Field8 = Field8::new(0x01);

/// BBP105: signal detection
pub const BBP105_DETECT_SIG_ON_PRIMARY: Field8 = Field8::new(0x01);
pub const BBP105_FEQ: Field8 = Field8::new(0x02);
pub const BBP105_MLD: Field8 = Field8::new(0x04);
pub const BBP105_SIG_ON_PRIMARY: Field8 = Field8::new(0x08);

/// BBP109/110: per-chain TX fine power
pub const BBP109_TX0_POWER: Field8 = Field8::new(0x0f);
pub const BBP109_TX1_POWER: Field8 = Field8::new(0xf0);
pub const BBP110_TX2_POWER: Field8 = Field8::new(0x0f);

/// BBP138: unused DAC/ADC
pub const BBP138_RX_ADC1: Field8 = Field8::new(0x02);
pub const BBP138_RX_ADC2: Field8 = Field8::new(0x04);
pub const BBP138_TX_DAC1: Field8 = Field8::new(0x20);
pub const BBP138_TX_DAC2: Field8 = Field8::new(0x40);

/// BBP152: default RX antenna
pub const BBP152_RX_DEFAULT_ANT: Field8 = Field8::new(0x80);

/// BBP254
pub const BBP254_BIT7: Field8 = Field8::new(0x80);
