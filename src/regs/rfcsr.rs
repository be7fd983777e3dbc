//! RF control register fields, and the legacy 24-bit RF words used by the RF2xxx synthesizers

use crate::field::{Field8, Field32};

/// Upper bound applied to the crystal frequency offset written to RFCSR17
pub const FREQ_OFFSET_BOUND: u8 = 0x5f;

/// RFCSR1: block enables and power-down bits
pub const RFCSR1_RF_BLOCK_EN: Field8 = Field8::new(0x01);
pub const RFCSR1_PLL_PD: Field8 = Field8::new(0x02);
pub const RFCSR1_RX0_PD: Field8 = Field8::new(0x04);
pub const RFCSR1_TX0_PD: Field8 = Field8::new(0x08);
pub const RFCSR1_RX1_PD: Field8 = Field8::new(0x10);
pub const RFCSR1_TX1_PD: Field8 = Field8::new(0x20);
pub const RFCSR1_RX2_PD: Field8 = Field8::new(0x40);
pub const RFCSR1_TX2_PD: Field8 = Field8::new(0x80);
pub const RFCSR1_TX2_EN_MT7620: Field8 = Field8::new(0x02);

/// RFCSR2: resistor calibration
pub const RFCSR2_RX2_EN_MT7620: Field8 = Field8::new(0x02);
pub const RFCSR2_TX2_EN_MT7620: Field8 = Field8::new(0x20);
pub const RFCSR2_RESCAL_BP: Field8 = Field8::new(0x40);
pub const RFCSR2_RESCAL_EN: Field8 = Field8::new(0x80);

pub const RFCSR3_K: Field8 = Field8::new(0x0f);
pub const RFCSR3_BIT1: Field8 = Field8::new(0x02);
pub const RFCSR3_BIT2: Field8 = Field8::new(0x04);
pub const RFCSR3_BIT3: Field8 = Field8::new(0x08);
pub const RFCSR3_BIT4: Field8 = Field8::new(0x10);
pub const RFCSR3_BIT5: Field8 = Field8::new(0x20);
/// VCO calibration trigger on RF3053/RF53xx/RF55xx and friends
pub const RFCSR3_VCOCAL_EN: Field8 = Field8::new(0x80);

/// VCO calibration trigger on MT7620
pub const RFCSR4_VCOCAL_EN: Field8 = Field8::new(0x80);

pub const RFCSR5_R1: Field8 = Field8::new(0x0c);

pub const RFCSR6_R1: Field8 = Field8::new(0x03);
pub const RFCSR6_R2: Field8 = Field8::new(0x40);
pub const RFCSR6_TXDIV: Field8 = Field8::new(0x0c);
pub const RFCSR6_VCO_IC: Field8 = Field8::new(0xc0);

/// VCO calibration trigger on RF3020/RF3052 and friends
pub const RFCSR7_RF_TUNING: Field8 = Field8::new(0x01);
pub const RFCSR7_BIT2: Field8 = Field8::new(0x04);
pub const RFCSR7_BIT3: Field8 = Field8::new(0x08);
pub const RFCSR7_BIT4: Field8 = Field8::new(0x10);
pub const RFCSR7_BITS67: Field8 = Field8::new(0xc0);

pub const RFCSR9_K: Field8 = Field8::new(0x0f);
pub const RFCSR9_N: Field8 = Field8::new(0x10);
pub const RFCSR9_UNKNOWN: Field8 = Field8::new(0xe0);
pub const RFCSR9_MOD: Field8 = Field8::new(0x80);

pub const RFCSR11_R: Field8 = Field8::new(0x03);
pub const RFCSR11_PLL_MOD: Field8 = Field8::new(0x0c);
pub const RFCSR11_MOD: Field8 = Field8::new(0xc0);
pub const RFCSR11_PLL_IDOH: Field8 = Field8::new(0x40);

pub const RFCSR12_TX_POWER: Field8 = Field8::new(0x1f);
pub const RFCSR12_DR0: Field8 = Field8::new(0xe0);

pub const RFCSR13_TX_POWER: Field8 = Field8::new(0x1f);
pub const RFCSR13_DR0: Field8 = Field8::new(0xe0);
pub const RFCSR13_RDIV_MT7620: Field8 = Field8::new(0x03);

pub const RFCSR15_TX_LO2_EN: Field8 = Field8::new(0x08);

pub const RFCSR16_TXMIXER_GAIN: Field8 = Field8::new(0x07);
pub const RFCSR16_RF_PLL_FREQ_SEL_MT7620: Field8 = Field8::new(0x0f);
pub const RFCSR16_SDM_MODE_MT7620: Field8 = Field8::new(0xe0);

/// RFCSR17: crystal trim code and TX mixer
pub const RFCSR17_TXMIXER_GAIN: Field8 = Field8::new(0x07);
pub const RFCSR17_TX_LO1_EN: Field8 = Field8::new(0x08);
pub const RFCSR17_R: Field8 = Field8::new(0x20);
pub const RFCSR17_CODE: Field8 = Field8::new(0x7f);

pub const RFCSR18_XO_TUNE_BYPASS: Field8 = Field8::new(0x40);

pub const RFCSR19_K: Field8 = Field8::new(0x03);

pub const RFCSR20_RX_LO1_EN: Field8 = Field8::new(0x08);

pub const RFCSR21_RX_LO2_EN: Field8 = Field8::new(0x08);
pub const RFCSR21_BIT1: Field8 = Field8::new(0x01);
pub const RFCSR21_BIT8: Field8 = Field8::new(0x80);

pub const RFCSR22_BASEBAND_LOOPBACK: Field8 = Field8::new(0x01);
pub const RFCSR22_FREQPLAN_D_MT7620: Field8 = Field8::new(0x07);

pub const RFCSR23_FREQ_OFFSET: Field8 = Field8::new(0x7f);

/// RFCSR24: TX filter calibration
pub const RFCSR24_TX_AGC_FC: Field8 = Field8::new(0x1f);
pub const RFCSR24_TX_H20M: Field8 = Field8::new(0x20);
pub const RFCSR24_TX_CALIB: Field8 = Field8::new(0x7f);

pub const RFCSR27_R1: Field8 = Field8::new(0x03);
pub const RFCSR27_R2: Field8 = Field8::new(0x04);
pub const RFCSR27_R3: Field8 = Field8::new(0x30);
pub const RFCSR27_R4: Field8 = Field8::new(0x40);

pub const RFCSR28_CH11_HT40: Field8 = Field8::new(0x04);

pub const RFCSR29_RSSI_GAIN: Field8 = Field8::new(0xc0);

/// RFCSR30: filter bandwidth
pub const RFCSR30_TX_H20M: Field8 = Field8::new(0x02);
pub const RFCSR30_RX_H20M: Field8 = Field8::new(0x04);
pub const RFCSR30_RX_VCM: Field8 = Field8::new(0x18);
pub const RFCSR30_RF_CALIBRATION: Field8 = Field8::new(0x80);
pub const RF3322_RFCSR30_TX_H20M: Field8 = Field8::new(0x01);
pub const RF3322_RFCSR30_RX_H20M: Field8 = Field8::new(0x02);

/// RFCSR31: RX filter calibration
pub const RFCSR31_RX_AGC_FC: Field8 = Field8::new(0x1f);
pub const RFCSR31_RX_H20M: Field8 = Field8::new(0x20);
pub const RFCSR31_RX_CALIB: Field8 = Field8::new(0x7f);

pub const RFCSR32_TX_AGC_FC: Field8 = Field8::new(0xf8);

pub const RFCSR34_TX0_EXT_PA: Field8 = Field8::new(0x04);
pub const RFCSR34_TX1_EXT_PA: Field8 = Field8::new(0x08);

pub const RFCSR36_RF_BS: Field8 = Field8::new(0x80);

pub const RFCSR38_RX_LO1_EN: Field8 = Field8::new(0x20);

pub const RFCSR39_RX_DIV: Field8 = Field8::new(0x40);
pub const RFCSR39_RX_LO2_EN: Field8 = Field8::new(0x80);

pub const RFCSR41_BIT1: Field8 = Field8::new(0x01);
pub const RFCSR41_BIT4: Field8 = Field8::new(0x08);

pub const RFCSR42_BIT1: Field8 = Field8::new(0x01);
pub const RFCSR42_BIT4: Field8 = Field8::new(0x08);
pub const RFCSR42_TX2_EN_MT7620: Field8 = Field8::new(0x40);

pub const RFCSR49_TX: Field8 = Field8::new(0x3f);
pub const RFCSR49_EP: Field8 = Field8::new(0xc0);
pub const RFCSR49_TX_LO1_IC: Field8 = Field8::new(0x1c);
pub const RFCSR49_TX_DIV: Field8 = Field8::new(0x20);

pub const RFCSR50_TX: Field8 = Field8::new(0x3f);
pub const RFCSR50_EP: Field8 = Field8::new(0xc0);
pub const RFCSR50_TX_LO1_EN: Field8 = Field8::new(0x20);
pub const RFCSR50_TX_LO2_EN: Field8 = Field8::new(0x10);
pub const RFCSR50_TX0_EXT_PA: Field8 = Field8::new(0x10);
pub const RFCSR50_TX1_EXT_PA: Field8 = Field8::new(0x20);

pub const RFCSR51_BITS01: Field8 = Field8::new(0x03);
pub const RFCSR51_BITS24: Field8 = Field8::new(0x1c);
pub const RFCSR51_BITS57: Field8 = Field8::new(0xe0);

pub const RFCSR53_TX_POWER: Field8 = Field8::new(0x3f);
pub const RFCSR54_TX_POWER: Field8 = Field8::new(0x3f);
pub const RFCSR55_TX_POWER: Field8 = Field8::new(0x3f);

pub const RFCSR57_DRV_CC: Field8 = Field8::new(0xfc);

/// Legacy RF word 2: antenna setup
pub const RF2_ANTENNA_RX2: Field32 = Field32::new(0x00000040);
pub const RF2_ANTENNA_TX1: Field32 = Field32::new(0x00004000);
pub const RF2_ANTENNA_RX1: Field32 = Field32::new(0x00020000);

/// Legacy RF word 3: TX power
pub const RF3_TXPOWER_G: Field32 = Field32::new(0x00003e00);
pub const RF3_TXPOWER_A_7DBM_BOOST: Field32 = Field32::new(0x00000200);
pub const RF3_TXPOWER_A: Field32 = Field32::new(0x00003c00);

/// Legacy RF word 4: TX power, frequency offset and bandwidth
pub const RF4_TXPOWER_G: Field32 = Field32::new(0x000007c0);
pub const RF4_TXPOWER_A_7DBM_BOOST: Field32 = Field32::new(0x00000040);
pub const RF4_TXPOWER_A: Field32 = Field32::new(0x00000780);
pub const RF4_FREQ_OFFSET: Field32 = Field32::new(0x001f8000);
pub const RF4_HT40: Field32 = Field32::new(0x00200000);
